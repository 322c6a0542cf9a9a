use crate::error::OutputError;
use crate::parser::{AnalysisResult, Verdict};
use crate::personality::{title_case, PersonalityRegistry};
use chrono::Utc;
use std::fs;
use std::path::Path;

/// Render an analysis as a markdown report, one section per personality
pub fn render_markdown(result: &AnalysisResult, registry: &PersonalityRegistry) -> String {
    let mut content = String::new();

    // Header
    content.push_str("# Am I The Asshole?\n\n");
    content.push_str(&format!(
        "_Generated {}_\n\n",
        Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    ));

    // Tally of verdicts about the narrator
    let tally = result.tally();
    content.push_str("| Verdict | Personalities |\n");
    content.push_str("|---------|---------------|\n");
    content.push_str(&format!("| {} | {} |\n", Verdict::Yta.label(), tally.yta));
    content.push_str(&format!("| {} | {} |\n", Verdict::Nta.label(), tally.nta));
    content.push_str(&format!(
        "| {} | {} |\n",
        Verdict::Undecided.label(),
        tally.undecided
    ));
    content.push_str("\n---\n\n");

    for (key, analysis) in result.iter() {
        let title = registry
            .get(key)
            .map(|p| p.name.clone())
            .unwrap_or_else(|_| title_case(key));

        content.push_str(&format!("## {}\n\n", title));
        content.push_str(&format!(
            "- **User:** {}\n",
            analysis.verdicts.user.label()
        ));
        content.push_str(&format!(
            "- **Others:** {}\n\n",
            analysis.verdicts.others.label()
        ));
        content.push_str(&format!("{}\n\n", analysis.content));
        content.push_str("---\n\n");
    }

    content
}

/// Write a rendered report (or raw JSON) to disk, creating parent directories
pub fn write_report(path: &Path, content: &str) -> Result<(), OutputError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(OutputError::CreateDir)?;
    }
    fs::write(path, content).map_err(OutputError::WriteReport)
}
