mod analysis;
mod markers;

pub use analysis::{Analysis, AnalysisResult, Verdict, Verdicts};

/// Parse a personality's verdicts and explanation from completion text
pub fn parse_analysis(raw: &str, personality_key: &str) -> Analysis {
    let analysis = markers::parse_markers(raw);

    if analysis.verdicts == Verdicts::default() {
        tracing::debug!(
            "No verdict markers recognised in output for personality {}",
            personality_key
        );
    }

    analysis
}
