use super::{Analysis, Verdict, Verdicts};
use regex::Regex;
use std::sync::LazyLock;

// Tag-shaped text regardless of value, so invalid values are still stripped.
// A marker takes its trailing spaces and one line break with it; nothing
// else in the text is touched.
static USER_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[USER:[ \t]*([^\]\n]*?)[ \t]*\][ \t]*(?:\r?\n)?").expect("valid regex")
});
static OTHERS_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[OTHERS:[ \t]*([^\]\n]*?)[ \t]*\][ \t]*(?:\r?\n)?").expect("valid regex")
});

/// First valid verdict carried by a marker, if any
fn extract_verdict(re: &Regex, raw: &str) -> Option<Verdict> {
    re.captures_iter(raw)
        .filter_map(|caps| caps.get(1))
        .find_map(|value| value.as_str().parse().ok())
}

/// Parse verdict markers out of a completion.
///
/// Missing or unrecognised markers degrade to `UNDECIDED`; this never fails.
pub fn parse_markers(raw: &str) -> Analysis {
    let user = extract_verdict(&USER_MARKER, raw).unwrap_or_default();
    let others = extract_verdict(&OTHERS_MARKER, raw).unwrap_or_default();

    let stripped = USER_MARKER.replace_all(raw, "");
    let stripped = OTHERS_MARKER.replace_all(&stripped, "");
    let content = stripped.trim().to_string();

    Analysis {
        content,
        verdicts: Verdicts { user, others },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_both_markers() {
        let analysis = parse_markers("[USER: YTA]\n[OTHERS: NTA]\nExplanation text.");
        assert_eq!(analysis.content, "Explanation text.");
        assert_eq!(analysis.verdicts.user, Verdict::Yta);
        assert_eq!(analysis.verdicts.others, Verdict::Nta);
    }

    #[test]
    fn test_no_markers() {
        let analysis = parse_markers("no markers here");
        assert_eq!(analysis.content, "no markers here");
        assert_eq!(analysis.verdicts.user, Verdict::Undecided);
        assert_eq!(analysis.verdicts.others, Verdict::Undecided);
    }

    #[test]
    fn test_invalid_value() {
        let analysis = parse_markers("[USER: MAYBE]\n[OTHERS: NTA]\ntext");
        assert_eq!(analysis.verdicts.user, Verdict::Undecided);
        assert_eq!(analysis.verdicts.others, Verdict::Nta);
        assert_eq!(analysis.content, "text");
    }

    #[test]
    fn test_one_marker_missing() {
        let analysis = parse_markers("[OTHERS: YTA]\nThey were rude.");
        assert_eq!(analysis.verdicts.user, Verdict::Undecided);
        assert_eq!(analysis.verdicts.others, Verdict::Yta);
        assert_eq!(analysis.content, "They were rude.");
    }

    #[test]
    fn test_markers_at_end_and_inline() {
        let raw = "Honestly, you overreacted.\n\n[USER: YTA] [OTHERS: UNDECIDED]";
        let analysis = parse_markers(raw);
        assert_eq!(analysis.verdicts.user, Verdict::Yta);
        assert_eq!(analysis.verdicts.others, Verdict::Undecided);
        assert_eq!(analysis.content, "Honestly, you overreacted.");
    }

    #[test]
    fn test_marker_lines_removed_mid_text() {
        let raw = "First paragraph.\n[USER: NTA]\n[OTHERS: YTA]\nSecond paragraph.";
        let analysis = parse_markers(raw);
        assert_eq!(analysis.content, "First paragraph.\nSecond paragraph.");
    }

    #[test]
    fn test_inline_marker_removed_with_its_padding() {
        let analysis = parse_markers("Verdict: [USER: NTA] you did nothing wrong.\r\n[OTHERS: YTA]\r\nThey did.");
        assert_eq!(analysis.content, "Verdict: you did nothing wrong.\r\nThey did.");
        assert_eq!(analysis.verdicts.user, Verdict::Nta);
        assert_eq!(analysis.verdicts.others, Verdict::Yta);
    }

    #[test]
    fn test_blank_lines_in_explanation_preserved() {
        let raw = "First.\n\n\n\nSecond.";
        assert_eq!(parse_markers(raw).content, raw);

        let analysis = parse_markers("[USER: YTA]\n[OTHERS: NTA]\nFirst.\n\n\nSecond.");
        assert_eq!(analysis.content, "First.\n\n\nSecond.");
    }

    #[test]
    fn test_lowercase_value_not_accepted() {
        let analysis = parse_markers("[USER: yta]\n[OTHERS: nta]\nok");
        assert_eq!(analysis.verdicts.user, Verdict::Undecided);
        assert_eq!(analysis.verdicts.others, Verdict::Undecided);
        assert_eq!(analysis.content, "ok");
    }

    #[test]
    fn test_first_valid_marker_wins() {
        let analysis = parse_markers("[USER: NTA]\n[USER: YTA]\nbody");
        assert_eq!(analysis.verdicts.user, Verdict::Nta);
        assert_eq!(analysis.content, "body");
    }

    #[test]
    fn test_extra_padding_inside_brackets() {
        let analysis = parse_markers("[USER:NTA]\n[OTHERS:   YTA  ]\nbody");
        assert_eq!(analysis.verdicts.user, Verdict::Nta);
        assert_eq!(analysis.verdicts.others, Verdict::Yta);
    }

    #[test]
    fn test_empty_and_whitespace_input() {
        let analysis = parse_markers("   \n ");
        assert_eq!(analysis.content, "");
        assert_eq!(analysis.verdicts, Verdicts::default());
    }

    #[test]
    fn test_parse_is_deterministic() {
        let raw = "[USER: NTA]\n[OTHERS: YTA]\nSame input, same output.";
        assert_eq!(parse_markers(raw), parse_markers(raw));
    }

    #[test]
    fn test_unterminated_marker_left_in_content() {
        let analysis = parse_markers("[USER: YTA\nstill talking");
        assert_eq!(analysis.verdicts.user, Verdict::Undecided);
        assert_eq!(analysis.content, "[USER: YTA\nstill talking");
    }
}
