//! The default ten-member panel, used when the config file has no
//! `personalities` section.

const TRADITIONALIST: &str = include_str!("../../prompts/personalities/traditionalist.md");
const FREE_SPIRIT: &str = include_str!("../../prompts/personalities/free_spirit.md");
const SKEPTIC: &str = include_str!("../../prompts/personalities/skeptic.md");
const EMPATH: &str = include_str!("../../prompts/personalities/empath.md");
const PRAGMATIST: &str = include_str!("../../prompts/personalities/pragmatist.md");
const PHILOSOPHER: &str = include_str!("../../prompts/personalities/philosopher.md");
const COMEDIAN: &str = include_str!("../../prompts/personalities/comedian.md");
const LAWYER: &str = include_str!("../../prompts/personalities/lawyer.md");
const THERAPIST: &str = include_str!("../../prompts/personalities/therapist.md");
const OLD_TIMER: &str = include_str!("../../prompts/personalities/old_timer.md");

/// Shared answer-format instructions appended to every personality prompt
pub const VERDICT_FORMAT: &str = include_str!("../../prompts/verdict_format.md");

/// (key, instruction) in presentation order
pub const BUILTIN_PERSONALITIES: &[(&str, &str)] = &[
    ("traditionalist", TRADITIONALIST),
    ("free_spirit", FREE_SPIRIT),
    ("skeptic", SKEPTIC),
    ("empath", EMPATH),
    ("pragmatist", PRAGMATIST),
    ("philosopher", PHILOSOPHER),
    ("comedian", COMEDIAN),
    ("lawyer", LAWYER),
    ("therapist", THERAPIST),
    ("old_timer", OLD_TIMER),
];
