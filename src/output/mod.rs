mod report;

pub use report::{render_markdown, write_report};
