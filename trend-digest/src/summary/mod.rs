//! Project summaries and their selection into top picks.

mod outcome;
mod project_summary;

pub use outcome::{categorize, SummarizationOutcome};
pub use project_summary::{ProjectSummary, CALL_FAILED_HEADLINE, PARSE_FAILED_HEADLINE};
