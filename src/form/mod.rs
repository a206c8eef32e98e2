mod guard;
mod label;
mod summary;


pub use guard::{
    FormId, GuardError, GuardOptions, GuardResult, GuardSnapshot, GuardState, SubmitDecision,
    SubmitGuard, SuppressReason,
};
pub use label::{FALLBACK_LABEL, LabelIndex, LabelSources, resolve_label};
pub use summary::{MAX_SUMMARY_ENTRIES, SUMMARY_HEADING, SummaryContent, SummaryEntry};
