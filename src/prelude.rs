pub use crate::PageRuntime;
pub use crate::feedback::{AutoDismiss, DismissFuture, DismissSchedule};
pub use crate::form::{
    FALLBACK_LABEL, FormId, GuardError, GuardOptions, GuardResult, GuardSnapshot, GuardState,
    LabelIndex, LabelSources, MAX_SUMMARY_ENTRIES, SUMMARY_HEADING, SubmitDecision, SubmitGuard,
    SummaryContent, SummaryEntry, SuppressReason, resolve_label,
};
pub use crate::host::{
    ARIA_INVALID_ATTR, BannerDom, BannerId, ControlId, FieldId, FieldValidity, FocusTarget,
    FormDom, INVALID_CLASS, MemoryBanner, MemoryControl, MemoryField, MemoryForm,
    WAS_VALIDATED_CLASS,
};
pub use crate::motion::{Easing, MotionTransition, TransitionPreset};
