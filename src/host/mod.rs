use crate::form::{LabelSources, SummaryContent};
use crate::motion::MotionTransition;

mod memory;

pub use memory::{FocusTarget, MemoryBanner, MemoryControl, MemoryField, MemoryForm};

/// Class a host adds to a form after its first rejected submission attempt.
pub const WAS_VALIDATED_CLASS: &str = "was-validated";
/// Class a host carries on a field while its invalid marker is set.
pub const INVALID_CLASS: &str = "is-invalid";
/// Accessibility attribute toggled together with the invalid marker.
pub const ARIA_INVALID_ATTR: &str = "aria-invalid";

#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct FieldId(pub u64);

#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct ControlId(pub u64);

#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct BannerId(pub u64);

/// Native constraint-validation verdict for one field. Computed by the host
/// rendering layer and consumed as-is; the guard never recomputes it.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum FieldValidity {
    Valid,
    Invalid { message: String },
}

impl Default for FieldValidity {
    fn default() -> Self {
        Self::Valid
    }
}

impl FieldValidity {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid {
            message: message.into(),
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Valid => None,
            Self::Invalid { message } => Some(message),
        }
    }
}

/// Surface a participating form exposes to its submission guard.
///
/// Reads report what the rendering layer already knows: field order as it
/// appears in the document, the disable-on-submit declaration, validity, and
/// label sources. Effects mutate what the user sees. `set_field_invalid`
/// covers both the visual marker ([`INVALID_CLASS`]) and the accessibility
/// attribute ([`ARIA_INVALID_ATTR`]); hosts apply the two together.
pub trait FormDom {
    fn disable_on_submit(&self) -> bool;
    fn fields(&self) -> Vec<FieldId>;
    fn submit_controls(&self) -> Vec<ControlId>;
    fn is_hidden(&self, field: FieldId) -> bool;
    fn validity(&self, field: FieldId) -> FieldValidity;
    fn label_sources(&self, field: FieldId) -> LabelSources;
    fn control_text(&self, control: ControlId) -> String;
    fn loading_text(&self, control: ControlId) -> Option<String>;

    fn set_was_validated(&mut self);
    fn set_field_invalid(&mut self, field: FieldId, invalid: bool);
    fn focus_field(&mut self, field: FieldId);
    fn set_control_disabled(&mut self, control: ControlId, disabled: bool);
    fn set_control_text(&mut self, control: ControlId, text: String);
    fn save_original_text(&mut self, control: ControlId, text: String);

    fn has_summary(&self) -> bool;
    fn show_summary(&mut self, content: &SummaryContent);
    fn hide_summary(&mut self);
    fn focus_summary(&mut self);
}

/// Handle to one notification banner. Owned by the scheduled dismissal task,
/// so implementations are cheap clones over shared state.
pub trait BannerDom: Send + 'static {
    fn auto_dismiss(&self) -> bool;
    fn begin_exit(&mut self, transition: MotionTransition);
    fn remove(&mut self);
}
