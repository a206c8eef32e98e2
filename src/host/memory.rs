use std::collections::BTreeSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::{
    BannerDom, BannerId, ControlId, FieldId, FieldValidity, FormDom, INVALID_CLASS,
    WAS_VALIDATED_CLASS,
};
use crate::form::{LabelSources, SummaryContent};
use crate::motion::MotionTransition;

static BANNER_ID_ALLOCATOR: AtomicU64 = AtomicU64::new(1);

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FocusTarget {
    Summary,
    Field(FieldId),
}

/// Field description consumed by [`MemoryForm::add_field`]. Validity is
/// assigned, never computed, mirroring the injected-capability contract.
#[derive(Clone, Debug, Default)]
pub struct MemoryField {
    hidden: bool,
    validity: FieldValidity,
    sources: LabelSources,
}

impl MemoryField {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hidden(mut self, value: bool) -> Self {
        self.hidden = value;
        self
    }

    pub fn validity(mut self, value: FieldValidity) -> Self {
        self.validity = value;
        self
    }

    pub fn invalid(self, message: impl Into<String>) -> Self {
        self.validity(FieldValidity::invalid(message))
    }

    pub fn sources(mut self, value: LabelSources) -> Self {
        self.sources = value;
        self
    }
}

#[derive(Clone, Debug)]
pub struct MemoryControl {
    text: String,
    loading_text: Option<String>,
}

impl MemoryControl {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            loading_text: None,
        }
    }

    pub fn loading_text(mut self, value: impl Into<String>) -> Self {
        self.loading_text = Some(value.into());
        self
    }
}

struct FieldRecord {
    id: FieldId,
    hidden: bool,
    validity: FieldValidity,
    sources: LabelSources,
    classes: BTreeSet<String>,
    aria_invalid: bool,
}

struct ControlRecord {
    id: ControlId,
    text: String,
    loading_text: Option<String>,
    disabled: bool,
    original_text: Option<String>,
}

struct SummaryRecord {
    hidden: bool,
    focusable: bool,
    content: Option<SummaryContent>,
}

#[derive(Default)]
struct FormInner {
    disable_on_submit: bool,
    classes: BTreeSet<String>,
    fields: Vec<FieldRecord>,
    controls: Vec<ControlRecord>,
    summary: Option<SummaryRecord>,
    focus: Vec<FocusTarget>,
    next_id: u64,
}

impl Default for SummaryRecord {
    fn default() -> Self {
        Self {
            hidden: true,
            focusable: false,
            content: None,
        }
    }
}

/// Headless stand-in for a rendered form. Records every effect the guard
/// applies (classes, attributes, focus order, control state, summary state)
/// so behavior is observable without a rendering environment.
#[derive(Clone, Default)]
pub struct MemoryForm {
    state: Arc<RwLock<FormInner>>,
}

impl MemoryForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn disable_submit(self, value: bool) -> Self {
        self.write().disable_on_submit = value;
        self
    }

    pub fn with_summary(self) -> Self {
        self.write().summary = Some(SummaryRecord::default());
        self
    }

    pub fn add_field(&self, field: MemoryField) -> FieldId {
        let mut inner = self.write();
        inner.next_id += 1;
        let id = FieldId(inner.next_id);
        inner.fields.push(FieldRecord {
            id,
            hidden: field.hidden,
            validity: field.validity,
            sources: field.sources,
            classes: BTreeSet::new(),
            aria_invalid: false,
        });
        id
    }

    pub fn add_control(&self, control: MemoryControl) -> ControlId {
        let mut inner = self.write();
        inner.next_id += 1;
        let id = ControlId(inner.next_id);
        inner.controls.push(ControlRecord {
            id,
            text: control.text,
            loading_text: control.loading_text,
            disabled: false,
            original_text: None,
        });
        id
    }

    pub fn set_validity(&self, field: FieldId, validity: FieldValidity) {
        let mut inner = self.write();
        field_record_mut(&mut inner, field).validity = validity;
    }

    pub fn form_classes(&self) -> Vec<String> {
        self.read().classes.iter().cloned().collect()
    }

    pub fn field_classes(&self, field: FieldId) -> Vec<String> {
        field_record(&self.read(), field)
            .classes
            .iter()
            .cloned()
            .collect()
    }

    pub fn aria_invalid(&self, field: FieldId) -> bool {
        field_record(&self.read(), field).aria_invalid
    }

    pub fn is_disabled(&self, control: ControlId) -> bool {
        control_record(&self.read(), control).disabled
    }

    pub fn text_of(&self, control: ControlId) -> String {
        control_record(&self.read(), control).text.clone()
    }

    pub fn original_text_of(&self, control: ControlId) -> Option<String> {
        control_record(&self.read(), control).original_text.clone()
    }

    pub fn summary_content(&self) -> Option<SummaryContent> {
        self.read()
            .summary
            .as_ref()
            .and_then(|summary| summary.content.clone())
    }

    pub fn summary_hidden(&self) -> bool {
        self.read()
            .summary
            .as_ref()
            .is_none_or(|summary| summary.hidden)
    }

    pub fn summary_focusable(&self) -> bool {
        self.read()
            .summary
            .as_ref()
            .is_some_and(|summary| summary.focusable)
    }

    pub fn focus_history(&self) -> Vec<FocusTarget> {
        self.read().focus.clone()
    }

    pub fn focused(&self) -> Option<FocusTarget> {
        self.read().focus.last().copied()
    }

    fn read(&self) -> RwLockReadGuard<'_, FormInner> {
        match self.state.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn write(&self) -> RwLockWriteGuard<'_, FormInner> {
        match self.state.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

fn field_record<'a>(inner: &'a FormInner, field: FieldId) -> &'a FieldRecord {
    inner
        .fields
        .iter()
        .find(|record| record.id == field)
        .expect("unknown field id")
}

fn field_record_mut<'a>(inner: &'a mut FormInner, field: FieldId) -> &'a mut FieldRecord {
    inner
        .fields
        .iter_mut()
        .find(|record| record.id == field)
        .expect("unknown field id")
}

fn control_record<'a>(inner: &'a FormInner, control: ControlId) -> &'a ControlRecord {
    inner
        .controls
        .iter()
        .find(|record| record.id == control)
        .expect("unknown control id")
}

fn control_record_mut<'a>(inner: &'a mut FormInner, control: ControlId) -> &'a mut ControlRecord {
    inner
        .controls
        .iter_mut()
        .find(|record| record.id == control)
        .expect("unknown control id")
}

impl FormDom for MemoryForm {
    fn disable_on_submit(&self) -> bool {
        self.read().disable_on_submit
    }

    fn fields(&self) -> Vec<FieldId> {
        self.read().fields.iter().map(|record| record.id).collect()
    }

    fn submit_controls(&self) -> Vec<ControlId> {
        self.read().controls.iter().map(|record| record.id).collect()
    }

    fn is_hidden(&self, field: FieldId) -> bool {
        field_record(&self.read(), field).hidden
    }

    fn validity(&self, field: FieldId) -> FieldValidity {
        field_record(&self.read(), field).validity.clone()
    }

    fn label_sources(&self, field: FieldId) -> LabelSources {
        field_record(&self.read(), field).sources.clone()
    }

    fn control_text(&self, control: ControlId) -> String {
        control_record(&self.read(), control).text.clone()
    }

    fn loading_text(&self, control: ControlId) -> Option<String> {
        control_record(&self.read(), control).loading_text.clone()
    }

    fn set_was_validated(&mut self) {
        self.write().classes.insert(WAS_VALIDATED_CLASS.to_string());
    }

    fn set_field_invalid(&mut self, field: FieldId, invalid: bool) {
        let mut inner = self.write();
        let record = field_record_mut(&mut inner, field);
        if invalid {
            record.classes.insert(INVALID_CLASS.to_string());
            record.aria_invalid = true;
        } else {
            record.classes.remove(INVALID_CLASS);
            record.aria_invalid = false;
        }
    }

    fn focus_field(&mut self, field: FieldId) {
        let mut inner = self.write();
        // Focusing asserts the field exists before recording it.
        let id = field_record(&inner, field).id;
        inner.focus.push(FocusTarget::Field(id));
    }

    fn set_control_disabled(&mut self, control: ControlId, disabled: bool) {
        let mut inner = self.write();
        control_record_mut(&mut inner, control).disabled = disabled;
    }

    fn set_control_text(&mut self, control: ControlId, text: String) {
        let mut inner = self.write();
        control_record_mut(&mut inner, control).text = text;
    }

    fn save_original_text(&mut self, control: ControlId, text: String) {
        let mut inner = self.write();
        control_record_mut(&mut inner, control).original_text = Some(text);
    }

    fn has_summary(&self) -> bool {
        self.read().summary.is_some()
    }

    fn show_summary(&mut self, content: &SummaryContent) {
        let mut inner = self.write();
        if let Some(summary) = inner.summary.as_mut() {
            summary.content = Some(content.clone());
            summary.hidden = false;
            summary.focusable = true;
        }
    }

    fn hide_summary(&mut self) {
        let mut inner = self.write();
        if let Some(summary) = inner.summary.as_mut() {
            summary.hidden = true;
            summary.content = None;
        }
    }

    fn focus_summary(&mut self) {
        let mut inner = self.write();
        if inner.summary.is_some() {
            inner.focus.push(FocusTarget::Summary);
        }
    }
}

struct BannerInner {
    id: BannerId,
    auto_dismiss: bool,
    exit: Option<MotionTransition>,
    removed: bool,
}

/// Headless banner handle; clones share state so a test can observe the
/// dismissal task's effects.
#[derive(Clone)]
pub struct MemoryBanner {
    state: Arc<RwLock<BannerInner>>,
}

impl MemoryBanner {
    pub fn new(auto_dismiss: bool) -> Self {
        Self {
            state: Arc::new(RwLock::new(BannerInner {
                id: BannerId(BANNER_ID_ALLOCATOR.fetch_add(1, Ordering::SeqCst)),
                auto_dismiss,
                exit: None,
                removed: false,
            })),
        }
    }

    pub fn id(&self) -> BannerId {
        self.read().id
    }

    pub fn is_exiting(&self) -> bool {
        self.read().exit.is_some()
    }

    pub fn exit_transition(&self) -> Option<MotionTransition> {
        self.read().exit
    }

    pub fn is_removed(&self) -> bool {
        self.read().removed
    }

    fn read(&self) -> RwLockReadGuard<'_, BannerInner> {
        match self.state.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn write(&self) -> RwLockWriteGuard<'_, BannerInner> {
        match self.state.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl BannerDom for MemoryBanner {
    fn auto_dismiss(&self) -> bool {
        self.read().auto_dismiss
    }

    fn begin_exit(&mut self, transition: MotionTransition) {
        self.write().exit = Some(transition);
    }

    fn remove(&mut self) {
        self.write().removed = true;
    }
}
