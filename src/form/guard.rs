use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::label::LabelIndex;
use super::summary::{self, MAX_SUMMARY_ENTRIES, SummaryContent};
use crate::host::{FieldId, FieldValidity, FormDom};

static FORM_ID_ALLOCATOR: AtomicU64 = AtomicU64::new(1);

#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct FormId(pub u64);

impl FormId {
    pub fn next() -> Self {
        Self(FORM_ID_ALLOCATOR.fetch_add(1, Ordering::SeqCst))
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum GuardState {
    Idle,
    Rejected,
    Accepted,
    Latched,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SuppressReason {
    InvalidFields,
    AlreadySubmitting,
}

/// What the host must do with the native submission it intercepted.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SubmitDecision {
    Proceed,
    Suppress(SuppressReason),
}

impl SubmitDecision {
    pub fn is_suppressed(&self) -> bool {
        matches!(self, Self::Suppress(_))
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct GuardOptions {
    pub focus_first_invalid: bool,
    pub summary_limit: usize,
}

impl Default for GuardOptions {
    fn default() -> Self {
        Self {
            focus_first_invalid: true,
            summary_limit: MAX_SUMMARY_ENTRIES,
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum GuardError {
    StatePoisoned(&'static str),
    InvalidStateTransition { from: GuardState, to: GuardState },
}

impl Display for GuardError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            GuardError::StatePoisoned(context) => {
                write!(f, "guard state lock poisoned while {context}")
            }
            GuardError::InvalidStateTransition { from, to } => {
                write!(f, "invalid guard state transition: {from:?} -> {to:?}")
            }
        }
    }
}

impl std::error::Error for GuardError {}

pub type GuardResult<T> = Result<T, GuardError>;

#[derive(Clone, Debug)]
pub struct GuardSnapshot {
    pub state: GuardState,
    pub submit_count: u32,
    pub marked_fields: Vec<FieldId>,
}

impl GuardSnapshot {
    pub fn is_latched(&self) -> bool {
        self.state == GuardState::Latched
    }
}

pub(super) struct GuardInner {
    pub(super) id: FormId,
    pub(super) state: GuardState,
    pub(super) submit_count: u32,
    pub(super) marked_fields: BTreeSet<FieldId>,
}

/// Submission guard for one participating form.
///
/// The latch is one-way: once a disable-on-submit form reaches
/// [`GuardState::Latched`] it stays there until the guard is dropped with the
/// page. Saved control text is written to the host and never read back.
#[derive(Clone)]
pub struct SubmitGuard {
    options: GuardOptions,
    labels: LabelIndex,
    inner: Arc<RwLock<GuardInner>>,
}

impl SubmitGuard {
    pub fn new(labels: LabelIndex, options: GuardOptions) -> Self {
        let id = FormId::next();
        #[cfg(feature = "tracing")]
        tracing::debug!(form = id.0, "submission guard attached");
        Self {
            options,
            labels,
            inner: Arc::new(RwLock::new(GuardInner {
                id,
                state: GuardState::Idle,
                submit_count: 0,
                marked_fields: BTreeSet::new(),
            })),
        }
    }

    pub fn form_id(&self) -> GuardResult<FormId> {
        Ok(read_lock(&self.inner, "reading form id")?.id)
    }

    pub fn is_latched(&self) -> GuardResult<bool> {
        Ok(read_lock(&self.inner, "reading latch")?.state == GuardState::Latched)
    }

    /// Classifies one submission attempt and applies its side effects. Runs
    /// to completion before the host acts on the returned decision, so
    /// suppression is always decided within the same event dispatch.
    pub fn handle_submit<D: FormDom>(&self, form: &mut D) -> GuardResult<SubmitDecision> {
        {
            let mut inner = write_lock(&self.inner, "recording submission attempt")?;
            inner.submit_count = inner.submit_count.saturating_add(1);
        }

        let invalid = probe_invalid(form);
        if !invalid.is_empty() {
            return self.reject(form, invalid);
        }

        if self.is_latched()? {
            #[cfg(feature = "tracing")]
            if let Ok(inner) = self.inner.read() {
                tracing::debug!(form = inner.id.0, "duplicate submission suppressed");
            }
            return Ok(SubmitDecision::Suppress(SuppressReason::AlreadySubmitting));
        }

        summary::clear(form);

        if form.disable_on_submit() {
            self.latch(form)?;
        } else {
            let mut inner = write_lock(&self.inner, "accepting submission")?;
            transition(&mut inner, GuardState::Accepted)?;
        }
        Ok(SubmitDecision::Proceed)
    }

    /// Per-field repair on value change: a field that probes valid loses its
    /// invalid marker. One-way; the summary stays as rendered until the next
    /// submission attempt.
    pub fn handle_input<D: FormDom>(&self, form: &mut D, field: FieldId) -> GuardResult<()> {
        if !form.validity(field).is_valid() {
            return Ok(());
        }
        form.set_field_invalid(field, false);
        let mut inner = write_lock(&self.inner, "repairing field marker")?;
        inner.marked_fields.remove(&field);
        Ok(())
    }

    pub fn snapshot(&self) -> GuardResult<GuardSnapshot> {
        let inner = read_lock(&self.inner, "creating guard snapshot")?;
        Ok(GuardSnapshot {
            state: inner.state,
            submit_count: inner.submit_count,
            marked_fields: inner.marked_fields.iter().copied().collect(),
        })
    }

    fn reject<D: FormDom>(
        &self,
        form: &mut D,
        invalid: Vec<(FieldId, String)>,
    ) -> GuardResult<SubmitDecision> {
        {
            let mut inner = write_lock(&self.inner, "rejecting submission")?;
            // A rejection never clears the latch; the markers and summary
            // are side effects, not a state exit.
            if inner.state != GuardState::Latched {
                transition(&mut inner, GuardState::Rejected)?;
            }
        }

        form.set_was_validated();

        let visible = invalid
            .into_iter()
            .filter(|(field, _)| !form.is_hidden(*field))
            .collect::<Vec<_>>();

        {
            let mut inner = write_lock(&self.inner, "marking invalid fields")?;
            for (field, _) in &visible {
                form.set_field_invalid(*field, true);
                inner.marked_fields.insert(*field);
            }
        }

        let content =
            SummaryContent::compose(form, &visible, &self.labels, self.options.summary_limit);
        summary::present(form, &content);

        if self.options.focus_first_invalid {
            if let Some((first, _)) = visible.first() {
                form.focus_field(*first);
            }
        }

        #[cfg(feature = "tracing")]
        if let Ok(inner) = self.inner.read() {
            tracing::debug!(
                form = inner.id.0,
                invalid = visible.len(),
                "submission rejected"
            );
        }

        Ok(SubmitDecision::Suppress(SuppressReason::InvalidFields))
    }

    fn latch<D: FormDom>(&self, form: &mut D) -> GuardResult<()> {
        {
            let mut inner = write_lock(&self.inner, "latching form")?;
            transition(&mut inner, GuardState::Accepted)?;
            transition(&mut inner, GuardState::Latched)?;
        }

        for control in form.submit_controls() {
            form.set_control_disabled(control, true);
            if let Some(loading) = form.loading_text(control) {
                let original = form.control_text(control);
                form.save_original_text(control, original);
                form.set_control_text(control, loading);
            }
        }

        #[cfg(feature = "tracing")]
        if let Ok(inner) = self.inner.read() {
            tracing::debug!(form = inner.id.0, "submit latch set");
        }
        Ok(())
    }
}

fn probe_invalid<D>(form: &D) -> Vec<(FieldId, String)>
where
    D: FormDom + ?Sized,
{
    form.fields()
        .into_iter()
        .filter_map(|field| match form.validity(field) {
            FieldValidity::Valid => None,
            FieldValidity::Invalid { message } => Some((field, message)),
        })
        .collect()
}

pub(super) fn transition(inner: &mut GuardInner, next: GuardState) -> GuardResult<()> {
    let current = inner.state;
    if current == next {
        return Ok(());
    }

    let allowed = matches!(
        (current, next),
        (GuardState::Idle, GuardState::Rejected)
            | (GuardState::Idle, GuardState::Accepted)
            | (GuardState::Rejected, GuardState::Accepted)
            | (GuardState::Accepted, GuardState::Rejected)
            | (GuardState::Accepted, GuardState::Latched)
    );
    if !allowed {
        return Err(GuardError::InvalidStateTransition {
            from: current,
            to: next,
        });
    }
    inner.state = next;
    Ok(())
}

pub(super) fn read_lock<'a, T>(
    lock: &'a RwLock<T>,
    context: &'static str,
) -> GuardResult<RwLockReadGuard<'a, T>> {
    lock.read().map_err(|_| GuardError::StatePoisoned(context))
}

pub(super) fn write_lock<'a, T>(
    lock: &'a RwLock<T>,
    context: &'static str,
) -> GuardResult<RwLockWriteGuard<'a, T>> {
    lock.write().map_err(|_| GuardError::StatePoisoned(context))
}
