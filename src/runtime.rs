use std::collections::BTreeMap;

use crate::feedback::{AutoDismiss, DismissFuture, DismissSchedule};
use crate::form::{
    FormId, GuardOptions, GuardResult, LabelIndex, SubmitDecision, SubmitGuard,
};
use crate::host::{BannerDom, FieldId, FormDom};

/// Page-level entry point, built once when the host's structural content is
/// ready. Adoption hands out the [`FormId`] the host routes events with, so
/// a form cannot end up with two guards.
pub struct PageRuntime {
    guard_options: GuardOptions,
    dismiss: AutoDismiss,
    guards: BTreeMap<FormId, SubmitGuard>,
}

impl Default for PageRuntime {
    fn default() -> Self {
        Self::new()
    }
}

impl PageRuntime {
    pub fn new() -> Self {
        Self {
            guard_options: GuardOptions::default(),
            dismiss: AutoDismiss::new(),
            guards: BTreeMap::new(),
        }
    }

    pub fn with_guard_options(mut self, options: GuardOptions) -> Self {
        self.guard_options = options;
        self
    }

    pub fn with_dismiss_schedule(mut self, schedule: DismissSchedule) -> Self {
        self.dismiss = AutoDismiss::with_schedule(schedule);
        self
    }

    pub fn adopt_form(&mut self, labels: LabelIndex) -> GuardResult<FormId> {
        let guard = SubmitGuard::new(labels, self.guard_options);
        let id = guard.form_id()?;
        self.guards.insert(id, guard);
        Ok(id)
    }

    pub fn guard(&self, form: FormId) -> Option<&SubmitGuard> {
        self.guards.get(&form)
    }

    pub fn form_count(&self) -> usize {
        self.guards.len()
    }

    /// Routes one submission attempt. A form the runtime never adopted is
    /// submittable but unguarded, the documented worst-case failure mode.
    pub fn submit_event<D: FormDom>(
        &self,
        form_id: FormId,
        form: &mut D,
    ) -> GuardResult<SubmitDecision> {
        match self.guards.get(&form_id) {
            Some(guard) => guard.handle_submit(form),
            None => Ok(SubmitDecision::Proceed),
        }
    }

    pub fn input_event<D: FormDom>(
        &self,
        form_id: FormId,
        form: &mut D,
        field: FieldId,
    ) -> GuardResult<()> {
        match self.guards.get(&form_id) {
            Some(guard) => guard.handle_input(form, field),
            None => Ok(()),
        }
    }

    /// One-time banner sweep; the returned tasks go to the host's event
    /// loop. Banners appearing later are not picked up.
    pub fn dismiss_banners<B, I>(&self, banners: I) -> Vec<DismissFuture>
    where
        B: BannerDom,
        I: IntoIterator<Item = B>,
    {
        self.dismiss.sweep(banners)
    }
}
