use std::time::Duration;

use futures::executor::block_on;

use formgate::prelude::*;

fn post_form() -> (MemoryForm, FieldId, FieldId) {
    let form = MemoryForm::new().with_summary();
    let caption = form.add_field(
        MemoryField::new()
            .sources(LabelSources::new().element_id("id_caption").name("caption"))
            .invalid("Please fill out this field."),
    );
    let location = form.add_field(MemoryField::new().sources(LabelSources::new().name("location")));
    (form, caption, location)
}

fn page_labels() -> LabelIndex {
    [("id_caption", "Caption"), ("id_status", "Status")]
        .into_iter()
        .collect()
}

#[test]
fn invalid_then_fixed_submission_round_trip() {
    let mut runtime = PageRuntime::new();
    let (mut form, caption, location) = post_form();
    let form_id = runtime.adopt_form(page_labels()).expect("adopt form");

    let decision = runtime.submit_event(form_id, &mut form).expect("submit");
    assert_eq!(
        decision,
        SubmitDecision::Suppress(SuppressReason::InvalidFields)
    );
    let content = form.summary_content().expect("summary rendered");
    assert_eq!(content.heading, SUMMARY_HEADING);
    assert_eq!(content.entries.len(), 1);
    assert_eq!(content.entries[0].label, "Caption");
    assert_eq!(content.entries[0].message, "Please fill out this field.");
    assert_eq!(form.focused(), Some(FocusTarget::Field(caption)));
    assert!(form.field_classes(location).is_empty());

    form.set_validity(caption, FieldValidity::Valid);
    runtime
        .input_event(form_id, &mut form, caption)
        .expect("input event");
    assert!(form.field_classes(caption).is_empty());

    let second = runtime
        .submit_event(form_id, &mut form)
        .expect("second submit");
    assert_eq!(second, SubmitDecision::Proceed);
    assert!(form.summary_hidden());
    assert_eq!(form.summary_content(), None);
}

#[test]
fn disable_on_submit_form_locks_for_the_page_lifetime() {
    let mut runtime = PageRuntime::new();
    let mut form = MemoryForm::new().disable_submit(true);
    form.add_field(MemoryField::new().sources(LabelSources::new().name("status")));
    let save = form.add_control(MemoryControl::new("Save").loading_text("Saving..."));
    let form_id = runtime.adopt_form(LabelIndex::new()).expect("adopt form");

    assert_eq!(
        runtime.submit_event(form_id, &mut form).expect("submit"),
        SubmitDecision::Proceed
    );
    assert!(form.is_disabled(save));
    assert_eq!(form.text_of(save), "Saving...");
    assert_eq!(form.original_text_of(save), Some("Save".to_string()));

    assert_eq!(
        runtime.submit_event(form_id, &mut form).expect("resubmit"),
        SubmitDecision::Suppress(SuppressReason::AlreadySubmitting)
    );
}

#[test]
fn each_adopted_form_gets_its_own_guard() {
    let mut runtime = PageRuntime::new();
    let first = runtime.adopt_form(LabelIndex::new()).expect("adopt first");
    let second = runtime.adopt_form(LabelIndex::new()).expect("adopt second");
    assert_ne!(first, second);
    assert_eq!(runtime.form_count(), 2);

    // Latching one form leaves the other untouched.
    let mut latching = MemoryForm::new().disable_submit(true);
    let mut open = MemoryForm::new();
    runtime.submit_event(first, &mut latching).expect("submit");
    assert!(runtime.guard(first).expect("guard").is_latched().expect("latch"));
    assert_eq!(
        runtime.submit_event(second, &mut open).expect("submit"),
        SubmitDecision::Proceed
    );
    assert!(!runtime.guard(second).expect("guard").is_latched().expect("latch"));
}

#[test]
fn unadopted_forms_stay_submittable_but_unguarded() {
    let runtime = PageRuntime::new();
    let mut form = MemoryForm::new();
    form.add_field(MemoryField::new().invalid("required"));

    let decision = runtime
        .submit_event(FormId(9_999), &mut form)
        .expect("submit");
    assert_eq!(decision, SubmitDecision::Proceed);
    assert!(form.form_classes().is_empty());
}

#[test]
fn banner_sweep_dismisses_only_opted_in_banners() {
    let schedule = DismissSchedule::new()
        .linger(Duration::from_millis(20))
        .exit(MotionTransition::new().duration_ms(10));
    let runtime = PageRuntime::new().with_dismiss_schedule(schedule);

    let saved = MemoryBanner::new(true);
    let sticky = MemoryBanner::new(false);
    let tasks = runtime.dismiss_banners(vec![saved.clone(), sticky.clone()]);
    assert_eq!(tasks.len(), 1);

    for task in tasks {
        block_on(task);
    }

    assert_eq!(saved.exit_transition(), Some(schedule.exit));
    assert!(saved.is_removed());
    assert!(!sticky.is_exiting());
    assert!(!sticky.is_removed());
}
