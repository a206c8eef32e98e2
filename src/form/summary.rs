use super::label::{LabelIndex, resolve_label};
use crate::host::{FieldId, FormDom};

pub const SUMMARY_HEADING: &str = "Please review the highlighted fields before submitting.";

// Fields beyond this count are still validated and marked, just not listed.
pub const MAX_SUMMARY_ENTRIES: usize = 6;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SummaryEntry {
    pub label: String,
    pub message: String,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SummaryContent {
    pub heading: String,
    pub entries: Vec<SummaryEntry>,
}

impl SummaryContent {
    /// Pairs each retained field's resolved label with the validation
    /// message the host reported for it, in document order.
    pub fn compose<D>(
        form: &D,
        invalid_fields: &[(FieldId, String)],
        labels: &LabelIndex,
        limit: usize,
    ) -> Self
    where
        D: FormDom + ?Sized,
    {
        let entries = invalid_fields
            .iter()
            .take(limit)
            .map(|(field, message)| SummaryEntry {
                label: resolve_label(&form.label_sources(*field), labels),
                message: message.clone(),
            })
            .collect();
        Self {
            heading: SUMMARY_HEADING.to_string(),
            entries,
        }
    }
}

pub(super) fn present<D>(form: &mut D, content: &SummaryContent)
where
    D: FormDom + ?Sized,
{
    if !form.has_summary() {
        return;
    }
    form.show_summary(content);
    form.focus_summary();
}

pub(super) fn clear<D>(form: &mut D)
where
    D: FormDom + ?Sized,
{
    if !form.has_summary() {
        return;
    }
    form.hide_summary();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::LabelSources;
    use crate::host::{FieldValidity, MemoryField, MemoryForm};

    #[test]
    fn compose_pairs_resolved_labels_with_messages() {
        let form = MemoryForm::new();
        let caption = form.add_field(
            MemoryField::new()
                .sources(LabelSources::new().name("caption"))
                .validity(FieldValidity::invalid("Please fill out this field.")),
        );

        let content = SummaryContent::compose(
            &form,
            &[(caption, "Please fill out this field.".to_string())],
            &LabelIndex::new(),
            MAX_SUMMARY_ENTRIES,
        );

        assert_eq!(content.heading, SUMMARY_HEADING);
        assert_eq!(
            content.entries,
            vec![SummaryEntry {
                label: "caption".to_string(),
                message: "Please fill out this field.".to_string(),
            }]
        );
    }

    #[test]
    fn compose_truncates_to_the_entry_limit() {
        let form = MemoryForm::new();
        let invalid = (0..9)
            .map(|index| {
                let field = form.add_field(
                    MemoryField::new()
                        .sources(LabelSources::new().name(format!("field_{index}")))
                        .validity(FieldValidity::invalid("required")),
                );
                (field, "required".to_string())
            })
            .collect::<Vec<_>>();

        let content =
            SummaryContent::compose(&form, &invalid, &LabelIndex::new(), MAX_SUMMARY_ENTRIES);
        assert_eq!(content.entries.len(), MAX_SUMMARY_ENTRIES);
        assert_eq!(content.entries[0].label, "field 0");
        assert_eq!(content.entries[5].label, "field 5");
    }
}
