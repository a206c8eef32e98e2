use std::collections::BTreeMap;

pub const FALLBACK_LABEL: &str = "This field";

/// Everything the host knows about naming one field. Empty strings count as
/// absent for every source except a label-index hit, which wins even when
/// its trimmed text is empty.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct LabelSources {
    pub override_label: Option<String>,
    pub element_id: Option<String>,
    pub aria_label: Option<String>,
    pub name: Option<String>,
}

impl LabelSources {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn override_label(mut self, value: impl Into<String>) -> Self {
        self.override_label = Some(value.into());
        self
    }

    pub fn element_id(mut self, value: impl Into<String>) -> Self {
        self.element_id = Some(value.into());
        self
    }

    pub fn aria_label(mut self, value: impl Into<String>) -> Self {
        self.aria_label = Some(value.into());
        self
    }

    pub fn name(mut self, value: impl Into<String>) -> Self {
        self.name = Some(value.into());
        self
    }
}

/// Prebuilt target-id to label-text mapping, assembled once by the host
/// instead of scanning every label element per lookup.
#[derive(Clone, Debug, Default)]
pub struct LabelIndex {
    by_target: BTreeMap<String, String>,
}

impl LabelIndex {
    pub fn new() -> Self {
        Self::default()
    }

    // The first label registered for a target wins, matching document order.
    pub fn insert(&mut self, target: impl Into<String>, text: impl Into<String>) {
        self.by_target.entry(target.into()).or_insert_with(|| text.into());
    }

    pub fn label_for(&self, target: &str) -> Option<&str> {
        self.by_target.get(target).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.by_target.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_target.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for LabelIndex
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut index = Self::new();
        for (target, text) in iter {
            index.insert(target, text);
        }
        index
    }
}

/// Derives the display name for a field, trying each source in strict
/// priority order and stopping at the first success.
pub fn resolve_label(sources: &LabelSources, index: &LabelIndex) -> String {
    if let Some(label) = non_empty(&sources.override_label) {
        return label.to_string();
    }

    if let Some(id) = non_empty(&sources.element_id) {
        if let Some(text) = index.label_for(id) {
            return text.trim().to_string();
        }
    }

    if let Some(label) = non_empty(&sources.aria_label) {
        return label.to_string();
    }

    if let Some(name) = non_empty(&sources.name) {
        return name.replace('_', " ");
    }

    FALLBACK_LABEL.to_string()
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn override_label_wins_over_everything() {
        let mut index = LabelIndex::new();
        index.insert("pet-name", "Pet name");
        let sources = LabelSources::new()
            .override_label("Your pet")
            .element_id("pet-name")
            .aria_label("Pet")
            .name("pet_name");
        assert_eq!(resolve_label(&sources, &index), "Your pet");
    }

    #[test]
    fn label_index_hit_is_trimmed() {
        let mut index = LabelIndex::new();
        index.insert("caption", "  Caption  \n");
        let sources = LabelSources::new().element_id("caption").name("caption");
        assert_eq!(resolve_label(&sources, &index), "Caption");
    }

    #[test]
    fn empty_override_falls_through_to_index() {
        let mut index = LabelIndex::new();
        index.insert("status", "Status");
        let sources = LabelSources::new().override_label("").element_id("status");
        assert_eq!(resolve_label(&sources, &index), "Status");
    }

    #[test]
    fn index_entry_with_blank_text_still_wins() {
        let mut index = LabelIndex::new();
        index.insert("location", "   ");
        let sources = LabelSources::new()
            .element_id("location")
            .aria_label("Location")
            .name("location");
        assert_eq!(resolve_label(&sources, &index), "");
    }

    #[test]
    fn aria_label_beats_name() {
        let sources = LabelSources::new()
            .aria_label("Rescued date")
            .name("rescued_date");
        assert_eq!(resolve_label(&sources, &LabelIndex::new()), "Rescued date");
    }

    #[test]
    fn name_replaces_every_underscore() {
        let sources = LabelSources::new().name("pet_name");
        assert_eq!(resolve_label(&sources, &LabelIndex::new()), "pet name");
    }

    #[test]
    fn no_sources_resolves_to_fallback() {
        assert_eq!(
            resolve_label(&LabelSources::new(), &LabelIndex::new()),
            FALLBACK_LABEL
        );
    }

    #[test]
    fn first_registered_label_wins_per_target() {
        let mut index = LabelIndex::new();
        index.insert("claim-days", "Claim days");
        index.insert("claim-days", "Days to claim");
        assert_eq!(index.label_for("claim-days"), Some("Claim days"));
    }

    proptest! {
        #[test]
        fn resolved_name_never_contains_underscores(name in "[a-z]{1,8}(_[a-z]{1,8}){0,4}") {
            let sources = LabelSources::new().name(name);
            let resolved = resolve_label(&sources, &LabelIndex::new());
            prop_assert!(!resolved.contains('_'));
            prop_assert_eq!(resolved.matches(' ').count(), sources.name.as_deref().unwrap_or_default().matches('_').count());
        }

        #[test]
        fn resolution_always_returns_a_label(
            override_label in proptest::option::of(".{0,12}"),
            aria in proptest::option::of(".{0,12}"),
            name in proptest::option::of("[a-z_]{0,12}"),
        ) {
            let mut sources = LabelSources::new();
            sources.override_label = override_label;
            sources.aria_label = aria;
            sources.name = name;
            // Without an index hit the chain can only yield a filtered
            // non-empty source or the fallback.
            let resolved = resolve_label(&sources, &LabelIndex::new());
            prop_assert!(!resolved.is_empty());
        }
    }
}
