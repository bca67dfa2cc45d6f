/// One material and its weighed-in amount, in the wire shape the prediction
/// service expects (`{"material": ..., "composition": ...}`).
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CompositionEntry {
    pub material: String,
    /// Amount in grams. Always a finite number once validated.
    pub composition: f64,
}

/// An insertion-ordered formulation. Entry order is preserved from the
/// selection screen through submission and export.
pub type Composition = Vec<CompositionEntry>;

/// One editable row of the composition screen: the chosen material plus the
/// raw text of its amount field, which may still be empty or non-numeric.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftEntry {
    pub material: String,
    pub amount: String,
}

/// The in-memory store the composition screen edits. Built either from the
/// materials chosen on the selection screen (amounts empty) or from a recipe
/// snapshot fetched from the service (amounts pre-filled), and discarded when
/// the wizard resets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompositionDraft {
    pub entries: Vec<DraftEntry>,
}

impl CompositionDraft {
    /// Starts a fresh draft with one empty-amount row per chosen material.
    pub fn from_materials(materials: Vec<String>) -> Self {
        Self {
            entries: materials
                .into_iter()
                .map(|material| DraftEntry {
                    material,
                    amount: String::new(),
                })
                .collect(),
        }
    }

    /// Pre-populates a draft from a fetched recipe composition.
    pub fn from_composition(composition: &[CompositionEntry]) -> Self {
        Self {
            entries: composition
                .iter()
                .map(|entry| DraftEntry {
                    material: entry.material.clone(),
                    amount: entry.composition.to_string(),
                })
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Keystroke mutation: replaces the raw text of one amount field.
    /// Out-of-range indices are ignored rather than panicking, since the UI
    /// may deliver a late event after the draft was rebuilt.
    pub fn set_amount(&mut self, index: usize, amount: impl Into<String>) {
        if let Some(entry) = self.entries.get_mut(index) {
            entry.amount = amount.into();
        }
    }

    /// Sum of the amounts that currently parse as numbers; unparsable fields
    /// count as zero so the running total can render while the user types.
    pub fn running_total(&self) -> f64 {
        self.entries
            .iter()
            .filter_map(|entry| entry.amount.trim().parse::<f64>().ok())
            .filter(|amount| amount.is_finite())
            .sum()
    }
}

pub fn total_weight(composition: &[CompositionEntry]) -> f64 {
    composition.iter().map(|entry| entry.composition).sum()
}

/// Rescales a composition so its amounts sum to 100. A zero-total input is
/// returned unchanged, matching the service-side convention.
pub fn normalize(composition: &[CompositionEntry]) -> Composition {
    let total = total_weight(composition);
    if total == 0.0 {
        return composition.to_vec();
    }

    composition
        .iter()
        .map(|entry| CompositionEntry {
            material: entry.material.clone(),
            composition: entry.composition / total * 100.0,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(material: &str, composition: f64) -> CompositionEntry {
        CompositionEntry {
            material: material.to_string(),
            composition,
        }
    }

    #[test]
    fn draft_from_materials_starts_empty() {
        let draft =
            CompositionDraft::from_materials(vec!["RSS III".to_string(), "TSR10".to_string()]);

        assert_eq!(draft.len(), 2);
        assert!(draft.entries.iter().all(|entry| entry.amount.is_empty()));
        assert_eq!(draft.entries[0].material, "RSS III");
    }

    #[test]
    fn draft_from_composition_prefills_amounts() {
        let draft = CompositionDraft::from_composition(&[entry("RSS III", 40.0), entry("N234", 25.5)]);

        assert_eq!(draft.entries[0].amount, "40");
        assert_eq!(draft.entries[1].amount, "25.5");
    }

    #[test]
    fn set_amount_ignores_out_of_range_index() {
        let mut draft = CompositionDraft::from_materials(vec!["RSS III".to_string()]);
        draft.set_amount(5, "10");
        assert_eq!(draft.entries[0].amount, "");
    }

    #[test]
    fn running_total_skips_unparsable_fields() {
        let mut draft = CompositionDraft::from_materials(vec![
            "RSS III".to_string(),
            "TSR10".to_string(),
            "N234".to_string(),
        ]);
        draft.set_amount(0, "40");
        draft.set_amount(1, "abc");
        draft.set_amount(2, " 25.5 ");

        assert!((draft.running_total() - 65.5).abs() < 1e-9);
    }

    #[test]
    fn total_weight_sums_entries() {
        let composition = vec![entry("A", 40.0), entry("B", 35.0), entry("C", 25.0)];
        assert!((total_weight(&composition) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn normalize_scales_to_one_hundred() {
        let composition = vec![entry("A", 20.0), entry("B", 60.0)];
        let normalized = normalize(&composition);

        assert!((normalized[0].composition - 25.0).abs() < 1e-9);
        assert!((normalized[1].composition - 75.0).abs() < 1e-9);
        assert_eq!(normalized[0].material, "A");
    }

    #[test]
    fn normalize_leaves_zero_total_untouched() {
        let composition = vec![entry("A", 0.0), entry("B", 0.0)];
        assert_eq!(normalize(&composition), composition);
    }

    #[test]
    fn entry_serializes_to_wire_shape() {
        let json = serde_json::to_string(&entry("RSS III", 40.0)).expect("entry should serialize");
        assert_eq!(json, r#"{"material":"RSS III","composition":40.0}"#);
    }

    #[test]
    fn entry_deserializes_integer_amounts() {
        let parsed: CompositionEntry =
            serde_json::from_str(r#"{"material":"N234","composition":25}"#)
                .expect("entry should parse");
        assert_eq!(parsed.composition, 25.0);
    }
}
