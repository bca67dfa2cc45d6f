use std::collections::HashSet;

use crate::composition::{Composition, CompositionDraft, CompositionEntry};

/// Threshold applied to composition amounts at submit time.
///
/// The source screens disagreed on whether an amount of exactly zero is
/// acceptable, so the choice is a named configuration rather than an
/// implicit one. `Positive` is the default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AmountRule {
    /// Every amount must be strictly greater than zero.
    #[default]
    Positive,
    /// Amounts of exactly zero are allowed; negatives are still rejected.
    NonNegative,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("select at least one material")]
    NoMaterials,
    #[error("material {slot} is not selected")]
    SlotUnset { slot: usize },
    #[error("duplicate material: {material}")]
    DuplicateMaterial { material: String },
    #[error("enter a composition for {material}")]
    AmountEmpty { material: String },
    #[error("composition for {material} is not a number: {value}")]
    AmountNotNumeric { material: String, value: String },
    #[error("composition for {material} must be greater than zero")]
    AmountNotPositive { material: String },
    #[error("composition for {material} must not be negative")]
    AmountNegative { material: String },
}

/// Returns the first material that appears more than once, if any.
pub fn find_duplicate<'a, I>(materials: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = HashSet::new();
    materials
        .into_iter()
        .find(|material| !seen.insert(*material))
}

/// Checks the picks made on the material selection screen before the wizard
/// may advance to the composition screen.
///
/// # Errors
/// * [`ValidationError::NoMaterials`] if the slot list is empty.
/// * [`ValidationError::SlotUnset`] for the first slot left unpicked
///   (1-based in the message, matching what the screen shows).
/// * [`ValidationError::DuplicateMaterial`] if two slots hold the same pick.
pub fn validate_selections(
    selections: &[Option<String>],
) -> Result<Vec<String>, ValidationError> {
    if selections.is_empty() {
        return Err(ValidationError::NoMaterials);
    }

    let mut picked = Vec::with_capacity(selections.len());
    for (index, selection) in selections.iter().enumerate() {
        match selection {
            Some(material) if !material.is_empty() => picked.push(material.clone()),
            _ => return Err(ValidationError::SlotUnset { slot: index + 1 }),
        }
    }

    if let Some(material) = find_duplicate(picked.iter().map(String::as_str)) {
        return Err(ValidationError::DuplicateMaterial {
            material: material.to_string(),
        });
    }

    Ok(picked)
}

/// Checks an edited draft before submission and converts it to the typed
/// composition sent to the prediction service, preserving draft order.
///
/// # Errors
/// * [`ValidationError::NoMaterials`] if the draft has no rows.
/// * [`ValidationError::AmountEmpty`] for the first blank amount field.
/// * [`ValidationError::AmountNotNumeric`] for the first field that does not
///   parse as a finite number.
/// * [`ValidationError::AmountNegative`] for negative amounts, and
///   [`ValidationError::AmountNotPositive`] for zero amounts under
///   [`AmountRule::Positive`].
/// * [`ValidationError::DuplicateMaterial`] if two rows share a material.
pub fn validate_draft(
    draft: &CompositionDraft,
    rule: AmountRule,
) -> Result<Composition, ValidationError> {
    if draft.is_empty() {
        return Err(ValidationError::NoMaterials);
    }

    if let Some(material) =
        find_duplicate(draft.entries.iter().map(|entry| entry.material.as_str()))
    {
        return Err(ValidationError::DuplicateMaterial {
            material: material.to_string(),
        });
    }

    let mut composition = Vec::with_capacity(draft.len());
    for entry in &draft.entries {
        let raw = entry.amount.trim();
        if raw.is_empty() {
            return Err(ValidationError::AmountEmpty {
                material: entry.material.clone(),
            });
        }

        let amount: f64 = raw.parse().map_err(|_| ValidationError::AmountNotNumeric {
            material: entry.material.clone(),
            value: entry.amount.clone(),
        })?;
        if !amount.is_finite() {
            return Err(ValidationError::AmountNotNumeric {
                material: entry.material.clone(),
                value: entry.amount.clone(),
            });
        }

        if amount < 0.0 {
            return Err(ValidationError::AmountNegative {
                material: entry.material.clone(),
            });
        }
        if rule == AmountRule::Positive && amount == 0.0 {
            return Err(ValidationError::AmountNotPositive {
                material: entry.material.clone(),
            });
        }

        composition.push(CompositionEntry {
            material: entry.material.clone(),
            composition: amount,
        });
    }

    Ok(composition)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(rows: &[(&str, &str)]) -> CompositionDraft {
        CompositionDraft {
            entries: rows
                .iter()
                .map(|(material, amount)| crate::composition::DraftEntry {
                    material: material.to_string(),
                    amount: amount.to_string(),
                })
                .collect(),
        }
    }

    #[test]
    fn accepts_complete_selection() {
        let picked = validate_selections(&[
            Some("RSS III".to_string()),
            Some("TSR10".to_string()),
            Some("N234".to_string()),
        ])
        .expect("complete selection should validate");

        assert_eq!(picked, vec!["RSS III", "TSR10", "N234"]);
    }

    #[test]
    fn rejects_empty_selection_list() {
        assert_eq!(
            validate_selections(&[]).expect_err("empty list should fail"),
            ValidationError::NoMaterials
        );
    }

    #[test]
    fn rejects_unset_slot_with_position() {
        let error = validate_selections(&[Some("RSS III".to_string()), None])
            .expect_err("unset slot should fail");

        assert_eq!(error, ValidationError::SlotUnset { slot: 2 });
        assert_eq!(error.to_string(), "material 2 is not selected");
    }

    #[test]
    fn rejects_duplicate_selection() {
        let error = validate_selections(&[
            Some("RSS III".to_string()),
            Some("RSS III".to_string()),
        ])
        .expect_err("duplicate should fail");

        assert_eq!(
            error,
            ValidationError::DuplicateMaterial {
                material: "RSS III".to_string()
            }
        );
    }

    #[test]
    fn accepts_distinct_positive_amounts_in_order() {
        let composition = validate_draft(
            &draft(&[("A", "40"), ("B", "35"), ("C", "25")]),
            AmountRule::Positive,
        )
        .expect("valid draft should convert");

        let materials: Vec<&str> = composition
            .iter()
            .map(|entry| entry.material.as_str())
            .collect();
        assert_eq!(materials, vec!["A", "B", "C"]);
        assert_eq!(composition[0].composition, 40.0);
        assert_eq!(composition[2].composition, 25.0);
    }

    #[test]
    fn rejects_empty_amount() {
        let error = validate_draft(&draft(&[("A", "40"), ("B", "  ")]), AmountRule::Positive)
            .expect_err("blank amount should fail");

        assert_eq!(
            error,
            ValidationError::AmountEmpty {
                material: "B".to_string()
            }
        );
    }

    #[test]
    fn rejects_non_numeric_amount() {
        let error = validate_draft(&draft(&[("A", "forty")]), AmountRule::Positive)
            .expect_err("text amount should fail");

        assert_eq!(
            error,
            ValidationError::AmountNotNumeric {
                material: "A".to_string(),
                value: "forty".to_string()
            }
        );
    }

    #[test]
    fn rejects_non_finite_amount() {
        let error = validate_draft(&draft(&[("A", "inf")]), AmountRule::Positive)
            .expect_err("non-finite amount should fail");

        assert!(matches!(error, ValidationError::AmountNotNumeric { .. }));
    }

    #[test]
    fn zero_amount_depends_on_rule() {
        let zero = draft(&[("A", "0")]);

        assert_eq!(
            validate_draft(&zero, AmountRule::Positive).expect_err("zero fails strict rule"),
            ValidationError::AmountNotPositive {
                material: "A".to_string()
            }
        );

        let composition =
            validate_draft(&zero, AmountRule::NonNegative).expect("zero passes lenient rule");
        assert_eq!(composition[0].composition, 0.0);
    }

    #[test]
    fn negative_amount_rejected_under_both_rules() {
        for rule in [AmountRule::Positive, AmountRule::NonNegative] {
            let error = validate_draft(&draft(&[("A", "-1")]), rule)
                .expect_err("negative amount should fail");
            assert_eq!(
                error,
                ValidationError::AmountNegative {
                    material: "A".to_string()
                }
            );
        }
    }

    #[test]
    fn duplicates_rejected_regardless_of_amounts() {
        let error = validate_draft(
            &draft(&[("A", "40"), ("A", "60")]),
            AmountRule::Positive,
        )
        .expect_err("duplicate should fail");

        assert_eq!(
            error,
            ValidationError::DuplicateMaterial {
                material: "A".to_string()
            }
        );
    }

    #[test]
    fn find_duplicate_reports_first_repeat() {
        assert_eq!(find_duplicate(["a", "b", "a", "b"]), Some("a"));
        assert_eq!(find_duplicate(["a", "b", "c"]), None);
    }
}
