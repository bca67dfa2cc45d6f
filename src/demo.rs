use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::composition::{Composition, CompositionEntry};
use crate::mock::mock_prediction;
use crate::prediction::{PredictionReport, format_prediction};

/// Seed for the sandbox page so it renders the same report on every load.
pub const DEMO_SEED: u64 = 42;

/// A small natural-rubber formulation used by the sandbox page and tests.
pub fn demo_composition() -> Composition {
    [
        ("RSS III", 40.0),
        ("N234", 35.0),
        ("Zinc Oxide - Indirect", 25.0),
    ]
    .into_iter()
    .map(|(material, composition)| CompositionEntry {
        material: material.to_string(),
        composition,
    })
    .collect()
}

/// A deterministic formatted prediction for the demo composition.
pub fn demo_report() -> PredictionReport {
    let mut rng = StdRng::seed_from_u64(DEMO_SEED);
    format_prediction(&mock_prediction(&mut rng, &demo_composition()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;

    #[test]
    fn demo_materials_come_from_the_catalog() {
        for entry in demo_composition() {
            assert!(catalog::is_known(&entry.material));
        }
    }

    #[test]
    fn demo_report_is_stable() {
        assert_eq!(demo_report(), demo_report());
    }

    #[test]
    fn demo_report_attributes_all_impacts() {
        let report = demo_report();
        assert_eq!(report.material_impacts.len(), demo_composition().len());

        let total: f64 = report
            .material_impacts
            .iter()
            .map(|row| row.impact)
            .sum();
        assert!((total - 100.0).abs() < 0.1);
    }
}
