use rand::Rng;
use std::collections::BTreeMap;

use crate::composition::{CompositionEntry, total_weight};
use crate::prediction::{RawPrediction, TestValue};

/// Draws a plausible service payload without any network round trip.
///
/// The caller supplies the random number generator, so a seeded `StdRng`
/// makes the output deterministic for tests and for the sandbox page.
/// Property ranges match the real service's typical output bands; material
/// impacts are attributed proportionally to each entry's share of the total
/// weight.
pub fn mock_prediction<R: Rng + ?Sized>(
    rng: &mut R,
    composition: &[CompositionEntry],
) -> RawPrediction {
    let total = total_weight(composition);

    let material_impacts: BTreeMap<String, f64> = composition
        .iter()
        .map(|entry| {
            let share = if total > 0.0 {
                entry.composition * 100.0 / total
            } else {
                0.0
            };
            (entry.material.clone(), share)
        })
        .collect();

    RawPrediction {
        tensile_strength: Some(TestValue::Number(rng.gen_range(10.0..30.0))),
        elongation: Some(TestValue::Number(rng.gen_range(300.0..800.0))),
        hardness: Some(TestValue::Number(rng.gen_range(50.0_f64..80.0_f64).floor())),
        abrasion_resistance: Some(TestValue::Number(rng.gen_range(50.0..200.0))),
        tear_strength: Some(TestValue::Number(rng.gen_range(20.0..60.0))),
        density: Some(TestValue::Number(rng.gen_range(1.0..1.5))),
        cure_time: Some(TestValue::Number(rng.gen_range(5.0..15.0))),
        confidence_score: Some(rng.gen_range(80.0..100.0)),
        recommended_uses: Some(
            [
                "Automotive Parts",
                "Industrial Seals",
                "Conveyor Belts",
                "Hoses",
                "Gaskets",
            ]
            .into_iter()
            .map(str::to_string)
            .collect(),
        ),
        material_impacts,
        ..RawPrediction::default()
    }
}
