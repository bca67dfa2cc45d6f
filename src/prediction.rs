use std::collections::BTreeMap;

/// A single value inside the service's free-form maps. The service mixes
/// numbers with the literal string `"NA"` (and occasionally numbers encoded
/// as strings), so both shapes are accepted.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum TestValue {
    Number(f64),
    Text(String),
}

impl TestValue {
    /// Numeric view of the value: `"NA"` and other non-numeric text map to
    /// `None`, numeric-looking strings are coerced.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            TestValue::Number(value) if value.is_finite() => Some(*value),
            TestValue::Number(_) => None,
            TestValue::Text(text) => {
                let trimmed = text.trim();
                if trimmed.eq_ignore_ascii_case("na") {
                    return None;
                }
                trimmed.parse::<f64>().ok().filter(|value| value.is_finite())
            }
        }
    }
}

/// Serde mirror of the prediction service's response. Every field is
/// optional: the formatter, not the deserializer, decides on fallbacks.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawPrediction {
    pub test_results: BTreeMap<String, TestValue>,
    pub confidence_score: Option<f64>,
    pub recommended_uses: Option<Vec<String>>,
    pub tensile_strength: Option<TestValue>,
    pub elongation: Option<TestValue>,
    pub hardness: Option<TestValue>,
    pub abrasion_resistance: Option<TestValue>,
    pub tear_strength: Option<TestValue>,
    pub density: Option<TestValue>,
    pub cure_time: Option<TestValue>,
    pub modulus100: BTreeMap<String, TestValue>,
    pub modulus200: BTreeMap<String, TestValue>,
    pub modulus300: BTreeMap<String, TestValue>,
    pub modulus50: Option<TestValue>,
    pub property_ranges: BTreeMap<String, BTreeMap<String, f64>>,
    pub material_impacts: BTreeMap<String, f64>,
}

/// One named test parameter with its numeric value, or `None` where the
/// service reported `"NA"`.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TestResultRow {
    pub name: String,
    pub value: Option<f64>,
}

/// Per-material contribution percentage attributed to the prediction.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ImpactRow {
    pub material: String,
    pub impact: f64,
}

/// Modulus readings across the four aging conditions reported by the
/// service for one elongation level.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ModulusSet {
    #[serde(rename = "unaged_15min")]
    pub unaged_15min: f64,
    #[serde(rename = "unaged_30min")]
    pub unaged_30min: f64,
    #[serde(rename = "aged_100C_48hrs")]
    pub aged_100c_48hrs: f64,
    #[serde(rename = "aged_70C_7days")]
    pub aged_70c_7days: f64,
}

/// Expected low/high band for one property, used as display context.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PropertyRange {
    pub low: f64,
    pub high: f64,
}

/// The display- and export-ready shape of one prediction. Produced whole by
/// [`format_prediction`] and replaced wholesale on every new prediction.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionReport {
    pub tensile_strength: f64,
    pub elongation: f64,
    pub hardness: f64,
    pub abrasion_resistance: f64,
    pub tear_strength: f64,
    pub density: f64,
    pub cure_time: f64,
    pub confidence_score: f64,
    pub recommended_uses: Vec<String>,
    pub test_results: Vec<TestResultRow>,
    pub material_impacts: Vec<ImpactRow>,
    pub modulus50: f64,
    pub modulus100: ModulusSet,
    pub modulus200: ModulusSet,
    pub modulus300: ModulusSet,
    pub property_ranges: BTreeMap<String, PropertyRange>,
}

pub const DEFAULT_CONFIDENCE_SCORE: f64 = 85.0;

pub fn default_recommended_uses() -> Vec<String> {
    ["Automotive Parts", "Industrial Seals", "Conveyor Belts"]
        .into_iter()
        .map(str::to_string)
        .collect()
}

fn default_property_ranges() -> BTreeMap<String, PropertyRange> {
    [
        ("tensileStrength", 15.0, 30.0),
        ("elongation", 300.0, 600.0),
        ("hardness", 50.0, 80.0),
        ("abrasionResistance", 0.1, 1.0),
        ("tearStrength", 40.0, 100.0),
    ]
    .into_iter()
    .map(|(name, low, high)| (name.to_string(), PropertyRange { low, high }))
    .collect()
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

fn scalar(value: &Option<TestValue>, default: f64, decimals: i32) -> f64 {
    round_to(
        value
            .as_ref()
            .and_then(TestValue::as_number)
            .unwrap_or(default),
        decimals,
    )
}

fn modulus_set(map: &BTreeMap<String, TestValue>) -> ModulusSet {
    let field = |key: &str| {
        map.get(key)
            .and_then(TestValue::as_number)
            .map(|value| round_to(value, 4))
            .unwrap_or(0.0)
    };

    ModulusSet {
        unaged_15min: field("unaged_15min"),
        unaged_30min: field("unaged_30min"),
        aged_100c_48hrs: field("aged_100C_48hrs"),
        aged_70c_7days: field("aged_70C_7days"),
    }
}

/// Normalizes a raw service payload into the stable display shape.
///
/// Total over any input: absent or `"NA"` fields fall back to defaults
/// (confidence 85.0, the standard recommended-uses trio, density 1.2,
/// everything else zero) instead of failing. Numeric strings are coerced
/// and rounded to fixed precision, and material impacts come out sorted
/// descending by impact.
pub fn format_prediction(raw: &RawPrediction) -> PredictionReport {
    let test_results = raw
        .test_results
        .iter()
        .map(|(name, value)| TestResultRow {
            name: name.clone(),
            value: value.as_number().map(|number| round_to(number, 4)),
        })
        .collect();

    let mut material_impacts: Vec<ImpactRow> = raw
        .material_impacts
        .iter()
        .map(|(material, impact)| ImpactRow {
            material: material.clone(),
            impact: round_to(*impact, 2),
        })
        .collect();
    material_impacts.sort_by(|left, right| {
        right
            .impact
            .total_cmp(&left.impact)
            .then_with(|| left.material.cmp(&right.material))
    });

    let property_ranges = if raw.property_ranges.is_empty() {
        default_property_ranges()
    } else {
        raw.property_ranges
            .iter()
            .map(|(name, band)| {
                (
                    name.clone(),
                    PropertyRange {
                        low: band.get("low").copied().unwrap_or(0.0),
                        high: band.get("high").copied().unwrap_or(0.0),
                    },
                )
            })
            .collect()
    };

    PredictionReport {
        tensile_strength: scalar(&raw.tensile_strength, 0.0, 2),
        elongation: scalar(&raw.elongation, 0.0, 2),
        hardness: scalar(&raw.hardness, 0.0, 2),
        abrasion_resistance: scalar(&raw.abrasion_resistance, 0.0, 2),
        tear_strength: scalar(&raw.tear_strength, 0.0, 2),
        density: scalar(&raw.density, 1.2, 3),
        cure_time: scalar(&raw.cure_time, 0.0, 1),
        confidence_score: round_to(
            raw.confidence_score
                .filter(|score| score.is_finite())
                .unwrap_or(DEFAULT_CONFIDENCE_SCORE),
            1,
        ),
        recommended_uses: raw
            .recommended_uses
            .clone()
            .filter(|uses| !uses.is_empty())
            .unwrap_or_else(default_recommended_uses),
        test_results,
        material_impacts,
        modulus50: scalar(&raw.modulus50, 0.0, 4),
        modulus100: modulus_set(&raw.modulus100),
        modulus200: modulus_set(&raw.modulus200),
        modulus300: modulus_set(&raw.modulus300),
        property_ranges,
    }
}
