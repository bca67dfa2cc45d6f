use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};

use crate::composition::{Composition, CompositionEntry, total_weight};
use crate::prediction::PredictionReport;

pub const JSON_REPORT_FILENAME: &str = "compound-prediction-report.json";
pub const XLSX_REPORT_FILENAME: &str = "compound-prediction-report.xlsx";

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("failed to encode report: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to build workbook: {0}")]
    Workbook(#[from] XlsxError),
}

/// The JSON report document: the submitted composition and the formatted
/// prediction under a caller-supplied ISO-8601 timestamp. Keeping the date
/// out of the exporter makes the output reproducible byte for byte.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SavedReport {
    pub date: String,
    pub materials: Composition,
    pub results: PredictionReport,
}

/// Pretty-printed JSON for the browser download.
///
/// # Errors
/// Returns [`ReportError::Json`] if encoding fails.
pub fn json_report(
    date: &str,
    materials: &[CompositionEntry],
    results: &PredictionReport,
) -> Result<String, ReportError> {
    let report = SavedReport {
        date: date.to_string(),
        materials: materials.to_vec(),
        results: results.clone(),
    };
    Ok(serde_json::to_string_pretty(&report)?)
}

/// Label/value rows for the `Summary` sheet.
pub fn summary_rows(
    date: &str,
    materials: &[CompositionEntry],
    report: &PredictionReport,
) -> Vec<(String, String)> {
    vec![
        ("Report Date".to_string(), date.to_string()),
        (
            "Total Weight (g)".to_string(),
            format!("{:.2}", total_weight(materials)),
        ),
        (
            "Tensile Strength (MPa)".to_string(),
            format!("{:.2}", report.tensile_strength),
        ),
        (
            "Elongation at Break (%)".to_string(),
            format!("{:.2}", report.elongation),
        ),
        (
            "Hardness (Shore A)".to_string(),
            format!("{:.2}", report.hardness),
        ),
        (
            "Abrasion Resistance (mm3)".to_string(),
            format!("{:.2}", report.abrasion_resistance),
        ),
        (
            "Tear Strength (kN/m)".to_string(),
            format!("{:.2}", report.tear_strength),
        ),
        (
            "Density (g/cm3)".to_string(),
            format!("{:.3}", report.density),
        ),
        (
            "Cure Time (min)".to_string(),
            format!("{:.1}", report.cure_time),
        ),
        (
            "Confidence Score (%)".to_string(),
            format!("{:.1}", report.confidence_score),
        ),
        (
            "Recommended Uses".to_string(),
            report.recommended_uses.join(", "),
        ),
    ]
}

/// Material/amount rows for the `Materials` sheet, in submission order.
pub fn materials_rows(materials: &[CompositionEntry]) -> Vec<(String, f64)> {
    materials
        .iter()
        .map(|entry| (entry.material.clone(), entry.composition))
        .collect()
}

/// Parameter/value rows for the `Test Results` sheet. `"NA"` readings
/// render as `N/A`.
pub fn test_result_rows(report: &PredictionReport) -> Vec<(String, String)> {
    report
        .test_results
        .iter()
        .map(|row| {
            let value = match row.value {
                Some(number) => format!("{number:.4}"),
                None => "N/A".to_string(),
            };
            (row.name.clone(), value)
        })
        .collect()
}

/// Material/impact rows for the `Material Impacts` sheet, already sorted
/// descending by the formatter.
pub fn impact_rows(report: &PredictionReport) -> Vec<(String, f64)> {
    report
        .material_impacts
        .iter()
        .map(|row| (row.material.clone(), row.impact))
        .collect()
}

/// Fixed rows for the `Modulus Data` sheet: one per elongation level, with
/// the four aging-condition readings. The 50% level carries a single unaged
/// reading, so its remaining cells stay blank.
pub fn modulus_rows(report: &PredictionReport) -> Vec<(String, [Option<f64>; 4])> {
    let set = |label: &str, values: &crate::prediction::ModulusSet| {
        (
            label.to_string(),
            [
                Some(values.unaged_15min),
                Some(values.unaged_30min),
                Some(values.aged_100c_48hrs),
                Some(values.aged_70c_7days),
            ],
        )
    };

    vec![
        (
            "50% Elongation".to_string(),
            [Some(report.modulus50), None, None, None],
        ),
        set("100% Elongation", &report.modulus100),
        set("200% Elongation", &report.modulus200),
        set("300% Elongation", &report.modulus300),
    ]
}

const MODULUS_HEADERS: [&str; 5] = [
    "Modulus (MPa)",
    "Unaged 160C 15 min",
    "Unaged 160C 30 min",
    "Aged 100C 48 hrs",
    "Aged 70C 7 days",
];

fn fit_column(worksheet: &mut Worksheet, col: u16, widths: &[usize]) -> Result<(), XlsxError> {
    let longest = widths.iter().copied().max().unwrap_or(0);
    worksheet.set_column_width(col, (longest.max(8) + 2) as f64)?;
    Ok(())
}

fn write_label_value_sheet(
    worksheet: &mut Worksheet,
    header: (&str, &str),
    rows: &[(String, String)],
    bold: &Format,
) -> Result<(), XlsxError> {
    worksheet.write_string_with_format(0, 0, header.0, bold)?;
    worksheet.write_string_with_format(0, 1, header.1, bold)?;
    for (index, (label, value)) in rows.iter().enumerate() {
        let row = index as u32 + 1;
        worksheet.write_string(row, 0, label.as_str())?;
        worksheet.write_string(row, 1, value.as_str())?;
    }

    let mut label_widths = vec![header.0.len()];
    label_widths.extend(rows.iter().map(|(label, _)| label.len()));
    fit_column(worksheet, 0, &label_widths)?;

    let mut value_widths = vec![header.1.len()];
    value_widths.extend(rows.iter().map(|(_, value)| value.len()));
    fit_column(worksheet, 1, &value_widths)
}

fn write_label_number_sheet(
    worksheet: &mut Worksheet,
    header: (&str, &str),
    rows: &[(String, f64)],
    bold: &Format,
) -> Result<(), XlsxError> {
    worksheet.write_string_with_format(0, 0, header.0, bold)?;
    worksheet.write_string_with_format(0, 1, header.1, bold)?;
    for (index, (label, value)) in rows.iter().enumerate() {
        let row = index as u32 + 1;
        worksheet.write_string(row, 0, label.as_str())?;
        worksheet.write_number(row, 1, *value)?;
    }

    let mut label_widths = vec![header.0.len()];
    label_widths.extend(rows.iter().map(|(label, _)| label.len()));
    fit_column(worksheet, 0, &label_widths)?;

    let mut value_widths = vec![header.1.len()];
    value_widths.extend(rows.iter().map(|(_, value)| format!("{value}").len()));
    fit_column(worksheet, 1, &value_widths)
}

fn build_workbook(
    date: &str,
    materials: &[CompositionEntry],
    report: &PredictionReport,
) -> Result<Workbook, ReportError> {
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();

    let summary = workbook.add_worksheet();
    summary.set_name("Summary")?;
    write_label_value_sheet(
        summary,
        ("Property", "Value"),
        &summary_rows(date, materials, report),
        &bold,
    )?;

    let materials_sheet = workbook.add_worksheet();
    materials_sheet.set_name("Materials")?;
    let mut material_rows = materials_rows(materials);
    material_rows.push(("Total".to_string(), total_weight(materials)));
    write_label_number_sheet(
        materials_sheet,
        ("Material", "Composition (g)"),
        &material_rows,
        &bold,
    )?;

    let results = test_result_rows(report);
    if !results.is_empty() {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Test Results")?;
        write_label_value_sheet(sheet, ("Parameter", "Value"), &results, &bold)?;
    }

    let impacts = impact_rows(report);
    if !impacts.is_empty() {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Material Impacts")?;
        write_label_number_sheet(sheet, ("Material", "Impact (%)"), &impacts, &bold)?;
    }

    let modulus_sheet = workbook.add_worksheet();
    modulus_sheet.set_name("Modulus Data")?;
    for (col, title) in MODULUS_HEADERS.iter().enumerate() {
        modulus_sheet.write_string_with_format(0, col as u16, *title, &bold)?;
    }
    let modulus = modulus_rows(report);
    for (index, (label, readings)) in modulus.iter().enumerate() {
        let row = index as u32 + 1;
        modulus_sheet.write_string(row, 0, label.as_str())?;
        for (offset, reading) in readings.iter().enumerate() {
            if let Some(value) = reading {
                modulus_sheet.write_number(row, offset as u16 + 1, *value)?;
            }
        }
    }
    let mut label_widths = vec![MODULUS_HEADERS[0].len()];
    label_widths.extend(modulus.iter().map(|(label, _)| label.len()));
    fit_column(modulus_sheet, 0, &label_widths)?;
    for col in 1..MODULUS_HEADERS.len() {
        let mut widths = vec![MODULUS_HEADERS[col].len()];
        widths.extend(modulus.iter().filter_map(|(_, readings)| {
            readings[col - 1].map(|value| format!("{value}").len())
        }));
        fit_column(modulus_sheet, col as u16, &widths)?;
    }

    Ok(workbook)
}

/// Builds the multi-sheet workbook in memory for the browser download.
///
/// # Errors
/// Returns [`ReportError::Workbook`] if any sheet fails to assemble.
pub fn workbook_bytes(
    date: &str,
    materials: &[CompositionEntry],
    report: &PredictionReport,
) -> Result<Vec<u8>, ReportError> {
    let mut workbook = build_workbook(date, materials, report)?;
    Ok(workbook.save_to_buffer()?)
}

/// Writes the workbook to a file path. Used by native tooling and tests;
/// the wasm app goes through [`workbook_bytes`] instead.
#[cfg(not(target_arch = "wasm32"))]
pub fn save_workbook(
    path: impl AsRef<std::path::Path>,
    date: &str,
    materials: &[CompositionEntry],
    report: &PredictionReport,
) -> Result<(), ReportError> {
    let mut workbook = build_workbook(date, materials, report)?;
    workbook.save(path.as_ref())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::mock_prediction;
    use crate::prediction::format_prediction;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn sample_composition() -> Composition {
        vec![
            CompositionEntry {
                material: "RSS III".to_string(),
                composition: 40.0,
            },
            CompositionEntry {
                material: "TSR10".to_string(),
                composition: 35.0,
            },
            CompositionEntry {
                material: "N234".to_string(),
                composition: 25.0,
            },
        ]
    }

    fn sample_report() -> PredictionReport {
        format_prediction(&mock_prediction(
            &mut StdRng::seed_from_u64(42),
            &sample_composition(),
        ))
    }

    #[test]
    fn json_report_round_trips_losslessly() {
        let composition = sample_composition();
        let report = sample_report();

        let json = json_report("2025-03-01T12:00:00.000Z", &composition, &report)
            .expect("report should encode");
        let decoded: SavedReport = serde_json::from_str(&json).expect("report should decode");

        assert_eq!(decoded.date, "2025-03-01T12:00:00.000Z");
        assert_eq!(decoded.materials, composition);
        assert_eq!(decoded.results, report);
    }

    #[test]
    fn identical_input_yields_identical_json() {
        let composition = sample_composition();
        let report = sample_report();

        let first = json_report("2025-03-01T12:00:00.000Z", &composition, &report)
            .expect("report should encode");
        let second = json_report("2025-03-01T12:00:00.000Z", &composition, &report)
            .expect("report should encode");

        assert_eq!(first, second);
    }

    #[test]
    fn summary_carries_date_and_headline_properties() {
        let rows = summary_rows("2025-03-01", &sample_composition(), &sample_report());

        assert_eq!(rows[0], ("Report Date".to_string(), "2025-03-01".to_string()));
        assert_eq!(rows[1].1, "100.00");
        assert!(rows.iter().any(|(label, _)| label == "Confidence Score (%)"));
        assert!(rows.iter().any(|(label, _)| label == "Recommended Uses"));
    }

    #[test]
    fn materials_rows_preserve_order() {
        let rows = materials_rows(&sample_composition());

        let labels: Vec<&str> = rows.iter().map(|(label, _)| label.as_str()).collect();
        assert_eq!(labels, vec!["RSS III", "TSR10", "N234"]);
        assert_eq!(rows[0].1, 40.0);
    }

    #[test]
    fn impact_rows_keep_descending_order() {
        let rows = impact_rows(&sample_report());

        for pair in rows.windows(2) {
            assert!(pair[0].1 >= pair[1].1);
        }
    }

    #[test]
    fn modulus_rows_cover_all_levels() {
        let rows = modulus_rows(&sample_report());

        let labels: Vec<&str> = rows.iter().map(|(label, _)| label.as_str()).collect();
        assert_eq!(
            labels,
            vec![
                "50% Elongation",
                "100% Elongation",
                "200% Elongation",
                "300% Elongation"
            ]
        );
        assert_eq!(rows[0].1[1], None);
    }

    #[test]
    fn na_test_values_render_as_not_available() {
        let mut report = sample_report();
        report.test_results = vec![
            crate::prediction::TestResultRow {
                name: "Rebound %".to_string(),
                value: None,
            },
            crate::prediction::TestResultRow {
                name: "Tensile strength MPa".to_string(),
                value: Some(22.5),
            },
        ];

        let rows = test_result_rows(&report);
        assert_eq!(rows[0].1, "N/A");
        assert_eq!(rows[1].1, "22.5000");
    }

    #[test]
    fn workbook_builds_in_memory() {
        let bytes = workbook_bytes("2025-03-01", &sample_composition(), &sample_report())
            .expect("workbook should build");

        // xlsx files are zip archives
        assert!(bytes.len() > 4);
        assert_eq!(&bytes[..2], b"PK");
    }

    #[test]
    fn workbook_saves_to_disk() {
        let dir = tempfile::tempdir().expect("temporary directory should be created");
        let path = dir.path().join(XLSX_REPORT_FILENAME);

        save_workbook(&path, "2025-03-01", &sample_composition(), &sample_report())
            .expect("workbook should save");

        let metadata = std::fs::metadata(&path).expect("file should exist");
        assert!(metadata.len() > 0);
    }
}
