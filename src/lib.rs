pub mod catalog;
pub mod composition;
pub mod demo;
pub mod gateway;
pub mod mock;
pub mod prediction;
pub mod report;
pub mod session;
pub mod validate;
pub mod wasm;

pub use catalog::{MATERIALS, SLOT_PRESETS, available_materials, is_known, materials, max_slots};
pub use composition::{
    Composition, CompositionDraft, CompositionEntry, DraftEntry, normalize, total_weight,
};
pub use demo::{DEMO_SEED, demo_composition, demo_report};
pub use gateway::{DEFAULT_BASE_URL, Gateway, GatewayError};
pub use mock::mock_prediction;
pub use prediction::{
    ImpactRow, ModulusSet, PredictionReport, PropertyRange, RawPrediction, TestResultRow,
    TestValue, format_prediction,
};
pub use report::{
    JSON_REPORT_FILENAME, ReportError, SavedReport, XLSX_REPORT_FILENAME, json_report,
    workbook_bytes,
};
pub use session::{Screen, Session};
pub use validate::{
    AmountRule, ValidationError, find_duplicate, validate_draft, validate_selections,
};
