// Application state for HTTP handlers
use crate::application::comparison_service::ComparisonService;
use crate::application::fact_sheet_service::FactSheetService;

#[derive(Clone)]
pub struct AppState {
    pub comparison_service: ComparisonService,
    pub fact_sheet_service: FactSheetService,
}
