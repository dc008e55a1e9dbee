use portfolio_core::analysis::AnalysisRecord;

pub trait AnalysisResultStore {
    fn put_result(&self, record: &AnalysisRecord) -> Result<(), String>;
    fn get_result(&self, image_id: &str) -> Result<Option<AnalysisRecord>, String>;
}
