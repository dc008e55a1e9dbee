use portfolio_core::analysis::FaceDetails;

pub trait VisionAnalyzer {
    fn detect_faces(&self, bucket: &str, key: &str) -> Result<Vec<FaceDetails>, String>;
    fn detect_moderation_labels(
        &self,
        bucket: &str,
        key: &str,
        min_confidence: f32,
    ) -> Result<Vec<String>, String>;
}
