use serde_json::{json, Value};

use portfolio_core::analysis::{
    assess_face, face_count_issue, rejected_record, AnalysisRecord, BatchAnalysisResponse,
    ImageTarget, RecordOutcome, MIN_MODERATION_CONFIDENCE,
};
use portfolio_core::upload::AnalysisQueueMessage;

use crate::adapters::result_store::AnalysisResultStore;
use crate::adapters::vision::VisionAnalyzer;
use crate::logging::{event_preview, log_error, log_info};

const COMPONENT: &str = "image_analyzer";
const EVENT_PREVIEW_CHARS: usize = 1_000;

/// Processes a queue batch. Every record is attempted; failures are
/// reported per record and never abort the batch.
pub fn handle_analysis_event(
    event: &Value,
    vision: &impl VisionAnalyzer,
    results: &impl AnalysisResultStore,
) -> BatchAnalysisResponse {
    log_info(
        COMPONENT,
        "event_received",
        json!({ "event": event_preview(event, EVENT_PREVIEW_CHARS) }),
    );

    let records = event
        .get("Records")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    let mut outcomes = Vec::with_capacity(records.len());
    for record in records {
        let message_id = record
            .get("messageId")
            .and_then(Value::as_str)
            .map(str::to_string);

        match analyze_record(record, vision) {
            Ok(analysis) => match results.put_result(&analysis) {
                Ok(()) => {
                    log_info(
                        COMPONENT,
                        "result_written",
                        json!({
                            "image_id": analysis.image_id.clone(),
                            "status": analysis.status.as_str(),
                            "issues": analysis.issues.clone(),
                        }),
                    );
                    outcomes.push(RecordOutcome::ok(analysis.record_id));
                }
                Err(error) => {
                    log_error(
                        COMPONENT,
                        "result_write_failed",
                        json!({ "message_id": message_id.clone(), "error": error }),
                    );
                    outcomes.push(RecordOutcome::error(message_id));
                }
            },
            Err(error) => {
                log_error(
                    COMPONENT,
                    "record_failed",
                    json!({ "message_id": message_id.clone(), "error": error }),
                );
                outcomes.push(RecordOutcome::error(message_id));
            }
        }
    }

    BatchAnalysisResponse {
        processed: outcomes.len(),
        results: outcomes,
    }
}

fn analyze_record(record: &Value, vision: &impl VisionAnalyzer) -> Result<AnalysisRecord, String> {
    let message_id = record
        .get("messageId")
        .and_then(Value::as_str)
        .ok_or_else(|| "record is missing messageId".to_string())?;
    let body = record
        .get("body")
        .and_then(Value::as_str)
        .ok_or_else(|| "record body must be a string".to_string())?;
    let message: AnalysisQueueMessage = serde_json::from_str(body)
        .map_err(|error| format!("invalid analysis message: {error}"))?;
    let target = ImageTarget::from_s3_path(&message.s3_path).map_err(|error| error.to_string())?;

    let faces = vision.detect_faces(&target.bucket, &target.key)?;
    if let Some(issue) = face_count_issue(faces.len()) {
        return Ok(rejected_record(&target, message_id, issue));
    }

    let labels = vision.detect_moderation_labels(
        &target.bucket,
        &target.key,
        MIN_MODERATION_CONFIDENCE,
    )?;
    Ok(assess_face(&target, message_id, &faces[0], &labels))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use portfolio_core::analysis::{
        AnalysisStatus, BooleanAttribute, Emotion, FaceDetails, Pose,
    };

    use super::*;

    struct ScriptedVision {
        faces: HashMap<String, Vec<FaceDetails>>,
        labels: Vec<String>,
        moderation_calls: Mutex<usize>,
    }

    impl ScriptedVision {
        fn new() -> Self {
            Self {
                faces: HashMap::new(),
                labels: Vec::new(),
                moderation_calls: Mutex::new(0),
            }
        }

        fn with_faces(mut self, key: &str, faces: Vec<FaceDetails>) -> Self {
            self.faces.insert(key.to_string(), faces);
            self
        }
    }

    impl VisionAnalyzer for ScriptedVision {
        fn detect_faces(&self, _bucket: &str, key: &str) -> Result<Vec<FaceDetails>, String> {
            self.faces
                .get(key)
                .cloned()
                .ok_or_else(|| format!("InvalidS3ObjectException: {key}"))
        }

        fn detect_moderation_labels(
            &self,
            _bucket: &str,
            _key: &str,
            min_confidence: f32,
        ) -> Result<Vec<String>, String> {
            assert_eq!(min_confidence, 80.0);
            *self.moderation_calls.lock().expect("poisoned mutex") += 1;
            Ok(self.labels.clone())
        }
    }

    #[derive(Default)]
    struct MemoryResults {
        records: Mutex<HashMap<String, AnalysisRecord>>,
        reject_image: Option<&'static str>,
    }

    impl AnalysisResultStore for MemoryResults {
        fn put_result(&self, record: &AnalysisRecord) -> Result<(), String> {
            if self.reject_image == Some(record.image_id.as_str()) {
                return Err("ProvisionedThroughputExceededException".to_string());
            }
            self.records
                .lock()
                .expect("poisoned mutex")
                .insert(record.image_id.clone(), record.clone());
            Ok(())
        }

        fn get_result(&self, image_id: &str) -> Result<Option<AnalysisRecord>, String> {
            Ok(self
                .records
                .lock()
                .expect("poisoned mutex")
                .get(image_id)
                .cloned())
        }
    }

    fn good_face() -> FaceDetails {
        FaceDetails {
            confidence: Some(99.9),
            sharpness: Some(90.0),
            brightness: Some(80.0),
            smile: BooleanAttribute {
                value: Some(true),
                confidence: Some(95.0),
            },
            eyes_open: BooleanAttribute {
                value: Some(true),
                confidence: Some(96.0),
            },
            sunglasses: BooleanAttribute {
                value: Some(false),
                confidence: Some(99.0),
            },
            pose: Pose {
                yaw: Some(1.0),
                pitch: Some(2.0),
                roll: Some(3.0),
            },
            emotions: vec![Emotion {
                kind: "HAPPY".to_string(),
                confidence: 97.0,
            }],
        }
    }

    fn sqs_record(message_id: &str, s3_path: &str) -> Value {
        json!({
            "messageId": message_id,
            "eventSource": "aws:sqs",
            "body": json!({ "s3_path": s3_path }).to_string(),
        })
    }

    #[test]
    fn good_single_face_is_written_with_scores() {
        let vision = ScriptedVision::new().with_faces("uploads/me.jpg", vec![good_face()]);
        let results = MemoryResults::default();
        let event = json!({ "Records": [sqs_record("m-1", "s3://images/uploads/me.jpg")] });

        let response = handle_analysis_event(&event, &vision, &results);
        assert_eq!(response.processed, 1);
        assert_eq!(response.results, vec![RecordOutcome::ok("m-1")]);

        let stored = results
            .get_result("me.jpg")
            .expect("lookup succeeds")
            .expect("record exists");
        assert_eq!(stored.status, AnalysisStatus::Good);
        assert_eq!(stored.record_id, "m-1");
        assert_eq!(stored.scores.len(), 5);
    }

    #[test]
    fn face_count_issue_skips_moderation() {
        let vision = ScriptedVision::new()
            .with_faces("empty.jpg", Vec::new())
            .with_faces("group.jpg", vec![good_face(), good_face()]);
        let results = MemoryResults::default();
        let event = json!({ "Records": [
            sqs_record("m-1", "s3://images/empty.jpg"),
            sqs_record("m-2", "s3://images/group.jpg"),
        ]});

        let response = handle_analysis_event(&event, &vision, &results);
        assert_eq!(response.processed, 2);
        assert_eq!(*vision.moderation_calls.lock().expect("poisoned mutex"), 0);

        let empty = results.get_result("empty.jpg").expect("ok").expect("exists");
        assert_eq!(empty.issues, vec!["no_face".to_string()]);
        let group = results.get_result("group.jpg").expect("ok").expect("exists");
        assert_eq!(group.issues, vec!["multiple_faces".to_string()]);
        assert!(group.scores.is_empty());
    }

    #[test]
    fn moderation_labels_mark_image_bad() {
        let mut vision = ScriptedVision::new().with_faces("me.jpg", vec![good_face()]);
        vision.labels = vec!["Alcohol".to_string()];
        let results = MemoryResults::default();
        let event = json!({ "Records": [sqs_record("m-1", "s3://images/me.jpg")] });

        handle_analysis_event(&event, &vision, &results);
        let stored = results.get_result("me.jpg").expect("ok").expect("exists");
        assert_eq!(stored.status, AnalysisStatus::Bad);
        assert_eq!(stored.issues, vec!["moderation:Alcohol".to_string()]);
    }

    #[test]
    fn failing_record_does_not_abort_batch() {
        let vision = ScriptedVision::new().with_faces("ok.jpg", vec![good_face()]);
        let results = MemoryResults::default();
        let event = json!({ "Records": [
            {"messageId": "bad-body", "body": "not json"},
            sqs_record("wrong-scheme", "https://images/ok.jpg"),
            sqs_record("missing-object", "s3://images/missing.jpg"),
            sqs_record("m-ok", "s3://images/ok.jpg"),
        ]});

        let response = handle_analysis_event(&event, &vision, &results);
        assert_eq!(response.processed, 4);
        assert_eq!(
            response.results,
            vec![
                RecordOutcome::error(Some("bad-body".to_string())),
                RecordOutcome::error(Some("wrong-scheme".to_string())),
                RecordOutcome::error(Some("missing-object".to_string())),
                RecordOutcome::ok("m-ok"),
            ]
        );
    }

    #[test]
    fn event_without_records_processes_nothing() {
        let vision = ScriptedVision::new();
        let results = MemoryResults::default();
        let response = handle_analysis_event(&json!({}), &vision, &results);
        assert_eq!(response.processed, 0);
        assert!(response.results.is_empty());
    }

    #[test]
    fn result_write_failure_is_reported_and_batch_continues() {
        let vision = ScriptedVision::new()
            .with_faces("first.jpg", vec![good_face()])
            .with_faces("second.jpg", vec![good_face()]);
        let results = MemoryResults {
            reject_image: Some("first.jpg"),
            ..MemoryResults::default()
        };
        let event = json!({ "Records": [
            sqs_record("m-1", "s3://images/first.jpg"),
            sqs_record("m-2", "s3://images/second.jpg"),
        ]});

        let response = handle_analysis_event(&event, &vision, &results);
        assert_eq!(response.processed, 2);
        assert_eq!(
            serde_json::to_value(&response.results[0]).expect("outcome serializes"),
            json!({"id": "m-1", "write": "ERROR"})
        );
        assert_eq!(response.results[1], RecordOutcome::ok("m-2"));

        assert!(results.get_result("first.jpg").expect("ok").is_none());
        assert!(results.get_result("second.jpg").expect("ok").is_some());
    }
}
