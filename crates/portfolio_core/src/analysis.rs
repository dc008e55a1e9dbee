//! Profile-picture assessment.
//!
//! The vision service reports raw face attributes; this module turns them
//! into eight pass/fail quality checks, a `Good`/`Bad` status and the flat
//! record persisted per queue message.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub const MIN_FACE_CONFIDENCE: f64 = 95.0;
pub const MIN_SHARPNESS: f64 = 70.0;
pub const MIN_BRIGHTNESS: f64 = 50.0;
pub const MAX_POSE_DEGREES: f64 = 20.0;
pub const MIN_MODERATION_CONFIDENCE: f32 = 80.0;
pub const ACCEPTED_EMOTIONS: [&str; 2] = ["HAPPY", "CALM"];

pub const ISSUE_NO_FACE: &str = "no_face";
pub const ISSUE_MULTIPLE_FACES: &str = "multiple_faces";
pub const MODERATION_ISSUE_PREFIX: &str = "moderation:";

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BooleanAttribute {
    pub value: Option<bool>,
    pub confidence: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Pose {
    pub yaw: Option<f64>,
    pub pitch: Option<f64>,
    pub roll: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Emotion {
    pub kind: String,
    pub confidence: f64,
}

/// Vendor-neutral view of one detected face.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FaceDetails {
    pub confidence: Option<f64>,
    pub sharpness: Option<f64>,
    pub brightness: Option<f64>,
    pub smile: BooleanAttribute,
    pub eyes_open: BooleanAttribute,
    pub sunglasses: BooleanAttribute,
    pub pose: Pose,
    pub emotions: Vec<Emotion>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QualityChecks {
    pub face_confidence: bool,
    pub sharp_image: bool,
    pub well_lit: bool,
    pub smiling: bool,
    pub eyes_open: bool,
    pub no_sunglasses: bool,
    pub frontal_face: bool,
    pub emotion_ok: bool,
}

impl QualityChecks {
    pub fn as_pairs(&self) -> [(&'static str, bool); 8] {
        [
            ("face_confidence", self.face_confidence),
            ("sharp_image", self.sharp_image),
            ("well_lit", self.well_lit),
            ("smiling", self.smiling),
            ("eyes_open", self.eyes_open),
            ("no_sunglasses", self.no_sunglasses),
            ("frontal_face", self.frontal_face),
            ("emotion_ok", self.emotion_ok),
        ]
    }

    pub fn all_passed(&self) -> bool {
        self.as_pairs().iter().all(|(_, passed)| *passed)
    }

    pub fn failed(&self) -> Vec<&'static str> {
        self.as_pairs()
            .iter()
            .filter(|(_, passed)| !passed)
            .map(|(name, _)| *name)
            .collect()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum AnalysisStatus {
    Good,
    Bad,
}

impl AnalysisStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Good => "Good",
            Self::Bad => "Bad",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "Good" => Some(Self::Good),
            "Bad" => Some(Self::Bad),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalysisRecord {
    pub image_id: String,
    pub record_id: String,
    pub s3_path: String,
    pub status: AnalysisStatus,
    pub issues: Vec<String>,
    pub scores: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalysisResultResponse {
    pub ready: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<AnalysisRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecordOutcome {
    pub id: Option<String>,
    pub write: String,
}

impl RecordOutcome {
    pub fn ok(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            write: "OK".to_string(),
        }
    }

    pub fn error(id: Option<String>) -> Self {
        Self {
            id,
            write: "ERROR".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BatchAnalysisResponse {
    pub processed: usize,
    pub results: Vec<RecordOutcome>,
}

/// Object location parsed from an `s3://bucket/key` path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageTarget {
    pub s3_path: String,
    pub bucket: String,
    pub key: String,
    pub image_id: String,
}

impl ImageTarget {
    pub fn from_s3_path(s3_path: &str) -> Result<Self, AnalysisError> {
        let (bucket, key) = split_s3_uri(s3_path)?;
        let image_id = image_id_from_key(&key);
        if image_id.is_empty() {
            return Err(AnalysisError::new(format!(
                "S3 URI has no object name: {s3_path}"
            )));
        }
        Ok(Self {
            s3_path: s3_path.to_string(),
            bucket,
            key,
            image_id,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisError {
    message: String,
}

impl AnalysisError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for AnalysisError {}

pub fn split_s3_uri(uri: &str) -> Result<(String, String), AnalysisError> {
    let Some(rest) = uri.strip_prefix("s3://") else {
        return Err(AnalysisError::new(format!("Not s3:// URI: {uri}")));
    };

    let (bucket, key) = rest.split_once('/').unwrap_or((rest, ""));
    if bucket.is_empty() {
        return Err(AnalysisError::new(format!("S3 URI has no bucket: {uri}")));
    }
    Ok((bucket.to_string(), key.trim_start_matches('/').to_string()))
}

/// Last path segment of an object key; the result table is keyed by it.
pub fn image_id_from_key(key: &str) -> String {
    key.trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or_default()
        .to_string()
}

pub fn face_count_issue(face_count: usize) -> Option<&'static str> {
    match face_count {
        0 => Some(ISSUE_NO_FACE),
        1 => None,
        _ => Some(ISSUE_MULTIPLE_FACES),
    }
}

pub fn evaluate_checks(face: &FaceDetails) -> QualityChecks {
    let above = |value: Option<f64>, threshold: f64| value.is_some_and(|v| v > threshold);

    let frontal_face = match (face.pose.yaw, face.pose.pitch, face.pose.roll) {
        (Some(yaw), Some(pitch), Some(roll)) => {
            yaw.abs().max(pitch.abs()).max(roll.abs()) < MAX_POSE_DEGREES
        }
        _ => false,
    };

    QualityChecks {
        face_confidence: above(face.confidence, MIN_FACE_CONFIDENCE),
        sharp_image: above(face.sharpness, MIN_SHARPNESS),
        well_lit: above(face.brightness, MIN_BRIGHTNESS),
        smiling: face.smile.value.unwrap_or(false),
        eyes_open: face.eyes_open.value.unwrap_or(false),
        no_sunglasses: !face.sunglasses.value.unwrap_or(false),
        frontal_face,
        emotion_ok: dominant_emotion(&face.emotions)
            .is_some_and(|emotion| ACCEPTED_EMOTIONS.contains(&emotion.kind.as_str())),
    }
}

/// Highest-confidence emotion; the earliest entry wins ties.
pub fn dominant_emotion(emotions: &[Emotion]) -> Option<&Emotion> {
    let mut best: Option<&Emotion> = None;
    for emotion in emotions {
        match best {
            Some(current) if emotion.confidence <= current.confidence => {}
            _ => best = Some(emotion),
        }
    }
    best
}

pub fn rejected_record(target: &ImageTarget, record_id: &str, issue: &str) -> AnalysisRecord {
    AnalysisRecord {
        image_id: target.image_id.clone(),
        record_id: record_id.to_string(),
        s3_path: target.s3_path.clone(),
        status: AnalysisStatus::Bad,
        issues: vec![issue.to_string()],
        scores: BTreeMap::new(),
    }
}

pub fn assess_face(
    target: &ImageTarget,
    record_id: &str,
    face: &FaceDetails,
    moderation_labels: &[String],
) -> AnalysisRecord {
    let checks = evaluate_checks(face);
    let status = if checks.all_passed() && moderation_labels.is_empty() {
        AnalysisStatus::Good
    } else {
        AnalysisStatus::Bad
    };

    let mut issues: Vec<String> = checks.failed().into_iter().map(str::to_string).collect();
    issues.extend(
        moderation_labels
            .iter()
            .map(|label| format!("{MODERATION_ISSUE_PREFIX}{label}")),
    );

    AnalysisRecord {
        image_id: target.image_id.clone(),
        record_id: record_id.to_string(),
        s3_path: target.s3_path.clone(),
        status,
        issues,
        scores: face_scores(face),
    }
}

fn face_scores(face: &FaceDetails) -> BTreeMap<String, f64> {
    let score = |value: Option<f64>| round_score(value.unwrap_or(0.0));
    BTreeMap::from([
        ("face_confidence".to_string(), score(face.confidence)),
        ("sharpness".to_string(), score(face.sharpness)),
        ("brightness".to_string(), score(face.brightness)),
        ("smile".to_string(), score(face.smile.confidence)),
        ("eyes_open".to_string(), score(face.eyes_open.confidence)),
    ])
}

/// Two decimal places, ties to even.
pub fn round_score(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn passing_face() -> FaceDetails {
        FaceDetails {
            confidence: Some(99.914),
            sharpness: Some(83.3),
            brightness: Some(71.256),
            smile: BooleanAttribute {
                value: Some(true),
                confidence: Some(97.1),
            },
            eyes_open: BooleanAttribute {
                value: Some(true),
                confidence: Some(98.556),
            },
            sunglasses: BooleanAttribute {
                value: Some(false),
                confidence: Some(99.0),
            },
            pose: Pose {
                yaw: Some(-4.0),
                pitch: Some(6.5),
                roll: Some(1.0),
            },
            emotions: vec![
                Emotion {
                    kind: "HAPPY".to_string(),
                    confidence: 91.0,
                },
                Emotion {
                    kind: "SURPRISED".to_string(),
                    confidence: 3.0,
                },
            ],
        }
    }

    fn target() -> ImageTarget {
        ImageTarget::from_s3_path("s3://bucket/uploads/me.jpg").expect("valid path")
    }

    #[test]
    fn splits_s3_uri_into_bucket_and_key() {
        let (bucket, key) = split_s3_uri("s3://bucket/a/b.jpg").expect("valid uri");
        assert_eq!(bucket, "bucket");
        assert_eq!(key, "a/b.jpg");
    }

    #[test]
    fn rejects_non_s3_uri() {
        let error = split_s3_uri("https://bucket/a.jpg").expect_err("should fail");
        assert_eq!(error.message(), "Not s3:// URI: https://bucket/a.jpg");
    }

    #[test]
    fn image_target_uses_file_name_as_id() {
        let target = target();
        assert_eq!(target.image_id, "me.jpg");
        assert_eq!(target.key, "uploads/me.jpg");
        assert!(ImageTarget::from_s3_path("s3://bucket/").is_err());
    }

    #[test]
    fn face_count_issue_flags_zero_and_many() {
        assert_eq!(face_count_issue(0), Some(ISSUE_NO_FACE));
        assert_eq!(face_count_issue(1), None);
        assert_eq!(face_count_issue(3), Some(ISSUE_MULTIPLE_FACES));
    }

    #[test]
    fn passing_face_without_moderation_is_good() {
        let record = assess_face(&target(), "msg-1", &passing_face(), &[]);

        assert_eq!(record.status, AnalysisStatus::Good);
        assert!(record.issues.is_empty());
        assert_eq!(record.scores["face_confidence"], 99.91);
        assert_eq!(record.scores["brightness"], 71.26);
        assert_eq!(record.scores["eyes_open"], 98.56);
        assert_eq!(record.record_id, "msg-1");
    }

    #[test]
    fn moderation_label_alone_marks_image_bad() {
        let labels = vec!["Suggestive".to_string()];
        let record = assess_face(&target(), "msg-1", &passing_face(), &labels);

        assert_eq!(record.status, AnalysisStatus::Bad);
        assert_eq!(record.issues, vec!["moderation:Suggestive".to_string()]);
    }

    #[test]
    fn failed_checks_precede_moderation_issues_in_check_order() {
        let mut face = passing_face();
        face.sunglasses.value = Some(true);
        face.sharpness = Some(70.0);
        face.pose.roll = Some(-25.0);
        let labels = vec!["Violence".to_string()];

        let record = assess_face(&target(), "msg-2", &face, &labels);
        assert_eq!(
            record.issues,
            vec![
                "sharp_image".to_string(),
                "no_sunglasses".to_string(),
                "frontal_face".to_string(),
                "moderation:Violence".to_string(),
            ]
        );
    }

    #[test]
    fn missing_attributes_fail_their_checks() {
        let checks = evaluate_checks(&FaceDetails::default());
        assert_eq!(
            checks.failed(),
            vec![
                "face_confidence",
                "sharp_image",
                "well_lit",
                "smiling",
                "eyes_open",
                "frontal_face",
                "emotion_ok",
            ]
        );
        assert!(checks.no_sunglasses);
    }

    #[test]
    fn dominant_emotion_prefers_first_on_tie() {
        let emotions = vec![
            Emotion {
                kind: "CALM".to_string(),
                confidence: 40.0,
            },
            Emotion {
                kind: "ANGRY".to_string(),
                confidence: 40.0,
            },
        ];
        assert_eq!(
            dominant_emotion(&emotions).map(|e| e.kind.as_str()),
            Some("CALM")
        );
    }

    #[test]
    fn calm_face_passes_emotion_check() {
        let mut face = passing_face();
        face.emotions = vec![Emotion {
            kind: "CALM".to_string(),
            confidence: 80.0,
        }];
        assert!(evaluate_checks(&face).emotion_ok);
    }

    #[test]
    fn rejected_record_has_single_issue_and_no_scores() {
        let record = rejected_record(&target(), "msg-3", ISSUE_NO_FACE);
        assert_eq!(record.status, AnalysisStatus::Bad);
        assert_eq!(record.issues, vec!["no_face".to_string()]);
        assert!(record.scores.is_empty());
    }

    #[test]
    fn round_score_sends_exact_ties_to_even() {
        assert_eq!(round_score(99.125), 99.12);
        assert_eq!(round_score(0.375), 0.38);
        assert_eq!(round_score(98.556), 98.56);
        assert_eq!(round_score(0.0), 0.0);
    }
}
