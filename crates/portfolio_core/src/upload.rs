use std::collections::BTreeMap;
use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

pub const FILE_NAME_HEADER: &str = "x-file-name";
pub const CONTENT_TYPE_HEADER: &str = "content-type";
pub const DEFAULT_BINARY_CONTENT_TYPE: &str = "image/jpeg";
pub const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// JSON upload payload: the image travels as a base64 string.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct JsonUploadRequest {
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub file_content: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Queue message pointing the analysis step at an uploaded object.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AnalysisQueueMessage {
    pub s3_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UploadAcceptedResponse {
    pub message: String,
    pub s3_path: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadError {
    MalformedJson(String),
    MissingFileContent,
    InvalidBase64,
    InvalidBinaryBody,
    EmptyPayload,
}

impl UploadError {
    pub fn message(&self) -> String {
        match self {
            Self::MalformedJson(detail) => format!("Malformed JSON body: {detail}"),
            Self::MissingFileContent => "file_content is required".to_string(),
            Self::InvalidBase64 => "file_content must be valid base-64".to_string(),
            Self::InvalidBinaryBody => "binary body must be valid base-64".to_string(),
            Self::EmptyPayload => "uploaded file is empty".to_string(),
        }
    }
}

impl std::fmt::Display for UploadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message())
    }
}

impl std::error::Error for UploadError {}

/// Decodes an upload body. `headers` must use lowercase keys.
pub fn decode_upload(
    body: Option<&str>,
    is_base64_encoded: bool,
    headers: &BTreeMap<String, String>,
) -> Result<DecodedUpload, UploadError> {
    if is_base64_encoded {
        let bytes = STANDARD
            .decode(body.unwrap_or_default())
            .map_err(|_| UploadError::InvalidBinaryBody)?;
        if bytes.is_empty() {
            return Err(UploadError::EmptyPayload);
        }
        let file_name =
            non_empty_header(headers, FILE_NAME_HEADER).unwrap_or_else(generated_file_name);
        let content_type = non_empty_header(headers, CONTENT_TYPE_HEADER)
            .unwrap_or_else(|| DEFAULT_BINARY_CONTENT_TYPE.to_string());
        return Ok(DecodedUpload {
            file_name,
            content_type,
            bytes,
        });
    }

    let raw = match body {
        Some(text) if !text.is_empty() => text,
        _ => "{}",
    };
    let request: JsonUploadRequest =
        serde_json::from_str(raw).map_err(|error| UploadError::MalformedJson(error.to_string()))?;

    let file_name = request
        .file_name
        .filter(|name| !name.is_empty())
        .unwrap_or_else(generated_file_name);
    let content = request.file_content.ok_or(UploadError::MissingFileContent)?;
    let bytes = STANDARD
        .decode(content.as_bytes())
        .map_err(|_| UploadError::InvalidBase64)?;
    if bytes.is_empty() {
        return Err(UploadError::EmptyPayload);
    }
    let content_type = guess_content_type(&file_name)
        .unwrap_or(FALLBACK_CONTENT_TYPE)
        .to_string();

    Ok(DecodedUpload {
        file_name,
        content_type,
        bytes,
    })
}

pub fn guess_content_type(file_name: &str) -> Option<&'static str> {
    let extension = Path::new(file_name)
        .extension()?
        .to_str()?
        .to_ascii_lowercase();
    let content_type = match extension.as_str() {
        "jpg" | "jpeg" | "jpe" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "tif" | "tiff" => "image/tiff",
        "heic" => "image/heic",
        "svg" => "image/svg+xml",
        _ => return None,
    };
    Some(content_type)
}

pub fn generated_file_name() -> String {
    format!("{}.jpg", uuid::Uuid::new_v4())
}

pub fn s3_uri(bucket: &str, key: &str) -> String {
    format!("s3://{bucket}/{key}")
}

fn non_empty_header(headers: &BTreeMap<String, String>, name: &str) -> Option<String> {
    headers
        .get(name)
        .filter(|value| !value.is_empty())
        .cloned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_upload_uses_supplied_name_and_guessed_type() {
        let body = r#"{"file_name":"me.png","file_content":"aGVsbG8="}"#;
        let upload = decode_upload(Some(body), false, &BTreeMap::new()).expect("upload decodes");

        assert_eq!(upload.file_name, "me.png");
        assert_eq!(upload.content_type, "image/png");
        assert_eq!(upload.bytes, b"hello");
    }

    #[test]
    fn json_upload_generates_jpg_name_when_missing() {
        let body = r#"{"file_content":"aGVsbG8="}"#;
        let upload = decode_upload(Some(body), false, &BTreeMap::new()).expect("upload decodes");

        assert!(upload.file_name.ends_with(".jpg"));
        assert_eq!(upload.file_name.len(), 36 + 4);
        assert_eq!(upload.content_type, "image/jpeg");
    }

    #[test]
    fn json_upload_unknown_extension_falls_back_to_octet_stream() {
        let body = r#"{"file_name":"blob.xyz","file_content":"aGVsbG8="}"#;
        let upload = decode_upload(Some(body), false, &BTreeMap::new()).expect("upload decodes");
        assert_eq!(upload.content_type, FALLBACK_CONTENT_TYPE);
    }

    #[test]
    fn json_upload_rejects_invalid_base64() {
        let body = r#"{"file_name":"me.png","file_content":"not base64!"}"#;
        let error = decode_upload(Some(body), false, &BTreeMap::new()).expect_err("should fail");
        assert_eq!(error, UploadError::InvalidBase64);
        assert_eq!(error.message(), "file_content must be valid base-64");
    }

    #[test]
    fn empty_json_body_reports_missing_content() {
        let error = decode_upload(None, false, &BTreeMap::new()).expect_err("should fail");
        assert_eq!(error, UploadError::MissingFileContent);
    }

    #[test]
    fn binary_upload_reads_name_and_type_from_headers() {
        let headers = BTreeMap::from([
            (FILE_NAME_HEADER.to_string(), "portrait.webp".to_string()),
            (CONTENT_TYPE_HEADER.to_string(), "image/webp".to_string()),
        ]);
        let upload = decode_upload(Some("aGVsbG8="), true, &headers).expect("upload decodes");

        assert_eq!(upload.file_name, "portrait.webp");
        assert_eq!(upload.content_type, "image/webp");
        assert_eq!(upload.bytes, b"hello");
    }

    #[test]
    fn binary_upload_defaults_to_jpeg() {
        let upload = decode_upload(Some("aGVsbG8="), true, &BTreeMap::new()).expect("decodes");
        assert_eq!(upload.content_type, DEFAULT_BINARY_CONTENT_TYPE);
        assert!(upload.file_name.ends_with(".jpg"));
    }

    #[test]
    fn empty_decoded_payload_is_rejected_in_both_modes() {
        let headers = BTreeMap::new();
        assert_eq!(decode_upload(None, true, &headers), Err(UploadError::EmptyPayload));
        assert_eq!(decode_upload(Some(""), true, &headers), Err(UploadError::EmptyPayload));
        assert_eq!(
            decode_upload(Some(r#"{"file_name":"a.png","file_content":""}"#), false, &headers),
            Err(UploadError::EmptyPayload)
        );
        assert_eq!(UploadError::EmptyPayload.message(), "uploaded file is empty");
    }

    #[test]
    fn s3_uri_joins_bucket_and_key() {
        assert_eq!(s3_uri("images", "a/b.jpg"), "s3://images/a/b.jpg");
    }
}
