//! AWS SDK implementations of the adapter traits.
//!
//! The traits are synchronous; each call bridges onto the Lambda runtime's
//! tokio executor with `block_in_place`, so these adapters must run on the
//! multi-thread runtime.

use std::collections::HashMap;
use std::future::Future;

use aws_sdk_dynamodb::operation::update_item::UpdateItemError;
use aws_sdk_dynamodb::types::{AttributeValue, ReturnValue};
use aws_sdk_rekognition::types::{Attribute, FaceDetail, Image, S3Object};
use aws_sdk_s3::primitives::ByteStream;
use portfolio_core::analysis::{
    AnalysisRecord, BooleanAttribute, Emotion, FaceDetails, Pose,
};
use portfolio_core::recipe::Recipe;

use crate::adapters::dynamo_items::{
    analysis_from_item, analysis_to_item, recipe_from_item, recipe_to_item,
};
use crate::adapters::object_store::ObjectStore;
use crate::adapters::queue::MessageQueue;
use crate::adapters::recipe_store::{RecipePage, RecipeStore};
use crate::adapters::result_store::AnalysisResultStore;
use crate::adapters::vision::VisionAnalyzer;

fn block_on<F: Future>(future: F) -> F::Output {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}

pub struct S3ObjectStore {
    pub bucket: String,
    pub s3_client: aws_sdk_s3::Client,
}

impl ObjectStore for S3ObjectStore {
    fn put_object(&self, key: &str, body: &[u8], content_type: &str) -> Result<(), String> {
        let request = self
            .s3_client
            .put_object()
            .bucket(self.bucket.clone())
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(body.to_vec()));

        block_on(async move {
            request
                .send()
                .await
                .map(|_| ())
                .map_err(|error| format!("failed to write object to s3: {error}"))
        })
    }
}

pub struct SqsMessageQueue {
    pub queue_url: String,
    pub sqs_client: aws_sdk_sqs::Client,
}

impl MessageQueue for SqsMessageQueue {
    fn send_message(&self, body: &str) -> Result<(), String> {
        let request = self
            .sqs_client
            .send_message()
            .queue_url(self.queue_url.clone())
            .message_body(body);

        block_on(async move {
            request
                .send()
                .await
                .map(|_| ())
                .map_err(|error| format!("failed to enqueue message: {error}"))
        })
    }
}

pub struct DynamoRecipeStore {
    pub table_name: String,
    pub dynamo_client: aws_sdk_dynamodb::Client,
}

fn recipe_key(recipe_id: &str) -> HashMap<String, AttributeValue> {
    HashMap::from([("id".to_string(), AttributeValue::S(recipe_id.to_string()))])
}

impl RecipeStore for DynamoRecipeStore {
    fn scan_page(&self, start_key: Option<&str>) -> Result<RecipePage, String> {
        let request = self
            .dynamo_client
            .scan()
            .table_name(self.table_name.clone())
            .set_exclusive_start_key(start_key.map(recipe_key));

        let output = block_on(async move { request.send().await })
            .map_err(|error| format!("failed to scan recipes: {error}"))?;

        let items = output
            .items()
            .iter()
            .map(recipe_from_item)
            .collect::<Result<Vec<_>, _>>()?;
        let next_start_key = output
            .last_evaluated_key()
            .and_then(|key| key.get("id"))
            .and_then(|value| value.as_s().ok())
            .cloned();

        Ok(RecipePage {
            items,
            next_start_key,
        })
    }

    fn put_recipe(&self, recipe: &Recipe) -> Result<(), String> {
        let request = self
            .dynamo_client
            .put_item()
            .table_name(self.table_name.clone())
            .set_item(Some(recipe_to_item(recipe)));

        block_on(async move {
            request
                .send()
                .await
                .map(|_| ())
                .map_err(|error| format!("failed to put recipe: {error}"))
        })
    }

    fn increment_likes(&self, recipe_id: &str) -> Result<Option<u64>, String> {
        let request = self
            .dynamo_client
            .update_item()
            .table_name(self.table_name.clone())
            .set_key(Some(recipe_key(recipe_id)))
            .update_expression("SET likes = likes + :val")
            .condition_expression("attribute_exists(id)")
            .expression_attribute_values(":val", AttributeValue::N("1".to_string()))
            .return_values(ReturnValue::UpdatedNew);

        match block_on(async move { request.send().await }) {
            Ok(output) => {
                let likes = output
                    .attributes()
                    .and_then(|attributes| attributes.get("likes"))
                    .and_then(|value| value.as_n().ok())
                    .ok_or_else(|| "update did not return the like count".to_string())?
                    .parse::<u64>()
                    .map_err(|error| format!("like count is not a number: {error}"))?;
                Ok(Some(likes))
            }
            Err(error) => match error.into_service_error() {
                UpdateItemError::ConditionalCheckFailedException(_) => Ok(None),
                other => Err(format!("failed to like recipe: {other}")),
            },
        }
    }

    fn delete_recipe(&self, recipe_id: &str) -> Result<(), String> {
        let request = self
            .dynamo_client
            .delete_item()
            .table_name(self.table_name.clone())
            .set_key(Some(recipe_key(recipe_id)));

        block_on(async move {
            request
                .send()
                .await
                .map(|_| ())
                .map_err(|error| format!("failed to delete recipe: {error}"))
        })
    }
}

pub struct DynamoResultStore {
    pub table_name: String,
    pub dynamo_client: aws_sdk_dynamodb::Client,
}

impl AnalysisResultStore for DynamoResultStore {
    fn put_result(&self, record: &AnalysisRecord) -> Result<(), String> {
        let request = self
            .dynamo_client
            .put_item()
            .table_name(self.table_name.clone())
            .set_item(Some(analysis_to_item(record)));

        block_on(async move {
            request
                .send()
                .await
                .map(|_| ())
                .map_err(|error| format!("failed to put analysis result: {error}"))
        })
    }

    fn get_result(&self, image_id: &str) -> Result<Option<AnalysisRecord>, String> {
        let request = self
            .dynamo_client
            .get_item()
            .table_name(self.table_name.clone())
            .key("image_id", AttributeValue::S(image_id.to_string()));

        let output = block_on(async move { request.send().await })
            .map_err(|error| format!("failed to read analysis result: {error}"))?;

        output.item().map(analysis_from_item).transpose()
    }
}

pub struct RekognitionAnalyzer {
    pub rekognition_client: aws_sdk_rekognition::Client,
}

fn s3_image(bucket: &str, key: &str) -> Image {
    Image::builder()
        .s3_object(S3Object::builder().bucket(bucket).name(key).build())
        .build()
}

impl VisionAnalyzer for RekognitionAnalyzer {
    fn detect_faces(&self, bucket: &str, key: &str) -> Result<Vec<FaceDetails>, String> {
        let request = self
            .rekognition_client
            .detect_faces()
            .image(s3_image(bucket, key))
            .attributes(Attribute::All);

        let output = block_on(async move { request.send().await })
            .map_err(|error| format!("failed to detect faces: {error}"))?;

        Ok(output.face_details().iter().map(face_details).collect())
    }

    fn detect_moderation_labels(
        &self,
        bucket: &str,
        key: &str,
        min_confidence: f32,
    ) -> Result<Vec<String>, String> {
        let request = self
            .rekognition_client
            .detect_moderation_labels()
            .image(s3_image(bucket, key))
            .min_confidence(min_confidence);

        let output = block_on(async move { request.send().await })
            .map_err(|error| format!("failed to detect moderation labels: {error}"))?;

        Ok(output
            .moderation_labels()
            .iter()
            .filter_map(|label| label.name().map(str::to_string))
            .collect())
    }
}

fn face_details(face: &FaceDetail) -> FaceDetails {
    let widen = |value: Option<f32>| value.map(f64::from);

    FaceDetails {
        confidence: widen(face.confidence()),
        sharpness: widen(face.quality().and_then(|quality| quality.sharpness())),
        brightness: widen(face.quality().and_then(|quality| quality.brightness())),
        smile: BooleanAttribute {
            value: face.smile().map(|smile| smile.value()),
            confidence: widen(face.smile().and_then(|smile| smile.confidence())),
        },
        eyes_open: BooleanAttribute {
            value: face.eyes_open().map(|eyes| eyes.value()),
            confidence: widen(face.eyes_open().and_then(|eyes| eyes.confidence())),
        },
        sunglasses: BooleanAttribute {
            value: face.sunglasses().map(|glasses| glasses.value()),
            confidence: widen(face.sunglasses().and_then(|glasses| glasses.confidence())),
        },
        pose: Pose {
            yaw: widen(face.pose().and_then(|pose| pose.yaw())),
            pitch: widen(face.pose().and_then(|pose| pose.pitch())),
            roll: widen(face.pose().and_then(|pose| pose.roll())),
        },
        emotions: face
            .emotions()
            .iter()
            .filter_map(|emotion| {
                Some(Emotion {
                    kind: emotion.r#type()?.as_str().to_string(),
                    confidence: f64::from(emotion.confidence()?),
                })
            })
            .collect(),
    }
}
