//! Notification envelope decoding
//!
//! Object-storage notifications arrive as a JSON envelope whose `Message`
//! field holds a stringified inner payload listing the affected objects:
//!
//! ```json
//! {
//!   "Type": "Notification",
//!   "Message": "{\"Records\":[{\"s3\":{\"bucket\":{\"name\":\"b\"},\"object\":{\"key\":\"data.tsv\"}}}]}"
//! }
//! ```
//!
//! Decoding never fails: anything that does not look like a bucket
//! notification yields an empty list so the consumer can still delete the
//! queue entry.

use serde_json::Value;
use tracing::{debug, warn};

/// Extracts canonical object URIs (`s3://bucket/key`) from an envelope body
///
/// Records are emitted in input order; duplicates are preserved. Records
/// missing the bucket name or object key are skipped individually.
pub fn decode_object_uris(body: &str) -> Vec<String> {
    let envelope: Value = match serde_json::from_str(body) {
        Ok(envelope) => envelope,
        Err(e) => {
            debug!("Message is not a bucket notification envelope: {}", e);
            return Vec::new();
        }
    };

    let inner_text = match envelope.get("Message").and_then(Value::as_str) {
        Some(inner_text) => inner_text,
        None => {
            debug!("Envelope carries no Message field; nothing to dispatch");
            return Vec::new();
        }
    };

    let inner: Value = match serde_json::from_str(inner_text) {
        Ok(inner) => inner,
        Err(e) => {
            debug!("Envelope Message is not valid JSON: {}", e);
            return Vec::new();
        }
    };

    let records = match inner.get("Records").and_then(Value::as_array) {
        Some(records) => records,
        None => {
            debug!("Envelope Message carries no Records array");
            return Vec::new();
        }
    };

    let mut uris = Vec::new();
    for record in records {
        let bucket = record
            .pointer("/s3/bucket/name")
            .and_then(Value::as_str);
        let key = record.pointer("/s3/object/key").and_then(Value::as_str);

        match (bucket, key) {
            (Some(bucket), Some(key)) => uris.push(object_uri(bucket, key)),
            _ => warn!("Skipping record without bucket name or object key: {}", record),
        }
    }

    uris
}

/// Canonical object URI for a bucket/key pair
///
/// Bucket and key are passed through unmodified, without URL-encoding.
pub fn object_uri(bucket: &str, key: &str) -> String {
    format!("s3://{}/{}", bucket, key)
}

/// Builds a single-record notification envelope for a bucket/key pair
///
/// Used by the manual retry entry point to reprocess an object without a
/// real queue event. The result round-trips through [`decode_object_uris`].
pub fn synthesize_envelope(bucket: &str, key: &str) -> String {
    let inner = serde_json::json!({
        "Records": [{
            "eventSource": "aws:s3",
            "eventName": "ObjectCreated:Put",
            "s3": {
                "bucket": { "name": bucket },
                "object": { "key": key },
            },
        }],
    });

    serde_json::json!({
        "Type": "Notification",
        "Message": inner.to_string(),
    })
    .to_string()
}
