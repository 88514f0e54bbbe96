//! HTTP adapter for the remote upload endpoint.

use std::time::Duration;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::Serialize;
use tracing::debug;

use fl_core::ports::{UploadEndpointPort, UploadError};
use fl_core::upload::UploadItem;

/// Wire shape consumed by the upload endpoint. Field names match the
/// platform API's JSON contract; the payload travels base64-encoded.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UploadRequestBody<'a> {
    id: &'a str,
    file_name: &'a str,
    mime_type: &'a str,
    size: i64,
    blob: String,
    purpose: &'a str,
    entity_type: &'a str,
    entity_id: &'a str,
    idempotency_key: &'a str,
}

impl<'a> UploadRequestBody<'a> {
    fn from_item(item: &'a UploadItem) -> Self {
        Self {
            id: item.id.as_str(),
            file_name: &item.file_name,
            mime_type: &item.mime_type,
            size: item.size_bytes,
            blob: BASE64.encode(&item.payload),
            purpose: &item.purpose,
            entity_type: &item.entity_type,
            entity_id: item.entity_id.as_str(),
            idempotency_key: item.idempotency_key.as_str(),
        }
    }
}

/// Posts queued files to the remote upload endpoint.
///
/// Every attempt carries the record's idempotency key, so the server can
/// collapse retries into one logical upload. Each attempt is bounded by
/// the configured timeout and reported as [`UploadError::Timeout`] when
/// it elapses.
pub struct HttpUploadEndpoint {
    client: reqwest::Client,
    endpoint_url: String,
    attempt_timeout_secs: u64,
}

impl HttpUploadEndpoint {
    pub fn new(
        endpoint_url: impl Into<String>,
        attempt_timeout_secs: u64,
    ) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(attempt_timeout_secs))
            .build()?;
        Ok(Self {
            client,
            endpoint_url: endpoint_url.into(),
            attempt_timeout_secs,
        })
    }
}

#[async_trait]
impl UploadEndpointPort for HttpUploadEndpoint {
    async fn upload(&self, item: &UploadItem) -> Result<(), UploadError> {
        let body = UploadRequestBody::from_item(item);

        let response = self
            .client
            .post(&self.endpoint_url)
            .json(&body)
            .send()
            .await
            .map_err(|err| {
                if err.is_timeout() {
                    UploadError::Timeout(self.attempt_timeout_secs)
                } else {
                    UploadError::Network(err.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(UploadError::Server(status.as_u16()));
        }

        debug!(upload_id = %item.id, status = status.as_u16(), "upload accepted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fl_core::ids::{EntityId, IdempotencyKey, UploadId};
    use fl_core::upload::NewUploadItem;
    use mockito::Matcher;

    fn sample_item() -> UploadItem {
        let new = NewUploadItem::new(
            UploadId::from("upload-1"),
            "proof.jpg",
            "image/jpeg",
            vec![0xDE, 0xAD, 0xBE, 0xEF],
            "trip_proof",
            "trip",
            EntityId::from("trip-3"),
        )
        .with_idempotency_key(IdempotencyKey::from("idem-abc"));
        UploadItem::enqueued(new, 1_700_000_000_000)
    }

    #[tokio::test]
    async fn posts_record_fields_and_idempotency_key() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/uploads")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "id": "upload-1",
                "fileName": "proof.jpg",
                "mimeType": "image/jpeg",
                "size": 4,
                "blob": "3q2+7w==",
                "purpose": "trip_proof",
                "entityType": "trip",
                "entityId": "trip-3",
                "idempotencyKey": "idem-abc",
            })))
            .with_status(201)
            .create_async()
            .await;

        let endpoint =
            HttpUploadEndpoint::new(format!("{}/uploads", server.url()), 45).expect("endpoint");
        endpoint.upload(&sample_item()).await.expect("upload");

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn server_error_is_reported_with_status() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/uploads")
            .with_status(503)
            .create_async()
            .await;

        let endpoint =
            HttpUploadEndpoint::new(format!("{}/uploads", server.url()), 45).expect("endpoint");
        let err = endpoint
            .upload(&sample_item())
            .await
            .expect_err("should fail");

        assert!(matches!(err, UploadError::Server(503)));
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_a_network_error() {
        // Nothing listens on this port
        let endpoint = HttpUploadEndpoint::new("http://127.0.0.1:9/uploads", 45).expect("endpoint");
        let err = endpoint
            .upload(&sample_item())
            .await
            .expect_err("should fail");

        assert!(matches!(err, UploadError::Network(_)));
    }
}
