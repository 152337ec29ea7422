//! src/services/book_store.rs
//!
//! BookStore: read-only access to the remote bucket holding book files.
//! The trait is the seam between the HTTP layer and the object store:
//! handlers receive an injected `Arc<dyn BookStore>` and never touch SDK
//! types, so tests can substitute an in-memory stub.

use crate::config::AppConfig;
use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region, meta::region::RegionProviderChain};
use aws_sdk_s3::Client;
use bytes::Bytes;
use futures::StreamExt;
use futures::stream::BoxStream;
use std::io;
use thiserror::Error;
use tokio_util::io::ReaderStream;
use tracing::debug;

/// Chunked object content as handed back by the store.
///
/// Forward-only and lazily consumed: each chunk is read from the upstream
/// connection only when the consumer polls for it, so an object of any size
/// flows through without being materialized.
pub type ObjectStream = BoxStream<'static, io::Result<Bytes>>;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("object `{key}` not found in bucket `{bucket}`")]
    NotFound { bucket: String, key: String },
    #[error("object store request failed")]
    Upstream(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type FetchResult<T> = Result<T, FetchError>;

/// A single fetched object: its content stream plus the size the store
/// reported, when it reported one.
pub struct BookObject {
    pub content_length: Option<u64>,
    pub body: ObjectStream,
}

/// Read-only handle to the bucket of book files.
///
/// Implementations hold long-lived credentials/configuration but keep no
/// per-call mutable state, so one handle is shared across all in-flight
/// requests.
#[async_trait]
pub trait BookStore: Send + Sync {
    /// Fetch the object stored under `key`.
    ///
    /// On success the returned stream is exclusively owned by the caller;
    /// dropping it before exhaustion releases the upstream connection.
    async fn fetch(&self, key: &str) -> FetchResult<BookObject>;
}

/// BookStore backed by an S3 (or S3-compatible) bucket.
#[derive(Clone)]
pub struct S3BookStore {
    client: Client,
    bucket: String,
}

impl S3BookStore {
    /// Build the SDK client from the resolved configuration.
    ///
    /// Credentials come from the SDK's default provider chain
    /// (AWS_ACCESS_KEY_ID / AWS_SECRET_ACCESS_KEY in the environment, shared
    /// config files, instance metadata). Region resolution prefers explicit
    /// configuration, then the provider chain, then `us-east-1`.
    pub async fn connect(cfg: &AppConfig) -> Self {
        let region = RegionProviderChain::first_try(cfg.region.clone().map(Region::new))
            .or_default_provider()
            .or_else(Region::new("us-east-1"));

        let mut loader = aws_config::defaults(BehaviorVersion::latest()).region(region);
        if let Some(endpoint) = cfg.endpoint_url.clone() {
            loader = loader.endpoint_url(endpoint);
        }
        let sdk_config = loader.load().await;

        Self {
            client: Client::new(&sdk_config),
            bucket: cfg.bucket.clone(),
        }
    }
}

#[async_trait]
impl BookStore for S3BookStore {
    async fn fetch(&self, key: &str) -> FetchResult<BookObject> {
        let output = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|err| {
                if err
                    .as_service_error()
                    .is_some_and(|service_err| service_err.is_no_such_key())
                {
                    FetchError::NotFound {
                        bucket: self.bucket.clone(),
                        key: key.to_string(),
                    }
                } else {
                    FetchError::Upstream(Box::new(err))
                }
            })?;

        let content_length = output
            .content_length()
            .and_then(|len| u64::try_from(len).ok());
        debug!(key, ?content_length, "streaming object from bucket");

        let body = ReaderStream::new(output.body.into_async_read()).boxed();

        Ok(BookObject {
            content_length,
            body,
        })
    }
}
