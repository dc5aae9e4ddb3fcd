//! Read/write access to the remote gallery document.
//!
//! Implementations provide the strict `try_*` pair. The provided `fetch`/`save`
//! collapse every failure into an empty snapshot or `false` after logging it,
//! which is what the engine runs on.

mod github;
mod memory;

pub use github::GitHubStore;
pub use memory::MemoryStore;

use async_trait::async_trait;
use reqwest::StatusCode;
use tap::TapFallible;

use crate::model::{GalleryImage, Revision, Snapshot};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("document not found")]
    NotFound,

    #[error("transport: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("api: status = {status}; message = {message}")]
    Api { status: StatusCode, message: String },

    #[error("base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("utf8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound)
    }

    /// The write was rejected because the revision it was based on is stale
    /// (or missing for an existing document).
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Error::Api { status, .. }
                if *status == StatusCode::CONFLICT
                    || *status == StatusCode::PRECONDITION_FAILED
                    || *status == StatusCode::UNPROCESSABLE_ENTITY
        )
    }
}

#[async_trait]
pub trait GalleryStore: Send + Sync {
    /// Current document and its revision.
    ///
    /// A missing document is [`Error::NotFound`].
    async fn try_fetch(&self) -> Result<Snapshot, Error>;

    /// Creates the document when `revision` is `None`, otherwise updates it
    /// only if the remote revision still equals `revision`.
    async fn try_save(
        &self,
        images: &[GalleryImage],
        revision: Option<&Revision>,
    ) -> Result<(), Error>;

    async fn fetch(&self) -> Snapshot {
        match self.try_fetch().await {
            Ok(snapshot) => snapshot,
            Err(Error::NotFound) => {
                tracing::debug!("gallery document doesn't exist yet");
                Snapshot::empty()
            }
            Err(err) => {
                tracing::error!("failed to read gallery: {err}");
                Snapshot::empty()
            }
        }
    }

    async fn save(&self, images: &[GalleryImage], revision: Option<&Revision>) -> bool {
        self.try_save(images, revision)
            .await
            .tap_ok(|_| tracing::info!("gallery updated ({} images)", images.len()))
            .tap_err(|err| tracing::error!("failed to save gallery: {err}"))
            .is_ok()
    }
}

#[async_trait]
impl<S: GalleryStore + ?Sized> GalleryStore for std::sync::Arc<S> {
    async fn try_fetch(&self) -> Result<Snapshot, Error> {
        (**self).try_fetch().await
    }

    async fn try_save(
        &self,
        images: &[GalleryImage],
        revision: Option<&Revision>,
    ) -> Result<(), Error> {
        (**self).try_save(images, revision).await
    }
}
