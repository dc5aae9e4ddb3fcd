use std::sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Mutex, MutexGuard, PoisonError,
};

use async_trait::async_trait;
use reqwest::StatusCode;

use super::{Error, GalleryStore};
use crate::model::{Gallery, GalleryImage, Revision, Snapshot};

#[derive(Debug)]
struct Document {
    images: Gallery,
    version: u64,
}

impl Document {
    fn revision(&self) -> Revision {
        Revision::from(format!("rev-{}", self.version))
    }
}

/// In-process store with the same revision rules as the remote host.
#[derive(Debug, Default)]
pub struct MemoryStore {
    document: Mutex<Option<Document>>,
    writes: AtomicUsize,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_images(images: Gallery) -> Self {
        Self {
            document: Mutex::new(Some(Document { images, version: 1 })),
            ..Self::default()
        }
    }

    fn document(&self) -> MutexGuard<'_, Option<Document>> {
        self.document.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Stored images, bypassing failure injection.
    pub fn images(&self) -> Option<Gallery> {
        self.document().as_ref().map(|x| x.images.clone())
    }

    pub fn revision(&self) -> Option<Revision> {
        self.document().as_ref().map(Document::revision)
    }

    /// Number of write attempts, rejected ones included.
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

fn unavailable() -> Error {
    Error::Api {
        status: StatusCode::SERVICE_UNAVAILABLE,
        message: "store unavailable".to_owned(),
    }
}

#[async_trait]
impl GalleryStore for MemoryStore {
    async fn try_fetch(&self) -> Result<Snapshot, Error> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(unavailable());
        }

        let document = self.document();
        let document = document.as_ref().ok_or(Error::NotFound)?;

        Ok(Snapshot {
            images: document.images.clone(),
            revision: Some(document.revision()),
        })
    }

    async fn try_save(
        &self,
        images: &[GalleryImage],
        revision: Option<&Revision>,
    ) -> Result<(), Error> {
        self.writes.fetch_add(1, Ordering::SeqCst);

        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(unavailable());
        }

        let mut document = self.document();

        let version = match (document.as_ref(), revision) {
            (None, None) => 1,
            (Some(current), Some(revision)) if current.revision() == *revision => {
                current.version + 1
            }
            (Some(_), None) => {
                return Err(Error::Api {
                    status: StatusCode::UNPROCESSABLE_ENTITY,
                    message: "\"sha\" wasn't supplied".to_owned(),
                })
            }
            (_, Some(revision)) => {
                return Err(Error::Api {
                    status: StatusCode::CONFLICT,
                    message: format!("document does not match {revision}"),
                })
            }
        };

        *document = Some(Document {
            images: images.to_vec(),
            version,
        });

        Ok(())
    }
}
