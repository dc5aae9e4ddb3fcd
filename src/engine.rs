//! Read-modify-write operations on the gallery.
//!
//! Every operation re-reads the document, mutates a local copy and writes it
//! back with the revision obtained by that read. Nothing is cached between
//! calls. Without [`GalleryEngine::with_single_flight`], overlapping
//! operations can race and the loser's write fails its revision check.

use tokio::sync::{Mutex, MutexGuard};

use crate::{
    model::{trim_to_capacity, Gallery, GalleryImage},
    store::GalleryStore,
};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("index {index} is out of range: gallery has {len} images")]
pub struct OutOfRange {
    pub index: i64,
    pub len: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub count: usize,
    pub capacity: usize,
    /// most recently ingested
    pub latest: Option<GalleryImage>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deletion {
    pub removed: GalleryImage,
    pub remaining: usize,
    pub saved: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cleared {
    pub previous: usize,
    pub saved: bool,
}

pub struct GalleryEngine<S> {
    store: S,
    capacity: usize,
    single_flight: Option<Mutex<()>>,
}

impl<S: GalleryStore> GalleryEngine<S> {
    pub fn new(store: S, capacity: usize) -> Self {
        Self {
            store,
            capacity,
            single_flight: None,
        }
    }

    /// Queues operations on this engine so that only one round trip runs at a
    /// time. Share one engine per document to close the lost-update race.
    pub fn with_single_flight(mut self) -> Self {
        self.single_flight = Some(Mutex::new(()));
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    async fn enter(&self) -> Option<MutexGuard<'_, ()>> {
        match &self.single_flight {
            Some(x) => Some(x.lock().await),
            None => None,
        }
    }

    /// Appends `images` in order, evicting the oldest beyond capacity.
    ///
    /// # Returns
    /// whether the write was applied
    pub async fn ingest(&self, images: Vec<GalleryImage>) -> bool {
        if images.is_empty() {
            return true;
        }

        let _guard = self.enter().await;

        let snapshot = self.store.fetch().await;
        let mut gallery = snapshot.images;

        let added = images.len();
        gallery.extend(images);

        let evicted = trim_to_capacity(&mut gallery, self.capacity);

        tracing::debug!(added, evicted, len = gallery.len(), "ingest");

        self.store
            .save(&gallery, snapshot.revision.as_ref())
            .await
    }

    pub async fn list(&self) -> Gallery {
        let _guard = self.enter().await;

        self.store.fetch().await.images
    }

    pub async fn count(&self) -> Summary {
        let _guard = self.enter().await;

        let mut images = self.store.fetch().await.images;

        Summary {
            count: images.len(),
            capacity: self.capacity,
            latest: images.pop(),
        }
    }

    /// Removes the image at the 1-based `index`.
    ///
    /// Nothing is written when `index` is out of range.
    pub async fn delete_at(&self, index: i64) -> Result<Deletion, OutOfRange> {
        let _guard = self.enter().await;

        let snapshot = self.store.fetch().await;
        let mut gallery = snapshot.images;

        let position = usize::try_from(index)
            .ok()
            .filter(|x| (1..=gallery.len()).contains(x))
            .ok_or(OutOfRange {
                index,
                len: gallery.len(),
            })?;

        let removed = gallery.remove(position - 1);

        tracing::debug!(index, url = %removed.url, "delete");

        let saved = self
            .store
            .save(&gallery, snapshot.revision.as_ref())
            .await;

        Ok(Deletion {
            removed,
            remaining: gallery.len(),
            saved,
        })
    }

    pub async fn clear(&self) -> Cleared {
        let _guard = self.enter().await;

        let snapshot = self.store.fetch().await;
        let previous = snapshot.images.len();

        if previous == 0 {
            return Cleared {
                previous,
                saved: true,
            };
        }

        let saved = self.store.save(&[], snapshot.revision.as_ref()).await;

        Cleared { previous, saved }
    }
}
