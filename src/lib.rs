pub mod capture;
pub mod config;
pub mod engine;
pub mod error;
pub mod model;
pub mod network;
pub mod report;
pub mod store;

pub use engine::GalleryEngine;
pub use error::Error;
pub use store::{GalleryStore, GitHubStore, MemoryStore};

pub type Result<T> = std::result::Result<T, Error>;
