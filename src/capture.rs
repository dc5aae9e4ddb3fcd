//! Turning chat message attachments into gallery entries.

use chrono::{DateTime, Utc};

use crate::model::GalleryImage;

pub const DEFAULT_CHANNEL_NEEDLE: &str = "captura";

/// Attachment as reported by the chat platform.
#[derive(Debug, Clone, Default)]
pub struct Attachment {
    pub url: String,
    pub content_type: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl Attachment {
    pub fn is_image(&self) -> bool {
        self.content_type
            .as_deref()
            .is_some_and(|x| x.starts_with("image/"))
    }
}

/// Which channels are mirrored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelFilter {
    Id(String),
    NameContains(String),
}

impl Default for ChannelFilter {
    fn default() -> Self {
        Self::NameContains(DEFAULT_CHANNEL_NEEDLE.to_owned())
    }
}

impl ChannelFilter {
    /// An empty id falls back to matching by name.
    pub fn from_id(id: Option<&str>) -> Self {
        match id.map(str::trim) {
            Some(id) if !id.is_empty() => Self::Id(id.to_owned()),
            _ => Self::default(),
        }
    }

    pub fn matches(&self, channel_id: &str, channel_name: &str) -> bool {
        match self {
            Self::Id(id) => id == channel_id,
            Self::NameContains(needle) => channel_name.contains(needle.as_str()),
        }
    }
}

/// Message metadata the capture decision depends on.
#[derive(Debug, Clone, Copy)]
pub struct Origin<'a> {
    pub channel_id: &'a str,
    pub channel_name: &'a str,
    pub author_is_bot: bool,
}

pub fn should_capture(filter: &ChannelFilter, origin: Origin<'_>) -> bool {
    !origin.author_is_bot && filter.matches(origin.channel_id, origin.channel_name)
}

/// Image attachments of one message, in attachment order, stamped `at`.
pub fn images_from<'a>(
    attachments: impl IntoIterator<Item = &'a Attachment>,
    author: &str,
    at: DateTime<Utc>,
) -> Vec<GalleryImage> {
    attachments
        .into_iter()
        .filter(|x| x.is_image())
        .map(|x| GalleryImage {
            url: x.url.clone(),
            author: author.to_owned(),
            date: at,
            width: x.width,
            height: x.height,
        })
        .collect()
}
