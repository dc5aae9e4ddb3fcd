use std::fmt::Display;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GalleryImage {
    pub url: String,
    /// display name at capture time
    pub author: String,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
}

/// oldest first
pub type Gallery = Vec<GalleryImage>;

/// Opaque content revision (`sha`) of the remote document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Revision(String);

impl Revision {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for Revision {
    fn from(x: String) -> Self {
        Self(x)
    }
}

impl From<&str> for Revision {
    fn from(x: &str) -> Self {
        Self(x.to_owned())
    }
}

impl Display for Revision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    pub images: Gallery,
    /// `None` while the document doesn't exist yet
    pub revision: Option<Revision>,
}

impl Snapshot {
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Evicts from the front until `images.len() <= max`.
///
/// # Returns
/// number of evicted images
pub fn trim_to_capacity(images: &mut Gallery, max: usize) -> usize {
    let excess = images.len().saturating_sub(max);

    images.drain(..excess);

    excess
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn image(url: &str) -> GalleryImage {
        GalleryImage {
            url: url.to_owned(),
            author: "alice".to_owned(),
            date: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
            width: None,
            height: None,
        }
    }

    #[test]
    fn trim_keeps_most_recent() {
        let mut images = (0..7).map(|i| image(&format!("u{i}"))).collect::<Vec<_>>();

        let evicted = trim_to_capacity(&mut images, 5);

        assert_eq!(evicted, 2);
        let urls = images.iter().map(|x| x.url.as_str()).collect::<Vec<_>>();
        assert_eq!(urls, ["u2", "u3", "u4", "u5", "u6"]);
    }

    #[test]
    fn trim_under_capacity_is_noop() {
        let mut images = vec![image("a"), image("b")];

        assert_eq!(trim_to_capacity(&mut images, 50), 0);
        assert_eq!(images.len(), 2);
    }

    #[test]
    fn unknown_dimensions_are_written_as_null() {
        let json = serde_json::to_value(image("u1")).unwrap();

        let obj = json.as_object().unwrap();
        let keys = obj.keys().map(String::as_str).collect::<Vec<_>>();

        assert_eq!(keys.len(), 5);
        for key in ["url", "author", "date", "width", "height"] {
            assert!(keys.contains(&key), "missing {key}");
        }
        assert!(obj["width"].is_null());
        assert!(obj["height"].is_null());
        assert!(obj["date"].as_str().unwrap().starts_with("2024-05-01T12:00:00"));
    }

    #[test]
    fn parse_document_written_by_older_bot() {
        // millisecond timestamps and missing dimensions both occur in the wild
        let doc = r#"[
          { "url": "https://cdn.example/a.png", "author": "bob", "date": "2024-03-09T18:22:41.512Z", "width": 1920, "height": 1080 },
          { "url": "https://cdn.example/b.png", "author": "eve", "date": "2024-03-10T08:00:00.000Z" }
        ]"#;

        let gallery: Gallery = serde_json::from_str(doc).unwrap();

        assert_eq!(gallery.len(), 2);
        assert_eq!(gallery[0].width, Some(1920));
        assert_eq!(gallery[1].height, None);
        assert!(gallery[0].date < gallery[1].date);
    }
}
