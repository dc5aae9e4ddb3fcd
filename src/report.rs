//! Plain-text renderings of engine outcomes for chat replies and the CLI.

use itertools::Itertools;

use crate::{
    engine::{Cleared, Deletion, OutOfRange, Summary},
    model::GalleryImage,
};

pub const SAVED_MARKER: &str = "📸";
pub const FAILED_MARKER: &str = "❌";

fn day(image: &GalleryImage) -> String {
    image.date.format("%Y-%m-%d").to_string()
}

pub fn summary(summary: &Summary, pages_url: Option<&str>) -> String {
    let mut lines = vec![format!(
        "🖼️ Images: {}/{}",
        summary.count, summary.capacity
    )];

    if let Some(url) = pages_url {
        lines.push(format!("🌐 Web: {url}"));
    }

    if let Some(latest) = &summary.latest {
        lines.push(format!(
            "📷 Latest: by {} on {} ({})",
            latest.author,
            day(latest),
            latest.url
        ));
    }

    lines.join("\n")
}

/// Numbered with 1-based indices, as `delete` expects them.
pub fn list(images: &[GalleryImage]) -> String {
    if images.is_empty() {
        return "📸 The gallery is empty.".to_owned();
    }

    let rows = images
        .iter()
        .enumerate()
        .map(|(i, x)| format!("{}. 📷 {} — {}", i + 1, x.author, day(x)))
        .join("\n");

    format!(
        "📸 Images in the gallery ({}):\n\n{rows}\n\nUse `delete <number>` to remove one",
        images.len()
    )
}

pub fn deletion(index: i64, deletion: &Deletion) -> String {
    if deletion.saved {
        format!(
            "✅ Image #{index} removed (by {})\n{} images left.",
            deletion.removed.author, deletion.remaining
        )
    } else {
        format!("{FAILED_MARKER} Failed to save. Try again.")
    }
}

pub fn out_of_range(err: &OutOfRange) -> String {
    format!(
        "{FAILED_MARKER} Invalid number. There are {} images. Use `list` to see them.",
        err.len
    )
}

pub fn cleared(cleared: &Cleared) -> String {
    match cleared {
        Cleared { previous: 0, .. } => "📸 The gallery is already empty.".to_owned(),
        Cleared {
            previous,
            saved: true,
        } => format!("✅ Gallery cleared. Removed {previous} images."),
        Cleared { saved: false, .. } => format!("{FAILED_MARKER} Failed to save. Try again."),
    }
}

/// Reaction left on a mirrored message.
pub fn ingest_marker(saved: bool) -> &'static str {
    if saved {
        SAVED_MARKER
    } else {
        FAILED_MARKER
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    fn image(author: &str, day: u32) -> GalleryImage {
        GalleryImage {
            url: format!("https://cdn.example/{author}.png"),
            author: author.to_owned(),
            date: Utc.with_ymd_and_hms(2024, 8, day, 10, 0, 0).unwrap(),
            width: None,
            height: None,
        }
    }

    #[test]
    fn list_is_numbered_from_one() {
        let text = list(&[image("alice", 1), image("bob", 2)]);

        assert!(text.contains("(2)"));
        assert!(text.contains("1. 📷 alice — 2024-08-01"));
        assert!(text.contains("2. 📷 bob — 2024-08-02"));
    }

    #[test]
    fn empty_list() {
        assert_eq!(list(&[]), "📸 The gallery is empty.");
    }

    #[test]
    fn summary_with_latest() {
        let text = summary(
            &Summary {
                count: 3,
                capacity: 50,
                latest: Some(image("bob", 9)),
            },
            Some("https://owner.github.io/site/#galeria"),
        );

        assert!(text.starts_with("🖼️ Images: 3/50"));
        assert!(text.contains("https://owner.github.io/site/#galeria"));
        assert!(text.contains("by bob on 2024-08-09"));
    }

    #[test]
    fn out_of_range_carries_length() {
        let text = out_of_range(&OutOfRange { index: 9, len: 4 });

        assert!(text.contains("There are 4 images"));
    }

    #[test]
    fn cleared_messages() {
        assert_eq!(
            cleared(&Cleared {
                previous: 0,
                saved: true
            }),
            "📸 The gallery is already empty."
        );
        assert!(cleared(&Cleared {
            previous: 7,
            saved: true
        })
        .contains("Removed 7 images"));
        assert!(cleared(&Cleared {
            previous: 7,
            saved: false
        })
        .starts_with(FAILED_MARKER));
    }

    #[test]
    fn deletion_messages() {
        let ok = Deletion {
            removed: image("alice", 1),
            remaining: 2,
            saved: true,
        };

        assert!(deletion(3, &ok).contains("#3 removed (by alice)"));
        assert!(deletion(3, &Deletion { saved: false, ..ok }).starts_with(FAILED_MARKER));
    }
}
