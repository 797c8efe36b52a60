use crate::types::{MediaInfo, VideoParseInfo};

/// Convert the backend payload into the display-ready media record.
///
/// The description is the image count when the post carries images, absent
/// otherwise.
pub fn media_from_payload(info: VideoParseInfo) -> MediaInfo {
    let description = if info.images.is_empty() {
        None
    } else {
        Some(format!("包含 {} 张图片", info.images.len()))
    };
    MediaInfo {
        title: info.title,
        author: info.author.name,
        cover: info.cover_url,
        video_url: info.video_url,
        music_url: info.music_url,
        description,
        images: info.images,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Author, ImgInfo};

    fn payload() -> VideoParseInfo {
        VideoParseInfo {
            author: Author {
                uid: "42".to_string(),
                name: "A".to_string(),
                avatar: String::new(),
            },
            title: "T".to_string(),
            video_url: Some("http://v/1.mp4".to_string()),
            music_url: None,
            cover_url: Some("http://c/1.jpg".to_string()),
            images: Vec::new(),
        }
    }

    #[test]
    fn author_collapses_to_display_name() {
        let info = media_from_payload(payload());
        assert_eq!(info.title, "T");
        assert_eq!(info.author, "A");
        assert_eq!(info.cover.as_deref(), Some("http://c/1.jpg"));
        assert_eq!(info.video_url.as_deref(), Some("http://v/1.mp4"));
    }

    #[test]
    fn description_counts_images() {
        let mut raw = payload();
        raw.images = vec![
            ImgInfo { url: "i1".to_string(), live_photo_url: None },
            ImgInfo { url: "i2".to_string(), live_photo_url: None },
        ];
        let info = media_from_payload(raw);
        assert_eq!(info.description.as_deref(), Some("包含 2 张图片"));
        assert_eq!(info.images.len(), 2);
    }

    #[test]
    fn description_absent_without_images() {
        let info = media_from_payload(payload());
        assert!(info.description.is_none());
    }
}
