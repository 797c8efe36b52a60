use serde::{Deserialize, Serialize};

/// Author block attached to a parsed share link.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Author {
    pub uid: String,
    pub name: String,
    pub avatar: String,
}

/// One image entry of an image post; `live_photo_url` is the motion variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImgInfo {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub live_photo_url: Option<String>,
}

/// Raw payload the backend parse endpoint returns for a share link.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VideoParseInfo {
    pub author: Author,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub music_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_url: Option<String>,
    #[serde(default)]
    pub images: Vec<ImgInfo>,
}

/// JSON envelope every backend endpoint responds with. `code == 200` is success.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub code: i32,
    #[serde(default)]
    pub msg: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

/// Display-ready record produced from a successful parse.
///
/// Never mutated after creation; a new parse produces a new record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaInfo {
    pub title: String,
    pub author: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub music_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub images: Vec<ImgInfo>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_tolerates_missing_data() {
        let env: ApiResponse<VideoParseInfo> =
            serde_json::from_str(r#"{"code":201,"msg":"不支持的平台"}"#).unwrap();
        assert_eq!(env.code, 201);
        assert_eq!(env.msg, "不支持的平台");
        assert!(env.data.is_none());
    }

    #[test]
    fn payload_defaults_missing_images_to_empty() {
        let env: ApiResponse<VideoParseInfo> = serde_json::from_str(
            r#"{"code":200,"msg":"解析成功","data":{"author":{"uid":"1","name":"A","avatar":""},"title":"T","video_url":"http://v/1.mp4"}}"#,
        )
        .unwrap();
        let payload = env.data.unwrap();
        assert_eq!(payload.title, "T");
        assert_eq!(payload.author.name, "A");
        assert!(payload.images.is_empty());
    }

    #[test]
    fn image_entries_keep_order_and_variants() {
        let payload: VideoParseInfo = serde_json::from_str(
            r#"{"author":{"uid":"","name":"","avatar":""},"title":"",
                "images":[{"url":"i1"},{"url":"i2","live_photo_url":"l2"}]}"#,
        )
        .unwrap();
        assert_eq!(payload.images[0].url, "i1");
        assert_eq!(payload.images[1].live_photo_url.as_deref(), Some("l2"));
    }
}
