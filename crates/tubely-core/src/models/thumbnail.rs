use bytes::Bytes;

/// Thumbnail payload with the media type declared by the uploader.
#[derive(Debug, Clone)]
pub struct Thumbnail {
    pub data: Bytes,
    pub media_type: String,
}

impl Thumbnail {
    pub fn new(data: Bytes, media_type: impl Into<String>) -> Self {
        Self {
            data,
            media_type: media_type.into(),
        }
    }

    /// File extension derived from the media subtype (`image/png` -> `png`).
    pub fn extension(&self) -> &str {
        self.media_type
            .split(';')
            .next()
            .and_then(|essence| essence.split_once('/'))
            .map(|(_, subtype)| subtype.trim())
            .filter(|subtype| !subtype.is_empty())
            .unwrap_or("bin")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_from_media_type() {
        let thumb = Thumbnail::new(Bytes::from_static(b"x"), "image/png");
        assert_eq!(thumb.extension(), "png");

        let thumb = Thumbnail::new(Bytes::from_static(b"x"), "image/jpeg; q=0.9");
        assert_eq!(thumb.extension(), "jpeg");

        let thumb = Thumbnail::new(Bytes::from_static(b"x"), "garbage");
        assert_eq!(thumb.extension(), "bin");
    }
}
