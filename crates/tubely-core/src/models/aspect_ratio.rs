use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Aspect-ratio bucket a video is filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AspectRatio {
    #[serde(rename = "16:9")]
    Landscape,
    #[serde(rename = "9:16")]
    Portrait,
    #[serde(rename = "other")]
    Other,
}

impl AspectRatio {
    pub fn as_str(&self) -> &'static str {
        match self {
            AspectRatio::Landscape => "16:9",
            AspectRatio::Portrait => "9:16",
            AspectRatio::Other => "other",
        }
    }

    /// Directory segment used for storage keys of this class.
    pub fn key_prefix(&self) -> &'static str {
        match self {
            AspectRatio::Landscape => "landscape",
            AspectRatio::Portrait => "portrait",
            AspectRatio::Other => "other",
        }
    }
}

impl Display for AspectRatio {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aspect_ratio_labels() {
        assert_eq!(AspectRatio::Landscape.to_string(), "16:9");
        assert_eq!(AspectRatio::Portrait.to_string(), "9:16");
        assert_eq!(AspectRatio::Other.to_string(), "other");
        assert_eq!(AspectRatio::Portrait.key_prefix(), "portrait");
    }

    #[test]
    fn test_aspect_ratio_serializes_as_label() {
        let json = serde_json::to_string(&AspectRatio::Landscape).unwrap();
        assert_eq!(json, "\"16:9\"");
    }
}
