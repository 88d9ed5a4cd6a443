pub mod aspect_ratio;
pub mod thumbnail;
pub mod video;

pub use aspect_ratio::AspectRatio;
pub use thumbnail::Thumbnail;
pub use video::{InvalidVideoUrl, Video, VideoResponse, VideoUrl};
