pub mod aspect;
pub mod faststart;
pub mod probe;

pub use aspect::classify;
pub use faststart::{FastStartRewriter, FfmpegFastStart};
pub use probe::{FfprobeInspector, MediaInspector, VideoDimensions};
