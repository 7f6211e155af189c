pub mod frame;
pub mod still;
pub mod synthetic;

use std::sync::Arc;

pub use frame::VideoFrame;
pub use still::StillImageSource;
pub use synthetic::SyntheticCamera;

use crate::config::{Args, VideoSourceKind};
use crate::error::Result;

/// Anything that can hand the renderer its most recent frame.
///
/// Implementations return a placeholder until real pixels are available.
pub trait VideoFrameSource {
    fn current_frame(&self) -> Arc<VideoFrame>;
}

/// Source that only ever shows the placeholder.
#[derive(Default)]
pub struct PlaceholderSource {
    frame: Arc<VideoFrame>,
}

impl VideoFrameSource for PlaceholderSource {
    fn current_frame(&self) -> Arc<VideoFrame> {
        Arc::clone(&self.frame)
    }
}

const SYNTHETIC_WIDTH: u32 = 320;
const SYNTHETIC_HEIGHT: u32 = 240;
const SYNTHETIC_FPS: u32 = 30;

pub fn open_source(args: &Args) -> Result<Box<dyn VideoFrameSource>> {
    if let Some(path) = &args.video_image {
        return Ok(Box::new(StillImageSource::open(path)?));
    }

    Ok(match args.video {
        VideoSourceKind::Synthetic => Box::new(SyntheticCamera::new(
            SYNTHETIC_WIDTH,
            SYNTHETIC_HEIGHT,
            SYNTHETIC_FPS,
        )),
        VideoSourceKind::Placeholder => {
            log::info!("video background disabled, using placeholder frame");
            Box::new(PlaceholderSource::default())
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn placeholder_source_never_advances() {
        let source = PlaceholderSource::default();
        assert!(source.current_frame().is_placeholder());
        assert!(source.current_frame().is_placeholder());
    }

    #[test]
    fn open_source_honours_kind() {
        let args = Args::try_parse_from(["anaglyph-surface", "--video", "placeholder"]).unwrap();
        let source = open_source(&args).unwrap();
        assert!(source.current_frame().is_placeholder());
    }

    #[test]
    fn open_source_reports_missing_still_image() {
        let args = Args::try_parse_from([
            "anaglyph-surface",
            "--video-image",
            "/nonexistent/frame.jpg",
        ])
        .unwrap();
        assert!(open_source(&args).is_err());
    }
}
