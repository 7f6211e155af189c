use std::path::Path;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::video::VideoFrameSource;
use crate::video::frame::VideoFrame;

/// Decodes an image file into an RGBA8 frame.
pub fn load_rgba(path: &Path, sequence: u64) -> Result<VideoFrame> {
    let image = image::open(path)
        .map_err(|source| Error::Image {
            path: path.to_path_buf(),
            source,
        })?
        .into_rgba8();

    Ok(VideoFrame {
        width: image.width(),
        height: image.height(),
        rgba: image.into_raw(),
        sequence,
    })
}

/// Background that never changes after loading.
pub struct StillImageSource {
    frame: Arc<VideoFrame>,
}

impl StillImageSource {
    pub fn open(path: &Path) -> Result<Self> {
        let frame = load_rgba(path, 1)?;
        log::info!(
            "still background {}: {}x{}",
            path.display(),
            frame.width,
            frame.height
        );
        Ok(Self {
            frame: Arc::new(frame),
        })
    }
}

impl VideoFrameSource for StillImageSource {
    fn current_frame(&self) -> Arc<VideoFrame> {
        Arc::clone(&self.frame)
    }
}
