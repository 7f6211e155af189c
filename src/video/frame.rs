use std::borrow::Cow;
use std::sync::Arc;

use image::imageops::{self, FilterType};

use parking_lot::Mutex;

pub const PLACEHOLDER_SIZE: u32 = 2;
const PLACEHOLDER_PIXEL: [u8; 4] = [24, 24, 28, 255];

/// One decoded RGBA8 image, rows tightly packed top to bottom.
#[derive(Clone, Debug, PartialEq)]
pub struct VideoFrame {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
    /// Increases with every published frame. The placeholder is 0.
    pub sequence: u64,
}

impl VideoFrame {
    pub fn placeholder() -> Self {
        let pixels = (PLACEHOLDER_SIZE * PLACEHOLDER_SIZE) as usize;
        Self {
            width: PLACEHOLDER_SIZE,
            height: PLACEHOLDER_SIZE,
            rgba: PLACEHOLDER_PIXEL.repeat(pixels),
            sequence: 0,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.sequence == 0
    }

    pub fn bytes_per_row(&self) -> u32 {
        self.width * 4
    }

    /// Downscales, keeping the aspect ratio, until neither side exceeds
    /// `max_dimension`. Frames that already fit are borrowed unchanged.
    pub fn fit_within(&self, max_dimension: u32) -> Cow<'_, VideoFrame> {
        let longest = self.width.max(self.height);
        if longest <= max_dimension {
            return Cow::Borrowed(self);
        }

        let scale = max_dimension as f64 / longest as f64;
        let width = ((self.width as f64 * scale).round() as u32).clamp(1, max_dimension);
        let height = ((self.height as f64 * scale).round() as u32).clamp(1, max_dimension);

        let Some(image) = image::RgbaImage::from_raw(self.width, self.height, self.rgba.clone())
        else {
            log::warn!(
                "frame {}x{} has {} bytes, showing placeholder",
                self.width,
                self.height,
                self.rgba.len()
            );
            return Cow::Owned(Self::placeholder());
        };

        log::warn!(
            "frame {}x{} exceeds texture limit {max_dimension}, downscaling to {width}x{height}",
            self.width,
            self.height
        );
        let resized = imageops::resize(&image, width, height, FilterType::Triangle);
        Cow::Owned(Self {
            width,
            height,
            rgba: resized.into_raw(),
            sequence: self.sequence,
        })
    }
}

impl Default for VideoFrame {
    fn default() -> Self {
        Self::placeholder()
    }
}

/// Most-recent-value slot shared between a producer and the render thread.
#[derive(Clone)]
pub struct LatestFrame {
    inner: Arc<Mutex<Arc<VideoFrame>>>,
}

impl Default for LatestFrame {
    fn default() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Arc::new(VideoFrame::placeholder()))),
        }
    }
}

impl LatestFrame {
    pub fn publish(&self, frame: VideoFrame) {
        *self.inner.lock() = Arc::new(frame);
    }

    pub fn get(&self) -> Arc<VideoFrame> {
        Arc::clone(&self.inner.lock())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_is_packed_rgba() {
        let frame = VideoFrame::placeholder();
        assert!(frame.is_placeholder());
        assert_eq!(
            frame.rgba.len(),
            (frame.bytes_per_row() * frame.height) as usize
        );
    }

    #[test]
    fn latest_frame_starts_with_placeholder_and_replaces() {
        let slot = LatestFrame::default();
        assert!(slot.get().is_placeholder());

        let reader = slot.clone();
        slot.publish(VideoFrame {
            width: 1,
            height: 1,
            rgba: vec![1, 2, 3, 4],
            sequence: 7,
        });
        slot.publish(VideoFrame {
            width: 1,
            height: 1,
            rgba: vec![5, 6, 7, 8],
            sequence: 8,
        });

        let frame = reader.get();
        assert_eq!(frame.sequence, 8);
        assert_eq!(frame.rgba, vec![5, 6, 7, 8]);
    }

    #[test]
    fn oversized_frame_is_downscaled_to_limit() {
        let frame = VideoFrame {
            width: 100,
            height: 10,
            rgba: vec![200; 100 * 10 * 4],
            sequence: 3,
        };
        let fitted = frame.fit_within(32);
        assert!(matches!(fitted, Cow::Owned(_)));
        assert_eq!((fitted.width, fitted.height), (32, 3));
        assert_eq!(fitted.rgba.len(), 32 * 3 * 4);
        assert_eq!(fitted.sequence, 3);
        assert!(fitted.rgba.iter().all(|&c| c == 200));
    }

    #[test]
    fn frame_within_limit_is_borrowed() {
        let frame = VideoFrame::placeholder();
        assert!(matches!(frame.fit_within(8192), Cow::Borrowed(_)));

        let thin = VideoFrame {
            width: 10_000,
            height: 1,
            rgba: vec![0; 10_000 * 4],
            sequence: 1,
        };
        let fitted = thin.fit_within(8192);
        assert_eq!((fitted.width, fitted.height), (8192, 1));
    }

    #[test]
    fn malformed_oversized_frame_falls_back_to_placeholder() {
        let frame = VideoFrame {
            width: 64,
            height: 64,
            rgba: vec![0; 16],
            sequence: 5,
        };
        assert!(frame.fit_within(16).is_placeholder());
    }
}
