use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam::channel::{self, Receiver, RecvTimeoutError, Sender};

use crate::video::frame::{LatestFrame, VideoFrame};
use crate::video::VideoFrameSource;

pub enum CaptureCommand {
    Stop,
}

/// Stand-in camera that renders a moving test pattern on its own thread.
pub struct SyntheticCamera {
    tx_cmd: Sender<CaptureCommand>,
    latest: LatestFrame,
    thread_handle: Option<JoinHandle<()>>,
}

impl SyntheticCamera {
    pub fn new(width: u32, height: u32, fps: u32) -> Self {
        let (tx_cmd, rx_cmd) = channel::unbounded::<CaptureCommand>();
        let latest = LatestFrame::default();
        let latest_clone = latest.clone();
        let interval = Duration::from_secs_f64(1.0 / fps.max(1) as f64);

        let thread_handle = thread::spawn(move || {
            capture_thread(rx_cmd, latest_clone, width, height, interval);
        });

        log::info!("synthetic camera started: {width}x{height} @ {fps} fps");

        Self {
            tx_cmd,
            latest,
            thread_handle: Some(thread_handle),
        }
    }

    pub fn stop(&self) {
        let _ = self.tx_cmd.send(CaptureCommand::Stop);
    }
}

impl VideoFrameSource for SyntheticCamera {
    fn current_frame(&self) -> std::sync::Arc<VideoFrame> {
        self.latest.get()
    }
}

impl Drop for SyntheticCamera {
    fn drop(&mut self) {
        self.stop();
        if let Some(handle) = self.thread_handle.take() {
            let _ = handle.join();
        }
        log::info!("synthetic camera stopped");
    }
}

fn capture_thread(
    rx_cmd: Receiver<CaptureCommand>,
    latest: LatestFrame,
    width: u32,
    height: u32,
    interval: Duration,
) {
    let mut sequence = 1;
    loop {
        latest.publish(test_pattern(width, height, sequence));
        sequence += 1;

        match rx_cmd.recv_timeout(interval) {
            Ok(CaptureCommand::Stop) | Err(RecvTimeoutError::Disconnected) => return,
            Err(RecvTimeoutError::Timeout) => {}
        }
    }
}

/// Diagonal colour bands drifting one pixel per frame over a vignette.
pub fn test_pattern(width: u32, height: u32, sequence: u64) -> VideoFrame {
    let mut rgba = Vec::with_capacity((width * height * 4) as usize);
    let cx = width as f32 / 2.0;
    let cy = height as f32 / 2.0;
    let max_dist = (cx * cx + cy * cy).sqrt().max(1.0);

    for y in 0..height {
        for x in 0..width {
            let band = ((x + y) as u64 + sequence) % 96;
            let (r, g, b) = match band / 32 {
                0 => (90, 60, 40),
                1 => (40, 80, 70),
                _ => (60, 50, 90),
            };

            let dx = x as f32 - cx;
            let dy = y as f32 - cy;
            let shade = 1.0 - 0.6 * ((dx * dx + dy * dy).sqrt() / max_dist);

            rgba.extend_from_slice(&[
                (r as f32 * shade) as u8,
                (g as f32 * shade) as u8,
                (b as f32 * shade) as u8,
                255,
            ]);
        }
    }

    VideoFrame {
        width,
        height,
        rgba,
        sequence,
    }
}
