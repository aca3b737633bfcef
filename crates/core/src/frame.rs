//! Decoded visualizer frames and overlay coordinate mapping.

use std::io::Cursor;

use image::{ImageFormat, ImageReader};
use tether_protocol::FrameEncoding;

fn image_format(encoding: FrameEncoding) -> ImageFormat {
    match encoding {
        FrameEncoding::Png => ImageFormat::Png,
        FrameEncoding::Jpeg => ImageFormat::Jpeg,
    }
}

/// A frame the agent sent, with its native pixel extent read from the
/// image header.
///
/// Action points arrive in the frame's native pixel space; the native
/// extent is what converts them into render-size-independent
/// percentages.
#[derive(Debug, Clone)]
pub struct Frame {
    pub encoding: FrameEncoding,
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl Frame {
    /// Probe the image header for its dimensions. Returns `None` when
    /// the bytes do not parse as the declared encoding or have a zero
    /// extent.
    pub fn decode(encoding: FrameEncoding, bytes: Vec<u8>) -> Option<Self> {
        let (width, height) = ImageReader::with_format(Cursor::new(&bytes), image_format(encoding))
            .into_dimensions()
            .ok()?;
        if width == 0 || height == 0 {
            return None;
        }
        Some(Self {
            encoding,
            bytes,
            width,
            height,
        })
    }

    /// Map a native-pixel coordinate to percentages of this frame's
    /// extent, so the marker lands on the same feature at any render
    /// size.
    pub fn overlay_percent(&self, x: f64, y: f64) -> (f64, f64) {
        (
            x / self.width as f64 * 100.0,
            y / self.height as f64 * 100.0,
        )
    }
}
