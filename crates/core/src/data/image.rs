//! Dynamic images
//!
//! Images as the runtime's imaging library exposes them: a mode string
//! ("RGB", "RGBA", "L", ...), a size, and packed row-major pixel bytes.

use crate::error::{Error, Result};

/// Channel count for modes the bridge understands
pub fn channels_for_mode(mode: &str) -> Option<usize> {
    match mode {
        "L" => Some(1),
        "RGB" => Some(3),
        "RGBA" => Some(4),
        _ => None,
    }
}

/// Packed image buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DynamicImage {
    mode: String,
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl DynamicImage {
    /// Create an image; the buffer length is checked for known modes only
    pub fn new(mode: impl Into<String>, width: usize, height: usize, data: Vec<u8>) -> Result<Self> {
        let mode = mode.into();
        if let Some(channels) = channels_for_mode(&mode) {
            let expected = width
                .checked_mul(height)
                .and_then(|pixels| pixels.checked_mul(channels))
                .ok_or_else(|| {
                    Error::UnsupportedValue(format!(
                        "{}x{} {} image overflows the address space",
                        width, height, mode
                    ))
                })?;
            if data.len() != expected {
                return Err(Error::ShapeMismatch {
                    shape: vec![height, width, channels],
                    expected,
                    actual: data.len(),
                });
            }
        }
        Ok(Self {
            mode,
            width,
            height,
            data,
        })
    }

    pub fn mode(&self) -> &str {
        &self.mode
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }
}
