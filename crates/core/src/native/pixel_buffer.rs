//! Native pixel buffers
//!
//! A pixel buffer is a reference-counted handle: cloning it hands out
//! another reference to the same pixels, and the storage is released when
//! the last handle drops.

use std::fmt;
use std::sync::Arc;

use crate::error::{Error, Result};

/// Pixel formats the native framework accepts for image features
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    /// Packed 32-bit B, G, R, A
    Bgra32,
    /// Packed 32-bit A, R, G, B
    Argb32,
    /// Single 8-bit luminance channel
    OneComponent8,
}

impl PixelFormat {
    pub const ALL: [PixelFormat; 3] = [
        PixelFormat::Bgra32,
        PixelFormat::Argb32,
        PixelFormat::OneComponent8,
    ];

    /// Four-character format code used by the framework
    pub const fn four_cc(self) -> u32 {
        match self {
            PixelFormat::Bgra32 => u32::from_be_bytes(*b"BGRA"),
            PixelFormat::Argb32 => 0x0000_0020,
            PixelFormat::OneComponent8 => u32::from_be_bytes(*b"L008"),
        }
    }

    pub fn from_four_cc(code: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|format| format.four_cc() == code)
    }

    pub const fn bytes_per_pixel(self) -> usize {
        match self {
            PixelFormat::Bgra32 | PixelFormat::Argb32 => 4,
            PixelFormat::OneComponent8 => 1,
        }
    }

    /// Calculate tightly packed buffer size in bytes, `None` on overflow
    pub fn buffer_size(&self, width: usize, height: usize) -> Option<usize> {
        width
            .checked_mul(height)?
            .checked_mul(self.bytes_per_pixel())
    }
}

/// Printable form of a four-character code
pub fn four_cc_name(code: u32) -> String {
    let bytes = code.to_be_bytes();
    if bytes.iter().all(|b| b.is_ascii_graphic()) {
        bytes.iter().map(|&b| b as char).collect()
    } else {
        format!("{:#010x}", code)
    }
}

#[derive(PartialEq, Eq)]
struct PixelData {
    width: usize,
    height: usize,
    format: u32,
    bytes_per_row: usize,
    data: Vec<u8>,
}

/// Reference-counted native pixel buffer
#[derive(Clone, PartialEq, Eq)]
pub struct PixelBuffer(Arc<PixelData>);

impl PixelBuffer {
    /// Create a tightly packed buffer in a supported format
    pub fn new(width: usize, height: usize, format: PixelFormat, data: Vec<u8>) -> Result<Self> {
        let bytes_per_row = width.checked_mul(format.bytes_per_pixel()).ok_or_else(|| {
            Error::UnsupportedValue(format!("{} pixels per row overflows the address space", width))
        })?;
        Self::with_layout(width, height, format.four_cc(), bytes_per_row, data)
    }

    /// Wrap a buffer with an explicit row stride and raw format code
    ///
    /// Used for buffers handed back by the inference engine, which may pad
    /// rows or use formats this binding does not decode.
    pub fn with_layout(
        width: usize,
        height: usize,
        format: u32,
        bytes_per_row: usize,
        data: Vec<u8>,
    ) -> Result<Self> {
        if let Some(known) = PixelFormat::from_four_cc(format) {
            let packed = width.checked_mul(known.bytes_per_pixel());
            if packed.map_or(true, |packed| bytes_per_row < packed) {
                return Err(Error::UnsupportedValue(format!(
                    "row stride {} is narrower than {} pixels of {}",
                    bytes_per_row,
                    width,
                    four_cc_name(format)
                )));
            }
        }
        let expected = bytes_per_row.checked_mul(height).ok_or_else(|| {
            Error::UnsupportedValue(format!(
                "{} rows of {} bytes overflow the address space",
                height, bytes_per_row
            ))
        })?;
        if data.len() != expected {
            return Err(Error::ShapeMismatch {
                shape: vec![height, width],
                expected,
                actual: data.len(),
            });
        }
        Ok(Self(Arc::new(PixelData {
            width,
            height,
            format,
            bytes_per_row,
            data,
        })))
    }

    pub fn width(&self) -> usize {
        self.0.width
    }

    pub fn height(&self) -> usize {
        self.0.height
    }

    pub fn bytes_per_row(&self) -> usize {
        self.0.bytes_per_row
    }

    pub fn format_code(&self) -> u32 {
        self.0.format
    }

    /// Decoded pixel format, if supported
    pub fn pixel_format(&self) -> Result<PixelFormat> {
        PixelFormat::from_four_cc(self.0.format)
            .ok_or_else(|| Error::UnsupportedPixelFormat(four_cc_name(self.0.format)))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0.data
    }

    /// Bytes of row `y`, including any row padding; `None` past the last row
    pub fn row(&self, y: usize) -> Option<&[u8]> {
        if y >= self.0.height {
            return None;
        }
        let start = y.checked_mul(self.0.bytes_per_row)?;
        self.0.data.get(start..start.checked_add(self.0.bytes_per_row)?)
    }

    /// Number of live handles to this buffer
    pub fn ref_count(&self) -> usize {
        Arc::strong_count(&self.0)
    }

    /// True when both handles refer to the same storage
    pub fn ptr_eq(&self, other: &PixelBuffer) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for PixelBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PixelBuffer")
            .field("width", &self.0.width)
            .field("height", &self.0.height)
            .field("format", &four_cc_name(self.0.format))
            .field("bytes_per_row", &self.0.bytes_per_row)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_format_buffer_size() {
        assert_eq!(PixelFormat::Bgra32.buffer_size(1280, 720), Some(3_686_400));
        assert_eq!(PixelFormat::OneComponent8.buffer_size(1280, 720), Some(921_600));
        assert_eq!(PixelFormat::Bgra32.buffer_size(usize::MAX / 2, 2), None);
    }

    #[test]
    fn test_four_cc_names() {
        assert_eq!(four_cc_name(PixelFormat::Bgra32.four_cc()), "BGRA");
        assert_eq!(four_cc_name(PixelFormat::OneComponent8.four_cc()), "L008");
        assert_eq!(four_cc_name(0x20), "0x00000020");
    }

    #[test]
    fn test_padded_rows() {
        let buffer = PixelBuffer::with_layout(
            2,
            2,
            PixelFormat::OneComponent8.four_cc(),
            4,
            vec![1, 2, 0, 0, 3, 4, 0, 0],
        )
        .unwrap();
        assert_eq!(buffer.row(1), Some(&[3, 4, 0, 0][..]));
        assert_eq!(buffer.row(2), None);
    }

    #[test]
    fn test_oversized_dimensions_rejected() {
        let huge = usize::MAX / 2 + 1;
        assert!(matches!(
            PixelBuffer::new(huge, 2, PixelFormat::OneComponent8, Vec::new()),
            Err(Error::UnsupportedValue(_))
        ));
        assert!(matches!(
            PixelBuffer::new(huge, 1, PixelFormat::Bgra32, Vec::new()),
            Err(Error::UnsupportedValue(_))
        ));
        assert!(matches!(
            PixelBuffer::with_layout(1, huge, PixelFormat::OneComponent8.four_cc(), 4, Vec::new()),
            Err(Error::UnsupportedValue(_))
        ));
    }

    #[test]
    fn test_unknown_format_reported() {
        let yuv = u32::from_be_bytes(*b"420v");
        let buffer = PixelBuffer::with_layout(2, 2, yuv, 2, vec![0; 4]).unwrap();
        match buffer.pixel_format() {
            Err(Error::UnsupportedPixelFormat(name)) => assert_eq!(name, "420v"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_clone_shares_storage() {
        let buffer = PixelBuffer::new(1, 1, PixelFormat::Bgra32, vec![0; 4]).unwrap();
        let other = buffer.clone();
        assert!(buffer.ptr_eq(&other));
        assert_eq!(buffer.ref_count(), 2);
        drop(other);
        assert_eq!(buffer.ref_count(), 1);
    }
}
