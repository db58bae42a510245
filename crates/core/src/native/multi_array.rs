//! Native multi-dimensional array
//!
//! Dense, row-major, typed buffer with an explicit shape. The element type
//! is stored as the framework's raw data-type code so arrays coming back
//! from the inference engine with a type this binding does not know can
//! still be represented and rejected at conversion time.

use crate::error::{Error, Result};

/// Element types the bridge can marshal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArrayDataType {
    /// 64-bit IEEE-754 float
    Double,
    /// 32-bit IEEE-754 float
    Float32,
    /// 16-bit IEEE-754 float, stored as an opaque 2-byte payload
    Float16,
    /// 32-bit signed integer
    Int32,
}

impl ArrayDataType {
    pub const ALL: [ArrayDataType; 4] = [
        ArrayDataType::Double,
        ArrayDataType::Float32,
        ArrayDataType::Float16,
        ArrayDataType::Int32,
    ];

    /// Raw framework code (kind flag | bit width)
    pub const fn raw(self) -> u32 {
        match self {
            ArrayDataType::Double => 0x1_0000 | 64,
            ArrayDataType::Float32 => 0x1_0000 | 32,
            ArrayDataType::Float16 => 0x1_0000 | 16,
            ArrayDataType::Int32 => 0x2_0000 | 32,
        }
    }

    pub fn from_raw(raw: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|ty| ty.raw() == raw)
    }

    /// Get size in bytes for this data type
    pub const fn size_bytes(self) -> usize {
        match self {
            ArrayDataType::Double => 8,
            ArrayDataType::Float32 => 4,
            ArrayDataType::Float16 => 2,
            ArrayDataType::Int32 => 4,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            ArrayDataType::Double => "double",
            ArrayDataType::Float32 => "float32",
            ArrayDataType::Float16 => "float16",
            ArrayDataType::Int32 => "int32",
        }
    }
}

/// Number of elements described by `shape`, or `None` on overflow
pub fn element_count(shape: &[usize]) -> Option<usize> {
    shape
        .iter()
        .try_fold(1usize, |acc, &dim| acc.checked_mul(dim))
}

/// Expected byte length for `shape` at `item_size` bytes per element
pub(crate) fn expected_byte_len(shape: &[usize], item_size: usize) -> Result<usize> {
    element_count(shape)
        .and_then(|count| count.checked_mul(item_size))
        .ok_or_else(|| Error::UnsupportedValue(format!("shape {:?} overflows the address space", shape)))
}

/// Dense native array
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiArray {
    shape: Vec<usize>,
    data_type: u32,
    data: Vec<u8>,
}

impl MultiArray {
    /// Create an array, checking the buffer against `shape` and `data_type`
    pub fn new(shape: Vec<usize>, data_type: ArrayDataType, data: Vec<u8>) -> Result<Self> {
        let expected = expected_byte_len(&shape, data_type.size_bytes())?;
        if data.len() != expected {
            return Err(Error::ShapeMismatch {
                shape,
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            shape,
            data_type: data_type.raw(),
            data,
        })
    }

    /// Wrap an array produced by the inference engine
    ///
    /// The raw data-type code is taken as reported; it is validated when
    /// the array is converted.
    pub fn from_engine(shape: Vec<usize>, raw_data_type: u32, data: Vec<u8>) -> Self {
        Self {
            shape,
            data_type: raw_data_type,
            data,
        }
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn raw_data_type(&self) -> u32 {
        self.data_type
    }

    /// Declared element type, if it is one the bridge supports
    pub fn data_type(&self) -> Result<ArrayDataType> {
        ArrayDataType::from_raw(self.data_type).ok_or_else(|| {
            Error::UnsupportedElementType(format!("native data type {:#x}", self.data_type))
        })
    }

    /// Total element count (product of the shape)
    pub fn count(&self) -> usize {
        element_count(&self.shape).unwrap_or(usize::MAX)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_type_sizes() {
        assert_eq!(ArrayDataType::Double.size_bytes(), 8);
        assert_eq!(ArrayDataType::Float32.size_bytes(), 4);
        assert_eq!(ArrayDataType::Float16.size_bytes(), 2);
        assert_eq!(ArrayDataType::Int32.size_bytes(), 4);
    }

    #[test]
    fn test_raw_codes_round_trip() {
        for ty in ArrayDataType::ALL {
            assert_eq!(ArrayDataType::from_raw(ty.raw()), Some(ty));
        }
        assert_eq!(ArrayDataType::Float16.raw(), 65552);
        assert_eq!(ArrayDataType::from_raw(0x1_0000 | 8), None);
    }

    #[test]
    fn test_new_rejects_wrong_length() {
        let err = MultiArray::new(vec![2, 3], ArrayDataType::Float32, vec![0; 20]).unwrap_err();
        match err {
            Error::ShapeMismatch { expected, actual, .. } => {
                assert_eq!(expected, 24);
                assert_eq!(actual, 20);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_count() {
        let array = MultiArray::new(vec![2, 3, 4], ArrayDataType::Int32, vec![0; 96]).unwrap();
        assert_eq!(array.count(), 24);
    }

    #[test]
    fn test_engine_array_with_unknown_type() {
        let array = MultiArray::from_engine(vec![4], 0x1_0000 | 8, vec![0; 4]);
        assert!(matches!(
            array.data_type(),
            Err(Error::UnsupportedElementType(_))
        ));
    }

    #[test]
    fn test_scalar_shape() {
        let array = MultiArray::new(vec![], ArrayDataType::Double, vec![0; 8]).unwrap();
        assert_eq!(array.count(), 1);
    }
}
