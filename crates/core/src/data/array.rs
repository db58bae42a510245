//! Dynamic numeric arrays
//!
//! The scripting runtime's numeric-array view: a row-major byte buffer
//! tagged with shape and dtype. Dtypes follow the array ecosystem's naming
//! and struct-module format characters.

use bytemuck::Pod;
use ndarray::{ArrayD, ArrayViewD, IxDyn};

use crate::error::{Error, Result};
use crate::native::expected_byte_len;

/// Element dtypes the runtime can hand us
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DType {
    Bool,
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Float16,
    Float32,
    Float64,
}

impl DType {
    pub const ALL: [DType; 12] = [
        DType::Bool,
        DType::Int8,
        DType::Int16,
        DType::Int32,
        DType::Int64,
        DType::UInt8,
        DType::UInt16,
        DType::UInt32,
        DType::UInt64,
        DType::Float16,
        DType::Float32,
        DType::Float64,
    ];

    pub const fn item_size(self) -> usize {
        match self {
            DType::Bool | DType::Int8 | DType::UInt8 => 1,
            DType::Int16 | DType::UInt16 | DType::Float16 => 2,
            DType::Int32 | DType::UInt32 | DType::Float32 => 4,
            DType::Int64 | DType::UInt64 | DType::Float64 => 8,
        }
    }

    /// Dtype name (e.g., "float16", "int32")
    pub const fn name(self) -> &'static str {
        match self {
            DType::Bool => "bool",
            DType::Int8 => "int8",
            DType::Int16 => "int16",
            DType::Int32 => "int32",
            DType::Int64 => "int64",
            DType::UInt8 => "uint8",
            DType::UInt16 => "uint16",
            DType::UInt32 => "uint32",
            DType::UInt64 => "uint64",
            DType::Float16 => "float16",
            DType::Float32 => "float32",
            DType::Float64 => "float64",
        }
    }

    /// Buffer-protocol format character
    pub const fn format(self) -> char {
        match self {
            DType::Bool => '?',
            DType::Int8 => 'b',
            DType::Int16 => 'h',
            DType::Int32 => 'i',
            DType::Int64 => 'q',
            DType::UInt8 => 'B',
            DType::UInt16 => 'H',
            DType::UInt32 => 'I',
            DType::UInt64 => 'Q',
            DType::Float16 => 'e',
            DType::Float32 => 'f',
            DType::Float64 => 'd',
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|dtype| dtype.name() == name)
    }

    pub fn from_format(format: char) -> Option<Self> {
        Self::ALL.into_iter().find(|dtype| dtype.format() == format)
    }
}

/// Rust element types with a fixed dtype
pub trait Element: Pod {
    const DTYPE: DType;
}

macro_rules! impl_element {
    ($($ty:ty => $dtype:ident),* $(,)?) => {
        $(impl Element for $ty {
            const DTYPE: DType = DType::$dtype;
        })*
    };
}

impl_element! {
    i8 => Int8,
    i16 => Int16,
    i32 => Int32,
    i64 => Int64,
    u8 => UInt8,
    u16 => UInt16,
    u32 => UInt32,
    u64 => UInt64,
    f32 => Float32,
    f64 => Float64,
}

/// Copy raw bytes into a freshly aligned element vector
fn collect_elements<T: Pod>(bytes: &[u8]) -> Vec<T> {
    let mut elements = vec![T::zeroed(); bytes.len() / std::mem::size_of::<T>()];
    bytemuck::cast_slice_mut::<T, u8>(&mut elements).copy_from_slice(bytes);
    elements
}

/// Homogeneous numeric array as the runtime sees it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DynamicArray {
    shape: Vec<usize>,
    dtype: DType,
    data: Vec<u8>,
}

impl DynamicArray {
    /// Create an array from raw row-major bytes
    pub fn new(shape: Vec<usize>, dtype: DType, data: Vec<u8>) -> Result<Self> {
        let expected = expected_byte_len(&shape, dtype.item_size())?;
        if data.len() != expected {
            return Err(Error::ShapeMismatch {
                shape,
                expected,
                actual: data.len(),
            });
        }
        Ok(Self { shape, dtype, data })
    }

    /// Create an array from typed row-major elements
    pub fn from_elements<T: Element>(shape: Vec<usize>, elements: &[T]) -> Result<Self> {
        Self::new(shape, T::DTYPE, bytemuck::cast_slice(elements).to_vec())
    }

    /// Copy an ndarray view in logical (row-major) order
    pub fn from_ndarray<T: Element>(array: ArrayViewD<'_, T>) -> Self {
        let elements: Vec<T> = array.iter().copied().collect();
        Self {
            shape: array.shape().to_vec(),
            dtype: T::DTYPE,
            data: bytemuck::cast_slice(&elements).to_vec(),
        }
    }

    /// Copy the array out as an owned ndarray of `T`
    pub fn to_ndarray<T: Element>(&self) -> Result<ArrayD<T>> {
        if self.dtype != T::DTYPE {
            return Err(Error::UnsupportedElementType(format!(
                "array holds {}, requested {}",
                self.dtype.name(),
                T::DTYPE.name()
            )));
        }
        let elements: Vec<T> = collect_elements(&self.data);
        ArrayD::from_shape_vec(IxDyn(&self.shape), elements)
            .map_err(|e| Error::UnsupportedValue(format!("array shape {:?}: {}", self.shape, e)))
    }

    /// Typed copy of the elements
    pub fn to_vec<T: Element>(&self) -> Result<Vec<T>> {
        if self.dtype != T::DTYPE {
            return Err(Error::UnsupportedElementType(format!(
                "array holds {}, requested {}",
                self.dtype.name(),
                T::DTYPE.name()
            )));
        }
        Ok(collect_elements(&self.data))
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn dtype(&self) -> DType {
        self.dtype
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        self.data.len() / self.dtype.item_size()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_parts(self) -> (Vec<usize>, DType, Vec<u8>) {
        (self.shape, self.dtype, self.data)
    }
}
