//! Scalar and array codec
//!
//! Moves numeric payloads between the runtime's arrays and native
//! multi-arrays. Element bytes are copied verbatim; nothing here widens,
//! narrows or rounds. Half-precision elements in particular are treated as
//! opaque 2-byte payloads.

use bytemuck::{Pod, Zeroable};

use crate::data::{DType, DynamicArray, DynamicValue, Element};
use crate::error::{Error, Result};
use crate::native::{expected_byte_len, ArrayDataType, FeatureValue, MultiArray, NativeNumber};

/// Raw IEEE-754 binary16 payload
///
/// Layout-compatible with the native framework's half type and with the
/// array ecosystem's `float16` dtype. No arithmetic is defined on it.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
pub struct Float16Bits(pub u16);

impl Float16Bits {
    pub const fn from_bits(bits: u16) -> Self {
        Self(bits)
    }

    pub const fn to_bits(self) -> u16 {
        self.0
    }
}

impl Element for Float16Bits {
    const DTYPE: DType = DType::Float16;
}

/// Element type advertised to a host array system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementDescriptor {
    /// Dtype name as the host knows it
    pub name: &'static str,
    /// Size of one element in bytes
    pub byte_width: usize,
    /// Buffer-protocol format string
    pub format: &'static str,
    /// Host type number
    pub type_num: i32,
}

/// Descriptor for the native half-precision layout
pub const FLOAT16_DESCRIPTOR: ElementDescriptor = ElementDescriptor {
    name: "float16",
    byte_width: 2,
    format: "e",
    type_num: 23,
};

/// Element types a host must know before arrays can round-trip
pub const ELEMENT_DESCRIPTORS: &[ElementDescriptor] = &[FLOAT16_DESCRIPTOR];

/// An array system that can be told about custom element types
pub trait ElementTypeHost {
    /// Make `descriptor` available as a first-class element type
    fn register_element_type(&mut self, descriptor: &ElementDescriptor) -> Result<()>;
}

/// Advertise every custom element type to `host`
///
/// Called once when a binding starts up.
pub fn register_element_types(host: &mut dyn ElementTypeHost) -> Result<()> {
    for descriptor in ELEMENT_DESCRIPTORS {
        host.register_element_type(descriptor)?;
        tracing::debug!(
            name = descriptor.name,
            format = descriptor.format,
            byte_width = descriptor.byte_width,
            "Registered element type"
        );
    }
    Ok(())
}

/// Native element type for a runtime dtype
pub fn element_type_for(dtype: DType) -> Result<ArrayDataType> {
    match dtype {
        DType::Float64 => Ok(ArrayDataType::Double),
        DType::Float32 => Ok(ArrayDataType::Float32),
        DType::Float16 => Ok(ArrayDataType::Float16),
        DType::Int32 => Ok(ArrayDataType::Int32),
        other => Err(Error::UnsupportedElementType(other.name().to_string())),
    }
}

/// Runtime dtype for a native element type
pub const fn dtype_for(data_type: ArrayDataType) -> DType {
    match data_type {
        ArrayDataType::Double => DType::Float64,
        ArrayDataType::Float32 => DType::Float32,
        ArrayDataType::Float16 => DType::Float16,
        ArrayDataType::Int32 => DType::Int32,
    }
}

/// Build a native array from a shape, element type and raw row-major bytes
pub fn array_to_native(
    shape: &[usize],
    data_type: ArrayDataType,
    raw: &[u8],
) -> Result<MultiArray> {
    MultiArray::new(shape.to_vec(), data_type, raw.to_vec())
}

/// Copy a native array out as `(shape, element type, raw bytes)`
pub fn native_to_array(array: &MultiArray) -> Result<(Vec<usize>, ArrayDataType, Vec<u8>)> {
    let data_type = array.data_type()?;
    let expected = expected_byte_len(array.shape(), data_type.size_bytes())?;
    if array.as_bytes().len() != expected {
        return Err(Error::ShapeMismatch {
            shape: array.shape().to_vec(),
            expected,
            actual: array.as_bytes().len(),
        });
    }
    Ok((array.shape().to_vec(), data_type, array.as_bytes().to_vec()))
}

/// Runtime array to native array
pub fn dynamic_array_to_native(array: &DynamicArray) -> Result<MultiArray> {
    let data_type = element_type_for(array.dtype())?;
    array_to_native(array.shape(), data_type, array.as_bytes())
}

/// Native array to runtime array
pub fn array_to_dynamic(array: &MultiArray) -> Result<DynamicValue> {
    let (shape, data_type, raw) = native_to_array(array)?;
    Ok(DynamicValue::Array(DynamicArray::new(
        shape,
        dtype_for(data_type),
        raw,
    )?))
}

/// Runtime scalar to native scalar feature
///
/// Booleans become integers, as the runtime treats them as such.
pub fn scalar_to_native(value: &DynamicValue) -> Result<FeatureValue> {
    match value {
        DynamicValue::Bool(v) => Ok(FeatureValue::Int64(i64::from(*v))),
        DynamicValue::Int(v) => Ok(FeatureValue::Int64(*v)),
        DynamicValue::Float(v) => Ok(FeatureValue::Double(*v)),
        other => Err(Error::UnsupportedValue(format!(
            "expected a number, got {}",
            other.type_name()
        ))),
    }
}

/// Runtime number to native number
pub fn number_to_native(value: &DynamicValue) -> Result<NativeNumber> {
    match scalar_to_native(value)? {
        FeatureValue::Int64(v) => Ok(NativeNumber::Int64(v)),
        FeatureValue::Double(v) => Ok(NativeNumber::Double(v)),
        _ => Err(Error::UnsupportedValue(value.type_name().to_string())),
    }
}

pub fn number_to_dynamic(number: NativeNumber) -> DynamicValue {
    match number {
        NativeNumber::Int64(v) => DynamicValue::Int(v),
        NativeNumber::Double(v) => DynamicValue::Float(v),
    }
}

/// Shape as a list of native numbers
///
/// Fails on a dimension the native 64-bit integer cannot hold.
pub fn shape_to_native(shape: &[usize]) -> Result<Vec<NativeNumber>> {
    shape
        .iter()
        .map(|&dim| {
            i64::try_from(dim)
                .map(NativeNumber::Int64)
                .map_err(|_| Error::UnsupportedValue(format!("dimension {} exceeds int64", dim)))
        })
        .collect()
}

/// Shape from a list of native numbers
///
/// Every entry must be a non-negative integer; integral doubles are accepted.
pub fn shape_from_native(dims: &[NativeNumber]) -> Result<Vec<usize>> {
    dims.iter()
        .map(|&dim| {
            let value = match dim {
                NativeNumber::Int64(v) => usize::try_from(v).ok(),
                NativeNumber::Double(v) if v.is_finite() && v >= 0.0 && v.fract() == 0.0 => {
                    Some(v as usize)
                }
                NativeNumber::Double(_) => None,
            };
            value.ok_or_else(|| Error::UnsupportedValue(format!("invalid dimension {:?}", dim)))
        })
        .collect()
}

/// Reinterpret raw bytes as typed elements of `T`
pub fn elements_from_bytes<T: Pod>(raw: &[u8]) -> Result<Vec<T>> {
    let width = std::mem::size_of::<T>();
    if width == 0 || raw.len() % width != 0 {
        return Err(Error::UnsupportedValue(format!(
            "{} bytes is not a whole number of {}-byte elements",
            raw.len(),
            width
        )));
    }
    let mut elements = vec![T::zeroed(); raw.len() / width];
    bytemuck::cast_slice_mut::<T, u8>(&mut elements).copy_from_slice(raw);
    Ok(elements)
}
