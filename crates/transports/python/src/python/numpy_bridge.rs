//! Numpy array marshaling
//!
//! Arrays cross the boundary as raw row-major bytes plus shape and dtype
//! name. Float16 arrays take a typed path through `half::f16`, which numpy
//! knows as its native `float16` ("e") dtype; the payload bits are copied
//! without conversion in both directions.

use featurebridge_core::codec::elements_from_bytes;
use featurebridge_core::{
    DType, DynamicArray, ElementDescriptor, ElementTypeHost, Error, Float16Bits,
};
use half::f16;
use numpy::{
    PyArray1, PyArrayDescrMethods, PyArrayDyn, PyArrayMethods, PyUntypedArray,
    PyUntypedArrayMethods,
};
use pyo3::prelude::*;
use pyo3::types::PyBytes;

use super::errors::to_py_err;

/// Check if a Python object is a numpy array
///
/// Returns false when numpy cannot be imported; the array API is never
/// touched in that case.
pub fn is_numpy_array(py: Python<'_>, obj: &Bound<'_, PyAny>) -> bool {
    py.import("numpy").is_ok() && obj.downcast::<PyUntypedArray>().is_ok()
}

/// Copy a numpy array into a dynamic array
///
/// Non-contiguous and non-native-byte-order arrays are normalized to
/// C order, native byte order first.
pub fn numpy_to_dynamic(py: Python<'_>, obj: &Bound<'_, PyAny>) -> PyResult<DynamicArray> {
    let array = obj.downcast::<PyUntypedArray>()?;
    let shape = array.shape().to_vec();
    let name: String = array.dtype().getattr("name")?.extract()?;
    let dtype = DType::from_name(&name)
        .ok_or_else(|| to_py_err(py, Error::UnsupportedElementType(name.clone())))?;

    if dtype == DType::Float16 {
        if let Ok(typed) = obj.downcast::<PyArrayDyn<f16>>() {
            let readonly = typed.readonly();
            let bits: Vec<Float16Bits> = readonly
                .as_array()
                .iter()
                .map(|v| Float16Bits::from_bits(v.to_bits()))
                .collect();
            return DynamicArray::from_elements(shape, &bits).map_err(|e| to_py_err(py, e));
        }
    }

    let numpy = py.import("numpy")?;
    let contiguous = numpy.call_method1("ascontiguousarray", (obj, name.as_str()))?;
    let bytes = contiguous.call_method0("tobytes")?;
    let raw = bytes.downcast::<PyBytes>()?.as_bytes().to_vec();

    tracing::trace!(dtype = %name, shape = ?shape, "Copied numpy array");
    DynamicArray::new(shape, dtype, raw).map_err(|e| to_py_err(py, e))
}

/// Create a new numpy array holding a copy of `array`
pub fn dynamic_to_numpy<'py>(py: Python<'py>, array: &DynamicArray) -> PyResult<Bound<'py, PyAny>> {
    let numpy = py.import("numpy")?;

    if array.dtype() == DType::Float16 {
        let values: Vec<f16> = elements_from_bytes::<Float16Bits>(array.as_bytes())
            .map_err(|e| to_py_err(py, e))?
            .into_iter()
            .map(|bits| f16::from_bits(bits.to_bits()))
            .collect();
        let flat = PyArray1::from_vec(py, values);
        return Ok(flat.reshape(array.shape())?.into_any());
    }

    // numpy.frombuffer(bytes, dtype=dtype).reshape(shape).copy()
    let bytes = PyBytes::new(py, array.as_bytes());
    let flat = numpy.call_method1("frombuffer", (bytes, array.dtype().name()))?;
    let shaped = flat.call_method1("reshape", (array.shape().to_vec(),))?;
    shaped.call_method0("copy")
}

/// Numpy as an element-type host
///
/// Numpy ships `float16` natively, so registration checks that its
/// descriptor matches the native half layout instead of installing one.
pub struct NumpyElementHost<'py> {
    py: Python<'py>,
}

impl<'py> NumpyElementHost<'py> {
    pub fn new(py: Python<'py>) -> Self {
        Self { py }
    }
}

impl ElementTypeHost for NumpyElementHost<'_> {
    fn register_element_type(&mut self, descriptor: &ElementDescriptor) -> featurebridge_core::Result<()> {
        self.py
            .import("numpy")
            .map_err(|e| Error::UnsupportedElementType(format!("numpy unavailable: {}", e)))?;

        let descr = match descriptor.name {
            "float16" => numpy::dtype::<f16>(self.py),
            other => {
                return Err(Error::UnsupportedElementType(format!(
                    "numpy has no builtin dtype for {}",
                    other
                )))
            }
        };

        let format = char::from(descr.char()).to_string();
        if descr.itemsize() != descriptor.byte_width
            || format != descriptor.format
            || descr.num() != descriptor.type_num
        {
            return Err(Error::UnsupportedElementType(format!(
                "numpy {} is {} bytes, format {:?}, type {}; expected {} bytes, format {:?}, type {}",
                descriptor.name,
                descr.itemsize(),
                format,
                descr.num(),
                descriptor.byte_width,
                descriptor.format,
                descriptor.type_num
            )));
        }
        Ok(())
    }
}
