//! Data marshaling between Python objects and dynamic values.
//!
//! This module provides conversion functions for:
//! - Python objects → `DynamicValue`
//! - `DynamicValue` → Python objects

use featurebridge_core::{DynamicImage, DynamicMap, DynamicStr, DynamicValue, Error};
use pyo3::intern;
use pyo3::prelude::*;
use pyo3::types::{PyBool, PyBytes, PyDict, PyFloat, PyInt, PyList, PyString, PyTuple};
use pyo3::IntoPyObjectExt;

use super::errors::{feature_py_err, to_py_err};
use super::numpy_bridge::{dynamic_to_numpy, is_numpy_array, numpy_to_dynamic};

/// Convert a Python object to a dynamic value
///
/// Supports:
/// - None → None
/// - bool → Bool
/// - numpy.ndarray → Array
/// - int, numpy integer → Int
/// - float, numpy floating → Float
/// - str → Str (kept in encoded form; validated on conversion)
/// - dict → Dict
/// - list, tuple → List
/// - PIL.Image.Image → Image
///
/// Anything else becomes an opaque value carrying its type name, which
/// the converter rejects with the name in the message.
pub fn py_to_dynamic(py: Python<'_>, obj: &Bound<'_, PyAny>) -> PyResult<DynamicValue> {
    if obj.is_none() {
        return Ok(DynamicValue::None);
    }

    // Boolean (check before int, as bool is subclass of int in Python)
    if let Ok(val) = obj.downcast::<PyBool>() {
        return Ok(DynamicValue::Bool(val.is_true()));
    }

    // Numpy array (check before scalars: size-1 arrays convert to numbers)
    if is_numpy_array(py, obj) {
        return numpy_to_dynamic(py, obj).map(DynamicValue::Array);
    }

    if obj.downcast::<PyInt>().is_ok() {
        return Ok(DynamicValue::Int(obj.extract::<i64>()?));
    }

    if let Ok(val) = obj.downcast::<PyFloat>() {
        return Ok(DynamicValue::Float(val.value()));
    }

    if let Ok(val) = obj.downcast::<PyString>() {
        return Ok(DynamicValue::Str(py_str_to_dynamic(py, val)?));
    }

    if let Ok(dict) = obj.downcast::<PyDict>() {
        let mut entries = Vec::with_capacity(dict.len());
        for (key, value) in dict.iter() {
            entries.push((py_to_dynamic(py, &key)?, py_to_dynamic(py, &value)?));
        }
        return Ok(DynamicValue::Dict(entries));
    }

    if let Ok(list) = obj.downcast::<PyList>() {
        let mut items = Vec::with_capacity(list.len());
        for item in list.iter() {
            items.push(py_to_dynamic(py, &item)?);
        }
        return Ok(DynamicValue::List(items));
    }

    if let Ok(tuple) = obj.downcast::<PyTuple>() {
        let mut items = Vec::with_capacity(tuple.len());
        for item in tuple.iter() {
            items.push(py_to_dynamic(py, &item)?);
        }
        return Ok(DynamicValue::List(items));
    }

    if let Some(value) = numpy_scalar_to_dynamic(py, obj)? {
        return Ok(value);
    }

    if is_pil_image(py, obj)? {
        return pil_to_dynamic(py, obj).map(DynamicValue::Image);
    }

    let type_name = obj.get_type().name()?.to_string();
    tracing::debug!("Unsupported Python object encountered: {}", type_name);
    Ok(DynamicValue::Opaque { type_name })
}

/// Convert a `{str: value}` dict into a dynamic map
///
/// A value that cannot be read raises `FeatureConversionError` naming its
/// key, with the underlying exception as `__cause__`.
pub fn py_dict_to_map(py: Python<'_>, dict: &Bound<'_, PyDict>) -> PyResult<DynamicMap> {
    let mut map = DynamicMap::new();
    for (key, value) in dict.iter() {
        let name = key.extract::<String>()?;
        let value = py_to_dynamic(py, &value).map_err(|e| {
            tracing::warn!(feature = %name, error = %e, "Failed to read input feature");
            feature_py_err(py, &name, e)
        })?;
        map.insert(name, value);
    }
    Ok(map)
}

/// Export text in its encoded form
///
/// Lone surrogates cannot be represented as UTF-8; they are passed through
/// with `surrogatepass` so the converter reports them as an encoding error.
fn py_str_to_dynamic(py: Python<'_>, s: &Bound<'_, PyString>) -> PyResult<DynamicStr> {
    if let Ok(text) = s.to_str() {
        return Ok(DynamicStr::from(text));
    }
    let encoded = s.call_method1(intern!(py, "encode"), ("utf-8", "surrogatepass"))?;
    Ok(DynamicStr::from_bytes(
        encoded.downcast::<PyBytes>()?.as_bytes().to_vec(),
    ))
}

fn numpy_scalar_to_dynamic(py: Python<'_>, obj: &Bound<'_, PyAny>) -> PyResult<Option<DynamicValue>> {
    let Ok(numpy) = py.import("numpy") else {
        return Ok(None);
    };
    if obj.is_instance(&numpy.getattr("bool_")?)? {
        return Ok(Some(DynamicValue::Bool(obj.is_truthy()?)));
    }
    if obj.is_instance(&numpy.getattr("integer")?)? {
        return Ok(Some(DynamicValue::Int(obj.extract::<i64>()?)));
    }
    if obj.is_instance(&numpy.getattr("floating")?)? {
        return Ok(Some(DynamicValue::Float(obj.extract::<f64>()?)));
    }
    Ok(None)
}

fn is_pil_image(py: Python<'_>, obj: &Bound<'_, PyAny>) -> PyResult<bool> {
    let Ok(image_module) = py.import("PIL.Image") else {
        return Ok(false);
    };
    obj.is_instance(&image_module.getattr("Image")?)
}

fn pil_to_dynamic(py: Python<'_>, obj: &Bound<'_, PyAny>) -> PyResult<DynamicImage> {
    let mode: String = obj.getattr(intern!(py, "mode"))?.extract()?;
    let (width, height): (usize, usize) = obj.getattr(intern!(py, "size"))?.extract()?;
    let bytes = obj.call_method0(intern!(py, "tobytes"))?;
    let data = bytes.downcast::<PyBytes>()?.as_bytes().to_vec();
    DynamicImage::new(mode, width, height, data).map_err(|e| to_py_err(py, e))
}

fn dynamic_to_pil<'py>(py: Python<'py>, image: &DynamicImage) -> PyResult<Bound<'py, PyAny>> {
    let image_module = py.import("PIL.Image")?;
    image_module.call_method1(
        "frombytes",
        (
            image.mode(),
            (image.width(), image.height()),
            PyBytes::new(py, image.as_bytes()),
        ),
    )
}

/// Convert a dynamic value to a new Python object
///
/// Supports:
/// - None → None
/// - Bool → bool
/// - Int → int
/// - Float → float
/// - Str → str
/// - Array → numpy.ndarray
/// - Dict → dict
/// - List → list
/// - Image → PIL.Image.Image
pub fn dynamic_to_py<'py>(py: Python<'py>, value: &DynamicValue) -> PyResult<Bound<'py, PyAny>> {
    match value {
        DynamicValue::None => Ok(py.None().into_bound(py)),
        DynamicValue::Bool(v) => v.into_bound_py_any(py),
        DynamicValue::Int(v) => v.into_bound_py_any(py),
        DynamicValue::Float(v) => v.into_bound_py_any(py),
        DynamicValue::Str(s) => s
            .to_str()
            .map_err(|e| to_py_err(py, e))?
            .into_bound_py_any(py),
        DynamicValue::Array(array) => dynamic_to_numpy(py, array),
        DynamicValue::Dict(entries) => {
            let dict = PyDict::new(py);
            for (key, value) in entries {
                dict.set_item(dynamic_to_py(py, key)?, dynamic_to_py(py, value)?)?;
            }
            Ok(dict.into_any())
        }
        DynamicValue::List(items) => {
            let list = PyList::empty(py);
            for item in items {
                list.append(dynamic_to_py(py, item)?)?;
            }
            Ok(list.into_any())
        }
        DynamicValue::Image(image) => dynamic_to_pil(py, image),
        DynamicValue::Opaque { type_name } => Err(to_py_err(
            py,
            Error::UnsupportedValue(format!("cannot rebuild a {} object", type_name)),
        )),
    }
}

/// Convert a dynamic map to a new Python dict
pub fn map_to_py_dict<'py>(py: Python<'py>, map: &DynamicMap) -> PyResult<Bound<'py, PyDict>> {
    let dict = PyDict::new(py);
    for (name, value) in map.iter() {
        dict.set_item(name, dynamic_to_py(py, value)?)?;
    }
    Ok(dict)
}
