//! Python exception classes for conversion errors
//!
//! One class per error kind, all deriving from `FeatureBridgeError`.

use featurebridge_core::{Error, ErrorKind};
use pyo3::create_exception;
use pyo3::exceptions::PyException;
use pyo3::prelude::*;

create_exception!(
    featurebridge,
    FeatureBridgeError,
    PyException,
    "Base class for every feature conversion failure."
);
create_exception!(featurebridge, ShapeMismatchError, FeatureBridgeError);
create_exception!(featurebridge, UnsupportedElementTypeError, FeatureBridgeError);
create_exception!(featurebridge, EncodingError, FeatureBridgeError);
create_exception!(featurebridge, UnsupportedKeyTypeError, FeatureBridgeError);
create_exception!(featurebridge, UnsupportedPixelFormatError, FeatureBridgeError);
create_exception!(featurebridge, UnsupportedValueError, FeatureBridgeError);
create_exception!(
    featurebridge,
    FeatureConversionError,
    FeatureBridgeError,
    "A named feature failed to convert; `feature_name` names it and `__cause__` holds the reason."
);
create_exception!(
    featurebridge,
    NativeFrameworkError,
    FeatureBridgeError,
    "Error reported by the native framework; carries `domain`, `code` and `message`."
);
create_exception!(
    featurebridge,
    BindingOutOfDateError,
    FeatureBridgeError,
    "The native framework produced a feature type this binding cannot map."
);
create_exception!(featurebridge, InvalidPathError, FeatureBridgeError);

/// Convert a core error into the matching Python exception
pub fn to_py_err(py: Python<'_>, err: Error) -> PyErr {
    let message = err.to_string();
    let py_err = match err.kind() {
        ErrorKind::ShapeMismatch => ShapeMismatchError::new_err(message),
        ErrorKind::UnsupportedElementType => UnsupportedElementTypeError::new_err(message),
        ErrorKind::Encoding => EncodingError::new_err(message),
        ErrorKind::UnsupportedKeyType => UnsupportedKeyTypeError::new_err(message),
        ErrorKind::UnsupportedPixelFormat => UnsupportedPixelFormatError::new_err(message),
        ErrorKind::UnsupportedValue => UnsupportedValueError::new_err(message),
        ErrorKind::FeatureConversion => FeatureConversionError::new_err(message),
        ErrorKind::NativeFramework => NativeFrameworkError::new_err(message),
        ErrorKind::UnknownFeatureType => BindingOutOfDateError::new_err(message),
        ErrorKind::InvalidPath => InvalidPathError::new_err(message),
    };

    match err {
        Error::FeatureConversion { name, source } => {
            attach_feature_name(py, &py_err, &name, to_py_err(py, *source));
        }
        Error::NativeFramework(native) => {
            let value = py_err.value(py);
            let attached = value
                .setattr("domain", native.domain())
                .and_then(|_| value.setattr("code", native.code()))
                .and_then(|_| value.setattr("message", native.message()));
            if let Err(e) = attached {
                tracing::warn!("Failed to attach native error fields to exception: {}", e);
            }
        }
        _ => {}
    }

    py_err
}

/// Wrap any Python-side failure for feature `name` in a `FeatureConversionError`
///
/// `cause` becomes the new exception's `__cause__`.
pub fn feature_py_err(py: Python<'_>, name: &str, cause: PyErr) -> PyErr {
    let py_err = FeatureConversionError::new_err(format!(
        "Failed to convert feature '{}': {}",
        name, cause
    ));
    attach_feature_name(py, &py_err, name, cause);
    py_err
}

fn attach_feature_name(py: Python<'_>, py_err: &PyErr, name: &str, cause: PyErr) {
    if let Err(e) = py_err.value(py).setattr("feature_name", name) {
        tracing::warn!("Failed to attach feature name to exception: {}", e);
    }
    py_err.set_cause(py, Some(cause));
}

/// Add every exception class to the module
pub fn register(m: &Bound<'_, PyModule>) -> PyResult<()> {
    let py = m.py();
    m.add("FeatureBridgeError", py.get_type::<FeatureBridgeError>())?;
    m.add("ShapeMismatchError", py.get_type::<ShapeMismatchError>())?;
    m.add("UnsupportedElementTypeError", py.get_type::<UnsupportedElementTypeError>())?;
    m.add("EncodingError", py.get_type::<EncodingError>())?;
    m.add("UnsupportedKeyTypeError", py.get_type::<UnsupportedKeyTypeError>())?;
    m.add("UnsupportedPixelFormatError", py.get_type::<UnsupportedPixelFormatError>())?;
    m.add("UnsupportedValueError", py.get_type::<UnsupportedValueError>())?;
    m.add("FeatureConversionError", py.get_type::<FeatureConversionError>())?;
    m.add("NativeFrameworkError", py.get_type::<NativeFrameworkError>())?;
    m.add("BindingOutOfDateError", py.get_type::<BindingOutOfDateError>())?;
    m.add("InvalidPathError", py.get_type::<InvalidPathError>())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use featurebridge_core::NativeError;

    #[test]
    fn test_native_error_fields_preserved() {
        pyo3::prepare_freethreaded_python();

        Python::attach(|py| {
            let err = to_py_err(py, Error::from(NativeError::new("X", 7, "bad input")));
            assert!(err.is_instance_of::<NativeFrameworkError>(py));
            assert!(err.is_instance_of::<FeatureBridgeError>(py));

            let value = err.value(py);
            let domain: String = value.getattr("domain").unwrap().extract().unwrap();
            let code: i64 = value.getattr("code").unwrap().extract().unwrap();
            let message: String = value.getattr("message").unwrap().extract().unwrap();
            assert_eq!(domain, "X");
            assert_eq!(code, 7);
            assert_eq!(message, "bad input");
        });
    }

    #[test]
    fn test_feature_conversion_chains_cause() {
        pyo3::prepare_freethreaded_python();

        Python::attach(|py| {
            let err = to_py_err(
                py,
                Error::feature_conversion("probs", Error::UnsupportedKeyType("float".into())),
            );
            assert!(err.is_instance_of::<FeatureConversionError>(py));

            let name: String = err.value(py).getattr("feature_name").unwrap().extract().unwrap();
            assert_eq!(name, "probs");

            let cause = err.cause(py).unwrap();
            assert!(cause.is_instance_of::<UnsupportedKeyTypeError>(py));
        });
    }

    #[test]
    fn test_python_error_wrapped_with_feature_name() {
        pyo3::prepare_freethreaded_python();

        Python::attach(|py| {
            let cause = pyo3::exceptions::PyOverflowError::new_err("too big");
            let err = feature_py_err(py, "big", cause);
            assert!(err.is_instance_of::<FeatureConversionError>(py));

            let name: String = err.value(py).getattr("feature_name").unwrap().extract().unwrap();
            assert_eq!(name, "big");
            assert!(err
                .cause(py)
                .unwrap()
                .is_instance_of::<pyo3::exceptions::PyOverflowError>(py));
        });
    }

    #[test]
    fn test_unknown_tag_is_distinct_class() {
        pyo3::prepare_freethreaded_python();

        Python::attach(|py| {
            let err = to_py_err(py, Error::UnknownFeatureType(99));
            assert!(err.is_instance_of::<BindingOutOfDateError>(py));
            assert!(!err.is_instance_of::<UnsupportedValueError>(py));
        });
    }
}
