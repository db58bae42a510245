//! Module-level functions exposed to Python

use std::collections::{HashMap, HashSet};

use featurebridge_core::{
    build_provider, extract_dict, to_dynamic, DictionaryFeatureProvider, FeatureProvider,
};
use pyo3::exceptions::PyKeyError;
use pyo3::prelude::*;
use pyo3::types::PyDict;

use super::config;
use super::errors::to_py_err;
use super::marshal::{dynamic_to_py, map_to_py_dict, py_dict_to_map, py_to_dynamic};

/// Immutable collection of native features, as handed to the inference engine
#[pyclass(name = "FeatureProvider", module = "featurebridge", frozen)]
pub struct PyFeatureProvider {
    inner: DictionaryFeatureProvider,
}

impl PyFeatureProvider {
    pub fn inner(&self) -> &DictionaryFeatureProvider {
        &self.inner
    }
}

#[pymethods]
impl PyFeatureProvider {
    fn __len__(&self) -> usize {
        self.inner.len()
    }

    fn __contains__(&self, name: &str) -> bool {
        self.inner.contains(name)
    }

    /// Feature names, sorted
    fn keys(&self) -> Vec<String> {
        let mut names = self.inner.feature_names();
        names.sort();
        names
    }

    /// Native type tag of a feature ("int64", "multiArray", ...)
    fn feature_type(&self, name: &str) -> PyResult<&'static str> {
        self.inner
            .get(name)
            .map(|value| value.feature_type().name())
            .ok_or_else(|| PyKeyError::new_err(name.to_string()))
    }

    fn __getitem__<'py>(&self, py: Python<'py>, name: &str) -> PyResult<Bound<'py, PyAny>> {
        let value = self
            .inner
            .get(name)
            .ok_or_else(|| PyKeyError::new_err(name.to_string()))?;
        let dynamic = to_dynamic(value).map_err(|e| to_py_err(py, e))?;
        dynamic_to_py(py, &dynamic)
    }

    fn __repr__(&self) -> String {
        format!("FeatureProvider({})", self.keys().join(", "))
    }
}

/// Convert a `{name: value}` dict into a feature provider
///
/// Args:
///     inputs: Feature values keyed by name
///     extras: Optional provider whose features override same-named inputs
///
/// Raises:
///     FeatureConversionError: naming the first feature that failed
#[pyfunction]
#[pyo3(signature = (inputs, extras = None))]
pub fn dict_to_features(
    py: Python<'_>,
    inputs: &Bound<'_, PyDict>,
    extras: Option<PyRef<'_, PyFeatureProvider>>,
) -> PyResult<PyFeatureProvider> {
    let map = py_dict_to_map(py, inputs)?;
    let extras: Option<HashMap<_, _>> = extras.map(|provider| {
        provider
            .inner
            .iter()
            .map(|(name, value)| (name.to_string(), value.clone()))
            .collect()
    });
    let options = config().conversion_options();

    let inner = py
        .detach(|| build_provider(&map, extras.as_ref(), &options))
        .map_err(|e| to_py_err(py, e))?;
    Ok(PyFeatureProvider { inner })
}

/// Convert a provider's features into a `{name: value}` dict
///
/// Args:
///     provider: Features to convert
///     skip: Optional names to leave out
#[pyfunction]
#[pyo3(signature = (provider, skip = None))]
pub fn features_to_dict<'py>(
    py: Python<'py>,
    provider: PyRef<'_, PyFeatureProvider>,
    skip: Option<HashSet<String>>,
) -> PyResult<Bound<'py, PyDict>> {
    let skip = skip.unwrap_or_default();
    let outputs = extract_dict(&provider.inner, &skip).map_err(|e| to_py_err(py, e))?;
    map_to_py_dict(py, &outputs)
}

/// Validate and copy a `{str: str}` metadata dict
#[pyfunction]
pub fn string_dict_to_native(
    py: Python<'_>,
    mapping: &Bound<'_, PyAny>,
) -> PyResult<HashMap<String, String>> {
    let value = py_to_dynamic(py, mapping)?;
    featurebridge_core::string_dict_to_native(&value).map_err(|e| to_py_err(py, e))
}

/// Resolve a path or URL string to a URL string
#[pyfunction]
pub fn path_to_url(py: Python<'_>, path: &str) -> PyResult<String> {
    featurebridge_core::path_to_url(path)
        .map(String::from)
        .map_err(|e| to_py_err(py, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::python::errors::{EncodingError, FeatureConversionError, UnsupportedKeyTypeError};
    use featurebridge_core::FeatureValue;
    use pyo3::ffi::c_str;

    #[test]
    fn test_dict_round_trip() {
        pyo3::prepare_freethreaded_python();

        Python::attach(|py| {
            let inputs = py
                .eval(c_str!("{'n': 3, 'x': 0.5, 's': 'label', 'probs': {'a': 0.25, 1: 0.75}}"), None, None)
                .unwrap();
            let provider = dict_to_features(py, inputs.downcast::<PyDict>().unwrap(), None).unwrap();
            assert_eq!(provider.inner().get("n"), Some(&FeatureValue::Int64(3)));

            let cell = Bound::new(py, provider).unwrap();
            let outputs = features_to_dict(py, cell.borrow(), None).unwrap();
            let expected = py
                .eval(c_str!("{'n': 3, 'x': 0.5, 's': 'label', 'probs': {1: 0.75, 'a': 0.25}}"), None, None)
                .unwrap();
            assert!(outputs.eq(expected).unwrap());
        });
    }

    #[test]
    fn test_unreadable_input_names_feature() {
        pyo3::prepare_freethreaded_python();

        Python::attach(|py| {
            let inputs = py.eval(c_str!("{'ok': 1, 'big': 2**70}"), None, None).unwrap();
            let err = dict_to_features(py, inputs.downcast::<PyDict>().unwrap(), None)
                .err()
                .unwrap();
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
    fn test_extras_override_and_skip() {
        pyo3::prepare_freethreaded_python();

        Python::attach(|py| {
            let extras_dict = py.eval(c_str!("{'x': 2}"), None, None).unwrap();
            let extras = Bound::new(
                py,
                dict_to_features(py, extras_dict.downcast::<PyDict>().unwrap(), None).unwrap(),
            )
            .unwrap();

            let inputs = py.eval(c_str!("{'x': 1, 'y': 'hidden'}"), None, None).unwrap();
            let provider = Bound::new(
                py,
                dict_to_features(py, inputs.downcast::<PyDict>().unwrap(), Some(extras.borrow()))
                    .unwrap(),
            )
            .unwrap();

            let skip = HashSet::from(["y".to_string()]);
            let outputs = features_to_dict(py, provider.borrow(), Some(skip)).unwrap();
            let expected = py.eval(c_str!("{'x': 2}"), None, None).unwrap();
            assert!(outputs.eq(expected).unwrap());
        });
    }

    #[test]
    fn test_float_key_raises() {
        pyo3::prepare_freethreaded_python();

        Python::attach(|py| {
            let inputs = py.eval(c_str!("{'probs': {1.5: 0.5}}"), None, None).unwrap();
            let err = dict_to_features(py, inputs.downcast::<PyDict>().unwrap(), None)
                .err()
                .unwrap();
            assert!(err.is_instance_of::<FeatureConversionError>(py));
            assert!(err.cause(py).unwrap().is_instance_of::<UnsupportedKeyTypeError>(py));
        });
    }

    #[test]
    fn test_string_dict_rejects_surrogates() {
        pyo3::prepare_freethreaded_python();

        Python::attach(|py| {
            let ok = py.eval(c_str!("{'author': 'me'}"), None, None).unwrap();
            let map = string_dict_to_native(py, &ok).unwrap();
            assert_eq!(map.get("author").map(String::as_str), Some("me"));

            let bad = py.eval(c_str!("{'author': '\\udc80'}"), None, None).unwrap();
            let err = string_dict_to_native(py, &bad).unwrap_err();
            assert!(err.is_instance_of::<EncodingError>(py));
        });
    }

    #[test]
    fn test_path_to_url() {
        pyo3::prepare_freethreaded_python();

        Python::attach(|py| {
            let url = path_to_url(py, "https://example.com/a.bin").unwrap();
            assert_eq!(url, "https://example.com/a.bin");
            assert!(path_to_url(py, "").is_err());
        });
    }
}
