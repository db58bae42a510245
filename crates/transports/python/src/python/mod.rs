//! Python bindings for FeatureBridge
//!
//! Installed as the `featurebridge` extension module.

use std::sync::OnceLock;

use featurebridge_core::{init_tracing, register_element_types, BridgeConfig};
use pyo3::prelude::*;

pub mod api;
pub mod errors;
pub mod marshal;
pub mod numpy_bridge;

static CONFIG: OnceLock<BridgeConfig> = OnceLock::new();

/// Configuration read from the environment on first use
pub fn config() -> &'static BridgeConfig {
    CONFIG.get_or_init(BridgeConfig::from_env)
}

/// Python module for feature marshaling
#[pymodule]
#[pyo3(name = "featurebridge")]
fn featurebridge(m: &Bound<'_, PyModule>) -> PyResult<()> {
    let py = m.py();

    // Initialize tracing on module load
    init_tracing(config());

    let mut host = numpy_bridge::NumpyElementHost::new(py);
    register_element_types(&mut host).map_err(|e| errors::to_py_err(py, e))?;

    errors::register(m)?;
    m.add_class::<api::PyFeatureProvider>()?;
    m.add_function(wrap_pyfunction!(api::dict_to_features, m)?)?;
    m.add_function(wrap_pyfunction!(api::features_to_dict, m)?)?;
    m.add_function(wrap_pyfunction!(api::string_dict_to_native, m)?)?;
    m.add_function(wrap_pyfunction!(api::path_to_url, m)?)?;

    // Add version as module constant
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;

    tracing::debug!("featurebridge module initialized");
    Ok(())
}
