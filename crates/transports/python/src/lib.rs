//! Python bindings for FeatureBridge
//!
//! Turns live Python objects into `featurebridge_core` dynamic values and
//! back. Every conversion rule lives in the core; this crate only walks
//! Python objects.
//!
//! # Architecture
//!
//! - **python/marshal.rs**: Python object ↔ `DynamicValue`
//! - **python/numpy_bridge.rs**: numpy arrays and the float16 element type
//! - **python/errors.rs**: exception classes for each error kind
//! - **python/api.rs**: module-level functions and the provider class
//!
//! # Usage (Python)
//!
//! ```python
//! import numpy as np
//! from featurebridge import dict_to_features, features_to_dict
//!
//! provider = dict_to_features({"x": np.zeros((1, 3), dtype=np.float16)})
//! outputs = features_to_dict(provider)
//! ```

#![warn(clippy::all)]

#[cfg(feature = "python")]
pub mod python;
