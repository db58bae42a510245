//! FeatureBridge Core - value marshaling for native ML features
//!
//! This crate converts between a dynamic scripting runtime's values and a
//! native ML framework's strongly-typed features, in both directions.
//!
//! # Architecture
//!
//! - **data**: dynamic-runtime values (scalars, text, arrays, dicts, lists, images)
//! - **native**: native feature values, multi-arrays, pixel buffers, providers
//! - **codec**: scalar/array byte codec, including half-precision payloads
//! - **convert**: one dynamic value to one native feature value and back
//! - **builder**: whole input mappings to providers, providers to mappings
//! - **diagnostics**: native error surfacing and process-wide log channels
//! - **string_dict**, **location**: metadata maps and path-to-URL helpers
//!
//! Bindings for a concrete runtime (see `featurebridge-python`) only turn
//! live objects into [`DynamicValue`]s and back; every conversion rule
//! lives here.
//!
//! # Example
//!
//! ```
//! use std::collections::HashSet;
//! use featurebridge_core::{build_provider, extract_dict, ConversionOptions, DynamicMap, DynamicValue};
//!
//! let inputs: DynamicMap = [("x", DynamicValue::Float(0.5))].into_iter().collect();
//! let provider = build_provider(&inputs, None, &ConversionOptions::default()).unwrap();
//! let outputs = extract_dict(&provider, &HashSet::new()).unwrap();
//! assert_eq!(outputs.get("x"), Some(&DynamicValue::Float(0.5)));
//! ```

#![warn(clippy::all)]

pub mod builder;
pub mod codec;
pub mod config;
pub mod convert;
pub mod data;
pub mod diagnostics;
pub mod error;
pub mod location;
pub mod native;
pub mod string_dict;

pub use builder::{build_provider, extract_dict};
pub use codec::{
    array_to_dynamic, array_to_native, native_to_array, register_element_types, shape_from_native,
    shape_to_native, ElementDescriptor, ElementTypeHost, Float16Bits, FLOAT16_DESCRIPTOR,
};
pub use config::{BridgeConfig, ConversionOptions};
pub use convert::{
    dictionary_to_dynamic, image_to_dynamic, sequence_to_dynamic, to_dynamic, to_native,
    to_native_with,
};
pub use data::{DType, DynamicArray, DynamicImage, DynamicMap, DynamicStr, DynamicValue};
pub use diagnostics::{check_native, default_log, init_tracing, raise, tracing_log, LogChannel};
pub use error::{Error, ErrorKind, Result};
pub use location::path_to_url;
pub use native::{
    ArrayDataType, DictionaryFeatureProvider, FeatureProvider, FeatureType, FeatureValue,
    MultiArray, NativeError, PixelBuffer, PixelFormat, FEATUREBRIDGE_ERROR_DOMAIN,
};
pub use string_dict::string_dict_to_native;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
