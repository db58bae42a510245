//! In-process model of the native ML framework's feature types
//!
//! - `feature_value.rs`: tagged feature union, dictionary keys, sequences
//! - `multi_array.rs`: dense shaped arrays and their element types
//! - `pixel_buffer.rs`: reference-counted image buffers
//! - `provider.rs`: named feature collections
//! - `error.rs`: native error objects

use std::collections::HashMap;

mod error;
mod feature_value;
mod multi_array;
mod pixel_buffer;
mod provider;

pub use error::{NativeError, FEATUREBRIDGE_ERROR_DOMAIN};
pub use feature_value::{
    DictionaryKey, FeatureDictionary, FeatureType, FeatureValue, NativeNumber, Sequence,
};
pub use multi_array::{element_count, ArrayDataType, MultiArray};
pub(crate) use multi_array::expected_byte_len;
pub use pixel_buffer::{four_cc_name, PixelBuffer, PixelFormat};
pub use provider::{DictionaryFeatureProvider, FeatureProvider};

/// Native string-to-string map (side-channel metadata)
pub type NativeStringMap = HashMap<String, String>;
