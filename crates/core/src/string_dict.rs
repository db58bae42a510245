//! String dictionary utility for side-channel metadata

use crate::data::DynamicValue;
use crate::error::{Error, Result};
use crate::native::NativeStringMap;

/// Convert a str-to-str mapping into a native string map
///
/// Keys and values go through the same encoding check as string features.
pub fn string_dict_to_native(value: &DynamicValue) -> Result<NativeStringMap> {
    let DynamicValue::Dict(entries) = value else {
        return Err(Error::UnsupportedValue(format!(
            "expected a dict of str to str, got {}",
            value.type_name()
        )));
    };

    entries
        .iter()
        .map(|(key, value)| -> Result<(String, String)> {
            Ok((native_string(key)?, native_string(value)?))
        })
        .collect()
}

fn native_string(value: &DynamicValue) -> Result<String> {
    match value {
        DynamicValue::Str(s) => Ok(s.to_str()?.to_owned()),
        other => Err(Error::UnsupportedValue(format!(
            "expected str, got {}",
            other.type_name()
        ))),
    }
}
