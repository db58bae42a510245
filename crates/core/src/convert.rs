//! Feature value converter
//!
//! One dynamic value to one native feature value and back. Both directions
//! match exhaustively over their tagged unions.

use crate::codec::{array_to_dynamic, dynamic_array_to_native, number_to_dynamic, number_to_native};
use crate::config::ConversionOptions;
use crate::data::{DynamicImage, DynamicValue};
use crate::error::{Error, Result};
use crate::native::{
    DictionaryKey, FeatureDictionary, FeatureValue, PixelBuffer, PixelFormat, Sequence,
};

/// Convert with default options
pub fn to_native(value: &DynamicValue) -> Result<FeatureValue> {
    to_native_with(value, &ConversionOptions::default())
}

/// Convert one dynamic value into a native feature value
pub fn to_native_with(value: &DynamicValue, options: &ConversionOptions) -> Result<FeatureValue> {
    match value {
        DynamicValue::None => Ok(FeatureValue::Undefined),
        DynamicValue::Bool(v) => Ok(FeatureValue::Int64(i64::from(*v))),
        DynamicValue::Int(v) => Ok(FeatureValue::Int64(*v)),
        DynamicValue::Float(v) => Ok(FeatureValue::Double(*v)),
        DynamicValue::Str(s) => Ok(FeatureValue::String(s.to_str()?.to_owned())),
        DynamicValue::Array(array) => Ok(FeatureValue::MultiArray(dynamic_array_to_native(array)?)),
        DynamicValue::Dict(entries) => Ok(FeatureValue::Dictionary(dictionary_to_native(entries)?)),
        DynamicValue::List(items) => {
            if !options.sequence_features {
                return Err(Error::UnsupportedValue(
                    "list: sequence features are not available in this framework".to_string(),
                ));
            }
            Ok(FeatureValue::Sequence(sequence_to_native(items)?))
        }
        DynamicValue::Image(image) => Ok(FeatureValue::Image(image_to_native(
            image,
            options.image_alpha,
        )?)),
        DynamicValue::Opaque { type_name } => Err(Error::UnsupportedValue(type_name.clone())),
    }
}

/// Convert one native feature value back into a dynamic value
pub fn to_dynamic(value: &FeatureValue) -> Result<DynamicValue> {
    match value {
        FeatureValue::Undefined => Ok(DynamicValue::None),
        FeatureValue::Int64(v) => Ok(DynamicValue::Int(*v)),
        FeatureValue::Double(v) => Ok(DynamicValue::Float(*v)),
        FeatureValue::String(s) => Ok(DynamicValue::str(s.as_str())),
        FeatureValue::MultiArray(array) => array_to_dynamic(array),
        FeatureValue::Dictionary(dict) => Ok(dictionary_to_dynamic(dict)),
        FeatureValue::Image(buffer) => image_to_dynamic(buffer),
        FeatureValue::Sequence(sequence) => Ok(sequence_to_dynamic(sequence)),
    }
}

fn dictionary_key(key: &DynamicValue) -> Result<DictionaryKey> {
    match key {
        DynamicValue::Int(v) => Ok(DictionaryKey::Int64(*v)),
        DynamicValue::Bool(v) => Ok(DictionaryKey::Int64(i64::from(*v))),
        DynamicValue::Str(s) => Ok(DictionaryKey::String(s.to_str()?.to_owned())),
        other => Err(Error::UnsupportedKeyType(other.type_name().to_string())),
    }
}

/// Sparse dictionary to native dictionary
///
/// The native dictionary is only returned once every entry converted.
pub fn dictionary_to_native(entries: &[(DynamicValue, DynamicValue)]) -> Result<FeatureDictionary> {
    entries
        .iter()
        .map(|(key, value)| -> Result<(DictionaryKey, _)> {
            Ok((dictionary_key(key)?, number_to_native(value)?))
        })
        .collect()
}

pub fn dictionary_to_dynamic(dict: &FeatureDictionary) -> DynamicValue {
    DynamicValue::Dict(
        dict.iter()
            .map(|(key, &value)| {
                let key = match key {
                    DictionaryKey::Int64(v) => DynamicValue::Int(*v),
                    DictionaryKey::String(s) => DynamicValue::str(s.as_str()),
                };
                (key, number_to_dynamic(value))
            })
            .collect(),
    )
}

/// Homogeneous list to native sequence
///
/// The first element fixes the element type; an empty list is an empty
/// integer sequence.
pub fn sequence_to_native(items: &[DynamicValue]) -> Result<Sequence> {
    match items.first() {
        None => Ok(Sequence::Int64s(Vec::new())),
        Some(DynamicValue::Int(_)) | Some(DynamicValue::Bool(_)) => items
            .iter()
            .map(|item| match item {
                DynamicValue::Int(v) => Ok(*v),
                DynamicValue::Bool(v) => Ok(i64::from(*v)),
                other => Err(mixed_sequence("int", other)),
            })
            .collect::<Result<_>>()
            .map(Sequence::Int64s),
        Some(DynamicValue::Str(_)) => items
            .iter()
            .map(|item| match item {
                DynamicValue::Str(s) => Ok(s.to_str()?.to_owned()),
                other => Err(mixed_sequence("str", other)),
            })
            .collect::<Result<_>>()
            .map(Sequence::Strings),
        Some(other) => Err(Error::UnsupportedValue(format!(
            "list of {}: sequences hold int or str only",
            other.type_name()
        ))),
    }
}

fn mixed_sequence(expected: &str, found: &DynamicValue) -> Error {
    Error::UnsupportedValue(format!(
        "mixed list: expected {} elements, found {}",
        expected,
        found.type_name()
    ))
}

pub fn sequence_to_dynamic(sequence: &Sequence) -> DynamicValue {
    match sequence {
        Sequence::Int64s(values) => {
            DynamicValue::List(values.iter().map(|&v| DynamicValue::Int(v)).collect())
        }
        Sequence::Strings(values) => {
            DynamicValue::List(values.iter().map(|s| DynamicValue::str(s.as_str())).collect())
        }
    }
}

/// Pack an image into a native pixel buffer
///
/// "RGBA" and "RGB" become BGRA (RGB takes `alpha`), "L" becomes a single
/// 8-bit channel.
pub fn image_to_native(image: &DynamicImage, alpha: u8) -> Result<PixelBuffer> {
    let (width, height) = (image.width(), image.height());
    let pixels = image.as_bytes();
    match image.mode() {
        "RGBA" => {
            let data = pixels
                .chunks_exact(4)
                .flat_map(|p| [p[2], p[1], p[0], p[3]])
                .collect();
            PixelBuffer::new(width, height, PixelFormat::Bgra32, data)
        }
        "RGB" => {
            let data = pixels
                .chunks_exact(3)
                .flat_map(|p| [p[2], p[1], p[0], alpha])
                .collect();
            PixelBuffer::new(width, height, PixelFormat::Bgra32, data)
        }
        "L" => PixelBuffer::new(width, height, PixelFormat::OneComponent8, pixels.to_vec()),
        other => Err(Error::UnsupportedPixelFormat(format!("image mode {}", other))),
    }
}

/// Decode a native pixel buffer, dropping any row padding
pub fn image_to_dynamic(buffer: &PixelBuffer) -> Result<DynamicValue> {
    let format = buffer.pixel_format()?;
    let (width, height) = (buffer.width(), buffer.height());
    let packed_len = format.buffer_size(width, height).ok_or_else(|| {
        Error::UnsupportedValue(format!("{}x{} pixel buffer overflows the address space", width, height))
    })?;
    let row_len = packed_len.checked_div(height).unwrap_or(0);

    let mut packed = Vec::with_capacity(packed_len);
    for y in 0..height {
        let row = buffer
            .row(y)
            .and_then(|row| row.get(..row_len))
            .ok_or_else(|| Error::ShapeMismatch {
                shape: vec![height, width],
                expected: packed_len,
                actual: buffer.as_bytes().len(),
            })?;
        packed.extend_from_slice(row);
    }

    let (mode, data): (&str, Vec<u8>) = match format {
        PixelFormat::Bgra32 => (
            "RGBA",
            packed
                .chunks_exact(4)
                .flat_map(|p| [p[2], p[1], p[0], p[3]])
                .collect(),
        ),
        PixelFormat::Argb32 => (
            "RGBA",
            packed
                .chunks_exact(4)
                .flat_map(|p| [p[1], p[2], p[3], p[0]])
                .collect(),
        ),
        PixelFormat::OneComponent8 => ("L", packed),
    };

    Ok(DynamicValue::Image(DynamicImage::new(mode, width, height, data)?))
}
