//! Native feature values
//!
//! `FeatureValue` is the framework's tagged union for one named input or
//! output. It is a closed enum: every match over it is exhaustive, so a new
//! tag has to be handled deliberately everywhere it flows.

use std::collections::BTreeMap;

use crate::error::{Error, Result};

use super::multi_array::MultiArray;
use super::pixel_buffer::PixelBuffer;

/// Feature type tag with the framework's raw codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureType {
    Undefined,
    Int64,
    Double,
    String,
    Image,
    MultiArray,
    Dictionary,
    Sequence,
}

impl FeatureType {
    pub const ALL: [FeatureType; 8] = [
        FeatureType::Undefined,
        FeatureType::Int64,
        FeatureType::Double,
        FeatureType::String,
        FeatureType::Image,
        FeatureType::MultiArray,
        FeatureType::Dictionary,
        FeatureType::Sequence,
    ];

    pub const fn raw(self) -> i64 {
        match self {
            FeatureType::Undefined => 0,
            FeatureType::Int64 => 1,
            FeatureType::Double => 2,
            FeatureType::String => 3,
            FeatureType::Image => 4,
            FeatureType::MultiArray => 5,
            FeatureType::Dictionary => 6,
            FeatureType::Sequence => 7,
        }
    }

    /// Decode a raw tag reported by the framework
    ///
    /// An unknown tag means the framework grew a feature kind this binding
    /// has not been updated for.
    pub fn from_raw(raw: i64) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|ty| ty.raw() == raw)
            .ok_or(Error::UnknownFeatureType(raw))
    }

    pub const fn name(self) -> &'static str {
        match self {
            FeatureType::Undefined => "undefined",
            FeatureType::Int64 => "int64",
            FeatureType::Double => "double",
            FeatureType::String => "string",
            FeatureType::Image => "image",
            FeatureType::MultiArray => "multiArray",
            FeatureType::Dictionary => "dictionary",
            FeatureType::Sequence => "sequence",
        }
    }
}

/// Native number (dictionary weights, shape entries)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NativeNumber {
    Int64(i64),
    Double(f64),
}

impl NativeNumber {
    pub fn as_f64(self) -> f64 {
        match self {
            NativeNumber::Int64(v) => v as f64,
            NativeNumber::Double(v) => v,
        }
    }
}

/// Dictionary feature key
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DictionaryKey {
    Int64(i64),
    String(String),
}

/// Sparse dictionary feature: categorical key to numeric weight
pub type FeatureDictionary = BTreeMap<DictionaryKey, NativeNumber>;

/// Sequence feature: ordered homogeneous scalars
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sequence {
    Int64s(Vec<i64>),
    Strings(Vec<String>),
}

impl Sequence {
    /// Element type of the sequence
    pub fn value_type(&self) -> FeatureType {
        match self {
            Sequence::Int64s(_) => FeatureType::Int64,
            Sequence::Strings(_) => FeatureType::String,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Sequence::Int64s(values) => values.len(),
            Sequence::Strings(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One named input or output value
#[derive(Debug, Clone, PartialEq)]
pub enum FeatureValue {
    Undefined,
    Int64(i64),
    Double(f64),
    String(String),
    MultiArray(MultiArray),
    Dictionary(FeatureDictionary),
    Image(PixelBuffer),
    Sequence(Sequence),
}

impl FeatureValue {
    /// Tag of the stored value
    pub fn feature_type(&self) -> FeatureType {
        match self {
            FeatureValue::Undefined => FeatureType::Undefined,
            FeatureValue::Int64(_) => FeatureType::Int64,
            FeatureValue::Double(_) => FeatureType::Double,
            FeatureValue::String(_) => FeatureType::String,
            FeatureValue::MultiArray(_) => FeatureType::MultiArray,
            FeatureValue::Dictionary(_) => FeatureType::Dictionary,
            FeatureValue::Image(_) => FeatureType::Image,
            FeatureValue::Sequence(_) => FeatureType::Sequence,
        }
    }

    pub fn as_int64(&self) -> Option<i64> {
        match self {
            FeatureValue::Int64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_double(&self) -> Option<f64> {
        match self {
            FeatureValue::Double(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FeatureValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_multi_array(&self) -> Option<&MultiArray> {
        match self {
            FeatureValue::MultiArray(array) => Some(array),
            _ => None,
        }
    }

    pub fn as_image(&self) -> Option<&PixelBuffer> {
        match self {
            FeatureValue::Image(buffer) => Some(buffer),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_tags_round_trip() {
        for ty in FeatureType::ALL {
            assert_eq!(FeatureType::from_raw(ty.raw()).unwrap(), ty);
        }
    }

    #[test]
    fn test_unknown_raw_tag() {
        let err = FeatureType::from_raw(8).unwrap_err();
        assert!(matches!(err, Error::UnknownFeatureType(8)));
        assert!(err.is_internal());
    }

    #[test]
    fn test_dictionary_keys_order_ints_before_strings() {
        let mut dict = FeatureDictionary::new();
        dict.insert(DictionaryKey::String("b".into()), NativeNumber::Double(0.5));
        dict.insert(DictionaryKey::Int64(3), NativeNumber::Int64(1));
        let keys: Vec<_> = dict.keys().cloned().collect();
        assert_eq!(
            keys,
            vec![DictionaryKey::Int64(3), DictionaryKey::String("b".into())]
        );
    }

    #[test]
    fn test_sequence_value_type() {
        assert_eq!(Sequence::Int64s(vec![1]).value_type(), FeatureType::Int64);
        assert_eq!(
            Sequence::Strings(vec![]).value_type(),
            FeatureType::String
        );
        assert!(Sequence::Strings(vec![]).is_empty());
    }
}
