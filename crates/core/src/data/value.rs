//! Dynamic values as the scripting runtime sees them

use std::fmt;

use crate::error::{Error, Result};

use super::array::DynamicArray;
use super::image::DynamicImage;

/// Text exported by the runtime in its encoded form
///
/// The runtime may hand over text that is not valid UTF-8 (for example
/// lone surrogates smuggled through a lenient encoder); validation happens
/// when the text is converted to a native string.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct DynamicStr(Vec<u8>);

impl DynamicStr {
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Validated view of the text
    pub fn to_str(&self) -> Result<&str> {
        std::str::from_utf8(&self.0).map_err(|e| {
            Error::Encoding(format!(
                "{} (at byte {})",
                String::from_utf8_lossy(&self.0),
                e.valid_up_to()
            ))
        })
    }
}

impl From<&str> for DynamicStr {
    fn from(s: &str) -> Self {
        Self(s.as_bytes().to_vec())
    }
}

impl From<String> for DynamicStr {
    fn from(s: String) -> Self {
        Self(s.into_bytes())
    }
}

impl fmt::Debug for DynamicStr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", String::from_utf8_lossy(&self.0))
    }
}

/// Tagged union of runtime values the bridge can see
#[derive(Debug, Clone, PartialEq)]
pub enum DynamicValue {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(DynamicStr),
    Array(DynamicArray),
    /// Mapping with arbitrary keys, in insertion order
    Dict(Vec<(DynamicValue, DynamicValue)>),
    /// Ordered sequence
    List(Vec<DynamicValue>),
    Image(DynamicImage),
    /// Any other runtime object, identified by its type name
    Opaque { type_name: String },
}

impl DynamicValue {
    pub fn str(s: impl Into<DynamicStr>) -> Self {
        DynamicValue::Str(s.into())
    }

    pub fn opaque(type_name: impl Into<String>) -> Self {
        DynamicValue::Opaque {
            type_name: type_name.into(),
        }
    }

    /// Runtime type name, used in error messages
    pub fn type_name(&self) -> &str {
        match self {
            DynamicValue::None => "NoneType",
            DynamicValue::Bool(_) => "bool",
            DynamicValue::Int(_) => "int",
            DynamicValue::Float(_) => "float",
            DynamicValue::Str(_) => "str",
            DynamicValue::Array(_) => "ndarray",
            DynamicValue::Dict(_) => "dict",
            DynamicValue::List(_) => "list",
            DynamicValue::Image(_) => "Image",
            DynamicValue::Opaque { type_name } => type_name,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, DynamicValue::None)
    }
}

impl From<bool> for DynamicValue {
    fn from(v: bool) -> Self {
        DynamicValue::Bool(v)
    }
}

impl From<i64> for DynamicValue {
    fn from(v: i64) -> Self {
        DynamicValue::Int(v)
    }
}

impl From<f64> for DynamicValue {
    fn from(v: f64) -> Self {
        DynamicValue::Float(v)
    }
}

impl From<&str> for DynamicValue {
    fn from(v: &str) -> Self {
        DynamicValue::Str(v.into())
    }
}

impl From<DynamicArray> for DynamicValue {
    fn from(v: DynamicArray) -> Self {
        DynamicValue::Array(v)
    }
}

impl From<DynamicImage> for DynamicValue {
    fn from(v: DynamicImage) -> Self {
        DynamicValue::Image(v)
    }
}

/// Ordered name-to-value mapping (a runtime dict keyed by feature name)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DynamicMap {
    entries: Vec<(String, DynamicValue)>,
}

impl DynamicMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace; a replaced entry keeps its original position
    pub fn insert(&mut self, name: impl Into<String>, value: DynamicValue) -> Option<DynamicValue> {
        let name = name.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((name, value));
                None
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&DynamicValue> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value)
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &DynamicValue)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }
}

impl<K: Into<String>> FromIterator<(K, DynamicValue)> for DynamicMap {
    fn from_iter<I: IntoIterator<Item = (K, DynamicValue)>>(iter: I) -> Self {
        let mut map = DynamicMap::new();
        for (name, value) in iter {
            map.insert(name, value);
        }
        map
    }
}

impl IntoIterator for DynamicMap {
    type Item = (String, DynamicValue);
    type IntoIter = std::vec::IntoIter<(String, DynamicValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
