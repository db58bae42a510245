//! Feature providers: named collections of feature values

use std::collections::HashMap;

use super::feature_value::FeatureValue;

/// A named collection of features, as consumed and produced by the
/// inference engine
pub trait FeatureProvider {
    /// Names of every feature this provider exposes (order unspecified)
    fn feature_names(&self) -> Vec<String>;

    /// Value for `name`, if the provider has one
    fn feature_value(&self, name: &str) -> Option<&FeatureValue>;
}

/// Immutable provider backed by a map
///
/// Built once per inference call; there is no way to add or replace a
/// feature after construction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DictionaryFeatureProvider {
    features: HashMap<String, FeatureValue>,
}

impl DictionaryFeatureProvider {
    pub fn new(features: HashMap<String, FeatureValue>) -> Self {
        Self { features }
    }

    pub fn get(&self, name: &str) -> Option<&FeatureValue> {
        self.features.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.features.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FeatureValue)> {
        self.features.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn into_inner(self) -> HashMap<String, FeatureValue> {
        self.features
    }
}

impl FeatureProvider for DictionaryFeatureProvider {
    fn feature_names(&self) -> Vec<String> {
        self.features.keys().cloned().collect()
    }

    fn feature_value(&self, name: &str) -> Option<&FeatureValue> {
        self.features.get(name)
    }
}

impl FromIterator<(String, FeatureValue)> for DictionaryFeatureProvider {
    fn from_iter<I: IntoIterator<Item = (String, FeatureValue)>>(iter: I) -> Self {
        Self {
            features: iter.into_iter().collect(),
        }
    }
}
