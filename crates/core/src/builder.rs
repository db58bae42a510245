//! Dictionary/provider builder
//!
//! Assembles a whole named-feature mapping into a native provider and
//! extracts a provider back into a dynamic mapping.

use std::collections::{HashMap, HashSet};

use crate::config::ConversionOptions;
use crate::convert::{to_dynamic, to_native_with};
use crate::data::{DynamicMap, DynamicValue};
use crate::diagnostics::tracing_log;
use crate::error::{Error, Result};
use crate::native::{DictionaryFeatureProvider, FeatureProvider, FeatureValue};

/// Build the provider handed to the inference engine
///
/// Inputs are converted in caller order; the first failure aborts the call
/// with the feature's name attached and every value converted so far is
/// dropped. `extras` are merged afterwards and win over inputs of the same
/// name.
pub fn build_provider(
    inputs: &DynamicMap,
    extras: Option<&HashMap<String, FeatureValue>>,
    options: &ConversionOptions,
) -> Result<DictionaryFeatureProvider> {
    let _span = tracing_log().span().entered();
    let mut features = HashMap::with_capacity(inputs.len() + extras.map_or(0, HashMap::len));

    for (name, value) in inputs.iter() {
        let feature = to_native_with(value, options).map_err(|e| {
            tracing::warn!(feature = name, error = %e, "Failed to convert input feature");
            Error::feature_conversion(name, e)
        })?;
        tracing::trace!(
            feature = name,
            tag = feature.feature_type().name(),
            "Converted input feature"
        );
        features.insert(name.to_string(), feature);
    }

    if let Some(extras) = extras {
        for (name, value) in extras {
            if features.insert(name.clone(), value.clone()).is_some() {
                tracing::debug!(feature = %name, "Extra feature overrides input");
            }
        }
    }

    tracing::debug!(features = features.len(), "Built feature provider");
    Ok(DictionaryFeatureProvider::new(features))
}

/// Extract every feature the provider exposes, except names in `skip`
///
/// A name the provider lists but cannot produce a value for maps to `None`.
pub fn extract_dict(provider: &dyn FeatureProvider, skip: &HashSet<String>) -> Result<DynamicMap> {
    let _span = tracing_log().span().entered();
    let mut outputs = DynamicMap::new();

    for name in provider.feature_names() {
        if skip.contains(&name) {
            continue;
        }
        let value = match provider.feature_value(&name) {
            Some(feature) => to_dynamic(feature).map_err(|e| {
                tracing::warn!(feature = %name, error = %e, "Failed to convert output feature");
                Error::feature_conversion(name.as_str(), e)
            })?,
            None => DynamicValue::None,
        };
        outputs.insert(name, value);
    }

    Ok(outputs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extras_take_precedence() {
        let inputs: DynamicMap = [("x", DynamicValue::Int(1))].into_iter().collect();
        let extras = HashMap::from([("x".to_string(), FeatureValue::Int64(2))]);
        let provider = build_provider(&inputs, Some(&extras), &ConversionOptions::default()).unwrap();
        assert_eq!(provider.get("x"), Some(&FeatureValue::Int64(2)));
        assert_eq!(provider.len(), 1);
    }

    #[test]
    fn test_extras_only() {
        let extras = HashMap::from([("k".to_string(), FeatureValue::String("v".into()))]);
        let provider =
            build_provider(&DynamicMap::new(), Some(&extras), &ConversionOptions::default()).unwrap();
        assert!(provider.contains("k"));
    }

    #[test]
    fn test_failure_names_feature() {
        let inputs: DynamicMap = [
            ("ok", DynamicValue::Int(1)),
            ("bad", DynamicValue::opaque("object")),
        ]
        .into_iter()
        .collect();
        let err = build_provider(&inputs, None, &ConversionOptions::default()).unwrap_err();
        assert_eq!(err.feature_name(), Some("bad"));
        assert!(matches!(err.root_cause(), Error::UnsupportedValue(_)));
    }

    #[test]
    fn test_missing_value_extracts_as_none() {
        struct Sparse;

        impl FeatureProvider for Sparse {
            fn feature_names(&self) -> Vec<String> {
                vec!["ghost".to_string()]
            }

            fn feature_value(&self, _name: &str) -> Option<&FeatureValue> {
                None
            }
        }

        let outputs = extract_dict(&Sparse, &HashSet::new()).unwrap();
        assert_eq!(outputs.get("ghost"), Some(&DynamicValue::None));
    }
}
