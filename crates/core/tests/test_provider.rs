//! Provider assembly and extraction tests

use std::collections::{HashMap, HashSet};

use featurebridge_core::{
    build_provider, check_native, extract_dict, ConversionOptions, DictionaryFeatureProvider,
    DynamicImage, DynamicMap, DynamicValue, Error, ErrorKind, FeatureProvider, FeatureValue,
    NativeError, PixelBuffer, PixelFormat,
};

fn options() -> ConversionOptions {
    ConversionOptions::default()
}

#[cfg(test)]
mod build_tests {
    use super::*;

    #[test]
    fn test_extras_precedence() {
        let inputs: DynamicMap = [("x", DynamicValue::Int(1))].into_iter().collect();
        let extras = HashMap::from([("x".to_string(), FeatureValue::Int64(2))]);

        let provider = build_provider(&inputs, Some(&extras), &options()).unwrap();

        assert_eq!(provider.feature_value("x"), Some(&FeatureValue::Int64(2)));
    }

    #[test]
    fn test_partial_failure_returns_no_provider() {
        let image = DynamicImage::new("RGBA", 1, 1, vec![1, 2, 3, 4]).unwrap();
        let inputs: DynamicMap = [
            ("first", DynamicValue::Int(1)),
            ("second", DynamicValue::Image(image)),
            (
                "third",
                DynamicValue::Dict(vec![(DynamicValue::Float(0.5), DynamicValue::Int(1))]),
            ),
            ("fourth", DynamicValue::Float(4.0)),
            ("fifth", DynamicValue::from("five")),
        ]
        .into_iter()
        .collect();

        let err = build_provider(&inputs, None, &options()).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::FeatureConversion);
        assert_eq!(err.feature_name(), Some("third"));
        assert_eq!(err.root_cause().kind(), ErrorKind::UnsupportedKeyType);
        assert!(err.to_string().contains("third"));
    }

    #[test]
    fn test_failure_releases_shared_pixel_buffers() {
        let shared = PixelBuffer::new(1, 1, PixelFormat::Bgra32, vec![0; 4]).unwrap();
        let extras = HashMap::from([("frame".to_string(), FeatureValue::Image(shared.clone()))]);
        let before = shared.ref_count();

        let inputs: DynamicMap = [("bad", DynamicValue::opaque("generator"))].into_iter().collect();
        assert!(build_provider(&inputs, Some(&extras), &options()).is_err());
        assert_eq!(shared.ref_count(), before);

        let provider = build_provider(&DynamicMap::new(), Some(&extras), &options()).unwrap();
        assert_eq!(shared.ref_count(), before + 1);
        drop(provider);
        assert_eq!(shared.ref_count(), before);
    }

    #[test]
    fn test_unsupported_key_leaves_nothing() {
        let inputs: DynamicMap = [(
            "probs",
            DynamicValue::Dict(vec![
                (DynamicValue::from("a"), DynamicValue::Float(0.5)),
                (DynamicValue::Float(2.0), DynamicValue::Float(0.5)),
            ]),
        )]
        .into_iter()
        .collect();

        match build_provider(&inputs, None, &options()) {
            Err(Error::FeatureConversion { name, source }) => {
                assert_eq!(name, "probs");
                assert!(matches!(*source, Error::UnsupportedKeyType(_)));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}

#[cfg(test)]
mod extract_tests {
    use super::*;

    fn provider() -> DictionaryFeatureProvider {
        [
            ("x".to_string(), FeatureValue::Double(1.0)),
            ("y".to_string(), FeatureValue::String("skip me".into())),
            ("z".to_string(), FeatureValue::Undefined),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_skip_filter() {
        let skip = HashSet::from(["y".to_string()]);
        let outputs = extract_dict(&provider(), &skip).unwrap();

        assert!(!outputs.contains_key("y"));
        assert_eq!(outputs.len(), 2);
        assert_eq!(outputs.get("x"), Some(&DynamicValue::Float(1.0)));
        assert_eq!(outputs.get("z"), Some(&DynamicValue::None));
    }

    #[test]
    fn test_inputs_survive_full_cycle() {
        let inputs: DynamicMap = [
            ("count", DynamicValue::Int(5)),
            ("tags", DynamicValue::List(vec![DynamicValue::from("a")])),
        ]
        .into_iter()
        .collect();
        let provider = build_provider(&inputs, None, &options()).unwrap();
        let outputs = extract_dict(&provider, &HashSet::new()).unwrap();

        for (name, value) in inputs.iter() {
            assert_eq!(outputs.get(name), Some(value));
        }
    }
}

#[cfg(test)]
mod error_tests {
    use super::*;

    #[test]
    fn test_native_error_fidelity() {
        let err = check_native(Some(NativeError::new("X", 7, "bad input"))).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::NativeFramework);
        let native = err.to_native_error();
        assert_eq!(native.domain(), "X");
        assert_eq!(native.code(), 7);
        assert_eq!(native.message(), "bad input");
    }
}
