//! Error types for featurebridge-core
//!
//! Every conversion failure aborts the surrounding operation. The variants
//! split into user-input failures (the caller handed us a value we cannot
//! represent) and internal-consistency failures (the native framework
//! produced something this binding has no mapping for).

use thiserror::Error;

use crate::native::{NativeError, FEATUREBRIDGE_ERROR_DOMAIN};

/// Result type alias for featurebridge-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Stable discriminant for [`Error`], used by bindings to pick an exception class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    ShapeMismatch,
    UnsupportedElementType,
    Encoding,
    UnsupportedKeyType,
    UnsupportedPixelFormat,
    UnsupportedValue,
    FeatureConversion,
    NativeFramework,
    UnknownFeatureType,
    InvalidPath,
}

impl ErrorKind {
    /// Error code used when the bridge reports itself through a [`NativeError`]
    pub const fn code(self) -> i64 {
        match self {
            ErrorKind::ShapeMismatch => 1,
            ErrorKind::UnsupportedElementType => 2,
            ErrorKind::Encoding => 3,
            ErrorKind::UnsupportedKeyType => 4,
            ErrorKind::UnsupportedPixelFormat => 5,
            ErrorKind::UnsupportedValue => 6,
            ErrorKind::FeatureConversion => 7,
            ErrorKind::NativeFramework => 8,
            ErrorKind::UnknownFeatureType => 9,
            ErrorKind::InvalidPath => 10,
        }
    }

    /// Exception-style name of this kind
    pub const fn name(self) -> &'static str {
        match self {
            ErrorKind::ShapeMismatch => "ShapeMismatchError",
            ErrorKind::UnsupportedElementType => "UnsupportedElementTypeError",
            ErrorKind::Encoding => "EncodingError",
            ErrorKind::UnsupportedKeyType => "UnsupportedKeyTypeError",
            ErrorKind::UnsupportedPixelFormat => "UnsupportedPixelFormatError",
            ErrorKind::UnsupportedValue => "UnsupportedValueError",
            ErrorKind::FeatureConversion => "FeatureConversionError",
            ErrorKind::NativeFramework => "NativeFrameworkError",
            ErrorKind::UnknownFeatureType => "BindingOutOfDateError",
            ErrorKind::InvalidPath => "InvalidPathError",
        }
    }
}

/// Error types that can occur while marshaling features
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// Raw buffer length does not match `product(shape) * element size`
    #[error("Shape mismatch: shape {shape:?} needs {expected} bytes, got {actual}")]
    ShapeMismatch {
        /// Declared shape
        shape: Vec<usize>,
        /// Expected buffer length in bytes
        expected: usize,
        /// Actual buffer length in bytes
        actual: usize,
    },

    /// Element type outside {double, float32, float16, int32}
    #[error("Unsupported element type: {0}")]
    UnsupportedElementType(String),

    /// Text that is not valid in the native string encoding
    #[error("Invalid text encoding: {0}")]
    Encoding(String),

    /// Dictionary key that is neither integer-like nor string-like
    #[error("Unsupported dictionary key type: {0}")]
    UnsupportedKeyType(String),

    /// Image mode or pixel buffer format the native framework cannot take
    #[error("Unsupported pixel format: {0}")]
    UnsupportedPixelFormat(String),

    /// Dynamic value with no native representation
    #[error("Unsupported value: {0}")]
    UnsupportedValue(String),

    /// A named feature failed to convert
    #[error("Failed to convert feature '{name}': {source}")]
    FeatureConversion {
        /// Offending feature name
        name: String,
        /// Underlying cause
        source: Box<Error>,
    },

    /// Opaque error surfaced unchanged from the native framework
    #[error(transparent)]
    NativeFramework(NativeError),

    /// Native feature type with no dynamic mapping (binding is out of date)
    #[error("Unknown native feature type {0}: this binding has no dynamic mapping for it")]
    UnknownFeatureType(i64),

    /// Path that cannot be turned into a native URL
    #[error("Invalid path: {0}")]
    InvalidPath(String),
}

impl Error {
    /// Wrap `source` with the name of the feature being converted
    pub fn feature_conversion(name: impl Into<String>, source: Error) -> Self {
        Error::FeatureConversion {
            name: name.into(),
            source: Box::new(source),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::ShapeMismatch { .. } => ErrorKind::ShapeMismatch,
            Error::UnsupportedElementType(_) => ErrorKind::UnsupportedElementType,
            Error::Encoding(_) => ErrorKind::Encoding,
            Error::UnsupportedKeyType(_) => ErrorKind::UnsupportedKeyType,
            Error::UnsupportedPixelFormat(_) => ErrorKind::UnsupportedPixelFormat,
            Error::UnsupportedValue(_) => ErrorKind::UnsupportedValue,
            Error::FeatureConversion { .. } => ErrorKind::FeatureConversion,
            Error::NativeFramework(_) => ErrorKind::NativeFramework,
            Error::UnknownFeatureType(_) => ErrorKind::UnknownFeatureType,
            Error::InvalidPath(_) => ErrorKind::InvalidPath,
        }
    }

    /// True when the failure means "this binding is out of date" rather than
    /// "the input was wrong"
    pub fn is_internal(&self) -> bool {
        matches!(self.root_cause(), Error::UnknownFeatureType(_))
    }

    /// Innermost error beneath any feature-name wrappers
    pub fn root_cause(&self) -> &Error {
        let mut current = self;
        while let Error::FeatureConversion { source, .. } = current {
            current = source;
        }
        current
    }

    /// Name of the outermost feature this error is attributed to
    pub fn feature_name(&self) -> Option<&str> {
        match self {
            Error::FeatureConversion { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Express this error as a native error object
    ///
    /// Native framework errors come back unchanged; bridge errors are
    /// reported under [`FEATUREBRIDGE_ERROR_DOMAIN`].
    pub fn to_native_error(&self) -> NativeError {
        match self {
            Error::NativeFramework(native) => native.clone(),
            other => NativeError::new(
                FEATUREBRIDGE_ERROR_DOMAIN,
                other.kind().code(),
                other.to_string(),
            ),
        }
    }
}

impl From<NativeError> for Error {
    fn from(err: NativeError) -> Self {
        Error::NativeFramework(err)
    }
}
