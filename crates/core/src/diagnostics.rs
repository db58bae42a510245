//! Error surfacing and process-wide logging handles

use std::sync::OnceLock;

use crate::config::BridgeConfig;
use crate::error::{Error, Result};
use crate::native::NativeError;

/// Logging subsystem shared by both channels
pub const LOG_SUBSYSTEM: &str = "com.featurebridge";

/// Named logging channel
///
/// Carries identity only; formatting and routing belong to whichever
/// `tracing` subscriber the host installed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogChannel {
    subsystem: &'static str,
    category: &'static str,
}

impl LogChannel {
    const fn new(category: &'static str) -> Self {
        Self {
            subsystem: LOG_SUBSYSTEM,
            category,
        }
    }

    pub fn subsystem(&self) -> &'static str {
        self.subsystem
    }

    pub fn category(&self) -> &'static str {
        self.category
    }

    /// Span tagging events with this channel's identity
    pub fn span(&self) -> tracing::Span {
        tracing::info_span!(
            "log_channel",
            subsystem = self.subsystem,
            category = self.category
        )
    }
}

static DEFAULT_LOG: OnceLock<LogChannel> = OnceLock::new();
static TRACING_LOG: OnceLock<LogChannel> = OnceLock::new();

/// General diagnostics channel
pub fn default_log() -> &'static LogChannel {
    DEFAULT_LOG.get_or_init(|| LogChannel::new("default"))
}

/// Channel for dynamic tracing of conversions
pub fn tracing_log() -> &'static LogChannel {
    TRACING_LOG.get_or_init(|| LogChannel::new("dynamic-tracing"))
}

/// Abort the current call with a native error
///
/// Domain, code and message are carried through untouched.
pub fn raise<T>(error: NativeError) -> Result<T> {
    tracing::warn!(
        domain = error.domain(),
        code = error.code(),
        "Native framework error: {}",
        error.message()
    );
    Err(Error::NativeFramework(error))
}

/// Surface the error slot a native call filled in, if any
pub fn check_native(error: Option<NativeError>) -> Result<()> {
    match error {
        Some(error) => raise(error),
        None => Ok(()),
    }
}

/// Install a fmt subscriber; `RUST_LOG` takes precedence over the config
///
/// Does nothing if a global subscriber is already set.
pub fn init_tracing(config: &BridgeConfig) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .or_else(|_| tracing_subscriber::EnvFilter::try_new(&config.log_filter))
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channels_are_singletons() {
        assert!(std::ptr::eq(default_log(), default_log()));
        assert_eq!(default_log().category(), "default");
        assert_eq!(tracing_log().category(), "dynamic-tracing");
        assert_eq!(tracing_log().subsystem(), LOG_SUBSYSTEM);
    }

    #[test]
    fn test_concurrent_first_access() {
        let handles: Vec<_> = (0..8)
            .map(|_| std::thread::spawn(|| tracing_log() as *const LogChannel as usize))
            .collect();
        let addresses: Vec<usize> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(addresses.windows(2).all(|w| w[0] == w[1]));
    }

    #[test]
    fn test_raise_keeps_fields() {
        let err = raise::<()>(NativeError::new("X", 7, "bad input")).unwrap_err();
        match err {
            Error::NativeFramework(native) => {
                assert_eq!(native.domain(), "X");
                assert_eq!(native.code(), 7);
                assert_eq!(native.message(), "bad input");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_check_native() {
        assert!(check_native(None).is_ok());
        assert!(check_native(Some(NativeError::new("X", 1, "m"))).is_err());
    }

    #[test]
    fn test_init_tracing_twice() {
        let config = BridgeConfig::default();
        init_tracing(&config);
        init_tracing(&config);
    }
}
