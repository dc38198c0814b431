//! Error types for the widget layer.

use std::path::PathBuf;

use thiserror::Error;
use trellis_core::WidgetId;
use trellis_render::RenderError;

/// Errors raised by widgets, the application container, and text utilities.
#[derive(Debug, Error)]
pub enum WidgetError {
    /// A constructor argument was rejected.
    #[error("invalid {widget} configuration: {message}")]
    Configuration {
        widget: &'static str,
        message: String,
    },

    /// The operation is not permitted in the current state.
    #[error("operation not permitted: {0}")]
    InvalidOperation(String),

    /// A lookup table was malformed.
    #[error("lookup failed: {0}")]
    Lookup(String),

    /// A numeric argument fell outside the accepted range.
    #[error("{value} is out of range ({min}..={max})")]
    OutOfRange { value: i64, min: i64, max: i64 },

    /// The id does not name an attached widget.
    #[error("widget {0:?} is not attached")]
    WidgetNotFound(WidgetId),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl WidgetError {
    pub(crate) fn configuration(widget: &'static str, message: impl Into<String>) -> Self {
        Self::Configuration {
            widget,
            message: message.into(),
        }
    }
}

/// Result alias for widget operations.
pub type WidgetResult<T> = std::result::Result<T, WidgetError>;

/// Errors raised while loading or validating an [`ApplicationConfig`](crate::ApplicationConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("window {dimension} must not be negative (got {value})")]
    NegativeSize { dimension: &'static str, value: i32 },

    #[error("unknown window style `{0}`")]
    InvalidStyle(String),

    #[error("unknown gc mode `{0}`")]
    InvalidGcMode(String),

    #[error("invalid background color `{0}`")]
    InvalidColor(String),
}
