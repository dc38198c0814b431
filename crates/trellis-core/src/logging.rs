//! Logging and tracing facilities for Trellis.
//!
//! Trellis uses the `tracing` crate for instrumentation. To see logs, install
//! a subscriber in your application:
//!
//! ```ignore
//! fn main() {
//!     tracing_subscriber::fmt::init();
//!     // Your application code...
//! }
//! ```
//!
//! Every subsystem logs under one of the [`targets`], so output can be
//! filtered per subsystem, e.g. `RUST_LOG=trellis::focus=debug`.

/// Span names used throughout Trellis for tracing.
pub mod span_names {
    /// Input broadcast span.
    pub const DISPATCH: &str = "trellis::dispatch";
    /// Frame drawing span.
    pub const DRAW: &str = "trellis::draw";
    /// Collision batch span.
    pub const COLLISION: &str = "trellis::collision";
}

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Core framework target.
    pub const CORE: &str = "trellis_core";
    /// Signal/slot system target.
    pub const SIGNAL: &str = "trellis_core::signal";
    /// Widget lifecycle target (attach, create, delete).
    pub const WIDGET: &str = "trellis::widget";
    /// Focus changes and Tab traversal.
    pub const FOCUS: &str = "trellis::focus";
    /// Input broadcast and deferred mutation.
    pub const DISPATCH: &str = "trellis::dispatch";
    /// Configuration loading and validation.
    pub const CONFIG: &str = "trellis::config";
    /// Rendering collaborator.
    pub const RENDER: &str = "trellis_render";
    /// Geometry and collision queries.
    pub const COLLISION: &str = "trellis_render::collision";
    /// Performance spans.
    pub const PERF: &str = "trellis::perf";
}

/// A span guard for timing an operation.
///
/// The span stays entered until the guard is dropped.
///
/// ```
/// use trellis_core::PerfSpan;
///
/// let _span = PerfSpan::new("layout");
/// // ... timed work ...
/// ```
#[derive(Debug)]
pub struct PerfSpan {
    #[allow(dead_code)]
    span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Enter a new performance span for `name`.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::info_span!(target: "trellis::perf", "perf", operation = name);
        Self {
            span: span.entered(),
        }
    }
}

/// Log at trace level under the core target.
#[macro_export]
macro_rules! trellis_trace {
    ($($arg:tt)*) => {
        tracing::trace!(target: "trellis_core", $($arg)*)
    };
}

/// Log at debug level under the core target.
#[macro_export]
macro_rules! trellis_debug {
    ($($arg:tt)*) => {
        tracing::debug!(target: "trellis_core", $($arg)*)
    };
}

/// Log at info level under the core target.
#[macro_export]
macro_rules! trellis_info {
    ($($arg:tt)*) => {
        tracing::info!(target: "trellis_core", $($arg)*)
    };
}

/// Log at warn level under the core target.
#[macro_export]
macro_rules! trellis_warn {
    ($($arg:tt)*) => {
        tracing::warn!(target: "trellis_core", $($arg)*)
    };
}

/// Log at error level under the core target.
#[macro_export]
macro_rules! trellis_error {
    ($($arg:tt)*) => {
        tracing::error!(target: "trellis_core", $($arg)*)
    };
}
