//! Core systems for Trellis.
//!
//! This crate provides the foundational pieces shared by the Trellis crates:
//!
//! - **Signals**: type-safe slot connections for widget notifications
//! - **Logging**: tracing targets, macros, and performance spans
//! - **Identifiers**: the generational [`WidgetId`] arena key
//! - **Errors**: the shared [`CoreError`] type
//!
//! # Signal Example
//!
//! ```
//! use trellis_core::Signal;
//!
//! let value_changed = Signal::<i32>::new();
//! let conn_id = value_changed.connect(|value| {
//!     println!("Value changed to: {}", value);
//! });
//! value_changed.emit(42);
//! value_changed.disconnect(conn_id);
//! ```

mod error;
mod id;
pub mod logging;
pub mod signal;

pub use error::{CoreError, Result, SignalError};
pub use id::WidgetId;
pub use logging::PerfSpan;
pub use signal::{ConnectionId, Signal};
