//! Geometry, collision, text, and drawing primitives for Trellis.
//!
//! This crate is independent of any widget: it provides the value types
//! widgets are positioned with, the intersection tests they use for hit
//! testing, and the [`Renderer`] interface they draw through.
//!
//! # Points
//!
//! ```
//! use trellis_render::Point;
//!
//! let mut velocity = Point::new(3.0, 4.0);
//! assert_eq!(velocity.length(), 5.0);
//! velocity.scale_to_length(10.0);
//! assert_eq!(velocity.position(), (6.0, 8.0));
//! ```
//!
//! # Collision
//!
//! ```
//! use trellis_render::collision::{are_polygons_intersecting, Bounds};
//!
//! let a = Bounds::new(0.0, 2.0, 2.0, 0.0).corners();
//! let b = Bounds::new(1.0, 3.0, 3.0, 1.0).corners();
//! assert!(are_polygons_intersecting(&a, &b));
//! ```

pub mod collision;
mod error;
pub mod geometry;
mod point;
mod registry;
mod renderer;
pub mod text;
mod types;

pub use collision::{Bounds, Collider, ColliderList, CollisionMethod, CollisionTarget, Edges, IntersectionMode};
pub use error::{RenderError, RenderResult};
pub use point::Point;
pub use registry::{PointId, PointRegistry};
pub use renderer::{DrawCommand, FrameStats, Outline, RecordingRenderer, Renderer, Texture};
pub use text::{Font, HorizontalAlign, LayoutOptions, MarkupDecoder, StyledRun, TextLayout, TextStyle};
pub use types::{Color, HasIntrinsicSize, Size};
