//! The center-based rectangle every widget is positioned with.
//!
//! A [`Rect`] stores the authoritative center and the widget's own stored
//! size. Edges are derived from whichever size the owning widget resolves
//! (its first child's, or the stored one), so the edge helpers here take the
//! resolved size as an argument.
//!
//! Position writes made before the owner is mounted are recorded as pending
//! instead of firing the owner's position hook; [`Rect::mount`] reports the
//! pending write so the hook can run once, after creation.

use trellis_render::{Bounds, Color, Outline, Point, Size};

/// Center, stored size, and mount state of a widget.
#[derive(Debug, Clone, PartialEq)]
pub struct Rect {
    center: Point,
    size: Size,
    mounted: bool,
    needs_position_update: bool,
    bbox: Option<Outline>,
}

impl Rect {
    /// A rect centered on `(x, y)` with zero stored size.
    ///
    /// The position counts as a pending write until the rect is mounted.
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            center: Point::new(x, y),
            size: Size::ZERO,
            mounted: false,
            needs_position_update: true,
            bbox: None,
        }
    }

    pub fn with_size(mut self, width: f32, height: f32) -> Self {
        self.size = Size::new(width, height);
        self
    }

    #[inline]
    pub fn center(&self) -> Point {
        self.center
    }

    #[inline]
    pub fn size(&self) -> Size {
        self.size
    }

    pub fn set_size(&mut self, size: Size) {
        self.size = size;
    }

    /// Move the center.
    ///
    /// Returns `true` when the owner is mounted and its position hook should
    /// run now; otherwise the write is remembered for [`mount`](Self::mount).
    pub fn set_center(&mut self, center: Point) -> bool {
        self.center = center;
        if self.mounted {
            true
        } else {
            self.needs_position_update = true;
            false
        }
    }

    /// Mark the owner as created.
    ///
    /// Returns the pending center if a position write happened before mounting.
    pub fn mount(&mut self) -> Option<Point> {
        self.mounted = true;
        std::mem::take(&mut self.needs_position_update).then_some(self.center)
    }

    #[inline]
    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    #[inline]
    pub fn needs_position_update(&self) -> bool {
        self.needs_position_update
    }

    /// Edges for a resolved size.
    pub fn bounds(&self, size: Size) -> Bounds {
        Bounds::from_center(&self.center, size.width, size.height)
    }

    /// Strict containment: points on an edge are outside.
    pub fn contains(&self, size: Size, point: &Point) -> bool {
        self.bounds(size).contains(point)
    }

    /// The cached debug outline, built on first use and recentered afterwards.
    pub fn bbox(&mut self, size: Size, thickness: f32, padding: f32, color: Color) -> &Outline {
        let center = self.center;
        let outline = self.bbox.get_or_insert_with(|| {
            let padded = size.padded(padding);
            Outline::new(
                Bounds::from_center(&center, padded.width, padded.height),
                color,
                thickness,
            )
        });
        outline.recenter(center.x, center.y);
        outline
    }

    #[inline]
    pub fn has_bbox(&self) -> bool {
        self.bbox.is_some()
    }
}
