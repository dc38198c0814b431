//! Collision and intersection queries.
//!
//! Two layers live here:
//!
//! - Pure geometry: [`are_rects_intersecting`], [`are_polygons_intersecting`]
//!   (separating axis theorem), and [`is_point_in_polygon`] (ray casting).
//! - Object queries: [`check_collision`] tests one [`Collider`] against a
//!   single object, a [`ColliderList`], or a nested collection, choosing a
//!   brute-force scan, a spatial-hash lookup, or a parallel batch query.
//!
//! # Touching shapes
//!
//! [`are_polygons_intersecting`] treats polygons that share an edge or a
//! vertex as intersecting. Use [`are_polygons_intersecting_with`] and
//! [`IntersectionMode::Strict`] when only overlapping interiors count.

use std::collections::HashMap;

use rayon::prelude::*;
use trellis_core::PerfSpan;
use trellis_core::logging::{span_names, targets};

use crate::error::RenderError;
use crate::point::Point;

/// Collections larger than this use the batch query under [`CollisionMethod::Auto`].
pub const AUTO_BATCH_THRESHOLD: usize = 1500;

/// Anything with axis-aligned edges.
pub trait Edges {
    fn left(&self) -> f32;
    fn right(&self) -> f32;
    fn top(&self) -> f32;
    fn bottom(&self) -> f32;
}

/// An axis-aligned box stored by its edges. `top` is greater than `bottom`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bounds {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl Bounds {
    /// Create bounds from explicit edges.
    pub const fn new(left: f32, right: f32, top: f32, bottom: f32) -> Self {
        Self {
            left,
            right,
            top,
            bottom,
        }
    }

    /// Bounds of a `width` x `height` box centered on `center`.
    pub fn from_center(center: &Point, width: f32, height: f32) -> Self {
        Self::new(
            center.x - width / 2.0,
            center.x + width / 2.0,
            center.y + height / 2.0,
            center.y - height / 2.0,
        )
    }

    /// Smallest bounds enclosing every point. `None` for an empty slice.
    pub fn enclosing(points: &[Point]) -> Option<Self> {
        let first = points.first()?;
        let mut bounds = Self::new(first.x, first.x, first.y, first.y);
        for point in &points[1..] {
            bounds.left = bounds.left.min(point.x);
            bounds.right = bounds.right.max(point.x);
            bounds.top = bounds.top.max(point.y);
            bounds.bottom = bounds.bottom.min(point.y);
        }
        Some(bounds)
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.top - self.bottom
    }

    pub fn center(&self) -> Point {
        Point::new(
            (self.left + self.right) / 2.0,
            (self.top + self.bottom) / 2.0,
        )
    }

    /// Strict containment: points on an edge are outside.
    pub fn contains(&self, point: &Point) -> bool {
        point.x > self.left && point.x < self.right && point.y > self.bottom && point.y < self.top
    }

    /// Corners counter-clockwise starting at the bottom-left one.
    pub fn corners(&self) -> [Point; 4] {
        [
            Point::new(self.left, self.bottom),
            Point::new(self.right, self.bottom),
            Point::new(self.right, self.top),
            Point::new(self.left, self.top),
        ]
    }
}

impl Edges for Bounds {
    fn left(&self) -> f32 {
        self.left
    }

    fn right(&self) -> f32 {
        self.right
    }

    fn top(&self) -> f32 {
        self.top
    }

    fn bottom(&self) -> f32 {
        self.bottom
    }
}

/// Whether two edge-bounded boxes overlap. Shared edges count.
pub fn are_rects_intersecting<A, B>(a: &A, b: &B) -> bool
where
    A: Edges + ?Sized,
    B: Edges + ?Sized,
{
    !(a.right() < b.left() || a.left() > b.right() || a.top() < b.bottom() || a.bottom() > b.top())
}

/// How [`are_polygons_intersecting_with`] treats polygons that only touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IntersectionMode {
    /// Shared edges and vertices count as an intersection.
    #[default]
    Inclusive,
    /// Only overlapping interiors count.
    Strict,
}

/// Separating axis test over convex polygons, counting touching shapes as
/// intersecting.
pub fn are_polygons_intersecting(a: &[Point], b: &[Point]) -> bool {
    are_polygons_intersecting_with(a, b, IntersectionMode::Inclusive)
}

/// Separating axis test over convex polygons.
///
/// Every edge normal of both polygons is tried as an axis. If the projected
/// intervals of `a` and `b` are disjoint on any axis the polygons do not
/// intersect. Empty polygons never intersect.
pub fn are_polygons_intersecting_with(a: &[Point], b: &[Point], mode: IntersectionMode) -> bool {
    if a.is_empty() || b.is_empty() {
        return false;
    }

    for polygon in [a, b] {
        for (i, start) in polygon.iter().enumerate() {
            let end = &polygon[(i + 1) % polygon.len()];
            let normal = (end.y - start.y, start.x - end.x);
            if normal == (0.0, 0.0) {
                continue;
            }

            let (min_a, max_a) = project(a, normal);
            let (min_b, max_b) = project(b, normal);

            let separated = match mode {
                IntersectionMode::Inclusive => max_a < min_b || max_b < min_a,
                IntersectionMode::Strict => max_a <= min_b || max_b <= min_a,
            };
            if separated {
                return false;
            }
        }
    }

    true
}

fn project(polygon: &[Point], (nx, ny): (f32, f32)) -> (f32, f32) {
    polygon.iter().fold((f32::INFINITY, f32::NEG_INFINITY), |(min, max), p| {
        let projected = nx * p.x + ny * p.y;
        (min.min(projected), max.max(projected))
    })
}

/// Ray-casting containment test. An empty polygon contains nothing.
pub fn is_point_in_polygon(point: &Point, polygon: &[Point]) -> bool {
    let Some(first) = polygon.first() else {
        return false;
    };

    let mut inside = false;
    let (mut p1x, mut p1y) = (first.x, first.y);

    for i in 1..=polygon.len() {
        let next = &polygon[i % polygon.len()];
        let (p2x, p2y) = (next.x, next.y);

        if point.y > p1y.min(p2y) && point.y <= p1y.max(p2y) && point.x <= p1x.max(p2x) {
            let crosses = if p1x == p2x {
                true
            } else if p1y != p2y {
                let x_intersection = (point.y - p1y) * (p2x - p1x) / (p2y - p1y) + p1x;
                point.x <= x_intersection
            } else {
                false
            };
            if crosses {
                inside = !inside;
            }
        }

        p1x = p2x;
        p1y = p2y;
    }

    inside
}

/// An object that takes part in collision queries.
pub trait Collider: Sync {
    /// Center of the object.
    fn position(&self) -> Point;

    /// Radius of a circle enclosing the hit box, used to reject far pairs.
    fn collision_radius(&self) -> f32;

    /// Convex hit box in world coordinates.
    fn hit_box(&self) -> Vec<Point>;

    /// Axis-aligned bounds of the hit box.
    fn bounds(&self) -> Bounds {
        Bounds::enclosing(&self.hit_box()).unwrap_or_else(|| {
            let diameter = self.collision_radius() * 2.0;
            Bounds::from_center(&self.position(), diameter, diameter)
        })
    }
}

/// Pair test: a radius pre-check followed by SAT over the hit boxes.
pub fn are_colliding<A, B>(a: &A, b: &B) -> bool
where
    A: Collider + ?Sized,
    B: Collider + ?Sized,
{
    let radius = a.collision_radius() + b.collision_radius();
    let (pa, pb) = (a.position(), b.position());
    let (dx, dy) = (pa.x - pb.x, pa.y - pb.y);

    if dx * dx + dy * dy > radius * radius {
        return false;
    }

    are_polygons_intersecting(&a.hit_box(), &b.hit_box())
}

fn same_object<A: ?Sized, B: ?Sized>(a: &A, b: &B) -> bool {
    std::ptr::addr_eq(a as *const A, b as *const B)
}

/// Uniform grid mapping cells to collider indices.
#[derive(Debug, Clone)]
pub struct SpatialHash {
    cell_size: f32,
    cells: HashMap<(i32, i32), Vec<usize>>,
}

impl SpatialHash {
    /// Create an empty hash. Non-positive cell sizes fall back to 1.
    pub fn new(cell_size: f32) -> Self {
        Self {
            cell_size: if cell_size > 0.0 { cell_size } else { 1.0 },
            cells: HashMap::new(),
        }
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    fn cell_range(&self, bounds: &Bounds) -> impl Iterator<Item = (i32, i32)> + use<> {
        let min_x = (bounds.left / self.cell_size).floor() as i32;
        let max_x = (bounds.right / self.cell_size).floor() as i32;
        let min_y = (bounds.bottom / self.cell_size).floor() as i32;
        let max_y = (bounds.top / self.cell_size).floor() as i32;
        (min_x..=max_x).flat_map(move |x| (min_y..=max_y).map(move |y| (x, y)))
    }

    /// Record `index` in every cell the bounds overlap.
    pub fn insert(&mut self, index: usize, bounds: &Bounds) {
        for cell in self.cell_range(bounds) {
            self.cells.entry(cell).or_default().push(index);
        }
    }

    /// Sorted, de-duplicated indices sharing a cell with `bounds`.
    pub fn query(&self, bounds: &Bounds) -> Vec<usize> {
        let mut found: Vec<usize> = self
            .cell_range(bounds)
            .filter_map(|cell| self.cells.get(&cell))
            .flatten()
            .copied()
            .collect();
        found.sort_unstable();
        found.dedup();
        found
    }

    pub fn clear(&mut self) {
        self.cells.clear();
    }

    /// Number of occupied cells.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }
}

/// A homogeneous collection of colliders with an optional spatial hash.
///
/// The hash is rebuilt on insertion and removal. Call [`rehash`](Self::rehash)
/// after moving members.
#[derive(Debug, Clone)]
pub struct ColliderList<T> {
    items: Vec<T>,
    spatial_hash: Option<SpatialHash>,
}

impl<T> Default for ColliderList<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            spatial_hash: None,
        }
    }
}

impl<T: Collider> ColliderList<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a list that maintains a spatial hash with the given cell size.
    pub fn with_spatial_hash(cell_size: f32) -> Self {
        Self {
            items: Vec::new(),
            spatial_hash: Some(SpatialHash::new(cell_size)),
        }
    }

    /// Append an item and return its index.
    pub fn push(&mut self, item: T) -> usize {
        let index = self.items.len();
        if let Some(hash) = &mut self.spatial_hash {
            hash.insert(index, &item.bounds());
        }
        self.items.push(item);
        index
    }

    /// Remove the item at `index`, shifting later items down.
    pub fn remove(&mut self, index: usize) -> Option<T> {
        if index >= self.items.len() {
            return None;
        }
        let item = self.items.remove(index);
        self.rehash();
        Some(item)
    }

    /// Recompute the spatial hash from current positions.
    pub fn rehash(&mut self) {
        if let Some(hash) = &mut self.spatial_hash {
            hash.clear();
            for (index, item) in self.items.iter().enumerate() {
                hash.insert(index, &item.bounds());
            }
        }
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.items.get_mut(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn spatial_hash(&self) -> Option<&SpatialHash> {
        self.spatial_hash.as_ref()
    }
}

impl<T: Collider> FromIterator<T> for ColliderList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = Self::new();
        for item in iter {
            list.push(item);
        }
        list
    }
}

/// Strategy used by [`check_collision`] for collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CollisionMethod {
    /// Spatial hash when present, batch above the threshold, brute force otherwise.
    #[default]
    Auto,
    /// Spatial hash when present, batch otherwise.
    SpatialHash,
    /// Data-parallel scan of the whole collection.
    Batch,
    /// Sequential scan of the whole collection.
    BruteForce,
}

impl TryFrom<u8> for CollisionMethod {
    type Error = RenderError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::Auto),
            1 => Ok(Self::SpatialHash),
            2 => Ok(Self::Batch),
            3 => Ok(Self::BruteForce),
            other => Err(RenderError::UnknownCollisionMethod(other)),
        }
    }
}

/// What a collider is tested against.
#[derive(Debug, Clone, Copy)]
pub enum CollisionTarget<'a, T> {
    Single(&'a T),
    List(&'a ColliderList<T>),
    Nested(&'a [ColliderList<T>]),
}

/// Every member of `target` colliding with `a`, in collection order.
///
/// `a` never collides with itself, so passing a list that contains `a` is
/// fine.
pub fn check_collision<'a, A, T>(
    a: &A,
    target: CollisionTarget<'a, T>,
    method: CollisionMethod,
) -> Vec<&'a T>
where
    A: Collider + ?Sized,
    T: Collider,
{
    match target {
        CollisionTarget::Single(b) => {
            if !same_object(a, b) && are_colliding(a, b) {
                vec![b]
            } else {
                Vec::new()
            }
        }
        CollisionTarget::List(list) => check_list(a, list, method),
        CollisionTarget::Nested(lists) => lists
            .iter()
            .flat_map(|list| brute_force(a, list.iter()))
            .collect(),
    }
}

fn check_list<'a, A, T>(a: &A, list: &'a ColliderList<T>, method: CollisionMethod) -> Vec<&'a T>
where
    A: Collider + ?Sized,
    T: Collider,
{
    let use_hash = matches!(method, CollisionMethod::Auto | CollisionMethod::SpatialHash);

    if let (true, Some(hash)) = (use_hash, list.spatial_hash()) {
        let candidates = hash.query(&a.bounds());
        tracing::trace!(
            target: targets::COLLISION,
            candidates = candidates.len(),
            total = list.len(),
            "spatial hash lookup"
        );
        return brute_force(a, candidates.into_iter().filter_map(|i| list.get(i)));
    }

    let brute = method == CollisionMethod::BruteForce
        || (method == CollisionMethod::Auto && list.len() <= AUTO_BATCH_THRESHOLD);

    if brute {
        brute_force(a, list.iter())
    } else {
        batch(a, list)
    }
}

fn brute_force<'a, A, T, I>(a: &A, candidates: I) -> Vec<&'a T>
where
    A: Collider + ?Sized,
    T: Collider + 'a,
    I: IntoIterator<Item = &'a T>,
{
    candidates
        .into_iter()
        .filter(|b| !same_object(a, *b) && are_colliding(a, *b))
        .collect()
}

fn batch<'a, A, T>(a: &A, list: &'a ColliderList<T>) -> Vec<&'a T>
where
    A: Collider + ?Sized,
    T: Collider,
{
    let _span = PerfSpan::new(span_names::COLLISION);
    let hits: Vec<&T> = list
        .items
        .par_iter()
        .filter(|b| !same_object(a, *b) && are_colliding(a, *b))
        .collect();
    tracing::debug!(
        target: targets::COLLISION,
        total = list.len(),
        hits = hits.len(),
        "batch collision query"
    );
    hits
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(x: f32, y: f32, size: f32) -> Vec<Point> {
        Bounds::new(x, x + size, y + size, y).corners().to_vec()
    }

    #[test]
    fn test_rects_share_edge() {
        let a = Bounds::new(0.0, 1.0, 1.0, 0.0);
        let b = Bounds::new(1.0, 2.0, 1.0, 0.0);
        let c = Bounds::new(1.5, 2.0, 1.0, 0.0);
        assert!(are_rects_intersecting(&a, &b));
        assert!(!are_rects_intersecting(&a, &c));
    }

    #[test]
    fn test_bounds_contains_is_strict() {
        let b = Bounds::from_center(&Point::new(0.0, 0.0), 10.0, 4.0);
        assert!(b.contains(&Point::new(4.9, 1.9)));
        assert!(!b.contains(&Point::new(5.0, 0.0)));
        assert!(!b.contains(&Point::new(0.0, -2.0)));
    }

    #[test]
    fn test_overlapping_squares() {
        let a = square(0.0, 0.0, 2.0);
        let b = square(1.0, 1.0, 2.0);
        assert!(are_polygons_intersecting(&a, &b));
        assert!(are_polygons_intersecting_with(&a, &b, IntersectionMode::Strict));
    }

    #[test]
    fn test_touching_squares_depend_on_mode() {
        let a = square(0.0, 0.0, 1.0);
        let b = square(1.0, 0.0, 1.0);
        assert!(are_polygons_intersecting(&a, &b));
        assert!(!are_polygons_intersecting_with(&a, &b, IntersectionMode::Strict));
    }

    #[test]
    fn test_empty_polygons() {
        assert!(!are_polygons_intersecting(&[], &square(0.0, 0.0, 1.0)));
        assert!(!is_point_in_polygon(&Point::ZERO, &[]));
    }

    #[test]
    fn test_point_in_triangle() {
        let triangle = [Point::new(0.0, 0.0), Point::new(4.0, 0.0), Point::new(0.0, 4.0)];
        assert!(is_point_in_polygon(&Point::new(1.0, 1.0), &triangle));
        assert!(!is_point_in_polygon(&Point::new(3.0, 3.0), &triangle));
        assert!(!is_point_in_polygon(&Point::new(-1.0, 1.0), &triangle));
    }

    #[test]
    fn test_collision_method_codes() {
        assert_eq!(CollisionMethod::try_from(0).unwrap(), CollisionMethod::Auto);
        assert_eq!(CollisionMethod::try_from(3).unwrap(), CollisionMethod::BruteForce);
        assert!(matches!(
            CollisionMethod::try_from(4),
            Err(RenderError::UnknownCollisionMethod(4))
        ));
    }

    #[test]
    fn test_spatial_hash_query() {
        let mut hash = SpatialHash::new(10.0);
        hash.insert(0, &Bounds::new(0.0, 5.0, 5.0, 0.0));
        hash.insert(1, &Bounds::new(100.0, 105.0, 105.0, 100.0));
        hash.insert(2, &Bounds::new(8.0, 12.0, 5.0, 0.0));

        assert_eq!(hash.query(&Bounds::new(1.0, 2.0, 2.0, 1.0)), vec![0, 2]);
        assert_eq!(hash.query(&Bounds::new(101.0, 102.0, 102.0, 101.0)), vec![1]);
        assert!(hash.query(&Bounds::new(50.0, 51.0, 51.0, 50.0)).is_empty());
    }
}
