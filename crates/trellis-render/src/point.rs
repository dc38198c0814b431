//! The 2D point/vector primitive.
//!
//! [`Point`] is a mutable value: most vector operations update the point in
//! place *and* hand back the resulting `(x, y)` tuple, so callers can either
//! keep working with the point or use the coordinates directly.
//!
//! ```
//! use trellis_render::Point;
//!
//! let mut a = Point::new(5.0, 3.0);
//! let result = &mut a + Point::new(2.0, 1.0);
//! assert_eq!(result, (7.0, 4.0));
//! assert_eq!(a.position(), (7.0, 4.0));
//! ```
//!
//! Pure arithmetic (`a + b` on owned values) returns a new point and leaves
//! the operands untouched.

use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use bytemuck::{Pod, Zeroable};

use crate::collision;

/// A point in 2D space with an attached velocity.
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable)]
#[repr(C)]
pub struct Point {
    pub x: f32,
    pub y: f32,
    /// Horizontal velocity applied by [`update`](Self::update).
    pub vx: f32,
    /// Vertical velocity applied by [`update`](Self::update).
    pub vy: f32,
}

impl Point {
    /// Create a new point at rest.
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            vx: 0.0,
            vy: 0.0,
        }
    }

    /// The origin point (0, 0).
    pub const ZERO: Self = Self::new(0.0, 0.0);

    /// Return this point with the given velocity.
    #[inline]
    pub const fn with_velocity(mut self, vx: f32, vy: f32) -> Self {
        self.vx = vx;
        self.vy = vy;
        self
    }

    /// The coordinates as a tuple.
    #[inline]
    pub fn position(&self) -> (f32, f32) {
        (self.x, self.y)
    }

    /// Move the point to the given coordinates.
    #[inline]
    pub fn set_position(&mut self, (x, y): (f32, f32)) {
        self.x = x;
        self.y = y;
    }

    /// Euclidean length. Always recomputed from the current coordinates.
    #[inline]
    pub fn length(&self) -> f32 {
        self.x.hypot(self.y)
    }

    /// Squared length; cheaper than [`length`](Self::length) for comparisons.
    #[inline]
    pub fn squared_length(&self) -> f32 {
        self.x * self.x + self.y * self.y
    }

    /// Angle of the vector in radians, or 0 for the zero vector.
    pub fn angle(&self) -> f32 {
        if self.squared_length() == 0.0 {
            return 0.0;
        }
        self.y.atan2(self.x)
    }

    /// Distance to another point.
    #[inline]
    pub fn get_distance(&self, other: &Point) -> f32 {
        crate::geometry::get_distance(self, other)
    }

    /// The closest point of `points` and its distance, or `None` if empty.
    pub fn get_closest<'a>(&self, points: &'a [Point]) -> Option<(&'a Point, f32)> {
        crate::geometry::get_closest(self, points).map(|(index, distance)| (&points[index], distance))
    }

    /// Whether this point lies inside `polygon` (ray-casting parity).
    pub fn is_in_polygon(&self, polygon: &[Point]) -> bool {
        collision::is_point_in_polygon(self, polygon)
    }

    /// Dot product.
    #[inline]
    pub fn dot(&self, other: &Point) -> f32 {
        self.x * other.x + self.y * other.y
    }

    /// 2D cross product (the z component of the 3D cross product).
    #[inline]
    pub fn cross(&self, other: &Point) -> f32 {
        self.x * other.y - self.y * other.x
    }

    /// Signed angle from this vector to `other`, in (-π, π].
    pub fn get_angle_between(&self, other: &Point) -> f32 {
        self.cross(other).atan2(self.dot(other))
    }

    /// Scale the vector so its length becomes `length`.
    ///
    /// A zero vector has no direction and is left unchanged.
    pub fn scale_to_length(&mut self, length: f32) -> (f32, f32) {
        let old = self.length();
        if old != 0.0 {
            self.x = self.x * length / old;
            self.y = self.y * length / old;
        }
        self.position()
    }

    /// Rotate the vector by `angle` radians around the origin.
    pub fn rotate(&mut self, angle: f32) -> (f32, f32) {
        let (sine, cosine) = angle.sin_cos();
        let x = self.x * cosine - self.y * sine;
        let y = self.x * sine + self.y * cosine;
        self.set_position((x, y));
        self.position()
    }

    /// Normalize to unit length. The zero vector is left unchanged.
    pub fn normalized(&mut self) -> (f32, f32) {
        let length = self.length();
        if length != 0.0 {
            self.x /= length;
            self.y /= length;
        }
        self.position()
    }

    /// Rotate by 90° counter-clockwise.
    pub fn perpendicular(&mut self) -> (f32, f32) {
        let (x, y) = (-self.y, self.x);
        self.set_position((x, y));
        self.position()
    }

    /// Perpendicular unit vector. The zero vector is left unchanged.
    pub fn perpendicular_normal(&mut self) -> (f32, f32) {
        let length = self.length();
        if length != 0.0 {
            let (x, y) = (-self.y / length, self.x / length);
            self.set_position((x, y));
        }
        self.position()
    }

    /// Project onto `other`. Projecting onto the zero vector leaves the
    /// point unchanged.
    pub fn projection(&mut self, other: &Point) -> (f32, f32) {
        let length_squared = other.squared_length();
        if length_squared != 0.0 {
            let factor = self.dot(other) / length_squared;
            self.x = other.x * factor;
            self.y = other.y * factor;
        }
        self.position()
    }

    /// Move a fraction `t` of the way towards `other`.
    pub fn interpolate_to(&mut self, other: &Point, t: f32) -> (f32, f32) {
        self.x += (other.x - self.x) * t;
        self.y += (other.y - self.y) * t;
        self.position()
    }

    /// Express the point in the basis spanned by `basis`.
    ///
    /// A zero basis vector leaves the matching coordinate unchanged.
    pub fn to_basis(&mut self, basis: [Point; 2]) -> (f32, f32) {
        let [u, v] = basis;
        let x = if u.squared_length() != 0.0 {
            self.dot(&u) / u.squared_length()
        } else {
            self.x
        };
        let y = if v.squared_length() != 0.0 {
            self.dot(&v) / v.squared_length()
        } else {
            self.y
        };
        self.set_position((x, y));
        self.position()
    }

    /// Swap the x and y coordinates.
    pub fn inverse(&mut self) -> (f32, f32) {
        std::mem::swap(&mut self.x, &mut self.y);
        self.position()
    }

    /// Divide both coordinates by `value`, rounding towards negative infinity.
    pub fn floor_div(&mut self, value: f32) -> (f32, f32) {
        self.x = (self.x / value).floor();
        self.y = (self.y / value).floor();
        self.position()
    }

    /// Advance the point by its velocity. Called once per update tick.
    pub fn update(&mut self, _delta: f32) {
        self.x += self.vx;
        self.y += self.vy;
    }

    /// Convert to a glam Vec2.
    #[inline]
    pub fn to_vec2(self) -> glam::Vec2 {
        glam::Vec2::new(self.x, self.y)
    }

    /// Create from a glam Vec2.
    #[inline]
    pub fn from_vec2(v: glam::Vec2) -> Self {
        Self::new(v.x, v.y)
    }
}

impl From<(f32, f32)> for Point {
    fn from((x, y): (f32, f32)) -> Self {
        Self::new(x, y)
    }
}

impl From<[f32; 2]> for Point {
    fn from([x, y]: [f32; 2]) -> Self {
        Self::new(x, y)
    }
}

impl From<glam::Vec2> for Point {
    fn from(v: glam::Vec2) -> Self {
        Self::from_vec2(v)
    }
}

// Pure value arithmetic. Velocity is carried from the left-hand side.

impl Add for Point {
    type Output = Point;

    fn add(mut self, rhs: Point) -> Point {
        self += rhs;
        self
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(mut self, rhs: Point) -> Point {
        self -= rhs;
        self
    }
}

impl Mul<f32> for Point {
    type Output = Point;

    fn mul(mut self, rhs: f32) -> Point {
        self *= rhs;
        self
    }
}

impl Div<f32> for Point {
    type Output = Point;

    fn div(mut self, rhs: f32) -> Point {
        self /= rhs;
        self
    }
}

impl Neg for Point {
    type Output = Point;

    fn neg(mut self) -> Point {
        self.x = -self.x;
        self.y = -self.y;
        self
    }
}

impl AddAssign for Point {
    fn add_assign(&mut self, rhs: Point) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl SubAssign for Point {
    fn sub_assign(&mut self, rhs: Point) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl MulAssign<f32> for Point {
    fn mul_assign(&mut self, rhs: f32) {
        self.x *= rhs;
        self.y *= rhs;
    }
}

impl DivAssign<f32> for Point {
    fn div_assign(&mut self, rhs: f32) {
        self.x /= rhs;
        self.y /= rhs;
    }
}

// In-place operators: mutate the borrowed left operand and report the result.

impl Add<Point> for &mut Point {
    type Output = (f32, f32);

    fn add(self, rhs: Point) -> (f32, f32) {
        *self += rhs;
        self.position()
    }
}

impl Add<(f32, f32)> for &mut Point {
    type Output = (f32, f32);

    fn add(self, rhs: (f32, f32)) -> (f32, f32) {
        self + Point::from(rhs)
    }
}

impl Sub<Point> for &mut Point {
    type Output = (f32, f32);

    fn sub(self, rhs: Point) -> (f32, f32) {
        *self -= rhs;
        self.position()
    }
}

impl Sub<(f32, f32)> for &mut Point {
    type Output = (f32, f32);

    fn sub(self, rhs: (f32, f32)) -> (f32, f32) {
        self - Point::from(rhs)
    }
}

impl Mul<f32> for &mut Point {
    type Output = (f32, f32);

    fn mul(self, rhs: f32) -> (f32, f32) {
        *self *= rhs;
        self.position()
    }
}

impl Div<f32> for &mut Point {
    type Output = (f32, f32);

    fn div(self, rhs: f32) -> (f32, f32) {
        *self /= rhs;
        self.position()
    }
}

impl Neg for &mut Point {
    type Output = (f32, f32);

    fn neg(self) -> (f32, f32) {
        self.x = -self.x;
        self.y = -self.y;
        self.position()
    }
}

// Reversed forms with a plain tuple or scalar on the left.

impl Add<&mut Point> for (f32, f32) {
    type Output = (f32, f32);

    fn add(self, rhs: &mut Point) -> (f32, f32) {
        rhs + self
    }
}

/// `other - point`: the point becomes the difference.
impl Sub<&mut Point> for (f32, f32) {
    type Output = (f32, f32);

    fn sub(self, rhs: &mut Point) -> (f32, f32) {
        rhs.x = self.0 - rhs.x;
        rhs.y = self.1 - rhs.y;
        rhs.position()
    }
}

impl Mul<&mut Point> for f32 {
    type Output = (f32, f32);

    fn mul(self, rhs: &mut Point) -> (f32, f32) {
        rhs * self
    }
}
