//! Free geometry helpers.
//!
//! Distances, angles, interpolation, polygon construction, randomized
//! placement, and conversion of CSS-like distance strings into pixels.

use rand::Rng;
use regex::Regex;

use crate::error::{RenderError, RenderResult};
use crate::point::Point;

/// Screen resolution assumed by [`parse_distance`] when none is given.
pub const DEFAULT_DPI: f32 = 96.0;

/// Distance between two points.
#[inline]
pub fn get_distance(a: &Point, b: &Point) -> f32 {
    (a.x - b.x).hypot(a.y - b.y)
}

/// Index and distance of the point in `points` closest to `target`.
///
/// Ties keep the earliest point. Returns `None` for an empty slice.
pub fn get_closest(target: &Point, points: &[Point]) -> Option<(usize, f32)> {
    let mut best: Option<(usize, f32)> = None;
    for (index, point) in points.iter().enumerate() {
        let distance = get_distance(target, point);
        match best {
            Some((_, closest)) if closest <= distance => {}
            _ => best = Some((index, distance)),
        }
    }
    best
}

fn round_to(value: f32, digits: i32) -> f32 {
    let factor = 10f32.powi(digits);
    (value * factor).round() / factor
}

/// Rotate `point` by `degrees` around `center`, rounding to 2 decimals.
///
/// The point is moved and the new coordinates are returned.
pub fn rotate_point(point: &mut Point, center: &Point, degrees: f32) -> (f32, f32) {
    let offset = glam::Vec2::new(point.x - center.x, point.y - center.y);
    let rotated = glam::Vec2::from_angle(degrees.to_radians()).rotate(offset);
    point.x = round_to(rotated.x + center.x, 2);
    point.y = round_to(rotated.y + center.y, 2);
    point.position()
}

/// Bearing from `a` to `b` in degrees, measured clockwise from the +y axis.
pub fn get_angle_degrees(a: &Point, b: &Point) -> f32 {
    get_angle_radians(a, b).to_degrees()
}

/// Bearing from `a` to `b` in radians, measured clockwise from the +y axis.
pub fn get_angle_radians(a: &Point, b: &Point) -> f32 {
    (b.x - a.x).atan2(b.y - a.y)
}

/// Corner coordinates `(left, top, right, bottom)` of a center-based rectangle.
pub fn convert_xywh_to_points(center: &Point, width: f32, height: f32) -> (f32, f32, f32, f32) {
    (
        center.x - width / 2.0,
        center.y + height / 2.0,
        center.x + width / 2.0,
        center.y - height / 2.0,
    )
}

/// Linear interpolation between two values.
#[inline]
pub fn lerp(a: f32, b: f32, u: f32) -> f32 {
    a + (b - a) * u
}

/// Linear interpolation between two points.
pub fn lerp_point(a: &Point, b: &Point, u: f32) -> Point {
    Point::new(lerp(a.x, b.x, u), lerp(a.y, b.y, u))
}

/// Vertices of a regular polygon inscribed in a circle.
///
/// The first vertex is the bottom-left one; vertices proceed
/// counter-clockwise. `rotation` is in degrees. Coordinates are rounded to
/// 2 decimals.
pub fn compute_regular_polygon_vertices(
    centroid: &Point,
    radius: f32,
    sides: usize,
    rotation: f32,
) -> RenderResult<Vec<Point>> {
    if sides < 3 {
        return Err(RenderError::InvalidPolygon(format!(
            "a polygon needs at least 3 sides, got {sides}"
        )));
    }
    if radius <= 0.0 {
        return Err(RenderError::InvalidPolygon(format!(
            "bounding circle radius must be positive, got {radius}"
        )));
    }

    let step = 360.0 / sides as f32;
    let mut angle = (270.0 - 0.5 * step) + rotation;
    let mut vertices = Vec::with_capacity(sides);

    for _ in 0..sides {
        let phi = (360.0 - angle).to_radians();
        vertices.push(Point::new(
            round_to(radius * phi.cos() + centroid.x, 2),
            round_to(radius * phi.sin() + centroid.y, 2),
        ));
        angle += step;
        if angle > 360.0 {
            angle -= 360.0;
        }
    }

    Ok(vertices)
}

/// A uniformly random point inside an axis-aligned rectangle whose
/// bottom-left corner is `origin`.
pub fn random_vector_in_rectangle<R: Rng + ?Sized>(
    rng: &mut R,
    origin: &Point,
    width: f32,
    height: f32,
) -> Point {
    Point::new(
        origin.x + rng.gen_range(0.0..=width.max(0.0)),
        origin.y + rng.gen_range(0.0..=height.max(0.0)),
    )
}

/// A random point inside a circle.
///
/// Radius and angle are drawn independently, so points concentrate near the
/// center.
pub fn random_vector_in_circle<R: Rng + ?Sized>(rng: &mut R, center: &Point, radius: f32) -> Point {
    let angle = std::f32::consts::TAU * rng.r#gen::<f32>();
    let distance = radius * rng.r#gen::<f32>();
    Point::new(
        distance * angle.cos() + center.x,
        distance * angle.sin() + center.y,
    )
}

/// A random point on the segment between `a` and `b`.
pub fn random_vector_on_line<R: Rng + ?Sized>(rng: &mut R, a: &Point, b: &Point) -> Point {
    lerp_point(a, b, rng.gen_range(0.0..=1.0))
}

/// `true` with a one-in-`value` chance.
pub fn chance<R: Rng + ?Sized>(rng: &mut R, value: u32) -> bool {
    value > 0 && rng.gen_range(1..=value) == 1
}

/// Convert a distance such as `"12pt"` or `"2.5cm"` to whole pixels.
///
/// Supported units are `px`, `pt`, `pc`, `in`, `mm`, and `cm`; a bare
/// number is taken as pixels. Conversion runs in `f64` and the result is
/// truncated towards zero, so `"2.54cm"` at 96 dpi is 95, not 96.
pub fn parse_distance(input: &str, dpi: f32) -> RenderResult<i32> {
    let invalid = |reason: &str| RenderError::InvalidDistance {
        input: input.to_string(),
        reason: reason.to_string(),
    };

    let pattern = Regex::new(r"^\s*([-+]?[0-9]*\.?[0-9]+)\s*([a-zA-Z]*)\s*$")?;
    let captures = pattern
        .captures(input)
        .ok_or_else(|| invalid("expected a number followed by an optional unit"))?;
    let value: f64 = captures[1]
        .parse()
        .map_err(|_| invalid("the numeric part could not be parsed"))?;
    let dpi = f64::from(dpi);

    let pixels = match &captures[2] {
        "" | "px" => value,
        "pt" => value * dpi / 72.0,
        "pc" => value * dpi / 6.0,
        "in" => value * dpi,
        "mm" => value * dpi * 0.039_370_078_7,
        "cm" => value * dpi * 0.393_700_787,
        _ => {
            return Err(invalid(
                "unknown unit; valid units are px, pt, pc, in, mm, and cm",
            ));
        }
    };

    Ok(pixels.trunc() as i32)
}
