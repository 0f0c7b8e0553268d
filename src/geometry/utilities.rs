//! Geometry utility functions
//!
//! Bounding-box helpers shared by the layout engine.

use super::point::StrokePoint;
use kurbo::Rect;

/// Bounding box of a run of stroke points, or `None` when there are none
pub fn stroke_bounds<'a, I>(points: I) -> Option<Rect>
where
    I: IntoIterator<Item = &'a StrokePoint>,
{
    let mut points = points.into_iter();
    let first = points.next()?;
    let start = Rect::from_points(first.position, first.position);
    Some(points.fold(start, |rect, point| rect.union_pt(point.position)))
}

/// Horizontal extent `(min_x, max_x)` of a run of stroke points
pub fn horizontal_extent<'a, I>(points: I) -> Option<(f64, f64)>
where
    I: IntoIterator<Item = &'a StrokePoint>,
{
    stroke_bounds(points).map(|rect| (rect.x0, rect.x1))
}

/// Width of a run of stroke points, zero when empty
pub fn horizontal_span<'a, I>(points: I) -> f64
where
    I: IntoIterator<Item = &'a StrokePoint>,
{
    horizontal_extent(points)
        .map(|(min_x, max_x)| max_x - min_x)
        .unwrap_or(0.0)
}
