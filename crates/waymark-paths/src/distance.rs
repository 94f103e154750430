use waymark_core::Point;

/// Manhattan (L1) distance between two points.
///
/// The admissible heuristic for four-directional unit-cost movement.
#[inline]
pub fn manhattan(a: Point, b: Point) -> i32 {
    (a.x - b.x).abs() + (a.y - b.y).abs()
}
