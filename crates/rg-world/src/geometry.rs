//! Planar intersection primitives used by ray casting and collision checks.
//!
//! Everything operates on world-space coordinates.  Directions passed to the
//! ray routines must be unit vectors; distances returned are then in arena
//! units directly.

use rg_core::Vec2;

/// Axis-aligned bounding box.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    /// Box spanning two arbitrary corners.
    pub fn from_corners(a: Vec2, b: Vec2) -> Aabb {
        Aabb {
            min: Vec2::new(a.x.min(b.x), a.y.min(b.y)),
            max: Vec2::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    /// Tight box around a non-empty point set.
    ///
    /// # Panics
    /// Panics if `points` is empty.
    pub fn from_points(points: &[Vec2]) -> Aabb {
        let mut aabb = Aabb { min: points[0], max: points[0] };
        for &p in &points[1..] {
            aabb.min.x = aabb.min.x.min(p.x);
            aabb.min.y = aabb.min.y.min(p.y);
            aabb.max.x = aabb.max.x.max(p.x);
            aabb.max.y = aabb.max.y.max(p.y);
        }
        aabb
    }

    #[inline]
    pub fn contains(&self, p: Vec2) -> bool {
        (self.min.x..=self.max.x).contains(&p.x) && (self.min.y..=self.max.y).contains(&p.y)
    }

    #[inline]
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }
}

/// Distance along a ray to its first crossing of segment `[a, b]`.
///
/// `dir` must be unit length.  Returns `None` when the ray is parallel to
/// the segment or the crossing lies behind the origin / outside the segment.
/// An origin inside a polygon still yields its exit edges at positive
/// distance, so the result is always finite, never NaN.
pub fn ray_segment(origin: Vec2, dir: Vec2, a: Vec2, b: Vec2) -> Option<f32> {
    let seg = b - a;
    let denom = dir.cross(seg);
    if denom.abs() < 1e-12 {
        // Parallel (collinear overlap included) — treated as a miss.
        return None;
    }
    let to_a = a - origin;
    let t = to_a.cross(seg) / denom; // distance along the ray
    let u = to_a.cross(dir) / denom; // position along the segment
    if t >= 0.0 && (0.0..=1.0).contains(&u) {
        Some(t)
    } else {
        None
    }
}

/// Proper or touching intersection of segments `[p1, p2]` and `[q1, q2]`.
pub fn segments_intersect(p1: Vec2, p2: Vec2, q1: Vec2, q2: Vec2) -> bool {
    let d1 = direction(q1, q2, p1);
    let d2 = direction(q1, q2, p2);
    let d3 = direction(p1, p2, q1);
    let d4 = direction(p1, p2, q2);

    if ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
    {
        return true;
    }

    (d1 == 0.0 && on_segment(q1, q2, p1))
        || (d2 == 0.0 && on_segment(q1, q2, p2))
        || (d3 == 0.0 && on_segment(p1, p2, q1))
        || (d4 == 0.0 && on_segment(p1, p2, q2))
}

#[inline]
fn direction(a: Vec2, b: Vec2, c: Vec2) -> f32 {
    (b - a).cross(c - a)
}

#[inline]
fn on_segment(a: Vec2, b: Vec2, p: Vec2) -> bool {
    p.x >= a.x.min(b.x) && p.x <= a.x.max(b.x) && p.y >= a.y.min(b.y) && p.y <= a.y.max(b.y)
}

/// Even-odd point-in-polygon test.  Boundary points may land either way;
/// callers that care pair this with an edge-intersection check.
pub fn point_in_polygon(p: Vec2, verts: &[Vec2]) -> bool {
    let n = verts.len();
    if n < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (vi, vj) = (verts[i], verts[j]);
        if (vi.y > p.y) != (vj.y > p.y)
            && p.x < (vj.x - vi.x) * (p.y - vi.y) / (vj.y - vi.y) + vi.x
        {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Do two convex outlines overlap?  Edge crossings catch partial overlap;
/// the containment checks catch one outline swallowing the other.
pub fn polygons_overlap(a: &[Vec2], b: &[Vec2]) -> bool {
    if a.len() < 3 || b.len() < 3 {
        return false;
    }
    for i in 0..a.len() {
        let a1 = a[i];
        let a2 = a[(i + 1) % a.len()];
        for k in 0..b.len() {
            let b1 = b[k];
            let b2 = b[(k + 1) % b.len()];
            if segments_intersect(a1, a2, b1, b2) {
                return true;
            }
        }
    }
    point_in_polygon(a[0], b) || point_in_polygon(b[0], a)
}
