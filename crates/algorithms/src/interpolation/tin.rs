//! TIN (Triangulated Irregular Network) interpolation
//!
//! Constructs a Delaunay triangulation of the projected samples and
//! interpolates linearly inside each triangle with barycentric weights.
//! Nodes outside the convex hull keep the fill value.
//!
//! Triangulation is delegated to `delaunator` (sweep-hull, O(n log n)).

use super::SamplePoint;
use delaunator::{triangulate, Point};

/// A triangle defined by three vertex indices
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Triangle {
    pub v0: usize,
    pub v1: usize,
    pub v2: usize,
}

/// Twice the signed area of the triangle
fn cross(p0: &SamplePoint, p1: &SamplePoint, p2: &SamplePoint) -> f64 {
    (p1.x - p0.x) * (p2.y - p0.y) - (p1.y - p0.y) * (p2.x - p0.x)
}

/// Whether every point lies on one straight line
pub(crate) fn all_collinear(points: &[SamplePoint]) -> bool {
    let Some(first) = points.first() else {
        return true;
    };
    let Some(second) = points
        .iter()
        .find(|p| p.x != first.x || p.y != first.y)
    else {
        return true;
    };
    points.iter().all(|p| cross(first, second, p) == 0.0)
}

/// Barycentric weights `(u, v, w)` of `(px, py)` in triangle `(p0, p1, p2)`.
///
/// The interpolated value is `u*v0 + v*v1 + w*v2`. Weights come from edge
/// cross products, so a node exactly on an edge gets an exact zero weight
/// for the opposite vertex when coordinates are whole cells.
fn barycentric(
    px: f64,
    py: f64,
    p0: &SamplePoint,
    p1: &SamplePoint,
    p2: &SamplePoint,
) -> (f64, f64, f64) {
    let p = SamplePoint::new(px, py, 0.0);
    let area = cross(p0, p1, p2);
    (
        cross(p1, p2, &p) / area,
        cross(p2, p0, &p) / area,
        cross(p0, p1, &p) / area,
    )
}

/// Delaunay triangulation of `points`.
///
/// The triangles tile the convex hull of the input. Points must be
/// distinct; zero-area triangles are dropped, so collinear input yields
/// no triangles.
pub(crate) fn delaunay(points: &[SamplePoint]) -> Vec<Triangle> {
    if points.len() < 3 {
        return Vec::new();
    }

    let coords: Vec<Point> = points.iter().map(|p| Point { x: p.x, y: p.y }).collect();
    let triangulation = triangulate(&coords);

    triangulation
        .triangles
        .chunks_exact(3)
        .map(|t| Triangle {
            v0: t[0],
            v1: t[1],
            v2: t[2],
        })
        .filter(|tri| cross(&points[tri.v0], &points[tri.v1], &points[tri.v2]) != 0.0)
        .collect()
}

/// Write the linear surface of each triangle into the grid nodes it covers.
///
/// `points` are in grid space (`x` = column, `y` = row) and `surface` is
/// row-major with `cols` columns. Nodes outside every triangle are left
/// untouched.
pub(crate) fn fill_triangles(
    points: &[SamplePoint],
    triangles: &[Triangle],
    surface: &mut [f64],
    rows: usize,
    cols: usize,
) {
    const EPS: f64 = -1e-9;

    for tri in triangles {
        let (p0, p1, p2) = (&points[tri.v0], &points[tri.v1], &points[tri.v2]);

        let row_lo = p0.y.min(p1.y).min(p2.y).ceil().max(0.0) as usize;
        let row_hi = p0.y.max(p1.y).max(p2.y).floor();
        let col_lo = p0.x.min(p1.x).min(p2.x).ceil().max(0.0) as usize;
        let col_hi = p0.x.max(p1.x).max(p2.x).floor();
        if row_hi < 0.0 || col_hi < 0.0 {
            continue;
        }
        let row_hi = (row_hi as usize).min(rows.saturating_sub(1));
        let col_hi = (col_hi as usize).min(cols.saturating_sub(1));

        for row in row_lo..=row_hi {
            for col in col_lo..=col_hi {
                let (u, v, w) = barycentric(col as f64, row as f64, p0, p1, p2);
                if u >= EPS && v >= EPS && w >= EPS {
                    surface[row * cols + col] = u * p0.value + v * p1.value + w * p2.value;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn corner_points() -> Vec<SamplePoint> {
        vec![
            SamplePoint::new(0.0, 0.0, 10.0),
            SamplePoint::new(9.0, 0.0, 20.0),
            SamplePoint::new(0.0, 9.0, 30.0),
            SamplePoint::new(9.0, 9.0, 40.0),
        ]
    }

    fn surface(points: &[SamplePoint], fill: f64) -> Vec<f64> {
        let mut out = vec![fill; 100];
        fill_triangles(points, &delaunay(points), &mut out, 10, 10);
        out
    }

    #[test]
    fn test_delaunay_basic() {
        let tris = delaunay(&corner_points());
        assert_eq!(tris.len(), 2, "Expected 2 triangles, got {}", tris.len());
    }

    #[test]
    fn test_delaunay_collinear() {
        let pts: Vec<SamplePoint> = (0..5)
            .map(|i| SamplePoint::new(i as f64, 2.0 * i as f64, 1.0))
            .collect();
        assert!(all_collinear(&pts));
        assert!(delaunay(&pts).is_empty());
    }

    #[test]
    fn test_all_collinear() {
        assert!(all_collinear(&[]));
        assert!(all_collinear(&[SamplePoint::new(1.0, 1.0, 0.0)]));
        assert!(!all_collinear(&corner_points()));
    }

    #[test]
    fn test_exact_at_vertices() {
        let out = surface(&corner_points(), 0.0);
        assert_relative_eq!(out[0], 10.0, epsilon = 1e-9);
        assert_relative_eq!(out[9], 20.0, epsilon = 1e-9);
        assert_relative_eq!(out[90], 30.0, epsilon = 1e-9);
        assert_relative_eq!(out[99], 40.0, epsilon = 1e-9);
    }

    #[test]
    fn test_plane_is_reproduced() {
        // z = x + 2y is linear, so every triangle reproduces it exactly
        let pts: Vec<SamplePoint> = [(0.0, 0.0), (9.0, 0.0), (0.0, 9.0), (9.0, 9.0), (4.0, 5.0)]
            .iter()
            .map(|&(x, y)| SamplePoint::new(x, y, x + 2.0 * y))
            .collect();
        let out = surface(&pts, f64::NAN);
        for row in 0..10 {
            for col in 0..10 {
                let expected = col as f64 + 2.0 * row as f64;
                assert_relative_eq!(out[row * 10 + col], expected, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn test_outside_hull_keeps_fill() {
        let pts = vec![
            SamplePoint::new(0.0, 0.0, 100.0),
            SamplePoint::new(4.0, 0.0, 100.0),
            SamplePoint::new(0.0, 4.0, 100.0),
        ];
        let out = surface(&pts, -1.0);
        assert_eq!(out[2 * 10 + 2], 100.0);
        assert_eq!(out[9 * 10 + 9], -1.0);
        assert_eq!(out[3 * 10 + 3], -1.0);
    }

    #[test]
    fn test_thin_hull_triangles_are_filled() {
        // (1000, 1) sits just inside the long bottom edge, so the hull
        // triangles along row 0 are nearly flat
        let pts = vec![
            SamplePoint::new(0.0, 0.0, 100.0),
            SamplePoint::new(1000.0, 1.0, 100.0),
            SamplePoint::new(2000.0, 0.0, 100.0),
            SamplePoint::new(1000.0, 500.0, 100.0),
        ];
        let (rows, cols) = (501, 2001);
        let mut out = vec![-1.0; rows * cols];
        fill_triangles(&pts, &delaunay(&pts), &mut out, rows, cols);

        let unfilled = out[..cols].iter().filter(|&&v| v == -1.0).count();
        assert_eq!(unfilled, 0);
        assert_relative_eq!(out[250 * cols + 1000], 100.0, epsilon = 1e-9);
        assert_relative_eq!(out[500 * cols + 1000], 100.0, epsilon = 1e-9);
        assert_eq!(out[500 * cols], -1.0);
    }

    #[test]
    fn test_barycentric_at_vertices() {
        let p0 = SamplePoint::new(0.0, 0.0, 1.0);
        let p1 = SamplePoint::new(10.0, 0.0, 2.0);
        let p2 = SamplePoint::new(0.0, 10.0, 3.0);

        let (u, v, w) = barycentric(0.0, 0.0, &p0, &p1, &p2);
        assert_relative_eq!(u, 1.0, epsilon = 1e-10);
        assert_relative_eq!(v, 0.0, epsilon = 1e-10);
        assert_relative_eq!(w, 0.0, epsilon = 1e-10);

        let (u, v, w) = barycentric(10.0 / 3.0, 10.0 / 3.0, &p0, &p1, &p2);
        assert_relative_eq!(u, 1.0 / 3.0, epsilon = 1e-10);
        assert_relative_eq!(v, 1.0 / 3.0, epsilon = 1e-10);
        assert_relative_eq!(w, 1.0 / 3.0, epsilon = 1e-10);
    }
}
