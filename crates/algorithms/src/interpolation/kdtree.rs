//! 2D k-d tree over projected samples
//!
//! Nearest-sample lookups for filling a grid from scattered points in
//! O(log n) per cell instead of scanning every sample.
//!
//! Reference:
//! Bentley, J.L. (1975). Multidimensional binary search trees used
//! for associative searching. CACM, 18(9).

use super::SamplePoint;
use std::cmp::Ordering;

/// A 2D k-d tree stored as an implicit balanced tree over a permuted slice.
///
/// The node for `order[lo..hi]` is the median `order[(lo + hi) / 2]`; its
/// children are the halves on either side. Depth parity selects the axis.
#[derive(Debug)]
pub struct KdTree {
    points: Vec<SamplePoint>,
    order: Vec<usize>,
}

/// Result of a nearest-neighbor query
#[derive(Debug, Clone, Copy)]
pub struct NearestResult {
    pub point: SamplePoint,
    pub distance_sq: f64,
    /// Position of the point in the slice the tree was built from
    pub index: usize,
}

impl KdTree {
    /// Build a k-d tree in O(n log n) using median selection.
    pub fn build(points: &[SamplePoint]) -> Self {
        let mut order: Vec<usize> = (0..points.len()).collect();
        partition(points, &mut order, 0);
        Self {
            points: points.to_vec(),
            order,
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Closest point to `(qx, qy)`, `None` for an empty tree.
    ///
    /// Among points at the same distance the one built from the lowest
    /// index wins, independent of the tree layout.
    pub fn nearest(&self, qx: f64, qy: f64) -> Option<NearestResult> {
        let mut best: Option<(f64, usize)> = None;
        self.search(0, self.order.len(), 0, qx, qy, &mut best);
        best.map(|(distance_sq, index)| NearestResult {
            point: self.points[index],
            distance_sq,
            index,
        })
    }

    fn search(
        &self,
        lo: usize,
        hi: usize,
        depth: usize,
        qx: f64,
        qy: f64,
        best: &mut Option<(f64, usize)>,
    ) {
        if lo >= hi {
            return;
        }
        let mid = (lo + hi) / 2;
        let index = self.order[mid];
        let p = &self.points[index];

        let dist_sq = p.dist_sq(qx, qy);
        let better = match *best {
            None => true,
            Some((d, i)) => dist_sq < d || (dist_sq == d && index < i),
        };
        if better {
            *best = Some((dist_sq, index));
        }

        let diff = if depth % 2 == 0 { qx - p.x } else { qy - p.y };
        let (near, far) = if diff < 0.0 {
            ((lo, mid), (mid + 1, hi))
        } else {
            ((mid + 1, hi), (lo, mid))
        };

        self.search(near.0, near.1, depth + 1, qx, qy, best);

        // `<=` keeps equidistant candidates on the far side reachable for the tie-break
        let bound = best.map_or(f64::INFINITY, |(d, _)| d);
        if diff * diff <= bound {
            self.search(far.0, far.1, depth + 1, qx, qy, best);
        }
    }
}

fn axis_cmp(points: &[SamplePoint], axis: usize, a: usize, b: usize) -> Ordering {
    let (va, vb) = if axis == 0 {
        (points[a].x, points[b].x)
    } else {
        (points[a].y, points[b].y)
    };
    va.partial_cmp(&vb).unwrap_or(Ordering::Equal)
}

fn partition(points: &[SamplePoint], order: &mut [usize], depth: usize) {
    if order.len() <= 1 {
        return;
    }
    let mid = order.len() / 2;
    let axis = depth % 2;
    order.select_nth_unstable_by(mid, |&a, &b| axis_cmp(points, axis, a, b));
    let (left, rest) = order.split_at_mut(mid);
    partition(points, left, depth + 1);
    partition(points, &mut rest[1..], depth + 1);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_points() -> Vec<SamplePoint> {
        vec![
            SamplePoint::new(2.0, 3.0, 10.0),
            SamplePoint::new(5.0, 4.0, 20.0),
            SamplePoint::new(9.0, 6.0, 30.0),
            SamplePoint::new(4.0, 7.0, 40.0),
            SamplePoint::new(8.0, 1.0, 50.0),
            SamplePoint::new(7.0, 2.0, 60.0),
            SamplePoint::new(1.0, 8.0, 70.0),
            SamplePoint::new(6.0, 5.0, 80.0),
        ]
    }

    #[test]
    fn test_empty_tree() {
        let tree = KdTree::build(&[]);
        assert!(tree.is_empty());
        assert!(tree.nearest(0.0, 0.0).is_none());
    }

    #[test]
    fn test_nearest_exact() {
        let tree = KdTree::build(&sample_points());
        assert_eq!(tree.len(), 8);

        let result = tree.nearest(5.0, 4.0).unwrap();
        assert_eq!(result.distance_sq, 0.0);
        assert_eq!(result.point.value, 20.0);
        assert_eq!(result.index, 1);
    }

    #[test]
    fn test_nearest_matches_brute_force() {
        let pts = sample_points();
        let tree = KdTree::build(&pts);

        for qx in 0..10 {
            for qy in 0..10 {
                let (qx, qy) = (qx as f64 + 0.5, qy as f64 + 0.5);
                let found = tree.nearest(qx, qy).unwrap();
                let brute = pts
                    .iter()
                    .map(|p| p.dist_sq(qx, qy))
                    .fold(f64::INFINITY, f64::min);
                assert_eq!(found.distance_sq, brute, "query ({}, {})", qx, qy);
            }
        }
    }

    #[test]
    fn test_tie_prefers_lowest_index() {
        // (5, 5) is equidistant from all four points
        let pts = vec![
            SamplePoint::new(6.0, 5.0, 1.0),
            SamplePoint::new(4.0, 5.0, 2.0),
            SamplePoint::new(5.0, 6.0, 3.0),
            SamplePoint::new(5.0, 4.0, 4.0),
        ];
        let tree = KdTree::build(&pts);
        assert_eq!(tree.nearest(5.0, 5.0).unwrap().index, 0);
    }

    #[test]
    fn test_collinear_points() {
        let pts: Vec<SamplePoint> = (0..10)
            .map(|i| SamplePoint::new(i as f64, 0.0, i as f64))
            .collect();
        let tree = KdTree::build(&pts);
        let result = tree.nearest(4.4, 3.0).unwrap();
        assert_eq!(result.point.value, 4.0);
    }

    #[test]
    fn test_large_dataset() {
        let pts: Vec<SamplePoint> = (0..1000)
            .map(|i| {
                let x = ((i * 7 + 13) % 100) as f64;
                let y = ((i * 11 + 37) % 100) as f64;
                SamplePoint::new(x, y, i as f64)
            })
            .collect();
        let tree = KdTree::build(&pts);

        let result = tree.nearest(50.3, 49.6).unwrap();
        let brute = pts
            .iter()
            .map(|p| p.dist_sq(50.3, 49.6))
            .fold(f64::INFINITY, f64::min);
        assert_eq!(result.distance_sq, brute);
    }
}
