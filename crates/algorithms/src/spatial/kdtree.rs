//! 2D k-d tree over unit centroids
//!
//! Answers fixed-radius queries in O(log n + k) average time, so compact
//! kernels only visit the units inside the bandwidth instead of all n.
//!
//! Reference:
//! Bentley, J.L. (1975). Multidimensional binary search trees used
//! for associative searching. CACM, 18(9).

use segreg_core::Unit;

/// Relative widening of the splitting-plane test.
const PLANE_SLACK: f64 = 1.0 + 1e-9;

/// A 2D k-d tree over unit centroids.
#[derive(Debug)]
pub struct KdTree {
    nodes: Vec<KdNode>,
    /// Centroids in input order
    points: Vec<(f64, f64)>,
}

#[derive(Debug)]
struct KdNode {
    /// Index into `points` (the original unit index)
    point_idx: usize,
    /// Split dimension: 0 = x, 1 = y
    split_dim: u8,
    left: Option<usize>,
    right: Option<usize>,
}

/// A unit found by a radius query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    /// Index of the unit in the input slice
    pub index: usize,
    pub distance_sq: f64,
}

impl KdTree {
    /// Build a k-d tree from unit centroids.
    ///
    /// Construction is O(n log² n) using median-of-coordinate splitting.
    pub fn build(units: &[Unit]) -> Self {
        let points: Vec<(f64, f64)> = units.iter().map(|u| (u.x, u.y)).collect();
        let mut nodes = Vec::with_capacity(points.len());

        if !points.is_empty() {
            let mut indices: Vec<usize> = (0..points.len()).collect();
            build_recursive(&points, &mut indices, 0, &mut nodes);
        }

        Self { nodes, points }
    }

    /// Number of points in the tree.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the tree is empty.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Find all units within `radius` (inclusive) of (qx, qy).
    ///
    /// A unit is included when `sqrt(dx² + dy²) <= radius`, the same test a
    /// compact kernel applies to its distance, so a unit lying exactly on
    /// the bandwidth is never lost to rounding of `radius²`.
    ///
    /// Results are sorted by unit index so callers accumulate in input order.
    pub fn within_radius(&self, qx: f64, qy: f64, radius: f64) -> Vec<Neighbor> {
        if self.nodes.is_empty() || radius.is_nan() || radius < 0.0 {
            return Vec::new();
        }

        let mut results = Vec::new();
        self.radius_recursive(0, qx, qy, radius, &mut results);
        results.sort_unstable_by_key(|n| n.index);
        results
    }

    fn radius_recursive(
        &self,
        node_idx: usize,
        qx: f64,
        qy: f64,
        radius: f64,
        results: &mut Vec<Neighbor>,
    ) {
        let node = &self.nodes[node_idx];
        let (px, py) = self.points[node.point_idx];

        let dx = qx - px;
        let dy = qy - py;
        let dist_sq = dx * dx + dy * dy;

        if dist_sq.sqrt() <= radius {
            results.push(Neighbor {
                index: node.point_idx,
                distance_sq: dist_sq,
            });
        }

        let diff = if node.split_dim == 0 { dx } else { dy };
        // Slack keeps the plane test a superset of the distance test above
        let reach = radius * PLANE_SLACK;

        // Descend into a side when the query lies on it or the splitting
        // plane is within the radius
        if let Some(left) = node.left {
            if diff <= 0.0 || diff <= reach {
                self.radius_recursive(left, qx, qy, radius, results);
            }
        }

        if let Some(right) = node.right {
            if diff >= 0.0 || -diff <= reach {
                self.radius_recursive(right, qx, qy, radius, results);
            }
        }
    }
}

/// Recursively build the k-d tree.
fn build_recursive(
    points: &[(f64, f64)],
    indices: &mut [usize],
    depth: usize,
    nodes: &mut Vec<KdNode>,
) -> usize {
    let n = indices.len();
    let split_dim = (depth % 2) as u8;

    let coord = |i: usize| if split_dim == 0 { points[i].0 } else { points[i].1 };
    indices.sort_by(|&a, &b| {
        coord(a)
            .partial_cmp(&coord(b))
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let median = n / 2;
    let node_idx = nodes.len();
    nodes.push(KdNode {
        point_idx: indices[median],
        split_dim,
        left: None,
        right: None,
    });

    if median > 0 {
        let left_idx = build_recursive(points, &mut indices[..median], depth + 1, nodes);
        nodes[node_idx].left = Some(left_idx);
    }

    if median + 1 < n {
        let right_idx = build_recursive(points, &mut indices[median + 1..], depth + 1, nodes);
        nodes[node_idx].right = Some(right_idx);
    }

    node_idx
}
