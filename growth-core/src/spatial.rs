//! Radius queries over vertex positions.

use crate::types::VertexId;
use glam::DVec3;
use rstar::{RTree, primitives::GeomWithData};

type IndexedPoint = GeomWithData<[f64; 3], VertexId>;

/// R-tree of vertex positions keyed by vertex id.
///
/// Positions change every step, so the index is bulk-loaded from scratch
/// instead of being updated incrementally.
#[derive(Debug)]
pub struct SpatialIndex {
    tree: RTree<IndexedPoint>,
}

impl SpatialIndex {
    pub fn build(positions: &[DVec3]) -> Self {
        let points = positions
            .iter()
            .enumerate()
            .map(|(id, p)| GeomWithData::new(p.to_array(), id))
            .collect();

        Self {
            tree: RTree::bulk_load(points),
        }
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// Ids of every vertex at distance `<= radius` from `center`, in no
    /// particular order. The iterator is lazy and can only be walked once.
    pub fn within(&self, center: DVec3, radius: f64) -> impl Iterator<Item = VertexId> + '_ {
        self.tree
            .locate_within_distance(center.to_array(), radius * radius)
            .map(|point| point.data)
    }
}
