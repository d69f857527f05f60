use crate::types::VertexId;
use glam::DVec3;

/// Per-step scratch arena of suggested vertex moves.
///
/// For each `VertexId`, this buffer stores:
///
/// - The sum of all weighted moves suggested by the constraint passes.
/// - The sum of the weights behind those moves.
///
/// The final displacement of a vertex is the **weighted mean**
/// `move / weight`, not the sum of the suggestions. A buffer lives for one
/// simulation step only and is sized to the vertex count after growth.
#[derive(Debug, Clone)]
pub struct MoveAccumulator {
    /// Accumulated weighted moves for each vertex.
    moves: Vec<DVec3>,
    /// Accumulated weights for each vertex.
    weights: Vec<f64>,
}

impl MoveAccumulator {
    /// Creates a new [`MoveAccumulator`] for `len` vertices.
    ///
    /// All moves start at `DVec3::ZERO` and all weights at `0.0`.
    pub fn with_len(len: usize) -> Self {
        Self {
            moves: vec![DVec3::ZERO; len],
            weights: vec![0.0; len],
        }
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// Adds one weighted suggestion for the given vertex.
    ///
    /// `weighted_move` is expected to already be multiplied by `weight`.
    ///
    /// ### Panics
    /// Panics if `id` is out of bounds.
    #[inline]
    pub fn add(&mut self, id: VertexId, weighted_move: DVec3, weight: f64) {
        self.moves[id] += weighted_move;
        self.weights[id] += weight;
    }

    /// Multiplies everything accumulated so far for `id` by `factor`, leaving
    /// its weight untouched.
    #[inline]
    pub fn scale_move(&mut self, id: VertexId, factor: f64) {
        self.moves[id] *= factor;
    }

    /// Adds weight to `id` without contributing any move.
    #[inline]
    pub fn add_weight(&mut self, id: VertexId, weight: f64) {
        self.weights[id] += weight;
    }

    #[inline]
    pub fn weighted_move(&self, id: VertexId) -> DVec3 {
        self.moves[id]
    }

    #[inline]
    pub fn weight(&self, id: VertexId) -> f64 {
        self.weights[id]
    }

    /// Returns the weighted mean move for a vertex.
    ///
    /// Returns `None` when the accumulated weight is exactly zero, in which
    /// case the vertex must stay where it is.
    #[inline]
    pub fn mean_move(&self, id: VertexId) -> Option<DVec3> {
        let w = self.weights[id];
        if w == 0.0 {
            None
        } else {
            Some(self.moves[id] / w)
        }
    }

    /// Merges another [`MoveAccumulator`] into this one.
    ///
    /// Used to combine partial buffers filled by parallel workers.
    ///
    /// ### Panics
    /// Panics if the two buffers have different lengths.
    pub fn merge_from(&mut self, other: &MoveAccumulator) {
        assert_eq!(self.moves.len(), other.moves.len());
        for i in 0..self.moves.len() {
            self.moves[i] += other.moves[i];
            self.weights[i] += other.weights[i];
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_len_initializes_zeroed_state() {
        let acc = MoveAccumulator::with_len(5);

        assert_eq!(acc.len(), 5);
        for id in 0..5 {
            assert_eq!(acc.weighted_move(id), DVec3::ZERO);
            assert_eq!(acc.weight(id), 0.0);
            assert_eq!(acc.mean_move(id), None);
        }
    }

    #[test]
    fn mean_move_is_weighted_average_not_sum() {
        let mut acc = MoveAccumulator::with_len(2);

        // Two suggestions: (3,0,0) with weight 1 and (0,0,0) with weight 2.
        acc.add(1, DVec3::new(3.0, 0.0, 0.0), 1.0);
        acc.add(1, DVec3::ZERO, 2.0);

        assert_eq!(acc.weight(1), 3.0);
        assert_eq!(acc.mean_move(1), Some(DVec3::new(1.0, 0.0, 0.0)));
        assert_eq!(acc.mean_move(0), None);
    }

    #[test]
    fn scale_move_keeps_weight() {
        let mut acc = MoveAccumulator::with_len(1);
        acc.add(0, DVec3::new(2.0, 4.0, 0.0), 2.0);

        acc.scale_move(0, 0.5);
        acc.add_weight(0, 1.0);

        assert_eq!(acc.weighted_move(0), DVec3::new(1.0, 2.0, 0.0));
        assert_eq!(acc.weight(0), 3.0);
    }

    #[test]
    fn zero_weight_with_nonzero_move_has_no_mean() {
        let mut acc = MoveAccumulator::with_len(1);
        acc.add(0, DVec3::new(1.0, 0.0, 0.0), 0.0);

        assert_eq!(acc.mean_move(0), None);
    }

    #[test]
    fn merge_from_adds_contributions_of_both_buffers() {
        let mut a = MoveAccumulator::with_len(3);
        let mut b = MoveAccumulator::with_len(3);

        a.add(0, DVec3::new(1.0, 0.0, 0.0), 1.0);
        a.add(1, DVec3::new(0.0, 1.0, 0.0), 0.5);

        b.add(0, DVec3::new(2.0, 0.0, 0.0), 1.0);
        b.add(2, DVec3::new(0.0, 0.0, 3.0), 2.0);

        a.merge_from(&b);

        assert_eq!(a.weighted_move(0), DVec3::new(3.0, 0.0, 0.0));
        assert_eq!(a.weight(0), 2.0);

        assert_eq!(a.weighted_move(1), DVec3::new(0.0, 1.0, 0.0));
        assert_eq!(a.weight(1), 0.5);

        assert_eq!(a.weighted_move(2), DVec3::new(0.0, 0.0, 3.0));
        assert_eq!(a.weight(2), 2.0);
    }

    #[test]
    #[should_panic]
    fn merge_from_panics_on_mismatched_lengths() {
        let mut a = MoveAccumulator::with_len(2);
        let b = MoveAccumulator::with_len(3);
        a.merge_from(&b);
    }
}
