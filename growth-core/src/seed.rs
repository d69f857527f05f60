//! Starting meshes for the simulation.

use crate::types::VertexId;
use glam::DVec3;
use rand::Rng;

/// A flat `cols` x `rows` grid in the XY plane, each cell cut into two
/// counter-clockwise triangles.
///
/// ### Returns
/// `(positions, faces)` ready for [`crate::mesh::HalfedgeMesh::from_indexed`].
pub fn grid_patch(cols: usize, rows: usize, spacing: f64) -> (Vec<DVec3>, Vec<Vec<VertexId>>) {
    let stride = cols + 1;
    let positions = (0..=rows)
        .flat_map(|y| {
            (0..=cols).map(move |x| DVec3::new(x as f64 * spacing, y as f64 * spacing, 0.0))
        })
        .collect();

    let mut faces = Vec::with_capacity(cols * rows * 2);
    for y in 0..rows {
        for x in 0..cols {
            let a = y * stride + x;
            let b = a + 1;
            let c = b + stride;
            let d = a + stride;
            faces.push(vec![a, b, c]);
            faces.push(vec![a, c, d]);
        }
    }

    (positions, faces)
}

/// Offsets every coordinate by a uniform random amount in
/// `[-amplitude, amplitude]`.
///
/// A perfectly flat start never buckles out of plane; a little noise lets
/// bending and collision push the surface into folds.
pub fn jitter(positions: &mut [DVec3], amplitude: f64, rng: &mut impl Rng) {
    let a = amplitude.abs();
    for p in positions {
        *p += DVec3::new(
            rng.random_range(-a..=a),
            rng.random_range(-a..=a),
            rng.random_range(-a..=a),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::HalfedgeMesh;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn grid_patch_builds_a_valid_mesh() {
        let (positions, faces) = grid_patch(2, 3, 0.5);

        assert_eq!(positions.len(), 12);
        assert_eq!(faces.len(), 12);
        assert_eq!(positions[11], DVec3::new(1.0, 1.5, 0.0));

        let mesh = HalfedgeMesh::from_indexed(positions, &faces).unwrap();
        // 8 horizontal, 9 vertical and 6 diagonal edges.
        assert_eq!(mesh.edge_count(), 23);
    }

    #[test]
    fn jitter_stays_within_amplitude() {
        let (mut positions, _) = grid_patch(4, 4, 1.0);
        let original = positions.clone();
        let mut rng = StdRng::seed_from_u64(7);

        jitter(&mut positions, 0.01, &mut rng);

        for (p, o) in positions.iter().zip(&original) {
            let d = *p - *o;
            assert!(d.abs().max_element() <= 0.01);
        }
        assert_ne!(positions, original);
    }

    #[test]
    fn jitter_is_reproducible_for_a_seed() {
        let (mut a, _) = grid_patch(2, 2, 1.0);
        let mut b = a.clone();

        jitter(&mut a, 0.1, &mut StdRng::seed_from_u64(42));
        jitter(&mut b, 0.1, &mut StdRng::seed_from_u64(42));

        assert_eq!(a, b);
    }
}
