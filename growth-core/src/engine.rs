//! The simulation engine that owns the mesh and runs one step at a time.

use crate::{
    accumulator::MoveAccumulator,
    config::{Config, EdgeLengthPolicy},
    error::GrowthError,
    mesh::HalfedgeMesh,
    phases::{self, PassSummary},
    types::VertexId,
};
use glam::DVec3;

/// What happened during one [`GrowthEngine::step`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StepReport {
    pub vertices_added: usize,
    pub collision: PassSummary,
    pub bending: PassSummary,
    /// `None` when the policy kept the edge-length pass off this step.
    pub edge_length: Option<PassSummary>,
    pub vertices_moved: usize,
}

/// Differential-growth simulation over a single half-edge mesh.
///
/// The mesh is the only state carried between steps. Accumulators and the
/// spatial index are rebuilt inside every [`GrowthEngine::step`] and dropped
/// at its end.
#[derive(Clone, Debug)]
pub struct GrowthEngine {
    mesh: HalfedgeMesh,
}

impl GrowthEngine {
    /// Converts an indexed polygon mesh into half-edge form and wraps it.
    ///
    /// ### Errors
    /// [`GrowthError::InvalidInput`] if the mesh is empty, degenerate or not
    /// manifold. No engine is created in that case.
    pub fn new(positions: Vec<DVec3>, faces: &[Vec<VertexId>]) -> Result<Self, GrowthError> {
        let mesh = HalfedgeMesh::from_indexed(positions, faces)?;
        log::debug!(
            "growth engine created: {} vertices, {} edges, {} faces",
            mesh.vertex_count(),
            mesh.edge_count(),
            mesh.face_count()
        );
        Ok(Self { mesh })
    }

    pub fn from_mesh(mesh: HalfedgeMesh) -> Self {
        Self { mesh }
    }

    pub fn mesh(&self) -> &HalfedgeMesh {
        &self.mesh
    }

    pub fn into_mesh(self) -> HalfedgeMesh {
        self.mesh
    }

    pub fn positions(&self) -> &[DVec3] {
        self.mesh.positions()
    }

    /// Corner lists of every face, for export or display.
    pub fn faces(&self) -> Vec<Vec<VertexId>> {
        (0..self.mesh.face_count())
            .map(|f| self.mesh.face_vertices(f))
            .collect()
    }

    /// Advances the simulation by a single step.
    ///
    /// The step consists of:
    /// 1. [`phases::growth_phase`] if `cfg.grow`.
    /// 2. A fresh [`MoveAccumulator`] sized to the grown mesh.
    /// 3. [`phases::collision_phase`].
    /// 4. [`phases::bending_phase`].
    /// 5. [`phases::edge_length_phase`] if `cfg.edge_length_policy` allows it.
    /// 6. [`phases::attractor_phase`] if `cfg.attractor` is set.
    /// 7. [`phases::integrate_phase`].
    ///
    /// Constraint problems (coincident vertices, boundary edges) are skipped,
    /// never reported as errors.
    pub fn step(&mut self, cfg: &Config) -> StepReport {
        let vertices_added = if cfg.grow {
            phases::growth_phase(&mut self.mesh, cfg)
        } else {
            0
        };

        let mut acc = MoveAccumulator::with_len(self.mesh.vertex_count());

        let collision = phases::collision_phase(&self.mesh, &cfg.collision, &mut acc);
        let bending = phases::bending_phase(&self.mesh, cfg.bending_weight, &mut acc);

        let edge_length = cfg.edge_length_active().then(|| {
            phases::edge_length_phase(
                &self.mesh,
                cfg.reference_length(),
                cfg.edge_length.weight,
                cfg.edge_length_policy == EdgeLengthPolicy::TensionOnly,
                &mut acc,
            )
        });

        if let Some(attractor) = &cfg.attractor {
            phases::attractor_phase(&self.mesh, attractor, &mut acc);
        }

        let vertices_moved = phases::integrate_phase(&mut self.mesh, &acc);

        let report = StepReport {
            vertices_added,
            collision,
            bending,
            edge_length,
            vertices_moved,
        };
        log::debug!(
            "step: {} vertices (+{}), {} collision pairs, {} moved",
            self.mesh.vertex_count(),
            report.vertices_added,
            report.collision.applied,
            report.vertices_moved
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        attractor::Attractor,
        config::{Collision, EdgeLength},
        mesh::tests::assert_consistent,
        seed,
    };
    use rand::{SeedableRng, rngs::StdRng};

    const EPS: f64 = 1e-12;

    fn unit_quad_engine() -> GrowthEngine {
        GrowthEngine::new(
            vec![
                DVec3::new(0.0, 0.0, 0.0),
                DVec3::new(1.0, 0.0, 0.0),
                DVec3::new(1.0, 1.0, 0.0),
                DVec3::new(0.0, 1.0, 0.0),
            ],
            &[vec![0, 1, 2], vec![0, 2, 3]],
        )
        .unwrap()
    }

    fn relax_only() -> Config {
        Config {
            grow: false,
            max_vertex_count: 1000,
            collision: Collision {
                distance: 0.1,
                weight: 1.0,
            },
            edge_length: EdgeLength {
                desired_distance: 1.0,
                weight: 1.0,
            },
            bending_weight: 0.0,
            attractor: None,
            ..Config::default()
        }
    }

    #[test]
    fn unit_quad_step_pulls_diagonal_together() {
        let mut engine = unit_quad_engine();

        let report = engine.step(&relax_only());

        assert_eq!(report.vertices_added, 0);
        assert_eq!(report.collision.applied, 0);
        assert_eq!(report.edge_length.map(|s| s.applied), Some(5));

        // Diagonal endpoints carry three edges each; only the diagonal moves them.
        let f = (2f64.sqrt() - 1.0) * 0.5 / 2f64.sqrt() / 3.0;
        let p = engine.positions();
        assert!((p[0] - DVec3::new(f, f, 0.0)).length() < EPS);
        assert!((p[2] - DVec3::new(1.0 - f, 1.0 - f, 0.0)).length() < EPS);
        assert_eq!(p[1], DVec3::new(1.0, 0.0, 0.0));
        assert_eq!(p[3], DVec3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn vertices_outside_attractor_stay_put() {
        let mut engine = unit_quad_engine();
        let mut cfg = relax_only();
        cfg.edge_length.desired_distance = 0.5;
        cfg.attractor = Some(Attractor::new(DVec3::ZERO, 0.5));

        engine.step(&cfg);

        let p = engine.positions();
        assert_ne!(p[0], DVec3::ZERO);
        assert_eq!(p[1], DVec3::new(1.0, 0.0, 0.0));
        assert_eq!(p[2], DVec3::new(1.0, 1.0, 0.0));
        assert_eq!(p[3], DVec3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn weightless_vertex_keeps_exact_position() {
        let lonely = DVec3::new(100.0, -3.25, 7.5);
        let mut engine = GrowthEngine::new(
            vec![
                DVec3::new(0.0, 0.0, 0.0),
                DVec3::new(1.0, 0.0, 0.0),
                DVec3::new(0.0, 1.0, 0.0),
                lonely,
            ],
            &[vec![0, 1, 2]],
        )
        .unwrap();
        let mut cfg = relax_only();
        cfg.bending_weight = 1.0;
        cfg.edge_length.desired_distance = 0.5;

        let report = engine.step(&cfg);

        assert_eq!(report.vertices_moved, 3);
        assert_eq!(engine.positions()[3], lonely);
    }

    #[test]
    fn construction_rejects_invalid_mesh() {
        let result = GrowthEngine::new(vec![DVec3::ZERO], &[vec![0, 0, 0]]);

        assert!(matches!(result, Err(GrowthError::InvalidInput { .. })));
    }

    #[test]
    fn edge_length_policy_controls_growth_steps() {
        let mut cfg = relax_only();
        cfg.grow = true;
        cfg.max_vertex_count = 4;

        let mut engine = unit_quad_engine();
        assert_eq!(engine.step(&cfg).edge_length, None);

        cfg.edge_length_policy = EdgeLengthPolicy::Always;
        assert!(engine.step(&cfg).edge_length.is_some());
    }

    #[test]
    fn growing_grid_stays_manifold_and_under_cap() {
        let (mut positions, faces) = seed::grid_patch(4, 4, 1.0);
        seed::jitter(&mut positions, 0.05, &mut StdRng::seed_from_u64(3));
        let mut engine = GrowthEngine::new(positions, &faces).unwrap();
        let cfg = Config {
            grow: true,
            max_vertex_count: 200,
            collision: Collision {
                distance: 1.0,
                weight: 1.0,
            },
            edge_length: EdgeLength {
                desired_distance: 1.0,
                weight: 1.0,
            },
            bending_weight: 0.5,
            ..Config::default()
        };

        let mut previous = engine.mesh().vertex_count();
        for _ in 0..15 {
            engine.step(&cfg);
            let count = engine.mesh().vertex_count();
            assert!(count >= previous);
            assert!(count <= cfg.max_vertex_count);
            previous = count;
        }

        assert!(previous > 25);
        assert_consistent(engine.mesh());
        assert!(engine.positions().iter().all(|p| p.is_finite()));
        for face in engine.faces() {
            assert_eq!(face.len(), 3);
        }
    }
}
