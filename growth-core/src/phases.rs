//! Simulation phases for one differential-growth step.
//!
//! The update loop driven by [`crate::engine::GrowthEngine::step`] is:
//! 1. [`growth_phase`]: split edges that grew too long.
//! 2. [`collision_phase`]: push apart (or pull together) vertex pairs
//!    found through a [`SpatialIndex`].
//! 3. [`bending_phase`]: flatten the quad around every interior edge.
//! 4. [`edge_length_phase`]: spring every edge toward the reference length.
//! 5. [`attractor_phase`]: gate the accumulated moves around an attractor.
//! 6. [`integrate_phase`]: move each vertex by its weighted mean move.
//!
//! Phases 2–5 only write into a [`MoveAccumulator`]; positions change in
//! phase 6, so every constraint sees the same post-growth positions.

use crate::{
    accumulator::MoveAccumulator,
    attractor::Attractor,
    config::{Collision, Config},
    mesh::HalfedgeMesh,
    spatial::SpatialIndex,
    types::VertexId,
};
use glam::DVec3;
use std::ops::Add;

/// How many pairs or edges a pass used and how many it had to skip.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PassSummary {
    pub applied: usize,
    pub skipped: usize,
}

impl Add for PassSummary {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            applied: self.applied + rhs.applied,
            skipped: self.skipped + rhs.skipped,
        }
    }
}

/// Splits every edge longer than `0.99 * cfg.reference_length()`.
///
/// Only edges that existed when the phase started are considered, so edges
/// created by a split are never split again in the same pass. The vertex cap
/// is checked before each split, so the count never exceeds
/// `cfg.max_vertex_count` unless it already did.
///
/// ### Returns
/// The number of vertices added.
pub fn growth_phase(mesh: &mut HalfedgeMesh, cfg: &Config) -> usize {
    let threshold = 0.99 * cfg.reference_length();
    let edge_count = mesh.edge_count();
    let before = mesh.vertex_count();

    for edge in 0..edge_count {
        if mesh.vertex_count() >= cfg.max_vertex_count {
            break;
        }

        let he = 2 * edge;
        if mesh.edge_length(he) > threshold
            && let Err(err) = mesh.subdivide_edge(he)
        {
            log::warn!("edge {edge} was split but its faces were left whole: {err}");
        }
    }

    let added = mesh.vertex_count() - before;
    log::trace!("growth: {added} vertices added from {edge_count} edges");
    added
}

/// Accumulates the collision spring for every vertex pair closer than
/// `collision.distance`.
///
/// Each pair `(i, j)` with `i < j` is visited once. The move
/// `(pj - pi) * 0.5 * (d - distance) / d` is added to `i` and subtracted from
/// `j`, both scaled by the weight, and both get the weight added. Coincident
/// pairs (`d == 0`) have no direction and are skipped.
pub fn collision_phase(
    mesh: &HalfedgeMesh,
    collision: &Collision,
    acc: &mut MoveAccumulator,
) -> PassSummary {
    let positions = mesh.positions();
    let index = SpatialIndex::build(positions);

    #[cfg(not(feature = "parallel"))]
    let summary = (0..positions.len()).fold(PassSummary::default(), |summary, i| {
        summary + collide_vertex(positions, &index, collision, i, acc)
    });

    #[cfg(feature = "parallel")]
    let summary = {
        use rayon::prelude::*;

        let len = positions.len();
        let (partial, summary) = (0..len)
            .into_par_iter()
            .fold(
                || (MoveAccumulator::with_len(len), PassSummary::default()),
                |(mut part, summary), i| {
                    let s = collide_vertex(positions, &index, collision, i, &mut part);
                    (part, summary + s)
                },
            )
            .reduce(
                || (MoveAccumulator::with_len(len), PassSummary::default()),
                |(mut a, sa), (b, sb)| {
                    a.merge_from(&b);
                    (a, sa + sb)
                },
            );
        acc.merge_from(&partial);
        summary
    };

    log::trace!(
        "collision: {} pairs, {} coincident skipped",
        summary.applied,
        summary.skipped
    );
    summary
}

fn collide_vertex(
    positions: &[DVec3],
    index: &SpatialIndex,
    collision: &Collision,
    i: VertexId,
    acc: &mut MoveAccumulator,
) -> PassSummary {
    let pi = positions[i];
    let mut summary = PassSummary::default();

    for j in index.within(pi, collision.distance).filter(|&j| j > i) {
        let delta = positions[j] - pi;
        let d = delta.length();
        if d == 0.0 {
            summary.skipped += 1;
            continue;
        }

        let step = delta * (0.5 * (d - collision.distance) / d);
        acc.add(i, collision.weight * step, collision.weight);
        acc.add(j, -collision.weight * step, collision.weight);
        summary.applied += 1;
    }

    summary
}

/// Accumulates bending resistance for every interior edge.
///
/// For edge `(i, j)` with opposite corners `p` and `q`, the four vertices are
/// projected onto the plane through their centroid whose normal is the sum of
/// the two unnormalised triangle normals, so the larger triangle dominates the
/// plane's orientation. Each vertex receives `weight * (projected - pos)`.
///
/// Boundary edges have only one opposite corner and are skipped, as are quads
/// whose normals cancel out.
pub fn bending_phase(mesh: &HalfedgeMesh, weight: f64, acc: &mut MoveAccumulator) -> PassSummary {
    let mut summary = PassSummary::default();

    for k in (0..mesh.halfedge_count()).step_by(2) {
        let (Some(p), Some(q)) = (mesh.opposite_vertex(k), mesh.opposite_vertex(k + 1)) else {
            summary.skipped += 1;
            continue;
        };
        let i = mesh.start(k);
        let j = mesh.start(k + 1);

        let [vi, vj, vp, vq] = [i, j, p, q].map(|v| mesh.position(v));
        let normal = (vj - vi).cross(vp - vi) + (vq - vi).cross(vj - vi);
        let n2 = normal.length_squared();
        if n2 == 0.0 {
            summary.skipped += 1;
            continue;
        }
        let origin = 0.25 * (vi + vj + vp + vq);

        for (v, pos) in [(i, vi), (j, vj), (p, vp), (q, vq)] {
            let projected = pos - normal * ((pos - origin).dot(normal) / n2);
            acc.add(v, weight * (projected - pos), weight);
        }
        summary.applied += 1;
    }

    log::trace!(
        "bending: {} edges, {} skipped",
        summary.applied,
        summary.skipped
    );
    summary
}

/// Accumulates the edge spring toward `target` for every edge.
///
/// The move `(pb - pa) * (len - target) * 0.5 / len` is added to `a` and
/// subtracted from `b`, so long edges contract and short edges stretch.
/// With `tension_only`, edges shorter than `target` are left alone.
/// Zero-length edges are skipped.
pub fn edge_length_phase(
    mesh: &HalfedgeMesh,
    target: f64,
    weight: f64,
    tension_only: bool,
    acc: &mut MoveAccumulator,
) -> PassSummary {
    let mut summary = PassSummary::default();

    for k in (0..mesh.halfedge_count()).step_by(2) {
        let a = mesh.start(k);
        let b = mesh.start(k + 1);
        let delta = mesh.position(b) - mesh.position(a);
        let len = delta.length();

        if len == 0.0 {
            summary.skipped += 1;
            continue;
        }
        if tension_only && len < target {
            continue;
        }

        let step = delta * ((len - target) * 0.5 / len);
        acc.add(a, weight * step, weight);
        acc.add(b, -weight * step, weight);
        summary.applied += 1;
    }

    log::trace!(
        "edge length: {} edges, {} zero-length skipped",
        summary.applied,
        summary.skipped
    );
    summary
}

/// Gates every accumulated move by the attractor falloff and adds one unit of
/// weight to every vertex.
///
/// Must run after all additive passes: it scales what is already there.
/// Vertices beyond `max_distance` end up with a zero move.
pub fn attractor_phase(mesh: &HalfedgeMesh, attractor: &Attractor, acc: &mut MoveAccumulator) {
    for (v, &pos) in mesh.positions().iter().enumerate() {
        acc.scale_move(v, attractor.falloff(pos));
        acc.add_weight(v, 1.0);
    }
}

/// Moves every vertex by its weighted mean move.
///
/// Vertices with a total weight of exactly zero keep their position.
///
/// ### Returns
/// The number of vertices that received a move.
pub fn integrate_phase(mesh: &mut HalfedgeMesh, acc: &MoveAccumulator) -> usize {
    debug_assert_eq!(acc.len(), mesh.vertex_count());

    let mut moved = 0;
    for (v, pos) in mesh.positions_mut().iter_mut().enumerate() {
        if let Some(step) = acc.mean_move(v) {
            *pos += step;
            moved += 1;
        }
    }
    moved
}
