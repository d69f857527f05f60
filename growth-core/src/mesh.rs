//! Half-edge mesh stored as flat arenas of indices.
//!
//! Every undirected edge is a pair of half-edges at consecutive indices
//! `k` and `k ^ 1`. Edits only ever append vertices, half-edge pairs and
//! faces, so existing ids stay valid and the pairing holds by construction.
//! Boundary half-edges carry no face and are linked into boundary loops, which
//! keeps `next`/`prev` valid everywhere.

use crate::{
    error::GrowthError,
    types::{FaceId, HalfedgeId, VertexId},
};
use glam::DVec3;
use std::collections::HashMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Halfedge {
    pub start: VertexId,
    pub next: HalfedgeId,
    pub prev: HalfedgeId,
    /// `None` on the boundary.
    pub face: Option<FaceId>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Face {
    pub first: HalfedgeId,
}

#[derive(Clone, Debug)]
pub struct HalfedgeMesh {
    positions: Vec<DVec3>,
    halfedges: Vec<Halfedge>,
    faces: Vec<Face>,
}

impl HalfedgeMesh {
    /// Builds a half-edge mesh from a position list and polygon corner lists.
    ///
    /// Faces may have any number of corners (at least three) and must be
    /// consistently oriented. Vertices that no face references are kept as
    /// isolated points.
    ///
    /// ### Errors
    /// Returns [`GrowthError::InvalidInput`] if the mesh is empty, a face is
    /// malformed, a position is not finite, or the surface is not manifold.
    pub fn from_indexed(
        positions: Vec<DVec3>,
        faces: &[Vec<VertexId>],
    ) -> Result<Self, GrowthError> {
        if positions.is_empty() {
            return Err(GrowthError::invalid_input("mesh has no vertices"));
        }
        if faces.is_empty() {
            return Err(GrowthError::invalid_input("mesh has no faces"));
        }
        if let Some(v) = positions.iter().position(|p| !p.is_finite()) {
            return Err(GrowthError::invalid_input(format!(
                "vertex {v} has a non-finite position"
            )));
        }

        let vertex_count = positions.len();
        let mut halfedges: Vec<Halfedge> = Vec::with_capacity(faces.len() * 4);
        let mut face_list = Vec::with_capacity(faces.len());
        // Undirected edge (low, high) -> even half-edge id of its pair.
        let mut pairs: HashMap<(VertexId, VertexId), HalfedgeId> = HashMap::new();

        for (f, corners) in faces.iter().enumerate() {
            let len = corners.len();
            if len < 3 {
                return Err(GrowthError::invalid_input(format!(
                    "face {f} has {len} corners, at least 3 are required"
                )));
            }
            for (c, &v) in corners.iter().enumerate() {
                if v >= vertex_count {
                    return Err(GrowthError::invalid_input(format!(
                        "face {f} references vertex {v}, but the mesh has {vertex_count} vertices"
                    )));
                }
                if corners[..c].contains(&v) {
                    return Err(GrowthError::invalid_input(format!(
                        "face {f} repeats vertex {v}"
                    )));
                }
            }

            let mut ring = Vec::with_capacity(len);
            for c in 0..len {
                let from = corners[c];
                let to = corners[(c + 1) % len];
                let key = (from.min(to), from.max(to));

                let pair = *pairs.entry(key).or_insert_with(|| {
                    let k = halfedges.len();
                    halfedges.push(Halfedge {
                        start: key.0,
                        next: k,
                        prev: k,
                        face: None,
                    });
                    halfedges.push(Halfedge {
                        start: key.1,
                        next: k + 1,
                        prev: k + 1,
                        face: None,
                    });
                    k
                });

                let he = if halfedges[pair].start == from {
                    pair
                } else {
                    pair + 1
                };
                if halfedges[he].face.is_some() {
                    return Err(GrowthError::invalid_input(format!(
                        "edge {from}-{to} is used twice in the same direction"
                    )));
                }
                halfedges[he].face = Some(f);
                ring.push(he);
            }

            for c in 0..len {
                let he = ring[c];
                halfedges[he].next = ring[(c + 1) % len];
                halfedges[he].prev = ring[(c + len - 1) % len];
            }
            face_list.push(Face { first: ring[0] });
        }

        let boundary: Vec<HalfedgeId> = (0..halfedges.len())
            .filter(|&he| halfedges[he].face.is_none())
            .collect();

        let mut leaving: HashMap<VertexId, HalfedgeId> = HashMap::with_capacity(boundary.len());
        for &he in &boundary {
            let start = halfedges[he].start;
            if leaving.insert(start, he).is_some() {
                return Err(GrowthError::invalid_input(format!(
                    "vertex {start} has more than one outgoing boundary edge"
                )));
            }
        }

        for &he in &boundary {
            let end = halfedges[he ^ 1].start;
            let next = *leaving.get(&end).ok_or_else(|| {
                GrowthError::invalid_input(format!("boundary at vertex {end} does not close"))
            })?;
            halfedges[he].next = next;
            halfedges[next].prev = he;
        }

        Ok(Self {
            positions,
            halfedges,
            faces: face_list,
        })
    }

    /// Returns the positions and polygon corner lists of the mesh.
    pub fn to_indexed(&self) -> (Vec<DVec3>, Vec<Vec<VertexId>>) {
        let faces = (0..self.faces.len())
            .map(|f| self.face_vertices(f))
            .collect();
        (self.positions.clone(), faces)
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn halfedge_count(&self) -> usize {
        self.halfedges.len()
    }

    /// Number of undirected edges.
    pub fn edge_count(&self) -> usize {
        self.halfedges.len() / 2
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    pub fn positions(&self) -> &[DVec3] {
        &self.positions
    }

    /// Mutable access to positions. The vertex count cannot change through
    /// this slice.
    pub fn positions_mut(&mut self) -> &mut [DVec3] {
        &mut self.positions
    }

    #[inline]
    pub fn position(&self, v: VertexId) -> DVec3 {
        self.positions[v]
    }

    #[inline]
    pub fn halfedge(&self, he: HalfedgeId) -> &Halfedge {
        &self.halfedges[he]
    }

    #[inline]
    pub const fn twin(he: HalfedgeId) -> HalfedgeId {
        he ^ 1
    }

    #[inline]
    pub fn start(&self, he: HalfedgeId) -> VertexId {
        self.halfedges[he].start
    }

    #[inline]
    pub fn end(&self, he: HalfedgeId) -> VertexId {
        self.halfedges[he ^ 1].start
    }

    #[inline]
    pub fn next(&self, he: HalfedgeId) -> HalfedgeId {
        self.halfedges[he].next
    }

    #[inline]
    pub fn prev(&self, he: HalfedgeId) -> HalfedgeId {
        self.halfedges[he].prev
    }

    #[inline]
    pub fn face(&self, he: HalfedgeId) -> Option<FaceId> {
        self.halfedges[he].face
    }

    pub fn edge_length(&self, he: HalfedgeId) -> f64 {
        self.position(self.start(he))
            .distance(self.position(self.end(he)))
    }

    /// The corner of `he`'s face that is not on `he`, reached through `prev`.
    ///
    /// For triangles this is the vertex opposite the edge. Returns `None` for
    /// boundary half-edges.
    pub fn opposite_vertex(&self, he: HalfedgeId) -> Option<VertexId> {
        self.face(he)?;
        Some(self.start(self.prev(he)))
    }

    /// Corners of a face in loop order, starting at its first half-edge.
    pub fn face_vertices(&self, face: FaceId) -> Vec<VertexId> {
        let first = self.faces[face].first;
        let mut corners = Vec::with_capacity(3);
        let mut he = first;
        loop {
            corners.push(self.start(he));
            he = self.next(he);
            if he == first {
                break;
            }
        }
        corners
    }

    /// Splits the edge of `he` at its midpoint.
    ///
    /// Appends one vertex and one half-edge pair. Afterwards `he` runs from its
    /// old start to the new vertex and the returned half-edge continues from
    /// the new vertex to the old end; the twins mirror this. Adjacent faces
    /// gain a corner but are not split.
    ///
    /// ### Panics
    /// Panics if `he` is out of range.
    pub fn split_edge(&mut self, he: HalfedgeId) -> HalfedgeId {
        let twin = he ^ 1;
        let a = self.start(he);
        let b = self.start(twin);

        let midpoint = 0.5 * (self.positions[a] + self.positions[b]);
        let mid = self.positions.len();
        self.positions.push(midpoint);

        let he_next = self.next(he);
        let twin_prev = self.prev(twin);
        let he_face = self.face(he);
        let twin_face = self.face(twin);
        let forward = self.halfedges.len();
        let backward = forward + 1;

        self.halfedges.push(Halfedge {
            start: mid,
            next: he_next,
            prev: he,
            face: he_face,
        });
        self.halfedges.push(Halfedge {
            start: b,
            next: twin,
            prev: twin_prev,
            face: twin_face,
        });

        self.halfedges[he_next].prev = forward;
        self.halfedges[he].next = forward;
        self.halfedges[twin_prev].next = backward;
        self.halfedges[twin].prev = backward;
        self.halfedges[twin].start = mid;

        forward
    }

    /// Splits a face with a new edge between the start corners of `to` and
    /// `from`, which must lie on the same face and not be adjacent.
    ///
    /// The face keeps the loop that contains `to`; the loop that contains
    /// `from` becomes a new face. Returns the new half-edge running from the
    /// start of `to` to the start of `from`.
    pub fn split_face(
        &mut self,
        to: HalfedgeId,
        from: HalfedgeId,
    ) -> Result<HalfedgeId, GrowthError> {
        let face = self.face(to).ok_or_else(|| {
            GrowthError::invalid_topology(format!("half-edge {to} lies on the boundary"))
        })?;
        if self.face(from) != Some(face) {
            return Err(GrowthError::invalid_topology(format!(
                "half-edges {to} and {from} do not share a face"
            )));
        }
        if to == from || self.next(to) == from || self.next(from) == to {
            return Err(GrowthError::invalid_topology(format!(
                "corners of half-edges {to} and {from} are adjacent"
            )));
        }

        let to_prev = self.prev(to);
        let from_prev = self.prev(from);
        let to_start = self.start(to);
        let from_start = self.start(from);
        let new_face = self.faces.len();
        let diagonal = self.halfedges.len();
        let back = diagonal + 1;

        self.halfedges.push(Halfedge {
            start: to_start,
            next: from,
            prev: to_prev,
            face: Some(new_face),
        });
        self.halfedges.push(Halfedge {
            start: from_start,
            next: to,
            prev: from_prev,
            face: Some(face),
        });

        self.halfedges[to_prev].next = diagonal;
        self.halfedges[from].prev = diagonal;
        self.halfedges[from_prev].next = back;
        self.halfedges[to].prev = back;

        self.faces.push(Face { first: diagonal });
        self.faces[face].first = back;

        let mut he = from;
        while he != diagonal {
            self.halfedges[he].face = Some(new_face);
            he = self.next(he);
        }

        Ok(diagonal)
    }

    /// Splits the edge of `he` at its midpoint and cuts every adjacent face
    /// with a diagonal from the new vertex to the corner reached across the
    /// face. Triangles stay triangles. Returns the new vertex.
    pub fn subdivide_edge(&mut self, he: HalfedgeId) -> Result<VertexId, GrowthError> {
        let twin = he ^ 1;
        let forward = self.split_edge(he);

        if self.face(he).is_some() {
            self.split_face(forward, self.prev(he))?;
        }
        if self.face(twin).is_some() {
            let across = self.next(self.next(twin));
            self.split_face(twin, across)?;
        }

        Ok(self.start(forward))
    }
}
