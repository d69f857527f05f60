/// Identifier for a vertex in a [`crate::mesh::HalfedgeMesh`].
///
/// This is an index into the mesh position list. Vertices are never removed,
/// so an id stays valid for the lifetime of the mesh.
pub type VertexId = usize;

/// Identifier for a half-edge. The twin of half-edge `k` is always `k ^ 1`.
pub type HalfedgeId = usize;

/// Identifier for a face.
pub type FaceId = usize;
