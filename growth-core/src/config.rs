use crate::attractor::Attractor;

/// Spring that pulls every vertex pair closer than `distance` back to
/// exactly `distance` apart.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Collision {
    pub distance: f64,
    pub weight: f64,
}

/// Spring along every mesh edge.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EdgeLength {
    pub desired_distance: f64,
    pub weight: f64,
}

/// When the edge-length spring runs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EdgeLengthPolicy {
    /// Every step, stretching short edges and shrinking long ones.
    Always,
    /// Only on steps that do not grow. Subdivision keeps edges near the
    /// reference length while growing.
    #[default]
    SkipWhileGrowing,
    /// Every step, but only edges longer than the reference are pulled in.
    TensionOnly,
}

/// Distance used both as the edge-length target and as the split threshold.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LengthReference {
    #[default]
    DesiredDistance,
    CollisionDistance,
}

/// Parameters of one simulation step.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Config {
    pub grow: bool,
    /// Soft cap: growth stops splitting once the vertex count reaches it.
    pub max_vertex_count: usize,
    pub collision: Collision,
    pub edge_length: EdgeLength,
    pub bending_weight: f64,
    pub attractor: Option<Attractor>,
    pub edge_length_policy: EdgeLengthPolicy,
    pub length_reference: LengthReference,
}

impl Config {
    /// The edge length the spring aims for and growth splits against.
    pub fn reference_length(&self) -> f64 {
        match self.length_reference {
            LengthReference::DesiredDistance => self.edge_length.desired_distance,
            LengthReference::CollisionDistance => self.collision.distance,
        }
    }

    /// Whether the edge-length pass runs on this step.
    pub fn edge_length_active(&self) -> bool {
        match self.edge_length_policy {
            EdgeLengthPolicy::Always | EdgeLengthPolicy::TensionOnly => true,
            EdgeLengthPolicy::SkipWhileGrowing => !self.grow,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            grow: true,
            max_vertex_count: 3000,
            collision: Collision {
                distance: 1.0,
                weight: 1.0,
            },
            edge_length: EdgeLength {
                desired_distance: 1.0,
                weight: 1.0,
            },
            bending_weight: 0.5,
            attractor: None,
            edge_length_policy: EdgeLengthPolicy::default(),
            length_reference: LengthReference::default(),
        }
    }
}
