use glam::DVec3;

/// A point that confines growth to its neighbourhood.
///
/// The attractor does not pull vertices. It gates the moves the other
/// constraints suggested: full strength at the point, fading to nothing at
/// `max_distance`, frozen beyond it.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Attractor {
    pub point: DVec3,
    pub max_distance: f64,
}

impl Attractor {
    pub fn new(point: DVec3, max_distance: f64) -> Self {
        Self {
            point,
            max_distance,
        }
    }

    /// Factor applied to a vertex's accumulated move: `1 - d² / max²` inside
    /// the radius, `0` outside. A non-positive radius freezes everything.
    pub fn falloff(&self, pos: DVec3) -> f64 {
        let d2 = pos.distance_squared(self.point);
        let max2 = self.max_distance * self.max_distance;
        if self.max_distance <= 0.0 || d2 > max2 {
            0.0
        } else {
            1.0 - d2 / max2
        }
    }
}
