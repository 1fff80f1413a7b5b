use serde::{Deserialize, Serialize};

use crate::domain::{is_volume_equal, Volume};

/// Inclusive bounds on the signed net position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionLimits {
    pub min_position: Volume,
    pub max_position: Volume,
}

impl PositionLimits {
    pub fn new(min_position: Volume, max_position: Volume) -> Self {
        assert!(
            max_position >= min_position,
            "max_position must be >= min_position"
        );
        Self {
            min_position,
            max_position,
        }
    }

    /// Volume that can still be bought from `position` without crossing the upper bound.
    pub fn buy_room(&self, position: Volume) -> Volume {
        self.max_position - position
    }

    /// Volume that can still be sold from `position` without crossing the lower bound.
    pub fn sell_room(&self, position: Volume) -> Volume {
        position - self.min_position
    }

    pub fn at_max(&self, position: Volume) -> bool {
        is_volume_equal(position, self.max_position)
    }

    pub fn at_min(&self, position: Volume) -> bool {
        is_volume_equal(position, self.min_position)
    }

    pub fn contains(&self, position: Volume) -> bool {
        position >= self.min_position && position <= self.max_position
    }

    /// Snap a position lying within tolerance of a bound onto that bound.
    pub fn snap(&self, position: Volume) -> Volume {
        if self.at_max(position) {
            self.max_position
        } else if self.at_min(position) {
            self.min_position
        } else {
            position
        }
    }
}

impl Default for PositionLimits {
    fn default() -> Self {
        Self::new(-1000.0, 1000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::VOLUME_EPSILON;

    #[test]
    fn rooms_from_flat() {
        let limits = PositionLimits::new(-100.0, 50.0);
        assert_eq!(limits.buy_room(0.0), 50.0);
        assert_eq!(limits.sell_room(0.0), 100.0);
    }

    #[test]
    fn rooms_from_short_position() {
        let limits = PositionLimits::new(-100.0, 100.0);
        assert_eq!(limits.buy_room(-50.0), 150.0);
        assert_eq!(limits.sell_room(-50.0), 50.0);
    }

    #[test]
    fn bound_detection_uses_strict_tolerance() {
        let limits = PositionLimits::new(-10.0, 10.0);
        assert!(limits.at_max(10.0));
        assert!(limits.at_max(10.0 - VOLUME_EPSILON / 10.0));
        assert!(!limits.at_max(10.0 - 1e-6));
        assert!(limits.at_min(-10.0));
    }

    #[test]
    fn snap_only_touches_near_bound_values() {
        let limits = PositionLimits::new(-10.0, 10.0);
        assert_eq!(limits.snap(10.0 + 1e-12), 10.0);
        assert_eq!(limits.snap(-10.0 - 1e-12), -10.0);
        assert_eq!(limits.snap(3.5), 3.5);
    }

    #[test]
    #[should_panic(expected = "max_position must be >= min_position")]
    fn inverted_limits_panic() {
        PositionLimits::new(5.0, -5.0);
    }
}
