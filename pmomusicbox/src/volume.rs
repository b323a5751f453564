//! Volume normalization applied before every play or resume.

use pmohass::{HassError, PlayerBackend};
use tracing::{debug, info};

/// Configured volume policy (`player.volume.{default,min,max}`).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct VolumeBounds {
    pub default: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl VolumeBounds {
    pub fn new(default: Option<f64>, min: Option<f64>, max: Option<f64>) -> Self {
        Self { default, min, max }
    }

    pub fn is_empty(&self) -> bool {
        self.default.is_none() && self.min.is_none() && self.max.is_none()
    }
}

/// Target volume for a player currently at `current`.
///
/// - default, min and max set: out of `[min, max]` resets to default
/// - default alone: always default
/// - otherwise clamp to max, then to min (min wins when they cross)
pub fn normalize(current: f64, bounds: &VolumeBounds) -> f64 {
    match (bounds.default, bounds.min, bounds.max) {
        (Some(default), Some(min), Some(max)) => {
            if current > max || current < min {
                default
            } else {
                current
            }
        }
        (Some(default), None, None) => default,
        (_, min, max) => {
            let mut volume = current;
            if let Some(max) = max {
                if volume > max {
                    volume = max;
                }
            }
            if let Some(min) = min {
                if volume < min {
                    volume = min;
                }
            }
            volume
        }
    }
}

/// Reads the player volume and writes the normalized one when it differs.
///
/// Returns the volume written, if any.
pub fn ensure_volume(
    player: &dyn PlayerBackend,
    bounds: &VolumeBounds,
) -> Result<Option<f64>, HassError> {
    if bounds.is_empty() {
        return Ok(None);
    }

    let current = player.volume()?;
    let target = normalize(current, bounds);
    if target == current {
        debug!(volume = current, "Volume within bounds");
        return Ok(None);
    }

    info!(from = current, to = target, "Adjusting volume");
    player.set_volume(target)?;
    Ok(Some(target))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds(default: Option<f64>, min: Option<f64>, max: Option<f64>) -> VolumeBounds {
        VolumeBounds::new(default, min, max)
    }

    #[test]
    fn test_full_bounds_reset_to_default_when_outside() {
        let b = bounds(Some(0.4), Some(0.2), Some(0.8));
        assert_eq!(normalize(0.5, &b), 0.5);
        assert_eq!(normalize(0.9, &b), 0.4);
        assert_eq!(normalize(0.1, &b), 0.4);
        assert_eq!(normalize(0.8, &b), 0.8);
    }

    #[test]
    fn test_default_only_always_applies() {
        let b = bounds(Some(0.3), None, None);
        assert_eq!(normalize(0.9, &b), 0.3);
        assert_eq!(normalize(0.3, &b), 0.3);
    }

    #[test]
    fn test_clamp_without_full_bounds() {
        let b = bounds(None, Some(0.2), Some(0.8));
        assert_eq!(normalize(0.9, &b), 0.8);
        assert_eq!(normalize(0.1, &b), 0.2);
        assert_eq!(normalize(0.5, &b), 0.5);

        // default is ignored when only one bound accompanies it
        let b = bounds(Some(0.5), None, Some(0.7));
        assert_eq!(normalize(0.9, &b), 0.7);
        assert_eq!(normalize(0.1, &b), 0.1);
    }

    #[test]
    fn test_min_wins_over_max() {
        let b = bounds(None, Some(0.6), Some(0.4));
        assert_eq!(normalize(0.9, &b), 0.6);
    }

    #[test]
    fn test_no_bounds_keeps_current() {
        assert_eq!(normalize(0.77, &VolumeBounds::default()), 0.77);
    }
}
