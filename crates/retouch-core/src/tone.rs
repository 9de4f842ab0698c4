//! Shadow lift / highlight compression tone remap.
//!
//! Shadows are lifted on a ramp that is strongest at black and fades out at
//! the shadow pivot. Highlights are compressed on a ramp that starts at the
//! highlight pivot and reaches full strength at white. Both ramps operate on a
//! single normalized channel value.

use crate::config::ToneConfig;

/// Remap a normalized channel value with the default tone constants.
///
/// # Arguments
/// * `value` - Channel value (0.0 to 1.0)
/// * `shadows` - Shadow lift (-100 to 100)
/// * `highlights` - Highlight compression (-100 to 100)
#[inline]
pub fn tone_remap(value: f32, shadows: f32, highlights: f32) -> f32 {
    ToneConfig::default().remap(value, shadows, highlights)
}

impl ToneConfig {
    /// Remap a normalized channel value, returning a value in `[0, 1]`.
    ///
    /// The shadow stage runs first and the highlight ramp is evaluated on its
    /// output. A zero parameter skips its stage entirely.
    pub fn remap(&self, value: f32, shadows: f32, highlights: f32) -> f32 {
        let mut t = value;

        if shadows != 0.0 {
            let weight = (t / self.shadow_pivot).clamp(0.0, 1.0);
            let lift = shadows / 100.0 * self.strength;
            t += lift * (1.0 - weight) * (1.0 - t);
        }

        if highlights != 0.0 {
            let weight = ((t - self.highlight_pivot) / (1.0 - self.highlight_pivot)).clamp(0.0, 1.0);
            let compression = highlights / 100.0 * self.strength;
            t -= compression * weight * t;
        }

        t.clamp(0.0, 1.0)
    }
}
