//! Color temperature to per-channel gain conversion.
//!
//! Uses Tanner Helland's curve fit of the Planckian locus, which maps a
//! blackbody temperature to the sRGB color of its light. The resulting color,
//! normalized to `[0, 1]`, is used as a multiplier on each channel.

/// Temperature treated as the neutral white point.
pub const NEUTRAL_KELVIN: f32 = 6500.0;

/// Lowest temperature the approximation is evaluated at.
pub const MIN_KELVIN: f32 = 2000.0;

/// Highest temperature the approximation is evaluated at.
pub const MAX_KELVIN: f32 = 10000.0;

/// Convert a color temperature to `[r, g, b]` channel gains in `[0, 1]`.
///
/// Input outside `[MIN_KELVIN, MAX_KELVIN]` is clamped first; the curve fit
/// is undefined below 1000 K and meaningless above 40000 K.
///
/// # Example
/// ```
/// use retouch_core::white_balance::kelvin_to_gains;
///
/// let [r, g, b] = kelvin_to_gains(3000.0);
/// assert!(r > b, "tungsten light is warm");
/// ```
pub fn kelvin_to_gains(kelvin: f32) -> [f32; 3] {
    let kelvin = if kelvin.is_nan() {
        NEUTRAL_KELVIN
    } else {
        kelvin.clamp(MIN_KELVIN, MAX_KELVIN)
    };
    let temp = kelvin as f64 / 100.0;

    let red = if temp <= 66.0 {
        255.0
    } else {
        clamp_channel(329.698727446 * (temp - 60.0).powf(-0.1332047592))
    };

    let green = if temp <= 66.0 {
        99.4708025861 * temp.ln() - 161.1195681661
    } else {
        288.1221695283 * (temp - 60.0).powf(-0.0755148492)
    };
    let green = clamp_channel(green);

    let blue = if temp >= 66.0 {
        255.0
    } else if temp <= 19.0 {
        0.0
    } else {
        clamp_channel(138.5177312231 * (temp - 10.0).ln() - 305.0447927307)
    };

    [
        (red / 255.0) as f32,
        (green / 255.0) as f32,
        (blue / 255.0) as f32,
    ]
}

#[inline]
fn clamp_channel(value: f64) -> f64 {
    value.clamp(0.0, 255.0)
}
