//! Count-to-color scale for the choropleth.
//!
//! Colors are relative: a county's color depends on its count *and* the
//! largest count in the same aggregation run, so they must be recomputed
//! whenever the data set changes.

use feedback_map_analytics_models::HslColor;

/// Fill for counties with no feedback (`#e0e0e0`).
pub const NO_DATA_COLOR: HslColor = HslColor::new(0.0, 0.0, 88.0);

/// Upper bound on intensity. The busiest county stops short of the most
/// saturated end of the scale.
pub const MAX_INTENSITY: f64 = 0.9;

const GREEN_HUE: f64 = 120.0;
const PALE_LIGHTNESS: f64 = 90.0;
const LIGHTNESS_RANGE: f64 = 40.0;

/// Position of `count` on the scale, in `[0, MAX_INTENSITY]`.
///
/// `max_count` is floored at 1.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn intensity(count: u64, max_count: u64) -> f64 {
    (count as f64 / max_count.max(1) as f64).min(MAX_INTENSITY)
}

/// Maps a count to its fill color.
///
/// Zero is always [`NO_DATA_COLOR`]. Anything else runs from pale green
/// (hue 120, lightness 90%) toward vivid red (hue 0, lightness 50%) as
/// intensity rises.
#[must_use]
pub fn color_for_count(count: u64, max_count: u64) -> HslColor {
    if count == 0 {
        return NO_DATA_COLOR;
    }

    let intensity = intensity(count, max_count);
    HslColor::new(
        intensity.mul_add(-GREEN_HUE, GREEN_HUE),
        100.0,
        intensity.mul_add(-LIGHTNESS_RANGE, PALE_LIGHTNESS),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn zero_count_is_neutral_for_any_max() {
        for max in [0, 1, 2, 100, u64::MAX] {
            assert_eq!(color_for_count(0, max), NO_DATA_COLOR);
        }
    }

    #[test]
    fn highest_count_is_clamped() {
        let color = color_for_count(2, 2);
        assert!(approx(color.hue, 12.0));
        assert!(approx(color.lightness, 54.0));
        assert!(approx(color.saturation, 100.0));
    }

    #[test]
    fn half_of_max_is_yellow_green() {
        let color = color_for_count(1, 2);
        assert!(approx(color.hue, 60.0));
        assert!(approx(color.lightness, 70.0));
    }

    #[test]
    fn zero_max_is_floored() {
        let color = color_for_count(1, 0);
        assert!(approx(color.hue, 12.0));
    }

    #[test]
    fn same_inputs_same_color() {
        for (count, max) in [(1, 7), (3, 7), (7, 7), (10, 3)] {
            assert_eq!(color_for_count(count, max), color_for_count(count, max));
        }
    }

    #[test]
    fn hue_does_not_increase_with_count() {
        let max = 20;
        let mut previous = f64::INFINITY;
        for count in 1..=max {
            let hue = color_for_count(count, max).hue;
            assert!(hue <= previous, "hue rose at count {count}");
            previous = hue;
        }
    }

    #[test]
    fn lightness_stays_in_range() {
        for count in 0..=50 {
            let l = color_for_count(count, 10).lightness;
            assert!((50.0..=90.0).contains(&l) || approx(l, NO_DATA_COLOR.lightness));
        }
    }
}
