//! Piecewise colormap for the blob surface.
//!
//! Control points loosely follow the matplotlib plasma palette; each channel
//! is its own mix of linear and smooth cubic segments over nine knots, with
//! values in a 0..255 range scaled down to [0, 1] on the way out.

use glam::{vec3, Vec3};

#[derive(Clone, Copy)]
enum Segment {
    Linear,
    /// Hermite-style ease between the two knot values.
    Cubic,
}

const KNOTS: [f32; 9] = [0.0, 0.0975, 0.195, 0.33, 0.5, 0.665, 0.83, 0.92, 1.0];

const RED: [f32; 9] = [13.0, 46.0, 84.0, 126.0, 166.0, 203.0, 229.0, 243.0, 240.0];
const GREEN: [f32; 9] = [8.0, 7.0, 10.0, 15.0, 32.0, 70.0, 120.0, 164.0, 249.0];
const BLUE: [f32; 9] = [135.0, 156.0, 166.0, 161.0, 143.0, 110.0, 68.0, 39.0, 33.0];

use Segment::{Cubic, Linear};

const RED_SEGMENTS: [Segment; 8] = [Cubic, Cubic, Cubic, Linear, Linear, Cubic, Linear, Cubic];
const GREEN_SEGMENTS: [Segment; 8] = [Linear, Cubic, Cubic, Cubic, Cubic, Linear, Cubic, Cubic];
const BLUE_SEGMENTS: [Segment; 8] = [Cubic, Linear, Cubic, Cubic, Linear, Cubic, Cubic, Linear];

fn channel(x: f32, values: &[f32; 9], segments: &[Segment; 8]) -> f32 {
    let x = x.clamp(0.0, 1.0);
    let mut i = 0;
    while i < 7 && x > KNOTS[i + 1] {
        i += 1;
    }

    let t = (x - KNOTS[i]) / (KNOTS[i + 1] - KNOTS[i]);
    let t = match segments[i] {
        Linear => t,
        Cubic => t * t * (3.0 - 2.0 * t),
    };

    ((values[i] + (values[i + 1] - values[i]) * t) / 255.0).clamp(0.0, 1.0)
}

/// Colormap lookup. The input is clamped to [0, 1], each channel comes back
/// in [0, 1], and the curve is continuous at every knot.
pub fn sample(x: f32) -> Vec3 {
    vec3(
        channel(x, &RED, &RED_SEGMENTS),
        channel(x, &GREEN, &GREEN_SEGMENTS),
        channel(x, &BLUE, &BLUE_SEGMENTS),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_match_the_knot_values() {
        let low = sample(0.0);
        assert!((low.x - 13.0 / 255.0).abs() < 1e-6);
        assert!((low.y - 8.0 / 255.0).abs() < 1e-6);
        assert!((low.z - 135.0 / 255.0).abs() < 1e-6);

        let high = sample(1.0);
        assert!((high.x - 240.0 / 255.0).abs() < 1e-6);
        assert!((high.y - 249.0 / 255.0).abs() < 1e-6);
        assert!((high.z - 33.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn all_samples_stay_in_unit_range() {
        for i in 0..=256 {
            let c = sample(i as f32 / 256.0);
            for component in c.to_array() {
                assert!((0.0..=1.0).contains(&component));
            }
        }
        // Midpoint explicitly, it sits exactly on a knot.
        let mid = sample(0.5);
        for component in mid.to_array() {
            assert!((0.0..=1.0).contains(&component));
        }
    }

    #[test]
    fn continuous_at_every_knot() {
        for &knot in &KNOTS[1..8] {
            let below = sample(knot - 1e-4);
            let above = sample(knot + 1e-4);
            let jump = (below - above).abs().max_element();
            assert!(jump < 0.02, "jump {jump} at knot {knot}");
        }
    }

    #[test]
    fn out_of_range_inputs_clamp_to_the_ends() {
        assert_eq!(sample(-3.0), sample(0.0));
        assert_eq!(sample(42.0), sample(1.0));
    }
}
