//! Equirectangular image sampling for the halo kernel.

use anyhow::{Context, Result};
use glam::{Vec2, Vec4};
use glimmer_shaders::Channel;
use shared::{mix, FloatExt};

/// Bilinear sampler over a decoded equirectangular image. U wraps so the
/// longitude seam stays invisible; V clamps at the poles.
pub struct EquirectImage {
    width: u32,
    height: u32,
    texels: Vec<Vec4>,
}

impl EquirectImage {
    pub fn open(path: &str) -> Result<Self> {
        let image = image::open(path)
            .with_context(|| format!("failed to decode image {path}"))?
            .to_rgba8();

        Ok(Self::from_rgba8(image.width(), image.height(), image.as_raw()))
    }

    pub fn from_rgba8(width: u32, height: u32, data: &[u8]) -> Self {
        debug_assert!(width > 0 && height > 0);
        debug_assert_eq!(data.len(), (width * height * 4) as usize);
        let texels = data
            .chunks_exact(4)
            .map(|px| Vec4::new(px[0] as f32, px[1] as f32, px[2] as f32, px[3] as f32) / 255.0)
            .collect();

        EquirectImage {
            width,
            height,
            texels,
        }
    }

    fn texel(&self, x: u32, y: u32) -> Vec4 {
        self.texels[(y * self.width + x) as usize]
    }
}

impl Channel for &EquirectImage {
    fn sample(self, uv: Vec2) -> Vec4 {
        let w = self.width as f32;
        let h = self.height as f32;
        let x = uv.x.gl_fract() * w - 0.5;
        let y = (uv.y.clamp(0.0, 1.0) * h - 0.5).clamp(0.0, h - 1.0);

        let x0 = x.floor();
        let y0 = y.floor();
        let fx = x - x0;
        let fy = y - y0;

        let x0 = x0.rem_euclid(w) as u32 % self.width;
        let x1 = (x0 + 1) % self.width;
        let y0 = y0 as u32;
        let y1 = (y0 + 1).min(self.height - 1);

        let top = mix(self.texel(x0, y0), self.texel(x1, y0), fx);
        let bottom = mix(self.texel(x0, y1), self.texel(x1, y1), fx);

        mix(top, bottom, fy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::vec2;

    // Two texels wide, one tall: red on the left, blue on the right.
    fn red_blue() -> EquirectImage {
        EquirectImage::from_rgba8(2, 1, &[255, 0, 0, 255, 0, 0, 255, 255])
    }

    #[test]
    fn texel_centers_sample_exactly() {
        let image = red_blue();
        assert_eq!((&image).sample(vec2(0.25, 0.5)), Vec4::new(1.0, 0.0, 0.0, 1.0));
        assert_eq!((&image).sample(vec2(0.75, 0.5)), Vec4::new(0.0, 0.0, 1.0, 1.0));
    }

    #[test]
    fn longitude_wraps_across_the_seam() {
        let image = red_blue();
        // u = 0 and u = 1 land halfway between the last and first texels.
        let seam = (&image).sample(vec2(0.0, 0.5));
        assert_eq!(seam, (&image).sample(vec2(1.0, 0.5)));
        assert!((seam.x - 0.5).abs() < 1e-6);
        assert!((seam.z - 0.5).abs() < 1e-6);
    }

    #[test]
    fn latitude_clamps_at_the_poles() {
        let image = red_blue();
        assert_eq!(
            (&image).sample(vec2(0.25, 0.0)),
            (&image).sample(vec2(0.25, 1.0))
        );
    }

    #[test]
    fn bilinear_blend_is_exact_midway() {
        let image = red_blue();
        let mid = (&image).sample(vec2(0.5, 0.5));
        assert!((mid.x - 0.5).abs() < 1e-6);
        assert!((mid.z - 0.5).abs() < 1e-6);
    }
}
