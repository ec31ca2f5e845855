//! Per-pixel shading kernels for procedural glow backdrops.
//!
//! Two programs, one per module: a ray-traced glowing sphere with an animated
//! corona ([`halo_sphere`]) and a raymarched wobbling blob shaded through a
//! piecewise colormap ([`wobble_blob`]). Both are pure functions of the
//! per-frame uniform block and the fragment position; a host pipeline draws
//! them over the full-screen triangle emitted by
//! [`fullscreen_triangle_vertex`] and composites with the alpha carried in
//! the uniforms.

use core::f32::consts::TAU;

use glam::{vec2, Vec2, Vec4};
use shared::{smoothstep, BlobUniforms, FloatExt, HaloUniforms};

pub mod colormap;
pub mod halo_sphere;
pub mod wobble_blob;

/// Equirectangular texture source for the halo sphere, addressed by
/// longitude/latitude UV in [0,1]x[0,1]. Implementations wrap in U so the
/// 0/1 longitude seam stays invisible; V is clamped.
pub trait Channel: Copy {
    fn sample(self, uv: Vec2) -> Vec4;
}

#[derive(Copy, Clone)]
pub struct ConstantColor {
    pub color: Vec4,
}

impl Channel for ConstantColor {
    fn sample(self, _: Vec2) -> Vec4 {
        self.color
    }
}

/// Procedural stand-in for a star-surface texture: a warm base with soft
/// latitude bands. Keeps the halo kernel usable without an image on disk.
#[derive(Copy, Clone)]
pub struct SolarSurface {
    pub intensity: f32,
}

impl Channel for SolarSurface {
    fn sample(self, uv: Vec2) -> Vec4 {
        let u: f32 = uv.x.gl_fract();
        let band: f32 = 0.5 + 0.5 * (uv.y * 37.0 + (u * TAU).sin() * 1.5).sin();
        let shade: f32 = (0.55 + 0.45 * smoothstep(0.15, 0.85, band)) * self.intensity;
        (Vec4::new(1.0, 0.62, 0.28, 1.0) * shade).min(Vec4::ONE)
    }
}

/// Clip-space position of one corner of a viewport-covering triangle.
///
/// Standard full-screen-triangle trick: the host issues a three-vertex draw
/// with no vertex buffers and the positions fall out of the index bits.
pub fn fullscreen_triangle_vertex(vert_idx: i32) -> Vec4 {
    let uv = vec2(((vert_idx << 1) & 2) as f32, (vert_idx & 2) as f32);
    let pos = 2.0 * uv - Vec2::ONE;

    pos.extend(0.0).extend(1.0)
}

/// Fragment entry point for the halo sphere program.
pub fn halo_fs<C0: Channel>(uniforms: &HaloUniforms, channel0: C0, frag_coord: Vec2) -> Vec4 {
    let mut color = Vec4::ZERO;
    halo_sphere::Inputs::new(uniforms, channel0).main_image(&mut color, frag_coord);
    color
}

/// Fragment entry point for the wobble blob program.
pub fn blob_fs(uniforms: &BlobUniforms, frag_coord: Vec2) -> Vec4 {
    let mut color = Vec4::ZERO;
    wobble_blob::Inputs::new(uniforms).main_image(&mut color, frag_coord);
    color
}
