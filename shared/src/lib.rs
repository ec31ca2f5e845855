//! Uniform block layouts and small GLSL-flavoured math helpers shared by the
//! shading kernels and any host pipeline that drives them.

use core::ops::{Add, Mul, Sub};

/// Per-frame uniform block for the halo sphere program.
///
/// Field-for-field wire layout for a host's uniform buffer: eleven floats,
/// 44 bytes, no implicit padding. Resolution components must be strictly
/// positive and `alpha` must lie in [0, 1]; `time` is seconds elapsed,
/// monotonically non-decreasing across frames.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct HaloUniforms {
    pub resolution: [f32; 2],
    pub top_left: [f32; 2],
    pub time: f32,
    pub bg_r: f32,
    pub bg_g: f32,
    pub bg_b: f32,
    pub alpha: f32,
    /// External modulation of the overall halo amplitude.
    pub halo_strength: f32,
    /// External modulation of the sinusoidal time pulse.
    pub pulse_depth: f32,
}

/// Per-frame uniform block for the wobble blob program. Ten floats, 40 bytes.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct BlobUniforms {
    pub resolution: [f32; 2],
    pub top_left: [f32; 2],
    pub time: f32,
    pub bg_r: f32,
    pub bg_g: f32,
    pub bg_b: f32,
    pub alpha: f32,
    /// Unused, reserved.
    pub _pad: f32,
}

impl HaloUniforms {
    /// Size of the block in bytes, for sizing a host uniform buffer.
    pub const fn size_in_bytes() -> u64 {
        core::mem::size_of::<Self>() as u64
    }
}

impl BlobUniforms {
    /// Size of the block in bytes, for sizing a host uniform buffer.
    pub const fn size_in_bytes() -> u64 {
        core::mem::size_of::<Self>() as u64
    }
}

pub fn saturate(x: f32) -> f32 {
    x.clamp(0.0, 1.0)
}

pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    // Scale, bias and saturate x to 0..1 range
    let x = saturate((x - edge0) / (edge1 - edge0));
    // Evaluate polynomial
    x * x * (3.0 - 2.0 * x)
}

pub fn mix<X: Copy + Mul<A, Output = X> + Add<Output = X> + Sub<Output = X>, A: Copy>(
    x: X,
    y: X,
    a: A,
) -> X {
    x - x * a + y * a
}

pub trait FloatExt {
    fn gl_fract(self) -> Self;
}

impl FloatExt for f32 {
    fn gl_fract(self) -> f32 {
        self - self.floor()
    }
}
