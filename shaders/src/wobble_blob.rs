//! Raymarched wobbling blob.
//!
//! Sphere-traces a sine-displaced sphere; hits are shaded from the SDF
//! gradient through the piecewise colormap, near misses leave a soft glow.

use glam::{vec3, Vec2, Vec3, Vec4};
use shared::{mix, saturate, BlobUniforms};

use crate::colormap;

const CAMERA: Vec3 = Vec3::new(0.0, 0.0, 2.6);
/// Depth of the image plane in front of the camera.
const FOCAL: f32 = 1.8;
const RADIUS: f32 = 1.0;

const WOBBLE_AMP: f32 = 0.2;
const WOBBLE_FREQ: Vec3 = Vec3::new(4.0, 5.0, 3.0);

const MAX_STEPS: i32 = 64;
const HIT_EPS: f32 = 0.001;
const NORMAL_EPS: f32 = 0.001;
/// Marching past this plane means the ray has left the scene volume.
const Z_CUTOFF: f32 = -3.0;

const LIGHT_POS: Vec3 = Vec3::new(2.5, 3.0, 4.0);
const AMBIENT: f32 = 0.18;
const GLOW_COLOR: Vec3 = Vec3::new(0.45, 0.25, 0.6);

pub struct Inputs {
    pub resolution: Vec2,
    pub top_left: Vec2,
    pub time: f32,
    pub background: Vec3,
    pub alpha: f32,
}

impl Inputs {
    pub fn new(uniforms: &BlobUniforms) -> Self {
        Inputs {
            resolution: Vec2::from_array(uniforms.resolution),
            top_left: Vec2::from_array(uniforms.top_left),
            time: uniforms.time,
            background: vec3(uniforms.bg_r, uniforms.bg_g, uniforms.bg_b),
            alpha: uniforms.alpha,
        }
    }

    fn sdf(&self, p: Vec3) -> f32 {
        displaced_sphere(p, self.time, WOBBLE_AMP)
    }

    fn normal(&self, p: Vec3) -> Vec3 {
        let e: f32 = NORMAL_EPS;
        vec3(
            self.sdf(p + vec3(e, 0.0, 0.0)) - self.sdf(p - vec3(e, 0.0, 0.0)),
            self.sdf(p + vec3(0.0, e, 0.0)) - self.sdf(p - vec3(0.0, e, 0.0)),
            self.sdf(p + vec3(0.0, 0.0, e)) - self.sdf(p - vec3(0.0, 0.0, e)),
        )
        .normalize()
    }

    fn shade(&self, p: Vec3) -> Vec3 {
        let n: Vec3 = self.normal(p);
        let light: Vec3 = (LIGHT_POS - p).normalize();
        let height: f32 = (p.length() - RADIUS) / WOBBLE_AMP;

        colormap::sample(height) * saturate(n.dot(light) + AMBIENT)
    }

    pub fn main_image(&self, frag_color: &mut Vec4, frag_coord: Vec2) {
        let uv: Vec2 = frag_coord - self.top_left;
        let mut p: Vec2 = (2.0 * uv - self.resolution) / self.resolution.y;
        p.y = -p.y;
        let rd: Vec3 = vec3(p.x, p.y, -FOCAL).normalize();

        let mut t: f32 = 0.0;
        let mut pos: Vec3 = CAMERA;
        let mut hit = false;
        let mut i: i32 = 0;
        while i < MAX_STEPS {
            pos = CAMERA + t * rd;
            let d: f32 = self.sdf(pos);
            if d.abs() < HIT_EPS {
                hit = true;
                break;
            }
            t += d;
            if pos.z < Z_CUTOFF {
                break;
            }
            i += 1;
        }

        let rgb: Vec3 = if hit || i == MAX_STEPS {
            // Running out of steps only happens skimming the surface, so
            // shading the final position reads as a hit and keeps the
            // silhouette soft.
            self.shade(pos)
        } else if i >= MAX_STEPS / 2 {
            let over: f32 = (i - MAX_STEPS / 2) as f32 / (MAX_STEPS / 2) as f32;
            mix(self.background, GLOW_COLOR, over * over)
        } else {
            self.background
        };

        *frag_color = rgb.clamp(Vec3::ZERO, Vec3::ONE).extend(self.alpha);
    }
}

// Distance to a sphere displaced by a product of per-axis sines; time is
// added to the sample position so the wobble flows instead of pulsing in
// place.
fn displaced_sphere(p: Vec3, time: f32, amp: f32) -> f32 {
    let q: Vec3 = p + Vec3::splat(time);

    p.length() - RADIUS
        + amp
            * (WOBBLE_FREQ.x * q.x).sin()
            * (WOBBLE_FREQ.y * q.y).sin()
            * (WOBBLE_FREQ.z * q.z).sin()
}
