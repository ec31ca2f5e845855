//! Ray-traced glowing sphere with an animated corona.
//!
//! One analytic ray/sphere test per pixel. Hits sample an equirectangular
//! surface texture spun about a tilted axis; misses build a stylized halo
//! from two radial falloffs and an eight-spike angular pattern around the
//! sphere's silhouette, pulsing with time.

use core::f32::consts::{FRAC_PI_2, FRAC_PI_4, PI, TAU};

use glam::{vec2, vec3, Vec2, Vec3, Vec4};
use shared::HaloUniforms;

use crate::Channel;

const CAMERA: Vec3 = Vec3::new(0.0, 0.0, -3.4);
const RADIUS: f32 = 1.0;
/// Depth of the image plane in front of the camera.
const FOCAL: f32 = 2.0;

/// Tilted spin axis for the surface animation, normalize(0.25, 1, 0).
const SPIN_AXIS: Vec3 = Vec3::new(0.242_535_62, 0.970_142_5, 0.0);
const SPIN_RATE: f32 = 0.18;

const CONTRAST: f32 = 1.25;
const BRIGHTNESS: f32 = 0.02;

const HALO_TINT: Vec3 = Vec3::new(1.0, 0.82, 0.55);
const BASE_GLOW_WIDTH: f32 = 0.42;
const BASE_GLOW_AMP: f32 = 0.5;
const SPIKE_GLOW_WIDTH: f32 = 0.16;
const SPIKE_GLOW_AMP: f32 = 1.35;
const PRIMARY_HALF_WIDTH: f32 = 0.55;
const SECONDARY_HALF_WIDTH: f32 = 0.38;
const SECONDARY_WEIGHT: f32 = 0.55;
const SPIKE_SHARPNESS: f32 = 2.6;
const PULSE_BASE: f32 = 0.08;
const PULSE_DEPTH_SCALE: f32 = 0.25;
const PULSE_RATE: f32 = 2.1;
const SURFACE_AMP: f32 = 0.18;
const SURFACE_FALLOFF: f32 = 9.0;

/// Grazing rays have no well-defined silhouette projection; this distance
/// pushes them far outside the glow instead of dividing by zero.
const FAR_SENTINEL: f32 = 1.0e4;
const GRAZE_EPS: f32 = 1.0e-4;

pub struct Inputs<C0> {
    pub resolution: Vec2,
    pub top_left: Vec2,
    pub time: f32,
    pub background: Vec3,
    pub alpha: f32,
    pub halo_strength: f32,
    pub pulse_depth: f32,
    pub channel0: C0,
}

impl<C0: Channel> Inputs<C0> {
    pub fn new(uniforms: &HaloUniforms, channel0: C0) -> Self {
        Inputs {
            resolution: Vec2::from_array(uniforms.resolution),
            top_left: Vec2::from_array(uniforms.top_left),
            time: uniforms.time,
            background: vec3(uniforms.bg_r, uniforms.bg_g, uniforms.bg_b),
            alpha: uniforms.alpha,
            halo_strength: uniforms.halo_strength,
            pulse_depth: uniforms.pulse_depth,
            channel0,
        }
    }

    pub fn main_image(&self, frag_color: &mut Vec4, frag_coord: Vec2) {
        let uv: Vec2 = frag_coord - self.top_left;
        let mut p: Vec2 = (2.0 * uv - self.resolution) / self.resolution.y;
        p.y = -p.y;
        let rd: Vec3 = vec3(p.x, p.y, FOCAL).normalize();

        let rgb: Vec3 = match sphere_roots(CAMERA, rd) {
            Some((near, far)) => {
                let t: f32 = if near > 0.0 { near } else { far };
                if t > 0.0 {
                    self.shade_surface(CAMERA + t * rd)
                } else {
                    // sphere entirely behind the ray
                    self.background
                }
            }
            None => self.shade_halo(rd),
        };

        *frag_color = rgb.clamp(Vec3::ZERO, Vec3::ONE).extend(self.alpha);
    }

    fn shade_surface(&self, hit: Vec3) -> Vec3 {
        let spun: Vec3 = rotate_axis(hit, SPIN_AXIS, SPIN_RATE * self.time);
        let tex: Vec3 = self.channel0.sample(equirect_uv(spun)).truncate();

        (tex - Vec3::splat(0.5)) * CONTRAST + Vec3::splat(0.5 + BRIGHTNESS)
    }

    fn shade_halo(&self, rd: Vec3) -> Vec3 {
        let ring_dist: f32 = silhouette_distance(rd);
        let phi: f32 = if rd.z > GRAZE_EPS {
            let plane: Vec2 = rd.truncate() * (FOCAL / rd.z);
            plane.x.atan2(plane.y)
        } else {
            0.0
        };

        let spikes: f32 = angular_pattern(phi);
        let base: f32 = (-(ring_dist / BASE_GLOW_WIDTH).powi(2)).exp();
        let narrow: f32 = (-(ring_dist / SPIKE_GLOW_WIDTH).powi(2)).exp();
        let pulse: f32 = 1.0
            + (PULSE_BASE + PULSE_DEPTH_SCALE * self.pulse_depth) * (PULSE_RATE * self.time).sin();
        let glow: f32 =
            (BASE_GLOW_AMP * base + SPIKE_GLOW_AMP * narrow * spikes) * pulse * self.halo_strength;
        let surface: f32 = SURFACE_AMP / (1.0 + SURFACE_FALLOFF * ring_dist.max(0.0));

        self.background + HALO_TINT * (glow + surface)
    }
}

// Quadratic ray/sphere roots via the closest-approach parameter; None when
// the perpendicular distance exceeds the radius.
fn sphere_roots(ro: Vec3, rd: Vec3) -> Option<(f32, f32)> {
    let b: f32 = ro.dot(rd);
    let c: f32 = ro.dot(ro) - RADIUS * RADIUS;
    let h: f32 = b * b - c;
    if h < 0.0 {
        return None;
    }
    let h = h.sqrt();

    Some((-b - h, -b + h))
}

// Rodrigues' rotation of v about the unit axis k.
fn rotate_axis(v: Vec3, k: Vec3, angle: f32) -> Vec3 {
    let (s, c) = angle.sin_cos();

    v * c + k.cross(v) * s + k * (k.dot(v) * (1.0 - c))
}

// Longitude/latitude mapping with u = 0.5 at the point facing the camera.
fn equirect_uv(p: Vec3) -> Vec2 {
    let n: Vec3 = p.normalize_or_zero();
    let u: f32 = 0.5 + n.x.atan2(-n.z) / TAU;
    let v: f32 = n.y.clamp(-1.0, 1.0).acos() / PI;

    vec2(u, v)
}

// Radius of the silhouette ring projected onto the image plane, from the
// tangent-line half-angle subtended by the sphere.
fn silhouette_radius() -> f32 {
    FOCAL * RADIUS / (CAMERA.length_squared() - RADIUS * RADIUS).sqrt()
}

// Signed distance on the image plane from the ray's plane point to the
// silhouette ring; zero exactly on the silhouette.
fn silhouette_distance(rd: Vec3) -> f32 {
    if rd.z <= GRAZE_EPS {
        return FAR_SENTINEL;
    }
    let plane: Vec2 = rd.truncate() * (FOCAL / rd.z);

    plane.length() - silhouette_radius()
}

// Four primary spikes on the cardinals plus four lighter secondaries on the
// diagonals. phi is 0 at "up" and grows clockwise.
fn angular_pattern(phi: f32) -> f32 {
    let mut sum: f32 = 0.0;
    let mut i = 0;
    while i < 4 {
        let center: f32 = i as f32 * FRAC_PI_2;
        sum += spike(phi, center, PRIMARY_HALF_WIDTH);
        sum += SECONDARY_WEIGHT * spike(phi, center + FRAC_PI_4, SECONDARY_HALF_WIDTH);
        i += 1;
    }

    sum
}

// Triangular pulse of the given angular half-width, sharpened, wrapping via
// the shortest angular distance into [-pi, pi].
fn spike(phi: f32, center: f32, half_width: f32) -> f32 {
    let mut d: f32 = (phi - center).rem_euclid(TAU);
    if d > PI {
        d -= TAU;
    }
    let t: f32 = (1.0 - d.abs() / half_width).max(0.0);

    t.powf(SPIKE_SHARPNESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ConstantColor;
    use glam::vec4;
    use shared::HaloUniforms;

    fn test_uniforms() -> HaloUniforms {
        HaloUniforms {
            resolution: [800.0, 600.0],
            top_left: [0.0, 0.0],
            time: 0.0,
            bg_r: 0.0,
            bg_g: 0.0,
            bg_b: 0.0,
            alpha: 1.0,
            halo_strength: 1.0,
            pulse_depth: 0.5,
        }
    }

    fn grey_channel() -> ConstantColor {
        ConstantColor {
            color: vec4(0.5, 0.5, 0.5, 1.0),
        }
    }

    #[test]
    fn center_pixel_hits_the_sphere_head_on() {
        let inputs = Inputs::new(&test_uniforms(), grey_channel());
        let mut color = Vec4::ZERO;
        inputs.main_image(&mut color, vec2(400.0, 300.0));

        // Mid-grey through the contrast/brightness adjustment, not background.
        let expected = 0.5 + BRIGHTNESS;
        assert!((color.x - expected).abs() < 1e-6);
        assert!((color.y - expected).abs() < 1e-6);
        assert!((color.z - expected).abs() < 1e-6);
        assert_eq!(color.w, 1.0);
    }

    #[test]
    fn center_hit_samples_the_texture_center_before_spinning() {
        // The ray through the image center hits the sphere at (0, 0, -1).
        let uv = equirect_uv(vec3(0.0, 0.0, -1.0));
        assert!((uv.x - 0.5).abs() < 1e-6);
        assert!((uv.y - 0.5).abs() < 1e-6);
    }

    #[test]
    fn zero_angle_spin_is_the_identity() {
        let v = vec3(0.3, -0.8, 0.52);
        assert_eq!(rotate_axis(v, SPIN_AXIS, 0.0), v);
    }

    #[test]
    fn spin_preserves_length() {
        let v = vec3(0.3, -0.8, 0.52);
        let spun = rotate_axis(v, SPIN_AXIS, 1.234);
        assert!((spun.length() - v.length()).abs() < 1e-5);
    }

    #[test]
    fn ring_distance_vanishes_on_the_silhouette() {
        let rd = vec3(silhouette_radius(), 0.0, FOCAL).normalize();
        let ring = silhouette_distance(rd);
        assert!(ring.abs() < 1e-4);

        let base = (-(ring / BASE_GLOW_WIDTH).powi(2)).exp();
        assert!((base - 1.0).abs() < 1e-6);
    }

    #[test]
    fn grazing_rays_fall_back_to_the_sentinel() {
        let rd = vec3(1.0, 0.0, 1.0e-7).normalize();
        assert!(silhouette_distance(rd) >= FAR_SENTINEL);

        let inputs = Inputs::new(&test_uniforms(), grey_channel());
        let halo = inputs.shade_halo(rd);
        assert!(halo.is_finite());
        assert!(halo.max_element() < 1e-4);
    }

    #[test]
    fn sphere_behind_the_ray_yields_no_positive_root() {
        // Looking straight away from the sphere.
        let (near, far) = sphere_roots(vec3(0.0, 0.0, 3.4), vec3(0.0, 0.0, 1.0)).unwrap();
        assert!(near <= 0.0 && far <= 0.0);
    }

    #[test]
    fn far_corner_stays_close_to_the_background() {
        let inputs = Inputs::new(&test_uniforms(), grey_channel());
        let mut color = Vec4::ZERO;
        inputs.main_image(&mut color, vec2(0.0, 0.0));
        assert!(color.truncate().max_element() < 0.05);
    }

    #[test]
    fn spikes_peak_on_their_centers_and_wrap() {
        assert!((spike(0.0, 0.0, PRIMARY_HALF_WIDTH) - 1.0).abs() < 1e-6);
        // Just across the -pi/pi wrap from a spike centered at pi.
        let wrapped = spike(-PI + 0.05, PI, PRIMARY_HALF_WIDTH);
        assert!(wrapped > 0.5);
        // Midway between cardinals the primaries are silent.
        assert_eq!(spike(FRAC_PI_4, 0.0, PRIMARY_HALF_WIDTH), 0.0);
    }

    #[test]
    fn output_is_bit_identical_across_evaluations() {
        let inputs = Inputs::new(
            &HaloUniforms {
                time: 3.75,
                ..test_uniforms()
            },
            grey_channel(),
        );
        for frag in [vec2(17.0, 401.5), vec2(400.0, 300.0), vec2(655.25, 32.0)] {
            let mut a = Vec4::ZERO;
            let mut b = Vec4::ZERO;
            inputs.main_image(&mut a, frag);
            inputs.main_image(&mut b, frag);
            assert_eq!(a.to_array().map(f32::to_bits), b.to_array().map(f32::to_bits));
        }
    }
}
