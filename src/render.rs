//! CPU reference renderer: evaluates a kernel once per pixel and writes PNGs.

use anyhow::{Context, Result};
use glam::{vec2, Vec2, Vec4};
use glimmer_shaders::{blob_fs, halo_fs, SolarSurface};
use image::RgbaImage;
use rayon::prelude::*;
use shared::{BlobUniforms, HaloUniforms};

use crate::config::{KernelKind, RenderFrameConfig};
use crate::texture::EquirectImage;

/// Renders the configured frame (or frame sequence) and writes one PNG per
/// frame. Returns the number of images written.
pub fn render_frames(config: &RenderFrameConfig) -> Result<u32> {
    let channel = match &config.texture_path {
        Some(path) => Some(
            EquirectImage::open(path).with_context(|| format!("failed to load texture {path}"))?,
        ),
        None => None,
    };

    for frame_index in 0..config.frame_count {
        let time = config.time + frame_index as f32 * config.frame_time_ms as f32 / 1000.0;
        let pixels = render_pixels(config, time, channel.as_ref());
        let image = to_image(config.width, config.height, &pixels);
        let path = frame_output_path(&config.output_path, config.frame_count, frame_index);
        image
            .save(&path)
            .with_context(|| format!("failed to write {path}"))?;
    }

    Ok(config.frame_count)
}

/// One kernel evaluation per pixel center, scanline-parallel. Every pixel is
/// independent, so the split is purely a throughput concern.
pub fn render_pixels(
    config: &RenderFrameConfig,
    time: f32,
    channel: Option<&EquirectImage>,
) -> Vec<Vec4> {
    let width = config.width as usize;
    let height = config.height as usize;
    let mut buffer = vec![Vec4::ZERO; width * height];

    buffer
        .par_chunks_mut(width)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, slot) in row.iter_mut().enumerate() {
                let frag_coord = vec2(
                    config.top_left[0] + x as f32 + 0.5,
                    config.top_left[1] + y as f32 + 0.5,
                );
                *slot = shade(config, time, channel, frag_coord);
            }
        });

    buffer
}

fn shade(
    config: &RenderFrameConfig,
    time: f32,
    channel: Option<&EquirectImage>,
    frag_coord: Vec2,
) -> Vec4 {
    match config.kernel {
        KernelKind::Halo => {
            let uniforms = halo_uniforms(config, time);
            match channel {
                Some(image) => halo_fs(&uniforms, image, frag_coord),
                None => halo_fs(&uniforms, SolarSurface { intensity: 1.0 }, frag_coord),
            }
        }
        KernelKind::Blob => blob_fs(&blob_uniforms(config, time), frag_coord),
    }
}

fn halo_uniforms(config: &RenderFrameConfig, time: f32) -> HaloUniforms {
    HaloUniforms {
        resolution: [config.width as f32, config.height as f32],
        top_left: config.top_left,
        time,
        bg_r: config.background[0],
        bg_g: config.background[1],
        bg_b: config.background[2],
        alpha: config.alpha,
        halo_strength: config.halo_strength,
        pulse_depth: config.pulse_depth,
    }
}

fn blob_uniforms(config: &RenderFrameConfig, time: f32) -> BlobUniforms {
    BlobUniforms {
        resolution: [config.width as f32, config.height as f32],
        top_left: config.top_left,
        time,
        bg_r: config.background[0],
        bg_g: config.background[1],
        bg_b: config.background[2],
        alpha: config.alpha,
        _pad: 0.0,
    }
}

fn to_image(width: u32, height: u32, pixels: &[Vec4]) -> RgbaImage {
    let mut image = RgbaImage::new(width, height);
    for (slot, pixel) in image.pixels_mut().zip(pixels) {
        let c = pixel.clamp(Vec4::ZERO, Vec4::ONE);
        *slot = image::Rgba([
            (c.x * 255.999) as u8,
            (c.y * 255.999) as u8,
            (c.z * 255.999) as u8,
            (c.w * 255.999) as u8,
        ]);
    }

    image
}

fn frame_output_path(base: &str, frame_count: u32, index: u32) -> String {
    if frame_count == 1 {
        return base.to_string();
    }
    match base.rsplit_once('.') {
        Some((stem, ext)) => format!("{stem}_{index:04}.{ext}"),
        None => format!("{base}_{index:04}"),
    }
}
