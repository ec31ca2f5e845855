//! Frame configuration accepted on stdin or from a file argument.

use anyhow::ensure;
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KernelKind {
    Halo,
    Blob,
}

impl KernelKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Halo => "halo",
            Self::Blob => "blob",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderFrameConfig {
    pub width: u32,
    pub height: u32,
    pub kernel: KernelKind,
    pub output_path: String,
    #[serde(default)]
    pub time: f32,
    #[serde(default)]
    pub background: [f32; 3],
    #[serde(default = "default_alpha")]
    pub alpha: f32,
    #[serde(default)]
    pub top_left: [f32; 2],
    #[serde(default = "default_halo_strength")]
    pub halo_strength: f32,
    #[serde(default = "default_pulse_depth")]
    pub pulse_depth: f32,
    /// Optional equirectangular image for the halo kernel; the procedural
    /// surface pattern is used when absent.
    #[serde(default)]
    pub texture_path: Option<String>,
    #[serde(default = "default_frame_count")]
    pub frame_count: u32,
    #[serde(default = "default_frame_time_ms")]
    pub frame_time_ms: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderBatchConfig {
    pub frames: Vec<RenderFrameConfig>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum IncomingConfig {
    Single(RenderFrameConfig),
    Batch(RenderBatchConfig),
}

const fn default_alpha() -> f32 {
    1.0
}

const fn default_halo_strength() -> f32 {
    1.0
}

const fn default_pulse_depth() -> f32 {
    0.5
}

const fn default_frame_count() -> u32 {
    1
}

// Matches the 33 ms redraw cadence of the windowed hosts these backdrops
// were written for.
const fn default_frame_time_ms() -> u32 {
    33
}

pub fn validate_config(config: &RenderFrameConfig) -> anyhow::Result<()> {
    ensure!(
        config.width > 0 && config.height > 0,
        "width and height must be positive"
    );
    ensure!(
        (0.0..=1.0).contains(&config.alpha),
        "alpha must lie within [0, 1]"
    );
    ensure!(
        config.background.iter().all(|c| c.is_finite()),
        "background components must be finite"
    );
    ensure!(
        config.time.is_finite() && config.time >= 0.0,
        "time must be finite and non-negative"
    );
    ensure!(
        config.top_left.iter().all(|c| c.is_finite()),
        "topLeft components must be finite"
    );
    ensure!(
        config.halo_strength.is_finite() && config.pulse_depth.is_finite(),
        "halo parameters must be finite"
    );
    ensure!(config.frame_count > 0, "frameCount must be at least 1");
    ensure!(config.frame_time_ms > 0, "frameTimeMs must be at least 1");
    ensure!(
        !config.output_path.trim().is_empty(),
        "outputPath must not be empty"
    );
    if config.texture_path.is_some() {
        ensure!(
            config.kernel == KernelKind::Halo,
            "texturePath only applies to the halo kernel"
        );
    }

    Ok(())
}
