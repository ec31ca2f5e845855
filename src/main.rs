use std::fs;
use std::io::{self, Read};
use std::time::Instant;

use anyhow::{Context, Result};
use log::info;

mod config;
mod render;
mod texture;

use config::{validate_config, IncomingConfig};

fn main() -> Result<()> {
    env_logger::init();

    let raw = match std::env::args().nth(1) {
        Some(path) => fs::read_to_string(&path)
            .with_context(|| format!("failed to read config file {path}"))?,
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read config from stdin")?;
            buf
        }
    };

    let incoming: IncomingConfig =
        serde_json::from_str(&raw).context("config is not valid JSON")?;
    let frames = match incoming {
        IncomingConfig::Single(frame) => vec![frame],
        IncomingConfig::Batch(batch) => batch.frames,
    };
    anyhow::ensure!(!frames.is_empty(), "frames array must not be empty");

    for frame in &frames {
        validate_config(frame)?;
    }

    let total = frames.len();
    for (index, frame) in frames.iter().enumerate() {
        let started = Instant::now();
        let written = render::render_frames(frame)?;
        info!(
            "[{}/{}] rendered {} {} frame(s) in {} ms: {}",
            index + 1,
            total,
            written,
            frame.kernel.as_str(),
            started.elapsed().as_millis(),
            frame.output_path
        );
    }

    Ok(())
}
