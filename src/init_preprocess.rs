//! Run the preprocessing pipeline on an image file and save what the model
//! is about to see

use anyhow::{Context, Result};
use base64::{engine::general_purpose, Engine as _};
use std::{env, fs, process};
use symbolize::preprocess::{Preprocessor, Stage};
use symbolize::settings::Settings;
use symbolize::util::init_tracing;
use tracing::{debug, info};

const USAGE: &str = "usage: ./preprocess <image file> [output png]";

fn get_args() -> (String, String) {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 || args.len() > 3 {
        println!("{USAGE}");
        process::exit(1);
    }

    let input = args[1].clone();
    let output = args.get(2).cloned().unwrap_or_else(|| "image.png".into());
    (input, output)
}

fn main() -> Result<()> {
    let (input, output) = get_args();
    let settings = Settings::load(None)?;
    init_tracing(&settings.log.filter);

    let bytes = fs::read(&input).with_context(|| format!("failed to read {input}"))?;
    let raw = general_purpose::STANDARD.encode(bytes);

    let preprocessor = Preprocessor::new(settings.model.target_size);
    let mut stage = preprocessor.start(&raw)?;
    let tensor = loop {
        debug!("{input}: {}", stage.name());
        if let Stage::TonallyNormalized(bitmap) = &stage {
            bitmap
                .to_dynamic()
                .save(&output)
                .with_context(|| format!("failed to write {output}"))?;
            info!("wrote model view of {input} to {output}");
        }
        stage = match stage {
            Stage::Tensorized(tensor) => break tensor,
            other => preprocessor.advance(other)?,
        };
    };

    let (min, max) = tensor.value_range().unwrap_or_default();
    info!(
        "tensor shape {:?}, values in [{min:.3}, {max:.3}]",
        tensor.shape()
    );
    Ok(())
}
