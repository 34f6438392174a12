use std::path::PathBuf;

use anyhow::{Context as _, bail};
use dicee_analysis::{Compression, LoadOptions, convert_dir};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct ConvertArg {
    /// Directory containing games/turns/decisions NDJSON files
    input_dir: PathBuf,
    /// Output directory for Parquet files (default: INPUT_DIR/parquet)
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Parquet compression codec
    #[arg(long, default_value_t = Compression::Zstd)]
    compression: Compression,
    /// Hide the progress bar
    #[arg(long)]
    no_progress: bool,
}

pub(crate) fn run(arg: &ConvertArg) -> anyhow::Result<()> {
    if !arg.input_dir.is_dir() {
        bail!(
            "input directory {} does not exist",
            arg.input_dir.display()
        );
    }
    let output = arg
        .output
        .clone()
        .unwrap_or_else(|| arg.input_dir.join("parquet"));
    log::info!("writing Parquet files to {}", output.display());
    let options = LoadOptions {
        limit: None,
        progress: !arg.no_progress,
    };
    let converted = convert_dir(&arg.input_dir, &output, arg.compression, &options)
        .with_context(|| format!("converting {}", arg.input_dir.display()))?;
    if converted.is_empty() {
        bail!(
            "no games.ndjson, turns.ndjson, or decisions.ndjson found in {}",
            arg.input_dir.display()
        );
    }
    for (kind, path) in &converted {
        println!("{kind}: {}", path.display());
    }
    Ok(())
}
