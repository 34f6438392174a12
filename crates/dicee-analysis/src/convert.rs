//! NDJSON to Parquet conversion.
//!
//! Converted files keep the loaders' flattened column layout, so a Parquet
//! file read back with [`load_parquet`] is interchangeable with a DataFrame
//! loaded directly from NDJSON.

use std::{
    collections::BTreeMap,
    fs::{self, File},
    io,
    path::{Path, PathBuf},
};

use polars::prelude::*;

use crate::loader::{self, LoadError, LoadOptions};

/// Parquet compression codec selection.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    derive_more::Display,
    derive_more::FromStr,
)]
pub enum Compression {
    #[default]
    #[display("zstd")]
    Zstd,
    #[display("snappy")]
    Snappy,
    #[display("gzip")]
    Gzip,
    #[display("lz4")]
    Lz4,
    #[display("uncompressed")]
    Uncompressed,
}

impl Compression {
    fn to_parquet(self) -> ParquetCompression {
        match self {
            Self::Zstd => ParquetCompression::Zstd(None),
            Self::Snappy => ParquetCompression::Snappy,
            Self::Gzip => ParquetCompression::Gzip(None),
            Self::Lz4 => ParquetCompression::Lz4Raw,
            Self::Uncompressed => ParquetCompression::Uncompressed,
        }
    }
}

/// The three record streams the simulator emits.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    derive_more::Display,
)]
pub enum RecordKind {
    #[display("games")]
    Games,
    #[display("turns")]
    Turns,
    #[display("decisions")]
    Decisions,
}

impl RecordKind {
    pub const ALL: [Self; 3] = [Self::Games, Self::Turns, Self::Decisions];

    /// Conventional input file name for this stream.
    #[must_use]
    pub fn ndjson_name(self) -> &'static str {
        match self {
            Self::Games => "games.ndjson",
            Self::Turns => "turns.ndjson",
            Self::Decisions => "decisions.ndjson",
        }
    }

    /// Conventional output file name for this stream.
    #[must_use]
    pub fn parquet_name(self) -> &'static str {
        match self {
            Self::Games => "games.parquet",
            Self::Turns => "turns.parquet",
            Self::Decisions => "decisions.parquet",
        }
    }
}

/// Failure during Parquet conversion.
#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum ConvertError {
    #[display("{_0}")]
    Load(LoadError),
    #[display("cannot write {}: {source}", path.display())]
    #[from(skip)]
    Io { path: PathBuf, source: io::Error },
    #[display("{_0}")]
    Frame(polars::error::PolarsError),
}

fn write_parquet(
    mut frame: DataFrame,
    output: &Path,
    compression: Compression,
) -> Result<usize, ConvertError> {
    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent).map_err(|source| ConvertError::Io {
            path: output.to_path_buf(),
            source,
        })?;
    }
    let file = File::create(output).map_err(|source| ConvertError::Io {
        path: output.to_path_buf(),
        source,
    })?;
    ParquetWriter::new(file)
        .with_compression(compression.to_parquet())
        .finish(&mut frame)?;
    Ok(frame.height())
}

/// Converts a games NDJSON file to Parquet; returns the row count.
pub fn games_to_parquet(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    compression: Compression,
    options: &LoadOptions,
) -> Result<usize, ConvertError> {
    let frame = loader::load_games(input, options)?;
    write_parquet(frame, output.as_ref(), compression)
}

/// Converts a turns NDJSON file to Parquet; returns the row count.
pub fn turns_to_parquet(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    compression: Compression,
    options: &LoadOptions,
) -> Result<usize, ConvertError> {
    let frame = loader::load_turns(input, options)?;
    write_parquet(frame, output.as_ref(), compression)
}

/// Converts a decisions NDJSON file to Parquet; returns the row count.
pub fn decisions_to_parquet(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    compression: Compression,
    options: &LoadOptions,
) -> Result<usize, ConvertError> {
    let frame = loader::load_decisions(input, options)?;
    write_parquet(frame, output.as_ref(), compression)
}

/// Converts every recognized NDJSON file found in `input_dir`.
///
/// Probes for `games.ndjson`, `turns.ndjson`, and `decisions.ndjson`;
/// absent files are skipped silently. Returns the output path per converted
/// stream. An empty map means nothing recognizable was found; deciding
/// whether that is an error is the caller's business.
pub fn convert_dir(
    input_dir: impl AsRef<Path>,
    output_dir: impl AsRef<Path>,
    compression: Compression,
    options: &LoadOptions,
) -> Result<BTreeMap<RecordKind, PathBuf>, ConvertError> {
    let input_dir = input_dir.as_ref();
    let output_dir = output_dir.as_ref();

    let mut converted = BTreeMap::new();
    for kind in RecordKind::ALL {
        let input = input_dir.join(kind.ndjson_name());
        if !input.is_file() {
            continue;
        }
        let output = output_dir.join(kind.parquet_name());
        let rows = match kind {
            RecordKind::Games => games_to_parquet(&input, &output, compression, options)?,
            RecordKind::Turns => turns_to_parquet(&input, &output, compression, options)?,
            RecordKind::Decisions => {
                decisions_to_parquet(&input, &output, compression, options)?
            }
        };
        log::info!("converted {} ({rows} rows) -> {}", kind, output.display());
        converted.insert(kind, output);
    }
    Ok(converted)
}

/// Reads a Parquet file back into a DataFrame.
pub fn load_parquet(path: impl AsRef<Path>) -> Result<DataFrame, ConvertError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| ConvertError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(ParquetReader::new(file).finish()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{game_line, write_ndjson};

    #[test]
    fn test_compression_parses_case_insensitively() {
        assert_eq!("zstd".parse::<Compression>().unwrap(), Compression::Zstd);
        assert_eq!("LZ4".parse::<Compression>().unwrap(), Compression::Lz4);
        assert_eq!(
            "uncompressed".parse::<Compression>().unwrap(),
            Compression::Uncompressed
        );
        assert!("brotli9000".parse::<Compression>().is_err());
    }

    #[test]
    fn test_ndjson_to_parquet_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_ndjson(
            dir.path(),
            "games.ndjson",
            &[
                game_line("g-1", "professor", 310, 18),
                game_line("g-2", "carmen", 280, 12),
            ],
        );
        let output = dir.path().join("out").join("games.parquet");
        let rows =
            games_to_parquet(&input, &output, Compression::Zstd, &LoadOptions::default())
                .unwrap();
        assert_eq!(rows, 2);

        let frame = load_parquet(&output).unwrap();
        assert_eq!(frame.height(), 2);
        let scores = frame.column("final_score").unwrap().i64().unwrap();
        assert_eq!(scores.get(0), Some(310));
        assert_eq!(scores.get(1), Some(280));
        let profiles = frame.column("profile_id").unwrap().str().unwrap();
        assert_eq!(profiles.get(1), Some("carmen"));
    }

    #[test]
    fn test_convert_dir_probes_known_names() {
        let dir = tempfile::tempdir().unwrap();
        write_ndjson(
            dir.path(),
            "games.ndjson",
            &[game_line("g-1", "riley", 250, 6)],
        );
        let out = dir.path().join("parquet");
        let converted =
            convert_dir(dir.path(), &out, Compression::default(), &LoadOptions::default())
                .unwrap();
        assert_eq!(converted.len(), 1);
        let games = &converted[&RecordKind::Games];
        assert!(games.ends_with("games.parquet"));
        assert!(games.is_file());
    }

    #[test]
    fn test_convert_dir_with_nothing_recognized_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("parquet");
        let converted =
            convert_dir(dir.path(), &out, Compression::default(), &LoadOptions::default())
                .unwrap();
        assert!(converted.is_empty());
    }
}
