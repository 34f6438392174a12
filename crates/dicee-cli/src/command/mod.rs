use clap::{Parser, Subcommand};

mod analyze;
mod convert;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Convert NDJSON result files to Parquet
    Convert(convert::ConvertArg),
    /// Compute statistics over game results
    Analyze(analyze::AnalyzeArg),
}

pub fn run() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = CommandArgs::parse();
    match args.mode {
        Mode::Convert(arg) => convert::run(&arg)?,
        Mode::Analyze(arg) => analyze::run(&arg)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory as _;

    use super::*;

    #[test]
    fn test_cli_definition() {
        CommandArgs::command().debug_assert();
    }

    #[test]
    fn test_compare_takes_two_profiles() {
        let args = CommandArgs::try_parse_from([
            "dicee",
            "analyze",
            "games.ndjson",
            "--compare",
            "professor",
            "carmen",
        ]);
        assert!(args.is_ok());

        let args = CommandArgs::try_parse_from([
            "dicee",
            "analyze",
            "games.ndjson",
            "--compare",
            "professor",
        ]);
        assert!(args.is_err());
    }
}
