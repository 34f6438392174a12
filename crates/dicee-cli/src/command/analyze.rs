use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context as _, bail};
use dicee_analysis::{
    LoadOptions, TestMethod, calculate_bonus_rates, calculate_win_rates, compare_profiles,
    describe_scores, describe_scores_by_profile, load_games, load_parquet,
};
use dicee_schema::ProfileId;
use dicee_stats::descriptive::ScoreStats;
use dicee_viz::{
    plot_bonus_rates, plot_category_heatmap, plot_profile_comparison, plot_score_boxplot,
    plot_score_distribution, plot_win_rates,
};
use polars::prelude::DataFrame;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct AnalyzeArg {
    /// A games.ndjson or games.parquet file
    input: PathBuf,
    /// Analyze only the first N games (rows for Parquet input)
    #[arg(short = 'n', long)]
    limit: Option<usize>,
    /// Break statistics down by profile
    #[arg(long)]
    by_profile: bool,
    /// Compare two profiles with Welch's t-test
    #[arg(long, num_args = 2, value_names = ["PROFILE1", "PROFILE2"])]
    compare: Option<Vec<String>>,
    /// Significance level for comparisons
    #[arg(long, default_value_t = 0.05)]
    alpha: f64,
    /// Render chart presets into this directory
    #[arg(long)]
    plots: Option<PathBuf>,
}

pub(crate) fn run(arg: &AnalyzeArg) -> anyhow::Result<()> {
    if !arg.input.is_file() {
        bail!("input file {} does not exist", arg.input.display());
    }
    let frame = load_frame(&arg.input, arg.limit)?;
    let games = frame
        .column("game_id")?
        .as_materialized_series()
        .n_unique()?;
    println!("Loaded {games} games ({} player rows)", frame.height());

    println!();
    println!("=== SCORE STATISTICS ===");
    print_stats("all profiles", &describe_scores(&frame, "final_score")?);
    if arg.by_profile {
        for (profile, stats) in describe_scores_by_profile(&frame, "final_score")? {
            print_stats(&profile, &stats);
        }
    }

    println!();
    println!("=== WIN RATES ===");
    for rate in calculate_win_rates(&frame)? {
        println!(
            "  {:<12} {:>5.1}%  ({}/{} games)",
            rate.profile_id,
            rate.win_rate * 100.0,
            rate.wins,
            rate.games
        );
    }

    if let Some(pair) = &arg.compare {
        let profile1 = resolve_profile(&pair[0])?;
        let profile2 = resolve_profile(&pair[1])?;
        let result = compare_profiles(&frame, profile1, profile2, arg.alpha, TestMethod::Welch)?;
        println!();
        println!("=== PROFILE COMPARISON ===");
        println!("{} (alpha={})", result.test_name, arg.alpha);
        println!("  t = {:.4}, p = {:.4}", result.statistic, result.p_value);
        println!(
            "  effect size {:.3} ({})",
            result.effect_size, result.effect_interpretation
        );
        println!("  {}", result.conclusion);
    }

    if let Some(dir) = &arg.plots {
        fs::create_dir_all(dir)
            .with_context(|| format!("creating plot directory {}", dir.display()))?;
        plot_score_distribution(&frame, dir.join("score_distribution.svg"), true)?;
        plot_score_boxplot(&frame, dir.join("score_boxplot.svg"))?;
        plot_category_heatmap(&frame, dir.join("category_heatmap.svg"), None)?;
        plot_win_rates(&calculate_win_rates(&frame)?, dir.join("win_rates.svg"))?;
        plot_bonus_rates(&calculate_bonus_rates(&frame)?, dir.join("bonus_rates.svg"))?;
        plot_profile_comparison(&frame, dir.join("profile_comparison.svg"))?;
        println!();
        println!("charts written to {}", dir.display());
    }
    Ok(())
}

fn load_frame(path: &Path, limit: Option<usize>) -> anyhow::Result<DataFrame> {
    let frame = if path.extension().is_some_and(|ext| ext == "parquet") {
        let frame = load_parquet(path)?;
        match limit {
            Some(n) => frame.head(Some(n)),
            None => frame,
        }
    } else {
        load_games(
            path,
            &LoadOptions {
                limit,
                progress: false,
            },
        )?
    };
    Ok(frame)
}

fn resolve_profile(name: &str) -> anyhow::Result<ProfileId> {
    name.parse()
        .with_context(|| format!("unknown profile `{name}`"))
}

fn print_stats(label: &str, stats: &ScoreStats) {
    println!();
    println!("{label} (n={})", stats.n);
    println!(
        "  mean   {:>8.2}  (95% CI {:.2}..{:.2})",
        stats.mean, stats.ci95_lower, stats.ci95_upper
    );
    println!(
        "  median {:>8.2}  (IQR {:.2}..{:.2})",
        stats.median, stats.q1, stats.q3
    );
    println!("  stddev {:>8.2}", stats.std_dev);
    println!("  range  {:>8.2}..{:.2}", stats.min, stats.max);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_profile() {
        assert_eq!(resolve_profile("professor").unwrap(), ProfileId::Professor);
        assert_eq!(resolve_profile("Carmen").unwrap(), ProfileId::Carmen);
        let err = resolve_profile("optimus").unwrap_err();
        assert!(err.to_string().contains("unknown profile `optimus`"));
    }
}
