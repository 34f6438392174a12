//! Chart presets for Dicee simulation results.
//!
//! Renders SVG charts over the flattened games DataFrame produced by
//! `dicee-analysis`: score histograms and box plots, category heatmaps,
//! win/bonus rate bars, and mean-with-CI profile comparisons. All presets
//! share one fixed profile color palette.

use plotters::drawing::DrawingAreaErrorKind;

pub mod charts;
pub mod palette;

pub use self::{
    charts::{
        plot_bonus_rates, plot_category_heatmap, plot_profile_comparison,
        plot_score_boxplot, plot_score_distribution, plot_win_rates,
    },
    palette::profile_color,
};

/// Failure to render a chart.
#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum PlotError {
    #[display("nothing to plot: {what}")]
    #[from(skip)]
    NoData { what: &'static str },
    #[display("{_0}")]
    Analysis(dicee_analysis::AnalysisError),
    #[display("{_0}")]
    Frame(polars::error::PolarsError),
    #[display("drawing failed: {message}")]
    #[from(skip)]
    Draw { message: String },
}

// DrawingAreaErrorKind is generic over the backend error, so derive_more's
// From cannot cover it.
impl<E: std::error::Error + Send + Sync> From<DrawingAreaErrorKind<E>> for PlotError {
    fn from(err: DrawingAreaErrorKind<E>) -> Self {
        Self::Draw {
            message: err.to_string(),
        }
    }
}
