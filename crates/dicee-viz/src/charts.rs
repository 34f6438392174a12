//! Chart presets over the flattened games DataFrame.
//!
//! Every preset renders a 900x600 SVG file. Colors come from
//! [`palette`](crate::palette); per-profile charts always use the same
//! profile-to-color mapping so charts can be read side by side.

use std::path::Path;

use dicee_analysis::score_stats::{BonusRate, WinRate};
use dicee_schema::{Category, ProfileId};
use dicee_stats::descriptive::{mean, percentile};
use plotters::prelude::*;
use polars::prelude::*;

use crate::{PlotError, palette::profile_color};

const SIZE: (u32, u32) = (900, 600);
const BINS: usize = 30;

fn numeric_column(frame: &DataFrame, name: &str) -> Result<Vec<f64>, PlotError> {
    let column = frame.column(name)?.cast(&DataType::Float64)?;
    Ok(column.f64()?.into_iter().flatten().collect())
}

/// Distinct profile names present in the frame, sorted.
fn profile_names(frame: &DataFrame) -> Result<Vec<String>, PlotError> {
    let mut names: Vec<String> = frame
        .column("profile_id")?
        .str()?
        .into_iter()
        .flatten()
        .map(str::to_owned)
        .collect();
    names.sort();
    names.dedup();
    Ok(names)
}

fn profile_values(
    frame: &DataFrame,
    profile: &str,
    column: &str,
) -> Result<Vec<f64>, PlotError> {
    let mask = frame.column("profile_id")?.str()?.equal(profile);
    numeric_column(&frame.filter(&mask)?, column)
}

fn segment_label(value: &SegmentValue<i32>, labels: &[String]) -> String {
    let index = match value {
        SegmentValue::Exact(i) | SegmentValue::CenterOf(i) => *i,
        SegmentValue::Last => return String::new(),
    };
    usize::try_from(index)
        .ok()
        .and_then(|i| labels.get(i))
        .cloned()
        .unwrap_or_default()
}

#[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn bin_counts(values: &[f64], min: f64, width: f64) -> Vec<u32> {
    let mut counts = vec![0u32; BINS];
    for &value in values {
        let index = (((value - min) / width) as usize).min(BINS - 1);
        counts[index] += 1;
    }
    counts
}

/// Histogram of final scores, optionally split by profile.
///
/// With `by_profile` each profile gets a translucent series plus a vertical
/// line at its mean; without it a single neutral histogram is drawn.
#[expect(clippy::cast_precision_loss)]
pub fn plot_score_distribution(
    frame: &DataFrame,
    output: impl AsRef<Path>,
    by_profile: bool,
) -> Result<(), PlotError> {
    let scores = numeric_column(frame, "final_score")?;
    if scores.is_empty() {
        return Err(PlotError::NoData {
            what: "final_score",
        });
    }

    let min = scores.iter().copied().fold(f64::INFINITY, f64::min);
    let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let width = if max > min {
        (max - min) / BINS as f64
    } else {
        1.0
    };

    let series: Vec<(String, Vec<f64>)> = if by_profile {
        let mut series = Vec::new();
        for name in profile_names(frame)? {
            let values = profile_values(frame, &name, "final_score")?;
            series.push((name, values));
        }
        series
    } else {
        vec![("all".to_owned(), scores)]
    };

    let y_max = series
        .iter()
        .map(|(_, values)| bin_counts(values, min, width).into_iter().max().unwrap_or(0))
        .max()
        .unwrap_or(0)
        + 1;

    let root = SVGBackend::new(output.as_ref(), SIZE).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption("Final Score Distribution", ("sans-serif", 28))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(min..max + width, 0u32..y_max)?;
    chart
        .configure_mesh()
        .x_desc("Final score")
        .y_desc("Games")
        .draw()?;

    for (name, values) in &series {
        let color = if by_profile {
            profile_color(name)
        } else {
            crate::palette::NEUTRAL
        };
        let counts = bin_counts(values, min, width);
        chart
            .draw_series(
                counts
                    .iter()
                    .enumerate()
                    .filter(|&(_, &count)| count > 0)
                    .map(|(i, &count)| {
                        let x0 = min + width * i as f64;
                        Rectangle::new([(x0, 0), (x0 + width, count)], color.mix(0.5).filled())
                    }),
            )?
            .label(name.clone())
            .legend(move |(x, y)| {
                Rectangle::new([(x, y - 4), (x + 12, y + 4)], color.filled())
            });

        if by_profile {
            let profile_mean = mean(values);
            chart.draw_series(std::iter::once(PathElement::new(
                vec![(profile_mean, 0), (profile_mean, y_max)],
                color.stroke_width(2),
            )))?;
        }
    }

    if by_profile {
        chart
            .configure_series_labels()
            .border_style(BLACK)
            .background_style(WHITE.mix(0.8))
            .draw()?;
    }
    root.present()?;
    Ok(())
}

/// Per-profile box plots of final scores, ordered by descending median,
/// with a dot at each profile's mean.
#[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
pub fn plot_score_boxplot(
    frame: &DataFrame,
    output: impl AsRef<Path>,
) -> Result<(), PlotError> {
    let mut groups = Vec::new();
    for name in profile_names(frame)? {
        let mut values = profile_values(frame, &name, "final_score")?;
        if values.is_empty() {
            continue;
        }
        values.sort_by(f64::total_cmp);
        let median = percentile(&values, 50.0);
        groups.push((name, values, median));
    }
    if groups.is_empty() {
        return Err(PlotError::NoData {
            what: "final_score by profile",
        });
    }
    groups.sort_by(|a, b| b.2.total_cmp(&a.2).then_with(|| a.0.cmp(&b.0)));

    let labels: Vec<String> = groups.iter().map(|(name, ..)| name.clone()).collect();
    let y_max = groups
        .iter()
        .flat_map(|(_, values, _)| values.iter().copied())
        .fold(f64::NEG_INFINITY, f64::max) as f32
        * 1.05;
    let n = groups.len() as i32;

    let root = SVGBackend::new(output.as_ref(), SIZE).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption("Final Scores by Profile", ("sans-serif", 28))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d((0..n).into_segmented(), 0f32..y_max)?;
    chart
        .configure_mesh()
        .x_labels(groups.len())
        .x_label_formatter(&|value| segment_label(value, &labels))
        .y_desc("Final score")
        .draw()?;

    for (i, (name, values, _)) in groups.iter().enumerate() {
        let color = profile_color(name);
        let quartiles = Quartiles::new(values);
        chart.draw_series(std::iter::once(
            Boxplot::new_vertical(SegmentValue::CenterOf(i as i32), &quartiles)
                .style(color)
                .width(24),
        ))?;
        chart.draw_series(std::iter::once(Circle::new(
            (SegmentValue::CenterOf(i as i32), mean(values) as f32),
            4,
            BLACK.filled(),
        )))?;
    }
    root.present()?;
    Ok(())
}

#[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn heat_color(value: f64, max: f64) -> RGBColor {
    let t = (value / max).clamp(0.0, 1.0);
    let fade = (255.0 * (1.0 - t)) as u8;
    RGBColor(255, fade, fade)
}

/// Heatmap of mean category scores: one row per profile, one column per
/// scorecard category. `profile` restricts the chart to a single row.
#[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
pub fn plot_category_heatmap(
    frame: &DataFrame,
    output: impl AsRef<Path>,
    profile: Option<ProfileId>,
) -> Result<(), PlotError> {
    let names = match profile {
        Some(profile) => vec![profile.as_str().to_owned()],
        None => profile_names(frame)?,
    };
    if names.is_empty() {
        return Err(PlotError::NoData { what: "profiles" });
    }

    let mut grid: Vec<Vec<Option<f64>>> = Vec::with_capacity(names.len());
    for name in &names {
        let mask = frame.column("profile_id")?.str()?.equal(name.as_str());
        let subset = frame.filter(&mask)?;
        let mut row = Vec::with_capacity(Category::ALL.len());
        for category in Category::ALL {
            if subset.column(category.as_str()).is_err() {
                row.push(None);
                continue;
            }
            let values = numeric_column(&subset, category.as_str())?;
            row.push((!values.is_empty()).then(|| mean(&values)));
        }
        grid.push(row);
    }
    let max_mean = grid
        .iter()
        .flatten()
        .flatten()
        .copied()
        .fold(0.0, f64::max)
        .max(1.0);

    let categories = Category::ALL.len() as i32;
    let rows = names.len() as i32;
    let root = SVGBackend::new(output.as_ref(), SIZE).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption("Mean Score by Category", ("sans-serif", 28))
        .margin(10)
        .x_label_area_size(70)
        .y_label_area_size(80)
        .build_cartesian_2d(0..categories, 0..rows)?;
    chart
        .configure_mesh()
        .disable_x_mesh()
        .disable_y_mesh()
        .x_labels(Category::ALL.len())
        .x_label_formatter(&|x| {
            usize::try_from(*x)
                .ok()
                .and_then(|i| Category::ALL.get(i))
                .map(|c| c.as_str().to_owned())
                .unwrap_or_default()
        })
        .y_labels(names.len())
        .y_label_formatter(&|y| {
            usize::try_from(*y)
                .ok()
                .and_then(|i| names.get(i))
                .cloned()
                .unwrap_or_default()
        })
        .draw()?;

    for (y, row) in grid.iter().enumerate() {
        for (x, cell) in row.iter().enumerate() {
            let Some(value) = cell else { continue };
            chart.draw_series(std::iter::once(Rectangle::new(
                [(x as i32, y as i32), (x as i32 + 1, y as i32 + 1)],
                heat_color(*value, max_mean).filled(),
            )))?;
        }
    }
    root.present()?;
    Ok(())
}

#[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
fn plot_rate_bars(
    entries: &[(String, f64)],
    output: &Path,
    caption: &str,
    y_desc: &str,
    reference_line: Option<f64>,
) -> Result<(), PlotError> {
    if entries.is_empty() {
        return Err(PlotError::NoData { what: "profiles" });
    }
    let labels: Vec<String> = entries.iter().map(|(name, _)| name.clone()).collect();
    let n = entries.len() as i32;

    let root = SVGBackend::new(output, SIZE).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption(caption, ("sans-serif", 28))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d((0..n).into_segmented(), 0f64..1f64)?;
    chart
        .configure_mesh()
        .x_labels(entries.len())
        .x_label_formatter(&|value| segment_label(value, &labels))
        .y_desc(y_desc)
        .draw()?;

    for (i, (name, rate)) in entries.iter().enumerate() {
        let i = i as i32;
        chart.draw_series(std::iter::once(Rectangle::new(
            [
                (SegmentValue::Exact(i), 0.0),
                (SegmentValue::Exact(i + 1), *rate),
            ],
            profile_color(name).mix(0.8).filled(),
        )))?;
    }
    if let Some(level) = reference_line {
        chart.draw_series(std::iter::once(PathElement::new(
            vec![
                (SegmentValue::Exact(0), level),
                (SegmentValue::Exact(n), level),
            ],
            BLACK.mix(0.5).stroke_width(1),
        )))?;
    }
    root.present()?;
    Ok(())
}

/// Bar chart of per-profile win rates with a 50% reference line.
pub fn plot_win_rates(rates: &[WinRate], output: impl AsRef<Path>) -> Result<(), PlotError> {
    let entries: Vec<(String, f64)> = rates
        .iter()
        .map(|r| (r.profile_id.clone(), r.win_rate))
        .collect();
    plot_rate_bars(&entries, output.as_ref(), "Win Rate by Profile", "Win rate", Some(0.5))
}

/// Bar chart of per-profile upper-bonus rates.
pub fn plot_bonus_rates(
    rates: &[BonusRate],
    output: impl AsRef<Path>,
) -> Result<(), PlotError> {
    let entries: Vec<(String, f64)> = rates
        .iter()
        .map(|r| (r.profile_id.clone(), r.bonus_rate))
        .collect();
    plot_rate_bars(
        &entries,
        output.as_ref(),
        "Upper Bonus Rate by Profile",
        "Bonus rate",
        None,
    )
}

/// Mean final score with 95% confidence interval bars, one per profile.
#[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
pub fn plot_profile_comparison(
    frame: &DataFrame,
    output: impl AsRef<Path>,
) -> Result<(), PlotError> {
    let stats = dicee_analysis::describe_scores_by_profile(frame, "final_score")?;
    if stats.is_empty() {
        return Err(PlotError::NoData { what: "profiles" });
    }
    let labels: Vec<String> = stats.keys().cloned().collect();
    let n = stats.len() as i32;

    let y_min = stats
        .values()
        .map(|s| s.ci95_lower)
        .fold(f64::INFINITY, f64::min)
        * 0.95;
    let y_max = stats
        .values()
        .map(|s| s.ci95_upper)
        .fold(f64::NEG_INFINITY, f64::max)
        * 1.05;

    let root = SVGBackend::new(output.as_ref(), SIZE).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption("Mean Final Score (95% CI)", ("sans-serif", 28))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d((0..n).into_segmented(), y_min..y_max)?;
    chart
        .configure_mesh()
        .x_labels(stats.len())
        .x_label_formatter(&|value| segment_label(value, &labels))
        .y_desc("Final score")
        .draw()?;

    for (i, (name, s)) in stats.iter().enumerate() {
        chart.draw_series(std::iter::once(ErrorBar::new_vertical(
            SegmentValue::CenterOf(i as i32),
            s.ci95_lower,
            s.mean,
            s.ci95_upper,
            profile_color(name).stroke_width(2),
            12,
        )))?;
    }
    root.present()?;
    Ok(())
}
