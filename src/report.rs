//! Turns a `--plot` selection into ranked views and chart specs.

use clap::ValueEnum;
use tracing::info;

use crate::error::{FplError, Result};
use crate::history::{HistorySource, attach_history};
use crate::metrics::{
    RankedView, most_minutes_players, most_popular_players, price_swings, top_bonus_players,
    top_value_players,
};
use crate::normalize::PositionGroups;
use crate::player::{PlayerRecord, Position};

/// Players per side of the price swing chart.
pub const PRICE_SWING_SIDE: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportKind {
    #[value(name = "price_swing")]
    PriceSwing,
    #[value(name = "top_position")]
    TopPosition,
    #[value(name = "top_bonus")]
    TopBonus,
    #[value(name = "most_minutes")]
    MostMinutes,
    #[value(name = "popularity")]
    Popularity,
}

#[derive(Debug, Clone)]
pub struct ReportOptions {
    pub top_n: usize,
    pub min_pts: i64,
    /// Season label shown in chart titles, e.g. "2020/21".
    pub season: String,
    pub photo_url: String,
    pub parallelism: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    /// One column per player, in ranking order.
    Column,
    /// Players placed by (x, y).
    Scatter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Neutral,
    Positive,
    Negative,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlotPoint {
    pub label: String,
    pub x: f64,
    pub y: f64,
    pub annotations: Vec<String>,
    pub tone: Tone,
    pub photo_url: String,
}

/// Everything a renderer needs to draw one chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub filename: String,
    pub title: String,
    pub subtitle: String,
    pub footnote: String,
    pub kind: ChartKind,
    pub x_label: String,
    pub y_label: String,
    pub points: Vec<PlotPoint>,
}

/// Build the chart specs for one report. Only `popularity` touches `history`.
pub fn build_report<S: HistorySource>(
    kind: ReportKind,
    groups: &PositionGroups,
    participants: u64,
    history: &S,
    opts: &ReportOptions,
) -> Result<Vec<ChartSpec>> {
    let charts = match kind {
        ReportKind::PriceSwing => {
            let view = price_swings(&groups.all(), PRICE_SWING_SIDE);
            vec![price_swing_chart(&view, opts)]
        }
        ReportKind::TopPosition => Position::ALL
            .iter()
            .map(|&pos| value_chart(pos, &top_value_players(groups.group(pos), opts.top_n), opts))
            .collect(),
        ReportKind::TopBonus => {
            let view = top_bonus_players(&groups.all(), opts.top_n);
            vec![bonus_chart(&view, opts)]
        }
        ReportKind::MostMinutes => {
            let view = most_minutes_players(&groups.all(), opts.top_n);
            vec![minutes_chart(&view, opts)]
        }
        ReportKind::Popularity => {
            let with_history =
                attach_history(history, &groups.all(), participants, opts.parallelism)?;
            let view = most_popular_players(&with_history, opts.top_n);
            vec![popularity_chart(&view, opts)]
        }
    };

    for chart in &charts {
        if chart.points.is_empty() {
            return Err(FplError::EmptyResult {
                report: chart.filename.clone(),
            });
        }
    }
    info!(report = ?kind, charts = charts.len(), "report built");
    Ok(charts)
}

fn title(opts: &ReportOptions) -> String {
    format!("Fantasy Premier League {}", opts.season)
}

fn photo_url(opts: &ReportOptions, player: &PlayerRecord) -> String {
    format!(
        "{}/p{}.png",
        opts.photo_url.trim_end_matches('/'),
        player.photo_code()
    )
}

fn column_points(
    view: &RankedView,
    opts: &ReportOptions,
    annotate: impl Fn(&PlayerRecord) -> (Vec<String>, Tone),
) -> Vec<PlotPoint> {
    view.players
        .iter()
        .enumerate()
        .map(|(idx, player)| {
            let (annotations, tone) = annotate(player);
            PlotPoint {
                label: player.web_name.clone(),
                x: idx as f64,
                y: view.metric.value(player),
                annotations,
                tone,
                photo_url: photo_url(opts, player),
            }
        })
        .collect()
}

fn value_chart(position: Position, view: &RankedView, opts: &ReportOptions) -> ChartSpec {
    let (filename, heading) = match position {
        Position::Goalkeeper => ("best_value_gks", "Best Value Goalkeepers"),
        Position::Defender => ("best_value_def", "Best Value Defenders"),
        Position::Midfielder => ("best_value_mid", "Best Value Midfielders"),
        Position::Forward => ("best_value_fwds", "Best Value Forwards"),
    };
    ChartSpec {
        filename: filename.to_string(),
        title: title(opts),
        subtitle: format!("{heading} - Points Per Million*"),
        footnote: format!(
            "*average cost of player throughout season; min {} pts",
            opts.min_pts
        ),
        kind: ChartKind::Column,
        x_label: "Player".to_string(),
        y_label: view.metric.label().to_string(),
        points: column_points(view, opts, |p| {
            (
                vec![
                    format!("£{:.1}m", p.avg_cost),
                    format!("{}pts", p.total_points),
                ],
                Tone::Neutral,
            )
        }),
    }
}

fn bonus_chart(view: &RankedView, opts: &ReportOptions) -> ChartSpec {
    ChartSpec {
        filename: "most_bonus_pts".to_string(),
        title: title(opts),
        subtitle: "Most Bonus Points".to_string(),
        footnote: format!("*min {} total pts", opts.min_pts),
        kind: ChartKind::Column,
        x_label: "Player".to_string(),
        y_label: view.metric.label().to_string(),
        points: column_points(view, opts, |p| {
            (
                vec![
                    format!("{} bonus pts", p.bonus),
                    format!("{} total pts", p.total_points),
                ],
                Tone::Neutral,
            )
        }),
    }
}

fn minutes_chart(view: &RankedView, opts: &ReportOptions) -> ChartSpec {
    ChartSpec {
        filename: "most_minutes_played".to_string(),
        title: title(opts),
        subtitle: "Most Minutes Played".to_string(),
        footnote: format!("*min {} total pts", opts.min_pts),
        kind: ChartKind::Column,
        x_label: "Player".to_string(),
        y_label: view.metric.label().to_string(),
        points: column_points(view, opts, |p| {
            (
                vec![
                    format!("{} min", p.minutes),
                    format!("{} total pts", p.total_points),
                ],
                Tone::Neutral,
            )
        }),
    }
}

fn price_swing_chart(view: &RankedView, opts: &ReportOptions) -> ChartSpec {
    ChartSpec {
        filename: "price_swings".to_string(),
        title: title(opts),
        subtitle: "Biggest Price Swings".to_string(),
        footnote: format!("*min {} total pts", opts.min_pts),
        kind: ChartKind::Column,
        x_label: "Player".to_string(),
        y_label: view.metric.label().to_string(),
        points: column_points(view, opts, |p| {
            let tone = if p.cost_change_start > 0.0 {
                Tone::Positive
            } else {
                Tone::Negative
            };
            (
                vec![
                    format!("Started £{:.1}m", p.start_cost()),
                    format!("Ended £{:.1}m", p.now_cost),
                ],
                tone,
            )
        }),
    }
}

fn popularity_chart(view: &RankedView, opts: &ReportOptions) -> ChartSpec {
    let points = view
        .players
        .iter()
        .map(|p| PlotPoint {
            label: p.web_name.clone(),
            x: p.avg_points(),
            y: p.avg_ownership_pct(),
            annotations: vec![
                format!("{}% sel", p.avg_ownership_pct()),
                format!("{}pts/game", p.avg_points()),
            ],
            tone: Tone::Neutral,
            photo_url: photo_url(opts, p),
        })
        .collect();
    ChartSpec {
        filename: "popularity_vs_performance".to_string(),
        title: title(opts),
        subtitle: "Popularity vs Performance*".to_string(),
        footnote: format!(
            "*min {} total pts; average ownership and pts over entire season",
            opts.min_pts
        ),
        kind: ChartKind::Scatter,
        x_label: "Average points per gameweek".to_string(),
        y_label: view.metric.label().to_string(),
        points,
    }
}
