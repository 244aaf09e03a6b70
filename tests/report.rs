mod common;

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use common::El;
use fpl_charts::fpl_api::GameweekEntry;
use fpl_charts::history::{HistorySource, attach_history};
use fpl_charts::normalize::{PositionGroups, normalize_players};
use fpl_charts::report::{ChartKind, ReportKind, ReportOptions, Tone, build_report};
use fpl_charts::season::SeasonTable;
use fpl_charts::{FplError, Result};

struct StubHistory {
    by_player: HashMap<u32, Vec<GameweekEntry>>,
    fail_for: Option<u32>,
    calls: AtomicUsize,
}

impl StubHistory {
    fn new() -> Self {
        Self {
            by_player: HashMap::new(),
            fail_for: None,
            calls: AtomicUsize::new(0),
        }
    }

    fn with(mut self, id: u32, rows: &[(i64, u64)]) -> Self {
        let entries = rows
            .iter()
            .map(|&(total_points, selected)| GameweekEntry {
                total_points,
                selected,
            })
            .collect();
        self.by_player.insert(id, entries);
        self
    }
}

impl HistorySource for StubHistory {
    fn player_history(&self, player_id: u32) -> Result<Vec<GameweekEntry>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_for == Some(player_id) {
            return Err(FplError::Network {
                url: format!("stub://{player_id}"),
                message: "http 503".to_string(),
            });
        }
        Ok(self.by_player.get(&player_id).cloned().unwrap_or_default())
    }
}

fn opts(top_n: usize) -> ReportOptions {
    ReportOptions {
        top_n,
        min_pts: 50,
        season: "2020/21".to_string(),
        photo_url: "https://img.example/players/".to_string(),
        parallelism: 4,
    }
}

fn groups() -> PositionGroups {
    let elements = [
        El {
            id: 1,
            web_name: "Martínez",
            element_type: 1,
            now_cost: 55,
            cost_change_start: 4,
            total_points: 186,
            bonus: 27,
            ..El::default()
        },
        El {
            id: 2,
            web_name: "Alexander-Arnold",
            element_type: 2,
            now_cost: 75,
            cost_change_start: -3,
            total_points: 160,
            bonus: 14,
            ..El::default()
        },
        El {
            id: 3,
            web_name: "Fernandes",
            element_type: 3,
            now_cost: 114,
            cost_change_start: 9,
            total_points: 244,
            bonus: 36,
            ..El::default()
        },
        El {
            id: 4,
            web_name: "Kane",
            element_type: 4,
            now_cost: 119,
            cost_change_start: 14,
            total_points: 242,
            bonus: 40,
            ..El::default()
        },
        El {
            id: 5,
            web_name: "Bench",
            element_type: 4,
            now_cost: 45,
            cost_change_start: -1,
            total_points: 20,
            bonus: 0,
            ..El::default()
        },
    ];
    let raw: Vec<_> = elements.iter().map(El::raw).collect();
    normalize_players(&raw, 50, SeasonTable::embedded()).unwrap()
}

#[test]
fn top_position_builds_one_chart_per_position() {
    let stub = StubHistory::new();
    let charts = build_report(ReportKind::TopPosition, &groups(), 100, &stub, &opts(10)).unwrap();
    let names: Vec<&str> = charts.iter().map(|c| c.filename.as_str()).collect();
    assert_eq!(
        names,
        vec!["best_value_gks", "best_value_def", "best_value_mid", "best_value_fwds"]
    );

    let gk = &charts[0];
    assert_eq!(gk.title, "Fantasy Premier League 2020/21");
    assert_eq!(gk.subtitle, "Best Value Goalkeepers - Points Per Million*");
    assert!(gk.footnote.contains("min 50 pts"));
    assert_eq!(gk.kind, ChartKind::Column);
    let point = &gk.points[0];
    assert_eq!(point.label, "Martínez");
    // 186 / 5.7
    assert_eq!(point.y, 32.63);
    assert_eq!(point.annotations, vec!["£5.7m".to_string(), "186pts".to_string()]);
    assert_eq!(point.photo_url, "https://img.example/players/p1001.png");

    assert_eq!(charts[1].points[0].label, "TAA");
}

#[test]
fn price_swing_marks_rises_and_falls() {
    let stub = StubHistory::new();
    let charts = build_report(ReportKind::PriceSwing, &groups(), 100, &stub, &opts(10)).unwrap();
    assert_eq!(charts.len(), 1);
    let chart = &charts[0];
    assert_eq!(chart.filename, "price_swings");
    // Four players on each side, fallers first.
    assert_eq!(chart.points.len(), 8);
    assert_eq!(chart.points[0].label, "TAA");
    assert_eq!(chart.points[0].tone, Tone::Negative);
    assert_eq!(
        chart.points[0].annotations,
        vec!["Started £7.8m".to_string(), "Ended £7.5m".to_string()]
    );
    let last = chart.points.last().unwrap();
    assert_eq!(last.label, "Kane");
    assert_eq!(last.tone, Tone::Positive);
}

#[test]
fn bonus_and_minutes_use_all_positions() {
    let stub = StubHistory::new();
    let bonus = build_report(ReportKind::TopBonus, &groups(), 100, &stub, &opts(2)).unwrap();
    let labels: Vec<&str> = bonus[0].points.iter().map(|p| p.label.as_str()).collect();
    assert_eq!(labels, vec!["Fernandes", "Kane"]);
    assert_eq!(bonus[0].points[1].annotations[0], "40 bonus pts");

    let minutes = build_report(ReportKind::MostMinutes, &groups(), 100, &stub, &opts(3)).unwrap();
    assert_eq!(minutes[0].filename, "most_minutes_played");
    assert_eq!(minutes[0].points.len(), 3);
    assert_eq!(stub.calls.load(Ordering::SeqCst), 0);
}

#[test]
fn popularity_fetches_history_and_ranks_by_ownership() {
    let stub = StubHistory::new()
        .with(1, &[(6, 100), (2, 300)])
        .with(2, &[(8, 500), (4, 500)])
        .with(3, &[(12, 900), (10, 700)])
        .with(4, &[(3, 50)]);
    let charts = build_report(ReportKind::Popularity, &groups(), 1_000, &stub, &opts(2)).unwrap();
    assert_eq!(stub.calls.load(Ordering::SeqCst), 4);

    let chart = &charts[0];
    assert_eq!(chart.kind, ChartKind::Scatter);
    let labels: Vec<&str> = chart.points.iter().map(|p| p.label.as_str()).collect();
    assert_eq!(labels, vec!["TAA", "Fernandes"]);
    let top = &chart.points[1];
    assert_eq!(top.x, 11.0);
    assert_eq!(top.y, 80.0);
    assert_eq!(top.annotations, vec!["80% sel".to_string(), "11pts/game".to_string()]);
}

#[test]
fn history_failure_aborts_popularity() {
    let mut stub = StubHistory::new().with(1, &[(1, 1)]);
    stub.fail_for = Some(3);
    let err = build_report(ReportKind::Popularity, &groups(), 1_000, &stub, &opts(5)).unwrap_err();
    assert!(matches!(err, FplError::Network { .. }));
}

#[test]
fn history_keeps_input_order_under_parallel_fetch() {
    let players: Vec<_> = (1..=40)
        .map(|id| {
            El {
                id,
                ..El::default()
            }
            .record()
        })
        .collect();
    let mut stub = StubHistory::new();
    for id in 1..=40u32 {
        stub = stub.with(id, &[(id as i64, 10)]);
    }
    let out = attach_history(&stub, &players, 100, 8).unwrap();
    let ids: Vec<u32> = out.iter().map(|p| p.id).collect();
    assert_eq!(ids, (1..=40).collect::<Vec<u32>>());
    assert!(out.iter().all(|p| p.avg_points() == p.id as f64));
}

#[test]
fn empty_selection_is_reported_not_rendered() {
    let raw = vec![
        El {
            id: 9,
            total_points: 10,
            ..El::default()
        }
        .raw(),
    ];
    let empty = normalize_players(&raw, 50, SeasonTable::embedded()).unwrap();
    assert!(empty.is_empty());
    let stub = StubHistory::new();
    let err = build_report(ReportKind::TopBonus, &empty, 100, &stub, &opts(10)).unwrap_err();
    assert!(matches!(err, FplError::EmptyResult { .. }));
}

#[test]
fn parses_plot_names() {
    use clap::ValueEnum;
    assert_eq!(ReportKind::from_str("price_swing", false), Ok(ReportKind::PriceSwing));
    assert_eq!(ReportKind::from_str("top_position", false), Ok(ReportKind::TopPosition));
    assert_eq!(ReportKind::from_str("popularity", false), Ok(ReportKind::Popularity));
    assert!(ReportKind::from_str("nonsense", false).is_err());
}
