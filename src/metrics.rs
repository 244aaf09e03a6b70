use crate::player::{PlayerRecord, round2};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    PointsPerMillion,
    Bonus,
    Minutes,
    CostChange,
    AvgOwnership,
}

impl Metric {
    pub fn value(self, player: &PlayerRecord) -> f64 {
        match self {
            Metric::PointsPerMillion => player.points_per_million.unwrap_or(0.0),
            Metric::Bonus => player.bonus as f64,
            Metric::Minutes => player.minutes as f64,
            Metric::CostChange => player.cost_change_start,
            Metric::AvgOwnership => player.avg_ownership_pct(),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Metric::PointsPerMillion => "Points per million",
            Metric::Bonus => "Bonus points",
            Metric::Minutes => "Minutes played",
            Metric::CostChange => "Price change (£m)",
            Metric::AvgOwnership => "Average ownership (%)",
        }
    }
}

/// Players in ascending order of `metric`.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedView {
    pub metric: Metric,
    pub players: Vec<PlayerRecord>,
}

impl RankedView {
    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn values(&self) -> Vec<f64> {
        self.players.iter().map(|p| self.metric.value(p)).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Take {
    Head,
    Tail,
}

fn ranked(players: Vec<PlayerRecord>, metric: Metric, n: usize, take: Take) -> RankedView {
    let mut players = players;
    players.sort_by(|a, b| metric.value(a).total_cmp(&metric.value(b)));
    match take {
        Take::Tail => {
            let skip = players.len().saturating_sub(n);
            players.drain(..skip);
        }
        Take::Head => players.truncate(n),
    }
    RankedView { metric, players }
}

/// `total_points / avg_cost`, rounded to two decimals.
pub fn points_per_million(player: &PlayerRecord) -> f64 {
    if player.avg_cost == 0.0 {
        return 0.0;
    }
    round2(player.total_points as f64 / player.avg_cost)
}

pub fn top_value_players(players: &[PlayerRecord], n: usize) -> RankedView {
    let valued = players
        .iter()
        .map(|p| PlayerRecord {
            points_per_million: Some(points_per_million(p)),
            ..p.clone()
        })
        .collect();
    ranked(valued, Metric::PointsPerMillion, n, Take::Tail)
}

pub fn top_bonus_players(players: &[PlayerRecord], n: usize) -> RankedView {
    ranked(players.to_vec(), Metric::Bonus, n, Take::Tail)
}

pub fn most_minutes_players(players: &[PlayerRecord], n: usize) -> RankedView {
    ranked(players.to_vec(), Metric::Minutes, n, Take::Tail)
}

pub fn positive_price_change_players(players: &[PlayerRecord], n: usize) -> RankedView {
    ranked(players.to_vec(), Metric::CostChange, n, Take::Tail)
}

/// The only ranking that keeps the head: the `n` biggest price drops.
pub fn negative_price_change_players(players: &[PlayerRecord], n: usize) -> RankedView {
    ranked(players.to_vec(), Metric::CostChange, n, Take::Head)
}

/// Biggest fallers followed by biggest risers, `n` of each.
pub fn price_swings(players: &[PlayerRecord], n: usize) -> RankedView {
    let mut swings = negative_price_change_players(players, n);
    swings
        .players
        .extend(positive_price_change_players(players, n).players);
    swings
}

/// Highest average ownership; players without history count as 0%.
pub fn most_popular_players(players: &[PlayerRecord], n: usize) -> RankedView {
    ranked(players.to_vec(), Metric::AvgOwnership, n, Take::Tail)
}
