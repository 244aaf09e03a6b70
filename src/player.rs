use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Position {
    #[serde(rename = "GK")]
    Goalkeeper,
    #[serde(rename = "DEF")]
    Defender,
    #[serde(rename = "MID")]
    Midfielder,
    #[serde(rename = "FWD")]
    Forward,
}

impl Position {
    pub const ALL: [Position; 4] = [
        Position::Goalkeeper,
        Position::Defender,
        Position::Midfielder,
        Position::Forward,
    ];

    /// FPL `element_type` code.
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(Position::Goalkeeper),
            2 => Some(Position::Defender),
            3 => Some(Position::Midfielder),
            4 => Some(Position::Forward),
            _ => None,
        }
    }

    pub fn short(self) -> &'static str {
        match self {
            Position::Goalkeeper => "GK",
            Position::Defender => "DEF",
            Position::Midfielder => "MID",
            Position::Forward => "FWD",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short())
    }
}

/// One normalized player row. Costs are in millions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub id: u32,
    pub first_name: String,
    pub second_name: String,
    pub web_name: String,
    pub photo: String,
    pub position: Position,
    pub team_name: String,
    pub team_code: u32,

    pub now_cost: f64,
    pub cost_change_start: f64,
    pub avg_cost: f64,

    pub total_points: i64,
    pub points_per_game: f64,
    pub selected_by_percent: f64,
    pub value_season: f64,
    pub minutes: i64,
    pub goals_scored: i64,
    pub assists: i64,
    pub clean_sheets: i64,
    pub goals_conceded: i64,
    pub own_goals: i64,
    pub penalties_saved: i64,
    pub penalties_missed: i64,
    pub yellow_cards: i64,
    pub red_cards: i64,
    pub saves: i64,
    pub bonus: i64,
    pub bps: i64,
    pub influence: f64,
    pub creativity: f64,
    pub threat: f64,
    pub ict_index: f64,

    /// Set by the value ranking.
    pub points_per_million: Option<f64>,
    /// Set by the history aggregator.
    pub history: Option<HistorySummary>,
}

impl PlayerRecord {
    /// Cost at the start of the season.
    pub fn start_cost(&self) -> f64 {
        self.now_cost - self.cost_change_start
    }

    /// Photo code without the file extension, e.g. `"118748"` from `"118748.jpg"`.
    pub fn photo_code(&self) -> &str {
        self.photo.split('.').next().unwrap_or_default()
    }

    pub fn avg_points(&self) -> f64 {
        self.history.as_ref().map(|h| h.avg_points).unwrap_or(0.0)
    }

    pub fn avg_ownership_pct(&self) -> f64 {
        self.history
            .as_ref()
            .map(|h| h.avg_ownership_pct)
            .unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameweekSample {
    pub points: i64,
    pub ownership_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistorySummary {
    pub samples: Vec<GameweekSample>,
    pub avg_points: f64,
    pub avg_ownership_pct: f64,
}

/// Round to two decimal places, half away from zero.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_codes_are_closed() {
        assert_eq!(Position::from_code(1), Some(Position::Goalkeeper));
        assert_eq!(Position::from_code(4), Some(Position::Forward));
        assert_eq!(Position::from_code(0), None);
        assert_eq!(Position::from_code(5), None);
        assert_eq!(Position::Midfielder.to_string(), "MID");
    }

    #[test]
    fn round2_keeps_two_decimals() {
        assert_eq!(round2(12.3456), 12.35);
        assert_eq!(round2(-1.234), -1.23);
        assert_eq!(round2(7.0), 7.0);
    }
}
