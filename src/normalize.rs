use serde_json::Value;
use tracing::{debug, info};

use crate::error::{Result, SchemaError};
use crate::fpl_api::RawElement;
use crate::player::{PlayerRecord, Position};
use crate::season::SeasonTable;

/// Retained players split by position. Every record lives in exactly one group.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PositionGroups {
    pub gk: Vec<PlayerRecord>,
    pub def: Vec<PlayerRecord>,
    pub mid: Vec<PlayerRecord>,
    pub fwd: Vec<PlayerRecord>,
}

impl PositionGroups {
    pub fn group(&self, position: Position) -> &[PlayerRecord] {
        match position {
            Position::Goalkeeper => &self.gk,
            Position::Defender => &self.def,
            Position::Midfielder => &self.mid,
            Position::Forward => &self.fwd,
        }
    }

    fn push(&mut self, record: PlayerRecord) {
        match record.position {
            Position::Goalkeeper => self.gk.push(record),
            Position::Defender => self.def.push(record),
            Position::Midfielder => self.mid.push(record),
            Position::Forward => self.fwd.push(record),
        }
    }

    /// All players, goalkeepers first, then defenders, midfielders and forwards.
    pub fn all(&self) -> Vec<PlayerRecord> {
        Position::ALL
            .iter()
            .flat_map(|&pos| self.group(pos).iter().cloned())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.gk.len() + self.def.len() + self.mid.len() + self.fwd.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub fn normalize_players(
    elements: &[RawElement],
    min_pts: i64,
    season: &SeasonTable,
) -> Result<PositionGroups> {
    let mut groups = PositionGroups::default();
    for element in elements {
        // Dropped rows never reach the position and team lookups.
        if Fields::new(element).int("total_points")? <= min_pts {
            continue;
        }
        groups.push(normalize_player(element, season)?);
    }
    info!(
        fetched = elements.len(),
        retained = groups.len(),
        min_pts,
        gk = groups.gk.len(),
        def = groups.def.len(),
        mid = groups.mid.len(),
        fwd = groups.fwd.len(),
        "normalized players"
    );
    Ok(groups)
}

/// Convert one raw element into a record. Does not apply the points threshold.
pub fn normalize_player(element: &RawElement, season: &SeasonTable) -> Result<PlayerRecord> {
    let fields = Fields::new(element);

    let position_code = fields.int("element_type")?;
    let position = Position::from_code(position_code).ok_or_else(|| {
        SchemaError::UnknownPosition {
            player: fields.label.clone(),
            code: position_code,
        }
    })?;

    let team_ref = fields.int("team")?;
    let team = season.team(team_ref).ok_or_else(|| SchemaError::UnknownTeam {
        player: fields.label.clone(),
        code: team_ref,
    })?;

    let now_cost = fields.int("now_cost")? as f64 / 10.0;
    let cost_change_start = fields.int("cost_change_start")? as f64 / 10.0;
    let avg_cost = (now_cost * 2.0 + cost_change_start) / 2.0;

    let web_name = fields.string("web_name")?;
    let short = season.display_name(&web_name).to_string();
    if short != web_name {
        debug!(from = %web_name, to = %short, "shortened display name");
    }

    Ok(PlayerRecord {
        id: fields.id()?,
        first_name: fields.string("first_name")?,
        second_name: fields.string("second_name")?,
        web_name: short,
        photo: fields.string("photo")?,
        position,
        team_name: team.name.clone(),
        team_code: team.code,
        now_cost,
        cost_change_start,
        avg_cost,
        total_points: fields.int("total_points")?,
        points_per_game: fields.decimal("points_per_game")?,
        selected_by_percent: fields.decimal("selected_by_percent")?,
        value_season: fields.decimal("value_season")?,
        minutes: fields.int("minutes")?,
        goals_scored: fields.int("goals_scored")?,
        assists: fields.int("assists")?,
        clean_sheets: fields.int("clean_sheets")?,
        goals_conceded: fields.int("goals_conceded")?,
        own_goals: fields.int("own_goals")?,
        penalties_saved: fields.int("penalties_saved")?,
        penalties_missed: fields.int("penalties_missed")?,
        yellow_cards: fields.int("yellow_cards")?,
        red_cards: fields.int("red_cards")?,
        saves: fields.int("saves")?,
        bonus: fields.int("bonus")?,
        bps: fields.int("bps")?,
        influence: fields.decimal("influence")?,
        creativity: fields.decimal("creativity")?,
        threat: fields.decimal("threat")?,
        ict_index: fields.decimal("ict_index")?,
        points_per_million: None,
        history: None,
    })
}

struct Fields<'a> {
    raw: &'a RawElement,
    label: String,
}

impl<'a> Fields<'a> {
    fn new(raw: &'a RawElement) -> Self {
        let label = match (raw.get("id"), raw.get("web_name").and_then(Value::as_str)) {
            (Some(id), Some(name)) => format!("{id} ({name})"),
            (Some(id), None) => id.to_string(),
            (None, Some(name)) => name.to_string(),
            (None, None) => "<unknown>".to_string(),
        };
        Self { raw, label }
    }

    fn get(&self, field: &'static str) -> Result<&'a Value> {
        self.raw.get(field).ok_or_else(|| {
            SchemaError::MissingField {
                player: self.label.clone(),
                field,
            }
            .into()
        })
    }

    fn invalid(&self, field: &'static str, reason: impl Into<String>) -> SchemaError {
        SchemaError::InvalidField {
            player: self.label.clone(),
            field,
            reason: reason.into(),
        }
    }

    fn id(&self) -> Result<u32> {
        let value = self.int("id")?;
        u32::try_from(value).map_err(|_| self.invalid("id", format!("{value} out of range")).into())
    }

    fn int(&self, field: &'static str) -> Result<i64> {
        let value = self.get(field)?;
        value
            .as_i64()
            .ok_or_else(|| self.invalid(field, format!("expected integer, got {value}")).into())
    }

    /// Accepts a JSON number or a numeric string such as `"5.2"`.
    fn decimal(&self, field: &'static str) -> Result<f64> {
        let value = self.get(field)?;
        let parsed = match value {
            Value::Number(num) => num.as_f64(),
            Value::String(text) => text.trim().parse::<f64>().ok(),
            _ => None,
        };
        parsed.ok_or_else(|| self.invalid(field, format!("expected decimal, got {value}")).into())
    }

    fn string(&self, field: &'static str) -> Result<String> {
        let value = self.get(field)?;
        value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| self.invalid(field, format!("expected string, got {value}")).into())
    }
}
