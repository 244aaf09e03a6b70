#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;

use serde_json::{Value, json};

use fpl_charts::fpl_api::RawElement;
use fpl_charts::normalize::normalize_player;
use fpl_charts::player::PlayerRecord;
use fpl_charts::season::SeasonTable;

pub fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

pub struct El {
    pub id: u32,
    pub web_name: &'static str,
    pub element_type: i64,
    pub team: i64,
    pub now_cost: i64,
    pub cost_change_start: i64,
    pub total_points: i64,
    pub minutes: i64,
    pub bonus: i64,
}

impl Default for El {
    fn default() -> Self {
        Self {
            id: 1,
            web_name: "Player",
            element_type: 3,
            team: 1,
            now_cost: 60,
            cost_change_start: 0,
            total_points: 100,
            minutes: 2000,
            bonus: 5,
        }
    }
}

impl El {
    pub fn raw(&self) -> RawElement {
        let value = json!({
            "id": self.id,
            "first_name": "First",
            "second_name": self.web_name,
            "web_name": self.web_name,
            "element_type": self.element_type,
            "team": self.team,
            "now_cost": self.now_cost,
            "cost_change_start": self.cost_change_start,
            "total_points": self.total_points,
            "points_per_game": "4.1",
            "selected_by_percent": "10.0",
            "value_season": "16.0",
            "minutes": self.minutes,
            "photo": format!("{}.jpg", 1000 + self.id),
            "goals_scored": 3,
            "assists": 2,
            "clean_sheets": 5,
            "goals_conceded": 20,
            "own_goals": 0,
            "penalties_saved": 0,
            "penalties_missed": 0,
            "yellow_cards": 1,
            "red_cards": 0,
            "saves": 0,
            "bonus": self.bonus,
            "bps": 300,
            "influence": "400.0",
            "creativity": 250.5,
            "threat": "300.0",
            "ict_index": "95.0"
        });
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    pub fn record(&self) -> PlayerRecord {
        normalize_player(&self.raw(), SeasonTable::embedded()).expect("valid element")
    }
}
