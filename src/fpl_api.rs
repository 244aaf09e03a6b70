use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::info;

use crate::config::{AppConfig, RetryPolicy};
use crate::error::{Result, SchemaError};
use crate::history::HistorySource;
use crate::http_client::{fetch_text, http_client};

/// A player element exactly as the bootstrap endpoint returns it.
pub type RawElement = Map<String, Value>;

#[derive(Debug, Clone)]
pub struct Bootstrap {
    pub elements: Vec<RawElement>,
    /// Number of registered managers; the denominator for ownership percentages.
    pub total_players: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct GameweekEntry {
    pub total_points: i64,
    pub selected: u64,
}

pub struct FplClient {
    client: Client,
    base_url: String,
    retry: RetryPolicy,
}

impl FplClient {
    pub fn new(cfg: &AppConfig) -> Result<Self> {
        Ok(Self {
            client: http_client(&cfg.fetch)?,
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            retry: cfg.fetch.retry,
        })
    }

    pub fn bootstrap_url(&self) -> String {
        format!("{}/bootstrap-static/", self.base_url)
    }

    pub fn history_url(&self, player_id: u32) -> String {
        format!("{}/element-summary/{player_id}/", self.base_url)
    }

    pub fn fetch_bootstrap(&self) -> Result<Bootstrap> {
        let url = self.bootstrap_url();
        info!(%url, "fetching bootstrap snapshot");
        let body = fetch_text(&self.client, &url, &self.retry)?;
        let bootstrap = parse_bootstrap_json(&body)?;
        info!(
            players = bootstrap.elements.len(),
            participants = bootstrap.total_players,
            "bootstrap loaded"
        );
        Ok(bootstrap)
    }

    pub fn fetch_player_history(&self, player_id: u32) -> Result<Vec<GameweekEntry>> {
        let body = fetch_text(&self.client, &self.history_url(player_id), &self.retry)?;
        parse_history_json(&body)
    }
}

impl HistorySource for FplClient {
    fn player_history(&self, player_id: u32) -> Result<Vec<GameweekEntry>> {
        self.fetch_player_history(player_id)
    }
}

#[derive(Debug, Deserialize)]
struct BootstrapResponse {
    elements: Vec<RawElement>,
    total_players: u64,
}

#[derive(Debug, Deserialize)]
struct ElementSummaryResponse {
    history: Vec<GameweekEntry>,
}

pub fn parse_bootstrap_json(raw: &str) -> Result<Bootstrap> {
    let resp: BootstrapResponse = serde_json::from_str(raw.trim())
        .map_err(|err| SchemaError::Json(format!("bootstrap: {err}")))?;
    Ok(Bootstrap {
        elements: resp.elements,
        total_players: resp.total_players,
    })
}

pub fn parse_history_json(raw: &str) -> Result<Vec<GameweekEntry>> {
    let resp: ElementSummaryResponse = serde_json::from_str(raw.trim())
        .map_err(|err| SchemaError::Json(format!("element summary: {err}")))?;
    Ok(resp.history)
}
