use rayon::prelude::*;
use tracing::{info, warn};

use crate::error::{Result, SchemaError};
use crate::fpl_api::GameweekEntry;
use crate::player::{GameweekSample, HistorySummary, PlayerRecord, round2};

/// Where per-gameweek history comes from. Implemented by the API client.
pub trait HistorySource: Sync {
    fn player_history(&self, player_id: u32) -> Result<Vec<GameweekEntry>>;
}

/// Summarize one player's history. Ownership is a percentage of all participants.
pub fn summarize_history(entries: &[GameweekEntry], participants: u64) -> Result<HistorySummary> {
    if participants == 0 {
        return Err(SchemaError::InvalidField {
            player: "<bootstrap>".to_string(),
            field: "total_players",
            reason: "participant count is zero".to_string(),
        }
        .into());
    }

    let samples: Vec<GameweekSample> = entries
        .iter()
        .map(|entry| GameweekSample {
            points: entry.total_points,
            ownership_pct: round2(entry.selected as f64 * 100.0 / participants as f64),
        })
        .collect();

    let (avg_points, avg_ownership_pct) = if samples.is_empty() {
        (0.0, 0.0)
    } else {
        let n = samples.len() as f64;
        let pts: f64 = samples.iter().map(|s| s.points as f64).sum();
        let own: f64 = samples.iter().map(|s| s.ownership_pct).sum();
        (round2(pts / n), round2(own / n))
    };

    Ok(HistorySummary {
        samples,
        avg_points,
        avg_ownership_pct,
    })
}

/// Attach a history summary to every player. Fetches run on a bounded pool;
/// the output keeps the input order. The first failure aborts the whole run.
pub fn attach_history<S: HistorySource>(
    source: &S,
    players: &[PlayerRecord],
    participants: u64,
    parallelism: usize,
) -> Result<Vec<PlayerRecord>> {
    info!(
        players = players.len(),
        parallelism, "fetching per-gameweek history"
    );
    let out = with_fetch_pool(parallelism, || {
        players
            .par_iter()
            .map(|player| {
                let entries = source.player_history(player.id).inspect_err(|err| {
                    warn!(player = player.id, error = %err, "history fetch failed");
                })?;
                let summary = summarize_history(&entries, participants)?;
                Ok(PlayerRecord {
                    history: Some(summary),
                    ..player.clone()
                })
            })
            .collect::<Result<Vec<_>>>()
    })?;
    info!(players = out.len(), "history attached");
    Ok(out)
}

fn with_fetch_pool<T>(threads: usize, action: impl FnOnce() -> T + Send) -> T
where
    T: Send,
{
    match rayon::ThreadPoolBuilder::new()
        .num_threads(threads.clamp(1, 32))
        .build()
    {
        Ok(pool) => pool.install(action),
        Err(_) => action(),
    }
}
