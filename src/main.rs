use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use fpl_charts::config::AppConfig;
use fpl_charts::fpl_api::FplClient;
use fpl_charts::normalize::normalize_players;
use fpl_charts::render::{Renderer, XlsxRenderer};
use fpl_charts::report::{ReportKind, ReportOptions, build_report};
use fpl_charts::season::SeasonTable;

/// Rank Fantasy Premier League players and chart the results.
#[derive(Parser, Debug)]
#[command(name = "fpl_charts", version)]
struct Cli {
    /// Report to generate
    #[arg(long, value_enum)]
    plot: Option<ReportKind>,

    /// Number of players per chart
    #[arg(long = "top_n", default_value_t = 10)]
    top_n: usize,

    /// Players must score more than this many points to be considered
    #[arg(long = "min_pts", default_value_t = 0)]
    min_pts: i64,

    /// Directory for chart workbooks [env: FPL_OUTPUT_DIR]
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// JSON season table (teams and short names) [env: FPL_SEASON_FILE]
    #[arg(long)]
    season_file: Option<PathBuf>,

    /// API root [env: FPL_BASE_URL]
    #[arg(long)]
    base_url: Option<String>,

    /// Per-request timeout [env: REQUEST_TIMEOUT_SECS]
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Attempts per request [env: FETCH_RETRIES]
    #[arg(long)]
    retries: Option<u32>,

    /// Concurrent history fetches [env: FETCH_PARALLELISM]
    #[arg(long)]
    parallelism: Option<usize>,
}

impl Cli {
    fn apply(&self, mut cfg: AppConfig) -> AppConfig {
        if let Some(dir) = &self.out_dir {
            cfg.output_dir = dir.clone();
        }
        if let Some(path) = &self.season_file {
            cfg.season_file = Some(path.clone());
        }
        if let Some(url) = &self.base_url {
            cfg.base_url = url.clone();
        }
        if let Some(secs) = self.timeout_secs {
            cfg.fetch.timeout = Duration::from_secs(secs.clamp(1, 120));
        }
        if let Some(attempts) = self.retries {
            cfg.fetch.retry.attempts = attempts.clamp(1, 10);
        }
        if let Some(threads) = self.parallelism {
            cfg.fetch.parallelism = threads.clamp(1, 32);
        }
        cfg
    }
}

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let cfg = cli.apply(AppConfig::from_env());

    let Some(kind) = cli.plot else {
        info!("no --plot given; nothing to do (try --plot top_position)");
        return Ok(());
    };

    let season = match &cfg.season_file {
        Some(path) => SeasonTable::load(path)
            .with_context(|| format!("load season table {}", path.display()))?,
        None => SeasonTable::embedded().clone(),
    };
    info!(season = %season.season, teams = season.teams.len(), "season table ready");

    let client = FplClient::new(&cfg).context("build api client")?;
    let bootstrap = client.fetch_bootstrap().context("fetch bootstrap snapshot")?;
    let groups = normalize_players(&bootstrap.elements, cli.min_pts, &season)
        .context("normalize players")?;

    let opts = ReportOptions {
        top_n: cli.top_n,
        min_pts: cli.min_pts,
        season: season.season.clone(),
        photo_url: cfg.photo_url.clone(),
        parallelism: cfg.fetch.parallelism,
    };
    let charts = build_report(kind, &groups, bootstrap.total_players, &client, &opts)
        .with_context(|| format!("build {kind:?} report"))?;

    let renderer = XlsxRenderer::new(&cfg.output_dir);
    for chart in &charts {
        let path = renderer
            .render(chart)
            .with_context(|| format!("render {}", chart.filename))?;
        println!("{}", path.display());
    }

    Ok(())
}
