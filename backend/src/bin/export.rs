//! Offline exporter.
//!
//! Reads a history snapshot (as the feed delivers it: an object keyed by
//! push id, or an array of records) and writes the raw history CSV, the
//! analytics CSV for one range and optionally the per-area chart PNGs.
//!
//! # Usage
//!
//! ```bash
//! parking-export snapshot.json [--range 7d] [--out exports] [--charts] [--now <epoch ms>]
//! ```
//!
//! `dashboard.toml` and the usual environment variables (`EXPORT_DIR`,
//! `DASHBOARD_RANGE`, `DASHBOARD_UTC_OFFSET_MINUTES`) provide the defaults.

use std::env;
use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use parking_dashboard::config::DashboardConfig;
use parking_dashboard::models::{now_ms, TimeRange};
use parking_dashboard::services::analytics::analytics;
use parking_dashboard::services::charts::{chart_exports, LineChartRenderer};
use parking_dashboard::services::export::{
    analytics_csv, download_blob, history_csv, ExportFile, FsDownloadSink,
};
use parking_dashboard::services::history::HistoryStore;

const USAGE: &str =
    "usage: parking-export <snapshot.json> [--range 24h|7d|30d|365d] [--out DIR] [--charts] [--now MS]";

struct Args {
    snapshot: PathBuf,
    range: Option<String>,
    out: Option<PathBuf>,
    charts: bool,
    now: Option<i64>,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Args> {
    let mut snapshot = None;
    let mut range = None;
    let mut out = None;
    let mut charts = false;
    let mut now = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--range" => range = Some(args.next().context("--range needs a value")?),
            "--out" => out = Some(PathBuf::from(args.next().context("--out needs a value")?)),
            "--charts" => charts = true,
            "--now" => {
                let value = args.next().context("--now needs a value")?;
                now = Some(
                    value
                        .parse()
                        .with_context(|| format!("--now expects epoch milliseconds, got {}", value))?,
                );
            }
            "-h" | "--help" => bail!(USAGE),
            flag if flag.starts_with("--") => bail!("unknown option {}\n{}", flag, USAGE),
            path if snapshot.is_none() => snapshot = Some(PathBuf::from(path)),
            extra => bail!("unexpected argument {}\n{}", extra, USAGE),
        }
    }

    Ok(Args {
        snapshot: snapshot.context(USAGE)?,
        range,
        out,
        charts,
        now,
    })
}

fn main() -> Result<()> {
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(false)
        .init();

    let args = parse_args(env::args().skip(1))?;
    let config = DashboardConfig::load()?;

    let content = fs::read_to_string(&args.snapshot)
        .with_context(|| format!("Failed to read snapshot {}", args.snapshot.display()))?;
    let snapshot: serde_json::Value = serde_json::from_str(&content)
        .with_context(|| format!("Snapshot {} is not valid JSON", args.snapshot.display()))?;

    let mut store = HistoryStore::new();
    let dropped = store.replace_snapshot(&snapshot);
    info!("Loaded {} samples ({} dropped)", store.len(), dropped);

    let range = match args.range.as_deref() {
        Some(key) => TimeRange::from_key(key),
        None => config.default_range(),
    };
    let now = args.now.unwrap_or_else(now_ms);
    let zone = config.display_zone();

    let mut files: Vec<ExportFile> = vec![
        history_csv(&store, &zone),
        analytics_csv(&store, range, now, &zone),
    ];
    if args.charts {
        let renderer = LineChartRenderer::new(config.charts.width, config.charts.height);
        files.extend(chart_exports(&renderer, &analytics(&store, range, now, &zone))?);
    }

    let out_dir = args.out.unwrap_or(config.export.output_dir);
    let mut sink = FsDownloadSink::new(&out_dir)?;
    for file in &files {
        download_blob(&mut sink, file)?;
    }

    for path in sink.written() {
        println!("{}", path.display());
    }
    info!("Wrote {} files to {}", sink.written().len(), out_dir.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Result<Args> {
        parse_args(list.iter().map(|s| s.to_string()))
    }

    #[test]
    fn test_parse_full_command_line() {
        let parsed = args(&["snap.json", "--range", "7d", "--out", "dir", "--charts", "--now", "5"])
            .unwrap();
        assert_eq!(parsed.snapshot, PathBuf::from("snap.json"));
        assert_eq!(parsed.range.as_deref(), Some("7d"));
        assert_eq!(parsed.out, Some(PathBuf::from("dir")));
        assert!(parsed.charts);
        assert_eq!(parsed.now, Some(5));
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(args(&[]).is_err());
        assert!(args(&["a.json", "b.json"]).is_err());
        assert!(args(&["a.json", "--range"]).is_err());
        assert!(args(&["a.json", "--now", "soon"]).is_err());
        assert!(args(&["a.json", "--verbose"]).is_err());
    }
}
