// src/cli.rs
use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};

use crate::config::consts::{DEFAULT_LIMIT, DEFAULT_OUT_FILE, DEFAULT_SOURCE, DEFAULT_USER, LOG_FILE};
use crate::config::options::RunOptions;
use crate::data::ActivityRecord;
use crate::format;
use crate::runner::{self, RunSummary};
use crate::specs::SourceKind;

/// Parse a saved Letterboxd activity page or diary feed into TRMNL merge variables.
#[derive(Debug, Parser)]
#[command(name = "lb_scrape", version, about)]
pub struct Args {
    /// Saved activity page (HTML) or diary feed (RSS)
    #[arg(short, long, default_value = DEFAULT_SOURCE)]
    pub source: PathBuf,

    /// Force the source type instead of sniffing it
    #[arg(short, long, value_enum)]
    pub kind: Option<SourceKind>,

    /// Output JSON file
    #[arg(short, long, default_value = DEFAULT_OUT_FILE)]
    pub out: PathBuf,

    /// Print the JSON to stdout instead of writing a file
    #[arg(long)]
    pub stdout: bool,

    /// Number of recent activities to publish
    #[arg(short = 'n', long, default_value_t = DEFAULT_LIMIT)]
    pub limit: usize,

    /// User name shown on the display
    #[arg(short, long, default_value = DEFAULT_USER)]
    pub user: String,

    /// List every parsed activity before writing
    #[arg(short, long)]
    pub list: bool,

    /// Debug log file
    #[arg(long, default_value = LOG_FILE)]
    pub log_file: PathBuf,
}

impl Args {
    pub fn options(&self) -> RunOptions {
        RunOptions {
            source: self.source.clone(),
            kind: self.kind,
            out: (!self.stdout).then(|| self.out.clone()),
            limit: self.limit,
            user: self.user.clone(),
        }
    }
}

pub fn run() -> Result<()> {
    run_with(Args::parse())
}

/// A missing source is reported and still returns `Ok`, so the process exits 0.
pub fn run_with(args: Args) -> Result<()> {
    crate::logging::init(&args.log_file)
        .wrap_err_with(|| format!("opening log file {}", args.log_file.display()))?;

    let opts = args.options();
    let summary = match runner::run(&opts) {
        Ok(s) => s,
        Err(e) if e.is_missing_source() => {
            logw!("{e}");
            eprintln!("No data available: {} not found", opts.source.display());
            return Ok(());
        }
        Err(e) => {
            loge!("{e}");
            return Err(e).wrap_err("scrape failed");
        }
    };

    report(&args, &summary)?;
    Ok(())
}

fn report(args: &Args, summary: &RunSummary) -> Result<()> {
    let stream_json = summary.written.is_none();
    // keep stdout clean for the JSON when streaming
    let say = |line: String| {
        if stream_json { eprintln!("{line}") } else { println!("{line}") }
    };

    say(format!("Found {} movie activities", summary.records.len()));

    if args.list {
        for (i, rec) in summary.records.iter().enumerate() {
            for line in listing(i + 1, rec) {
                say(line);
            }
        }
    }

    match &summary.written {
        Some(path) => say(format!("Saved: {}", path.display())),
        None => println!("{}", runner::to_pretty_json(&summary.payload)?),
    }

    let env = &summary.payload.merge_variables;
    say(format!("In output: {}", env.total_activities));
    if let Some(latest) = &env.latest {
        say(format!("Latest: {} ({})", latest.latest_title, latest.latest_year));
    }
    Ok(())
}

fn listing(n: usize, rec: &ActivityRecord) -> Vec<String> {
    let mut out = vec![format!(
        "{n}. {} ({})",
        rec.title,
        rec.year.as_deref().unwrap_or("N/A")
    )];
    if let Some(stars) = &rec.rating_display {
        out.push(format!("   Rating: {stars} ({} stars)", rec.rating.unwrap_or(0.0)));
    }
    if let Some(review) = &rec.review {
        out.push(format!("   Review: {}", format::preview(review)));
    }
    if let Some(date) = &rec.date {
        out.push(format!("   Date: {date}"));
    }
    out
}

#[cfg(test)]
mod tests {
    use std::ffi::OsString;

    use super::*;

    #[test]
    fn stdout_flag_clears_output_path() {
        let args = Args::parse_from(["lb_scrape", "--stdout", "-n", "3", "--kind", "feed"]);
        let opts = args.options();
        assert_eq!(opts.out, None);
        assert_eq!(opts.limit, 3);
        assert_eq!(opts.kind, Some(SourceKind::Feed));
    }

    #[test]
    fn defaults_match_run_options() {
        let args = Args::parse_from(["lb_scrape"]);
        assert_eq!(args.options(), RunOptions::default());
    }

    #[test]
    fn missing_source_exits_cleanly() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("nope.html");
        let out = dir.path().join("out.json");
        let log = dir.path().join(".store/debug.log");
        let argv: Vec<OsString> = vec![
            "lb_scrape".into(),
            "--source".into(),
            src.into_os_string(),
            "--out".into(),
            out.clone().into_os_string(),
            "--log-file".into(),
            log.into_os_string(),
        ];
        let args = Args::parse_from(argv);
        assert!(run_with(args).is_ok());
        assert!(!out.exists());
    }

    #[test]
    fn malformed_feed_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("rss.xml");
        std::fs::write(&src, "<rss><channel>").unwrap();
        let log = dir.path().join("debug.log");
        let argv: Vec<OsString> = vec![
            "lb_scrape".into(),
            "--source".into(),
            src.into_os_string(),
            "--stdout".into(),
            "--log-file".into(),
            log.into_os_string(),
        ];
        let args = Args::parse_from(argv);
        assert!(run_with(args).is_err());
    }

    #[test]
    fn listing_lines() {
        let rec = ActivityRecord {
            title: "Wicked".into(),
            year: Some("2024".into()),
            slug: None,
            url: None,
            rating: Some(4.5),
            rating_display: Some("★★★★½".into()),
            review: Some("Great movie".into()),
            datetime: None,
            date: Some("Dec 25, 2024".into()),
            date_short: None,
        };
        assert_eq!(
            listing(1, &rec),
            vec![
                "1. Wicked (2024)",
                "   Rating: ★★★★½ (4.5 stars)",
                "   Review: Great movie",
                "   Date: Dec 25, 2024",
            ]
        );
    }
}
