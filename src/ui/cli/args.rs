// Wed Jan 15 2026 - Alex

use crate::config::Config;
use crate::engine::ScheduleMode;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use indexmap::IndexMap;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "tga-eval")]
#[command(author = "Alex")]
#[command(version = "1.0.0")]
#[command(about = "Evaluate IPv6 target generation algorithms against scan results", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true, default_value = "info")]
    pub log_level: String,

    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build the task graph and execute it
    Run(RunArgs),
    /// Print the stages and tasks without executing anything
    Plan(RunArgs),
    /// Append origin AS numbers to the rows of a scan CSV
    Annotate(AnnotateArgs),
    /// Track when annotated hitlist addresses appear, leave and return
    Stability(StabilityArgs),
}

#[derive(Parser, Debug, Clone, Default)]
pub struct RunArgs {
    /// JSON config file; flags given here override its values
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Scan-result CSV, one per protocol (protocol = final extension)
    #[arg(short = 'r', long = "scan-result", value_name = "FILE")]
    pub scan_results: Vec<PathBuf>,

    /// Directory containing generation*/ result trees
    #[arg(short = 'g', long = "generation-root", value_name = "DIR")]
    pub generation_roots: Vec<PathBuf>,

    #[arg(long, value_name = "FILE")]
    pub scan_file: Option<PathBuf>,

    /// Aliased-prefix list, one CIDR per line
    #[arg(short, long, value_name = "FILE")]
    pub blocklist: Option<PathBuf>,

    #[arg(short, long, value_name = "DIR")]
    pub work_dir: Option<PathBuf>,

    #[arg(short = 'j', long)]
    pub workers: Option<usize>,

    #[arg(long, value_enum)]
    pub schedule: Option<ScheduleMode>,

    /// Routing snapshot file, or a directory of dated snapshots
    #[arg(long, value_name = "PATH")]
    pub asn_db: Option<PathBuf>,

    /// Pick the newest snapshot at or before this date (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub asn_date: Option<NaiveDate>,

    /// Zero-based address column in the scan-result CSVs
    #[arg(long)]
    pub ip_field: Option<usize>,

    /// Scan-result CSVs have no header row
    #[arg(long)]
    pub no_header: bool,

    /// Restrict to an algorithm, optionally with its own glob: NAME[=PATTERN]
    #[arg(short, long = "algorithm", value_name = "NAME[=PATTERN]")]
    pub algorithms: Vec<String>,

    /// Use a grepcidr executable for blocklist filtering
    #[arg(long, value_name = "PROGRAM")]
    pub grepcidr: Option<PathBuf>,

    /// Write the result matrix as JSON
    #[arg(long, value_name = "FILE")]
    pub report: Option<PathBuf>,

    #[arg(long)]
    pub no_progress: bool,
}

impl RunArgs {
    /// Config file (or defaults) with every given flag applied on top.
    pub fn to_config(&self) -> anyhow::Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };

        if !self.scan_results.is_empty() {
            config = config.with_scan_results(self.scan_results.clone());
        }
        if !self.generation_roots.is_empty() {
            config = config.with_generation_roots(self.generation_roots.clone());
        }
        if let Some(path) = &self.scan_file {
            config = config.with_scan_file(path.clone());
        }
        if let Some(path) = &self.blocklist {
            config = config.with_blocklist(path.clone());
        }
        if let Some(path) = &self.work_dir {
            config = config.with_work_dir(path.clone());
        }
        if let Some(workers) = self.workers {
            config = config.with_workers(workers);
        }
        if let Some(mode) = self.schedule {
            config = config.with_schedule(mode);
        }
        if let Some(path) = &self.asn_db {
            config = config.with_asn_db(path.clone());
        }
        if let Some(date) = self.asn_date {
            config = config.with_asn_db_date(date);
        }
        if let Some(field) = self.ip_field {
            config = config.with_ip_field(field);
        }
        if self.no_header {
            config = config.with_skip_header(false);
        }
        if !self.algorithms.is_empty() {
            let table = select_algorithms(&config.algorithms, &self.algorithms)?;
            config = config.with_algorithms(table);
        }
        if let Some(program) = &self.grepcidr {
            config = config.with_grepcidr(program.clone());
        }
        if let Some(path) = &self.report {
            config = config.with_report(path.clone());
        }

        Ok(config)
    }
}

/// `NAME` keeps a known algorithm, `NAME=PATTERN` defines or overrides one.
fn select_algorithms(
    known: &IndexMap<String, String>,
    entries: &[String],
) -> anyhow::Result<IndexMap<String, String>> {
    let mut selected = IndexMap::new();

    for entry in entries {
        let (name, pattern) = match entry.split_once('=') {
            Some((name, pattern)) => (name.trim(), pattern.trim().to_string()),
            None => {
                let name = entry.trim();
                let pattern = known
                    .get(name)
                    .cloned()
                    .ok_or_else(|| anyhow::anyhow!("Unknown algorithm '{}' (give NAME=PATTERN)", name))?;
                (name, pattern)
            }
        };
        selected.insert(name.to_string(), pattern);
    }

    Ok(selected)
}

#[derive(Parser, Debug, Clone)]
pub struct AnnotateArgs {
    /// Scan CSV with a header row
    pub input: PathBuf,

    #[arg(long, value_name = "PATH")]
    pub asn_db: PathBuf,

    /// Snapshot date; defaults to a date in the input file name, then today
    #[arg(long, value_name = "DATE")]
    pub date: Option<NaiveDate>,

    #[arg(short, long)]
    pub output: Option<PathBuf>,

    #[arg(long, value_name = "DIR")]
    pub out_dir: Option<PathBuf>,

    #[arg(long, default_value = "0")]
    pub field: usize,
}

#[derive(Parser, Debug, Clone)]
pub struct StabilityArgs {
    /// First snapshot date (YYYY-MM-DD)
    pub start: NaiveDate,

    #[arg(long, value_name = "DIR", default_value = "hitlist")]
    pub base_dir: PathBuf,

    /// Snapshot kind in the file names, e.g. total or icmp
    #[arg(long, default_value = "total")]
    pub extension: String,

    /// Stop after this many snapshots (0 = no limit)
    #[arg(long, default_value = "0")]
    pub limit: usize,

    /// Exclusive end date
    #[arg(long, value_name = "DATE")]
    pub end: Option<NaiveDate>,

    /// Defaults to <start>.<extension>.ipstability
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_defaults() {
        let args = Args::parse_from([
            "tga-eval",
            "run",
            "-r",
            "scan.icmp",
            "-r",
            "scan.tcp80",
            "-g",
            "gen",
            "--scan-file",
            "scan.txt",
            "-b",
            "apd.txt",
            "-j",
            "3",
            "--schedule",
            "staged",
            "--asn-date",
            "2024-03-01",
            "-a",
            "6Hit",
            "-a",
            "Custom=custom/out*",
        ]);

        let run = match args.command {
            Command::Run(run) => run,
            other => panic!("unexpected command {:?}", other),
        };
        let config = run.to_config().unwrap();

        assert_eq!(config.scan_results.len(), 2);
        assert_eq!(config.workers, 3);
        assert_eq!(config.schedule, ScheduleMode::Staged);
        assert_eq!(config.asn_db_date, NaiveDate::from_ymd_opt(2024, 3, 1));
        let names: Vec<&str> = config.algorithms.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["6Hit", "Custom"]);
        assert_eq!(config.algorithms["6Hit"], "6Hit/candidates*");
    }

    #[test]
    fn test_unknown_algorithm_without_pattern_rejected() {
        let known = crate::graph::default_algorithms();
        assert!(select_algorithms(&known, &["Nope".to_string()]).is_err());
    }

    #[test]
    fn test_stability_defaults() {
        let args = Args::parse_from(["tga-eval", "stability", "2024-03-01", "--limit", "7"]);

        let stability = match args.command {
            Command::Stability(stability) => stability,
            other => panic!("unexpected command {:?}", other),
        };
        assert_eq!(stability.start, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert_eq!(stability.base_dir, PathBuf::from("hitlist"));
        assert_eq!(stability.extension, "total");
        assert_eq!(stability.limit, 7);
        assert!(stability.end.is_none());
    }
}
