// Tue Jan 13 2026 - Alex

use crate::engine::ScheduleMode;
use crate::graph::discovery;
use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// One CSV per protocol; the final extension names the protocol.
    pub scan_results: Vec<PathBuf>,
    pub generation_roots: Vec<PathBuf>,
    pub scan_file: Option<PathBuf>,
    /// Aliased-prefix list, one CIDR per line.
    pub blocklist: Option<PathBuf>,
    pub work_dir: PathBuf,
    /// Snapshot file or directory of dated snapshots.
    pub asn_db: Option<PathBuf>,
    pub asn_db_date: Option<NaiveDate>,
    pub workers: usize,
    pub schedule: ScheduleMode,
    pub ip_field: usize,
    pub skip_header: bool,
    pub algorithms: IndexMap<String, String>,
    pub grepcidr: Option<PathBuf>,
    pub report: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scan_results: Vec::new(),
            generation_roots: Vec::new(),
            scan_file: None,
            blocklist: None,
            work_dir: PathBuf::from("work"),
            asn_db: None,
            asn_db_date: None,
            workers: num_cpus::get(),
            schedule: ScheduleMode::Ready,
            ip_field: 0,
            skip_header: true,
            algorithms: discovery::default_algorithms(),
            grepcidr: None,
            report: None,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_scan_results(mut self, paths: Vec<PathBuf>) -> Self {
        self.scan_results = paths;
        self
    }

    pub fn with_generation_roots(mut self, roots: Vec<PathBuf>) -> Self {
        self.generation_roots = roots;
        self
    }

    pub fn with_scan_file(mut self, path: PathBuf) -> Self {
        self.scan_file = Some(path);
        self
    }

    pub fn with_blocklist(mut self, path: PathBuf) -> Self {
        self.blocklist = Some(path);
        self
    }

    pub fn with_work_dir(mut self, path: PathBuf) -> Self {
        self.work_dir = path;
        self
    }

    pub fn with_asn_db(mut self, path: PathBuf) -> Self {
        self.asn_db = Some(path);
        self
    }

    pub fn with_asn_db_date(mut self, date: NaiveDate) -> Self {
        self.asn_db_date = Some(date);
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_schedule(mut self, mode: ScheduleMode) -> Self {
        self.schedule = mode;
        self
    }

    pub fn with_ip_field(mut self, field: usize) -> Self {
        self.ip_field = field;
        self
    }

    pub fn with_skip_header(mut self, skip: bool) -> Self {
        self.skip_header = skip;
        self
    }

    pub fn with_algorithms(mut self, algorithms: IndexMap<String, String>) -> Self {
        self.algorithms = algorithms;
        self
    }

    pub fn with_grepcidr(mut self, program: PathBuf) -> Self {
        self.grepcidr = Some(program);
        self
    }

    pub fn with_report(mut self, path: PathBuf) -> Self {
        self.report = Some(path);
        self
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        match ext.to_lowercase().as_str() {
            "json" => serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            }),
            _ => Err(ConfigError::UnsupportedFormat(ext.to_string())),
        }
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let contents = serde_json::to_string_pretty(self).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| ConfigError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        fs::write(path, contents).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.scan_results.is_empty() {
            return Err(ConfigError::Missing("scan_results"));
        }
        if self.generation_roots.is_empty() {
            return Err(ConfigError::Missing("generation_roots"));
        }
        if self.scan_file.is_none() {
            return Err(ConfigError::Missing("scan_file"));
        }
        if self.blocklist.is_none() {
            return Err(ConfigError::Missing("blocklist"));
        }
        if self.workers == 0 {
            return Err(ConfigError::Invalid("workers must be greater than 0".to_string()));
        }
        if self.algorithms.is_empty() {
            return Err(ConfigError::Invalid("algorithm table is empty".to_string()));
        }
        for (name, pattern) in &self.algorithms {
            if name.is_empty() || name.contains('_') || name.contains('/') {
                return Err(ConfigError::Invalid(format!(
                    "algorithm name '{}' must be non-empty without '_' or '/'",
                    name
                )));
            }
            if let Err(e) = glob::Pattern::new(pattern) {
                return Err(ConfigError::Invalid(format!(
                    "pattern for {} ('{}'): {}",
                    name, pattern, e
                )));
            }
        }
        for root in &self.generation_roots {
            if !root.is_dir() {
                return Err(ConfigError::Invalid(format!(
                    "generation root {} is not a directory",
                    root.display()
                )));
            }
        }
        Ok(())
    }

    pub fn aggregates_ases(&self) -> bool {
        self.asn_db.is_some()
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Parse error in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Unsupported config format: {0}")]
    UnsupportedFormat(String),

    #[error("Missing required setting: {0}")]
    Missing(&'static str),

    #[error("Validation error: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn complete(root: &Path) -> Config {
        Config::new()
            .with_scan_results(vec![PathBuf::from("scan.icmp")])
            .with_generation_roots(vec![root.to_path_buf()])
            .with_scan_file(PathBuf::from("scan.txt"))
            .with_blocklist(PathBuf::from("apd.txt"))
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(config.workers >= 1);
        assert_eq!(config.schedule, ScheduleMode::Ready);
        assert_eq!(config.algorithms.len(), 10);
        assert_eq!(config.algorithms.get_index(0).map(|(k, _)| k.as_str()), Some("6Hit"));
        assert!(config.skip_header);
    }

    #[test]
    fn test_validate_reports_missing_inputs() {
        let dir = TempDir::new().unwrap();
        assert!(complete(dir.path()).validate().is_ok());

        let err = Config::new().validate().unwrap_err();
        assert!(matches!(err, ConfigError::Missing("scan_results")));

        let err = complete(dir.path()).with_workers(0).validate().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("eval.json");
        fs::write(
            &path,
            r#"{"work_dir": "/tmp/w", "schedule": "staged", "asn_db_date": "2024-03-01"}"#,
        )
        .unwrap();

        let config = Config::load(&path).unwrap();

        assert_eq!(config.work_dir, PathBuf::from("/tmp/w"));
        assert_eq!(config.schedule, ScheduleMode::Staged);
        assert_eq!(config.asn_db_date, NaiveDate::from_ymd_opt(2024, 3, 1));
        assert_eq!(config.algorithms.len(), 10);
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("eval.json");
        let config = complete(dir.path()).with_workers(3);

        config.save(&path).unwrap();
        let loaded = Config::load(&path).unwrap();

        assert_eq!(loaded.workers, 3);
        assert_eq!(loaded.scan_results, config.scan_results);
    }
}
