// Tue Jan 13 2026 - Alex

use indexmap::IndexMap;
use pretty_assertions::assert_eq;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tga_eval::engine::{Pipeline, ScheduleMode};
use tga_eval::error::PipelineError;
use tga_eval::graph::{as_table, GraphError, WorkLayout};
use tga_eval::Config;

const ONE: &str = "2001:0db8:0000:0000:0000:0000:0000:0001\n";

struct Fixture {
    dir: TempDir,
}

impl Fixture {
    /// 6Hit has candidates in the ISP category, 6Tree has none.
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let fixture = Self { dir };

        fixture.file(
            "gen/generation_2024_ISP/results/6Hit/candidates.txt",
            "2001:db8::1\n2001:db8::2\n2001:db8:0::1\n",
        );
        fixture.file(
            "gen/generation_2024_ISP/seeds/responsive-addresses.txt",
            "2001:db8::2\n",
        );
        fixture.file("in/scan.txt", "2001:db8::1\n2001:db8::3\n2001:db8:dead::9\n");
        fixture.file("in/apd.txt", "2001:db8:dead::/48\n");
        fixture.file("in/res.icmp", "saddr,ttl\n2001:db8::1,64\n2001:db8:dead::5,64\n");
        fixture.file("in/res.tcp80", "saddr,ttl\n2001:db8::3,60\n");
        fixture.file("in/rib.ipasn", "2001:db8::/32\t64500\n2001:db8:1::/48\t64501\n");

        fixture
    }

    fn path(&self, rel: &str) -> PathBuf {
        self.dir.path().join(rel)
    }

    fn file(&self, rel: &str, contents: &str) {
        let path = self.path(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    fn config(&self, work: &str) -> Config {
        let mut algorithms = IndexMap::new();
        algorithms.insert("6Hit".to_string(), "6Hit/candidates*".to_string());
        algorithms.insert("6Tree".to_string(), "6Tree/targets_combined.txt".to_string());

        Config::new()
            .with_scan_results(vec![self.path("in/res.icmp"), self.path("in/res.tcp80")])
            .with_generation_roots(vec![self.path("gen")])
            .with_scan_file(self.path("in/scan.txt"))
            .with_blocklist(self.path("in/apd.txt"))
            .with_work_dir(self.path(work))
            .with_algorithms(algorithms)
            .with_workers(2)
    }
}

fn snapshot(dir: &Path) -> BTreeMap<String, String> {
    fs::read_dir(dir)
        .unwrap()
        .map(|entry| {
            let entry = entry.unwrap();
            (
                entry.file_name().to_string_lossy().into_owned(),
                fs::read_to_string(entry.path()).unwrap(),
            )
        })
        .collect()
}

#[test]
fn test_run_produces_terminal_sets() {
    let fixture = Fixture::new();
    let outcome = Pipeline::new(fixture.config("work")).run().unwrap();
    let layout = WorkLayout::new(fixture.path("work"));

    assert!(outcome.summary.is_success());
    assert_eq!(outcome.summary.executed, outcome.summary.total_tasks);

    // {::1, ::2} minus seed {::2}, intersected with scan {::1, ::3}
    assert_eq!(
        fs::read_to_string(layout.candidates_scanned("6Hit", "ISP")).unwrap(),
        ONE
    );
    assert_eq!(
        fs::read_to_string(layout.results("6Hit", "ISP", "icmp")).unwrap(),
        ONE
    );
    assert_eq!(
        fs::read_to_string(layout.results("6Hit", "ISP", "tcp80")).unwrap(),
        ""
    );
    assert_eq!(
        fs::read_to_string(layout.responsive(&fixture.path("in/res.icmp"))).unwrap(),
        ONE
    );
}

#[test]
fn test_missing_combination_yields_empty_results() {
    let fixture = Fixture::new();
    let outcome = Pipeline::new(fixture.config("work")).run().unwrap();
    let layout = WorkLayout::new(fixture.path("work"));

    for protocol in ["icmp", "tcp80"] {
        let results = layout.results("6Tree", "ISP", protocol);
        assert!(results.exists());
        assert_eq!(fs::read_to_string(results).unwrap(), "");
    }

    let rows = outcome.report.rows();
    assert_eq!(rows.len(), 4);
    assert_eq!(rows[0].combination.algorithm, "6Hit");
    assert_eq!(rows[0].combination.protocol, "icmp");
    assert_eq!((rows[0].candidates, rows[0].responsive), (1, 1));
    assert!(rows
        .iter()
        .filter(|r| r.combination.algorithm == "6Tree")
        .all(|r| r.combination.placeholder && r.responsive == 0));
    assert_eq!(outcome.report.total_responsive(), 1);
}

#[test]
fn test_second_run_skips_everything() {
    let fixture = Fixture::new();
    let first = Pipeline::new(fixture.config("work")).run().unwrap();
    let before = snapshot(&fixture.path("work"));

    let second = Pipeline::new(fixture.config("work")).run().unwrap();

    assert_eq!(second.summary.executed, 0);
    assert_eq!(second.summary.skipped, first.summary.total_tasks);
    assert_eq!(snapshot(&fixture.path("work")), before);
}

#[test]
fn test_deleted_output_is_rebuilt_alone() {
    let fixture = Fixture::new();
    Pipeline::new(fixture.config("work")).run().unwrap();
    let layout = WorkLayout::new(fixture.path("work"));
    let results = layout.results("6Hit", "ISP", "icmp");
    fs::remove_file(&results).unwrap();

    let outcome = Pipeline::new(fixture.config("work")).run().unwrap();

    assert_eq!(outcome.summary.executed, 1);
    assert_eq!(fs::read_to_string(results).unwrap(), ONE);
}

#[test]
fn test_outputs_independent_of_workers_and_mode() {
    let fixture = Fixture::new();
    let runs = [
        ("work_a", 1, ScheduleMode::Ready),
        ("work_b", 4, ScheduleMode::Ready),
        ("work_c", 1, ScheduleMode::Staged),
        ("work_d", 4, ScheduleMode::Staged),
    ];

    let mut snapshots = Vec::new();
    for (work, workers, mode) in runs {
        let config = fixture.config(work).with_workers(workers).with_schedule(mode);
        Pipeline::new(config).run().unwrap();
        snapshots.push(snapshot(&fixture.path(work)));
    }

    for other in &snapshots[1..] {
        assert_eq!(other, &snapshots[0]);
    }
}

#[test]
fn test_as_tables_are_written() {
    let fixture = Fixture::new();
    let config = fixture
        .config("work")
        .with_asn_db(fixture.path("in/rib.ipasn"));
    Pipeline::new(config).run().unwrap();
    let layout = WorkLayout::new(fixture.path("work"));

    assert_eq!(
        fs::read_to_string(as_table(&layout.results("6Hit", "ISP", "icmp"))).unwrap(),
        "64500,1\n"
    );
    assert_eq!(
        fs::read_to_string(as_table(&layout.seeds("ISP"))).unwrap(),
        "64500,1\n"
    );
    assert_eq!(
        fs::read_to_string(as_table(&layout.candidates_scanned("6Tree", "ISP"))).unwrap(),
        ""
    );
}

#[test]
fn test_missing_seed_file_fails_before_running() {
    let fixture = Fixture::new();
    fs::remove_file(fixture.path("gen/generation_2024_ISP/seeds/responsive-addresses.txt"))
        .unwrap();

    let err = Pipeline::new(fixture.config("work")).run().unwrap_err();

    assert!(matches!(
        err,
        PipelineError::Graph(GraphError::MissingInput { .. })
    ));
    assert!(!fixture.path("work").exists());
}

#[test]
fn test_report_json_written() {
    let fixture = Fixture::new();
    let report = fixture.path("out/report.json");
    let config = fixture.config("work").with_report(report.clone());
    Pipeline::new(config).run().unwrap();

    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(report).unwrap()).unwrap();
    let rows = json["rows"].as_array().unwrap();
    assert_eq!(rows.len(), 4);
    assert_eq!(rows[0]["algorithm"], "6Hit");
    assert_eq!(rows[0]["responsive"], 1);
}
