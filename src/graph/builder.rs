// Tue Jan 13 2026 - Alex

use crate::engine::task::Operation;
use crate::graph::discovery::{self, Discovery};
use crate::graph::error::GraphError;
use crate::graph::layout::{as_table, WorkLayout};
use crate::graph::task_graph::{TaskDef, TaskGraph};
use crate::graph::Combination;
use crate::store;
use crate::transform::TransformKind;
use indexmap::IndexMap;
use std::path::{Path, PathBuf};

/// A protocol and the scan-result file it was read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanResult {
    pub protocol: String,
    pub path: PathBuf,
}

impl ScanResult {
    pub fn from_path(path: &Path) -> Result<Self, GraphError> {
        let protocol = path
            .extension()
            .and_then(|ext| ext.to_str())
            .filter(|ext| !ext.is_empty())
            .ok_or_else(|| GraphError::NoProtocol(path.to_path_buf()))?;

        Ok(Self {
            protocol: protocol.to_string(),
            path: path.to_path_buf(),
        })
    }
}

/// The validated task graph and the combinations its terminal sets cover.
#[derive(Debug, Clone)]
pub struct Plan {
    pub graph: TaskGraph,
    pub layout: WorkLayout,
    pub combinations: Vec<Combination>,
    pub protocols: Vec<String>,
    pub categories: Vec<String>,
    /// Normalized candidate sets older than the candidate file they came from.
    /// They are reused as-is; delete them to rebuild.
    pub stale_outputs: Vec<PathBuf>,
}

pub struct GraphBuilder {
    layout: WorkLayout,
    scan_results: Vec<PathBuf>,
    scan_file: PathBuf,
    blocklist: PathBuf,
    algorithms: IndexMap<String, String>,
    ip_field: usize,
    skip_header: bool,
    aggregate_ases: bool,
    defs: Vec<TaskDef>,
}

impl GraphBuilder {
    pub fn new(
        work_dir: impl Into<PathBuf>,
        scan_file: impl Into<PathBuf>,
        blocklist: impl Into<PathBuf>,
    ) -> Self {
        Self {
            layout: WorkLayout::new(work_dir),
            scan_results: Vec::new(),
            scan_file: scan_file.into(),
            blocklist: blocklist.into(),
            algorithms: discovery::default_algorithms(),
            ip_field: 0,
            skip_header: true,
            aggregate_ases: false,
            defs: Vec::new(),
        }
    }

    pub fn with_scan_results(mut self, paths: Vec<PathBuf>) -> Self {
        self.scan_results = paths;
        self
    }

    pub fn with_algorithms(mut self, algorithms: IndexMap<String, String>) -> Self {
        self.algorithms = algorithms;
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

    pub fn with_as_aggregation(mut self, enabled: bool) -> Self {
        self.aggregate_ases = enabled;
        self
    }

    fn push(&mut self, op: Operation, inputs: Vec<PathBuf>, output: PathBuf, label: String) {
        self.defs.push(TaskDef::new(op, inputs, output).with_label(label));
    }

    fn transform(&mut self, kind: TransformKind, inputs: Vec<PathBuf>, output: PathBuf, label: String) {
        self.push(Operation::Transform(kind), inputs, output, label);
    }

    fn scan_results(&self) -> Result<Vec<ScanResult>, GraphError> {
        let mut seen: IndexMap<String, PathBuf> = IndexMap::new();
        let mut results = Vec::with_capacity(self.scan_results.len());

        for path in &self.scan_results {
            let result = ScanResult::from_path(path)?;
            if let Some(first) = seen.get(&result.protocol) {
                return Err(GraphError::DuplicateProtocol {
                    protocol: result.protocol,
                    first: first.clone(),
                    second: path.clone(),
                });
            }
            seen.insert(result.protocol.clone(), path.clone());
            results.push(result);
        }
        Ok(results)
    }

    /// Expands the algorithm × category × protocol product into tasks and
    /// validates the resulting graph.
    pub fn build(mut self, discovery: &Discovery) -> Result<Plan, GraphError> {
        let scans = self.scan_results()?;
        let categories: Vec<String> = discovery.categories().map(str::to_string).collect();
        let algorithms: Vec<String> = self.algorithms.keys().cloned().collect();
        let layout = self.layout.clone();

        if discovery.is_empty() {
            log::warn!("No candidate sets discovered; only scan inputs will be prepared");
        }

        // Per-protocol responsive sets.
        for scan in &scans {
            let iponly = layout.iponly(&scan.path);
            let filtered = layout.iponly_filtered(&scan.path);
            self.transform(
                TransformKind::StripMetadata {
                    field: self.ip_field,
                    skip_header: self.skip_header,
                },
                vec![scan.path.clone()],
                iponly.clone(),
                format!("strip {} scan", scan.protocol),
            );
            self.transform(
                TransformKind::BlocklistFilter,
                vec![iponly, self.blocklist.clone()],
                filtered.clone(),
                format!("filter {} scan", scan.protocol),
            );
            self.transform(
                TransformKind::NormalizeDedupe,
                vec![filtered],
                layout.responsive(&scan.path),
                format!("normalize {} scan", scan.protocol),
            );
        }

        // Global scan set.
        let scan_filtered = layout.scan_filtered(&self.scan_file);
        let scan_normalized = layout.scan_normalized(&self.scan_file);
        self.transform(
            TransformKind::BlocklistFilter,
            vec![self.scan_file.clone(), self.blocklist.clone()],
            scan_filtered.clone(),
            "filter global scan".to_string(),
        );
        self.transform(
            TransformKind::NormalizeDedupe,
            vec![scan_filtered],
            scan_normalized.clone(),
            "normalize global scan".to_string(),
        );

        for category in &categories {
            if let Some(seed) = discovery.seed(category) {
                self.transform(
                    TransformKind::NormalizeDedupe,
                    vec![seed.to_path_buf()],
                    layout.seeds(category),
                    format!("normalize {} seeds", category),
                );
            }
        }

        let mut combinations = Vec::new();
        let mut stale_outputs = Vec::new();

        for algorithm in &algorithms {
            for category in &categories {
                let key = format!("{}/{}", algorithm, category);
                let sorted = layout.candidates(algorithm, category);
                let unseeded = layout.candidates_unseeded(algorithm, category);
                let scanned = layout.candidates_scanned(algorithm, category);

                let placeholder = match discovery.candidate(algorithm, category) {
                    Some(candidate) => {
                        if store::is_stale(&sorted, candidate) {
                            log::warn!(
                                "{} is older than {}; delete it to pick up the new candidates",
                                sorted.display(),
                                candidate.display()
                            );
                            stale_outputs.push(sorted.clone());
                        }
                        self.transform(
                            TransformKind::NormalizeDedupe,
                            vec![candidate.to_path_buf()],
                            sorted.clone(),
                            format!("normalize {} candidates", key),
                        );
                        self.transform(
                            TransformKind::Difference,
                            vec![sorted, layout.seeds(category)],
                            unseeded.clone(),
                            format!("remove seeds from {}", key),
                        );
                        self.transform(
                            TransformKind::Intersect,
                            vec![unseeded, scan_normalized.clone()],
                            scanned.clone(),
                            format!("intersect {} with scan", key),
                        );
                        false
                    }
                    None => {
                        log::debug!("No candidates for {}, using empty sets", key);
                        for path in [sorted, unseeded, scanned.clone()] {
                            self.push(
                                Operation::Placeholder,
                                Vec::new(),
                                path,
                                format!("empty {} candidates", key),
                            );
                        }
                        true
                    }
                };

                for scan in &scans {
                    let results = layout.results(algorithm, category, &scan.protocol);
                    self.transform(
                        TransformKind::Intersect,
                        vec![scanned.clone(), layout.responsive(&scan.path)],
                        results.clone(),
                        format!("{} responsive over {}", key, scan.protocol),
                    );
                    if self.aggregate_ases {
                        self.aggregate(results, format!("ASes of {} over {}", key, scan.protocol));
                    }
                    combinations.push(Combination {
                        protocol: scan.protocol.clone(),
                        algorithm: algorithm.clone(),
                        category: category.clone(),
                        placeholder,
                    });
                }

                if self.aggregate_ases {
                    self.aggregate(scanned, format!("ASes of {} candidates", key));
                }
            }
        }

        if self.aggregate_ases {
            for category in &categories {
                self.aggregate(layout.seeds(category), format!("ASes of {} seeds", category));
            }
        }

        let graph = TaskGraph::build(std::mem::take(&mut self.defs))?;
        log::debug!(
            "Built {} tasks in {} stages for {} combinations",
            graph.len(),
            graph.stage_count(),
            combinations.len()
        );

        Ok(Plan {
            graph,
            layout,
            combinations,
            protocols: scans.into_iter().map(|s| s.protocol).collect(),
            categories,
            stale_outputs,
        })
    }

    fn aggregate(&mut self, set: PathBuf, label: String) {
        let output = as_table(&set);
        self.push(Operation::AsAggregate, vec![set], output, label);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::discovery::discover;
    use std::fs;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }

    fn algorithms() -> IndexMap<String, String> {
        let mut algorithms = IndexMap::new();
        algorithms.insert("6Hit".to_string(), "6Hit/candidates*".to_string());
        algorithms.insert("6Tree".to_string(), "6Tree/targets_combined.txt".to_string());
        algorithms
    }

    #[test]
    fn test_missing_combination_gets_placeholders() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("gen");
        touch(&root.join("generation_ISP/results/6Hit/candidates.txt"));

        let discovery = discover(&[root], &algorithms()).unwrap();
        let plan = GraphBuilder::new(dir.path().join("work"), "/in/scan.txt", "/in/apd.txt")
            .with_scan_results(vec![PathBuf::from("/in/res.icmp"), PathBuf::from("/in/res.tcp80")])
            .with_algorithms(algorithms())
            .build(&discovery)
            .unwrap();

        let layout = &plan.layout;
        let placeholder = plan
            .graph
            .producer_of(&layout.candidates_scanned("6Tree", "ISP"))
            .unwrap();
        assert_eq!(placeholder.op(), Operation::Placeholder);
        assert_eq!(placeholder.stage(), 0);

        let result = plan
            .graph
            .producer_of(&layout.results("6Tree", "ISP", "tcp80"))
            .unwrap();
        assert_eq!(result.op(), Operation::Transform(TransformKind::Intersect));

        // 3 per protocol, 2 global, 1 seed, 3 + 3 candidate chains, 2 x 2 results
        assert_eq!(plan.graph.len(), 6 + 2 + 1 + 6 + 4);
        assert_eq!(plan.combinations.len(), 4);
        assert!(plan.combinations.iter().any(|c| c.placeholder && c.algorithm == "6Tree"));
    }

    #[test]
    fn test_as_aggregation_adds_tables() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("gen");
        touch(&root.join("generation/results/6Hit/candidates.txt"));

        let mut only_hit = IndexMap::new();
        only_hit.insert("6Hit".to_string(), "6Hit/candidates*".to_string());
        let discovery = discover(&[root], &only_hit).unwrap();
        let plan = GraphBuilder::new(dir.path().join("work"), "/in/scan.txt", "/in/apd.txt")
            .with_scan_results(vec![PathBuf::from("/in/res.icmp")])
            .with_algorithms(only_hit)
            .with_as_aggregation(true)
            .build(&discovery)
            .unwrap();

        let results = plan.layout.results("6Hit", "Full", "icmp");
        let table = plan.graph.producer_of(&as_table(&results)).unwrap();
        assert_eq!(table.op(), Operation::AsAggregate);
        assert_eq!(table.inputs(), &[results]);
        assert!(plan
            .graph
            .producer_of(&as_table(&plan.layout.seeds("Full")))
            .is_some());
    }

    #[test]
    fn test_duplicate_protocol_rejected() {
        let builder = GraphBuilder::new("/w", "/in/scan.txt", "/in/apd.txt").with_scan_results(vec![
            PathBuf::from("/a/res.icmp"),
            PathBuf::from("/b/res.icmp"),
        ]);

        let err = builder.build(&Discovery::default()).unwrap_err();
        assert!(matches!(err, GraphError::DuplicateProtocol { .. }));
    }

    #[test]
    fn test_scan_result_without_extension_rejected() {
        assert!(matches!(
            ScanResult::from_path(Path::new("/in/results")),
            Err(GraphError::NoProtocol(_))
        ));
    }

    #[test]
    fn test_stale_candidate_output_reported() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("gen");
        let candidate = root.join("generation_ISP/results/6Hit/candidates.txt");
        touch(&candidate);

        let discovery = discover(&[root], &algorithms()).unwrap();
        let builder = || {
            GraphBuilder::new(dir.path().join("work"), "/in/scan.txt", "/in/apd.txt")
                .with_scan_results(vec![PathBuf::from("/in/res.icmp")])
                .with_algorithms(algorithms())
        };

        let sorted = builder().build(&discovery).unwrap().layout.candidates("6Hit", "ISP");
        touch(&sorted);
        fs::File::options()
            .write(true)
            .open(&sorted)
            .unwrap()
            .set_modified(std::time::UNIX_EPOCH + std::time::Duration::from_secs(1000))
            .unwrap();

        let plan = builder().build(&discovery).unwrap();
        assert_eq!(plan.stale_outputs, vec![sorted]);
    }
}
