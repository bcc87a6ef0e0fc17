// Tue Jan 13 2026 - Alex

use crate::graph::error::GraphError;
use indexmap::IndexMap;
use std::path::{Path, PathBuf};

pub const FULL_CATEGORY: &str = "Full";

const SEED_DIR: &str = "seeds";
const SEED_FILE: &str = "responsive-addresses.txt";

/// Algorithm name → glob below `<root>/generation*/results/`.
pub const DEFAULT_ALGORITHMS: &[(&str, &str)] = &[
    ("6Hit", "6Hit/candidates*"),
    ("6Scan", "6Scan/candidates*"),
    ("6Tree", "6Tree/targets_combined.txt"),
    ("DET", "DET/scan_input_combined.txt"),
    ("6Forest", "6Forest/results*"),
    ("6GAN", "6GAN/candidates_combined.txt"),
    ("6GCVAE", "6GCVAE/results*"),
    ("6Graph", "6Graph/results*"),
    ("6VecLM", "6VecLM/results*"),
    ("Entropy", "Entropy/results*"),
];

pub fn default_algorithms() -> IndexMap<String, String> {
    DEFAULT_ALGORITHMS
        .iter()
        .map(|(name, pattern)| (name.to_string(), pattern.to_string()))
        .collect()
}

/// `generation_<...>_<cat>` yields `<cat>`; a name without `_` is the full set.
pub fn category_of(generation_dir: &str) -> String {
    match generation_dir.rsplit_once('_') {
        Some((_, last)) if !last.is_empty() => last.to_string(),
        _ => FULL_CATEGORY.to_string(),
    }
}

#[derive(Debug, Clone, Default)]
pub struct Discovery {
    candidates: IndexMap<(String, String), PathBuf>,
    seeds: IndexMap<String, PathBuf>,
    duplicates: usize,
}

impl Discovery {
    fn add(&mut self, root: &Path, algorithm: &str, path: PathBuf) {
        let generation_dir = match path
            .strip_prefix(root)
            .ok()
            .and_then(|rel| rel.components().next())
        {
            Some(component) => component.as_os_str().to_string_lossy().into_owned(),
            None => return,
        };
        let category = category_of(&generation_dir);
        let key = (algorithm.to_string(), category.clone());

        if let Some(kept) = self.candidates.get(&key) {
            log::warn!(
                "Duplicate candidates for ({}, {}): keeping {}, ignoring {}",
                algorithm,
                category,
                kept.display(),
                path.display()
            );
            self.duplicates += 1;
            return;
        }

        let seed = root.join(&generation_dir).join(SEED_DIR).join(SEED_FILE);
        match self.seeds.get(&category) {
            Some(existing) if *existing != seed => log::warn!(
                "Category {} has seeds in several roots, using {}",
                category,
                existing.display()
            ),
            Some(_) => {}
            None => {
                self.seeds.insert(category, seed);
            }
        }

        log::debug!("Found {} candidates at {}", algorithm, path.display());
        self.candidates.insert(key, path);
    }

    pub fn candidate(&self, algorithm: &str, category: &str) -> Option<&Path> {
        self.candidates
            .get(&(algorithm.to_string(), category.to_string()))
            .map(PathBuf::as_path)
    }

    pub fn candidates(&self) -> impl Iterator<Item = (&str, &str, &Path)> {
        self.candidates
            .iter()
            .map(|((algo, cat), path)| (algo.as_str(), cat.as_str(), path.as_path()))
    }

    /// Categories in discovery order.
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.seeds.keys().map(String::as_str)
    }

    pub fn seed(&self, category: &str) -> Option<&Path> {
        self.seeds.get(category).map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn duplicates(&self) -> usize {
        self.duplicates
    }
}

/// Globs every algorithm pattern under every root. Roots are searched in the
/// order given, matches within a root in lexicographic order, and the first
/// match for an (algorithm, category) pair wins.
pub fn discover(
    roots: &[PathBuf],
    algorithms: &IndexMap<String, String>,
) -> Result<Discovery, GraphError> {
    let mut discovery = Discovery::default();

    for root in roots {
        let base = glob::Pattern::escape(&root.to_string_lossy());

        for (algorithm, pattern) in algorithms {
            let full = format!("{}/generation*/results/{}", base, pattern);
            let entries = glob::glob(&full).map_err(|source| GraphError::Pattern {
                pattern: full.clone(),
                source,
            })?;

            let mut paths = Vec::new();
            for entry in entries {
                let path = entry.map_err(|e| GraphError::Walk {
                    path: e.path().to_path_buf(),
                    source: e.into_error(),
                })?;
                if path.is_file() {
                    paths.push(path);
                }
            }
            paths.sort();

            for path in paths {
                discovery.add(root, algorithm, path);
            }
        }
    }

    log::info!(
        "Discovered {} candidate sets in {} categories",
        discovery.len(),
        discovery.seeds.len()
    );
    Ok(discovery)
}
