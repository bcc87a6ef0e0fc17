// Tue Jan 13 2026 - Alex

use std::ffi::OsString;
use std::path::{Path, PathBuf};

pub const AS_SUFFIX: &str = "ases";

/// File naming inside the work directory. Every intermediate and terminal set
/// has exactly one path here, which is also its task identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkLayout {
    root: PathBuf,
}

impl WorkLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn iponly(&self, scan_result: &Path) -> PathBuf {
        self.named(scan_result, ".iponly")
    }

    pub fn iponly_filtered(&self, scan_result: &Path) -> PathBuf {
        self.named(scan_result, ".iponly.apd")
    }

    /// Responsive set of one protocol, filtered and normalised.
    pub fn responsive(&self, scan_result: &Path) -> PathBuf {
        self.named(scan_result, ".iponly.apd.sortu")
    }

    pub fn scan_filtered(&self, scan_file: &Path) -> PathBuf {
        self.named(scan_file, ".apd")
    }

    pub fn scan_normalized(&self, scan_file: &Path) -> PathBuf {
        self.named(scan_file, ".apd.sortu")
    }

    pub fn seeds(&self, category: &str) -> PathBuf {
        self.root.join(format!("responsive-addresses_{}.txt", category))
    }

    pub fn candidates(&self, algorithm: &str, category: &str) -> PathBuf {
        self.root
            .join(format!("candidates_{}_{}.txt.sortu", algorithm, category))
    }

    pub fn candidates_unseeded(&self, algorithm: &str, category: &str) -> PathBuf {
        self.root
            .join(format!("candidates_{}_{}.txt.sortu.noseed", algorithm, category))
    }

    pub fn candidates_scanned(&self, algorithm: &str, category: &str) -> PathBuf {
        self.root
            .join(format!("candidates_{}_{}.txt.sortu.noseed.apd", algorithm, category))
    }

    pub fn results(&self, algorithm: &str, category: &str, protocol: &str) -> PathBuf {
        self.root
            .join(format!("results_{}_{}_{}.txt", algorithm, category, protocol))
    }

    fn named(&self, source: &Path, suffix: &str) -> PathBuf {
        let mut name: OsString = source
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(suffix);
        self.root.join(name)
    }
}

/// `<set>.ases` next to the aggregated set.
pub fn as_table(set: &Path) -> PathBuf {
    let mut name = set.as_os_str().to_os_string();
    name.push(".");
    name.push(AS_SUFFIX);
    PathBuf::from(name)
}
