//! Reads and decodes the run summary from disk.

use std::io;
use std::path::{Path, PathBuf};

use crate::collector::traits::FileSystem;
use crate::report::{Report, parse_report};

/// Failure to produce a [`Report`].
///
/// All variants are recoverable: the next scrape simply tries again.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The summary file does not exist (agent never ran, or path is wrong).
    #[error("report {} not found", .path.display())]
    NotFound { path: PathBuf },

    /// The summary file exists but could not be read.
    #[error("failed to read report {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The content is not a valid run summary.
    #[error("failed to decode report {}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

impl LoadError {
    /// Path of the report that failed to load.
    pub fn path(&self) -> &Path {
        match self {
            LoadError::NotFound { path }
            | LoadError::Io { path, .. }
            | LoadError::Decode { path, .. } => path,
        }
    }
}

/// Loads the run summary from a fixed path on every call.
///
/// Nothing is cached; each `load` reads the file in full and decodes a fresh
/// [`Report`].
#[derive(Debug, Clone)]
pub struct ReportLoader<F: FileSystem> {
    fs: F,
    path: PathBuf,
}

impl<F: FileSystem> ReportLoader<F> {
    /// Creates a loader reading `path` through `fs`.
    pub fn new(fs: F, path: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            path: path.into(),
        }
    }

    /// Path of the summary file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Report, LoadError> {
        let content = self.fs.read_to_string(&self.path).map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                LoadError::NotFound {
                    path: self.path.clone(),
                }
            } else {
                LoadError::Io {
                    path: self.path.clone(),
                    source: e,
                }
            }
        })?;

        parse_report(&content).map_err(|source| LoadError::Decode {
            path: self.path.clone(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::RealFs;
    use crate::collector::mock::MockFs;

    #[test]
    fn test_load_typical_report() {
        let fs = MockFs::typical_run();
        let loader = ReportLoader::new(fs, MockFs::REPORT_PATH);
        let report = loader.load().unwrap();
        assert_eq!(report.resources.total, 210.0);
        assert_eq!(report.time.last_run, 1_600_000_000.0);
    }

    #[test]
    fn test_load_missing_file() {
        let loader = ReportLoader::new(MockFs::new(), "/var/lib/puppet/missing.yaml");
        match loader.load() {
            Err(LoadError::NotFound { path }) => {
                assert_eq!(path, Path::new("/var/lib/puppet/missing.yaml"))
            }
            other => panic!("expected NotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_load_unreadable_file() {
        let fs = MockFs::typical_run()
            .with_read_error(MockFs::REPORT_PATH, io::ErrorKind::PermissionDenied);
        let err = ReportLoader::new(fs, MockFs::REPORT_PATH).load().unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
        assert_eq!(err.path(), Path::new(MockFs::REPORT_PATH));
    }

    #[test]
    fn test_load_malformed_file() {
        let fs = MockFs::malformed_run();
        let err = ReportLoader::new(fs, MockFs::REPORT_PATH).load().unwrap_err();
        assert!(matches!(err, LoadError::Decode { .. }));
        assert!(err.to_string().contains("failed to decode report"));
    }

    #[test]
    fn test_load_partial_report() {
        let fs = MockFs::partial_run();
        let report = ReportLoader::new(fs, MockFs::REPORT_PATH).load().unwrap();
        assert_eq!(report.resources.total, 12.0);
        assert_eq!(report.resources.corrective_change, 0.0);
        assert_eq!(report.time.plugin_sync, 0.0);
    }

    #[test]
    fn test_load_from_real_fs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("last_run_summary.yaml");
        std::fs::write(&path, "resources:\n  failed: 3\n").unwrap();

        let loader = ReportLoader::new(RealFs::new(), &path);
        assert_eq!(loader.load().unwrap().resources.failed, 3.0);

        std::fs::remove_file(&path).unwrap();
        assert!(matches!(loader.load(), Err(LoadError::NotFound { .. })));
    }
}
