//! Storage location and default-revision configuration

use std::path::PathBuf;

/// Version label meaning "use the configured default revision".
pub const USE_DEFAULT_REVISION: &str = "##GITHUB##";

/// Environment variable holding the storage base directory.
pub const PATH_ENV: &str = "TRUENO_RESULTS_PATH";

/// Environment variable holding the short source revision.
pub const REVISION_ENV: &str = "GIT_SHORT_REVISION";

/// Where result logs live and which revision labels default saves.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    base_dir: Option<PathBuf>,
    default_revision: Option<String>,
}

impl Config {
    /// Empty configuration: logs in the working directory, no default revision.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read configuration from the process environment.
    ///
    /// `GIT_SHORT_REVISION` falls back to the value present at compile time.
    #[must_use]
    pub fn from_env() -> Self {
        let base_dir = std::env::var_os(PATH_ENV).map(PathBuf::from);
        let default_revision = std::env::var(REVISION_ENV)
            .ok()
            .or_else(|| option_env!("GIT_SHORT_REVISION").map(str::to_string))
            .filter(|r| !r.is_empty());
        Self {
            base_dir,
            default_revision,
        }
    }

    /// Set the base directory for storage files.
    #[must_use]
    pub fn base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }

    /// Set the revision substituted for [`USE_DEFAULT_REVISION`].
    #[must_use]
    pub fn default_revision(mut self, revision: impl Into<String>) -> Self {
        self.default_revision = Some(revision.into());
        self
    }

    /// Storage file for the experiment called `name`.
    #[must_use]
    pub fn storage_path(&self, name: &str) -> PathBuf {
        let file = format!("{name}.json");
        match &self.base_dir {
            Some(dir) => dir.join(file),
            None => PathBuf::from(file),
        }
    }

    /// Effective version label for a save.
    ///
    /// The sentinel is replaced by the default revision when one is configured,
    /// otherwise it is kept verbatim.
    #[must_use]
    pub fn resolve_version(&self, version: &str) -> String {
        match (&self.default_revision, version == USE_DEFAULT_REVISION) {
            (Some(revision), true) => revision.clone(),
            _ => version.to_string(),
        }
    }

    /// Path of a benchmark input file.
    ///
    /// Without a base directory this is `<name>.aig`; otherwise
    /// `<base>/benchmarks<path_type>/<name>.<filetype>`.
    #[must_use]
    pub fn benchmark_path(&self, name: &str, path_type: &str, filetype: &str) -> PathBuf {
        match &self.base_dir {
            Some(dir) => dir
                .join(format!("benchmarks{path_type}"))
                .join(format!("{name}.{filetype}")),
            None => PathBuf::from(format!("{name}.aig")),
        }
    }
}
