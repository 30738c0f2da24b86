//! Run configuration shared by every document of a run

use crate::classifier::ClassifierOptions;
use crate::error::SplitError;
use crate::merge::MergePolicy;
use std::path::{Path, PathBuf};

/// Suffix of the per-document output directory
pub const OUTPUT_DIR_SUFFIX: &str = "_split";

#[derive(Debug, Clone, Default)]
pub struct SplitConfig {
    pub policy: MergePolicy,
    pub classifier: ClassifierOptions,
    /// Parent of the `<name>_split` directories; next to each source when unset
    pub output_dir: Option<PathBuf>,
    /// Keep per-page observations in the document report
    pub verbose: bool,
    /// Worker threads for batch runs; one per CPU when unset
    pub jobs: Option<usize>,
}

impl SplitConfig {
    pub fn new(min_pages: u32, merge_gap: u32) -> Result<Self, SplitError> {
        Ok(Self {
            policy: MergePolicy::new(min_pages, merge_gap)?,
            ..Self::default()
        })
    }

    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(output_dir.into());
        self
    }

    pub fn with_jobs(mut self, jobs: usize) -> Result<Self, SplitError> {
        if jobs == 0 {
            return Err(SplitError::ConfigError("jobs must be >= 1".into()));
        }
        self.jobs = Some(jobs);
        Ok(self)
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// `<output_dir or source parent>/<source stem>_split`
    pub fn output_dir_for(&self, source: &Path) -> PathBuf {
        let stem = source
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document".to_string());
        let parent = match &self.output_dir {
            Some(dir) => dir.clone(),
            None => source
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_default(),
        };
        parent.join(format!("{}{}", stem, OUTPUT_DIR_SUFFIX))
    }
}
