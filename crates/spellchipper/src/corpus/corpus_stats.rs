//! # Corpus Statistics
//!
//! A corpus directory holds `stats.json` and shard files `corpus_<idx>.txt`,
//! one sentence per line. Every shard holds `lines_per_file` lines except
//! the last, which holds the remainder.

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::errors::{SCResult, SpellchipperError};

/// The statistics file name.
pub const STATS_FILE_NAME: &str = "stats.json";

/// The shard file name prefix.
pub const SHARD_PREFIX: &str = "corpus_";

/// The shard file name suffix.
pub const SHARD_SUFFIX: &str = ".txt";

/// Precomputed line counts for a sharded corpus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpusStats {
    /// Lines in every shard but the last.
    pub lines_per_file: usize,

    /// Lines across all shards.
    pub total_lines: usize,

    /// The number of shards.
    pub num_files: usize,
}

impl CorpusStats {
    /// Build stats for `total_lines` split into shards of `lines_per_file`.
    pub fn for_lines(
        total_lines: usize,
        lines_per_file: usize,
    ) -> Self {
        Self {
            lines_per_file,
            total_lines,
            num_files: total_lines.div_ceil(lines_per_file.max(1)),
        }
    }

    /// Load `stats.json` from a corpus directory.
    pub fn load<P: AsRef<Path>>(corpus_dir: P) -> SCResult<Self> {
        let path = corpus_dir.as_ref().join(STATS_FILE_NAME);
        if !path.is_file() {
            return Err(SpellchipperError::MissingCorpus { path });
        }
        let stats: Self = serde_json::from_str(&fs::read_to_string(&path)?)?;
        stats.validate()?;
        Ok(stats)
    }

    /// Write `stats.json` into a corpus directory.
    pub fn save<P: AsRef<Path>>(
        &self,
        corpus_dir: P,
    ) -> SCResult<()> {
        let path = corpus_dir.as_ref().join(STATS_FILE_NAME);
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Check the counts are consistent.
    pub fn validate(&self) -> SCResult<()> {
        if self.lines_per_file == 0 || self.num_files == 0 || self.total_lines == 0 {
            return Err(SpellchipperError::CorpusMismatch(format!(
                "empty corpus stats: {self:?}"
            )));
        }
        let sum: usize = self.file_sizes().iter().sum();
        if sum != self.total_lines {
            return Err(SpellchipperError::CorpusMismatch(format!(
                "shard sizes sum to {sum}, expected total_lines {}",
                self.total_lines
            )));
        }
        Ok(())
    }

    /// The line count of each shard.
    pub fn file_sizes(&self) -> Vec<usize> {
        let remainder = self.total_lines % self.lines_per_file.max(1);
        (0..self.num_files)
            .map(|idx| {
                if idx + 1 == self.num_files && remainder > 0 {
                    remainder
                } else {
                    self.lines_per_file
                }
            })
            .collect()
    }

    /// Map a global line index to `(shard, line)`.
    pub fn locate(
        &self,
        index: usize,
    ) -> (usize, usize) {
        let lines_per_file = self.lines_per_file.max(1);
        let shard = (index / lines_per_file).min(self.num_files.saturating_sub(1));
        (shard, index - shard * lines_per_file)
    }
}

/// Format a shard file name.
pub fn shard_file_name(index: usize) -> String {
    format!("{SHARD_PREFIX}{index}{SHARD_SUFFIX}")
}

/// Parse the index of a shard file name, if it is one.
pub fn parse_shard_index(name: &str) -> Option<usize> {
    name.strip_prefix(SHARD_PREFIX)?
        .strip_suffix(SHARD_SUFFIX)?
        .parse()
        .ok()
}

/// List the shard files of a corpus directory, sorted by numeric index.
pub fn list_shard_paths<P: AsRef<Path>>(corpus_dir: P) -> SCResult<Vec<PathBuf>> {
    let corpus_dir = corpus_dir.as_ref();
    if !corpus_dir.is_dir() {
        return Err(SpellchipperError::MissingCorpus {
            path: corpus_dir.to_path_buf(),
        });
    }

    let mut shards = Vec::new();
    for entry in fs::read_dir(corpus_dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = entry.file_name();
        if let Some(index) = name.to_str().and_then(parse_shard_index) {
            shards.push((index, entry.path()));
        }
    }

    shards.sort();
    Ok(shards.into_iter().map(|(_, path)| path).collect())
}
