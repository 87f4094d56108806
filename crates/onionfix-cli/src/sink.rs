use onionfix::{Shard, ShardSink};
use std::{
    fs, io,
    path::{Path, PathBuf},
};

/// File extension of every shard file.
pub const SHARD_EXTENSION: &str = "addr";

/// Writes each shard to `{dir}/{shard_id}.addr` as newline-separated addresses.
///
/// Files are written in one call per shard; a shard is either fully written
/// or not at all from this sink's point of view. Shards of a cancelled run are
/// never handed to the sink, but files written before the failure remain.
#[derive(Debug, Clone)]
pub struct FileSink {
    dir: PathBuf,
}

impl FileSink {
    /// Creates `dir` (and parents) if needed.
    pub fn create(dir: impl Into<PathBuf>) -> io::Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, shard_id: &str) -> PathBuf {
        self.dir.join(format!("{shard_id}.{SHARD_EXTENSION}"))
    }
}

impl ShardSink for FileSink {
    type Error = io::Error;

    fn persist(&self, shard: Shard) -> io::Result<()> {
        let path = self.path_for(&shard.id());
        fs::write(&path, shard.to_text())
    }
}
