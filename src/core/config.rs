use std::path::PathBuf;
use std::time::Duration;

/// Engine-wide tunables, set once when a storage location is opened and
/// shared by every writer and reader against it.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding the database file, schema file, and lock file.
    pub storage_path: PathBuf,

    /// When true, every commit fsyncs the database file before returning.
    /// When false, commits are faster but a crash can lose the last commit.
    pub acid: bool,

    /// Target number of sentences per frame. Zero means each field value is
    /// indexed as a single frame regardless of length.
    pub frame_size: usize,

    /// Whether the default analyzer folds token case. Disabling this keeps
    /// case-sensitive vocabulary entries distinct.
    pub fold_case: bool,

    /// Minimum fraction of a token's occurrences that must share a case
    /// variant before that variant is treated as the canonical one.
    pub fold_threshold: f32,

    /// Text encoding used when decoding raw bytes handed to the writer.
    pub encoding: String,

    /// How long `IndexWriter::open` waits to acquire the writer lock before
    /// giving up. `None` waits forever.
    pub writer_lock_timeout: Option<Duration>,

    /// Soft cap on concurrently open `IndexReader`s sharing a connection pool.
    pub max_readers: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            storage_path: PathBuf::new(),
            acid: true,
            frame_size: 5,
            fold_case: true,
            fold_threshold: 0.7,
            encoding: "utf-8".to_string(),
            writer_lock_timeout: Some(Duration::from_secs(10)),
            max_readers: 8,
        }
    }
}

impl Config {
    pub fn new(storage_path: impl Into<PathBuf>) -> Self {
        Config { storage_path: storage_path.into(), ..Default::default() }
    }
}
