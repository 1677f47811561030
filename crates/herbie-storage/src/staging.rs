use std::path::{Path, PathBuf};

/// A reserved file inside the archive directory, waiting to be written and published.
///
/// The file is created empty under a random name when staged. It is not removed
/// on drop: a staged file that never gets published stays on disk for inspection.
#[derive(Debug)]
pub struct StagedFile {
    path: PathBuf,
}

impl StagedFile {
    pub(crate) fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
