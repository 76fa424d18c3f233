use std::path::{Path, PathBuf};

/// Per-user directory every store operation is scoped to.
///
/// Supplied by the caller's identity context and never created or validated
/// by the stores themselves.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResourceRoot(PathBuf);

impl ResourceRoot {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self(path.into())
    }

    pub fn path(&self) -> &Path {
        &self.0
    }

    pub fn join<P: AsRef<Path>>(&self, segment: P) -> PathBuf {
        self.0.join(segment)
    }
}

impl AsRef<Path> for ResourceRoot {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}
