//! Package resolution
//!
//! Maps validated references to directories under the package root and
//! enumerates the files that belong to each package.

mod discovery;
mod repository;

pub use discovery::entry_names;
pub use repository::PackageRepository;

/// Ordered file names belonging to one package directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileManifest {
    names: Vec<String>,
}

impl FileManifest {
    pub fn new(mut names: Vec<String>) -> Self {
        names.sort();
        Self { names }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}
