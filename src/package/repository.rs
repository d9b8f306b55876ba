//! Package repository rooted at `<root>/packages`.
//!
//! This is the only place that decides whether a package exists and the only
//! place allowed to create directories under the package root.

use anyhow::{Context, Result};
use log::debug;
use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};

use crate::error::Error;
use crate::language::Language;
use crate::reference::PackageReference;
use crate::runtime::{Runtime, is_not_found};

use super::{FileManifest, entry_names};

/// Repository of packages stored as `<packages_root>/<language>/<name>/<files...>`.
pub struct PackageRepository<'a, R: Runtime> {
    runtime: &'a R,
    packages_root: PathBuf,
}

impl<'a, R: Runtime> PackageRepository<'a, R> {
    pub fn new(runtime: &'a R, packages_root: PathBuf) -> Self {
        Self {
            runtime,
            packages_root,
        }
    }

    /// Returns: `<packages_root>/<language>`
    pub fn language_dir(&self, language: Language) -> PathBuf {
        self.packages_root.join(language.as_str())
    }

    /// Names of all packages published for a language.
    ///
    /// A language folder that does not exist yet has no packages.
    #[tracing::instrument(skip(self))]
    pub fn list_packages(&self, language: Language) -> Result<Vec<String>> {
        let dir = self.language_dir(language);
        match entry_names(self.runtime, &dir) {
            Ok(names) => Ok(names),
            Err(e) if is_not_found(&e) => {
                debug!("Language folder {:?} does not exist", dir);
                Ok(Vec::new())
            }
            Err(e) => Err(e),
        }
    }

    /// Resolve a reference to its package directory.
    ///
    /// Existence is decided by listing the language folder, so a name only
    /// resolves if it is an actual directory entry there.
    #[tracing::instrument(skip(self))]
    pub fn resolve_package_dir(&self, reference: &PackageReference) -> Result<PathBuf> {
        let packages = self.list_packages(reference.language)?;
        if !packages.iter().any(|p| p == &reference.name) {
            debug!(
                "{} not among {} package(s) for {}",
                reference.name,
                packages.len(),
                reference.language
            );
            return Err(Error::PackageNotFound(reference.name.clone()).into());
        }

        let dir = self.language_dir(reference.language).join(&reference.name);
        if !self.runtime.is_dir(&dir) {
            debug!("{:?} is not a directory", dir);
            return Err(Error::PackageNotFound(reference.name.clone()).into());
        }
        debug!("Resolved {} to {:?}", reference, dir);
        Ok(dir)
    }

    /// List the files of a package. An empty package yields an empty manifest.
    #[tracing::instrument(skip(self))]
    pub fn list_package_files(&self, reference: &PackageReference) -> Result<FileManifest> {
        let dir = self.resolve_package_dir(reference)?;
        self.manifest_at(&dir)
    }

    /// Resolve a package and list its files in one step.
    pub fn resolve(&self, reference: &PackageReference) -> Result<(PathBuf, FileManifest)> {
        let dir = self.resolve_package_dir(reference)?;
        let manifest = self.manifest_at(&dir)?;
        Ok((dir, manifest))
    }

    /// Compute the destination for publishing `reference`, creating it if absent.
    #[tracing::instrument(skip(self))]
    pub fn publish_destination(&self, reference: &PackageReference) -> Result<PathBuf> {
        if !is_plain_name(&reference.name) {
            return Err(Error::InvalidPackageName(reference.name.clone()).into());
        }

        let dest = self.language_dir(reference.language).join(&reference.name);
        if !self.runtime.is_dir(&dest) {
            debug!("Creating package directory {:?}", dest);
            self.runtime
                .create_dir_all(&dest)
                .with_context(|| format!("Failed to create package directory {:?}", dest))?;
        }
        Ok(dest)
    }

    fn manifest_at(&self, dir: &Path) -> Result<FileManifest> {
        let names = entry_names(self.runtime, dir)
            .with_context(|| format!("Failed to list package files in {:?}", dir))?;
        Ok(FileManifest::new(names))
    }
}

/// True when `name` is exactly one normal path component.
fn is_plain_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(part)), None) if part == OsStr::new(name)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::MockRuntime;
    use mockall::predicate::eq;
    use std::io;

    fn root() -> PathBuf {
        PathBuf::from("/root/packages")
    }

    fn python_hello() -> PackageReference {
        PackageReference::new(Language::Python, "hello")
    }

    fn expect_python_packages(runtime: &mut MockRuntime, names: &'static [&'static str]) {
        runtime
            .expect_read_dir()
            .with(eq(root().join("python")))
            .returning(move |p| Ok(names.iter().map(|n| p.join(n)).collect()));
    }

    #[test]
    fn test_language_dir() {
        let runtime = MockRuntime::new();
        let repo = PackageRepository::new(&runtime, root());
        assert_eq!(
            repo.language_dir(Language::Rust),
            PathBuf::from("/root/packages/rust")
        );
    }

    #[test]
    fn test_resolve_package_dir() {
        // A listed package directory resolves under its language folder

        // --- Setup ---
        let mut runtime = MockRuntime::new();
        expect_python_packages(&mut runtime, &["grid", "hello"]);
        runtime
            .expect_is_dir()
            .with(eq(root().join("python/hello")))
            .returning(|_| true);

        // --- Execute ---
        let repo = PackageRepository::new(&runtime, root());
        let dir = repo.resolve_package_dir(&python_hello()).unwrap();

        // --- Verify ---
        assert_eq!(dir, PathBuf::from("/root/packages/python/hello"));
    }

    #[test]
    fn test_resolve_ignores_plain_files_in_language_folder() {
        // A stray file named like the package is not a package

        // --- Setup ---
        let mut runtime = MockRuntime::new();
        expect_python_packages(&mut runtime, &["hello"]);
        runtime.expect_is_dir().returning(|_| false);

        // --- Execute ---
        let repo = PackageRepository::new(&runtime, root());
        let err = repo.resolve_package_dir(&python_hello()).unwrap_err();

        // --- Verify ---
        assert_eq!(
            err.downcast_ref::<Error>(),
            Some(&Error::PackageNotFound("hello".into()))
        );
    }

    #[test]
    fn test_resolve_missing_package() {
        let mut runtime = MockRuntime::new();
        expect_python_packages(&mut runtime, &["grid"]);

        let repo = PackageRepository::new(&runtime, root());
        let err = repo.resolve_package_dir(&python_hello()).unwrap_err();
        assert_eq!(
            err.downcast_ref::<Error>(),
            Some(&Error::PackageNotFound("hello".into()))
        );
    }

    #[test]
    fn test_resolve_never_matches_parent_dir() {
        let mut runtime = MockRuntime::new();
        expect_python_packages(&mut runtime, &["grid"]);

        let repo = PackageRepository::new(&runtime, root());
        let reference = PackageReference::new(Language::Python, "..");
        let err = repo.resolve_package_dir(&reference).unwrap_err();
        assert_eq!(
            err.downcast_ref::<Error>(),
            Some(&Error::PackageNotFound("..".into()))
        );
    }

    #[test]
    fn test_resolve_with_missing_language_folder() {
        let mut runtime = MockRuntime::new();
        runtime
            .expect_read_dir()
            .returning(|_| Err(io::Error::from(io::ErrorKind::NotFound).into()));

        let repo = PackageRepository::new(&runtime, root());
        let err = repo.resolve_package_dir(&python_hello()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<Error>(),
            Some(Error::PackageNotFound(_))
        ));
    }

    #[test]
    fn test_resolve_propagates_unexpected_io_errors() {
        let mut runtime = MockRuntime::new();
        runtime
            .expect_read_dir()
            .returning(|_| Err(io::Error::from(io::ErrorKind::PermissionDenied).into()));

        let repo = PackageRepository::new(&runtime, root());
        let err = repo.resolve_package_dir(&python_hello()).unwrap_err();
        assert!(err.downcast_ref::<Error>().is_none());
    }

    #[test]
    fn test_list_package_files() {
        // Package files come back sorted regardless of directory order

        // --- Setup ---
        let mut runtime = MockRuntime::new();
        expect_python_packages(&mut runtime, &["hello"]);
        runtime.expect_is_dir().returning(|_| true);
        runtime
            .expect_read_dir()
            .with(eq(root().join("python/hello")))
            .returning(|p| Ok(vec![p.join("b.py"), p.join("a.py")]));

        // --- Execute ---
        let repo = PackageRepository::new(&runtime, root());
        let manifest = repo.list_package_files(&python_hello()).unwrap();

        // --- Verify ---
        assert_eq!(manifest.names(), ["a.py", "b.py"]);
    }

    #[test]
    fn test_list_package_files_empty_package() {
        let mut runtime = MockRuntime::new();
        expect_python_packages(&mut runtime, &["hello"]);
        runtime.expect_is_dir().returning(|_| true);
        runtime
            .expect_read_dir()
            .with(eq(root().join("python/hello")))
            .returning(|_| Ok(vec![]));

        let repo = PackageRepository::new(&runtime, root());
        let manifest = repo.list_package_files(&python_hello()).unwrap();
        assert!(manifest.is_empty());
    }

    #[test]
    fn test_list_packages_missing_language_folder_is_empty() {
        let mut runtime = MockRuntime::new();
        runtime
            .expect_read_dir()
            .with(eq(root().join("go")))
            .returning(|_| Err(io::Error::from(io::ErrorKind::NotFound).into()));

        let repo = PackageRepository::new(&runtime, root());
        assert!(repo.list_packages(Language::Go).unwrap().is_empty());
    }

    #[test]
    fn test_publish_destination_creates_directory() {
        // A new package gets its directory created exactly once

        // --- Setup ---
        let mut runtime = MockRuntime::new();
        let dest = root().join("rust/mylib");

        runtime
            .expect_is_dir()
            .with(eq(dest.clone()))
            .returning(|_| false);
        runtime
            .expect_create_dir_all()
            .with(eq(dest.clone()))
            .times(1)
            .returning(|_| Ok(()));

        // --- Execute ---
        let repo = PackageRepository::new(&runtime, root());
        let reference = PackageReference::new(Language::Rust, "mylib");
        let result = repo.publish_destination(&reference).unwrap();

        // --- Verify ---
        assert_eq!(result, dest);
    }

    #[test]
    fn test_publish_destination_reuses_existing_directory() {
        let mut runtime = MockRuntime::new();
        runtime.expect_is_dir().returning(|_| true);
        runtime.expect_create_dir_all().never();

        let repo = PackageRepository::new(&runtime, root());
        let reference = PackageReference::new(Language::Rust, "mylib");
        assert!(repo.publish_destination(&reference).is_ok());
    }

    #[test]
    fn test_publish_destination_rejects_traversal() {
        let mut runtime = MockRuntime::new();
        runtime.expect_create_dir_all().never();

        let repo = PackageRepository::new(&runtime, root());
        for name in ["..", "."] {
            let reference = PackageReference::new(Language::Rust, name);
            let err = repo.publish_destination(&reference).unwrap_err();
            assert_eq!(
                err.downcast_ref::<Error>(),
                Some(&Error::InvalidPackageName(name.into()))
            );
        }
    }

    #[test]
    fn test_is_plain_name() {
        assert!(is_plain_name("grid"));
        assert!(is_plain_name("adv-math"));
        assert!(is_plain_name("v1.2"));
        assert!(!is_plain_name(""));
        assert!(!is_plain_name("."));
        assert!(!is_plain_name(".."));
        assert!(!is_plain_name("a/b"));
    }
}
