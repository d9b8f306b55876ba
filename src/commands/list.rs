use anyhow::Result;
use log::debug;
use std::io::Write;

use crate::error::Error;
use crate::language::Language;
use crate::package::PackageRepository;
use crate::reference::parse_reference;
use crate::runtime::Runtime;
use crate::ui::Reporter;

use super::{BatchReport, Config, require_args};

/// List the packages of a language, or the files of a package.
///
/// A target without `/` is a language; otherwise it is a package reference.
#[tracing::instrument(skip(runtime, config, reporter))]
pub fn list<R: Runtime>(
    runtime: &R,
    config: &Config,
    args: &[String],
    reporter: &mut Reporter<impl Write, impl Write>,
) -> Result<BatchReport> {
    require_args(args)?;
    let repo = PackageRepository::new(runtime, config.packages_root());
    let mut batch = BatchReport::default();

    for target in args {
        let listed = if target.contains('/') {
            list_files(&repo, target, reporter)
        } else {
            list_language(&repo, target, reporter)
        };
        match listed {
            Ok(()) => batch.packages += 1,
            Err(e) => batch.reject(reporter, e)?,
        }
    }

    Ok(batch)
}

fn list_language<R: Runtime>(
    repo: &PackageRepository<'_, R>,
    token: &str,
    reporter: &mut Reporter<impl Write, impl Write>,
) -> Result<()> {
    let language = Language::from_token(token).ok_or_else(|| Error::UnknownLanguage(token.into()))?;
    let packages = repo.list_packages(language)?;
    debug!("Found {} package(s) for {}", packages.len(), language);

    if packages.is_empty() {
        reporter.warn(format!("No packages exist yet for \"{}\"", language))?;
    }
    for package in packages {
        reporter.line(package)?;
    }
    Ok(())
}

fn list_files<R: Runtime>(
    repo: &PackageRepository<'_, R>,
    token: &str,
    reporter: &mut Reporter<impl Write, impl Write>,
) -> Result<()> {
    let reference = parse_reference(token)?;
    let manifest = repo.list_package_files(&reference)?;

    if manifest.is_empty() {
        reporter.warn(format!("Package \"{}\" has no files", reference))?;
    }
    for file in manifest.iter() {
        reporter.line(file)?;
    }
    Ok(())
}
