use anyhow::Result;
use log::debug;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::Error;
use crate::language::Language;
use crate::package::{PackageRepository, entry_names};
use crate::reference::{PackageReference, parse_reference};
use crate::runtime::Runtime;
use crate::sync::{FileStatus, copy_out_of};
use crate::ui::Reporter;

use super::{BatchReport, Config, require_args};

/// Copy files from the working directory (or a named source) into the
/// repository as a new or updated package.
///
/// `args` is `[<language>/<package> | <language>, [<source>]]`. A bare
/// language publishes under the working directory's name.
#[tracing::instrument(skip(runtime, config, reporter))]
pub fn publish<R: Runtime>(
    runtime: &R,
    config: &Config,
    args: &[String],
    reporter: &mut Reporter<impl Write, impl Write>,
) -> Result<BatchReport> {
    require_args(args)?;
    let cwd = runtime.current_dir()?;
    let reference = publish_reference(&args[0], &cwd)?;

    let source = match args.get(1) {
        Some(source) => cwd.join(source),
        None => cwd.clone(),
    };
    let (src_dir, names) = source_files(runtime, &source)?;
    debug!("Publishing {} from {:?}: {:?}", reference, src_dir, names);

    let repo = PackageRepository::new(runtime, config.packages_root());
    let dest = repo.publish_destination(&reference)?;

    reporter.line(format!("Publishing \"{}\"", reference.name))?;

    let sync = copy_out_of(runtime, &src_dir, &dest, names.iter().map(String::as_str));
    for outcome in &sync.outcomes {
        reporter.line(format!(" | {}", outcome.name))?;
        if let FileStatus::Failed(reason) = &outcome.status {
            reporter.error(format!("failed to copy \"{}\": {}", outcome.name, reason))?;
        }
    }
    reporter.blank()?;

    let mut batch = BatchReport::default();
    batch.record_sync(&sync);
    reporter.done("Package published successfully")?;
    Ok(batch)
}

/// Parse the publish target, defaulting the package name to the base name of
/// the working directory when only a language is given.
fn publish_reference(token: &str, cwd: &Path) -> Result<PackageReference, Error> {
    if token.is_empty() || token.contains('/') {
        return parse_reference(token);
    }

    let language = Language::from_token(token).ok_or_else(|| Error::UnknownLanguage(token.into()))?;
    let name = cwd
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| Error::InvalidPackageName(cwd.display().to_string()))?;
    Ok(PackageReference::new(language, name))
}

/// Resolve the publish source into a directory and the entry names to copy.
///
/// A directory publishes all of its entries; a file publishes just itself.
fn source_files<R: Runtime>(runtime: &R, source: &Path) -> Result<(PathBuf, Vec<String>)> {
    if runtime.is_dir(source) {
        let names = entry_names(runtime, source)?;
        return Ok((source.to_path_buf(), names));
    }

    if runtime.exists(source)
        && let (Some(parent), Some(name)) = (source.parent(), source.file_name())
    {
        return Ok((parent.to_path_buf(), vec![name.to_string_lossy().into_owned()]));
    }

    Err(Error::SourceNotFound(source.to_path_buf()).into())
}
