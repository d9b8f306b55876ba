use anyhow::Result;
use log::debug;
use std::io::Write;

use crate::package::PackageRepository;
use crate::reference::parse_reference;
use crate::runtime::Runtime;
use crate::sync::{FileStatus, copy_into};
use crate::ui::Reporter;

use super::{BatchReport, Config, package_noun, require_args};

/// Copy the files of each referenced package into the working directory.
#[tracing::instrument(skip(runtime, config, reporter))]
pub fn install<R: Runtime>(
    runtime: &R,
    config: &Config,
    args: &[String],
    reporter: &mut Reporter<impl Write, impl Write>,
) -> Result<BatchReport> {
    require_args(args)?;
    let cwd = runtime.current_dir()?;
    let repo = PackageRepository::new(runtime, config.packages_root());
    let mut batch = BatchReport::default();

    for token in args {
        let resolved = parse_reference(token)
            .map_err(anyhow::Error::from)
            .and_then(|reference| Ok((repo.resolve(&reference)?, reference)));
        let ((package_dir, manifest), reference) = match resolved {
            Ok(resolved) => resolved,
            Err(e) => {
                batch.reject(reporter, e)?;
                continue;
            }
        };

        debug!(
            "Installing {} ({} file(s)) from {:?} into {:?}",
            reference,
            manifest.len(),
            package_dir,
            cwd
        );

        if manifest.is_empty() {
            reporter.warn(format!("Package \"{}\" has no files", reference))?;
        }

        let sync = copy_into(runtime, &package_dir, &cwd, manifest.iter());
        for outcome in &sync.outcomes {
            reporter.line(format!("Installing \"{}\"", outcome.name))?;
            if let FileStatus::Failed(reason) = &outcome.status {
                reporter.error(format!("failed to copy \"{}\": {}", outcome.name, reason))?;
            }
        }
        if !sync.is_clean() {
            reporter.warn(format!(
                "{} of {} file(s) of \"{}\" could not be installed",
                sync.failure_count(),
                sync.outcomes.len(),
                reference
            ))?;
        }
        batch.record_sync(&sync);
    }

    if batch.packages > 0 {
        reporter.done(format!("{} installed successfully", package_noun(args.len())))?;
    }
    Ok(batch)
}
