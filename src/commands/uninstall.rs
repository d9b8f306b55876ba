use anyhow::Result;
use log::debug;
use std::io::Write;

use crate::package::PackageRepository;
use crate::reference::parse_reference;
use crate::runtime::Runtime;
use crate::sync::{FileStatus, remove_matching};
use crate::ui::Reporter;

use super::{BatchReport, Config, package_noun, require_args};

/// Remove the files of each referenced package from the working directory.
#[tracing::instrument(skip(runtime, config, reporter))]
pub fn uninstall<R: Runtime>(
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
            .and_then(|reference| Ok((repo.list_package_files(&reference)?, reference)));
        let (manifest, reference) = match resolved {
            Ok(resolved) => resolved,
            Err(e) => {
                batch.reject(reporter, e)?;
                continue;
            }
        };

        reporter.line(format!("Removing \"{}\"", reference.name))?;

        let sync = remove_matching(runtime, &cwd, manifest.iter());
        for outcome in &sync.outcomes {
            match &outcome.status {
                FileStatus::Removed => reporter.line(format!(" | {}", outcome.name))?,
                FileStatus::Failed(reason) => reporter.error(format!(
                    "failed to delete \"{}\": {}",
                    outcome.name, reason
                ))?,
                status => debug!("{}: {:?}", outcome.name, status),
            }
        }
        reporter.blank()?;
        batch.record_sync(&sync);
    }

    if batch.packages > 0 {
        reporter.done(format!("{} removed successfully", package_noun(args.len())))?;
    }
    Ok(batch)
}
