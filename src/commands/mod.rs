//! Operation drivers for `install`, `publish`, `uninstall` and `list`.
//!
//! Each driver receives its argument list explicitly, validates every token
//! before touching the file system for it, and keeps going when a single
//! token or file fails. Per-token errors are printed as they happen and
//! collected in the returned [`BatchReport`]; only errors that stop the whole
//! command (no arguments, no working directory) are returned as `Err`.

use anyhow::Result;
use std::io::{self, Write};

use crate::error::exit_code_for;
use crate::sync::SyncReport;
use crate::ui::Reporter;

pub mod config;
mod install;
mod list;
mod paths;
mod publish;
mod uninstall;

pub use config::Config;
pub use install::install;
pub use list::list;
pub use publish::publish;
pub use uninstall::uninstall;

/// Aggregated result of one command over all of its arguments.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Packages that were resolved and processed.
    pub packages: usize,
    /// Individual files that could not be copied or removed.
    pub failed_files: usize,
    /// Per-token errors, in argument order.
    pub errors: Vec<anyhow::Error>,
}

impl BatchReport {
    /// Exit status for the batch: the code of the first per-token error, or 0.
    ///
    /// File failures alone keep the batch successful.
    pub fn exit_code(&self) -> i32 {
        self.errors.first().map(exit_code_for).unwrap_or(0)
    }

    fn record_sync(&mut self, sync: &SyncReport) {
        self.packages += 1;
        self.failed_files += sync.failure_count();
    }

    fn reject(
        &mut self,
        reporter: &mut Reporter<impl Write, impl Write>,
        err: anyhow::Error,
    ) -> io::Result<()> {
        reporter.error(format!("{:#}", err))?;
        self.errors.push(err);
        Ok(())
    }
}

/// "Package" or "Packages" depending on how many were requested.
fn package_noun(count: usize) -> &'static str {
    if count > 1 { "Packages" } else { "Package" }
}

fn require_args(args: &[String]) -> Result<()> {
    if args.is_empty() {
        return Err(crate::error::Error::ArgumentExpected.into());
    }
    Ok(())
}
