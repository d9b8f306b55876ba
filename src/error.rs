//! Errors raised while validating and resolving package references.
//!
//! Each variant maps to a distinct process exit code through [`Error::exit_code`].
//! Failures of individual file operations are not errors at this level: they
//! are recorded as outcomes by the synchronizer.

use std::path::PathBuf;
use thiserror::Error;

/// Exit code for unexpected I/O or configuration failures.
pub const EXIT_FAILURE: i32 = 1;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("argument expected")]
    ArgumentExpected,

    #[error("missing argument for language/package")]
    MalformedReference,

    #[error("\"{0}\" is not a valid language")]
    UnknownLanguage(String),

    #[error("package \"{0}\" does not exist")]
    PackageNotFound(String),

    #[error("\"{0}\" is not a valid package name")]
    InvalidPackageName(String),

    #[error("source \"{}\" does not exist", .0.display())]
    SourceNotFound(PathBuf),
}

impl Error {
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::ArgumentExpected => 2,
            Error::MalformedReference => 3,
            Error::UnknownLanguage(_) => 4,
            Error::PackageNotFound(_) => 5,
            Error::InvalidPackageName(_) => 6,
            Error::SourceNotFound(_) => 7,
        }
    }
}

/// Map any driver error to an exit code, falling back to [`EXIT_FAILURE`].
pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    err.downcast_ref::<Error>()
        .map(Error::exit_code)
        .unwrap_or(EXIT_FAILURE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_match_cli_wording() {
        assert_eq!(Error::ArgumentExpected.to_string(), "argument expected");
        assert_eq!(
            Error::MalformedReference.to_string(),
            "missing argument for language/package"
        );
        assert_eq!(
            Error::UnknownLanguage("cobol".into()).to_string(),
            "\"cobol\" is not a valid language"
        );
        assert_eq!(
            Error::PackageNotFound("grid".into()).to_string(),
            "package \"grid\" does not exist"
        );
    }

    #[test]
    fn test_exit_codes_are_distinct_and_nonzero() {
        let errors = [
            Error::ArgumentExpected,
            Error::MalformedReference,
            Error::UnknownLanguage("x".into()),
            Error::PackageNotFound("x".into()),
            Error::InvalidPackageName("..".into()),
            Error::SourceNotFound(PathBuf::from("src")),
        ];
        let mut codes: Vec<i32> = errors.iter().map(Error::exit_code).collect();
        assert!(codes.iter().all(|&c| c != 0 && c != EXIT_FAILURE));
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn test_exit_code_for_downcasts_through_anyhow() {
        let err = anyhow::Error::new(Error::PackageNotFound("grid".into()));
        assert_eq!(exit_code_for(&err), 5);

        let err = anyhow::anyhow!("disk on fire");
        assert_eq!(exit_code_for(&err), EXIT_FAILURE);
    }
}
