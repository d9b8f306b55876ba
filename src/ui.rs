//! User-facing output.
//!
//! Status lines carry a `DONE!`, `WARN` or `ERROR` prefix. `ERROR` lines go to
//! the error stream, everything else to the output stream. Prefixes are
//! colored only when the stream is a terminal that supports it.

use console::{Style, Term};
use std::io::{self, Write};

pub struct Reporter<O: Write, E: Write> {
    out: O,
    err: E,
    colored_out: bool,
    colored_err: bool,
}

impl Reporter<io::Stdout, io::Stderr> {
    pub fn stdio() -> Self {
        Self {
            out: io::stdout(),
            err: io::stderr(),
            colored_out: Term::stdout().features().colors_supported(),
            colored_err: Term::stderr().features().colors_supported(),
        }
    }
}

impl<O: Write, E: Write> Reporter<O, E> {
    /// A reporter that never emits color codes.
    pub fn new(out: O, err: E) -> Self {
        Self {
            out,
            err,
            colored_out: false,
            colored_err: false,
        }
    }

    pub fn into_parts(self) -> (O, E) {
        (self.out, self.err)
    }

    pub fn line(&mut self, message: impl AsRef<str>) -> io::Result<()> {
        writeln!(self.out, "{}", message.as_ref())
    }

    pub fn blank(&mut self) -> io::Result<()> {
        writeln!(self.out)
    }

    pub fn done(&mut self, message: impl AsRef<str>) -> io::Result<()> {
        let prefix = styled("DONE!", Style::new().green().bold(), self.colored_out);
        writeln!(self.out, "{} {}", prefix, message.as_ref())
    }

    pub fn warn(&mut self, message: impl AsRef<str>) -> io::Result<()> {
        let prefix = styled("WARN", Style::new().yellow(), self.colored_out);
        writeln!(self.out, "{} {}", prefix, message.as_ref())
    }

    pub fn error(&mut self, message: impl AsRef<str>) -> io::Result<()> {
        let prefix = styled("ERROR", Style::new().red().bold(), self.colored_err);
        writeln!(self.err, "{} {}", prefix, message.as_ref())
    }
}

fn styled(prefix: &str, style: Style, colored: bool) -> String {
    if colored {
        style.force_styling(true).apply_to(prefix).to_string()
    } else {
        prefix.to_string()
    }
}


#[cfg(test)]
mod tests {
    use super::capture::{output, reporter};
    use super::*;

    #[test]
    fn test_plain_prefixes() {
        let mut reporter = reporter();
        reporter.line("Installing \"a.py\"").unwrap();
        reporter.warn("No packages exist yet for \"go\"").unwrap();
        reporter.error("argument expected").unwrap();
        reporter.blank().unwrap();
        reporter.done("Package installed successfully").unwrap();

        let (out, err) = output(reporter);
        assert_eq!(
            out,
            "Installing \"a.py\"\n\
             WARN No packages exist yet for \"go\"\n\
             \n\
             DONE! Package installed successfully\n"
        );
        assert_eq!(err, "ERROR argument expected\n");
    }

    #[test]
    fn test_colored_prefix_keeps_message_plain() {
        let mut reporter = Reporter {
            out: Vec::new(),
            err: Vec::new(),
            colored_out: true,
            colored_err: false,
        };
        reporter.done("published").unwrap();
        reporter.error("oops").unwrap();

        let (out, err) = output(reporter);
        assert!(out.contains("\x1b["));
        assert!(out.ends_with(" published\n"));
        assert_eq!(err, "ERROR oops\n");
    }
}
