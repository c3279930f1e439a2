use std::io::{self, IsTerminal, Write};
use std::path::Path;

use jadval::Progress;

use crate::config::Config;

/// Load the configuration file with user-friendly error messages.
///
/// Returns `Err(1)` with a message printed to stderr if the file cannot be
/// read or parsed.
pub fn load_config(path: Option<&Path>) -> Result<Config, i32> {
    Config::load(path).map_err(|e| {
        eprintln!("Error: {e}");
        1
    })
}

/// Print a library error to stderr and map it to exit code 1.
pub fn fail(err: jadval::Error) -> i32 {
    eprintln!("Error: {err}");
    1
}

/// A progress reporter that prints "Processing <file> page N/M..." to
/// stderr, but only when stderr is connected to a TTY (terminal).
pub struct ProgressReporter {
    file: String,
    total: usize,
    is_tty: bool,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            file: String::new(),
            total: 0,
            is_tty: io::stderr().is_terminal(),
        }
    }
}

impl Progress for ProgressReporter {
    fn start_document(&mut self, path: &Path, pages: usize) {
        self.file = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.total = pages;
    }

    fn page(&mut self, current: usize) {
        if self.is_tty {
            eprint!(
                "\rProcessing {} page {}/{}...",
                self.file, current, self.total
            );
            let _ = io::stderr().flush();
        }
    }

    fn finish_document(&mut self) {
        if self.is_tty {
            // Clear the line with carriage return and spaces
            let width = self.file.chars().count() + 40;
            eprint!("\r{}\r", " ".repeat(width));
            let _ = io::stderr().flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_config_missing_file() {
        let result = load_config(Some(Path::new("/nonexistent/jadval.toml")));
        assert_eq!(result.unwrap_err(), 1);
    }

    #[test]
    fn load_config_none_is_default() {
        assert_eq!(load_config(None).unwrap(), Config::default());
    }

    #[test]
    fn fail_maps_to_exit_code_one() {
        let code = fail(jadval::Error::InputNotFound("x.pdf".into()));
        assert_eq!(code, 1);
    }

    #[test]
    fn progress_reporter_tracks_document() {
        let mut reporter = ProgressReporter::new();
        reporter.start_document(Path::new("/in/honar.pdf"), 12);
        assert_eq!(reporter.file, "honar.pdf");
        assert_eq!(reporter.total, 12);
        // is_tty depends on test environment; just verify it doesn't panic
        reporter.page(1);
        reporter.finish_document();
    }
}
