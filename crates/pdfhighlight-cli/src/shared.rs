use std::io::{self, IsTerminal, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use pdfhighlight::{HighlightStyle, Pdf, PdfError};
use tracing_subscriber::EnvFilter;

/// Install the stderr log subscriber. `RUST_LOG` wins over `-v`.
pub fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// `<dir>/<stem>_highlighted.pdf` next to the input.
pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string());
    input.with_file_name(format!("{stem}_highlighted.pdf"))
}

/// Open a PDF file with user-friendly error messages.
///
/// Returns `Err(1)` with a message printed to stderr if the file is not found
/// or cannot be parsed as a valid PDF.
pub fn open_pdf(file: &Path) -> Result<Pdf, i32> {
    if !file.exists() {
        eprintln!("Error: file not found: {}", file.display());
        return Err(1);
    }

    Pdf::open_file(file, None).map_err(|e| {
        match e {
            PdfError::PasswordRequired => {
                eprintln!("Error: {} is encrypted and cannot be highlighted", file.display())
            }
            other => eprintln!("Error: failed to open PDF: {other}"),
        }
        1
    })
}

/// Build the highlight style from `--color` and `--opacity`.
pub fn style(color: &str, opacity: f32) -> Result<HighlightStyle, i32> {
    let Some(color) = HighlightStyle::parse_hex_color(color) else {
        eprintln!("Error: invalid colour '{color}' (expected RRGGBB)");
        return Err(1);
    };
    if !(0.0..=1.0).contains(&opacity) {
        eprintln!("Error: opacity must be between 0 and 1, got {opacity}");
        return Err(1);
    }
    Ok(HighlightStyle { color, opacity })
}

/// A progress reporter that prints "Matching page N/M..." to stderr,
/// but only when stderr is connected to a TTY (terminal).
///
/// Pages may finish out of order, so it counts completions rather than
/// printing page indices.
pub struct ProgressReporter {
    total: usize,
    done: AtomicUsize,
    is_tty: bool,
}

impl ProgressReporter {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            done: AtomicUsize::new(0),
            is_tty: io::stderr().is_terminal(),
        }
    }

    /// Record one more finished page.
    pub fn tick(&self) {
        let current = self.done.fetch_add(1, Ordering::Relaxed) + 1;
        if self.is_tty {
            eprint!("\rMatching page {}/{}...", current, self.total);
            let _ = io::stderr().flush();
        }
    }

    /// Clear the progress line (if TTY).
    pub fn finish(&self) {
        if self.is_tty {
            eprint!("\r{}\r", " ".repeat(40));
            let _ = io::stderr().flush();
        }
    }
}
