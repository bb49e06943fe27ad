use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Highlight keywords in a PDF document and report the ones not found.
#[derive(Debug, Parser)]
#[command(name = "pdfhighlight", about, version)]
pub struct Cli {
    /// Path to the PDF file
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Where to write the highlighted PDF. Default: <FILE stem>_highlighted.pdf
    #[arg(short, long, value_name = "OUT")]
    pub output: Option<PathBuf>,

    /// Keyword matched anywhere, including inside longer words (repeatable)
    #[arg(short = 'k', long = "keyword", value_name = "KW")]
    pub keywords: Vec<String>,

    /// Keyword matched as a whole word only (repeatable)
    #[arg(short = 'e', long = "exact", value_name = "KW")]
    pub exact: Vec<String>,

    /// Comma-separated keywords, e.g. "Metodologías activas, ODS, Reto"
    #[arg(long = "keywords", value_name = "KW,KW,...")]
    pub keyword_list: Option<String>,

    /// Comma-separated subset of --keywords matched as whole words
    #[arg(long, value_name = "KW,KW,...", requires = "keyword_list")]
    pub exact_words: Option<String>,

    /// File with one keyword per line; end a line with " =exact" for whole-word matching
    #[arg(long, value_name = "FILE")]
    pub keywords_file: Option<PathBuf>,

    /// Match every keyword as a whole word
    #[arg(long)]
    pub exact_all: bool,

    /// Report format
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,

    /// Highlight colour as RRGGBB hex
    #[arg(long, value_name = "RRGGBB", default_value = "FFFF00")]
    pub color: String,

    /// Highlight opacity between 0 and 1
    #[arg(long, default_value_t = 1.0)]
    pub opacity: f32,

    /// Distinguish letter case when locating occurrences on the page
    #[arg(long)]
    pub case_sensitive: bool,

    /// Log more detail to stderr (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Report output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Text,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn repeated_keywords() {
        let cli = Cli::parse_from([
            "pdfhighlight",
            "informe.pdf",
            "-k",
            "Metodo",
            "-e",
            "Reto",
            "--keyword",
            "plan",
        ]);
        assert_eq!(cli.keywords, vec!["Metodo", "plan"]);
        assert_eq!(cli.exact, vec!["Reto"]);
        assert_eq!(cli.format, ReportFormat::Text);
        assert_eq!(cli.color, "FFFF00");
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn comma_separated_keywords() {
        let cli = Cli::parse_from([
            "pdfhighlight",
            "informe.pdf",
            "--keywords",
            "Metodologías activas, ODS, Reto",
            "--exact-words",
            "Reto",
        ]);
        assert_eq!(cli.keyword_list.as_deref(), Some("Metodologías activas, ODS, Reto"));
        assert_eq!(cli.exact_words.as_deref(), Some("Reto"));
        assert!(cli.keywords.is_empty());
    }

    #[test]
    fn exact_words_requires_keywords() {
        let err = Cli::try_parse_from(["pdfhighlight", "a.pdf", "--exact-words", "Reto"]);
        assert!(err.is_err());
    }

    #[test]
    fn verbosity_counts() {
        let cli = Cli::parse_from(["pdfhighlight", "a.pdf", "-vv", "--format", "json"]);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.format, ReportFormat::Json);
    }
}
