mod cli;
mod keywords;
mod report;
mod shared;

use clap::Parser;
use cli::{Cli, ReportFormat};
use pdfhighlight::{HighlightConfig, HighlightOptions, annotate_with_progress};

use crate::shared::{ProgressReporter, default_output_path, open_pdf};

fn main() {
    let cli = Cli::parse();
    shared::init_logging(cli.verbose);

    if let Err(code) = run(&cli) {
        std::process::exit(code);
    }
}

fn run(cli: &Cli) -> Result<(), i32> {
    let keywords = keywords::collect(cli)?;
    let style = shared::style(&cli.color, cli.opacity)?;
    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&cli.file));

    let pdf = open_pdf(&cli.file)?;
    let progress = ProgressReporter::new(pdf.page_count());
    let config = HighlightConfig {
        matching: HighlightOptions {
            case_sensitive_search: cli.case_sensitive,
            ..HighlightOptions::default()
        },
        style,
        ..HighlightConfig::default()
    };

    let (mut writer, report) =
        annotate_with_progress(pdf, keywords, &config, |_| progress.tick()).map_err(|e| {
            progress.finish();
            eprintln!("Error: {e}");
            1
        })?;
    progress.finish();

    writer.save(&output).map_err(|e| {
        eprintln!("Error: could not write {}: {e}", output.display());
        1
    })?;

    match cli.format {
        ReportFormat::Text => print!("{}", report::render_text(&report, &output)),
        ReportFormat::Json => {
            let json = report::render_json(&report, &output).map_err(|e| {
                eprintln!("Error: JSON serialization failed: {e}");
                1
            })?;
            println!("{json}");
        }
    }
    Ok(())
}
