use std::fmt::Write as _;
use std::path::Path;

use pdfhighlight::HighlightReport;

/// Human-readable summary followed by the keywords that were not found.
pub fn render_text(report: &HighlightReport, output: &Path) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Highlighted {} occurrence(s) of {} keyword(s) across {} page(s): {}",
        report.total_highlights(),
        report.keywords.len(),
        report.page_count,
        output.display()
    );

    for err in &report.malformed {
        let _ = writeln!(out, "Skipped keyword '{}': {}", err.keyword, err.reason);
    }

    let not_highlighted = report.found_without_highlight();
    if !not_highlighted.is_empty() {
        let _ = writeln!(out, "Found in the text but not highlighted:");
        for keyword in not_highlighted {
            let _ = writeln!(out, "- {keyword}");
        }
    }

    if report.unmatched.is_empty() {
        let _ = writeln!(out, "All keywords were found in the document.");
    } else {
        let _ = writeln!(out, "The following keywords were not found in the document:");
        for keyword in &report.unmatched {
            let _ = writeln!(out, "- {keyword}");
        }
    }
    out
}

/// The report as pretty-printed JSON, with the output path alongside.
pub fn render_json(report: &HighlightReport, output: &Path) -> Result<String, serde_json::Error> {
    let value = serde_json::json!({
        "output": output.display().to_string(),
        "report": report,
    });
    serde_json::to_string_pretty(&value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pdfhighlight::{KeywordStats, MatchMode};

    fn stats(keyword: &str, pages: Vec<usize>, highlights: usize) -> KeywordStats {
        KeywordStats {
            keyword: keyword.to_string(),
            mode: MatchMode::Exact,
            pages_present: pages,
            occurrences: highlights,
            highlights,
        }
    }

    fn report() -> HighlightReport {
        HighlightReport {
            page_count: 2,
            unmatched: vec!["Presupuesto".to_string()],
            malformed: Vec::new(),
            keywords: vec![
                stats("Reto", vec![0], 2),
                stats("Conclusion", vec![1], 0),
                stats("Presupuesto", vec![], 0),
            ],
        }
    }

    #[test]
    fn text_lists_missing_keywords() {
        let text = render_text(&report(), Path::new("out.pdf"));
        assert!(text.starts_with(
            "Highlighted 2 occurrence(s) of 3 keyword(s) across 2 page(s): out.pdf\n"
        ));
        assert!(text.contains("Found in the text but not highlighted:\n- Conclusion\n"));
        assert!(text.ends_with("not found in the document:\n- Presupuesto\n"));
    }

    #[test]
    fn text_all_found() {
        let report = HighlightReport {
            page_count: 1,
            keywords: vec![stats("Reto", vec![0], 1)],
            ..HighlightReport::default()
        };
        let text = render_text(&report, Path::new("out.pdf"));
        assert!(text.contains("All keywords were found in the document."));
        assert!(!text.contains("not found"));
    }

    #[test]
    fn json_wraps_report() {
        let json = render_json(&report(), Path::new("out.pdf")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["output"], "out.pdf");
        assert_eq!(value["report"]["unmatched"][0], "Presupuesto");
        assert_eq!(value["report"]["keywords"][0]["highlights"], 2);
    }
}
