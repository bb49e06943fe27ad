//! End-to-end highlighting: open, match, annotate, save.

use std::path::Path;

use pdfhighlight_core::{
    HighlightOptions, HighlightReport, Highlighter, KeywordList, PageMatches, PdfError,
    WordOptions,
};
use pdfhighlight_parse::ExtractOptions;

use crate::{HighlightStyle, HighlightWriter, Pdf};

/// Everything that tunes one highlighting run.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct HighlightConfig {
    pub matching: HighlightOptions,
    pub style: HighlightStyle,
    pub extract: ExtractOptions,
}

/// Match `keywords` against every page of `pdf` and annotate the results.
///
/// The returned writer holds the annotated document, ready to be saved.
///
/// # Errors
///
/// Fails on the first page that cannot be read or annotation that cannot be
/// attached; nothing is written in that case.
pub fn annotate(
    pdf: Pdf,
    keywords: KeywordList,
    config: &HighlightConfig,
) -> Result<(HighlightWriter, HighlightReport), PdfError> {
    annotate_with_progress(pdf, keywords, config, |_| {})
}

/// Like [`annotate`], calling `on_page` with each page index once that page
/// has been matched. With the `parallel` feature the calls may come from
/// several threads and out of page order.
pub fn annotate_with_progress<F>(
    pdf: Pdf,
    keywords: KeywordList,
    config: &HighlightConfig,
    on_page: F,
) -> Result<(HighlightWriter, HighlightReport), PdfError>
where
    F: Fn(usize) + Sync,
{
    let pdf = pdf.with_word_options(WordOptions {
        x_tolerance: config.matching.x_tolerance,
        y_tolerance: config.matching.y_tolerance,
    });
    let highlighter = Highlighter::new(keywords, config.matching.clone());
    let matches = match_pages(&pdf, &highlighter, &on_page)?;

    let mut writer = HighlightWriter::new(pdf.into_document(), config.style);
    let report = highlighter.apply(matches.into_iter().map(Ok), &mut writer)?;
    tracing::debug!(
        pages = report.page_count,
        annotations = writer.annotation_count(),
        unmatched = report.unmatched.len(),
        "document annotated"
    );
    Ok((writer, report))
}

#[cfg(not(feature = "parallel"))]
fn match_pages<F: Fn(usize) + Sync>(
    pdf: &Pdf,
    highlighter: &Highlighter,
    on_page: &F,
) -> Result<Vec<PageMatches>, PdfError> {
    pdf.pages_iter()
        .enumerate()
        .map(|(index, page)| {
            let matches = highlighter.match_page(index, &page?);
            on_page(index);
            Ok(matches)
        })
        .collect()
}

#[cfg(feature = "parallel")]
fn match_pages<F: Fn(usize) + Sync>(
    pdf: &Pdf,
    highlighter: &Highlighter,
    on_page: &F,
) -> Result<Vec<PageMatches>, PdfError> {
    use rayon::prelude::*;

    (0..pdf.page_count())
        .into_par_iter()
        .map(|index| {
            let matches = highlighter.match_page(index, &pdf.page(index)?);
            on_page(index);
            Ok(matches)
        })
        .collect()
}

/// Highlight `keywords` in an in-memory PDF and return the annotated bytes.
///
/// # Errors
///
/// Returns [`PdfError::SourceUnreadable`] if `bytes` is not a PDF, or any
/// error raised while matching, annotating or serializing.
pub fn highlight_bytes(
    bytes: &[u8],
    keywords: KeywordList,
    config: &HighlightConfig,
) -> Result<(Vec<u8>, HighlightReport), PdfError> {
    let pdf = Pdf::open(bytes, Some(config.extract.clone()))?;
    let (mut writer, report) = annotate(pdf, keywords, config)?;
    Ok((writer.to_bytes()?, report))
}

/// Highlight `keywords` in the PDF at `input` and save the result to `output`.
///
/// The output file is only created once every page has been annotated.
///
/// # Errors
///
/// Returns [`PdfError::SourceUnreadable`] if `input` is missing or not a PDF,
/// [`PdfError::IoError`] if `output` cannot be written.
pub fn highlight_file(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    keywords: KeywordList,
    config: &HighlightConfig,
) -> Result<HighlightReport, PdfError> {
    let pdf = Pdf::open_file(input, Some(config.extract.clone()))?;
    let (mut writer, report) = annotate(pdf, keywords, config)?;
    writer.save(output)?;
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_pdf::text_pdf;
    use pdfhighlight_core::Keyword;

    fn keywords(list: &[Keyword]) -> KeywordList {
        list.iter().cloned().collect()
    }

    #[test]
    fn annotate_reports_and_draws() {
        let pdf = Pdf::open(&text_pdf(&[&["el Reto."], &["Situación actual"]]), None).unwrap();
        let (writer, report) = annotate(
            pdf,
            keywords(&[Keyword::exact("Reto"), Keyword::partial("ausente")]),
            &HighlightConfig::default(),
        )
        .unwrap();
        assert_eq!(report.page_count, 2);
        assert_eq!(report.unmatched, vec!["ausente"]);
        assert_eq!(report.total_highlights(), 1);
        assert_eq!(writer.annotation_count(), 1);
    }

    #[test]
    fn bytes_round_trip_through_writer() {
        let (bytes, report) = highlight_bytes(
            &text_pdf(&[&["Metodología"]]),
            keywords(&[Keyword::partial("Metodo")]),
            &HighlightConfig::default(),
        )
        .unwrap();
        assert!(report.all_found());
        assert!(bytes.starts_with(b"%PDF-"));
    }

    #[test]
    fn unreadable_input_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out.pdf");
        let err = highlight_file(
            dir.path().join("missing.pdf"),
            &out,
            keywords(&[Keyword::partial("Reto")]),
            &HighlightConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, PdfError::SourceUnreadable { .. }));
        assert!(!out.exists());
    }

    #[test]
    fn pages_are_matched_in_document_order() {
        let pdf = Pdf::open(&text_pdf(&[&["Reto uno"], &["nada"], &["otro Reto"]]), None).unwrap();
        let (_, report) = annotate(
            pdf,
            keywords(&[Keyword::exact("Reto")]),
            &HighlightConfig::default(),
        )
        .unwrap();
        let stats = report.stats("Reto").unwrap();
        assert_eq!(stats.pages_present, vec![0, 2]);
        assert_eq!(stats.highlights, 2);
    }

    #[test]
    fn progress_sees_every_page() {
        use std::sync::Mutex;

        let seen = Mutex::new(Vec::new());
        let pdf = Pdf::open(&text_pdf(&[&["a"], &["b"], &["c"]]), None).unwrap();
        annotate_with_progress(pdf, KeywordList::new(), &HighlightConfig::default(), |i| {
            seen.lock().unwrap().push(i)
        })
        .unwrap();
        let mut seen = seen.into_inner().unwrap();
        seen.sort_unstable();
        assert_eq!(seen, vec![0, 1, 2]);
    }
}
