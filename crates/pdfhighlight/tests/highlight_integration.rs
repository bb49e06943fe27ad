//! End-to-end tests: generated PDF in, annotated PDF and report out.

mod common;

use common::{highlights, lines, pdf_with_contents, rect, single_page};
use lopdf::{Document, Object};
use pdfhighlight::{
    HighlightConfig, HighlightStyle, Keyword, KeywordList, MatchMode, PdfError, highlight_bytes,
    highlight_file,
};

fn run(pdf: &[u8], keywords: &[(&str, MatchMode)]) -> (Document, pdfhighlight::HighlightReport) {
    let keywords: KeywordList = keywords.iter().copied().collect();
    let (bytes, report) = highlight_bytes(pdf, keywords, &HighlightConfig::default()).unwrap();
    (Document::load_mem(&bytes).unwrap(), report)
}

fn assert_close(actual: [f32; 4], expected: [f32; 4]) {
    for (a, e) in actual.iter().zip(expected) {
        assert!((a - e).abs() < 0.01, "got {actual:?}, expected {expected:?}");
    }
}

#[test]
fn exact_keyword_before_period_is_highlighted() {
    let (doc, report) = run(&single_page(&["el Reto."]), &[("Reto", MatchMode::Exact)]);
    assert!(report.all_found());

    let marks = highlights(&doc, 1);
    assert_eq!(marks.len(), 1);
    // "el " is 1056/1000 em wide, "Reto" 2112/1000 em, Helvetica 12pt at (72, 720)
    assert_close(rect(&marks[0]), [84.672, 717.516, 110.016, 728.616]);
    assert!(matches!(marks[0].get(b"Contents").unwrap(), Object::String(s, _) if s == b"Reto"));
}

#[test]
fn exact_keyword_inside_longer_word_is_rejected() {
    let (doc, report) = run(
        &single_page(&["el Retoque final"]),
        &[("Reto", MatchMode::Exact)],
    );
    assert_eq!(report.unmatched, vec!["Reto"]);
    assert!(highlights(&doc, 1).is_empty());
    let stats = report.stats("Reto").unwrap();
    assert_eq!(stats.occurrences, 1);
    assert_eq!(stats.highlights, 0);
}

#[test]
fn partial_keyword_matches_inside_words() {
    let (doc, report) = run(
        &single_page(&["Metodología y métodos"]),
        &[("Metodo", MatchMode::Partial)],
    );
    assert!(report.all_found());
    // the accented "méto" is not a rendered occurrence of "Metodo"
    assert_eq!(highlights(&doc, 1).len(), 1);
}

#[test]
fn accents_fold_for_presence_but_not_for_geometry() {
    let (doc, report) = run(
        &single_page(&["Situación actual"]),
        &[("situacion", MatchMode::Partial)],
    );
    assert!(report.all_found());
    assert_eq!(report.found_without_highlight(), vec!["situacion"]);
    assert!(highlights(&doc, 1).is_empty());
}

#[test]
fn accented_keyword_highlights_its_own_spelling() {
    let (doc, report) = run(
        &single_page(&["La Situación, hoy."]),
        &[("Situación", MatchMode::Exact)],
    );
    assert!(report.all_found());
    assert_eq!(highlights(&doc, 1).len(), 1);
}

#[test]
fn geometry_search_ignores_case_by_default() {
    let (doc, _) = run(
        &single_page(&["RETO y reto"]),
        &[("Reto", MatchMode::Exact)],
    );
    assert_eq!(highlights(&doc, 1).len(), 2);
}

#[test]
fn case_sensitive_geometry_search() {
    let mut config = HighlightConfig::default();
    config.matching.case_sensitive_search = true;
    let keywords: KeywordList = [Keyword::exact("Reto")].into_iter().collect();
    let (bytes, report) =
        highlight_bytes(&single_page(&["RETO y Reto"]), keywords, &config).unwrap();
    let doc = Document::load_mem(&bytes).unwrap();
    assert_eq!(highlights(&doc, 1).len(), 1);
    assert_eq!(report.stats("Reto").unwrap().occurrences, 1);
}

#[test]
fn keywords_across_pages() {
    let pdf = pdf_with_contents(&[
        lines(&["Introducción general"]),
        lines(&["Objetivo: el Reto, y otro Reto."]),
        lines(&["Conclusión"]),
    ]);
    let (doc, report) = run(
        &pdf,
        &[
            ("Reto", MatchMode::Exact),
            ("Conclusion", MatchMode::Exact),
            ("Presupuesto", MatchMode::Partial),
        ],
    );
    assert_eq!(report.page_count, 3);
    assert_eq!(report.unmatched, vec!["Presupuesto"]);
    assert_eq!(report.stats("Reto").unwrap().pages_present, vec![1]);
    assert_eq!(report.stats("Conclusion").unwrap().pages_present, vec![2]);

    assert!(highlights(&doc, 1).is_empty());
    assert_eq!(highlights(&doc, 2).len(), 2);
    // presence only; the accented glyph blocks the rectangle search
    assert!(highlights(&doc, 3).is_empty());
}

#[test]
fn kerned_text_is_found() {
    let content = b"BT /F1 12 Tf 72 700 Td [(el R) 20 (eto) -15 (.)] TJ ET".to_vec();
    let (doc, report) = run(
        &pdf_with_contents(&[content]),
        &[("Reto", MatchMode::Exact)],
    );
    assert!(report.all_found());
    assert_eq!(highlights(&doc, 1).len(), 1);
}

#[test]
fn tj_adjustment_wider_than_tolerance_separates_words() {
    let content = b"BT /F1 12 Tf 72 700 Td [(el) -300 (Reto)] TJ ET".to_vec();
    let (doc, report) = run(
        &pdf_with_contents(&[content]),
        &[("Reto", MatchMode::Exact)],
    );
    assert!(report.all_found());
    assert_eq!(highlights(&doc, 1).len(), 1);
}

#[test]
fn text_inside_form_xobject_is_found() {
    use lopdf::{Stream, dictionary};

    let mut doc = Document::load_mem(&single_page(&["portada"])).unwrap();
    let page_id = doc.get_pages()[&1];
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let form_id = doc.add_object(Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Form",
            "BBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            "Resources" => dictionary! { "Font" => dictionary! { "F9" => font_id } },
        },
        b"BT /F9 10 Tf 100 100 Td (Reto.) Tj ET".to_vec(),
    ));
    let content_id = doc.add_object(Stream::new(
        dictionary! {},
        b"q 1 0 0 1 0 200 cm /Fm0 Do Q".to_vec(),
    ));
    {
        let page = doc
            .get_object_mut(page_id)
            .and_then(Object::as_dict_mut)
            .unwrap();
        page.set("Contents", content_id);
        let mut resources = page.get(b"Resources").unwrap().as_dict().unwrap().clone();
        resources.set("XObject", dictionary! { "Fm0" => form_id });
        page.set("Resources", resources);
    }
    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();

    let (out, report) = run(&bytes, &[("Reto", MatchMode::Exact)]);
    assert!(report.all_found());
    let marks = highlights(&out, 1);
    assert_eq!(marks.len(), 1);
    let [x0, y0, _, _] = rect(&marks[0]);
    assert!((x0 - 100.0).abs() < 0.01);
    // baseline at 300, Helvetica descent 207/1000 of 10pt
    assert!((y0 - 297.93).abs() < 0.01);
}

#[test]
fn style_is_written_to_annotations() {
    let config = HighlightConfig {
        style: HighlightStyle {
            color: [0.0, 1.0, 0.0],
            opacity: 0.5,
        },
        ..HighlightConfig::default()
    };
    let keywords: KeywordList = [Keyword::partial("Reto")].into_iter().collect();
    let (bytes, _) = highlight_bytes(&single_page(&["Reto"]), keywords, &config).unwrap();
    let doc = Document::load_mem(&bytes).unwrap();
    let marks = highlights(&doc, 1);
    let color: Vec<f32> = marks[0]
        .get(b"C")
        .unwrap()
        .as_array()
        .unwrap()
        .iter()
        .map(|o| o.as_float().unwrap())
        .collect();
    assert_eq!(color, vec![0.0, 1.0, 0.0]);
    assert_eq!(marks[0].get(b"CA").unwrap().as_float().unwrap(), 0.5);
}

#[test]
fn empty_keyword_list_leaves_document_unmarked() {
    let (doc, report) = run(&single_page(&["el Reto."]), &[]);
    assert!(report.all_found());
    assert_eq!(report.total_highlights(), 0);
    assert!(highlights(&doc, 1).is_empty());
}

#[test]
fn highlight_file_writes_output_only() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("informe.pdf");
    let output = dir.path().join("informe_highlighted.pdf");
    let original = single_page(&["el Reto."]);
    std::fs::write(&input, &original).unwrap();

    let keywords: KeywordList = [Keyword::exact("Reto")].into_iter().collect();
    let report = highlight_file(&input, &output, keywords, &HighlightConfig::default()).unwrap();
    assert_eq!(report.total_highlights(), 1);

    assert_eq!(std::fs::read(&input).unwrap(), original);
    let doc = Document::load(&output).unwrap();
    assert_eq!(highlights(&doc, 1).len(), 1);
}

#[test]
fn missing_input_is_source_unreadable() {
    let dir = tempfile::tempdir().unwrap();
    let keywords: KeywordList = [Keyword::exact("Reto")].into_iter().collect();
    let err = highlight_file(
        dir.path().join("nope.pdf"),
        dir.path().join("out.pdf"),
        keywords,
        &HighlightConfig::default(),
    )
    .unwrap_err();
    assert!(matches!(err, PdfError::SourceUnreadable { .. }));
    assert!(err.to_string().contains("nope.pdf"));
}

#[test]
fn non_pdf_bytes_are_source_unreadable() {
    let err = highlight_bytes(
        b"PK\x03\x04 not a pdf",
        KeywordList::new(),
        &HighlightConfig::default(),
    )
    .unwrap_err();
    assert!(matches!(err, PdfError::SourceUnreadable { .. }));
}

#[cfg(feature = "serde")]
#[test]
fn report_serializes_to_json() {
    let (_, report) = run(
        &single_page(&["el Reto."]),
        &[("Reto", MatchMode::Exact), ("Plan", MatchMode::Partial)],
    );
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["unmatched"], serde_json::json!(["Plan"]));
    assert_eq!(json["keywords"][0]["mode"], "exact");
}
