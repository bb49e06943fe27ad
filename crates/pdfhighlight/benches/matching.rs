//! Performance benchmarks for keyword matching.
//!
//! Covers the three costs of a run on a generated 10-page document:
//! - page extraction (content stream interpretation and text indexing)
//! - matching only, against pre-extracted pages
//! - the full pipeline including annotation and serialization

#[path = "../tests/common/mod.rs"]
mod common;

use common::TestPdf;
use criterion::{Criterion, black_box, criterion_group, criterion_main};
use pdfhighlight::{
    HighlightConfig, Highlighter, Keyword, KeywordList, Page, Pdf, highlight_bytes,
};

const PAGES: usize = 10;
const LINES_PER_PAGE: usize = 45;

fn build_pdf() -> Vec<u8> {
    (0..PAGES)
        .fold(TestPdf::new(), |pdf, page| pdf.content(page_content(page)))
        .build()
}

fn page_content(page: usize) -> Vec<u8> {
    let mut ops = String::from("BT\n/F1 10 Tf\n14 TL\n60 750 Td\n");
    for line in 0..LINES_PER_PAGE {
        let text = match (page + line) % 4 {
            0 => "El Reto principal del proyecto, y su metodologia.",
            1 => "Retoques menores al plan de trabajo anual.",
            2 => "Situacion actual: objetivos, riesgos y presupuesto.",
            _ => "Texto de relleno sin palabras clave relevantes.",
        };
        ops.push_str(&format!("({text}) Tj T*\n"));
    }
    ops.push_str("ET\n");
    ops.into_bytes()
}

fn keywords() -> KeywordList {
    [
        Keyword::exact("Reto"),
        Keyword::partial("Metodo"),
        Keyword::exact("Situación"),
        Keyword::partial("presupuesto"),
        Keyword::exact("Inexistente"),
    ]
    .into_iter()
    .collect()
}

fn bench_extraction(c: &mut Criterion) {
    let bytes = build_pdf();
    c.bench_function("extract_pages", |b| {
        b.iter(|| {
            let pdf = Pdf::open(black_box(&bytes), None).unwrap();
            for page in pdf.pages_iter() {
                black_box(page.unwrap());
            }
        })
    });
}

fn bench_matching(c: &mut Criterion) {
    let bytes = build_pdf();
    let pdf = Pdf::open(&bytes, None).unwrap();
    let pages: Vec<Page> = pdf.pages_iter().map(Result::unwrap).collect();
    let highlighter = Highlighter::new(keywords(), Default::default());

    c.bench_function("match_pages", |b| {
        b.iter(|| {
            for (index, page) in pages.iter().enumerate() {
                black_box(highlighter.match_page(index, page));
            }
        })
    });
}

fn bench_pipeline(c: &mut Criterion) {
    let bytes = build_pdf();
    let config = HighlightConfig::default();
    c.bench_function("highlight_bytes", |b| {
        b.iter(|| highlight_bytes(black_box(&bytes), keywords(), &config).unwrap())
    });
}

criterion_group!(benches, bench_extraction, bench_matching, bench_pipeline);
criterion_main!(benches);
