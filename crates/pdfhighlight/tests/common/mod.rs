//! Generated PDF documents shared by the workspace's tests and benches.
//!
//! Included with `#[path]` by the parse crate's backend tests, this crate's
//! unit tests and bench, and the CLI tests.

#![allow(dead_code)]

use lopdf::{Dictionary, Document, Object, ObjectId, Stream, dictionary};

enum PageSpec {
    Lines(Vec<String>),
    Content(Vec<u8>),
}

/// Builds a document with one content stream per page.
///
/// `F1` is Helvetica with WinAnsiEncoding, `F2` is Courier. By default the
/// font resources and the MediaBox sit on the page tree root and are
/// inherited; `page_resources` puts a direct `/Resources` dictionary on each
/// page instead.
pub struct TestPdf {
    pages: Vec<PageSpec>,
    media_box: [i64; 4],
    page_resources: bool,
}

impl Default for TestPdf {
    fn default() -> Self {
        Self {
            pages: Vec::new(),
            media_box: [0, 0, 612, 792],
            page_resources: false,
        }
    }
}

impl TestPdf {
    pub fn new() -> Self {
        Self::default()
    }

    /// A page showing `lines` in Helvetica 12pt from (72, 720) with 14pt
    /// leading, relative to the MediaBox origin.
    pub fn page(mut self, lines: &[&str]) -> Self {
        self.pages
            .push(PageSpec::Lines(lines.iter().map(|l| l.to_string()).collect()));
        self
    }

    /// A page with a raw content stream.
    pub fn content(mut self, content: Vec<u8>) -> Self {
        self.pages.push(PageSpec::Content(content));
        self
    }

    pub fn media_box(mut self, media_box: [i64; 4]) -> Self {
        self.media_box = media_box;
        self
    }

    pub fn page_resources(mut self) -> Self {
        self.page_resources = true;
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id: ObjectId = doc.new_object_id();
        let f1 = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => "WinAnsiEncoding",
        });
        let f2 = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources = dictionary! {
            "Font" => dictionary! { "F1" => f1, "F2" => f2 },
        };

        let mut kids: Vec<Object> = Vec::new();
        for spec in &self.pages {
            let content = match spec {
                PageSpec::Lines(lines) => {
                    let lines: Vec<&str> = lines.iter().map(String::as_str).collect();
                    text_lines(&lines, 72 + self.media_box[0], 720 + self.media_box[1])
                }
                PageSpec::Content(content) => content.clone(),
            };
            let content_id = doc.add_object(Stream::new(dictionary! {}, content));
            let mut page = dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            };
            if self.page_resources {
                page.set("Resources", resources.clone());
            }
            kids.push(doc.add_object(page).into());
        }

        let count = kids.len() as i64;
        let media_box: Vec<Object> = self.media_box.iter().map(|&v| v.into()).collect();
        let mut root = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "MediaBox" => media_box,
        };
        if !self.page_resources {
            root.set("Resources", resources);
        }
        doc.objects.insert(pages_id, Object::Dictionary(root));
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut buf = Vec::new();
        doc.save_to(&mut buf).expect("failed to save test PDF");
        buf
    }
}

/// One page per entry, default page size, inherited resources.
pub fn text_pdf(pages: &[&[&str]]) -> Vec<u8> {
    pages
        .iter()
        .fold(TestPdf::new(), |pdf, lines| pdf.page(lines))
        .build()
}

/// One page per content stream, each with its own `/Resources`.
pub fn pdf_with_contents(contents: &[Vec<u8>]) -> Vec<u8> {
    contents
        .iter()
        .fold(TestPdf::new().page_resources(), |pdf, c| pdf.content(c.clone()))
        .build()
}

/// Single page with its own `/Resources` showing the given lines.
pub fn single_page(text: &[&str]) -> Vec<u8> {
    pdf_with_contents(&[lines(text)])
}

/// Content stream showing `lines` in Helvetica 12pt from (72, 720) downwards.
pub fn lines(lines: &[&str]) -> Vec<u8> {
    text_lines(lines, 72, 720)
}

fn text_lines(lines: &[&str], x: i64, y: i64) -> Vec<u8> {
    let mut out = format!("BT /F1 12 Tf 14 TL {x} {y} Td\n").into_bytes();
    for line in lines {
        out.extend_from_slice(&literal(line));
        out.extend_from_slice(b" Tj T*\n");
    }
    out.extend_from_slice(b"ET");
    out
}

/// Escaped Latin-1 literal string, parentheses included. WinAnsi agrees with
/// Latin-1 for the accented letters used in the tests.
pub fn literal(text: &str) -> Vec<u8> {
    let mut out = vec![b'('];
    for c in text.chars() {
        let byte = u8::try_from(u32::from(c)).unwrap_or(b'?');
        if matches!(byte, b'(' | b')' | b'\\') {
            out.push(b'\\');
        }
        out.push(byte);
    }
    out.push(b')');
    out
}

/// The `/Highlight` annotation dictionaries on page `page_number` (1-based).
pub fn highlights(doc: &Document, page_number: u32) -> Vec<Dictionary> {
    let Some(&page_id) = doc.get_pages().get(&page_number) else {
        return Vec::new();
    };
    let page = doc.get_object(page_id).and_then(Object::as_dict).unwrap();
    let Ok(annots) = page.get(b"Annots") else {
        return Vec::new();
    };
    let annots = match annots {
        Object::Reference(id) => doc.get_object(*id).unwrap(),
        other => other,
    };
    annots
        .as_array()
        .unwrap()
        .iter()
        .map(|o| {
            doc.get_object(o.as_reference().unwrap())
                .and_then(Object::as_dict)
                .unwrap()
                .clone()
        })
        .filter(|d| {
            d.get(b"Subtype").and_then(Object::as_name).ok() == Some(b"Highlight".as_slice())
        })
        .collect()
}

/// Number of `/Highlight` annotations over all pages.
pub fn highlight_count(doc: &Document) -> usize {
    doc.get_pages()
        .keys()
        .map(|&number| highlights(doc, number).len())
        .sum()
}

/// `Rect` of an annotation as `[x0, y0, x1, y1]`.
pub fn rect(annot: &Dictionary) -> [f32; 4] {
    let values: Vec<f32> = annot
        .get(b"Rect")
        .unwrap()
        .as_array()
        .unwrap()
        .iter()
        .map(|o| o.as_float().unwrap())
        .collect();
    [values[0], values[1], values[2], values[3]]
}
