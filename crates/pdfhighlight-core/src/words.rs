use crate::geometry::BBox;
use crate::text::Char;

/// Options for word extraction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WordOptions {
    /// Maximum horizontal distance between characters to group into a word.
    ///
    /// A gap must be strictly larger to split. Word spacing done through TJ
    /// adjustments instead of a space glyph must therefore exceed it: at
    /// 12pt, `[(el) -250 (Reto)] TJ` moves exactly 3pt and stays one word,
    /// `-300` splits.
    pub x_tolerance: f64,
    /// Maximum vertical distance between characters to group into a word.
    pub y_tolerance: f64,
}

impl Default for WordOptions {
    fn default() -> Self {
        Self {
            x_tolerance: 3.0,
            y_tolerance: 3.0,
        }
    }
}

/// A whitespace-delimited token extracted from a PDF page.
///
/// Punctuation stays attached to the token it touches, so a sentence ending
/// in "Reto." yields the word `"Reto."`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Word {
    /// The text content of this word.
    pub text: String,
    /// Bounding box encompassing all constituent characters.
    pub bbox: BBox,
}

/// How two consecutive glyphs relate in reading order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Adjacency {
    /// Same word.
    Joined,
    /// Same line, separate words.
    WordBreak,
    /// Different lines.
    LineBreak,
}

/// Classify the transition from `last` to `current`.
///
/// The horizontal gap is direction-agnostic: the distance between the two
/// x-intervals, zero for overlapping glyphs (e.g. duplicated glyphs used for
/// fake bold), so only a real gap splits a word.
pub(crate) fn adjacency(last: &Char, current: &Char, options: &WordOptions) -> Adjacency {
    let y_diff = (current.bbox.top - last.bbox.top).abs();
    if y_diff > options.y_tolerance {
        return Adjacency::LineBreak;
    }
    let x_gap = (last.bbox.x0.max(current.bbox.x0) - last.bbox.x1.min(current.bbox.x1)).max(0.0);
    if x_gap > options.x_tolerance {
        Adjacency::WordBreak
    } else {
        Adjacency::Joined
    }
}

/// Extracts words from a sequence of characters based on spatial proximity.
pub struct WordExtractor;

impl WordExtractor {
    /// Extract words from characters given in content-stream (reading) order.
    ///
    /// Whitespace glyphs always end the current word. Otherwise a word ends
    /// when the next glyph is further than `x_tolerance` away horizontally or
    /// `y_tolerance` away vertically.
    pub fn extract(chars: &[Char], options: &WordOptions) -> Vec<Word> {
        let mut words = Vec::new();
        let mut current: Vec<&Char> = Vec::new();

        for ch in chars {
            if ch.is_blank() {
                Self::flush(&mut current, &mut words);
                continue;
            }

            if let Some(last) = current.last() {
                if adjacency(last, ch, options) != Adjacency::Joined {
                    Self::flush(&mut current, &mut words);
                }
            }
            current.push(ch);
        }
        Self::flush(&mut current, &mut words);

        words
    }

    fn flush(current: &mut Vec<&Char>, words: &mut Vec<Word>) {
        let Some((first, rest)) = current.split_first() else {
            return;
        };
        let mut text = first.text.clone();
        let mut bbox = first.bbox;
        for ch in rest {
            text.push_str(&ch.text);
            bbox = bbox.union(&ch.bbox);
        }
        words.push(Word { text, bbox });
        current.clear();
    }
}

/// Words whose bounding box touches `region`, in extraction order.
pub fn words_in_region<'a>(words: &'a [Word], region: &BBox) -> Vec<&'a Word> {
    words.iter().filter(|w| w.bbox.intersects(region)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_char(text: &str, x0: f64, top: f64, x1: f64, bottom: f64) -> Char {
        Char {
            text: text.to_string(),
            bbox: BBox::new(x0, top, x1, bottom),
            fontname: "TestFont".to_string(),
            size: 12.0,
        }
    }

    /// Lay out `text` on one line starting at `x`, 6pt per glyph.
    fn line(text: &str, x: f64, top: f64) -> Vec<Char> {
        text.chars()
            .enumerate()
            .map(|(i, c)| {
                let x0 = x + i as f64 * 6.0;
                make_char(&c.to_string(), x0, top, x0 + 6.0, top + 12.0)
            })
            .collect()
    }

    #[test]
    fn splits_on_spaces() {
        let words = WordExtractor::extract(&line("el Reto del", 10.0, 100.0), &WordOptions::default());
        let texts: Vec<&str> = words.iter().map(|w| w.text.as_str()).collect();
        assert_eq!(texts, vec!["el", "Reto", "del"]);
        assert_eq!(words[1].bbox, BBox::new(28.0, 100.0, 52.0, 112.0));
    }

    #[test]
    fn punctuation_stays_attached() {
        let words = WordExtractor::extract(&line("el Reto.", 10.0, 100.0), &WordOptions::default());
        assert_eq!(words.last().unwrap().text, "Reto.");
    }

    #[test]
    fn splits_on_horizontal_gap_without_space_glyph() {
        let mut chars = line("ab", 10.0, 100.0);
        chars.extend(line("cd", 40.0, 100.0));
        let words = WordExtractor::extract(&chars, &WordOptions::default());
        assert_eq!(words.len(), 2);
        assert_eq!(words[0].text, "ab");
        assert_eq!(words[1].text, "cd");
    }

    #[test]
    fn gap_equal_to_tolerance_joins() {
        let mut chars = line("el", 10.0, 100.0);
        chars.extend(line("Reto", 25.0, 100.0));
        let words = WordExtractor::extract(&chars, &WordOptions::default());
        assert_eq!(words.len(), 1);
        assert_eq!(words[0].text, "elReto");

        let mut chars = line("el", 10.0, 100.0);
        chars.extend(line("Reto", 25.5, 100.0));
        let words = WordExtractor::extract(&chars, &WordOptions::default());
        let texts: Vec<&str> = words.iter().map(|w| w.text.as_str()).collect();
        assert_eq!(texts, vec!["el", "Reto"]);
    }

    #[test]
    fn splits_on_line_change() {
        let mut chars = line("ab", 10.0, 100.0);
        chars.extend(line("cd", 22.0, 120.0));
        let words = WordExtractor::extract(&chars, &WordOptions::default());
        assert_eq!(words.len(), 2);
    }

    #[test]
    fn overlapping_glyphs_join() {
        let chars = vec![
            make_char("a", 10.0, 100.0, 16.0, 112.0),
            make_char("a", 10.5, 100.0, 16.5, 112.0),
        ];
        let words = WordExtractor::extract(&chars, &WordOptions::default());
        assert_eq!(words.len(), 1);
        assert_eq!(words[0].text, "aa");
    }

    #[test]
    fn empty_input() {
        assert!(WordExtractor::extract(&[], &WordOptions::default()).is_empty());
    }

    #[test]
    fn region_filter_uses_intersection() {
        let words = WordExtractor::extract(&line("uno dos tres", 0.0, 0.0), &WordOptions::default());
        // "dos" spans x 24..42
        let hits = words_in_region(&words, &BBox::new(25.0, 2.0, 30.0, 10.0));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].text, "dos");

        let wide = words_in_region(&words, &BBox::new(16.0, 0.0, 50.0, 12.0));
        let texts: Vec<&str> = wide.iter().map(|w| w.text.as_str()).collect();
        assert_eq!(texts, vec!["uno", "dos", "tres"]);
    }
}
