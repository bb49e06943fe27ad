//! Accent- and case-insensitive text folding.
//!
//! Provides [`normalize`] for the comparison form used by keyword matching and
//! [`strip_trailing_punctuation`] for the boundary check on extracted words.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Punctuation that may directly follow an exact-mode keyword.
///
/// Shared by the presence pattern (what may follow the keyword in page text)
/// and boundary confirmation (what is stripped from the end of a word).
pub const PUNCTUATION: &[char] = &['.', ',', ';', ':', '!', '¡', '?', '¿', '"', '\'', ')', ']', '}'];

/// Fold text into its comparison form.
///
/// Lowercases, applies compatibility decomposition (NFKD), drops every
/// combining mark and lowercases again, so `"Metodologías"`,
/// `"METODOLOGIAS"` and `"metodologi\u{0301}as"` all fold to
/// `"metodologias"`. The second lowercase pass catches uppercase letters
/// that only appear after compatibility decomposition, which keeps the
/// function idempotent.
pub fn normalize(text: &str) -> String {
    let folded: String = text
        .to_lowercase()
        .nfkd()
        .filter(|c| !is_combining_mark(*c))
        .collect();
    folded.to_lowercase()
}

/// Returns `true` if `c` belongs to [`PUNCTUATION`].
pub fn is_boundary_punctuation(c: char) -> bool {
    PUNCTUATION.contains(&c)
}

/// Remove one trailing punctuation character, if present.
///
/// Only a single character is removed: `"Reto."` becomes `"Reto"`, while
/// `"Reto.)"` becomes `"Reto."`.
pub fn strip_trailing_punctuation(token: &str) -> &str {
    match token.chars().next_back() {
        Some(last) if is_boundary_punctuation(last) => &token[..token.len() - last.len_utf8()],
        _ => token,
    }
}
