use std::path::Path;

use pdfhighlight::{Keyword, KeywordList, MatchMode};

use crate::cli::Cli;

const EXACT_SUFFIX: &str = "=exact";

/// Collect keywords in the order: keywords file, `--keywords`, `-k`, `-e`.
///
/// Returns `Err(1)` with a message on stderr if the keywords file cannot be
/// read or no keyword is left after dropping blank entries.
pub fn collect(cli: &Cli) -> Result<KeywordList, i32> {
    let mut entries: Vec<(String, MatchMode)> = Vec::new();

    if let Some(path) = &cli.keywords_file {
        entries.extend(read_keywords_file(path)?);
    }
    if let Some(input) = &cli.keyword_list {
        entries.extend(parse_comma_separated(input, cli.exact_words.as_deref()));
    }
    entries.extend(cli.keywords.iter().map(|k| (k.clone(), MatchMode::Partial)));
    entries.extend(cli.exact.iter().map(|k| (k.clone(), MatchMode::Exact)));

    let list = build(entries, cli.exact_all);
    if list.is_empty() {
        eprintln!("Error: no keywords given (use -k, -e, --keywords or --keywords-file)");
        return Err(1);
    }
    tracing::debug!(count = list.len(), "keywords loaded");
    Ok(list)
}

fn build(entries: Vec<(String, MatchMode)>, exact_all: bool) -> KeywordList {
    let mut list = KeywordList::new();
    for (text, mode) in entries {
        let text = text.trim();
        if text.is_empty() {
            continue;
        }
        let mode = if exact_all { MatchMode::Exact } else { mode };
        if !list.push(Keyword::new(text, mode)) {
            tracing::debug!(keyword = text, "duplicate keyword ignored");
        }
    }
    list
}

fn read_keywords_file(path: &Path) -> Result<Vec<(String, MatchMode)>, i32> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        eprintln!("Error: cannot read keywords file {}: {e}", path.display());
        1
    })?;
    Ok(parse_lines(&content))
}

/// `"a, b, c"` with an optional comma-separated exact subset.
pub fn parse_comma_separated(input: &str, exact: Option<&str>) -> Vec<(String, MatchMode)> {
    let exact = exact.map(|e| e.split(',').collect::<Vec<_>>()).unwrap_or_default();
    KeywordList::from_comma_separated(input, exact)
        .iter()
        .map(|k| (k.text().to_string(), k.mode()))
        .collect()
}

/// One keyword per line. A line ending in ` =exact` selects exact mode.
pub fn parse_lines(content: &str) -> Vec<(String, MatchMode)> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| match line.strip_suffix(EXACT_SUFFIX) {
            Some(rest) if rest.ends_with(char::is_whitespace) => {
                (rest.trim_end().to_string(), MatchMode::Exact)
            }
            _ => (line.to_string(), MatchMode::Partial),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(list: &KeywordList) -> Vec<(&str, MatchMode)> {
        list.iter().map(|k| (k.text(), k.mode())).collect()
    }

    #[test]
    fn parse_lines_modes() {
        let parsed = parse_lines("Reto =exact\n\n  Metodo  \nSituación\t=exact\nfoo=exact\n");
        assert_eq!(
            parsed,
            vec![
                ("Reto".to_string(), MatchMode::Exact),
                ("Metodo".to_string(), MatchMode::Partial),
                ("Situación".to_string(), MatchMode::Exact),
                ("foo=exact".to_string(), MatchMode::Partial),
            ]
        );
    }

    #[test]
    fn comma_separated_with_exact_subset() {
        let parsed = parse_comma_separated("Metodologías activas, DUA ,, Reto", Some("Reto, DUA"));
        assert_eq!(
            parsed,
            vec![
                ("Metodologías activas".to_string(), MatchMode::Partial),
                ("DUA".to_string(), MatchMode::Exact),
                ("Reto".to_string(), MatchMode::Exact),
            ]
        );
        assert_eq!(
            parse_comma_separated("ODS", None),
            vec![("ODS".to_string(), MatchMode::Partial)]
        );
    }

    #[test]
    fn build_drops_blanks_and_duplicates() {
        let list = build(
            vec![
                ("Reto".into(), MatchMode::Exact),
                ("  ".into(), MatchMode::Partial),
                ("Reto".into(), MatchMode::Partial),
                (" plan ".into(), MatchMode::Partial),
            ],
            false,
        );
        assert_eq!(
            texts(&list),
            vec![("Reto", MatchMode::Exact), ("plan", MatchMode::Partial)]
        );
    }

    #[test]
    fn exact_all_overrides_modes() {
        let list = build(vec![("Metodo".into(), MatchMode::Partial)], true);
        assert_eq!(texts(&list), vec![("Metodo", MatchMode::Exact)]);
    }
}
