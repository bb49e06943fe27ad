use crate::keyword::KeywordList;

/// Keywords not yet found in any processed page text.
///
/// Starts out containing every keyword and only ever shrinks: a keyword
/// leaves the set once its presence pattern matches some page. Iteration
/// follows the keyword list order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnmatchedSet {
    keywords: Vec<String>,
    found: Vec<bool>,
}

impl UnmatchedSet {
    /// A set holding every keyword of `keywords`.
    pub fn new(keywords: &KeywordList) -> Self {
        Self {
            keywords: keywords.iter().map(|k| k.text().to_string()).collect(),
            found: vec![false; keywords.len()],
        }
    }

    /// Remove the keyword at `index` (its position in the keyword list).
    ///
    /// Returns `true` if it was still unmatched. Out-of-range indices are ignored.
    pub fn remove(&mut self, index: usize) -> bool {
        match self.found.get_mut(index) {
            Some(found) if !*found => {
                *found = true;
                true
            }
            _ => false,
        }
    }

    /// Remove every keyword that `other` has already removed.
    ///
    /// Both sets must come from the same keyword list. Merging is the union
    /// of found keywords, so the order in which per-page sets are merged
    /// does not matter.
    pub fn merge(&mut self, other: &UnmatchedSet) {
        debug_assert_eq!(self.keywords, other.keywords);
        for (found, other_found) in self.found.iter_mut().zip(&other.found) {
            *found |= *other_found;
        }
    }

    pub fn contains(&self, keyword: &str) -> bool {
        self.iter().any(|k| k == keyword)
    }

    pub fn contains_index(&self, index: usize) -> bool {
        self.found.get(index).is_some_and(|found| !found)
    }

    pub fn len(&self) -> usize {
        self.found.iter().filter(|found| !**found).count()
    }

    pub fn is_empty(&self) -> bool {
        self.found.iter().all(|found| *found)
    }

    /// Remaining keywords, in list order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.keywords
            .iter()
            .zip(&self.found)
            .filter(|(_, found)| !**found)
            .map(|(k, _)| k.as_str())
    }

    pub fn into_vec(self) -> Vec<String> {
        self.keywords
            .into_iter()
            .zip(self.found)
            .filter_map(|(k, found)| (!found).then_some(k))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keyword::MatchMode;

    fn keywords() -> KeywordList {
        [
            ("Reto", MatchMode::Exact),
            ("ODS", MatchMode::Partial),
            ("Metodo", MatchMode::Partial),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn starts_full() {
        let set = UnmatchedSet::new(&keywords());
        assert_eq!(set.len(), 3);
        assert!(!set.is_empty());
        assert_eq!(set.iter().collect::<Vec<_>>(), vec!["Reto", "ODS", "Metodo"]);
    }

    #[test]
    fn remove_shrinks_once() {
        let mut set = UnmatchedSet::new(&keywords());
        assert!(set.remove(1));
        assert!(!set.remove(1));
        assert!(!set.remove(99));
        assert!(!set.contains("ODS"));
        assert!(!set.contains_index(1));
        assert!(set.contains_index(0));
        assert_eq!(set.into_vec(), vec!["Reto".to_string(), "Metodo".to_string()]);
    }

    #[test]
    fn merge_is_union_of_found() {
        let kws = keywords();
        let mut doc = UnmatchedSet::new(&kws);
        let mut page1 = UnmatchedSet::new(&kws);
        page1.remove(0);
        let mut page2 = UnmatchedSet::new(&kws);
        page2.remove(2);

        doc.merge(&page2);
        doc.merge(&page1);
        assert_eq!(doc.iter().collect::<Vec<_>>(), vec!["ODS"]);
    }

    #[test]
    fn merge_never_grows() {
        let kws = keywords();
        let mut doc = UnmatchedSet::new(&kws);
        doc.remove(0);
        let before = doc.len();
        doc.merge(&UnmatchedSet::new(&kws));
        assert_eq!(doc.len(), before);
        assert!(!doc.contains("Reto"));
    }

    #[test]
    fn empty_keyword_list_is_empty() {
        let set = UnmatchedSet::new(&KeywordList::new());
        assert!(set.is_empty());
        assert_eq!(set.len(), 0);
    }
}
