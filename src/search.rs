//! Search state management

use crate::models::Story;

/// Search field state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchState {
    /// Text the request target is built from; changes only on submit
    pub committed_term: String,
    /// Text currently in the search field
    pub draft_term: String,
}

impl SearchState {
    /// Starts with the field showing the committed term.
    pub fn new(committed_term: &str) -> Self {
        Self {
            committed_term: committed_term.to_string(),
            draft_term: committed_term.to_string(),
        }
    }

    pub fn set_draft(&mut self, text: &str) {
        self.draft_term.clear();
        self.draft_term.push_str(text);
    }

    /// Commits the draft. Returns `true` if the committed term changed.
    pub fn submit(&mut self) -> bool {
        if self.committed_term == self.draft_term {
            return false;
        }
        self.committed_term = self.draft_term.clone();
        true
    }

    pub fn has_uncommitted_edits(&self) -> bool {
        self.committed_term != self.draft_term
    }
}

/// Stories whose title contains `needle`, ignoring case. An empty needle keeps everything.
pub fn filter_by_title<'a>(items: &'a [Story], needle: &str) -> Vec<&'a Story> {
    let needle = needle.trim().to_lowercase();
    if needle.is_empty() {
        return items.iter().collect();
    }

    items
        .iter()
        .filter(|story| story.title.to_lowercase().contains(&needle))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::story;

    #[test]
    fn typing_only_touches_the_draft() {
        let mut search = SearchState::new("React");
        search.set_draft("r");
        search.set_draft("re");
        search.set_draft("redux");

        assert_eq!(search.draft_term, "redux");
        assert_eq!(search.committed_term, "React");
        assert!(search.has_uncommitted_edits());
    }

    #[test]
    fn submit_commits_the_draft() {
        let mut search = SearchState::new("React");
        search.set_draft("redux");

        assert!(search.submit());
        assert_eq!(search.committed_term, "redux");
        assert!(!search.has_uncommitted_edits());
    }

    #[test]
    fn submitting_the_same_term_reports_no_change() {
        let mut search = SearchState::new("React");
        assert!(!search.submit());
        assert_eq!(search.committed_term, "React");
    }

    #[test]
    fn filter_ignores_case() {
        let items = vec![story("0", "React"), story("1", "Redux"), story("2", "Realololo")];
        let titles: Vec<_> = filter_by_title(&items, "REA")
            .into_iter()
            .map(|s| s.title.as_str())
            .collect();
        assert_eq!(titles, vec!["React", "Realololo"]);
    }

    #[test]
    fn empty_filter_keeps_everything() {
        let items = vec![story("0", "React"), story("1", "Redux")];
        assert_eq!(filter_by_title(&items, "  ").len(), 2);
    }

    #[test]
    fn filter_without_match_is_empty() {
        let items = vec![story("0", "React")];
        assert!(filter_by_title(&items, "vue").is_empty());
    }
}
