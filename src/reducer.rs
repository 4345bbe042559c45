use tracing::debug;

use crate::models::{FetchState, Story};

/// State transitions for the story list.
///
/// The enum is closed: `reduce` matches it without a wildcard arm, so a new
/// variant that is not handled there fails to compile instead of being ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    FetchInit,
    FetchSuccess { items: Vec<Story> },
    FetchFailure,
    RemoveItem { id: String },
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::FetchInit => "fetch_init",
            Action::FetchSuccess { .. } => "fetch_success",
            Action::FetchFailure => "fetch_failure",
            Action::RemoveItem { .. } => "remove_item",
        }
    }
}

/// Pure transition function. Equal inputs always give equal outputs.
pub fn reduce(state: &FetchState, action: Action) -> FetchState {
    match action {
        Action::FetchInit => FetchState {
            items: state.items.clone(),
            is_loading: true,
            is_error: false,
        },
        Action::FetchSuccess { items } => FetchState {
            items,
            is_loading: false,
            is_error: false,
        },
        Action::FetchFailure => FetchState {
            items: state.items.clone(),
            is_loading: false,
            is_error: true,
        },
        Action::RemoveItem { id } => FetchState {
            items: state
                .items
                .iter()
                .filter(|story| story.id != id)
                .cloned()
                .collect(),
            is_loading: state.is_loading,
            is_error: state.is_error,
        },
    }
}

/// Owns the current `FetchState`; every mutation goes through `dispatch`.
pub struct FetchStore {
    state: FetchState,
    comment_total: i64,
}

impl FetchStore {
    pub fn new() -> Self {
        Self {
            state: FetchState::new(),
            comment_total: 0,
        }
    }

    pub fn state(&self) -> &FetchState {
        &self.state
    }

    /// Sum of comment counts over the current items, cached between item changes.
    pub fn comment_total(&self) -> i64 {
        self.comment_total
    }

    /// Applies `action` and reports whether the state changed.
    pub fn dispatch(&mut self, action: Action) -> bool {
        let name = action.name();
        let next = reduce(&self.state, action);
        if next == self.state {
            debug!(action = name, "dispatch left state unchanged");
            return false;
        }

        if next.items != self.state.items {
            self.comment_total = sum_comments(&next.items);
        }
        debug!(
            action = name,
            items = next.items.len(),
            is_loading = next.is_loading,
            is_error = next.is_error,
            "dispatch"
        );
        self.state = next;
        true
    }
}

fn sum_comments(items: &[Story]) -> i64 {
    items.iter().map(|story| story.comment_count).sum()
}
