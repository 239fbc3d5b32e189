//! Typeahead matching and the per-input suggestion state machine.

use std::rc::Rc;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::SUGGESTION_LIMIT;
use crate::ApiData;

// Reference names use hyphens where the user types spaces.
static WHITESPACE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Lowercase `term` and turn whitespace runs into hyphens.
pub fn normalize_term(term: &str) -> String {
    WHITESPACE_REGEX
        .replace_all(&term.to_lowercase(), "-")
        .into_owned()
}

/// Up to [`SUGGESTION_LIMIT`] entries whose name contains `term`, keeping
/// reference order. A term that is empty or only whitespace matches
/// everything and yields the first entries.
pub fn filter_candidates(reference: &[Rc<ApiData>], term: &str) -> Vec<Rc<ApiData>> {
    if term.trim().is_empty() {
        return reference.iter().take(SUGGESTION_LIMIT).cloned().collect();
    }
    let needle = normalize_term(term);
    reference
        .iter()
        .filter(|item| item.name.to_lowercase().contains(&needle))
        .take(SUGGESTION_LIMIT)
        .cloned()
        .collect()
}

/// Human-readable form of a reference name: `"thunder-punch"` → `"thunder punch"`.
pub fn display_name(item: &ApiData) -> String {
    item.name.replace('-', " ")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeaheadState {
    /// Popup closed, nothing pending.
    Idle,
    /// Waiting for typing to settle on `pending`.
    Debouncing { pending: String },
    /// Popup open with suggestions for the last emitted term.
    Showing,
}

/// One search box's suggestion logic, independent of any UI toolkit.
///
/// Three event sources feed it: debounced keystrokes, focus, and clicks
/// while the popup is closed. Whenever one of the methods returns
/// `Some(term)`, the caller recomputes suggestions with
/// [`filter_candidates`]. The caller owns the debounce timer: `input`
/// means (re)arm it, and its expiry calls `debounce_elapsed`.
#[derive(Debug, Clone)]
pub struct Typeahead {
    state: TypeaheadState,
    popup_open: bool,
    last_debounced: Option<String>,
}

impl Default for Typeahead {
    fn default() -> Self {
        Self::new()
    }
}

impl Typeahead {
    pub fn new() -> Self {
        Self {
            state: TypeaheadState::Idle,
            popup_open: false,
            last_debounced: None,
        }
    }

    pub fn state(&self) -> &TypeaheadState {
        &self.state
    }

    pub fn is_popup_open(&self) -> bool {
        self.popup_open
    }

    /// Text changed. Never emits directly.
    pub fn input(&mut self, text: &str) {
        self.state = TypeaheadState::Debouncing {
            pending: text.to_owned(),
        };
    }

    /// The debounce timer fired. Emits the pending text unless it equals
    /// the previous debounced text.
    pub fn debounce_elapsed(&mut self) -> Option<String> {
        let pending = match std::mem::replace(&mut self.state, TypeaheadState::Idle) {
            TypeaheadState::Debouncing { pending } => pending,
            other => {
                self.state = other;
                return None;
            }
        };

        if self.last_debounced.as_deref() == Some(pending.as_str()) {
            self.state = self.visible_state();
            return None;
        }
        self.last_debounced = Some(pending.clone());
        Some(self.show(pending))
    }

    pub fn focus(&mut self, text: &str) -> Option<String> {
        Some(self.show(text.to_owned()))
    }

    /// Clicks only reopen a closed popup.
    pub fn click(&mut self, text: &str) -> Option<String> {
        if self.popup_open {
            return None;
        }
        Some(self.show(text.to_owned()))
    }

    /// A suggestion was picked; the box clears and closes.
    pub fn select(&mut self) {
        self.last_debounced = Some(String::new());
        self.close();
    }

    pub fn dismiss(&mut self) {
        self.close();
    }

    fn show(&mut self, term: String) -> String {
        self.popup_open = true;
        self.state = TypeaheadState::Showing;
        term
    }

    fn close(&mut self) {
        self.popup_open = false;
        self.state = TypeaheadState::Idle;
    }

    fn visible_state(&self) -> TypeaheadState {
        if self.popup_open {
            TypeaheadState::Showing
        } else {
            TypeaheadState::Idle
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(names: &[&str]) -> Vec<Rc<ApiData>> {
        names
            .iter()
            .map(|n| Rc::new(ApiData::new(*n, format!("u/{}", n))))
            .collect()
    }

    fn names(items: &[Rc<ApiData>]) -> Vec<&str> {
        items.iter().map(|i| i.name.as_str()).collect()
    }

    #[test]
    fn spaces_match_hyphens_case_insensitively() {
        let reference = list(&["fire-punch", "fire-fang", "fire-type-move", "ember"]);
        assert_eq!(names(&filter_candidates(&reference, "Fire Punch")), ["fire-punch"]);
        assert_eq!(names(&filter_candidates(&reference, "fire-ty")), ["fire-type-move"]);
        assert_eq!(
            names(&filter_candidates(&reference, "FIRE")),
            ["fire-punch", "fire-fang", "fire-type-move"]
        );
    }

    #[test]
    fn matches_anywhere_in_the_name() {
        let reference = list(&["thunder-punch", "ice-punch", "punishment", "surf"]);
        assert_eq!(
            names(&filter_candidates(&reference, "pun")),
            ["thunder-punch", "ice-punch", "punishment"]
        );
        assert!(filter_candidates(&reference, "xyz").is_empty());
    }

    #[test]
    fn results_are_capped() {
        let many: Vec<String> = (0..25).map(|i| format!("move-{}", i)).collect();
        let refs: Vec<&str> = many.iter().map(String::as_str).collect();
        let reference = list(&refs);

        let found = filter_candidates(&reference, "move");
        assert_eq!(found.len(), SUGGESTION_LIMIT);
        assert_eq!(found[0].name, "move-0");

        let blank = filter_candidates(&reference, "");
        assert_eq!(names(&blank), names(&reference[..SUGGESTION_LIMIT]));
        assert_eq!(filter_candidates(&list(&["a", "b"]), "   ").len(), 2);
    }

    #[test]
    fn display_name_uses_spaces() {
        assert_eq!(display_name(&ApiData::new("u-turn", "x")), "u turn");
        assert_eq!(display_name(&ApiData::new("will-o-wisp", "x")), "will o wisp");
    }

    #[test]
    fn debounced_input_emits_once_per_distinct_term() {
        let mut t = Typeahead::new();
        t.input("fi");
        t.input("fir");
        assert_eq!(
            t.state(),
            &TypeaheadState::Debouncing {
                pending: "fir".to_string()
            }
        );
        assert_eq!(t.debounce_elapsed(), Some("fir".to_string()));
        assert!(t.is_popup_open());

        t.input("fire");
        t.input("fir");
        assert_eq!(t.debounce_elapsed(), None);
        assert_eq!(t.state(), &TypeaheadState::Showing);

        t.input("fire");
        assert_eq!(t.debounce_elapsed(), Some("fire".to_string()));
    }

    #[test]
    fn elapsed_without_pending_input_is_ignored() {
        let mut t = Typeahead::new();
        assert_eq!(t.debounce_elapsed(), None);
        assert_eq!(t.state(), &TypeaheadState::Idle);
    }

    #[test]
    fn focus_always_emits() {
        let mut t = Typeahead::new();
        assert_eq!(t.focus(""), Some(String::new()));
        assert_eq!(t.focus(""), Some(String::new()));
        assert_eq!(t.state(), &TypeaheadState::Showing);
    }

    #[test]
    fn clicks_only_reopen_a_closed_popup() {
        let mut t = Typeahead::new();
        assert_eq!(t.click("wat"), Some("wat".to_string()));
        assert_eq!(t.click("wat"), None);
        t.dismiss();
        assert!(!t.is_popup_open());
        assert_eq!(t.click("wat"), Some("wat".to_string()));
    }

    #[test]
    fn select_closes_and_cancels_pending_input() {
        let mut t = Typeahead::new();
        t.input("ember");
        t.select();
        assert_eq!(t.state(), &TypeaheadState::Idle);
        assert_eq!(t.debounce_elapsed(), None);
        assert!(!t.is_popup_open());
    }

    #[test]
    fn retyping_the_picked_term_reopens_suggestions() {
        let mut t = Typeahead::new();
        t.input("fire");
        assert_eq!(t.debounce_elapsed(), Some("fire".to_string()));
        t.select();

        t.input("fire");
        assert_eq!(t.debounce_elapsed(), Some("fire".to_string()));
        assert!(t.is_popup_open());

        t.select();
        t.input("");
        assert_eq!(t.debounce_elapsed(), None);
    }
}
