//! Filter and selection state for the agenda view
//!
//! Holds the three pieces of user-driven view state: the global text filter,
//! the "differing votes only" toggle, and the set of selected item ids.
//! Selection is keyed by stable item id and deliberately decoupled from the
//! filtered view: hiding a selected item does not deselect it, but only
//! items that are both selected and currently visible are eligible for
//! export.
//!
//! None of these operations can fail; they are pure transitions over
//! in-memory state.

use std::collections::HashSet;

use crate::models::AgendaItem;

/// User-driven filter and selection state
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    filter_text: String,
    differing_votes_only: bool,
    selected: HashSet<String>,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter_text(&self) -> &str {
        &self.filter_text
    }

    pub fn set_filter_text(&mut self, text: impl Into<String>) {
        self.filter_text = text.into();
    }

    pub fn differing_votes_only(&self) -> bool {
        self.differing_votes_only
    }

    pub fn set_differing_votes_only(&mut self, enabled: bool) {
        self.differing_votes_only = enabled;
    }

    /// Derive the visible subset of `items`, preserving dataset order.
    ///
    /// The differing-votes toggle is applied first, then the global filter
    /// as a case-insensitive substring match against the rendered text of
    /// the display columns (item number, title, outcome, vote summary).
    pub fn visible_items<'a>(&self, items: &'a [AgendaItem]) -> Vec<&'a AgendaItem> {
        items
            .iter()
            .filter(|item| !self.differing_votes_only || item.has_differing_votes())
            .filter(|item| self.matches_filter(item))
            .collect()
    }

    fn matches_filter(&self, item: &AgendaItem) -> bool {
        if self.filter_text.is_empty() {
            return true;
        }
        let needle = self.filter_text.to_lowercase();

        let number = item.agenda_number.as_deref().unwrap_or("");
        let outcome = item.outcome().unwrap_or("");

        number.to_lowercase().contains(&needle)
            || item.title.to_lowercase().contains(&needle)
            || outcome.to_lowercase().contains(&needle)
            || item.vote_summary().to_lowercase().contains(&needle)
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.contains(id)
    }

    pub fn selected_count(&self) -> usize {
        self.selected.len()
    }

    /// Flip membership of `id` in the selection set
    pub fn toggle_item(&mut self, id: &str) {
        if !self.selected.remove(id) {
            self.selected.insert(id.to_string());
        }
    }

    /// Header-checkbox semantics over the currently visible ids: if every
    /// visible id is already selected, deselect them all; otherwise select
    /// them all. Ids not currently visible are unaffected either way.
    pub fn toggle_all<'a, I>(&mut self, visible_ids: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        let ids: Vec<&str> = visible_ids.into_iter().collect();
        if self.all_selected(&ids) {
            for id in ids {
                self.selected.remove(id);
            }
        } else {
            for id in ids {
                self.selected.insert(id.to_string());
            }
        }
    }

    /// True iff the visible set is non-empty and every visible id is selected
    pub fn is_all_selected<'a, I>(&self, visible_ids: I) -> bool
    where
        I: IntoIterator<Item = &'a str>,
    {
        let ids: Vec<&str> = visible_ids.into_iter().collect();
        self.all_selected(&ids)
    }

    fn all_selected(&self, ids: &[&str]) -> bool {
        !ids.is_empty() && ids.iter().all(|id| self.selected.contains(*id))
    }

    /// The export input set: selection ∩ currently visible, cloned in
    /// dataset order.
    pub fn export_items(&self, items: &[AgendaItem]) -> Vec<AgendaItem> {
        self.visible_items(items)
            .into_iter()
            .filter(|item| self.selected.contains(&item.id))
            .cloned()
            .collect()
    }
}
