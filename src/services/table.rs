//! Table presentation layer
//!
//! Turns the visible items into row view-models with the display columns:
//! selection checkbox, item number, title, backup link, color-toned vote
//! lines and the derived outcome. Sorting reorders the rendered rows only;
//! it never touches the underlying dataset, filter or selection state.

use serde::Serialize;

use crate::models::{AgendaItem, AFFIRMATIVE_VOTE};

/// Label of the backup link cell
pub const BACKUP_LABEL: &str = "Backup";

/// Placeholder shown when an item carries no agenda number
pub const MISSING_NUMBER_PLACEHOLDER: &str = "\u{2014}";

/// Visual treatment of a vote line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteTone {
    Affirmative,
    Negative,
}

impl VoteTone {
    /// `"Aye"` is the only affirmative value; every other string, including
    /// unrecognized ones, is rendered negative. There is no third category.
    pub fn for_value(value: &str) -> Self {
        if value == AFFIRMATIVE_VOTE {
            Self::Affirmative
        } else {
            Self::Negative
        }
    }
}

/// One rendered vote line
#[derive(Debug, Clone, Serialize)]
pub struct VoteCell {
    /// `name: value` display text
    pub text: String,
    pub tone: VoteTone,
}

/// One rendered table row
#[derive(Debug, Clone, Serialize)]
pub struct TableRow {
    pub id: String,
    /// Checkbox state, bound to the selection set
    pub selected: bool,
    pub item_number: String,
    pub title: String,
    /// Hyperlink of the first attachment, when any exist
    pub backup_link: Option<String>,
    pub votes: Vec<VoteCell>,
    pub outcome: Option<String>,
}

impl TableRow {
    fn from_item(item: &AgendaItem, selected: bool) -> Self {
        Self {
            id: item.id.clone(),
            selected,
            item_number: item
                .agenda_number
                .clone()
                .unwrap_or_else(|| MISSING_NUMBER_PLACEHOLDER.to_string()),
            title: item.title.clone(),
            backup_link: item.attachments.first().map(|a| a.hyperlink.clone()),
            votes: item
                .votes
                .iter()
                .map(|vote| VoteCell {
                    text: format!("{}: {}", vote.person_name, vote.vote_value),
                    tone: VoteTone::for_value(&vote.vote_value),
                })
                .collect(),
            outcome: item.outcome().map(str::to_string),
        }
    }
}

/// Sortable columns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
    ItemNumber,
    Title,
    Outcome,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Per-table sort state, cycling unsorted → ascending → descending →
/// unsorted on repeated toggles of the same column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SortState {
    order: Option<(SortColumn, SortDirection)>,
}

impl SortState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn order(&self) -> Option<(SortColumn, SortDirection)> {
        self.order
    }

    /// Advance the sort cycle for `column`; toggling a different column
    /// starts that column ascending.
    pub fn toggle(&mut self, column: SortColumn) {
        self.order = match self.order {
            Some((current, SortDirection::Ascending)) if current == column => {
                Some((column, SortDirection::Descending))
            }
            Some((current, SortDirection::Descending)) if current == column => None,
            _ => Some((column, SortDirection::Ascending)),
        };
    }
}

/// Build the rendered rows for the visible items, applying the sort state.
///
/// The sort is stable: rows with equal keys keep their dataset order.
pub fn build_rows<F>(visible: &[&AgendaItem], is_selected: F, sort: SortState) -> Vec<TableRow>
where
    F: Fn(&str) -> bool,
{
    let mut rows: Vec<TableRow> = visible
        .iter()
        .map(|item| TableRow::from_item(item, is_selected(&item.id)))
        .collect();

    if let Some((column, direction)) = sort.order() {
        rows.sort_by(|a, b| {
            let ordering = sort_key(a, column).cmp(sort_key(b, column));
            match direction {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            }
        });
    }

    rows
}

fn sort_key(row: &TableRow, column: SortColumn) -> &str {
    match column {
        SortColumn::ItemNumber => &row.item_number,
        SortColumn::Title => &row.title,
        SortColumn::Outcome => row.outcome.as_deref().unwrap_or(""),
    }
}
