//! Agenda item model
//!
//! This module provides:
//! - `AgendaItem` entity representing one matter considered at a meeting
//! - `Attachment`, `Vote` and `HistoryEntry` nested records
//! - Display helpers shared by the table and the PDF exporter (outcome rule,
//!   differing-votes predicate, vote summary text)
//!
//! Serialized field names are the data source's own (`EventItemId`,
//! `MatterAttachmentHyperlink`, ...). Missing identifier or title is schema
//! drift and fails deserialization; every list field tolerates absence and
//! defaults to empty.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// The only vote value with defined special behavior. Everything else,
/// recognized or not, gets the negative visual treatment.
pub const AFFIRMATIVE_VOTE: &str = "Aye";

/// One agenda entry for a meeting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgendaItem {
    /// Unique, stable identifier; the selection key
    #[serde(rename = "EventItemId")]
    pub id: String,
    /// Ordinal label shown to the user; may be absent
    #[serde(rename = "EventItemAgendaNumber", default)]
    pub agenda_number: Option<String>,
    /// Free text describing the item
    #[serde(rename = "EventItemTitle")]
    pub title: String,
    /// Source-provided sequence number, informational only
    #[serde(rename = "EventItemAgendaSequence", default)]
    pub agenda_sequence: Option<i64>,
    /// Source-provided matter identifier, informational only
    #[serde(rename = "EventItemMatterId", default)]
    pub matter_id: Option<String>,
    /// Attachments in display order; the first one is "the" backup link
    #[serde(rename = "Attachments", default)]
    pub attachments: Vec<Attachment>,
    /// Votes in the order received from the data source
    #[serde(rename = "Votes", default)]
    pub votes: Vec<Vote>,
    /// History records; only the first entry is consulted for the outcome
    #[serde(rename = "MatterHistory", default)]
    pub history: Vec<HistoryEntry>,
}

/// File attached to an agenda item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attachment {
    /// Display label
    #[serde(rename = "MatterAttachmentName")]
    pub name: String,
    /// External URL; never validated or fetched by this system
    #[serde(rename = "MatterAttachmentHyperlink")]
    pub hyperlink: String,
    /// Original file name, informational only
    #[serde(rename = "MatterAttachmentFileName", default)]
    pub file_name: String,
}

/// One recorded vote on an agenda item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vote {
    /// Voter name, free text
    #[serde(rename = "VotePersonName")]
    pub person_name: String,
    /// Vote value, opaque free text trusted verbatim from the source
    #[serde(rename = "VoteValueName")]
    pub vote_value: String,
}

impl Vote {
    /// Whether this vote gets the affirmative visual treatment
    pub fn is_affirmative(&self) -> bool {
        self.vote_value == AFFIRMATIVE_VOTE
    }
}

/// One history record for an agenda item's underlying matter
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HistoryEntry {
    #[serde(rename = "MatterHistoryActionName", default)]
    pub action_name: String,
    #[serde(rename = "MatterHistoryActionText", default)]
    pub action_text: String,
    #[serde(rename = "MatterHistoryMoverName", default)]
    pub mover_name: String,
    #[serde(rename = "MatterHistoryPassedFlagName", default)]
    pub passed_flag_name: String,
    #[serde(rename = "MatterHistorySeconderName", default)]
    pub seconder_name: String,
}

impl HistoryEntry {
    /// Display outcome for this record: the passed flag when non-empty,
    /// otherwise the action name.
    pub fn outcome(&self) -> &str {
        if self.passed_flag_name.is_empty() {
            &self.action_name
        } else {
            &self.passed_flag_name
        }
    }
}

impl AgendaItem {
    /// Display outcome, derived from the first (effective) history record.
    /// `None` when the item has no history at all.
    pub fn outcome(&self) -> Option<&str> {
        self.history.first().map(HistoryEntry::outcome)
    }

    /// True when the recorded vote values are not all identical. Items with
    /// zero or one votes never qualify.
    pub fn has_differing_votes(&self) -> bool {
        let distinct: HashSet<&str> = self.votes.iter().map(|v| v.vote_value.as_str()).collect();
        distinct.len() > 1
    }

    /// Rendered text of the votes column, one `name: value` line per vote
    pub fn vote_summary(&self) -> String {
        self.votes
            .iter()
            .map(|v| format!("{}: {}", v.person_name, v.vote_value))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
