//! Services layer - core application logic
//!
//! This module contains the viewing pipeline:
//! - Retrieving the dataset from the agenda endpoint
//! - Deriving the visible subset and tracking the selection
//! - Building the rendered table rows with stable sorting
//! - Laying out the export document

pub mod export;
pub mod session;
pub mod source;
pub mod table;
pub mod view;

pub use export::{
    render_agenda_pdf, ExportError, ExportState, Exporter, DOCUMENT_TITLE, DOWNLOAD_FILE_NAME,
};
pub use session::AgendaSession;
pub use source::{AgendaSource, FetchError, HttpAgendaSource, API_URL_ENV};
pub use table::{
    build_rows, SortColumn, SortDirection, SortState, TableRow, VoteCell, VoteTone, BACKUP_LABEL,
    MISSING_NUMBER_PLACEHOLDER,
};
pub use view::ViewState;
