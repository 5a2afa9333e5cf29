//! Agendaview - meeting agenda viewer with selectable PDF export
//!
//! This library provides the core functionality for the agenda viewer:
//! the typed dataset model, the fetch/filter/select/export pipeline and
//! the HTTP surface that serves the dataset and the application shell.

pub mod api;
pub mod config;
pub mod models;
pub mod services;
