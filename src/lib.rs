//! Terminal console for a volunteer and cargo relief coordination backend

pub mod api;
pub mod cli;
pub mod config;
pub mod forms;
pub mod logging;
pub mod tui;
