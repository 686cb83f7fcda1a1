pub mod app;
pub mod config;
pub mod error;
pub mod format;
pub mod history;
pub mod logging;
pub mod model;
pub mod rank;
pub mod report;
pub mod stats;
