pub mod action;
pub mod app;
pub mod config;
pub mod error;
pub mod event;
pub mod export;
pub mod format;
pub mod i18n;
pub mod logging;
pub mod system;
pub mod ui;
