pub(crate) mod app;
pub(crate) mod cli;
pub(crate) mod config;
pub(crate) mod effects;
pub(crate) mod ui;

pub(crate) use app::run_app;
