pub mod classify;
pub mod config;
pub mod history;
pub mod model;
