pub mod app;
pub mod components;
pub mod config;
pub mod runtime;
pub mod shell;
pub mod workflow;
