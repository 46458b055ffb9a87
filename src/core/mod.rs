pub mod clock;
pub mod config;
pub mod fetcher;
pub mod formatter;
pub mod models;
pub mod notifier;
pub mod pipeline;
