//! CLI library for testing purposes

pub mod config;
pub mod google;
pub mod validation;

pub use arbsync::Synchronizer;
pub use config::Config;
pub use google::GoogleTranslator;
