pub mod batch_extractor;
pub mod config;
pub mod data;
pub mod format;
pub mod identifiers;
