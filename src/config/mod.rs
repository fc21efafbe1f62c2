//! Configuration module for Syllabus.
//!
//! Handles loading and saving application settings.

mod settings;

pub use settings::{
    EmbeddingSettings, GeneralSettings, LlmSettings, SearchSettings, SessionSettings, Settings,
    VectorStoreProvider, VectorStoreSettings,
};
