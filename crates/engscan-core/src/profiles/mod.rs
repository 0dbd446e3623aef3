pub mod builtin;
pub mod catalog;
pub mod classify;
pub mod features;
pub mod score;

pub use catalog::{AnalysisError, DeepAnalysis, EngineProfile, ProfileRegistry, RegistryError};
pub use classify::Classifier;
pub use score::Confidence;
