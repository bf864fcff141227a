//! Concrete collaborator implementations.

pub mod article;
pub mod hf;
pub mod tavily;

pub use article::HttpArticleFetcher;
pub use hf::{HfEmbeddingModel, HfParaphraser, HfStanceClassifier};
pub use tavily::TavilySearchProvider;
