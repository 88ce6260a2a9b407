pub mod artifact_store;
pub mod providers;
pub mod relay;

pub use artifact_store::{ArtifactStore, GithubStore, StoreError};
pub use providers::{ProviderError, TextProvider};
