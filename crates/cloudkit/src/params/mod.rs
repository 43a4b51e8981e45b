//! Configuration parameter fetching.

mod fetcher;
pub mod memory;
#[cfg(feature = "ssm")]
pub mod ssm;

pub use fetcher::ParameterFetcher;
pub use memory::MemoryParameterStore;
#[cfg(feature = "ssm")]
pub use ssm::SsmParameterStore;
