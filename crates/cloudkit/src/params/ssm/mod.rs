//! SSM Parameter Store implementation of
//! [`ParameterStore`](cloudkit_core::params::ParameterStore) using `aws-sdk-ssm`.

mod error;
mod store;

pub use store::SsmParameterStore;
