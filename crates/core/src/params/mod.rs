mod error;
mod traits;
mod types;

pub use error::{ParameterError, Result};
pub use traits::ParameterStore;
pub use types::{
    chunk_names, relative_name, Parameter, ParameterBatch, ParameterPage, GET_PARAMETERS_LIMIT,
};
