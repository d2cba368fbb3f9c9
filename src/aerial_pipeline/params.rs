//! Camera and enhancement parameters
//!
//! Immutable, range-checked value objects handed to every render call.

pub mod types;


pub use types::{
    EnhancementParams,
    ExtrinsicParams,
    IntrinsicParams,
    Parameters,
    ParametersBuilder,
};
