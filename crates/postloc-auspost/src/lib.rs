//! Client for the Australia Post postcode search API.

pub mod client;
pub mod error;
pub mod types;

pub use client::AusPostClient;
pub use error::AusPostError;
pub use types::{Locality, LocalityList, PostcodeSearchResponse};
