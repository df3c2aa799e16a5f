//! Dependency manifest types and loading.
//!
//! A manifest describes six independent dependency categories. It is read
//! once, held immutably for one processing pass, then dropped.

mod load;
mod types;

pub use load::{ManifestError, from_json_str, from_yaml_str, parse};
pub use types::*;
pub(crate) use types::present;
