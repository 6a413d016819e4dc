pub mod ingest;
pub mod units;

pub use ingest::*;
pub use units::{convert, grams_per_unit, CONVERSION_TABLE};
