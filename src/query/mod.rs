pub mod analytical;
pub mod report;

pub use analytical::*;
pub use report::*;
