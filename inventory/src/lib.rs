//! Point annotation parsing, color normalization and component counting.

mod common;
pub mod aggregate;
pub mod annotation;
pub mod catalog;
pub mod error;
pub mod record;
pub mod survey;

pub use aggregate::*;
pub use annotation::*;
pub use catalog::*;
pub use error::*;
pub use record::*;
pub use survey::*;
