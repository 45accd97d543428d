//! lazyhog core - record types and the data-access contract.
//!
//! Pure data structures plus the `DataSource` trait the dashboard engine
//! talks to. This crate performs no I/O of its own.

pub mod error;
pub mod records;
pub mod resource;
pub mod source;

pub use error::{DataError, DataResult};
pub use records::{EventRecord, FeatureFlag, PersonRecord, Record, Timestamp};
pub use resource::Resource;
pub use source::DataSource;
