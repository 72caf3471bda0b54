//! Finnish Business Registry Lookups
//!
//! Business ids are validated and normalized locally, then looked up from the
//! PRH open data service. The registry keeps every historical version of a
//! business's names and filings; [`TemporalRecordView`] answers what is in
//! force on a given date.

pub mod domain;
pub use domain::{BusinessId, BusinessIdError, Config, RegistryRecord, TemporalRecordView};

/// Registry access over HTTP.
pub mod registry;
pub use registry::{Fetch, HttpFetch, RegistryLookup};
