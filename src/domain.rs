//! Domain models for business registry lookups.
//!
//! This module contains the core domain types including business ids,
//! registry records and their time-filtered views, and configuration.

/// Finnish business id (Y-tunnus) parsing and checksum validation.
pub mod business_id;
pub use business_id::{BusinessId, Error as BusinessIdError};

mod config;
pub use config::{Config, DEFAULT_BASE_URL, LoadError as ConfigLoadError};

pub mod record;
pub use record::{
    CompanyFormEntry, Expiring, LiquidationEntry, NameEntry, RegistryRecord, TypeCode,
};

/// Time-filtered queries over a registry record.
pub mod record_view;
pub use record_view::TemporalRecordView;

/// Provenance labels for registry entries.
pub mod source;
pub use source::{SourceLabel, source_text};
