//! Coupon normalization & import pipeline.
//!
//! Raw records (parsed CSV rows or JSON objects) flow through the field
//! mapper, type coercer, and defaulter, are checked by the schema validator,
//! and valid records are handed to the upsert coordinator, which writes them
//! through a [`offerbase_core::CouponStore`]. Per record the state machine is
//! Raw → Mapped → Coerced → Defaulted → {Valid, Invalid}, and
//! Valid → {Inserted, Updated, Skipped}. Record-level failures never abort
//! the batch; they are collected into the aggregate [`ImportReport`].

pub mod coerce;
pub mod defaults;
pub mod error;
pub mod import;
pub mod mapper;
pub mod memory;
pub mod normalize;
pub mod reader;
pub mod report;
pub mod validate;
pub mod warnings;

pub use error::ImportError;
pub use import::{import_from_csv, import_from_json, import_records, ContentKind, ImportOptions};
pub use memory::MemoryStore;
pub use normalize::{finalize_record, normalize_record, NormalizedRecord};
pub use reader::{
    discover_data_files, read_csv_file, read_csv_records, read_json_file, read_json_records,
};
pub use report::ImportReport;
pub use warnings::NormalizeWarning;
