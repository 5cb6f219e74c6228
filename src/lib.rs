//! Removes rows from Excel order exports whose Order, Buyer PO Number,
//! Comment or ShipmentID cells contain one of a fixed set of markers
//! (test orders, free-of-charge shipments, M88 entries).

pub mod data;
pub mod error;
pub mod pipeline;
pub mod progress;
pub mod worker;

pub use data::filter::{filter, validate, ColumnRule, FilterResult, RuleSet};
pub use data::model::{Cell, Table};
pub use error::{CleanError, ErrorKind};
pub use pipeline::{CleanOptions, RunSummary};
