//! Core domain entities for store resolution.
//!
//! Entities are plain data structures. Parsing of the loosely-typed stored
//! JSON (hours, fulfillment flags) lives next to the type it produces.
//!
//! # Entity Types
//!
//! - [`VendorCandidate`] - Read-only snapshot of an approved vendor
//! - [`OperatingHours`] - Weekly opening windows
//! - [`ResolvedStore`] - A vendor able to serve the customer, with distance

pub mod hours;
pub mod store;
pub mod vendor;

pub use hours::{DayHours, OperatingHours};
pub use store::{Eligibility, ResolvedStore};
pub use vendor::{FulfillmentMode, FulfillmentModes, UnknownFulfillmentMode, VendorCandidate};
