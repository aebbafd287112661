//! Sensitive-data detection for ironsieve.
//!
//! The catalog compiles every pattern once at startup; the scanner walks
//! text with a fresh match iterator per call and redacts everything it
//! reports. The unredacted match never leaves this crate.

pub mod catalog;
pub mod scanner;

pub use catalog::{Pattern, PatternCatalog, luhn_check, ssn_check};
pub use scanner::Scanner;
