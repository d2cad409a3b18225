//! Command-line front end for the `nullsafe` binary.

pub mod args;
pub mod document;
pub mod driver;

#[cfg(test)]
#[path = "tests/document_tests.rs"]
mod document_tests;
#[cfg(test)]
#[path = "tests/driver_tests.rs"]
mod driver_tests;
