//! Core types shared across Bookkeeper facilities
//!
//! Holds the canonical field keys and event names used by the structured
//! logging facility and the error facility, so that every crate emits the
//! same vocabulary.

pub mod schema;
