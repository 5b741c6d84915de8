//! Domains module containing business logic organized by bounded contexts.
//!
//! The server exposes a single domain: tools over the Nightingale API.

pub mod tools;
