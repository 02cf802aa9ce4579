//! HTTP front-end
//!
//! The checker page and the JSON endpoints it calls.

pub mod endpoints;
pub mod page;
