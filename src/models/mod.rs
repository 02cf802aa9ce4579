//! API data models
//!
//! This module contains the OpenAI wire types and the check request/report
//! types exposed by the front-end.

pub mod check;
pub mod openai;
