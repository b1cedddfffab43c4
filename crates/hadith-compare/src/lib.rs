//! Regression comparison harness for the hadith REST API
//!
//! This crate walks the relational hierarchy behind the API
//! (collections → books → chapters → hadiths), issues the same request
//! against two deployments, and reports deep structural diffs between
//! the JSON responses.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐      ┌─────────────────┐
//! │  Baseline API   │      │  Candidate API  │
//! │  :5000          │      │  :8084          │
//! └────────┬────────┘      └────────┬────────┘
//!          │                        │
//!          └──────────┬─────────────┘
//!                     │
//!              ┌──────▼──────┐      ┌─────────┐
//!              │  Comparator │◀─────│  MySQL  │
//!              │  (diff)     │ ids  │         │
//!              └─────────────┘      └─────────┘
//! ```
//!
//! The database supplies the identifiers used to build request paths;
//! it is read-only and never written by this tool.

pub mod client;
pub mod compare;
pub mod config;
pub mod db;
pub mod error;
pub mod harness;
pub mod run;

pub use config::HarnessConfig;
pub use error::{HarnessError, HarnessResult};
