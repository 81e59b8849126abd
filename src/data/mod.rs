//! Data layer: core types, loading, and aggregation.
//!
//! Architecture:
//! ```text
//!  MovieSummaries.tar.gz
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  fetch    │  download once, extract once
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  parse TSV files → Dataset
//!   └──────────┘
//!        │
//!        ▼
//!   ┌───────────┐
//!   │ aggregate  │  Analyzer queries (genre, filter) → CountTable
//!   └───────────┘
//! ```

pub mod aggregate;
pub mod fetch;
pub mod filter;
pub mod genre;
pub mod loader;
pub mod model;
pub mod table;
