//! Tabular-data summarization for FreightDesk.
//!
//! Turns a loaded [`Table`](freightdesk_core::Table) into a bounded-size
//! markdown digest of its statistical shape — row/column counts, missing
//! totals, per-numeric-column statistics, per-text-column cardinality and
//! samples, per-date-column ranges. The digest feeds the prompt assembler as
//! remote-model context.
//!
//! `summarize` is a pure function of its input: it never mutates the table,
//! caches nothing, and is deterministic except for the bounded random text
//! sample (seedable via [`SummaryOptions`] for tests).

pub mod digest;
pub mod stats;

pub use digest::{
    summarize, summarize_with, DateDigest, NumericDigest, SummaryOptions, TableDigest, TextDigest,
};
