//! mongospy - live MongoDB serverStatus dashboard.
//!
//! This library provides the pieces shared by the `mongospy` binary and its
//! tests:
//! - `provider` - sources of serverStatus documents (MongoDB, file, mock)
//! - `sampler` - background polling, path resolution and counter derivation
//! - `series` - bounded per-metric windows, cumulative totals, comparisons
//! - `tui` - interactive terminal dashboard

pub mod config;
pub mod derive;
pub mod fmt;
pub mod handoff;
pub mod provider;
pub mod sampler;
pub mod series;
pub mod sink;
pub mod snapshot;
pub mod tui;
pub mod util;
