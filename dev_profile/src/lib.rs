//! Developer profile building blocks.
//!
//! # Overview
//!
//! A developer profile is a structured snapshot of a user's public GitHub
//! footprint: the projects they own or contribute to, how much they commit,
//! review and discuss, which languages they write, and a short generated
//! narrative summarizing all of it.
//!
//! The `api` feature exposes the error taxonomy and the [`api::GithubApi`]
//! trait that any concrete client has to implement. The `analyzer` feature
//! adds the analysis pipeline built on top of that trait: project discovery
//! across four data sources, per-project contribution counting, activity
//! bucketing, language aggregation and narrative generation, plus the
//! on-disk profile store.

#[cfg(feature = "api")]
pub mod api;
#[cfg(feature = "api")]
pub mod types;

#[cfg(feature = "analyzer")]
pub mod activity;
#[cfg(feature = "analyzer")]
pub mod counts;
#[cfg(feature = "analyzer")]
pub mod discovery;
#[cfg(feature = "analyzer")]
pub mod languages;
#[cfg(feature = "analyzer")]
pub mod narrative;
#[cfg(feature = "analyzer")]
pub mod schema;
#[cfg(feature = "analyzer")]
pub mod store;

#[cfg(all(test, feature = "analyzer"))]
pub(crate) mod testing;
