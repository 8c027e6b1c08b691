//! Memetrix: signal evaluation and trade decision engine for a token
//! listing feed.
//!
//! The evaluation path is pure and synchronous: normalize → gate/score →
//! decide. Collaborators (listing feed, candle source, advisory workers,
//! event log) sit behind traits or HTTP clients and are injected at the
//! edges.

pub mod advisory;
pub mod config;
pub mod core;
pub mod events;
pub mod indicators;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod services;
pub mod signals;
