//! Core application primitives: HTTP surface and the screening pipeline.

pub mod http;
pub mod runtime;

pub use http::*;
pub use runtime::*;
