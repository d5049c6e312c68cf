//! Port implementations.
//!
//! `live` talks to real files, timers and the HTTP review service;
//! `memory` keeps everything in process for tests and dry runs.

pub mod live;
pub mod memory;
