//! Port traits defining external boundaries.
//!
//! Each trait is one collaborator the review core talks to: the host
//! document, the analysis service, per-document persistence, time, waiting
//! and identifiers. Implementations live in `src/adapters/`.

pub mod analysis;
pub mod clock;
pub mod document;
pub mod id_gen;
pub mod kv;
pub mod sleeper;

pub use analysis::{
    AnalysisFuture, AnalysisRequest, AnalysisService, ChatReply, ChatRequest, ReplyRequest,
    ReplyResponse,
};
pub use clock::Clock;
pub use document::{DocumentFuture, DocumentPlatform};
pub use id_gen::IdGenerator;
pub use kv::KeyValueStore;
pub use sleeper::{SleepFuture, Sleeper};

/// Error type carried across every port boundary.
pub type PortError = Box<dyn std::error::Error + Send + Sync>;
