//! Capture Trace Decoder (capdec) Library
//!
//! Decodes TLS capture logs (one JSON record per line) into readable
//! application-layer content: HTTP framing, chunked bodies, gzip streams and
//! chat-completion messages.

pub mod capture;
pub mod cli;
pub mod config;
pub mod content;
pub mod decode;
pub mod error;
pub mod report;
pub mod session;
pub mod theme;

pub use capture::{CaptureEvent, EventReader};
pub use config::Config;
pub use decode::{DecodedEvent, DecodedPayload, Decoder};
pub use error::DecodeError;
pub use report::{DiagnosticRecord, Finding, Report, Reporter};
pub use session::Session;
pub use theme::Theme;
