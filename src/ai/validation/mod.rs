//! AI Response Validation
//!
//! Turns unconstrained model output into typed records. Decoding is strict
//! after unwrapping a markdown fence; failure is reported as a value, never
//! as an error, so callers decide their own fallback.

mod decode;

pub use decode::{DecodeOutcome, decode};
