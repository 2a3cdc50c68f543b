//! BSSC Relay Library
//!
//! Query relay behind the BSSC AI Explorer: classifies a query, optionally
//! looks up a balance over JSON-RPC, and asks Gemini for an answer.

pub mod classify;
pub mod config;
pub mod error;
pub mod generation;
pub mod prompt;
pub mod protocol;
pub mod relay;
pub mod rpc;
pub mod ui;
