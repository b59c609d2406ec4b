// src/error.rs
use std::path::PathBuf;

use thiserror::Error;

/// Terminal outcome of a failed read session. Every variant ends the session;
/// a failed NDEF status query is tolerated and never reaches this type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("No tags discovered")]
    NoTagsDiscovered,
    #[error("Failed to connect to tag {index}: {reason}")]
    ConnectFailed { index: usize, reason: String },
    #[error("Failed to read NDEF from tag {index}: {reason}")]
    NdefReadFailed { index: usize, reason: String },
    #[error("Session invalidated: {0}")]
    SessionInvalidated(String),
}

/// Failures reported by the radio collaborator for a single operation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RadioError {
    #[error("PC/SC error: {0}")]
    Pcsc(#[from] pcsc::Error),
    #[error("Card returned status {sw1:02X} {sw2:02X}")]
    Status { sw1: u8, sw2: u8 },
    #[error("Response too short ({0} bytes)")]
    ShortResponse(usize),
    #[error("Tag {0} is not connected")]
    NotConnected(usize),
    #[error("Unknown tag index {0}")]
    UnknownTag(usize),
    #[error("Unsupported tag: {0}")]
    Unsupported(String),
    #[error("Authentication failed for block {0}")]
    AuthenticationFailed(u8),
    #[error("Invalid capability container: {0:02X?}")]
    InvalidCapabilityContainer(Vec<u8>),
    #[error(transparent)]
    Ndef(#[from] NdefError),
}

/// NDEF wire-format decoding failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NdefError {
    #[error("No NDEF TLV found")]
    MissingTlv,
    #[error("Truncated {what}: needed {needed} bytes at offset {offset}, {available} available")]
    Truncated {
        what: &'static str,
        offset: usize,
        needed: usize,
        available: usize,
    },
    #[error("Chunked records are not supported")]
    ChunkedRecord,
}

/// Rejected edits to the message being composed.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DraftError {
    #[error("Invalid hex '{value}': {source}")]
    InvalidHex {
        value: String,
        #[source]
        source: hex::FromHexError,
    },
    #[error("No draft record at index {0}")]
    NoRecord(usize),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}
