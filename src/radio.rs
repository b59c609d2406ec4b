// src/radio.rs
//! The contract between the session controller and whatever drives the
//! antenna. A `Radio` only issues operations; every completion comes back
//! later as a [`RadioEvent`] tagged with the session and the tag's discovery
//! index.

use crate::error::RadioError;
use crate::ndef::{NdefRecord, NdefStatus};

pub type SessionId = u64;

/// A tag as reported by discovery, before any NDEF access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawTag {
    /// ISO 14443 (MIFARE family); the identifier is the UID.
    Iso14443 { identifier: Vec<u8> },
    /// ISO 15693 vicinity tag.
    Iso15693 {
        ic_manufacturer_code: u32,
        ic_serial_number: Vec<u8>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NdefStatusReport {
    pub status: NdefStatus,
    pub capacity: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawNdefMessage {
    pub length: usize,
    pub records: Vec<NdefRecord>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RadioEvent {
    Discovered {
        session: SessionId,
        tags: Vec<RawTag>,
    },
    Connected {
        session: SessionId,
        tag: usize,
        result: Result<(), RadioError>,
    },
    NdefStatus {
        session: SessionId,
        tag: usize,
        result: Result<NdefStatusReport, RadioError>,
    },
    NdefRead {
        session: SessionId,
        tag: usize,
        result: Result<Option<RawNdefMessage>, RadioError>,
    },
    /// The radio ended the session on its own (reader gone, user cancel, ...).
    Invalidated { session: SessionId, reason: String },
}

impl RadioEvent {
    pub fn session(&self) -> SessionId {
        match self {
            Self::Discovered { session, .. }
            | Self::Connected { session, .. }
            | Self::NdefStatus { session, .. }
            | Self::NdefRead { session, .. }
            | Self::Invalidated { session, .. } => *session,
        }
    }
}

pub trait Radio {
    /// Starts polling; answered with `Discovered` (or `Invalidated`).
    fn discover(&mut self, session: SessionId);

    fn connect(&mut self, session: SessionId, tag: usize);

    fn query_ndef_status(&mut self, session: SessionId, tag: usize);

    fn read_ndef(&mut self, session: SessionId, tag: usize);

    /// Tears the session down. No events are expected for it afterwards.
    fn invalidate(&mut self, session: SessionId, error_message: Option<&str>);
}

/// In-memory radio for tests: records what was asked of it and lets the test
/// deliver completions in any order.
#[cfg(test)]
pub(crate) mod scripted {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum RadioCall {
        Discover(SessionId),
        Connect(SessionId, usize),
        QueryNdefStatus(SessionId, usize),
        ReadNdef(SessionId, usize),
        Invalidate(SessionId, Option<String>),
    }

    #[derive(Debug, Default)]
    pub struct ScriptedRadio {
        pub calls: Vec<RadioCall>,
    }

    impl ScriptedRadio {
        pub fn invalidations(&self) -> Vec<&RadioCall> {
            self.calls
                .iter()
                .filter(|c| matches!(c, RadioCall::Invalidate(..)))
                .collect()
        }
    }

    impl Radio for ScriptedRadio {
        fn discover(&mut self, session: SessionId) {
            self.calls.push(RadioCall::Discover(session));
        }

        fn connect(&mut self, session: SessionId, tag: usize) {
            self.calls.push(RadioCall::Connect(session, tag));
        }

        fn query_ndef_status(&mut self, session: SessionId, tag: usize) {
            self.calls.push(RadioCall::QueryNdefStatus(session, tag));
        }

        fn read_ndef(&mut self, session: SessionId, tag: usize) {
            self.calls.push(RadioCall::ReadNdef(session, tag));
        }

        fn invalidate(&mut self, session: SessionId, error_message: Option<&str>) {
            self.calls.push(RadioCall::Invalidate(
                session,
                error_message.map(str::to_string),
            ));
        }
    }
}
