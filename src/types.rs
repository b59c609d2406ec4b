// src/types.rs
#![allow(non_camel_case_types)]

use serde::{Deserialize, Serialize};

use crate::ndef::TypeNameFormat;
use crate::view::{NdefView, TagView};

// Messages sent TO the WebSocket client (Frontend)
#[derive(Serialize, Clone, Debug)]
#[serde(tag = "type")]
pub enum OutgoingMessage {
    READER_STATUS { success: bool },
    CARD_STATUS { success: bool, message: String },
    READ_STARTED { session: u64 },
    READ_COMPLETE { session: u64, tags: Vec<TagView> },
    READ_ERROR { session: u64, error: String, tags: Vec<TagView> },
    DRAFT_UPDATED { draft: NdefView },
    DRAFT_ERROR { error: String },
    READER_ERROR { error: String },
}

// Messages received FROM the WebSocket client
#[derive(Deserialize, Debug, PartialEq)]
#[serde(tag = "type")]
pub enum IncomingMessage {
    GET_READER_STATUS,
    BEGIN_READ,
    GET_DRAFT,
    ADD_DRAFT_RECORD,
    REMOVE_DRAFT_RECORDS {
        indices: Vec<usize>,
    },
    UPDATE_DRAFT_RECORD {
        index: usize,
        #[serde(default)]
        format: Option<TypeNameFormat>,
        #[serde(default)]
        record_type: Option<String>,
        #[serde(default)]
        identifier: Option<String>,
        #[serde(default)]
        payload: Option<String>,
    },
}

// Edits to the message being composed for writing
#[derive(Debug, Clone, PartialEq)]
pub enum DraftCommand {
    Show,
    AddRecord,
    RemoveRecords(Vec<usize>),
    UpdateRecord {
        index: usize,
        format: Option<TypeNameFormat>,
        record_type: Option<String>,
        identifier: Option<String>,
        payload: Option<String>,
    },
}

// Internal commands sent from WS Server -> NFC Thread
#[derive(Debug, Clone, PartialEq)]
pub enum NfcCommand {
    BeginRead,
    CheckReaderStatus,
    Draft(DraftCommand),
}

impl From<IncomingMessage> for NfcCommand {
    fn from(msg: IncomingMessage) -> Self {
        match msg {
            IncomingMessage::GET_READER_STATUS => NfcCommand::CheckReaderStatus,
            IncomingMessage::BEGIN_READ => NfcCommand::BeginRead,
            IncomingMessage::GET_DRAFT => NfcCommand::Draft(DraftCommand::Show),
            IncomingMessage::ADD_DRAFT_RECORD => NfcCommand::Draft(DraftCommand::AddRecord),
            IncomingMessage::REMOVE_DRAFT_RECORDS { indices } => {
                NfcCommand::Draft(DraftCommand::RemoveRecords(indices))
            }
            IncomingMessage::UPDATE_DRAFT_RECORD {
                index,
                format,
                record_type,
                identifier,
                payload,
            } => NfcCommand::Draft(DraftCommand::UpdateRecord {
                index,
                format,
                record_type,
                identifier,
                payload,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_incoming() {
        let msg: IncomingMessage = serde_json::from_str(r#"{"type":"BEGIN_READ"}"#).unwrap();
        assert_eq!(NfcCommand::from(msg), NfcCommand::BeginRead);

        let msg: IncomingMessage =
            serde_json::from_str(r#"{"type":"REMOVE_DRAFT_RECORDS","indices":[0,2]}"#).unwrap();
        assert_eq!(
            NfcCommand::from(msg),
            NfcCommand::Draft(DraftCommand::RemoveRecords(vec![0, 2]))
        );

        let msg: IncomingMessage = serde_json::from_str(
            r#"{"type":"UPDATE_DRAFT_RECORD","index":1,"format":"WellKnown","payload":"02:65:6E"}"#,
        )
        .unwrap();
        assert_eq!(
            NfcCommand::from(msg),
            NfcCommand::Draft(DraftCommand::UpdateRecord {
                index: 1,
                format: Some(TypeNameFormat::WellKnown),
                record_type: None,
                identifier: None,
                payload: Some("02:65:6E".into()),
            })
        );
    }

    #[test]
    fn outgoing_is_tagged() {
        let json = serde_json::to_value(OutgoingMessage::READ_ERROR {
            session: 3,
            error: "No tags discovered".into(),
            tags: vec![],
        })
        .unwrap();
        assert_eq!(json["type"], "READ_ERROR");
        assert_eq!(json["session"], 3);
        assert_eq!(json["error"], "No tags discovered");
    }
}
