// src/draft.rs
// Editing of the message composed for writing. Nothing here talks to a tag.
use log::debug;

use crate::error::DraftError;
use crate::hex_codec;
use crate::ndef::{NdefMessage, NdefRecord};
use crate::types::DraftCommand;

pub fn apply(draft: &mut NdefMessage, command: DraftCommand) -> Result<(), DraftError> {
    match command {
        DraftCommand::Show => Ok(()),
        DraftCommand::AddRecord => {
            let id = draft.append_record(NdefRecord::empty());
            debug!("Draft: added record {}", id);
            Ok(())
        }
        DraftCommand::RemoveRecords(indices) => {
            let removed = draft.remove_records(indices);
            debug!("Draft: removed {} record(s)", removed.len());
            Ok(())
        }
        DraftCommand::UpdateRecord {
            index,
            format,
            record_type,
            identifier,
            payload,
        } => {
            // parse everything before touching the record so a bad field changes nothing
            let record_type = record_type.as_deref().map(parse_field).transpose()?;
            let identifier = identifier.as_deref().map(parse_field).transpose()?;
            let payload = payload.as_deref().map(parse_field).transpose()?;

            let record = draft
                .record_at_mut(index)
                .ok_or(DraftError::NoRecord(index))?;

            if let Some(format) = format {
                record.set_tnf(format);
            }
            if let Some(record_type) = record_type {
                record.set_record_type(record_type);
            }
            if let Some(identifier) = identifier {
                record.set_identifier(identifier);
            }
            if let Some(payload) = payload {
                record.set_payload(payload);
            }
            Ok(())
        }
    }
}

fn parse_field(value: &str) -> Result<Vec<u8>, DraftError> {
    hex_codec::parse(value).map_err(|source| DraftError::InvalidHex {
        value: value.to_string(),
        source,
    })
}
