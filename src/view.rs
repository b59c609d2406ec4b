// src/view.rs
// Serializable projections of tags and NDEF data as sent to clients
use serde::Serialize;
use uuid::Uuid;

use crate::hex_codec;
use crate::manufacturer::ManufacturerRegistry;
use crate::ndef::{IdentifiedRecord, NdefMessage};
use crate::tag::TagDescriptor;

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct TagView {
    pub tag_type: String,
    pub manufacturer: String,
    pub manufacturer_code: u32,
    pub serial_number: String,
    pub ndef: Option<NdefView>,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct NdefView {
    pub status: String,
    pub capacity: usize,
    pub used: usize,
    pub size_in_bytes: usize,
    pub records: Vec<RecordView>,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct RecordView {
    pub id: Uuid,
    pub summary: String,
    pub format: String,
    pub type_label: String,
    pub identifier: String,
    pub payload: String,
    pub payload_length: usize,
    /// Present only when the payload reads as something other than hex.
    pub parsed_content: Option<String>,
}

impl TagView {
    pub fn new(tag: &TagDescriptor, registry: &ManufacturerRegistry) -> Self {
        Self {
            tag_type: tag.tag_type().to_string(),
            manufacturer: tag.manufacturer_name(registry),
            manufacturer_code: tag.manufacturer(),
            serial_number: hex_codec::encode(tag.serial_number()),
            ndef: tag.ndef().map(NdefView::new),
        }
    }

    pub fn list(tags: &[TagDescriptor], registry: &ManufacturerRegistry) -> Vec<Self> {
        tags.iter().map(|tag| Self::new(tag, registry)).collect()
    }
}

impl NdefView {
    pub fn new(message: &NdefMessage) -> Self {
        Self {
            status: message.status.to_string(),
            capacity: message.capacity,
            used: message.used,
            size_in_bytes: message.size_in_bytes(),
            records: message.records().iter().map(RecordView::new).collect(),
        }
    }
}

impl RecordView {
    pub fn new(identified: &IdentifiedRecord) -> Self {
        let record = &identified.record;
        let payload = hex_codec::encode(record.payload());
        let rendered = record.render();
        let parsed_content = if rendered != payload {
            Some(rendered)
        } else {
            None
        };

        Self {
            id: identified.id,
            summary: record.summary(),
            format: record.tnf().to_string(),
            type_label: record.type_label(),
            identifier: hex_codec::encode(record.identifier()),
            payload,
            payload_length: record.payload().len(),
            parsed_content,
        }
    }
}
