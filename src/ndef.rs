// src/ndef.rs
use std::fmt;
use std::str;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::NdefError;
use crate::hex_codec;
use crate::well_known::WellKnownType;

/// URI identifier codes from the NFC Forum URI RTD, indexed by the first payload byte.
pub const URI_PREFIXES: [&str; 36] = [
    "",                           // 0x00 - no prefix
    "http://www.",                // 0x01
    "https://www.",               // 0x02
    "http://",                    // 0x03
    "https://",                   // 0x04
    "tel:",                       // 0x05
    "mailto:",                    // 0x06
    "ftp://anonymous:anonymous@", // 0x07
    "ftp://ftp.",                 // 0x08
    "ftps://",                    // 0x09
    "sftp://",                    // 0x0A
    "smb://",                     // 0x0B
    "nfs://",                     // 0x0C
    "ftp://",                     // 0x0D
    "dav://",                     // 0x0E
    "news:",                      // 0x0F
    "telnet://",                  // 0x10
    "imap:",                      // 0x11
    "rtsp://",                    // 0x12
    "urn:",                       // 0x13
    "pop:",                       // 0x14
    "sip:",                       // 0x15
    "sips:",                      // 0x16
    "tftp:",                      // 0x17
    "btspp://",                   // 0x18
    "btl2cap://",                 // 0x19
    "btgoep://",                  // 0x1A
    "tcpobex://",                 // 0x1B
    "irdaobex://",                // 0x1C
    "file://",                    // 0x1D
    "urn:epc:id:",                // 0x1E
    "urn:epc:tag:",               // 0x1F
    "urn:epc:pat:",               // 0x20
    "urn:epc:raw:",               // 0x21
    "urn:epc:",                   // 0x22
    "urn:nfc:",                   // 0x23
];

// TLV block tags used in tag memory
const TLV_NULL: u8 = 0x00;
const TLV_NDEF: u8 = 0x03;
const TLV_TERMINATOR: u8 = 0xFE;

// Record header flags
const FLAG_ME: u8 = 0x40;
const FLAG_CF: u8 = 0x20;
const FLAG_SR: u8 = 0x10;
const FLAG_IL: u8 = 0x08;

/// How a record's `type` field is to be interpreted (3-bit TNF).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TypeNameFormat {
    #[default]
    Empty,
    WellKnown,
    Media,
    AbsoluteUri,
    External,
    Unknown,
    Unchanged,
}

impl TypeNameFormat {
    pub const ALL: [TypeNameFormat; 7] = [
        Self::Empty,
        Self::WellKnown,
        Self::Media,
        Self::AbsoluteUri,
        Self::External,
        Self::Unknown,
        Self::Unchanged,
    ];

    /// Maps the low three header bits. The reserved value 7 is read as `Unknown`.
    pub fn from_bits(bits: u8) -> Self {
        match bits & 0x07 {
            0 => Self::Empty,
            1 => Self::WellKnown,
            2 => Self::Media,
            3 => Self::AbsoluteUri,
            4 => Self::External,
            6 => Self::Unchanged,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for TypeNameFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Empty => "Empty",
            Self::WellKnown => "NFC Forum Well Known",
            Self::Media => "Media",
            Self::AbsoluteUri => "Absolute URI",
            Self::External => "NFC Forum External",
            Self::Unknown => "Unknown",
            Self::Unchanged => "Unchanged",
        };
        f.write_str(label)
    }
}

/// NDEF capability reported by the tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum NdefStatus {
    #[default]
    NotSupported,
    ReadOnly,
    ReadWrite,
}

impl fmt::Display for NdefStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::NotSupported => "Not Supported",
            Self::ReadOnly => "Read Only",
            Self::ReadWrite => "Read/Write",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TextEncoding {
    Utf8,
    Utf16,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextPayload {
    pub encoding: TextEncoding,
    pub language: String,
    pub text: String,
}

/// One NDEF record. The byte fields are only ever replaced as a whole.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NdefRecord {
    tnf: TypeNameFormat,
    record_type: Vec<u8>,
    identifier: Vec<u8>,
    payload: Vec<u8>,
}

impl NdefRecord {
    pub fn new(
        tnf: TypeNameFormat,
        record_type: Vec<u8>,
        identifier: Vec<u8>,
        payload: Vec<u8>,
    ) -> Self {
        Self {
            tnf,
            record_type,
            identifier,
            payload,
        }
    }

    /// Blank record used when composing a message.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn tnf(&self) -> TypeNameFormat {
        self.tnf
    }

    pub fn record_type(&self) -> &[u8] {
        &self.record_type
    }

    pub fn identifier(&self) -> &[u8] {
        &self.identifier
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    pub fn set_tnf(&mut self, tnf: TypeNameFormat) {
        self.tnf = tnf;
    }

    pub fn set_record_type(&mut self, record_type: Vec<u8>) {
        self.record_type = record_type;
    }

    pub fn set_identifier(&mut self, identifier: Vec<u8>) {
        self.identifier = identifier;
    }

    pub fn set_payload(&mut self, payload: Vec<u8>) {
        self.payload = payload;
    }

    /// URI carried by a `U` record: prefix code byte followed by UTF-8.
    ///
    /// Only the `type` field is checked, the declared TNF is not.
    pub fn well_known_uri(&self) -> Option<String> {
        if self.record_type != WellKnownType::Uri.code().as_bytes() {
            return None;
        }

        let (&code, rest) = self.payload.split_first()?;
        let prefix = URI_PREFIXES.get(code as usize)?;
        let body = str::from_utf8(rest).ok()?;

        let uri = format!("{prefix}{body}");
        if uri.is_empty() || uri.chars().any(|c| c.is_control() || c.is_whitespace()) {
            return None;
        }
        Some(uri)
    }

    /// Text carried by a `T` record: status byte (bit 7 = UTF-16, bits 5-0 =
    /// language length), language code, then the text.
    ///
    /// Only the `type` field is checked, the declared TNF is not.
    pub fn well_known_text(&self) -> Option<TextPayload> {
        if self.record_type != WellKnownType::Text.code().as_bytes() {
            return None;
        }

        let (&status, rest) = self.payload.split_first()?;
        let language_len = (status & 0x3F) as usize;
        if rest.len() < language_len {
            return None;
        }
        let (language, text) = rest.split_at(language_len);
        let language = str::from_utf8(language).ok()?.to_string();

        if status & 0x80 != 0 {
            let text = decode_utf16(text)?;
            Some(TextPayload {
                encoding: TextEncoding::Utf16,
                language,
                text,
            })
        } else {
            let text = str::from_utf8(text).ok()?.to_string();
            Some(TextPayload {
                encoding: TextEncoding::Utf8,
                language,
                text,
            })
        }
    }

    /// Best human reading of the payload: URI, then text, then hex.
    pub fn render(&self) -> String {
        if let Some(uri) = self.well_known_uri() {
            return uri;
        }
        if let Some(text) = self.well_known_text() {
            return text.text;
        }
        hex_codec::encode(&self.payload)
    }

    /// Hex of the type field, e.g. `0x54 (Text)` when it names a well-known type.
    pub fn type_label(&self) -> String {
        let mut label = hex_codec::encode(&self.record_type);
        if self.record_type.is_ascii() {
            if let Ok(code) = str::from_utf8(&self.record_type) {
                if let Some(known) = WellKnownType::from_code(code) {
                    label.push_str(&format!(" ({})", known.description()));
                }
            }
        }
        label
    }

    /// Short list label built from the first bytes of the payload.
    pub fn summary(&self) -> String {
        let payload_hex = hex_codec::encode(&self.payload);
        let prefix: String = payload_hex.chars().take(8).collect();
        format!("Payload {}", prefix)
    }
}

// UTF-16 text honours a BOM, big-endian otherwise
fn decode_utf16(bytes: &[u8]) -> Option<String> {
    if bytes.len() % 2 != 0 {
        return None;
    }

    let (little_endian, body) = match bytes {
        [0xFF, 0xFE, rest @ ..] => (true, rest),
        [0xFE, 0xFF, rest @ ..] => (false, rest),
        _ => (false, bytes),
    };

    let units: Vec<u16> = body
        .chunks_exact(2)
        .map(|pair| {
            if little_endian {
                u16::from_le_bytes([pair[0], pair[1]])
            } else {
                u16::from_be_bytes([pair[0], pair[1]])
            }
        })
        .collect();

    String::from_utf16(&units).ok()
}

/// A record paired with the identity it keeps for the lifetime of its message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentifiedRecord {
    pub id: Uuid,
    pub record: NdefRecord,
}

impl IdentifiedRecord {
    pub fn new(record: NdefRecord) -> Self {
        Self {
            id: Uuid::new_v4(),
            record,
        }
    }
}

/// NDEF state of one tag, or a message being composed for writing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NdefMessage {
    pub status: NdefStatus,
    pub capacity: usize,
    pub used: usize,
    records: Vec<IdentifiedRecord>,
}

impl NdefMessage {
    pub fn new(status: NdefStatus, capacity: usize) -> Self {
        Self {
            status,
            capacity,
            used: 0,
            records: Vec::new(),
        }
    }

    pub fn from_raw_records(records: Vec<NdefRecord>, reported_length: usize) -> Self {
        let mut message = Self::default();
        message.extend_from_raw(records, reported_length);
        message
    }

    /// Applies a completed read: `used` takes the reported length and every
    /// record is appended in order under a fresh identifier.
    pub fn extend_from_raw(&mut self, records: Vec<NdefRecord>, reported_length: usize) {
        self.used = reported_length;
        self.records
            .extend(records.into_iter().map(IdentifiedRecord::new));
    }

    pub fn records(&self) -> &[IdentifiedRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn record(&self, id: Uuid) -> Option<&IdentifiedRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn record_at_mut(&mut self, index: usize) -> Option<&mut NdefRecord> {
        self.records.get_mut(index).map(|r| &mut r.record)
    }

    pub fn append_record(&mut self, record: NdefRecord) -> Uuid {
        let identified = IdentifiedRecord::new(record);
        let id = identified.id;
        self.records.push(identified);
        id
    }

    pub fn remove_record(&mut self, index: usize) -> Option<IdentifiedRecord> {
        if index < self.records.len() {
            Some(self.records.remove(index))
        } else {
            None
        }
    }

    /// Removes several positions at once. Indices refer to the sequence as it
    /// was before the call; duplicates and out-of-range indices are skipped.
    pub fn remove_records<I>(&mut self, indices: I) -> Vec<IdentifiedRecord>
    where
        I: IntoIterator<Item = usize>,
    {
        let mut indices: Vec<usize> = indices.into_iter().collect();
        indices.sort_unstable_by(|a, b| b.cmp(a));
        indices.dedup();

        indices
            .into_iter()
            .filter_map(|index| self.remove_record(index))
            .collect()
    }

    // TODO: compute the encoded length once an NDEF encoder exists for the write path
    pub fn size_in_bytes(&self) -> usize {
        0
    }
}

/// Finds the NDEF TLV in tag memory and returns its value.
///
/// `Ok(None)` means the tag holds no message (terminator reached first, or an
/// empty NDEF TLV).
pub fn find_ndef_tlv(memory: &[u8]) -> Result<Option<&[u8]>, NdefError> {
    let mut cursor = 0;

    while cursor < memory.len() {
        let tag = memory[cursor];
        cursor += 1;

        match tag {
            TLV_NULL => continue,
            TLV_TERMINATOR => return Ok(None),
            _ => {}
        }

        // 1. Length: one byte, or 0xFF followed by two bytes
        let first = take(memory, cursor, 1, "TLV length")?[0];
        cursor += 1;
        let length = if first == 0xFF {
            let long = take(memory, cursor, 2, "TLV length")?;
            cursor += 2;
            u16::from_be_bytes([long[0], long[1]]) as usize
        } else {
            first as usize
        };

        // 2. Value
        let value = take(memory, cursor, length, "TLV value")?;
        cursor += length;

        if tag == TLV_NDEF {
            if value.is_empty() {
                return Ok(None);
            }
            return Ok(Some(value));
        }
        // lock control, memory control and proprietary TLVs are skipped
    }

    Err(NdefError::MissingTlv)
}

/// Decodes the records of an NDEF message, stopping at the ME flag.
pub fn parse_records(data: &[u8]) -> Result<Vec<NdefRecord>, NdefError> {
    let mut records = Vec::new();
    let mut cursor = 0;

    while cursor < data.len() {
        let header = data[cursor];
        cursor += 1;

        if header & FLAG_CF != 0 {
            return Err(NdefError::ChunkedRecord);
        }
        let tnf = TypeNameFormat::from_bits(header);
        let is_short_record = header & FLAG_SR != 0;
        let has_id = header & FLAG_IL != 0;
        let is_me = header & FLAG_ME != 0;

        // 1. Type length
        let type_len = take(data, cursor, 1, "type length")?[0] as usize;
        cursor += 1;

        // 2. Payload length (1 byte for short records, 4 bytes otherwise)
        let payload_len = if is_short_record {
            let len = take(data, cursor, 1, "payload length")?[0] as usize;
            cursor += 1;
            len
        } else {
            let bytes = take(data, cursor, 4, "payload length")?;
            cursor += 4;
            u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as usize
        };

        // 3. ID length (if present)
        let id_len = if has_id {
            let len = take(data, cursor, 1, "id length")?[0] as usize;
            cursor += 1;
            len
        } else {
            0
        };

        // 4. Type, ID, payload
        let record_type = take(data, cursor, type_len, "type")?.to_vec();
        cursor += type_len;

        let identifier = take(data, cursor, id_len, "id")?.to_vec();
        cursor += id_len;

        let payload = take(data, cursor, payload_len, "payload")?.to_vec();
        cursor += payload_len;

        records.push(NdefRecord::new(tnf, record_type, identifier, payload));

        if is_me {
            break;
        }
    }

    Ok(records)
}

fn take<'a>(
    data: &'a [u8],
    offset: usize,
    needed: usize,
    what: &'static str,
) -> Result<&'a [u8], NdefError> {
    let available = data.len().saturating_sub(offset);
    if needed > available {
        return Err(NdefError::Truncated {
            what,
            offset,
            needed,
            available,
        });
    }
    Ok(&data[offset..offset + needed])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_record(language: &str, text: &str) -> NdefRecord {
        let mut payload = vec![language.len() as u8];
        payload.extend_from_slice(language.as_bytes());
        payload.extend_from_slice(text.as_bytes());
        NdefRecord::new(TypeNameFormat::WellKnown, b"T".to_vec(), vec![], payload)
    }

    fn uri_record(tnf: TypeNameFormat, code: u8, rest: &str) -> NdefRecord {
        let mut payload = vec![code];
        payload.extend_from_slice(rest.as_bytes());
        NdefRecord::new(tnf, b"U".to_vec(), vec![], payload)
    }

    #[test]
    fn render_prefers_uri() {
        let record = uri_record(TypeNameFormat::AbsoluteUri, 0x04, "example.com/tag");
        assert_eq!(record.render(), "https://example.com/tag");
    }

    #[test]
    fn render_ignores_declared_format() {
        let record = uri_record(TypeNameFormat::Media, 0x06, "someone@example.com");
        assert_eq!(record.render(), "mailto:someone@example.com");

        let mut text = text_record("en", "hello");
        text.set_tnf(TypeNameFormat::Empty);
        assert_eq!(text.render(), "hello");
    }

    #[test]
    fn render_falls_back_to_text() {
        let record = text_record("en", "Hello, tag");
        assert_eq!(record.well_known_uri(), None);
        assert_eq!(record.render(), "Hello, tag");

        let parsed = record.well_known_text().unwrap();
        assert_eq!(parsed.language, "en");
        assert_eq!(parsed.encoding, TextEncoding::Utf8);
    }

    #[test]
    fn render_falls_back_to_hex() {
        let record = NdefRecord::new(
            TypeNameFormat::Media,
            b"application/octet-stream".to_vec(),
            vec![],
            vec![0xDE, 0xAD, 0xBE, 0xEF],
        );
        assert_eq!(record.render(), "DE:AD:BE:EF");
        assert_eq!(record.render(), hex_codec::encode(record.payload()));
    }

    #[test]
    fn uri_with_control_bytes_is_not_a_uri() {
        let record = NdefRecord::new(
            TypeNameFormat::AbsoluteUri,
            vec![0x55],
            vec![0x01],
            vec![0x01, 0x02, 0x69],
        );
        assert_eq!(record.well_known_uri(), None);
        assert_eq!(record.render(), "01:02:69");
    }

    #[test]
    fn unknown_uri_prefix_code_is_not_a_uri() {
        let record = uri_record(TypeNameFormat::WellKnown, 0x24, "example.com");
        assert_eq!(record.well_known_uri(), None);
    }

    #[test]
    fn text_with_overlong_language_is_not_text() {
        let record = NdefRecord::new(
            TypeNameFormat::WellKnown,
            b"T".to_vec(),
            vec![],
            vec![0x05, b'e', b'n'],
        );
        assert_eq!(record.well_known_text(), None);
        assert_eq!(record.render(), "05:65:6E");
    }

    #[test]
    fn utf16_text() {
        let mut payload = vec![0x80 | 2, b'e', b'n'];
        for unit in "hé".encode_utf16() {
            payload.extend_from_slice(&unit.to_be_bytes());
        }
        let record = NdefRecord::new(TypeNameFormat::WellKnown, b"T".to_vec(), vec![], payload);
        let parsed = record.well_known_text().unwrap();
        assert_eq!(parsed.encoding, TextEncoding::Utf16);
        assert_eq!(parsed.text, "hé");
    }

    #[test]
    fn empty_payload_renders_empty() {
        let record = NdefRecord::empty();
        assert_eq!(record.render(), "");
        assert_eq!(record.type_label(), "");
        assert_eq!(record.tnf(), TypeNameFormat::Empty);
    }

    #[test]
    fn type_label_appends_description() {
        assert_eq!(text_record("en", "x").type_label(), "0x54 (Text)");
        assert_eq!(
            uri_record(TypeNameFormat::WellKnown, 0, "a").type_label(),
            "0x55 (URI)"
        );
    }

    #[test]
    fn type_label_without_known_type() {
        let record = NdefRecord::new(TypeNameFormat::Media, b"ab".to_vec(), vec![], vec![]);
        assert_eq!(record.type_label(), "61:62");

        let record = NdefRecord::new(TypeNameFormat::Unknown, vec![0xD4], vec![], vec![]);
        assert_eq!(record.type_label(), "0xD4");
    }

    #[test]
    fn summary_uses_first_hex_chars() {
        let record = NdefRecord::new(
            TypeNameFormat::Unknown,
            vec![],
            vec![],
            vec![0x01, 0x02, 0x03, 0x04],
        );
        assert_eq!(record.summary(), "Payload 01:02:03");
    }

    #[test]
    fn from_raw_records_keeps_order_and_assigns_ids() {
        let raw = vec![
            text_record("en", "one"),
            text_record("en", "two"),
            text_record("en", "three"),
        ];
        let message = NdefMessage::from_raw_records(raw.clone(), 42);

        assert_eq!(message.used, 42);
        assert_eq!(message.len(), 3);
        let records: Vec<_> = message.records().iter().map(|r| r.record.clone()).collect();
        assert_eq!(records, raw);

        let first = message.records()[0].id;
        assert_ne!(first, message.records()[1].id);
        assert_ne!(message.records()[1].id, message.records()[2].id);
        assert_eq!(message.record(first).unwrap().record.render(), "one");
    }

    #[test]
    fn remove_records_in_descending_order() {
        let mut message = NdefMessage::default();
        message.append_record(text_record("en", "a"));
        let middle = message.append_record(text_record("en", "b"));
        message.append_record(text_record("en", "c"));

        let removed = message.remove_records([0, 2]);

        assert_eq!(removed.len(), 2);
        assert_eq!(message.len(), 1);
        assert_eq!(message.records()[0].id, middle);
        assert_eq!(message.records()[0].record.render(), "b");
    }

    #[test]
    fn remove_records_skips_duplicates_and_out_of_range() {
        let mut message = NdefMessage::default();
        message.append_record(NdefRecord::empty());
        message.append_record(NdefRecord::empty());

        let removed = message.remove_records([1, 1, 7]);
        assert_eq!(removed.len(), 1);
        assert_eq!(message.len(), 1);
        assert!(message.remove_record(3).is_none());
    }

    #[test]
    fn size_in_bytes_is_always_zero() {
        let mut message = NdefMessage::new(NdefStatus::ReadWrite, 496);
        assert_eq!(message.size_in_bytes(), 0);
        message.append_record(text_record("en", "a fairly long piece of text"));
        message.append_record(uri_record(TypeNameFormat::WellKnown, 4, "example.com"));
        assert_eq!(message.size_in_bytes(), 0);
    }

    #[test]
    fn status_and_format_labels() {
        assert_eq!(NdefStatus::ReadWrite.to_string(), "Read/Write");
        assert_eq!(NdefStatus::NotSupported.to_string(), "Not Supported");
        assert_eq!(TypeNameFormat::WellKnown.to_string(), "NFC Forum Well Known");
        assert_eq!(TypeNameFormat::ALL.len(), 7);
        assert_eq!(TypeNameFormat::from_bits(0xD1), TypeNameFormat::WellKnown);
        assert_eq!(TypeNameFormat::from_bits(0x07), TypeNameFormat::Unknown);
    }

    #[test]
    fn parse_single_short_text_record() {
        // MB ME SR TNF=1, type "T", payload 02 "en" "hi"
        let data = [0xD1, 0x01, 0x05, b'T', 0x02, b'e', b'n', b'h', b'i'];
        let records = parse_records(&data).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].tnf(), TypeNameFormat::WellKnown);
        assert_eq!(records[0].record_type(), b"T");
        assert_eq!(records[0].render(), "hi");
    }

    #[test]
    fn parse_multiple_records_with_id_and_long_length() {
        let mut data = vec![
            0x99, // MB SR IL TNF=1
            0x01, 0x02, 0x01, b'U', 0x07, 0x04, b'a',
        ];
        // ME, long record, TNF=2
        data.extend_from_slice(&[0x42, 0x03, 0x00, 0x00, 0x00, 0x02]);
        data.extend_from_slice(b"a/b");
        data.extend_from_slice(&[0xCA, 0xFE]);

        let records = parse_records(&data).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].identifier(), &[0x07]);
        assert_eq!(records[0].render(), "https://a");
        assert_eq!(records[1].tnf(), TypeNameFormat::Media);
        assert_eq!(records[1].payload(), &[0xCA, 0xFE]);
    }

    #[test]
    fn parse_rejects_truncated_payload() {
        let data = [0xD1, 0x01, 0x09, b'T', 0x02];
        assert!(matches!(
            parse_records(&data),
            Err(NdefError::Truncated { what: "payload", .. })
        ));
    }

    #[test]
    fn parse_rejects_chunked_records() {
        let data = [0xB1, 0x01, 0x01, b'T', 0x00];
        assert_eq!(parse_records(&data), Err(NdefError::ChunkedRecord));
    }

    #[test]
    fn tlv_scan_skips_control_blocks() {
        // NULL, lock control TLV, NDEF TLV, terminator
        let memory = [
            0x00, 0x01, 0x03, 0xA0, 0x0C, 0x34, 0x03, 0x02, 0xAA, 0xBB, 0xFE,
        ];
        assert_eq!(find_ndef_tlv(&memory).unwrap(), Some(&[0xAA, 0xBB][..]));
    }

    #[test]
    fn tlv_scan_three_byte_length() {
        let mut memory = vec![0x03, 0xFF, 0x01, 0x00];
        memory.extend_from_slice(&[0x11; 256]);
        memory.push(0xFE);
        assert_eq!(find_ndef_tlv(&memory).unwrap().unwrap().len(), 256);
    }

    #[test]
    fn tlv_scan_empty_message() {
        assert_eq!(find_ndef_tlv(&[0x03, 0x00, 0xFE]).unwrap(), None);
        assert_eq!(find_ndef_tlv(&[0xFE]).unwrap(), None);
    }

    #[test]
    fn tlv_scan_errors() {
        assert_eq!(find_ndef_tlv(&[]), Err(NdefError::MissingTlv));
        assert_eq!(find_ndef_tlv(&[0x00, 0x00]), Err(NdefError::MissingTlv));
        assert!(matches!(
            find_ndef_tlv(&[0x03, 0x05, 0x01]),
            Err(NdefError::Truncated { .. })
        ));
    }
}
