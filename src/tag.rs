// src/tag.rs
use crate::manufacturer::ManufacturerRegistry;
use crate::ndef::NdefMessage;
use crate::radio::RawTag;

pub const ISO14443_LABEL: &str = "ISO 14443";
pub const ISO15693_LABEL: &str = "ISO 15693";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Iso14443Tag {
    pub identifier: Vec<u8>,
    pub manufacturer: u32,
    pub ndef: Option<NdefMessage>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Iso15693Tag {
    pub ic_manufacturer_code: u32,
    pub ic_serial_number: Vec<u8>,
    pub ndef: Option<NdefMessage>,
}

/// A discovered tag. The serial number is its identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagDescriptor {
    Iso14443(Iso14443Tag),
    Iso15693(Iso15693Tag),
}

impl TagDescriptor {
    pub fn from_raw(raw: RawTag) -> Self {
        match raw {
            RawTag::Iso14443 { identifier } => {
                // first UID byte is the manufacturer for 14443-3 tags
                let manufacturer = identifier.first().copied().map_or(0, u32::from);
                Self::Iso14443(Iso14443Tag {
                    identifier,
                    manufacturer,
                    ndef: None,
                })
            }
            RawTag::Iso15693 {
                ic_manufacturer_code,
                ic_serial_number,
            } => Self::Iso15693(Iso15693Tag {
                ic_manufacturer_code,
                ic_serial_number,
                ndef: None,
            }),
        }
    }

    pub fn tag_type(&self) -> &'static str {
        match self {
            Self::Iso14443(_) => ISO14443_LABEL,
            Self::Iso15693(_) => ISO15693_LABEL,
        }
    }

    pub fn manufacturer(&self) -> u32 {
        match self {
            Self::Iso14443(tag) => tag.manufacturer,
            Self::Iso15693(tag) => tag.ic_manufacturer_code,
        }
    }

    pub fn set_manufacturer(&mut self, code: u32) {
        match self {
            Self::Iso14443(tag) => tag.manufacturer = code,
            Self::Iso15693(tag) => tag.ic_manufacturer_code = code,
        }
    }

    pub fn manufacturer_name(&self, registry: &ManufacturerRegistry) -> String {
        registry.resolve(self.manufacturer())
    }

    pub fn serial_number(&self) -> &[u8] {
        match self {
            Self::Iso14443(tag) => &tag.identifier,
            Self::Iso15693(tag) => &tag.ic_serial_number,
        }
    }

    pub fn id(&self) -> &[u8] {
        self.serial_number()
    }

    pub fn ndef(&self) -> Option<&NdefMessage> {
        match self {
            Self::Iso14443(tag) => tag.ndef.as_ref(),
            Self::Iso15693(tag) => tag.ndef.as_ref(),
        }
    }

    pub fn ndef_mut(&mut self) -> Option<&mut NdefMessage> {
        match self {
            Self::Iso14443(tag) => tag.ndef.as_mut(),
            Self::Iso15693(tag) => tag.ndef.as_mut(),
        }
    }

    pub fn set_ndef(&mut self, ndef: Option<NdefMessage>) {
        match self {
            Self::Iso14443(tag) => tag.ndef = ndef,
            Self::Iso15693(tag) => tag.ndef = ndef,
        }
    }
}
