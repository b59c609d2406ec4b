// src/cards.rs
use log::{debug, warn};
use pcsc::Card;

use crate::apdu;
use crate::error::{NdefError, RadioError};
use crate::ndef::{self, NdefStatus};
use crate::radio::NdefStatusReport;

// Keys tried against MIFARE Classic sectors
pub const COMMON_KEYS: [[u8; 6]; 8] = [
    [0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF],
    [0xA0, 0xA1, 0xA2, 0xA3, 0xA4, 0xA5],
    [0xD3, 0xF7, 0xD3, 0xF7, 0xD3, 0xF7], // NFC Forum public key
    [0x00, 0x00, 0x00, 0x00, 0x00, 0x00],
    [0xB0, 0xB1, 0xB2, 0xB3, 0xB4, 0xB5],
    [0x4D, 0x3A, 0x99, 0xC3, 0x51, 0xDD],
    [0x1A, 0x98, 0x2C, 0x7E, 0x45, 0x9A],
    [0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF],
];

// Sectors 1-15, three data blocks each
pub const MIFARE_1K_NDEF_CAPACITY: usize = 15 * 3 * 16;

const CC_MAGIC: u8 = 0xE1;
const TYPE2_CC_PAGE: u8 = 3;
const TYPE2_FIRST_DATA_PAGE: u8 = 4;
const TYPE5_CC_BLOCK: u8 = 0;
const TYPE5_FIRST_DATA_BLOCK: u8 = 1;
const MAX_BLOCK: u8 = 0xFF;

/// Card family as identified from the PC/SC part 3 ATR.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardFamily {
    MifareClassic,
    /// NFC Forum Type 2 (Ultralight / NTAG)
    Type2,
    /// NFC Forum Type 5 (ISO 15693)
    Type5,
    Other,
}

impl CardFamily {
    // ATR: 3B 8F 80 01 80 4F 0C A0 00 00 03 06 [SS] [NN NN] 00 00 00 00 [TCK]
    pub fn from_atr(atr: &[u8]) -> Self {
        let is_storage_card = atr.len() >= 15 && atr[4..=10] == [0x80, 0x4F, 0x0C, 0xA0, 0x00, 0x00, 0x03];
        if !is_storage_card {
            return Self::Other;
        }

        let standard = atr[12];
        let name = [atr[13], atr[14]];
        match (standard, name) {
            (0x0B, _) | (0x0C, _) => Self::Type5,
            (0x03, [0x00, 0x01]) | (0x03, [0x00, 0x02]) => Self::MifareClassic,
            (0x03, [0x00, 0x03]) | (0x03, [0x00, 0x3A]) => Self::Type2,
            _ => Self::Other,
        }
    }

    pub fn is_iso15693(&self) -> bool {
        matches!(self, Self::Type5)
    }
}

/// Reorders an ISO 15693 UID to MSB first (`E0`, manufacturer, serial...) and
/// splits it into manufacturer code and IC serial number.
pub fn split_iso15693_uid(uid: &[u8]) -> Option<(u32, Vec<u8>)> {
    if uid.len() != 8 {
        return None;
    }
    let mut ordered = uid.to_vec();
    if ordered[0] != 0xE0 && ordered[7] == 0xE0 {
        ordered.reverse();
    }
    if ordered[0] != 0xE0 {
        return None;
    }
    Some((ordered[1] as u32, ordered[2..].to_vec()))
}

/// Type 2 capability container: E1, version, size / 8, access.
pub fn parse_type2_cc(cc: &[u8]) -> Result<NdefStatusReport, RadioError> {
    match cc {
        [CC_MAGIC, _version, size, access, ..] => {
            let status = match access & 0x0F {
                0x00 => NdefStatus::ReadWrite,
                _ => NdefStatus::ReadOnly,
            };
            Ok(NdefStatusReport {
                status,
                capacity: *size as usize * 8,
            })
        }
        [_, _, _, _, ..] => Ok(NdefStatusReport {
            status: NdefStatus::NotSupported,
            capacity: 0,
        }),
        _ => Err(RadioError::InvalidCapabilityContainer(cc.to_vec())),
    }
}

/// Type 5 capability container: E1/E2, version + access bits, MLEN / 8, features.
pub fn parse_type5_cc(cc: &[u8]) -> Result<NdefStatusReport, RadioError> {
    match cc {
        [magic, version_access, size, _features, ..] if *magic == CC_MAGIC || *magic == 0xE2 => {
            let status = match version_access & 0x03 {
                0x00 => NdefStatus::ReadWrite,
                _ => NdefStatus::ReadOnly,
            };
            Ok(NdefStatusReport {
                status,
                capacity: *size as usize * 8,
            })
        }
        [_, _, _, _, ..] => Ok(NdefStatusReport {
            status: NdefStatus::NotSupported,
            capacity: 0,
        }),
        _ => Err(RadioError::InvalidCapabilityContainer(cc.to_vec())),
    }
}

pub fn query_status(card: &Card, family: CardFamily) -> Result<NdefStatusReport, RadioError> {
    match family {
        CardFamily::Type2 => {
            let cc = apdu::read_binary(card, TYPE2_CC_PAGE, 4)?;
            parse_type2_cc(&cc)
        }
        CardFamily::Type5 => {
            let cc = apdu::read_binary(card, TYPE5_CC_BLOCK, 4)?;
            parse_type5_cc(&cc)
        }
        CardFamily::MifareClassic => match authenticate_sector(card, 4) {
            Ok(()) => Ok(NdefStatusReport {
                status: NdefStatus::ReadWrite,
                capacity: MIFARE_1K_NDEF_CAPACITY,
            }),
            Err(_) => Ok(NdefStatusReport {
                status: NdefStatus::NotSupported,
                capacity: 0,
            }),
        },
        CardFamily::Other => Err(RadioError::Unsupported("unknown card family".into())),
    }
}

/// Reads raw user memory far enough to cover the NDEF TLV.
pub fn read_memory(card: &Card, family: CardFamily) -> Result<Vec<u8>, RadioError> {
    match family {
        CardFamily::Type2 => read_paged(card, TYPE2_FIRST_DATA_PAGE, 16),
        CardFamily::Type5 => read_paged(card, TYPE5_FIRST_DATA_BLOCK, 4),
        CardFamily::MifareClassic => read_mifare(card),
        CardFamily::Other => Err(RadioError::Unsupported("unknown card family".into())),
    }
}

fn authenticate_sector(card: &Card, block: u8) -> Result<(), RadioError> {
    for key in COMMON_KEYS.iter() {
        if apdu::load_key(card, key).is_ok()
            && (apdu::authenticate(card, block, 0x60).is_ok()
                || apdu::authenticate(card, block, 0x61).is_ok())
        {
            return Ok(());
        }
    }
    Err(RadioError::AuthenticationFailed(block))
}

pub fn get_mifare_data_blocks() -> Vec<u8> {
    let mut blocks = Vec::new();
    // Sector 0 holds manufacturer data and the MAD, so we start at Sector 1
    for sector in 1..16 {
        for block_in_sector in 0..3 {
            // 0, 1, 2 are data. 3 is the Trailer.
            blocks.push((sector * 4) + block_in_sector);
        }
    }
    blocks
}

fn read_mifare(card: &Card) -> Result<Vec<u8>, RadioError> {
    let mut full_data = Vec::new();

    for block in get_mifare_data_blocks() {
        // Authenticate at the start of every sector (blocks 4, 8, 12, etc.)
        if block % 4 == 0 {
            if let Err(err) = authenticate_sector(card, block) {
                // If we can't get into this sector, we can't read the rest of the records
                warn!("Stopping MIFARE read at block {}: {}", block, err);
                break;
            }
        }

        match apdu::read_binary(card, block, 16) {
            Ok(data) => full_data.extend_from_slice(&data),
            Err(err) => {
                debug!("Read stopped at block {}: {}", block, err);
                break;
            }
        }

        if tlv_complete(&full_data) {
            break;
        }
    }

    if full_data.is_empty() {
        return Err(RadioError::Unsupported(
            "no data could be read from the card".into(),
        ));
    }
    Ok(full_data)
}

fn read_paged(card: &Card, first_block: u8, chunk: u8) -> Result<Vec<u8>, RadioError> {
    let mut full_data = Vec::new();
    let step = (chunk / 4).max(1);
    let mut block = first_block;

    loop {
        match apdu::read_binary(card, block, chunk) {
            Ok(data) if !data.is_empty() => full_data.extend_from_slice(&data),
            Ok(_) => break,
            // first block failing is a real error, later ones mean end of memory
            Err(err) if full_data.is_empty() => return Err(err),
            Err(err) => {
                debug!("Read stopped at block {}: {}", block, err);
                break;
            }
        }

        if tlv_complete(&full_data) {
            break;
        }
        match block.checked_add(step) {
            Some(next) if next < MAX_BLOCK => block = next,
            _ => break,
        }
    }

    Ok(full_data)
}

/// True once the buffer holds a whole NDEF TLV, a terminator, or malformed TLVs
/// that more bytes won't fix.
fn tlv_complete(memory: &[u8]) -> bool {
    !matches!(
        ndef::find_ndef_tlv(memory),
        Err(NdefError::Truncated { .. }) | Err(NdefError::MissingTlv)
    )
}
