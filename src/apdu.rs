// src/apdu.rs
// PC/SC pseudo-APDUs for contactless readers (ACR122U style, FF class)
use log::debug;
use pcsc::Card;

use crate::error::RadioError;

// Transmit and strip the status word, failing on anything other than 90 00
fn transmit(card: &Card, apdu: &[u8]) -> Result<Vec<u8>, RadioError> {
    let mut recv_buffer = [0u8; 258];
    let resp = card.transmit(apdu, &mut recv_buffer)?;
    debug!("APDU {:02X?} -> {:02X?}", apdu, resp);
    check_status(resp).map(|data| data.to_vec())
}

/// Splits a response into data and status word.
pub fn check_status(resp: &[u8]) -> Result<&[u8], RadioError> {
    if resp.len() < 2 {
        return Err(RadioError::ShortResponse(resp.len()));
    }
    let (data, sw) = resp.split_at(resp.len() - 2);
    match sw {
        [0x90, 0x00] => Ok(data),
        [sw1, sw2] => Err(RadioError::Status {
            sw1: *sw1,
            sw2: *sw2,
        }),
        _ => Err(RadioError::ShortResponse(resp.len())),
    }
}

// Get Data (UID): FF CA 00 00 00
pub fn get_uid(card: &Card) -> Result<Vec<u8>, RadioError> {
    transmit(card, &[0xFF, 0xCA, 0x00, 0x00, 0x00])
}

// Load Authentication Keys into Reader Memory (Location 0x00)
// ACR122U standard: FF 82 00 key_num 06 [KEY]
pub fn load_key(card: &Card, key: &[u8; 6]) -> Result<(), RadioError> {
    let mut apdu = vec![0xFF, 0x82, 0x00, 0x00, 0x06];
    apdu.extend_from_slice(key);
    transmit(card, &apdu).map(|_| ())
}

// Authenticate Block
// CMD: FF 86 00 00 05 01 00 Block KeyType KeyNumber
// KeyType: 0x60 (A), 0x61 (B)
pub fn authenticate(card: &Card, block: u8, key_type: u8) -> Result<(), RadioError> {
    let apdu = [
        0xFF, 0x86, 0x00, 0x00, 0x05, 0x01, 0x00, block, key_type, 0x00,
    ];
    transmit(card, &apdu)
        .map(|_| ())
        .map_err(|_| RadioError::AuthenticationFailed(block))
}

// Read: FF B0 00 Block Len
pub fn read_binary(card: &Card, block: u8, length: u8) -> Result<Vec<u8>, RadioError> {
    transmit(card, &[0xFF, 0xB0, 0x00, block, length])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_strips_status_word() {
        assert_eq!(check_status(&[0x04, 0x11, 0x90, 0x00]).unwrap(), &[0x04, 0x11]);
        assert_eq!(check_status(&[0x90, 0x00]).unwrap(), &[] as &[u8]);
    }

    #[test]
    fn error_status_is_reported() {
        assert_eq!(
            check_status(&[0x63, 0x00]),
            Err(RadioError::Status {
                sw1: 0x63,
                sw2: 0x00
            })
        );
    }

    #[test]
    fn short_response() {
        assert_eq!(check_status(&[0x90]), Err(RadioError::ShortResponse(1)));
    }
}
