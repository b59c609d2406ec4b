//! Reads NFC tags through a PC/SC reader and models what was found: tag
//! identity, NDEF capability, and the records of the NDEF message.
//!
//! The model (`ndef`, `tag`, registries) has no hardware dependency. Reading
//! is driven by [`session::TagSessionController`], which talks to any
//! [`radio::Radio`] by issuing operations and consuming their completions as
//! events.

pub mod apdu;
pub mod cards;
pub mod config;
pub mod draft;
pub mod error;
pub mod hex_codec;
pub mod manufacturer;
pub mod ndef;
pub mod nfc_service;
pub mod pcsc_radio;
pub mod radio;
pub mod session;
pub mod tag;
pub mod types;
pub mod view;
pub mod well_known;
pub mod ws;

pub use error::{ConfigError, DraftError, NdefError, RadioError, SessionError};
pub use manufacturer::ManufacturerRegistry;
pub use ndef::{NdefMessage, NdefRecord, NdefStatus, TypeNameFormat};
pub use radio::{Radio, RadioEvent, RawTag};
pub use session::{SessionState, TagSessionController};
pub use tag::TagDescriptor;
