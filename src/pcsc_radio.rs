// src/pcsc_radio.rs
//! `Radio` over a PC/SC contactless reader. Every operation runs to
//! completion on the calling (NFC) thread and posts its result as a
//! `RadioEvent`, so the controller still only sees queued completions.

use std::ffi::CString;

use crossbeam_channel::Sender;
use log::{debug, error, info, warn};
use pcsc::{Card, Context, Protocols, ShareMode};

use crate::apdu;
use crate::cards::{self, CardFamily};
use crate::error::RadioError;
use crate::ndef;
use crate::radio::{
    NdefStatusReport, Radio, RadioEvent, RawNdefMessage, RawTag, SessionId,
};

struct DiscoveredCard {
    reader: CString,
    family: CardFamily,
    card: Option<Card>,
}

pub struct PcscRadio {
    ctx: Context,
    events: Sender<RadioEvent>,
    session: Option<SessionId>,
    discovered: Vec<DiscoveredCard>,
}

impl PcscRadio {
    pub fn new(ctx: Context, events: Sender<RadioEvent>) -> Self {
        Self {
            ctx,
            events,
            session: None,
            discovered: Vec::new(),
        }
    }

    fn post(&self, event: RadioEvent) {
        if self.events.send(event).is_err() {
            error!("Radio event channel closed");
        }
    }

    fn identify(&self, reader: &CString) -> Result<(RawTag, CardFamily), RadioError> {
        let card = self.ctx.connect(reader, ShareMode::Shared, Protocols::ANY)?;

        let mut names_buf = [0u8; 128];
        let mut atr_buf = [0u8; 64];
        let family = {
            let status = card.status2(&mut names_buf, &mut atr_buf)?;
            CardFamily::from_atr(status.atr())
        };

        let uid = apdu::get_uid(&card)?;
        if uid.is_empty() {
            return Err(RadioError::Unsupported("card reported an empty UID".into()));
        }

        let raw = if family.is_iso15693() {
            let (ic_manufacturer_code, ic_serial_number) = cards::split_iso15693_uid(&uid)
                .ok_or_else(|| RadioError::Unsupported(format!("malformed ISO 15693 UID {:02X?}", uid)))?;
            RawTag::Iso15693 {
                ic_manufacturer_code,
                ic_serial_number,
            }
        } else {
            RawTag::Iso14443 { identifier: uid }
        };
        Ok((raw, family))
    }

    fn card(&self, tag: usize) -> Result<(&Card, CardFamily), RadioError> {
        let entry = self
            .discovered
            .get(tag)
            .ok_or(RadioError::UnknownTag(tag))?;
        let card = entry.card.as_ref().ok_or(RadioError::NotConnected(tag))?;
        Ok((card, entry.family))
    }

    fn read_message(&self, tag: usize) -> Result<Option<RawNdefMessage>, RadioError> {
        let (card, family) = self.card(tag)?;
        let memory = cards::read_memory(card, family)?;

        let Some(message) = ndef::find_ndef_tlv(&memory)? else {
            return Ok(None);
        };
        let records = ndef::parse_records(message)?;
        Ok(Some(RawNdefMessage {
            length: message.len(),
            records,
        }))
    }
}

impl Radio for PcscRadio {
    fn discover(&mut self, session: SessionId) {
        self.discovered.clear();
        self.session = Some(session);

        let mut readers_buf = [0; 2048];
        let readers: Vec<CString> = match self.ctx.list_readers(&mut readers_buf) {
            Ok(iter) => iter.map(CString::from).collect(),
            Err(err) => {
                self.post(RadioEvent::Invalidated {
                    session,
                    reason: format!("Failed to list readers: {}", err),
                });
                return;
            }
        };

        let mut tags = Vec::new();
        for reader in readers {
            match self.identify(&reader) {
                Ok((raw, family)) => {
                    info!("Found {:?} tag on {:?}", family, reader);
                    tags.push(raw);
                    self.discovered.push(DiscoveredCard {
                        reader,
                        family,
                        card: None,
                    });
                }
                Err(RadioError::Pcsc(pcsc::Error::NoSmartcard))
                | Err(RadioError::Pcsc(pcsc::Error::RemovedCard)) => {
                    debug!("No card on {:?}", reader);
                }
                Err(err) => warn!("Skipping card on {:?}: {}", reader, err),
            }
        }

        self.post(RadioEvent::Discovered { session, tags });
    }

    fn connect(&mut self, session: SessionId, tag: usize) {
        let result = match self.discovered.get_mut(tag) {
            Some(entry) => match self.ctx.connect(&entry.reader, ShareMode::Shared, Protocols::ANY) {
                Ok(card) => {
                    entry.card = Some(card);
                    Ok(())
                }
                Err(err) => Err(RadioError::from(err)),
            },
            None => Err(RadioError::UnknownTag(tag)),
        };
        self.post(RadioEvent::Connected {
            session,
            tag,
            result,
        });
    }

    fn query_ndef_status(&mut self, session: SessionId, tag: usize) {
        let result: Result<NdefStatusReport, RadioError> = self
            .card(tag)
            .and_then(|(card, family)| cards::query_status(card, family));
        self.post(RadioEvent::NdefStatus {
            session,
            tag,
            result,
        });
    }

    fn read_ndef(&mut self, session: SessionId, tag: usize) {
        let result = self.read_message(tag);
        self.post(RadioEvent::NdefRead {
            session,
            tag,
            result,
        });
    }

    fn invalidate(&mut self, session: SessionId, error_message: Option<&str>) {
        if self.session != Some(session) {
            debug!("Session {} already released", session);
            return;
        }
        match error_message {
            Some(message) => warn!("Closing session {}: {}", session, message),
            None => info!("Closing session {}", session),
        }
        // dropping the cards disconnects them
        self.discovered.clear();
        self.session = None;
    }
}
