// src/nfc_service.rs
use crossbeam_channel::{Receiver, Sender, unbounded};
use log::{error, info};
use pcsc::{Context, PNP_NOTIFICATION, ReaderState, Scope, State};
use std::ffi::CString;
use std::time::Duration;

use crate::config::Config;
use crate::draft;
use crate::manufacturer::ManufacturerRegistry;
use crate::ndef::NdefMessage;
use crate::pcsc_radio::PcscRadio;
use crate::radio::{Radio, RadioEvent};
use crate::session::{SessionState, TagSessionController};
use crate::types::{NfcCommand, OutgoingMessage};
use crate::view::{NdefView, TagView};

pub fn run(
    config: Config,
    registry: ManufacturerRegistry,
    tx: Sender<OutgoingMessage>,
    rx: Receiver<NfcCommand>,
) {
    info!("Starting NFC Service (Event Driven)...");

    let ctx = match Context::establish(Scope::User) {
        Ok(ctx) => ctx,
        Err(err) => {
            error!("Failed to establish context: {}", err);
            let _ = tx.send(OutgoingMessage::READER_ERROR {
                error: err.to_string(),
            });
            return;
        }
    };

    let (radio_tx, radio_rx) = unbounded::<RadioEvent>();
    let mut radio = PcscRadio::new(ctx.clone(), radio_tx);
    let mut controller = TagSessionController::new();
    let mut draft = NdefMessage::default();

    let mut readers_buf = [0; 2048];
    let mut reader_names: Vec<CString> = Vec::new();
    let mut reader_states = vec![ReaderState::new(PNP_NOTIFICATION(), State::UNAWARE)];

    loop {
        // 1. Wait for State Change
        if let Err(err) = ctx.get_status_change(config.poll_interval(), &mut reader_states) {
            if err != pcsc::Error::Timeout {
                error!("PCSC Error: {}", err);
                std::thread::sleep(Duration::from_secs(1));
                continue;
            }
        }

        // 2. CHECK FOR COMMANDS
        while let Ok(cmd) = rx.try_recv() {
            match cmd {
                NfcCommand::BeginRead => {
                    start_read(&mut controller, &mut radio, &tx);
                }
                NfcCommand::CheckReaderStatus => {
                    match ctx.list_readers(&mut readers_buf) {
                        Ok(iter) => {
                            reader_names = iter.map(CString::from).collect();
                            let _ = tx.send(OutgoingMessage::READER_STATUS {
                                success: !reader_names.is_empty(),
                            });
                        }
                        Err(_) => {
                            reader_names.clear();
                            let _ = tx.send(OutgoingMessage::READER_STATUS { success: false });
                        }
                    }
                }
                NfcCommand::Draft(command) => {
                    let msg = match draft::apply(&mut draft, command) {
                        Ok(()) => OutgoingMessage::DRAFT_UPDATED {
                            draft: NdefView::new(&draft),
                        },
                        Err(err) => OutgoingMessage::DRAFT_ERROR {
                            error: err.to_string(),
                        },
                    };
                    let _ = tx.send(msg);
                }
            }
        }

        // 3. PROCESS EVENTS
        let mut readers_changed = false;

        // Check PnP (Index 0)
        if reader_states[0].event_state().intersects(State::CHANGED) {
            info!("Hardware change detected");
            readers_changed = true;
            reader_states[0].sync_current_state();
        }

        // Check Readers (Indices 1..)
        for i in 1..reader_states.len() {
            let rs = &reader_states[i];

            if rs.event_state().intersects(State::CHANGED) {
                let current = rs.event_state();
                let name = rs.name().to_owned();

                // Card Inserted
                if current.intersects(State::PRESENT)
                    && !rs.current_state().intersects(State::PRESENT)
                {
                    info!("Card Inserted on {:?}", name);
                    let _ = tx.send(OutgoingMessage::CARD_STATUS {
                        success: true,
                        message: "Card detected!".into(),
                    });
                    if config.read_on_insert {
                        start_read(&mut controller, &mut radio, &tx);
                    }
                }

                // Card Removed
                if current.intersects(State::EMPTY) && rs.current_state().intersects(State::PRESENT)
                {
                    info!("Card Removed from {:?}", name);
                    let _ = tx.send(OutgoingMessage::CARD_STATUS {
                        success: false,
                        message: "Card removed!".into(),
                    });
                }

                reader_states[i].sync_current_state();
            }
        }

        // 4. DRIVE THE READ SESSION
        pump(&mut controller, &mut radio, &radio_rx, &registry, &tx);

        // 5. REFRESH LIST
        if readers_changed {
            match ctx.list_readers(&mut readers_buf) {
                Ok(iter) => {
                    reader_names = iter.map(CString::from).collect();
                    // keep the PnP state (index 0) and rebuild the rest
                    reader_states.truncate(1);
                    for name in &reader_names {
                        reader_states.push(ReaderState::new(name.clone(), State::UNAWARE));
                    }

                    let _ = tx.send(OutgoingMessage::READER_STATUS {
                        success: !reader_names.is_empty(),
                    });
                }
                Err(_) => {
                    reader_names.clear();
                    reader_states.truncate(1);
                    let _ = tx.send(OutgoingMessage::READER_STATUS { success: false });
                }
            }
        }
    }
}

pub fn start_read<R: Radio + ?Sized>(
    controller: &mut TagSessionController,
    radio: &mut R,
    tx: &Sender<OutgoingMessage>,
) {
    let session = controller.begin_read(radio);
    let _ = tx.send(OutgoingMessage::READ_STARTED { session });
}

/// Feeds every queued radio completion to the controller and publishes the
/// outcome once the session ends.
pub fn pump<R: Radio + ?Sized>(
    controller: &mut TagSessionController,
    radio: &mut R,
    events: &Receiver<RadioEvent>,
    registry: &ManufacturerRegistry,
    tx: &Sender<OutgoingMessage>,
) {
    while let Ok(event) = events.try_recv() {
        let session = event.session();
        if !controller.handle_event(radio, event) {
            continue;
        }

        let tags = TagView::list(controller.tags(), registry);
        let msg = match controller.state() {
            SessionState::Failed(err) => OutgoingMessage::READ_ERROR {
                session,
                error: err.to_string(),
                tags,
            },
            _ => OutgoingMessage::READ_COMPLETE { session, tags },
        };
        let _ = tx.send(msg);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RadioError;
    use crate::ndef::{NdefRecord, NdefStatus, TypeNameFormat};
    use crate::radio::scripted::ScriptedRadio;
    use crate::radio::{NdefStatusReport, RawNdefMessage, RawTag};

    #[test]
    fn pump_publishes_completed_read() {
        let (event_tx, event_rx) = unbounded();
        let (out_tx, out_rx) = unbounded();
        let mut radio = ScriptedRadio::default();
        let mut controller = TagSessionController::new();

        start_read(&mut controller, &mut radio, &out_tx);
        let s = controller.session().unwrap();

        let events = vec![
            RadioEvent::Discovered {
                session: s,
                tags: vec![RawTag::Iso14443 {
                    identifier: vec![0x04, 0x10, 0x20],
                }],
            },
            RadioEvent::Connected {
                session: s,
                tag: 0,
                result: Ok(()),
            },
            RadioEvent::NdefStatus {
                session: s,
                tag: 0,
                result: Ok(NdefStatusReport {
                    status: NdefStatus::ReadWrite,
                    capacity: 496,
                }),
            },
            RadioEvent::NdefRead {
                session: s,
                tag: 0,
                result: Ok(Some(RawNdefMessage {
                    length: 15,
                    records: vec![NdefRecord::new(
                        TypeNameFormat::WellKnown,
                        b"U".to_vec(),
                        vec![],
                        b"\x04example.com".to_vec(),
                    )],
                })),
            },
        ];
        for event in events {
            event_tx.send(event).unwrap();
        }

        pump(&mut controller, &mut radio, &event_rx, ManufacturerRegistry::bundled(), &out_tx);

        assert!(matches!(out_rx.try_recv(), Ok(OutgoingMessage::READ_STARTED { session }) if session == s));
        match out_rx.try_recv() {
            Ok(OutgoingMessage::READ_COMPLETE { session, tags }) => {
                assert_eq!(session, s);
                assert_eq!(tags.len(), 1);
                assert_eq!(tags[0].serial_number, "04:10:20");
                let ndef = tags[0].ndef.as_ref().unwrap();
                assert_eq!(ndef.capacity, 496);
                assert_eq!(ndef.used, 15);
                assert_eq!(
                    ndef.records[0].parsed_content.as_deref(),
                    Some("https://example.com")
                );
            }
            other => panic!("expected READ_COMPLETE, got {:?}", other),
        }
        assert!(out_rx.try_recv().is_err());
    }

    #[test]
    fn pump_publishes_failure() {
        let (event_tx, event_rx) = unbounded();
        let (out_tx, out_rx) = unbounded();
        let mut radio = ScriptedRadio::default();
        let mut controller = TagSessionController::new();

        let s = controller.begin_read(&mut radio);
        event_tx
            .send(RadioEvent::Discovered {
                session: s,
                tags: vec![RawTag::Iso14443 {
                    identifier: vec![0x04],
                }],
            })
            .unwrap();
        event_tx
            .send(RadioEvent::Connected {
                session: s,
                tag: 0,
                result: Err(RadioError::Pcsc(pcsc::Error::RemovedCard)),
            })
            .unwrap();

        pump(&mut controller, &mut radio, &event_rx, ManufacturerRegistry::bundled(), &out_tx);

        match out_rx.try_recv() {
            Ok(OutgoingMessage::READ_ERROR { error, tags, .. }) => {
                assert!(error.starts_with("Failed to connect to tag 0"));
                assert_eq!(tags.len(), 1);
                assert_eq!(tags[0].serial_number, "0x04");
            }
            other => panic!("expected READ_ERROR, got {:?}", other),
        }
    }
}
