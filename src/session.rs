// src/session.rs
//! Read-session state machine.
//!
//! `Idle -> Discovering -> Reading -> Completed | Failed`. While reading, each
//! tag moves through `Connect -> QueryStatus -> ReadNdef -> Done`. Results are
//! kept in discovery order and updated by tag index, so completions may arrive
//! in any order.

use log::{debug, info, warn};

use crate::error::SessionError;
use crate::hex_codec;
use crate::ndef::NdefMessage;
use crate::radio::{NdefStatusReport, Radio, RadioEvent, RawNdefMessage, RawTag, SessionId};
use crate::tag::TagDescriptor;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Discovering,
    Reading,
    Completed,
    Failed(SessionError),
}

/// Declared in pipeline order; the derived ordering is the stage order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum TagStage {
    Connect,
    QueryStatus,
    ReadNdef,
    Done,
}

#[derive(Debug)]
pub struct TagSessionController {
    state: SessionState,
    session: Option<SessionId>,
    last_session: SessionId,
    tags: Vec<TagDescriptor>,
    stages: Vec<TagStage>,
    tag_count: usize,
}

impl Default for TagSessionController {
    fn default() -> Self {
        Self::new()
    }
}

impl TagSessionController {
    pub fn new() -> Self {
        Self {
            state: SessionState::Idle,
            session: None,
            last_session: 0,
            tags: Vec::new(),
            stages: Vec::new(),
            tag_count: 0,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Id of the live session, if any.
    pub fn session(&self) -> Option<SessionId> {
        self.session
    }

    pub fn tags(&self) -> &[TagDescriptor] {
        &self.tags
    }

    pub fn tag_count(&self) -> usize {
        self.tag_count
    }

    pub fn stage(&self, tag: usize) -> Option<TagStage> {
        self.stages.get(tag).copied()
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self.state,
            SessionState::Completed | SessionState::Failed(_)
        )
    }

    /// Drops previous results and starts a new discovery. A session that is
    /// still live is invalidated first.
    pub fn begin_read<R: Radio + ?Sized>(&mut self, radio: &mut R) -> SessionId {
        if let Some(previous) = self.session.take() {
            debug!("Replacing live session {}", previous);
            radio.invalidate(previous, None);
        }

        self.tags.clear();
        self.stages.clear();
        self.tag_count = 0;

        self.last_session += 1;
        let session = self.last_session;
        self.session = Some(session);
        self.state = SessionState::Discovering;

        info!("Session {}: discovering tags", session);
        radio.discover(session);
        session
    }

    /// Applies one radio completion. Returns `true` when this event ended the
    /// session.
    pub fn handle_event<R: Radio + ?Sized>(&mut self, radio: &mut R, event: RadioEvent) -> bool {
        let Some(session) = self.session else {
            debug!("Ignoring event for session {}: no live session", event.session());
            return false;
        };
        if event.session() != session {
            debug!(
                "Ignoring event for session {} (live session is {})",
                event.session(),
                session
            );
            return false;
        }

        match event {
            RadioEvent::Discovered { tags, .. } => self.on_discovered(radio, session, tags),
            RadioEvent::Connected { tag, result, .. } => match result {
                Ok(()) => self.on_connected(radio, session, tag),
                Err(err) => {
                    self.fail(
                        radio,
                        session,
                        SessionError::ConnectFailed {
                            index: tag,
                            reason: err.to_string(),
                        },
                    );
                }
            },
            RadioEvent::NdefStatus { tag, result, .. } => match result {
                Ok(report) => self.on_status(tag, report),
                Err(err) => {
                    // tolerated: the tag just keeps no NDEF metadata
                    warn!("Session {}: NDEF status query for tag {} failed: {}", session, tag, err);
                    self.advance(tag, TagStage::ReadNdef);
                }
            },
            RadioEvent::NdefRead { tag, result, .. } => match result {
                Ok(message) => self.on_read(radio, session, tag, message),
                Err(err) => {
                    self.fail(
                        radio,
                        session,
                        SessionError::NdefReadFailed {
                            index: tag,
                            reason: err.to_string(),
                        },
                    );
                }
            },
            RadioEvent::Invalidated { reason, .. } => {
                // the radio still holds its handles until told to release them
                self.fail(radio, session, SessionError::SessionInvalidated(reason));
            }
        }

        self.session.is_none()
    }

    fn on_discovered<R: Radio + ?Sized>(&mut self, radio: &mut R, session: SessionId, tags: Vec<RawTag>) {
        if tags.is_empty() {
            self.fail(radio, session, SessionError::NoTagsDiscovered);
            return;
        }

        info!("Session {}: discovered {} tag(s)", session, tags.len());
        self.tag_count = tags.len();
        self.state = SessionState::Reading;

        for (index, raw) in tags.into_iter().enumerate() {
            let tag = TagDescriptor::from_raw(raw);
            debug!("Tag {}: {} {}", index, tag.tag_type(), hex_codec::encode(tag.serial_number()));
            self.tags.push(tag);
            self.stages.push(TagStage::Connect);
            radio.connect(session, index);
        }
    }

    fn on_connected<R: Radio + ?Sized>(&mut self, radio: &mut R, session: SessionId, tag: usize) {
        if tag >= self.tags.len() {
            warn!("Session {}: connect completion for unknown tag {}", session, tag);
            return;
        }
        self.advance(tag, TagStage::QueryStatus);
        radio.query_ndef_status(session, tag);
        radio.read_ndef(session, tag);
    }

    fn on_status(&mut self, tag: usize, report: NdefStatusReport) {
        let Some(descriptor) = self.tags.get_mut(tag) else {
            warn!("NDEF status for unknown tag {}", tag);
            return;
        };
        debug!("Tag {}: NDEF {} capacity {}", tag, report.status, report.capacity);
        descriptor.set_ndef(Some(NdefMessage::new(report.status, report.capacity)));
        self.advance(tag, TagStage::ReadNdef);
    }

    fn on_read<R: Radio + ?Sized>(
        &mut self,
        radio: &mut R,
        session: SessionId,
        tag: usize,
        message: Option<RawNdefMessage>,
    ) {
        let Some(descriptor) = self.tags.get_mut(tag) else {
            warn!("Session {}: NDEF read for unknown tag {}", session, tag);
            return;
        };

        // a blank tag is a no-op: it neither finishes the tag nor closes the session
        let Some(message) = message else {
            debug!("Tag {}: no NDEF message", tag);
            return;
        };

        match descriptor.ndef_mut() {
            Some(ndef) => {
                debug!("Tag {}: {} record(s), {} bytes", tag, message.records.len(), message.length);
                ndef.extend_from_raw(message.records, message.length);
            }
            // no status attached, nothing to append to
            None => debug!("Tag {}: dropping NDEF read, no status attached", tag),
        }
        self.advance(tag, TagStage::Done);

        if tag + 1 == self.tag_count {
            self.complete(radio, session);
        }
    }

    // stages only move forward; status and read completions may arrive in either order
    fn advance(&mut self, tag: usize, stage: TagStage) {
        if let Some(current) = self.stages.get_mut(tag) {
            if stage > *current {
                *current = stage;
            }
        }
    }

    fn complete<R: Radio + ?Sized>(&mut self, radio: &mut R, session: SessionId) {
        info!("Session {}: read complete", session);
        radio.invalidate(session, None);
        self.session = None;
        self.state = SessionState::Completed;
    }

    fn fail<R: Radio + ?Sized>(&mut self, radio: &mut R, session: SessionId, err: SessionError) {
        warn!("Session {} failed: {}", session, err);
        radio.invalidate(session, Some(&err.to_string()));
        self.session = None;
        self.state = SessionState::Failed(err);
    }
}
