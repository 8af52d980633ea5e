//! Module with the bookkeeping of image loads.
//!
//! Every load takes a `LoadTicket` when it starts. Only the result of the most
//! recently started load may be committed, so a slow decode that finishes late
//! can never replace an image which was loaded after it.

use std::fmt;
use std::thread::{self, JoinHandle};

use super::super::error::CaptionError;
use super::super::source::SourceImage;


/// Token identifying a single image load.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LoadTicket(u64);

impl LoadTicket {
    #[inline]
    pub fn id(self) -> u64 {
        self.0
    }
}

impl fmt::Display for LoadTicket {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(fmt, "#{}", self.0)
    }
}


/// Where an image being loaded comes from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SourceKind {
    /// File uploaded by the user.
    File,
    /// One of the preset templates.
    Template,
}


/// Result of an image load that didn't fail.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LoadOutcome {
    /// The image is now the current one.
    Loaded,
    /// Another load was started (or the image was cleared) in the meantime,
    /// so the decoded image has been discarded.
    Superseded,
}

impl LoadOutcome {
    #[inline]
    pub fn is_loaded(self) -> bool {
        self == LoadOutcome::Loaded
    }
}


/// Issues load tickets and remembers which one is current.
#[derive(Clone, Debug, Default)]
pub(super) struct Tickets {
    issued: u64,
    current: Option<LoadTicket>,
}

impl Tickets {
    /// Start a new load, superseding any load in progress.
    pub fn issue(&mut self) -> LoadTicket {
        self.issued += 1;
        let ticket = LoadTicket(self.issued);
        if let Some(previous) = self.current.replace(ticket) {
            debug!("Load {} superseded by {}", previous, ticket);
        }
        ticket
    }

    #[inline]
    pub fn is_current(&self, ticket: LoadTicket) -> bool {
        self.current == Some(ticket)
    }

    #[inline]
    pub fn pending(&self) -> Option<LoadTicket> {
        self.current
    }

    /// Mark given load as finished, if it's the current one.
    pub fn finish(&mut self, ticket: LoadTicket) {
        if self.is_current(ticket) {
            self.current = None;
        }
    }

    /// Make all loads in progress stale.
    pub fn invalidate(&mut self) {
        if let Some(ticket) = self.current.take() {
            debug!("Load {} invalidated", ticket);
        }
    }
}


/// Image decode running in a background thread.
///
/// Pass it to `Compositor::complete` to wait for the decode
/// and (if it is still current) commit the image.
pub struct PendingLoad {
    pub(super) ticket: LoadTicket,
    pub(super) kind: SourceKind,
    pub(super) name: String,
    handle: JoinHandle<Result<SourceImage, CaptionError>>,
}

impl PendingLoad {
    /// Spawn a thread decoding given image bytes.
    pub(super) fn spawn(ticket: LoadTicket, kind: SourceKind,
                        name: String, bytes: Vec<u8>) -> Result<Self, CaptionError> {
        let thread_name = format!("decode-{}", ticket.id());
        let handle = {
            let name = name.clone();
            thread::Builder::new().name(thread_name)
                .spawn(move || SourceImage::decode(name, &bytes))
        }.map_err(|e| CaptionError::decode(name.as_str(), e))?;
        trace!("Decoding `{}` in the background ({})", name, ticket);
        Ok(PendingLoad{ticket, kind, name, handle})
    }

    #[inline]
    pub fn ticket(&self) -> LoadTicket {
        self.ticket
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the decode has finished (successfully or not).
    #[inline]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the decode to finish.
    pub(super) fn wait(self) -> (LoadTicket, SourceKind, Result<SourceImage, CaptionError>) {
        let PendingLoad{ticket, kind, name, handle} = self;
        let result = match handle.join() {
            Ok(result) => result,
            Err(_) => {
                error!("Decoding thread for `{}` has panicked", name);
                Err(CaptionError::decode(name, "decoder crashed"))
            }
        };
        (ticket, kind, result)
    }
}

impl fmt::Debug for PendingLoad {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        fmt.debug_struct("PendingLoad")
            .field("ticket", &self.ticket)
            .field("kind", &self.kind)
            .field("name", &self.name)
            .finish()
    }
}


#[cfg(test)]
mod tests {
    use super::Tickets;

    #[test]
    fn only_latest_ticket_is_current() {
        let mut tickets = Tickets::default();
        let first = tickets.issue();
        let second = tickets.issue();
        assert!(!tickets.is_current(first));
        assert!(tickets.is_current(second));

        tickets.finish(first);
        assert_eq!(Some(second), tickets.pending());
        tickets.finish(second);
        assert_eq!(None, tickets.pending());
    }

    #[test]
    fn invalidate_makes_everything_stale() {
        let mut tickets = Tickets::default();
        let ticket = tickets.issue();
        tickets.invalidate();
        assert!(!tickets.is_current(ticket));
        assert!(tickets.issue() > ticket);
    }
}
