pub mod capture;
pub mod listing;
pub mod snapshots;

pub use capture::{CapturePhase, CaptureWorkflow};
pub use listing::{ListingError, ListingPhase, ListingWorkflow};
pub use snapshots::ListingSnapshots;

/// Identifies one asynchronous request (geocode, geolocation).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(pub u64);

/// Single in-flight slot for one kind of request.
///
/// `begin` supersedes whatever was pending; only the latest ticket is
/// accepted by `finish`, so a late answer to an older request is dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestSlot {
    issued: u64,
    pending: Option<u64>,
}

impl RequestSlot {
    pub fn restore(issued: u64, pending: Option<u64>) -> Self {
        Self {
            issued: issued.max(pending.unwrap_or(0)),
            pending,
        }
    }

    pub fn begin(&mut self) -> Ticket {
        self.issued += 1;
        self.pending = Some(self.issued);
        Ticket(self.issued)
    }

    /// `true` when `ticket` is the one in flight; the slot is then empty again.
    pub fn finish(&mut self, ticket: Ticket) -> bool {
        if self.pending == Some(ticket.0) {
            self.pending = None;
            true
        } else {
            false
        }
    }

    pub fn pending(&self) -> Option<Ticket> {
        self.pending.map(Ticket)
    }

    pub fn issued(&self) -> u64 {
        self.issued
    }
}
