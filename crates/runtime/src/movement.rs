//! Continuous movement hand-off.
//!
//! Auto-navigation starts movement through a [`MovementDriver`] and waits for
//! an [`Arrival`] on the director's channel. Every request carries a ticket;
//! when a newer request supersedes an older one, the older arrival is simply
//! ignored when it shows up.

use tokio::sync::mpsc;
use tracker_core::{Bearing, Position};

/// Arrival message for the movement request identified by `ticket`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Arrival {
    pub ticket: u64,
}

/// One-shot handle the movement driver uses to report arrival.
#[derive(Debug)]
pub struct ArrivalNotifier {
    ticket: u64,
    tx: mpsc::UnboundedSender<Arrival>,
}

impl ArrivalNotifier {
    pub(crate) fn new(ticket: u64, tx: mpsc::UnboundedSender<Arrival>) -> Self {
        Self { ticket, tx }
    }

    pub fn ticket(&self) -> u64 {
        self.ticket
    }

    /// Reports arrival. Consumes the notifier so it fires at most once.
    pub fn notify(self) {
        if self.tx.send(Arrival { ticket: self.ticket }).is_err() {
            tracing::debug!(ticket = self.ticket, "arrival dropped, director is gone");
        }
    }
}

/// Host-side control of the player character.
pub trait MovementDriver {
    /// Begins walking the player to `target`. The driver calls
    /// [`ArrivalNotifier::notify`] once the player stands on it, or drops the
    /// notifier if the walk is abandoned.
    fn start(&mut self, target: Position, on_arrival: ArrivalNotifier);

    /// Turns the player to face `bearing`.
    fn face(&mut self, bearing: Bearing);

    /// Enables or disables manual player control.
    fn set_player_control(&mut self, enabled: bool);
}
