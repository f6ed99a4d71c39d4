//! History events emitted after successful mutations.
//!
//! Every persisted mutation already stores its history snapshot atomically
//! with the entry; the event stream is an additional out-of-band feed for
//! subscribers such as audit exporters. Losing an event never loses the
//! snapshot itself.

use serde::Serialize;
use tokio::sync::mpsc;

use finledger_core::ledger::HistorySnapshot;
use finledger_shared::types::EntryId;

/// Emitted once per recorded history snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryRecorded {
    /// The mutated entry.
    pub entry_id: EntryId,
    /// The snapshot that was persisted.
    pub snapshot: HistorySnapshot,
}

/// Sink for history events.
pub trait HistoryEventPublisher: Send + Sync {
    /// Delivers one event. Must not block and must not fail the mutation
    /// that triggered it.
    fn publish(&self, event: HistoryRecorded);
}

/// Publisher backed by an unbounded channel.
#[derive(Debug, Clone)]
pub struct ChannelPublisher {
    sender: mpsc::UnboundedSender<HistoryRecorded>,
}

impl ChannelPublisher {
    /// Creates a publisher and the receiving end of its event stream.
    #[must_use]
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<HistoryRecorded>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl HistoryEventPublisher for ChannelPublisher {
    fn publish(&self, event: HistoryRecorded) {
        if self.sender.send(event).is_err() {
            tracing::warn!("history event dropped, no active subscriber");
        }
    }
}

/// Publisher that discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopPublisher;

impl HistoryEventPublisher for NoopPublisher {
    fn publish(&self, _event: HistoryRecorded) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use finledger_core::ledger::{Category, EntrySource, EntryStatus, LedgerEntry, NewEntry};
    use finledger_shared::types::{Currency, Money};
    use rust_decimal::Decimal;

    fn event() -> HistoryRecorded {
        let entry = LedgerEntry::create(
            NewEntry {
                status: EntryStatus::Draft,
                name: "x".to_string(),
                category: Category::Operations,
                settle_date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
                money: Money::new(Decimal::ONE, Currency::Aed),
                notes: None,
                reference: None,
                tags: None,
            },
            EntrySource::Manual,
            Decimal::ONE,
        );
        HistoryRecorded {
            entry_id: entry.id,
            snapshot: HistorySnapshot::from_entry(&entry, "u", "created", Currency::Aed),
        }
    }

    #[tokio::test]
    async fn test_channel_publisher_delivers_events() {
        let (publisher, mut receiver) = ChannelPublisher::channel();
        let sent = event();
        publisher.publish(sent.clone());

        let received = receiver.recv().await.unwrap();
        assert_eq!(received, sent);
    }

    #[test]
    fn test_publish_after_receiver_dropped_does_not_panic() {
        let (publisher, receiver) = ChannelPublisher::channel();
        drop(receiver);
        publisher.publish(event());
    }
}
