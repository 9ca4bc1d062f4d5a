//! Command Queue: the only path from producer threads into the Worker Loop.
//!
//! `push` never blocks. When the bound is reached it fails with
//! [`QueueError::Overflow`] and leaves everything already queued untouched,
//! so overflow is deterministic and order-preserving.
use crossbeam_channel::{Receiver, Sender, TryRecvError, TrySendError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueueError {
    #[error("System overloaded: command queue full ({capacity} pending intents). Please slow down.")]
    Overflow { capacity: usize },
    #[error("Worker unavailable: command queue closed. Restart the engine.")]
    Closed,
}

struct Shared {
    capacity: usize,
    closed: AtomicBool,
}

/// Producer handle. Cheap to clone, safe to use from any thread.
pub struct IntentSender<T> {
    tx: Sender<T>,
    close_tx: Sender<()>,
    shared: Arc<Shared>,
}

// Manual impl: T itself need not be Clone
impl<T> Clone for IntentSender<T> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
            close_tx: self.close_tx.clone(),
            shared: self.shared.clone(),
        }
    }
}

/// Consumer handle, owned by the Worker Loop.
pub struct IntentReceiver<T> {
    rx: Receiver<T>,
    close_rx: Receiver<()>,
    shared: Arc<Shared>,
}

/// Create a bounded queue holding at most `capacity` pending intents.
///
/// A capacity of 0 is raised to 1; a rendezvous queue would make `push` fail
/// whenever the worker is busy.
pub fn command_queue<T>(capacity: usize) -> (IntentSender<T>, IntentReceiver<T>) {
    let capacity = capacity.max(1);
    let (tx, rx) = crossbeam_channel::bounded(capacity);
    let (close_tx, close_rx) = crossbeam_channel::bounded(1);
    let shared = Arc::new(Shared {
        capacity,
        closed: AtomicBool::new(false),
    });

    (
        IntentSender {
            tx,
            close_tx,
            shared: shared.clone(),
        },
        IntentReceiver {
            rx,
            close_rx,
            shared,
        },
    )
}

impl<T> IntentSender<T> {
    /// Enqueue an intent without blocking.
    pub fn push(&self, intent: impl Into<T>) -> Result<(), QueueError> {
        if self.shared.closed.load(Ordering::Acquire) {
            return Err(QueueError::Closed);
        }
        self.tx.try_send(intent.into()).map_err(|e| match e {
            TrySendError::Full(_) => QueueError::Overflow {
                capacity: self.shared.capacity,
            },
            TrySendError::Disconnected(_) => QueueError::Closed,
        })
    }

    /// Stop the consumer after the intent it is currently running.
    ///
    /// Works even when the queue is full. Later pushes fail with `Closed`.
    pub fn close(&self) {
        if !self.shared.closed.swap(true, Ordering::AcqRel) {
            // Capacity 1 and only sent once, so this cannot be Full.
            let _ = self.close_tx.try_send(());
        }
    }

    pub fn is_closed(&self) -> bool {
        self.shared.closed.load(Ordering::Acquire)
    }

    pub fn capacity(&self) -> usize {
        self.shared.capacity
    }

    pub fn len(&self) -> usize {
        self.tx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tx.is_empty()
    }
}

impl<T> IntentReceiver<T> {
    /// Block until an intent arrives.
    ///
    /// Returns None once the queue is closed, or once every sender is gone and
    /// the backlog is drained.
    pub fn pop_blocking(&self) -> Option<T> {
        if self.shared.closed.load(Ordering::Acquire) {
            return None;
        }
        crossbeam_channel::select! {
            recv(self.rx) -> msg => msg.ok(),
            recv(self.close_rx) -> signal => match signal {
                Ok(()) => None,
                // All senders dropped: hand out whatever is still buffered
                Err(_) => self.rx.try_recv().ok(),
            },
        }
    }

    /// Oldest pending intent, or None if the queue is empty or closed.
    pub fn try_pop(&self) -> Option<T> {
        if self.shared.closed.load(Ordering::Acquire) {
            return None;
        }
        match self.rx.try_recv() {
            Ok(msg) => Some(msg),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    pub fn is_closed(&self) -> bool {
        self.shared.closed.load(Ordering::Acquire)
    }

    pub fn len(&self) -> usize {
        self.rx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::panic, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_fifo_order() {
        let (tx, rx) = command_queue::<u32>(8);
        for i in 0u32..5 {
            tx.push(i).unwrap();
        }
        let drained: Vec<_> = std::iter::from_fn(|| rx.try_pop()).collect();
        assert_eq!(drained, vec![0, 1, 2, 3, 4]);
        assert!(rx.try_pop().is_none());
    }

    #[test]
    fn test_overflow_is_reported_and_preserves_order() {
        let (tx, rx) = command_queue::<u32>(4);
        for i in 0u32..4 {
            tx.push(i).unwrap();
        }

        // Worker is "blocked elsewhere": nothing has been popped yet
        assert_eq!(tx.push(4u32), Err(QueueError::Overflow { capacity: 4 }));
        assert_eq!(tx.push(5u32), Err(QueueError::Overflow { capacity: 4 }));
        assert_eq!(tx.len(), 4);

        let drained: Vec<_> = std::iter::from_fn(|| rx.try_pop()).collect();
        assert_eq!(drained, vec![0, 1, 2, 3]);

        // Room again after draining
        tx.push(6u32).unwrap();
        assert_eq!(rx.try_pop(), Some(6));
    }

    #[test]
    fn test_overflow_message() {
        let err = QueueError::Overflow { capacity: 256 };
        assert!(err.to_string().contains("256"));
        assert!(err.to_string().contains("queue full"));
    }

    #[test]
    fn test_zero_capacity_is_raised() {
        let (tx, rx) = command_queue::<u8>(0);
        assert_eq!(tx.capacity(), 1);
        tx.push(1u8).unwrap();
        assert!(tx.push(2u8).is_err());
        assert_eq!(rx.try_pop(), Some(1));
    }

    #[test]
    fn test_close_wakes_blocked_consumer() {
        let (tx, rx) = command_queue::<u32>(4);
        let consumer = thread::spawn(move || rx.pop_blocking());

        thread::sleep(Duration::from_millis(20));
        tx.close();

        assert_eq!(consumer.join().unwrap(), None);
        assert_eq!(tx.push(1u32), Err(QueueError::Closed));
    }

    #[test]
    fn test_close_when_full() {
        let (tx, rx) = command_queue::<u32>(1);
        tx.push(1u32).unwrap();
        tx.close();
        assert!(tx.is_closed());
        assert!(rx.is_closed());
        assert_eq!(rx.pop_blocking(), None);
    }

    #[test]
    fn test_senders_dropped_drains_backlog() {
        let (tx, rx) = command_queue::<u32>(4);
        tx.push(7u32).unwrap();
        tx.push(8u32).unwrap();
        drop(tx);

        assert_eq!(rx.pop_blocking(), Some(7));
        assert_eq!(rx.pop_blocking(), Some(8));
        assert_eq!(rx.pop_blocking(), None);
    }

    #[test]
    fn test_blocking_pop_receives_from_other_thread() {
        let (tx, rx) = command_queue::<String>(4);
        let producer = thread::spawn(move || {
            thread::sleep(Duration::from_millis(10));
            tx.push("hello".to_string()).unwrap();
        });
        assert_eq!(rx.pop_blocking().as_deref(), Some("hello"));
        producer.join().unwrap();
    }

    #[test]
    fn test_per_producer_order_with_two_producers() {
        let (tx, rx) = command_queue::<(u8, u32)>(256);
        let a = tx.clone();
        let b = tx.clone();
        drop(tx);

        let ta = thread::spawn(move || (0..100).for_each(|i| a.push((0u8, i)).unwrap()));
        let tb = thread::spawn(move || (0..100).for_each(|i| b.push((1u8, i)).unwrap()));
        ta.join().unwrap();
        tb.join().unwrap();

        let mut last = [None::<u32>; 2];
        while let Some((producer, i)) = rx.try_pop() {
            let slot = &mut last[producer as usize];
            if let Some(prev) = *slot {
                assert!(i > prev, "producer {} reordered: {} after {}", producer, i, prev);
            }
            *slot = Some(i);
        }
        assert_eq!(last, [Some(99), Some(99)]);
    }
}
