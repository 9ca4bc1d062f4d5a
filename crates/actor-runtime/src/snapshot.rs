//! State Buffers and Publish Step.
//!
//! Three copies of the snapshot exist:
//!
//! ```text
//!   SnapshotWriter            shared (Mutex)            SnapshotReader
//!   ┌──────────┐  recache()  ┌──────────────┐  publish()  ┌─────────────┐
//!   │  active  │ ──────────► │ cached + gen │ ──────────► │ ui-visible  │
//!   └──────────┘             └──────────────┘             └─────────────┘
//!   worker thread only                                    render thread only
//! ```
//!
//! The cached value is the only locked state. Both copies clone the whole value
//! under the lock, so a reader never sees fields from two worker iterations.
//!
//! A single generation counter replaces the "cache updated" flag: `recache`
//! bumps it while holding the lock, `publish` skips the copy when the counter
//! has not moved. After one `recache` followed by one `publish`, the visible
//! snapshot equals the active snapshot as it was when `recache` began.
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

struct Shared<S> {
    cached: Mutex<S>,
    generation: AtomicU64,
}

/// Constructor for a connected writer/reader pair.
pub struct SnapshotExchange;

impl SnapshotExchange {
    pub fn new<S: Clone>(initial: S) -> (SnapshotWriter<S>, SnapshotReader<S>) {
        let shared = Arc::new(Shared {
            cached: Mutex::new(initial.clone()),
            generation: AtomicU64::new(0),
        });
        (
            SnapshotWriter {
                active: initial.clone(),
                needs_recache: false,
                shared: shared.clone(),
            },
            SnapshotReader {
                visible: initial,
                seen_generation: 0,
                shared,
            },
        )
    }
}

/// Owner of the active snapshot. Lives on the Worker Loop thread.
pub struct SnapshotWriter<S> {
    active: S,
    needs_recache: bool,
    shared: Arc<Shared<S>>,
}

impl<S: Clone> SnapshotWriter<S> {
    pub fn active(&self) -> &S {
        &self.active
    }

    /// Mutable access to the active snapshot. Marks it for the next recache.
    pub fn active_mut(&mut self) -> &mut S {
        self.needs_recache = true;
        &mut self.active
    }

    /// Apply `f` to the active snapshot and mark it dirty.
    pub fn update<R>(&mut self, f: impl FnOnce(&mut S) -> R) -> R {
        f(self.active_mut())
    }

    pub fn needs_recache(&self) -> bool {
        self.needs_recache
    }

    /// Copy active → cached if anything changed since the last copy.
    ///
    /// Returns true when a copy happened.
    pub fn recache(&mut self) -> bool {
        if !self.needs_recache {
            return false;
        }
        {
            let mut cached = self.shared.cached.lock();
            cached.clone_from(&self.active);
            self.shared.generation.fetch_add(1, Ordering::Release);
        }
        self.needs_recache = false;
        true
    }

    /// Number of completed recaches.
    pub fn generation(&self) -> u64 {
        self.shared.generation.load(Ordering::Acquire)
    }
}

/// Owner of the ui-visible snapshot. Lives on the render/update thread.
///
/// Reading `visible()` never locks; only `publish` touches the mutex.
pub struct SnapshotReader<S> {
    visible: S,
    seen_generation: u64,
    shared: Arc<Shared<S>>,
}

impl<S: Clone> SnapshotReader<S> {
    /// Copy cached → ui-visible if the worker recached since the last publish.
    ///
    /// Returns true when the visible snapshot was refreshed.
    pub fn publish(&mut self) -> bool {
        if self.shared.generation.load(Ordering::Acquire) == self.seen_generation {
            return false;
        }
        let cached = self.shared.cached.lock();
        self.visible.clone_from(&cached);
        // Read under the lock: this is the generation the copy belongs to
        self.seen_generation = self.shared.generation.load(Ordering::Acquire);
        true
    }

    pub fn visible(&self) -> &S {
        &self.visible
    }

    /// Mutable access to the reader-private copy. Never propagates back.
    pub fn visible_mut(&mut self) -> &mut S {
        &mut self.visible
    }

    /// Generation of the data currently visible.
    pub fn seen_generation(&self) -> u64 {
        self.seen_generation
    }

    /// How many recaches the visible copy is behind right now.
    pub fn lag(&self) -> u64 {
        self.shared
            .generation
            .load(Ordering::Acquire)
            .saturating_sub(self.seen_generation)
    }
}
