//! Bounded frame queue between the sensor thread and the consumer

use std::num::NonZeroUsize;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crossbeam_channel::{Receiver, Sender, TryRecvError, TrySendError};

/// What the producer does when the consumer falls behind
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BackpressurePolicy {
    /// Wait for the consumer; nothing is lost or reordered
    #[default]
    Block,
    /// Evict the oldest queued event to make room
    DropOldest,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SendOutcome {
    Enqueued,
    DroppedOldest,
    Disconnected,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChannelCapacity(NonZeroUsize);

impl ChannelCapacity {
    /// Two frames in flight: one being rendered, one waiting
    pub const DEFAULT: Self = Self(NonZeroUsize::MIN.saturating_add(1));

    pub fn new(capacity: NonZeroUsize) -> Self {
        Self(capacity)
    }

    pub fn get(self) -> usize {
        self.0.get()
    }
}

impl Default for ChannelCapacity {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[derive(Debug)]
pub enum ChannelCapacityError {
    Zero,
}

impl std::fmt::Display for ChannelCapacityError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChannelCapacityError::Zero => write!(f, "channel capacity must be > 0"),
        }
    }
}

impl std::error::Error for ChannelCapacityError {}

impl TryFrom<usize> for ChannelCapacity {
    type Error = ChannelCapacityError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        NonZeroUsize::new(value)
            .map(ChannelCapacity)
            .ok_or(ChannelCapacityError::Zero)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ChannelStats {
    pub enqueued: u64,
    pub dropped_oldest: u64,
    pub disconnected: u64,
}

#[derive(Debug, Default)]
struct ChannelStatsInner {
    enqueued: AtomicU64,
    dropped_oldest: AtomicU64,
    disconnected: AtomicU64,
}

impl ChannelStatsInner {
    fn snapshot(&self) -> ChannelStats {
        ChannelStats {
            enqueued: self.enqueued.load(Ordering::Relaxed),
            dropped_oldest: self.dropped_oldest.load(Ordering::Relaxed),
            disconnected: self.disconnected.load(Ordering::Relaxed),
        }
    }
}

#[derive(Clone, Debug)]
pub struct ChannelStatsHandle {
    inner: Arc<ChannelStatsInner>,
}

impl ChannelStatsHandle {
    pub fn snapshot(&self) -> ChannelStats {
        self.inner.snapshot()
    }
}

#[derive(Debug)]
pub struct FrameSender<T> {
    tx: Sender<T>,
    // Only held under `DropOldest`; that sender checks the receiver count
    // to notice the consumer hanging up
    evict_rx: Option<Receiver<T>>,
    policy: BackpressurePolicy,
    stats: Arc<ChannelStatsInner>,
}

impl<T> FrameSender<T> {
    pub fn send(&self, value: T) -> SendOutcome {
        match self.policy {
            BackpressurePolicy::Block => match self.tx.send(value) {
                Ok(()) => self.enqueued(),
                Err(_) => self.disconnected(),
            },
            BackpressurePolicy::DropOldest => self.send_evicting(value),
        }
    }

    fn send_evicting(&self, value: T) -> SendOutcome {
        // Our own eviction handle is the only receiver left
        if self.tx.receiver_count() <= 1 {
            return self.disconnected();
        }

        let mut evicted = false;
        let mut value = value;

        loop {
            match self.tx.try_send(value) {
                Ok(()) => {
                    return if evicted {
                        self.stats.enqueued.fetch_add(1, Ordering::Relaxed);
                        SendOutcome::DroppedOldest
                    } else {
                        self.enqueued()
                    };
                }
                Err(TrySendError::Full(rejected)) => {
                    value = rejected;
                    let Some(evict_rx) = &self.evict_rx else {
                        return self.disconnected();
                    };
                    match evict_rx.try_recv() {
                        Ok(_) => {
                            self.stats.dropped_oldest.fetch_add(1, Ordering::Relaxed);
                            evicted = true;
                        }
                        // The consumer drained the queue in between; retry
                        Err(TryRecvError::Empty) => {}
                        Err(TryRecvError::Disconnected) => return self.disconnected(),
                    }
                }
                Err(TrySendError::Disconnected(_)) => return self.disconnected(),
            }
        }
    }

    fn enqueued(&self) -> SendOutcome {
        self.stats.enqueued.fetch_add(1, Ordering::Relaxed);
        SendOutcome::Enqueued
    }

    fn disconnected(&self) -> SendOutcome {
        self.stats.disconnected.fetch_add(1, Ordering::Relaxed);
        SendOutcome::Disconnected
    }
}

#[derive(Debug)]
pub struct FrameReceiver<T> {
    rx: Receiver<T>,
}

impl<T> FrameReceiver<T> {
    pub fn recv(&self) -> Result<T, crossbeam_channel::RecvError> {
        self.rx.recv()
    }

    pub fn iter(&self) -> crossbeam_channel::Iter<'_, T> {
        self.rx.iter()
    }
}

pub fn bounded_channel<T>(
    capacity: ChannelCapacity,
    policy: BackpressurePolicy,
) -> (FrameSender<T>, FrameReceiver<T>, ChannelStatsHandle) {
    let (tx, rx) = crossbeam_channel::bounded(capacity.get());
    let stats = Arc::new(ChannelStatsInner::default());
    let sender = FrameSender {
        tx,
        evict_rx: (policy == BackpressurePolicy::DropOldest).then(|| rx.clone()),
        policy,
        stats: stats.clone(),
    };
    let receiver = FrameReceiver { rx };
    let handle = ChannelStatsHandle { inner: stats };
    (sender, receiver, handle)
}
