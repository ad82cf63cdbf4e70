//! Sensor session and frame delivery
//!
//! The sensor itself sits behind [`FrameSource`]. A [`SensorSession`] owns the
//! source for its whole lifetime and hands out [`FrameReader`]s. Each reader
//! runs one producer thread that pulls frames from the source and pushes them
//! through a bounded queue to a single consumer, so ordering and
//! backpressure are explicit instead of hidden in an event loop.

mod channel;
mod memory;
mod recording;

pub use channel::{
    bounded_channel, BackpressurePolicy, ChannelCapacity, ChannelCapacityError, ChannelStats,
    ChannelStatsHandle, FrameReceiver, FrameSender, SendOutcome,
};
pub use memory::MemorySource;
pub use recording::{RecordingSource, FRAME_INTERVAL};

use crate::frame::{Frame, FrameError};
use crate::types::{FrameDescription, StreamKind};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, trace, warn};

/// Result of asking the sensor for the next frame
#[derive(Debug, Clone, PartialEq)]
pub enum Acquisition {
    Frame(Frame),
    /// A frame was signalled but could not be acquired
    Null,
    /// The sensor is paused, closed or unplugged
    Unavailable,
    /// No more frames will ever arrive
    Finished,
}

/// External collaborator delivering raw frames
pub trait FrameSource: Send + 'static {
    /// Layout of the frames this source delivers for `kind`
    fn description(&self, kind: StreamKind) -> FrameDescription;

    fn is_available(&self) -> bool;

    /// Acquire the next frame of `kind`, blocking until one is due
    ///
    /// # Errors
    ///
    /// Returns an error when the underlying data cannot be read
    fn acquire(&mut self, kind: StreamKind) -> Result<Acquisition, FrameError>;
}

/// Events seen by the consumer of a [`FrameReader`]
#[derive(Debug, Clone, PartialEq)]
pub enum SensorEvent {
    Frame(Frame),
    NullFrame,
    Availability(bool),
    Failed(String),
}

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Sensor session is closed")]
    Closed,

    #[error("Failed to start frame reader: {0}")]
    Spawn(#[from] std::io::Error),
}

type SharedSource = Arc<Mutex<Box<dyn FrameSource>>>;

/// Explicit handle on an opened sensor
pub struct SensorSession {
    source: SharedSource,
    closed: Arc<AtomicBool>,
    poll_interval: Duration,
}

impl SensorSession {
    /// How long a reader waits before polling an unavailable sensor again
    pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

    pub fn open(source: impl FrameSource) -> Self {
        let source: Box<dyn FrameSource> = Box::new(source);
        let session = Self {
            source: Arc::new(Mutex::new(source)),
            closed: Arc::new(AtomicBool::new(false)),
            poll_interval: Self::DEFAULT_POLL_INTERVAL,
        };
        info!(available = session.is_available(), "sensor session opened");
        session
    }

    #[must_use]
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn is_open(&self) -> bool {
        !self.closed.load(Ordering::Acquire)
    }

    pub fn is_available(&self) -> bool {
        self.is_open()
            && self
                .source
                .lock()
                .map(|source| source.is_available())
                .unwrap_or(false)
    }

    /// Frame layout for `kind`, `None` once the session is closed
    pub fn description(&self, kind: StreamKind) -> Option<FrameDescription> {
        if !self.is_open() {
            return None;
        }
        self.source.lock().ok().map(|source| source.description(kind))
    }

    /// Start delivering frames of `kind`
    ///
    /// # Errors
    ///
    /// Returns an error if the session is closed or the producer thread
    /// cannot be spawned
    pub fn open_reader(
        &self,
        kind: StreamKind,
        capacity: ChannelCapacity,
        policy: BackpressurePolicy,
    ) -> Result<FrameReader, SessionError> {
        if !self.is_open() {
            return Err(SessionError::Closed);
        }

        let (tx, rx, stats) = bounded_channel(capacity, policy);
        let stop = Arc::new(AtomicBool::new(false));
        let producer = Producer {
            kind,
            source: Arc::clone(&self.source),
            tx,
            stop: Arc::clone(&stop),
            closed: Arc::clone(&self.closed),
            poll_interval: self.poll_interval,
        };

        let worker = std::thread::Builder::new()
            .name(format!("{}-reader", kind.name().to_lowercase()))
            .spawn(move || producer.run())?;

        debug!(%kind, capacity = capacity.get(), ?policy, "frame reader opened");

        Ok(FrameReader {
            kind,
            rx: Some(rx),
            stop,
            worker: Some(worker),
            stats,
        })
    }

    /// Stop every reader and release the sensor
    pub fn close(&mut self) {
        if !self.closed.swap(true, Ordering::AcqRel) {
            info!("sensor session closed");
        }
    }
}

impl Drop for SensorSession {
    fn drop(&mut self) {
        self.close();
    }
}

/// Consumer end of one stream
#[derive(Debug)]
pub struct FrameReader {
    kind: StreamKind,
    rx: Option<FrameReceiver<SensorEvent>>,
    stop: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
    stats: ChannelStatsHandle,
}

impl FrameReader {
    /// Next event, `None` once the producer has finished
    pub fn recv(&self) -> Option<SensorEvent> {
        self.rx.as_ref()?.recv().ok()
    }

    /// Blocking iterator over events until the producer finishes
    pub fn events(&self) -> impl Iterator<Item = SensorEvent> + '_ {
        std::iter::from_fn(|| self.recv())
    }

    pub fn stats(&self) -> ChannelStats {
        self.stats.snapshot()
    }

    /// Stop the producer and wait for it to exit
    pub fn close(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.stop.store(true, Ordering::Release);
        // Hanging up wakes a producer blocked on a full queue
        self.rx.take();
        if let Some(worker) = self.worker.take()
            && worker.join().is_err()
        {
            warn!(kind = %self.kind, "frame reader thread panicked");
        }
    }
}

impl Drop for FrameReader {
    fn drop(&mut self) {
        self.shutdown();
    }
}

struct Producer {
    kind: StreamKind,
    source: SharedSource,
    tx: FrameSender<SensorEvent>,
    stop: Arc<AtomicBool>,
    closed: Arc<AtomicBool>,
    poll_interval: Duration,
}

impl Producer {
    fn should_stop(&self) -> bool {
        self.stop.load(Ordering::Acquire) || self.closed.load(Ordering::Acquire)
    }

    fn run(self) {
        let mut available = match self.source.lock() {
            Ok(source) => source.is_available(),
            Err(_) => {
                self.tx.send(SensorEvent::Failed("sensor source poisoned".into()));
                return;
            }
        };
        if self.tx.send(SensorEvent::Availability(available)) == SendOutcome::Disconnected {
            return;
        }

        while !self.should_stop() {
            let acquisition = match self.source.lock() {
                Ok(mut source) => source.acquire(self.kind),
                Err(_) => {
                    self.tx.send(SensorEvent::Failed("sensor source poisoned".into()));
                    return;
                }
            };

            let event = match acquisition {
                Ok(Acquisition::Frame(frame)) => {
                    if !available {
                        available = true;
                        info!(kind = %self.kind, "sensor available again");
                        if self.tx.send(SensorEvent::Availability(true)) == SendOutcome::Disconnected {
                            return;
                        }
                    }
                    SensorEvent::Frame(frame)
                }
                Ok(Acquisition::Null) => {
                    trace!(kind = %self.kind, "null frame");
                    SensorEvent::NullFrame
                }
                Ok(Acquisition::Unavailable) => {
                    if available {
                        available = false;
                        info!(kind = %self.kind, "sensor not available");
                        if self.tx.send(SensorEvent::Availability(false)) == SendOutcome::Disconnected {
                            return;
                        }
                    }
                    std::thread::sleep(self.poll_interval);
                    continue;
                }
                Ok(Acquisition::Finished) => {
                    debug!(kind = %self.kind, "frame source finished");
                    return;
                }
                Err(e) => {
                    warn!(kind = %self.kind, error = %e, "frame acquisition failed");
                    self.tx.send(SensorEvent::Failed(e.to_string()));
                    return;
                }
            };

            if self.tx.send(event) == SendOutcome::Disconnected {
                return;
            }
        }
    }
}
