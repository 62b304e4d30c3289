//! Channels connecting the sampler thread to the consumer loop.
//!
//! - metric values travel over a single-slot blocking channel, so a slow
//!   consumer pauses sampling instead of queueing ticks;
//! - the host identity travels over a single-slot channel whose writer never
//!   blocks and replaces whatever is still unread;
//! - [`Shutdown`] is a broadcast signal every blocking operation selects on.

use std::sync::{Arc, Mutex};

use crossbeam::channel::{self, Receiver, Sender, TryRecvError, TrySendError};

use crate::sampler::ValueMap;

/// Creates the single-slot metric channel.
pub fn metric_channel() -> (Sender<ValueMap>, Receiver<ValueMap>) {
    channel::bounded(1)
}

/// Creates the overwrite-on-full host identity channel.
pub fn host_channel() -> (HostPublisher, Receiver<String>) {
    let (tx, rx) = channel::bounded(1);
    let publisher = HostPublisher {
        tx,
        stale: rx.clone(),
    };
    (publisher, rx)
}

/// Writer side of the host identity channel.
#[derive(Clone)]
pub struct HostPublisher {
    tx: Sender<String>,
    /// Used to evict an unread value when the slot is full.
    stale: Receiver<String>,
}

impl HostPublisher {
    /// Publishes `host` without blocking.
    ///
    /// An unread previous value is dropped in favour of the new one. If the
    /// reader races us for the slot the new value may be lost, which is
    /// acceptable since the identity is near-constant.
    pub fn publish(&self, host: String) {
        match self.tx.try_send(host) {
            Ok(()) | Err(TrySendError::Disconnected(_)) => {}
            Err(TrySendError::Full(host)) => {
                let _ = self.stale.try_recv();
                let _ = self.tx.try_send(host);
            }
        }
    }
}

/// Outcome of a cancellable send.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    Delivered,
    /// Shutdown was requested before the receiver took the value.
    Shutdown,
    /// The receiver is gone.
    Disconnected,
}

/// Blocks until `tx` accepts `value` or shutdown is requested.
pub fn send_or_shutdown<T>(tx: &Sender<T>, value: T, shutdown: &Shutdown) -> SendOutcome {
    if shutdown.is_requested() {
        return SendOutcome::Shutdown;
    }
    channel::select! {
        send(tx, value) -> res => match res {
            Ok(()) => SendOutcome::Delivered,
            Err(_) => SendOutcome::Disconnected,
        },
        recv(shutdown.receiver()) -> _ => SendOutcome::Shutdown,
    }
}

/// Cooperative shutdown signal.
///
/// Nothing is ever sent on the underlying channel; requesting shutdown drops
/// the sender, which wakes every receiver blocked in a `select!` at once.
#[derive(Clone)]
pub struct Shutdown {
    rx: Receiver<()>,
}

/// Handle used to request shutdown. Cloneable and callable from signal
/// handlers; dropping every trigger also counts as a request.
#[derive(Clone)]
pub struct ShutdownTrigger {
    tx: Arc<Mutex<Option<Sender<()>>>>,
}

impl Shutdown {
    pub fn new() -> (ShutdownTrigger, Shutdown) {
        let (tx, rx) = channel::bounded(0);
        (
            ShutdownTrigger {
                tx: Arc::new(Mutex::new(Some(tx))),
            },
            Shutdown { rx },
        )
    }

    /// Returns `true` once shutdown has been requested.
    pub fn is_requested(&self) -> bool {
        matches!(self.rx.try_recv(), Err(TryRecvError::Disconnected))
    }

    /// Receiver that becomes ready (disconnected) on shutdown, for `select!`.
    pub fn receiver(&self) -> &Receiver<()> {
        &self.rx
    }
}

impl ShutdownTrigger {
    /// Requests shutdown. Idempotent.
    pub fn fire(&self) {
        match self.tx.lock() {
            Ok(mut guard) => {
                guard.take();
            }
            Err(poisoned) => {
                poisoned.into_inner().take();
            }
        }
    }
}
