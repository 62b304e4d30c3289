//! Fixed-interval sampling loop.
//!
//! Each tick runs `Fetching -> Resolving -> Emitting`: one status document is
//! fetched from the provider, every configured path is resolved and derived,
//! and the resulting [`ValueMap`] is handed to the consumer. A failed fetch
//! drops the tick and leaves all per-metric state untouched.

use std::collections::HashMap;
use std::io;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam::channel::{self, Sender};
use tracing::{debug, info, trace};

use crate::config::MetricSpec;
use crate::derive::{SamplerState, derive};
use crate::handoff::{HostPublisher, SendOutcome, Shutdown, send_or_shutdown};
use crate::provider::StatusProvider;
use crate::snapshot::{host_identity, resolve_path};

/// Derived values of one tick, keyed by metric name.
pub type ValueMap = HashMap<String, f64>;

/// Result of one successful sampling pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    pub values: ValueMap,
    pub host: Option<String>,
}

/// Counters describing the sampler's lifetime, for logging.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SamplerStats {
    pub ticks: u64,
    pub failed_fetches: u64,
    pub path_misses: u64,
}

/// Polls a [`StatusProvider`] and derives metric values.
pub struct Sampler<P: StatusProvider> {
    provider: P,
    metrics: Vec<MetricSpec>,
    states: HashMap<String, SamplerState>,
    interval: Duration,
    last_host: Option<String>,
    stats: SamplerStats,
}

impl<P: StatusProvider> Sampler<P> {
    /// Creates a sampler. `interval` must be the validated, non-zero
    /// configured polling interval.
    pub fn new(provider: P, metrics: Vec<MetricSpec>, interval: Duration) -> Self {
        Self {
            provider,
            metrics,
            states: HashMap::new(),
            interval,
            last_host: None,
            stats: SamplerStats::default(),
        }
    }

    pub fn stats(&self) -> SamplerStats {
        self.stats
    }

    /// Per-metric state, present once the metric has resolved at least once.
    pub fn state(&self, name: &str) -> Option<&SamplerState> {
        self.states.get(name)
    }

    /// Runs one fetch-and-resolve pass.
    ///
    /// Returns `None` if the provider failed; in that case no state changes.
    pub fn sample(&mut self) -> Option<Tick> {
        let snapshot = match self.provider.fetch_status() {
            Ok(snapshot) => snapshot,
            Err(e) => {
                self.stats.failed_fetches += 1;
                debug!("Status fetch failed, skipping tick: {}", e);
                return None;
            }
        };
        self.stats.ticks += 1;

        let interval_secs = self.interval.as_secs_f64();
        let mut values = ValueMap::with_capacity(self.metrics.len());
        for spec in &self.metrics {
            let Some(raw) = resolve_path(&snapshot, &spec.path) else {
                self.stats.path_misses += 1;
                trace!("Path '{}' for metric '{}' not found", spec.path, spec.name);
                continue;
            };
            let state = self.states.entry(spec.name.clone()).or_default();
            values.insert(spec.name.clone(), derive(spec, raw, state, interval_secs));
        }

        Some(Tick {
            values,
            host: host_identity(&snapshot),
        })
    }

    /// Runs the polling loop until shutdown is requested or the consumer
    /// goes away.
    ///
    /// Sending a tick blocks while the previous one is still unconsumed.
    pub fn run(mut self, out: Sender<ValueMap>, hosts: HostPublisher, shutdown: Shutdown) {
        info!(
            "Sampling {} metrics every {:?} from {}",
            self.metrics.len(),
            self.interval,
            self.provider.describe()
        );

        let ticker = channel::tick(self.interval);
        loop {
            channel::select! {
                recv(ticker) -> _ => {}
                recv(shutdown.receiver()) -> _ => break,
            }
            // Both arms can be ready at once; never start a fetch after shutdown.
            if shutdown.is_requested() {
                break;
            }

            let Some(tick) = self.sample() else {
                continue;
            };

            if let Some(host) = tick.host
                && self.last_host.as_deref() != Some(host.as_str())
            {
                debug!("Host identity: {}", host);
                self.last_host = Some(host.clone());
                hosts.publish(host);
            }

            match send_or_shutdown(&out, tick.values, &shutdown) {
                SendOutcome::Delivered => {}
                SendOutcome::Shutdown => break,
                SendOutcome::Disconnected => {
                    debug!("Consumer is gone, stopping sampler");
                    break;
                }
            }
        }

        let stats = self.stats;
        info!(
            "Sampler stopped: {} ticks, {} failed fetches, {} path misses",
            stats.ticks, stats.failed_fetches, stats.path_misses
        );
    }
}

impl<P: StatusProvider + 'static> Sampler<P> {
    /// Runs [`Sampler::run`] on a dedicated thread.
    pub fn spawn(
        self,
        out: Sender<ValueMap>,
        hosts: HostPublisher,
        shutdown: Shutdown,
    ) -> io::Result<JoinHandle<()>> {
        thread::Builder::new()
            .name("sampler".to_string())
            .spawn(move || self.run(out, hosts, shutdown))
    }
}
