//! Shared mock driver for integration testing.
#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use replica_router::{Connection, Driver, DriverError, ReplicaConfig};

pub const PRIMARY_URI: &str = "mock://primary";

/// A mock connection whose ping behavior is shared with the driver, so a
/// test can fail probes for a name across reconnects.
pub struct MockConnection {
    uri: String,
    closed: AtomicBool,
    fail_ping: Arc<AtomicBool>,
    live: Arc<AtomicI64>,
}

impl MockConnection {
    /// Standalone healthy connection (used as the primary).
    pub fn healthy(uri: &str) -> Arc<dyn Connection> {
        Arc::new(Self {
            uri: uri.to_string(),
            closed: AtomicBool::new(false),
            fail_ping: Arc::new(AtomicBool::new(false)),
            live: Arc::new(AtomicI64::new(1)),
        })
    }
}

#[async_trait]
impl Connection for MockConnection {
    async fn ping(&self) -> Result<Duration, DriverError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(DriverError::Closed);
        }
        if self.fail_ping.load(Ordering::SeqCst) {
            return Err(DriverError::Ping("mock ping failure".into()));
        }
        Ok(Duration::from_millis(1))
    }

    async fn close(&self) -> Result<(), DriverError> {
        if !self.closed.swap(true, Ordering::SeqCst) {
            self.live.fetch_sub(1, Ordering::SeqCst);
        }
        Ok(())
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    fn uri(&self) -> &str {
        &self.uri
    }
}

/// A programmable mock driver tracking per-name connect counts and live
/// (unclosed) handle counts.
#[derive(Default)]
pub struct MockDriver {
    fail_connect: Mutex<HashSet<String>>,
    fail_ping: Mutex<HashMap<String, Arc<AtomicBool>>>,
    connect_counts: Mutex<HashMap<String, u64>>,
    live: Mutex<HashMap<String, Arc<AtomicI64>>>,
    connect_delay: Mutex<Duration>,
}

impl MockDriver {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set_fail_connect(&self, name: &str, fail: bool) {
        let mut set = self.fail_connect.lock().unwrap();
        if fail {
            set.insert(name.to_string());
        } else {
            set.remove(name);
        }
    }

    /// Shared flag controlling ping failures for all connections opened
    /// under this name, past and future.
    pub fn fail_ping_flag(&self, name: &str) -> Arc<AtomicBool> {
        self.fail_ping
            .lock()
            .unwrap()
            .entry(name.to_string())
            .or_default()
            .clone()
    }

    pub fn set_connect_delay(&self, delay: Duration) {
        *self.connect_delay.lock().unwrap() = delay;
    }

    pub fn connect_count(&self, name: &str) -> u64 {
        self.connect_counts
            .lock()
            .unwrap()
            .get(name)
            .copied()
            .unwrap_or(0)
    }

    /// Number of currently unclosed handles for a name.
    pub fn live_handles(&self, name: &str) -> i64 {
        self.live
            .lock()
            .unwrap()
            .get(name)
            .map(|c| c.load(Ordering::SeqCst))
            .unwrap_or(0)
    }
}

#[async_trait]
impl Driver for MockDriver {
    async fn connect(&self, config: &ReplicaConfig) -> Result<Arc<dyn Connection>, DriverError> {
        let delay = *self.connect_delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        *self
            .connect_counts
            .lock()
            .unwrap()
            .entry(config.name.clone())
            .or_insert(0) += 1;

        if self.fail_connect.lock().unwrap().contains(&config.name) {
            return Err(DriverError::Connect("mock connect failure".into()));
        }

        let fail_ping = self.fail_ping_flag(&config.name);
        let live = self
            .live
            .lock()
            .unwrap()
            .entry(config.name.clone())
            .or_default()
            .clone();
        live.fetch_add(1, Ordering::SeqCst);

        Ok(Arc::new(MockConnection {
            uri: config.uri.clone(),
            closed: AtomicBool::new(false),
            fail_ping,
            live,
        }))
    }
}

/// Replica config pointing at a mock URI derived from the name.
pub fn mock_replica(name: &str, weight: u32) -> ReplicaConfig {
    ReplicaConfig::new(name, format!("mock://{}", name)).with_weight(weight)
}
