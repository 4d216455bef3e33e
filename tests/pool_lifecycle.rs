//! Pool initialization, reconnection, and shutdown scenarios.

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use replica_router::pool::ReplicaPool;
use replica_router::{HealthMonitor, ReplicaState, Shutdown, StatsReporter};

mod common;

use common::{mock_replica, MockDriver};

#[tokio::test]
async fn disabled_replica_is_not_connected() {
    let driver = MockDriver::new();
    let pool = ReplicaPool::new(
        driver.clone(),
        vec![mock_replica("r1", 1), mock_replica("r2", 1).disabled()],
    );

    let live = pool.initialize().await;
    assert_eq!(live, 1);
    assert_eq!(pool.replica_stats().len(), 1);
    assert_eq!(driver.connect_count("r2"), 0);
}

#[tokio::test]
async fn failed_connect_is_skipped_not_fatal() {
    let driver = MockDriver::new();
    driver.set_fail_connect("bad", true);
    let pool = ReplicaPool::new(
        driver.clone(),
        vec![mock_replica("bad", 1), mock_replica("good", 1)],
    );

    let live = pool.initialize().await;
    assert_eq!(live, 1);
    assert!(pool.replica("bad").is_none());
    assert!(pool.replica("good").unwrap().is_connected());
}

#[tokio::test]
async fn close_all_clears_state_until_reinitialized() {
    let driver = MockDriver::new();
    let pool = ReplicaPool::new(driver.clone(), vec![mock_replica("r1", 1)]);

    pool.initialize().await;
    assert!(pool.get("r1").is_some());
    assert_eq!(driver.live_handles("r1"), 1);

    pool.close_all().await;
    assert!(pool.get("r1").is_none());
    assert!(pool.replica_stats().is_empty());
    assert_eq!(driver.live_handles("r1"), 0);

    // Lazy init runs again after a full teardown.
    pool.ensure_initialized().await;
    assert!(pool.get("r1").is_some());
    assert_eq!(driver.connect_count("r1"), 2);
}

#[tokio::test]
async fn replica_names_follow_registration_order() {
    let driver = MockDriver::new();
    let pool = ReplicaPool::new(
        driver,
        vec![
            mock_replica("rc", 1),
            mock_replica("ra", 2),
            mock_replica("rb", 3).disabled(),
        ],
    );

    pool.initialize().await;
    assert_eq!(pool.replica_names(), vec!["rc", "ra"]);
}

#[tokio::test]
async fn close_all_during_reconnect_leaves_no_live_handle() {
    let driver = MockDriver::new();
    let pool = Arc::new(ReplicaPool::new(driver.clone(), vec![mock_replica("r1", 1)]));
    pool.initialize().await;

    // Reconnect stalls inside connect while the pool is torn down under it.
    driver.set_connect_delay(Duration::from_millis(200));
    let task = {
        let pool = pool.clone();
        tokio::spawn(async move { pool.reconnect("r1").await })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;
    pool.close_all().await;
    task.await.unwrap();

    assert!(pool.get("r1").is_none());
    assert!(pool.replica_stats().is_empty());
    assert_eq!(
        driver.live_handles("r1"),
        0,
        "a connection finished after teardown must be closed, not installed"
    );
}

#[tokio::test]
async fn reconnect_keeps_at_most_one_live_handle() {
    let driver = MockDriver::new();
    let pool = Arc::new(ReplicaPool::new(driver.clone(), vec![mock_replica("r1", 1)]));
    pool.initialize().await;

    for _ in 0..5 {
        pool.reconnect("r1").await;
        assert_eq!(driver.live_handles("r1"), 1);
        assert!(pool.replica("r1").unwrap().is_connected());
    }

    // A concurrent storm of triggers must also leave exactly one handle.
    let mut tasks = Vec::new();
    for _ in 0..10 {
        let pool = pool.clone();
        tasks.push(tokio::spawn(async move { pool.reconnect("r1").await }));
    }
    for task in tasks {
        task.await.unwrap();
    }
    assert_eq!(driver.live_handles("r1"), 1);
}

#[tokio::test]
async fn concurrent_lazy_init_shares_one_attempt() {
    let driver = MockDriver::new();
    driver.set_connect_delay(Duration::from_millis(50));
    let pool = Arc::new(ReplicaPool::new(driver.clone(), vec![mock_replica("r1", 1)]));

    let mut tasks = Vec::new();
    for _ in 0..10 {
        let pool = pool.clone();
        tasks.push(tokio::spawn(async move { pool.ensure_initialized().await }));
    }
    for task in tasks {
        task.await.unwrap();
    }

    assert_eq!(driver.connect_count("r1"), 1, "callers must share one connect sweep");
}

#[tokio::test]
async fn health_monitor_flags_failure_and_recovers() {
    let driver = MockDriver::new();
    let pool = Arc::new(ReplicaPool::new(driver.clone(), vec![mock_replica("r1", 1)]));
    pool.initialize().await;

    let shutdown = Shutdown::new();
    let monitor = HealthMonitor::with_intervals(
        pool.clone(),
        Duration::from_millis(50),
        Duration::from_millis(50),
    );
    let receiver = shutdown.subscribe();
    tokio::spawn(async move { monitor.run(receiver).await });

    // Break pings for r1 across reconnects.
    driver.fail_ping_flag("r1").store(true, Ordering::SeqCst);
    tokio::time::sleep(Duration::from_millis(400)).await;
    assert!(
        driver.connect_count("r1") > 1,
        "probe failures must trigger reconnection"
    );

    // Heal it; the next probe sweep flips the state back.
    driver.fail_ping_flag("r1").store(false, Ordering::SeqCst);
    tokio::time::sleep(Duration::from_millis(400)).await;
    assert_eq!(pool.replica("r1").unwrap().state(), ReplicaState::Connected);
    assert!(pool.has_healthy_replicas());

    shutdown.trigger();
}

#[tokio::test]
async fn stats_flush_resets_window_but_keeps_totals() {
    let driver = MockDriver::new();
    let pool = Arc::new(ReplicaPool::new(driver, vec![mock_replica("r1", 1)]));
    pool.initialize().await;

    let replica = pool.replica("r1").unwrap();
    replica_router::stats::collector::record_success(&replica, Duration::from_millis(10));
    replica_router::stats::collector::record_success(&replica, Duration::from_millis(20));

    let before = replica.stats();
    assert_eq!(before.queries_window, 2);
    assert_eq!(before.queries_total, 2);

    let reporter = StatsReporter::with_interval(pool.clone(), Duration::from_secs(60));
    reporter.flush();

    let after = replica.stats();
    assert_eq!(after.queries_window, 0, "window counter resets on flush");
    assert_eq!(after.queries_total, 2, "totals persist across windows");
    assert_eq!(after.avg_response_ms, 15, "average persists across windows");
}
