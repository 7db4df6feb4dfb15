//! Installs the global subscriber, so it runs in its own test binary.

use takt_telemetry::EventLogger;

#[test]
fn init_twice_keeps_first_subscriber() {
    EventLogger::init();
    EventLogger::init();
    assert!(tracing::dispatcher::has_been_set());
    EventLogger::log_workload("default", "light", 10, 15_200.0, 100.0);
}
