// libdocket/src/logging_tests.rs

use super::logging;
use crate::test_utils::ENV_MUTEX;
use std::env;

#[test]
fn filter_falls_back_to_info() {
    let _guard = ENV_MUTEX.lock().unwrap();
    let saved = env::var("RUST_LOG").ok();

    env::remove_var("RUST_LOG");
    assert_eq!(logging::env_filter().to_string(), logging::DEFAULT_FILTER);

    env::set_var("RUST_LOG", "debug");
    assert_eq!(logging::env_filter().to_string(), "debug");

    match saved {
        Some(v) => env::set_var("RUST_LOG", v),
        None => env::remove_var("RUST_LOG"),
    }
}

#[test]
fn init_is_idempotent() {
    // whichever call wins, only one subscriber is ever installed
    logging::init();
    assert!(!logging::init(), "second init must not replace the subscriber");
    assert!(tracing::dispatcher::has_been_set());
    tracing::info!("logging initialised");
}
