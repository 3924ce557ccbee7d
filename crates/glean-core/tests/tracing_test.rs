//! Tracing setup tests.

use glean_core::tracing::{init_tracing, setup};

#[test]
fn init_reports_the_same_outcome_every_time() {
    let first = init_tracing();
    assert_eq!(init_tracing(), first);
    tracing::info!(target: "glean_core", "tracing initialised");
}

#[test]
fn filter_falls_back_to_default() {
    assert_eq!(setup::LOG_ENV, "GLEAN_LOG");
    // only this test touches GLEAN_LOG
    std::env::remove_var(setup::LOG_ENV);
    assert_eq!(setup::env_filter().to_string(), setup::DEFAULT_FILTER);

    std::env::set_var(setup::LOG_ENV, "glean_analysis=debug");
    assert_eq!(setup::env_filter().to_string(), "glean_analysis=debug");

    std::env::set_var(setup::LOG_ENV, "glean_analysis=[");
    assert_eq!(setup::env_filter().to_string(), setup::DEFAULT_FILTER);
    std::env::remove_var(setup::LOG_ENV);
}
