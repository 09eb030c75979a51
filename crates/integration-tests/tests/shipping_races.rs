//! Staleness guard tests: concurrent rate resolves must never let an
//! outdated response win over the current address.

use std::sync::Arc;
use std::time::Duration;

use stoneline_checkout::identity::IdentitySnapshot;
use stoneline_checkout::session::CheckoutSession;
use stoneline_core::Address;

use stoneline_integration_tests::{
    MockOrderService, MockRateService, gb_address, init_tracing, method, tile_cart, zone_response,
};

type SharedSession = Arc<CheckoutSession<Arc<MockRateService>, Arc<MockOrderService>>>;

fn shared_session() -> (SharedSession, Arc<MockRateService>) {
    init_tracing();
    let rates = Arc::new(MockRateService::new());
    let orders = Arc::new(MockOrderService::new());
    let session = Arc::new(CheckoutSession::new(
        Arc::clone(&rates),
        orders,
        tile_cart(),
        &IdentitySnapshot::anonymous(),
    ));
    (session, rates)
}

/// Spin until the mock has seen `count` resolve calls.
async fn wait_for_calls(rates: &MockRateService, count: usize) {
    while rates.calls() < count {
        tokio::task::yield_now().await;
    }
}

#[tokio::test]
async fn test_address_edit_discards_in_flight_response() {
    let (session, rates) = shared_session();
    session.set_billing_address(gb_address("1 Quarry Rd"));

    // The first lookup is held at the service until we release it.
    let stale_gate = rates.push_gated_response(zone_response(
        "UK Mainland",
        vec![method("uk:standard", "Standard Delivery", "12.50")],
    ));
    let first = tokio::spawn({
        let session = Arc::clone(&session);
        async move { session.resolve_shipping().await }
    });
    wait_for_calls(&rates, 1).await;

    // Mid-flight the customer switches to a French address; the edit
    // alone must already have invalidated the pending lookup.
    session.set_billing_address(Address {
        address_1: "200 Rue de la Carrière".to_string(),
        city: "Lyon".to_string(),
        country: "FR".to_string(),
        ..Address::default()
    });
    assert!(!session.state().is_loading_shipping);

    rates.push_response(zone_response(
        "Europe",
        vec![method("eu:standard", "European Delivery", "29.00")],
    ));
    session.resolve_shipping().await.unwrap();
    assert_eq!(
        session.state().shipping_zone.map(|z| z.name),
        Some("Europe".to_string())
    );

    // The old response finally arrives - and changes nothing.
    stale_gate.send(()).ok();
    first.await.unwrap().unwrap();

    let state = session.state();
    assert_eq!(state.shipping_zone.map(|z| z.name), Some("Europe".to_string()));
    assert_eq!(
        state.shipping_methods.first().map(|m| m.id.clone()),
        Some("eu:standard".to_string())
    );
    // Sole method from the *current* response stays auto-selected.
    assert_eq!(
        state.selected_shipping_method.map(|m| m.id),
        Some("eu:standard".to_string())
    );
}

#[tokio::test]
async fn test_out_of_order_responses_latest_resolve_wins() {
    let (session, rates) = shared_session();
    session.set_billing_address(gb_address("1 Quarry Rd"));

    let first_gate = rates.push_gated_response(zone_response(
        "UK Mainland",
        vec![method("uk:standard", "Standard Delivery", "12.50")],
    ));
    let second_gate = rates.push_gated_response(zone_response(
        "UK Mainland",
        vec![method("uk:express", "Express Delivery", "24.00")],
    ));

    let first = tokio::spawn({
        let session = Arc::clone(&session);
        async move { session.resolve_shipping().await }
    });
    wait_for_calls(&rates, 1).await;
    let second = tokio::spawn({
        let session = Arc::clone(&session);
        async move { session.resolve_shipping().await }
    });
    wait_for_calls(&rates, 2).await;

    // Responses come back in reverse order: newest first.
    second_gate.send(()).ok();
    second.await.unwrap().unwrap();
    first_gate.send(()).ok();
    first.await.unwrap().unwrap();

    // The later resolve's methods stand, even though its response
    // arrived before the earlier request completed.
    let state = session.state();
    assert_eq!(state.shipping_methods.len(), 1);
    assert_eq!(
        state.shipping_methods.first().map(|m| m.id.clone()),
        Some("uk:express".to_string())
    );
    assert!(!state.is_loading_shipping);
}

#[tokio::test]
async fn test_subscribers_observe_busy_flag_and_result() {
    let (session, rates) = shared_session();
    session.set_billing_address(gb_address("1 Quarry Rd"));

    let mut rx = session.subscribe();
    rx.borrow_and_update();

    let gate = rates.push_gated_response(zone_response(
        "UK Mainland",
        vec![method("uk:standard", "Standard Delivery", "12.50")],
    ));
    let resolve = tokio::spawn({
        let session = Arc::clone(&session);
        async move { session.resolve_shipping().await }
    });

    rx.changed().await.unwrap();
    assert!(rx.borrow_and_update().is_loading_shipping);

    gate.send(()).ok();
    resolve.await.unwrap().unwrap();

    rx.changed().await.unwrap();
    let latest = rx.borrow_and_update();
    assert!(!latest.is_loading_shipping);
    assert_eq!(latest.shipping_methods.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_refresh_pads_to_minimum_busy_duration() {
    let (session, rates) = shared_session();
    session.set_billing_address(gb_address("1 Quarry Rd"));

    rates.push_response(zone_response(
        "UK Mainland",
        vec![method("uk:standard", "Standard Delivery", "12.50")],
    ));

    // The mock answers instantly, but the user-triggered refresh still
    // holds the busy state for the minimum visible duration.
    let start = tokio::time::Instant::now();
    session.refresh_shipping().await.unwrap();
    assert!(start.elapsed() >= Duration::from_millis(400));
    assert!(!session.state().is_loading_shipping);
}

#[tokio::test(start_paused = true)]
async fn test_plain_resolve_is_not_padded() {
    let (session, rates) = shared_session();
    session.set_billing_address(gb_address("1 Quarry Rd"));

    rates.push_response(zone_response(
        "UK Mainland",
        vec![method("uk:standard", "Standard Delivery", "12.50")],
    ));

    let start = tokio::time::Instant::now();
    session.resolve_shipping().await.unwrap();
    assert_eq!(start.elapsed(), Duration::ZERO);
}
