//! Test support for Stoneline integration tests.
//!
//! Provides scripted mock implementations of the [`RateService`] and
//! [`OrderService`] seams plus shared fixtures. Mocks replay a queued
//! script of outcomes, record every request they receive, and can hold a
//! response until the test releases a gate - that last part is what the
//! shipping race tests are built on.
//!
//! # Test Categories
//!
//! - `checkout_flow` - Step gating, invalidation, and order placement
//! - `shipping_races` - Staleness guard for concurrent rate resolves

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use rust_decimal::Decimal;
use tokio::sync::oneshot;

use stoneline_checkout::cart::{CartLine, CartSnapshot, CartTotals};
use stoneline_checkout::error::Result;
use stoneline_checkout::orders::{OrderConfirmation, OrderRequest, OrderService};
use stoneline_checkout::shipping::{
    RateRequest, RateResponse, RateService, ShippingMethod, ShippingZone,
};
use stoneline_core::{Address, CurrencyCode};

/// Initialize test logging once; safe to call from every test.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

// =============================================================================
// Scripted rate service
// =============================================================================

/// One scripted rate lookup outcome.
pub struct ScriptedResolve {
    /// When present, the resolve blocks until the sender side fires.
    pub gate: Option<oneshot::Receiver<()>>,
    pub outcome: Result<RateResponse>,
}

/// A [`RateService`] that replays a queued script.
#[derive(Default)]
pub struct MockRateService {
    script: Mutex<VecDeque<ScriptedResolve>>,
    requests: Mutex<Vec<RateRequest>>,
    calls: AtomicUsize,
}

impl MockRateService {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an immediate response.
    pub fn push_response(&self, response: RateResponse) {
        self.script.lock().unwrap().push_back(ScriptedResolve {
            gate: None,
            outcome: Ok(response),
        });
    }

    /// Queue a response that is held until the returned sender fires.
    pub fn push_gated_response(&self, response: RateResponse) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.script.lock().unwrap().push_back(ScriptedResolve {
            gate: Some(rx),
            outcome: Ok(response),
        });
        tx
    }

    /// Queue a failed lookup.
    pub fn push_error(&self, err: stoneline_checkout::CheckoutError) {
        self.script.lock().unwrap().push_back(ScriptedResolve {
            gate: None,
            outcome: Err(err),
        });
    }

    /// Number of resolve calls seen so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Every request received, in order.
    pub fn requests(&self) -> Vec<RateRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl RateService for MockRateService {
    async fn resolve_rates(&self, request: &RateRequest) -> Result<RateResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());
        let scripted = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .expect("unscripted resolve_rates call");
        if let Some(gate) = scripted.gate {
            gate.await.ok();
        }
        scripted.outcome
    }
}

// =============================================================================
// Scripted order service
// =============================================================================

/// An [`OrderService`] that replays a queued script.
#[derive(Default)]
pub struct MockOrderService {
    script: Mutex<VecDeque<Result<OrderConfirmation>>>,
    requests: Mutex<Vec<OrderRequest>>,
    calls: AtomicUsize,
}

impl MockOrderService {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_confirmation(&self, order_id: &str) {
        self.script.lock().unwrap().push_back(Ok(OrderConfirmation {
            order_id: order_id.to_string(),
        }));
    }

    pub fn push_error(&self, err: stoneline_checkout::CheckoutError) {
        self.script.lock().unwrap().push_back(Err(err));
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// The most recent placement request, if any call was made.
    pub fn last_request(&self) -> Option<OrderRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

impl OrderService for MockOrderService {
    async fn place_order(&self, request: &OrderRequest) -> Result<OrderConfirmation> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .expect("unscripted place_order call")
    }
}

// =============================================================================
// Fixtures
// =============================================================================

/// A complete GB billing address.
#[must_use]
pub fn gb_address(street: &str) -> Address {
    Address {
        first_name: "Sam".to_string(),
        last_name: "Mason".to_string(),
        address_1: street.to_string(),
        city: "Bath".to_string(),
        postcode: "BA1 1AA".to_string(),
        country: "GB".to_string(),
        email: "sam@example.com".to_string(),
        ..Address::default()
    }
}

#[must_use]
pub fn method(id: &str, title: &str, cost: &str) -> ShippingMethod {
    ShippingMethod {
        id: id.to_string(),
        method_id: "flat_rate".to_string(),
        title: title.to_string(),
        description: "3-5 working days".to_string(),
        cost: Decimal::from_str_exact(cost).expect("bad cost literal"),
        taxable: true,
    }
}

/// A zone with the given methods.
#[must_use]
pub fn zone_response(zone_name: &str, methods: Vec<ShippingMethod>) -> RateResponse {
    RateResponse {
        zone: Some(ShippingZone {
            id: zone_name.to_lowercase().replace(' ', "-"),
            name: zone_name.to_string(),
        }),
        methods,
        message: None,
    }
}

/// A small two-line tile cart: 12 porcelain tiles and 3 mosaic sheets.
#[must_use]
pub fn tile_cart() -> CartSnapshot {
    let dec = |s: &str| Decimal::from_str_exact(s).expect("bad decimal literal");
    CartSnapshot {
        items: vec![
            CartLine {
                id: "line-1".to_string(),
                title: "Slate Grey Porcelain".to_string(),
                variant_title: Some("300x300x16".to_string()),
                sku: Some("SLT-300".to_string()),
                quantity: 12,
                unit_price: dec("3.00"),
                line_total: dec("36.00"),
                size_label: Some("300x300x16".to_string()),
            },
            CartLine {
                id: "line-2".to_string(),
                title: "Travertine Mosaic".to_string(),
                variant_title: Some("49x49x10 (305x305x10)".to_string()),
                sku: None,
                quantity: 3,
                unit_price: dec("18.50"),
                line_total: dec("55.50"),
                size_label: Some("49x49x10 (305x305x10)".to_string()),
            },
        ],
        totals: CartTotals {
            subtotal: dec("91.50"),
            discount: dec("10.00"),
            tax: dec("16.30"),
            currency_code: CurrencyCode::GBP,
        },
    }
}
