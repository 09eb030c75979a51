//! The checkout session state machine.
//!
//! One `CheckoutSession` exists per active checkout, created from a
//! non-empty cart. It owns step progression, addresses, shipping and
//! payment selection, and the terminal order commit, delegating rate
//! lookup and placement to the [`RateService`] / [`OrderService`] seams.
//!
//! # Concurrency
//!
//! Commands are synchronous except the two network operations. State
//! lives behind a mutex whose lock is never held across an await, and
//! every rate resolve is tagged with a generation number: address edits
//! and newer resolves bump the counter, and a response is applied only
//! if its generation is still current. The latest address always wins,
//! no matter how responses interleave.

mod state;

pub use state::CheckoutState;

use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, instrument};

use stoneline_core::{Address, CheckoutStep, CheckoutTotals, PaymentMethod};

use crate::cart::CartSnapshot;
use crate::error::{CheckoutError, Result};
use crate::identity::IdentitySnapshot;
use crate::orders::{CardDetails, OrderConfirmation, OrderRequest, OrderService};
use crate::shipping::{RateRequest, RateService};

/// Minimum visible busy duration for user-triggered rate refreshes, so a
/// fast network does not produce an imperceptible flash.
const REFRESH_MIN_BUSY: Duration = Duration::from_millis(400);

/// The checkout state machine.
///
/// All mutation goes through the command methods below; UI layers
/// observe [`CheckoutState`] snapshots via [`Self::subscribe`].
pub struct CheckoutSession<R, O> {
    rates: R,
    orders: O,
    cart: CartSnapshot,
    state: Mutex<CheckoutState>,
    /// Staleness guard for in-flight rate resolves.
    generation: AtomicU64,
    watch_tx: watch::Sender<CheckoutState>,
}

impl<R: RateService, O: OrderService> CheckoutSession<R, O> {
    /// Create a session for the given cart and identity.
    ///
    /// Authenticated customers start at the address step with their
    /// stored addresses pre-populated; everyone else starts at identify.
    /// No shipping method is ever carried over from a previous session.
    #[must_use]
    pub fn new(rates: R, orders: O, cart: CartSnapshot, identity: &IdentitySnapshot) -> Self {
        let initial = CheckoutState::initial(identity);
        let (watch_tx, _) = watch::channel(initial.clone());
        Self {
            rates,
            orders,
            cart,
            state: Mutex::new(initial),
            generation: AtomicU64::new(0),
            watch_tx,
        }
    }

    /// A snapshot of the current state.
    #[must_use]
    pub fn state(&self) -> CheckoutState {
        self.lock().clone()
    }

    /// Subscribe to state snapshots.
    ///
    /// Every command publishes the resulting state; receivers see at
    /// least the latest value.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<CheckoutState> {
        self.watch_tx.subscribe()
    }

    /// The cart snapshot this session was created from.
    #[must_use]
    pub const fn cart(&self) -> &CartSnapshot {
        &self.cart
    }

    /// The rate service this session resolves against.
    #[must_use]
    pub const fn rates(&self) -> &R {
        &self.rates
    }

    /// The order service this session commits through.
    #[must_use]
    pub const fn orders(&self) -> &O {
        &self.orders
    }

    /// The payable breakdown for the current shipping selection.
    ///
    /// Recomputed on every call; never stored.
    #[must_use]
    pub fn totals(&self) -> CheckoutTotals {
        let state = self.lock();
        CheckoutTotals::compute(
            self.cart.totals.subtotal,
            self.cart.totals.discount,
            state
                .selected_shipping_method
                .as_ref()
                .map(|method| method.cost),
            self.cart.totals.currency_code,
        )
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// Validate the named step's gate and advance to the next step.
    ///
    /// The named step must be the active one. On a failed gate the step
    /// does not move and the session error is set to the gate's message.
    ///
    /// The review step has no successor: its gate is checked by
    /// [`Self::place_order`], which is the terminal action.
    ///
    /// # Errors
    ///
    /// Returns a validation error when the gate requirement is unmet.
    pub fn complete_step(&self, step: CheckoutStep) -> Result<()> {
        let mut state = self.lock();

        if state.step != step {
            let err = CheckoutError::validation("This isn't the active checkout step.");
            state.error = Some(err.user_message());
            self.publish(&state);
            return Err(err);
        }

        if let Err(err) = step_gate(&state, step) {
            state.error = Some(err.user_message());
            self.publish(&state);
            return Err(err);
        }

        if let Some(next) = step.next() {
            debug!(from = %step, to = %next, "checkout step completed");
            state.step = next;
        }
        state.error = None;
        self.publish(&state);
        Ok(())
    }

    /// Move one step back. Always allowed; clears any error.
    pub fn go_to_previous_step(&self) {
        let mut state = self.lock();
        if let Some(previous) = state.step.previous() {
            state.step = previous;
        }
        state.error = None;
        self.publish(&state);
    }

    /// Jump directly to a step.
    ///
    /// Navigation only, used by the review screen's edit links; it
    /// bypasses gating because it never completes anything.
    pub fn go_to_step(&self, target: CheckoutStep) {
        let mut state = self.lock();
        state.step = target;
        state.error = None;
        self.publish(&state);
    }

    // =========================================================================
    // Identify
    // =========================================================================

    /// Opt out of identification and continue as a guest.
    pub fn continue_as_guest(&self) {
        let mut state = self.lock();
        state.is_guest = true;
        state.error = None;
        self.publish(&state);
    }

    /// Record a successful sign-in mid-checkout.
    pub fn mark_authenticated(&self) {
        let mut state = self.lock();
        state.is_authenticated = true;
        state.error = None;
        self.publish(&state);
    }

    // =========================================================================
    // Addresses
    // =========================================================================

    /// Set the billing address.
    ///
    /// With "same as shipping" on, the shipping slot mirrors the new
    /// value. Either way the effective shipping address changed, so all
    /// shipping data is cleared and in-flight resolves are invalidated.
    pub fn set_billing_address(&self, address: Address) {
        let mut state = self.lock();
        if state.same_as_shipping {
            state.shipping_address = Some(address.clone());
        }
        state.billing_address = Some(address);
        self.invalidate_shipping(&mut state);
        state.error = None;
        self.publish(&state);
    }

    /// Set the shipping address.
    pub fn set_shipping_address(&self, address: Address) {
        let mut state = self.lock();
        state.shipping_address = Some(address);
        self.invalidate_shipping(&mut state);
        state.error = None;
        self.publish(&state);
    }

    /// Toggle "shipping address is the same as billing".
    ///
    /// Turning it on copies the current billing address into the
    /// shipping slot. Toggling in either direction changes the effective
    /// shipping address, so shipping data is cleared.
    pub fn set_same_as_shipping(&self, same: bool) {
        let mut state = self.lock();
        state.same_as_shipping = same;
        if same {
            state.shipping_address = state.billing_address.clone();
        }
        self.invalidate_shipping(&mut state);
        state.error = None;
        self.publish(&state);
    }

    // =========================================================================
    // Shipping
    // =========================================================================

    /// Resolve shipping rates for the effective shipping address.
    ///
    /// Fails fast without touching the network when no address or
    /// country is present. On success the zone and method list are
    /// replaced wholesale; a sole method is auto-selected; an empty
    /// method list surfaces the server's explanation as the session
    /// error without failing the call. A response that is no longer
    /// current (the address changed, or a newer resolve started) is
    /// discarded.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a missing country, or the
    /// transport/service error when the lookup fails. There is no
    /// automatic retry.
    pub async fn resolve_shipping(&self) -> Result<()> {
        self.resolve_shipping_inner(None).await
    }

    /// User-triggered re-calculation.
    ///
    /// Identical to [`Self::resolve_shipping`], padded to a minimum
    /// visible busy duration so fast responses do not flash.
    pub async fn refresh_shipping(&self) -> Result<()> {
        self.resolve_shipping_inner(Some(REFRESH_MIN_BUSY)).await
    }

    #[instrument(skip(self, min_busy))]
    async fn resolve_shipping_inner(&self, min_busy: Option<Duration>) -> Result<()> {
        let (request, generation) = {
            let mut state = self.lock();

            let Some(address) = state.effective_shipping_address().cloned() else {
                let err =
                    CheckoutError::validation("Please enter your shipping address first.");
                state.error = Some(err.user_message());
                self.publish(&state);
                return Err(err);
            };
            if !address.has_country() {
                let err = CheckoutError::validation(
                    "Please select a country to calculate shipping.",
                );
                state.error = Some(err.user_message());
                self.publish(&state);
                return Err(err);
            }

            let request = RateRequest::from_address(&address);
            state.is_loading_shipping = true;
            state.error = None;
            self.publish(&state);

            // This resolve supersedes any in-flight one.
            (request, self.generation.fetch_add(1, Ordering::SeqCst) + 1)
        };

        let started = tokio::time::Instant::now();
        let result = self.rates.resolve_rates(&request).await;

        if let Some(min_busy) = min_busy {
            let elapsed = started.elapsed();
            if elapsed < min_busy {
                tokio::time::sleep(min_busy - elapsed).await;
            }
        }

        let mut state = self.lock();
        if self.generation.load(Ordering::SeqCst) != generation {
            // The address changed (or a newer resolve started) while this
            // request was in flight; its result must not win.
            debug!(generation, "discarding stale rate response");
            return Ok(());
        }

        state.is_loading_shipping = false;
        match result {
            Ok(response) => {
                state.shipping_zone = response.zone;
                state.shipping_methods = response.methods;
                state.selected_shipping_method = match state.shipping_methods.as_slice() {
                    [only] => Some(only.clone()),
                    _ => None,
                };
                if state.shipping_methods.is_empty() {
                    state.error = Some(response.message.unwrap_or_else(|| {
                        "No shipping methods are available for this address.".to_string()
                    }));
                }
                self.publish(&state);
                Ok(())
            }
            Err(err) => {
                state.error = Some(err.user_message());
                self.publish(&state);
                Err(err)
            }
        }
    }

    /// Select a shipping method by its id.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the id is not in the resolved
    /// method list; the selection must always reference a live method.
    pub fn select_shipping_method(&self, method_id: &str) -> Result<()> {
        let mut state = self.lock();
        let Some(method) = state
            .shipping_methods
            .iter()
            .find(|method| method.id == method_id)
            .cloned()
        else {
            let err =
                CheckoutError::validation("That shipping method is no longer available.");
            state.error = Some(err.user_message());
            self.publish(&state);
            return Err(err);
        };
        state.selected_shipping_method = Some(method);
        state.error = None;
        self.publish(&state);
        Ok(())
    }

    // =========================================================================
    // Payment
    // =========================================================================

    /// Choose how to pay.
    pub fn set_payment_method(&self, method: PaymentMethod) {
        let mut state = self.lock();
        state.payment_method = Some(method);
        state.error = None;
        self.publish(&state);
    }

    /// Store the card fields entered so far.
    pub fn set_card_details(&self, card: CardDetails) {
        let mut state = self.lock();
        state.card_details = Some(card);
        state.error = None;
        self.publish(&state);
    }

    /// Record acceptance (or withdrawal) of the terms.
    pub fn set_agreed_to_terms(&self, agreed: bool) {
        let mut state = self.lock();
        state.agreed_to_terms = agreed;
        state.error = None;
        self.publish(&state);
    }

    // =========================================================================
    // Commit
    // =========================================================================

    /// Place the order.
    ///
    /// Requires the review gate: terms accepted, a shipping method
    /// selected, and the upstream address/payment invariants intact. On
    /// success the order id is stored and the caller is expected to
    /// clear the cart and [`Self::reset`] the session; on failure the
    /// step is left unchanged and the error is surfaced for an explicit
    /// resubmit.
    ///
    /// # Errors
    ///
    /// Returns a validation error when a gate requirement is unmet, or
    /// the transport/service error when placement fails.
    pub async fn place_order(&self) -> Result<OrderConfirmation> {
        let request = {
            let mut state = self.lock();

            if state.is_processing {
                return Err(CheckoutError::validation(
                    "Your order is already being placed.",
                ));
            }
            let request = match build_order_request(&state, &self.cart) {
                Ok(request) => request,
                Err(err) => {
                    state.error = Some(err.user_message());
                    self.publish(&state);
                    return Err(err);
                }
            };

            state.is_processing = true;
            state.error = None;
            self.publish(&state);
            request
        };

        let result = self.orders.place_order(&request).await;

        let mut state = self.lock();
        state.is_processing = false;
        match result {
            Ok(confirmation) => {
                state.order_id = Some(confirmation.order_id.clone());
                self.publish(&state);
                Ok(confirmation)
            }
            Err(err) => {
                state.error = Some(err.user_message());
                self.publish(&state);
                Err(err)
            }
        }
    }

    /// Reset to an empty session.
    ///
    /// Called after a successful placement or an explicit cancellation.
    /// Authentication status survives; everything else is discarded.
    pub fn reset(&self) {
        let mut state = self.lock();
        let identity = if state.is_authenticated {
            IdentitySnapshot::authenticated(None, None)
        } else {
            IdentitySnapshot::anonymous()
        };
        *state = CheckoutState::initial(&identity);
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.publish(&state);
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn lock(&self) -> std::sync::MutexGuard<'_, CheckoutState> {
        self.state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn publish(&self, state: &CheckoutState) {
        self.watch_tx.send_replace(state.clone());
    }

    /// The effective shipping address changed: drop address-derived
    /// shipping data and invalidate in-flight resolves.
    fn invalidate_shipping(&self, state: &mut CheckoutState) {
        state.clear_shipping_state();
        self.generation.fetch_add(1, Ordering::SeqCst);
    }
}

/// The per-step requirement to advance.
fn step_gate(state: &CheckoutState, step: CheckoutStep) -> Result<()> {
    match step {
        CheckoutStep::Identify => {
            if state.is_authenticated || state.is_guest {
                Ok(())
            } else {
                Err(CheckoutError::validation(
                    "Please sign in or continue as a guest.",
                ))
            }
        }
        CheckoutStep::Addresses => {
            if !state
                .billing_address
                .as_ref()
                .is_some_and(Address::has_street_address)
            {
                return Err(CheckoutError::validation(
                    "Please enter your billing address.",
                ));
            }
            if !state.same_as_shipping
                && !state
                    .shipping_address
                    .as_ref()
                    .is_some_and(Address::has_street_address)
            {
                return Err(CheckoutError::validation(
                    "Please enter your shipping address.",
                ));
            }
            Ok(())
        }
        CheckoutStep::Shipping => {
            if state.selected_shipping_method.is_some() {
                Ok(())
            } else {
                Err(CheckoutError::validation(
                    "Please select a shipping method.",
                ))
            }
        }
        CheckoutStep::Payment => match state.payment_method {
            None => Err(CheckoutError::validation(
                "Please select a payment method.",
            )),
            Some(PaymentMethod::Card)
                if !state
                    .card_details
                    .as_ref()
                    .is_some_and(CardDetails::is_complete) =>
            {
                Err(CheckoutError::validation(
                    "Please fill in all card details.",
                ))
            }
            Some(_) => Ok(()),
        },
        CheckoutStep::Review => {
            if !state.agreed_to_terms {
                return Err(CheckoutError::validation(
                    "Please agree to the terms and conditions.",
                ));
            }
            if state.selected_shipping_method.is_none() {
                return Err(CheckoutError::validation(
                    "Please select a shipping method.",
                ));
            }
            Ok(())
        }
    }
}

/// Assemble the order request, re-checking every upstream invariant.
fn build_order_request(state: &CheckoutState, cart: &CartSnapshot) -> Result<OrderRequest> {
    step_gate(state, CheckoutStep::Review)?;

    let Some(billing_address) = state.billing_address.clone() else {
        return Err(CheckoutError::validation(
            "Please enter your billing address.",
        ));
    };
    let Some(shipping_address) = state.effective_shipping_address().cloned() else {
        return Err(CheckoutError::validation(
            "Please enter your shipping address.",
        ));
    };
    let Some(payment_method) = state.payment_method else {
        return Err(CheckoutError::validation(
            "Please select a payment method.",
        ));
    };
    if payment_method == PaymentMethod::Card
        && !state
            .card_details
            .as_ref()
            .is_some_and(CardDetails::is_complete)
    {
        return Err(CheckoutError::validation(
            "Please fill in all card details.",
        ));
    }
    // The review gate guarantees a selected method.
    let Some(shipping_method) = state.selected_shipping_method.clone() else {
        return Err(CheckoutError::validation(
            "Please select a shipping method.",
        ));
    };

    Ok(OrderRequest {
        billing_address,
        shipping_address,
        shipping_method,
        payment_method,
        card_details: if payment_method == PaymentMethod::Card {
            state.card_details.clone()
        } else {
            None
        },
        items: cart.items.clone(),
    })
}
