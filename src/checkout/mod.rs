//! Checkout
//!
//! A shopper's checkout session: the cart, the coupon applied to it and the shipping policy.
//! Cart changes made through the session keep the applied coupon's discount in step with the
//! subtotal, and coupon lookups that settle out of order are discarded.

use jiff::Timestamp;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{
    backend::{BackendError, CouponLookup, OrderGateway},
    cart::{CartError, CartStore, LineUuid, NewCartLine},
    coupons::{AppliedCoupon, Coupon, CouponCode, CouponError, CouponRecord, evaluate},
    money::amount_of,
    requests::{RequestSequencer, RequestTicket},
    storage::Storage,
    totals::{OrderTotals, ShippingPolicy, TotalsError, compute_totals},
};

pub mod orders;

pub use orders::{OrderItem, OrderRequest, PaymentMethod, PlacedOrder, ShippingAddress};

/// Errors raised while applying a coupon.
#[derive(Debug, Error)]
pub enum ApplyCouponError<'a> {
    /// The coupon does not apply to this cart.
    #[error("{0}")]
    Rejected(CouponError<'a>),

    /// The coupon could not be looked up.
    #[error("Could not check the coupon, please try again: {0}")]
    Network(#[from] BackendError),

    /// A newer coupon request replaced this one; nothing changed.
    #[error("superseded by a newer coupon request")]
    Superseded,
}

impl<'a> From<CouponError<'a>> for ApplyCouponError<'a> {
    fn from(error: CouponError<'a>) -> Self {
        Self::Rejected(error)
    }
}

/// Errors raised while preparing or placing an order.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// There is nothing in the cart.
    #[error("Your cart is empty")]
    EmptyCart,

    /// A required address field is blank.
    #[error("Please fill in the {0} field of the shipping address")]
    IncompleteAddress(&'static str),

    /// Totals could not be computed.
    #[error(transparent)]
    Totals(#[from] TotalsError),

    /// The order could not be submitted.
    #[error("Could not place the order, please try again: {0}")]
    Network(#[from] BackendError),
}

/// A coupon lookup that has been issued but not yet resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingCouponLookup {
    ticket: RequestTicket,
    code: CouponCode,
}

impl PendingCouponLookup {
    /// Normalized code being looked up.
    pub fn code(&self) -> &CouponCode {
        &self.code
    }

    /// Ticket guarding the lookup.
    pub fn ticket(&self) -> RequestTicket {
        self.ticket
    }
}

#[derive(Debug)]
struct ActiveCoupon<'a> {
    coupon: Coupon<'a>,
    applied: AppliedCoupon<'a>,
    applied_at: Timestamp,
}

/// Checkout session.
#[derive(Debug)]
pub struct Checkout<'a, S: Storage> {
    cart: CartStore<'a, S>,
    policy: ShippingPolicy<'a>,
    coupon: Option<ActiveCoupon<'a>>,
    lookups: RequestSequencer,
    coupon_notice: Option<CouponError<'a>>,
}

impl<'a, S: Storage> Checkout<'a, S> {
    /// Start a session over `cart`.
    pub fn new(cart: CartStore<'a, S>, policy: ShippingPolicy<'a>) -> Self {
        Self {
            cart,
            policy,
            coupon: None,
            lookups: RequestSequencer::new(),
            coupon_notice: None,
        }
    }

    /// The cart.
    pub fn cart(&self) -> &CartStore<'a, S> {
        &self.cart
    }

    /// The shipping policy.
    pub fn policy(&self) -> &ShippingPolicy<'a> {
        &self.policy
    }

    /// Add a product to the cart.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] if the line is not priced in the cart currency.
    pub fn add_item(&mut self, line: NewCartLine<'a>) -> Result<LineUuid, CartError> {
        let uuid = self.cart.add_item(line)?;

        self.revalidate_coupon();

        Ok(uuid)
    }

    /// Remove a cart line.
    pub fn remove_item(&mut self, uuid: LineUuid) {
        self.cart.remove_item(uuid);
        self.revalidate_coupon();
    }

    /// Change a cart line's quantity.
    pub fn update_quantity(&mut self, uuid: LineUuid, quantity: u32) {
        self.cart.update_quantity(uuid, quantity);
        self.revalidate_coupon();
    }

    /// Empty the cart and drop the applied coupon.
    pub fn clear_cart(&mut self) {
        self.cart.clear();
        self.drop_coupon();
    }

    /// Why the applied coupon was last removed after a cart change, if it was. Reading the
    /// notice clears it.
    pub fn take_coupon_notice(&mut self) -> Option<CouponError<'a>> {
        self.coupon_notice.take()
    }

    /// The coupon currently applied.
    pub fn applied_coupon(&self) -> Option<&AppliedCoupon<'a>> {
        self.coupon.as_ref().map(|active| &active.applied)
    }

    /// Start looking up a coupon code typed by the shopper.
    ///
    /// Any lookup still in flight is superseded.
    ///
    /// # Errors
    ///
    /// Returns [`CouponError::Invalid`] for a blank code.
    pub fn begin_coupon_lookup(
        &mut self,
        raw: &str,
    ) -> Result<PendingCouponLookup, CouponError<'a>> {
        let code = CouponCode::parse(raw).ok_or(CouponError::Invalid)?;
        let ticket = self.lookups.issue();

        debug!(%code, ticket = ticket.sequence(), "looking up coupon");

        Ok(PendingCouponLookup { ticket, code })
    }

    /// Apply the backend's answer to a coupon lookup, evaluated against the cart at `now`.
    ///
    /// A rejected coupon leaves any previously applied coupon in place.
    ///
    /// # Errors
    ///
    /// Returns [`ApplyCouponError::Superseded`] if a newer lookup was started or the coupon was
    /// removed since this one began, [`ApplyCouponError::Network`] if the lookup failed, and
    /// [`ApplyCouponError::Rejected`] if the coupon does not apply.
    pub fn resolve_coupon_lookup(
        &mut self,
        pending: PendingCouponLookup,
        response: Result<Option<CouponRecord>, BackendError>,
        now: Timestamp,
    ) -> Result<&AppliedCoupon<'a>, ApplyCouponError<'a>> {
        let PendingCouponLookup { ticket, code } = pending;

        if !self.lookups.settle(ticket) {
            debug!(code = %code, "discarding superseded coupon lookup");

            return Err(ApplyCouponError::Superseded);
        }

        let record = response.inspect_err(|error| {
            warn!(code = %code, %error, "coupon lookup failed");
        })?;

        let coupon = record.and_then(|record| {
            Coupon::from_record(&record, self.cart.currency())
                .inspect_err(|error| {
                    warn!(code = %code, %error, "ignoring malformed coupon record");
                })
                .ok()
        });

        let Some(coupon) = coupon else {
            info!(code = %code, "coupon not found");

            return Err(CouponError::Invalid.into());
        };

        let applied = evaluate(Some(&coupon), &self.cart.subtotal(), now).inspect_err(|error| {
            info!(code = %code, %error, "coupon rejected");
        })?;

        info!(
            code = %applied.code(),
            discount = %applied.calculated_discount(),
            "coupon applied"
        );

        self.coupon_notice = None;

        let active = self.coupon.insert(ActiveCoupon {
            coupon,
            applied,
            applied_at: now,
        });

        Ok(&active.applied)
    }

    /// Look up and apply a coupon code typed by the shopper.
    ///
    /// # Errors
    ///
    /// See [`Checkout::resolve_coupon_lookup`]; a blank code is rejected as invalid.
    pub async fn apply_coupon(
        &mut self,
        lookup: &impl CouponLookup,
        raw: &str,
        now: Timestamp,
    ) -> Result<&AppliedCoupon<'a>, ApplyCouponError<'a>> {
        let pending = self.begin_coupon_lookup(raw)?;
        let response = lookup.find_active_coupon(pending.code()).await;

        self.resolve_coupon_lookup(pending, response, now)
    }

    /// Remove the applied coupon and discard any lookup in flight.
    pub fn remove_coupon(&mut self) {
        self.drop_coupon();
    }

    /// Totals for the cart as it stands.
    ///
    /// # Errors
    ///
    /// Returns a [`TotalsError`] if the shipping policy is in another currency from the cart.
    pub fn totals(&self) -> Result<OrderTotals<'a>, TotalsError> {
        compute_totals(&self.cart.subtotal(), self.applied_coupon(), &self.policy)
    }

    /// Assemble the order payload for the cart as it stands.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::EmptyCart`] or [`CheckoutError::IncompleteAddress`] when the
    /// order cannot be placed yet.
    pub fn order_request(
        &self,
        shipping_address: ShippingAddress,
        payment_method: PaymentMethod,
    ) -> Result<OrderRequest, CheckoutError> {
        if self.cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        if let Some(field) = shipping_address.missing_field() {
            return Err(CheckoutError::IncompleteAddress(field));
        }

        let totals = self.totals()?;

        Ok(OrderRequest {
            items: self.cart.lines().iter().map(OrderItem::from).collect(),
            shipping_address,
            subtotal: amount_of(&totals.subtotal),
            discount: amount_of(&totals.discount),
            shipping_charge: amount_of(&totals.shipping_charge),
            grand_total: amount_of(&totals.grand_total),
            currency: self.cart.currency().iso_alpha_code.to_string(),
            coupon_code: self
                .applied_coupon()
                .map(|applied| applied.code().to_string()),
            payment_method,
        })
    }

    /// Submit the order once. On success the cart and coupon are cleared; on failure nothing
    /// changes and the caller decides whether to try again.
    ///
    /// # Errors
    ///
    /// Returns a [`CheckoutError`] if the order is incomplete or the backend call fails.
    pub async fn place_order(
        &mut self,
        gateway: &impl OrderGateway,
        shipping_address: ShippingAddress,
        payment_method: PaymentMethod,
    ) -> Result<PlacedOrder, CheckoutError> {
        let request = self.order_request(shipping_address, payment_method)?;

        let placed = gateway.submit_order(&request).await.inspect_err(|error| {
            warn!(%error, "order submission failed");
        })?;

        info!(
            order_number = %placed.order_number,
            grand_total = %request.grand_total,
            "order placed"
        );

        self.clear_cart();

        Ok(placed)
    }

    fn revalidate_coupon(&mut self) {
        let Some(active) = self.coupon.as_mut() else {
            return;
        };

        match evaluate(
            Some(&active.coupon),
            &self.cart.subtotal(),
            active.applied_at,
        ) {
            Ok(applied) => active.applied = applied,
            Err(error) => {
                info!(code = %active.coupon.code(), %error, "removing coupon after cart change");

                self.coupon = None;
                self.coupon_notice = Some(error);
            }
        }
    }

    fn drop_coupon(&mut self) {
        if let Some(active) = self.coupon.take() {
            debug!(code = %active.coupon.code(), "removed coupon");
        }

        self.lookups.invalidate();
    }
}
