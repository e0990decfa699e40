//! CreateSubscriptionHandler - opens a subscription with its first booking.

use std::sync::Arc;

use crate::domain::booking::{Booking, BookingCharges};
use crate::domain::foundation::{BookingId, SubscriptionId, Timestamp, UserId};
use crate::domain::subscription::{Frequency, NewSubscription, Subscription, SubscriptionError};
use crate::ports::{
    BookingRepository, CouponValidation, CouponValidator, PricingCatalog, SubscriptionRepository,
};

/// VAT share applied to the taxable part of the session price.
const VAT_RATE: f64 = 0.25;

/// Command to open a new subscription.
#[derive(Debug, Clone)]
pub struct CreateSubscriptionCommand {
    pub subscriber: UserId,
    pub area_sqm: u32,
    pub address: String,
    pub postal_code: String,
    pub session_hours: u32,
    pub start_date: Timestamp,
    pub frequency: Frequency,
    pub has_cat: bool,
    pub has_dog: bool,
    pub other_pets: Option<String>,
    pub supplies_charges: f64,
    pub coupon_code: Option<String>,
    pub created_by: Option<UserId>,
}

/// Result of a successful subscription creation.
#[derive(Debug, Clone)]
pub struct CreateSubscriptionResult {
    pub subscription: Subscription,
    pub booking: Booking,
}

/// Handler for opening a subscription.
///
/// Prices the first occurrence off the active tier for the requested
/// frequency, applies an optional coupon, and persists the subscription
/// together with its first booking (`Initiated`/`Pending`).
pub struct CreateSubscriptionHandler {
    subscriptions: Arc<dyn SubscriptionRepository>,
    bookings: Arc<dyn BookingRepository>,
    pricing: Arc<dyn PricingCatalog>,
    coupons: Arc<dyn CouponValidator>,
}

impl CreateSubscriptionHandler {
    pub fn new(
        subscriptions: Arc<dyn SubscriptionRepository>,
        bookings: Arc<dyn BookingRepository>,
        pricing: Arc<dyn PricingCatalog>,
        coupons: Arc<dyn CouponValidator>,
    ) -> Self {
        Self {
            subscriptions,
            bookings,
            pricing,
            coupons,
        }
    }

    pub async fn handle(
        &self,
        cmd: CreateSubscriptionCommand,
    ) -> Result<CreateSubscriptionResult, SubscriptionError> {
        // 1. Validate the shape of the request
        if cmd.session_hours == 0 {
            return Err(SubscriptionError::validation(
                "session_hours",
                "Session duration must be at least one hour",
            ));
        }
        if cmd.area_sqm == 0 {
            return Err(SubscriptionError::validation(
                "area_sqm",
                "Service area must be greater than zero",
            ));
        }
        if cmd.address.trim().is_empty() {
            return Err(SubscriptionError::validation(
                "address",
                "Address must not be empty",
            ));
        }

        // 2. Price the session off the active tier for this frequency
        let tier = self
            .pricing
            .price_for(cmd.frequency)
            .await?
            .ok_or_else(|| {
                SubscriptionError::validation(
                    "frequency",
                    format!(
                        "No active price tier for frequency '{}'",
                        cmd.frequency.as_str()
                    ),
                )
            })?;
        let cleaning_price = tier.session_price(cmd.session_hours);

        // 3. Resolve the coupon, if any. Unknown/inactive codes are a
        //    user-facing validation failure, not an infrastructure error.
        let discount_amount = match &cmd.coupon_code {
            None => 0.0,
            Some(code) => match self.coupons.validate(code).await? {
                CouponValidation::Valid { coupon } => coupon.discount_for(cleaning_price),
                CouponValidation::Invalid { reason } => {
                    return Err(SubscriptionError::validation(
                        "coupon_code",
                        reason.user_message(),
                    ));
                }
            },
        };

        let vat_amount = (cleaning_price + cmd.supplies_charges - discount_amount) * VAT_RATE;

        // 4. Build the first occurrence
        let booking = Booking::create(
            BookingId::new(),
            cmd.start_date,
            cmd.session_hours,
            tier.id,
            BookingCharges {
                cleaning_price,
                supplies_charges: cmd.supplies_charges,
                discount_amount,
                vat_amount,
            },
            cmd.created_by.clone(),
        );

        // 5. Build the subscription and link the booking
        let mut subscription = Subscription::create(
            SubscriptionId::new(),
            NewSubscription {
                subscriber: cmd.subscriber,
                area_sqm: cmd.area_sqm,
                address: cmd.address,
                postal_code: cmd.postal_code,
                session_hours: cmd.session_hours,
                price_tier: tier.id,
                start_date: cmd.start_date,
                has_cat: cmd.has_cat,
                has_dog: cmd.has_dog,
                other_pets: cmd.other_pets,
                coupon_discount: discount_amount,
                frequency: cmd.frequency,
                created_by: cmd.created_by,
            },
        );
        subscription.attach_booking(booking.id)?;

        // 6. Persist booking first so the link never dangles
        self.bookings.save(&booking).await?;
        self.subscriptions.save(&subscription).await?;

        tracing::info!(
            subscription_id = %subscription.id,
            booking_id = %booking.id,
            frequency = cmd.frequency.as_str(),
            "subscription created"
        );

        Ok(CreateSubscriptionResult {
            subscription,
            booking,
        })
    }
}
