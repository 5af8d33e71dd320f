//! End-to-end pricing sessions through the public API.

use std::sync::{Arc, Mutex};

use chrono::{Duration, TimeZone, Utc};
use pricing_core::{
    Cart, ConditionRule, Coupon, DiscountApplied, Item, NewCondition, Percent, PriceOverrides,
    PricingConfig, PricingError, TaxBase, UserId,
};

fn checkout_cart() -> Cart {
    let config = PricingConfig::new()
        .with_global_discount(10.0)
        .with_global_tax_rate(5.0)
        .with_fire_events(true);
    let mut cart = Cart::new(config).unwrap();

    cart.conditions_mut()
        .add(vec![
            NewCondition::new(
                "bulk",
                ConditionRule::predicate(|items: &[Item]| items.len() >= 3),
                5.0,
            ),
            NewCondition::new("weekend", true, 2.0).skipped(),
        ])
        .unwrap();

    cart.coupons_mut().add_coupon(Coupon::fixed("SAVE10", 15.0)).unwrap();
    cart.coupons_mut()
        .add_coupon(Coupon::percent("VIP20", 20.0).restricted_to(42_i64).max_uses(1))
        .unwrap();
    cart
}

#[test]
fn test_full_checkout_session() {
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);

    let mut cart = checkout_cart();
    cart.on_discount_applied(move |e: &DiscountApplied| sink.lock().unwrap().push(e.slug.clone()));

    cart.set_items(vec![Item::new(100.0, 2.0)]).unwrap();
    assert_eq!(cart.total(), 189.0);
    assert!(events.lock().unwrap().is_empty());

    cart.set_items(vec![
        Item::new(100.0, 1.0),
        Item::new(50.0, 2.0),
        Item::new(25.0, 4.0),
    ])
    .unwrap();
    assert_eq!(cart.subtotal(), 300.0);

    assert!(cart.apply_coupon("SAVE10", None).unwrap());
    let totals = cart.total_detailed();

    // 15% of 300, then tax on 255
    assert_eq!(totals.discount_percent, Percent::new(15.0));
    assert_eq!(totals.discount_amount, 45.0);
    assert_eq!(totals.coupon_discount_amount, 15.0);
    assert_eq!(totals.tax_amount, 12.75);
    assert_eq!(totals.total, 252.75);
    assert_eq!(totals.savings, 60.0);
    assert!(totals.is_consistent());

    assert_eq!(*events.lock().unwrap(), vec!["bulk".to_string()]);
}

#[test]
fn test_restricted_coupon_lifecycle() {
    let mut cart = checkout_cart();
    cart.set_items(vec![Item::new(100.0, 2.0)]).unwrap();

    let member = UserId::from(42_i64);
    let stranger = UserId::from("7");

    assert!(matches!(
        cart.apply_coupon("VIP20", Some(&stranger)),
        Err(PricingError::CouponUserMismatch { .. })
    ));
    assert!(matches!(
        cart.apply_coupon("VIP20", None),
        Err(PricingError::CouponUserMismatch { .. })
    ));

    assert!(cart.apply_coupon("VIP20", Some(&member)).unwrap());
    assert!(!cart.apply_coupon("VIP20", Some(&member)).unwrap());
    assert_eq!(cart.coupon_discount(), 40.0);

    // Limit reached once the session is cleared without giving usage back.
    cart.coupons_mut().clear_applied_coupons();
    assert!(matches!(
        cart.apply_coupon("VIP20", Some(&member)),
        Err(PricingError::CouponUsageLimitExceeded { max_uses: 1, .. })
    ));

    // Removing applied coupons restores usage.
    cart.coupons_mut().remove_coupon("VIP20");
    cart.coupons_mut()
        .add_coupon(Coupon::percent("VIP20", 20.0).restricted_to("42").max_uses(1))
        .unwrap();
    assert!(cart.apply_coupon("VIP20", Some(&member)).unwrap());
    cart.coupons_mut().remove_applied_coupons();
    assert_eq!(cart.coupon_discount(), 0.0);
    assert_eq!(cart.coupons().coupon("VIP20").unwrap().uses, 0);
}

#[test]
fn test_expired_coupon_leaves_session_untouched() {
    let mut cart = checkout_cart();
    let expiry = Utc.with_ymd_and_hms(2024, 1, 31, 23, 59, 59).unwrap();
    cart.coupons_mut()
        .add_coupon(Coupon::fixed("JANUARY", 5.0).expires_at(expiry))
        .unwrap();

    let result = cart
        .coupons_mut()
        .apply_coupon_at("JANUARY", None, expiry + Duration::seconds(1));

    assert!(matches!(result, Err(PricingError::CouponExpired { .. })));
    assert!(cart.coupons().applied_coupons().is_empty());
    assert_eq!(cart.coupons().coupon("JANUARY").unwrap().uses, 0);

    assert!(cart.coupons_mut().apply_coupon_at("JANUARY", None, expiry).unwrap());
}

#[test]
fn test_overrides_and_tax_bases() {
    let mut cart = checkout_cart();
    cart.set_items(vec![Item::new(100.0, 2.0)]).unwrap();
    cart.apply_coupon("SAVE10", None).unwrap();

    assert_eq!(cart.total_with(&PriceOverrides::none().discount(0.0).tax_rate(0.0)).unwrap(), 185.0);

    cart.set_tax_base(TaxBase::AfterCoupons);
    // (200 - 20 - 15) * 5%
    assert_eq!(cart.tax_amount(None).unwrap(), 8.25);
    assert_eq!(cart.total(), 173.25);

    cart.set_tax_base(TaxBase::Subtotal);
    assert_eq!(cart.tax_amount(None).unwrap(), 10.0);
}

#[test]
fn test_invalid_condition_batch_is_rejected_whole() {
    let mut cart = checkout_cart();
    let before = cart.conditions().len();

    let result = cart.conditions_mut().add(vec![
        NewCondition::new("loyal", true, 3.0),
        NewCondition {
            slug: Some("broken".to_string()),
            rule: None,
            discount: Some(1.0),
            skip: false,
        },
    ]);

    assert!(matches!(
        result,
        Err(PricingError::InvalidCondition { index: 1, .. })
    ));
    assert_eq!(cart.conditions().len(), before);
    assert!(cart.conditions().get("loyal").is_none());
}

#[test]
fn test_breakdown_json_shape() {
    let mut cart = checkout_cart();
    cart.set_items(vec![Item::new(100.0, 2.0)]).unwrap();

    let json = serde_json::to_value(cart.total_detailed()).unwrap();
    assert_eq!(json["subtotal"], serde_json::json!(200.0));
    assert_eq!(json["discountPercent"], serde_json::json!(10.0));
    assert_eq!(json["total"], serde_json::json!(189.0));
}
