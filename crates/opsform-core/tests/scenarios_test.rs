#![allow(clippy::unwrap_used)]
// End-to-end dialog scenarios against the builtin entity catalog.

use std::future::Future;
use std::sync::Arc;

use chrono::NaiveDate;
use pretty_assertions::assert_eq;

use opsform_core::{
    EntityKind, EntitySchema, FieldValue, FormSession, SessionContext, SubmitOutcome,
    SubmitResolution, Submitter, ValueSet, builtin_registry, keys,
};

// ── Helpers ─────────────────────────────────────────────────────────

fn schema(kind: EntityKind) -> Arc<EntitySchema> {
    builtin_registry().unwrap().require(kind).unwrap()
}

fn ctx() -> SessionContext {
    SessionContext::create().with_today(NaiveDate::from_ymd_opt(2026, 3, 9).unwrap())
}

fn list(items: &[&str]) -> FieldValue {
    FieldValue::List(items.iter().map(|s| FieldValue::from(*s)).collect())
}

fn portal_base() -> ValueSet {
    ValueSet::new()
        .with("name", "Lobby")
        .with("siteId", "s1")
        .with("ssidIds", list(&["guest"]))
        .with("landingPage", 1)
}

struct AcceptAll;

impl Submitter for AcceptAll {
    fn submit(
        &self,
        _values: ValueSet,
        _context: &SessionContext,
    ) -> impl Future<Output = SubmitOutcome> + Send {
        async { SubmitOutcome::accepted() }
    }
}

// ── Portal authentication ───────────────────────────────────────────

#[test]
fn portal_password_mode_requires_password() {
    let values = portal_base().with("authType", 1).with("password", "");
    let errors = schema(EntityKind::Portal).validate(&values, &ctx());

    assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["password"]);
    assert_eq!(errors.get("password"), Some(&keys::REQUIRED));
}

#[test]
fn portal_radius_mode_resets_password_and_requires_profile() {
    let mut session = FormSession::create(schema(EntityKind::Portal), ctx());
    for (name, value) in portal_base() {
        session.set(&name, value).unwrap();
    }
    session.set("password", "hunter22").unwrap();

    let applied = session.set("authType", 2).unwrap();
    assert!(applied.contains(&("password".to_string(), FieldValue::from(""))));
    assert_eq!(session.value("password"), &FieldValue::from(""));

    session.validate().unwrap();
    let errors = session.errors();
    assert_eq!(errors.get("radiusProfileId"), Some(&keys::REQUIRED));
    assert!(!errors.contains("password"));
}

#[test]
fn portal_without_auth_requires_no_subset() {
    let values = portal_base().with("authType", 5);
    assert!(schema(EntityKind::Portal).validate(&values, &ctx()).is_empty());
}

// ── Voucher rate limits ─────────────────────────────────────────────

#[test]
fn voucher_rate_limit_follows_switch() {
    let voucher = schema(EntityKind::Voucher);
    let base = voucher.initial_values().with("name", "Conference");

    let enabled = base.clone().with("customRateLimitDownEnable", true);
    assert_eq!(
        voucher.validate(&enabled, &ctx()).get("customRateLimitDown"),
        Some(&keys::REQUIRED)
    );

    let zero = enabled.with("customRateLimitDown", 0);
    assert_eq!(
        voucher.validate(&zero, &ctx()).get("customRateLimitDown"),
        Some(&keys::BELOW_MINIMUM)
    );

    let disabled = base
        .clone()
        .with("customRateLimitDownEnable", false)
        .with("customRateLimitDown", -5);
    assert!(voucher.validate(&disabled, &ctx()).is_empty());

    // Records loaded from the controller carry the switch as text.
    let enabled_text = base
        .clone()
        .with("customRateLimitDownEnable", "true")
        .with("customRateLimitDown", "");
    assert_eq!(
        voucher.validate(&enabled_text, &ctx()).get("customRateLimitDown"),
        Some(&keys::REQUIRED)
    );

    let disabled_text = base
        .with("customRateLimitDownEnable", "false")
        .with("customRateLimitDown", -5);
    assert!(voucher.validate(&disabled_text, &ctx()).is_empty());
}

#[test]
fn voucher_disabling_limit_clears_value() {
    let mut session = FormSession::create(schema(EntityKind::Voucher), ctx());
    session.set("name", "Conference").unwrap();
    session.set("customRateLimitUpEnable", true).unwrap();
    session.set("customRateLimitUp", 2048).unwrap();
    assert!(session.is_required("customRateLimitUp"));

    session.set("customRateLimitUpEnable", false).unwrap();
    assert_eq!(session.value("customRateLimitUp"), &FieldValue::Null);
    assert!(!session.is_required("customRateLimitUp"));
    assert!(session.validate().unwrap());
}

#[test]
fn voucher_expiry_cannot_be_in_the_past() {
    let voucher = schema(EntityKind::Voucher);
    let values = voucher
        .initial_values()
        .with("name", "Conference")
        .with("expiryEnable", true)
        .with("expiryDate", "2026-03-01");
    let errors = voucher.validate(&values, &ctx());
    assert_eq!(errors.get("expiryDate"), Some(&keys::DATE_IN_PAST));
    assert_eq!(errors.len(), 1);
}

// ── Landing page ────────────────────────────────────────────────────

#[test]
fn custom_landing_page_requires_valid_url() {
    let portal = schema(EntityKind::Portal);
    let base = portal_base()
        .with("authType", 5)
        .with("landingPage", 2)
        .with("landingUrlScheme", "https");

    let missing = base.clone().with("landingUrl", "");
    assert_eq!(
        portal.validate(&missing, &ctx()).get("landingUrl"),
        Some(&keys::REQUIRED)
    );

    let bad = base.clone().with("landingUrl", "not a url");
    assert_eq!(
        portal.validate(&bad, &ctx()).get("landingUrl"),
        Some(&keys::INVALID_URL)
    );

    let good = base.with("landingUrl", "example.com/welcome");
    assert!(portal.validate(&good, &ctx()).is_empty());
}

#[test]
fn original_landing_page_ignores_url() {
    let portal = schema(EntityKind::Portal);
    let values = portal_base()
        .with("authType", 5)
        .with("landingPage", 1)
        .with("landingUrl", "not a url");
    assert!(portal.validate(&values, &ctx()).is_empty());

    let mut session = FormSession::create(portal, ctx());
    session.set("landingPage", 2).unwrap();
    session.set("landingUrlScheme", "http").unwrap();
    session.set("landingUrl", "example.com").unwrap();
    session.set("landingPage", 1).unwrap();
    assert_eq!(session.value("landingUrl"), &FieldValue::from(""));
    assert_eq!(session.value("landingUrlScheme"), &FieldValue::Null);
    assert!(!session.is_required("landingUrlScheme"));
}

// ── Cross-cutting properties ────────────────────────────────────────

#[test]
fn absent_optional_fields_are_valid() {
    let values = ValueSet::new()
        .with("mac", "aa:bb:cc:dd:ee:ff")
        .with("siteId", "s1")
        .with("ipMode", "dhcp");
    assert!(schema(EntityKind::Device).validate(&values, &ctx()).is_empty());
}

#[test]
fn evaluation_is_deterministic() {
    let portal = schema(EntityKind::Portal);
    let values = portal_base().with("authType", 4).with("customTimeoutEnable", true);
    let first = portal.evaluate(&values, &ctx());
    let second = portal.evaluate(&values, &ctx());
    assert_eq!(first, second);
}

#[test]
fn campaign_override_beats_default_reset() {
    let campaign = schema(EntityKind::Campaign);
    let values = ValueSet::new().with("adType", "video");
    let eval = campaign.evaluate(&values, &ctx());

    assert!(eval.is_required("videoUrl"));
    assert!(eval.is_required("videoDuration"));
    assert!(!eval.is_visible("imageUrl"));
    assert!(!eval.is_visible("surveyQuestion"));
}

#[test]
fn campaign_schedule_must_be_ordered() {
    let values = ValueSet::new()
        .with("name", "Spring")
        .with("adType", "image")
        .with("imageUrl", "https://cdn.example.com/a.png")
        .with("schedule", list(&["2026-04-10", "2026-04-01"]))
        .with("targetSiteIds", list(&["s1"]));
    let errors = schema(EntityKind::Campaign).validate(&values, &ctx());
    assert_eq!(errors.get("schedule"), Some(&keys::RANGE_ORDER));
    assert_eq!(errors.len(), 1);
}

#[test]
fn account_password_only_required_on_create() {
    let account = schema(EntityKind::Account);
    let values = ValueSet::new()
        .with("username", "ops.admin")
        .with("email", "ops@example.net")
        .with("role", "admin");

    let create = account.validate(&values, &ctx());
    assert_eq!(create.get("password"), Some(&keys::REQUIRED));

    let edit = SessionContext::edit().with_today(ctx().today);
    assert!(account.validate(&values, &edit).is_empty());
}

#[test]
fn account_username_pattern_uses_custom_message() {
    let values = ValueSet::new()
        .with("username", "1bad")
        .with("email", "ops@example.net")
        .with("password", "correct-horse")
        .with("role", "admin");
    let errors = schema(EntityKind::Account).validate(&values, &ctx());
    assert_eq!(
        errors.get("username").map(|k| k.as_str()),
        Some("account.username.invalid")
    );
}

#[tokio::test]
async fn accepted_submit_round_trips() {
    let ssid = schema(EntityKind::Ssid);
    let mut session = FormSession::create(Arc::clone(&ssid), ctx());
    session.set("name", "Corp").unwrap();
    session.set("passphrase", "correct-horse").unwrap();
    session.set("vlanEnable", true).unwrap();
    session.set("vlanId", 20).unwrap();

    let SubmitResolution::Accepted(values) = session.submit(&AcceptAll).await.unwrap() else {
        panic!("expected acceptance");
    };
    assert!(ssid.validate(&values, &ctx()).is_empty());
    assert!(session.is_closed());
}
