//! Captive portal dialog.
//!
//! Five mutually exclusive authentication modes, each activating its own
//! required subset. Every subset is reset when its mode is not selected so
//! a stale password never rides along with a RADIUS portal.

use crate::model::{
    ConditionalRule, Constraint, FieldDescriptor, FieldKind, Format, Predicate, when,
};

pub const AUTH_PASSWORD: i32 = 1;
pub const AUTH_RADIUS: i32 = 2;
pub const AUTH_VOUCHER: i32 = 3;
pub const AUTH_SMS: i32 = 4;
pub const AUTH_NONE: i32 = 5;

pub const LANDING_ORIGINAL: i32 = 1;
pub const LANDING_CUSTOM: i32 = 2;

pub fn descriptors() -> Vec<FieldDescriptor> {
    vec![
        FieldDescriptor::text("name")
            .required()
            .constraint(Constraint::length(1, 64))
            .span(6),
        FieldDescriptor::select("siteId").required().span(6),
        FieldDescriptor::new("ssidIds", FieldKind::MultiSelect).required(),
        // ── Authentication ──
        FieldDescriptor::new("authHeading", FieldKind::CategoryHeading),
        FieldDescriptor::select("authType")
            .required()
            .default_value(AUTH_PASSWORD)
            .option(AUTH_PASSWORD, "portal.authType.password")
            .option(AUTH_RADIUS, "portal.authType.radius")
            .option(AUTH_VOUCHER, "portal.authType.voucher")
            .option(AUTH_SMS, "portal.authType.sms")
            .option(AUTH_NONE, "portal.authType.none"),
        FieldDescriptor::new("password", FieldKind::Password)
            .constraint(Constraint::length(1, 64)),
        FieldDescriptor::select("radiusProfileId").span(6),
        FieldDescriptor::select("radiusAuthMethod")
            .default_value("pap")
            .option("pap", "portal.radiusAuthMethod.pap")
            .option("chap", "portal.radiusAuthMethod.chap")
            .option("mschapv2", "portal.radiusAuthMethod.mschapv2")
            .span(6),
        FieldDescriptor::select("smsProviderId").span(6),
        FieldDescriptor::number("smsCodeLength")
            .default_value(6)
            .constraint(Constraint::Integer)
            .constraint(Constraint::range(4.0, 8.0))
            .span(6),
        // ── Session ──
        FieldDescriptor::new("sessionHeading", FieldKind::CategoryHeading),
        FieldDescriptor::switch("customTimeoutEnable"),
        FieldDescriptor::number("customTimeout")
            .constraint(Constraint::Integer)
            .constraint(Constraint::range(1.0, 10_000.0))
            .span(6),
        FieldDescriptor::select("customTimeoutUnit")
            .default_value("hour")
            .option("minute", "unit.minute")
            .option("hour", "unit.hour")
            .option("day", "unit.day")
            .span(6),
        // ── Landing page ──
        FieldDescriptor::select("landingPage")
            .required()
            .default_value(LANDING_ORIGINAL)
            .option(LANDING_ORIGINAL, "portal.landingPage.original")
            .option(LANDING_CUSTOM, "portal.landingPage.custom"),
        FieldDescriptor::select("landingUrlScheme")
            .default_value("https")
            .option("http", "scheme.http")
            .option("https", "scheme.https")
            .span(3),
        FieldDescriptor::text("landingUrl")
            .constraint(Constraint::format(Format::Url))
            .constraint(Constraint::max_length(2048))
            .span(9),
    ]
}

pub fn rules() -> Vec<ConditionalRule> {
    let auth_is = |mode: i32| when("authType", Predicate::equals(mode));
    let auth_not = |mode: i32| when("authType", Predicate::not_equals(mode));
    let timeout_on = when("customTimeoutEnable", Predicate::Truthy);
    let timeout_off = when("customTimeoutEnable", Predicate::Falsy);
    let custom_landing = when("landingPage", Predicate::equals(LANDING_CUSTOM));
    let original_landing = when("landingPage", Predicate::not_equals(LANDING_CUSTOM));

    vec![
        auth_not(AUTH_PASSWORD).reset("password"),
        auth_is(AUTH_PASSWORD).require("password"),
        auth_not(AUTH_RADIUS).reset("radiusProfileId"),
        auth_not(AUTH_RADIUS).reset_to("radiusAuthMethod", "pap"),
        auth_is(AUTH_RADIUS).require("radiusProfileId"),
        auth_is(AUTH_RADIUS).require("radiusAuthMethod"),
        auth_not(AUTH_SMS).reset("smsProviderId"),
        auth_not(AUTH_SMS).reset_to("smsCodeLength", 6),
        auth_is(AUTH_SMS).require("smsProviderId"),
        auth_is(AUTH_SMS).require("smsCodeLength"),
        timeout_on.require("customTimeout"),
        timeout_on.require("customTimeoutUnit"),
        timeout_off.reset("customTimeout"),
        timeout_off.reset_to("customTimeoutUnit", "hour"),
        custom_landing.require("landingUrlScheme"),
        custom_landing.require("landingUrl"),
        original_landing.reset("landingUrlScheme"),
        original_landing.reset("landingUrl"),
    ]
}
