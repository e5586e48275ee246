//! Voucher batch dialog.

use crate::model::{ConditionalRule, Constraint, FieldDescriptor, FieldKind, Predicate, when};

/// Kbps ceiling for custom rate limits.
const MAX_RATE_KBPS: f64 = 10_485_760.0;

pub fn descriptors() -> Vec<FieldDescriptor> {
    vec![
        FieldDescriptor::text("name")
            .required()
            .constraint(Constraint::length(1, 64)),
        FieldDescriptor::number("amount")
            .required()
            .default_value(1)
            .constraint(Constraint::Integer)
            .constraint(Constraint::range(1.0, 5_000.0))
            .span(6),
        FieldDescriptor::number("codeLength")
            .required()
            .default_value(8)
            .constraint(Constraint::Integer)
            .constraint(Constraint::range(6.0, 10.0))
            .span(6),
        FieldDescriptor::select("codeForm")
            .required()
            .default_value("numeric")
            .option("numeric", "voucher.codeForm.numeric")
            .option("letters", "voucher.codeForm.letters")
            .option("mixed", "voucher.codeForm.mixed"),
        FieldDescriptor::number("duration")
            .required()
            .default_value(8)
            .constraint(Constraint::Integer)
            .constraint(Constraint::min(1.0))
            .span(6),
        FieldDescriptor::select("durationUnit")
            .required()
            .default_value("hour")
            .option("minute", "unit.minute")
            .option("hour", "unit.hour")
            .option("day", "unit.day")
            .span(6),
        FieldDescriptor::new("limitHeading", FieldKind::CategoryHeading),
        FieldDescriptor::switch("customRateLimitDownEnable").span(4),
        FieldDescriptor::number("customRateLimitDown")
            .constraint(Constraint::Integer)
            .constraint(Constraint::range(1.0, MAX_RATE_KBPS))
            .span(8),
        FieldDescriptor::switch("customRateLimitUpEnable").span(4),
        FieldDescriptor::number("customRateLimitUp")
            .constraint(Constraint::Integer)
            .constraint(Constraint::range(1.0, MAX_RATE_KBPS))
            .span(8),
        FieldDescriptor::switch("dataLimitEnable").span(4),
        FieldDescriptor::number("dataLimitMb")
            .constraint(Constraint::Integer)
            .constraint(Constraint::min(1.0))
            .span(8),
        FieldDescriptor::switch("expiryEnable").span(4),
        FieldDescriptor::new("expiryDate", FieldKind::Date)
            .constraint(Constraint::NotBeforeToday)
            .span(8),
    ]
}

pub fn rules() -> Vec<ConditionalRule> {
    // Each switch gates exactly one value field.
    [
        ("customRateLimitDownEnable", "customRateLimitDown"),
        ("customRateLimitUpEnable", "customRateLimitUp"),
        ("dataLimitEnable", "dataLimitMb"),
        ("expiryEnable", "expiryDate"),
    ]
    .into_iter()
    .flat_map(|(switch, field)| {
        [
            when(switch, Predicate::Truthy).require(field),
            when(switch, Predicate::Falsy).reset(field),
        ]
    })
    .collect()
}
