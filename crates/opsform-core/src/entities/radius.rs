use crate::context::flags;
use crate::model::{
    ConditionalRule, Constraint, FieldDescriptor, FieldKind, Format, Predicate, when, when_flag,
};

pub const DEFAULT_AUTH_PORT: i32 = 1812;
pub const DEFAULT_ACCOUNTING_PORT: i32 = 1813;

fn port(name: &str, default: i32) -> FieldDescriptor {
    FieldDescriptor::number(name)
        .default_value(default)
        .constraint(Constraint::Integer)
        .constraint(Constraint::range(1.0, 65_535.0))
        .span(4)
}

pub fn descriptors() -> Vec<FieldDescriptor> {
    vec![
        FieldDescriptor::text("name")
            .required()
            .constraint(Constraint::length(1, 64)),
        FieldDescriptor::text("authServer")
            .required()
            .constraint(Constraint::format(Format::Ip))
            .span(8),
        port("authPort", DEFAULT_AUTH_PORT).required(),
        FieldDescriptor::new("authSecret", FieldKind::Password)
            .required()
            .constraint(Constraint::length(1, 128)),
        FieldDescriptor::new("accountingHeading", FieldKind::CategoryHeading),
        FieldDescriptor::switch("accountingEnable"),
        FieldDescriptor::text("accountingServer")
            .constraint(Constraint::format(Format::Ip))
            .span(8),
        port("accountingPort", DEFAULT_ACCOUNTING_PORT),
        FieldDescriptor::new("accountingSecret", FieldKind::Password)
            .constraint(Constraint::length(1, 128)),
    ]
}

pub fn rules() -> Vec<ConditionalRule> {
    let on = when("accountingEnable", Predicate::Truthy);
    let off = when("accountingEnable", Predicate::Falsy);
    vec![
        // Secrets are write-only; an edit leaves them blank to keep the stored one.
        when_flag(flags::IS_EDIT_MODE, Predicate::Truthy).optional("authSecret"),
        on.require("accountingServer"),
        on.require("accountingPort"),
        on.require("accountingSecret"),
        off.reset("accountingServer"),
        off.reset_to("accountingPort", DEFAULT_ACCOUNTING_PORT),
        off.reset("accountingSecret"),
    ]
}
