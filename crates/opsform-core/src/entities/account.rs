//! Administrator account dialog.

use crate::context::flags;
use crate::model::{
    ConditionalRule, Constraint, FieldDescriptor, FieldKind, Format, Predicate, when, when_flag,
};

pub fn descriptors() -> Vec<FieldDescriptor> {
    vec![
        FieldDescriptor::text("username").required().constraint(Constraint::pattern(
            r"^[A-Za-z][A-Za-z0-9_.\-]{2,31}$",
            "account.username.invalid",
        )),
        FieldDescriptor::new("email", FieldKind::Email).required().span(6),
        FieldDescriptor::text("phone")
            .constraint(Constraint::format(Format::Phone))
            .span(6),
        FieldDescriptor::new("password", FieldKind::Password).constraint(Constraint::length(8, 64)),
        FieldDescriptor::select("role")
            .required()
            .default_value("viewer")
            .option("admin", "account.role.admin")
            .option("operator", "account.role.operator")
            .option("viewer", "account.role.viewer"),
        FieldDescriptor::new("siteIds", FieldKind::MultiSelect),
        FieldDescriptor::switch("expiryEnable").span(4),
        FieldDescriptor::new("expiryDate", FieldKind::Date)
            .constraint(Constraint::NotBeforeToday)
            .span(8),
    ]
}

pub fn rules() -> Vec<ConditionalRule> {
    vec![
        when_flag(flags::IS_EDIT_MODE, Predicate::Falsy).require("password"),
        // Administrators see every site; the scope list does not apply.
        when("role", Predicate::equals("admin")).reset("siteIds"),
        when("role", Predicate::not_equals("admin")).require("siteIds"),
        when("expiryEnable", Predicate::Truthy).require("expiryDate"),
        when("expiryEnable", Predicate::Falsy).reset("expiryDate"),
    ]
}
