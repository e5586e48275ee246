//! Site dialog. The device account password is only mandatory when the
//! site is created; editing keeps the stored one unless replaced.

use crate::context::flags;
use crate::model::{
    ConditionalRule, Constraint, FieldDescriptor, FieldKind, Format, Predicate, when_flag,
};

pub fn descriptors() -> Vec<FieldDescriptor> {
    vec![
        FieldDescriptor::text("name")
            .required()
            .constraint(Constraint::length(1, 64)),
        FieldDescriptor::select("region").required().span(6),
        FieldDescriptor::new("timeZone", FieldKind::AutoComplete)
            .required()
            .span(6),
        FieldDescriptor::select("scenario")
            .option("office", "site.scenario.office")
            .option("hotel", "site.scenario.hotel")
            .option("school", "site.scenario.school")
            .option("retail", "site.scenario.retail")
            .option("other", "site.scenario.other"),
        FieldDescriptor::text("address").constraint(Constraint::max_length(200)),
        FieldDescriptor::new("location", FieldKind::MapLocation),
        FieldDescriptor::new("contactEmail", FieldKind::Email).span(6),
        FieldDescriptor::text("contactPhone")
            .constraint(Constraint::format(Format::Phone))
            .span(6),
        FieldDescriptor::new("deviceAccountHeading", FieldKind::CategoryHeading),
        FieldDescriptor::text("deviceUsername")
            .required()
            .constraint(Constraint::length(1, 32))
            .span(6),
        FieldDescriptor::new("devicePassword", FieldKind::Password)
            .constraint(Constraint::length(8, 64))
            .span(6),
    ]
}

pub fn rules() -> Vec<ConditionalRule> {
    vec![
        when_flag(flags::IS_EDIT_MODE, Predicate::Falsy).require("devicePassword"),
        when_flag(flags::IS_EDIT_MODE, Predicate::Truthy).optional("devicePassword"),
    ]
}
