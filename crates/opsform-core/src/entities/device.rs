//! Device adoption / edit dialog.

use crate::context::flags;
use crate::model::{
    ConditionalRule, Constraint, FieldDescriptor, Format, Predicate, when, when_flag,
};

const STATIC_FIELDS: [&str; 3] = ["ipAddress", "netmask", "gateway"];

pub fn descriptors() -> Vec<FieldDescriptor> {
    vec![
        FieldDescriptor::text("mac")
            .required()
            .constraint(Constraint::format(Format::Mac)),
        FieldDescriptor::text("name").constraint(Constraint::max_length(128)),
        FieldDescriptor::select("siteId").required(),
        FieldDescriptor::select("ipMode")
            .required()
            .default_value("dhcp")
            .option("dhcp", "device.ipMode.dhcp")
            .option("static", "device.ipMode.static"),
        FieldDescriptor::text("ipAddress")
            .constraint(Constraint::format(Format::Ipv4))
            .span(4),
        FieldDescriptor::text("netmask")
            .constraint(Constraint::format(Format::Ipv4))
            .span(4),
        FieldDescriptor::text("gateway")
            .constraint(Constraint::format(Format::Ipv4))
            .span(4),
        FieldDescriptor::text("dns").constraint(Constraint::format(Format::Ip)),
        FieldDescriptor::switch("ledEnable").default_value(true),
    ]
}

pub fn rules() -> Vec<ConditionalRule> {
    let is_static = when("ipMode", Predicate::equals("static"));
    let not_static = when("ipMode", Predicate::not_equals("static"));

    let mut rules: Vec<_> = STATIC_FIELDS
        .iter()
        .flat_map(|field| [is_static.require(*field), not_static.reset(*field)])
        .collect();
    rules.push(not_static.reset("dns"));
    // The MAC identifies an adopted device and is not re-entered on edit.
    rules.push(when_flag(flags::IS_EDIT_MODE, Predicate::Truthy).optional("mac"));
    rules
}
