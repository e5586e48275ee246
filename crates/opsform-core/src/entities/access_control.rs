use crate::model::{
    ConditionalRule, Constraint, FieldDescriptor, FieldKind, Format, Predicate, when,
};

const MAX_ENTRIES: usize = 512;

pub fn descriptors() -> Vec<FieldDescriptor> {
    vec![
        FieldDescriptor::text("name")
            .required()
            .constraint(Constraint::length(1, 64)),
        FieldDescriptor::select("action")
            .required()
            .default_value("deny")
            .option("allow", "acl.action.allow")
            .option("deny", "acl.action.deny")
            .span(6),
        FieldDescriptor::select("matchType")
            .required()
            .default_value("mac")
            .option("mac", "acl.matchType.mac")
            .option("ip", "acl.matchType.ip")
            .span(6),
        // Free-entry lists: no option list, each element format-checked.
        FieldDescriptor::new("macList", FieldKind::MultiSelect)
            .constraint(Constraint::Length {
                min: Some(1),
                max: Some(MAX_ENTRIES),
            })
            .constraint(Constraint::format(Format::Mac)),
        FieldDescriptor::new("ipList", FieldKind::MultiSelect)
            .constraint(Constraint::Length {
                min: Some(1),
                max: Some(MAX_ENTRIES),
            })
            .constraint(Constraint::format(Format::Ip)),
        FieldDescriptor::new("ssidIds", FieldKind::MultiSelect),
    ]
}

pub fn rules() -> Vec<ConditionalRule> {
    ["mac", "ip"]
        .into_iter()
        .flat_map(|kind| {
            let list = format!("{kind}List");
            [
                when("matchType", Predicate::equals(kind)).require(list.clone()),
                when("matchType", Predicate::not_equals(kind)).reset(list),
            ]
        })
        .collect()
}
