use crate::model::{
    ConditionalRule, Constraint, FieldDescriptor, FieldKind, FieldValue, Predicate, when,
};

pub fn descriptors() -> Vec<FieldDescriptor> {
    vec![
        FieldDescriptor::text("name")
            .required()
            .constraint(Constraint::length(1, 32)),
        FieldDescriptor::new("bands", FieldKind::Checklist)
            .required()
            .default_value(vec![FieldValue::from("2g"), FieldValue::from("5g")])
            .option("2g", "ssid.band.2g")
            .option("5g", "ssid.band.5g")
            .option("6g", "ssid.band.6g"),
        FieldDescriptor::select("security")
            .required()
            .default_value("wpa2")
            .option("open", "ssid.security.open")
            .option("wpa2", "ssid.security.wpa2")
            .option("wpa3", "ssid.security.wpa3")
            .option("wpa2-enterprise", "ssid.security.enterprise"),
        FieldDescriptor::new("passphrase", FieldKind::Password)
            .constraint(Constraint::length(8, 63)),
        FieldDescriptor::select("radiusProfileId"),
        FieldDescriptor::switch("hidden"),
        FieldDescriptor::new("advancedHeading", FieldKind::CategoryHeading),
        FieldDescriptor::switch("vlanEnable").span(4),
        FieldDescriptor::number("vlanId")
            .constraint(Constraint::Integer)
            .constraint(Constraint::range(1.0, 4094.0))
            .span(8),
        FieldDescriptor::switch("portalEnable").span(4),
        FieldDescriptor::select("portalId").span(8),
    ]
}

pub fn rules() -> Vec<ConditionalRule> {
    let personal = ["wpa2", "wpa3"];
    vec![
        when("security", Predicate::one_of(personal)).require("passphrase"),
        when("security", Predicate::none_of(personal)).reset("passphrase"),
        when("security", Predicate::equals("wpa2-enterprise")).require("radiusProfileId"),
        when("security", Predicate::not_equals("wpa2-enterprise")).reset("radiusProfileId"),
        when("vlanEnable", Predicate::Truthy).require("vlanId"),
        when("vlanEnable", Predicate::Falsy).reset("vlanId"),
        when("portalEnable", Predicate::Truthy).require("portalId"),
        when("portalEnable", Predicate::Falsy).reset("portalId"),
    ]
}
