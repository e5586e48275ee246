//! Advertising campaign dialog.
//!
//! Uses the default-then-override style: once an ad type is picked every
//! creative field is first reset, then the selected type re-requires its
//! own fields. Last matching rule wins, so the override takes effect.

use crate::model::{
    ConditionalRule, Constraint, FieldDescriptor, FieldKind, Format, Predicate, when,
};

const CREATIVE_FIELDS: [&str; 4] = ["imageUrl", "videoUrl", "videoDuration", "surveyQuestion"];

pub fn descriptors() -> Vec<FieldDescriptor> {
    vec![
        FieldDescriptor::text("name")
            .required()
            .constraint(Constraint::length(1, 64)),
        FieldDescriptor::select("adType")
            .required()
            .default_value("image")
            .option("image", "campaign.adType.image")
            .option("video", "campaign.adType.video")
            .option("survey", "campaign.adType.survey"),
        FieldDescriptor::text("imageUrl").constraint(Constraint::format(Format::Url)),
        FieldDescriptor::text("videoUrl")
            .constraint(Constraint::format(Format::Url))
            .span(8),
        FieldDescriptor::number("videoDuration")
            .constraint(Constraint::Integer)
            .constraint(Constraint::range(5.0, 120.0))
            .span(4),
        FieldDescriptor::text("surveyQuestion").constraint(Constraint::max_length(200)),
        FieldDescriptor::new("deliveryHeading", FieldKind::CategoryHeading),
        FieldDescriptor::new("schedule", FieldKind::DateRange)
            .required()
            .constraint(Constraint::Length {
                min: Some(2),
                max: Some(2),
            })
            .constraint(Constraint::OrderedRange)
            .constraint(Constraint::NotBeforeToday),
        FieldDescriptor::new("targetSiteIds", FieldKind::MultiSelect).required(),
        FieldDescriptor::number("impressionCap")
            .constraint(Constraint::Integer)
            .constraint(Constraint::min(1.0)),
    ]
}

pub fn rules() -> Vec<ConditionalRule> {
    let picked = when("adType", Predicate::NotEmpty);
    let mut rules: Vec<_> = CREATIVE_FIELDS.iter().map(|f| picked.reset(*f)).collect();

    let image = when("adType", Predicate::equals("image"));
    let video = when("adType", Predicate::equals("video"));
    let survey = when("adType", Predicate::equals("survey"));
    rules.extend([
        image.require("imageUrl"),
        video.require("videoUrl"),
        video.require("videoDuration"),
        survey.require("surveyQuestion"),
    ]);
    rules
}
