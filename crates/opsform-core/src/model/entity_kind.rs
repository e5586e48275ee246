// ── Entity kinds ──

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// The entity dialogs of the console. Each kind owns one schema.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum EntityKind {
    Site,
    Ssid,
    Device,
    Portal,
    Voucher,
    Campaign,
    RadiusProfile,
    AccessControl,
    Account,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn kebab_case_names() {
        assert_eq!(EntityKind::RadiusProfile.to_string(), "radius-profile");
        assert_eq!(
            EntityKind::from_str("access-control").ok(),
            Some(EntityKind::AccessControl)
        );
        assert!(EntityKind::from_str("router").is_err());
    }
}
