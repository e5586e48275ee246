// ── Session context ──
//
// Cross-cutting selection state (current site and region, dialog mode,
// today's date) passed explicitly into evaluation, option resolution and
// submission instead of being read from ambient global state.

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use strum::Display;

use crate::model::FieldValue;

/// Synthetic flag names rules may reference through `when_flag`.
pub mod flags {
    /// `true` while editing an existing record.
    pub const IS_EDIT_MODE: &str = "isEditMode";
    /// Today's date as `YYYY-MM-DD`.
    pub const TODAY: &str = "today";
    /// Currently selected site id, when one is selected.
    pub const SITE_ID: &str = "siteId";
    /// Currently selected region id, when one is selected.
    pub const REGION_ID: &str = "regionId";

    pub const ALL: &[&str] = &[IS_EDIT_MODE, TODAY, SITE_ID, REGION_ID];

    pub fn is_known(name: &str) -> bool {
        ALL.contains(&name)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DialogMode {
    #[default]
    Create,
    Edit,
}

/// Explicit context for one dialog instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionContext {
    pub mode: DialogMode,
    pub site_id: Option<String>,
    pub region_id: Option<String>,
    pub today: NaiveDate,
}

impl SessionContext {
    pub fn new(mode: DialogMode) -> Self {
        Self {
            mode,
            site_id: None,
            region_id: None,
            today: Local::now().date_naive(),
        }
    }

    pub fn create() -> Self {
        Self::new(DialogMode::Create)
    }

    pub fn edit() -> Self {
        Self::new(DialogMode::Edit)
    }

    pub fn with_site(mut self, site_id: impl Into<String>) -> Self {
        self.site_id = Some(site_id.into());
        self
    }

    pub fn with_region(mut self, region_id: impl Into<String>) -> Self {
        self.region_id = Some(region_id.into());
        self
    }

    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn is_edit(&self) -> bool {
        self.mode == DialogMode::Edit
    }

    /// Current value of a synthetic flag. Unknown flags and unset
    /// selections read as `Null`, which keeps rules on them from firing.
    pub fn flag(&self, name: &str) -> FieldValue {
        match name {
            flags::IS_EDIT_MODE => FieldValue::Bool(self.is_edit()),
            flags::TODAY => FieldValue::Text(self.today.format("%Y-%m-%d").to_string()),
            flags::SITE_ID => self.site_id.clone().map_or(FieldValue::Null, FieldValue::Text),
            flags::REGION_ID => self
                .region_id
                .clone()
                .map_or(FieldValue::Null, FieldValue::Text),
            _ => FieldValue::Null,
        }
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::create()
    }
}
