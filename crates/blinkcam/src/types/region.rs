//! Account region type.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// The backend partition serving an account.
///
/// Parsed once from the login response and never changed afterwards.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RegionInfo {
    region_id: String,
    region_name: String,
}

impl RegionInfo {
    /// Create a region from its id (e.g. `prde`) and display name.
    pub fn new(region_id: impl Into<String>, region_name: impl Into<String>) -> Self {
        Self {
            region_id: region_id.into(),
            region_name: region_name.into(),
        }
    }

    /// Parse the `region` object of a login response.
    ///
    /// The service sends a single-entry map of region id to region name.
    /// Returns `None` when the map is empty. When several entries are present
    /// the lowest id wins so the choice is stable.
    pub fn from_login_map(map: &BTreeMap<String, String>) -> Option<Self> {
        map.iter()
            .next()
            .map(|(id, name)| Self::new(id.as_str(), name.as_str()))
    }

    /// Returns the region id.
    pub fn id(&self) -> &str {
        &self.region_id
    }

    /// Returns the human readable region name.
    pub fn name(&self) -> &str {
        &self.region_name
    }
}

impl fmt::Display for RegionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.region_name, self.region_id)
    }
}
