//! Sync module registry.
//!
//! A sync module is the hub a group of cameras hangs off. The registry keeps
//! only what discovery needs: the network it belongs to and its cameras keyed
//! by device id. Everything else in the summary stays in the raw JSON.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

/// A camera attached to a sync module.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Camera {
    /// Device id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Network the camera belongs to.
    pub network_id: String,
}

/// The devices registered under one network.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SyncModule {
    network_id: String,
    name: String,
    cameras: BTreeMap<String, Camera>,
}

impl SyncModule {
    /// Create an empty sync module.
    pub fn new(network_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            network_id: network_id.into(),
            name: name.into(),
            cameras: BTreeMap::new(),
        }
    }

    /// Create a sync module populated from a homescreen summary.
    pub fn from_summary(
        network_id: impl Into<String>,
        name: impl Into<String>,
        summary: &Value,
    ) -> Self {
        let mut module = Self::new(network_id, name);
        module.update(summary);
        module
    }

    /// Replace the camera registry with the cameras listed in `summary`.
    ///
    /// Cameras come from `devices` entries whose `device_type` is `camera`,
    /// and from a top-level `cameras` array. Entries tagged with a different
    /// `network_id` are skipped.
    pub fn update(&mut self, summary: &Value) {
        let devices = summary
            .get("devices")
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .filter(|d| d.get("device_type").and_then(Value::as_str) == Some("camera"))
            .filter_map(|d| self.camera_from(d, "device_id"));

        let cameras = summary
            .get("cameras")
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .filter_map(|c| self.camera_from(c, "id"));

        let registry = devices
            .chain(cameras)
            .map(|camera| (camera.id.clone(), camera))
            .collect();
        self.cameras = registry;
    }

    /// Returns the network id.
    pub fn network_id(&self) -> &str {
        &self.network_id
    }

    /// Returns the sync module name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the cameras keyed by device id.
    pub fn cameras(&self) -> &BTreeMap<String, Camera> {
        &self.cameras
    }

    /// Look up a camera by device id.
    pub fn camera(&self, id: &str) -> Option<&Camera> {
        self.cameras.get(id)
    }

    fn camera_from(&self, entry: &Value, id_field: &str) -> Option<Camera> {
        let network_id = match entry.get("network_id").and_then(id_string) {
            Some(network) if network != self.network_id => return None,
            Some(network) => network,
            None => self.network_id.clone(),
        };

        let id = entry.get(id_field).and_then(id_string)?;
        let name = entry
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or(id.as_str())
            .to_string();
        Some(Camera {
            id,
            name,
            network_id,
        })
    }
}

/// Ids arrive as numbers or strings depending on the endpoint.
pub(crate) fn id_string(value: &Value) -> Option<String> {
    match value {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn collects_cameras_from_devices_and_cameras() {
        let summary = json!({
            "devices": [
                {"device_type": "camera", "device_id": 1001, "name": "Porch"},
                {"device_type": "sync_module", "device_id": 5000, "name": "Hub"},
                {"device_type": "camera", "device_id": 1002, "network_id": 9999, "name": "Elsewhere"}
            ],
            "cameras": [
                {"id": "1003", "network_id": "4321", "name": "Garage"}
            ]
        });

        let module = SyncModule::from_summary("4321", "Home", &summary);

        assert_eq!(module.name(), "Home");
        assert_eq!(module.cameras().len(), 2);
        assert_eq!(module.camera("1001").unwrap().name, "Porch");
        assert_eq!(module.camera("1003").unwrap().name, "Garage");
        assert_eq!(module.camera("1001").unwrap().network_id, "4321");
        assert_eq!(module.camera("1003").unwrap().network_id, "4321");
        assert!(module.camera("1002").is_none());
    }

    #[test]
    fn update_replaces_registry() {
        let mut module = SyncModule::from_summary(
            "4321",
            "Home",
            &json!({"cameras": [{"id": 1, "name": "Old"}]}),
        );
        module.update(&json!({"cameras": [{"id": 2}]}));

        assert!(module.camera("1").is_none());
        assert_eq!(module.camera("2").unwrap().name, "2");
    }

    #[test]
    fn id_string_accepts_numbers_and_strings() {
        assert_eq!(id_string(&json!(42)).as_deref(), Some("42"));
        assert_eq!(id_string(&json!("42")).as_deref(), Some("42"));
        assert_eq!(id_string(&json!("")), None);
        assert_eq!(id_string(&json!(null)), None);
    }
}
