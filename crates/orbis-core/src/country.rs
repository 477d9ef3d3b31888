//! Country metadata attached to pickable objects.

use serde::{Deserialize, Serialize};

use crate::geo::GeoCoord;

/// Metadata shared by every marker and surface part of one country.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CountryInfo {
    /// Stable grouping key, usually the ISO/NATO trigram (`"FRA"`).
    #[serde(alias = "trigram")]
    pub identifier: String,

    /// Display name.
    pub name: String,

    /// Geographic center used when framing the country.
    #[serde(alias = "countryCenter")]
    pub center: Option<GeoCoord>,

    /// Whether the collaborator supplied data for this country.
    #[serde(alias = "hasData")]
    pub has_data: bool,

    /// Arbitrary collaborator payload, passed back untouched on selection.
    pub payload: serde_json::Value,
}

impl CountryInfo {
    /// Creates metadata with an identifier and a display name.
    pub fn new(identifier: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    /// Sets the geographic center.
    #[must_use]
    pub fn with_center(mut self, center: GeoCoord) -> Self {
        self.center = Some(center);
        self
    }

    /// Attaches a payload and marks the country as having data.
    #[must_use]
    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self.has_data = true;
        self
    }
}

/// Notification sent to the collaborator whenever the selection changes.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectionEvent {
    /// A country was selected.
    Selected(CountryInfo),
    /// The selection was cleared by clicking outside every country.
    Unselected,
}

impl SelectionEvent {
    /// Returns the selected country, or an all-empty record for an unselect.
    pub fn info(&self) -> CountryInfo {
        match self {
            SelectionEvent::Selected(info) => info.clone(),
            SelectionEvent::Unselected => CountryInfo::default(),
        }
    }

    /// Returns true for [`SelectionEvent::Unselected`].
    pub fn is_unselect(&self) -> bool {
        matches!(self, SelectionEvent::Unselected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_collaborator_record() {
        let json = r#"{
            "trigram": "FRA",
            "name": "France",
            "countryCenter": { "lat": 46.2, "long": 2.2 },
            "payload": { "artists": ["Daft Punk"] }
        }"#;
        let info: CountryInfo = serde_json::from_str(json).unwrap();
        assert_eq!(info.identifier, "FRA");
        assert_eq!(info.center, Some(GeoCoord::new(46.2, 2.2)));
        assert!(!info.has_data);
        assert_eq!(info.payload["artists"][0], "Daft Punk");
    }

    #[test]
    fn test_unselect_payload_is_empty() {
        let info = SelectionEvent::Unselected.info();
        assert!(info.identifier.is_empty());
        assert!(info.name.is_empty());
        assert!(info.payload.is_null());
        assert!(SelectionEvent::Unselected.is_unselect());
    }
}
