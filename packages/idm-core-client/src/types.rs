use serde::{Deserialize, Serialize};

/// A typed identifier attached to an organization, e.g. `pras:division`/`10`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identifier {
    #[serde(rename = "type")]
    pub id_type: String,
    pub value: String,
}

impl Identifier {
    pub fn new(id_type: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            id_type: id_type.into(),
            value: value.into(),
        }
    }
}

/// An organization as stored by the IdM core.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Organization {
    /// Server-assigned id; integer or string ids both read as text.
    #[serde(default, deserialize_with = "id_as_string")]
    pub id: String,
    /// Address of this record; updates are sent here.
    pub url: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub short_label: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub identifiers: Vec<Identifier>,
}

/// One page of the organization collection.
#[derive(Debug, Clone, Deserialize)]
pub struct OrganizationPage {
    pub results: Vec<Organization>,
    /// Pointer to the following page; absolute or relative to this page's URL.
    #[serde(default)]
    pub next: Option<String>,
}

/// Body of a create request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewOrganization {
    pub label: String,
    pub short_label: String,
    pub managed: bool,
    pub identifiers: Vec<Identifier>,
    pub tags: Vec<String>,
}

/// Body of a full-replace update request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrganizationUpdate {
    pub label: String,
    pub short_label: String,
    pub tags: Vec<String>,
}

fn id_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(id) => id,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_organization_accepts_numeric_id_and_null_short_label() {
        let org: Organization = serde_json::from_value(json!({
            "id": 42,
            "url": "https://idm.example/api/organization/42/",
            "label": "Department of Pathology",
            "short_label": null,
            "tags": ["unit", "research"],
            "identifiers": [{"type": "pras:department", "value": "3C05"}],
            "managed": true,
        }))
        .unwrap();

        assert_eq!(org.id, "42");
        assert_eq!(org.short_label, None);
        assert_eq!(org.identifiers[0], Identifier::new("pras:department", "3C05"));
    }

    #[test]
    fn test_new_organization_serializes_identifier_type_field() {
        let body = NewOrganization {
            label: "Medical Sciences".into(),
            short_label: "Medical Sciences".into(),
            managed: true,
            identifiers: vec![Identifier::new("pras:division", "10")],
            tags: vec!["division".into(), "unit".into()],
        };

        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({
                "label": "Medical Sciences",
                "short_label": "Medical Sciences",
                "managed": true,
                "identifiers": [{"type": "pras:division", "value": "10"}],
                "tags": ["division", "unit"],
            })
        );
    }
}
