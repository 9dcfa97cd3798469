use serde::Deserialize;

/// One entity in the organisation structure tree.
///
/// The registry names its fields after the nesting level the entity sits
/// at, so a node carries at most one of each `Level{1,2,3}Entity*` triple.
/// Every field is optional; missing or `null` values read as empty.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SourceNode {
    #[serde(rename = "Level1EntityCode", default)]
    pub level1_code: Option<String>,
    #[serde(rename = "Level1EntityName", default)]
    pub level1_name: Option<String>,
    #[serde(rename = "Level1EntityFullName", default)]
    pub level1_full_name: Option<String>,

    #[serde(rename = "Level2EntityCode", default)]
    pub level2_code: Option<String>,
    #[serde(rename = "Level2EntityName", default)]
    pub level2_name: Option<String>,
    #[serde(rename = "Level2EntityFullName", default)]
    pub level2_full_name: Option<String>,

    #[serde(rename = "Level3EntityCode", default)]
    pub level3_code: Option<String>,
    #[serde(rename = "Level3EntityName", default)]
    pub level3_name: Option<String>,
    #[serde(rename = "Level3EntityFullName", default)]
    pub level3_full_name: Option<String>,

    #[serde(rename = "Level1Entities", default, deserialize_with = "nullable_list")]
    pub level1_entities: Vec<SourceNode>,
    #[serde(rename = "Level2Entities", default, deserialize_with = "nullable_list")]
    pub level2_entities: Vec<SourceNode>,
    #[serde(rename = "Level3Entities", default, deserialize_with = "nullable_list")]
    pub level3_entities: Vec<SourceNode>,
}

impl SourceNode {
    /// Entity code, probed level 1 then 2 then 3.
    pub fn code(&self) -> &str {
        first_non_empty([&self.level1_code, &self.level2_code, &self.level3_code])
    }

    /// Short display name, probed level 1 then 2 then 3.
    pub fn name(&self) -> &str {
        first_non_empty([&self.level1_name, &self.level2_name, &self.level3_name])
    }

    /// Full display name, probed level 1 then 2 then 3.
    pub fn full_name(&self) -> &str {
        first_non_empty([
            &self.level1_full_name,
            &self.level2_full_name,
            &self.level3_full_name,
        ])
    }

    /// Child entities across all three levels, in level order.
    pub fn children(&self) -> impl Iterator<Item = &SourceNode> {
        self.level1_entities
            .iter()
            .chain(&self.level2_entities)
            .chain(&self.level3_entities)
    }
}

fn first_non_empty<'a>(candidates: [&'a Option<String>; 3]) -> &'a str {
    candidates
        .into_iter()
        .flatten()
        .map(String::as_str)
        .find(|value| !value.is_empty())
        .unwrap_or("")
}

fn nullable_list<'de, D>(deserializer: D) -> Result<Vec<SourceNode>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<SourceNode>>::deserialize(deserializer)?.unwrap_or_default())
}
