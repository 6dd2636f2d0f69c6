// Lookup tables the model should copy literal values from.
use crate::domain::error::NlqError;
use crate::domain::traits::ReferenceSource;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Named tables of code -> label pairs, e.g. federal school codes.
///
/// ```toml
/// [tables.schools]
/// "001775" = "University of Illinois Urbana-Champaign"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StaticReference {
    #[serde(default)]
    pub tables: BTreeMap<String, BTreeMap<String, String>>,
}

impl StaticReference {
    pub fn load(path: &Path) -> Result<Self, NlqError> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    pub fn with_table(
        mut self,
        name: impl Into<String>,
        entries: impl IntoIterator<Item = (String, String)>,
    ) -> Self {
        self.tables.insert(name.into(), entries.into_iter().collect());
        self
    }

    /// Pretty JSON of the non-empty tables, or `None` when there is nothing to show.
    pub fn render(&self) -> Result<Option<String>, NlqError> {
        let tables: BTreeMap<&String, &BTreeMap<String, String>> = self
            .tables
            .iter()
            .filter(|(_, entries)| !entries.is_empty())
            .collect();
        if tables.is_empty() {
            return Ok(None);
        }
        Ok(Some(serde_json::to_string_pretty(&tables)?))
    }
}

#[async_trait]
impl ReferenceSource for StaticReference {
    async fn reference_text(&self) -> Result<Option<String>, NlqError> {
        self.render()
    }
}
