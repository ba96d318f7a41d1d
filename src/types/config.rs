//! Persisted table configuration.

use serde::{Deserialize, Serialize};

use crate::error::{GridviewError, Result};

/// Plain scalar configuration of a table view, archivable as JSON
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TableConfig {
    /// Space around the whole table
    pub table_padding: f32,
    /// Space between adjacent columns and between adjacent rows
    pub item_margin: f32,
    /// Skip the column header band when there are no rows
    pub hide_columns_if_empty: bool,
    /// Widen columns so the table fills the viewport width
    pub stretch_table: bool,
}

impl TableConfig {
    /// Copy with negative or non-finite spacing replaced by zero
    #[must_use]
    pub fn sanitized(self) -> Self {
        Self {
            table_padding: sanitize_spacing(self.table_padding, "tablePadding"),
            item_margin: sanitize_spacing(self.item_margin, "itemMargin"),
            ..self
        }
    }

    /// Encode as a JSON string.
    ///
    /// # Errors
    /// Returns an error if `serde_json` fails to encode the config.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decode from JSON; missing fields take their defaults.
    ///
    /// # Errors
    /// Returns an error if the input is not a JSON object of the expected shape.
    pub fn from_json(json: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        if !value.is_object() {
            return Err(GridviewError::Config(format!(
                "expected a JSON object, found {value}"
            )));
        }
        let config: TableConfig = serde_json::from_value(value)?;
        Ok(config.sanitized())
    }
}

fn sanitize_spacing(value: f32, name: &str) -> f32 {
    if value.is_finite() && value >= 0.0 {
        value
    } else {
        log::warn!("{name} is invalid ({value}); using 0");
        0.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_json_uses_camel_case() {
        let config = TableConfig {
            table_padding: 4.0,
            item_margin: 1.0,
            hide_columns_if_empty: true,
            stretch_table: false,
        };
        let json = config.to_json().unwrap();
        assert!(json.contains("\"tablePadding\":4.0"));
        assert!(json.contains("\"hideColumnsIfEmpty\":true"));
        assert_eq!(TableConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_missing_fields_default() {
        let config = TableConfig::from_json(r#"{"stretchTable": true}"#).unwrap();
        assert!(config.stretch_table);
        assert_eq!(config.table_padding, 0.0);
        assert!(!config.hide_columns_if_empty);
    }

    #[test]
    fn test_negative_spacing_is_clamped() {
        let config = TableConfig::from_json(r#"{"tablePadding": -5, "itemMargin": 2}"#).unwrap();
        assert_eq!(config.table_padding, 0.0);
        assert_eq!(config.item_margin, 2.0);
    }

    #[test]
    fn test_rejects_non_object() {
        assert!(matches!(
            TableConfig::from_json("[1, 2]"),
            Err(GridviewError::Config(_))
        ));
        assert!(matches!(
            TableConfig::from_json("not json"),
            Err(GridviewError::Json(_))
        ));
    }
}
