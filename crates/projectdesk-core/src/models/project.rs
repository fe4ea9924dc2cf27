use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::utils::format::{format_money, format_timestamp};
use crate::utils::date::format_display_date;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// The API sends either a number or a numeric string.
    #[serde(deserialize_with = "flexible_f64")]
    pub value: f64,
    pub active: bool,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl Project {
    pub fn description_display(&self) -> &str {
        self.description
            .as_deref()
            .filter(|d| !d.trim().is_empty())
            .unwrap_or("-")
    }

    pub fn value_display(&self) -> String {
        format_money(self.value)
    }

    pub fn status_display(&self) -> &'static str {
        if self.active {
            "Active"
        } else {
            "Inactive"
        }
    }

    pub fn start_date_display(&self) -> String {
        format_display_date(self.start_date)
    }

    pub fn end_date_display(&self) -> String {
        self.end_date
            .map(format_display_date)
            .unwrap_or_else(|| "-".to_string())
    }

    pub fn created_at_display(&self) -> String {
        self.created_at
            .as_deref()
            .map(format_timestamp)
            .unwrap_or_else(|| "-".to_string())
    }

    pub fn updated_at_display(&self) -> String {
        self.updated_at
            .as_deref()
            .map(format_timestamp)
            .unwrap_or_else(|| "-".to_string())
    }
}

/// Payload for create and update.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectInput {
    pub name: String,
    pub description: String,
    pub value: f64,
    pub active: bool,
    pub start_date: NaiveDate,
    /// Serialized as `null` when cleared.
    pub end_date: Option<NaiveDate>,
}

fn flexible_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(f64),
        Text(String),
        Null(()),
    }

    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(n) => Ok(n),
        NumberOrString::Text(s) if s.trim().is_empty() => Ok(0.0),
        NumberOrString::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
        NumberOrString::Null(()) => Ok(0.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_project_with_numeric_value() {
        let json = r#"{"id":1,"name":"Bridge","description":"Steel","value":1500.5,"active":true,
            "startDate":"2024-03-01","endDate":null,"createdAt":"2024-03-01T10:00:00","updatedAt":null}"#;
        let project: Project = serde_json::from_str(json).expect("parse");
        assert_eq!(project.value, 1500.5);
        assert_eq!(project.start_date, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert_eq!(project.end_date, None);
        assert_eq!(project.end_date_display(), "-");
    }

    #[test]
    fn test_parse_project_with_string_value() {
        let json = r#"{"id":2,"name":"Road","value":"2500.00","active":false,
            "startDate":"2024-01-10","endDate":"2024-12-31"}"#;
        let project: Project = serde_json::from_str(json).expect("parse");
        assert_eq!(project.value, 2500.0);
        assert_eq!(project.status_display(), "Inactive");
        assert_eq!(project.end_date_display(), "31/12/2024");
        assert_eq!(project.description_display(), "-");
    }

    #[test]
    fn test_invalid_value_string_is_an_error() {
        let json = r#"{"id":3,"name":"X","value":"lots","active":true,"startDate":"2024-01-10"}"#;
        assert!(serde_json::from_str::<Project>(json).is_err());
    }

    #[test]
    fn test_input_serializes_iso_dates_and_null_end() {
        let input = ProjectInput {
            name: "Bridge".to_string(),
            description: String::new(),
            value: 10.0,
            active: true,
            start_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            end_date: None,
        };
        let json = serde_json::to_value(&input).unwrap();
        assert_eq!(json["startDate"], "2024-03-01");
        assert!(json["endDate"].is_null());
    }
}
