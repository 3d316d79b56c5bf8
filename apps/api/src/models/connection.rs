use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ConnectionRow {
    pub id: Uuid,
    pub provider: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// A connection as listed to the client, with a display name and the time it
/// last changed.
#[derive(Debug, Clone, Serialize)]
pub struct ConnectionSummary {
    #[serde(flatten)]
    pub row: ConnectionRow,
    pub name: String,
    pub last_updated: DateTime<Utc>,
}

impl From<ConnectionRow> for ConnectionSummary {
    fn from(row: ConnectionRow) -> Self {
        let name = match row.provider.as_str() {
            "ONEDRIVE" => "OneDrive".to_string(),
            other => other.to_string(),
        };
        let last_updated = row.updated_at.unwrap_or(row.created_at);
        Self {
            row,
            name,
            last_updated,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn row(provider: &str, updated_at: Option<DateTime<Utc>>) -> ConnectionRow {
        ConnectionRow {
            id: Uuid::nil(),
            provider: provider.to_string(),
            status: "CONNECTED".to_string(),
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            updated_at,
        }
    }

    #[test]
    fn test_onedrive_gets_display_name() {
        assert_eq!(ConnectionSummary::from(row("ONEDRIVE", None)).name, "OneDrive");
        assert_eq!(ConnectionSummary::from(row("SHAREPOINT", None)).name, "SHAREPOINT");
    }

    #[test]
    fn test_last_updated_falls_back_to_created_at() {
        let created = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let updated = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        assert_eq!(ConnectionSummary::from(row("ONEDRIVE", None)).last_updated, created);
        assert_eq!(
            ConnectionSummary::from(row("ONEDRIVE", Some(updated))).last_updated,
            updated
        );
    }

    #[test]
    fn test_summary_keeps_row_fields_flat() {
        let json = serde_json::to_value(ConnectionSummary::from(row("ONEDRIVE", None))).unwrap();
        assert_eq!(json["provider"], "ONEDRIVE");
        assert_eq!(json["status"], "CONNECTED");
        assert_eq!(json["name"], "OneDrive");
        assert!(json["updated_at"].is_null());
        assert_eq!(json["last_updated"], json["created_at"]);
    }
}
