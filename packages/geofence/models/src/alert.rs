use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Session-unique alert identifier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct AlertId(pub u64);

impl std::fmt::Display for AlertId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Handling state of a safety alert.
///
/// Only moves forward: `Active`/`Investigating` may become `Resolved`, and
/// `Resolved` is terminal.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AlertStatus {
    Active,
    Investigating,
    Resolved,
}

impl AlertStatus {
    #[must_use]
    pub const fn is_resolved(self) -> bool {
        matches!(self, Self::Resolved)
    }
}

/// A safety alert shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub id: AlertId,
    /// Free-text category, e.g. "High Risk" or "Location Drop".
    #[serde(rename = "type")]
    pub kind: String,
    pub message: String,
    /// When the alert was raised.
    pub raised_at: DateTime<Utc>,
    pub status: AlertStatus,
}

impl Alert {
    /// Moves the alert to [`AlertStatus::Resolved`].
    ///
    /// Returns `false` (and changes nothing) if it was already resolved.
    pub fn resolve(&mut self) -> bool {
        if self.status.is_resolved() {
            return false;
        }
        self.status = AlertStatus::Resolved;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alert(status: AlertStatus) -> Alert {
        Alert {
            id: AlertId(1),
            kind: "High Risk".to_string(),
            message: "Tourist entered Restricted Area 7".to_string(),
            raised_at: Utc::now(),
            status,
        }
    }

    #[test]
    fn resolve_moves_forward_only() {
        let mut active = alert(AlertStatus::Active);
        assert!(active.resolve());
        assert_eq!(active.status, AlertStatus::Resolved);

        let mut investigating = alert(AlertStatus::Investigating);
        assert!(investigating.resolve());
        assert_eq!(investigating.status, AlertStatus::Resolved);
    }

    #[test]
    fn resolve_is_idempotent() {
        let mut resolved = alert(AlertStatus::Resolved);
        assert!(!resolved.resolve());
        assert_eq!(resolved.status, AlertStatus::Resolved);
    }

    #[test]
    fn status_uses_lowercase_names() {
        assert_eq!(AlertStatus::Investigating.to_string(), "investigating");
        assert_eq!(
            "resolved".parse::<AlertStatus>().unwrap(),
            AlertStatus::Resolved
        );
    }

    #[test]
    fn alert_kind_serializes_as_type() {
        let json = serde_json::to_value(alert(AlertStatus::Active)).unwrap();
        assert_eq!(json["type"], "High Risk");
        assert_eq!(json["status"], "active");
    }
}
