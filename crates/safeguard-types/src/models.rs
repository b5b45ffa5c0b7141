use std::fmt;

use serde::{Deserialize, Serialize};

/// Generated identity of a registered user (`users.user_id`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Public part of a user account. The credential never leaves the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub user_id: UserId,
    pub username: String,
    pub name: String,
    pub email: String,
}

/// Per-user notification and location preferences.
///
/// `Default` matches the column defaults of the `settings` table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsRecord {
    pub notification: bool,
    pub notification_sound: String,
    pub vibration_pattern: String,
    pub location_tracking: bool,
    pub location_sharing: bool,
}

/// Features that exist in the schema but have no behaviour yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    CheckIn,
    ViewCheckins,
    SendAlert,
    ViewAlerts,
    ManageContacts,
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::CheckIn => "check-in",
            Self::ViewCheckins => "view check-ins",
            Self::SendAlert => "send alert",
            Self::ViewAlerts => "view alerts",
            Self::ManageContacts => "manage contacts",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_id_serializes_as_bare_integer() {
        let json = serde_json::to_string(&UserId(42)).unwrap();
        assert_eq!(json, "42");
    }

    #[test]
    fn settings_default_matches_column_defaults() {
        let settings = SettingsRecord::default();
        assert!(!settings.notification);
        assert!(settings.notification_sound.is_empty());
        assert!(settings.vibration_pattern.is_empty());
        assert!(!settings.location_tracking);
        assert!(!settings.location_sharing);
    }

    #[test]
    fn feature_names() {
        assert_eq!(Feature::CheckIn.to_string(), "check-in");
        assert_eq!(
            serde_json::to_string(&Feature::ManageContacts).unwrap(),
            "\"manage_contacts\""
        );
    }
}
