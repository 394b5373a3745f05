use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How often renewal reminders are mailed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReminderFrequency {
    #[default]
    #[serde(alias = "")]
    Disabled,
    Weekly,
    Biweekly,
    Monthly,
}

/// Per-user preferences
///
/// Absent settings are never an error: `UserSettings::default()` stands in
/// until the user saves their own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSettings {
    /// Length of the "renewal due soon" window in days
    pub renewal_days: u32,

    pub reminder_frequency: ReminderFrequency,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_reminder_sent: Option<DateTime<Utc>>,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            renewal_days: 90,
            reminder_frequency: ReminderFrequency::Disabled,
            last_reminder_sent: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = UserSettings::default();
        assert_eq!(settings.renewal_days, 90);
        assert_eq!(settings.reminder_frequency, ReminderFrequency::Disabled);
        assert!(settings.last_reminder_sent.is_none());
    }

    #[test]
    fn test_settings_wire_format() {
        let json = serde_json::to_string(&UserSettings::default()).unwrap();
        assert_eq!(json, r#"{"renewalDays":90,"reminderFrequency":"disabled"}"#);
    }

    #[test]
    fn test_empty_frequency_reads_as_disabled() {
        let settings: UserSettings =
            serde_json::from_str(r#"{"renewalDays":30,"reminderFrequency":""}"#).unwrap();
        assert_eq!(settings.reminder_frequency, ReminderFrequency::Disabled);
        assert_eq!(settings.renewal_days, 30);
    }
}
