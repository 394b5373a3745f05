//! Per-user settings

use super::records;
use super::store::Store;
use crate::errors::Result;
use crate::keys::UserScope;
use hoard_core::model::UserSettings;

impl Store {
    /// Settings for `user_id`, or the defaults if none were saved yet
    pub fn get_settings(&self, user_id: &str) -> Result<UserSettings> {
        self.observed("get_settings", user_id, || {
            let key = UserScope::new(user_id)?.settings();
            let stored: Option<UserSettings> = self
                .engine
                .view(|txn| records::read_optional(txn, &key))?;
            Ok(stored.unwrap_or_default())
        })
    }

    /// Save settings for `user_id`, replacing any previous value
    pub fn update_settings(&self, user_id: &str, settings: &UserSettings) -> Result<()> {
        self.observed("update_settings", user_id, || {
            let key = UserScope::new(user_id)?.settings();
            let value = records::encode(&key, settings)?;
            self.engine.update(|txn| txn.set(&key, &value))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hoard_core::model::ReminderFrequency;

    #[test]
    fn test_absent_settings_are_defaults() {
        let store = Store::open_in_memory().unwrap();
        let settings = store.get_settings("alice").unwrap();
        assert_eq!(settings, UserSettings::default());
        assert_eq!(settings.renewal_days, 90);
    }

    #[test]
    fn test_settings_round_trip_per_user() {
        let store = Store::open_in_memory().unwrap();
        let settings = UserSettings {
            renewal_days: 30,
            reminder_frequency: ReminderFrequency::Weekly,
            last_reminder_sent: None,
        };
        store.update_settings("alice", &settings).unwrap();

        assert_eq!(store.get_settings("alice").unwrap(), settings);
        assert_eq!(store.get_settings("bob").unwrap(), UserSettings::default());
    }
}
