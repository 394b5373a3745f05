//! Users and the email lookup

use super::records;
use super::store::Store;
use crate::errors::{not_found, Result};
use crate::keys::{user_email_key, user_key, USERS_PREFIX};
use crate::kv::KvRead;
use hoard_core::errors::HoardError;
use hoard_core::model::User;
use uuid::Uuid;

impl Store {
    /// Create a user and its email lookup
    ///
    /// # Errors
    ///
    /// `Conflict` if the email is already registered or the id is taken.
    pub fn create_user(&self, user: &User) -> Result<()> {
        self.observed("create_user", "", || {
            let key = user_key(&user.id);
            let email_key = user_email_key(&user.email)?;
            let id = user.user_id();

            self.engine.update(|txn| {
                if txn.contains(&email_key)? {
                    return Err(HoardError::EmailTaken {
                        email: user.email.clone(),
                    }
                    .into());
                }
                records::insert_new(txn, &key, user)?;
                txn.set(&email_key, id.as_bytes())
            })
        })
    }

    /// Look up a user by id; an id that is not a UUID is simply not found
    pub fn get_user_by_id(&self, id: &str) -> Result<User> {
        self.observed("get_user_by_id", id, || {
            let uuid = Uuid::parse_str(id).map_err(|_| not_found("user", id))?;
            self.engine
                .view(|txn| records::read(txn, &user_key(&uuid), &uuid))
        })
    }

    pub fn get_user_by_email(&self, email: &str) -> Result<User> {
        self.observed("get_user_by_email", "", || {
            // An empty email can never be registered
            if email.is_empty() {
                return Err(not_found("user", email));
            }
            let email_key = user_email_key(email)?;
            self.engine.view(|txn| {
                let owner = txn
                    .get(&email_key)?
                    .ok_or_else(|| not_found("user", email))?;
                let uuid = std::str::from_utf8(&owner)
                    .ok()
                    .and_then(|s| Uuid::parse_str(s).ok())
                    .ok_or_else(|| not_found("user", email))?;
                records::read(txn, &user_key(&uuid), &uuid)
            })
        })
    }

    /// Overwrite an existing user
    ///
    /// When the email changes the lookup moves with it in the same
    /// transaction.
    ///
    /// # Errors
    ///
    /// `NotFound` if the user does not exist; `Conflict` if the new email
    /// belongs to another user.
    pub fn update_user(&self, user: &User) -> Result<()> {
        self.observed("update_user", "", || {
            let key = user_key(&user.id);
            let new_email_key = user_email_key(&user.email)?;
            let id = user.user_id();

            self.engine.update(|txn| {
                let old: User = records::overwrite_existing(txn, &key, user)?;
                if old.email == user.email {
                    return Ok(());
                }

                if let Some(owner) = txn.get(&new_email_key)? {
                    if owner != id.as_bytes() {
                        return Err(HoardError::EmailTaken {
                            email: user.email.clone(),
                        }
                        .into());
                    }
                }
                txn.delete(&user_email_key(&old.email)?)?;
                txn.set(&new_email_key, id.as_bytes())
            })
        })
    }

    pub fn list_users(&self) -> Result<Vec<User>> {
        self.observed("list_users", "", || {
            self.engine
                .view(|txn| records::list::<User, _>(txn, USERS_PREFIX))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hoard_core::errors::HxErrorKind;

    #[test]
    fn test_lookup_by_email_and_id() {
        let store = Store::open_in_memory().unwrap();
        let user = User::new("a@b.com", "hash");
        store.create_user(&user).unwrap();

        assert_eq!(store.get_user_by_email("a@b.com").unwrap(), user);
        assert_eq!(store.get_user_by_id(&user.user_id()).unwrap(), user);
        assert_eq!(
            store.get_user_by_id("not-a-uuid").unwrap_err().kind(),
            HxErrorKind::NotFound
        );
        assert_eq!(
            store.get_user_by_email("A@B.com").unwrap_err().kind(),
            HxErrorKind::NotFound
        );
    }
}
