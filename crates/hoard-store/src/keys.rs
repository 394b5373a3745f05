//! Key codec
//!
//! Every persisted key is ASCII, `/`-separated, and belongs to exactly one
//! [`KeyFamily`]. Id segments are opaque and may not contain the separator,
//! so the mapping from [`Key`] to bytes is injective and a prefix scan over
//! one scope can never reach into another.
//!
//! | Family | Layout |
//! |---|---|
//! | User | `usr/{userId}` |
//! | UserEmail | `usr_email/{email}` |
//! | Settings | `u/{userId}/settings` |
//! | Category | `u/{userId}/mod/{module}/cat/{categoryId}` |
//! | LegacyCategory | `u/{userId}/cat/{categoryId}` |
//! | Contract | `u/{userId}/con/{contractId}` |
//! | Purchase | `u/{userId}/pur/{purchaseId}` |
//! | Vehicle | `u/{userId}/veh/{vehicleId}` |
//! | CostEntry | `u/{userId}/veh/{vehicleId}/cost/{costId}` |
//! | ContractIndex | `u/{userId}/idx/cat_con/{categoryId}/{contractId}` |
//! | PurchaseIndex | `u/{userId}/idx/cat_pur/{categoryId}/{purchaseId}` |
//! | SchemaVersion | `_meta/schema_version` |

use crate::errors::Result;
use hoard_core::errors::HoardError;
use std::fmt;
use uuid::Uuid;

/// Segment separator
pub const SEPARATOR: char = '/';

/// Prefix shared by every user record
pub const USERS_PREFIX: &[u8] = b"usr/";

/// Prefix shared by every per-user key
pub const USER_SCOPED_PREFIX: &[u8] = b"u/";

/// Key of the schema version marker
pub const SCHEMA_VERSION_KEY: &[u8] = b"_meta/schema_version";

const EMAIL_PREFIX: &str = "usr_email/";

/// Which parent/child relation an index key belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexKind {
    CategoryContracts,
    CategoryPurchases,
}

impl IndexKind {
    /// The literal segment naming this index in the key layout
    pub fn tag(&self) -> &'static str {
        match self {
            IndexKind::CategoryContracts => "cat_con",
            IndexKind::CategoryPurchases => "cat_pur",
        }
    }

    fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "cat_con" => Some(IndexKind::CategoryContracts),
            "cat_pur" => Some(IndexKind::CategoryPurchases),
            _ => None,
        }
    }
}

/// Coarse classification of a key, used for census and filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum KeyFamily {
    User,
    UserEmail,
    Settings,
    Category,
    LegacyCategory,
    Contract,
    Purchase,
    Vehicle,
    CostEntry,
    ContractIndex,
    PurchaseIndex,
    SchemaVersion,
}

impl KeyFamily {
    pub const ALL: [KeyFamily; 12] = [
        KeyFamily::User,
        KeyFamily::UserEmail,
        KeyFamily::Settings,
        KeyFamily::Category,
        KeyFamily::LegacyCategory,
        KeyFamily::Contract,
        KeyFamily::Purchase,
        KeyFamily::Vehicle,
        KeyFamily::CostEntry,
        KeyFamily::ContractIndex,
        KeyFamily::PurchaseIndex,
        KeyFamily::SchemaVersion,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            KeyFamily::User => "user",
            KeyFamily::UserEmail => "user_email",
            KeyFamily::Settings => "settings",
            KeyFamily::Category => "category",
            KeyFamily::LegacyCategory => "legacy_category",
            KeyFamily::Contract => "contract",
            KeyFamily::Purchase => "purchase",
            KeyFamily::Vehicle => "vehicle",
            KeyFamily::CostEntry => "cost_entry",
            KeyFamily::ContractIndex => "contract_index",
            KeyFamily::PurchaseIndex => "purchase_index",
            KeyFamily::SchemaVersion => "schema_version",
        }
    }
}

impl fmt::Display for KeyFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A structured store key borrowing its segments
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key<'a> {
    User {
        user_id: &'a str,
    },
    UserEmail {
        email: &'a str,
    },
    Settings {
        user_id: &'a str,
    },
    Category {
        user_id: &'a str,
        module: &'a str,
        category_id: &'a str,
    },
    /// Category layout used before module scoping existed
    LegacyCategory {
        user_id: &'a str,
        category_id: &'a str,
    },
    Contract {
        user_id: &'a str,
        contract_id: &'a str,
    },
    Purchase {
        user_id: &'a str,
        purchase_id: &'a str,
    },
    Vehicle {
        user_id: &'a str,
        vehicle_id: &'a str,
    },
    CostEntry {
        user_id: &'a str,
        vehicle_id: &'a str,
        cost_id: &'a str,
    },
    Index {
        kind: IndexKind,
        user_id: &'a str,
        parent_id: &'a str,
        child_id: &'a str,
    },
    SchemaVersion,
}

impl<'a> Key<'a> {
    /// Validate every segment and render the key
    ///
    /// # Errors
    ///
    /// `InvalidInput` if an id, user id or module segment is empty or
    /// contains `/`, or if an email is empty.
    pub fn encode(&self) -> Result<Vec<u8>> {
        self.validate()?;
        Ok(self.render())
    }

    /// Parse a raw key into exactly one family
    ///
    /// Returns `None` for anything that does not match a known layout
    /// segment for segment.
    pub fn parse(raw: &'a [u8]) -> Option<Key<'a>> {
        let text = std::str::from_utf8(raw).ok()?;

        if let Some(email) = text.strip_prefix(EMAIL_PREFIX) {
            return (!email.is_empty()).then_some(Key::UserEmail { email });
        }

        let segments: Vec<&'a str> = text.split(SEPARATOR).collect();
        if segments.iter().any(|s| s.is_empty()) {
            return None;
        }

        let key = match segments[..] {
            ["_meta", "schema_version"] => Key::SchemaVersion,
            ["usr", user_id] => Key::User { user_id },
            ["u", user_id, "settings"] => Key::Settings { user_id },
            ["u", user_id, "mod", module, "cat", category_id] => Key::Category {
                user_id,
                module,
                category_id,
            },
            ["u", user_id, "cat", category_id] => Key::LegacyCategory {
                user_id,
                category_id,
            },
            ["u", user_id, "con", contract_id] => Key::Contract {
                user_id,
                contract_id,
            },
            ["u", user_id, "pur", purchase_id] => Key::Purchase {
                user_id,
                purchase_id,
            },
            ["u", user_id, "veh", vehicle_id] => Key::Vehicle {
                user_id,
                vehicle_id,
            },
            ["u", user_id, "veh", vehicle_id, "cost", cost_id] => Key::CostEntry {
                user_id,
                vehicle_id,
                cost_id,
            },
            ["u", user_id, "idx", tag, parent_id, child_id] => Key::Index {
                kind: IndexKind::from_tag(tag)?,
                user_id,
                parent_id,
                child_id,
            },
            _ => return None,
        };
        Some(key)
    }

    pub fn family(&self) -> KeyFamily {
        match self {
            Key::User { .. } => KeyFamily::User,
            Key::UserEmail { .. } => KeyFamily::UserEmail,
            Key::Settings { .. } => KeyFamily::Settings,
            Key::Category { .. } => KeyFamily::Category,
            Key::LegacyCategory { .. } => KeyFamily::LegacyCategory,
            Key::Contract { .. } => KeyFamily::Contract,
            Key::Purchase { .. } => KeyFamily::Purchase,
            Key::Vehicle { .. } => KeyFamily::Vehicle,
            Key::CostEntry { .. } => KeyFamily::CostEntry,
            Key::Index {
                kind: IndexKind::CategoryContracts,
                ..
            } => KeyFamily::ContractIndex,
            Key::Index {
                kind: IndexKind::CategoryPurchases,
                ..
            } => KeyFamily::PurchaseIndex,
            Key::SchemaVersion => KeyFamily::SchemaVersion,
        }
    }

    fn validate(&self) -> Result<()> {
        match *self {
            Key::User { user_id } | Key::Settings { user_id } => {
                validate_segment("user id", user_id)
            }
            Key::UserEmail { email } => {
                if email.is_empty() {
                    Err(invalid("email", email))
                } else {
                    Ok(())
                }
            }
            Key::Category {
                user_id,
                module,
                category_id,
            } => {
                validate_segment("user id", user_id)?;
                validate_segment("module", module)?;
                validate_segment("category id", category_id)
            }
            Key::LegacyCategory {
                user_id,
                category_id,
            } => {
                validate_segment("user id", user_id)?;
                validate_segment("category id", category_id)
            }
            Key::Contract {
                user_id,
                contract_id: id,
            }
            | Key::Purchase {
                user_id,
                purchase_id: id,
            }
            | Key::Vehicle {
                user_id,
                vehicle_id: id,
            } => {
                validate_segment("user id", user_id)?;
                validate_segment("entity id", id)
            }
            Key::CostEntry {
                user_id,
                vehicle_id,
                cost_id,
            } => {
                validate_segment("user id", user_id)?;
                validate_segment("vehicle id", vehicle_id)?;
                validate_segment("cost entry id", cost_id)
            }
            Key::Index {
                user_id,
                parent_id,
                child_id,
                ..
            } => {
                validate_segment("user id", user_id)?;
                validate_segment("index parent id", parent_id)?;
                validate_segment("index child id", child_id)
            }
            Key::SchemaVersion => Ok(()),
        }
    }

    /// Render without validation; only reachable with checked segments
    pub(crate) fn render(&self) -> Vec<u8> {
        let text = match self {
            Key::User { user_id } => format!("usr/{}", user_id),
            Key::UserEmail { email } => format!("{}{}", EMAIL_PREFIX, email),
            Key::Settings { user_id } => format!("u/{}/settings", user_id),
            Key::Category {
                user_id,
                module,
                category_id,
            } => format!("u/{}/mod/{}/cat/{}", user_id, module, category_id),
            Key::LegacyCategory {
                user_id,
                category_id,
            } => format!("u/{}/cat/{}", user_id, category_id),
            Key::Contract {
                user_id,
                contract_id,
            } => format!("u/{}/con/{}", user_id, contract_id),
            Key::Purchase {
                user_id,
                purchase_id,
            } => format!("u/{}/pur/{}", user_id, purchase_id),
            Key::Vehicle {
                user_id,
                vehicle_id,
            } => format!("u/{}/veh/{}", user_id, vehicle_id),
            Key::CostEntry {
                user_id,
                vehicle_id,
                cost_id,
            } => format!("u/{}/veh/{}/cost/{}", user_id, vehicle_id, cost_id),
            Key::Index {
                kind,
                user_id,
                parent_id,
                child_id,
            } => format!(
                "u/{}/idx/{}/{}/{}",
                user_id,
                kind.tag(),
                parent_id,
                child_id
            ),
            Key::SchemaVersion => return SCHEMA_VERSION_KEY.to_vec(),
        };
        text.into_bytes()
    }
}

/// Check that `value` can be used as a single key segment
///
/// # Errors
///
/// `InvalidInput` when `value` is empty or contains `/`.
pub fn validate_segment(what: &'static str, value: &str) -> Result<()> {
    if value.is_empty() || value.contains(SEPARATOR) {
        return Err(invalid(what, value));
    }
    Ok(())
}

fn invalid(what: &'static str, value: &str) -> hoard_core::errors::HxError {
    HoardError::InvalidSegment {
        what,
        value: value.to_string(),
    }
    .into()
}

/// Key of the email → user id lookup
pub fn user_email_key(email: &str) -> Result<Vec<u8>> {
    Key::UserEmail { email }.encode()
}

/// Key of a user record
pub fn user_key(id: &Uuid) -> Vec<u8> {
    let id = id.to_string();
    Key::User { user_id: &id }.render()
}

/// A validated user id, producing every key and prefix under `u/{userId}/`
///
/// Entity ids are UUIDs, whose text form never contains the separator, so
/// once the user id is checked no further validation is needed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserScope {
    user_id: String,
}

impl UserScope {
    /// # Errors
    ///
    /// `InvalidInput` if `user_id` is empty or contains `/`.
    pub fn new(user_id: &str) -> Result<Self> {
        validate_segment("user id", user_id)?;
        Ok(Self {
            user_id: user_id.to_string(),
        })
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Narrow to one module namespace
    ///
    /// # Errors
    ///
    /// `InvalidInput` if `module` is empty or contains `/`.
    pub fn module(&self, module: &str) -> Result<ModuleScope> {
        validate_segment("module", module)?;
        Ok(ModuleScope {
            user: self.clone(),
            module: module.to_string(),
        })
    }

    /// `u/{userId}/`
    pub fn prefix(&self) -> Vec<u8> {
        format!("u/{}/", self.user_id).into_bytes()
    }

    pub fn settings(&self) -> Vec<u8> {
        Key::Settings {
            user_id: &self.user_id,
        }
        .render()
    }

    pub fn contract(&self, id: &Uuid) -> Vec<u8> {
        let id = id.to_string();
        Key::Contract {
            user_id: &self.user_id,
            contract_id: &id,
        }
        .render()
    }

    pub fn contracts_prefix(&self) -> Vec<u8> {
        format!("u/{}/con/", self.user_id).into_bytes()
    }

    pub fn purchase(&self, id: &Uuid) -> Vec<u8> {
        let id = id.to_string();
        Key::Purchase {
            user_id: &self.user_id,
            purchase_id: &id,
        }
        .render()
    }

    pub fn purchases_prefix(&self) -> Vec<u8> {
        format!("u/{}/pur/", self.user_id).into_bytes()
    }

    pub fn vehicle(&self, id: &Uuid) -> Vec<u8> {
        let id = id.to_string();
        Key::Vehicle {
            user_id: &self.user_id,
            vehicle_id: &id,
        }
        .render()
    }

    /// `u/{userId}/veh/`, which also covers every cost entry
    pub fn vehicles_prefix(&self) -> Vec<u8> {
        format!("u/{}/veh/", self.user_id).into_bytes()
    }

    pub fn cost_entry(&self, vehicle_id: &Uuid, cost_id: &Uuid) -> Vec<u8> {
        let vehicle_id = vehicle_id.to_string();
        let cost_id = cost_id.to_string();
        Key::CostEntry {
            user_id: &self.user_id,
            vehicle_id: &vehicle_id,
            cost_id: &cost_id,
        }
        .render()
    }

    pub fn cost_entries_prefix(&self, vehicle_id: &Uuid) -> Vec<u8> {
        format!("u/{}/veh/{}/cost/", self.user_id, vehicle_id).into_bytes()
    }

    pub fn index(&self, kind: IndexKind, parent_id: &Uuid, child_id: &Uuid) -> Vec<u8> {
        let parent_id = parent_id.to_string();
        let child_id = child_id.to_string();
        Key::Index {
            kind,
            user_id: &self.user_id,
            parent_id: &parent_id,
            child_id: &child_id,
        }
        .render()
    }

    /// `u/{userId}/idx/{tag}/{parentId}/`
    pub fn index_prefix(&self, kind: IndexKind, parent_id: &Uuid) -> Vec<u8> {
        format!("u/{}/idx/{}/{}/", self.user_id, kind.tag(), parent_id).into_bytes()
    }
}

/// A validated `(user, module)` pair for category keys
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleScope {
    user: UserScope,
    module: String,
}

impl ModuleScope {
    pub fn user(&self) -> &UserScope {
        &self.user
    }

    pub fn module(&self) -> &str {
        &self.module
    }

    pub fn category(&self, id: &Uuid) -> Vec<u8> {
        let id = id.to_string();
        Key::Category {
            user_id: &self.user.user_id,
            module: &self.module,
            category_id: &id,
        }
        .render()
    }

    pub fn categories_prefix(&self) -> Vec<u8> {
        format!("u/{}/mod/{}/cat/", self.user.user_id, self.module).into_bytes()
    }
}
