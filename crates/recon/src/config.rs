use serde::{Deserialize, Serialize};

use crate::error::ReconError;
use crate::model::Role;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Tunables for one comparison run. Every field has a default, so an empty
/// TOML document is a valid config.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LinkConfig {
    pub roles: RoleConfig,
    pub join: JoinConfig,
}

// ---------------------------------------------------------------------------
// Roles
// ---------------------------------------------------------------------------

/// Header substrings that mark a column as holding a role.
/// Matched against trimmed, lower-cased headers.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RoleConfig {
    pub name: Vec<String>,
    pub phone: Vec<String>,
}

impl Default for RoleConfig {
    fn default() -> Self {
        Self {
            name: vec!["name".into()],
            phone: vec!["mobile".into(), "phone".into()],
        }
    }
}

impl RoleConfig {
    pub fn substrings(&self, role: Role) -> &[String] {
        match role {
            Role::Name => &self.name,
            Role::Phone => &self.phone,
        }
    }
}

// ---------------------------------------------------------------------------
// Join
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct JoinConfig {
    /// Appended to colliding column names from the first table.
    pub left_suffix: String,
    /// Appended to colliding column names from the second table.
    pub right_suffix: String,
    /// Placed between the name and phone parts of a combined key.
    pub key_separator: String,
    /// Number of trailing digits kept from a phone number.
    pub phone_digits: usize,
    /// Drop rows with an empty key (or empty sub-key) before joining.
    /// Off by default: blank keys on both sides match each other.
    pub skip_blank_keys: bool,
}

impl Default for JoinConfig {
    fn default() -> Self {
        Self {
            left_suffix: "_file1".into(),
            right_suffix: "_file2".into(),
            key_separator: "__".into(),
            phone_digits: 10,
            skip_blank_keys: false,
        }
    }
}

impl LinkConfig {
    pub fn from_toml(input: &str) -> Result<Self, ReconError> {
        let config: LinkConfig =
            toml::from_str(input).map_err(|e| ReconError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        for role in [Role::Name, Role::Phone] {
            let subs = self.roles.substrings(role);
            if subs.is_empty() {
                return Err(ReconError::ConfigValidation(format!(
                    "roles.{role}: at least one substring is required"
                )));
            }
            if let Some(bad) = subs.iter().find(|s| s.trim().is_empty()) {
                return Err(ReconError::ConfigValidation(format!(
                    "roles.{role}: blank substring {bad:?}"
                )));
            }
            if let Some(bad) = subs.iter().find(|s| s.trim().to_lowercase() != **s) {
                return Err(ReconError::ConfigValidation(format!(
                    "roles.{role}: substring {bad:?} must be trimmed lower case"
                )));
            }
        }

        let join = &self.join;
        if join.left_suffix.is_empty() || join.right_suffix.is_empty() {
            return Err(ReconError::ConfigValidation(
                "join suffixes must not be empty".into(),
            ));
        }
        if join.left_suffix == join.right_suffix {
            return Err(ReconError::ConfigValidation(format!(
                "join suffixes must differ, both are {:?}",
                join.left_suffix
            )));
        }
        if join.phone_digits == 0 {
            return Err(ReconError::ConfigValidation(
                "join.phone_digits must be at least 1".into(),
            ));
        }

        Ok(())
    }
}
