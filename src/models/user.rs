//! User model for storage and API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

/// Characters allowed in a username besides ASCII letters and digits.
const USERNAME_SYMBOLS: &[char] = &['@', '.', '+', '-', '_'];

/// User record stored by the identity service.
#[derive(Debug, Clone)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: Option<String>,
    /// Argon2 PHC string; never leaves the identity service
    pub password_hash: String,
    pub date_joined: DateTime<Utc>,
}

/// Public view of a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct UserProfile {
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub id: i64,
    pub username: String,
    pub email: Option<String>,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
        }
    }
}

/// Registration request body.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewUser {
    #[validate(length(
        min = 1,
        max = 150,
        message = "Username must be between 1 and 150 characters"
    ))]
    pub username: String,

    #[validate(length(min = 1, message = "Password cannot be empty"))]
    pub password: String,

    /// Password confirmation
    pub password2: String,

    /// Blank strings deserialize as `None`
    #[validate(email(message = "Enter a valid email address"))]
    #[serde(default, deserialize_with = "blank_as_none")]
    pub email: Option<String>,
}

fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

impl NewUser {
    /// Checks the derive cannot express: username charset and password match.
    pub fn check_consistency(&self) -> Result<(), String> {
        let valid_chars = self
            .username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || USERNAME_SYMBOLS.contains(&c));
        if !valid_chars {
            return Err(
                "Username may contain only letters, digits and @/./+/-/_ characters".to_string(),
            );
        }

        if self.password != self.password2 {
            return Err("Passwords do not match".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(username: &str, password: &str, password2: &str) -> NewUser {
        NewUser {
            username: username.to_string(),
            password: password.to_string(),
            password2: password2.to_string(),
            email: None,
        }
    }

    #[test]
    fn test_valid_registration() {
        let user = new_user("alice", "pw1", "pw1");
        assert!(user.validate().is_ok());
        assert!(user.check_consistency().is_ok());
    }

    #[test]
    fn test_password_mismatch() {
        let user = new_user("alice", "pw1", "pw2");
        assert!(user.check_consistency().is_err());
    }

    #[test]
    fn test_username_charset() {
        assert!(new_user("a.b+c@d-e_f", "x", "x").check_consistency().is_ok());
        assert!(new_user("has space", "x", "x").check_consistency().is_err());
        assert!(new_user("semi;colon", "x", "x").check_consistency().is_err());
    }

    #[test]
    fn test_email_validation() {
        let mut user = new_user("alice", "pw1", "pw1");
        user.email = Some("not-an-email".to_string());
        assert!(user.validate().is_err());

        user.email = Some("alice@example.com".to_string());
        assert!(user.validate().is_ok());
    }

    #[test]
    fn test_blank_email_deserializes_as_none() {
        let user: NewUser = serde_json::from_str(
            r#"{"username":"alice","password":"pw1","password2":"pw1","email":"  "}"#,
        )
        .unwrap();
        assert!(user.email.is_none());
        assert!(user.validate().is_ok());

        let user: NewUser =
            serde_json::from_str(r#"{"username":"alice","password":"pw1","password2":"pw1"}"#)
                .unwrap();
        assert!(user.email.is_none());
    }

    #[test]
    fn test_profile_hides_password_hash() {
        let user = User {
            id: 1,
            username: "alice".to_string(),
            email: None,
            password_hash: "$argon2id$secret".to_string(),
            date_joined: Utc::now(),
        };

        let json = serde_json::to_string(&UserProfile::from(&user)).unwrap();
        assert!(!json.contains("argon2"));
        assert!(json.contains("\"username\":\"alice\""));
    }
}
