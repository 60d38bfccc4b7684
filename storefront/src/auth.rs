//! Mock login and registration.
//!
//! There is no credential store: any email/password pair logs in, and a
//! registration only has to be well-formed. Passwords are checked for
//! presence and dropped immediately.

use crate::error::StorefrontError;
use crate::types::{User, UserId};
use loket_core::environment::IdGenerator;
use serde::Deserialize;

/// Login form.
#[derive(Clone, Deserialize)]
pub struct LoginForm {
    /// Email address
    pub email: String,
    /// Password (never checked)
    pub password: String,
}

/// Registration form.
#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterForm {
    /// Display name
    pub name: String,
    /// Email address
    pub email: String,
    /// Password
    pub password: String,
    /// Password again
    pub confirm_password: String,
}

// Forms hold passwords; keep them out of logs.
impl std::fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginForm").field("email", &self.email).finish_non_exhaustive()
    }
}

impl std::fmt::Debug for RegisterForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterForm")
            .field("name", &self.name)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

fn require(field: &str, value: &str) -> Result<(), StorefrontError> {
    if value.trim().is_empty() {
        return Err(StorefrontError::MissingField {
            field: field.to_string(),
        });
    }
    Ok(())
}

fn new_user_id(ids: &dyn IdGenerator) -> UserId {
    UserId::new(format!("U-{}", ids.next_id().simple()))
}

/// Builds the session user for a login.
///
/// The display name is the local part of the email.
///
/// # Errors
///
/// Returns `MissingField` for a blank email or password.
pub fn login(form: &LoginForm, ids: &dyn IdGenerator) -> Result<User, StorefrontError> {
    require("email", &form.email)?;
    require("password", &form.password)?;

    let email = form.email.trim().to_string();
    let name = email.split('@').next().unwrap_or_default().to_string();

    Ok(User {
        id: new_user_id(ids),
        email,
        name,
    })
}

/// Builds the session user for a registration.
///
/// # Errors
///
/// - `MissingField` for a blank field
/// - `PasswordMismatch` when the confirmation differs
pub fn register(form: &RegisterForm, ids: &dyn IdGenerator) -> Result<User, StorefrontError> {
    require("name", &form.name)?;
    require("email", &form.email)?;
    require("password", &form.password)?;

    if form.password != form.confirm_password {
        return Err(StorefrontError::PasswordMismatch);
    }

    Ok(User {
        id: new_user_id(ids),
        email: form.email.trim().to_string(),
        name: form.name.trim().to_string(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use loket_testing::SequentialIdGenerator;

    fn registration(confirm: &str) -> RegisterForm {
        RegisterForm {
            name: "Sari Dewi".to_string(),
            email: "sari@example.com".to_string(),
            password: "rahasia123".to_string(),
            confirm_password: confirm.to_string(),
        }
    }

    #[test]
    fn test_login_derives_name_from_email() {
        let form = LoginForm {
            email: "budi.santoso@example.com".to_string(),
            password: "anything".to_string(),
        };
        let user = login(&form, &SequentialIdGenerator::new()).unwrap();

        assert_eq!(user.name, "budi.santoso");
        assert_eq!(user.id.as_str(), "U-00000000000000000000000000000001");
    }

    #[test]
    fn test_login_requires_fields() {
        let form = LoginForm {
            email: " ".to_string(),
            password: "x".to_string(),
        };
        assert_eq!(
            login(&form, &SequentialIdGenerator::new()),
            Err(StorefrontError::MissingField {
                field: "email".to_string()
            })
        );
    }

    #[test]
    fn test_register_password_mismatch() {
        let ids = SequentialIdGenerator::new();
        assert_eq!(
            register(&registration("rahasia124"), &ids),
            Err(StorefrontError::PasswordMismatch)
        );
        assert_eq!(ids.issued(), 0, "no user created");
    }

    #[test]
    fn test_register_success() {
        let user = register(&registration("rahasia123"), &SequentialIdGenerator::new()).unwrap();
        assert_eq!(user.name, "Sari Dewi");
        assert_eq!(user.email, "sari@example.com");
    }

    #[test]
    fn test_debug_hides_password() {
        let debug = format!("{:?}", registration("rahasia123"));
        assert!(!debug.contains("rahasia"));
    }
}
