//! User data model.
//!
//! Users authenticate with their email address and publish recipes under
//! their username. Every string attribute is a validated newtype so
//! adapters cannot construct a [`User`] that violates the storage limits.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use zeroize::Zeroizing;

use crate::domain::Error;

/// Maximum length of a username.
pub const USERNAME_MAX: usize = 150;
/// Maximum length of an email address.
pub const EMAIL_MAX: usize = 254;
/// Maximum length of first and last names.
pub const PERSON_NAME_MAX: usize = 150;
/// Minimum length of a password.
pub const PASSWORD_MIN: usize = 8;

/// Username reserved for the "current user" route.
const RESERVED_USERNAME: &str = "me";

/// Validation errors raised by the user newtypes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    #[error("username must not be empty")]
    EmptyUsername,
    #[error("username must be at most {max} characters")]
    UsernameTooLong { max: usize },
    #[error("username may only contain letters, digits and @/./+/-/_")]
    UsernameInvalidCharacters,
    #[error("username \"me\" is reserved")]
    UsernameReserved,
    #[error("email must not be empty")]
    EmptyEmail,
    #[error("email must be at most {max} characters")]
    EmailTooLong { max: usize },
    #[error("email address is not valid")]
    EmailInvalid,
    #[error("{field} must not be empty")]
    EmptyPersonName { field: &'static str },
    #[error("{field} must be at most {max} characters")]
    PersonNameTooLong { field: &'static str, max: usize },
    #[error("password must be at least {min} characters")]
    PasswordTooShort { min: usize },
    #[error("password must not be entirely numeric")]
    PasswordNumeric,
}

impl UserValidationError {
    /// Request field the failure refers to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptyUsername
            | Self::UsernameTooLong { .. }
            | Self::UsernameInvalidCharacters
            | Self::UsernameReserved => "username",
            Self::EmptyEmail | Self::EmailTooLong { .. } | Self::EmailInvalid => "email",
            Self::EmptyPersonName { field } | Self::PersonNameTooLong { field, .. } => field,
            Self::PasswordTooShort { .. } | Self::PasswordNumeric => "password",
        }
    }

    fn reason(&self) -> &'static str {
        match self {
            Self::EmptyUsername | Self::EmptyEmail | Self::EmptyPersonName { .. } => "blank",
            Self::UsernameTooLong { .. }
            | Self::EmailTooLong { .. }
            | Self::PersonNameTooLong { .. } => "max_length",
            Self::PasswordTooShort { .. } => "min_length",
            Self::UsernameReserved => "reserved",
            Self::PasswordNumeric => "numeric",
            Self::UsernameInvalidCharacters | Self::EmailInvalid => "invalid",
        }
    }
}

impl From<UserValidationError> for Error {
    fn from(value: UserValidationError) -> Self {
        Error::invalid_field(value.field(), value.reason(), value.to_string())
    }
}

/// Stable numeric user identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UserId(i64);

impl UserId {
    /// Wrap a database identifier.
    #[rustfmt::skip]
    pub const fn new(id: i64) -> Self { Self(id) }

    /// Raw identifier value.
    #[rustfmt::skip]
    pub const fn get(self) -> i64 { self.0 }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn username_regex() -> &'static Regex {
    static USERNAME_RE: OnceLock<Regex> = OnceLock::new();
    USERNAME_RE.get_or_init(|| {
        Regex::new(r"^[\w.@+-]+$")
            .unwrap_or_else(|error| panic!("username regex failed to compile: {error}"))
    })
}

fn email_regex() -> &'static Regex {
    static EMAIL_RE: OnceLock<Regex> = OnceLock::new();
    EMAIL_RE.get_or_init(|| {
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$")
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

macro_rules! string_newtype {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name(String);

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.0.as_str()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

string_newtype! {
    /// Public handle, unique across users.
    Username
}

impl Username {
    /// Validate and construct a [`Username`].
    pub fn new(raw: impl Into<String>) -> Result<Self, UserValidationError> {
        let value = raw.into();
        if value.is_empty() {
            return Err(UserValidationError::EmptyUsername);
        }
        if value.chars().count() > USERNAME_MAX {
            return Err(UserValidationError::UsernameTooLong { max: USERNAME_MAX });
        }
        if !username_regex().is_match(&value) {
            return Err(UserValidationError::UsernameInvalidCharacters);
        }
        if value == RESERVED_USERNAME {
            return Err(UserValidationError::UsernameReserved);
        }
        Ok(Self(value))
    }
}

string_newtype! {
    /// Login identifier, unique across users.
    EmailAddress
}

impl EmailAddress {
    /// Validate and construct an [`EmailAddress`].
    ///
    /// The domain part is lowercased; the local part is kept as supplied.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        if trimmed.chars().count() > EMAIL_MAX {
            return Err(UserValidationError::EmailTooLong { max: EMAIL_MAX });
        }
        if !email_regex().is_match(trimmed) {
            return Err(UserValidationError::EmailInvalid);
        }
        let normalised = match trimmed.rsplit_once('@') {
            Some((local, domain)) => format!("{local}@{}", domain.to_lowercase()),
            None => return Err(UserValidationError::EmailInvalid),
        };
        Ok(Self(normalised))
    }
}

string_newtype! {
    /// First or last name of a user.
    PersonName
}

impl PersonName {
    /// Validate a name supplied for `field` (`first_name` or `last_name`).
    pub fn new(field: &'static str, raw: impl Into<String>) -> Result<Self, UserValidationError> {
        let value = raw.into();
        if value.trim().is_empty() {
            return Err(UserValidationError::EmptyPersonName { field });
        }
        if value.chars().count() > PERSON_NAME_MAX {
            return Err(UserValidationError::PersonNameTooLong {
                field,
                max: PERSON_NAME_MAX,
            });
        }
        Ok(Self(value))
    }
}

/// Plain-text password held only long enough to hash or verify it.
///
/// The buffer is zeroed on drop.
#[derive(Clone)]
pub struct Password(Zeroizing<String>);

impl Password {
    /// Wrap a password without applying the strength policy.
    ///
    /// Used for login and for checking the current password.
    pub fn unchecked(raw: impl Into<String>) -> Self {
        Self(Zeroizing::new(raw.into()))
    }

    /// Wrap a new password after applying the strength policy.
    pub fn new(raw: impl Into<String>) -> Result<Self, UserValidationError> {
        let value = Zeroizing::new(raw.into());
        if value.chars().count() < PASSWORD_MIN {
            return Err(UserValidationError::PasswordTooShort { min: PASSWORD_MIN });
        }
        if value.chars().all(|c| c.is_ascii_digit()) {
            return Err(UserValidationError::PasswordNumeric);
        }
        Ok(Self(value))
    }

    /// Expose the secret for hashing.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(**redacted**)")
    }
}

/// Application user as stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub email: EmailAddress,
    pub username: Username,
    pub first_name: PersonName,
    pub last_name: PersonName,
    /// Public URL of the avatar image, if one was uploaded.
    pub avatar: Option<String>,
}

/// A user as seen by a particular viewer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub user: User,
    /// Whether the viewer follows this user. Always false for anonymous viewers.
    pub is_subscribed: bool,
}

/// Validated sign-up request.
#[derive(Debug, Clone)]
pub struct UserRegistration {
    pub email: EmailAddress,
    pub username: Username,
    pub first_name: PersonName,
    pub last_name: PersonName,
    pub password: Password,
}

impl UserRegistration {
    /// Validate raw registration fields.
    pub fn try_from_parts(
        email: &str,
        username: &str,
        first_name: &str,
        last_name: &str,
        password: &str,
    ) -> Result<Self, UserValidationError> {
        Ok(Self {
            email: EmailAddress::new(email)?,
            username: Username::new(username)?,
            first_name: PersonName::new("first_name", first_name)?,
            last_name: PersonName::new("last_name", last_name)?,
            password: Password::new(password)?,
        })
    }
}

/// Row data handed to the repository when creating a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub email: EmailAddress,
    pub username: Username,
    pub first_name: PersonName,
    pub last_name: PersonName,
    pub password_hash: String,
}

/// Stored credentials of a user, used by the login flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserCredentials {
    pub id: UserId,
    pub password_hash: String,
}

#[cfg(test)]
mod tests;
