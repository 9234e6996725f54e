//! Validation coverage for user newtypes.

use super::*;
use crate::domain::ErrorCode;
use rstest::rstest;
use serde_json::json;

#[rstest]
#[case("chef.anna")]
#[case("a+b@c-d_e")]
#[case("Иван")]
fn username_accepts_word_characters(#[case] raw: &str) {
    let username = Username::new(raw).expect("valid username");
    assert_eq!(username.as_ref(), raw);
}

#[rstest]
#[case("", UserValidationError::EmptyUsername)]
#[case("with space", UserValidationError::UsernameInvalidCharacters)]
#[case("semi;colon", UserValidationError::UsernameInvalidCharacters)]
#[case("me", UserValidationError::UsernameReserved)]
fn username_rejects_invalid_input(#[case] raw: &str, #[case] expected: UserValidationError) {
    assert_eq!(Username::new(raw), Err(expected));
}

#[rstest]
fn username_rejects_overlong_input() {
    let raw = "a".repeat(USERNAME_MAX + 1);
    assert_eq!(
        Username::new(raw),
        Err(UserValidationError::UsernameTooLong { max: USERNAME_MAX })
    );
}

#[rstest]
fn email_lowercases_domain_only() {
    let email = EmailAddress::new(" Anna@Example.COM ").expect("valid email");
    assert_eq!(email.as_ref(), "Anna@example.com");
}

#[rstest]
#[case("")]
#[case("no-at-sign")]
#[case("two@@example.com")]
#[case("user@nodot")]
fn email_rejects_malformed_addresses(#[case] raw: &str) {
    assert!(EmailAddress::new(raw).is_err());
}

#[rstest]
fn person_name_reports_field() {
    let err = PersonName::new("last_name", "  ").expect_err("blank name");
    assert_eq!(err.field(), "last_name");
}

#[rstest]
#[case("short", UserValidationError::PasswordTooShort { min: PASSWORD_MIN })]
#[case("1234567890", UserValidationError::PasswordNumeric)]
fn password_policy_rejects_weak_passwords(
    #[case] raw: &str,
    #[case] expected: UserValidationError,
) {
    assert_eq!(Password::new(raw).map(|_| ()), Err(expected));
}

#[rstest]
fn password_debug_is_redacted() {
    let password = Password::new("s3cret-pass").expect("strong password");
    assert!(!format!("{password:?}").contains("s3cret"));
}

#[rstest]
fn validation_error_maps_to_invalid_request_with_field() {
    let error: Error = UserValidationError::UsernameReserved.into();
    assert_eq!(error.code(), ErrorCode::InvalidRequest);
    assert_eq!(
        error.details(),
        Some(&json!({"field": "username", "code": "reserved"}))
    );
}

#[rstest]
fn registration_validates_every_field() {
    let result =
        UserRegistration::try_from_parts("a@b.io", "anna", "Anna", "", "long-enough-pass");
    assert_eq!(
        result.map(|_| ()),
        Err(UserValidationError::EmptyPersonName { field: "last_name" })
    );
}
