use std::sync::LazyLock;

use regex::Regex;

use crate::result::ValidationError;

/**
    The minimum number of characters in an account password.
*/
pub const MIN_PASSWORD_LEN: usize = 8;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is a valid regex")
});

/**
    Checks that the given email address looks valid, returning it trimmed.

    This is a format check only - it does not guarantee deliverability.

    # Errors

    - If the address, after trimming, does not look like an email address.
*/
pub fn validate_email(email: &str) -> Result<String, ValidationError> {
    let email = email.trim();
    if email.is_empty() {
        return Err(ValidationError::MissingField { field: "email" });
    }
    if !EMAIL_PATTERN.is_match(email) {
        return Err(ValidationError::InvalidEmail(email.to_string()));
    }
    Ok(email.to_string())
}

/**
    Checks that the given password is long enough.

    # Errors

    - If the password has fewer than [`MIN_PASSWORD_LEN`] characters.
*/
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::PasswordTooShort {
            min: MIN_PASSWORD_LEN,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_emails() {
        const VALID: [&str; 4] = [
            "surveyor@example.com",
            "  padded@example.co.zw  ",
            "first.last+alerts@mail.example.org",
            "a@b.c",
        ];
        for email in VALID {
            assert_eq!(validate_email(email).as_deref(), Ok(email.trim()), "Email: {email}");
        }
    }

    #[test]
    fn invalid_emails() {
        const INVALID: [&str; 5] = [
            "not-an-email",
            "missing@tld",
            "two@@example.com",
            "spaces in@example.com",
            "@example.com",
        ];
        for email in INVALID {
            assert_eq!(
                validate_email(email),
                Err(ValidationError::InvalidEmail(email.to_string())),
                "Email: {email}"
            );
        }
        assert_eq!(
            validate_email("   "),
            Err(ValidationError::MissingField { field: "email" })
        );
    }

    #[test]
    fn passwords() {
        assert!(validate_password("12345678").is_ok());
        assert_eq!(
            validate_password("short"),
            Err(ValidationError::PasswordTooShort { min: 8 })
        );
    }
}
