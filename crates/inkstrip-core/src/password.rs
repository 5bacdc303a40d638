use snafu::Snafu;

pub const MIN_PASSWORD_LEN: usize = 8;

/// Why a password was refused at registration
#[derive(Debug, Snafu, PartialEq, Eq)]
pub enum WeakPasswordError {
    #[snafu(display("Password must be at least {MIN_PASSWORD_LEN} characters long"))]
    TooShort,
    #[snafu(display("Password must contain a digit"))]
    NoDigit,
    #[snafu(display("Password must contain an uppercase letter"))]
    NoUppercase,
    #[snafu(display("Password must contain a lowercase letter"))]
    NoLowercase,
}

/// Registration password policy: at least [`MIN_PASSWORD_LEN`] characters,
/// with a digit, an uppercase and a lowercase letter.
pub fn check_password_strength(password: &str) -> Result<(), WeakPasswordError> {
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return NoDigitSnafu.fail();
    }
    if !password.chars().any(char::is_uppercase) {
        return NoUppercaseSnafu.fail();
    }
    if !password.chars().any(char::is_lowercase) {
        return NoLowercaseSnafu.fail();
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return TooShortSnafu.fail();
    }
    Ok(())
}
