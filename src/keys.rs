const MIN_KEY_LENGTH: usize = 32;

#[derive(Debug, thiserror::Error)]
pub enum KeyError {
    #[error("API key must be at least {} characters", MIN_KEY_LENGTH)]
    TooShort,
    #[error("API key contains whitespace")]
    Whitespace,
    #[error("API key must use the base64 or URL-safe base64 alphabet, found '{0}'")]
    IllegalCharacter(char),
}

/// Validates the bearer key required by the settings API.
pub fn check_key(key: &str) -> Result<(), KeyError> {
    if key.chars().any(char::is_whitespace) {
        return Err(KeyError::Whitespace);
    }
    if key.chars().count() < MIN_KEY_LENGTH {
        return Err(KeyError::TooShort);
    }
    match key.chars().find(|c| !is_key_char(*c)) {
        Some(c) => Err(KeyError::IllegalCharacter(c)),
        None => Ok(()),
    }
}

fn is_key_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '+' | '/' | '=' | '-' | '_')
}
