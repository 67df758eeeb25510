use crate::ports::CredentialScanner;
use once_cell::sync::Lazy;
use regex::Regex;

/// Bot tokens: base64url user id, timestamp and HMAC joined by dots
static BOT_TOKEN_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[A-Za-z0-9_-]{24,28}\.[A-Za-z0-9_-]{6,7}\.[A-Za-z0-9_-]{27,}")
        .expect("bot token pattern is valid")
});

/// Default scanner that flags anything shaped like a bot token
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenPatternScanner;

impl CredentialScanner for TokenPatternScanner {
    fn contains_credential(&self, text: &str) -> bool {
        BOT_TOKEN_REGEX.is_match(text)
    }
}

/// Scanner that never reports a credential
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCredentials;

impl CredentialScanner for NoCredentials {
    fn contains_credential(&self, _text: &str) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detects_token_shape() {
        let text = "client.run('MjY3NjI0MzM1ODM2MDUzNTA2.GaXbYc.0123456789abcdefghijklmnopqrstu')";
        assert!(TokenPatternScanner.contains_credential(text));
    }

    #[test]
    fn test_ignores_dotted_code() {
        let text = "import os.path\nresult = obj.method().value\nprint(result)";
        assert!(!TokenPatternScanner.contains_credential(text));
        assert!(!NoCredentials.contains_credential(text));
    }
}
