//! Field validators for registration forms.
//!
//! Each validator returns the user-facing message on failure.

use once_cell::sync::Lazy;
use regex::Regex;

pub const REQUIRED: &str = "This field is required.";
pub const INVALID_EMAIL: &str = "Enter a valid email address.";

/// Upper bound for a whole address, independent of the column length.
const EMAIL_MAX_LENGTH: usize = 320;

static EMAIL_USER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^[-!#$%&'*+/=?^_`{}|~0-9A-Z]+(\.[-!#$%&'*+/=?^_`{}|~0-9A-Z]+)*$")
        .expect("email user pattern compiles")
});

static EMAIL_DOMAIN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:[A-Z0-9](?:[A-Z0-9-]{0,61}[A-Z0-9])?\.)+[A-Z0-9-]{1,62}[A-Z0-9]$")
        .expect("email domain pattern compiles")
});

const DOMAIN_ALLOWLIST: &[&str] = &["localhost"];

pub fn required(value: &str) -> Result<(), String> {
    if value.is_empty() {
        Err(REQUIRED.to_string())
    } else {
        Ok(())
    }
}

pub fn max_length(value: &str, max: usize) -> Result<(), String> {
    let len = value.chars().count();
    if len > max {
        Err(format!(
            "Ensure this value has at most {} characters (it has {}).",
            max, len
        ))
    } else {
        Ok(())
    }
}

pub fn email(value: &str) -> Result<(), String> {
    let invalid = || Err(INVALID_EMAIL.to_string());

    if value.chars().count() > EMAIL_MAX_LENGTH {
        return invalid();
    }
    let Some((user, domain)) = value.rsplit_once('@') else {
        return invalid();
    };
    if !EMAIL_USER.is_match(user) {
        return invalid();
    }
    if DOMAIN_ALLOWLIST.contains(&domain) || EMAIL_DOMAIN.is_match(domain) {
        return Ok(());
    }
    match idna_domain(domain) {
        Some(ascii) if EMAIL_DOMAIN.is_match(&ascii) => Ok(()),
        _ => invalid(),
    }
}

/// Punycode form of an internationalized domain, `None` for ASCII input or
/// labels IDNA refuses.
fn idna_domain(domain: &str) -> Option<String> {
    // Host parsing percent-decodes, which an address must not rely on.
    if domain.is_ascii() || domain.contains('%') {
        return None;
    }
    match url::Host::parse(domain) {
        Ok(url::Host::Domain(ascii)) => Some(ascii),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_rejects_empty() {
        assert_eq!(required(""), Err(REQUIRED.to_string()));
        assert!(required("x").is_ok());
    }

    #[test]
    fn max_length_counts_characters() {
        assert!(max_length("ééé", 3).is_ok());
        assert_eq!(
            max_length("abcd", 3),
            Err("Ensure this value has at most 3 characters (it has 4).".to_string())
        );
    }

    #[test]
    fn accepts_common_addresses() {
        for ok in [
            "ada@example.com",
            "first.last+tag@sub.example.co.uk",
            "o'brien@example.ie",
            "root@localhost",
            "x@xn--80ak6aa92e.com",
        ] {
            assert!(email(ok).is_ok(), "{ok} should be valid");
        }
    }

    #[test]
    fn accepts_internationalized_domains() {
        assert!(email("user@exämple.com").is_ok());
        assert!(email("ada@bücher.example.de").is_ok());
        assert!(idna_domain("exämple.com").is_some_and(|d| d.starts_with("xn--")));

        assert_eq!(email("user@exämple"), Err(INVALID_EMAIL.to_string()));
        assert_eq!(email("user@ex%C3%A4mple.com"), Err(INVALID_EMAIL.to_string()));
        assert_eq!(idna_domain("example.com"), None);
    }

    #[test]
    fn length_limit_counts_characters() {
        // Non-ASCII is only allowed in the domain.
        let domain = vec!["ä".repeat(20); 8].join(".");
        let address = format!("a@{domain}.com");
        assert!(address.len() > EMAIL_MAX_LENGTH);
        assert!(address.chars().count() <= EMAIL_MAX_LENGTH);
        assert!(email(&address).is_ok());

        let long = format!("a@{}.com", "b".repeat(EMAIL_MAX_LENGTH));
        assert_eq!(email(&long), Err(INVALID_EMAIL.to_string()));
    }

    #[test]
    fn rejects_malformed_addresses() {
        for bad in [
            "plainaddress",
            "@example.com",
            "ada@",
            "ada@example",
            "ada..lovelace@example.com",
            "ada@-example.com",
            "ada@example.c-",
            "ada lovelace@example.com",
        ] {
            assert_eq!(email(bad), Err(INVALID_EMAIL.to_string()), "{bad} should be invalid");
        }
    }
}
