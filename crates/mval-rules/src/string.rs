//! # String Rules
//!
//! Length, content and format checks for members whose value reads as
//! `&str`. Lengths are measured in `char`s.

use mval_core::{Arg, Error};
use mval_engine::MemberSpec;

use crate::messages;

const EMAIL_MIN_LEN: usize = 3;
const EMAIL_LOCAL_MAX_LEN: usize = 64;
const EMAIL_DOMAIN_MAX_LEN: usize = 255;

/// String checks on a member.
pub trait StringRules {
    /// The value has at least one character.
    fn not_empty(&mut self) -> &mut Self;

    /// The value has at least one non-whitespace character. The empty
    /// string passes; pair with [`not_empty`](Self::not_empty) to reject it.
    fn not_whitespace(&mut self) -> &mut Self;

    /// At least `min` characters.
    fn min_length(&mut self, min: usize) -> &mut Self;

    /// At most `max` characters.
    fn max_length(&mut self, max: usize) -> &mut Self;

    /// Between `min` and `max` characters, both inclusive.
    fn length_between(&mut self, min: usize, max: usize) -> &mut Self;

    /// A plausible email address, see [`is_email`].
    fn email(&mut self) -> &mut Self;

    /// The value contains `needle`.
    fn contains(&mut self, needle: impl Into<String>) -> &mut Self;
}

impl<M, V> StringRules for MemberSpec<M, V>
where
    M: 'static,
    V: AsRef<str> + 'static,
{
    fn not_empty(&mut self) -> &mut Self {
        self.rule_with_error(
            |v: &V| !v.as_ref().is_empty(),
            Error::new(messages::NOT_EMPTY),
        )
    }

    fn not_whitespace(&mut self) -> &mut Self {
        self.rule_with_error(
            |v: &V| {
                let s = v.as_ref();
                s.is_empty() || !s.trim().is_empty()
            },
            Error::new(messages::NOT_WHITESPACE),
        )
    }

    fn min_length(&mut self, min: usize) -> &mut Self {
        self.rule_with_error(
            move |v: &V| char_len(v.as_ref()) >= min,
            Error::with_args(messages::MIN_LENGTH, vec![Arg::number("min", min)]),
        )
    }

    fn max_length(&mut self, max: usize) -> &mut Self {
        self.rule_with_error(
            move |v: &V| char_len(v.as_ref()) <= max,
            Error::with_args(messages::MAX_LENGTH, vec![Arg::number("max", max)]),
        )
    }

    fn length_between(&mut self, min: usize, max: usize) -> &mut Self {
        self.rule_with_error(
            move |v: &V| (min..=max).contains(&char_len(v.as_ref())),
            Error::with_args(
                messages::LENGTH_BETWEEN,
                vec![Arg::number("min", min), Arg::number("max", max)],
            ),
        )
    }

    fn email(&mut self) -> &mut Self {
        self.rule_with_error(|v: &V| is_email(v.as_ref()), Error::new(messages::EMAIL))
    }

    fn contains(&mut self, needle: impl Into<String>) -> &mut Self {
        let needle = needle.into();
        let error = Error::with_args(messages::CONTAINS, vec![Arg::text("value", needle.clone())]);
        self.rule_with_error(move |v: &V| v.as_ref().contains(needle.as_str()), error)
    }
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Basic email shape check.
///
/// Accepts `local@domain` where:
/// - there is exactly one `@` and the whole address has at least 3 bytes;
/// - the local part is 1..=64 bytes of alphanumerics or `._-+`;
/// - the domain is 1..=255 bytes of alphanumerics, `.` or `-`, contains a
///   dot, has no `..`, and neither starts nor ends with `.` or `-`.
pub fn is_email(value: &str) -> bool {
    if value.len() < EMAIL_MIN_LEN {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if domain.contains('@') {
        return false;
    }

    let local_ok = !local.is_empty()
        && local.len() <= EMAIL_LOCAL_MAX_LEN
        && local
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '.' | '_' | '-' | '+'));
    if !local_ok {
        return false;
    }

    !domain.is_empty()
        && domain.len() <= EMAIL_DOMAIN_MAX_LEN
        && domain.contains('.')
        && !domain.contains("..")
        && !domain.starts_with(['.', '-'])
        && !domain.ends_with(['.', '-'])
        && domain
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '.' | '-'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mval_core::{ErrorsCollection, ExecutionOptions};
    use mval_engine::{compile, specification, ModelSpec};

    struct Account {
        login: String,
    }

    fn check<S>(login: &str, spec: S) -> ErrorsCollection
    where
        S: Fn(&mut MemberSpec<Account, String>) + Send + Sync + 'static,
    {
        let validator = compile(&specification(move |s: &mut ModelSpec<Account>| {
            s.member("login", |a| &a.login, |m| spec(m));
        }))
        .unwrap();
        let account = Account {
            login: login.to_string(),
        };
        validator
            .validate(&account, &ExecutionOptions::default())
            .unwrap()
    }

    fn rendered(result: &ErrorsCollection) -> Vec<String> {
        result
            .member("login")
            .map(|node| node.errors().iter().map(|e| e.render().unwrap()).collect())
            .unwrap_or_default()
    }

    #[test]
    fn test_is_email_accepts_common_addresses() {
        assert!(is_email("user@example.com"));
        assert!(is_email("first.last+tag@mail.example.org"));
        assert!(is_email("a_b-c@sub-domain.example.io"));
    }

    #[test]
    fn test_is_email_rejects_malformed_addresses() {
        for bad in [
            "a@@b",
            "a@b",
            "@example.com",
            "user@",
            "user@.example.com",
            "user@example.com.",
            "user@-example.com",
            "user@example..com",
            "us er@example.com",
            "user@exa_mple.com",
            "a@b@c.com",
            "",
        ] {
            assert!(!is_email(bad), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn test_is_email_enforces_part_lengths() {
        let local = "a".repeat(65);
        assert!(!is_email(&format!("{local}@example.com")));
        let local = "a".repeat(64);
        assert!(is_email(&format!("{local}@example.com")));
        let domain = format!("{}.com", "d".repeat(252));
        assert!(!is_email(&format!("a@{domain}")));
    }

    #[test]
    fn test_email_rule_reports_default_message() {
        let result = check("a@@b", |m| {
            m.email();
        });
        assert_eq!(rendered(&result), vec![messages::EMAIL.to_string()]);
    }

    #[test]
    fn test_not_empty_and_not_whitespace() {
        let result = check("", |m| {
            m.not_empty().not_whitespace();
        });
        assert_eq!(rendered(&result), vec![messages::NOT_EMPTY.to_string()]);

        let result = check("   ", |m| {
            m.not_empty().not_whitespace();
        });
        assert_eq!(rendered(&result), vec![messages::NOT_WHITESPACE.to_string()]);
    }

    #[test]
    fn test_length_rules_render_bounds() {
        let result = check("ab", |m| {
            m.min_length(3).max_length(1).length_between(5, 8);
        });
        assert_eq!(
            rendered(&result),
            vec![
                "Must be at least 3 characters in length".to_string(),
                "Must be at most 1 characters in length".to_string(),
                "Must be between 5 and 8 characters in length".to_string(),
            ]
        );
    }

    #[test]
    fn test_length_counts_chars_not_bytes() {
        let result = check("żółw", |m| {
            m.max_length(4);
        });
        assert!(result.is_empty());
    }

    #[test]
    fn test_contains_renders_needle_with_case_parameter() {
        let result = check("guest", |m| {
            m.contains("admin");
        });
        let login = result.member("login").unwrap();
        assert_eq!(login.errors()[0].render().unwrap(), "Must contain 'admin'");
        assert_eq!(
            login.errors()[0].render_as("Needs {value|case=upper}").unwrap(),
            "Needs ADMIN"
        );
    }

    #[test]
    fn test_with_message_keeps_rule_arguments() {
        let result = check("ab", |m| {
            m.min_length(6).with_message("Too short, need {min}");
        });
        assert_eq!(rendered(&result), vec!["Too short, need 6".to_string()]);
    }

    #[test]
    fn test_rules_apply_to_str_slices() {
        struct Static {
            code: &'static str,
        }
        let validator = compile(&specification(|s: &mut ModelSpec<Static>| {
            s.member("code", |c| &c.code, |m| {
                m.length_between(2, 3);
            });
        }))
        .unwrap();
        let result = validator
            .validate(&Static { code: "abcd" }, &ExecutionOptions::default())
            .unwrap();
        assert_eq!(result.error_count(), 1);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Generated well-formed addresses pass.
        #[test]
        fn generated_addresses_are_emails(
            local in "[a-z0-9][a-z0-9._+-]{0,20}",
            label in "[a-z0-9]{1,10}",
            tld in "[a-z]{2,6}",
        ) {
            let address = format!("{local}@{label}.{tld}");
            prop_assert!(is_email(&address));
        }

        /// Any string with two `@` is rejected.
        #[test]
        fn double_at_is_never_an_email(a in "[a-z.]{0,8}", b in "[a-z.]{0,8}", c in "[a-z.]{0,8}") {
            let candidate = format!("{a}@{b}@{c}");
            prop_assert!(!is_email(&candidate));
        }
    }
}
