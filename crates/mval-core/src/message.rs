//! # Message Templates
//!
//! Error messages are templates with `{name|param=value|...}` placeholders.
//! Each placeholder names one [`Arg`] attached to the error; the optional
//! `key=value` tokens are parameters passed to that argument's formatter.
//!
//! Rendering happens only when a report is materialized, never during
//! traversal, so a finished [`ErrorsCollection`](crate::ErrorsCollection) can
//! be rendered many times (e.g. once per translation).
//!
//! ## Placeholder Rules
//!
//! - A placeholder whose parameters are malformed (no `=`, more than one `=`,
//!   a repeated key) is left in the output untouched.
//! - A placeholder naming no argument is left untouched.
//! - A placeholder requesting a parameter the argument does not accept is
//!   left untouched.
//! - Line breaks in the rendered message are replaced with
//!   [`LINE_BREAK_MARKER`] so rendered messages are always single-line.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use crate::error::TemplateError;

/// Replaces `\r\n`, `\n` and `\r` in rendered messages.
pub const LINE_BREAK_MARKER: char = '¶';

// ─── Arguments ───────────────────────────────────────────────────────

/// A numeric argument value. Integers keep their exact representation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    /// Any integer that fits in `i128`.
    Int(i128),
    /// A floating point value.
    Float(f64),
}

macro_rules! number_from_int {
    ($($t:ty),*) => {
        $(impl From<$t> for Number {
            fn from(value: $t) -> Self {
                Number::Int(value as i128)
            }
        })*
    };
}

number_from_int!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, usize);

impl From<f32> for Number {
    fn from(value: f32) -> Self {
        Number::Float(f64::from(value))
    }
}

impl From<f64> for Number {
    fn from(value: f64) -> Self {
        Number::Float(value)
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(i) => write!(f, "{i}"),
            Number::Float(x) => write!(f, "{x}"),
        }
    }
}

/// A named argument that can be substituted into a message template.
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    /// Free text. Parameter `case` accepts `upper` or `lower`.
    Text {
        /// Placeholder name.
        name: String,
        /// The text.
        value: String,
    },
    /// A number. Parameter `precision` fixes the number of decimal places.
    Number {
        /// Placeholder name.
        name: String,
        /// The number.
        value: Number,
    },
    /// A Rust type. Parameter `format` accepts `name` (default) or `fullName`.
    Type {
        /// Placeholder name.
        name: String,
        /// Fully qualified type name from [`std::any::type_name`].
        full_name: &'static str,
    },
}

impl Arg {
    /// A text argument.
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Arg::Text {
            name: name.into(),
            value: value.into(),
        }
    }

    /// A numeric argument.
    pub fn number(name: impl Into<String>, value: impl Into<Number>) -> Self {
        Arg::Number {
            name: name.into(),
            value: value.into(),
        }
    }

    /// A type argument for `T`.
    pub fn type_of<T: ?Sized>(name: impl Into<String>) -> Self {
        Arg::Type {
            name: name.into(),
            full_name: std::any::type_name::<T>(),
        }
    }

    /// The placeholder name.
    pub fn name(&self) -> &str {
        match self {
            Arg::Text { name, .. } | Arg::Number { name, .. } | Arg::Type { name, .. } => name,
        }
    }

    /// Parameter keys this argument understands.
    pub fn allowed_parameters(&self) -> &'static [&'static str] {
        match self {
            Arg::Text { .. } => &["case"],
            Arg::Number { .. } => &["precision"],
            Arg::Type { .. } => &["format"],
        }
    }

    /// Stringify the argument with the given parameters.
    ///
    /// Unknown parameter values fall back to the plain representation.
    pub fn render(&self, parameters: &HashMap<String, String>) -> String {
        match self {
            Arg::Text { value, .. } => match parameters.get("case").map(String::as_str) {
                Some("upper") => value.to_uppercase(),
                Some("lower") => value.to_lowercase(),
                _ => value.clone(),
            },
            Arg::Number { value, .. } => {
                let precision = parameters
                    .get("precision")
                    .and_then(|p| p.parse::<usize>().ok());
                match (value, precision) {
                    (Number::Int(i), Some(0)) => i.to_string(),
                    (Number::Int(i), Some(p)) => format!("{i}.{}", "0".repeat(p)),
                    (Number::Float(x), Some(p)) => format!("{x:.p$}"),
                    (v, None) => v.to_string(),
                }
            }
            Arg::Type { full_name, .. } => match parameters.get("format").map(String::as_str) {
                Some("fullName") => (*full_name).to_string(),
                _ => short_type_name(full_name),
            },
        }
    }
}

/// Strip module paths from a type name, keeping generic structure:
/// `alloc::vec::Vec<core::option::Option<u8>>` becomes `Vec<Option<u8>>`.
fn short_type_name(full: &str) -> String {
    let mut out = String::with_capacity(full.len());
    let mut segment = String::new();
    for c in full.chars() {
        if c.is_alphanumeric() || c == '_' || c == ':' {
            segment.push(c);
        } else {
            out.push_str(segment.rsplit("::").next().unwrap_or(""));
            segment.clear();
            out.push(c);
        }
    }
    out.push_str(segment.rsplit("::").next().unwrap_or(""));
    out
}

// ─── Rendering ───────────────────────────────────────────────────────

/// A parsed `{...}` placeholder.
#[derive(Debug, PartialEq)]
struct Placeholder {
    name: String,
    parameters: HashMap<String, String>,
}

/// Parse the inside of a placeholder. `None` means the placeholder is malformed.
fn parse_placeholder(raw: &str) -> Option<Placeholder> {
    let mut tokens = raw.split('|');
    let name = tokens.next()?.to_string();
    let mut parameters = HashMap::new();
    for token in tokens {
        let mut parts = token.split('=');
        let key = parts.next()?;
        let value = parts.next()?;
        if parts.next().is_some() {
            return None;
        }
        if parameters.insert(key.to_string(), value.to_string()).is_some() {
            return None;
        }
    }
    Some(Placeholder { name, parameters })
}

/// Resolve one placeholder against the argument list.
fn substitute(raw: &str, args: &HashMap<&str, &Arg>) -> Option<String> {
    let placeholder = parse_placeholder(raw)?;
    let arg = args.get(placeholder.name.as_str())?;
    let allowed = arg.allowed_parameters();
    if placeholder
        .parameters
        .keys()
        .any(|k| !allowed.contains(&k.as_str()))
    {
        return None;
    }
    Some(arg.render(&placeholder.parameters))
}

/// Render a message template with its arguments.
///
/// Identical placeholders are resolved once. The output never contains a
/// line break.
///
/// # Errors
///
/// Returns [`TemplateError::DuplicateArgument`] if two arguments share a name.
pub fn render(template: &str, args: &[Arg]) -> Result<String, TemplateError> {
    let mut by_name: HashMap<&str, &Arg> = HashMap::with_capacity(args.len());
    for arg in args {
        if by_name.insert(arg.name(), arg).is_some() {
            return Err(TemplateError::DuplicateArgument(arg.name().to_string()));
        }
    }

    let mut resolved: BTreeMap<&str, Option<String>> = BTreeMap::new();
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        let Some(close) = rest[open..].find('}').map(|c| open + c) else {
            break;
        };
        out.push_str(&rest[..open]);
        let raw = &rest[open + 1..close];
        let value = resolved
            .entry(raw)
            .or_insert_with(|| substitute(raw, &by_name));
        match value {
            Some(v) => out.push_str(v),
            None => out.push_str(&rest[open..=close]),
        }
        rest = &rest[close + 1..];
    }
    out.push_str(rest);

    Ok(replace_line_breaks(&out))
}

fn replace_line_breaks(message: &str) -> String {
    let is_break = |c: char| c == '\r' || c == '\n';
    if !message.contains(is_break) {
        return message.to_string();
    }
    let marker = LINE_BREAK_MARKER.to_string();
    message
        .replace("\r\n", &marker)
        .replace(is_break, &marker)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_template_passthrough() {
        assert_eq!(render("Required", &[]).unwrap(), "Required");
    }

    #[test]
    fn test_substitutes_named_argument() {
        let args = [Arg::number("min", 3)];
        assert_eq!(
            render("Must be at least {min} characters", &args).unwrap(),
            "Must be at least 3 characters"
        );
    }

    #[test]
    fn test_repeated_placeholder_substituted_everywhere() {
        let args = [Arg::text("x", "a")];
        assert_eq!(render("{x}-{x}-{x}", &args).unwrap(), "a-a-a");
    }

    #[test]
    fn test_parameters_passed_to_argument() {
        let args = [Arg::text("who", "Bob"), Arg::number("max", 2.5)];
        assert_eq!(
            render("{who|case=upper} <= {max|precision=3}", &args).unwrap(),
            "BOB <= 2.500"
        );
    }

    #[test]
    fn test_integer_with_precision() {
        let args = [Arg::number("n", 7u8)];
        assert_eq!(render("{n|precision=2}", &args).unwrap(), "7.00");
    }

    #[test]
    fn test_large_integers_render_exactly() {
        let args = [Arg::number("n", u64::MAX)];
        assert_eq!(
            render("{n|precision=0}", &args).unwrap(),
            "18446744073709551615"
        );
        assert_eq!(
            render("{n|precision=1}", &args).unwrap(),
            "18446744073709551615.0"
        );
        let args = [Arg::number("n", i128::MIN)];
        assert_eq!(
            render("{n|precision=2}", &args).unwrap(),
            format!("{}.00", i128::MIN)
        );
        assert_eq!(render("{n}", &args).unwrap(), i128::MIN.to_string());
    }

    #[test]
    fn test_unknown_argument_left_untouched() {
        let args = [Arg::text("a", "1")];
        assert_eq!(render("{b} and {a}", &args).unwrap(), "{b} and 1");
    }

    #[test]
    fn test_disallowed_parameter_leaves_placeholder() {
        let args = [Arg::text("a", "1")];
        assert_eq!(render("{a|precision=2}", &args).unwrap(), "{a|precision=2}");
    }

    #[test]
    fn test_malformed_parameters_leave_placeholder() {
        let args = [Arg::text("a", "x")];
        assert_eq!(render("{a|case}", &args).unwrap(), "{a|case}");
        assert_eq!(render("{a|case=upper=lower}", &args).unwrap(), "{a|case=upper=lower}");
        assert_eq!(
            render("{a|case=upper|case=lower}", &args).unwrap(),
            "{a|case=upper|case=lower}"
        );
    }

    #[test]
    fn test_duplicate_argument_names_fail_fast() {
        let args = [Arg::text("a", "1"), Arg::number("a", 2)];
        assert_eq!(
            render("{a}", &args),
            Err(TemplateError::DuplicateArgument("a".into()))
        );
    }

    #[test]
    fn test_line_breaks_replaced() {
        let args = [Arg::text("v", "x\ny")];
        assert_eq!(render("a\r\nb\r{v}", &args).unwrap(), "a¶b¶x¶y");
    }

    #[test]
    fn test_unclosed_brace_kept() {
        assert_eq!(render("open { brace", &[]).unwrap(), "open { brace");
    }

    #[test]
    fn test_type_argument_formats() {
        let args = [Arg::type_of::<Vec<Option<u8>>>("t")];
        assert_eq!(render("{t}", &args).unwrap(), "Vec<Option<u8>>");
        let full = render("{t|format=fullName}", &args).unwrap();
        assert!(full.starts_with("alloc::vec::Vec<"));
    }

    #[test]
    fn test_parse_placeholder() {
        let p = parse_placeholder("max|precision=2").unwrap();
        assert_eq!(p.name, "max");
        assert_eq!(p.parameters.get("precision").map(String::as_str), Some("2"));
        assert!(parse_placeholder("max|precision").is_none());
    }
}
