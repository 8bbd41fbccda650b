//! Default message templates of the predefined rules.
//!
//! Translation tables key on these strings, so changing one is a breaking
//! change for every translation that overrides it.

pub const NOT_EMPTY: &str = "Must not be empty";
pub const NOT_WHITESPACE: &str = "Must not consist only of whitespace";
pub const MIN_LENGTH: &str = "Must be at least {min} characters in length";
pub const MAX_LENGTH: &str = "Must be at most {max} characters in length";
pub const LENGTH_BETWEEN: &str = "Must be between {min} and {max} characters in length";
pub const EMAIL: &str = "Must be a valid email address";
pub const CONTAINS: &str = "Must contain '{value}'";

pub const GREATER_THAN: &str = "Must be greater than {min}";
pub const GREATER_THAN_OR_EQUAL: &str = "Must be greater than or equal to {min}";
pub const LESS_THAN: &str = "Must be less than {max}";
pub const LESS_THAN_OR_EQUAL: &str = "Must be less than or equal to {max}";
pub const BETWEEN: &str = "Must be between {min} and {max} (inclusive)";
pub const POSITIVE: &str = "Must be positive";

pub const COLLECTION_NOT_EMPTY: &str = "Must contain at least one item";
pub const MIN_COUNT: &str = "Must contain at least {min} items";
pub const MAX_COUNT: &str = "Must contain at most {max} items";
pub const EXACT_COUNT: &str = "Must contain exactly {count} items";
