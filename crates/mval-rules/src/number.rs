//! # Number Rules
//!
//! Ordering checks for any primitive numeric member. Bounds are carried as
//! [`Number`] arguments, so `{min|precision=2}` works in custom messages.

use mval_core::{Arg, Error, Number};
use mval_engine::MemberSpec;

use crate::messages;

/// Ordering checks on a numeric member.
pub trait NumberRules {
    /// The member's numeric type.
    type Value;

    /// Strictly greater than `min`.
    fn greater_than(&mut self, min: Self::Value) -> &mut Self;

    /// Greater than or equal to `min`.
    fn greater_than_or_equal(&mut self, min: Self::Value) -> &mut Self;

    /// Strictly less than `max`.
    fn less_than(&mut self, max: Self::Value) -> &mut Self;

    /// Less than or equal to `max`.
    fn less_than_or_equal(&mut self, max: Self::Value) -> &mut Self;

    /// Within `min..=max`.
    fn between(&mut self, min: Self::Value, max: Self::Value) -> &mut Self;

    /// Strictly greater than zero. `NaN` fails.
    fn positive(&mut self) -> &mut Self;
}

impl<M, T> NumberRules for MemberSpec<M, T>
where
    M: 'static,
    T: Copy + PartialOrd + Default + Into<Number> + Send + Sync + 'static,
{
    type Value = T;

    fn greater_than(&mut self, min: T) -> &mut Self {
        self.rule_with_error(
            move |v: &T| *v > min,
            Error::with_args(messages::GREATER_THAN, vec![Arg::number("min", min)]),
        )
    }

    fn greater_than_or_equal(&mut self, min: T) -> &mut Self {
        self.rule_with_error(
            move |v: &T| *v >= min,
            Error::with_args(
                messages::GREATER_THAN_OR_EQUAL,
                vec![Arg::number("min", min)],
            ),
        )
    }

    fn less_than(&mut self, max: T) -> &mut Self {
        self.rule_with_error(
            move |v: &T| *v < max,
            Error::with_args(messages::LESS_THAN, vec![Arg::number("max", max)]),
        )
    }

    fn less_than_or_equal(&mut self, max: T) -> &mut Self {
        self.rule_with_error(
            move |v: &T| *v <= max,
            Error::with_args(messages::LESS_THAN_OR_EQUAL, vec![Arg::number("max", max)]),
        )
    }

    fn between(&mut self, min: T, max: T) -> &mut Self {
        self.rule_with_error(
            move |v: &T| *v >= min && *v <= max,
            Error::with_args(
                messages::BETWEEN,
                vec![Arg::number("min", min), Arg::number("max", max)],
            ),
        )
    }

    fn positive(&mut self) -> &mut Self {
        self.rule_with_error(|v: &T| *v > T::default(), Error::new(messages::POSITIVE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mval_core::{ErrorsCollection, ExecutionOptions};
    use mval_engine::{compile, specification, ModelSpec};

    struct Order {
        quantity: i32,
        discount: f64,
    }

    fn validate(order: &Order) -> ErrorsCollection {
        let validator = compile(&specification(|s: &mut ModelSpec<Order>| {
            s.member("quantity", |o| &o.quantity, |m| {
                m.positive().less_than_or_equal(100);
            });
            s.member("discount", |o| &o.discount, |m| {
                m.between(0.0, 0.5);
            });
        }))
        .unwrap();
        validator.validate(order, &ExecutionOptions::default()).unwrap()
    }

    fn messages_at(result: &ErrorsCollection, member: &str) -> Vec<String> {
        result
            .member(member)
            .map(|node| node.errors().iter().map(|e| e.render().unwrap()).collect())
            .unwrap_or_default()
    }

    #[test]
    fn test_valid_order_passes() {
        let result = validate(&Order {
            quantity: 10,
            discount: 0.25,
        });
        assert!(result.is_empty());
    }

    #[test]
    fn test_bounds_are_rendered() {
        let result = validate(&Order {
            quantity: 250,
            discount: 0.75,
        });
        assert_eq!(
            messages_at(&result, "quantity"),
            vec!["Must be less than or equal to 100".to_string()]
        );
        assert_eq!(
            messages_at(&result, "discount"),
            vec!["Must be between 0 and 0.5 (inclusive)".to_string()]
        );
    }

    #[test]
    fn test_positive_rejects_zero() {
        let result = validate(&Order {
            quantity: 0,
            discount: 0.0,
        });
        assert_eq!(
            messages_at(&result, "quantity"),
            vec![messages::POSITIVE.to_string()]
        );
        assert!(result.member("discount").is_none());
    }

    #[test]
    fn test_nan_is_outside_every_range() {
        let result = validate(&Order {
            quantity: 1,
            discount: f64::NAN,
        });
        assert_eq!(result.member("discount").unwrap().errors().len(), 1);
    }

    #[test]
    fn test_strict_and_inclusive_edges() {
        struct Reading {
            value: u8,
        }
        let validator = compile(&specification(|s: &mut ModelSpec<Reading>| {
            s.member("value", |r| &r.value, |m| {
                m.greater_than(10).greater_than_or_equal(10).less_than(10);
            });
        }))
        .unwrap();
        let result = validator
            .validate(&Reading { value: 10 }, &ExecutionOptions::default())
            .unwrap();
        assert_eq!(
            messages_at(&result, "value"),
            vec![
                "Must be greater than 10".to_string(),
                "Must be less than 10".to_string(),
            ]
        );
    }

    #[test]
    fn test_precision_parameter_formats_bound() {
        let error = Error::with_args(messages::GREATER_THAN, vec![Arg::number("min", 2.5f64)]);
        assert_eq!(
            error.render_as("Above {min|precision=2}").unwrap(),
            "Above 2.50"
        );
    }
}
