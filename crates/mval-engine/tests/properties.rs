//! Property tests over generated models: strategy monotonicity, pruning of
//! executor output and idempotent compilation.

use std::collections::BTreeSet;

use mval_engine::{
    specification, CompiledValidator, ErrorsCollection, ModelSpec, Presence, Specification,
    ValidationEngine, ValidationStrategy,
};
use proptest::prelude::*;

#[derive(Debug, Clone)]
struct Address {
    street: String,
    city: String,
}

impl Presence for Address {}

#[derive(Debug, Clone)]
struct Profile {
    name: Option<String>,
    age: u32,
    tags: Vec<Option<String>>,
    address: Option<Address>,
}

fn address_spec() -> Specification<Address> {
    specification(|s: &mut ModelSpec<Address>| {
        s.member("street", |a| &a.street, |m| {
            m.rule(|v| !v.is_empty()).rule(|v| v.len() < 3);
        });
        s.member("city", |a| &a.city, |m| {
            m.rule(|v| !v.is_empty());
        });
    })
}

fn profile_spec() -> Specification<Profile> {
    specification(|s: &mut ModelSpec<Profile>| {
        s.nullable_member("name", |p| p.name.as_ref(), |m| {
            m.rule(|n| !n.is_empty()).rule(|n| n.len() < 3);
        });
        s.member("age", |p| &p.age, |m| {
            m.rule(|a| *a >= 18).rule(|a| *a < 100);
        });
        s.member("tags", |p| &p.tags, |m| {
            m.rule(|t| t.len() < 3).as_collection(|item| {
                item.as_nullable(|tag| {
                    tag.rule(|t| !t.is_empty());
                });
            });
        });
        s.nullable_member("address", |p| p.address.as_ref(), |m| {
            m.set_optional().as_model(address_spec());
        });
        s.rule(|p| p.name.is_some() || p.address.is_some());
    })
}

fn profile() -> impl Strategy<Value = Profile> {
    (
        prop::option::of("[a-z]{0,4}"),
        0u32..120,
        prop::collection::vec(prop::option::of("[a-z]{0,2}"), 0..4),
        prop::option::of(("[a-z]{0,4}", "[a-z]{0,2}")),
    )
        .prop_map(|(name, age, tags, address)| Profile {
            name,
            age,
            tags,
            address: address.map(|(street, city)| Address { street, city }),
        })
}

fn validator() -> CompiledValidator<Profile> {
    match ValidationEngine::new().compile(&profile_spec()) {
        Ok(validator) => validator,
        Err(err) => panic!("profile spec must compile: {err}"),
    }
}

/// Error paths with collection indices folded onto the force key, so that
/// concrete items compare against the synthetic forced item.
fn shape(result: &ErrorsCollection) -> BTreeSet<String> {
    result
        .paths()
        .into_iter()
        .map(|path| {
            path.split('.')
                .map(|segment| {
                    if segment.parse::<usize>().is_ok() {
                        "#"
                    } else {
                        segment
                    }
                })
                .collect::<Vec<_>>()
                .join(".")
        })
        .collect()
}

fn has_empty_child(node: &ErrorsCollection) -> bool {
    node.members()
        .values()
        .any(|child| child.is_empty() || has_empty_child(child))
}

proptest! {
    /// FailFast reports a subset of Complete's paths, which reports a
    /// subset of Force's.
    #[test]
    fn strategy_monotonicity(model in profile()) {
        let validator = validator();
        let fail_fast = validator.validate_with(&model, ValidationStrategy::FailFast).unwrap();
        let complete = validator.validate_with(&model, ValidationStrategy::Complete).unwrap();
        let force = validator.validate_with(&model, ValidationStrategy::Force).unwrap();

        let fail_fast_paths: BTreeSet<String> = fail_fast.paths().into_iter().collect();
        let complete_paths: BTreeSet<String> = complete.paths().into_iter().collect();
        prop_assert!(fail_fast_paths.is_subset(&complete_paths));
        prop_assert!(shape(&complete).is_subset(&shape(&force)));
        prop_assert!(fail_fast.error_count() <= complete.error_count());
    }

    /// Executor output never holds an empty child node.
    #[test]
    fn executor_output_is_pruned(model in profile()) {
        let validator = validator();
        for strategy in [
            ValidationStrategy::Complete,
            ValidationStrategy::FailFast,
            ValidationStrategy::Force,
        ] {
            let result = validator.validate_with(&model, strategy).unwrap();
            prop_assert!(!has_empty_child(&result));
        }
    }

    /// Two compilations of one specification agree on every model.
    #[test]
    fn compilation_is_idempotent(model in profile()) {
        let first = validator();
        let second = validator();
        prop_assert_eq!(first.validate(&model).unwrap(), second.validate(&model).unwrap());
        prop_assert_eq!(first.template().unwrap(), second.template().unwrap());
    }

    /// A valid verdict from `is_valid` matches an empty complete run.
    #[test]
    fn is_valid_agrees_with_complete(model in profile()) {
        let validator = validator();
        prop_assert_eq!(
            validator.is_valid(&model).unwrap(),
            validator.validate(&model).unwrap().is_empty()
        );
    }
}
