//! Property-based tests for action parameter merging.
//!
//! Properties that must hold for any declared list and caller input:
//! - No parameter name appears twice
//! - Declared parameters the caller supplied keep declaration order
//! - A non-empty id fallback always ends up in the parameters
//! - A caller-supplied id is never replaced by the fallback

use launix_connector::{merge_params, prepare_action};
use proptest::prelude::*;
use serde_json::{Map, Value};

// =============================================================================
// HELPER STRATEGIES
// =============================================================================

fn name_strategy() -> impl Strategy<Value = String> {
    prop_oneof![Just("id".to_string()), "[a-e]{1,2}"]
}

fn declared_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(name_strategy(), 0..6)
}

fn caller_strategy() -> impl Strategy<Value = Map<String, Value>> {
    prop::collection::vec((name_strategy(), "[a-z0-9]{0,4}"), 0..6).prop_map(|pairs| {
        pairs
            .into_iter()
            .map(|(name, value)| (name, Value::String(value)))
            .collect()
    })
}

// =============================================================================
// MERGE PROPERTIES
// =============================================================================

mod merge_properties {
    use super::*;

    proptest! {
        #[test]
        fn names_are_unique(
            declared in declared_strategy(),
            caller in caller_strategy(),
            fallback in prop::option::of("[0-9]{1,3}"),
        ) {
            let merged = merge_params(&declared, &caller, fallback.as_deref());
            for (i, (a, _)) in merged.iter().enumerate() {
                for (b, _) in &merged[i + 1..] {
                    prop_assert_ne!(a, b);
                }
            }
        }

        #[test]
        fn declared_order_is_kept(declared in declared_strategy(), caller in caller_strategy()) {
            let merged = merge_params(&declared, &caller, None);
            let position = |name: &str| merged.iter().position(|(key, _)| key == name);

            let mut seen: Vec<&str> = Vec::new();
            let mut last = None;
            for name in &declared {
                if seen.contains(&name.as_str()) {
                    continue;
                }
                seen.push(name);
                if let Some(at) = position(name) {
                    if let Some(previous) = last {
                        prop_assert!(at >= previous);
                    }
                    last = Some(at);
                }
            }
        }

        #[test]
        fn id_fallback_is_honoured(
            declared in declared_strategy(),
            caller in caller_strategy(),
            fallback in "[0-9]{1,3}",
        ) {
            let merged = merge_params(&declared, &caller, Some(&fallback));
            let id = merged.iter().find(|(key, _)| key == "id").map(|(_, value)| value.clone());
            let expected = caller
                .get("id")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or(fallback);
            prop_assert_eq!(id, Some(expected));
        }

        #[test]
        fn get_requests_never_carry_a_body(caller in caller_strategy()) {
            let prepared = prepare_action("orders", "orders/print", None, &caller, None);
            prop_assert_eq!(prepared.method.as_str(), "GET");
            prop_assert!(prepared.body.is_none());
            prop_assert_eq!(prepared.path.contains('?'), !prepared.params.is_empty());
        }
    }
}
