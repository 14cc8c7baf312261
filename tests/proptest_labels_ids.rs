//! Property-based tests using proptest
//!
//! These tests verify label flattening and composite identifier handling
//! using randomized inputs.

use pam_provider::ids;
use pam_provider::model::LabelAssignments;
use pam_provider::resource::labels::{flatten_labels, split_labels};
use proptest::prelude::*;

/// Label values never contain the separator and are never blank
fn arb_label_value() -> impl Strategy<Value = String> {
    "[a-z0-9][a-z0-9_.-]{0,15}"
}

fn arb_labels() -> impl Strategy<Value = LabelAssignments> {
    prop::collection::btree_map("[a-z][a-z0-9-]{0,20}", prop::collection::vec(arb_label_value(), 1..6), 0..8)
}

/// Identifier segments: non-empty, no slashes
fn arb_segment() -> impl Strategy<Value = String> {
    "[A-Za-z0-9_.:-]{1,24}"
}

proptest! {
    #[test]
    fn test_labels_survive_the_wire(labels in arb_labels()) {
        let flat = flatten_labels(&labels);
        prop_assert_eq!(split_labels(&flat), labels);
    }

    #[test]
    fn test_flattened_values_are_comma_joined(labels in arb_labels()) {
        let flat = flatten_labels(&labels);
        for (name, values) in &labels {
            prop_assert_eq!(&flat[name], &values.join(","));
        }
    }

    /// Whitespace around values is dropped and so are empty entries
    #[test]
    fn test_split_trims_and_skips_blanks(values in prop::collection::vec(arb_label_value(), 1..6)) {
        let joined = values.iter().map(|v| format!(" {} ", v)).collect::<Vec<_>>().join(",,");
        let mut flat = std::collections::BTreeMap::new();
        flat.insert("env".to_string(), joined);
        prop_assert_eq!(&split_labels(&flat)["env"], &values);
    }

    #[test]
    fn test_profile_policy_id_round_trip(profile in arb_segment(), policy in arb_segment()) {
        let id = ids::PROFILE_POLICY.format(&[&profile, &policy]).unwrap();
        let [p, q] = ids::PROFILE_POLICY.parse_n::<2>(&id).unwrap();
        prop_assert_eq!(p, profile);
        prop_assert_eq!(q, policy);
    }

    #[test]
    fn test_constraint_id_round_trip(values in prop::collection::vec(arb_segment(), 5)) {
        let id = ids::CONSTRAINT.format(&values).unwrap();
        prop_assert!(ids::CONSTRAINT.matches(&id));
        prop_assert_eq!(ids::CONSTRAINT.parse(&id).unwrap(), values);
    }

    /// An id for one shape is never accepted as another
    #[test]
    fn test_shapes_do_not_overlap(profile in arb_segment(), policy in arb_segment()) {
        let id = ids::PROFILE_POLICY.format(&[&profile, &policy]).unwrap();
        prop_assert!(!ids::RESOURCE_MANAGER_PROFILE_POLICY.matches(&id));
        prop_assert!(!ids::PROFILE.matches(&id));
        prop_assert!(!ids::TAG_MEMBER.matches(&id));
    }

    #[test]
    fn test_values_with_slashes_are_rejected(profile in arb_segment(), policy in arb_segment()) {
        let bad = format!("{}/{}", profile, policy);
        prop_assert!(ids::PROFILE_POLICY.format(&[bad.as_str(), policy.as_str()]).is_err());
    }
}
