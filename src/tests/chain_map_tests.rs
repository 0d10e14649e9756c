//! Cross-module tests for the chain map.
//!
//! These drive tables built from loaded configuration and from generated
//! inputs of every supported kind.

use proptest::prelude::*;

use crate::config::ConfigLoader;
use crate::data_structures::hale_chain_map::{
    is_separator, HaleChainMap, HaleChainMapConfig, HaleChainMapError, TaggedValue, ValueKind,
};
use crate::tests::{tagged_value_strategy, value_kind_strategy, TestFixture};

/// A table built from a configuration file honors its kinds and sizing.
#[test]
fn test_table_from_config_file() {
    let fixture = TestFixture::new().unwrap();
    let path = fixture
        .create_file(
            "hale.toml",
            r#"
            [table]
            initial_bucket_count = 2
            max_load_factor = 1.0
            key_kind = "char"
            value_kind = "double"
            "#,
        )
        .unwrap();

    let config = ConfigLoader::new(Some(&path), "HALE_TEST_TABLE_FILE")
        .load()
        .unwrap();
    let mut table = HaleChainMap::with_config(config.table).unwrap();

    assert_eq!(table.bucket_count(), 2);
    assert_eq!(table.key_kind(), ValueKind::Char);
    assert_eq!(table.value_kind(), ValueKind::Double);

    assert!(table.insert('a', 1.5f64));
    assert!(table.insert('b', 2.5f64));
    // 3 / 2 exceeds 1.0, so the third insertion doubles first.
    assert!(table.insert('c', 3.5f64));
    assert_eq!(table.bucket_count(), 4);

    assert!(!table.insert("a", 1.5f64));
    assert_eq!(table.size(), 3);
    assert_eq!(table.get(&'c'.into()), Some(TaggedValue::Double(3.5)));
}

/// Environment overrides reach the table configuration.
#[test]
fn test_table_kinds_from_env() {
    let mut fixture = TestFixture::new().unwrap();
    fixture.set_env("HALE_TEST_TABLE_ENV__TABLE__KEY_KIND", "integer");
    fixture.set_env("HALE_TEST_TABLE_ENV__TABLE__VALUE_KIND", "float");

    let config = ConfigLoader::new(None::<&str>, "HALE_TEST_TABLE_ENV")
        .load()
        .unwrap();
    let mut table = HaleChainMap::with_config(config.table).unwrap();

    let key = table.parse_key(" 42 ").unwrap();
    let value = table.parse_value("2.5").unwrap();
    assert!(table.put(key, value));
    assert_eq!(
        table.get(&TaggedValue::Integer(42)),
        Some(TaggedValue::Float(2.5))
    );
}

/// Reset switches to a new configuration but keeps the step history.
#[test]
fn test_reset_keeps_history() {
    let mut table = HaleChainMap::new();
    table.put("a", "1");
    table.put("b", "2");
    let before = table.recorder().operation_count();

    table
        .reset(
            HaleChainMapConfig::new()
                .with_initial_bucket_count(1)
                .with_kinds(ValueKind::Integer, ValueKind::Char),
        )
        .unwrap();

    assert!(table.is_empty());
    assert_eq!(table.bucket_count(), 1);
    assert_eq!(table.recorder().operation_count(), before + 1);
    assert!(table.steps().iter().any(|s| s == "=== #1 put(a, 1)"));

    assert!(!table.put("c", "3"));
    assert!(table.put(7, 'x'));
}

/// An invalid reset leaves the table untouched.
#[test]
fn test_invalid_reset_is_rejected() {
    let mut table = HaleChainMap::new();
    table.put("a", "1");
    let steps = table.steps().len();

    let err = table
        .reset(HaleChainMapConfig::new().with_initial_bucket_count(0))
        .unwrap_err();
    assert!(matches!(err, HaleChainMapError::Configuration(_)));
    assert_eq!(table.size(), 1);
    assert_eq!(table.steps().len(), steps);
}

proptest! {
    /// Values of the configured kinds are stored and found again, whatever
    /// the kinds are.
    #[test]
    fn proptest_any_kind_pair_round_trips(
        (key_kind, value_kind, pairs) in (value_kind_strategy(), value_kind_strategy())
            .prop_flat_map(|(k, v)| {
                let pairs = prop::collection::vec(
                    (tagged_value_strategy(k), tagged_value_strategy(v)),
                    0..40,
                );
                (Just(k), Just(v), pairs)
            })
    ) {
        let mut table = HaleChainMap::with_config(
            HaleChainMapConfig::new()
                .with_initial_bucket_count(2)
                .with_kinds(key_kind, value_kind),
        )
        .unwrap();

        let mut model: Vec<(TaggedValue, TaggedValue)> = Vec::new();
        for (key, value) in pairs {
            let added = table.put(key.clone(), value.clone());
            match model.iter_mut().find(|(k, _)| *k == key) {
                Some(slot) => {
                    prop_assert!(!added);
                    slot.1 = value;
                }
                None => {
                    prop_assert!(added);
                    model.push((key, value));
                }
            }
        }

        prop_assert_eq!(table.size(), model.len());
        for (key, value) in &model {
            let found = table.get(key);
            prop_assert_eq!(found.as_ref(), Some(value));
        }
    }

    /// A key of the wrong kind never changes the table.
    #[test]
    fn proptest_wrong_kind_is_rejected(
        stored in tagged_value_strategy(ValueKind::Integer),
        stray in value_kind_strategy()
            .prop_filter("must differ from Integer", |k| *k != ValueKind::Integer)
            .prop_flat_map(tagged_value_strategy),
    ) {
        let mut table = HaleChainMap::with_config(
            HaleChainMapConfig::new().with_kinds(ValueKind::Integer, ValueKind::Integer),
        )
        .unwrap();
        table.put(stored.clone(), stored.clone());

        prop_assert!(!table.insert(stray.clone(), stored.clone()));
        prop_assert!(!table.put(stored.clone(), stray.clone()));
        prop_assert!(!table.erase(&stray));
        prop_assert_eq!(table.size(), 1);
        prop_assert_eq!(table.get(&stored), Some(stored.clone()));
        prop_assert!(table
            .steps()
            .iter()
            .any(|s| s.starts_with("Rejected: Type mismatch")));
    }

    /// Every operation opens exactly one separator line.
    #[test]
    fn proptest_one_separator_per_operation(keys in prop::collection::vec(0i32..20, 0..50)) {
        let mut table = HaleChainMap::with_config(
            HaleChainMapConfig::new().with_kinds(ValueKind::Integer, ValueKind::Integer),
        )
        .unwrap();
        for key in &keys {
            table.insert(*key, *key);
            table.contains(&TaggedValue::Integer(*key));
        }

        let separators = table.steps().iter().filter(|s| is_separator(s)).count();
        prop_assert_eq!(separators, keys.len() * 2);
        prop_assert_eq!(table.recorder().operation_count(), keys.len() * 2);
    }
}
