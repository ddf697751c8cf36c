//! Property tests for store operations.

use proptest::prelude::*;
use recipe_store::{RecipeFields, RecipeStore, StoreConfig, StoreError};
use std::collections::HashSet;
use tempfile::TempDir;

fn test_store(dir: &TempDir) -> RecipeStore {
    RecipeStore::open(StoreConfig {
        pretty: false,
        ..StoreConfig::new(dir.path().join("recipes.json"))
    })
    .unwrap()
}

fn fields_strategy() -> impl Strategy<Value = RecipeFields> {
    (
        "[A-Za-z][A-Za-z ]{0,20}",
        ".{0,40}",
        ".{0,80}",
        proptest::option::of(0i64..10_000),
    )
        .prop_map(|(name, ingredients, instructions, cooking_time)| RecipeFields {
            name,
            ingredients,
            instructions,
            cooking_time,
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_ids_are_unique(batch in prop::collection::vec(fields_strategy(), 1..20)) {
        let dir = TempDir::new().unwrap();
        let store = test_store(&dir);

        let ids: HashSet<_> = batch
            .iter()
            .map(|f| store.create(f.clone()).unwrap().id)
            .collect();

        prop_assert_eq!(ids.len(), batch.len());
        prop_assert_eq!(store.len().unwrap(), batch.len());
    }

    #[test]
    fn prop_create_then_get_roundtrips(fields in fields_strategy()) {
        let dir = TempDir::new().unwrap();
        let store = test_store(&dir);

        let created = store.create(fields.clone()).unwrap();
        let fetched = store.get_by_id(&created.id).unwrap();

        prop_assert_eq!(&fetched.id, &created.id);
        prop_assert_eq!(fetched.fields(), fields);
    }

    #[test]
    fn prop_update_preserves_identity(first in fields_strategy(), second in fields_strategy()) {
        let dir = TempDir::new().unwrap();
        let store = test_store(&dir);

        let created = store.create(first).unwrap();
        store.update(&created.id, second.clone()).unwrap();

        let fetched = store.get_by_id(&created.id).unwrap();
        prop_assert_eq!(&fetched.id, &created.id);
        prop_assert_eq!(fetched.fields(), second);
    }

    #[test]
    fn prop_delete_removes_exactly_one(
        batch in prop::collection::vec(fields_strategy(), 1..10),
        pick in any::<prop::sample::Index>(),
    ) {
        let dir = TempDir::new().unwrap();
        let store = test_store(&dir);

        let created: Vec<_> = batch
            .into_iter()
            .map(|f| store.create(f).unwrap())
            .collect();
        let victim = &created[pick.index(created.len())];

        let before = store.len().unwrap();
        store.delete(&victim.id).unwrap();

        prop_assert_eq!(store.len().unwrap(), before - 1);
        prop_assert!(matches!(store.get_by_id(&victim.id), Err(StoreError::NotFound(_))));

        let remaining: Vec<_> = store.list_all().unwrap();
        let expected: Vec<_> = created.iter().filter(|r| r.id != victim.id).cloned().collect();
        prop_assert_eq!(remaining, expected);
    }
}
