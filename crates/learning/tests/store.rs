use dragstrip_learning::{FEATURE_DIM, JsonDirStore, MemoryStore, ModelStore, VehicleModel, model_key};

fn trained() -> VehicleModel {
    let mut model = VehicleModel::new(FEATURE_DIM);
    model
        .update(&[0.5, 1.0, 1.0, 1.0, 0.1], -0.08)
        .expect("update");
    model
}

#[test]
fn keys_are_namespaced() {
    assert_eq!(model_key("super-gas-01"), "rsa.model.super-gas-01");
}

#[test]
fn memory_store_round_trip() {
    let store = MemoryStore::new();
    let key = model_key("a");
    assert!(store.get(&key).expect("get").is_none());
    let model = trained();
    store.set(&key, &model).expect("set");
    assert_eq!(store.get(&key).expect("get"), Some(model));
    assert_eq!(store.list().expect("list"), vec![key.clone()]);
    assert!(store.delete(&key).expect("delete"));
    assert!(!store.delete(&key).expect("second delete"));
}

#[test]
fn json_store_persists_across_instances() {
    let dir = tempfile::tempdir().expect("tempdir");
    let model = trained();
    {
        let store = JsonDirStore::open(dir.path()).expect("open");
        store.set(&model_key("b/2"), &model).expect("set");
        store.set(&model_key("a"), &VehicleModel::new(FEATURE_DIM)).expect("set");
    }
    let store = JsonDirStore::open(dir.path()).expect("reopen");
    let loaded = store.get(&model_key("b/2")).expect("get").expect("present");
    assert_eq!(loaded.n, model.n);
    assert_eq!(loaded.w.len(), FEATURE_DIM);
    for (a, b) in loaded.w.iter().zip(&model.w) {
        assert!((a - b).abs() < 1e-12);
    }
    assert_eq!(
        store.list().expect("list"),
        vec![model_key("a"), model_key("b/2")]
    );
    assert!(store.delete(&model_key("a")).expect("delete"));
    assert!(store.get(&model_key("a")).expect("get").is_none());
}

#[test]
fn json_store_keeps_keys_that_differ_only_in_punctuation() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = JsonDirStore::open(dir.path()).expect("open");
    let slash = model_key("a/b");
    let underscore = model_key("a_b");
    let space = model_key("a b");
    store.set(&slash, &trained()).expect("set slash");
    store.set(&underscore, &VehicleModel::new(FEATURE_DIM)).expect("set underscore");
    store.set(&space, &VehicleModel::new(FEATURE_DIM)).expect("set space");

    assert_eq!(store.get(&slash).expect("get").expect("present").n, 1);
    assert_eq!(store.get(&underscore).expect("get").expect("present").n, 0);
    let mut expected = vec![slash, underscore, space];
    expected.sort();
    assert_eq!(store.list().expect("list"), expected);
}
