use braindump_core::model::profile::{Palette, PreferencesPatch, ProfilePatch};
use braindump_core::repo::snapshot_repo::{ITEMS_KEY, PROFILE_KEY};
use braindump_core::{
    AppContext, Item, ItemType, KvRepository, Priority, RepoError, SqliteKvRepository,
    UserProfile,
};

fn task(title: &str, timestamp: i64) -> Item {
    Item::new(ItemType::Task, title, title, "Work", timestamp)
}

#[test]
fn fresh_database_starts_empty_with_default_profile() {
    let dir = tempfile::tempdir().unwrap();
    let context = AppContext::open_at(dir.path().join("braindump.sqlite3")).unwrap();

    assert!(context.items().is_empty());
    let profile = context.profile().profile();
    assert_eq!(profile, &UserProfile::default());
    assert_eq!(profile.name, "Sarah J.");
    assert_eq!(profile.streak, 5);
    assert_eq!(profile.total_wins, 12);
}

#[test]
fn nothing_is_written_until_first_change() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("braindump.sqlite3");
    let mut context = AppContext::open_at(&path).unwrap();

    let observer = SqliteKvRepository::open(&path).unwrap();
    assert!(observer.keys().unwrap().is_empty());

    context.items_mut().add(task("first", 1)).unwrap();
    assert_eq!(observer.keys().unwrap(), vec![ITEMS_KEY.to_string()]);
}

#[test]
fn items_survive_reload_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("braindump.sqlite3");

    let (first_id, deleted_id) = {
        let mut context = AppContext::open_at(&path).unwrap();
        let store = context.items_mut();
        let first_id = store.add(task("first", 10)).unwrap().id.clone();
        let deleted_id = store.add(task("middle", 20)).unwrap().id.clone();
        let mut last = task("last", 30);
        last.priority = Some(Priority::High);
        last.tags = vec!["urgent".to_string()];
        store.add(last).unwrap();
        store.toggle_completed(&first_id).unwrap();
        store.delete(&deleted_id).unwrap();
        (first_id, deleted_id)
    };

    let context = AppContext::open_at(&path).unwrap();
    let titles = context
        .items()
        .items()
        .iter()
        .map(|item| item.title.as_str())
        .collect::<Vec<_>>();
    assert_eq!(titles, vec!["last", "first"]);
    assert!(context.items().get(&deleted_id).is_none());

    let first = context.items().get(&first_id).unwrap();
    assert!(first.completed);
    let last = &context.items().items()[0];
    assert_eq!(last.priority, Some(Priority::High));
    assert_eq!(last.tags, vec!["urgent".to_string()]);
}

#[test]
fn profile_and_preferences_survive_reload() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("braindump.sqlite3");

    {
        let mut context = AppContext::open_at(&path).unwrap();
        context.profile_mut().update(&ProfilePatch {
            name: Some("Alex".to_string()),
            ..ProfilePatch::default()
        });
        context.profile_mut().update_preferences(&PreferencesPatch {
            palette: Some(Palette::Ocean),
            ai_context: Some("I teach high school".to_string()),
            ..PreferencesPatch::default()
        });
    }

    let context = AppContext::open_at(&path).unwrap();
    assert_eq!(context.profile().profile().name, "Alex");
    assert_eq!(context.profile().preferences().palette, Palette::Ocean);
    assert_eq!(context.ai_context().as_deref(), Some("I teach high school"));
}

#[test]
fn snapshot_blobs_use_camel_case_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("braindump.sqlite3");
    let mut context = AppContext::open_at(&path).unwrap();
    context.items_mut().add(task("pay rent", 42)).unwrap();
    context.profile_mut().update(&ProfilePatch {
        streak: Some(6),
        ..ProfilePatch::default()
    });

    let observer = SqliteKvRepository::open(&path).unwrap();
    let items = read_blob(&observer, ITEMS_KEY);
    let profile = read_blob(&observer, PROFILE_KEY);
    assert_eq!(items[0]["type"], "task");
    assert_eq!(items[0]["timestamp"], 42);
    assert!(items[0].get("priority").is_none());
    assert_eq!(profile["streak"], 6);
    assert!(profile.get("totalWins").is_some());
    assert!(profile["preferences"].get("nudgeFrequency").is_some());
}

#[test]
fn corrupt_items_blob_fails_startup() {
    let repo = SqliteKvRepository::open_in_memory().unwrap();
    repo.put(ITEMS_KEY, "{not json").unwrap();

    let err = AppContext::open(repo).err().unwrap();
    assert!(matches!(err, RepoError::InvalidData { ref key, .. } if key == ITEMS_KEY));
}

#[test]
fn duplicate_ids_in_blob_fail_startup() {
    let repo = SqliteKvRepository::open_in_memory().unwrap();
    let item = task("twice", 1);
    let json = serde_json::to_string(&vec![item.clone(), item]).unwrap();
    repo.put(ITEMS_KEY, &json).unwrap();

    assert!(matches!(
        AppContext::open(repo),
        Err(RepoError::Validation(_))
    ));
}

fn read_blob(repo: &SqliteKvRepository, key: &str) -> serde_json::Value {
    let raw = repo.get(key).unwrap().unwrap();
    serde_json::from_str(&raw).unwrap()
}
