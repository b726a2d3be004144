//! Integration tests for `ScoreStore` over the Diesel SQLite adapter.
//!
//! Each test opens a fresh database file inside a temporary directory so the
//! durability checks can close and reopen it.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use biodex::domain::{CaptureDraw, Error, ScoreStore, SpeciesCatalog, UserId};
use biodex::outbound::persistence::{ConnectionConfig, DbConnection, DieselScoreRepository};
use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rstest::{fixture, rstest};
use rstest_bdd_macros::{given, then, when};
use tempfile::TempDir;

// -----------------------------------------------------------------------------
// Test Context
// -----------------------------------------------------------------------------

struct FixtureClock;

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 16, 14, 5, 9)
            .single()
            .expect("valid fixture timestamp")
    }
}

struct TestContext {
    store: ScoreStore<DieselScoreRepository>,
    database_path: PathBuf,
    _directory: TempDir,
}

impl TestContext {
    fn reopen(&mut self) {
        self.store = open_store(&self.database_path);
    }
}

fn open_store(path: &Path) -> ScoreStore<DieselScoreRepository> {
    let connection = DbConnection::open(&ConnectionConfig::new(path)).expect("open database");
    ScoreStore::new(
        Arc::new(DieselScoreRepository::new(connection)),
        Arc::new(FixtureClock),
    )
}

fn id(name: &str) -> UserId {
    UserId::new(name).expect("valid id")
}

#[fixture]
fn context() -> TestContext {
    let directory = TempDir::new().expect("temporary directory");
    let database_path = directory.path().join("users.sqlite");
    TestContext {
        store: open_store(&database_path),
        database_path,
        _directory: directory,
    }
}

// -----------------------------------------------------------------------------
// Steps
// -----------------------------------------------------------------------------

#[given("a registered player named {name}")]
fn a_registered_player(context: &mut TestContext, name: String) -> UserId {
    context
        .store
        .ensure_user(&name)
        .expect("register")
        .id()
        .clone()
}

#[when("the player captures a {species}")]
fn the_player_captures_a_species(context: &mut TestContext, player: &UserId, species: String) {
    let points = SpeciesCatalog::standard()
        .points_for(&species)
        .expect("known species");
    context
        .store
        .record_capture(player, &species, points, true)
        .expect("capture");
}

#[then("the score is {points} and the newest entry is a {species}")]
fn the_score_and_newest_entry_reflect_the_capture(
    context: &TestContext,
    player: &UserId,
    species: String,
    points: i64,
) {
    assert_eq!(
        context.store.get_score(player).expect("score"),
        Some(points)
    );
    let entries = context.store.get_entries(player).expect("entries");
    let newest = entries.first().expect("one entry");
    assert_eq!(newest.submitter, *player);
    assert_eq!(newest.species, species);
    assert_eq!(newest.points_awarded, points);
}

// -----------------------------------------------------------------------------
// Scenarios
// -----------------------------------------------------------------------------

#[rstest]
fn ash_captures_a_tree(mut context: TestContext) {
    let ash = a_registered_player(&mut context, "Ash".to_owned());
    assert_eq!(ash.as_ref(), "ash");

    the_player_captures_a_species(&mut context, &ash, "Tree".to_owned());

    the_score_and_newest_entry_reflect_the_capture(&context, &id("Ash"), "Tree".to_owned(), 10);
}

#[rstest]
fn unknown_user_has_no_score(context: TestContext) {
    let unknown = id("unknownUser");

    assert_eq!(context.store.get_score(&unknown).expect("score"), None);
    assert_eq!(context.store.get_display_name(&unknown).expect("name"), None);
    assert_eq!(
        context.store.leaderboard_position(&unknown).expect("position"),
        None
    );
    assert!(!context.store.user_exists(&unknown).expect("exists"));
}

#[rstest]
fn leaderboard_orders_by_score(context: TestContext) {
    let store = &context.store;
    store.ensure_user("Ash").expect("register");
    store.ensure_user("Misty").expect("register");
    store.set_score(&id("ash"), 50).expect("set");
    store.set_score(&id("misty"), 80).expect("set");

    let top = store.leaderboard_top(10).expect("top");
    let rows: Vec<(String, i64, String)> = top
        .iter()
        .map(|row| (row.display_name.to_string(), row.score, row.id.to_string()))
        .collect();

    assert_eq!(
        rows,
        vec![
            ("Misty".to_owned(), 80, "misty".to_owned()),
            ("Ash".to_owned(), 50, "ash".to_owned()),
        ]
    );
    assert_eq!(store.leaderboard_position(&id("ash")).expect("pos"), Some(2));
    assert_eq!(store.highest_score().expect("max"), Some(80));
}

#[rstest]
#[case(0)]
#[case(7)]
#[case(-120)]
fn add_score_has_an_inverse(context: TestContext, #[case] delta: i64) {
    let store = &context.store;
    let ash = store.ensure_user("Ash").expect("register").id().clone();
    store.set_score(&ash, 33).expect("set");

    store.add_score(&ash, delta).expect("add");
    store.add_score(&ash, -delta).expect("subtract");

    assert_eq!(store.get_score(&ash).expect("score"), Some(33));
}

#[rstest]
fn higher_scores_rank_strictly_higher(context: TestContext) {
    let store = &context.store;
    let players = [("Ash", 50), ("Misty", 80), ("Brock", 20), ("Gary", 80), ("Oak", 0)];
    for (name, score) in players {
        let player = store.ensure_user(name).expect("register").id().clone();
        store.set_score(&player, score).expect("set");
    }

    for (a, score_a) in players {
        for (b, score_b) in players {
            if score_a > score_b {
                let position_a = store.leaderboard_position(&id(a)).expect("pos");
                let position_b = store.leaderboard_position(&id(b)).expect("pos");
                assert!(position_a < position_b, "{a} should rank above {b}");
            }
        }
    }
    assert_eq!(store.leaderboard_position(&id("misty")).expect("pos"), Some(1));
    assert_eq!(store.leaderboard_position(&id("gary")).expect("pos"), Some(2));
}

#[rstest]
fn re_registering_keeps_the_score(mut context: TestContext) {
    let ash = a_registered_player(&mut context, "Ash".to_owned());
    context.store.add_score(&ash, 45).expect("add");

    let again = context.store.ensure_user("ASH").expect("re-register");

    assert_eq!(again.score(), 45);
    assert_eq!(again.display_name().as_ref(), "Ash");
}

#[rstest]
fn invalid_names_write_nothing(context: TestContext) {
    let err = context
        .store
        .ensure_user("averyverylongname")
        .expect_err("too long");

    assert!(matches!(err, Error::Validation(_)));
    assert_eq!(context.store.highest_score().expect("max"), None);
}

#[rstest]
fn state_survives_reopening(mut context: TestContext) {
    let ash = a_registered_player(&mut context, "Ash".to_owned());
    the_player_captures_a_species(&mut context, &ash, "Owl".to_owned());

    context.reopen();

    the_score_and_newest_entry_reflect_the_capture(&context, &ash, "Owl".to_owned(), 1000);
}

#[rstest]
fn drawn_captures_accumulate(mut context: TestContext) {
    let ash = a_registered_player(&mut context, "Ash".to_owned());
    let catalog = SpeciesCatalog::standard();
    let draw = CaptureDraw::new(&catalog).expect("drawable catalog");
    let mut rng = ChaCha8Rng::seed_from_u64(2026);

    let mut expected = 0;
    for _ in 0..25 {
        let species = draw.draw_with(&mut rng);
        expected += species.points();
        context
            .store
            .record_capture(&ash, species.name(), species.points(), true)
            .expect("capture");
    }

    assert_eq!(context.store.get_score(&ash).expect("score"), Some(expected));
    assert_eq!(context.store.get_entries(&ash).expect("entries").len(), 25);
    assert_eq!(
        context.store.recent_entries(&ash, 5).expect("recent").len(),
        5
    );
}
