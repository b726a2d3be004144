//! Tests for the domain user model.

use super::*;
use rstest::{fixture, rstest};
use rstest_bdd_macros::{given, then, when};
use serde_json::json;

#[derive(Debug, Clone)]
struct TestDisplayName(String);

impl TestDisplayName {
    fn valid() -> Self {
        Self("Ash".to_owned())
    }

    fn too_long() -> Self {
        Self("a".repeat(DISPLAY_NAME_MAX + 1))
    }
}

impl AsRef<str> for TestDisplayName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl From<TestDisplayName> for String {
    fn from(value: TestDisplayName) -> Self {
        value.0
    }
}

#[fixture]
fn valid_display_name() -> TestDisplayName {
    TestDisplayName::valid()
}

#[rstest]
#[case("A")]
#[case("Professor Oak")]
#[case("abcdefghijkl")]
fn accepts_names_within_bounds(#[case] name: &str) {
    let display = DisplayName::new(name).expect("name within bounds");
    assert_eq!(display.as_ref(), name);
}

#[rstest]
fn accepts_maximum_length() {
    let name = "a".repeat(DISPLAY_NAME_MAX);
    let user = User::try_register(name.clone()).expect("valid display name at boundary");
    assert_eq!(user.display_name().as_ref(), name);
}

#[rstest]
fn rejects_too_long_display_name() {
    let result = User::try_register(TestDisplayName::too_long());
    assert!(matches!(
        result,
        Err(UserValidationError::DisplayNameTooLong { max }) if max == DISPLAY_NAME_MAX
    ));
}

#[rstest]
#[case("")]
#[case("   ")]
fn rejects_empty_display_name(#[case] name: &str) {
    let result = User::try_register(name);
    assert!(matches!(result, Err(UserValidationError::EmptyDisplayName)));
}

#[rstest]
fn register_derives_lowercase_id_and_zero_score(valid_display_name: TestDisplayName) {
    let user = User::try_register(valid_display_name.clone()).expect("valid inputs");
    assert_eq!(user.id().as_ref(), "ash");
    assert_eq!(user.display_name().as_ref(), valid_display_name.as_ref());
    assert_eq!(user.score(), 0);
}

#[rstest]
fn user_id_lookup_is_case_insensitive() {
    let upper = UserId::new("MiStY").expect("valid id");
    let lower = UserId::new("misty").expect("valid id");
    assert_eq!(upper, lower);
}

#[rstest]
fn user_id_rejects_empty_input() {
    assert!(matches!(UserId::new(""), Err(UserValidationError::EmptyId)));
}

#[rstest]
fn user_id_rejects_overlong_input() {
    let result = UserId::new("x".repeat(DISPLAY_NAME_MAX + 1));
    assert!(matches!(
        result,
        Err(UserValidationError::IdTooLong { max }) if max == DISPLAY_NAME_MAX
    ));
}

#[rstest]
fn validation_messages_name_the_limit() {
    let err = UserValidationError::DisplayNameTooLong {
        max: DISPLAY_NAME_MAX,
    };
    assert_eq!(
        err.to_string(),
        "your name may not contain more than 12 characters"
    );
}

#[rstest]
fn serde_uses_camel_case_and_validates(valid_display_name: TestDisplayName) {
    let user = User::try_register(valid_display_name).expect("valid user");
    let value = serde_json::to_value(&user).expect("serialise to JSON");
    assert_eq!(
        value,
        json!({ "id": "ash", "displayName": "Ash", "score": 0 })
    );

    let invalid = json!({ "id": "ash", "displayName": "", "score": 0 });
    assert!(serde_json::from_value::<User>(invalid).is_err());
}

#[given("a valid display name")]
fn a_valid_display_name(valid_display_name: TestDisplayName) -> TestDisplayName {
    valid_display_name
}

#[when("the user registers")]
fn the_user_registers(name: TestDisplayName) -> Result<User, UserValidationError> {
    User::try_register(name)
}

#[then("a user with a normalized id is returned")]
fn a_user_with_a_normalized_id_is_returned(result: Result<User, UserValidationError>) {
    let user = result.expect("user should be created");
    assert_eq!(user.id().as_ref(), user.display_name().as_ref().to_lowercase());
}

#[rstest]
fn registering_a_user_happy_path(valid_display_name: TestDisplayName) {
    let name = a_valid_display_name(valid_display_name);
    let result = the_user_registers(name);
    a_user_with_a_normalized_id_is_returned(result);
}

#[given("a display name longer than the limit")]
fn a_display_name_longer_than_the_limit() -> TestDisplayName {
    TestDisplayName::too_long()
}

#[then("registration fails")]
fn registration_fails(result: Result<User, UserValidationError>) {
    assert!(matches!(
        result,
        Err(UserValidationError::DisplayNameTooLong { .. })
    ));
}

#[rstest]
fn registering_a_user_unhappy_path() {
    let name = a_display_name_longer_than_the_limit();
    let result = the_user_registers(name);
    registration_fails(result);
}
