// SPDX-License-Identifier: Apache-2.0

use std::path::Path;
use std::sync::Arc;

use flowkeep_fontcheck::{
    FontCharCache, FontCheckError, FontCheckReason, FontValidator, FsCharLists, MissingFilePolicy,
    NAME_INVALID_INPUT, NAME_VALIDATOR_UNAVAILABLE,
};
use proptest::prelude::*;

const SUPPORTED: &str = "abcdefghijklmnopqrstuvwxyz0123456789あいう";

fn validator_in(dir: &Path, supported: &str, unsupported: &str) -> FontValidator {
    std::fs::write(dir.join("supported.txt"), supported).expect("write supported");
    std::fs::write(dir.join("unsupported.txt"), unsupported).expect("write unsupported");
    let lists = FsCharLists::new(
        dir.join("supported.txt"),
        dir.join("unsupported.txt"),
        MissingFilePolicy::Fallback,
    );
    FontValidator::new(Arc::new(FontCharCache::new(Arc::new(lists))))
}

#[tokio::test]
async fn fully_supported_text_passes() {
    let dir = tempfile::tempdir().expect("tempdir");
    let validator = validator_in(dir.path(), SUPPORTED, "");
    let check = validator.validate("abc").await.expect("validate");
    assert!(check.is_supported);
    assert!(check.unsupported_chars.is_empty());
    assert_eq!(check.reason, None);
    assert_eq!(check.message(), None);
}

#[tokio::test]
async fn known_unsupported_char_short_circuits() {
    let dir = tempfile::tempdir().expect("tempdir");
    let validator = validator_in(dir.path(), SUPPORTED, "€");
    let check = validator.validate("a€").await.expect("validate");
    assert!(!check.is_supported);
    assert_eq!(check.unsupported_chars, vec!["€".to_string()]);
    assert_eq!(check.reason, Some(FontCheckReason::FoundInUnsupportedList));

    let json = serde_json::to_value(&check).expect("json");
    assert_eq!(
        json,
        serde_json::json!({
            "isSupported": false,
            "unsupportedChars": ["€"],
            "reason": "found_in_unsupported_list"
        })
    );
}

#[tokio::test]
async fn only_first_listed_char_is_reported() {
    let dir = tempfile::tempdir().expect("tempdir");
    let validator = validator_in(dir.path(), SUPPORTED, "€¥");
    let check = validator.validate("¥好€").await.expect("validate");
    assert_eq!(check.unsupported_chars, vec!["¥".to_string()]);
}

#[tokio::test]
async fn new_unsupported_char_is_appended_then_short_circuits() {
    let dir = tempfile::tempdir().expect("tempdir");
    let validator = validator_in(dir.path(), SUPPORTED, "");

    let first = validator.validate("a好").await.expect("first");
    assert!(!first.is_supported);
    assert_eq!(first.unsupported_chars, vec!["好".to_string()]);
    assert_eq!(first.reason, None);
    assert_eq!(
        first.message().as_deref(),
        Some("以下字元不支援 Kiwi Maru 字型: 好")
    );
    let persisted = std::fs::read_to_string(dir.path().join("unsupported.txt")).expect("read");
    assert_eq!(persisted, "好");

    let second = validator.validate("a好").await.expect("second");
    assert_eq!(second.reason, Some(FontCheckReason::FoundInUnsupportedList));
    let persisted = std::fs::read_to_string(dir.path().join("unsupported.txt")).expect("read");
    assert_eq!(persisted, "好");
}

#[tokio::test]
async fn appended_chars_survive_cache_invalidation() {
    let dir = tempfile::tempdir().expect("tempdir");
    let validator = validator_in(dir.path(), SUPPORTED, "");
    validator.validate("好").await.expect("first");
    validator.cache().invalidate().await;
    let again = validator.validate("好").await.expect("after reload");
    assert_eq!(again.reason, Some(FontCheckReason::FoundInUnsupportedList));
}

#[tokio::test]
async fn blank_text_is_invalid_input() {
    let dir = tempfile::tempdir().expect("tempdir");
    let validator = validator_in(dir.path(), SUPPORTED, "");
    assert_eq!(validator.validate("").await, Err(FontCheckError::InvalidInput));
    assert_eq!(validator.validate(" \n\t").await, Err(FontCheckError::InvalidInput));

    let verdict = validator.validate_event_name("   ").await;
    assert!(!verdict.is_valid);
    assert_eq!(verdict.message.as_deref(), Some(NAME_INVALID_INPUT));
}

#[tokio::test]
async fn missing_supported_list_uses_alphanumeric_fallback() {
    let dir = tempfile::tempdir().expect("tempdir");
    let lists = FsCharLists::in_dir(dir.path(), MissingFilePolicy::Fallback);
    let validator = FontValidator::new(Arc::new(FontCharCache::new(Arc::new(lists))));
    assert!(validator.validate("Event2024").await.expect("ascii").is_supported);
    assert!(!validator.validate("あ").await.expect("kana").is_supported);
}

#[tokio::test]
async fn strict_policy_reports_validator_unavailable_for_names() {
    let dir = tempfile::tempdir().expect("tempdir");
    let lists = FsCharLists::in_dir(dir.path(), MissingFilePolicy::Error);
    let validator = FontValidator::new(Arc::new(FontCharCache::new(Arc::new(lists))));
    assert!(matches!(
        validator.validate("abc").await,
        Err(FontCheckError::ListUnavailable { .. })
    ));
    let verdict = validator.validate_event_name("abc").await;
    assert!(!verdict.is_valid);
    assert_eq!(verdict.message.as_deref(), Some(NAME_VALIDATOR_UNAVAILABLE));
}

proptest! {
    #[test]
    fn texts_from_supported_list_are_supported(text in "[a-z0-9あいう ]{1,24}") {
        prop_assume!(!text.trim().is_empty());
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("runtime");
        let dir = tempfile::tempdir().expect("tempdir");
        let validator = validator_in(dir.path(), SUPPORTED, "€");
        let check = runtime.block_on(validator.validate(&text)).expect("validate");
        prop_assert!(check.is_supported);
        prop_assert!(check.unsupported_chars.is_empty());
    }

    #[test]
    fn any_listed_char_yields_exactly_one_report(
        prefix in "[a-z]{0,8}",
        suffix in "[a-z好]{0,8}",
    ) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("runtime");
        let dir = tempfile::tempdir().expect("tempdir");
        let validator = validator_in(dir.path(), SUPPORTED, "€");
        let text = format!("{prefix}€{suffix}");
        let check = runtime.block_on(validator.validate(&text)).expect("validate");
        prop_assert!(!check.is_supported);
        prop_assert_eq!(check.unsupported_chars, vec!["€".to_string()]);
    }
}
