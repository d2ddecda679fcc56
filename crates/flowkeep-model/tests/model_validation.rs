// SPDX-License-Identifier: Apache-2.0

use flowkeep_model::{
    check_project_fields, ProjectId, TransactionData, TransactionKind, PROJECT_PASSCODE_MAX_LEN,
    PROJECT_PASSCODE_MIN_LEN,
};
use proptest::prelude::*;
use proptest::test_runner::Config;

proptest! {
    #![proptest_config(Config::with_cases(128))]
    #[test]
    fn passcodes_inside_length_window_are_accepted(
        passcode in "[0-9A-Za-z]{3,8}",
        name in "[a-z\u{4e00}-\u{4e20}]{1,20}"
    ) {
        let (n, p) = check_project_fields(&name, &passcode).expect("valid project fields");
        prop_assert_eq!(n, name);
        prop_assert_eq!(p, passcode);
    }

    #[test]
    fn passcodes_outside_length_window_are_rejected(passcode in "[0-9]{9,16}|[0-9]{1,2}") {
        let len = passcode.chars().count();
        prop_assume!(!(PROJECT_PASSCODE_MIN_LEN..=PROJECT_PASSCODE_MAX_LEN).contains(&len));
        prop_assert!(check_project_fields("活動", &passcode).is_err());
    }

    #[test]
    fn project_ids_without_separators_roundtrip(id in "[0-9a-z]{1,64}") {
        let parsed = ProjectId::parse(id.clone()).expect("project id");
        prop_assert_eq!(parsed.to_string(), id);
    }
}

#[test]
fn income_payload_without_optional_fields_deserializes() {
    let data: TransactionData = serde_json::from_str(
        r#"{"type":"income","date":"2024-01-02","person":"A","item":"報名費","amount":100}"#,
    )
    .expect("deserialize");
    assert_eq!(data.kind, TransactionKind::Income);
    assert_eq!(data.count, None);
    assert_eq!(data.notes, "");
}
