// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

use crate::ids::ProjectId;
use crate::messages;
use crate::project::Project;
use crate::transaction::TransactionData;

pub const PROJECT_NAME_MAX_LEN: usize = 100;
pub const PROJECT_PASSCODE_MIN_LEN: usize = 3;
pub const PROJECT_PASSCODE_MAX_LEN: usize = 8;
pub const ADMIN_PASSCODE_MIN_LEN: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    #[must_use]
    pub fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
        }
    }
}

impl Display for FieldError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Trims and checks a project's name and passcode; returns the trimmed pair.
pub fn check_project_fields(
    name: &str,
    passcode: &str,
) -> Result<(String, String), Vec<FieldError>> {
    let name = name.trim();
    let passcode = passcode.trim();
    let mut errors = Vec::new();
    if name.is_empty() || passcode.is_empty() {
        if name.is_empty() {
            errors.push(FieldError::new("name", messages::PROJECT_FIELDS_REQUIRED));
        }
        if passcode.is_empty() {
            errors.push(FieldError::new("passcode", messages::PROJECT_FIELDS_REQUIRED));
        }
        return Err(errors);
    }
    if name.chars().count() > PROJECT_NAME_MAX_LEN {
        errors.push(FieldError::new("name", messages::PROJECT_NAME_TOO_LONG));
    }
    let len = passcode.chars().count();
    if !(PROJECT_PASSCODE_MIN_LEN..=PROJECT_PASSCODE_MAX_LEN).contains(&len) {
        errors.push(FieldError::new("passcode", messages::PROJECT_PASSCODE_LENGTH));
    }
    if errors.is_empty() {
        Ok((name.to_string(), passcode.to_string()))
    } else {
        Err(errors)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectConflict {
    PasscodeMatchesAdmin,
    DuplicateName,
    DuplicatePasscode,
}

impl ProjectConflict {
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::PasscodeMatchesAdmin => messages::PROJECT_PASSCODE_IS_ADMIN,
            Self::DuplicateName => messages::PROJECT_NAME_TAKEN,
            Self::DuplicatePasscode => messages::PROJECT_PASSCODE_TAKEN,
        }
    }
}

/// Checks a trimmed name/passcode against the admin passcode and every other project.
/// `editing` excludes the project being edited from the comparison.
pub fn check_project_uniqueness(
    name: &str,
    passcode: &str,
    admin_passcode: &str,
    projects: &[Project],
    editing: Option<&ProjectId>,
) -> Result<(), ProjectConflict> {
    if passcode == admin_passcode {
        return Err(ProjectConflict::PasscodeMatchesAdmin);
    }
    let lowered = name.to_lowercase();
    let others = projects
        .iter()
        .filter(|p| editing.map_or(true, |id| &p.id != id));
    let mut passcode_taken = false;
    for other in others {
        if other.name.trim().to_lowercase() == lowered {
            return Err(ProjectConflict::DuplicateName);
        }
        passcode_taken |= other.passcode == passcode;
    }
    if passcode_taken {
        return Err(ProjectConflict::DuplicatePasscode);
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasscodeChangeRejection {
    WrongCurrent,
    TooShort,
    Unchanged,
}

impl PasscodeChangeRejection {
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::WrongCurrent => messages::ADMIN_CURRENT_PASSCODE_WRONG,
            Self::TooShort => messages::ADMIN_NEW_PASSCODE_TOO_SHORT,
            Self::Unchanged => messages::ADMIN_NEW_PASSCODE_UNCHANGED,
        }
    }
}

pub fn check_admin_passcode_change(
    stored: &str,
    current: &str,
    new: &str,
) -> Result<(), PasscodeChangeRejection> {
    if current != stored {
        return Err(PasscodeChangeRejection::WrongCurrent);
    }
    if new.chars().count() < ADMIN_PASSCODE_MIN_LEN {
        return Err(PasscodeChangeRejection::TooShort);
    }
    if new == stored {
        return Err(PasscodeChangeRejection::Unchanged);
    }
    Ok(())
}

pub fn check_transaction(data: &TransactionData) -> Result<(), Vec<FieldError>> {
    let mut errors = Vec::new();
    if data.date.trim().is_empty() {
        errors.push(FieldError::new("date", messages::TRANSACTION_DATE_REQUIRED));
    } else if data.parsed_date().is_none() {
        errors.push(FieldError::new("date", messages::TRANSACTION_DATE_INVALID));
    }
    if data.item.trim().is_empty() {
        errors.push(FieldError::new("item", messages::TRANSACTION_ITEM_REQUIRED));
    }
    if data.person.trim().is_empty() {
        errors.push(FieldError::new("person", messages::TRANSACTION_PERSON_REQUIRED));
    }
    if data.amount < 0 {
        errors.push(FieldError::new("amount", messages::TRANSACTION_AMOUNT_NEGATIVE));
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::TransactionKind;

    fn project(id: &str, name: &str, passcode: &str) -> Project {
        Project {
            id: ProjectId::parse(id).expect("id"),
            name: name.to_string(),
            passcode: passcode.to_string(),
            use_kiwi_maru: false,
            kiwi_maru_supported: false,
            transactions: Vec::new(),
            common_income_items: Vec::new(),
            common_expense_items: Vec::new(),
        }
    }

    #[test]
    fn project_fields_are_trimmed_and_length_checked() {
        assert_eq!(
            check_project_fields("  夏令營 ", " 1234 "),
            Ok(("夏令營".to_string(), "1234".to_string()))
        );
        let errs = check_project_fields("夏令營", "12").expect_err("too short");
        assert_eq!(errs[0].field, "passcode");
        assert!(check_project_fields("夏令營", "123456789").is_err());
        let errs = check_project_fields(" ", "").expect_err("blank");
        assert_eq!(errs.len(), 2);
    }

    #[test]
    fn uniqueness_checks_admin_then_name_then_passcode() {
        let existing = vec![project("p1", "Camp", "1111"), project("p2", "Trip", "2222")];
        assert_eq!(
            check_project_uniqueness("New", "999999", "999999", &existing, None),
            Err(ProjectConflict::PasscodeMatchesAdmin)
        );
        assert_eq!(
            check_project_uniqueness("camp", "2222", "admin1", &existing, None),
            Err(ProjectConflict::DuplicateName)
        );
        assert_eq!(
            check_project_uniqueness("New", "2222", "admin1", &existing, None),
            Err(ProjectConflict::DuplicatePasscode)
        );
        let editing = ProjectId::parse("p1").expect("id");
        assert_eq!(
            check_project_uniqueness("Camp", "1111", "admin1", &existing, Some(&editing)),
            Ok(())
        );
    }

    #[test]
    fn admin_passcode_change_rules() {
        assert_eq!(
            check_admin_passcode_change("secret1", "nope", "secret22"),
            Err(PasscodeChangeRejection::WrongCurrent)
        );
        assert_eq!(
            check_admin_passcode_change("secret1", "secret1", "short"),
            Err(PasscodeChangeRejection::TooShort)
        );
        assert_eq!(
            check_admin_passcode_change("secret1", "secret1", "secret1"),
            Err(PasscodeChangeRejection::Unchanged)
        );
        assert_eq!(check_admin_passcode_change("secret1", "secret1", "secret22"), Ok(()));
    }

    #[test]
    fn transaction_checks_collect_every_field() {
        let data = TransactionData {
            kind: TransactionKind::Income,
            date: "2024-13-40".to_string(),
            person: String::new(),
            item: " ".to_string(),
            amount: -1,
            count: None,
            voucher_type: None,
            notes: String::new(),
        };
        let fields: Vec<String> = check_transaction(&data)
            .expect_err("invalid")
            .into_iter()
            .map(|e| e.field)
            .collect();
        assert_eq!(fields, ["date", "item", "person", "amount"]);
    }
}
