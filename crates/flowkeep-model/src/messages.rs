// SPDX-License-Identifier: Apache-2.0

//! User-facing messages, kept in the application's Traditional Chinese wording.

pub const PROJECT_NOT_FOUND: &str = "找不到指定的活動";
pub const TRANSACTION_NOT_FOUND: &str = "找不到指定的紀錄";
pub const SHEETS_NOT_CONFIGURED: &str = "Google Sheets is not configured on the server.";
pub const SHEETS_ACCESS_DENIED: &str =
    "無法存取 Google Sheet。請確認服務帳戶的 email 已被分享至您的 Google Sheet 並給予「編輯者」權限。";
pub const SHEETS_LOAD_FAILED: &str = "載入 Google Sheet 文件時發生錯誤，請檢查您的憑證是否正確。";
pub const ADMIN_PASSCODE_MISSING: &str = "在 Google Sheet 中找不到管理員密碼設定";

pub const PROJECT_FIELDS_REQUIRED: &str = "請填寫活動名稱和密碼。";
pub const PROJECT_NAME_TOO_LONG: &str = "活動名稱太長";
pub const PROJECT_PASSCODE_LENGTH: &str = "活動密碼長度必須介於 3 到 8 位之間。";
pub const PROJECT_PASSCODE_IS_ADMIN: &str = "活動密碼不能與管理員密碼相同。";
pub const PROJECT_NAME_TAKEN: &str = "活動名稱已被使用。";
pub const PROJECT_PASSCODE_TAKEN: &str = "活動密碼已被其他活動使用。";
pub const PROJECT_DELETE_PASSCODE_WRONG: &str = "活動密碼錯誤，刪除失敗。";
pub const PROJECT_PASSCODE_WRONG: &str = "密碼錯誤";

pub const ADMIN_PASSCODE_WRONG: &str = "管理員密碼錯誤";
pub const ADMIN_CURRENT_PASSCODE_WRONG: &str = "目前密碼錯誤。";
pub const ADMIN_NEW_PASSCODE_TOO_SHORT: &str = "新密碼長度至少需要 6 位。";
pub const ADMIN_NEW_PASSCODE_UNCHANGED: &str = "新密碼不可與目前密碼相同。";
pub const ADMIN_PASSCODE_UPDATED: &str = "管理員密碼已成功更新。";

pub const TRANSACTION_DATE_REQUIRED: &str = "請選擇日期";
pub const TRANSACTION_DATE_INVALID: &str = "日期格式錯誤";
pub const TRANSACTION_ITEM_REQUIRED: &str = "項目不能為空";
pub const TRANSACTION_PERSON_REQUIRED: &str = "人員不能為空";
pub const TRANSACTION_AMOUNT_NEGATIVE: &str = "金額必須大於0";
