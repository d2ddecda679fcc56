// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;

use flowkeep_core::SequentialIdGenerator;
use flowkeep_model::messages::{ADMIN_PASSCODE_MISSING, PROJECT_NOT_FOUND, TRANSACTION_NOT_FOUND};
use flowkeep_model::{
    ProjectData, ProjectId, ProjectPatch, TransactionData, TransactionId, TransactionKind,
    VoucherType,
};
use flowkeep_store::{
    MemorySheetBackend, SheetBackend, SheetName, SheetsGateway, StoreErrorCode,
};

fn gateway() -> (Arc<MemorySheetBackend>, SheetsGateway) {
    let backend = Arc::new(MemorySheetBackend::new());
    let gateway = SheetsGateway::new(
        backend.clone(),
        Arc::new(SequentialIdGenerator::new("id")),
        None,
    );
    (backend, gateway)
}

fn project(name: &str, passcode: &str) -> ProjectData {
    ProjectData {
        name: name.to_string(),
        passcode: passcode.to_string(),
        use_kiwi_maru: true,
        kiwi_maru_supported: true,
        ..ProjectData::default()
    }
}

fn income(item: &str, amount: i64) -> TransactionData {
    TransactionData {
        kind: TransactionKind::Income,
        date: "2024-05-01".to_string(),
        person: "小明".to_string(),
        item: item.to_string(),
        amount,
        count: Some(2),
        voucher_type: None,
        notes: String::new(),
    }
}

#[tokio::test]
async fn admin_passcode_missing_is_a_configuration_error() {
    let (_, gateway) = gateway();
    let err = gateway.get_admin_passcode().await.expect_err("no sentinel");
    assert_eq!(err.code, StoreErrorCode::NotConfigured);
    assert_eq!(err.message, ADMIN_PASSCODE_MISSING);

    gateway.set_admin_passcode("000123").await.expect("set");
    assert_eq!(gateway.get_admin_passcode().await.expect("get"), "000123");
    gateway.set_admin_passcode("654321").await.expect("update");
    assert_eq!(gateway.get_admin_passcode().await.expect("get"), "654321");
}

#[tokio::test]
async fn sentinel_row_is_hidden_from_listings() {
    let (backend, gateway) = gateway();
    gateway.set_admin_passcode("123456").await.expect("set");
    gateway.add_project(project("春季露營", "0042")).await.expect("add");

    let projects = gateway.list_projects().await.expect("list");
    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0].passcode, "0042");
    let raw = backend.rows(SheetName::Projects);
    assert_eq!(raw.len(), 2);
    assert_eq!(raw[1]["passcode"], "'0042");
}

#[tokio::test]
async fn listing_is_cached_until_a_mutation() {
    let (backend, gateway) = gateway();
    let created = gateway.add_project(project("A", "111")).await.expect("add");
    gateway.list_projects().await.expect("cold");
    let calls = backend.call_count();
    gateway.list_projects().await.expect("warm");
    gateway.get_project(&created.id).await.expect("warm get");
    assert_eq!(backend.call_count(), calls);

    gateway
        .update_project(
            &created.id,
            &ProjectPatch {
                name: Some("B".to_string()),
                ..ProjectPatch::default()
            },
        )
        .await
        .expect("update");
    let projects = gateway.list_projects().await.expect("after write");
    assert_eq!(projects[0].name, "B");
    assert!(backend.call_count() > calls);
}

#[tokio::test]
async fn transactions_attach_to_projects_and_remember_items() {
    let (_, gateway) = gateway();
    let p = gateway.add_project(project("A", "111")).await.expect("add");
    let tx = gateway
        .add_transaction(&p.id, income("報名費", 500))
        .await
        .expect("tx");
    gateway
        .add_transaction(&p.id, income("報名費", 300))
        .await
        .expect("tx2");

    let loaded = gateway.get_project(&p.id).await.expect("get").expect("some");
    assert_eq!(loaded.transactions.len(), 2);
    assert_eq!(loaded.common_income_items, vec!["報名費"]);

    let mut edited = tx.clone();
    edited.data = TransactionData {
        kind: TransactionKind::Expense,
        item: "場地".to_string(),
        count: None,
        voucher_type: Some(VoucherType::Invoice),
        ..edited.data
    };
    gateway.update_transaction(&p.id, &edited).await.expect("update");
    let loaded = gateway.get_project(&p.id).await.expect("get").expect("some");
    assert_eq!(loaded.common_expense_items, vec!["場地"]);
    assert!(loaded.transactions.contains(&edited));
}

#[tokio::test]
async fn unknown_ids_produce_localized_not_found() {
    let (_, gateway) = gateway();
    let ghost = ProjectId::parse("ghost").expect("id");
    let err = gateway
        .add_transaction(&ghost, income("x", 1))
        .await
        .expect_err("missing project");
    assert_eq!(err.code, StoreErrorCode::ProjectNotFound);
    assert_eq!(err.message, PROJECT_NOT_FOUND);

    let p = gateway.add_project(project("A", "111")).await.expect("add");
    let err = gateway
        .delete_transaction(&p.id, &TransactionId::parse("nope").expect("id"))
        .await
        .expect_err("missing tx");
    assert_eq!(err.message, TRANSACTION_NOT_FOUND);
}

#[tokio::test]
async fn transaction_of_another_project_is_not_found() {
    let (_, gateway) = gateway();
    let a = gateway.add_project(project("A", "111")).await.expect("a");
    let b = gateway.add_project(project("B", "222")).await.expect("b");
    let tx = gateway.add_transaction(&a.id, income("x", 1)).await.expect("tx");
    let err = gateway
        .delete_transaction(&b.id, &tx.id)
        .await
        .expect_err("wrong project");
    assert_eq!(err.code, StoreErrorCode::TransactionNotFound);
}

#[tokio::test]
async fn delete_project_removes_its_transactions_only() {
    let (backend, gateway) = gateway();
    let a = gateway.add_project(project("A", "111")).await.expect("a");
    let b = gateway.add_project(project("B", "222")).await.expect("b");
    for amount in [1, 2, 3] {
        gateway.add_transaction(&a.id, income("x", amount)).await.expect("a tx");
    }
    gateway.add_transaction(&b.id, income("y", 9)).await.expect("b tx");

    assert_eq!(gateway.delete_project(&a.id).await.expect("delete"), 3);
    let remaining = backend.rows(SheetName::Transactions);
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0]["projectId"], b.id.as_str());
    assert!(gateway.get_project(&a.id).await.expect("get").is_none());
}

#[tokio::test]
async fn failed_cascade_leaves_partial_state() {
    let (backend, gateway) = gateway();
    let a = gateway.add_project(project("A", "111")).await.expect("a");
    for amount in [1, 2, 3] {
        gateway.add_transaction(&a.id, income("x", amount)).await.expect("tx");
    }
    backend.fail_deletes_after(2);
    let err = gateway.delete_project(&a.id).await.expect_err("partial");
    assert_eq!(err.code, StoreErrorCode::Network);
    assert!(gateway.get_project(&a.id).await.expect("get").is_none());
    assert_eq!(backend.rows(SheetName::Transactions).len(), 2);
}

#[tokio::test]
async fn common_items_can_be_removed_and_cleared() {
    let (_, gateway) = gateway();
    let p = gateway.add_project(project("A", "111")).await.expect("add");
    for item in ["報名費", "贊助", "義賣"] {
        gateway.add_transaction(&p.id, income(item, 1)).await.expect("tx");
    }
    gateway
        .delete_common_item(&p.id, TransactionKind::Income, "贊助")
        .await
        .expect("delete item");
    let loaded = gateway.get_project(&p.id).await.expect("get").expect("some");
    assert_eq!(loaded.common_income_items, vec!["報名費", "義賣"]);

    gateway
        .clear_common_items(&p.id, TransactionKind::Income)
        .await
        .expect("clear");
    let loaded = gateway.get_project(&p.id).await.expect("get").expect("some");
    assert!(loaded.common_income_items.is_empty());
    assert_eq!(loaded.transactions.len(), 3);
}

#[tokio::test]
async fn malformed_rows_fail_the_listing() {
    let (backend, gateway) = gateway();
    let mut row = flowkeep_store::SheetRow::new();
    row.insert("id".to_string(), "p1".to_string());
    row.insert("name".to_string(), "A".to_string());
    row.insert("passcode".to_string(), "'111".to_string());
    row.insert("useKiwiMaru".to_string(), "maybe".to_string());
    backend
        .append_row(SheetName::Projects, &row)
        .await
        .expect("append");
    let err = gateway.list_projects().await.expect_err("malformed");
    assert_eq!(err.code, StoreErrorCode::Codec);
    assert!(err.message.contains("useKiwiMaru"));
}

#[tokio::test]
async fn missing_tab_is_sheet_not_found() {
    let gateway = SheetsGateway::new(
        Arc::new(MemorySheetBackend::without_sheets()),
        Arc::new(SequentialIdGenerator::new("id")),
        None,
    );
    let err = gateway.list_projects().await.expect_err("no tabs");
    assert_eq!(err.code, StoreErrorCode::SheetNotFound);
}
