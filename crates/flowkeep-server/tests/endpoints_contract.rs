// SPDX-License-Identifier: Apache-2.0

use std::net::SocketAddr;
use std::sync::Arc;

use flowkeep_core::SequentialIdGenerator;
use flowkeep_fontcheck::{
    FontCharCache, FontValidator, FsCharLists, MissingFilePolicy, SUPPORTED_LIST_FILE,
    UNSUPPORTED_LIST_FILE,
};
use flowkeep_server::{build_router, AppState, ServerConfig};
use flowkeep_store::{MemorySheetBackend, SheetsGateway};
use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};

const ADMIN: &str = "admin-secret";

struct Fixture {
    addr: SocketAddr,
    dir: tempfile::TempDir,
}

async fn spawn_server() -> Fixture {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(
        dir.path().join(SUPPORTED_LIST_FILE),
        "0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ春遊",
    )
    .expect("supported list");
    let lists = FsCharLists::in_dir(dir.path(), MissingFilePolicy::Fallback);
    let gateway = SheetsGateway::new(
        Arc::new(MemorySheetBackend::new()),
        Arc::new(SequentialIdGenerator::new("id")),
        None,
    );
    gateway.set_admin_passcode(ADMIN).await.expect("admin passcode");
    let validator = FontValidator::new(Arc::new(FontCharCache::new(Arc::new(lists))));
    let state = AppState::new(Arc::new(gateway), validator, ServerConfig::default());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, build_router(state))
            .await
            .expect("serve");
    });
    Fixture { addr, dir }
}

struct Reply {
    status: u16,
    head: String,
    body: String,
}

impl Reply {
    fn json(&self) -> Value {
        serde_json::from_str(&self.body).expect("json body")
    }
}

async fn send_raw(
    addr: SocketAddr,
    method: &str,
    path: &str,
    headers: &[(&str, &str)],
    body: Option<&str>,
) -> Reply {
    let mut stream = tokio::net::TcpStream::connect(addr)
        .await
        .expect("connect server");
    let mut req = format!("{method} {path} HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\n");
    for (name, value) in headers {
        req.push_str(&format!("{name}: {value}\r\n"));
    }
    let payload = body.unwrap_or("");
    if body.is_some() {
        req.push_str("Content-Type: application/json\r\n");
    }
    req.push_str(&format!("Content-Length: {}\r\n\r\n{payload}", payload.len()));
    stream
        .write_all(req.as_bytes())
        .await
        .expect("write request");
    let mut raw = Vec::new();
    stream
        .read_to_end(&mut raw)
        .await
        .expect("read response");
    let response = String::from_utf8_lossy(&raw).to_string();
    let (head, body) = response
        .split_once("\r\n\r\n")
        .expect("http response separator");
    let status = head
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .and_then(|s| s.parse::<u16>().ok())
        .expect("status");
    Reply {
        status,
        head: head.to_string(),
        body: body.to_string(),
    }
}

fn admin() -> [(&'static str, &'static str); 1] {
    [("x-admin-passcode", ADMIN)]
}

#[tokio::test]
async fn health_and_openapi_are_public() {
    let fx = spawn_server().await;
    let health = send_raw(fx.addr, "GET", "/healthz", &[], None).await;
    assert_eq!(health.status, 200);
    assert_eq!(health.json()["store_backend"], "memory");
    assert!(health.head.to_ascii_lowercase().contains("x-request-id: req-"));

    let spec = send_raw(fx.addr, "GET", "/v1/openapi.json", &[], None).await;
    assert_eq!(spec.status, 200);
    assert!(spec.json()["paths"].get("/api/validate-font").is_some());
}

#[tokio::test]
async fn validate_font_keeps_legacy_contract() {
    let fx = spawn_server().await;
    let ok = send_raw(fx.addr, "POST", "/api/validate-font", &[], Some(r#"{"text":"abc"}"#)).await;
    assert_eq!(ok.status, 200);
    assert_eq!(ok.json(), json!({"isSupported": true, "unsupportedChars": []}));

    let first = send_raw(fx.addr, "POST", "/api/validate-font", &[], Some(r#"{"text":"a好"}"#)).await;
    assert_eq!(first.json(), json!({"isSupported": false, "unsupportedChars": ["好"]}));
    let appended = std::fs::read_to_string(fx.dir.path().join(UNSUPPORTED_LIST_FILE))
        .expect("unsupported list");
    assert_eq!(appended, "好");

    let second = send_raw(fx.addr, "POST", "/api/validate-font", &[], Some(r#"{"text":"遊好"}"#)).await;
    assert_eq!(
        second.json(),
        json!({"isSupported": false, "unsupportedChars": ["好"], "reason": "found_in_unsupported_list"})
    );

    for body in [r#"{"text":""}"#, r#"{"text":7}"#, r#"{}"#, "   "] {
        let bad = send_raw(fx.addr, "POST", "/api/validate-font", &[], Some(body)).await;
        assert_eq!(bad.status, 400, "{body}");
        assert_eq!(bad.json(), json!({"error": "Invalid input"}));
    }
    let blank = send_raw(fx.addr, "POST", "/api/validate-font", &[], Some(r#"{"text":"  \n "}"#)).await;
    assert_eq!(blank.status, 400);
}

#[tokio::test]
async fn admin_routes_check_passcode_every_call() {
    let fx = spawn_server().await;
    let denied = send_raw(fx.addr, "GET", "/v1/projects", &[], None).await;
    assert_eq!(denied.status, 401);
    let err = &denied.json()["error"];
    assert_eq!(err["code"], "Unauthorized");
    assert!(err["request_id"].as_str().is_some_and(|id| id.starts_with("req-")));

    let verify = send_raw(
        fx.addr,
        "POST",
        "/v1/admin/verify",
        &[],
        Some(&json!({"passcode": ADMIN}).to_string()),
    )
    .await;
    assert_eq!(verify.json(), json!({"ok": true}));

    let short = send_raw(
        fx.addr,
        "POST",
        "/v1/admin/passcode",
        &admin(),
        Some(&json!({"currentPasscode": ADMIN, "newPasscode": "abc"}).to_string()),
    )
    .await;
    assert_eq!(short.status, 400);
    assert_eq!(short.json()["error"]["message"], "新密碼長度至少需要 6 位。");

    let changed = send_raw(
        fx.addr,
        "POST",
        "/v1/admin/passcode",
        &admin(),
        Some(&json!({"currentPasscode": ADMIN, "newPasscode": "fresh-pass"}).to_string()),
    )
    .await;
    assert_eq!(changed.status, 200);
    let stale = send_raw(fx.addr, "GET", "/v1/projects", &admin(), None).await;
    assert_eq!(stale.status, 401);
}

#[tokio::test]
async fn project_lifecycle_over_http() {
    let fx = spawn_server().await;
    let created = send_raw(
        fx.addr,
        "POST",
        "/v1/projects",
        &admin(),
        Some(&json!({"name": " 春遊 ", "passcode": "1234"}).to_string()),
    )
    .await;
    assert_eq!(created.status, 201);
    let project = created.json()["project"].clone();
    assert_eq!(project["name"], "春遊");
    assert_eq!(project["useKiwiMaru"], true);
    assert!(created.json().get("fontWarning").is_none());
    let id = project["id"].as_str().expect("id").to_string();

    let dup = send_raw(
        fx.addr,
        "POST",
        "/v1/projects",
        &admin(),
        Some(&json!({"name": "春遊", "passcode": "9999"}).to_string()),
    )
    .await;
    assert_eq!(dup.status, 409);
    assert_eq!(dup.json()["error"]["code"], "DuplicateProjectName");

    let warned = send_raw(
        fx.addr,
        "POST",
        "/v1/projects",
        &admin(),
        Some(&json!({"name": "好日子", "passcode": "4321"}).to_string()),
    )
    .await;
    assert_eq!(warned.status, 201);
    assert_eq!(warned.json()["project"]["kiwiMaruSupported"], false);
    assert!(warned.json()["fontWarning"].as_str().is_some());

    let directory = send_raw(fx.addr, "GET", "/v1/projects/directory", &[], None).await;
    let listing = directory.json();
    assert_eq!(listing.as_array().map(Vec::len), Some(2));
    assert!(listing[0].get("passcode").is_none());

    let unlock = send_raw(
        fx.addr,
        "POST",
        &format!("/v1/projects/{id}/unlock"),
        &[],
        Some(r#"{"passcode":"0000"}"#),
    )
    .await;
    assert_eq!(unlock.status, 401);
    assert_eq!(unlock.json()["error"]["message"], "密碼錯誤");

    let project_auth = [("x-project-passcode", "1234")];
    let tx = send_raw(
        fx.addr,
        "POST",
        &format!("/v1/projects/{id}/transactions"),
        &project_auth,
        Some(
            &json!({"type": "income", "date": "2024-04-01", "person": "Amy", "item": "報名費", "amount": 500, "count": 2})
                .to_string(),
        ),
    )
    .await;
    assert_eq!(tx.status, 201);
    assert_eq!(tx.json()["projectId"], id.as_str());

    let detail = send_raw(fx.addr, "GET", &format!("/v1/projects/{id}"), &project_auth, None).await;
    assert_eq!(detail.status, 200);
    assert_eq!(detail.json()["commonIncomeItems"], json!(["報名費"]));
    assert!(detail.json().get("passcode").is_none());

    let stats = send_raw(
        fx.addr,
        "GET",
        &format!("/v1/projects/{id}/statistics"),
        &[("x-project-passcode", ADMIN)],
        None,
    )
    .await;
    assert_eq!(stats.status, 200);
    assert_eq!(stats.json()["totalIncome"], 500);

    let export = send_raw(
        fx.addr,
        "GET",
        &format!("/v1/projects/{id}/export.xlsx"),
        &project_auth,
        None,
    )
    .await;
    assert_eq!(export.status, 200);
    let head = export.head.to_ascii_lowercase();
    assert!(head.contains("application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"));
    assert!(head.contains("content-disposition: attachment"));

    let wrong_confirm = send_raw(
        fx.addr,
        "DELETE",
        &format!("/v1/projects/{id}"),
        &admin(),
        Some(r#"{"confirmPasscode":"0000"}"#),
    )
    .await;
    assert_eq!(wrong_confirm.status, 401);

    let deleted = send_raw(
        fx.addr,
        "DELETE",
        &format!("/v1/projects/{id}"),
        &admin(),
        Some(r#"{"confirmPasscode":"1234"}"#),
    )
    .await;
    assert_eq!(deleted.status, 200);
    assert_eq!(deleted.json(), json!({"deletedTransactions": 1}));

    let gone = send_raw(fx.addr, "GET", &format!("/v1/projects/{id}"), &project_auth, None).await;
    assert_eq!(gone.status, 404);
    assert_eq!(gone.json()["error"]["message"], "找不到指定的活動");
}

#[tokio::test]
async fn font_admin_tools_manage_unsupported_list() {
    let fx = spawn_server().await;
    let added = send_raw(
        fx.addr,
        "POST",
        "/v1/fonts/unsupported",
        &admin(),
        Some(r#"{"chars":"龍 龍鳳"}"#),
    )
    .await;
    assert_eq!(added.status, 200);
    assert_eq!(added.json()["added"], 2);

    let invalidated = send_raw(fx.addr, "POST", "/v1/fonts/cache/invalidate", &admin(), None).await;
    assert_eq!(invalidated.status, 200);

    let listed = send_raw(fx.addr, "GET", "/v1/fonts/unsupported", &admin(), None).await;
    assert_eq!(listed.json()["chars"], json!([]));
}
