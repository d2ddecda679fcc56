// SPDX-License-Identifier: Apache-2.0

use std::collections::HashMap;

use async_trait::async_trait;
use flowkeep_model::messages::{SHEETS_ACCESS_DENIED, SHEETS_LOAD_FAILED, SHEETS_NOT_CONFIGURED};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::backend::{IndexedRow, SheetBackend};
use crate::codec::{SheetName, SheetRow};
use crate::error::{StoreError, StoreErrorCode};
use crate::retry::{BackoffPolicy, RetryPolicy};

pub const DEFAULT_SHEETS_BASE_URL: &str = "https://sheets.googleapis.com";

#[derive(Debug, Clone)]
pub struct GoogleSheetsConfig {
    pub spreadsheet_id: Option<String>,
    /// OAuth access token with the spreadsheets scope.
    pub bearer_token: Option<String>,
    pub base_url: String,
    pub read_retry: RetryPolicy,
}

impl Default for GoogleSheetsConfig {
    fn default() -> Self {
        Self {
            spreadsheet_id: None,
            bearer_token: None,
            base_url: DEFAULT_SHEETS_BASE_URL.to_string(),
            read_retry: RetryPolicy::default(),
        }
    }
}

#[derive(Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

#[derive(Deserialize)]
struct SpreadsheetMeta {
    #[serde(default)]
    sheets: Vec<SheetMeta>,
}

#[derive(Deserialize)]
struct SheetMeta {
    properties: SheetProperties,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SheetProperties {
    sheet_id: i64,
    title: String,
}

/// Sheets v4 REST backend. The first row of each tab is its header.
pub struct GoogleSheetsBackend {
    client: Client,
    spreadsheet_id: String,
    bearer_token: String,
    base_url: String,
    read_retry: RetryPolicy,
    sheet_ids: Mutex<Option<HashMap<String, i64>>>,
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Bool(true) => "TRUE".to_string(),
        Value::Bool(false) => "FALSE".to_string(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn not_configured() -> StoreError {
    StoreError::new(StoreErrorCode::NotConfigured, SHEETS_NOT_CONFIGURED)
}

fn transport_error(err: &reqwest::Error) -> StoreError {
    StoreError::new(
        StoreErrorCode::Network,
        format!("{SHEETS_LOAD_FAILED} ({err})"),
    )
}

fn status_error(status: StatusCode, sheet: SheetName, body: &str) -> StoreError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            StoreError::new(StoreErrorCode::AccessDenied, SHEETS_ACCESS_DENIED)
        }
        StatusCode::NOT_FOUND => sheet_not_found(sheet),
        StatusCode::BAD_REQUEST if body.contains("Unable to parse range") => sheet_not_found(sheet),
        _ => StoreError::new(
            StoreErrorCode::Network,
            format!("{SHEETS_LOAD_FAILED} (status {status})"),
        ),
    }
}

fn sheet_not_found(sheet: SheetName) -> StoreError {
    StoreError::new(
        StoreErrorCode::SheetNotFound,
        format!("worksheet `{sheet}` was not found in the spreadsheet"),
    )
}

/// Cells in header order; columns the header lacks are dropped.
fn row_cells(header: &[String], row: &SheetRow) -> Vec<String> {
    header
        .iter()
        .map(|column| row.get(column).cloned().unwrap_or_default())
        .collect()
}

impl GoogleSheetsBackend {
    pub fn new(config: GoogleSheetsConfig) -> Result<Self, StoreError> {
        Self::with_client(Client::new(), config)
    }

    pub fn with_client(client: Client, config: GoogleSheetsConfig) -> Result<Self, StoreError> {
        let spreadsheet_id = config
            .spreadsheet_id
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(not_configured)?;
        let bearer_token = config
            .bearer_token
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(not_configured)?;
        Ok(Self {
            client,
            spreadsheet_id,
            bearer_token,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            read_retry: config.read_retry,
            sheet_ids: Mutex::new(None),
        })
    }

    fn spreadsheet_url(&self) -> String {
        format!("{}/v4/spreadsheets/{}", self.base_url, self.spreadsheet_id)
    }

    fn values_url(&self, range: &str) -> String {
        format!("{}/values/{range}", self.spreadsheet_url())
    }

    async fn send(&self, sheet: SheetName, request: RequestBuilder) -> Result<Response, StoreError> {
        let response = request
            .bearer_auth(&self.bearer_token)
            .send()
            .await
            .map_err(|e| transport_error(&e))?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(status_error(status, sheet, &body))
    }

    async fn get_values_once(&self, sheet: SheetName, range: &str) -> Result<Vec<Vec<String>>, StoreError> {
        let response = self.send(sheet, self.client.get(self.values_url(range))).await?;
        let body: ValueRange = response.json().await.map_err(|e| transport_error(&e))?;
        Ok(body
            .values
            .iter()
            .map(|row| row.iter().map(cell_text).collect())
            .collect())
    }

    async fn get_values(&self, sheet: SheetName, range: &str) -> Result<Vec<Vec<String>>, StoreError> {
        let mut attempt = 0;
        loop {
            match self.get_values_once(sheet, range).await {
                Ok(values) => return Ok(values),
                Err(err)
                    if err.code == StoreErrorCode::Network
                        && attempt + 1 < self.read_retry.max_attempts =>
                {
                    attempt += 1;
                    warn!(sheet = %sheet, attempt, error = %err, "sheet read failed, retrying");
                    tokio::time::sleep(self.read_retry.delay_for_attempt(attempt)).await;
                }
                Err(err) => return Err(err),
            }
        }
    }

    async fn header(&self, sheet: SheetName) -> Result<Vec<String>, StoreError> {
        let values = self.get_values(sheet, &format!("{}!1:1", sheet.title())).await?;
        let header = values.into_iter().next().unwrap_or_default();
        if header.is_empty() {
            return Err(StoreError::new(
                StoreErrorCode::Codec,
                format!("worksheet `{sheet}` has no header row"),
            ));
        }
        Ok(header)
    }

    async fn sheet_id(&self, sheet: SheetName) -> Result<i64, StoreError> {
        let mut cached = self.sheet_ids.lock().await;
        if cached.is_none() {
            let request = self
                .client
                .get(self.spreadsheet_url())
                .query(&[("fields", "sheets.properties(sheetId,title)")]);
            let meta: SpreadsheetMeta = self
                .send(sheet, request)
                .await?
                .json()
                .await
                .map_err(|e| transport_error(&e))?;
            *cached = Some(
                meta.sheets
                    .into_iter()
                    .map(|s| (s.properties.title, s.properties.sheet_id))
                    .collect(),
            );
        }
        cached
            .as_ref()
            .and_then(|ids| ids.get(sheet.title()).copied())
            .ok_or_else(|| sheet_not_found(sheet))
    }
}

#[async_trait]
impl SheetBackend for GoogleSheetsBackend {
    fn backend_tag(&self) -> &'static str {
        "google-sheets"
    }

    async fn read_rows(&self, sheet: SheetName) -> Result<Vec<IndexedRow>, StoreError> {
        let mut values = self.get_values(sheet, sheet.title()).await?.into_iter();
        let Some(header) = values.next() else {
            return Ok(Vec::new());
        };
        let rows: Vec<IndexedRow> = values
            .enumerate()
            .map(|(index, cells)| {
                // Trailing empty cells are omitted by the API.
                let row = header
                    .iter()
                    .enumerate()
                    .map(|(i, column)| (column.clone(), cells.get(i).cloned().unwrap_or_default()))
                    .collect();
                IndexedRow { index, row }
            })
            .collect();
        debug!(sheet = %sheet, rows = rows.len(), "sheet rows fetched");
        Ok(rows)
    }

    async fn append_row(&self, sheet: SheetName, row: &SheetRow) -> Result<(), StoreError> {
        let header = self.header(sheet).await?;
        let url = format!("{}:append", self.values_url(&format!("{}!A1", sheet.title())));
        let request = self
            .client
            .post(url)
            .query(&[
                ("valueInputOption", "USER_ENTERED"),
                ("insertDataOption", "INSERT_ROWS"),
            ])
            .json(&json!({ "values": [row_cells(&header, row)] }));
        self.send(sheet, request).await?;
        Ok(())
    }

    async fn update_row(&self, sheet: SheetName, index: usize, row: &SheetRow) -> Result<(), StoreError> {
        let header = self.header(sheet).await?;
        let range = format!("{}!A{}", sheet.title(), index + 2);
        let request = self
            .client
            .put(self.values_url(&range))
            .query(&[("valueInputOption", "USER_ENTERED")])
            .json(&json!({
                "range": range,
                "majorDimension": "ROWS",
                "values": [row_cells(&header, row)],
            }));
        self.send(sheet, request).await?;
        Ok(())
    }

    async fn delete_row(&self, sheet: SheetName, index: usize) -> Result<(), StoreError> {
        let sheet_id = self.sheet_id(sheet).await?;
        let request = self
            .client
            .post(format!("{}:batchUpdate", self.spreadsheet_url()))
            .json(&json!({
                "requests": [{
                    "deleteDimension": {
                        "range": {
                            "sheetId": sheet_id,
                            "dimension": "ROWS",
                            "startIndex": index + 1,
                            "endIndex": index + 2,
                        }
                    }
                }]
            }));
        self.send(sheet, request).await?;
        Ok(())
    }
}
