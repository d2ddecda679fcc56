// SPDX-License-Identifier: Apache-2.0

use std::path::PathBuf;
use std::sync::Arc;

use flowkeep_core::{ErrorCode, TimeSeededIdGenerator};
use flowkeep_export::export_project;
use flowkeep_fontcheck::{FontCharCache, FontValidator, FsCharLists, MissingFilePolicy};
use flowkeep_model::messages::PROJECT_NOT_FOUND;
use flowkeep_model::{ProjectId, ADMIN_PASSCODE_MIN_LEN};
use flowkeep_store::{LocalFsSheetBackend, SheetsGateway};
use serde_json::json;
use tracing::info;

use crate::{emit_ok, CliError, OutputMode};

fn local_gateway(store: PathBuf) -> SheetsGateway {
    SheetsGateway::new(
        Arc::new(LocalFsSheetBackend::new(store)),
        Arc::new(TimeSeededIdGenerator::new()),
        None,
    )
}

/// Keeps the default export path a plain file name in the working directory.
fn local_file_name(file_name: &str) -> String {
    file_name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}

/// Same verdict as the HTTP endpoint, including growing the unsupported list.
pub(crate) async fn check_font(
    supported: PathBuf,
    unsupported: PathBuf,
    on_missing: MissingFilePolicy,
    text: &str,
    output_mode: OutputMode,
) -> Result<(), CliError> {
    let lists = FsCharLists::new(supported, unsupported, on_missing);
    let validator = FontValidator::new(Arc::new(FontCharCache::new(Arc::new(lists))));
    let check = validator.validate(text).await?;
    if output_mode.json {
        let payload = serde_json::to_value(&check).map_err(|e| CliError::internal(e.to_string()))?;
        return emit_ok(output_mode, &payload);
    }
    match check.message() {
        None => println!("supported"),
        Some(warning) => println!("{warning}"),
    }
    Ok(())
}

pub(crate) async fn export(
    store: PathBuf,
    project: &str,
    out: Option<PathBuf>,
    output_mode: OutputMode,
) -> Result<(), CliError> {
    let not_found = || {
        CliError::from_code(ErrorCode::ProjectNotFound, PROJECT_NOT_FOUND)
            .with_detail("project_id", project)
    };
    let id = ProjectId::parse(project).map_err(|_| not_found())?;
    let gateway = local_gateway(store);
    let project = gateway.get_project(&id).await?.ok_or_else(not_found)?;
    let workbook = export_project(&project).map_err(|e| CliError::internal(e.to_string()))?;
    let path = out.unwrap_or_else(|| PathBuf::from(local_file_name(&workbook.file_name)));
    std::fs::write(&path, &workbook.bytes).map_err(|e| {
        CliError::internal(format!("failed to write {}: {e}", path.display()))
    })?;
    info!(project_id = %id, path = %path.display(), "project exported");
    emit_ok(
        output_mode,
        &json!({
            "command": "export",
            "project_id": id.as_str(),
            "path": path.display().to_string(),
            "rows": project.transactions.len(),
            "bytes": workbook.bytes.len(),
        }),
    )
}

pub(crate) async fn init_admin(
    store: PathBuf,
    passcode: &str,
    output_mode: OutputMode,
) -> Result<(), CliError> {
    let passcode = passcode.trim();
    if passcode.chars().count() < ADMIN_PASSCODE_MIN_LEN {
        return Err(CliError::from_code(
            ErrorCode::ValidationFailed,
            format!("admin passcode must be at least {ADMIN_PASSCODE_MIN_LEN} characters"),
        ));
    }
    let gateway = local_gateway(store);
    gateway.set_admin_passcode(passcode).await?;
    emit_ok(output_mode, &json!({"command": "init-admin", "status": "ok"}))
}
