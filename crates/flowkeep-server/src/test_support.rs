// SPDX-License-Identifier: Apache-2.0

use std::ops::Deref;
use std::sync::Arc;

use flowkeep_core::SequentialIdGenerator;
use flowkeep_fontcheck::{FontCharCache, FontValidator, FsCharLists, MissingFilePolicy};
use flowkeep_model::{Project, ProjectData};
use flowkeep_store::{MemorySheetBackend, SheetsGateway};
use tempfile::TempDir;

use crate::{AppState, ServerConfig};

pub(crate) const SUPPORTED_FIXTURE: &str =
    "0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ春季健行遊";

/// Memory-backed state with character lists in a temp dir that lives as long as the state.
pub(crate) struct TestState {
    state: AppState,
    _dir: TempDir,
}

impl Deref for TestState {
    type Target = AppState;

    fn deref(&self) -> &AppState {
        &self.state
    }
}

pub(crate) fn memory_state() -> TestState {
    let dir = tempfile::tempdir().expect("tempdir");
    let lists = FsCharLists::in_dir(dir.path(), MissingFilePolicy::Fallback);
    std::fs::write(
        dir.path().join(flowkeep_fontcheck::SUPPORTED_LIST_FILE),
        SUPPORTED_FIXTURE,
    )
    .expect("write supported list");
    let gateway = SheetsGateway::new(
        Arc::new(MemorySheetBackend::new()),
        Arc::new(SequentialIdGenerator::new("p")),
        None,
    );
    let validator = FontValidator::new(Arc::new(FontCharCache::new(Arc::new(lists))));
    TestState {
        state: AppState::new(Arc::new(gateway), validator, ServerConfig::default()),
        _dir: dir,
    }
}

pub(crate) async fn seed_project(state: &AppState, name: &str, passcode: &str) -> Project {
    state
        .gateway
        .add_project(ProjectData {
            name: name.to_string(),
            passcode: passcode.to_string(),
            ..ProjectData::default()
        })
        .await
        .expect("seed project")
}
