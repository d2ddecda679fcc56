// SPDX-License-Identifier: Apache-2.0

pub(crate) mod router;
mod state;

pub use state::AppState;
