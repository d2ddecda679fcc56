// SPDX-License-Identifier: Apache-2.0

pub(crate) mod admin;
pub(crate) mod auth;
pub(crate) mod fonts;
pub(crate) mod handlers;
pub(crate) mod projects;
pub(crate) mod request_tracing;
pub(crate) mod response;
pub(crate) mod transactions;
