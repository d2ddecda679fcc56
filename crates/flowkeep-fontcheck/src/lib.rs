// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]
//! Kiwi Maru font coverage checks.
//!
//! The server side ([`FontValidator`]) decides from two flat character lists
//! whether a text renders in the decorative font, and grows the unsupported
//! list as it discovers new characters. The probe side ([`FontProbe`]) is a
//! pixel-diff heuristic for instant UI feedback; it is never authoritative.

mod cache;
mod charset;
mod error;
mod probe;
mod source;
mod validator;

pub use cache::{CharLists, FontCharCache};
pub use charset::{unique_units, CharSet, FALLBACK_SUPPORTED_CHARS};
pub use error::FontCheckError;
pub use probe::{FontProbe, GlyphCanvas, DEFAULT_FALLBACK_FONT, DEFAULT_PROBE_SIZE_PX, TARGET_FONT};
pub use source::{
    CharListSource, FsCharLists, HttpCharLists, MissingFilePolicy, SUPPORTED_LIST_FILE,
    UNSUPPORTED_LIST_FILE,
};
pub use validator::{
    FontCheck, FontCheckReason, FontValidator, NameFontVerdict, NAME_INVALID_INPUT,
    NAME_VALIDATOR_UNAVAILABLE,
};

pub const CRATE_NAME: &str = "flowkeep-fontcheck";
