//! Shared test harness for storage backend testing
//!
//! Two macros generate test suites that any backend must pass:
//! - `store_contract_tests!`: the five store traits, called directly
//! - `social_flow_tests!`: follow lifecycle and gated content through `AppState`
//!
//! # Usage
//!
//! From any integration test file in `tests/`:
//! ```rust,ignore
//! #[macro_use]
//! mod storage_harness;
//! use storage_harness::*;
//!
//! store_contract_tests!(InMemoryStore::new());
//! ```
//!
//! The factory expression is re-evaluated for each test and must yield a
//! `Clone` backend exposing `insert_user` and `set_private`.

#![allow(dead_code)]

#[macro_use]
pub mod store_contract_tests;
#[macro_use]
pub mod social_flow_tests;

use snapgraph::core::content::UserProfile;
use snapgraph::core::query::PageRequest;

/// A profile with a predictable username
pub fn profile(username: &str, is_private: bool) -> UserProfile {
    UserProfile::new(username, format!("{} (display)", username), is_private)
}

/// A page large enough to hold every fixture row
pub fn everything() -> PageRequest {
    PageRequest::new(1, 100)
}

/// Picture URLs as handed back by an upload provider
pub fn pictures(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| format!("https://cdn.example.test/p/{i}.jpg"))
        .collect()
}
