// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::account::Account;
use std::collections::BTreeSet;

/// Everything a paginator needs to scope one fetch: the selected account and
/// the exclusion filters in effect.
///
/// Rebuilt whenever the account or the filters change; paginators snapshot
/// the latest context per request and reset their cursors when the snapshot
/// differs from the one the cursor was built under. Past requests are never
/// replayed against a new context.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FetchContext {
    pub account: Option<Account>,
    pub excluded_filters: BTreeSet<String>,
}

impl FetchContext {
    pub fn new(account: Option<Account>, excluded_filters: BTreeSet<String>) -> Self {
        Self {
            account,
            excluded_filters,
        }
    }

    /// A context is ready once the session has seen a selected account.
    /// Ownership-scoped fetches wait for readiness instead of issuing
    /// account-less requests.
    pub fn is_ready(&self) -> bool {
        self.account.is_some()
    }
}
