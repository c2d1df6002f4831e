// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use futures::future::ready;
use futures::stream::BoxStream;
use futures::StreamExt;
use nftflow_core::{Account, AccountRepository};
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

/// In-memory selected-account source.
pub struct MockAccountRepository {
    account_tx: watch::Sender<Option<Account>>,
}

impl MockAccountRepository {
    /// Starts with no account selected; observers wait until one is set.
    pub fn new() -> Self {
        let (account_tx, _) = watch::channel(None);
        Self { account_tx }
    }

    pub fn with_account(account: Account) -> Self {
        let (account_tx, _) = watch::channel(Some(account));
        Self { account_tx }
    }

    pub fn select(&self, account: Account) {
        self.account_tx.send_replace(Some(account));
    }
}

impl Default for MockAccountRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl AccountRepository for MockAccountRepository {
    fn selected_account_stream(&self) -> BoxStream<'static, Account> {
        WatchStream::new(self.account_tx.subscribe())
            .filter_map(|selected| ready(selected))
            .boxed()
    }
}
