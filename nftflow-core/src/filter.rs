// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::fmt;

/// User-facing NFT visibility filters.
///
/// Persisted state tracks *excluded* filter names; a filter is applied when
/// it is absent from the exclusion set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NftFilter {
    Spam,
    Airdrops,
}

impl NftFilter {
    pub const ALL: [NftFilter; 2] = [NftFilter::Spam, NftFilter::Airdrops];

    /// Uppercase name used in exclusion sets and remote queries.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Spam => "SPAM",
            Self::Airdrops => "AIRDROPS",
        }
    }
}

impl fmt::Display for NftFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
