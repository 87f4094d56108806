use crate::AddressVersion;
use core::{fmt, time::Duration};

/// Summary of a completed dispatch run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DispatchReport {
    v2_shards: usize,
    v3_shards: usize,
    addresses: usize,
    elapsed: Duration,
}

impl DispatchReport {
    pub(crate) const fn record(&mut self, version: AddressVersion, addresses: usize) {
        match version {
            AddressVersion::V2 => self.v2_shards += 1,
            AddressVersion::V3 => self.v3_shards += 1,
        }
        self.addresses += addresses;
    }

    pub(crate) const fn finish(mut self, elapsed: Duration) -> Self {
        self.elapsed = elapsed;
        self
    }

    /// Shards persisted for `version`.
    #[must_use]
    pub const fn shards(&self, version: AddressVersion) -> usize {
        match version {
            AddressVersion::V2 => self.v2_shards,
            AddressVersion::V3 => self.v3_shards,
        }
    }

    #[must_use]
    pub const fn total_shards(&self) -> usize {
        self.v2_shards + self.v3_shards
    }

    /// Addresses persisted across all shards.
    #[must_use]
    pub const fn addresses(&self) -> usize {
        self.addresses
    }

    #[must_use]
    pub const fn elapsed(&self) -> Duration {
        self.elapsed
    }
}

impl fmt::Display for DispatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} addresses in {} shards (v2: {}, v3: {}) in {:.2?}",
            self.addresses,
            self.total_shards(),
            self.v2_shards,
            self.v3_shards,
            self.elapsed
        )
    }
}
