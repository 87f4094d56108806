use crate::{AddressVersion, Error, Result, SeedSequence, rand::DEFAULT_SEED};
use tokio::sync::Semaphore;

/// Number of addresses produced by one worker unless configured otherwise.
pub const DEFAULT_BATCH_UNIT: usize = 5000;

/// Which address versions a run produces.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VersionSelection {
    pub v2: bool,
    pub v3: bool,
}

impl VersionSelection {
    pub const V2: Self = Self { v2: true, v3: false };
    pub const V3: Self = Self { v2: false, v3: true };
    pub const BOTH: Self = Self { v2: true, v3: true };

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        !self.v2 && !self.v3
    }

    #[must_use]
    pub const fn contains(&self, version: AddressVersion) -> bool {
        match version {
            AddressVersion::V2 => self.v2,
            AddressVersion::V3 => self.v3,
        }
    }

    /// Selected versions, v2 first.
    pub fn iter(&self) -> impl Iterator<Item = AddressVersion> + '_ {
        AddressVersion::ALL
            .into_iter()
            .filter(|version| self.contains(*version))
    }
}

/// Parameters of one dispatch run.
///
/// Build with [`DispatchPlan::new`] and the `with_*` methods, then check with
/// [`DispatchPlan::validate`]. [`crate::Dispatcher::new`] validates for you.
///
/// # Example
/// ```
/// use onionfix::{DispatchPlan, VersionSelection};
///
/// let plan = DispatchPlan::new(15_000, VersionSelection::V2);
/// assert!(plan.validate().is_ok());
/// assert_eq!(plan.jobs_per_version(), 3);
///
/// let plan = DispatchPlan::new(7_000, VersionSelection::V2);
/// assert!(plan.validate().is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DispatchPlan {
    total: usize,
    batch_unit: usize,
    versions: VersionSelection,
    seeds: SeedSequence,
    max_concurrency: usize,
}

impl DispatchPlan {
    /// A plan for `total` addresses of each selected version, with the default
    /// batch unit and seed and one concurrent worker per available CPU.
    #[must_use]
    pub fn new(total: usize, versions: VersionSelection) -> Self {
        Self {
            total,
            batch_unit: DEFAULT_BATCH_UNIT,
            versions,
            seeds: SeedSequence::new(DEFAULT_SEED),
            max_concurrency: std::thread::available_parallelism().map_or(1, usize::from),
        }
    }

    #[must_use]
    pub const fn with_batch_unit(mut self, batch_unit: usize) -> Self {
        self.batch_unit = batch_unit;
        self
    }

    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seeds = SeedSequence::new(seed);
        self
    }

    /// Caps how many workers generate at the same time.
    #[must_use]
    pub const fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency;
        self
    }

    #[must_use]
    pub const fn total(&self) -> usize {
        self.total
    }

    #[must_use]
    pub const fn batch_unit(&self) -> usize {
        self.batch_unit
    }

    #[must_use]
    pub const fn versions(&self) -> VersionSelection {
        self.versions
    }

    #[must_use]
    pub const fn seeds(&self) -> SeedSequence {
        self.seeds
    }

    #[must_use]
    pub const fn max_concurrency(&self) -> usize {
        self.max_concurrency
    }

    /// Workers launched for each selected version.
    #[must_use]
    pub const fn jobs_per_version(&self) -> usize {
        if self.batch_unit == 0 {
            0
        } else {
            self.total / self.batch_unit
        }
    }

    /// Checks the plan before any work starts.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if:
    /// - no version is selected
    /// - `batch_unit` is zero
    /// - `total` is not an exact multiple of `batch_unit`
    /// - `max_concurrency` is zero or above [`Semaphore::MAX_PERMITS`]
    pub fn validate(&self) -> Result<()> {
        if self.versions.is_empty() {
            return Err(Error::configuration(
                "at least one of v2 or v3 must be selected",
            ));
        }
        if self.batch_unit == 0 {
            return Err(Error::configuration("batch unit must be greater than 0"));
        }
        if self.total % self.batch_unit != 0 {
            return Err(Error::configuration(format!(
                "number of addresses ({}) must be a multiple of {}",
                self.total, self.batch_unit
            )));
        }
        if self.max_concurrency == 0 {
            return Err(Error::configuration(
                "max concurrency must be greater than 0",
            ));
        }
        if self.max_concurrency > Semaphore::MAX_PERMITS {
            return Err(Error::configuration(format!(
                "max concurrency ({}) must not exceed {}",
                self.max_concurrency,
                Semaphore::MAX_PERMITS
            )));
        }
        Ok(())
    }
}
