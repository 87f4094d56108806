use crate::{
    AddressVersion, BatchGenerator, DispatchPlan, DispatchReport, Error, FixtureRng, KeySource,
    OsKeySource, Result, Shard, ShardSink,
};
use std::{collections::HashMap, sync::Arc, time::Instant};
use tokio::{sync::Semaphore, task::JoinSet};
use tokio_util::sync::CancellationToken;

/// Runs a validated [`DispatchPlan`] across blocking workers.
///
/// Each worker owns its own [`BatchGenerator`] (v2 workers get a deterministic
/// sub-seeded [`FixtureRng`], see [`crate::SeedSequence`]), generates exactly
/// one batch unit, and persists it as a [`Shard`] through the sink. Workers
/// share nothing but the sink and a cancellation token.
///
/// The first failing worker cancels the run: workers still generating stop at
/// their next address and never persist, queued workers are not started, and
/// [`Dispatcher::run`] returns that failure wrapped in [`Error::Worker`].
pub struct Dispatcher {
    plan: DispatchPlan,
    shutdown_token: CancellationToken,
}

impl Dispatcher {
    /// Validates `plan` and constructs a dispatcher for it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if the plan is invalid. Nothing is
    /// spawned in that case.
    pub fn new(plan: DispatchPlan) -> Result<Self> {
        plan.validate()?;

        #[cfg(feature = "tracing")]
        tracing::info!(
            "Dispatch plan accepted: {} workers per version, {} addresses each",
            plan.jobs_per_version(),
            plan.batch_unit()
        );

        Ok(Self {
            plan,
            shutdown_token: CancellationToken::new(),
        })
    }

    #[must_use]
    pub const fn plan(&self) -> &DispatchPlan {
        &self.plan
    }

    /// A handle that cancels every current and future run of this dispatcher.
    #[must_use]
    pub fn cancellation_token(&self) -> CancellationToken {
        self.shutdown_token.clone()
    }

    /// Runs the plan, drawing v3 keys from the OS CSPRNG.
    ///
    /// # Errors
    ///
    /// - [`Error::Worker`] wrapping the first worker failure.
    /// - [`Error::Cancelled`] if the run was cancelled from outside before
    ///   every shard was persisted.
    pub async fn run<S>(&self, sink: Arc<S>) -> Result<DispatchReport>
    where
        S: ShardSink + 'static,
    {
        self.run_with_keys(sink, |_, _| OsKeySource).await
    }

    /// Runs the plan with a caller-provided [`KeySource`] per worker.
    ///
    /// `keys` is called once per worker with its version and index.
    ///
    /// # Errors
    ///
    /// As for [`Dispatcher::run`].
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            level = "info",
            skip_all,
            fields(total = self.plan.total(), unit = self.plan.batch_unit())
        )
    )]
    pub async fn run_with_keys<S, K, F>(&self, sink: Arc<S>, mut keys: F) -> Result<DispatchReport>
    where
        S: ShardSink + 'static,
        K: KeySource + Send + 'static,
        F: FnMut(AddressVersion, usize) -> K,
    {
        let started = Instant::now();
        let run_token = self.shutdown_token.child_token();
        let jobs = self.plan.jobs_per_version();
        let expected_shards = jobs * self.plan.versions().iter().count();
        let permits = Arc::new(Semaphore::new(self.plan.max_concurrency()));

        let mut workers = JoinSet::new();
        let mut identities = HashMap::with_capacity(expected_shards);

        'spawn: for version in self.plan.versions().iter() {
            for worker_index in 0..jobs {
                let permit = tokio::select! {
                    biased;
                    () = run_token.cancelled() => break 'spawn,
                    permit = Arc::clone(&permits).acquire_owned() => match permit {
                        Ok(permit) => permit,
                        Err(_) => break 'spawn,
                    },
                };

                let job = Job {
                    version,
                    worker_index,
                    unit: self.plan.batch_unit(),
                    symbols: self.plan.seeds().for_worker(worker_index),
                    keys: keys(version, worker_index),
                    sink: Arc::clone(&sink),
                    token: run_token.clone(),
                };
                let token = run_token.clone();
                let handle = workers.spawn_blocking(move || {
                    let _permit = permit;
                    // Cancels the run on failure and on unwind; released
                    // before the permit.
                    let guard = token.drop_guard();
                    let outcome = job.run();
                    if matches!(&outcome, Ok(_) | Err(Error::Cancelled)) {
                        guard.disarm();
                    }
                    outcome
                });
                identities.insert(handle.id(), (version, worker_index));
            }
        }

        let mut report = DispatchReport::default();
        let mut first_error = None;

        while let Some(joined) = workers.join_next_with_id().await {
            let (id, outcome) = match joined {
                Ok((id, outcome)) => (id, outcome),
                Err(e) => (
                    e.id(),
                    Err(Error::WorkerPanicked {
                        reason: e.to_string(),
                    }),
                ),
            };
            let Some((version, worker_index)) = identities.remove(&id) else {
                continue;
            };

            match outcome {
                Ok(addresses) => report.record(version, addresses),
                Err(Error::Cancelled) => {
                    #[cfg(feature = "tracing")]
                    tracing::debug!("Worker {version}_{worker_index:04} stopped on cancellation");
                }
                Err(source) => {
                    if first_error.is_none() {
                        #[cfg(feature = "tracing")]
                        tracing::error!(
                            "Worker {version}_{worker_index:04} failed, cancelling run: {source}"
                        );
                        run_token.cancel();
                        first_error = Some(Error::Worker {
                            version,
                            worker_index,
                            source: Box::new(source),
                        });
                    } else {
                        #[cfg(feature = "tracing")]
                        tracing::warn!("Worker {version}_{worker_index:04} also failed: {source}");
                    }
                }
            }
        }

        if let Some(err) = first_error {
            return Err(err);
        }
        if report.total_shards() < expected_shards {
            #[cfg(feature = "tracing")]
            tracing::warn!(
                "Run cancelled after {} of {} shards",
                report.total_shards(),
                expected_shards
            );
            return Err(Error::Cancelled);
        }

        let report = report.finish(started.elapsed());
        #[cfg(feature = "tracing")]
        tracing::info!("Dispatch complete: {report}");
        Ok(report)
    }
}

/// One worker's unit of work.
struct Job<K, S> {
    version: AddressVersion,
    worker_index: usize,
    unit: usize,
    symbols: FixtureRng,
    keys: K,
    sink: Arc<S>,
    token: CancellationToken,
}

impl<K, S> Job<K, S>
where
    K: KeySource,
    S: ShardSink,
{
    /// Generates one batch and persists it. Returns the number of addresses
    /// persisted.
    fn run(self) -> Result<usize> {
        #[cfg(feature = "tracing")]
        tracing::trace!("Worker {}_{:04} started", self.version, self.worker_index);

        let mut generator = BatchGenerator::new(self.version, self.symbols, self.keys);
        let batch = generator.generate_cancellable(self.unit, &self.token)?;

        // Never persist once another worker has failed.
        if self.token.is_cancelled() {
            return Err(Error::Cancelled);
        }

        let shard = Shard::new(self.worker_index, batch);
        let shard_id = shard.id();
        let addresses = shard.batch().len();
        if let Err(e) = self.sink.persist(shard) {
            return Err(Error::Sink {
                shard: shard_id,
                source: Box::new(e),
            });
        }

        #[cfg(feature = "tracing")]
        tracing::debug!("Persisted shard {shard_id} ({addresses} addresses)");

        Ok(addresses)
    }
}
