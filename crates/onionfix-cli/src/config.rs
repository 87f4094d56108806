use anyhow::bail;
use clap::{Parser, ValueEnum};
use onionfix::{DEFAULT_BATCH_UNIT, DispatchPlan, VersionSelection, rand::DEFAULT_SEED};
use std::path::PathBuf;

/// Runtime configuration for the `onionfix` binary.
///
/// Every flag can also be supplied through the environment (or a `.env` file
/// in the working directory), which is convenient when the generator runs as
/// part of a larger experiment harness.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "onionfix",
    version,
    about = "Generate files of synthetic v2 and/or v3 onion addresses"
)]
pub struct CliArgs {
    /// Generate a set of v2 addresses.
    ///
    /// Environment variable: `ONIONFIX_V2`
    #[arg(long, env = "ONIONFIX_V2", default_value_t = false)]
    pub v2: bool,

    /// Generate a set of v3 addresses.
    ///
    /// Environment variable: `ONIONFIX_V3`
    #[arg(long, env = "ONIONFIX_V3", default_value_t = false)]
    pub v3: bool,

    /// Number of addresses to generate per selected version.
    ///
    /// Must be a multiple of `--batch-size`; each batch is produced by its own
    /// worker and written to its own file.
    ///
    /// Environment variable: `ONIONFIX_NUM_ADDR`
    #[arg(long, env = "ONIONFIX_NUM_ADDR", default_value_t = DEFAULT_BATCH_UNIT)]
    pub num_addr: usize,

    /// Number of addresses in each output file.
    ///
    /// Environment variable: `ONIONFIX_BATCH_SIZE`
    #[arg(long, env = "ONIONFIX_BATCH_SIZE", default_value_t = DEFAULT_BATCH_UNIT)]
    pub batch_size: usize,

    /// Directory the `v2_NNNN.addr` / `v3_NNNN.addr` files are written to.
    /// Created if missing.
    ///
    /// Environment variable: `ONIONFIX_OUTPUT_DIR`
    #[arg(long, env = "ONIONFIX_OUTPUT_DIR", default_value = "./attack_addr/")]
    pub output_dir: PathBuf,

    /// Seed for the non-cryptographic v2 generator.
    ///
    /// The same seed, batch size and count reproduce the same v2 files. v3
    /// addresses always use fresh OS randomness.
    ///
    /// Environment variable: `ONIONFIX_SEED`
    #[arg(long, env = "ONIONFIX_SEED", default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Maximum number of batches generated at the same time.
    ///
    /// Defaults to the number of logical CPUs.
    ///
    /// Environment variable: `ONIONFIX_MAX_WORKERS`
    #[arg(long, env = "ONIONFIX_MAX_WORKERS")]
    pub max_workers: Option<usize>,

    /// Log output format. Filtering follows `RUST_LOG` (default `info`).
    ///
    /// Environment variable: `ONIONFIX_LOG_FORMAT`
    #[arg(long, env = "ONIONFIX_LOG_FORMAT", value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Compact,
    Json,
}

#[derive(Debug, Clone)]
pub struct RunConfig {
    pub versions: VersionSelection,
    pub num_addr: usize,
    pub batch_size: usize,
    pub output_dir: PathBuf,
    pub seed: u64,
    pub max_workers: usize,
    pub log_format: LogFormat,
}

impl RunConfig {
    pub fn plan(&self) -> DispatchPlan {
        DispatchPlan::new(self.num_addr, self.versions)
            .with_batch_unit(self.batch_size)
            .with_seed(self.seed)
            .with_max_concurrency(self.max_workers)
    }
}

impl TryFrom<CliArgs> for RunConfig {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        if !args.v2 && !args.v3 {
            bail!("At least one of the flags '--v2' or '--v3' has to be supplied");
        }

        if args.batch_size == 0 {
            bail!("BATCH_SIZE must be greater than 0");
        }

        if args.num_addr % args.batch_size != 0 {
            bail!(
                "Number of addresses to generate ({}) must be a multiple of {}",
                args.num_addr,
                args.batch_size
            );
        }

        let max_workers = args.max_workers.unwrap_or_else(num_cpus::get);
        if max_workers == 0 {
            bail!("MAX_WORKERS must be greater than 0");
        }

        Ok(Self {
            versions: VersionSelection {
                v2: args.v2,
                v3: args.v3,
            },
            num_addr: args.num_addr,
            batch_size: args.batch_size,
            output_dir: args.output_dir,
            seed: args.seed,
            max_workers,
            log_format: args.log_format,
        })
    }
}
