use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Recorder Impact - statistical overhead analysis for flight-recorder benchmarks
#[derive(Parser, Debug)]
#[clap(version, about, long_about = None)]
pub struct Args {
    #[clap(subcommand)]
    pub command: Command,

    /// Output file for the analysis report (JSON format)
    #[clap(short = 'o', long, global = true, default_value = crate::defaults::OUTPUT_FILE)]
    pub output_file: PathBuf,

    /// Recorder collection interval in seconds
    #[clap(long, global = true, default_value_t = crate::defaults::COLLECTION_INTERVAL_SECS)]
    pub interval: u32,

    /// Assumed DDL operations per hour for collision projection
    #[clap(long, global = true, default_value_t = crate::defaults::OPERATIONS_PER_HOUR)]
    pub ops_per_hour: u32,

    /// Token identifying the recorder in a DDL operation's blocking agent
    #[clap(long, global = true, default_value = crate::defaults::RECORDER_TOKEN)]
    pub recorder_token: String,

    /// Suppress the console summary
    #[clap(short = 'q', long, global = true, default_value_t = false)]
    pub quiet: bool,

    /// Verbose output
    #[clap(short = 'v', long, global = true, default_value_t = false)]
    pub verbose: bool,
}

/// Analysis to run
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Compare one baseline run with one recorder-enabled run
    Compare {
        /// Baseline results JSON file
        #[clap(long)]
        baseline: PathBuf,
        /// Test results JSON file (with the recorder enabled)
        #[clap(long)]
        test: PathBuf,
    },

    /// Analyze repeated runs for every workload
    Workloads {
        /// JSON file with per-workload runs and latency samples
        #[clap(long)]
        input: PathBuf,
    },

    /// Analyze DDL blocking caused by the recorder
    Ddl {
        /// JSON file containing `ddl_operations`
        #[clap(long)]
        input: PathBuf,
    },
}
