//! Command Line Interface (CLI) arguments.

use clap::Parser;
use std::path::PathBuf;

/// Summarist command line interface
#[derive(Clone, Debug, Parser)]
pub struct CommandLineArgs {
    /// The IP address on which the server should listen
    #[arg(long, default_value = "0.0.0.0", env = "SUMMARIST_HOST")]
    pub host: String,
    /// The port to which the server should bind
    #[arg(long, default_value_t = 8080, env = "SUMMARIST_PORT")]
    pub port: u16,
    /// Flag indicating whether HTTPS should be used
    #[arg(long, default_value_t = false, env = "SUMMARIST_HTTPS")]
    pub https: bool,
    /// Path to the certificate file to be used for HTTPS encryption
    #[arg(
        long,
        default_value = "~/.config/summarist/certs/cert.pem",
        env = "SUMMARIST_CERT_FILE"
    )]
    pub cert_file: String,
    /// Path to the key file to be used for HTTPS encryption
    #[arg(
        long,
        default_value = "~/.config/summarist/certs/key.pem",
        env = "SUMMARIST_KEY_FILE"
    )]
    pub key_file: String,
    /// Maximum time in seconds to wait for operations to complete upon receiving `ctrl+c` signal.
    #[arg(long, default_value_t = 60, env = "SUMMARIST_SHUTDOWN_TIMEOUT")]
    pub graceful_shutdown_timeout: u64,
    /// Directory holding one date-stamped folder of CSV files per day
    #[arg(long, default_value = "data/fires", env = "SUMMARIST_DATA_DIR")]
    pub data_dir: PathBuf,
    /// Path to the violations export searched by plate
    #[arg(
        long,
        default_value = "data/violations.csv",
        env = "SUMMARIST_VIOLATIONS_FILE"
    )]
    pub violations_file: PathBuf,
    /// Path to the violation codes reference table
    #[arg(
        long,
        default_value = "data/violation_codes.csv",
        env = "SUMMARIST_VIOLATION_CODES_FILE"
    )]
    pub violation_codes_file: PathBuf,
    /// Path to the census population table
    #[arg(long, default_value = "data/census.csv", env = "SUMMARIST_CENSUS_FILE")]
    pub census_file: PathBuf,
    /// Number of rows per chunk when searching the violations export
    #[arg(long, default_value_t = 2_000_000, env = "SUMMARIST_SEARCH_CHUNK_SIZE")]
    pub search_chunk_size: usize,
    /// Maximum number of concurrent reduction and filter tasks. Defaults to one less than the
    /// number of CPUs.
    #[arg(long, env = "SUMMARIST_THREAD_LIMIT")]
    pub thread_limit: Option<usize>,
    /// Leave rows with a missing AQI value out of the frequency tables
    #[arg(
        long,
        default_value_t = false,
        env = "SUMMARIST_EXCLUDE_MISSING_FROM_FREQUENCY"
    )]
    pub exclude_missing_from_frequency: bool,
}

/// Returns parsed command line arguments.
pub fn parse() -> CommandLineArgs {
    CommandLineArgs::parse()
}
