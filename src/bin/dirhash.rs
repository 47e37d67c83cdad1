//! dirhash CLI binary
//!
//! Prints the content digest of a file or directory tree.

use std::path::PathBuf;
use std::process;

use clap::Parser;
use dirhash::Algorithm;
use dirhash::DEFAULT_CHUNK_SIZE;
use dirhash::DirHasher;
use dirhash::Error;
use dirhash::HashConfig;
use log::debug;
use tracing_subscriber::EnvFilter;

/// Produce a checksum, similar to a hash, for directories.
#[derive(Debug, Parser)]
#[command(name = "dirhash", version = dirhash::VERSION)]
struct Cli {
    /// The path to the directory (or file) to hash
    #[arg(required_unless_present = "list_algorithms")]
    directory: Option<PathBuf>,

    /// How many bytes (maximum) of a file to read into RAM at once
    #[arg(short = 'c', long = "chunksize", default_value_t = DEFAULT_CHUNK_SIZE)]
    chunk_size: usize,

    /// The algorithm to employ internally for generating the checksum
    #[arg(short = 'a', long = "algo", default_value = "md5")]
    algo: String,

    /// Hash symlinks as whatever the platform's stat reports instead of
    /// resolving them first
    #[arg(long)]
    dont_resolve_symlinks: bool,

    /// Print the supported algorithms and exit
    #[arg(long)]
    list_algorithms: bool,

    /// Log every hashed entry to stderr
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn config(&self) -> Result<HashConfig, Error> {
        Ok(HashConfig::default()
            .with_algorithm(self.algo.parse::<Algorithm>()?)
            .with_chunk_size(self.chunk_size)
            .with_resolve_symlinks(!self.dont_resolve_symlinks))
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    // Also installs the `log` bridge the library logs through.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// One line per registered algorithm with its digest size.
fn algorithm_listing() -> Vec<String> {
    Algorithm::ALL
        .iter()
        .map(|algo| format!("{algo} ({} bytes)", algo.digest_len()))
        .collect()
}

async fn run(cli: &Cli) -> Result<String, Error> {
    let hasher = DirHasher::new(cli.config()?)?;
    debug!("hashing with {:?}", hasher.config());
    match &cli.directory {
        Some(path) => hasher.hash_entry(path).await,
        None => Err(Error::InvalidArgument("no path given".into())),
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if cli.list_algorithms {
        for line in algorithm_listing() {
            println!("{line}");
        }
        return;
    }

    match run(&cli).await {
        Ok(digest) => println!("{digest}"),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults_match_library_defaults() {
        let cli = Cli::try_parse_from(["dirhash", "some/dir"]).unwrap();
        assert_eq!(cli.config().unwrap(), HashConfig::default());
        assert_eq!(cli.directory, Some(PathBuf::from("some/dir")));
    }

    #[test]
    fn flags_map_onto_config() {
        let cli = Cli::try_parse_from([
            "dirhash",
            "-c",
            "4096",
            "--algo",
            "sha256",
            "--dont-resolve-symlinks",
            "some/dir",
        ])
        .unwrap();
        assert_eq!(
            cli.config().unwrap(),
            HashConfig::default()
                .with_algorithm(Algorithm::Sha256)
                .with_chunk_size(4096)
                .with_resolve_symlinks(false)
        );
    }

    #[test]
    fn unknown_algorithm_is_reported() {
        let cli = Cli::try_parse_from(["dirhash", "-a", "crc32", "some/dir"]).unwrap();
        assert_eq!(
            cli.config(),
            Err(Error::UnsupportedAlgorithm("crc32".into()))
        );
    }

    #[test]
    fn listing_shows_digest_sizes() {
        let listing = algorithm_listing();
        assert_eq!(listing.len(), Algorithm::ALL.len());
        assert_eq!(listing[0], "md5 (16 bytes)");
        assert!(listing.contains(&"sha512 (64 bytes)".to_string()));
    }

    #[tokio::test]
    async fn run_reports_the_configured_digest() {
        let root = dirhash::TestRoot::empty().unwrap();
        root.create_file("a", "abc").unwrap();
        let path = root.join("a");
        let cli = Cli::try_parse_from([std::ffi::OsStr::new("dirhash"), path.as_os_str()]).unwrap();
        assert_eq!(
            run(&cli).await.unwrap(),
            "900150983cd24fb0d6963f7d28e17f72"
        );
    }

    #[test]
    fn path_is_required() {
        assert!(Cli::try_parse_from(["dirhash"]).is_err());
        assert!(Cli::try_parse_from(["dirhash", "--list-algorithms"]).is_ok());
    }
}
