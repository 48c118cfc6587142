use clap::{crate_version, Parser};

use std::error::Error;
use std::fs;
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use threshold_sss::config::SssConfig;
use threshold_sss::random::OsRandom;
use threshold_sss::sss::{combine, generate_refresh_key, refresh_share, split, RefreshKey};
use threshold_sss::Share;

#[derive(Debug, Parser)]
#[command(name = "sss")]
#[command(version = crate_version!())]
#[command(
    about = "Split secrets into threshold shares and combine them again",
    long_about = "Splits a secret into N shares using Shamir's secret sharing over GF(2^8), so that any T of them rebuild the secret and fewer reveal nothing about it. Shares are printed as hex, one per line: the first byte is the share's x-coordinate, the rest are one byte per secret byte. Shares carry no checksum: combining too few shares, or shares from different splits, prints the wrong secret rather than failing. Refresh keys re-randomise a set of shares without changing the secret."
)]
enum CliArgument {
    /// Split a secret into shares.
    Split {
        /// Share threshold, defaults to the configured value.
        #[clap(long, short)]
        threshold: Option<usize>,

        /// Number of shares to generate, defaults to the configured value.
        #[clap(long, short)]
        shares: Option<usize>,

        /// Secret to split, as text.
        #[clap(long, conflicts_with = "hex")]
        secret: Option<String>,

        /// Secret to split, hex encoded.
        #[clap(long)]
        hex: Option<String>,
    },
    /// Combine hex encoded shares to rebuild a secret.
    Combine {
        /// The shares, hex encoded.
        #[clap(required = true)]
        shares: Vec<String>,

        /// Also print the secret as UTF-8 text.
        #[clap(long)]
        text: bool,
    },
    /// Generate a refresh key and print it as JSON.
    RefreshKey {
        /// Share threshold the shares were split with.
        #[clap(long, short)]
        threshold: usize,

        /// Secret length in bytes.
        #[clap(long, short)]
        size: usize,
    },
    /// Apply a refresh key to hex encoded shares.
    Refresh {
        /// Path of a JSON refresh key produced by `refresh-key`.
        #[clap(long, short)]
        key: PathBuf,

        /// The shares, hex encoded.
        #[clap(required = true)]
        shares: Vec<String>,
    },
}

#[derive(Parser, Debug)]
#[clap(name = "sss")]
struct Opt {
    /// Directory holding conf.toml.
    #[clap(long, short, default_value = ".sss")]
    config: PathBuf,

    /// Subcommand to run.
    #[clap(subcommand)]
    argument: CliArgument,
}

fn main() -> Result<(), Box<dyn Error>> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();

    let opt = Opt::parse();

    match opt.argument {
        CliArgument::Split {
            threshold,
            shares,
            secret,
            hex,
        } => {
            let secret = match (secret, hex) {
                (Some(text), None) => text.into_bytes(),
                (None, Some(encoded)) => hex::decode(encoded.trim())?,
                _ => return Err("either --secret or --hex is required".into()),
            };

            // only touch the config directory when a parameter is missing
            let (shares, threshold) = match (shares, threshold) {
                (Some(n), Some(t)) => (n, t),
                (n, t) => {
                    let config = SssConfig::load(&opt.config)?;
                    debug!("Using config defaults: {:?}", config);
                    (n.unwrap_or(config.shares), t.unwrap_or(config.threshold))
                }
            };

            for share in split(&secret, shares, threshold)? {
                println!("{}", share);
            }
        }

        CliArgument::Combine { shares, text } => {
            let shares = parse_shares(&shares)?;
            let secret = combine(&shares)?;
            println!("{}", hex::encode(&secret));
            if text {
                println!("{}", String::from_utf8_lossy(&secret));
            }
        }

        CliArgument::RefreshKey { threshold, size } => {
            let key = generate_refresh_key(threshold, size, &mut OsRandom::default())?;
            println!("{}", serde_json::to_string_pretty(&key)?);
        }

        CliArgument::Refresh { key, shares } => {
            let key: RefreshKey = serde_json::from_str(&fs::read_to_string(&key)?)?;
            let mut shares = parse_shares(&shares)?;
            for share in shares.iter_mut() {
                refresh_share(share, &key)?;
            }
            debug!("Refreshed {} shares", shares.len());
            for share in &shares {
                println!("{}", share);
            }
        }
    }

    Ok(())
}

fn parse_shares(encoded: &[String]) -> Result<Vec<Share>, Box<dyn Error>> {
    Ok(encoded
        .iter()
        .map(|s| s.parse::<Share>())
        .collect::<Result<Vec<_>, _>>()?)
}
