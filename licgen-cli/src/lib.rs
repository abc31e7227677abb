//! Command implementations for the `licgen` and `licgen-check` tools.
//!
//! `licgen` issues licenses, generates signing key pairs and self-checks key
//! files. `licgen-check` verifies a license file against a public key.

use anyhow::{bail, Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use clap::{ArgAction, Parser, ValueEnum};
use licgen_crypto::{
    check_key_pair, read_private_key_from_file, read_public_key_from_file, KeyPair,
    DEFAULT_RSA_BITS,
};
use licgen_license::{
    current_platform, read_license_from_file, save_license_to_file, verify_license,
    write_license, CheckContext, License, LicenseInfo,
};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Expected `--expiry` format, e.g. `2030-1-01`.
pub const EXPIRY_FORMAT: &str = "%Y-%m-%d";

/// Operation performed by `licgen`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GenType {
    /// Issue a signed license.
    #[value(alias = "lic")]
    License,
    /// Generate an RSA key pair.
    #[value(alias = "cert")]
    Certificate,
    /// Check that the key files load and belong together.
    Test,
}

#[derive(Parser, Debug, Clone)]
#[command(name = "licgen")]
#[command(about = "Issue signed licenses and generate signing keys")]
pub struct GenArgs {
    /// Operation type
    #[arg(long = "type", value_enum)]
    pub kind: GenType,

    /// License file to write
    #[arg(long, default_value = "license.json")]
    pub lic: PathBuf,

    /// Public key file
    #[arg(long, default_value = "cert.pem")]
    pub cert: PathBuf,

    /// Private key file
    #[arg(long, default_value = "key.pem")]
    pub key: PathBuf,

    /// Size of RSA key to generate (certificate only)
    #[arg(long, default_value_t = DEFAULT_RSA_BITS)]
    pub rsa_bits: usize,

    /// Name of the licensee
    #[arg(long, default_value = "")]
    pub name: String,

    /// Expiry date of the license, as YYYY-M-DD
    #[arg(long, default_value = "")]
    pub expiry: String,

    /// Comma separated list of supported platforms
    #[arg(long, default_value = "linux,darwin,windows")]
    pub platforms: String,

    /// Print verbose messages
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    pub verbose: bool,
}

#[derive(Parser, Debug, Clone)]
#[command(name = "licgen-check")]
#[command(about = "Verify a licgen license file")]
pub struct CheckArgs {
    /// License file to check
    #[arg(long, default_value = "license.json")]
    pub lic: PathBuf,

    /// Public key file
    #[arg(long, default_value = "cert.pem")]
    pub cert: PathBuf,

    /// Platform to check against instead of the running one
    #[arg(long)]
    pub platform: Option<String>,

    /// Print verbose messages
    #[arg(long, default_value_t = false, action = ArgAction::Set)]
    pub verbose: bool,
}

/// Installs the stderr log subscriber. `RUST_LOG` takes precedence.
pub fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "error" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .compact()
        .init();
}

/// Parses an `--expiry` value as midnight UTC of that day.
pub fn parse_expiry(value: &str) -> Result<DateTime<Utc>> {
    let date = NaiveDate::parse_from_str(value.trim(), EXPIRY_FORMAT)
        .with_context(|| format!("invalid expiry date {value:?}, expected YYYY-M-DD"))?;
    let midnight = date
        .and_hms_opt(0, 0, 0)
        .with_context(|| format!("invalid expiry date {value:?}"))?;
    Ok(midnight.and_utc())
}

/// Splits a comma separated platform list, dropping blanks.
pub fn parse_platforms(value: &str) -> Result<Vec<String>> {
    let platforms: Vec<String> = value
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(String::from)
        .collect();

    if platforms.is_empty() {
        bail!("no platforms given");
    }
    Ok(platforms)
}

/// Runs the `licgen` operation selected by `--type`.
pub fn run_generate(args: &GenArgs) -> Result<()> {
    if args.verbose {
        println!("Runtime: {}", current_platform());
    }

    match args.kind {
        GenType::License => generate_license(args).map(|_| ()),
        GenType::Certificate => generate_certificate(args).map(|_| ()),
        GenType::Test => check_key_files(args),
    }
}

/// Issues a license from the command-line claims and saves it to `--lic`.
pub fn generate_license(args: &GenArgs) -> Result<License> {
    if args.name.is_empty() {
        bail!("licensee name is empty");
    }
    let expiration = parse_expiry(&args.expiry)?;
    let platforms = parse_platforms(&args.platforms)?;

    if args.verbose {
        println!("Licensee: {}", args.name);
        println!("Platforms: {platforms:?}");
        println!("Expiry date: {expiration}");
        println!("Signing with private key: {}", args.key.display());
    }

    let private_key = read_private_key_from_file(&args.key)
        .with_context(|| format!("failed to read private key {}", args.key.display()))?;
    let info = LicenseInfo::new(&args.name, expiration, platforms);
    let license = License::issue(info, &private_key).context("failed to sign license")?;

    if args.verbose {
        println!("Signing OK. Saving license to: {}", args.lic.display());
        println!("*** BEGIN LICENSE ***");
        let mut stdout = io::stdout().lock();
        write_license(&license, &mut stdout)?;
        writeln!(stdout, "\n*** END LICENSE ***")?;
    }

    save_license_to_file(&license, &args.lic)
        .with_context(|| format!("failed to save license {}", args.lic.display()))?;
    info!(path = %args.lic.display(), name = %license.info.name, "license issued");

    Ok(license)
}

/// Generates a key pair and writes it to `--cert` and `--key`.
pub fn generate_certificate(args: &GenArgs) -> Result<KeyPair> {
    if args.verbose {
        println!("Generating {}-bit RSA key pair", args.rsa_bits);
    }

    let pair = KeyPair::generate(args.rsa_bits)?;
    pair.write_pem_files(&args.cert, &args.key).with_context(|| {
        format!(
            "failed to write key pair to {} and {}",
            args.cert.display(),
            args.key.display()
        )
    })?;

    if args.verbose {
        println!("Public key: {}", args.cert.display());
        println!("Private key: {}", args.key.display());
    }
    info!(bits = args.rsa_bits, "key pair generated");

    Ok(pair)
}

/// Loads `--cert` and `--key` and confirms they form a key pair.
///
/// Both files are always loaded so every load failure is reported.
pub fn check_key_files(args: &GenArgs) -> Result<()> {
    let public_key = read_public_key_from_file(&args.cert);
    let private_key = read_private_key_from_file(&args.key);

    match (private_key, public_key) {
        (Ok(private_key), Ok(public_key)) => {
            check_key_pair(&private_key, &public_key).with_context(|| {
                format!(
                    "{} and {} are not a key pair",
                    args.key.display(),
                    args.cert.display()
                )
            })?;
        }
        (private_key, public_key) => {
            let mut problems = Vec::new();
            if let Err(err) = public_key {
                problems.push(format!("error reading public key {}: {err}", args.cert.display()));
            }
            if let Err(err) = private_key {
                problems.push(format!("error reading private key {}: {err}", args.key.display()));
            }
            bail!("{}", problems.join("; "));
        }
    }

    if args.verbose {
        println!("Key pair OK");
    }
    Ok(())
}

/// Verifies `--lic` against `--cert` for the current time and platform.
pub fn run_check(args: &CheckArgs) -> Result<License> {
    let mut ctx = CheckContext::current();
    if let Some(platform) = &args.platform {
        ctx = ctx.with_platform(platform);
    }
    check_license_file(args, &ctx)
}

/// Verifies `--lic` against `--cert` in an explicit context.
pub fn check_license_file(args: &CheckArgs, ctx: &CheckContext) -> Result<License> {
    let license = read_license_from_file(&args.lic)
        .with_context(|| format!("read license {} failed", args.lic.display()))?;

    if args.verbose {
        println!("Name: {}", license.info.name);
        println!("Platforms: {:?}", license.info.platforms);
        println!("Expiry: {}", license.info.expiration);
        println!("Key: {}", license.key);
    }

    let public_key = read_public_key_from_file(&args.cert)
        .with_context(|| format!("failed to read public key {}", args.cert.display()))?;
    verify_license(&license, &public_key, ctx).context("invalid license")?;

    info!(name = %license.info.name, platform = %ctx.platform, "license valid");
    Ok(license)
}
