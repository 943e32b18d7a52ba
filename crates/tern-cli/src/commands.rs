use std::io::Read;
use std::path::Path;

use anyhow::{bail, Context};
use colored::Colorize;
use rand::rngs::OsRng;
use rand::Rng;
use serde::de::DeserializeOwned;
use serde_json::json;
use tern_bundle::{
    add_trytes, as_transaction_object, as_transaction_trytes, create_bundle,
    finalize_bundle_with, normalized_bundle_hash, validate_bundle, BundleEntry, Transaction,
};
use tern_signing::{address, digests, key, signature_fragment, PrivateKey, SecurityLevel};
use tern_types::{is_trytes, trits, trytes, TRYTE_ALPHABET};
use zeroize::Zeroizing;

use crate::cli::*;
use crate::config::CliConfig;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = CliConfig::load(cli.config.as_deref())?;
    let format = cli.format;
    match cli.command {
        Command::Seed => cmd_seed(format),
        Command::Address(args) => cmd_address(args, &config, format),
        Command::Hash(args) => cmd_hash(args, &config, format),
        Command::Bundle(args) => cmd_bundle(args, &config),
        Command::Sign(args) => cmd_sign(args, &config),
        Command::Validate(args) => cmd_validate(args, format),
        Command::Encode(args) => cmd_encode(args),
        Command::Decode(args) => cmd_decode(args),
    }
}

fn read_input(path: &Path) -> anyhow::Result<String> {
    if path == Path::new("-") {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("reading stdin")?;
        Ok(text)
    } else {
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let text = read_input(path)?;
    serde_json::from_str(&text).with_context(|| format!("parsing JSON from {}", path.display()))
}

fn print_json(value: &impl serde::Serialize) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn security_level(requested: Option<u8>, config: &CliConfig) -> anyhow::Result<SecurityLevel> {
    match requested {
        Some(level) => Ok(SecurityLevel::try_from(level)?),
        None => Ok(config.security),
    }
}

fn seed_trits(seed: &str) -> anyhow::Result<Zeroizing<Vec<i8>>> {
    if seed.is_empty() || !is_trytes(seed) {
        bail!("seed must be a non-empty tryte string");
    }
    Ok(Zeroizing::new(trits(seed)?))
}

fn address_of(key: &PrivateKey) -> anyhow::Result<String> {
    Ok(trytes(&address(&digests(key.as_trits())?)?))
}

fn cmd_seed(format: OutputFormat) -> anyhow::Result<()> {
    let alphabet = TRYTE_ALPHABET.as_bytes();
    let seed: Zeroizing<String> = Zeroizing::new(
        (0..81)
            .map(|_| alphabet[OsRng.gen_range(0..alphabet.len())] as char)
            .collect(),
    );
    match format {
        OutputFormat::Text => println!("{}", seed.as_str()),
        OutputFormat::Json => print_json(&json!({ "seed": seed.as_str() }))?,
    }
    Ok(())
}

fn cmd_address(args: AddressArgs, config: &CliConfig, format: OutputFormat) -> anyhow::Result<()> {
    let seed = seed_trits(&args.key.seed)?;
    let security = security_level(args.key.security, config)?;

    let mut derived = Vec::new();
    for index in args.key.index..args.key.index.saturating_add(args.count) {
        let key = key(&seed, index, security)?;
        derived.push((index, address_of(&key)?));
    }

    match format {
        OutputFormat::Text => {
            for (index, addr) in &derived {
                println!("{} {}", format!("#{index}").dimmed(), addr.cyan());
            }
        }
        OutputFormat::Json => {
            let out: Vec<_> = derived
                .iter()
                .map(|(index, addr)| json!({ "index": index, "security": security, "address": addr }))
                .collect();
            print_json(&out)?;
        }
    }
    Ok(())
}

fn cmd_hash(args: HashArgs, config: &CliConfig, format: OutputFormat) -> anyhow::Result<()> {
    let sponge = args.sponge.unwrap_or(config.sponge);
    let input = trits(args.trytes.as_str())?;
    let hash = trytes(&sponge.create().hash(&input)?);
    match format {
        OutputFormat::Text => println!("{hash}"),
        OutputFormat::Json => print_json(&json!({ "sponge": sponge.to_string(), "hash": hash }))?,
    }
    Ok(())
}

fn cmd_bundle(args: BundleArgs, config: &CliConfig) -> anyhow::Result<()> {
    let entries: Vec<BundleEntry> = read_json(&args.input.input)?;
    if entries.is_empty() {
        bail!("no bundle entries given");
    }
    let mut bundle_config = config.bundle.clone();
    if let Some(max) = args.max_attempts {
        bundle_config.max_finalize_attempts = max;
    }

    let bundle = finalize_bundle_with(create_bundle(&entries), &bundle_config)
        .context("finalizing bundle")?;
    eprintln!(
        "{} Finalized bundle {} ({} transactions)",
        "✓".green().bold(),
        bundle[0].bundle.yellow(),
        bundle.len()
    );
    print_json(&bundle)
}

fn cmd_sign(args: SignArgs, config: &CliConfig) -> anyhow::Result<()> {
    let bundle: Vec<Transaction> = read_json(&args.input.input)?;
    let bundle = sign_bundle(bundle, &args.key, config)?;
    print_json(&bundle)
}

/// Sign every input spending from the address derived from `args`.
///
/// An input's signature spans the input itself and the zero-value
/// transactions on the same address that directly follow it.
fn sign_bundle(
    mut bundle: Vec<Transaction>,
    args: &SeedArgs,
    config: &CliConfig,
) -> anyhow::Result<Vec<Transaction>> {
    let seed = seed_trits(&args.seed)?;
    let security = security_level(args.security, config)?;
    let key = key(&seed, args.index, security)?;
    let input_address = address_of(&key)?;

    let bundle_hash = bundle
        .first()
        .map(|tx| tx.bundle.clone())
        .context("bundle has no transactions")?;
    let normalized = normalized_bundle_hash(&bundle_hash)?;

    let offsets: Vec<usize> = bundle
        .iter()
        .enumerate()
        .filter(|(_, tx)| tx.is_input() && tx.address == input_address)
        .map(|(i, _)| i)
        .collect();
    if offsets.is_empty() {
        bail!("no input in the bundle spends from {input_address}");
    }

    for &offset in &offsets {
        let reserved = bundle[offset..]
            .iter()
            .skip(1)
            .take_while(|tx| tx.address == input_address && tx.value == 0)
            .count();
        if reserved + 1 < security.fragments() {
            bail!(
                "input at {offset} needs {} transactions on its address for the signature, found {}",
                security.fragments(),
                reserved + 1
            );
        }
    }

    for offset in offsets {
        let signatures = key
            .fragments()
            .enumerate()
            .map(|(i, fragment)| {
                let chunk = &normalized[(i % 3) * 27..(i % 3 + 1) * 27];
                Ok(trytes(&signature_fragment(chunk, fragment)?))
            })
            .collect::<anyhow::Result<Vec<String>>>()?;
        bundle = add_trytes(bundle, &signatures, offset)?;
        eprintln!(
            "{} Signed input {} with {} fragments",
            "✓".green().bold(),
            format!("#{offset}").yellow(),
            signatures.len()
        );
    }
    Ok(bundle)
}

fn cmd_validate(args: InputArgs, format: OutputFormat) -> anyhow::Result<()> {
    let bundle: Vec<Transaction> = read_json(&args.input)?;
    let report = validate_bundle(&bundle);

    match format {
        OutputFormat::Json => print_json(&report)?,
        OutputFormat::Text => {
            let mark = |ok: bool| if ok { "✓".green() } else { "✗".red() };
            println!("Transactions: {}", report.transaction_count.to_string().bold());
            println!("  {} value addresses", mark(report.value_addresses_valid));
            println!("  {} indices", mark(report.indices_valid));
            println!("  {} value balance", mark(report.value_balanced));
            println!("  {} bundle hash", mark(report.bundle_hash_valid));
            println!("  {} signatures", mark(report.signatures_valid));
            for v in &report.violations {
                println!("  {} #{} {:?}: {}", "!".red(), v.index, v.kind, v.description);
            }
        }
    }

    if !report.is_valid() {
        bail!("bundle is invalid ({} violations)", report.violations.len());
    }
    Ok(())
}

fn cmd_encode(args: InputArgs) -> anyhow::Result<()> {
    let bundle: Vec<Transaction> = read_json(&args.input)?;
    for (i, tx) in bundle.iter().enumerate() {
        let encoded =
            as_transaction_trytes(tx).with_context(|| format!("encoding transaction {i}"))?;
        println!("{encoded}");
    }
    Ok(())
}

fn cmd_decode(args: InputArgs) -> anyhow::Result<()> {
    let text = read_input(&args.input)?;
    let bundle = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .enumerate()
        .map(|(i, line)| {
            as_transaction_object(line, None).with_context(|| format!("decoding line {}", i + 1))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;
    print_json(&bundle)
}
