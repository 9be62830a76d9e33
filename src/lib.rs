//! Key management core for Bitcoin-family coins: secp256k1, ECDSA with key
//! recovery, BIP-32 HD derivation, Base58Check/bech32/CashAddr addresses and
//! BIP-137 signed messages.

pub mod address;
pub mod bip32;
pub mod ec;
pub mod ecdsa;
pub mod encoding;
pub mod error;
pub mod hash;
pub mod key;
pub mod message;

pub use address::{AddrScheme, Coin, Network};
pub use error::{Error, Result};
pub use key::{PrivateKey, PublicKey};

use anyhow::{bail, Context};
use clap::{arg, ArgMatches, Command};

use crate::address::table;
use crate::bip32::{ExtendedKey, HdTree};

/// Coin, network and scheme shared by every subcommand.
struct Target {
  coin: Coin,
  network: Network,
  scheme: AddrScheme,
}

fn arg_str<'a>(matches: &'a ArgMatches, id: &str) -> anyhow::Result<&'a str> {
  matches
    .get_one::<String>(id)
    .map(String::as_str)
    .with_context(|| format!("missing argument {id}"))
}

impl Target {
  fn from_matches(matches: &ArgMatches) -> anyhow::Result<Self> {
    Ok(Target {
      coin: arg_str(matches, "coin")?.parse()?,
      network: arg_str(matches, "network")?.parse()?,
      scheme: arg_str(matches, "scheme")?.parse()?,
    })
  }
}

fn target_args(cmd: Command) -> Command {
  cmd
    .arg(
      arg!(-c --coin <COIN> "coin ticker")
        .id("coin")
        .default_value("btc")
        .value_parser(["btc", "ltc", "doge", "dash", "bch", "eth"]),
    )
    .arg(
      arg!(-n --network <NETWORK> "network")
        .id("network")
        .default_value("main")
        .value_parser(["main", "test", "reg"]),
    )
    .arg(
      arg!(--scheme <SCHEME> "address scheme")
        .id("scheme")
        .default_value("p2pkh")
        .value_parser(["p2pkh", "p2sh", "p2wpkh", "p2wsh", "p2wpkh-p2sh", "p2wsh-p2sh"]),
    )
}

fn print_key(target: &Target, key: &PrivateKey) -> anyhow::Result<()> {
  println!("public key: {}", hex::encode(key.public_key().to_bytes()));
  if let Ok(wif) = key.to_wif(target.coin, target.network) {
    println!("wif: {wif}");
  }
  let addr = address::from_public_key(target.coin, target.network, target.scheme, key.public_key())?;
  println!("address: {addr}");
  Ok(())
}

fn run_cmd_derive(matches: &ArgMatches) -> anyhow::Result<()> {
  let target = Target::from_matches(matches)?;
  let path = arg_str(matches, "path")?;
  let tree = match (matches.get_one::<String>("seed"), matches.get_one::<String>("xkey")) {
    (Some(seed), None) => {
      let seed = hex::decode(seed).context("seed should be a hex string")?;
      let versions = table::lookup(target.coin, target.network, target.scheme)?.scheme.bip32;
      HdTree::from_seed(&seed, versions)?
    }
    (None, Some(xkey)) => {
      let anchor = arg_str(matches, "anchor")?;
      HdTree::from_xkey(xkey, anchor)?
    }
    _ => bail!("exactly one of --seed and --xkey is required"),
  };

  let node = tree.derive(path)?;
  log::info!("derived {} at depth {}", path, node.depth());
  if let ExtendedKey::Private(xprv) = &node {
    println!("xprv: {}", xprv.to_base58());
  }
  let xpub = node.to_xpub();
  println!("xpub: {}", xpub.to_base58());
  match node.private() {
    Some(xprv) => print_key(&target, &xprv.private_key)?,
    None => {
      let addr = address::from_public_key(target.coin, target.network, target.scheme, &xpub.public_key)?;
      println!("address: {addr}");
    }
  }
  Ok(())
}

fn run_cmd_address(matches: &ArgMatches) -> anyhow::Result<()> {
  let target = Target::from_matches(matches)?;
  let data = arg_str(matches, "data")?;
  let bytes = hex::decode(data).context("expected hex")?;
  let addr = if target.scheme.takes_key() {
    let key = PublicKey::from_bytes(&bytes)?;
    address::from_public_key(target.coin, target.network, target.scheme, &key)?
  } else {
    address::from_script(target.coin, target.network, target.scheme, &bytes)?
  };
  println!("{addr}");
  Ok(())
}

fn run_cmd_keygen(matches: &ArgMatches) -> anyhow::Result<()> {
  let target = Target::from_matches(matches)?;
  let key = PrivateKey::random().with_compression(!matches.get_flag("uncompressed"));
  print_key(&target, &key)
}

fn run_cmd_sign(matches: &ArgMatches) -> anyhow::Result<()> {
  let target = Target::from_matches(matches)?;
  let wif = arg_str(matches, "wif")?;
  let msg = arg_str(matches, "message")?;
  let key = PrivateKey::from_wif(wif, target.coin, target.network)?;
  println!("{}", message::sign_message(&key, msg.as_bytes(), target.scheme)?);
  Ok(())
}

fn run_cmd_verify(matches: &ArgMatches) -> anyhow::Result<()> {
  let target = Target::from_matches(matches)?;
  let addr = arg_str(matches, "address")?;
  let sig = arg_str(matches, "signature")?;
  let msg = arg_str(matches, "message")?;
  message::verify_message(target.coin, target.network, addr, sig, msg.as_bytes())
    .with_context(|| format!("signature does not verify for {addr}"))?;
  println!("valid");
  Ok(())
}

pub fn run() -> anyhow::Result<()> {
  let matches = Command::new(env!("CARGO_CRATE_NAME"))
    .version(env!("CARGO_PKG_VERSION"))
    .about("secp256k1 key utilities - BIP-32 derivation, addresses, signed messages")
    .arg_required_else_help(true)
    .subcommand(target_args(
      Command::new("derive")
        .about("Derive child keys using the BIP-32 protocol")
        .visible_alias("32")
        .arg(arg!(<PATH> "BIP-32 derivation path e.g. m/44'/0'/0'/0/0").id("path"))
        .arg(
          arg!(-s --seed <SEED> "16 to 64 byte seed, given as a hexadecimal string")
            .id("seed")
            .required_unless_present("xkey")
            .conflicts_with("xkey"),
        )
        .arg(
          arg!(-x --xkey <XKEY> "BIP-32 extended private or public key (any depth)")
            .id("xkey")
            .required_unless_present("seed")
            .conflicts_with("seed"),
        )
        .arg(
          arg!(-a --anchor <PATH> "path of the --xkey node, e.g. m/84'/0'/0'")
            .id("anchor")
            .default_value("m"),
        ),
    ))
    .subcommand(target_args(
      Command::new("address")
        .about("Build an address from a public key (or a script for script schemes)")
        .arg(arg!(<DATA> "hex public key or redeem/witness script").id("data")),
    ))
    .subcommand(target_args(
      Command::new("keygen")
        .about("Generate a random key pair")
        .arg(arg!(-u --uncompressed "use the uncompressed public key encoding")),
    ))
    .subcommand(target_args(
      Command::new("sign")
        .about("Sign a message (BIP-137)")
        .arg(arg!(<WIF> "private key in wallet import format").id("wif"))
        .arg(arg!(<MESSAGE> "message text").id("message")),
    ))
    .subcommand(target_args(
      Command::new("verify")
        .about("Verify a signed message against an address")
        .arg(arg!(<ADDRESS> "address claimed by the signer").id("address"))
        .arg(arg!(<SIGNATURE> "base64 signature").id("signature"))
        .arg(arg!(<MESSAGE> "message text").id("message")),
    ))
    .get_matches();

  match matches.subcommand() {
    Some(("derive", matches)) => run_cmd_derive(matches),
    Some(("address", matches)) => run_cmd_address(matches),
    Some(("keygen", matches)) => run_cmd_keygen(matches),
    Some(("sign", matches)) => run_cmd_sign(matches),
    Some(("verify", matches)) => run_cmd_verify(matches),
    _ => unreachable!("top-level subcommand should be required"),
  }
}
