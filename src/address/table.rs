//! Per-coin address parameters.
//!
//! For every coin: how addresses are built, and per network the WIF byte, the
//! bech32/CashAddr prefix, and per address scheme the version byte(s) and the
//! BIP-32 version words of matching extended keys. Read-only for the life of
//! the process.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Coin {
  Btc,
  Ltc,
  Doge,
  Dash,
  Bch,
  Eth,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Network {
  Main,
  Test,
  Reg,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AddrScheme {
  P2pkh,
  P2sh,
  P2wpkh,
  P2wsh,
  P2wpkhInP2sh,
  P2wshInP2sh,
}

/// How a coin turns hashes into address text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AddressStyle {
  /// Base58Check with a version byte, or segwit bech32
  Generic,
  /// `0x` + hex of the last 20 bytes of keccak256(uncompressed key)
  Ethereum,
  /// `prefix:` + base32 with the CashAddr checksum
  CashAddr,
}

/// BIP-32 version words for a public/private extended key pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct VersionPair {
  pub public: u32,
  pub private: u32,
}

#[derive(Debug)]
pub struct SchemeSpec {
  pub scheme: AddrScheme,
  /// Base58 version byte(s), or the CashAddr version byte. Empty for bech32 and Ethereum.
  pub version: &'static [u8],
  pub bip32: VersionPair,
}

#[derive(Debug)]
pub struct NetworkSpec {
  pub network: Network,
  /// WIF version byte, `None` where the chain has no WIF convention
  pub wif: Option<u8>,
  /// bech32 HRP, or the CashAddr prefix
  pub hrp: Option<&'static str>,
  pub schemes: &'static [SchemeSpec],
}

#[derive(Debug)]
pub struct CoinSpec {
  pub coin: Coin,
  pub style: AddressStyle,
  pub networks: &'static [NetworkSpec],
}

/* ----------------------- BIP-32 version words ----------------------- */

pub const XPUB: VersionPair = VersionPair { public: 0x0488_B21E, private: 0x0488_ADE4 };
pub const YPUB: VersionPair = VersionPair { public: 0x049D_7CB2, private: 0x049D_7878 };
pub const ZPUB: VersionPair = VersionPair { public: 0x04B2_4746, private: 0x04B2_430C };
pub const YPUB_MULTISIG: VersionPair = VersionPair { public: 0x0295_B43F, private: 0x0295_B005 };
pub const ZPUB_MULTISIG: VersionPair = VersionPair { public: 0x02AA_7ED3, private: 0x02AA_7A99 };

pub const TPUB: VersionPair = VersionPair { public: 0x0435_87CF, private: 0x0435_8394 };
pub const UPUB: VersionPair = VersionPair { public: 0x044A_5262, private: 0x044A_4E28 };
pub const VPUB: VersionPair = VersionPair { public: 0x045F_1CF6, private: 0x045F_18BC };
pub const UPUB_MULTISIG: VersionPair = VersionPair { public: 0x0242_89EF, private: 0x0242_85B5 };
pub const VPUB_MULTISIG: VersionPair = VersionPair { public: 0x0257_5483, private: 0x0257_5048 };

pub const LTUB: VersionPair = VersionPair { public: 0x019D_A462, private: 0x019D_9CFE };
pub const MTUB: VersionPair = VersionPair { public: 0x01B2_6EF6, private: 0x01B2_6792 };
pub const TTUB: VersionPair = VersionPair { public: 0x0436_F6E1, private: 0x0436_EF7D };
pub const DGUB: VersionPair = VersionPair { public: 0x02FA_CAFD, private: 0x02FA_C398 };

/* ------------------------------ Bitcoin ------------------------------ */

const BTC_MAIN: &[SchemeSpec] = &[
  SchemeSpec { scheme: AddrScheme::P2pkh, version: &[0x00], bip32: XPUB },
  SchemeSpec { scheme: AddrScheme::P2sh, version: &[0x05], bip32: XPUB },
  SchemeSpec { scheme: AddrScheme::P2wpkhInP2sh, version: &[0x05], bip32: YPUB },
  SchemeSpec { scheme: AddrScheme::P2wshInP2sh, version: &[0x05], bip32: YPUB_MULTISIG },
  SchemeSpec { scheme: AddrScheme::P2wpkh, version: &[], bip32: ZPUB },
  SchemeSpec { scheme: AddrScheme::P2wsh, version: &[], bip32: ZPUB_MULTISIG },
];

const BTC_TEST: &[SchemeSpec] = &[
  SchemeSpec { scheme: AddrScheme::P2pkh, version: &[0x6F], bip32: TPUB },
  SchemeSpec { scheme: AddrScheme::P2sh, version: &[0xC4], bip32: TPUB },
  SchemeSpec { scheme: AddrScheme::P2wpkhInP2sh, version: &[0xC4], bip32: UPUB },
  SchemeSpec { scheme: AddrScheme::P2wshInP2sh, version: &[0xC4], bip32: UPUB_MULTISIG },
  SchemeSpec { scheme: AddrScheme::P2wpkh, version: &[], bip32: VPUB },
  SchemeSpec { scheme: AddrScheme::P2wsh, version: &[], bip32: VPUB_MULTISIG },
];

/* ------------------------------ Litecoin ----------------------------- */

const LTC_MAIN: &[SchemeSpec] = &[
  SchemeSpec { scheme: AddrScheme::P2pkh, version: &[0x30], bip32: LTUB },
  SchemeSpec { scheme: AddrScheme::P2sh, version: &[0x32], bip32: LTUB },
  SchemeSpec { scheme: AddrScheme::P2wpkhInP2sh, version: &[0x32], bip32: MTUB },
  SchemeSpec { scheme: AddrScheme::P2wpkh, version: &[], bip32: ZPUB },
  SchemeSpec { scheme: AddrScheme::P2wsh, version: &[], bip32: ZPUB_MULTISIG },
];

const LTC_TEST: &[SchemeSpec] = &[
  SchemeSpec { scheme: AddrScheme::P2pkh, version: &[0x6F], bip32: TTUB },
  SchemeSpec { scheme: AddrScheme::P2sh, version: &[0x3A], bip32: TTUB },
  SchemeSpec { scheme: AddrScheme::P2wpkhInP2sh, version: &[0x3A], bip32: UPUB },
  SchemeSpec { scheme: AddrScheme::P2wpkh, version: &[], bip32: VPUB },
  SchemeSpec { scheme: AddrScheme::P2wsh, version: &[], bip32: VPUB_MULTISIG },
];

/* ------------------------------ Dogecoin ----------------------------- */

const DOGE_MAIN: &[SchemeSpec] = &[
  SchemeSpec { scheme: AddrScheme::P2pkh, version: &[0x1E], bip32: DGUB },
  SchemeSpec { scheme: AddrScheme::P2sh, version: &[0x16], bip32: DGUB },
];

const DOGE_TEST: &[SchemeSpec] = &[
  SchemeSpec { scheme: AddrScheme::P2pkh, version: &[0x71], bip32: TPUB },
  SchemeSpec { scheme: AddrScheme::P2sh, version: &[0xC4], bip32: TPUB },
];

/* -------------------------------- Dash ------------------------------- */

const DASH_MAIN: &[SchemeSpec] = &[
  SchemeSpec { scheme: AddrScheme::P2pkh, version: &[0x4C], bip32: XPUB },
  SchemeSpec { scheme: AddrScheme::P2sh, version: &[0x10], bip32: XPUB },
];

const DASH_TEST: &[SchemeSpec] = &[
  SchemeSpec { scheme: AddrScheme::P2pkh, version: &[0x8C], bip32: TPUB },
  SchemeSpec { scheme: AddrScheme::P2sh, version: &[0x13], bip32: TPUB },
];

/* ---------------------------- Bitcoin Cash --------------------------- */

// CashAddr version byte: type << 3 | size code (0 for 160-bit hashes)
const BCH_MAIN: &[SchemeSpec] = &[
  SchemeSpec { scheme: AddrScheme::P2pkh, version: &[0x00], bip32: XPUB },
  SchemeSpec { scheme: AddrScheme::P2sh, version: &[0x08], bip32: XPUB },
];

const BCH_TEST: &[SchemeSpec] = &[
  SchemeSpec { scheme: AddrScheme::P2pkh, version: &[0x00], bip32: TPUB },
  SchemeSpec { scheme: AddrScheme::P2sh, version: &[0x08], bip32: TPUB },
];

/* ------------------------------ Ethereum ----------------------------- */

const ETH_ALL: &[SchemeSpec] = &[SchemeSpec { scheme: AddrScheme::P2pkh, version: &[], bip32: XPUB }];

static COINS: [CoinSpec; 6] = [
  CoinSpec {
    coin: Coin::Btc,
    style: AddressStyle::Generic,
    networks: &[
      NetworkSpec { network: Network::Main, wif: Some(0x80), hrp: Some("bc"), schemes: BTC_MAIN },
      NetworkSpec { network: Network::Test, wif: Some(0xEF), hrp: Some("tb"), schemes: BTC_TEST },
      NetworkSpec { network: Network::Reg, wif: Some(0xEF), hrp: Some("bcrt"), schemes: BTC_TEST },
    ],
  },
  CoinSpec {
    coin: Coin::Ltc,
    style: AddressStyle::Generic,
    networks: &[
      NetworkSpec { network: Network::Main, wif: Some(0xB0), hrp: Some("ltc"), schemes: LTC_MAIN },
      NetworkSpec { network: Network::Test, wif: Some(0xEF), hrp: Some("tltc"), schemes: LTC_TEST },
      NetworkSpec { network: Network::Reg, wif: Some(0xEF), hrp: Some("rltc"), schemes: LTC_TEST },
    ],
  },
  CoinSpec {
    coin: Coin::Doge,
    style: AddressStyle::Generic,
    networks: &[
      NetworkSpec { network: Network::Main, wif: Some(0x9E), hrp: None, schemes: DOGE_MAIN },
      NetworkSpec { network: Network::Test, wif: Some(0xF1), hrp: None, schemes: DOGE_TEST },
    ],
  },
  CoinSpec {
    coin: Coin::Dash,
    style: AddressStyle::Generic,
    networks: &[
      NetworkSpec { network: Network::Main, wif: Some(0xCC), hrp: None, schemes: DASH_MAIN },
      NetworkSpec { network: Network::Test, wif: Some(0xEF), hrp: None, schemes: DASH_TEST },
      NetworkSpec { network: Network::Reg, wif: Some(0xEF), hrp: None, schemes: DASH_TEST },
    ],
  },
  CoinSpec {
    coin: Coin::Bch,
    style: AddressStyle::CashAddr,
    networks: &[
      NetworkSpec { network: Network::Main, wif: Some(0x80), hrp: Some("bitcoincash"), schemes: BCH_MAIN },
      NetworkSpec { network: Network::Test, wif: Some(0xEF), hrp: Some("bchtest"), schemes: BCH_TEST },
      NetworkSpec { network: Network::Reg, wif: Some(0xEF), hrp: Some("bchreg"), schemes: BCH_TEST },
    ],
  },
  CoinSpec {
    coin: Coin::Eth,
    style: AddressStyle::Ethereum,
    networks: &[
      NetworkSpec { network: Network::Main, wif: None, hrp: None, schemes: ETH_ALL },
      NetworkSpec { network: Network::Test, wif: None, hrp: None, schemes: ETH_ALL },
      NetworkSpec { network: Network::Reg, wif: None, hrp: None, schemes: ETH_ALL },
    ],
  },
];

/* ------------------------------ Lookups ------------------------------ */

pub fn coin_spec(coin: Coin) -> &'static CoinSpec {
  COINS
    .iter()
    .find(|c| c.coin == coin)
    .expect("every Coin variant has a table entry")
}

impl CoinSpec {
  pub fn network(&self, network: Network) -> Option<&'static NetworkSpec> {
    self.networks.iter().find(|n| n.network == network)
  }
}

impl NetworkSpec {
  pub fn scheme(&self, scheme: AddrScheme) -> Option<&'static SchemeSpec> {
    self.schemes.iter().find(|s| s.scheme == scheme)
  }
}

/// A resolved (coin, network, scheme) triple.
#[derive(Clone, Copy, Debug)]
pub struct Lookup {
  pub coin: &'static CoinSpec,
  pub network: &'static NetworkSpec,
  pub scheme: &'static SchemeSpec,
}

pub fn lookup(coin: Coin, network: Network, scheme: AddrScheme) -> Result<Lookup> {
  let no_prefix = Error::NoPrefix { coin, network, scheme };
  let coin_spec = coin_spec(coin);
  let net_spec = coin_spec.network(network).ok_or_else(|| no_prefix.clone())?;
  let scheme_spec = net_spec.scheme(scheme).ok_or(no_prefix)?;
  Ok(Lookup {
    coin: coin_spec,
    network: net_spec,
    scheme: scheme_spec,
  })
}

pub fn network_spec(coin: Coin, network: Network) -> Result<&'static NetworkSpec> {
  coin_spec(coin).network(network).ok_or(Error::NoPrefix {
    coin,
    network,
    scheme: AddrScheme::P2pkh,
  })
}

/// Resolve a serialized BIP-32 version word.
///
/// Returns the pair it belongs to and whether it is the public half.
pub fn find_bip32_version(word: u32) -> Option<(VersionPair, bool)> {
  COINS
    .iter()
    .flat_map(|c| c.networks.iter())
    .flat_map(|n| n.schemes.iter())
    .map(|s| s.bip32)
    .find_map(|pair| {
      if pair.public == word {
        Some((pair, true))
      } else if pair.private == word {
        Some((pair, false))
      } else {
        None
      }
    })
}

/* --------------------------- Names / parsing -------------------------- */

impl Coin {
  pub const ALL: [Coin; 6] = [Coin::Btc, Coin::Ltc, Coin::Doge, Coin::Dash, Coin::Bch, Coin::Eth];

  pub fn ticker(self) -> &'static str {
    match self {
      Coin::Btc => "btc",
      Coin::Ltc => "ltc",
      Coin::Doge => "doge",
      Coin::Dash => "dash",
      Coin::Bch => "bch",
      Coin::Eth => "eth",
    }
  }
}

impl Network {
  pub fn name(self) -> &'static str {
    match self {
      Network::Main => "main",
      Network::Test => "test",
      Network::Reg => "reg",
    }
  }
}

impl AddrScheme {
  pub fn name(self) -> &'static str {
    match self {
      AddrScheme::P2pkh => "p2pkh",
      AddrScheme::P2sh => "p2sh",
      AddrScheme::P2wpkh => "p2wpkh",
      AddrScheme::P2wsh => "p2wsh",
      AddrScheme::P2wpkhInP2sh => "p2wpkh-p2sh",
      AddrScheme::P2wshInP2sh => "p2wsh-p2sh",
    }
  }

  /// Schemes whose payload is a public key rather than a script.
  pub fn takes_key(self) -> bool {
    matches!(self, AddrScheme::P2pkh | AddrScheme::P2wpkh | AddrScheme::P2wpkhInP2sh)
  }
}

impl fmt::Display for Coin {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.ticker())
  }
}

impl fmt::Display for Network {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}

impl fmt::Display for AddrScheme {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}

fn unknown(kind: &'static str, value: &str) -> Error {
  Error::UnknownName {
    kind,
    value: value.to_string(),
  }
}

impl FromStr for Coin {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    let lower = s.to_ascii_lowercase();
    Coin::ALL
      .into_iter()
      .find(|c| c.ticker() == lower)
      .ok_or_else(|| unknown("coin", s))
  }
}

impl FromStr for Network {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    match s.to_ascii_lowercase().as_str() {
      "main" | "mainnet" => Ok(Network::Main),
      "test" | "testnet" => Ok(Network::Test),
      "reg" | "regtest" => Ok(Network::Reg),
      _ => Err(unknown("network", s)),
    }
  }
}

impl FromStr for AddrScheme {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    match s.to_ascii_lowercase().as_str() {
      "p2pkh" => Ok(AddrScheme::P2pkh),
      "p2sh" => Ok(AddrScheme::P2sh),
      "p2wpkh" => Ok(AddrScheme::P2wpkh),
      "p2wsh" => Ok(AddrScheme::P2wsh),
      "p2wpkh-p2sh" | "p2sh-p2wpkh" => Ok(AddrScheme::P2wpkhInP2sh),
      "p2wsh-p2sh" | "p2sh-p2wsh" => Ok(AddrScheme::P2wshInP2sh),
      _ => Err(unknown("address scheme", s)),
    }
  }
}
