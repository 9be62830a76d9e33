//! Derivation paths and anchored trees.
//!
//! A path is `m/i1[']/i2[']/...`; `'`, `h` or `H` after an index marks it
//! hardened. An [`HdTree`] remembers the path of its root node (its anchor)
//! and only accepts paths that start with that anchor.

use std::fmt;

use super::{
  derive_priv_from_path, derive_pub_from_path, parse_xkey, Bip32Error, ExtendedKey, ExtendedPrivKey,
  ExtendedPubKey, HARDENED_OFFSET,
};
use crate::address::table::VersionPair;

/// A single path element (index + hardened bit)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChildNumber {
  pub index: u32, // full value, including hardened bit if set
}

impl ChildNumber {
  pub fn new(index: u32, hardened: bool) -> Self {
    let v = if hardened {
      index | HARDENED_OFFSET
    } else {
      index
    };
    ChildNumber { index: v }
  }
  pub fn is_hardened(&self) -> bool {
    self.index >= HARDENED_OFFSET
  }
  pub fn number(&self) -> u32 {
    self.index
  }
}

impl fmt::Display for ChildNumber {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if self.is_hardened() {
      write!(f, "{}'", self.index - HARDENED_OFFSET)
    } else {
      write!(f, "{}", self.index)
    }
  }
}

fn append_child_number(elem: &str, out: &mut Vec<ChildNumber>) -> Result<(), Bip32Error> {
  let hardened = elem.ends_with('\'') || elem.ends_with('h') || elem.ends_with('H');
  let num_str = if hardened {
    &elem[..elem.len() - 1]
  } else {
    elem
  };
  // u32::from_str would accept a leading '+'
  if num_str.is_empty() || !num_str.bytes().all(|b| b.is_ascii_digit()) {
    return Err(Bip32Error::BadPath);
  }
  let n: u32 = num_str.parse().map_err(|_| Bip32Error::BadPath)?;
  if n >= HARDENED_OFFSET {
    return Err(Bip32Error::BadPath);
  }
  out.push(ChildNumber::new(n, hardened));
  Ok(())
}

/// Parse "m/0h/1/2'/2" -> Vec<ChildNumber>. The leading `m` is required.
pub fn parse_path(s: &str) -> Result<Vec<ChildNumber>, Bip32Error> {
  let mut path_comps = s.trim().split('/');
  match path_comps.next() {
    Some("m") | Some("M") => {}
    _ => return Err(Bip32Error::BadPath),
  }
  let mut out = Vec::new();
  for elem in path_comps {
    append_child_number(elem, &mut out)?;
  }
  Ok(out)
}

/// Render a path back to `m/...` text, hardened segments with `'`.
pub fn format_path(path: &[ChildNumber]) -> String {
  let mut s = String::from("m");
  for cn in path {
    s.push('/');
    s.push_str(&cn.to_string());
  }
  s
}

/// An extended key plus the path it sits at.
///
/// Private trees usually hang off the master (`m`); a public-only tree is
/// built from an xpub exported at some account path, and every request must
/// restate that path before continuing below it.
#[derive(Clone, Debug)]
pub struct HdTree {
  root: ExtendedKey,
  anchor: Vec<ChildNumber>,
}

impl HdTree {
  /// `anchor` must be as long as `root` is deep.
  pub fn new(root: ExtendedKey, anchor: &str) -> Result<Self, Bip32Error> {
    let anchor = parse_path(anchor)?;
    if anchor.len() != usize::from(root.depth()) {
      return Err(Bip32Error::AnchorMismatch);
    }
    Ok(HdTree { root, anchor })
  }

  pub fn from_seed(seed: &[u8], versions: VersionPair) -> Result<Self, Bip32Error> {
    let master = ExtendedPrivKey::master_with_versions(seed, versions)?;
    Ok(HdTree {
      root: ExtendedKey::Private(master),
      anchor: Vec::new(),
    })
  }

  /// Parse an xprv/xpub-family string and anchor it at `anchor`.
  pub fn from_xkey(s: &str, anchor: &str) -> Result<Self, Bip32Error> {
    Self::new(parse_xkey(s)?, anchor)
  }

  pub fn from_xpub(xpub: ExtendedPubKey, anchor: &str) -> Result<Self, Bip32Error> {
    Self::new(ExtendedKey::Public(xpub), anchor)
  }

  pub fn from_xprv(xprv: ExtendedPrivKey, anchor: &str) -> Result<Self, Bip32Error> {
    Self::new(ExtendedKey::Private(xprv), anchor)
  }

  pub fn root(&self) -> &ExtendedKey {
    &self.root
  }

  pub fn anchor(&self) -> String {
    format_path(&self.anchor)
  }

  /// Segments of `path` below the anchor.
  fn relative<'a>(&self, path: &'a [ChildNumber]) -> Result<&'a [ChildNumber], Bip32Error> {
    path.strip_prefix(self.anchor.as_slice()).ok_or(Bip32Error::AnchorMismatch)
  }

  /// Walk `path` from the root, keeping private keys when the tree has them.
  pub fn derive(&self, path: &str) -> Result<ExtendedKey, Bip32Error> {
    let full = parse_path(path)?;
    let rest = self.relative(&full)?;
    log::debug!("deriving {} below anchor {}", format_path(rest), self.anchor());
    match &self.root {
      ExtendedKey::Private(k) => derive_priv_from_path(k, rest).map(ExtendedKey::Private),
      ExtendedKey::Public(k) => derive_pub_from_path(k, rest).map(ExtendedKey::Public),
    }
  }

  pub fn derive_priv(&self, path: &str) -> Result<ExtendedPrivKey, Bip32Error> {
    if self.root.private().is_none() {
      return Err(Bip32Error::PublicOnly);
    }
    match self.derive(path)? {
      ExtendedKey::Private(k) => Ok(k),
      ExtendedKey::Public(_) => Err(Bip32Error::PublicOnly),
    }
  }

  pub fn derive_pub(&self, path: &str) -> Result<ExtendedPubKey, Bip32Error> {
    Ok(self.derive(path)?.to_xpub())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::address::table;

  const SEED: &str = "000102030405060708090a0b0c0d0e0f";

  #[test]
  fn parses_hardened_markers() {
    let p = parse_path("m/0h/1/2'/2H").unwrap();
    assert_eq!(
      p,
      vec![
        ChildNumber::new(0, true),
        ChildNumber::new(1, false),
        ChildNumber::new(2, true),
        ChildNumber::new(2, true),
      ]
    );
    assert_eq!(format_path(&p), "m/0'/1/2'/2'");
    assert!(parse_path("M").unwrap().is_empty());
  }

  #[test]
  fn rejects_bad_paths() {
    for bad in ["", "0/1", "m/", "m//1", "m/x", "m/+1", "m/1''", "m/2147483648", "n/0"] {
      assert_eq!(parse_path(bad), Err(Bip32Error::BadPath), "{bad:?}");
    }
    assert!(parse_path("m/2147483647'").is_ok());
  }

  #[test]
  fn private_tree_from_seed() {
    let tree = HdTree::from_seed(&hex::decode(SEED).unwrap(), table::XPUB).unwrap();
    let k = tree.derive_priv("m/0'").unwrap();
    assert_eq!(
      k.to_base58(),
      "xprv9uHRZZhk6KAJC1avXpDAp4MDc3sQKNxDiPvvkX8Br5ngLNv1TxvUxt4cV1rGL5hj6KCesnDYUhd7oWgT11eZG7XnxHrnYeSvkzY7d2bhkJ7"
    );
    assert_eq!(tree.derive_pub("m/0'").unwrap(), k.to_xpub());
    assert_eq!(tree.derive("0'").unwrap_err(), Bip32Error::BadPath);
  }

  #[test]
  fn public_tree_requires_its_anchor() {
    // vector 1, m/0'
    let xpub = "xpub68Gmy5EdvgibQVfPdqkBBCHxA5htiqg55crXYuXoQRKfDBFA1WEjWgP6LHhwBZeNK1VTsfTFUHCdrfp1bgwQ9xv5ski8PX9rL2dZXvgGDnw";
    let tree = HdTree::from_xkey(xpub, "m/0'").unwrap();
    assert_eq!(tree.anchor(), "m/0'");

    let child = tree.derive_pub("m/0'/1").unwrap();
    assert_eq!(
      child.to_base58(),
      "xpub6ASuArnXKPbfEwhqN6e3mwBcDTgzisQN1wXN9BJcM47sSikHjJf3UFHKkNAWbWMiGj7Wf5uMash7SyYq527Hqck2AxYysAA7xmALppuCkwQ"
    );
    assert_eq!(tree.derive_pub("m/1/1"), Err(Bip32Error::AnchorMismatch));
    assert_eq!(tree.derive_pub("m/0'/1'"), Err(Bip32Error::HardenedFromPublic));
    assert_eq!(tree.derive_priv("m/0'/1"), Err(Bip32Error::PublicOnly));
  }

  #[test]
  fn anchor_depth_must_match() {
    let xpub = "xpub68Gmy5EdvgibQVfPdqkBBCHxA5htiqg55crXYuXoQRKfDBFA1WEjWgP6LHhwBZeNK1VTsfTFUHCdrfp1bgwQ9xv5ski8PX9rL2dZXvgGDnw";
    assert_eq!(HdTree::from_xkey(xpub, "m").unwrap_err(), Bip32Error::AnchorMismatch);
    assert_eq!(HdTree::from_xkey(xpub, "m/0'/1").unwrap_err(), Bip32Error::AnchorMismatch);
  }
}
