use coinkey::address::{self, AddrScheme, Coin, Network};
use coinkey::bip32::{self, ExtendedPrivKey, HdTree, HARDENED_OFFSET};
use coinkey::ecdsa::{self, Signature};
use coinkey::encoding::base58;
use coinkey::hash::sha256;
use coinkey::message;
use coinkey::{PrivateKey, PublicKey};
use num_bigint::BigUint;
use rand::rngs::StdRng;
use rand::SeedableRng;

const SEED1: &str = "000102030405060708090a0b0c0d0e0f";

#[test]
fn bip32_vector1_root_and_first_child() {
  let tree = HdTree::from_seed(&hex::decode(SEED1).unwrap(), address::table::XPUB).unwrap();

  let m = tree.derive("m").unwrap();
  assert_eq!(
    m.to_base58(),
    "xprv9s21ZrQH143K3QTDL4LXw2F7HEK3wJUD2nW2nRk4stbPy6cq3jPPqjiChkVvvNKmPGJxWUtg6LnF5kejMRNNU3TGtRBeJgk33yuGBxrMPHi"
  );
  assert_eq!(
    m.to_xpub().to_base58(),
    "xpub661MyMwAqRbcFtXgS5sYJABqqG9YLmC4Q1Rdap9gSE8NqtwybGhePY2gZ29ESFjqJoCu1Rupje8YtGqsefD265TMg7usUDFdp6W1EGMcet8"
  );

  let child = tree.derive_priv("m/0'").unwrap();
  assert_eq!(
    child.to_base58(),
    "xprv9uHRZZhk6KAJC1avXpDAp4MDc3sQKNxDiPvvkX8Br5ngLNv1TxvUxt4cV1rGL5hj6KCesnDYUhd7oWgT11eZG7XnxHrnYeSvkzY7d2bhkJ7"
  );
}

#[test]
fn public_derivation_matches_private() {
  let mut rng = StdRng::seed_from_u64(11);
  let mut seed = [0u8; 32];
  rand::RngCore::fill_bytes(&mut rng, &mut seed);
  let m = ExtendedPrivKey::master(&seed).unwrap();
  let account = m
    .ckd_priv(HARDENED_OFFSET + 84)
    .and_then(|k| k.ckd_priv(HARDENED_OFFSET))
    .unwrap();
  for i in [0, 1, 7, 1000, HARDENED_OFFSET - 1] {
    let via_priv = account.ckd_priv(i).unwrap().to_xpub();
    let via_pub = account.to_xpub().ckd_pub(i).unwrap();
    assert_eq!(via_priv, via_pub, "index {i}");
  }
}

#[test]
fn xpub_tree_reaches_same_addresses() {
  let seed = hex::decode(SEED1).unwrap();
  let private = HdTree::from_seed(&seed, address::table::ZPUB).unwrap();
  let account = private.derive_pub("m/84'/0'/0'").unwrap();
  let public = HdTree::from_xkey(&account.to_base58(), "m/84'/0'/0'").unwrap();

  for path in ["m/84'/0'/0'/0/0", "m/84'/0'/0'/1/5"] {
    let a = private.derive_pub(path).unwrap();
    let b = public.derive_pub(path).unwrap();
    assert_eq!(a, b);
    let addr = address::from_public_key(Coin::Btc, Network::Main, AddrScheme::P2wpkh, &b.public_key).unwrap();
    assert!(addr.starts_with("bc1q"));
  }
  assert_eq!(
    public.derive_pub("m/84'/0'/1'/0/0"),
    Err(bip32::Bip32Error::AnchorMismatch)
  );
}

#[test]
fn p2pkh_address_vector() {
  let pk = PublicKey::from_bytes(
    &hex::decode("0339a36013301597daef41fbe593a02cc513d0b55527ec2df1050e2e8ff49c85c2").unwrap(),
  )
  .unwrap();
  assert_eq!(
    address::from_public_key(Coin::Btc, Network::Main, AddrScheme::P2pkh, &pk).unwrap(),
    "15mKKb2eos1hWa6tisdPwwDC1a5J1y9nma"
  );
}

#[test]
fn message_vector_and_round_trip() {
  assert!(message::verify_bitcoin_msg(
    "1CypmgrpbP6ohTWBRYEaCKQAgUz6oTkon9",
    "H0OFI1thq9kJXYGQ3E2lDc4dlD1o0XDM0mgaf6oKDq/vrAKERrV76P6kAejZzoSL9MOIgUoxqG3MQg1EpaT/0Jg=",
    "Secret message #1",
  ));

  let key = PrivateKey::random();
  let addr = address::from_public_key(Coin::Btc, Network::Main, AddrScheme::P2pkh, key.public_key()).unwrap();
  let text = "an arbitrary message with unicode: \u{20bf}";
  let sig = message::sign_bitcoin_msg(&key, text);
  assert!(message::verify_bitcoin_msg(&addr, &sig, text));
}

#[test]
fn long_message_uses_wide_varint() {
  let key = PrivateKey::generate(&mut StdRng::seed_from_u64(2));
  let addr = address::from_public_key(Coin::Btc, Network::Main, AddrScheme::P2pkh, key.public_key()).unwrap();
  let text = "z".repeat(300);
  let sig = message::sign_bitcoin_msg(&key, &text);
  assert!(message::verify_bitcoin_msg(&addr, &sig, &text));
}

#[test]
fn ecdsa_round_trip_and_bounds() {
  let mut rng = StdRng::seed_from_u64(21);
  let n = &coinkey::ec::secp256k1().n;
  for i in 0..4u8 {
    let key = PrivateKey::generate(&mut rng);
    let hash = sha256(&[i]);
    let sig = ecdsa::sign_with_rng(&key, &hash, &mut rng);
    assert!(ecdsa::verify(key.public_key(), &hash, &sig));

    let high_r = Signature {
      r: n.clone(),
      s: sig.s.clone(),
      recovery_id: None,
    };
    assert!(!ecdsa::verify(key.public_key(), &hash, &high_r));
    let zero_s = Signature {
      r: sig.r.clone(),
      s: BigUint::from(0u8),
      recovery_id: None,
    };
    assert!(!ecdsa::verify(key.public_key(), &hash, &zero_s));
  }
}

#[test]
fn base58_keeps_leading_zeros() {
  for bytes in [vec![0x00, 0xff], vec![0, 0, 0, 1], vec![], vec![0; 5]] {
    assert_eq!(base58::decode(&base58::encode(&bytes)).unwrap(), bytes);
  }
  assert_eq!(base58::encode(&[0x00, 0xff]), "15Q");
}

#[test]
fn public_keys_match_libsecp256k1() {
  let secp = secp256k1::Secp256k1::new();
  let mut rng = StdRng::seed_from_u64(99);
  for _ in 0..8 {
    let key = PrivateKey::generate(&mut rng);
    let sk = secp256k1::SecretKey::from_byte_array(key.to_bytes()).unwrap();
    let reference = secp256k1::PublicKey::from_secret_key(&secp, &sk);
    assert_eq!(key.public_key().to_compressed(), reference.serialize());
    assert_eq!(key.public_key().to_uncompressed(), reference.serialize_uncompressed());
  }
}
