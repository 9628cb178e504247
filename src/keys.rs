//! Key types: parsing, serialization and tweaking.
//!
//! A `PrivateKey` wraps a nonzero canonical scalar; a `PublicKey`
//! wraps a non-neutral curve point. Byte formats follow SEC 1:
//! private keys are raw 32-byte big-endian scalars (with the
//! historical DER wrapper embedding the full curve parameters
//! available through `to_der()`/`from_der()`), public keys accept the
//! compressed (33-byte, 0x02/0x03), uncompressed (65-byte, 0x04) and
//! hybrid (65-byte, 0x06/0x07) encodings.
//!
//! Additive and multiplicative tweaks implement the usual derivation
//! algebra: tweaking the private key by t then deriving the public key
//! gives the same point as tweaking the public key by t, so both sides
//! of a derivation scheme stay in sync. Tweaks that would produce the
//! zero scalar or the neutral point are rejected so the caller can
//! pick a different tweak.

use rand_core::{CryptoRng, RngCore};
use sha2::{Digest, Sha512};

use crate::backend::wipe_bytes;
use crate::curve::Point;
use crate::scalar::Scalar;

/// A secp256k1 private key (nonzero scalar).
#[derive(Clone, Copy, Debug)]
pub struct PrivateKey {
    pub(crate) d: Scalar,
}

/// A secp256k1 public key (non-neutral point).
#[derive(Clone, Copy, Debug)]
pub struct PublicKey {
    pub point: Point,
}

// DER scaffolding for the legacy SEC1 ECPrivateKey export with
// explicit curve parameters. The middle chunk carries the parameters
// ([0] ECParameters: prime field, a = 0, b = 7, generator, order,
// cofactor 1) between the raw key and the embedded public key.

const DER_BEGIN_C: [u8; 8] = [0x30, 0x81, 0xD3, 0x02, 0x01, 0x01, 0x04, 0x20];

const DER_MIDDLE_C: [u8; 141] = [
    0xA0, 0x81, 0x85, 0x30, 0x81, 0x82, 0x02, 0x01, 0x01, 0x30, 0x2C,
    0x06, 0x07, 0x2A, 0x86, 0x48, 0xCE, 0x3D, 0x01, 0x01,
    0x02, 0x21, 0x00,
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
    0xFF, 0xFF, 0xFF, 0xFE, 0xFF, 0xFF, 0xFC, 0x2F,
    0x30, 0x06, 0x04, 0x01, 0x00, 0x04, 0x01, 0x07,
    0x04, 0x21,
    0x02, 0x79, 0xBE, 0x66, 0x7E, 0xF9, 0xDC, 0xBB, 0xAC,
    0x55, 0xA0, 0x62, 0x95, 0xCE, 0x87, 0x0B, 0x07,
    0x02, 0x9B, 0xFC, 0xDB, 0x2D, 0xCE, 0x28, 0xD9,
    0x59, 0xF2, 0x81, 0x5B, 0x16, 0xF8, 0x17, 0x98,
    0x02, 0x21, 0x00,
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFE,
    0xBA, 0xAE, 0xDC, 0xE6, 0xAF, 0x48, 0xA0, 0x3B,
    0xBF, 0xD2, 0x5E, 0x8C, 0xD0, 0x36, 0x41, 0x41,
    0x02, 0x01, 0x01,
    0xA1, 0x24, 0x03, 0x22, 0x00,
];

const DER_BEGIN_U: [u8; 9] =
    [0x30, 0x82, 0x01, 0x13, 0x02, 0x01, 0x01, 0x04, 0x20];

const DER_MIDDLE_U: [u8; 173] = [
    0xA0, 0x81, 0xA5, 0x30, 0x81, 0xA2, 0x02, 0x01, 0x01, 0x30, 0x2C,
    0x06, 0x07, 0x2A, 0x86, 0x48, 0xCE, 0x3D, 0x01, 0x01,
    0x02, 0x21, 0x00,
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
    0xFF, 0xFF, 0xFF, 0xFE, 0xFF, 0xFF, 0xFC, 0x2F,
    0x30, 0x06, 0x04, 0x01, 0x00, 0x04, 0x01, 0x07,
    0x04, 0x41,
    0x04, 0x79, 0xBE, 0x66, 0x7E, 0xF9, 0xDC, 0xBB, 0xAC,
    0x55, 0xA0, 0x62, 0x95, 0xCE, 0x87, 0x0B, 0x07,
    0x02, 0x9B, 0xFC, 0xDB, 0x2D, 0xCE, 0x28, 0xD9,
    0x59, 0xF2, 0x81, 0x5B, 0x16, 0xF8, 0x17, 0x98,
    0x48, 0x3A, 0xDA, 0x77, 0x26, 0xA3, 0xC4, 0x65,
    0x5D, 0xA4, 0xFB, 0xFC, 0x0E, 0x11, 0x08, 0xA8,
    0xFD, 0x17, 0xB4, 0x48, 0xA6, 0x85, 0x54, 0x19,
    0x9C, 0x47, 0xD0, 0x8F, 0xFB, 0x10, 0xD4, 0xB8,
    0x02, 0x21, 0x00,
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFE,
    0xBA, 0xAE, 0xDC, 0xE6, 0xAF, 0x48, 0xA0, 0x3B,
    0xBF, 0xD2, 0x5E, 0x8C, 0xD0, 0x36, 0x41, 0x41,
    0x02, 0x01, 0x01,
    0xA1, 0x44, 0x03, 0x42, 0x00,
];

/// Maximum length of a DER-exported private key (uncompressed form).
pub const DER_MAX_LEN: usize = 279;

impl PrivateKey {

    /// Generates a fresh private key from a cryptographically secure
    /// RNG.
    pub fn generate<T: CryptoRng + RngCore>(rng: &mut T) -> Self {
        let mut seed = [0u8; 32];
        rng.fill_bytes(&mut seed);
        let k = Self::from_seed(&seed);
        wipe_bytes(&mut seed);
        k
    }

    /// Decodes a 32-byte big-endian secret scalar; fails on a wrong
    /// length, an out-of-range value, or zero.
    pub fn decode(buf: &[u8]) -> Option<Self> {
        if buf.len() != 32 {
            return None;
        }
        let mut b = [0u8; 32];
        b.copy_from_slice(buf);
        let (d, ok) = Scalar::decode32(&b);
        wipe_bytes(&mut b);
        if (ok & !d.iszero()) != 0 {
            Some(Self { d })
        } else {
            None
        }
    }

    /// Encodes this key over exactly 32 bytes (big-endian).
    pub fn encode(self) -> [u8; 32] {
        self.d.encode()
    }

    /// Derives a private key from a seed with at least 128 bits of
    /// entropy. The derivation (SHA-512 under a domain prefix, reduced
    /// modulo the order) is not covered by any standard; store the key
    /// itself, not the seed.
    pub fn from_seed(seed: &[u8]) -> Self {
        let mut sh = Sha512::new();
        sh.update(b"zkp256 keygen");
        sh.update(seed);
        let w: [u8; 64] = sh.finalize().into();
        let mut d = Scalar::reduce_wide(&w);
        // A zero residue has negligible probability; map it to 1 so
        // the key is always valid.
        d.set_cond(&Scalar::ONE, d.iszero());
        Self { d }
    }

    /// Returns the corresponding public key.
    pub fn public_key(self) -> PublicKey {
        PublicKey { point: Point::mulgen(&self.d) }
    }

    /// Additive tweak: returns a key for d + t mod n. Fails if the
    /// tweak is out of range or the result would be zero, in which
    /// case the caller should pick another tweak.
    pub fn tweak_add(self, tweak: &[u8; 32]) -> Option<Self> {
        let (t, ok) = Scalar::decode32(tweak);
        if ok == 0 {
            return None;
        }
        let d = self.d + t;
        if d.iszero() != 0 {
            return None;
        }
        Some(Self { d })
    }

    /// Multiplicative tweak: returns a key for d * t mod n. Fails if
    /// the tweak is out of range or zero.
    pub fn tweak_mul(self, tweak: &[u8; 32]) -> Option<Self> {
        let (t, ok) = Scalar::decode32(tweak);
        if (ok & !t.iszero()) == 0 {
            return None;
        }
        // d and t are nonzero modulo a prime, so d*t cannot vanish.
        Some(Self { d: self.d * t })
    }

    /// Exports this key in the legacy SEC1 DER format with explicit
    /// curve parameters. Returns the buffer and the used length (214
    /// bytes compressed, 279 uncompressed).
    pub fn to_der(self, compressed: bool) -> ([u8; DER_MAX_LEN], usize) {
        let mut out = [0u8; DER_MAX_LEN];
        let pk = self.public_key();
        let len;
        if compressed {
            out[..8].copy_from_slice(&DER_BEGIN_C);
            out[8..40].copy_from_slice(&self.d.encode());
            out[40..181].copy_from_slice(&DER_MIDDLE_C);
            out[181..214].copy_from_slice(&pk.serialize_compressed());
            len = 214;
        } else {
            out[..9].copy_from_slice(&DER_BEGIN_U);
            out[9..41].copy_from_slice(&self.d.encode());
            out[41..214].copy_from_slice(&DER_MIDDLE_U);
            out[214..279].copy_from_slice(&pk.serialize_uncompressed());
            len = DER_MAX_LEN;
        }
        (out, len)
    }

    /// Imports a key from the legacy SEC1 DER format: the outer
    /// structure is walked just enough to locate the 32-byte secret
    /// octet string, which is then validated like `decode()`.
    pub fn from_der(der: &[u8]) -> Option<Self> {
        // SEQUENCE header.
        if der.len() < 2 || der[0] != 0x30 {
            return None;
        }
        let (mut off, seq_len) = read_len(der, 1)?;
        if der.len() < off + seq_len {
            return None;
        }
        // Version INTEGER 1.
        if der.len() < off + 3 || der[off] != 0x02 || der[off + 1] != 0x01 {
            return None;
        }
        off += 2 + der[off + 1] as usize;
        // privateKey OCTET STRING of exactly 32 bytes.
        if der.len() < off + 34 || der[off] != 0x04 || der[off + 1] != 0x20 {
            return None;
        }
        Self::decode(&der[off + 2..off + 34])
    }

    /// Clears the secret scalar with volatile stores.
    pub fn wipe(&mut self) {
        self.d.wipe();
    }
}

// Reads a DER length at `der[off]`; returns (offset past the length,
// value). Only the short form and the 0x81/0x82 long forms occur in
// the supported structures.
fn read_len(der: &[u8], off: usize) -> Option<(usize, usize)> {
    let b = *der.get(off)?;
    if b < 0x80 {
        Some((off + 1, b as usize))
    } else if b == 0x81 {
        Some((off + 2, *der.get(off + 1)? as usize))
    } else if b == 0x82 {
        let hi = *der.get(off + 1)? as usize;
        let lo = *der.get(off + 2)? as usize;
        Some((off + 3, (hi << 8) | lo))
    } else {
        None
    }
}

impl PublicKey {

    /// Parses a public key from its SEC 1 encoding (compressed,
    /// uncompressed or hybrid). The neutral is rejected: it is never a
    /// valid public key.
    pub fn parse(buf: &[u8]) -> Option<Self> {
        if buf.len() != 33 && buf.len() != 65 {
            return None;
        }
        let point = Point::decode(buf)?;
        if point.isneutral() != 0 {
            return None;
        }
        Some(Self { point })
    }

    /// Serializes in compressed form (33 bytes, 0x02/0x03 prefix).
    pub fn serialize_compressed(self) -> [u8; 33] {
        self.point.encode_compressed()
    }

    /// Serializes in uncompressed form (65 bytes, 0x04 prefix).
    pub fn serialize_uncompressed(self) -> [u8; 65] {
        self.point.encode_uncompressed()
    }

    /// Additive tweak: returns a key for Q + t*G. Fails if the tweak
    /// is out of range or the result would be the neutral.
    pub fn tweak_add(self, tweak: &[u8; 32]) -> Option<Self> {
        let (t, ok) = Scalar::decode32(tweak);
        if ok == 0 {
            return None;
        }
        let point = self.point + Point::mulgen(&t);
        if point.isneutral() != 0 {
            return None;
        }
        Some(Self { point })
    }

    /// Multiplicative tweak: returns a key for t*Q. Fails if the tweak
    /// is out of range or zero.
    pub fn tweak_mul(self, tweak: &[u8; 32]) -> Option<Self> {
        let (t, ok) = Scalar::decode32(tweak);
        if (ok & !t.iszero()) == 0 {
            return None;
        }
        let point = self.point * t;
        if point.isneutral() != 0 {
            return None;
        }
        Some(Self { point })
    }
}

#[cfg(test)]
mod tests {
    use super::{PrivateKey, PublicKey};
    use crate::curve::Point;
    use crate::scalar::Scalar;
    use sha2::{Digest, Sha256};

    // G in compressed form.
    const G_COMPRESSED: [u8; 33] = [
        0x02,
        0x79, 0xBE, 0x66, 0x7E, 0xF9, 0xDC, 0xBB, 0xAC,
        0x55, 0xA0, 0x62, 0x95, 0xCE, 0x87, 0x0B, 0x07,
        0x02, 0x9B, 0xFC, 0xDB, 0x2D, 0xCE, 0x28, 0xD9,
        0x59, 0xF2, 0x81, 0x5B, 0x16, 0xF8, 0x17, 0x98,
    ];

    fn key_from(i: u64) -> PrivateKey {
        let mut sh = Sha256::new();
        sh.update(i.to_le_bytes());
        let v: [u8; 32] = sh.finalize().into();
        PrivateKey::from_seed(&v)
    }

    #[test]
    fn derive() {
        let mut one = [0u8; 32];
        one[31] = 1;
        let sk = PrivateKey::decode(&one).unwrap();
        let pk = sk.public_key();
        assert!(pk.serialize_compressed() == G_COMPRESSED);
        assert!(pk.point.equals(Point::BASE) == 0xFFFFFFFF);

        // Zero and the order itself are invalid secret keys.
        assert!(PrivateKey::decode(&[0u8; 32]).is_none());
        assert!(PrivateKey::decode(&Scalar::ZERO.encode()).is_none());
        let order_bytes: [u8; 32] = [
            0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
            0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFE,
            0xBA, 0xAE, 0xDC, 0xE6, 0xAF, 0x48, 0xA0, 0x3B,
            0xBF, 0xD2, 0x5E, 0x8C, 0xD0, 0x36, 0x41, 0x41,
        ];
        assert!(PrivateKey::decode(&order_bytes).is_none());
        assert!(PrivateKey::decode(&one[..31]).is_none());

        // Seed derivation is deterministic and round-trips through the
        // raw encoding.
        let sk = PrivateKey::from_seed(b"an example seed");
        let sk2 = PrivateKey::from_seed(b"an example seed");
        assert!(sk.encode() == sk2.encode());
        let sk3 = PrivateKey::decode(&sk.encode()).unwrap();
        assert!(sk3.encode() == sk.encode());
    }

    #[test]
    fn parse_and_serialize() {
        let pk = key_from(1).public_key();
        let c = pk.serialize_compressed();
        let u = pk.serialize_uncompressed();
        assert!(PublicKey::parse(&c).unwrap().point
            .equals(pk.point) == 0xFFFFFFFF);
        assert!(PublicKey::parse(&u).unwrap().point
            .equals(pk.point) == 0xFFFFFFFF);

        // Hybrid form: uncompressed with the y parity in the prefix.
        let mut h = u;
        h[0] = 0x06 | (u[64] & 1);
        assert!(PublicKey::parse(&h).unwrap().point
            .equals(pk.point) == 0xFFFFFFFF);
        h[0] ^= 1;
        assert!(PublicKey::parse(&h).is_none());

        // The neutral encoding and stray lengths are rejected.
        assert!(PublicKey::parse(&[0x00]).is_none());
        assert!(PublicKey::parse(&c[..32]).is_none());
    }

    #[test]
    fn tweak_linearity() {
        let mut sh = Sha256::new();
        for i in 0..10u64 {
            let sk = key_from(i);
            sh.update((1000 + i).to_le_bytes());
            let tw: [u8; 32] = sh.finalize_reset().into();

            if let Some(skt) = sk.tweak_add(&tw) {
                let pkt = sk.public_key().tweak_add(&tw).unwrap();
                assert!(skt.public_key().point
                    .equals(pkt.point) == 0xFFFFFFFF);
            }
            if let Some(skt) = sk.tweak_mul(&tw) {
                let pkt = sk.public_key().tweak_mul(&tw).unwrap();
                assert!(skt.public_key().point
                    .equals(pkt.point) == 0xFFFFFFFF);
            }
        }
    }

    #[test]
    fn complement_tweak_fails() {
        let sk = key_from(42);
        // t = n - d: the additive tweak would produce the zero key and
        // the neutral public point; both sides must refuse.
        let t = (-sk.d).encode();
        assert!(sk.tweak_add(&t).is_none());
        assert!(sk.public_key().tweak_add(&t).is_none());

        // Out-of-range and zero tweaks.
        assert!(sk.tweak_add(&[0xFFu8; 32]).is_none());
        assert!(sk.tweak_mul(&[0u8; 32]).is_none());
    }

    #[test]
    fn der_roundtrip() {
        let sk = key_from(7);
        let (der, len) = sk.to_der(true);
        assert!(len == 214);
        assert!(der[0] == 0x30);
        let sk2 = PrivateKey::from_der(&der[..len]).unwrap();
        assert!(sk2.encode() == sk.encode());

        let (der, len) = sk.to_der(false);
        assert!(len == 279);
        let sk2 = PrivateKey::from_der(&der[..len]).unwrap();
        assert!(sk2.encode() == sk.encode());

        assert!(PrivateKey::from_der(&der[..40]).is_none());
        assert!(PrivateKey::from_der(&[0x30, 0x00]).is_none());
    }
}
