//! ECDSA signing, verification and public-key recovery.
//!
//! Signatures are pairs (r, s) of nonzero scalars. Signing always
//! emits the low-s form (s at most (n-1)/2) and verification rejects
//! the high form, so each message/key pair has a single acceptable
//! signature encoding; `Signature::normalize_s()` converts foreign
//! high-s signatures. Signing also returns a 2-bit recovery id (bit 0:
//! parity of R.y; bit 1: whether R.x wrapped past the group order)
//! from which `recover()` rebuilds the public key.
//!
//! Nonces come from a `NonceGenerator`; the default is the RFC 6979
//! HMAC-SHA256 derivation, so signatures are deterministic. The retry
//! counter is incremented and the generator queried again whenever a
//! candidate nonce is out of range or leads to r = 0 or s = 0; with a
//! 256-bit group the loop terminates on the first iteration in
//! practice, but the structure keeps every nonce failure recoverable.
//!
//! Wire formats: 64-byte compact r || s, and strict DER (a SEQUENCE of
//! two minimally-encoded INTEGERs; non-minimal lengths, padding or
//! trailing bytes are rejected).

use crate::context::{Context, SIGN, VERIFY};
use crate::curve::Point;
use crate::field::GFp;
use crate::keys::PublicKey;
use crate::nonce::{NonceGenerator, Rfc6979};
use crate::scalar::Scalar;

/// An ECDSA signature.
#[derive(Clone, Copy, Debug)]
pub struct Signature {
    pub r: Scalar,
    pub s: Scalar,
}

// p - n, as canonical big-endian bytes; an r below this bound may
// stand for an x coordinate that wrapped during reduction modulo n.
const P_MINUS_N: [u8; 32] = [
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x01,
    0x45, 0x51, 0x23, 0x19, 0x50, 0xB7, 0x5F, 0xC4,
    0x40, 0x2D, 0xA1, 0x72, 0x2F, 0xC9, 0xBA, 0xEE,
];

// The group order, as a field element.
const N_IN_FIELD: GFp = GFp::w64be(
    0xFFFFFFFFFFFFFFFF, 0xFFFFFFFFFFFFFFFE,
    0xBAAEDCE6AF48A03B, 0xBFD25E8CD0364141);

// Tells whether r (as an integer) is below p - n.
fn below_p_minus_n(r: &Scalar) -> bool {
    let rb = r.encode();
    for i in 0..32 {
        if rb[i] != P_MINUS_N[i] {
            return rb[i] < P_MINUS_N[i];
        }
    }
    false
}

/// Signs a 32-byte message hash with the default RFC 6979 nonce
/// source. Returns the signature and the recovery id, or `None` if the
/// secret key bytes are invalid.
///
/// Requires the `SIGN` capability.
pub fn sign(ctx: &Context, msg32: &[u8; 32], seckey: &[u8; 32])
    -> Option<(Signature, u8)>
{
    sign_with(ctx, msg32, seckey, &Rfc6979)
}

/// Signs a 32-byte message hash, drawing nonces from the provided
/// generator. Returns `None` if the secret key bytes are invalid or
/// the generator refuses to produce a nonce.
///
/// Requires the `SIGN` capability.
pub fn sign_with<N: NonceGenerator>(ctx: &Context, msg32: &[u8; 32],
    seckey: &[u8; 32], noncegen: &N) -> Option<(Signature, u8)>
{
    ctx.require(SIGN);

    let (mut d, ok) = Scalar::decode32(seckey);
    if (ok & !d.iszero()) == 0 {
        d.wipe();
        return None;
    }
    let m = Scalar::reduce32(msg32);

    let mut attempt = 0u32;
    loop {
        let nb = match noncegen.nonce(msg32, seckey, attempt) {
            Some(nb) => nb,
            None => {
                d.wipe();
                return None;
            }
        };
        let mut kb = nb;
        let (mut k, kok) = Scalar::decode32(&kb);
        crate::backend::wipe_bytes(&mut kb);
        if (kok & !k.iszero()) != 0 {
            if let Some(rs) = sign_once(ctx, &d, &m, &k) {
                d.wipe();
                k.wipe();
                return Some(rs);
            }
        }
        k.wipe();
        attempt += 1;
    }
}

// One signing attempt with a fixed nonce; fails (for a retry) when
// r or s comes out zero.
fn sign_once(ctx: &Context, d: &Scalar, m: &Scalar, k: &Scalar)
    -> Option<(Signature, u8)>
{
    let r_point = ctx.gen_ref().mulgen_blinded(k);
    let (x, y, _) = r_point.to_affine();

    // r = x(R) mod n; remember whether the reduction wrapped, the
    // recovery needs it to rebuild the exact coordinate.
    let (r, in_range) = Scalar::decode32(&x.encode());
    let mut recid = ((y.isodd() & 1) | ((!in_range & 1) << 1)) as u8;
    if r.iszero() != 0 {
        return None;
    }

    let mut ki = k.invert();
    let mut rd = r * d;
    let s = (m + rd) * ki;
    ki.wipe();
    rd.wipe();
    if s.iszero() != 0 {
        return None;
    }

    // Low-s normalization; negating s mirrors R, which flips the
    // recovery parity.
    let high = s.is_high();
    let s = Scalar::select(&s, &-s, high);
    recid ^= (high & 1) as u8;

    Some((Signature { r, s }, recid))
}

/// Verifies a signature over a 32-byte message hash. High-s signatures
/// are rejected; see `Signature::normalize_s()`.
///
/// NOT CONSTANT-TIME (verification handles public data only).
/// Requires the `VERIFY` capability.
pub fn verify(ctx: &Context, sig: &Signature, msg32: &[u8; 32],
    pubkey: &PublicKey) -> bool
{
    ctx.require(VERIFY);

    if sig.r.iszero() != 0 || sig.s.iszero() != 0 {
        return false;
    }
    if sig.s.is_high() != 0 {
        return false;
    }
    if pubkey.point.isneutral() != 0 {
        return false;
    }

    let m = Scalar::reduce32(msg32);
    let w = sig.s.invert_vartime();
    let u1 = m * w;
    let u2 = sig.r * w;
    let r_point = pubkey.point.mul_add_mulgen_vartime(&u2, &u1);
    if r_point.isneutral() != 0 {
        return false;
    }

    // Check r = x(R) mod n projectively: x(R) = X/Z, so the candidate
    // coordinate c matches iff c*Z = X. Since r < n but x(R) ranges
    // over the field, r + n is a second candidate whenever it still
    // fits below p.
    let (rx, _) = GFp::decode32(&sig.r.encode());
    if r_point.X.equals(rx * r_point.Z) != 0 {
        return true;
    }
    if below_p_minus_n(&sig.r)
        && r_point.X.equals((rx + N_IN_FIELD) * r_point.Z) != 0
    {
        return true;
    }
    false
}

/// Byte-level verification: parses the public key (any SEC 1 form) and
/// a strict-DER signature, then verifies.
///
/// Returns 1 if the signature is valid, 0 if it is not, -1 for an
/// unparsable public key, -2 for an unparsable signature.
pub fn verify_encoded(ctx: &Context, msg32: &[u8; 32], sig_der: &[u8],
    pubkey: &[u8]) -> i32
{
    let pk = match PublicKey::parse(pubkey) {
        Some(pk) => pk,
        None => return -1,
    };
    let sig = match Signature::from_der(sig_der) {
        Some(sig) => sig,
        None => return -2,
    };
    if verify(ctx, &sig, msg32, &pk) { 1 } else { 0 }
}

/// Recovers the public key from a signature, its recovery id and the
/// signed message hash.
///
/// NOT CONSTANT-TIME. Requires the `VERIFY` capability. `recid` MUST
/// be in 0..=3 (a programming error otherwise).
pub fn recover(ctx: &Context, sig: &Signature, recid: u8,
    msg32: &[u8; 32]) -> Option<PublicKey>
{
    ctx.require(VERIFY);
    assert!(recid < 4, "recovery id out of range");

    if sig.r.iszero() != 0 || sig.s.iszero() != 0 {
        return None;
    }

    // Rebuild x(R) = r (+ n when the reduction wrapped), then the full
    // point from the announced parity.
    let (mut x, _) = GFp::decode32(&sig.r.encode());
    if (recid & 2) != 0 {
        if !below_p_minus_n(&sig.r) {
            return None;
        }
        x += N_IN_FIELD;
    }
    let mut r_point = Point::NEUTRAL;
    if r_point.set_xo(&x, ((recid & 1) as u32).wrapping_neg()) == 0 {
        return None;
    }

    // Q = (s*R - m*G) / r.
    let ri = sig.r.invert_vartime();
    let m = Scalar::reduce32(msg32);
    let u1 = -(m * ri);
    let u2 = sig.s * ri;
    let q = r_point.mul_add_mulgen_vartime(&u2, &u1);
    if q.isneutral() != 0 {
        return None;
    }
    Some(PublicKey { point: q })
}

impl Signature {

    /// Serializes as 64 bytes (r || s, big-endian halves).
    pub fn to_compact(self) -> [u8; 64] {
        let mut out = [0u8; 64];
        out[..32].copy_from_slice(&self.r.encode());
        out[32..].copy_from_slice(&self.s.encode());
        out
    }

    /// Parses a 64-byte compact signature; fails if either half is not
    /// a canonical scalar. Zero halves are accepted here and rejected
    /// at verification.
    pub fn from_compact(buf: &[u8; 64]) -> Option<Self> {
        let mut rb = [0u8; 32];
        let mut sb = [0u8; 32];
        rb.copy_from_slice(&buf[..32]);
        sb.copy_from_slice(&buf[32..]);
        let (r, rok) = Scalar::decode32(&rb);
        let (s, sok) = Scalar::decode32(&sb);
        if (rok & sok) == 0 {
            return None;
        }
        Some(Self { r, s })
    }

    /// Serializes in strict DER form; returns the buffer and the used
    /// length (at most 72 bytes).
    pub fn to_der(self) -> ([u8; 72], usize) {
        fn push_int(out: &mut [u8; 72], off: usize, v: &[u8; 32]) -> usize {
            let mut st = 0;
            while st < 31 && v[st] == 0 {
                st += 1;
            }
            let pad = (v[st] & 0x80) != 0;
            let l = 32 - st + (pad as usize);
            out[off] = 0x02;
            out[off + 1] = l as u8;
            let mut j = off + 2;
            if pad {
                out[j] = 0x00;
                j += 1;
            }
            out[j..j + 32 - st].copy_from_slice(&v[st..]);
            j + 32 - st
        }

        let mut out = [0u8; 72];
        out[0] = 0x30;
        let end = push_int(&mut out, 2, &self.r.encode());
        let end = push_int(&mut out, end, &self.s.encode());
        // Total content is at most 70 bytes, so the short length form
        // always applies.
        out[1] = (end - 2) as u8;
        (out, end)
    }

    /// Parses a strict DER signature: exact length, short-form length
    /// bytes, minimal INTEGERs, values canonical modulo the order.
    pub fn from_der(der: &[u8]) -> Option<Self> {
        fn read_int(der: &[u8], off: usize) -> Option<(Scalar, usize)> {
            if der.len() < off + 3 || der[off] != 0x02 {
                return None;
            }
            let l = der[off + 1] as usize;
            if l == 0 || l >= 0x80 || der.len() < off + 2 + l {
                return None;
            }
            let c = &der[off + 2..off + 2 + l];
            // No negative values, no non-minimal padding.
            if (c[0] & 0x80) != 0 {
                return None;
            }
            if l > 1 && c[0] == 0 && (c[1] & 0x80) == 0 {
                return None;
            }
            if l > 33 || (l == 33 && c[0] != 0) {
                return None;
            }
            let mut b = [0u8; 32];
            let skip = if l == 33 { 1 } else { 0 };
            b[32 - (l - skip)..].copy_from_slice(&c[skip..]);
            let (v, ok) = Scalar::decode32(&b);
            if ok == 0 {
                return None;
            }
            Some((v, off + 2 + l))
        }

        if der.len() < 6 || der[0] != 0x30 {
            return None;
        }
        let l = der[1] as usize;
        if der[1] >= 0x80 || l + 2 != der.len() {
            return None;
        }
        let (r, off) = read_int(der, 2)?;
        let (s, off) = read_int(der, off)?;
        if off != der.len() {
            return None;
        }
        Some(Self { r, s })
    }

    /// Returns the low-s form of this signature and whether the input
    /// was in the high form.
    pub fn normalize_s(self) -> (Self, bool) {
        let high = self.s.is_high();
        let s = Scalar::select(&self.s, &-self.s, high);
        (Self { r: self.r, s }, high != 0)
    }
}

#[cfg(test)]
mod tests {
    use super::{recover, sign, sign_with, verify, verify_encoded, Signature};
    use crate::context::{Context, SIGN, VERIFY};
    use crate::keys::{PrivateKey, PublicKey};
    use crate::nonce::Rfc6979Extra;
    use sha2::{Digest, Sha256};

    fn hash(msg: &[u8]) -> [u8; 32] {
        let mut sh = Sha256::new();
        sh.update(msg);
        sh.finalize().into()
    }

    #[test]
    fn sign_verify_roundtrip() {
        let ctx = Context::new(SIGN | VERIFY);

        // d = 0x0101...01, m = SHA256("abc").
        let d = [0x01u8; 32];
        let m = hash(b"abc");
        let (sig, _recid) = sign(&ctx, &m, &d).unwrap();
        let pk = PrivateKey::decode(&d).unwrap().public_key();
        assert!(verify(&ctx, &sig, &m, &pk));

        // Deterministic nonces: same signature twice.
        let (sig2, recid2) = sign(&ctx, &m, &d).unwrap();
        assert!(sig.to_compact() == sig2.to_compact());
        assert!(_recid == recid2);

        // Another message or another key must not verify.
        let m2 = hash(b"abd");
        assert!(!verify(&ctx, &sig, &m2, &pk));
        let pk2 = PrivateKey::decode(&[0x02u8; 32]).unwrap().public_key();
        assert!(!verify(&ctx, &sig, &m, &pk2));

        // Low-s is enforced on output, and the high form is rejected.
        assert!(sig.s.is_high() == 0);
        let bad = Signature { r: sig.r, s: -sig.s };
        assert!(!verify(&ctx, &bad, &m, &pk));
        let (norm, was_high) = bad.normalize_s();
        assert!(was_high);
        assert!(verify(&ctx, &norm, &m, &pk));

        // Invalid secret keys are refused.
        assert!(sign(&ctx, &m, &[0u8; 32]).is_none());
        assert!(sign(&ctx, &m, &[0xFFu8; 32]).is_none());
    }

    #[test]
    fn deterministic_vector() {
        // RFC 6979-style known answer: key 1, message
        // "Satoshi Nakamoto" (hashed with SHA-256).
        let ctx = Context::new(SIGN | VERIFY);
        let mut d = [0u8; 32];
        d[31] = 1;
        let m = hash(b"Satoshi Nakamoto");
        let (sig, _) = sign(&ctx, &m, &d).unwrap();
        let expected: [u8; 64] = [
            0x93, 0x4B, 0x1E, 0xA1, 0x0A, 0x4B, 0x3C, 0x17,
            0x57, 0xE2, 0xB0, 0xC0, 0x17, 0xD0, 0xB6, 0x14,
            0x3C, 0xE3, 0xC9, 0xA7, 0xE6, 0xA4, 0xA4, 0x98,
            0x60, 0xD7, 0xA6, 0xAB, 0x21, 0x0E, 0xE3, 0xD8,
            0x24, 0x42, 0xCE, 0x9D, 0x2B, 0x91, 0x60, 0x64,
            0x10, 0x80, 0x14, 0x78, 0x3E, 0x92, 0x3E, 0xC3,
            0x6B, 0x49, 0x74, 0x3E, 0x2F, 0xFA, 0x1C, 0x44,
            0x96, 0xF0, 0x1A, 0x51, 0x2A, 0xAF, 0xD9, 0xE5,
        ];
        assert!(sig.to_compact() == expected);

        // Extra entropy moves the nonce and the signature.
        let (sig2, _) =
            sign_with(&ctx, &m, &d, &Rfc6979Extra([0x11u8; 32])).unwrap();
        assert!(sig2.to_compact() != expected);
        let pk = PrivateKey::decode(&d).unwrap().public_key();
        assert!(verify(&ctx, &sig2, &m, &pk));
    }

    #[test]
    fn recovery() {
        let ctx = Context::new(SIGN | VERIFY);
        let mut sh = Sha256::new();
        for i in 0..10u64 {
            sh.update(i.to_le_bytes());
            let d: [u8; 32] = sh.finalize_reset().into();
            let sk = match PrivateKey::decode(&d) {
                Some(sk) => sk,
                None => continue,
            };
            sh.update((i + 100).to_le_bytes());
            let m: [u8; 32] = sh.finalize_reset().into();

            let (sig, recid) = sign(&ctx, &m, &d).unwrap();
            let pk = recover(&ctx, &sig, recid, &m).unwrap();
            assert!(pk.point.equals(sk.public_key().point) == 0xFFFFFFFF);

            // The other parity gives a different key (or nothing).
            if let Some(pk2) = recover(&ctx, &sig, recid ^ 1, &m) {
                assert!(pk2.point.equals(pk.point) == 0);
            }
        }
    }

    #[test]
    fn wycheproof_verify() {
        // Wycheproof ecdsa_secp256k1_sha256 vector; the published
        // signature uses the high-s form, so it must be rejected
        // as-is and accepted after normalization.
        let pub_enc: [u8; 65] = [
            0x04,
            0xB8, 0x38, 0xFF, 0x44, 0xE5, 0xBC, 0x17, 0x7B,
            0xF2, 0x11, 0x89, 0xD0, 0x76, 0x60, 0x82, 0xFC,
            0x9D, 0x84, 0x32, 0x26, 0x88, 0x7F, 0xC9, 0x76,
            0x03, 0x71, 0x10, 0x0B, 0x7E, 0xE2, 0x0A, 0x6F,
            0xF0, 0xC9, 0xD7, 0x5B, 0xFB, 0xA7, 0xB3, 0x1A,
            0x6B, 0xCA, 0x19, 0x74, 0x49, 0x6E, 0xEB, 0x56,
            0xDE, 0x35, 0x70, 0x71, 0x95, 0x5D, 0x83, 0xC4,
            0xB1, 0xBA, 0xDA, 0xA0, 0xB2, 0x18, 0x32, 0xE9,
        ];
        let sig64: [u8; 64] = [
            0x81, 0x3E, 0xF7, 0x9C, 0xCE, 0xFA, 0x9A, 0x56,
            0xF7, 0xBA, 0x80, 0x5F, 0x0E, 0x47, 0x85, 0x84,
            0xFE, 0x5F, 0x0D, 0xD5, 0xF5, 0x67, 0xBC, 0x09,
            0xB5, 0x12, 0x3C, 0xCB, 0xC9, 0x83, 0x23, 0x65,
            0x90, 0x0E, 0x75, 0xAD, 0x23, 0x3F, 0xCC, 0x90,
            0x85, 0x09, 0xDB, 0xFF, 0x59, 0x22, 0x64, 0x7D,
            0xB3, 0x7C, 0x21, 0xF4, 0xAF, 0xD3, 0x20, 0x3A,
            0xE8, 0xDC, 0x4A, 0xE7, 0x79, 0x4B, 0x0F, 0x87,
        ];

        let ctx = Context::new(VERIFY);
        let pk = PublicKey::parse(&pub_enc).unwrap();
        let m = hash(b"123400");
        let sig = Signature::from_compact(&sig64).unwrap();
        assert!(!verify(&ctx, &sig, &m, &pk));
        let (sig, was_high) = sig.normalize_s();
        assert!(was_high);
        assert!(verify(&ctx, &sig, &m, &pk));
        assert!(!verify(&ctx, &sig, &hash(b"123401"), &pk));
    }

    #[test]
    fn der_codec() {
        let ctx = Context::new(SIGN | VERIFY);
        let mut sh = Sha256::new();
        for i in 0..10u64 {
            sh.update(i.to_le_bytes());
            let d: [u8; 32] = sh.finalize_reset().into();
            if PrivateKey::decode(&d).is_none() {
                continue;
            }
            sh.update((i + 50).to_le_bytes());
            let m: [u8; 32] = sh.finalize_reset().into();

            let (sig, _) = sign(&ctx, &m, &d).unwrap();
            let (der, len) = sig.to_der();
            let sig2 = Signature::from_der(&der[..len]).unwrap();
            assert!(sig2.to_compact() == sig.to_compact());

            let pk = PrivateKey::decode(&d).unwrap()
                .public_key().serialize_compressed();
            assert!(verify_encoded(&ctx, &m, &der[..len], &pk) == 1);

            // Tampering is noticed at the right layer.
            assert!(verify_encoded(&ctx, &m, &der[..len - 1], &pk) == -2);
            let mut badpk = pk;
            badpk[0] = 0x05;
            assert!(verify_encoded(&ctx, &m, &der[..len], &badpk) == -1);
            let m2 = hash(b"other");
            assert!(verify_encoded(&ctx, &m2, &der[..len], &pk) == 0);
        }

        // Strictness: trailing garbage, bad tags, non-minimal
        // integers.
        let mut one = [0u8; 32];
        one[31] = 1;
        let m = hash(b"strict");
        let (sig, _) = sign(&ctx, &m, &one).unwrap();
        let (der, len) = sig.to_der();
        let mut long = [0u8; 80];
        long[..len].copy_from_slice(&der[..len]);
        assert!(Signature::from_der(&long[..len + 1]).is_none());
        let mut bad = der;
        bad[0] = 0x31;
        assert!(Signature::from_der(&bad[..len]).is_none());
        // A forged leading-zero pad on r.
        let mut padded = [0u8; 80];
        padded[0] = 0x30;
        padded[1] = der[1] + 1;
        padded[2] = 0x02;
        padded[3] = der[3] + 1;
        padded[4] = 0x00;
        padded[5..len + 3 - 2].copy_from_slice(&der[4..len]);
        assert!(Signature::from_der(&padded[..len + 1]).is_none());
    }
}
