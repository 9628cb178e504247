//! Deterministic nonce derivation (RFC 6979).
//!
//! `HmacDrbg` is the HMAC-SHA256 pseudorandom generator of RFC 6979
//! §3.2: K and V are seeded from the concatenated input material with
//! the two 0x00/0x01 update rounds, and each output block is a fresh
//! V = HMAC(K, V), with a re-key round between successive requests.
//! The same generator also powers context re-blinding and the
//! range-proof randomness stream.
//!
//! `NonceGenerator` is the seam through which signing obtains its
//! nonces: the default `Rfc6979` implementation derives the stream
//! from the secret key and message; `Rfc6979Extra` mixes in 32 bytes
//! of caller-provided extra entropy. The `attempt` counter selects
//! successive 32-byte blocks of the stream, so the retry loop in
//! signing walks a deterministic sequence.

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::backend::wipe_bytes;

type HmacSha256 = Hmac<Sha256>;

fn hmac32(key: &[u8; 32], parts: &[&[u8]]) -> [u8; 32] {
    let mut mac = HmacSha256::new_from_slice(key)
        .expect("HMAC accepts keys of any length");
    for p in parts {
        mac.update(p);
    }
    mac.finalize().into_bytes().into()
}

/// RFC 6979 HMAC-SHA256 deterministic random bit generator.
pub struct HmacDrbg {
    k: [u8; 32],
    v: [u8; 32],
    retry: bool,
}

impl HmacDrbg {

    /// Instantiates the generator over the concatenation of `parts`.
    pub fn new(parts: &[&[u8]]) -> Self {
        let mut k = [0u8; 32];
        let v = [0x01u8; 32];

        // K = HMAC(K, V || 0x00 || seed); V = HMAC(K, V)
        let mut mac = HmacSha256::new_from_slice(&k)
            .expect("HMAC accepts keys of any length");
        mac.update(&v);
        mac.update(&[0x00]);
        for p in parts {
            mac.update(p);
        }
        k = mac.finalize().into_bytes().into();
        let mut v = hmac32(&k, &[&v[..]]);

        // K = HMAC(K, V || 0x01 || seed); V = HMAC(K, V)
        let mut mac = HmacSha256::new_from_slice(&k)
            .expect("HMAC accepts keys of any length");
        mac.update(&v);
        mac.update(&[0x01]);
        for p in parts {
            mac.update(p);
        }
        k = mac.finalize().into_bytes().into();
        v = hmac32(&k, &[&v[..]]);

        Self { k, v, retry: false }
    }

    /// Fills `out` with the next bytes of the stream.
    pub fn generate(&mut self, out: &mut [u8]) {
        if self.retry {
            // Re-key round between successive requests.
            self.k = hmac32(&self.k, &[&self.v[..], &[0x00][..]]);
            self.v = hmac32(&self.k, &[&self.v[..]]);
        }
        let mut off = 0;
        while off < out.len() {
            self.v = hmac32(&self.k, &[&self.v[..]]);
            let m = core::cmp::min(32, out.len() - off);
            out[off..off + m].copy_from_slice(&self.v[..m]);
            off += m;
        }
        self.retry = true;
    }

    /// Returns the next 32-byte block of the stream.
    pub fn generate32(&mut self) -> [u8; 32] {
        let mut out = [0u8; 32];
        self.generate(&mut out);
        out
    }
}

impl Drop for HmacDrbg {
    fn drop(&mut self) {
        wipe_bytes(&mut self.k);
        wipe_bytes(&mut self.v);
    }
}

/// Source of signing nonces.
///
/// `attempt` counts the retries of the signing loop; a generator must
/// return a different nonce for each attempt, or `None` to refuse (in
/// which case signing fails).
pub trait NonceGenerator {
    fn nonce(&self, msg32: &[u8; 32], key32: &[u8; 32], attempt: u32)
        -> Option<[u8; 32]>;
}

/// The default RFC 6979 nonce source (HMAC-SHA256 over key and
/// message).
#[derive(Clone, Copy, Debug)]
pub struct Rfc6979;

impl NonceGenerator for Rfc6979 {
    fn nonce(&self, msg32: &[u8; 32], key32: &[u8; 32], attempt: u32)
        -> Option<[u8; 32]>
    {
        let mut rng = HmacDrbg::new(&[&key32[..], &msg32[..]]);
        let mut out = [0u8; 32];
        for _ in 0..=attempt {
            out = rng.generate32();
        }
        Some(out)
    }
}

/// RFC 6979 with 32 bytes of additional input appended to the seeding
/// material.
#[derive(Clone, Copy, Debug)]
pub struct Rfc6979Extra(pub [u8; 32]);

impl NonceGenerator for Rfc6979Extra {
    fn nonce(&self, msg32: &[u8; 32], key32: &[u8; 32], attempt: u32)
        -> Option<[u8; 32]>
    {
        let mut rng = HmacDrbg::new(&[&key32[..], &msg32[..], &self.0[..]]);
        let mut out = [0u8; 32];
        for _ in 0..=attempt {
            out = rng.generate32();
        }
        Some(out)
    }
}

#[cfg(test)]
mod tests {
    use super::{HmacDrbg, NonceGenerator, Rfc6979, Rfc6979Extra};

    #[test]
    fn stream_is_deterministic() {
        let mut r1 = HmacDrbg::new(&[&b"seed material"[..], &b" in parts"[..]]);
        let mut r2 = HmacDrbg::new(&[&b"seed material in parts"[..]]);
        // Seeding concatenates the parts, so differently sliced inputs
        // give the same stream.
        let a = r1.generate32();
        let b = r2.generate32();
        assert!(a == b);
        // Streams keep moving and stay in sync.
        for _ in 0..5 {
            assert!(r1.generate32() == r2.generate32());
        }

        let mut r3 = HmacDrbg::new(&[&b"other seed"[..]]);
        assert!(r3.generate32() != a);
    }

    #[test]
    fn chunked_output_matches_blocks() {
        let mut r1 = HmacDrbg::new(&[&b"chunk test"[..]]);
        let mut r2 = HmacDrbg::new(&[&b"chunk test"[..]]);
        let mut big = [0u8; 80];
        r1.generate(&mut big);
        // A single 80-byte request is the prefix of the same stream
        // read as blocks within one request.
        let mut alt = [0u8; 96];
        r2.generate(&mut alt);
        assert!(big[..] == alt[..80]);
    }

    #[test]
    fn attempts_walk_the_stream() {
        let msg = [0x07u8; 32];
        let key = [0x2Au8; 32];
        let n0 = Rfc6979.nonce(&msg, &key, 0).unwrap();
        let n1 = Rfc6979.nonce(&msg, &key, 1).unwrap();
        assert!(n0 != n1);
        // Same (key, msg, attempt) reproduces the same nonce.
        assert!(Rfc6979.nonce(&msg, &key, 0).unwrap() == n0);
        assert!(Rfc6979.nonce(&msg, &key, 1).unwrap() == n1);

        // Extra entropy changes the stream.
        let ne = Rfc6979Extra([0x55u8; 32]).nonce(&msg, &key, 0).unwrap();
        assert!(ne != n0);
    }
}
