//! Borromean ring signatures.
//!
//! A Borromean signature proves, for m independent rings of public
//! points, knowledge of one discrete logarithm per ring, in a single
//! compact object: one 32-byte binding value e0 plus one scalar per
//! ring member. The rings are interlocked through e0, which is the
//! hash of every ring's closing R-point together with the message, so
//! no ring can be replayed or re-randomized in isolation.
//!
//! Within ring i the challenges chain forward:
//! e_{i,0} = H(e0, i, 0), then R_{i,j} = s_{i,j}*G + e_{i,j}*P_{i,j}
//! and e_{i,j+1} = H(R_{i,j}, i, j+1). The signer, knowing the secret
//! at position j*, starts the walk there with a nonce point k*G,
//! hashes forward to close e0, re-walks from 0 up to j*, and fits the
//! last piece with s_{i,j*} = k_i - e_{i,j*}*sec_i.
//!
//! Rings are passed as a flat slice of points plus per-ring sizes;
//! this keeps the range-proof caller (which builds 32 rings of up to
//! four members) free of nested allocation.

use sha2::{Digest, Sha256};

use crate::context::{Context, SIGN, VERIFY};
use crate::curve::Point;
use crate::scalar::Scalar;

// Challenge chaining hash: the previous link (e0 or an encoded
// R-point), the message, then the ring and position indices.
fn chain_hash(msg32: &[u8; 32], prev: &[u8], ridx: u32, eidx: u32)
    -> Scalar
{
    let mut sh = Sha256::new();
    sh.update(prev);
    sh.update(msg32);
    sh.update(ridx.to_be_bytes());
    sh.update(eidx.to_be_bytes());
    let h: [u8; 32] = sh.finalize().into();
    Scalar::reduce32(&h)
}

/// Signs `msg32` over the given rings.
///
/// `pubs` holds all ring members flattened in ring order and `rsizes`
/// the per-ring member counts. For ring i, `sec[i]` is the discrete
/// logarithm of `pubs[offset_i + secidx[i]]` and `k[i]` a fresh
/// random (or deterministically derived) nonce. `s` supplies the
/// response scalars for all non-signer positions and receives the
/// computed response at each signer position.
///
/// Returns the binding value e0, or `None` on a degenerate transcript
/// (a zero challenge or response, or a neutral chain point), in which
/// case the caller retries with fresh randomness.
///
/// Requires the `SIGN` and `VERIFY` capabilities.
pub fn sign(ctx: &Context, s: &mut [Scalar], pubs: &[Point],
    k: &[Scalar], sec: &[Scalar], rsizes: &[usize], secidx: &[usize],
    msg32: &[u8; 32]) -> Option<[u8; 32]>
{
    ctx.require(SIGN | VERIFY);
    let rings = rsizes.len();
    debug_assert!(k.len() == rings && sec.len() == rings
        && secidx.len() == rings);
    debug_assert!(rsizes.iter().sum::<usize>() == pubs.len()
        && s.len() == pubs.len());

    // Forward pass: from each signer slot, walk the tail of the ring
    // and collect the closing points into e0.
    let mut sha_e0 = Sha256::new();
    let mut off = 0;
    for i in 0..rings {
        let j0 = secidx[i];
        debug_assert!(j0 < rsizes[i]);
        let mut r_point = ctx.gen_ref().mulgen_blinded(&k[i]);
        for j in (j0 + 1)..rsizes[i] {
            let en = chain_hash(msg32, &r_point.encode_compressed(),
                i as u32, j as u32);
            if en.iszero() != 0 {
                return None;
            }
            r_point = pubs[off + j].mul_add_mulgen_vartime(&en, &s[off + j]);
            if r_point.isneutral() != 0 {
                return None;
            }
        }
        sha_e0.update(r_point.encode_compressed());
        off += rsizes[i];
    }
    sha_e0.update(msg32);
    let e0: [u8; 32] = sha_e0.finalize().into();

    // Closing pass: walk each ring head up to the signer slot, then
    // solve for its response.
    let mut off = 0;
    for i in 0..rings {
        let j0 = secidx[i];
        let mut en = chain_hash(msg32, &e0, i as u32, 0);
        for j in 0..j0 {
            if en.iszero() != 0 {
                return None;
            }
            let r_point =
                pubs[off + j].mul_add_mulgen_vartime(&en, &s[off + j]);
            if r_point.isneutral() != 0 {
                return None;
            }
            en = chain_hash(msg32, &r_point.encode_compressed(),
                i as u32, (j + 1) as u32);
        }
        if en.iszero() != 0 {
            return None;
        }
        let mut es = en * sec[i];
        let sv = k[i] - es;
        es.wipe();
        if sv.iszero() != 0 {
            return None;
        }
        s[off + j0] = sv;
        off += rsizes[i];
    }
    Some(e0)
}

/// Verifies a Borromean signature; see `sign()` for the layout of
/// `s`, `pubs` and `rsizes`.
///
/// NOT CONSTANT-TIME; all inputs are public.
pub fn verify(e0: &[u8; 32], s: &[Scalar], pubs: &[Point],
    rsizes: &[usize], msg32: &[u8; 32]) -> bool
{
    verify_collect(e0, s, pubs, rsizes, msg32, None)
}

// Verification that optionally records the challenge used at every
// ring position (the range-proof rewinder needs them).
pub(crate) fn verify_collect(e0: &[u8; 32], s: &[Scalar], pubs: &[Point],
    rsizes: &[usize], msg32: &[u8; 32], mut out_e: Option<&mut [Scalar]>)
    -> bool
{
    if rsizes.iter().sum::<usize>() != pubs.len() || s.len() != pubs.len() {
        return false;
    }

    let mut sha_e0 = Sha256::new();
    let mut off = 0;
    for i in 0..rsizes.len() {
        let mut en = chain_hash(msg32, e0, i as u32, 0);
        for j in 0..rsizes[i] {
            if en.iszero() != 0 || s[off + j].iszero() != 0 {
                return false;
            }
            if let Some(ev) = out_e.as_deref_mut() {
                ev[off + j] = en;
            }
            let r_point =
                pubs[off + j].mul_add_mulgen_vartime(&en, &s[off + j]);
            if r_point.isneutral() != 0 {
                return false;
            }
            if j + 1 == rsizes[i] {
                sha_e0.update(r_point.encode_compressed());
            } else {
                en = chain_hash(msg32, &r_point.encode_compressed(),
                    i as u32, (j + 1) as u32);
            }
        }
        off += rsizes[i];
    }
    sha_e0.update(msg32);
    let e0c: [u8; 32] = sha_e0.finalize().into();
    e0c == *e0
}
