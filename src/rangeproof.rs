//! Zero-knowledge range proofs over Pedersen commitments.
//!
//! A proof shows that a committed value lies in [min, max] without
//! revealing it. The value is decomposed as
//! value = min + 10^exp * sum(d_i * 4^i) over base-4 digits d_i; each
//! digit gets its own Pedersen sub-commitment C_i, whose blinding
//! factors sum to the outer blind, so sum(C_i) = C - min*H. A
//! Borromean ring signature over the candidate keys
//! C_i - j*(10^exp * 4^i)*H (j = 0..3) proves that every digit is in
//! range without disclosing which candidate closed each ring. A
//! nonzero exponent trades proof size for privacy by folding the low
//! decimal digits of the value into the public minimum; exp = -1
//! degenerates into an exact-value proof (a single ring proving
//! knowledge of the blind of C - value*H).
//!
//! All per-proof randomness (ring blinds and response scalars) is
//! drawn from an HMAC-SHA256 stream keyed by a 32-byte prover nonce
//! over the commitment and proof header. Whoever knows the nonce can
//! rewind a proof: regenerate the stream, identify each ring's signer
//! slot, and recover the value, the outer blind, and a caller message
//! embedded by XOR into the stream blocks (up to 32 bytes per ring
//! slot outside the final ring).
//!
//! Proof layout: header (flags/exponent, mantissa, minimum), the
//! serialized sub-commitments for all rings but the last (the
//! verifier derives the last one from the outer commitment), the
//! 32-byte Borromean binding value, then one 32-byte scalar per ring
//! member. The largest proof (64 mantissa bits, 32 rings) is 5161
//! bytes.

use sha2::{Digest, Sha256};

use crate::backend::wipe_bytes;
use crate::borromean;
use crate::context::{Context, COMMIT, RANGEPROOF, SIGN, VERIFY};
use crate::curve::Point;
use crate::nonce::HmacDrbg;
use crate::pedersen::Commitment;
use crate::scalar::Scalar;
use crate::Vec;

const MAX_RINGS: usize = 32;
const MAX_NPUB: usize = 128;

/// Largest possible proof: 10-byte header, 31 sub-commitments, the
/// binding value, 128 response scalars.
pub const MAX_PROOF_LEN: usize = 10 + 33 * 31 + 32 + 32 * 128;

static POW10: [u64; 19] = [
    1,
    10,
    100,
    1_000,
    10_000,
    100_000,
    1_000_000,
    10_000_000,
    100_000_000,
    1_000_000_000,
    10_000_000_000,
    100_000_000_000,
    1_000_000_000_000,
    10_000_000_000_000,
    100_000_000_000_000,
    1_000_000_000_000_000,
    10_000_000_000_000_000,
    100_000_000_000_000_000,
    1_000_000_000_000_000_000,
];

/// Decoded header of a range proof.
#[derive(Clone, Copy, Debug)]
pub struct ProofInfo {
    /// Base-10 exponent, or -1 for an exact-value proof.
    pub exp: i32,
    /// Number of mantissa bits (0 for an exact-value proof).
    pub mantissa: u32,
    /// Proven lower bound.
    pub min_value: u64,
    /// Proven upper bound.
    pub max_value: u64,
}

/// Outcome of rewinding a proof with the prover nonce.
#[derive(Clone, Debug)]
pub struct Rewind {
    pub value: u64,
    pub blind: [u8; 32],
    pub min_value: u64,
    pub max_value: u64,
    /// Embedded message, zero-padded to the proof capacity.
    pub message: Vec<u8>,
}

// Ring shape for a mantissa: base-4 digits, one ring per digit pair,
// with a two-member ring for a trailing odd bit. Mantissa 0 is the
// exact-value shape: a single one-member ring.
fn ring_layout(mantissa: u32) -> (usize, [usize; MAX_RINGS]) {
    let mut rsizes = [0usize; MAX_RINGS];
    if mantissa == 0 {
        rsizes[0] = 1;
        return (1, rsizes);
    }
    let rings = ((mantissa as usize) + 1) / 2;
    for i in 0..rings {
        rsizes[i] = 4;
    }
    if (mantissa & 1) != 0 {
        rsizes[rings - 1] = 2;
    }
    (rings, rsizes)
}

// scale * (2^mantissa - 1), the width of the provable range; `None`
// when it exceeds 64 bits.
fn range_width(scale: u64, mantissa: u32) -> Option<u64> {
    if mantissa == 0 {
        return Some(0);
    }
    let digits = if mantissa >= 64 {
        u64::MAX
    } else {
        (1u64 << mantissa) - 1
    };
    let w = (scale as u128) * (digits as u128);
    if w > u64::MAX as u128 {
        None
    } else {
        Some(w as u64)
    }
}

fn bytes_for(x: u64) -> usize {
    if x == 0 {
        1
    } else {
        ((64 - x.leading_zeros() as usize) + 7) / 8
    }
}

// Header encoding. Byte 0: bit 6 = has mantissa (a ranged proof),
// bit 5 = has nonzero minimum, low 5 bits = exponent. Byte 1 (ranged
// only): mantissa - 1. Then the minimum, big-endian, over the number
// of bytes needed for the largest minimum admissible under the range
// width (so the length is implied and the encoding stays canonical).
fn encode_header(out: &mut Vec<u8>, exp: i32, mantissa: u32, min: u64,
    width: u64)
{
    let mut b0 = 0u8;
    if mantissa > 0 {
        b0 |= 0x40 | (exp as u8);
    }
    if min > 0 {
        b0 |= 0x20;
    }
    out.push(b0);
    if mantissa > 0 {
        out.push((mantissa - 1) as u8);
    }
    if min > 0 {
        let len = bytes_for(u64::MAX - width);
        for k in (0..len).rev() {
            out.push((min >> (8 * k)) as u8);
        }
    }
}

// Decodes the header; returns (header length, exp, mantissa, min, max).
fn decode_header(proof: &[u8]) -> Option<(usize, i32, u32, u64, u64)> {
    if proof.is_empty() {
        return None;
    }
    let b0 = proof[0];
    if (b0 & 0x80) != 0 {
        return None;
    }
    let has_m = (b0 & 0x40) != 0;
    let has_min = (b0 & 0x20) != 0;
    let expf = (b0 & 0x1F) as i32;

    let exp: i32;
    let mantissa: u32;
    let mut off: usize;
    if has_m {
        if expf > 18 || proof.len() < 2 {
            return None;
        }
        let m = proof[1] as u32 + 1;
        if m > 64 {
            return None;
        }
        exp = expf;
        mantissa = m;
        off = 2;
    } else {
        // Exact-value proofs carry no exponent.
        if expf != 0 {
            return None;
        }
        exp = -1;
        mantissa = 0;
        off = 1;
    }

    let scale = if has_m { POW10[exp as usize] } else { 1 };
    let width = range_width(scale, mantissa)?;

    let mut min = 0u64;
    if has_min {
        let cap = u64::MAX - width;
        if cap == 0 {
            return None;
        }
        let len = bytes_for(cap);
        if proof.len() < off + len {
            return None;
        }
        for k in 0..len {
            min = (min << 8) | proof[off + k] as u64;
        }
        off += len;
        if min == 0 || min > cap {
            return None;
        }
    }

    Some((off, exp, mantissa, min, min + width))
}

// Draws the deterministic per-proof randomness: for every ring but the
// last, a nonzero ring blind (rejection-sampled), then one response
// block per ring member. An embedded message is XORed into the blocks
// of all rings but the last, before scalar reduction; `raw` receives
// the pre-XOR stream blocks for the rewinder.
fn genrand(nonce: &[u8; 32], commit33: &[u8; 33], header: &[u8],
    rings: usize, rsizes: &[usize], message: Option<&[u8]>,
    sec: &mut [Scalar], s: &mut [Scalar], raw: &mut [[u8; 32]]) -> bool
{
    let mut drbg = HmacDrbg::new(&[&nonce[..], &commit33[..], header]);
    let mut idx = 0;
    for i in 0..rings {
        if i + 1 < rings {
            sec[i] = loop {
                let t = drbg.generate32();
                let (v, ok) = Scalar::decode32(&t);
                if (ok & !v.iszero()) != 0 {
                    break v;
                }
            };
        } else {
            sec[i] = Scalar::ZERO;
        }
        for _ in 0..rsizes[i] {
            let t = drbg.generate32();
            raw[idx] = t;
            let mut u = t;
            if i + 1 < rings {
                if let Some(msg) = message {
                    for b in 0..32 {
                        let mi = 32 * idx + b;
                        if mi < msg.len() {
                            u[b] ^= msg[mi];
                        }
                    }
                }
            }
            s[idx] = Scalar::reduce32(&u);
            if s[idx].iszero() != 0 {
                return false;
            }
            idx += 1;
        }
    }
    true
}

// Parsed proof body.
struct Parsed {
    hdr_len: usize,
    exp: i32,
    mantissa: u32,
    min: u64,
    max: u64,
    rings: usize,
    rsizes: [usize; MAX_RINGS],
    npub: usize,
    subc: Vec<Point>,
    e0: [u8; 32],
    s: Vec<Scalar>,
}

fn parse(proof: &[u8]) -> Option<Parsed> {
    let (hdr_len, exp, mantissa, min, max) = decode_header(proof)?;
    let (rings, rsizes) = ring_layout(mantissa);
    let npub: usize = rsizes[..rings].iter().sum();

    let want = hdr_len + 33 * (rings - 1) + 32 + 32 * npub;
    if proof.len() != want {
        return None;
    }

    let mut off = hdr_len;
    let mut subc = Vec::with_capacity(rings - 1);
    for _ in 0..(rings - 1) {
        let mut cb = [0u8; 33];
        cb.copy_from_slice(&proof[off..off + 33]);
        subc.push(Commitment::parse(&cb)?.point());
        off += 33;
    }

    let mut e0 = [0u8; 32];
    e0.copy_from_slice(&proof[off..off + 32]);
    off += 32;

    let mut s = Vec::with_capacity(npub);
    for _ in 0..npub {
        let mut sb = [0u8; 32];
        sb.copy_from_slice(&proof[off..off + 32]);
        let (v, ok) = Scalar::decode32(&sb);
        if (ok & !v.iszero()) == 0 {
            return None;
        }
        s.push(v);
        off += 32;
    }

    Some(Parsed {
        hdr_len, exp, mantissa, min, max, rings, rsizes, npub, subc, e0, s,
    })
}

// The Borromean transcript binds the commitment, the proof header and
// the serialized sub-commitments.
fn transcript(commit33: &[u8; 33], header: &[u8], subc_bytes: &[u8])
    -> [u8; 32]
{
    let mut sh = Sha256::new();
    sh.update(commit33);
    sh.update(header);
    sh.update(subc_bytes);
    sh.finalize().into()
}

// Expands the ring public keys: for ring i with sub-commitment C_i and
// digit weight base_i, member j is C_i - j*base_i*H.
fn expand_pubs(ctx: &Context, rings: usize, rsizes: &[usize],
    scale: u64, subc: &[Point], pubs: &mut [Point])
{
    let genh = ctx.genh_ref();
    let mut off = 0;
    for i in 0..rings {
        let mut pj = subc[i];
        pubs[off] = pj;
        if rsizes[i] > 1 {
            let base = scale << (2 * i);
            let hb = genh.mul_value_vartime(base);
            for j in 1..rsizes[i] {
                pj -= hb;
                pubs[off + j] = pj;
            }
        }
        off += rsizes[i];
    }
}

/// Builds a range proof for `value` under `commit` = blind*G +
/// value*H.
///
/// `min_value` is the public lower bound; `exp` in 0..=18 reveals that
/// many low decimal digits of value - min_value (folded into the
/// proven minimum), while `exp` = -1 proves the exact value;
/// `min_bits` forces a minimum mantissa width so small values do not
/// betray their magnitude. `message` (up to 32 bytes per ring slot
/// outside the last ring) is recoverable by whoever knows `nonce`.
///
/// Requires the `SIGN`, `VERIFY`, `COMMIT` and `RANGEPROOF`
/// capabilities.
pub fn sign(ctx: &Context, min_value: u64, commit: &Commitment,
    blind: &[u8; 32], nonce: &[u8; 32], exp: i32, min_bits: u32,
    value: u64, message: &[u8]) -> Option<Vec<u8>>
{
    ctx.require(SIGN | VERIFY | COMMIT | RANGEPROOF);

    if exp < -1 || exp > 18 || min_bits > 64 || value < min_value {
        return None;
    }
    let (mut bl, ok) = Scalar::decode32(blind);
    if ok == 0 {
        bl.wipe();
        return None;
    }

    // Value decomposition: fold the sub-scale remainder into the
    // public minimum, size the mantissa.
    let scale: u64;
    let mantissa: u32;
    let mv: u64;
    let v: u64;
    if exp < 0 {
        scale = 1;
        mantissa = 0;
        mv = value;
        v = 0;
    } else {
        let sc = POW10[exp as usize];
        let raw = value - min_value;
        let rem = raw % sc;
        let vq = raw / sc;
        let mut m = 64 - (vq.leading_zeros());
        if m < min_bits {
            m = min_bits;
        }
        if m == 0 {
            m = 1;
        }
        scale = sc;
        mantissa = m;
        mv = min_value + rem;
        v = vq;
    }
    let width = range_width(scale, mantissa)?;
    if mv > u64::MAX - width {
        return None;
    }

    let (rings, rsizes) = ring_layout(mantissa);
    let npub: usize = rsizes[..rings].iter().sum();
    let capacity = 32 * (npub - rsizes[rings - 1]);
    if message.len() > capacity {
        return None;
    }

    let mut secidx = [0usize; MAX_RINGS];
    for i in 0..rings {
        secidx[i] = ((v >> (2 * i)) as usize) & (rsizes[i] - 1);
    }

    let mut proof = Vec::with_capacity(MAX_PROOF_LEN);
    encode_header(&mut proof, exp, mantissa, mv, width);
    let hdr_len = proof.len();

    let commit33 = commit.serialize();

    // Deterministic randomness; the final ring blind balances the sum
    // against the outer blind.
    let mut sec = [Scalar::ZERO; MAX_RINGS];
    let mut s = [Scalar::ZERO; MAX_NPUB];
    let mut raw = [[0u8; 32]; MAX_NPUB];
    if !genrand(nonce, &commit33, &proof[..hdr_len], rings,
        &rsizes[..rings], Some(message), &mut sec[..rings],
        &mut s[..npub], &mut raw[..npub])
    {
        bl.wipe();
        return None;
    }
    let mut acc = Scalar::ZERO;
    for i in 0..(rings - 1) {
        acc += sec[i];
    }
    sec[rings - 1] = bl - acc;
    acc.wipe();
    bl.wipe();
    if sec[rings - 1].iszero() != 0 {
        for x in sec.iter_mut() {
            x.wipe();
        }
        return None;
    }

    // Sub-commitments: all but the last carry their own blinded digit;
    // the last is derived so that the set sums to C - min*H, exactly
    // what the verifier will reconstruct.
    let genh = ctx.genh_ref();
    let gen = ctx.gen_ref();
    let mut subc = [Point::NEUTRAL; MAX_RINGS];
    let mut sum = Point::NEUTRAL;
    for i in 0..(rings - 1) {
        let base = scale << (2 * i);
        let d = (secidx[i] as u64) * base;
        subc[i] = gen.mulgen_blinded(&sec[i]) + genh.mul_value(d);
        if subc[i].isneutral() != 0 {
            for x in sec.iter_mut() {
                x.wipe();
            }
            return None;
        }
        sum += subc[i];
    }
    subc[rings - 1] = commit.point() - genh.mul_value_vartime(mv) - sum;

    for i in 0..(rings - 1) {
        proof.extend_from_slice(
            &Commitment::from_point(subc[i]).serialize());
    }

    let mut pubs = [Point::NEUTRAL; MAX_NPUB];
    expand_pubs(ctx, rings, &rsizes[..rings], scale, &subc[..rings],
        &mut pubs[..npub]);

    let m32 = transcript(&commit33, &proof[..hdr_len], &proof[hdr_len..]);

    // The nonce at each signer slot is the stream value already placed
    // in s; the Borromean signer overwrites that slot with the closing
    // response.
    let mut k = [Scalar::ZERO; MAX_RINGS];
    let mut off = 0;
    for i in 0..rings {
        k[i] = s[off + secidx[i]];
        off += rsizes[i];
    }

    let e0 = borromean::sign(ctx, &mut s[..npub], &pubs[..npub],
        &k[..rings], &sec[..rings], &rsizes[..rings], &secidx[..rings],
        &m32);
    for x in sec.iter_mut() {
        x.wipe();
    }
    for x in k.iter_mut() {
        x.wipe();
    }
    for x in raw.iter_mut() {
        wipe_bytes(x);
    }
    let e0 = e0?;

    proof.extend_from_slice(&e0);
    for i in 0..npub {
        proof.extend_from_slice(&s[i].encode());
    }
    debug_assert!(proof.len() <= MAX_PROOF_LEN);
    Some(proof)
}

/// Verifies a range proof against its commitment; on success returns
/// the proven (min, max) bounds.
///
/// Requires the `VERIFY`, `COMMIT` and `RANGEPROOF` capabilities.
pub fn verify(ctx: &Context, commit: &Commitment, proof: &[u8])
    -> Option<(u64, u64)>
{
    ctx.require(VERIFY | COMMIT | RANGEPROOF);
    let p = parse(proof)?;
    verify_inner(ctx, commit, proof, &p, None)?;
    Some((p.min, p.max))
}

// Shared verification; optionally collects the per-slot challenges
// for the rewinder.
fn verify_inner(ctx: &Context, commit: &Commitment, proof: &[u8],
    p: &Parsed, out_e: Option<&mut [Scalar]>) -> Option<()>
{
    let scale = if p.mantissa == 0 { 1 } else { POW10[p.exp as usize] };

    // Rebuild the full sub-commitment set; the last one balances
    // C - min*H.
    let genh = ctx.genh_ref();
    let mut subc = [Point::NEUTRAL; MAX_RINGS];
    let mut sum = Point::NEUTRAL;
    for i in 0..(p.rings - 1) {
        subc[i] = p.subc[i];
        sum += subc[i];
    }
    subc[p.rings - 1] =
        commit.point() - genh.mul_value_vartime(p.min) - sum;

    let mut pubs = [Point::NEUTRAL; MAX_NPUB];
    expand_pubs(ctx, p.rings, &p.rsizes[..p.rings], scale,
        &subc[..p.rings], &mut pubs[..p.npub]);

    let commit33 = commit.serialize();
    let subc_end = p.hdr_len + 33 * (p.rings - 1);
    let m32 = transcript(&commit33, &proof[..p.hdr_len],
        &proof[p.hdr_len..subc_end]);

    if borromean::verify_collect(&p.e0, &p.s, &pubs[..p.npub],
        &p.rsizes[..p.rings], &m32, out_e)
    {
        Some(())
    } else {
        None
    }
}

/// Decodes the public header of a proof without verifying it.
pub fn info(proof: &[u8]) -> Option<ProofInfo> {
    let (_, exp, mantissa, min_value, max_value) = decode_header(proof)?;
    Some(ProofInfo { exp, mantissa, min_value, max_value })
}

/// Rewinds a proof with the prover nonce, recovering the value, the
/// outer blinding factor and the embedded message.
///
/// Requires the `SIGN`, `VERIFY`, `COMMIT` and `RANGEPROOF`
/// capabilities.
pub fn rewind(ctx: &Context, commit: &Commitment, proof: &[u8],
    nonce: &[u8; 32]) -> Option<Rewind>
{
    ctx.require(SIGN | VERIFY | COMMIT | RANGEPROOF);
    let p = parse(proof)?;

    // A proof that does not verify cannot be rewound; collect the
    // challenge at every slot along the way.
    let mut evals = [Scalar::ZERO; MAX_NPUB];
    verify_inner(ctx, commit, proof, &p, Some(&mut evals[..p.npub]))?;

    let scale = if p.mantissa == 0 { 1 } else { POW10[p.exp as usize] };
    let commit33 = commit.serialize();

    // Regenerate the prover stream (without a message, to get the raw
    // blocks).
    let mut sec = [Scalar::ZERO; MAX_RINGS];
    let mut sgen = [Scalar::ZERO; MAX_NPUB];
    let mut raw = [[0u8; 32]; MAX_NPUB];
    if !genrand(nonce, &commit33, &proof[..p.hdr_len], p.rings,
        &p.rsizes[..p.rings], None, &mut sec[..p.rings],
        &mut sgen[..p.npub], &mut raw[..p.npub])
    {
        return None;
    }

    // Rebuild the ring keys exactly as the verifier saw them.
    let genh = ctx.genh_ref();
    let gen = ctx.gen_ref();
    let mut subc = [Point::NEUTRAL; MAX_RINGS];
    let mut sum = Point::NEUTRAL;
    for i in 0..(p.rings - 1) {
        subc[i] = p.subc[i];
        sum += subc[i];
    }
    subc[p.rings - 1] = commit.point() - genh.mul_value_vartime(p.min) - sum;
    let mut pubs = [Point::NEUTRAL; MAX_NPUB];
    expand_pubs(ctx, p.rings, &p.rsizes[..p.rings], scale,
        &subc[..p.rings], &mut pubs[..p.npub]);

    // For every ring but the last, the stream reveals the ring blind;
    // the digit is whichever candidate key matches it.
    let mut secidx = [0usize; MAX_RINGS];
    let mut off = 0;
    for i in 0..(p.rings - 1) {
        let gs = gen.mulgen_blinded(&sec[i]);
        let mut found = None;
        for j in 0..p.rsizes[i] {
            if pubs[off + j].equals(gs) != 0 {
                found = Some(j);
                break;
            }
        }
        secidx[i] = found?;
        off += p.rsizes[i];
    }

    // The last ring's blind is not in the stream (it balances the
    // outer blind); solve each candidate slot from its stream nonce
    // and challenge, and keep the one that matches the ring key.
    let last = p.rings - 1;
    let last_off: usize = p.rsizes[..last].iter().sum();
    let mut found = None;
    for j in 0..p.rsizes[last] {
        let idx = last_off + j;
        let diff = sgen[idx] - p.s[idx];
        if diff.iszero() != 0 {
            continue;
        }
        let cand = diff * evals[idx].invert_vartime();
        if cand.iszero() != 0 {
            continue;
        }
        if gen.mulgen_blinded(&cand).equals(pubs[idx]) != 0 {
            found = Some((j, cand));
            break;
        }
    }
    let (dlast, sec_last) = found?;
    secidx[last] = dlast;
    sec[last] = sec_last;

    // Reassemble the value and the outer blind, and check them against
    // the commitment.
    let mut v = 0u64;
    if p.mantissa > 0 {
        for i in 0..p.rings {
            v |= (secidx[i] as u64) << (2 * i);
        }
    }
    let value = p.min.checked_add(v.checked_mul(scale)?)?;
    let mut blind = Scalar::ZERO;
    for i in 0..p.rings {
        blind += sec[i];
    }
    let check = gen.mulgen_blinded(&blind) + genh.mul_value(value);
    if check.equals(commit.point()) == 0 {
        blind.wipe();
        return None;
    }

    // Extract the message: outside signer slots the stream block XOR
    // the published response; at a signer slot, XOR the recomputed
    // nonce instead.
    let capacity = 32 * (p.npub - p.rsizes[last]);
    let mut message = Vec::new();
    message.resize(capacity, 0u8);
    let mut off = 0;
    for i in 0..(p.rings - 1) {
        for j in 0..p.rsizes[i] {
            let idx = off + j;
            let eb = if j == secidx[i] {
                let mut es = evals[idx] * sec[i];
                let ki = p.s[idx] + es;
                es.wipe();
                ki.encode()
            } else {
                p.s[idx].encode()
            };
            for b in 0..32 {
                message[32 * idx + b] = raw[idx][b] ^ eb[b];
            }
        }
        off += p.rsizes[i];
    }

    let out = Rewind {
        value,
        blind: blind.encode(),
        min_value: p.min,
        max_value: p.max,
        message,
    };
    blind.wipe();
    for x in sec.iter_mut() {
        x.wipe();
    }
    for x in raw.iter_mut() {
        wipe_bytes(x);
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::{info, rewind, sign, verify, MAX_PROOF_LEN};
    use crate::context::{Context, ALL};
    use crate::pedersen::commit;
    use sha2::{Digest, Sha256};

    fn rand32(sh: &mut Sha256, i: u64) -> [u8; 32] {
        sh.update(i.to_le_bytes());
        let mut v: [u8; 32] = sh.finalize_reset().into();
        v[0] = 0;
        v
    }

    #[test]
    fn basic_range() {
        // exp = 0, min_bits = 32, value = 100, min = 0.
        let ctx = Context::new(ALL);
        let mut sh = Sha256::new();
        let blind = rand32(&mut sh, 1);
        let nonce = rand32(&mut sh, 2);
        let c = commit(&ctx, &blind, 100).unwrap();

        let proof = sign(&ctx, 0, &c, &blind, &nonce, 0, 32, 100, b"")
            .unwrap();
        assert!(proof.len() <= MAX_PROOF_LEN);

        let pi = info(&proof).unwrap();
        assert!(pi.exp == 0);
        assert!(pi.mantissa >= 32);
        assert!(pi.min_value == 0);
        assert!(pi.max_value >= (1u64 << 32) - 1);

        let (min, max) = verify(&ctx, &c, &proof).unwrap();
        assert!(min == 0 && max == pi.max_value);

        // The proof is bound to its commitment.
        let c2 = commit(&ctx, &blind, 101).unwrap();
        assert!(verify(&ctx, &c2, &proof).is_none());

        // Any corrupted byte kills it (possibly at the parser).
        for pos in [0usize, 3, 40, proof.len() / 2, proof.len() - 1] {
            let mut bad = proof.clone();
            bad[pos] ^= 0x04;
            assert!(verify(&ctx, &c, &bad).is_none());
        }
        assert!(verify(&ctx, &c, &proof[..proof.len() - 1]).is_none());
    }

    #[test]
    fn rewind_recovers_everything() {
        let ctx = Context::new(ALL);
        let mut sh = Sha256::new();
        let blind = rand32(&mut sh, 10);
        let nonce = rand32(&mut sh, 11);
        let value = 86000u64;
        let c = commit(&ctx, &blind, value).unwrap();

        let msg = b"attached note: the quick brown fox jumps over it";
        let proof = sign(&ctx, 0, &c, &blind, &nonce, 0, 32, value, msg)
            .unwrap();
        assert!(verify(&ctx, &c, &proof).is_some());

        let rw = rewind(&ctx, &c, &proof, &nonce).unwrap();
        assert!(rw.value == value);
        assert!(rw.blind == blind);
        assert!(rw.min_value == 0);
        assert!(&rw.message[..msg.len()] == &msg[..]);
        assert!(rw.message[msg.len()..].iter().all(|&b| b == 0));

        // A wrong nonce reveals nothing.
        let wrong = rand32(&mut sh, 12);
        assert!(rewind(&ctx, &c, &proof, &wrong).is_none());
    }

    #[test]
    fn exponent_folds_decimal_digits() {
        let ctx = Context::new(ALL);
        let mut sh = Sha256::new();
        let blind = rand32(&mut sh, 20);
        let nonce = rand32(&mut sh, 21);
        let value = 12345u64;
        let c = commit(&ctx, &blind, value).unwrap();

        let proof = sign(&ctx, 0, &c, &blind, &nonce, 2, 8, value, b"")
            .unwrap();
        let pi = info(&proof).unwrap();
        // The two low decimal digits become part of the public
        // minimum.
        assert!(pi.exp == 2);
        assert!(pi.min_value == 45);
        let (min, max) = verify(&ctx, &c, &proof).unwrap();
        assert!(min == 45);
        assert!(max >= value);

        let rw = rewind(&ctx, &c, &proof, &nonce).unwrap();
        assert!(rw.value == value);
        assert!(rw.blind == blind);
    }

    #[test]
    fn nonzero_minimum() {
        let ctx = Context::new(ALL);
        let mut sh = Sha256::new();
        let blind = rand32(&mut sh, 30);
        let nonce = rand32(&mut sh, 31);
        let value = 5000u64;
        let c = commit(&ctx, &blind, value).unwrap();

        let proof = sign(&ctx, 4000, &c, &blind, &nonce, 0, 8, value, b"")
            .unwrap();
        let (min, max) = verify(&ctx, &c, &proof).unwrap();
        assert!(min == 4000);
        assert!(max >= value);
        let rw = rewind(&ctx, &c, &proof, &nonce).unwrap();
        assert!(rw.value == value);

        // Values below the claimed minimum are refused at signing.
        assert!(sign(&ctx, 6000, &c, &blind, &nonce, 0, 8, value, b"")
            .is_none());
    }

    #[test]
    fn exact_value_proof() {
        let ctx = Context::new(ALL);
        let mut sh = Sha256::new();
        let blind = rand32(&mut sh, 40);
        let nonce = rand32(&mut sh, 41);
        let value = 777777u64;
        let c = commit(&ctx, &blind, value).unwrap();

        let proof = sign(&ctx, value, &c, &blind, &nonce, -1, 0, value, b"")
            .unwrap();
        let pi = info(&proof).unwrap();
        assert!(pi.exp == -1);
        assert!(pi.mantissa == 0);
        assert!(pi.min_value == value && pi.max_value == value);

        let (min, max) = verify(&ctx, &c, &proof).unwrap();
        assert!(min == value && max == value);

        let rw = rewind(&ctx, &c, &proof, &nonce).unwrap();
        assert!(rw.value == value);
        assert!(rw.blind == blind);
        assert!(rw.message.is_empty());

        // An exact proof for a different value does not fit this
        // commitment.
        let c2 = commit(&ctx, &blind, value + 1).unwrap();
        assert!(verify(&ctx, &c2, &proof).is_none());
    }

    #[test]
    fn full_width_mantissa() {
        let ctx = Context::new(ALL);
        let mut sh = Sha256::new();
        let blind = rand32(&mut sh, 50);
        let nonce = rand32(&mut sh, 51);
        let value = u64::MAX - 3;
        let c = commit(&ctx, &blind, value).unwrap();

        let proof = sign(&ctx, 0, &c, &blind, &nonce, 0, 64, value, b"")
            .unwrap();
        assert!(proof.len() <= MAX_PROOF_LEN);
        let (min, max) = verify(&ctx, &c, &proof).unwrap();
        assert!(min == 0 && max == u64::MAX);
        let rw = rewind(&ctx, &c, &proof, &nonce).unwrap();
        assert!(rw.value == value);
    }

    #[test]
    fn odd_mantissa_ring() {
        // min_bits = 5 gives a trailing two-member ring.
        let ctx = Context::new(ALL);
        let mut sh = Sha256::new();
        let blind = rand32(&mut sh, 60);
        let nonce = rand32(&mut sh, 61);
        for value in [0u64, 1, 17, 31] {
            let c = commit(&ctx, &blind, value).unwrap();
            let proof =
                sign(&ctx, 0, &c, &blind, &nonce, 0, 5, value, b"").unwrap();
            let (min, max) = verify(&ctx, &c, &proof).unwrap();
            assert!(min == 0 && max == 31);
            let rw = rewind(&ctx, &c, &proof, &nonce).unwrap();
            assert!(rw.value == value);
            assert!(rw.blind == blind);
        }
    }
}
