//! Pedersen commitments over the two-generator basis (G, H).
//!
//! A commitment to a 64-bit value v under a 32-byte blinding factor b
//! is the point C = b*G + v*H. Since nobody knows the discrete
//! logarithm of H with respect to G, C binds both components, and a
//! uniformly random b hides v. Commitments are additively
//! homomorphic, which is what the tally check exploits: a transaction
//! balances exactly when the sum of its output commitments minus the
//! sum of its input commitments equals the announced excess times H,
//! i.e. when the blinding factors were chosen to cancel out.
//!
//! On the wire a commitment is 33 bytes: a header of 0x08 | parity(y)
//! followed by the x coordinate, so commitments cannot be mistaken
//! for SEC 1 public keys (0x02/0x03).

use crate::backend::wipe_bytes;
use crate::context::{Context, COMMIT, SIGN};
use crate::curve::Point;
use crate::scalar::Scalar;

/// A Pedersen commitment (a non-neutral curve point).
#[derive(Clone, Copy, Debug)]
pub struct Commitment {
    pub(crate) point: Point,
}

impl Commitment {

    /// Serializes this commitment (33 bytes, header 0x08 or 0x09).
    pub fn serialize(self) -> [u8; 33] {
        let mut b = self.point.encode_compressed();
        b[0] = 0x08 | (b[0] & 0x01);
        b
    }

    /// Parses a 33-byte commitment; the point is validated against the
    /// curve equation.
    pub fn parse(buf: &[u8; 33]) -> Option<Self> {
        if (buf[0] & 0xFE) != 0x08 {
            return None;
        }
        let mut pb = *buf;
        pb[0] = 0x02 | (buf[0] & 0x01);
        let point = Point::decode(&pb)?;
        Some(Self { point })
    }

    pub(crate) fn from_point(point: Point) -> Self {
        Self { point }
    }

    pub(crate) fn point(self) -> Point {
        self.point
    }
}

/// Commits to `value` under the given blinding factor:
/// C = blind*G + value*H.
///
/// Fails if the blinding factor is out of range, or if both the blind
/// and the value are zero (the commitment would be the neutral, which
/// has no encoding).
///
/// Requires the `SIGN` and `COMMIT` capabilities (the blinding half
/// runs through the blinded generator comb).
pub fn commit(ctx: &Context, blind: &[u8; 32], value: u64)
    -> Option<Commitment>
{
    ctx.require(SIGN | COMMIT);

    let mut bb = *blind;
    let (mut b, ok) = Scalar::decode32(&bb);
    wipe_bytes(&mut bb);
    if ok == 0 {
        b.wipe();
        return None;
    }
    let r = ctx.gen_ref().mulgen_blinded(&b) + ctx.genh_ref().mul_value(value);
    b.wipe();
    if r.isneutral() != 0 {
        return None;
    }
    Some(Commitment { point: r })
}

/// Sums blinding factors with signs: the first `npositive` entries
/// count positively, the rest negatively. Fails on any out-of-range
/// input.
pub fn blind_sum(blinds: &[[u8; 32]], npositive: usize)
    -> Option<[u8; 32]>
{
    debug_assert!(npositive <= blinds.len());
    let mut acc = Scalar::ZERO;
    for (i, bb) in blinds.iter().enumerate() {
        let (mut x, ok) = Scalar::decode32(bb);
        if ok == 0 {
            x.wipe();
            acc.wipe();
            return None;
        }
        if i < npositive {
            acc += x;
        } else {
            acc -= x;
        }
        x.wipe();
    }
    let out = acc.encode();
    acc.wipe();
    Some(out)
}

/// Verifies that commitments balance:
/// sum(positives) - sum(negatives) - excess*H = neutral.
///
/// `excess` is the announced plaintext amount (signed). Requires the
/// `COMMIT` capability. NOT CONSTANT-TIME; commitments and the excess
/// are public.
pub fn verify_tally(ctx: &Context, positives: &[Commitment],
    negatives: &[Commitment], excess: i64) -> bool
{
    ctx.require(COMMIT);

    let mut acc = Point::NEUTRAL;
    if excess != 0 {
        acc = ctx.genh_ref().mul_value_vartime(excess.unsigned_abs());
        if excess < 0 {
            acc.set_neg();
        }
    }
    for c in negatives {
        acc += c.point;
    }
    acc.set_neg();
    for c in positives {
        acc += c.point;
    }
    acc.isneutral() != 0
}
