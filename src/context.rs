//! Library context: capability flags and the precomputed state that
//! signing and commitment operations rely on.
//!
//! A `Context` is built once with the OR of the capability flags the
//! caller intends to use, and is then freely shared for concurrent
//! read-only use (all operations take `&Context`). The two mutating
//! operations, `randomize()` and dropping, require exclusive access by
//! construction (`&mut self` / ownership); the library performs no
//! internal locking.
//!
//! Calling an operation whose capability was not requested at build
//! time is a programming error and panics, mirroring the debug-check
//! convention of C libraries in this space: such a call can never be
//! made to work by retrying, so it must not fail silently.
//!
//! Signing uses a blinded evaluation of the fixed-base comb: the
//! context stores a secret blinding scalar b and the point -b*G, and
//! computes s*G as (s + b)*G - b*G, so the values flowing through the
//! comb accumulator are decorrelated from the raw secret scalar.
//! `randomize()` re-derives b from 32 caller-provided seed bytes
//! through the HMAC-SHA256 generator, which callers should do after
//! forking or restoring state to make power-analysis traces diverge.

use rand_core::{CryptoRng, RngCore};

use crate::curve::{Point, PointAffine};
use crate::field::GFp;
use crate::nonce::HmacDrbg;
use crate::scalar::Scalar;

/// Capability flag: ECDSA and Borromean signing, key generation.
pub const SIGN: u32 = 0x0001;
/// Capability flag: signature verification.
pub const VERIFY: u32 = 0x0002;
/// Capability flag: Pedersen commitments and tallies.
pub const COMMIT: u32 = 0x0004;
/// Capability flag: range-proof construction and verification.
pub const RANGEPROOF: u32 = 0x0008;
/// All capabilities.
pub const ALL: u32 = SIGN | VERIFY | COMMIT | RANGEPROOF;

/// Blinded fixed-base multiplication state.
#[derive(Clone, Debug)]
pub(crate) struct GenBlind {
    blind: Scalar,
    initial: Point,
}

impl GenBlind {

    fn build() -> Self {
        // Deterministic initial blinding; callers that care about
        // power analysis feed real entropy through randomize().
        let blind = Scalar::ONE;
        let initial = -Point::mulgen(&blind);
        Self { blind, initial }
    }

    /// Re-derives the blinding state from the previous blind and a
    /// 32-byte seed.
    pub(crate) fn rekey(&mut self, seed32: &[u8; 32]) {
        let mut ob = self.blind.encode();
        let mut rng = HmacDrbg::new(&[&ob[..], &seed32[..]]);
        crate::backend::wipe_bytes(&mut ob);
        let b = loop {
            let tb = rng.generate32();
            let (v, ok) = Scalar::decode32(&tb);
            if (ok & !v.iszero()) != 0 {
                break v;
            }
        };
        self.blind.wipe();
        self.blind = b;
        self.initial = -Point::mulgen(&self.blind);
    }

    /// Computes s*G without the comb accumulator ever holding a value
    /// correlated to s alone.
    pub(crate) fn mulgen_blinded(&self, s: &Scalar) -> Point {
        let mut t = s + self.blind;
        let r = Point::mulgen(&t) + self.initial;
        t.wipe();
        r
    }
}

impl Drop for GenBlind {
    fn drop(&mut self) {
        self.blind.wipe();
    }
}

/// Precomputed windows for the value generator H.
#[derive(Clone, Debug)]
pub(crate) struct GenH {
    // table[w][i] = (i+1) * 32^w * H, for the 13 signed 5-bit digits
    // of a 64-bit value.
    table: [[PointAffine; 16]; 13],
    h: Point,
}

impl GenH {

    /// The value generator H: the x coordinate is the hash-derived
    /// nothing-up-my-sleeve constant; nobody knows its discrete
    /// logarithm with respect to G.
    pub(crate) const H: Point = Point {
        X: GFp::w64be(
            0x50929B74C1A04954, 0xB78B4B6035E97A5E,
            0x078A5A0F28EC96D5, 0x47BFEE9ACE803AC0),
        Y: GFp::w64be(
            0x31D3C6863973926E, 0x049E637CB1B5F40A,
            0x36DAC28AF1766968, 0xC30C2313F3A38904),
        Z: GFp::ONE,
    };

    fn build() -> Self {
        let zero = PointAffine { x: GFp::ZERO, y: GFp::ZERO };
        let mut table = [[zero; 16]; 13];
        let mut base = Self::H;
        for w in 0..13 {
            // 1..16 multiples of the current window base; all
            // non-neutral since H generates the whole (prime-order)
            // group and 16 * 32^12 is far below the order.
            let mut pts = [Point::NEUTRAL; 16];
            pts[0] = base;
            for i in 1..16 {
                pts[i] = pts[i - 1] + base;
            }
            Point::to_affine_batch(&pts, &mut table[w]);
            base = pts[15].double();
        }
        Self { table, h: Self::H }
    }

    /// Computes v*H in constant time (13 branchless window scans, no
    /// doubling chain).
    pub(crate) fn mul_value(&self, v: u64) -> Point {
        let sd = Point::recode_u64(v);
        let mut r = Point::lookup_affine_proj(&self.table[0], sd[0]);
        for j in 1..13 {
            r.set_lookup_affine_add(&self.table[j], sd[j]);
        }
        r
    }

    /// Computes v*H; NOT CONSTANT-TIME, for public tallies.
    pub(crate) fn mul_value_vartime(&self, v: u64) -> Point {
        self.h.mul_small(v)
    }
}

/// Library context; see the module documentation.
#[derive(Clone, Debug)]
pub struct Context {
    flags: u32,
    pub(crate) gen: Option<GenBlind>,
    pub(crate) genh: Option<GenH>,
}

impl Context {

    /// Builds a context for the requested capabilities (an OR of
    /// `SIGN`, `VERIFY`, `COMMIT` and `RANGEPROOF`).
    ///
    /// The signing sub-context starts from a fixed blinding value;
    /// call `randomize()` (or use `new_with_rng()`) to decorrelate it.
    pub fn new(flags: u32) -> Self {
        let gen = if (flags & (SIGN | RANGEPROOF)) != 0 {
            Some(GenBlind::build())
        } else {
            None
        };
        let genh = if (flags & (COMMIT | RANGEPROOF)) != 0 {
            Some(GenH::build())
        } else {
            None
        };
        Self { flags, gen, genh }
    }

    /// Builds a context and immediately randomizes the signing
    /// blinding from the provided RNG.
    pub fn new_with_rng<T: CryptoRng + RngCore>(flags: u32, rng: &mut T)
        -> Self
    {
        let mut ctx = Self::new(flags);
        if let Some(g) = ctx.gen.as_mut() {
            let mut seed = [0u8; 32];
            rng.fill_bytes(&mut seed);
            g.rekey(&seed);
            crate::backend::wipe_bytes(&mut seed);
        }
        ctx
    }

    /// Re-derives the signing blinding state from a 32-byte seed.
    ///
    /// Requires the `SIGN` capability. Needs exclusive access; all
    /// read-only operations may proceed concurrently between mutations.
    pub fn randomize(&mut self, seed32: &[u8; 32]) {
        self.require(SIGN);
        if let Some(g) = self.gen.as_mut() {
            g.rekey(seed32);
        }
    }

    /// Tells whether all capabilities in `flags` were built.
    #[inline]
    pub fn has(&self, flags: u32) -> bool {
        (self.flags & flags) == flags
    }

    // Capability violations are programming errors: abort rather than
    // report a runtime failure the caller could be tempted to handle.
    #[inline]
    pub(crate) fn require(&self, flags: u32) {
        assert!((self.flags & flags) == flags,
            "context was not built with the required capability");
    }

    #[inline]
    pub(crate) fn gen_ref(&self) -> &GenBlind {
        self.gen.as_ref().expect("signing sub-context not built")
    }

    #[inline]
    pub(crate) fn genh_ref(&self) -> &GenH {
        self.genh.as_ref().expect("commitment sub-context not built")
    }
}
