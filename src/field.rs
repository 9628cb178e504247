//! Arithmetic in the secp256k1 base field.
//!
//! `GFp` implements the field of integers modulo
//! p = 2^256 - 2^32 - 977, with four 64-bit limbs in little-endian
//! order. Values are kept reduced below 2^256 at all times; the extra
//! interval [p, 2^256) is tolerated internally and collapsed whenever a
//! value is encoded, compared or tested for zero. All operations are
//! strictly constant-time unless their name says otherwise.
//!
//! Byte encoding is unsigned big-endian over exactly 32 bytes, as used
//! by the SEC 1 point formats; decoding reports non-canonical inputs
//! through a `u32` mask (0xFFFFFFFF = canonical) rather than a `bool`,
//! so that the flag can feed branchless selection.

use core::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use crate::backend::{addcarry_u64, subborrow_u64, umull, umull_add, umull_add2};

/// An element of the secp256k1 base field.
#[derive(Clone, Copy, Debug)]
pub struct GFp([u64; 4]);

impl GFp {

    // p = 2^256 - 2^32 - 977; the fold constant is 2^256 mod p.
    const FOLD: u64 = 0x1000003D1;
    const MOD0: u64 = 0xFFFFFFFEFFFFFC2F;

    /// Field modulus p, as four 64-bit limbs in little-endian order.
    pub const MODULUS: [u64; 4] = [
        Self::MOD0,
        0xFFFFFFFFFFFFFFFF,
        0xFFFFFFFFFFFFFFFF,
        0xFFFFFFFFFFFFFFFF,
    ];

    pub const ZERO: GFp = GFp([0, 0, 0, 0]);
    pub const ONE: GFp = GFp([1, 0, 0, 0]);

    /// Builds a constant element from four 64-bit limbs in high-to-low
    /// order. The value is implicitly reduced modulo p.
    pub const fn w64be(x3: u64, x2: u64, x1: u64, x0: u64) -> Self {
        Self([x0, x1, x2, x3])
    }

    /// Builds a constant element from four 64-bit limbs in low-to-high
    /// order. The value is implicitly reduced modulo p.
    pub const fn w64le(x0: u64, x1: u64, x2: u64, x3: u64) -> Self {
        Self([x0, x1, x2, x3])
    }

    /// Converts a 64-bit unsigned integer.
    #[inline(always)]
    pub fn from_u64(x: u64) -> Self {
        Self([x, 0, 0, 0])
    }

    #[inline]
    fn set_add(&mut self, rhs: &Self) {
        let (d0, cc) = addcarry_u64(self.0[0], rhs.0[0], 0);
        let (d1, cc) = addcarry_u64(self.0[1], rhs.0[1], cc);
        let (d2, cc) = addcarry_u64(self.0[2], rhs.0[2], cc);
        let (d3, cc) = addcarry_u64(self.0[3], rhs.0[3], cc);

        // Fold the output carry (2^256 = FOLD mod p). A second carry can
        // appear, but then the remaining limbs are all-zero and a single
        // extra fold on the low limb settles it.
        let (d0, cc) = addcarry_u64(d0,
            (cc as u64).wrapping_neg() & Self::FOLD, 0);
        let (d1, cc) = addcarry_u64(d1, 0, cc);
        let (d2, cc) = addcarry_u64(d2, 0, cc);
        let (d3, cc) = addcarry_u64(d3, 0, cc);
        let w = (cc as u64).wrapping_neg();
        let d0 = d0.wrapping_add(w & Self::FOLD);

        self.0 = [d0, d1, d2, d3];
    }

    #[inline]
    fn set_sub(&mut self, rhs: &Self) {
        let (d0, cc) = subborrow_u64(self.0[0], rhs.0[0], 0);
        let (d1, cc) = subborrow_u64(self.0[1], rhs.0[1], cc);
        let (d2, cc) = subborrow_u64(self.0[2], rhs.0[2], cc);
        let (d3, cc) = subborrow_u64(self.0[3], rhs.0[3], cc);

        // On borrow, add p back, i.e. subtract FOLD from the wrapped
        // value. A second borrow can only ripple through the low limb.
        let (d0, cc) = subborrow_u64(d0,
            (cc as u64).wrapping_neg() & Self::FOLD, 0);
        let (d1, cc) = subborrow_u64(d1, 0, cc);
        let (d2, cc) = subborrow_u64(d2, 0, cc);
        let (d3, cc) = subborrow_u64(d3, 0, cc);
        let w = (cc as u64).wrapping_neg();
        let d0 = d0.wrapping_sub(w & Self::FOLD);

        self.0 = [d0, d1, d2, d3];
    }

    /// Negates this value (in place).
    #[inline]
    pub fn set_neg(&mut self) {
        let (d0, cc) = subborrow_u64(Self::MOD0, self.0[0], 0);
        let (d1, cc) = subborrow_u64(0xFFFFFFFFFFFFFFFF, self.0[1], cc);
        let (d2, cc) = subborrow_u64(0xFFFFFFFFFFFFFFFF, self.0[2], cc);
        let (d3, cc) = subborrow_u64(0xFFFFFFFFFFFFFFFF, self.0[3], cc);

        // Source values may exceed p, in which case p - self borrowed
        // and we add p back.
        let e = (cc as u64).wrapping_neg();
        let (d0, cc) = subborrow_u64(d0, e & Self::FOLD, 0);
        let (d1, cc) = subborrow_u64(d1, 0, cc);
        let (d2, cc) = subborrow_u64(d2, 0, cc);
        let (d3, _)  = subborrow_u64(d3, 0, cc);

        self.0 = [d0, d1, d2, d3];
    }

    /// Copies `a` into this element if `ctl` is 0xFFFFFFFF; keeps the
    /// current value if `ctl` is 0x00000000. `ctl` MUST be one of those
    /// two values.
    #[inline]
    pub fn set_cond(&mut self, a: &Self, ctl: u32) {
        let cw = ((ctl as i32) as i64) as u64;
        self.0[0] ^= cw & (self.0[0] ^ a.0[0]);
        self.0[1] ^= cw & (self.0[1] ^ a.0[1]);
        self.0[2] ^= cw & (self.0[2] ^ a.0[2]);
        self.0[3] ^= cw & (self.0[3] ^ a.0[3]);
    }

    /// Returns `a0` if `ctl` is 0x00000000, `a1` if it is 0xFFFFFFFF.
    #[inline(always)]
    pub fn select(a0: &Self, a1: &Self, ctl: u32) -> Self {
        let mut r = *a0;
        r.set_cond(a1, ctl);
        r
    }

    /// Halves this value (in place).
    #[inline]
    pub fn set_half(&mut self) {
        let d0 = (self.0[0] >> 1) | (self.0[1] << 63);
        let d1 = (self.0[1] >> 1) | (self.0[2] << 63);
        let d2 = (self.0[2] >> 1) | (self.0[3] << 63);
        let d3 = self.0[3] >> 1;
        let tt = (self.0[0] & 1).wrapping_neg();

        // When the dropped bit was set, add back (p+1)/2; the sum stays
        // below 2^256 since the value was just halved.
        let (d0, cc) = addcarry_u64(d0, tt & ((Self::MOD0 >> 1) + 1), 0);
        let (d1, cc) = addcarry_u64(d1, tt, cc);
        let (d2, cc) = addcarry_u64(d2, tt, cc);
        let (d3, _)  = addcarry_u64(d3, tt >> 1, cc);

        self.0 = [d0, d1, d2, d3];
    }

    #[inline(always)]
    pub fn half(self) -> Self {
        let mut r = self;
        r.set_half();
        r
    }

    /// Doubles this value (in place).
    #[inline]
    pub fn set_mul2(&mut self) {
        let tt = ((self.0[3] as i64) >> 63) as u64;

        let d0 = self.0[0] << 1;
        let d1 = (self.0[0] >> 63) | (self.0[1] << 1);
        let d2 = (self.0[1] >> 63) | (self.0[2] << 1);
        let d3 = (self.0[2] >> 63) | (self.0[3] << 1);

        let (d0, cc) = addcarry_u64(d0, tt & Self::FOLD, 0);
        let (d1, cc) = addcarry_u64(d1, 0, cc);
        let (d2, cc) = addcarry_u64(d2, 0, cc);
        let (d3, cc) = addcarry_u64(d3, 0, cc);
        let w = (cc as u64).wrapping_neg();
        let (d0, _) = addcarry_u64(d0, w & Self::FOLD, 0);

        self.0 = [d0, d1, d2, d3];
    }

    #[inline(always)]
    pub fn mul2(self) -> Self {
        let mut r = self;
        r.set_mul2();
        r
    }

    /// Multiplies this value by 8 (in place).
    #[inline]
    pub fn set_mul8(&mut self) {
        let tt = self.0[3] >> 61;

        let d0 = self.0[0] << 3;
        let d1 = (self.0[0] >> 61) | (self.0[1] << 3);
        let d2 = (self.0[1] >> 61) | (self.0[2] << 3);
        let d3 = (self.0[2] >> 61) | (self.0[3] << 3);

        let (d0, cc) = addcarry_u64(d0, tt * Self::FOLD, 0);
        let (d1, cc) = addcarry_u64(d1, 0, cc);
        let (d2, cc) = addcarry_u64(d2, 0, cc);
        let (d3, cc) = addcarry_u64(d3, 0, cc);
        let w = (cc as u64).wrapping_neg();
        let (d0, _) = addcarry_u64(d0, w & Self::FOLD, 0);

        self.0 = [d0, d1, d2, d3];
    }

    #[inline(always)]
    pub fn mul8(self) -> Self {
        let mut r = self;
        r.set_mul8();
        r
    }

    /// Multiplies this value by a small integer (in place).
    #[inline]
    pub fn set_mul_small(&mut self, x: u32) {
        let xw = x as u64;
        let (d0, t) = umull(self.0[0], xw);
        let (d1, t) = umull_add(self.0[1], xw, t);
        let (d2, t) = umull_add(self.0[2], xw, t);
        let (d3, t) = umull_add(self.0[3], xw, t);

        // t < 2^32, so folding t*2^256 adds at most 65 bits at the
        // bottom; a final low-limb fold absorbs the last carry.
        let (lo, hi) = umull(t, Self::FOLD);
        let (d0, cc) = addcarry_u64(d0, lo, 0);
        let (d1, cc) = addcarry_u64(d1, hi, cc);
        let (d2, cc) = addcarry_u64(d2, 0, cc);
        let (d3, cc) = addcarry_u64(d3, 0, cc);
        let w = (cc as u64).wrapping_neg();
        let (d0, _) = addcarry_u64(d0, w & Self::FOLD, 0);

        self.0 = [d0, d1, d2, d3];
    }

    #[inline(always)]
    pub fn mul_small(self, x: u32) -> Self {
        let mut r = self;
        r.set_mul_small(x);
        r
    }

    // Multiples used by the complete curve formulas (3 and 3*b = 21).

    #[inline(always)]
    pub fn mul3(self) -> Self {
        self.mul_small(3)
    }

    #[inline(always)]
    pub fn mul21(self) -> Self {
        self.mul_small(21)
    }

    #[inline]
    fn set_mul(&mut self, rhs: &Self) {
        let aa = self.0;
        let bb = rhs.0;

        // 512-bit schoolbook product into e[0..8].
        let mut e = [0u64; 8];
        for i in 0..4 {
            let mut hi = 0u64;
            for j in 0..4 {
                let (lo, h) = umull_add2(aa[i], bb[j], e[i + j], hi);
                e[i + j] = lo;
                hi = h;
            }
            e[i + 4] = hi;
        }

        self.0 = Self::fold512(&e);
    }

    // Reduces a 512-bit value (eight little-endian limbs) below 2^256.
    #[inline]
    fn fold512(e: &[u64; 8]) -> [u64; 4] {
        // First pass: low words of the per-limb FOLD products go
        // straight into the accumulator; high words are gathered in
        // h0..h3 for the second pass.
        let (lo, h0) = umull(e[4], Self::FOLD);
        let (e0, cc) = addcarry_u64(e[0], lo, 0);
        let (lo, h1) = umull(e[5], Self::FOLD);
        let (e1, cc) = addcarry_u64(e[1], lo, cc);
        let (lo, h2) = umull(e[6], Self::FOLD);
        let (e2, cc) = addcarry_u64(e[2], lo, cc);
        let (lo, h3) = umull(e[7], Self::FOLD);
        let (e3, cc) = addcarry_u64(e[3], lo, cc);
        let (h3, _)  = addcarry_u64(h3, 0, cc);

        // h3 <= 2^32 + 977; its own fold may spill one extra bit into
        // the second limb (h0 + hi cannot overflow: both below 2^33).
        let (lo, hi) = umull(h3, Self::FOLD);
        let (e0, cc) = addcarry_u64(e0, lo, 0);
        let (e1, cc) = addcarry_u64(e1, h0 + hi, cc);
        let (e2, cc) = addcarry_u64(e2, h1, cc);
        let (e3, cc) = addcarry_u64(e3, h2, cc);

        // Final carry: h2 was small, so a single low-limb fold ends it.
        let w = (cc as u64).wrapping_neg();
        let (e0, cc) = addcarry_u64(e0, w & Self::FOLD, 0);
        let (e1, cc) = addcarry_u64(e1, 0, cc);
        let (e2, cc) = addcarry_u64(e2, 0, cc);
        let (e3, _)  = addcarry_u64(e3, 0, cc);

        [e0, e1, e2, e3]
    }

    /// Squares this value (in place).
    #[inline]
    pub fn set_square(&mut self) {
        let (a0, a1, a2, a3) = (self.0[0], self.0[1], self.0[2], self.0[3]);

        // Off-diagonal products; the total stays below 2^448, so limbs
        // e1..e6 suffice before doubling.
        let (e1, e2) = umull(a0, a1);
        let (e3, e4) = umull(a0, a3);
        let (e5, e6) = umull(a2, a3);
        let (lo, hi) = umull(a0, a2);
        let (e2, cc) = addcarry_u64(e2, lo, 0);
        let (e3, cc) = addcarry_u64(e3, hi, cc);
        let (lo, hi) = umull(a1, a3);
        let (e4, cc) = addcarry_u64(e4, lo, cc);
        let (e5, cc) = addcarry_u64(e5, hi, cc);
        let (e6, _)  = addcarry_u64(e6, 0, cc);
        let (lo, hi) = umull(a1, a2);
        let (e3, cc) = addcarry_u64(e3, lo, 0);
        let (e4, cc) = addcarry_u64(e4, hi, cc);
        let (e5, cc) = addcarry_u64(e5, 0, cc);
        let (e6, _)  = addcarry_u64(e6, 0, cc);

        // Double, then add the diagonal squares.
        let e7 = e6 >> 63;
        let e6 = (e6 << 1) | (e5 >> 63);
        let e5 = (e5 << 1) | (e4 >> 63);
        let e4 = (e4 << 1) | (e3 >> 63);
        let e3 = (e3 << 1) | (e2 >> 63);
        let e2 = (e2 << 1) | (e1 >> 63);
        let e1 = e1 << 1;

        let (e0, hi) = umull(a0, a0);
        let (e1, cc) = addcarry_u64(e1, hi, 0);
        let (lo, hi) = umull(a1, a1);
        let (e2, cc) = addcarry_u64(e2, lo, cc);
        let (e3, cc) = addcarry_u64(e3, hi, cc);
        let (lo, hi) = umull(a2, a2);
        let (e4, cc) = addcarry_u64(e4, lo, cc);
        let (e5, cc) = addcarry_u64(e5, hi, cc);
        let (lo, hi) = umull(a3, a3);
        let (e6, cc) = addcarry_u64(e6, lo, cc);
        let (e7, _)  = addcarry_u64(e7, hi, cc);

        self.0 = Self::fold512(&[e0, e1, e2, e3, e4, e5, e6, e7]);
    }

    #[inline(always)]
    pub fn square(self) -> Self {
        let mut r = self;
        r.set_square();
        r
    }

    /// Squares this value n times (in place).
    pub fn set_xsquare(&mut self, n: u32) {
        for _ in 0..n {
            self.set_square();
        }
    }

    #[inline(always)]
    pub fn xsquare(self, n: u32) -> Self {
        let mut r = self;
        r.set_xsquare(n);
        r
    }

    // Brings the internal representation into the canonical 0..p-1
    // range.
    #[inline]
    fn set_normalized(&mut self) {
        // Adding 2^256 - p overflows exactly when the value is >= p.
        let (_, cc) = addcarry_u64(self.0[0], Self::FOLD, 0);
        let (_, cc) = addcarry_u64(self.0[1], 0, cc);
        let (_, cc) = addcarry_u64(self.0[2], 0, cc);
        let (_, cc) = addcarry_u64(self.0[3], 0, cc);

        let w = (cc as u64).wrapping_neg();
        let (d0, cc) = addcarry_u64(self.0[0], w & Self::FOLD, 0);
        let (d1, cc) = addcarry_u64(self.0[1], 0, cc);
        let (d2, cc) = addcarry_u64(self.0[2], 0, cc);
        let (d3, _)  = addcarry_u64(self.0[3], 0, cc);

        self.0 = [d0, d1, d2, d3];
    }

    /// Equality check; returns 0xFFFFFFFF if the values are equal,
    /// 0x00000000 otherwise.
    #[inline]
    pub fn equals(self, rhs: Self) -> u32 {
        (self - rhs).iszero()
    }

    /// Zero check; returns 0xFFFFFFFF for zero, 0x00000000 otherwise.
    #[inline]
    pub fn iszero(self) -> u32 {
        let mut x = self;
        x.set_normalized();
        let t = x.0[0] | x.0[1] | x.0[2] | x.0[3];
        // (t | -t) has its top bit set iff t != 0.
        !((((t | t.wrapping_neg()) >> 63) as u32).wrapping_neg())
    }

    /// Returns 0xFFFFFFFF if the canonical value is odd, 0x00000000
    /// otherwise.
    #[inline]
    pub fn isodd(self) -> u32 {
        let mut x = self;
        x.set_normalized();
        ((x.0[0] & 1) as u32).wrapping_neg()
    }

    /// Decodes 32 big-endian bytes. The returned mask is 0xFFFFFFFF if
    /// the encoded integer was canonical (lower than p), 0x00000000
    /// otherwise; in the latter case the value is still the reduction
    /// modulo p.
    pub fn decode32(buf: &[u8; 32]) -> (Self, u32) {
        let mut d = [0u64; 4];
        for i in 0..4 {
            let j = 8 * (3 - i);
            d[i] = u64::from_be_bytes([
                buf[j], buf[j + 1], buf[j + 2], buf[j + 3],
                buf[j + 4], buf[j + 5], buf[j + 6], buf[j + 7],
            ]);
        }
        // Out-of-range detection: value + (2^256 - p) carries out
        // exactly when value >= p.
        let (_, cc) = addcarry_u64(d[0], Self::FOLD, 0);
        let (_, cc) = addcarry_u64(d[1], 0, cc);
        let (_, cc) = addcarry_u64(d[2], 0, cc);
        let (_, cc) = addcarry_u64(d[3], 0, cc);
        let mut r = Self(d);
        r.set_normalized();
        (r, (cc as u32).wrapping_sub(1))
    }

    /// Encodes this value over exactly 32 bytes, big-endian, canonical.
    pub fn encode(self) -> [u8; 32] {
        let mut x = self;
        x.set_normalized();
        let mut d = [0u8; 32];
        for i in 0..4 {
            d[8 * i..8 * i + 8].copy_from_slice(&x.0[3 - i].to_be_bytes());
        }
        d
    }

    /// Inverts this value (in place); zero maps to zero.
    ///
    /// Constant-time: Fermat's little theorem, raising to p - 2 with a
    /// fixed addition chain. Suitable for secret inputs.
    pub fn set_invert(&mut self) {
        let x = *self;
        // 2^k-1 ladder pieces; the exponent p-2 is 223 ones, a zero,
        // 22 ones, then 0000101101.
        let x2 = x.square() * x;
        let x3 = x2.square() * x;
        let x6 = x3.xsquare(3) * x3;
        let x9 = x6.xsquare(3) * x3;
        let x11 = x9.xsquare(2) * x2;
        let x22 = x11.xsquare(11) * x11;
        let x44 = x22.xsquare(22) * x22;
        let x88 = x44.xsquare(44) * x44;
        let x176 = x88.xsquare(88) * x88;
        let x220 = x176.xsquare(44) * x44;
        let x223 = x220.xsquare(3) * x3;

        let mut t = x223.xsquare(23) * x22;
        t.set_xsquare(5);
        t *= x;
        t.set_xsquare(3);
        t *= x2;
        t.set_xsquare(2);
        t *= x;
        *self = t;
    }

    #[inline(always)]
    pub fn invert(self) -> Self {
        let mut r = self;
        r.set_invert();
        r
    }

    /// Inverts this value; zero maps to zero.
    ///
    /// NOT CONSTANT-TIME (binary extended GCD); only for public inputs
    /// such as verification-side coordinates.
    pub fn invert_vartime(self) -> Self {
        fn is_zero(a: &[u64; 4]) -> bool {
            (a[0] | a[1] | a[2] | a[3]) == 0
        }
        fn shr1(a: &mut [u64; 4]) {
            a[0] = (a[0] >> 1) | (a[1] << 63);
            a[1] = (a[1] >> 1) | (a[2] << 63);
            a[2] = (a[2] >> 1) | (a[3] << 63);
            a[3] >>= 1;
        }
        fn ge(a: &[u64; 4], b: &[u64; 4]) -> bool {
            for i in (0..4).rev() {
                if a[i] != b[i] {
                    return a[i] > b[i];
                }
            }
            true
        }
        fn sub(a: &mut [u64; 4], b: &[u64; 4]) {
            let mut cc = 0;
            for i in 0..4 {
                let (d, c) = subborrow_u64(a[i], b[i], cc);
                a[i] = d;
                cc = c;
            }
        }

        let mut na = self;
        na.set_normalized();
        let mut a = na.0;
        let mut b = Self::MODULUS;
        let mut u = Self::ONE;
        let mut v = Self::ZERO;

        // Invariants: a = u*x and b = v*x mod p; a + b strictly
        // decreases, so the loop terminates with a = 0 and
        // b = gcd(x, p), which is 1 for any nonzero x. For x = 0, v
        // stays 0.
        while !is_zero(&a) {
            while (a[0] & 1) == 0 {
                shr1(&mut a);
                u.set_half();
            }
            while (b[0] & 1) == 0 {
                shr1(&mut b);
                v.set_half();
            }
            if ge(&a, &b) {
                sub(&mut a, &b);
                u -= v;
            } else {
                sub(&mut b, &a);
                v -= u;
            }
        }
        v
    }

    /// Square root (in place). On success (the value was a quadratic
    /// residue) returns 0xFFFFFFFF and this element contains one of the
    /// two roots; otherwise returns 0x00000000 and this element is set
    /// to zero.
    pub fn set_sqrt(&mut self) -> u32 {
        let x = *self;
        // Candidate root is x^((p+1)/4); same ladder pieces as the
        // inversion chain, different tail.
        let x2 = x.square() * x;
        let x3 = x2.square() * x;
        let x6 = x3.xsquare(3) * x3;
        let x9 = x6.xsquare(3) * x3;
        let x11 = x9.xsquare(2) * x2;
        let x22 = x11.xsquare(11) * x11;
        let x44 = x22.xsquare(22) * x22;
        let x88 = x44.xsquare(44) * x44;
        let x176 = x88.xsquare(88) * x88;
        let x220 = x176.xsquare(44) * x44;
        let x223 = x220.xsquare(3) * x3;

        let mut y = x223.xsquare(23) * x22;
        y.set_xsquare(6);
        y *= x2;
        y.set_xsquare(2);

        let r = y.square().equals(x);
        y.set_cond(&Self::ZERO, !r);
        *self = y;
        r
    }

    #[inline(always)]
    pub fn sqrt(self) -> (Self, u32) {
        let mut r = self;
        let cc = r.set_sqrt();
        (r, cc)
    }

    /// Inverts all elements of the slice with Montgomery's trick:
    /// one full inversion per 16-element chunk, three multiplications
    /// per element. Zero elements are left at zero.
    pub fn batch_invert(xx: &mut [Self]) {
        for chunk in xx.chunks_mut(16) {
            Self::batch_invert_chunk(chunk);
        }
    }

    fn batch_invert_chunk(xx: &mut [Self]) {
        let n = xx.len();
        let mut pp = [Self::ONE; 16];
        let mut acc = Self::ONE;
        for i in 0..n {
            pp[i] = acc;
            // Zeros are replaced with 1 in the running product so the
            // whole chunk does not collapse.
            acc *= Self::select(&xx[i], &Self::ONE, xx[i].iszero());
        }
        let mut inv = acc.invert();
        for i in (0..n).rev() {
            let zz = xx[i].iszero();
            let xi = Self::select(&xx[i], &Self::ONE, zz);
            let mut r = inv * pp[i];
            r.set_cond(&Self::ZERO, zz);
            inv *= xi;
            xx[i] = r;
        }
    }
}

impl Add<GFp> for GFp {
    type Output = GFp;

    #[inline(always)]
    fn add(self, other: GFp) -> GFp {
        let mut r = self;
        r.set_add(&other);
        r
    }
}

impl Add<&GFp> for GFp {
    type Output = GFp;

    #[inline(always)]
    fn add(self, other: &GFp) -> GFp {
        let mut r = self;
        r.set_add(other);
        r
    }
}

impl Add<GFp> for &GFp {
    type Output = GFp;

    #[inline(always)]
    fn add(self, other: GFp) -> GFp {
        let mut r = *self;
        r.set_add(&other);
        r
    }
}

impl Add<&GFp> for &GFp {
    type Output = GFp;

    #[inline(always)]
    fn add(self, other: &GFp) -> GFp {
        let mut r = *self;
        r.set_add(other);
        r
    }
}

impl AddAssign<GFp> for GFp {
    #[inline(always)]
    fn add_assign(&mut self, other: GFp) {
        self.set_add(&other);
    }
}

impl AddAssign<&GFp> for GFp {
    #[inline(always)]
    fn add_assign(&mut self, other: &GFp) {
        self.set_add(other);
    }
}

impl Sub<GFp> for GFp {
    type Output = GFp;

    #[inline(always)]
    fn sub(self, other: GFp) -> GFp {
        let mut r = self;
        r.set_sub(&other);
        r
    }
}

impl Sub<&GFp> for GFp {
    type Output = GFp;

    #[inline(always)]
    fn sub(self, other: &GFp) -> GFp {
        let mut r = self;
        r.set_sub(other);
        r
    }
}

impl Sub<GFp> for &GFp {
    type Output = GFp;

    #[inline(always)]
    fn sub(self, other: GFp) -> GFp {
        let mut r = *self;
        r.set_sub(&other);
        r
    }
}

impl Sub<&GFp> for &GFp {
    type Output = GFp;

    #[inline(always)]
    fn sub(self, other: &GFp) -> GFp {
        let mut r = *self;
        r.set_sub(other);
        r
    }
}

impl SubAssign<GFp> for GFp {
    #[inline(always)]
    fn sub_assign(&mut self, other: GFp) {
        self.set_sub(&other);
    }
}

impl SubAssign<&GFp> for GFp {
    #[inline(always)]
    fn sub_assign(&mut self, other: &GFp) {
        self.set_sub(other);
    }
}

impl Mul<GFp> for GFp {
    type Output = GFp;

    #[inline(always)]
    fn mul(self, other: GFp) -> GFp {
        let mut r = self;
        r.set_mul(&other);
        r
    }
}

impl Mul<&GFp> for GFp {
    type Output = GFp;

    #[inline(always)]
    fn mul(self, other: &GFp) -> GFp {
        let mut r = self;
        r.set_mul(other);
        r
    }
}

impl Mul<GFp> for &GFp {
    type Output = GFp;

    #[inline(always)]
    fn mul(self, other: GFp) -> GFp {
        let mut r = *self;
        r.set_mul(&other);
        r
    }
}

impl Mul<&GFp> for &GFp {
    type Output = GFp;

    #[inline(always)]
    fn mul(self, other: &GFp) -> GFp {
        let mut r = *self;
        r.set_mul(other);
        r
    }
}

impl MulAssign<GFp> for GFp {
    #[inline(always)]
    fn mul_assign(&mut self, other: GFp) {
        self.set_mul(&other);
    }
}

impl MulAssign<&GFp> for GFp {
    #[inline(always)]
    fn mul_assign(&mut self, other: &GFp) {
        self.set_mul(other);
    }
}

impl Div<GFp> for GFp {
    type Output = GFp;

    #[inline(always)]
    fn div(self, other: GFp) -> GFp {
        self * other.invert()
    }
}

impl Div<&GFp> for GFp {
    type Output = GFp;

    #[inline(always)]
    fn div(self, other: &GFp) -> GFp {
        self * other.invert()
    }
}

impl DivAssign<GFp> for GFp {
    #[inline(always)]
    fn div_assign(&mut self, other: GFp) {
        *self *= other.invert();
    }
}

impl DivAssign<&GFp> for GFp {
    #[inline(always)]
    fn div_assign(&mut self, other: &GFp) {
        *self *= other.invert();
    }
}

impl Neg for GFp {
    type Output = GFp;

    #[inline(always)]
    fn neg(self) -> GFp {
        let mut r = self;
        r.set_neg();
        r
    }
}

impl Neg for &GFp {
    type Output = GFp;

    #[inline(always)]
    fn neg(self) -> GFp {
        let mut r = *self;
        r.set_neg();
        r
    }
}

#[cfg(test)]
mod tests {
    use super::GFp;
    use num_bigint::BigUint;
    use sha2::{Digest, Sha256};

    fn modulus() -> BigUint {
        (BigUint::from(1u32) << 256u32)
            - (BigUint::from(1u32) << 32u32) - BigUint::from(977u32)
    }

    fn to_big(x: GFp) -> BigUint {
        BigUint::from_bytes_be(&x.encode())
    }

    fn rand_elem(sh: &mut Sha256, i: u64) -> GFp {
        sh.update(i.to_le_bytes());
        let v: [u8; 32] = sh.finalize_reset().into();
        let (x, _) = GFp::decode32(&v);
        x
    }

    #[test]
    fn codec() {
        let p = modulus();

        let z = [0u8; 32];
        let (x, r) = GFp::decode32(&z);
        assert!(r == 0xFFFFFFFF);
        assert!(x.iszero() == 0xFFFFFFFF);
        assert!(x.encode() == z);

        // p itself is non-canonical and reduces to zero.
        let mut pe = [0u8; 32];
        pe.copy_from_slice(&p.to_bytes_be());
        let (x, r) = GFp::decode32(&pe);
        assert!(r == 0);
        assert!(x.iszero() == 0xFFFFFFFF);

        // p - 1 is canonical.
        let mut qe = [0u8; 32];
        qe.copy_from_slice(&(&p - 1u32).to_bytes_be());
        let (x, r) = GFp::decode32(&qe);
        assert!(r == 0xFFFFFFFF);
        assert!(x.encode() == qe);

        // 2^256 - 1 reduces to 2^32 + 976.
        let (x, r) = GFp::decode32(&[0xFFu8; 32]);
        assert!(r == 0);
        assert!(to_big(x) == (BigUint::from(1u64) << 32u32) + 976u32);
    }

    #[test]
    fn arithmetic() {
        let p = modulus();
        let mut sh = Sha256::new();
        for i in 0..50u64 {
            let a = rand_elem(&mut sh, 2 * i);
            let b = rand_elem(&mut sh, 2 * i + 1);
            let (za, zb) = (to_big(a), to_big(b));

            assert!(to_big(a + b) == (&za + &zb) % &p);
            assert!(to_big(a - b) == ((&p + &za) - &zb) % &p);
            assert!(to_big(-a) == (&p - &za) % &p);
            assert!(to_big(a * b) == (&za * &zb) % &p);
            assert!(to_big(a.square()) == (&za * &za) % &p);
            assert!(to_big(a.half()) == (&za * ((&p + 1u32) / 2u32)) % &p);
            assert!(to_big(a.mul2()) == (&za * 2u32) % &p);
            assert!(to_big(a.mul8()) == (&za * 8u32) % &p);
            assert!(to_big(a.mul3()) == (&za * 3u32) % &p);
            assert!(to_big(a.mul21()) == (&za * 21u32) % &p);
            assert!(to_big(a.mul_small(977)) == (&za * 977u32) % &p);

            assert!(a.equals(b) == 0);
            assert!(a.equals(a) == 0xFFFFFFFF);
        }
    }

    #[test]
    fn inversion() {
        let mut sh = Sha256::new();
        assert!(GFp::ZERO.invert().iszero() == 0xFFFFFFFF);
        assert!(GFp::ZERO.invert_vartime().iszero() == 0xFFFFFFFF);
        for i in 0..30u64 {
            let a = rand_elem(&mut sh, i);
            let ai = a.invert();
            assert!((a * ai).equals(GFp::ONE) == 0xFFFFFFFF);
            let av = a.invert_vartime();
            assert!(ai.equals(av) == 0xFFFFFFFF);
        }
    }

    #[test]
    fn batch_inversion() {
        let mut sh = Sha256::new();
        let mut xx = [GFp::ZERO; 23];
        for i in 0..23 {
            if i != 7 {
                xx[i] = rand_elem(&mut sh, i as u64);
            }
        }
        let orig = xx;
        GFp::batch_invert(&mut xx);
        for i in 0..23 {
            if i == 7 {
                assert!(xx[i].iszero() == 0xFFFFFFFF);
            } else {
                assert!((xx[i] * orig[i]).equals(GFp::ONE) == 0xFFFFFFFF);
            }
        }
    }

    #[test]
    fn sqrt() {
        let mut sh = Sha256::new();
        for i in 0..30u64 {
            let a = rand_elem(&mut sh, i);
            let s = a.square();
            let (y, r) = s.sqrt();
            assert!(r == 0xFFFFFFFF);
            assert!(y.square().equals(s) == 0xFFFFFFFF);

            // -1 is not a QR modulo this prime, so the negation of a
            // nonzero square cannot be one either.
            let (y, r) = (-s).sqrt();
            if s.iszero() == 0 {
                assert!(r == 0);
                assert!(y.iszero() == 0xFFFFFFFF);
            }
        }
    }
}
