//! Arithmetic modulo the secp256k1 group order.
//!
//! `Scalar` implements integers modulo the (prime) curve order
//! n = 0xFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEBAAEDCE6AF48A03BBFD25E8CD0364141,
//! with four 64-bit limbs in little-endian order. Unlike field
//! elements, scalars are kept canonical (fully reduced) at all times:
//! a scalar frequently is a secret key or a nonce, and a canonical
//! representation keeps comparisons and encodings trivially
//! constant-time.
//!
//! Byte encoding is unsigned big-endian over exactly 32 bytes.
//! Decoding reports out-of-range inputs through a `u32` mask
//! (0xFFFFFFFF = canonical) and still returns the reduced value, so
//! that callers can decide whether out-of-range means rejection (keys,
//! signatures) or reduction (hash outputs).

use core::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use crate::backend::{addcarry_u64, subborrow_u64, umull, umull_add2, wipe_limbs};

/// An integer modulo the secp256k1 group order.
#[derive(Clone, Copy, Debug)]
pub struct Scalar([u64; 4]);

impl Scalar {

    /// Group order n, as four 64-bit limbs in little-endian order.
    pub const ORDER: [u64; 4] = [
        0xBFD25E8CD0364141,
        0xBAAEDCE6AF48A03B,
        0xFFFFFFFFFFFFFFFE,
        0xFFFFFFFFFFFFFFFF,
    ];

    // 2^256 - n; all products against it fit comfortably since it is
    // only slightly above 2^128.
    const FOLD: [u64; 3] = [
        0x402DA1732FC9BEBF,
        0x4551231950B75FC4,
        0x0000000000000001,
    ];

    // (n - 1) / 2, the boundary for the "high" predicate.
    const HALF: [u64; 4] = [
        0xDFE92F46681B20A0,
        0x5D576E7357A4501D,
        0xFFFFFFFFFFFFFFFF,
        0x7FFFFFFFFFFFFFFF,
    ];

    // n - 2, the exponent for Fermat inversion.
    const ORDER_MINUS_2: [u64; 4] = [
        0xBFD25E8CD036413F,
        0xBAAEDCE6AF48A03B,
        0xFFFFFFFFFFFFFFFE,
        0xFFFFFFFFFFFFFFFF,
    ];

    pub const ZERO: Scalar = Scalar([0, 0, 0, 0]);
    pub const ONE: Scalar = Scalar([1, 0, 0, 0]);

    /// Builds a constant scalar from four 64-bit limbs in high-to-low
    /// order. The value MUST be canonical (lower than n).
    pub const fn w64be(x3: u64, x2: u64, x1: u64, x0: u64) -> Self {
        Self([x0, x1, x2, x3])
    }

    /// Converts a 64-bit unsigned integer.
    #[inline(always)]
    pub fn from_u64(x: u64) -> Self {
        Self([x, 0, 0, 0])
    }

    /// Converts a 128-bit unsigned integer.
    #[inline(always)]
    pub fn from_u128(x: u128) -> Self {
        Self([x as u64, (x >> 64) as u64, 0, 0])
    }

    // Subtracts n once if the 256-bit value (with input carry `cc`)
    // is not below n; the result is canonical provided the input was
    // below 2^256 + n.
    #[inline]
    fn reduce_once(d: [u64; 4], cc: u8) -> [u64; 4] {
        let (t0, b) = subborrow_u64(d[0], Self::ORDER[0], 0);
        let (t1, b) = subborrow_u64(d[1], Self::ORDER[1], b);
        let (t2, b) = subborrow_u64(d[2], Self::ORDER[2], b);
        let (t3, b) = subborrow_u64(d[3], Self::ORDER[3], b);
        // Keep the subtracted value if the input carried out of 256
        // bits, or if the subtraction did not borrow.
        let w = ((cc | (1 - b)) as u64).wrapping_neg();
        [
            d[0] ^ (w & (d[0] ^ t0)),
            d[1] ^ (w & (d[1] ^ t1)),
            d[2] ^ (w & (d[2] ^ t2)),
            d[3] ^ (w & (d[3] ^ t3)),
        ]
    }

    #[inline]
    fn set_add(&mut self, rhs: &Self) {
        let (d0, cc) = addcarry_u64(self.0[0], rhs.0[0], 0);
        let (d1, cc) = addcarry_u64(self.0[1], rhs.0[1], cc);
        let (d2, cc) = addcarry_u64(self.0[2], rhs.0[2], cc);
        let (d3, cc) = addcarry_u64(self.0[3], rhs.0[3], cc);
        // Both operands were canonical, so the sum is below 2n and one
        // conditional subtraction restores canonicity.
        self.0 = Self::reduce_once([d0, d1, d2, d3], cc);
    }

    #[inline]
    fn set_sub(&mut self, rhs: &Self) {
        let (d0, cc) = subborrow_u64(self.0[0], rhs.0[0], 0);
        let (d1, cc) = subborrow_u64(self.0[1], rhs.0[1], cc);
        let (d2, cc) = subborrow_u64(self.0[2], rhs.0[2], cc);
        let (d3, cc) = subborrow_u64(self.0[3], rhs.0[3], cc);
        // Add n back on borrow.
        let w = (cc as u64).wrapping_neg();
        let (d0, cc) = addcarry_u64(d0, w & Self::ORDER[0], 0);
        let (d1, cc) = addcarry_u64(d1, w & Self::ORDER[1], cc);
        let (d2, cc) = addcarry_u64(d2, w & Self::ORDER[2], cc);
        let (d3, _)  = addcarry_u64(d3, w & Self::ORDER[3], cc);
        self.0 = [d0, d1, d2, d3];
    }

    /// Negates this value (in place).
    #[inline]
    pub fn set_neg(&mut self) {
        let (d0, cc) = subborrow_u64(Self::ORDER[0], self.0[0], 0);
        let (d1, cc) = subborrow_u64(Self::ORDER[1], self.0[1], cc);
        let (d2, cc) = subborrow_u64(Self::ORDER[2], self.0[2], cc);
        let (d3, _)  = subborrow_u64(Self::ORDER[3], self.0[3], cc);
        // n - 0 = n must collapse back to zero.
        let z = self.iszero();
        let mut r = Self([d0, d1, d2, d3]);
        r.set_cond(&Self::ZERO, z);
        *self = r;
    }

    /// Copies `a` into this scalar if `ctl` is 0xFFFFFFFF; keeps the
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

        // Add back (n+1)/2 when the dropped bit was set; the result
        // stays canonical.
        let (d0, cc) = addcarry_u64(d0, tt & (Self::HALF[0] + 1), 0);
        let (d1, cc) = addcarry_u64(d1, tt & Self::HALF[1], cc);
        let (d2, cc) = addcarry_u64(d2, tt & Self::HALF[2], cc);
        let (d3, _)  = addcarry_u64(d3, tt & Self::HALF[3], cc);

        self.0 = [d0, d1, d2, d3];
    }

    // Reduces a 512-bit integer (eight little-endian limbs) modulo n,
    // folding the top half with 2^256 = (2^256 - n) mod n.
    fn reduce512(l: &[u64; 8]) -> Self {
        let (c0, c1) = (Self::FOLD[0], Self::FOLD[1]);
        let hi = [l[4], l[5], l[6], l[7]];

        // m = l mod 2^256 + hi*(c0 + c1*2^64 + 2^128); at most 386 bits.
        let mut m = [l[0], l[1], l[2], l[3], 0, 0, 0];
        let mut t = 0u64;
        for i in 0..4 {
            let (lo, h) = umull_add2(hi[i], c0, m[i], t);
            m[i] = lo;
            t = h;
        }
        m[4] = t;
        let mut t = 0u64;
        for i in 0..4 {
            let (lo, h) = umull_add2(hi[i], c1, m[i + 1], t);
            m[i + 1] = lo;
            t = h;
        }
        m[5] = t;
        let mut cc = 0;
        for i in 0..4 {
            let (d, c) = addcarry_u64(m[i + 2], hi[i], cc);
            m[i + 2] = d;
            cc = c;
        }
        let (d, _) = addcarry_u64(m[6], 0, cc);
        m[6] = d;

        // Second fold: the part above 2^256 fits three limbs, so the
        // folded sum fits five limbs with a small top word.
        let h3 = [m[4], m[5], m[6]];
        let mut q = [m[0], m[1], m[2], m[3], 0];
        let mut t = 0u64;
        for i in 0..3 {
            let (lo, h) = umull_add2(h3[i], c0, q[i], t);
            q[i] = lo;
            t = h;
        }
        let (d, cc) = addcarry_u64(q[3], t, 0);
        q[3] = d;
        q[4] = cc as u64;
        let mut t = 0u64;
        for i in 0..3 {
            let (lo, h) = umull_add2(h3[i], c1, q[i + 1], t);
            q[i + 1] = lo;
            t = h;
        }
        let (d, cc) = addcarry_u64(q[4], t, 0);
        q[4] = d;
        debug_assert!(cc == 0);
        let mut cc = 0;
        for i in 0..3 {
            let (d, c) = addcarry_u64(q[i + 2], h3[i], cc);
            q[i + 2] = d;
            cc = c;
        }
        debug_assert!(cc == 0);

        // Third fold: the top word is tiny (a few bits).
        let p4 = q[4];
        let (lo, hi) = umull(p4, c0);
        let (d0, cc) = addcarry_u64(q[0], lo, 0);
        let (d1, cc) = addcarry_u64(q[1], hi, cc);
        let (lo, hi) = umull(p4, c1);
        let (d1b, cc2) = addcarry_u64(d1, lo, 0);
        // The 2^128 term of the fold constant lands in the third limb;
        // the small words cannot overflow the pre-addition.
        let (d2, cc) = addcarry_u64(q[2], hi + (cc as u64) + p4, cc2);
        let (d3, cc) = addcarry_u64(q[3], 0, cc);

        // A final carry means the value wrapped past 2^256; adding the
        // fold constant once more cannot carry again since the wrapped
        // value is tiny.
        let w = (cc as u64).wrapping_neg();
        let (d0, cc) = addcarry_u64(d0, w & c0, 0);
        let (d1, cc) = addcarry_u64(d1b, w & c1, cc);
        let (d2, cc) = addcarry_u64(d2, w & 1, cc);
        let (d3, _)  = addcarry_u64(d3, 0, cc);

        Self(Self::reduce_once([d0, d1, d2, d3], 0))
    }

    #[inline]
    fn set_mul(&mut self, rhs: &Self) {
        let aa = self.0;
        let bb = rhs.0;
        let mut l = [0u64; 8];
        for i in 0..4 {
            let mut hi = 0u64;
            for j in 0..4 {
                let (lo, h) = umull_add2(aa[i], bb[j], l[i + j], hi);
                l[i + j] = lo;
                hi = h;
            }
            l[i + 4] = hi;
        }
        *self = Self::reduce512(&l);
        wipe_limbs(&mut l);
    }

    /// Squares this value (in place).
    #[inline(always)]
    pub fn set_square(&mut self) {
        let x = *self;
        self.set_mul(&x);
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

    /// Zero check; returns 0xFFFFFFFF for zero, 0x00000000 otherwise.
    #[inline]
    pub fn iszero(self) -> u32 {
        let t = self.0[0] | self.0[1] | self.0[2] | self.0[3];
        !((((t | t.wrapping_neg()) >> 63) as u32).wrapping_neg())
    }

    /// Equality check; returns 0xFFFFFFFF if the values are equal,
    /// 0x00000000 otherwise.
    #[inline]
    pub fn equals(self, rhs: Self) -> u32 {
        let t = (self.0[0] ^ rhs.0[0]) | (self.0[1] ^ rhs.0[1])
            | (self.0[2] ^ rhs.0[2]) | (self.0[3] ^ rhs.0[3]);
        !((((t | t.wrapping_neg()) >> 63) as u32).wrapping_neg())
    }

    /// Returns 0xFFFFFFFF if this value is greater than (n-1)/2 (the
    /// "high" half of the order), 0x00000000 otherwise.
    #[inline]
    pub fn is_high(self) -> u32 {
        let (_, cc) = subborrow_u64(Self::HALF[0], self.0[0], 0);
        let (_, cc) = subborrow_u64(Self::HALF[1], self.0[1], cc);
        let (_, cc) = subborrow_u64(Self::HALF[2], self.0[2], cc);
        let (_, cc) = subborrow_u64(Self::HALF[3], self.0[3], cc);
        (cc as u32).wrapping_neg()
    }

    /// Returns 0xFFFFFFFF if this value is even, 0x00000000 otherwise.
    #[inline]
    pub fn is_even(self) -> u32 {
        (((self.0[0] & 1) as u32).wrapping_neg()) ^ 0xFFFFFFFF
    }

    /// Returns bit `k` (0 or 1) of the canonical representation.
    #[inline]
    pub fn bit(self, k: usize) -> u32 {
        ((self.0[k >> 6] >> (k & 63)) & 1) as u32
    }

    /// Decodes 32 big-endian bytes. The returned mask is 0xFFFFFFFF if
    /// the integer was canonical (lower than n), 0x00000000 otherwise;
    /// in the latter case the returned value is the reduction modulo n.
    pub fn decode32(buf: &[u8; 32]) -> (Self, u32) {
        let mut d = [0u64; 4];
        for i in 0..4 {
            let j = 8 * (3 - i);
            d[i] = u64::from_be_bytes([
                buf[j], buf[j + 1], buf[j + 2], buf[j + 3],
                buf[j + 4], buf[j + 5], buf[j + 6], buf[j + 7],
            ]);
        }
        let (_, b) = subborrow_u64(d[0], Self::ORDER[0], 0);
        let (_, b) = subborrow_u64(d[1], Self::ORDER[1], b);
        let (_, b) = subborrow_u64(d[2], Self::ORDER[2], b);
        let (_, b) = subborrow_u64(d[3], Self::ORDER[3], b);
        // b = 1 means the value was below n (canonical).
        let r = Self(Self::reduce_once(d, 0));
        (r, (b as u32).wrapping_neg())
    }

    /// Decodes 32 big-endian bytes, reducing modulo n.
    #[inline(always)]
    pub fn reduce32(buf: &[u8; 32]) -> Self {
        Self::decode32(buf).0
    }

    /// Reduces a 512-bit big-endian integer modulo n (used for wide
    /// hash outputs).
    pub fn reduce_wide(buf: &[u8; 64]) -> Self {
        let mut l = [0u64; 8];
        for i in 0..8 {
            let j = 8 * (7 - i);
            l[i] = u64::from_be_bytes([
                buf[j], buf[j + 1], buf[j + 2], buf[j + 3],
                buf[j + 4], buf[j + 5], buf[j + 6], buf[j + 7],
            ]);
        }
        let r = Self::reduce512(&l);
        wipe_limbs(&mut l);
        r
    }

    /// Encodes this value over exactly 32 bytes, big-endian.
    pub fn encode(self) -> [u8; 32] {
        let mut d = [0u8; 32];
        for i in 0..4 {
            d[8 * i..8 * i + 8].copy_from_slice(&self.0[3 - i].to_be_bytes());
        }
        d
    }

    /// Inverts this value (in place); zero maps to zero.
    ///
    /// Constant-time: Fermat's little theorem with a fixed 4-bit
    /// window; the window indices depend only on the public constant
    /// exponent n - 2. Suitable for secret inputs.
    pub fn set_invert(&mut self) {
        let x = *self;
        let mut tab = [Self::ONE; 16];
        tab[1] = x;
        for i in 2..16 {
            tab[i] = tab[i - 1] * x;
        }

        let mut acc = Self::ONE;
        let mut started = false;
        for limb in (0..4).rev() {
            for k in (0..16).rev() {
                let d = ((Self::ORDER_MINUS_2[limb] >> (4 * k)) & 15) as usize;
                if started {
                    acc.set_xsquare(4);
                    acc *= tab[d];
                } else {
                    // The top nibble of n - 2 is nonzero.
                    acc = tab[d];
                    started = true;
                }
            }
        }
        *self = acc;
        for t in tab.iter_mut() {
            t.wipe();
        }
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
    /// such as signature components during verification.
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

        let mut a = self.0;
        let mut b = Self::ORDER;
        let mut u = Self::ONE;
        let mut v = Self::ZERO;

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

    /// Clears this scalar with volatile stores; for secrets going out
    /// of scope.
    #[inline]
    pub fn wipe(&mut self) {
        wipe_limbs(&mut self.0);
    }
}

impl Add<Scalar> for Scalar {
    type Output = Scalar;

    #[inline(always)]
    fn add(self, other: Scalar) -> Scalar {
        let mut r = self;
        r.set_add(&other);
        r
    }
}

impl Add<&Scalar> for Scalar {
    type Output = Scalar;

    #[inline(always)]
    fn add(self, other: &Scalar) -> Scalar {
        let mut r = self;
        r.set_add(other);
        r
    }
}

impl Add<Scalar> for &Scalar {
    type Output = Scalar;

    #[inline(always)]
    fn add(self, other: Scalar) -> Scalar {
        let mut r = *self;
        r.set_add(&other);
        r
    }
}

impl Add<&Scalar> for &Scalar {
    type Output = Scalar;

    #[inline(always)]
    fn add(self, other: &Scalar) -> Scalar {
        let mut r = *self;
        r.set_add(other);
        r
    }
}

impl AddAssign<Scalar> for Scalar {
    #[inline(always)]
    fn add_assign(&mut self, other: Scalar) {
        self.set_add(&other);
    }
}

impl AddAssign<&Scalar> for Scalar {
    #[inline(always)]
    fn add_assign(&mut self, other: &Scalar) {
        self.set_add(other);
    }
}

impl Sub<Scalar> for Scalar {
    type Output = Scalar;

    #[inline(always)]
    fn sub(self, other: Scalar) -> Scalar {
        let mut r = self;
        r.set_sub(&other);
        r
    }
}

impl Sub<&Scalar> for Scalar {
    type Output = Scalar;

    #[inline(always)]
    fn sub(self, other: &Scalar) -> Scalar {
        let mut r = self;
        r.set_sub(other);
        r
    }
}

impl Sub<Scalar> for &Scalar {
    type Output = Scalar;

    #[inline(always)]
    fn sub(self, other: Scalar) -> Scalar {
        let mut r = *self;
        r.set_sub(&other);
        r
    }
}

impl Sub<&Scalar> for &Scalar {
    type Output = Scalar;

    #[inline(always)]
    fn sub(self, other: &Scalar) -> Scalar {
        let mut r = *self;
        r.set_sub(other);
        r
    }
}

impl SubAssign<Scalar> for Scalar {
    #[inline(always)]
    fn sub_assign(&mut self, other: Scalar) {
        self.set_sub(&other);
    }
}

impl SubAssign<&Scalar> for Scalar {
    #[inline(always)]
    fn sub_assign(&mut self, other: &Scalar) {
        self.set_sub(other);
    }
}

impl Mul<Scalar> for Scalar {
    type Output = Scalar;

    #[inline(always)]
    fn mul(self, other: Scalar) -> Scalar {
        let mut r = self;
        r.set_mul(&other);
        r
    }
}

impl Mul<&Scalar> for Scalar {
    type Output = Scalar;

    #[inline(always)]
    fn mul(self, other: &Scalar) -> Scalar {
        let mut r = self;
        r.set_mul(other);
        r
    }
}

impl Mul<Scalar> for &Scalar {
    type Output = Scalar;

    #[inline(always)]
    fn mul(self, other: Scalar) -> Scalar {
        let mut r = *self;
        r.set_mul(&other);
        r
    }
}

impl Mul<&Scalar> for &Scalar {
    type Output = Scalar;

    #[inline(always)]
    fn mul(self, other: &Scalar) -> Scalar {
        let mut r = *self;
        r.set_mul(other);
        r
    }
}

impl MulAssign<Scalar> for Scalar {
    #[inline(always)]
    fn mul_assign(&mut self, other: Scalar) {
        self.set_mul(&other);
    }
}

impl MulAssign<&Scalar> for Scalar {
    #[inline(always)]
    fn mul_assign(&mut self, other: &Scalar) {
        self.set_mul(other);
    }
}

impl Neg for Scalar {
    type Output = Scalar;

    #[inline(always)]
    fn neg(self) -> Scalar {
        let mut r = self;
        r.set_neg();
        r
    }
}

impl Neg for &Scalar {
    type Output = Scalar;

    #[inline(always)]
    fn neg(self) -> Scalar {
        let mut r = *self;
        r.set_neg();
        r
    }
}

#[cfg(test)]
mod tests {
    use super::Scalar;
    use num_bigint::BigUint;
    use sha2::{Digest, Sha256};

    fn order() -> BigUint {
        BigUint::from_bytes_be(&[
            0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
            0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFE,
            0xBA, 0xAE, 0xDC, 0xE6, 0xAF, 0x48, 0xA0, 0x3B,
            0xBF, 0xD2, 0x5E, 0x8C, 0xD0, 0x36, 0x41, 0x41,
        ])
    }

    fn to_big(x: Scalar) -> BigUint {
        BigUint::from_bytes_be(&x.encode())
    }

    fn rand_scalar(sh: &mut Sha256, i: u64) -> Scalar {
        sh.update(i.to_le_bytes());
        let v: [u8; 32] = sh.finalize_reset().into();
        Scalar::reduce32(&v)
    }

    #[test]
    fn codec() {
        let n = order();

        let (x, r) = Scalar::decode32(&[0u8; 32]);
        assert!(r == 0xFFFFFFFF);
        assert!(x.iszero() == 0xFFFFFFFF);

        // n - 1 is canonical; n and n + 1 are not; the value is still
        // reduced.
        let mut e = [0u8; 32];
        e.copy_from_slice(&(&n - 1u32).to_bytes_be());
        let (x, r) = Scalar::decode32(&e);
        assert!(r == 0xFFFFFFFF);
        assert!(x.encode() == e);

        e.copy_from_slice(&n.to_bytes_be());
        let (x, r) = Scalar::decode32(&e);
        assert!(r == 0);
        assert!(x.iszero() == 0xFFFFFFFF);

        e.copy_from_slice(&(&n + 1u32).to_bytes_be());
        let (x, r) = Scalar::decode32(&e);
        assert!(r == 0);
        assert!(x.equals(Scalar::ONE) == 0xFFFFFFFF);

        // 2^256 - 1 reduces to 2^256 - 1 - n.
        let (x, r) = Scalar::decode32(&[0xFFu8; 32]);
        assert!(r == 0);
        assert!(to_big(x) == (BigUint::from(1u32) << 256u32) - 1u32 - &n);
    }

    #[test]
    fn arithmetic() {
        let n = order();
        let mut sh = Sha256::new();
        for i in 0..50u64 {
            let a = rand_scalar(&mut sh, 2 * i);
            let b = rand_scalar(&mut sh, 2 * i + 1);
            let (za, zb) = (to_big(a), to_big(b));

            assert!(to_big(a + b) == (&za + &zb) % &n);
            assert!(to_big(a - b) == ((&n + &za) - &zb) % &n);
            assert!(to_big(-a) == (&n - &za) % &n);
            assert!(to_big(a * b) == (&za * &zb) % &n);
            assert!(to_big(a.square()) == (&za * &za) % &n);

            let mut h = a;
            h.set_half();
            assert!(to_big(h) == (&za * ((&n + 1u32) / 2u32)) % &n);
        }
        assert!((-Scalar::ZERO).iszero() == 0xFFFFFFFF);
    }

    #[test]
    fn wide_reduction() {
        let n = order();
        let mut sh = Sha256::new();
        for i in 0..20u64 {
            sh.update(i.to_le_bytes());
            let lo: [u8; 32] = sh.finalize_reset().into();
            sh.update((i + 1000).to_le_bytes());
            let hi: [u8; 32] = sh.finalize_reset().into();
            let mut w = [0u8; 64];
            w[..32].copy_from_slice(&hi);
            w[32..].copy_from_slice(&lo);
            let x = Scalar::reduce_wide(&w);
            assert!(to_big(x) == BigUint::from_bytes_be(&w) % &n);
        }
        assert!(Scalar::reduce_wide(&[0xFFu8; 64]).equals(
            {
                let n2 = order();
                let v = ((BigUint::from(1u32) << 512u32) - 1u32) % n2;
                let mut e = [0u8; 32];
                let vb = v.to_bytes_be();
                e[32 - vb.len()..].copy_from_slice(&vb);
                Scalar::decode32(&e).0
            }) == 0xFFFFFFFF);
    }

    #[test]
    fn inversion() {
        let mut sh = Sha256::new();
        assert!(Scalar::ZERO.invert().iszero() == 0xFFFFFFFF);
        assert!(Scalar::ZERO.invert_vartime().iszero() == 0xFFFFFFFF);
        for i in 0..20u64 {
            let a = rand_scalar(&mut sh, i);
            let ai = a.invert();
            assert!((a * ai).equals(Scalar::ONE) == 0xFFFFFFFF);
            assert!(ai.equals(a.invert_vartime()) == 0xFFFFFFFF);
        }
    }

    #[test]
    fn predicates() {
        let n = order();
        let half = (&n - 1u32) / 2u32;

        let mut e = [0u8; 32];
        let hb = half.to_bytes_be();
        e[32 - hb.len()..].copy_from_slice(&hb);
        let (h, r) = Scalar::decode32(&e);
        assert!(r == 0xFFFFFFFF);
        assert!(h.is_high() == 0);
        let h1 = h + Scalar::ONE;
        assert!(h1.is_high() == 0xFFFFFFFF);
        assert!((-h1).is_high() == 0);

        assert!(Scalar::ZERO.is_even() == 0xFFFFFFFF);
        assert!(Scalar::ONE.is_even() == 0);
        assert!(Scalar::from_u64(2).is_even() == 0xFFFFFFFF);
        assert!(Scalar::from_u64(5).bit(0) == 1);
        assert!(Scalar::from_u64(5).bit(1) == 0);
        assert!(Scalar::from_u64(5).bit(2) == 1);
    }
}
