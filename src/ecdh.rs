//! Scalar point multiplication for key agreement.
//!
//! `point_multiply()` computes s*P with the constant-time engine, so
//! the scalar may be a long-term secret key: the windowed scans are
//! branchless and the complete formulas leave no special-case timing.
//! Both parties of a Diffie-Hellman exchange call it with their own
//! secret and the peer's public point; the results agree on (a*b)*G.
//!
//! The caller decides how to turn the shared point into key material
//! (typically hashing a serialized form); this module only provides
//! the group operation.

use crate::backend::wipe_bytes;
use crate::keys::PublicKey;
use crate::scalar::Scalar;

/// Multiplies a public point by a 32-byte secret scalar.
///
/// Fails if the scalar is out of range or zero. The scalar bytes are
/// treated as secret; local copies are wiped before returning.
pub fn point_multiply(point: &PublicKey, scalar: &[u8; 32])
    -> Option<PublicKey>
{
    let mut sb = *scalar;
    let (mut s, ok) = Scalar::decode32(&sb);
    wipe_bytes(&mut sb);
    if (ok & !s.iszero()) == 0 {
        s.wipe();
        return None;
    }
    let r = point.point * s;
    s.wipe();
    // A nonzero scalar cannot annihilate a point of prime order.
    if r.isneutral() != 0 {
        return None;
    }
    Some(PublicKey { point: r })
}

#[cfg(test)]
mod tests {
    use super::point_multiply;
    use crate::keys::PrivateKey;
    use sha2::{Digest, Sha256};

    #[test]
    fn commutativity() {
        let mut sh = Sha256::new();
        for i in 0..8u64 {
            sh.update((2 * i).to_le_bytes());
            let a: [u8; 32] =
                PrivateKey::from_seed(&sh.finalize_reset()).encode();
            sh.update((2 * i + 1).to_le_bytes());
            let b: [u8; 32] =
                PrivateKey::from_seed(&sh.finalize_reset()).encode();

            let pa = PrivateKey::decode(&a).unwrap().public_key();
            let pb = PrivateKey::decode(&b).unwrap().public_key();

            // a*(b*G) = b*(a*G).
            let s1 = point_multiply(&pb, &a).unwrap();
            let s2 = point_multiply(&pa, &b).unwrap();
            assert!(s1.point.equals(s2.point) == 0xFFFFFFFF);
            assert!(s1.serialize_compressed() == s2.serialize_compressed());
        }
    }

    #[test]
    fn bad_scalars() {
        let pk = PrivateKey::from_seed(b"peer").public_key();
        assert!(point_multiply(&pk, &[0u8; 32]).is_none());
        assert!(point_multiply(&pk, &[0xFFu8; 32]).is_none());
    }
}
