//! zkp256 is a self-contained implementation of the secp256k1
//! elliptic curve and of the confidential-transaction primitives
//! built on it.
//!
//! The crate covers four families of operations:
//!
//!  - ECDSA: deterministic (RFC 6979) signing, verification,
//!    public-key recovery, compact and strict-DER codecs (`ecdsa`);
//!  - keys: derivation, validation, SEC 1 serialization (compressed,
//!    uncompressed and hybrid points), additive and multiplicative
//!    tweaks, and the legacy DER private-key wrapper (`keys`);
//!  - Diffie-Hellman style scalar point multiplication (`ecdh`);
//!  - confidential transactions: Pedersen commitments, blinding-sum
//!    and tally checks (`pedersen`), Borromean ring signatures
//!    (`borromean`), and Borromean-based range proofs with
//!    nonce-rewind (`rangeproof`, requires the `alloc` feature).
//!
//! The numerical layers underneath — base-field and scalar arithmetic
//! (`field`, `scalar`), complete-formula group operations and the
//! scalar-multiplication engines (`curve`) — are exposed as well, for
//! callers building other protocols on the same curve.
//!
//! # Conventions
//!
//! All operations are strictly constant-time in their secret inputs
//! unless the name says `vartime`: no secret-dependent branches, no
//! secret-indexed table accesses (window lookups scan every entry
//! behind a branchless mask). To keep compilers from short-circuiting
//! secret comparisons, internal Boolean values are `u32` masks:
//! 0xFFFFFFFF for true, 0x00000000 for false, and no other value. The
//! `Eq`/`PartialEq` traits are deliberately not implemented on field
//! elements, scalars or points; use the `equals()` methods.
//!
//! Functions named `set_*()` operate in place on `&mut self`; the
//! corresponding value-returning forms go through the usual operator
//! traits (`+`, `*`, `-=`, ...).
//!
//! Verification-style operations take public data and may use faster
//! variable-time code paths; they are marked as such.
//!
//! # Context
//!
//! Stateful operations (signing, commitments, range proofs) go
//! through a [`context::Context`] built with the capabilities the
//! caller needs. A context is immutable in normal use and safe to
//! share across threads; re-blinding (`randomize`) requires `&mut`
//! access. See the `context` module.
//!
//! The library is `no_std`; the `std` feature (default) and the
//! `alloc` feature control the usual integration points. Range proofs
//! produce variable-length buffers and therefore need `alloc`.

#![no_std]

#[cfg(all(feature = "alloc", not(feature = "std")))]
#[macro_use]
extern crate alloc;

#[cfg(feature = "std")]
#[macro_use]
extern crate std;

#[cfg(all(feature = "alloc", not(feature = "std")))]
pub(crate) use alloc::vec::Vec;

#[cfg(feature = "std")]
pub(crate) use std::vec::Vec;

pub use rand_core::{CryptoRng, RngCore, Error as RngError};

mod backend;

pub mod field;
pub mod scalar;
pub mod curve;
pub mod context;
pub mod nonce;
pub mod keys;
pub mod ecdsa;
pub mod ecdh;
pub mod pedersen;
pub mod borromean;

#[cfg(feature = "alloc")]
pub mod rangeproof;
