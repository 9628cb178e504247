#![allow(non_snake_case)]

mod util;
use util::core_cycles;

use sha2::{Digest, Sha256};
use zkp256::context::{Context, ALL};
use zkp256::curve::Point;
use zkp256::ecdsa;
use zkp256::keys::PrivateKey;
use zkp256::pedersen;
use zkp256::rangeproof;
use zkp256::scalar::Scalar;

fn seed32() -> [u8; 32] {
    let z = core_cycles();
    let mut seed = [0u8; 32];
    for i in 0..4 {
        seed[8 * i..8 * i + 8].copy_from_slice(&z.to_le_bytes());
    }
    seed
}

fn bench_mulgen() -> (f64, u8) {
    let mut s = Scalar::reduce32(&seed32());
    let mut tt = [0; 100];
    for i in 0..tt.len() {
        let begin = core_cycles();
        for _ in 0..100 {
            let P = Point::mulgen(&s);
            if P.isneutral() != 0 {
                s += Scalar::ZERO;
            } else {
                s += Scalar::ONE;
            }
        }
        let end = core_cycles();
        tt[i] = end.wrapping_sub(begin);
    }
    tt.sort();
    ((tt[tt.len() >> 1] as f64) / 100.0, s.encode()[0])
}

fn bench_mul() -> (f64, u8) {
    let mut s = Scalar::reduce32(&seed32());
    let mut P = Point::mulgen(&s);
    let mut tt = [0; 100];
    for i in 0..tt.len() {
        let begin = core_cycles();
        for _ in 0..100 {
            P *= s;
            if P.isneutral() != 0 {
                s += Scalar::ZERO;
            } else {
                s += Scalar::ONE;
            }
        }
        let end = core_cycles();
        tt[i] = end.wrapping_sub(begin);
    }
    tt.sort();
    ((tt[tt.len() >> 1] as f64) / 100.0, s.encode()[0])
}

fn bench_sign(ctx: &Context) -> (f64, u8) {
    let sk = PrivateKey::from_seed(&seed32());
    let skb = sk.encode();
    let mut msg: [u8; 32] = Sha256::digest(&seed32()).into();
    let mut tt = [0; 30];
    let mut x = 0u8;
    for i in 0..tt.len() {
        let begin = core_cycles();
        for _ in 0..20 {
            let (sig, _) = ecdsa::sign(ctx, &msg, &skb).unwrap();
            msg = Sha256::digest(&sig.to_compact()).into();
            x ^= msg[0];
        }
        let end = core_cycles();
        tt[i] = end.wrapping_sub(begin);
    }
    tt.sort();
    ((tt[tt.len() >> 1] as f64) / 20.0, x)
}

fn bench_verify(ctx: &Context) -> (f64, u8) {
    let sk = PrivateKey::from_seed(&seed32());
    let pk = sk.public_key();
    let msg: [u8; 32] = Sha256::digest(&seed32()).into();
    let (sig, _) = ecdsa::sign(ctx, &msg, &sk.encode()).unwrap();
    let mut tt = [0; 30];
    let mut x = 0u8;
    for i in 0..tt.len() {
        let begin = core_cycles();
        for _ in 0..20 {
            x ^= ecdsa::verify(ctx, &sig, &msg, &pk) as u8;
        }
        let end = core_cycles();
        tt[i] = end.wrapping_sub(begin);
    }
    tt.sort();
    ((tt[tt.len() >> 1] as f64) / 20.0, x)
}

fn bench_commit(ctx: &Context) -> (f64, u8) {
    let mut blind = seed32();
    blind[0] = 0;
    let mut tt = [0; 30];
    let mut x = 0u8;
    for i in 0..tt.len() {
        let begin = core_cycles();
        for v in 0..20u64 {
            let c = pedersen::commit(ctx, &blind, 1000 + v).unwrap();
            x ^= c.serialize()[1];
        }
        let end = core_cycles();
        tt[i] = end.wrapping_sub(begin);
    }
    tt.sort();
    ((tt[tt.len() >> 1] as f64) / 20.0, x)
}

fn bench_rangeproof(ctx: &Context) -> (f64, f64, u8) {
    let mut blind = seed32();
    blind[0] = 0;
    let mut nonce = seed32();
    nonce[0] = 1;
    let c = pedersen::commit(ctx, &blind, 86000).unwrap();
    let proof =
        rangeproof::sign(ctx, 0, &c, &blind, &nonce, 0, 32, 86000, b"")
            .unwrap();

    let mut ts = [0; 10];
    let mut x = 0u8;
    for i in 0..ts.len() {
        let begin = core_cycles();
        let p = rangeproof::sign(ctx, 0, &c, &blind, &nonce, 0, 32,
            86000, b"").unwrap();
        x ^= p[p.len() - 1];
        let end = core_cycles();
        ts[i] = end.wrapping_sub(begin);
    }
    ts.sort();

    let mut tv = [0; 10];
    for i in 0..tv.len() {
        let begin = core_cycles();
        x ^= rangeproof::verify(ctx, &c, &proof).is_some() as u8;
        let end = core_cycles();
        tv[i] = end.wrapping_sub(begin);
    }
    tv.sort();

    (ts[ts.len() >> 1] as f64, tv[tv.len() >> 1] as f64, x)
}

fn main() {
    let ctx = Context::new(ALL);
    let mut bx = 0u8;

    let (v, x) = bench_mulgen();
    bx ^= x;
    println!("mulgen:                {:13.2}", v);
    let (v, x) = bench_mul();
    bx ^= x;
    println!("point mul:             {:13.2}", v);
    let (v, x) = bench_sign(&ctx);
    bx ^= x;
    println!("ECDSA sign:            {:13.2}", v);
    let (v, x) = bench_verify(&ctx);
    bx ^= x;
    println!("ECDSA verify:          {:13.2}", v);
    let (v, x) = bench_commit(&ctx);
    bx ^= x;
    println!("pedersen commit:       {:13.2}", v);
    let (vs, vv, x) = bench_rangeproof(&ctx);
    bx ^= x;
    println!("rangeproof sign:       {:13.2}", vs);
    println!("rangeproof verify:     {:13.2}", vv);

    println!("(ignore this: {})", bx);
}
