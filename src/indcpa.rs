//! IND-CPA public-key scheme: key generation, encryption, decryption over the
//! lattice. Spec §4.6. This module and `kem.rs` split the work the same way
//! `k_pke.rs`/`ml_kem.rs` would: the FO transform has not yet been applied
//! here, so a successful decrypt on a tampered ciphertext is not rejected —
//! that is `kem.rs`'s job.

use crate::cbd::cbd;
use crate::ntt::invntt;
use crate::poly::{self, Poly};
use crate::polyvec::{self, PolyVec};
use crate::symmetric::{prf, sha3_512_g, Xof128, XOF_BLOCK_BYTES};
use crate::Q;
use zeroize::Zeroize;

/// `SampleNTT`: rejection-samples a uniform element of `T_q` by squeezing 168-byte
/// SHAKE128 blocks, parsing 3 bytes as two 12-bit candidates, and keeping those
/// `< q`. Spec §4.4. This loop's bound depends only on `rho`, `i`, `j` — all public
/// — so it need not run in constant time.
fn rej_uniform(xof: &mut Xof128) -> Poly {
    let mut r = [0i16; 256];
    let mut ctr = 0usize;
    let mut block = [0u8; XOF_BLOCK_BYTES];
    while ctr < 256 {
        xof.squeeze_block(&mut block);
        let mut i = 0usize;
        while i + 3 <= block.len() && ctr < 256 {
            let d1 = u16::from(block[i]) | ((u16::from(block[i + 1]) & 0x0F) << 8);
            let d2 = (u16::from(block[i + 1]) >> 4) | (u16::from(block[i + 2]) << 4);
            if d1 < Q as u16 {
                r[ctr] = d1 as i16;
                ctr += 1;
            }
            if d2 < Q as u16 && ctr < 256 {
                r[ctr] = d2 as i16;
                ctr += 1;
            }
            i += 3;
        }
    }
    r
}

/// Expands the K×K matrix `A` (non-transposed) or `A^T` (transposed) from `rho`.
/// Never stored persistently; recomputed each time it is needed, per spec §3.
fn gen_matrix<const K: usize>(rho: &[u8; 32], transposed: bool) -> [PolyVec<K>; K] {
    core::array::from_fn(|i| {
        core::array::from_fn(|j| {
            let (x, y) = if transposed { (j as u8, i as u8) } else { (i as u8, j as u8) };
            let mut xof = Xof128::new(rho, x, y);
            rej_uniform(&mut xof)
        })
    })
}

/// Dots a row of a NTT-domain matrix against a NTT-domain vector, then raises the
/// Montgomery-scaled `basemul_acc_montgomery` accumulator back to canonical NTT
/// domain. Used where the result is stored (`t_hat`), not immediately inverse-NTT'd.
fn row_dot_tomont<const K: usize>(row: &PolyVec<K>, vec_hat: &PolyVec<K>) -> Poly {
    let mut acc = polyvec::basemul_acc_montgomery(row, vec_hat);
    poly::tomont(&mut acc);
    acc
}

/// `K-PKE.KeyGen`: spec §4.6. Writes `ek_pke = polyvec_tobytes(t_hat) || rho`
/// (`384*K + 32` bytes) and `dk_pke = polyvec_tobytes(s_hat)` (`384*K` bytes).
pub(crate) fn keypair<const K: usize, const ETA1_BYTES: usize>(
    d: &[u8; 32], eta1: u32, ek_pke: &mut [u8], dk_pke: &mut [u8],
) {
    debug_assert_eq!(ek_pke.len(), 384 * K + 32);
    debug_assert_eq!(dk_pke.len(), 384 * K);

    let mut seed = [0u8; 33];
    seed[..32].copy_from_slice(d);
    seed[32] = K as u8;
    let (rho, sigma) = sha3_512_g(&[&seed]);

    let a_hat = gen_matrix::<K>(&rho, false);

    let mut nonce = 0u8;
    let mut s: PolyVec<K> = core::array::from_fn(|_| {
        let buf: [u8; ETA1_BYTES] = prf(&sigma, nonce);
        nonce += 1;
        cbd(eta1, &buf)
    });
    let mut e: PolyVec<K> = core::array::from_fn(|_| {
        let buf: [u8; ETA1_BYTES] = prf(&sigma, nonce);
        nonce += 1;
        cbd(eta1, &buf)
    });
    polyvec::ntt(&mut s);
    polyvec::ntt(&mut e);

    let mut t_hat: PolyVec<K> = core::array::from_fn(|i| row_dot_tomont(&a_hat[i], &s));
    t_hat = polyvec::add(&t_hat, &e);
    polyvec::reduce(&mut t_hat);

    polyvec::tobytes(&t_hat, &mut ek_pke[..384 * K]);
    ek_pke[384 * K..].copy_from_slice(&rho);
    polyvec::tobytes(&s, dk_pke);

    s.zeroize();
    e.zeroize();
    t_hat.zeroize();
}

/// `K-PKE.Encrypt`: spec §4.6. `ct = polyvec_compress(u) || poly_compress(v)`.
#[allow(clippy::too_many_arguments)]
pub(crate) fn encrypt<const K: usize, const ETA1_BYTES: usize, const ETA2_BYTES: usize>(
    du: u32, dv: u32, eta1: u32, eta2: u32, ek_pke: &[u8], msg: &[u8; 32], coins: &[u8; 32],
    ct: &mut [u8],
) {
    debug_assert_eq!(ek_pke.len(), 384 * K + 32);

    let t_hat: PolyVec<K> = polyvec::frombytes(&ek_pke[..384 * K]);
    let rho: &[u8; 32] = ek_pke[384 * K..384 * K + 32].try_into().unwrap();
    let at_hat = gen_matrix::<K>(rho, true);

    let mut nonce = 0u8;
    let mut r: PolyVec<K> = core::array::from_fn(|_| {
        let buf: [u8; ETA1_BYTES] = prf(coins, nonce);
        nonce += 1;
        cbd(eta1, &buf)
    });
    let e1: PolyVec<K> = core::array::from_fn(|_| {
        let buf: [u8; ETA2_BYTES] = prf(coins, nonce);
        nonce += 1;
        cbd(eta2, &buf)
    });
    let e2_buf: [u8; ETA2_BYTES] = prf(coins, nonce);
    let e2 = cbd(eta2, &e2_buf);

    polyvec::ntt(&mut r);

    let mut u: PolyVec<K> = core::array::from_fn(|i| {
        let mut p = polyvec::basemul_acc_montgomery(&at_hat[i], &r);
        invntt(&mut p);
        p
    });
    u = polyvec::add(&u, &e1);
    polyvec::reduce(&mut u);

    let mu = poly::frommsg(msg);
    let mut v = polyvec::basemul_acc_montgomery(&t_hat, &r);
    invntt(&mut v);
    v = poly::add(&poly::add(&v, &e2), &mu);
    poly::reduce(&mut v);

    let u_bytes_len = 32 * du as usize * K;
    polyvec::compress(du, &u, &mut ct[..u_bytes_len]);
    let v_compressed = poly::compress(dv, &v);
    poly::pack_bits(dv, &v_compressed, &mut ct[u_bytes_len..]);

    r.zeroize();
    u.zeroize();
}

/// `K-PKE.Decrypt`: spec §4.6. Returns the recovered 32-byte message.
pub(crate) fn decrypt<const K: usize>(du: u32, dv: u32, dk_pke: &[u8], ct: &[u8]) -> [u8; 32] {
    debug_assert_eq!(dk_pke.len(), 384 * K);
    let u_bytes_len = 32 * du as usize * K;

    let mut u: PolyVec<K> = polyvec::decompress(du, &ct[..u_bytes_len]);
    let v_vals = poly::unpack_bits(dv, &ct[u_bytes_len..]);
    let v = poly::decompress(dv, &v_vals);

    let s_hat: PolyVec<K> = polyvec::frombytes(dk_pke);

    polyvec::ntt(&mut u);
    let mut w = polyvec::basemul_acc_montgomery(&s_hat, &u);
    invntt(&mut w);
    w = poly::sub(&v, &w);
    poly::reduce(&mut w);

    poly::tomsg(&w)
}

#[cfg(test)]
mod tests {
    use super::{decrypt, encrypt, keypair};

    const K: usize = 2;
    const ETA1: u32 = 3;
    const ETA2: u32 = 2;
    const ETA1_BYTES: usize = 64 * 3;
    const ETA2_BYTES: usize = 64 * 2;
    const DU: u32 = 10;
    const DV: u32 = 4;
    const EK_LEN: usize = 800;
    const DK_LEN: usize = 768;
    const CT_LEN: usize = 768;

    #[test]
    fn encrypt_then_decrypt_recovers_message() {
        let d = [3u8; 32];
        let mut ek = [0u8; EK_LEN];
        let mut dk = [0u8; DK_LEN];
        keypair::<K, ETA1_BYTES>(&d, ETA1, &mut ek, &mut dk);

        let msg = [0x42u8; 32];
        let coins = [9u8; 32];
        let mut ct = [0u8; CT_LEN];
        encrypt::<K, ETA1_BYTES, ETA2_BYTES>(DU, DV, ETA1, ETA2, &ek, &msg, &coins, &mut ct);

        let recovered = decrypt::<K>(DU, DV, &dk, &ct);
        assert_eq!(recovered, msg);
    }

    #[test]
    fn distinct_coins_give_distinct_ciphertexts() {
        let d = [1u8; 32];
        let mut ek = [0u8; EK_LEN];
        let mut dk = [0u8; DK_LEN];
        keypair::<K, ETA1_BYTES>(&d, ETA1, &mut ek, &mut dk);
        let msg = [0u8; 32];

        let mut ct_a = [0u8; CT_LEN];
        encrypt::<K, ETA1_BYTES, ETA2_BYTES>(DU, DV, ETA1, ETA2, &ek, &msg, &[1u8; 32], &mut ct_a);
        let mut ct_b = [0u8; CT_LEN];
        encrypt::<K, ETA1_BYTES, ETA2_BYTES>(DU, DV, ETA1, ETA2, &ek, &msg, &[2u8; 32], &mut ct_b);
        assert_ne!(ct_a, ct_b);
    }
}
