//! K-vector polynomial arithmetic atop `poly`, spec §4.5.

use crate::ntt::poly_basemul;
use crate::poly::{self, Poly};

pub(crate) type PolyVec<const K: usize> = [Poly; K];

#[must_use]
pub(crate) fn add<const K: usize>(a: &PolyVec<K>, b: &PolyVec<K>) -> PolyVec<K> {
    core::array::from_fn(|i| poly::add(&a[i], &b[i]))
}

pub(crate) fn reduce<const K: usize>(a: &mut PolyVec<K>) {
    for p in a.iter_mut() {
        poly::reduce(p);
    }
}

/// `basemul_acc_montgomery(a, b) = sum_k basemul(a[k], b[k])`, Barrett-reduced.
/// Computes a dot product of two NTT-domain polyvecs down to a single polynomial,
/// used for `A . s_hat` (one lane at a time) and `t_hat^T . r_hat`.
#[must_use]
pub(crate) fn basemul_acc_montgomery<const K: usize>(a: &PolyVec<K>, b: &PolyVec<K>) -> Poly {
    let mut acc = poly_basemul(&a[0], &b[0]);
    for k in 1..K {
        acc = poly::add(&acc, &poly_basemul(&a[k], &b[k]));
    }
    poly::reduce(&mut acc);
    acc
}

pub(crate) fn ntt<const K: usize>(a: &mut PolyVec<K>) {
    for p in a.iter_mut() {
        crate::ntt::ntt(p);
    }
}

/// Compresses each lane at `d` bits/coefficient into `K * 32 * d` bytes.
pub(crate) fn compress<const K: usize>(d: u32, a: &PolyVec<K>, out: &mut [u8]) {
    let step = 32 * d as usize;
    debug_assert_eq!(out.len(), K * step);
    for (i, chunk) in out.chunks_mut(step).enumerate() {
        let c = poly::compress(d, &a[i]);
        poly::pack_bits(d, &c, chunk);
    }
}

/// Inverse of [`compress`].
#[must_use]
pub(crate) fn decompress<const K: usize>(d: u32, bytes: &[u8]) -> PolyVec<K> {
    let step = 32 * d as usize;
    debug_assert_eq!(bytes.len(), K * step);
    core::array::from_fn(|i| {
        let vals = poly::unpack_bits(d, &bytes[i * step..(i + 1) * step]);
        poly::decompress(d, &vals)
    })
}

/// Packs each lane as 384 uncompressed bytes (`K * 384` total).
pub(crate) fn tobytes<const K: usize>(a: &PolyVec<K>, out: &mut [u8]) {
    debug_assert_eq!(out.len(), K * 384);
    for (i, chunk) in out.chunks_mut(384).enumerate() {
        let arr: &mut [u8; 384] = chunk.try_into().unwrap();
        poly::tobytes(&a[i], arr);
    }
}

/// Inverse of [`tobytes`]. No reduction is performed, matching `poly::frombytes`.
#[must_use]
pub(crate) fn frombytes<const K: usize>(bytes: &[u8]) -> PolyVec<K> {
    debug_assert_eq!(bytes.len(), K * 384);
    core::array::from_fn(|i| {
        let arr: &[u8; 384] = bytes[i * 384..(i + 1) * 384].try_into().unwrap();
        poly::frombytes(arr)
    })
}

#[cfg(test)]
mod tests {
    use super::{decompress, tobytes};
    use crate::poly;

    #[test]
    fn tobytes_round_trips_through_frombytes() {
        let mut pv: super::PolyVec<3> = [[0i16; 256]; 3];
        for (k, p) in pv.iter_mut().enumerate() {
            for (i, c) in p.iter_mut().enumerate() {
                *c = ((i + 37 * k) as i16 * 11) % 3329;
            }
        }
        let mut bytes = [0u8; 3 * 384];
        tobytes(&pv, &mut bytes);
        let back: super::PolyVec<3> = super::frombytes(&bytes);
        assert_eq!(pv, back);
    }

    #[test]
    fn compress_decompress_round_trip_is_idempotent() {
        let mut bytes = [0u8; 2 * 32 * 10];
        for (i, b) in bytes.iter_mut().enumerate() {
            *b = (i * 13) as u8;
        }
        let pv: super::PolyVec<2> = decompress(10, &bytes);
        let mut recompressed = [0u8; 2 * 32 * 10];
        super::compress(10, &pv, &mut recompressed);
        let pv2: super::PolyVec<2> = decompress(10, &recompressed);
        for k in 0..2 {
            let mut a = pv[k];
            let mut b = pv2[k];
            poly::reduce(&mut a);
            poly::reduce(&mut b);
            assert_eq!(a, b);
        }
    }
}
