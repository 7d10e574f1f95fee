//! Symmetric glue consumed (not defined) by the lattice core: SHA3-256, SHA3-512,
//! a SHAKE128-backed XOF state for matrix expansion, and a SHAKE256-backed PRF /
//! multi-input hash. See spec §4.8.

use sha3::digest::{ExtendableOutput, Update, XofReader};
use sha3::{Digest, Sha3_256, Sha3_512, Shake128, Shake256};

/// `SHA3-256(in) -> 32 bytes`. Used as `H` in the FO transform (spec §4.7) and to bind
/// the public key hash carried inside the KEM secret key (spec §3).
#[must_use]
pub(crate) fn sha3_256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha3_256::new();
    Digest::update(&mut hasher, data);
    hasher.finalize().into()
}

/// `SHA3-512(in) -> 64 bytes`, split into two 32-byte halves. Used to derive
/// `(rho, sigma)` at key-gen and `(Kbar, r)` / `(Kbar', r')` at encapsulate/decapsulate.
#[must_use]
pub(crate) fn sha3_512_g(inputs: &[&[u8]]) -> ([u8; 32], [u8; 32]) {
    let mut hasher = Sha3_512::new();
    for chunk in inputs {
        Digest::update(&mut hasher, chunk);
    }
    let digest = hasher.finalize();
    let mut a = [0u8; 32];
    let mut b = [0u8; 32];
    a.copy_from_slice(&digest[0..32]);
    b.copy_from_slice(&digest[32..64]);
    (a, b)
}

/// `PRF_eta(seed, nonce) -> 64*eta bytes` via `SHAKE256(seed ‖ nonce)`, feeding the
/// centered binomial sampler. Spec §4.4/§4.8.
pub(crate) fn prf<const OUT_LEN: usize>(seed: &[u8; 32], nonce: u8) -> [u8; OUT_LEN] {
    let mut hasher = Shake256::default();
    hasher.update(seed);
    hasher.update(&[nonce]);
    let mut reader = hasher.finalize_xof();
    let mut out = [0u8; OUT_LEN];
    reader.read(&mut out);
    out
}

/// Implicit-rejection PRF: `SHAKE256(z ‖ ct, 32)`. This is the `rkprf` collaborator
/// named in spec §2/§4.7, producing the fallback shared secret on a failed
/// re-encryption check.
#[must_use]
pub(crate) fn rkprf(z: &[u8; 32], ct: &[u8]) -> [u8; 32] {
    let mut hasher = Shake256::default();
    hasher.update(z);
    hasher.update(ct);
    let mut reader = hasher.finalize_xof();
    let mut out = [0u8; 32];
    reader.read(&mut out);
    out
}

/// A single-use SHAKE128 XOF state absorbing `rho ‖ x ‖ y`, squeezed in 168-byte
/// blocks while expanding a matrix entry via rejection sampling (spec §4.4/§4.9).
/// The `{init, absorbed, squeezing, closed}` state machine of spec §4.9 is modeled by
/// Rust ownership: construction performs init+absorb, repeated `squeeze_block` calls
/// are the squeezing state, and the underlying resource is released on drop (close).
pub(crate) struct Xof128 {
    reader: <Shake128 as ExtendableOutput>::Reader,
}

/// Bytes squeezed per SHAKE128 block, per spec §4.4.
pub(crate) const XOF_BLOCK_BYTES: usize = 168;

impl Xof128 {
    pub(crate) fn new(rho: &[u8; 32], x: u8, y: u8) -> Self {
        let mut hasher = Shake128::default();
        hasher.update(rho);
        hasher.update(&[x]);
        hasher.update(&[y]);
        Xof128 { reader: hasher.finalize_xof() }
    }

    pub(crate) fn squeeze_block(&mut self, out: &mut [u8; XOF_BLOCK_BYTES]) {
        self.reader.read(out);
    }
}

#[cfg(test)]
mod tests {
    use super::{prf, rkprf, sha3_256, sha3_512_g, Xof128, XOF_BLOCK_BYTES};

    #[test]
    fn hashes_are_deterministic_and_distinct_by_nonce() {
        let seed = [7u8; 32];
        assert_eq!(sha3_256(&seed), sha3_256(&seed));
        let p0: [u8; 64] = prf(&seed, 0);
        let p1: [u8; 64] = prf(&seed, 1);
        assert_ne!(p0, p1);

        let (a, b) = sha3_512_g(&[&seed, &[1u8]]);
        let (a2, b2) = sha3_512_g(&[&seed, &[1u8]]);
        assert_eq!(a, a2);
        assert_eq!(b, b2);
        assert_ne!(a, b);
    }

    #[test]
    fn rkprf_depends_on_both_inputs() {
        let z = [1u8; 32];
        let ct = [2u8; 16];
        let a = rkprf(&z, &ct);
        let b = rkprf(&z, &[3u8; 16]);
        assert_ne!(a, b);
    }

    #[test]
    fn xof_squeezes_independent_blocks() {
        let rho = [9u8; 32];
        let mut xof = Xof128::new(&rho, 0, 1);
        let mut b0 = [0u8; XOF_BLOCK_BYTES];
        let mut b1 = [0u8; XOF_BLOCK_BYTES];
        xof.squeeze_block(&mut b0);
        xof.squeeze_block(&mut b1);
        assert_ne!(b0, b1);
    }
}
