//! Fujisaki-Okamoto transform: lifts `indcpa`'s IND-CPA scheme to an IND-CCA2 KEM
//! via implicit rejection. Spec §4.7.

use crate::indcpa;
use crate::symmetric::{rkprf, sha3_256, sha3_512_g};
use crate::traits::SerDes;
use crate::SharedSecretKey;
use rand_core::CryptoRngCore;
use subtle::{ConditionallySelectable, ConstantTimeEq};

/// `ML-KEM.KeyGen`: spec §4.7. `dk = dk_pke || ek || H(ek) || z`, spec §3.
pub(crate) fn key_gen<const K: usize, const ETA1_BYTES: usize>(
    rng: &mut impl CryptoRngCore, eta1: u32, ek: &mut [u8], dk: &mut [u8],
) -> Result<(), &'static str> {
    let dk_pke_len = 384 * K;
    let ek_len = ek.len();
    if dk.len() != dk_pke_len + ek_len + 64 {
        return Err("ML-KEM: decapsulation key buffer has the wrong length");
    }

    let mut d = [0u8; 32];
    let mut z = [0u8; 32];
    rng.try_fill_bytes(&mut d).map_err(|_| "ML-KEM: RNG failure drawing d")?;
    rng.try_fill_bytes(&mut z).map_err(|_| "ML-KEM: RNG failure drawing z")?;

    indcpa::keypair::<K, ETA1_BYTES>(&d, eta1, ek, &mut dk[..dk_pke_len]);

    let h_ek = sha3_256(ek);
    dk[dk_pke_len..dk_pke_len + ek_len].copy_from_slice(ek);
    dk[dk_pke_len + ek_len..dk_pke_len + ek_len + 32].copy_from_slice(&h_ek);
    dk[dk_pke_len + ek_len + 32..].copy_from_slice(&z);

    Ok(())
}

/// Deterministic variant of [`key_gen`] taking the `d`/`z` seeds directly, for
/// reproducible key derivation and test vectors.
pub(crate) fn key_gen_from_seed<const K: usize, const ETA1_BYTES: usize>(
    d: &[u8; 32], z: &[u8; 32], eta1: u32, ek: &mut [u8], dk: &mut [u8],
) {
    let dk_pke_len = 384 * K;
    let ek_len = ek.len();
    debug_assert_eq!(dk.len(), dk_pke_len + ek_len + 64);

    indcpa::keypair::<K, ETA1_BYTES>(d, eta1, ek, &mut dk[..dk_pke_len]);

    let h_ek = sha3_256(ek);
    dk[dk_pke_len..dk_pke_len + ek_len].copy_from_slice(ek);
    dk[dk_pke_len + ek_len..dk_pke_len + ek_len + 32].copy_from_slice(&h_ek);
    dk[dk_pke_len + ek_len + 32..].copy_from_slice(z);
}

/// `ML-KEM.Encaps`: spec §4.7. Draws randomness `m`, hashes it (`m = SHA3-256(m)`,
/// the FIPS 203 input-hashing step guarding against a low-entropy/adversarial RNG
/// leaking directly into the ciphertext), derives `(Kbar, r)` bound to `H(ek)`, and
/// runs `K-PKE.Encrypt` with `r` as the encryption coins.
pub(crate) fn encaps<const K: usize, const ETA1_BYTES: usize, const ETA2_BYTES: usize>(
    rng: &mut impl CryptoRngCore, du: u32, dv: u32, eta1: u32, eta2: u32, ek: &[u8], ct: &mut [u8],
) -> Result<SharedSecretKey, &'static str> {
    let mut m = [0u8; 32];
    rng.try_fill_bytes(&mut m).map_err(|_| "ML-KEM: RNG failure drawing encapsulation seed")?;
    let m = sha3_256(&m);

    let h_ek = sha3_256(ek);
    let (k_bar, r) = sha3_512_g(&[&m, &h_ek]);

    indcpa::encrypt::<K, ETA1_BYTES, ETA2_BYTES>(du, dv, eta1, eta2, ek, &m, &r, ct);

    SharedSecretKey::try_from_bytes(k_bar)
}

/// `ML-KEM.Decaps`: spec §4.7. Always returns a shared secret; on a mismatched
/// re-encryption, returns the implicit-rejection value `rkprf(z, ct)` instead of
/// signaling failure, so this function's timing and branching must not depend on
/// which of the two was selected.
pub(crate) fn decaps<const K: usize, const ETA1_BYTES: usize, const ETA2_BYTES: usize, const CT_LEN: usize>(
    du: u32, dv: u32, eta1: u32, eta2: u32, dk: &[u8], ct: &[u8; CT_LEN],
) -> Result<SharedSecretKey, &'static str> {
    let dk_pke_len = 384 * K;
    let ek_len = dk.len().checked_sub(dk_pke_len + 64).ok_or("ML-KEM: decapsulation key too short")?;

    let dk_pke = &dk[..dk_pke_len];
    let ek_pke = &dk[dk_pke_len..dk_pke_len + ek_len];
    let h = &dk[dk_pke_len + ek_len..dk_pke_len + ek_len + 32];
    let z: &[u8; 32] = dk[dk_pke_len + ek_len + 32..].try_into().map_err(|_| "ML-KEM: malformed decapsulation key")?;

    let m_prime = indcpa::decrypt::<K>(du, dv, dk_pke, ct);
    let (k_bar_prime, r_prime) = sha3_512_g(&[&m_prime, h]);
    let k_bar_reject = rkprf(z, ct);

    let mut ct_prime = [0u8; CT_LEN];
    indcpa::encrypt::<K, ETA1_BYTES, ETA2_BYTES>(du, dv, eta1, eta2, ek_pke, &m_prime, &r_prime, &mut ct_prime);

    let matches = ct_prime.ct_eq(ct);
    let mut shared = [0u8; 32];
    for i in 0..32 {
        shared[i] = u8::conditional_select(&k_bar_reject[i], &k_bar_prime[i], matches);
    }

    SharedSecretKey::try_from_bytes(shared)
}
