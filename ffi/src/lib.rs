//! C ABI surface over the `fips203` crate: one keygen/encaps/decaps triple per
//! algorithm, dispatched through an integer algorithm tag so callers can link a
//! single shared library against all three parameter sets.
//!
//! All functions return an `i32` status (`0` on success, negative on failure) rather
//! than panicking or propagating a Rust `Result` across the boundary. Buffers are
//! caller-allocated; callers must pass the exact length returned by the matching
//! `*_len` function for the chosen algorithm.

use fips203::traits::{Decaps, Encaps, KeyGen, SerDes};
use rand_core::OsRng;
use std::slice;

/// Selects which ML-KEM parameter set a call operates on.
#[repr(i32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MlKemAlgorithm {
    /// ML-KEM-512, security category 1.
    MlKem512 = 1,
    /// ML-KEM-768, security category 3.
    MlKem768 = 2,
    /// ML-KEM-1024, security category 5.
    MlKem1024 = 3,
}

/// Unrecognized algorithm tag passed across the FFI boundary.
const E_BAD_ALGORITHM: i32 = -1;
/// A caller-supplied buffer does not match the expected length for this algorithm.
const E_BAD_LENGTH: i32 = -2;
/// The underlying RNG or serialization/validation step failed.
const E_INTERNAL: i32 = -3;

fn algorithm_from_i32(alg: i32) -> Option<MlKemAlgorithm> {
    match alg {
        1 => Some(MlKemAlgorithm::MlKem512),
        2 => Some(MlKemAlgorithm::MlKem768),
        3 => Some(MlKemAlgorithm::MlKem1024),
        _ => None,
    }
}

/// Returns the encapsulation key length, in bytes, for `alg`, or `0` for an
/// unrecognized tag.
#[no_mangle]
pub extern "C" fn ml_kem_ek_len(alg: i32) -> usize {
    match algorithm_from_i32(alg) {
        #[cfg(feature = "ml-kem-512")]
        Some(MlKemAlgorithm::MlKem512) => fips203::ml_kem_512::EK_LEN,
        #[cfg(feature = "ml-kem-768")]
        Some(MlKemAlgorithm::MlKem768) => fips203::ml_kem_768::EK_LEN,
        #[cfg(feature = "ml-kem-1024")]
        Some(MlKemAlgorithm::MlKem1024) => fips203::ml_kem_1024::EK_LEN,
        _ => 0,
    }
}

/// Returns the decapsulation key length, in bytes, for `alg`, or `0` for an
/// unrecognized tag.
#[no_mangle]
pub extern "C" fn ml_kem_dk_len(alg: i32) -> usize {
    match algorithm_from_i32(alg) {
        #[cfg(feature = "ml-kem-512")]
        Some(MlKemAlgorithm::MlKem512) => fips203::ml_kem_512::DK_LEN,
        #[cfg(feature = "ml-kem-768")]
        Some(MlKemAlgorithm::MlKem768) => fips203::ml_kem_768::DK_LEN,
        #[cfg(feature = "ml-kem-1024")]
        Some(MlKemAlgorithm::MlKem1024) => fips203::ml_kem_1024::DK_LEN,
        _ => 0,
    }
}

/// Returns the ciphertext length, in bytes, for `alg`, or `0` for an unrecognized tag.
#[no_mangle]
pub extern "C" fn ml_kem_ct_len(alg: i32) -> usize {
    match algorithm_from_i32(alg) {
        #[cfg(feature = "ml-kem-512")]
        Some(MlKemAlgorithm::MlKem512) => fips203::ml_kem_512::CT_LEN,
        #[cfg(feature = "ml-kem-768")]
        Some(MlKemAlgorithm::MlKem768) => fips203::ml_kem_768::CT_LEN,
        #[cfg(feature = "ml-kem-1024")]
        Some(MlKemAlgorithm::MlKem1024) => fips203::ml_kem_1024::CT_LEN,
        _ => 0,
    }
}

/// Returns the shared secret length, in bytes (always 32), for any recognized `alg`.
#[no_mangle]
pub extern "C" fn ml_kem_ssk_len(alg: i32) -> usize {
    if algorithm_from_i32(alg).is_some() {
        fips203::SSK_LEN
    } else {
        0
    }
}

/// # Safety
/// `ek_out` must point to `ml_kem_ek_len(alg)` writable bytes, and `dk_out` to
/// `ml_kem_dk_len(alg)` writable bytes. Neither pointer may be null.
#[no_mangle]
pub unsafe extern "C" fn ml_kem_keygen(
    alg: i32, ek_out: *mut u8, ek_out_len: usize, dk_out: *mut u8, dk_out_len: usize,
) -> i32 {
    let Some(algorithm) = algorithm_from_i32(alg) else { return E_BAD_ALGORITHM };
    if ek_out.is_null() || dk_out.is_null() {
        return E_BAD_LENGTH;
    }

    macro_rules! keygen_for {
        ($m:ident) => {{
            if ek_out_len != fips203::$m::EK_LEN || dk_out_len != fips203::$m::DK_LEN {
                return E_BAD_LENGTH;
            }
            match fips203::$m::KG::try_keygen_with_rng(&mut OsRng) {
                Ok((ek, dk)) => {
                    let ek_bytes = ek.into_bytes();
                    let dk_bytes = dk.into_bytes();
                    let ek_slice = slice::from_raw_parts_mut(ek_out, ek_out_len);
                    let dk_slice = slice::from_raw_parts_mut(dk_out, dk_out_len);
                    ek_slice.copy_from_slice(&ek_bytes);
                    dk_slice.copy_from_slice(&dk_bytes);
                    0
                }
                Err(_) => E_INTERNAL,
            }
        }};
    }

    match algorithm {
        #[cfg(feature = "ml-kem-512")]
        MlKemAlgorithm::MlKem512 => keygen_for!(ml_kem_512),
        #[cfg(feature = "ml-kem-768")]
        MlKemAlgorithm::MlKem768 => keygen_for!(ml_kem_768),
        #[cfg(feature = "ml-kem-1024")]
        MlKemAlgorithm::MlKem1024 => keygen_for!(ml_kem_1024),
        #[allow(unreachable_patterns)]
        _ => E_BAD_ALGORITHM,
    }
}

/// # Safety
/// `ek` must point to `ek_len` readable bytes matching `ml_kem_ek_len(alg)`. `ct_out`
/// must point to `ml_kem_ct_len(alg)` writable bytes and `ss_out` to
/// `ml_kem_ssk_len(alg)` writable bytes. No pointer may be null.
#[no_mangle]
pub unsafe extern "C" fn ml_kem_encaps(
    alg: i32, ek: *const u8, ek_len: usize, ct_out: *mut u8, ct_out_len: usize, ss_out: *mut u8,
    ss_out_len: usize,
) -> i32 {
    let Some(algorithm) = algorithm_from_i32(alg) else { return E_BAD_ALGORITHM };
    if ek.is_null() || ct_out.is_null() || ss_out.is_null() {
        return E_BAD_LENGTH;
    }

    macro_rules! encaps_for {
        ($m:ident) => {{
            if ek_len != fips203::$m::EK_LEN
                || ct_out_len != fips203::$m::CT_LEN
                || ss_out_len != fips203::SSK_LEN
            {
                return E_BAD_LENGTH;
            }
            let ek_slice = slice::from_raw_parts(ek, ek_len);
            let mut ek_bytes = [0u8; fips203::$m::EK_LEN];
            ek_bytes.copy_from_slice(ek_slice);
            let Ok(ek_key) = fips203::$m::EncapsKey::try_from_bytes(ek_bytes) else {
                return E_INTERNAL;
            };
            match ek_key.try_encaps_with_rng(&mut OsRng) {
                Ok((ssk, ct)) => {
                    let ct_bytes = ct.into_bytes();
                    let ssk_bytes = ssk.into_bytes();
                    slice::from_raw_parts_mut(ct_out, ct_out_len).copy_from_slice(&ct_bytes);
                    slice::from_raw_parts_mut(ss_out, ss_out_len).copy_from_slice(&ssk_bytes);
                    0
                }
                Err(_) => E_INTERNAL,
            }
        }};
    }

    match algorithm {
        #[cfg(feature = "ml-kem-512")]
        MlKemAlgorithm::MlKem512 => encaps_for!(ml_kem_512),
        #[cfg(feature = "ml-kem-768")]
        MlKemAlgorithm::MlKem768 => encaps_for!(ml_kem_768),
        #[cfg(feature = "ml-kem-1024")]
        MlKemAlgorithm::MlKem1024 => encaps_for!(ml_kem_1024),
        #[allow(unreachable_patterns)]
        _ => E_BAD_ALGORITHM,
    }
}

/// # Safety
/// `dk` must point to `ml_kem_dk_len(alg)` readable bytes and `ct` to
/// `ml_kem_ct_len(alg)` readable bytes. `ss_out` must point to `ml_kem_ssk_len(alg)`
/// writable bytes. No pointer may be null.
#[no_mangle]
pub unsafe extern "C" fn ml_kem_decaps(
    alg: i32, dk: *const u8, dk_len: usize, ct: *const u8, ct_len: usize, ss_out: *mut u8,
    ss_out_len: usize,
) -> i32 {
    let Some(algorithm) = algorithm_from_i32(alg) else { return E_BAD_ALGORITHM };
    if dk.is_null() || ct.is_null() || ss_out.is_null() {
        return E_BAD_LENGTH;
    }

    macro_rules! decaps_for {
        ($m:ident) => {{
            if dk_len != fips203::$m::DK_LEN
                || ct_len != fips203::$m::CT_LEN
                || ss_out_len != fips203::SSK_LEN
            {
                return E_BAD_LENGTH;
            }
            let mut dk_bytes = [0u8; fips203::$m::DK_LEN];
            dk_bytes.copy_from_slice(slice::from_raw_parts(dk, dk_len));
            let mut ct_bytes = [0u8; fips203::$m::CT_LEN];
            ct_bytes.copy_from_slice(slice::from_raw_parts(ct, ct_len));
            let Ok(dk_key) = fips203::$m::DecapsKey::try_from_bytes(dk_bytes) else {
                return E_INTERNAL;
            };
            let Ok(ct_obj) = fips203::$m::CipherText::try_from_bytes(ct_bytes) else {
                return E_INTERNAL;
            };
            match dk_key.try_decaps(&ct_obj) {
                Ok(ssk) => {
                    let ssk_bytes = ssk.into_bytes();
                    slice::from_raw_parts_mut(ss_out, ss_out_len).copy_from_slice(&ssk_bytes);
                    0
                }
                Err(_) => E_INTERNAL,
            }
        }};
    }

    match algorithm {
        #[cfg(feature = "ml-kem-512")]
        MlKemAlgorithm::MlKem512 => decaps_for!(ml_kem_512),
        #[cfg(feature = "ml-kem-768")]
        MlKemAlgorithm::MlKem768 => decaps_for!(ml_kem_768),
        #[cfg(feature = "ml-kem-1024")]
        MlKemAlgorithm::MlKem1024 => decaps_for!(ml_kem_1024),
        #[allow(unreachable_patterns)]
        _ => E_BAD_ALGORITHM,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_through_the_c_abi() {
        let alg = MlKemAlgorithm::MlKem768 as i32;
        let ek_len = ml_kem_ek_len(alg);
        let dk_len = ml_kem_dk_len(alg);
        let ct_len = ml_kem_ct_len(alg);
        let ssk_len = ml_kem_ssk_len(alg);
        assert_eq!(ssk_len, 32);

        let mut ek = vec![0u8; ek_len];
        let mut dk = vec![0u8; dk_len];
        let status = unsafe {
            ml_kem_keygen(alg, ek.as_mut_ptr(), ek.len(), dk.as_mut_ptr(), dk.len())
        };
        assert_eq!(status, 0);

        let mut ct = vec![0u8; ct_len];
        let mut ss_a = vec![0u8; ssk_len];
        let status = unsafe {
            ml_kem_encaps(alg, ek.as_ptr(), ek.len(), ct.as_mut_ptr(), ct.len(), ss_a.as_mut_ptr(), ss_a.len())
        };
        assert_eq!(status, 0);

        let mut ss_b = vec![0u8; ssk_len];
        let status = unsafe {
            ml_kem_decaps(alg, dk.as_ptr(), dk.len(), ct.as_ptr(), ct.len(), ss_b.as_mut_ptr(), ss_b.len())
        };
        assert_eq!(status, 0);
        assert_eq!(ss_a, ss_b);
    }

    #[test]
    fn unrecognized_algorithm_is_rejected() {
        assert_eq!(ml_kem_ek_len(99), 0);
        let mut buf = [0u8; 1];
        let status = unsafe { ml_kem_keygen(99, buf.as_mut_ptr(), 1, buf.as_mut_ptr(), 1) };
        assert_eq!(status, E_BAD_ALGORITHM);
    }
}
