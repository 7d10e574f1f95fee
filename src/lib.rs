#![no_std]
#![deny(clippy::pedantic)]
#![deny(warnings)]
#![deny(missing_docs)]
#![doc = include_str!("../README.md")]

///
/// Implements FIPS 203 Module-Lattice-based Key-Encapsulation Mechanism Standard.
/// See <https://nvlpubs.nist.gov/nistpubs/FIPS/NIST.FIPS.203.pdf>
//
// Supports automatically clearing sensitive data on drop
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::traits::SerDes;

// Functionality map per FIPS 203
//
// Algorithm 4 ByteEncode_d(F) / Algorithm 5 ByteDecode_d(B)         --> poly.rs (pack_bits/unpack_bits)
// Algorithm 6 SampleNTT(B)                                         --> indcpa.rs (rej_uniform)
// Algorithm 7 SamplePolyCBD_eta(B)                                  --> cbd.rs
// Algorithm 8 NTT(f) / Algorithm 9 NTT^-1(f_hat)                   --> ntt.rs
// Algorithm 10 MultiplyNTTs / Algorithm 11 BaseCaseMultiply         --> ntt.rs
// Algorithm 12 K-PKE.KeyGen / 13 K-PKE.Encrypt / 14 K-PKE.Decrypt   --> indcpa.rs
// Algorithm 15 ML-KEM.KeyGen / 16 ML-KEM.Encaps / 17 ML-KEM.Decaps  --> kem.rs
// PRF, XOF, G, H, J                                                --> symmetric.rs
// Compress / Decompress                                            --> poly.rs
// Montgomery / Barrett reduction                                   --> reduce.rs
//
// The three parameter sets are modules in this file with injected macro code
// that connects them into the functionality in kem.rs.

mod cbd;
mod indcpa;
mod kem;
mod ntt;
mod poly;
mod polyvec;
mod reduce;
mod symmetric;

/// All functionality is covered by traits, such that consumers can utilize trait objects as desired.
pub mod traits;

// Relevant to all parameter sets
const Q: i16 = 3329;
const ZETA: i16 = 17;

/// Shared Secret Key Length for all ML-KEM variants (in bytes)
pub const SSK_LEN: usize = 32;

/// The (opaque) secret key that can be de/serialized by each party.
#[derive(Clone, Debug, Zeroize, ZeroizeOnDrop)]
pub struct SharedSecretKey([u8; SSK_LEN]);

impl SerDes for SharedSecretKey {
    type ByteArray = [u8; SSK_LEN];

    fn into_bytes(self) -> Self::ByteArray { self.0 }

    fn try_from_bytes(ssk: Self::ByteArray) -> Result<Self, &'static str> {
        // Not really needed but provided for symmetry.
        // No opportunity for validation, but using a Result for a future possibility
        Ok(SharedSecretKey(ssk))
    }
}


// Conservative (constant-time) paranoia...
impl PartialEq for SharedSecretKey {
    fn eq(&self, other: &Self) -> bool {
        let mut result = true;
        for i in 0..self.0.len() {
            result &= self.0[i] == other.0[i];
        }
        result
    }
}


// This common functionality is injected into each parameter set module
macro_rules! functionality {
    () => {
        const ETA1_BYTES: usize = ETA1 as usize * 64; // Rust does not allow expressions involving
        const ETA2_BYTES: usize = ETA2 as usize * 64; // outer consts directly in generics yet.

        use crate::kem::{decaps, encaps, key_gen, key_gen_from_seed};
        use crate::symmetric::sha3_256;
        use crate::traits::{Decaps, Encaps, KeyGen, SerDes};
        use crate::SharedSecretKey;
        use rand_core::CryptoRngCore;
        use zeroize::{Zeroize, ZeroizeOnDrop};

        /// Correctly sized encapsulation key specific to the target security parameter set.
        #[derive(Clone, Zeroize, ZeroizeOnDrop)]
        pub struct EncapsKey([u8; EK_LEN]);

        /// Correctly sized decapsulation key specific to the target security parameter set.
        #[derive(Clone, Zeroize, ZeroizeOnDrop)]
        pub struct DecapsKey([u8; DK_LEN]);

        /// Correctly sized ciphertext specific to the target security parameter set.
        #[derive(Clone, Zeroize, ZeroizeOnDrop)]
        pub struct CipherText([u8; CT_LEN]);

        /// Per FIPS 203, the key generation algorithm `ML-KEM.KeyGen` (Algorithm 15) accepts no
        /// input, utilizes randomness, and produces an encapsulation key and a decapsulation key.
        /// The encapsulation key can be made public; the decapsulation key must remain private.
        /// Both outputs are opaque structs specific to this parameter set.
        pub struct KG();

        impl KeyGen for KG {
            type DecapsByteArray = [u8; DK_LEN];
            type DecapsKey = DecapsKey;
            type EncapsByteArray = [u8; EK_LEN];
            type EncapsKey = EncapsKey;

            fn try_keygen_with_rng(
                rng: &mut impl CryptoRngCore,
            ) -> Result<(EncapsKey, DecapsKey), &'static str> {
                let (mut ek, mut dk) = ([0u8; EK_LEN], [0u8; DK_LEN]);
                key_gen::<K, ETA1_BYTES>(rng, ETA1, &mut ek, &mut dk)?;
                Ok((EncapsKey(ek), DecapsKey(dk)))
            }

            fn keygen_from_seed(d: [u8; 32], z: [u8; 32]) -> (EncapsKey, DecapsKey) {
                let (mut ek, mut dk) = ([0u8; EK_LEN], [0u8; DK_LEN]);
                key_gen_from_seed::<K, ETA1_BYTES>(&d, &z, ETA1, &mut ek, &mut dk);
                (EncapsKey(ek), DecapsKey(dk))
            }

            fn validate_keypair_with_rng_vartime(
                _rng: &mut impl CryptoRngCore, ek: &Self::EncapsByteArray, dk: &Self::DecapsByteArray,
            ) -> bool {
                let len_ek_pke = 384 * K + 32;
                let len_dk_pke = 384 * K;
                let same_ek = *ek == dk[len_dk_pke..(len_dk_pke + len_ek_pke)];
                let same_h =
                    sha3_256(ek) == dk[(len_dk_pke + len_ek_pke)..(len_dk_pke + len_ek_pke + 32)];
                same_ek & same_h
            }
        }

        impl Encaps for EncapsKey {
            type CipherText = CipherText;
            type SharedSecretKey = SharedSecretKey;

            fn try_encaps_with_rng(
                &self, rng: &mut impl CryptoRngCore,
            ) -> Result<(Self::SharedSecretKey, Self::CipherText), &'static str> {
                let mut ct = [0u8; CT_LEN];
                let ssk =
                    encaps::<K, ETA1_BYTES, ETA2_BYTES>(rng, DU, DV, ETA1, ETA2, &self.0, &mut ct)?;
                Ok((ssk, CipherText(ct)))
            }
        }

        impl Decaps for DecapsKey {
            type CipherText = CipherText;
            type SharedSecretKey = SharedSecretKey;

            fn try_decaps(&self, ct: &CipherText) -> Result<SharedSecretKey, &'static str> {
                decaps::<K, ETA1_BYTES, ETA2_BYTES, CT_LEN>(DU, DV, ETA1, ETA2, &self.0, &ct.0)
            }
        }

        impl SerDes for EncapsKey {
            type ByteArray = [u8; EK_LEN];

            fn into_bytes(self) -> Self::ByteArray { self.0 }

            fn try_from_bytes(ek: Self::ByteArray) -> Result<Self, &'static str> {
                // Per FIPS 203 page 2, the encapsulation key must correctly decode to an array of
                // integers modulo q without any modular reductions (the "Modulus check").
                for chunk in ek[..384 * K].chunks_exact(384) {
                    let arr: &[u8; 384] = chunk.try_into().unwrap();
                    let vals = crate::poly::frombytes(arr);
                    if vals.iter().any(|c| *c >= crate::Q) {
                        return Err("ML-KEM: encapsulation key fails modulus check");
                    }
                }
                Ok(EncapsKey(ek))
            }
        }

        impl SerDes for DecapsKey {
            type ByteArray = [u8; DK_LEN];

            fn into_bytes(self) -> Self::ByteArray { self.0 }

            fn try_from_bytes(dk: Self::ByteArray) -> Result<Self, &'static str> { Ok(DecapsKey(dk)) }
        }

        impl SerDes for CipherText {
            type ByteArray = [u8; CT_LEN];

            fn into_bytes(self) -> Self::ByteArray { self.0 }

            fn try_from_bytes(ct: Self::ByteArray) -> Result<Self, &'static str> { Ok(CipherText(ct)) }
        }
    };
}


/// Functionality for the ML-KEM-512 security parameter set, claimed security category 1.
#[cfg(feature = "ml-kem-512")]
pub mod ml_kem_512 {
    //!
    //! See <https://nvlpubs.nist.gov/nistpubs/FIPS/NIST.FIPS.203.pdf>
    //!
    //! Typical usage flow entails:
    //! 1. The originator runs `KG::try_keygen()` to get an encaps key `ek` and decaps key `dk`.
    //! 2. The originator serializes the encaps key via `ek.into_bytes()` and sends it to the remote party.
    //! 3. The remote party deserializes the bytes via `EncapsKey::try_from_bytes(..)` and runs
    //!    `try_encaps()` to get a shared secret key `ssk` and ciphertext `ct`.
    //! 4. The remote party serializes the ciphertext via `ct.into_bytes()` and sends it to the originator.
    //! 5. The originator deserializes the ciphertext via `CipherText::try_from_bytes(..)` then runs
    //!    `dk.try_decaps(&ct)` to recover the same shared secret key `ssk`.

    const K: usize = 2;
    const ETA1: u32 = 3;
    const ETA2: u32 = 2;
    const DU: u32 = 10;
    const DV: u32 = 4;

    /// Serialized Encapsulation Key Length (in bytes)
    pub const EK_LEN: usize = 800;
    /// Serialized Decapsulation Key Length (in bytes)
    pub const DK_LEN: usize = 1632;
    /// Serialized Ciphertext Length (in bytes)
    pub const CT_LEN: usize = 768;

    functionality!();
}


/// Functionality for the ML-KEM-768 security parameter set, claimed security category 3.
#[cfg(feature = "ml-kem-768")]
pub mod ml_kem_768 {
    //!
    //! See <https://nvlpubs.nist.gov/nistpubs/FIPS/NIST.FIPS.203.pdf>
    //!
    //! Typical usage flow entails:
    //! 1. The originator runs `KG::try_keygen()` to get an encaps key `ek` and decaps key `dk`.
    //! 2. The originator serializes the encaps key via `ek.into_bytes()` and sends it to the remote party.
    //! 3. The remote party deserializes the bytes via `EncapsKey::try_from_bytes(..)` and runs
    //!    `try_encaps()` to get a shared secret key `ssk` and ciphertext `ct`.
    //! 4. The remote party serializes the ciphertext via `ct.into_bytes()` and sends it to the originator.
    //! 5. The originator deserializes the ciphertext via `CipherText::try_from_bytes(..)` then runs
    //!    `dk.try_decaps(&ct)` to recover the same shared secret key `ssk`.

    const K: usize = 3;
    const ETA1: u32 = 2;
    const ETA2: u32 = 2;
    const DU: u32 = 10;
    const DV: u32 = 4;

    /// Serialized Encapsulation Key Length (in bytes)
    pub const EK_LEN: usize = 1184;
    /// Serialized Decapsulation Key Length (in bytes)
    pub const DK_LEN: usize = 2400;
    /// Serialized Ciphertext Length (in bytes)
    pub const CT_LEN: usize = 1088;

    functionality!();
}


/// Functionality for the ML-KEM-1024 security parameter set, claimed security category 5.
#[cfg(feature = "ml-kem-1024")]
pub mod ml_kem_1024 {
    //!
    //! See <https://nvlpubs.nist.gov/nistpubs/FIPS/NIST.FIPS.203.pdf>
    //!
    //! Typical usage flow entails:
    //! 1. The originator runs `KG::try_keygen()` to get an encaps key `ek` and decaps key `dk`.
    //! 2. The originator serializes the encaps key via `ek.into_bytes()` and sends it to the remote party.
    //! 3. The remote party deserializes the bytes via `EncapsKey::try_from_bytes(..)` and runs
    //!    `try_encaps()` to get a shared secret key `ssk` and ciphertext `ct`.
    //! 4. The remote party serializes the ciphertext via `ct.into_bytes()` and sends it to the originator.
    //! 5. The originator deserializes the ciphertext via `CipherText::try_from_bytes(..)` then runs
    //!    `dk.try_decaps(&ct)` to recover the same shared secret key `ssk`.

    const K: usize = 4;
    const ETA1: u32 = 2;
    const ETA2: u32 = 2;
    const DU: u32 = 11;
    const DV: u32 = 5;

    /// Serialized Encapsulation Key Length (in bytes)
    pub const EK_LEN: usize = 1568;
    /// Serialized Decapsulation Key Length (in bytes)
    pub const DK_LEN: usize = 3168;
    /// Serialized Ciphertext Length (in bytes)
    pub const CT_LEN: usize = 1568;

    functionality!();
}
