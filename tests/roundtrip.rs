//! End-to-end exercises of each parameter set's `KeyGen` / `Encaps` / `Decaps` / `SerDes`
//! trait implementations, plus the implicit-rejection behavior FIPS 203 requires on a
//! tampered ciphertext.

use fips203::traits::{Decaps, Encaps, KeyGen, SerDes};

macro_rules! round_trip_tests {
    ($mod_name:ident, $variant:ident) => {
        mod $variant {
            use super::*;
            use fips203::$mod_name;

            #[test]
            fn originator_and_remote_party_agree() {
                let (ek, dk) = $mod_name::KG::try_keygen().unwrap();
                let ek_bytes = ek.into_bytes();

                let ek_remote = $mod_name::EncapsKey::try_from_bytes(ek_bytes).unwrap();
                let (ssk_remote, ct) = ek_remote.try_encaps().unwrap();
                let ct_bytes = ct.into_bytes();

                let ct_originator = $mod_name::CipherText::try_from_bytes(ct_bytes).unwrap();
                let ssk_originator = dk.try_decaps(&ct_originator).unwrap();

                assert_eq!(ssk_originator, ssk_remote);
            }

            #[test]
            fn keygen_from_seed_is_deterministic() {
                let d = [0x11u8; 32];
                let z = [0x22u8; 32];
                let (ek_a, dk_a) = $mod_name::KG::keygen_from_seed(d, z);
                let (ek_b, dk_b) = $mod_name::KG::keygen_from_seed(d, z);
                assert_eq!(ek_a.into_bytes(), ek_b.into_bytes());
                assert_eq!(dk_a.into_bytes(), dk_b.into_bytes());
            }

            #[test]
            fn encaps_from_seed_is_deterministic() {
                let (ek, dk) = $mod_name::KG::keygen_from_seed([3u8; 32], [4u8; 32]);
                let seed = [7u8; 32];
                let (ssk_a, ct_a) = ek.encaps_from_seed(&seed);
                let (ssk_b, ct_b) = ek.encaps_from_seed(&seed);
                assert_eq!(ssk_a, ssk_b);
                assert_eq!(dk.try_decaps(&ct_b).unwrap(), ssk_a);
                assert_eq!(ct_a.into_bytes(), ct_b.into_bytes());
            }

            #[test]
            fn validate_keypair_accepts_matching_pair_and_rejects_mismatch() {
                use rand_core::OsRng;
                let (ek1, dk1) = $mod_name::KG::try_keygen().unwrap();
                let (ek2, _dk2) = $mod_name::KG::try_keygen().unwrap();

                assert!($mod_name::KG::validate_keypair_with_rng_vartime(
                    &mut OsRng,
                    &ek1.clone().into_bytes(),
                    &dk1.clone().into_bytes(),
                ));
                assert!(!$mod_name::KG::validate_keypair_with_rng_vartime(
                    &mut OsRng,
                    &ek2.into_bytes(),
                    &dk1.into_bytes(),
                ));
            }

            #[test]
            fn tampered_ciphertext_still_decapsulates_but_to_a_different_secret() {
                let (ek, dk) = $mod_name::KG::try_keygen().unwrap();
                let (ssk, ct) = ek.try_encaps().unwrap();

                let mut ct_bytes = ct.into_bytes();
                ct_bytes[0] ^= 0x01;
                let tampered = $mod_name::CipherText::try_from_bytes(ct_bytes).unwrap();

                // FIPS 203's implicit-rejection decapsulation never errors on a
                // tampered ciphertext; it silently returns an unrelated secret.
                let rejected = dk.try_decaps(&tampered).unwrap();
                assert_ne!(rejected, ssk);
            }

            #[test]
            fn encapsulation_key_failing_the_modulus_check_is_rejected() {
                let (ek, _dk) = $mod_name::KG::try_keygen().unwrap();
                let mut ek_bytes = ek.into_bytes();
                // Coefficient bytes occupy everything but the trailing 32-byte rho;
                // 0xff 0x0f encodes 0xfff = 4095 >= Q, which must fail the check.
                ek_bytes[0] = 0xff;
                ek_bytes[1] = 0x0f;
                assert!($mod_name::EncapsKey::try_from_bytes(ek_bytes).is_err());
            }
        }
    };
}

#[cfg(feature = "ml-kem-512")]
round_trip_tests!(ml_kem_512, ml_kem_512_tests);
#[cfg(feature = "ml-kem-768")]
round_trip_tests!(ml_kem_768, ml_kem_768_tests);
#[cfg(feature = "ml-kem-1024")]
round_trip_tests!(ml_kem_1024, ml_kem_1024_tests);
