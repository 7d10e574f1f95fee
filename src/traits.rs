use rand_core::{CryptoRng, CryptoRngCore, RngCore};

#[cfg(feature = "default-rng")]
use rand_core::OsRng;


/// The `KeyGen` trait is defined to allow trait objects.
pub trait KeyGen {
    /// The (public) encapsulation key sent from the originator to the remote party.
    type EncapsKey;
    /// The (private) decapsulation key used by the originator to generate the shared secret.
    type DecapsKey;
    /// A serialized (public) encapsulation key byte array of the correct length.
    type EncapsByteArray;
    /// A serialized (private) decapsulation key byte array of the correct length.
    type DecapsByteArray;


    /// Generates an encapsulation and decapsulation key pair specific to this security parameter set,
    /// drawing randomness from the OS default random number generator.
    ///
    /// Operates in constant time, except for the `rho` component, which crosses the trust
    /// boundary in the clear by construction.
    ///
    /// # Errors
    /// Returns an error if the random number generator fails.
    ///
    /// # Examples
    /// A full originator/remote-party handshake, end to end:
    /// ```rust
    /// # use std::error::Error;
    /// # fn main() -> Result<(), Box<dyn Error>> {
    /// # #[cfg(feature = "ml-kem-512")] {
    /// use fips203::ml_kem_512;  // swap in ml_kem_768 or ml_kem_1024 for a larger parameter set
    /// use fips203::traits::{KeyGen, SerDes, Decaps, Encaps};
    ///
    /// // originator generates a key pair and publishes the encapsulation key
    /// let (ek, dk) = ml_kem_512::KG::try_keygen()?;
    /// let ek_wire = ek.into_bytes();
    ///
    /// // remote party receives the encapsulation key off the wire
    /// let ek = ml_kem_512::EncapsKey::try_from_bytes(ek_wire)?;
    /// let (remote_secret, ct) = ek.try_encaps()?;
    /// let ct_wire = ct.into_bytes();
    ///
    /// // originator receives the ciphertext and recovers the same secret
    /// let ct = ml_kem_512::CipherText::try_from_bytes(ct_wire)?;
    /// let originator_secret = dk.try_decaps(&ct)?;
    ///
    /// assert_eq!(originator_secret, remote_secret);
    /// # }
    /// # Ok(())}
    /// ```
    #[cfg(feature = "default-rng")]
    fn try_keygen() -> Result<(Self::EncapsKey, Self::DecapsKey), &'static str> {
        Self::try_keygen_with_rng(&mut OsRng)
    }


    /// Generates an encapsulation and decapsulation key pair using a caller-supplied random
    /// number generator rather than the OS default.
    ///
    /// Operates in constant time, except for the `rho` component, which crosses the trust
    /// boundary in the clear by construction.
    ///
    /// # Arguments
    /// * `rng` - a cryptographically secure random number generator implementing `CryptoRngCore`
    ///
    /// # Errors
    /// Returns an error if the random number generator fails.
    ///
    /// # Examples
    /// ```rust
    /// # use std::error::Error;
    /// # fn main() -> Result<(), Box<dyn Error>> {
    /// # #[cfg(feature = "ml-kem-512")] {
    /// use rand_core::OsRng;
    /// use fips203::ml_kem_512;
    /// use fips203::traits::{KeyGen, SerDes};
    ///
    /// let (ek, _dk) = ml_kem_512::KG::try_keygen_with_rng(&mut OsRng)?;
    /// assert_eq!(ek.into_bytes().len(), 800);
    /// # }
    /// # Ok(())}
    /// ```
    fn try_keygen_with_rng(
        rng: &mut impl CryptoRngCore,
    ) -> Result<(Self::EncapsKey, Self::DecapsKey), &'static str>;


    /// Generates an encapsulation and decapsulation key pair specific to this security parameter
    /// set from caller-supplied `d`/`z` seeds rather than drawing fresh randomness, for
    /// reproducible derivation. Operates in constant time outside of `rho`, which crosses the
    /// trust boundary in the clear by construction.
    /// # Examples
    /// Same seeds, same key pair:
    /// ```rust
    /// # fn main() {
    /// # #[cfg(feature = "ml-kem-512")] {
    /// use fips203::ml_kem_512;
    /// use fips203::traits::{KeyGen, SerDes};
    ///
    /// let (ek_a, dk_a) = ml_kem_512::KG::keygen_from_seed([7u8; 32], [9u8; 32]);
    /// let (ek_b, dk_b) = ml_kem_512::KG::keygen_from_seed([7u8; 32], [9u8; 32]);
    /// assert_eq!(ek_a.into_bytes(), ek_b.into_bytes());
    /// assert_eq!(dk_a.into_bytes(), dk_b.into_bytes());
    /// # }
    /// # }
    /// ```
    #[must_use]
    fn keygen_from_seed(d: [u8; 32], z: [u8; 32]) -> (Self::EncapsKey, Self::DecapsKey);


    /// Checks that a serialized encapsulation key and a serialized decapsulation key correspond
    /// to the same key pair — useful after both have been stored to disk and later reloaded
    /// separately. Not intended to run in constant time.
    /// # Examples
    /// ```rust
    /// # use std::error::Error;
    /// # fn main() -> Result<(), Box<dyn Error>> {
    /// # #[cfg(feature = "ml-kem-512")] {
    /// use fips203::ml_kem_512;
    /// use fips203::traits::{KeyGen, SerDes};
    /// use rand_core::OsRng;
    ///
    /// let (ek, dk) = ml_kem_512::KG::try_keygen_with_rng(&mut OsRng)?;
    /// let ek_bytes = ek.into_bytes();
    /// let dk_bytes = dk.into_bytes();
    /// assert!(ml_kem_512::KG::validate_keypair_with_rng_vartime(
    ///     &mut OsRng, &ek_bytes, &dk_bytes
    /// ));
    /// # }
    /// # Ok(())}
    /// ```
    fn validate_keypair_with_rng_vartime(
        rng: &mut impl CryptoRngCore, ek: &Self::EncapsByteArray, dk: &Self::DecapsByteArray,
    ) -> bool;
}


/// The `Encaps` trait defines methods for generating shared secrets and ciphertexts using
/// an encapsulation key.
pub trait Encaps {
    /// The shared secret key type generated during encapsulation
    type SharedSecretKey;
    /// The ciphertext type transmitted from the encapsulating party to the decapsulating party
    type CipherText;


    /// Generates a shared secret and its accompanying ciphertext from an encapsulation key,
    /// drawing randomness from the OS default random number generator. Operates in constant
    /// time outside of `rho`, which crosses the trust boundary in the clear by construction.
    /// # Errors
    /// Returns an error when the random number generator fails or an internal error condition arises.
    /// # Examples
    /// ```rust
    /// # use std::error::Error;
    /// # fn main() -> Result<(), Box<dyn Error>> {
    /// # #[cfg(feature = "ml-kem-512")] {
    /// use fips203::ml_kem_512;
    /// use fips203::traits::{KeyGen, Encaps, Decaps};
    ///
    /// let (ek, dk) = ml_kem_512::KG::try_keygen()?;
    /// let (ssk_remote, ct) = ek.try_encaps()?;
    /// let ssk_originator = dk.try_decaps(&ct)?;
    /// assert_eq!(ssk_remote, ssk_originator);
    /// # }
    /// # Ok(())}
    /// ```
    #[cfg(feature = "default-rng")]
    fn try_encaps(&self) -> Result<(Self::SharedSecretKey, Self::CipherText), &'static str> {
        self.try_encaps_with_rng(&mut OsRng)
    }


    /// Generates a shared secret and its accompanying ciphertext from an encapsulation key,
    /// using a caller-supplied random number generator rather than the OS default. Operates
    /// in constant time.
    /// # Errors
    /// Returns an error when the random number generator fails or an internal error condition arises.
    /// # Examples
    /// ```rust
    /// # use std::error::Error;
    /// # fn main() -> Result<(), Box<dyn Error>> {
    /// # #[cfg(feature = "ml-kem-512")] {
    /// use rand_core::OsRng;
    /// use fips203::ml_kem_512;
    /// use fips203::traits::{KeyGen, Encaps, SerDes};
    ///
    /// let (ek, _dk) = ml_kem_512::KG::try_keygen_with_rng(&mut OsRng)?;
    /// let (_ssk, ct) = ek.try_encaps_with_rng(&mut OsRng)?;
    /// assert_eq!(ct.into_bytes().len(), 768);
    /// # }
    /// # Ok(())}
    /// ```
    fn try_encaps_with_rng(
        &self, rng: &mut impl CryptoRngCore,
    ) -> Result<(Self::SharedSecretKey, Self::CipherText), &'static str>;


    /// Generates a shared secret and its accompanying ciphertext from an encapsulation key and
    /// a caller-supplied **seed** rather than a random number generator, for reproducible
    /// encapsulation. Operates in constant time.
    /// # Errors
    /// Returns an error when an internal error condition arises.
    /// # Examples
    /// Same encapsulation key and seed, same ciphertext:
    /// ```rust
    /// # use std::error::Error;
    /// # fn main() -> Result<(), Box<dyn Error>> {
    /// # #[cfg(feature = "ml-kem-512")] {
    /// use rand_core::OsRng;
    /// use fips203::ml_kem_512;
    /// use fips203::traits::{KeyGen, Encaps, SerDes};
    ///
    /// let (ek, _dk) = ml_kem_512::KG::try_keygen_with_rng(&mut OsRng)?;
    /// let (ssk_a, ct_a) = ek.encaps_from_seed(&[5u8; 32]);
    /// let (ssk_b, ct_b) = ek.encaps_from_seed(&[5u8; 32]);
    /// assert_eq!(ssk_a, ssk_b);
    /// assert_eq!(ct_a.into_bytes(), ct_b.into_bytes());
    /// # }
    /// # Ok(())}
    /// ```
    fn encaps_from_seed(&self, seed: &[u8; 32]) -> (Self::SharedSecretKey, Self::CipherText) {
        self.try_encaps_with_rng(&mut DummyRng { data: *seed }).expect("rng will not fail")
    }
}

/// A random number generator stand-in that always "draws" the same fixed bytes. Backs the
/// seed-based deterministic variants above; never exposed outside this module.
struct DummyRng {
    data: [u8; 32],
}

impl RngCore for DummyRng {
    fn next_u32(&mut self) -> u32 { unimplemented!() }

    fn next_u64(&mut self) -> u64 { unimplemented!() }

    fn fill_bytes(&mut self, _out: &mut [u8]) { unimplemented!() }

    fn try_fill_bytes(&mut self, out: &mut [u8]) -> Result<(), rand_core::Error> {
        out.copy_from_slice(&self.data);
        Ok(())
    }
}

impl CryptoRng for DummyRng {}

/// The `Decaps` trait defines methods for recovering the shared secret using
/// a decapsulation key and ciphertext.
pub trait Decaps {
    /// The ciphertext type received from the encapsulating party
    type CipherText;
    /// The shared secret key type generated during decapsulation
    type SharedSecretKey;


    /// Recovers the shared secret from a decapsulation key and a received ciphertext. Always
    /// returns a value — a malformed or tampered ciphertext yields the implicit-rejection
    /// secret rather than an error, per the Fujisaki-Okamoto transform. Operates in
    /// constant time.
    /// # Errors
    /// Returns an error only if the ciphertext or decapsulation key is structurally malformed
    /// (e.g. the wrong length).
    /// # Examples
    /// ```rust
    /// # use std::error::Error;
    /// # fn main() -> Result<(), Box<dyn Error>> {
    /// # #[cfg(feature = "ml-kem-512")] {
    /// use rand_core::OsRng;
    /// use fips203::ml_kem_512;
    /// use fips203::traits::{KeyGen, Encaps, Decaps};
    ///
    /// let (ek, dk) = ml_kem_512::KG::try_keygen_with_rng(&mut OsRng)?;
    /// let (ssk_remote, ct) = ek.try_encaps_with_rng(&mut OsRng)?;
    /// let ssk_originator = dk.try_decaps(&ct)?;
    /// assert_eq!(ssk_originator, ssk_remote);
    /// # }
    /// # Ok(())}
    /// ```
    fn try_decaps(&self, ct: &Self::CipherText) -> Result<Self::SharedSecretKey, &'static str>;
}

/// The `SerDes` trait provides methods for serializing and deserializing cryptographic objects.
pub trait SerDes {
    /// The fixed-size byte array type used for serialization
    type ByteArray;


    /// Serializes the implementing struct into its fixed-size byte array representation, ready
    /// to be written to disk or sent over the wire.
    /// # Examples
    /// ```rust
    /// # use std::error::Error;
    /// # fn main() -> Result<(), Box<dyn Error>> {
    /// # #[cfg(feature = "ml-kem-512")] {
    /// use rand_core::OsRng;
    /// use fips203::ml_kem_512;
    /// use fips203::traits::{KeyGen, SerDes};
    ///
    /// let (ek, _dk) = ml_kem_512::KG::try_keygen_with_rng(&mut OsRng)?;
    /// let ek_bytes = ek.into_bytes();
    /// assert_eq!(ek_bytes.len(), 800);
    /// # }
    /// # Ok(())}
    /// ```
    fn into_bytes(self) -> Self::ByteArray;


    /// Deserializes a fixed-size byte array back into the implementing struct, validating its
    /// contents along the way.
    /// # Errors
    /// Returns an error on malformed input (e.g. an encapsulation key failing the modulus check).
    /// # Examples
    /// ```rust
    /// # use std::error::Error;
    /// # fn main() -> Result<(), Box<dyn Error>> {
    /// # #[cfg(feature = "ml-kem-512")] {
    /// use rand_core::OsRng;
    /// use fips203::ml_kem_512;
    /// use fips203::traits::{KeyGen, SerDes};
    ///
    /// let (ek, _dk) = ml_kem_512::KG::try_keygen_with_rng(&mut OsRng)?;
    /// let ek_bytes = ek.into_bytes();
    /// let ek_restored = ml_kem_512::EncapsKey::try_from_bytes(ek_bytes)?;
    /// assert_eq!(ek_restored.into_bytes(), ek_bytes);
    /// # }
    /// # Ok(())}
    /// ```
    fn try_from_bytes(ba: Self::ByteArray) -> Result<Self, &'static str>
    where
        Self: Sized;
}
