//! Ring-element (`R_q = Z_q[X]/(X^256+1)`) operations: add/sub/reduce, lossy
//! compress/decompress, 12-bit byte packing, and message<->poly conversion.
//! See spec §4.3. A poly is represented as a bare `[i16; 256]`, matching the
//! teacher's representation style in spirit (no separate coefficient newtype).

use crate::reduce::{barrett_reduce, fqmul};
use crate::Q;

pub(crate) type Poly = [i16; 256];

/// `(1<<32) mod q`, folded into `fqmul` to raise a normal-domain poly into the
/// Montgomery domain (`x * R mod q`).
const TO_MONT_F: i16 = 1353;

#[must_use]
pub(crate) fn add(a: &Poly, b: &Poly) -> Poly {
    core::array::from_fn(|i| a[i].wrapping_add(b[i]))
}

#[must_use]
pub(crate) fn sub(a: &Poly, b: &Poly) -> Poly {
    core::array::from_fn(|i| a[i].wrapping_sub(b[i]))
}

/// Applies Barrett reduction to every coefficient.
pub(crate) fn reduce(a: &mut Poly) {
    for c in a.iter_mut() {
        *c = barrett_reduce(*c);
    }
}

/// Raises every coefficient into the Montgomery domain (`x -> x * R mod q`).
pub(crate) fn tomont(a: &mut Poly) {
    for c in a.iter_mut() {
        *c = fqmul(*c, TO_MONT_F);
    }
}

/// Replaces a negative signed representative with its canonical non-negative
/// counterpart in `[0, q)`: `t += (t >> 15) & q`, per spec §4.3.
#[must_use]
#[inline]
fn canonicalize(x: i16) -> u16 { (x.wrapping_add((x >> 15) & Q)) as u16 }

/// `Compress_d`: `x -> floor((2^d * x) / q + 1/2) mod 2^d`, spec §4.3. `x` is
/// canonicalized to `[0, q)` first.
#[must_use]
pub(crate) fn compress(d: u32, a: &Poly) -> [u16; 256] {
    let q = Q as u32;
    let mask = (1u32 << d) - 1;
    core::array::from_fn(|i| {
        let x = u32::from(canonicalize(a[i]));
        let numerator = (x << d) + q / 2;
        ((numerator / q) & mask) as u16
    })
}

/// `Decompress_d`: `c -> floor((q * c) / 2^d + 1/2)`, spec §4.3.
#[must_use]
pub(crate) fn decompress(d: u32, c: &[u16; 256]) -> Poly {
    let q = Q as u32;
    core::array::from_fn(|i| {
        let x = u32::from(c[i]);
        (((x * q) + (1 << (d - 1))) >> d) as i16
    })
}

/// Bit-packs 256 values of `d` bits each into `32*d` bytes, little-endian within
/// the bitstream. Used for both the 12-bit uncompressed encoding and the
/// compressed 4/5/10/11-bit encodings (spec §4.3).
pub(crate) fn pack_bits(d: u32, vals: &[u16; 256], out: &mut [u8]) {
    debug_assert_eq!(out.len(), 32 * d as usize);
    let mut acc: u32 = 0;
    let mut acc_bits: u32 = 0;
    let mut out_idx = 0usize;
    for &v in vals {
        acc |= u32::from(v) << acc_bits;
        acc_bits += d;
        while acc_bits >= 8 {
            out[out_idx] = acc as u8;
            acc >>= 8;
            acc_bits -= 8;
            out_idx += 1;
        }
    }
}

/// Inverse of [`pack_bits`]. No range reduction is performed: any `d`-bit value is
/// accepted, including (for `d == 12`) values in `[q, 4096)`.
#[must_use]
pub(crate) fn unpack_bits(d: u32, bytes: &[u8]) -> [u16; 256] {
    debug_assert_eq!(bytes.len(), 32 * d as usize);
    let mut vals = [0u16; 256];
    let mut acc: u32 = 0;
    let mut acc_bits: u32 = 0;
    let mut idx = 0usize;
    let mask = (1u32 << d) - 1;
    for &b in bytes {
        acc |= u32::from(b) << acc_bits;
        acc_bits += 8;
        while acc_bits >= d {
            vals[idx] = (acc & mask) as u16;
            acc >>= d;
            acc_bits -= d;
            idx += 1;
        }
    }
    vals
}

/// `poly_tobytes`: packs 256 canonicalized 12-bit coefficients into 384 bytes.
pub(crate) fn tobytes(a: &Poly, out: &mut [u8; 384]) {
    let canon: [u16; 256] = core::array::from_fn(|i| canonicalize(a[i]));
    pack_bits(12, &canon, out);
}

/// `poly_frombytes`: inverts [`tobytes`] with no reduction — callers must tolerate
/// any 12-bit input, per spec §4.3.
#[must_use]
pub(crate) fn frombytes(bytes: &[u8; 384]) -> Poly {
    let vals = unpack_bits(12, bytes);
    core::array::from_fn(|i| vals[i] as i16)
}

/// `poly_frommsg`: each of 256 message bits becomes a coefficient, `bit ? (q+1)/2 : 0`.
#[must_use]
pub(crate) fn frommsg(msg: &[u8; 32]) -> Poly {
    const HALF_Q_PLUS_ONE: i16 = ((Q + 1) / 2) as i16;
    core::array::from_fn(|i| {
        let bit = (msg[i / 8] >> (i % 8)) & 1;
        if bit == 1 {
            HALF_Q_PLUS_ONE
        } else {
            0
        }
    })
}

/// `poly_tomsg`: recovers the bit-rounding of each canonicalized coefficient,
/// `bit = ((((x<<1)+q/2)/q) & 1)`.
#[must_use]
pub(crate) fn tomsg(a: &Poly) -> [u8; 32] {
    let q = Q as u32;
    let mut msg = [0u8; 32];
    for i in 0..256 {
        let x = u32::from(canonicalize(a[i]));
        let bit = (((x << 1) + q / 2) / q) & 1;
        msg[i / 8] |= (bit as u8) << (i % 8);
    }
    msg
}

#[cfg(test)]
mod tests {
    use super::{compress, decompress, frombytes, frommsg, tobytes, tomsg};

    #[test]
    fn tobytes_frombytes_round_trip_on_canonical_values() {
        let mut a = [0i16; 256];
        for (i, c) in a.iter_mut().enumerate() {
            *c = (i as i16 * 37) % 3329;
        }
        let mut bytes = [0u8; 384];
        tobytes(&a, &mut bytes);
        let back = frombytes(&bytes);
        for i in 0..256 {
            assert_eq!(back[i], a[i]);
        }
    }

    #[test]
    fn message_round_trips_through_compress_decompress() {
        let msg = [0xA5u8; 32];
        let p = frommsg(&msg);
        // compress-then-decompress at d=1 is a lossless round trip for the two
        // values frommsg ever produces (0 and (q+1)/2).
        let c = compress(1, &p);
        let back = decompress(1, &c);
        let recovered = tomsg(&back);
        assert_eq!(recovered, msg);
    }

    #[test]
    fn compress_then_decompress_is_idempotent_on_already_compressed_values() {
        for d in [4u32, 5, 10, 11] {
            let vals: [u16; 256] = core::array::from_fn(|i| (i as u16) % (1 << d));
            let decompressed = decompress(d, &vals);
            let recompressed = compress(d, &decompressed);
            assert_eq!(recompressed, vals);
        }
    }
}
