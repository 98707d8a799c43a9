//! Berlekamp-Massey over GF(2)
//!
//! Recovers the shortest linear recurrence generating a bit sequence. Fed
//! `2n` output bits of a linear generator whose characteristic polynomial is
//! irreducible of degree `n`, it returns exactly that polynomial.

use super::poly::{Gf2Poly, CAPACITY};

/// Minimal polynomial of the first `len` bits of `sequence`.
///
/// Bit `i` of `sequence` is the `i`-th term. Returns the characteristic
/// polynomial (the reciprocal of the connection polynomial, so that its
/// leading coefficient belongs to the newest term) and its degree.
///
/// # Example
/// ```
/// use lane_prng::gf2::{minimal_polynomial, Gf2Poly};
///
/// // s[n] = s[n-1] ^ s[n-2] has period 3: 1, 1, 0, 1, 1, 0, ...
/// let sequence = Gf2Poly::from_u128(0b011_011_011_011);
/// let (poly, degree) = minimal_polynomial(&sequence, 12);
/// assert_eq!(degree, 2);
/// assert_eq!(poly, Gf2Poly::from_u128(0b111)); // x^2 + x + 1
/// ```
pub const fn minimal_polynomial(sequence: &Gf2Poly, len: usize) -> (Gf2Poly, usize) {
    assert!(len <= CAPACITY, "sequence longer than polynomial capacity");

    let mut connection = Gf2Poly::ONE;
    let mut previous = Gf2Poly::ONE;
    let mut degree = 0;
    let mut gap = 1;

    let mut n = 0;
    while n < len {
        let mut discrepancy = sequence.bit(n);
        let mut i = 1;
        while i <= degree {
            if connection.bit(i) && sequence.bit(n - i) {
                discrepancy = !discrepancy;
            }
            i += 1;
        }

        if !discrepancy {
            gap += 1;
        } else if 2 * degree <= n {
            let saved = connection;
            connection = connection.xor(previous.shifted(gap));
            degree = n + 1 - degree;
            previous = saved;
            gap = 1;
        } else {
            connection = connection.xor(previous.shifted(gap));
            gap += 1;
        }
        n += 1;
    }

    let mut characteristic = Gf2Poly::ZERO;
    let mut j = 0;
    while j <= degree {
        if connection.bit(j) {
            characteristic = characteristic.with_bit(degree - j);
        }
        j += 1;
    }
    (characteristic, degree)
}
