//! Fixed-width polynomials over GF(2)
//!
//! A [`Gf2Poly`] holds up to 256 coefficients packed into four `u64` words,
//! bit `i` being the coefficient of `x^i`. The width is twice the largest
//! characteristic polynomial in this crate (degree 127), so the product of
//! two residues always fits before it is reduced.
//!
//! Every operation is a `const fn`: the characteristic polynomials of the
//! twister engines are derived during constant evaluation.

const WORDS: usize = 4;

/// Number of coefficients a [`Gf2Poly`] can hold.
pub const CAPACITY: usize = WORDS * 64;

/// Polynomial over GF(2) with degree below [`CAPACITY`].
///
/// # Example
/// ```
/// use lane_prng::gf2::Gf2Poly;
///
/// // (x + 1)^2 = x^2 + 1 over GF(2)
/// let p = Gf2Poly::from_u128(0b11);
/// assert_eq!(p.square(), Gf2Poly::from_u128(0b101));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Gf2Poly {
    words: [u64; WORDS],
}

impl Gf2Poly {
    /// The zero polynomial
    pub const ZERO: Self = Self { words: [0; WORDS] };

    /// The constant polynomial `1`
    pub const ONE: Self = Self::from_u128(1);

    /// The monomial `x`
    pub const X: Self = Self::from_u128(2);

    /// Build a polynomial from its low 128 coefficients
    pub const fn from_u128(value: u128) -> Self {
        Self {
            words: [value as u64, (value >> 64) as u64, 0, 0],
        }
    }

    /// Low 128 coefficients (higher coefficients are dropped)
    pub const fn low_u128(&self) -> u128 {
        (self.words[0] as u128) | ((self.words[1] as u128) << 64)
    }

    /// Coefficient of `x^i`
    pub const fn bit(&self, i: usize) -> bool {
        i < CAPACITY && (self.words[i / 64] >> (i % 64)) & 1 == 1
    }

    /// Copy of `self` with the coefficient of `x^i` set to one
    pub const fn with_bit(self, i: usize) -> Self {
        assert!(i < CAPACITY, "coefficient index out of range");
        let mut words = self.words;
        words[i / 64] |= 1 << (i % 64);
        Self { words }
    }

    pub const fn is_zero(&self) -> bool {
        self.words[0] == 0 && self.words[1] == 0 && self.words[2] == 0 && self.words[3] == 0
    }

    /// Degree of the polynomial, `None` for the zero polynomial
    pub const fn degree(&self) -> Option<usize> {
        let mut i = WORDS;
        while i > 0 {
            i -= 1;
            let word = self.words[i];
            if word != 0 {
                return Some(i * 64 + 63 - word.leading_zeros() as usize);
            }
        }
        None
    }

    /// Addition (and subtraction) over GF(2): coefficient-wise XOR
    pub const fn xor(self, rhs: Self) -> Self {
        Self {
            words: [
                self.words[0] ^ rhs.words[0],
                self.words[1] ^ rhs.words[1],
                self.words[2] ^ rhs.words[2],
                self.words[3] ^ rhs.words[3],
            ],
        }
    }

    /// Multiply by `x^n`. Coefficients pushed past [`CAPACITY`] are lost.
    pub const fn shifted(self, n: usize) -> Self {
        if n >= CAPACITY {
            return Self::ZERO;
        }
        let word_shift = n / 64;
        let bit_shift = n % 64;
        let mut words = [0u64; WORDS];
        let mut i = WORDS;
        while i > word_shift {
            i -= 1;
            let src = i - word_shift;
            let mut word = self.words[src] << bit_shift;
            if bit_shift > 0 && src > 0 {
                word |= self.words[src - 1] >> (64 - bit_shift);
            }
            words[i] = word;
        }
        Self { words }
    }

    /// Carry-less product. The degrees of the operands must sum to less than [`CAPACITY`].
    pub const fn clmul(self, rhs: Self) -> Self {
        let mut words = [0u64; WORDS];
        let mut i = 0;
        while i < WORDS {
            let mut j = 0;
            while i + j < WORDS {
                let product = clmul64(self.words[i], rhs.words[j]);
                words[i + j] ^= product as u64;
                if i + j + 1 < WORDS {
                    words[i + j + 1] ^= (product >> 64) as u64;
                }
                j += 1;
            }
            i += 1;
        }
        Self { words }
    }

    /// Square of a polynomial of degree below 128.
    ///
    /// Squaring over GF(2) spreads coefficient `i` to `2i`; cross terms cancel.
    pub const fn square(self) -> Self {
        debug_assert!(self.words[2] == 0 && self.words[3] == 0);
        let lo = clmul64(self.words[0], self.words[0]);
        let hi = clmul64(self.words[1], self.words[1]);
        Self {
            words: [lo as u64, (lo >> 64) as u64, hi as u64, (hi >> 64) as u64],
        }
    }

    /// Remainder of division by `modulus`.
    ///
    /// # Panics
    /// Panics if `modulus` is zero.
    pub const fn reduce(self, modulus: &Self) -> Self {
        let modulus_degree = match modulus.degree() {
            Some(d) => d,
            None => panic!("division by the zero polynomial"),
        };
        let mut r = self;
        loop {
            match r.degree() {
                Some(d) if d >= modulus_degree => r = r.xor(modulus.shifted(d - modulus_degree)),
                _ => return r,
            }
        }
    }

    /// `self * rhs mod modulus`, both operands already reduced
    pub const fn mul_mod(self, rhs: Self, modulus: &Self) -> Self {
        self.clmul(rhs).reduce(modulus)
    }

    /// `self^2 mod modulus`, operand already reduced
    pub const fn square_mod(self, modulus: &Self) -> Self {
        self.square().reduce(modulus)
    }

    /// `x^n mod modulus` by left-to-right square-and-multiply.
    ///
    /// The modulus must have degree at most 128 so that every intermediate
    /// square fits.
    pub const fn x_pow_mod(n: u64, modulus: &Self) -> Self {
        let mut result = Self::ONE.reduce(modulus);
        let mut i = 64 - n.leading_zeros();
        while i > 0 {
            i -= 1;
            result = result.square_mod(modulus);
            if (n >> i) & 1 == 1 {
                result = result.shifted(1).reduce(modulus);
            }
        }
        result
    }
}

/// Carry-less 64x64 -> 128 bit multiply
const fn clmul64(a: u64, b: u64) -> u128 {
    let a = a as u128;
    let mut acc = 0u128;
    let mut i = 0;
    while i < 64 {
        if (b >> i) & 1 == 1 {
            acc ^= a << i;
        }
        i += 1;
    }
    acc
}
