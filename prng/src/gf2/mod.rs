//! GF(2) polynomial arithmetic for jump-ahead
//!
//! A generator whose step function is linear over GF(2) advances its state by
//! multiplying it with a fixed matrix `A`. Jumping `n` steps is `A^n · s`.
//! Writing `x^n ≡ q(x) (mod φ)` for the characteristic polynomial `φ` of `A`
//! gives `A^n · s = q(A) · s`, and `q` is found with O(log n) polynomial
//! squarings. Evaluating `q(A) · s` by Horner's rule costs `deg φ` steps,
//! independent of `n`.
//!
//! # Critical Invariants
//!
//! - `jump_linear(s, n, φ)` is bit-identical to `n` calls of `advance`
//! - `advance` must be GF(2)-linear: `advance(a ^ b) == advance(a) ^ advance(b)`

mod berlekamp_massey;
mod poly;

pub use berlekamp_massey::minimal_polynomial;
pub use poly::{Gf2Poly, CAPACITY};

/// State whose step function is linear over GF(2).
pub trait Gf2Linear: Copy {
    /// The all-zero state (a fixed point of every linear step)
    fn zero() -> Self;

    /// Word-wise XOR of two states
    fn xor(self, other: Self) -> Self;

    /// One application of the step function
    fn advance(self) -> Self;
}

/// Evaluate `poly(A) · state`, where `A` is the step function of `S`.
pub fn apply_polynomial<S: Gf2Linear>(poly: &Gf2Poly, state: S) -> S {
    let Some(degree) = poly.degree() else {
        return S::zero();
    };
    let mut acc = S::zero();
    for i in (0..=degree).rev() {
        acc = acc.advance();
        if poly.bit(i) {
            acc = acc.xor(state);
        }
    }
    acc
}

/// Advance `state` by `distance` steps in O(log distance) polynomial operations.
///
/// `characteristic` must annihilate the image of the step function. Step
/// functions that clear state bits (the twisters drop the top bit of their
/// first word) have a kernel, so the state is stepped once for real before
/// the polynomial is applied to it.
pub fn jump_linear<S: Gf2Linear>(state: S, distance: u64, characteristic: &Gf2Poly) -> S {
    if distance == 0 {
        return state;
    }
    let stepped = state.advance();
    let q = Gf2Poly::x_pow_mod(distance - 1, characteristic);
    apply_polynomial(&q, stepped)
}
