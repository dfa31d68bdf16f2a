// Copyright (c) Facebook, Inc. and its affiliates.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! An implementation of the BN254 (alt_bn128) scalar field, the 254-bit prime
//! field with modulus
//! 0x30644e72e131a029b85045b68181585d2833e84879b9709143e1f593f0000001.
//!
//! Elements are kept in Montgomery form with respect to R = 2^256; all
//! arithmetic operations return canonical results (reduced below the modulus),
//! so equality is plain limb-wise comparison. The multiplicative group has
//! two-adicity 28, which is what makes radix-2 FFTs over this field possible
//! for domains of up to 2^28 points.

use core::{
    fmt::{Debug, Display, Formatter},
    ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign},
};

#[cfg(test)]
mod tests;

// CONSTANTS
// ================================================================================================

/// Field modulus, least-significant limb first.
const M: [u64; 4] = [
    0x43e1f593f0000001,
    0x2833e84879b97091,
    0xb85045b68181585d,
    0x30644e72e131a029,
];

/// -M^{-1} mod 2^64, the Montgomery reduction factor.
const INV: u64 = derive_inv();

/// R = 2^256 mod M; the Montgomery form of 1.
const R: [u64; 4] = derive_r();

/// R^2 mod M, used to convert integers into Montgomery form.
const R2: [u64; 4] = derive_r2();

/// M - 2, the Fermat inversion exponent.
const M_MINUS_2: [u64; 4] = sub_no_borrow(M, [2, 0, 0, 0]);

/// (M - 1) / 2, the Euler criterion exponent.
const M_MINUS_1_DIV_2: [u64; 4] = shr_limbs(sub_no_borrow(M, [1, 0, 0, 0]), 1);

/// Q = (M - 1) / 2^28; odd by definition of the two-adicity.
const Q: [u64; 4] = shr_limbs(sub_no_borrow(M, [1, 0, 0, 0]), TWO_ADICITY);

/// (Q + 1) / 2, the Tonelli-Shanks starting exponent.
const Q_PLUS_1_DIV_2: [u64; 4] = add_no_carry(shr_limbs(Q, 1), [1, 0, 0, 0]);

/// Number of twos dividing M - 1.
pub const TWO_ADICITY: u32 = 28;

/// Smallest generator of the full multiplicative group of the field.
pub const GENERATOR: u64 = 5;

// FIELD ELEMENT
// ================================================================================================

/// An element of the BN254 scalar field, stored in canonical Montgomery form
/// as four 64-bit limbs, least-significant limb first.
#[derive(Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct Fr([u64; 4]);

impl Fr {
    /// The additive identity.
    pub const ZERO: Self = Fr([0, 0, 0, 0]);

    /// The multiplicative identity.
    pub const ONE: Self = Fr(R);

    /// Creates a field element from the integer with the specified
    /// little-endian limbs; the value is reduced modulo M.
    pub fn new(value: [u64; 4]) -> Self {
        // value * R2 < 2^256 * M, which mont_mul reduces fully
        Fr(mont_mul(value, R2))
    }

    #[inline(always)]
    pub const fn zero() -> Self {
        Self::ZERO
    }

    #[inline(always)]
    pub const fn one() -> Self {
        Self::ONE
    }

    /// Returns the canonical integer representation of this element as
    /// little-endian limbs.
    pub fn as_int(&self) -> [u64; 4] {
        mont_reduce([self.0[0], self.0[1], self.0[2], self.0[3], 0, 0, 0, 0])
    }

    /// Squares this element.
    #[inline(always)]
    pub fn square(self) -> Self {
        Fr(mont_mul(self.0, self.0))
    }

    /// Exponentiates this element by a small power.
    pub fn pow(self, power: u64) -> Self {
        self.exp([power, 0, 0, 0])
    }

    /// Exponentiates this element by a power with the specified little-endian
    /// limbs.
    pub fn exp(self, power: [u64; 4]) -> Self {
        let mut r = Self::ONE;
        let mut b = self;
        for limb in power {
            for i in 0..64 {
                if (limb >> i) & 1 == 1 {
                    r *= b;
                }
                b = b.square();
            }
        }
        r
    }

    /// Returns the multiplicative inverse of this element; the inverse of ZERO
    /// is ZERO.
    pub fn inv(self) -> Self {
        self.exp(M_MINUS_2)
    }

    /// Returns a square root of this element, or None if the element is not a
    /// quadratic residue. Of the two roots, the one returned is unspecified.
    pub fn sqrt(self) -> Option<Self> {
        if self == Self::ZERO {
            return Some(Self::ZERO);
        }
        if self.exp(M_MINUS_1_DIV_2) != Self::ONE {
            return None;
        }

        // Tonelli-Shanks over the 2^28 subgroup
        let mut c = Fr::from(GENERATOR).exp(Q);
        let mut t = self.exp(Q);
        let mut r = self.exp(Q_PLUS_1_DIV_2);
        let mut m = TWO_ADICITY;

        while t != Self::ONE {
            let mut i = 0;
            let mut t2 = t;
            while t2 != Self::ONE {
                t2 = t2.square();
                i += 1;
            }
            let mut b = c;
            for _ in 0..(m - i - 1) {
                b = b.square();
            }
            r *= b;
            c = b.square();
            t *= c;
            m = i;
        }
        Some(r)
    }

    /// Returns a primitive 2^n-th root of unity.
    ///
    /// # Panics
    /// Panics if n is greater than 28, the two-adicity of the field.
    pub fn get_root_of_unity(n: u32) -> Self {
        assert!(n <= TWO_ADICITY, "2^{n}-th root of unity does not exist");
        let mut root = Fr::from(GENERATOR).exp(Q);
        for _ in n..TWO_ADICITY {
            root = root.square();
        }
        root
    }
}

// OVERLOADED OPERATORS
// ================================================================================================

impl Add for Fr {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        // both operands are below M, so the raw sum never carries out of
        // 256 bits and a single conditional subtraction canonicalizes it
        Fr(reduce_once(add_no_carry(self.0, rhs.0)))
    }
}

impl AddAssign for Fr {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for Fr {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        let (diff, borrow) = sub_limbs(self.0, rhs.0);
        if borrow == 0 {
            Fr(diff)
        } else {
            Fr(add_no_carry(diff, M))
        }
    }
}

impl SubAssign for Fr {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl Mul for Fr {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: Self) -> Self {
        Fr(mont_mul(self.0, rhs.0))
    }
}

impl MulAssign for Fr {
    #[inline]
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl Neg for Fr {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Self::ZERO - self
    }
}

// TYPE CONVERSIONS
// ================================================================================================

impl From<u64> for Fr {
    fn from(value: u64) -> Self {
        Fr::new([value, 0, 0, 0])
    }
}

impl From<u32> for Fr {
    fn from(value: u32) -> Self {
        Fr::from(value as u64)
    }
}

impl Display for Fr {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        let v = self.as_int();
        write!(f, "0x{:016x}{:016x}{:016x}{:016x}", v[3], v[2], v[1], v[0])
    }
}

impl Debug for Fr {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        Display::fmt(self, f)
    }
}

// MONTGOMERY ARITHMETIC
// ================================================================================================

/// Computes a * b / 2^256 mod M. The result is canonical as long as
/// a * b < M * 2^256, which holds for any a < 2^256 when b < M.
#[inline(always)]
const fn mont_mul(a: [u64; 4], b: [u64; 4]) -> [u64; 4] {
    let mut t = [0u64; 8];
    let mut i = 0;
    while i < 4 {
        let mut carry = 0;
        let mut j = 0;
        while j < 4 {
            let (lo, hi) = mac(t[i + j], a[i], b[j], carry);
            t[i + j] = lo;
            carry = hi;
            j += 1;
        }
        t[i + 4] = carry;
        i += 1;
    }
    mont_reduce(t)
}

/// Montgomery reduction of a 512-bit value: computes t / 2^256 mod M.
/// Requires t < M * 2^256; the result is canonical.
#[inline(always)]
const fn mont_reduce(mut t: [u64; 8]) -> [u64; 4] {
    let mut carry2 = 0;
    let mut i = 0;
    while i < 4 {
        let k = t[i].wrapping_mul(INV);
        let mut carry = 0;
        let mut j = 0;
        while j < 4 {
            let (lo, hi) = mac(t[i + j], k, M[j], carry);
            t[i + j] = lo;
            carry = hi;
            j += 1;
        }
        let (lo, hi) = adc(t[i + 4], carry2, carry);
        t[i + 4] = lo;
        carry2 = hi;
        i += 1;
    }
    // t / 2^256 < 2M here, so carry2 is zero and one subtraction suffices
    reduce_once([t[4], t[5], t[6], t[7]])
}

/// Subtracts M once if the value is not below M.
#[inline(always)]
const fn reduce_once(r: [u64; 4]) -> [u64; 4] {
    let (d, borrow) = sub_limbs(r, M);
    if borrow == 0 {
        d
    } else {
        r
    }
}

// LIMB ARITHMETIC
// ------------------------------------------------------------------------------------------------

/// Computes a + b * c + carry, returning the low and high halves.
#[inline(always)]
const fn mac(a: u64, b: u64, c: u64, carry: u64) -> (u64, u64) {
    let t = a as u128 + (b as u128) * (c as u128) + carry as u128;
    (t as u64, (t >> 64) as u64)
}

/// Computes a + b + carry, returning the low half and the carry-out.
#[inline(always)]
const fn adc(a: u64, b: u64, carry: u64) -> (u64, u64) {
    let t = a as u128 + b as u128 + carry as u128;
    (t as u64, (t >> 64) as u64)
}

/// Computes a - b - borrow, returning the low half and the borrow-out.
#[inline(always)]
const fn sbb(a: u64, b: u64, borrow: u64) -> (u64, u64) {
    let t = (a as u128).wrapping_sub(b as u128 + borrow as u128);
    (t as u64, ((t >> 64) as u64) & 1)
}

#[inline(always)]
const fn sub_limbs(a: [u64; 4], b: [u64; 4]) -> ([u64; 4], u64) {
    let (r0, borrow) = sbb(a[0], b[0], 0);
    let (r1, borrow) = sbb(a[1], b[1], borrow);
    let (r2, borrow) = sbb(a[2], b[2], borrow);
    let (r3, borrow) = sbb(a[3], b[3], borrow);
    ([r0, r1, r2, r3], borrow)
}

/// Subtraction known not to borrow.
#[inline(always)]
const fn sub_no_borrow(a: [u64; 4], b: [u64; 4]) -> [u64; 4] {
    sub_limbs(a, b).0
}

/// Addition known not to carry out of 256 bits; holds whenever both operands
/// are below 2^255, which covers all sums of canonical elements since
/// M < 2^254.
#[inline(always)]
const fn add_no_carry(a: [u64; 4], b: [u64; 4]) -> [u64; 4] {
    let (r0, carry) = adc(a[0], b[0], 0);
    let (r1, carry) = adc(a[1], b[1], carry);
    let (r2, carry) = adc(a[2], b[2], carry);
    let (r3, _) = adc(a[3], b[3], carry);
    [r0, r1, r2, r3]
}

/// Logical right shift by 1..=63 bits across the four limbs.
const fn shr_limbs(a: [u64; 4], shift: u32) -> [u64; 4] {
    [
        (a[0] >> shift) | (a[1] << (64 - shift)),
        (a[1] >> shift) | (a[2] << (64 - shift)),
        (a[2] >> shift) | (a[3] << (64 - shift)),
        a[3] >> shift,
    ]
}

// CONSTANT DERIVATION
// ------------------------------------------------------------------------------------------------
// All Montgomery constants are derived from the modulus at compile time; the
// modulus is the only transcribed value.

/// Doubles a canonical value modulo M.
const fn mod_double(a: [u64; 4]) -> [u64; 4] {
    // a < M < 2^254, so the shift cannot overflow 256 bits
    let d = [
        a[0] << 1,
        (a[1] << 1) | (a[0] >> 63),
        (a[2] << 1) | (a[1] >> 63),
        (a[3] << 1) | (a[2] >> 63),
    ];
    reduce_once(d)
}

/// 2^256 mod M by 256 modular doublings of 1.
const fn derive_r() -> [u64; 4] {
    let mut r = [1, 0, 0, 0];
    let mut i = 0;
    while i < 256 {
        r = mod_double(r);
        i += 1;
    }
    r
}

/// 2^512 mod M, continuing from R.
const fn derive_r2() -> [u64; 4] {
    let mut r = derive_r();
    let mut i = 0;
    while i < 256 {
        r = mod_double(r);
        i += 1;
    }
    r
}

/// -M^{-1} mod 2^64 by Newton iteration; each round doubles the number of
/// correct low bits, and six rounds from the 1-bit seed cover all 64.
const fn derive_inv() -> u64 {
    let mut inv = 1u64;
    let mut i = 0;
    while i < 6 {
        inv = inv.wrapping_mul(2u64.wrapping_sub(M[0].wrapping_mul(inv)));
        i += 1;
    }
    inv.wrapping_neg()
}
