// Copyright (c) Facebook, Inc. and its affiliates.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

use super::{Fr, GENERATOR, INV, M, R, R2, TWO_ADICITY};
use num_bigint::BigUint;
use rand::{thread_rng, Rng};

// BASIC ALGEBRA
// ================================================================================================

#[test]
fn add() {
    // identity
    let r = random_element();
    assert_eq!(r, r + Fr::ZERO);

    // m - 1 + 1 wraps to 0
    let m_minus_1 = Fr::ZERO - Fr::ONE;
    assert_eq!(Fr::ZERO, m_minus_1 + Fr::ONE);

    // random values against num-bigint
    for _ in 0..100 {
        let (a, b) = (random_element(), random_element());
        let expected = (to_big(a.as_int()) + to_big(b.as_int())) % modulus();
        assert_eq!(expected, to_big((a + b).as_int()));
    }
}

#[test]
fn sub() {
    // identity
    let r = random_element();
    assert_eq!(r, r - Fr::ZERO);

    // 0 - 1 wraps to m - 1
    assert_eq!(modulus() - 1u32, to_big((Fr::ZERO - Fr::ONE).as_int()));

    for _ in 0..100 {
        let (a, b) = (random_element(), random_element());
        let expected = (modulus() + to_big(a.as_int()) - to_big(b.as_int())) % modulus();
        assert_eq!(expected, to_big((a - b).as_int()));
    }
}

#[test]
fn neg() {
    assert_eq!(Fr::ZERO, -Fr::ZERO);
    let r = random_element();
    assert_eq!(Fr::ZERO, r + (-r));
}

#[test]
fn mul() {
    // identities
    let r = random_element();
    assert_eq!(Fr::ZERO, r * Fr::ZERO);
    assert_eq!(r, r * Fr::ONE);

    for _ in 0..100 {
        let (a, b) = (random_element(), random_element());
        let expected = (to_big(a.as_int()) * to_big(b.as_int())) % modulus();
        assert_eq!(expected, to_big((a * b).as_int()));
    }
}

#[test]
fn square() {
    for _ in 0..100 {
        let a = random_element();
        assert_eq!(a * a, a.square());
    }
}

#[test]
fn exp() {
    let a = random_element();
    assert_eq!(Fr::ONE, a.pow(0));
    assert_eq!(a, a.pow(1));
    assert_eq!(a * a * a, a.pow(3));

    // Fermat: a^(m - 1) = 1 for a != 0
    let m_minus_1 = super::sub_no_borrow(M, [1, 0, 0, 0]);
    assert_eq!(Fr::ONE, a.exp(m_minus_1));

    // cross-check a random 256-bit exponent against num-bigint
    let power: [u64; 4] = thread_rng().gen();
    let expected = to_big(a.as_int()).modpow(&to_big(power), &modulus());
    assert_eq!(expected, to_big(a.exp(power).as_int()));
}

#[test]
fn inv() {
    assert_eq!(Fr::ONE, Fr::ONE.inv());
    assert_eq!(Fr::ZERO, Fr::ZERO.inv());
    for _ in 0..10 {
        let a = random_element();
        assert_eq!(Fr::ONE, a * a.inv());
    }
}

#[test]
fn sqrt() {
    assert_eq!(Some(Fr::ZERO), Fr::ZERO.sqrt());
    assert_eq!(Some(Fr::ONE), Fr::ONE.sqrt());

    for _ in 0..10 {
        let a = random_element();
        let root = a.square().sqrt().expect("square must be a residue");
        assert!(root == a || root == -a);

        // the field generator is a non-residue, so g * a^2 has no root
        assert_eq!(None, (Fr::from(GENERATOR) * a.square()).sqrt());
    }
}

// ROOTS OF UNITY
// ================================================================================================

#[test]
fn get_root_of_unity() {
    let root_28 = Fr::get_root_of_unity(TWO_ADICITY);
    assert_eq!(Fr::ONE, root_28.pow(1 << TWO_ADICITY));

    // primitive: the half-order power is -1, not 1
    assert_eq!(Fr::ZERO - Fr::ONE, root_28.pow(1 << (TWO_ADICITY - 1)));

    let root_3 = Fr::get_root_of_unity(3);
    assert_eq!(Fr::ONE, root_3.pow(8));
    assert_eq!(Fr::ZERO - Fr::ONE, root_3.pow(4));

    // consistency across orders: squaring steps down one level
    assert_eq!(Fr::get_root_of_unity(2), root_3.square());

    assert_eq!(Fr::ONE, Fr::get_root_of_unity(0));
}

// CONVERSIONS
// ================================================================================================

#[test]
fn new_reduces() {
    // the raw modulus maps to zero
    assert_eq!(Fr::ZERO, Fr::new(M));
    // m + 1 maps to one
    let m_plus_1 = super::add_no_carry(M, [1, 0, 0, 0]);
    assert_eq!(Fr::ONE, Fr::new(m_plus_1));
}

#[test]
fn as_int_round_trip() {
    for _ in 0..100 {
        let a = random_element();
        assert_eq!(a, Fr::new(a.as_int()));
    }
}

#[test]
fn from_u64() {
    assert_eq!(Fr::ZERO, Fr::from(0u64));
    assert_eq!(Fr::ONE, Fr::from(1u64));
    assert_eq!([42, 0, 0, 0], Fr::from(42u64).as_int());
}

// MONTGOMERY CONSTANTS
// ================================================================================================

#[test]
fn montgomery_constants() {
    let m = modulus();
    let r = BigUint::from(1u32) << 256;
    assert_eq!(&r % &m, to_big(R));
    assert_eq!((&r * &r) % &m, to_big(R2));

    // INV * M = -1 mod 2^64
    assert_eq!(1u64, INV.wrapping_mul(M[0]).wrapping_neg());
}

// HELPERS
// ================================================================================================

fn modulus() -> BigUint {
    to_big(M)
}

fn to_big(limbs: [u64; 4]) -> BigUint {
    let mut bytes = Vec::with_capacity(32);
    for limb in limbs {
        bytes.extend_from_slice(&limb.to_le_bytes());
    }
    BigUint::from_bytes_le(&bytes)
}

fn random_element() -> Fr {
    Fr::new(thread_rng().gen())
}
