// Copyright (c) Facebook, Inc. and its affiliates.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Lagrange basis and vanishing polynomial evaluation.
//!
//! The functions here serve the quotient-polynomial step of a PLONK-style
//! prover: building the evaluations of the first Lagrange basis polynomial
//! over an extended coset, dividing evaluation-form data by the
//! pseudo-vanishing polynomial `Z*_H`, and evaluating `Z*_H` and boundary
//! Lagrange polynomials at a verifier challenge. Every operation performs
//! exactly one batched field inversion.
//!
//! A recurring trick: for a source subgroup `H` of size `n` and a target
//! domain of size `n * s`, the map `x -> x^n` sends every point `g * w^i` of
//! the target coset to one of only `s` distinct values, indexed by `i mod s`.
//! Numerators of the form `x^n - 1` are therefore precomputed once per
//! subgroup slot and reused cyclically.

use crate::{
    chunks_mut,
    domain::EvaluationDomain,
    fft::FftBuffer,
    utils::{batch_invert, get_power_series_with_offset, uninit_vector},
    Fr,
};

#[cfg(feature = "concurrent")]
use rayon::prelude::*;

#[cfg(test)]
mod tests;

// LAGRANGE EVALUATIONS
// ================================================================================================

/// Evaluations of the pseudo-vanishing polynomial and the boundary Lagrange
/// polynomials at a single point, as returned by [get_lagrange_evaluations].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LagrangeEvaluations {
    /// `Z*_H(z)`, the vanishing polynomial with `num_roots_cut` roots removed.
    pub vanishing_poly: Fr,
    /// `L_1(z)`, the Lagrange polynomial of the first domain point.
    pub l_start: Fr,
    /// The Lagrange polynomial of the last domain point not cut out of
    /// `Z*_H`, evaluated at `z`.
    pub l_end: Fr,
}

// SUBGROUP CONSTRUCTION
// ================================================================================================

/// Returns the `2^log2_subgroup_size` distinct values taken by `x^n` as `x`
/// ranges over the coset of a target domain extending `src_domain` (of size
/// `n`) by a factor of `2^log2_subgroup_size`: entry `j` is
/// `(g * w_target^j)^n = g^n * w_sub^j` for the subgroup root `w_sub`.
pub fn compute_multiplicative_subgroup(
    log2_subgroup_size: u32,
    src_domain: &EvaluationDomain,
) -> Vec<Fr> {
    let subgroup_root = Fr::get_root_of_unity(log2_subgroup_size);
    // the cofactor g^n via log2(n) squarings
    let mut accumulator = src_domain.generator;
    for _ in 0..src_domain.log2_size {
        accumulator = accumulator.square();
    }
    get_power_series_with_offset(subgroup_root, accumulator, 1 << log2_subgroup_size)
}

// LAGRANGE POLYNOMIAL FFT
// ================================================================================================

/// Fills `l_1_coefficients` with the evaluations of
/// `L_1(X) = (X^n - 1) / (n * (X - 1))` over the coset of `target_domain`,
/// where `n` is the size of `src_domain`.
///
/// The denominators `g * w^i - 1` are filled directly and inverted in one
/// batch; the numerators `(g * w^i)^n - 1` cycle through one subgroup's worth
/// of values and are computed once.
///
/// # Panics
/// Panics if the buffer length differs from the target domain size, or the
/// target domain is smaller than the source domain.
pub fn compute_lagrange_polynomial_fft(
    l_1_coefficients: &mut [Fr],
    src_domain: &EvaluationDomain,
    target_domain: &EvaluationDomain,
) {
    assert_eq!(target_domain.size, l_1_coefficients.len(), "buffer must span the target domain");
    assert!(
        target_domain.log2_size >= src_domain.log2_size,
        "target domain must not be smaller than the source domain"
    );

    chunks_mut!(l_1_coefficients, target_domain.thread_size).enumerate().for_each(|(j, range)| {
        let offset = j * target_domain.thread_size;
        let mut work_root = src_domain.generator * target_domain.root.pow(offset as u64);
        for value in range.iter_mut() {
            *value = work_root - Fr::ONE;
            work_root *= target_domain.root;
        }
    });

    batch_invert(l_1_coefficients);

    let log2_subgroup_size = target_domain.log2_size - src_domain.log2_size;
    let subgroup_size = 1usize << log2_subgroup_size;
    let mut subgroup_roots = compute_multiplicative_subgroup(log2_subgroup_size, src_domain);
    for root in subgroup_roots.iter_mut() {
        *root -= Fr::ONE;
        *root *= src_domain.domain_inverse;
    }

    if subgroup_size >= target_domain.thread_size {
        for block in l_1_coefficients.chunks_mut(subgroup_size) {
            for (value, root) in block.iter_mut().zip(subgroup_roots.iter()) {
                *value *= *root;
            }
        }
    } else {
        // thread ranges are multiples of the subgroup size, so the cyclic
        // pattern stays aligned within each range
        chunks_mut!(l_1_coefficients, target_domain.thread_size).for_each(|range| {
            for block in range.chunks_mut(subgroup_size) {
                for (value, root) in block.iter_mut().zip(subgroup_roots.iter()) {
                    *value *= *root;
                }
            }
        });
    }
}

// VANISHING POLYNOMIAL DIVISION
// ================================================================================================

/// Divides evaluation-form data over the coset of `target_domain` by the
/// pseudo-vanishing polynomial
/// `Z*_H(X) = (X^n - 1) / ((X - w^{n-1}) ... (X - w^{n-num_roots_cut}))`
/// of the source subgroup, in place.
///
/// Cutting roots out of `Z_H` keeps the quotient degree-bounded when blinding
/// has raised the numerator's degree. The denominator's `x^n - 1` values
/// cycle through one subgroup's worth of entries (inverted in a single
/// batch); the numerator corrections `(x - w^{n-1-i})` are applied per point
/// via the advancing coset root.
pub fn divide_by_pseudo_vanishing_polynomial<V: FftBuffer + ?Sized>(
    coeffs: &mut V,
    src_domain: &EvaluationDomain,
    target_domain: &EvaluationDomain,
    num_roots_cut: usize,
) {
    assert_eq!(target_domain.size, coeffs.len(), "buffer must span the target domain");
    assert!(
        target_domain.log2_size >= src_domain.log2_size,
        "target domain must not be smaller than the source domain"
    );
    coeffs.validate_layout();

    let log2_subgroup_size = target_domain.log2_size - src_domain.log2_size;
    let subgroup_size = 1usize << log2_subgroup_size;
    let mut subgroup_roots = compute_multiplicative_subgroup(log2_subgroup_size, src_domain);
    for root in subgroup_roots.iter_mut() {
        *root -= Fr::ONE;
    }
    batch_invert(&mut subgroup_roots);

    // constants such that x + numerator_constants[i] == x - w^{n-1-i}
    let mut numerator_constants = Vec::with_capacity(num_roots_cut);
    if num_roots_cut > 0 {
        numerator_constants.push(-src_domain.root_inverse);
        for i in 1..num_roots_cut {
            let next = numerator_constants[i - 1] * src_domain.root_inverse;
            numerator_constants.push(next);
        }
    }

    let subgroup_mask = subgroup_size - 1;
    coeffs.process_ranges(target_domain.num_threads, |start, range| {
        let mut work_root = src_domain.generator * target_domain.root.pow(start as u64);
        for (i, value) in range.iter_mut().enumerate() {
            let mut temp = *value * subgroup_roots[(start + i) & subgroup_mask];
            for constant in numerator_constants.iter() {
                temp *= work_root + *constant;
            }
            *value = temp;
            work_root *= target_domain.root;
        }
    });
}

// CLOSED-FORM EVALUATIONS
// ================================================================================================

/// Evaluates `Z*_H`, `L_1`, and the last uncut Lagrange polynomial at `z` via
/// closed-form rational expressions, inverting all three denominators in one
/// batch.
pub fn get_lagrange_evaluations(
    z: Fr,
    domain: &EvaluationDomain,
    num_roots_cut: usize,
) -> LagrangeEvaluations {
    let mut z_pow = z;
    for _ in 0..domain.log2_size {
        z_pow = z_pow.square();
    }
    let numerator = z_pow - Fr::ONE;

    let mut denominators = [Fr::ONE; 3];
    let mut work_root = domain.root_inverse;
    for _ in 0..num_roots_cut {
        denominators[0] *= z - work_root;
        work_root *= domain.root_inverse;
    }
    denominators[1] = z - Fr::ONE;

    // w^{num_roots_cut + 1}, built from squared steps to keep the loop count
    // at num_roots_cut / 2
    let mut l_end_root =
        if num_roots_cut & 1 == 1 { domain.root.square() } else { domain.root };
    for _ in 0..num_roots_cut / 2 {
        l_end_root *= domain.root.square();
    }
    denominators[2] = z * l_end_root - Fr::ONE;

    batch_invert(&mut denominators);

    let scaled_numerator = numerator * domain.domain_inverse;
    LagrangeEvaluations {
        vanishing_poly: numerator * denominators[0],
        l_start: scaled_numerator * denominators[1],
        l_end: scaled_numerator * denominators[2],
    }
}

/// Evaluates at `z` the polynomial interpolating `evaluations` over the
/// domain, directly from evaluation form:
/// `(z^n - 1) / n * sum(evaluations[i] / (z * w^{-i} - 1))`.
///
/// Only the first `num_coeffs` evaluations contribute; the interpolant is
/// taken to be zero at the remaining domain points.
pub fn compute_barycentric_evaluation(
    evaluations: &[Fr],
    num_coeffs: usize,
    z: Fr,
    domain: &EvaluationDomain,
) -> Fr {
    assert!(num_coeffs > 0, "cannot evaluate from an empty table");
    assert!(num_coeffs <= domain.size, "cannot use more evaluations than domain points");
    assert!(num_coeffs <= evaluations.len(), "not enough evaluations");

    let mut numerator = z;
    for _ in 0..domain.log2_size {
        numerator = numerator.square();
    }
    numerator = (numerator - Fr::ONE) * domain.domain_inverse;

    let mut denominators = unsafe { uninit_vector(num_coeffs) };
    denominators[0] = z - Fr::ONE;
    let mut work_root = domain.root_inverse;
    for denominator in denominators.iter_mut().skip(1) {
        *denominator = work_root * z - Fr::ONE;
        work_root *= domain.root_inverse;
    }
    batch_invert(&mut denominators);

    let mut result = Fr::ZERO;
    for (evaluation, denominator) in evaluations.iter().zip(denominators.iter()) {
        result += *evaluation * *denominator;
    }
    result * numerator
}
