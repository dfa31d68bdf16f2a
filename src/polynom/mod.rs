// Copyright (c) Facebook, Inc. and its affiliates.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Polynomial point evaluation, Kate opening quotients, and pointwise
//! arithmetic over evaluation domains.

use crate::{domain::EvaluationDomain, fft::FftBuffer, iter_mut, utils, Fr};

#[cfg(feature = "concurrent")]
use rayon::prelude::*;


// POINT EVALUATION
// ================================================================================================

/// Evaluates the polynomial at a single point via Horner's method.
pub fn eval(p: &[Fr], x: Fr) -> Fr {
    p.iter().rev().fold(Fr::ZERO, |acc, coeff| acc * x + *coeff)
}

/// Evaluates the polynomial held in the first `n` entries of `coeffs` at `z`.
///
/// The coefficient range is split into one window per thread; each window
/// derives its starting power `z^offset` with a single exponentiation and
/// then walks its coefficients with a running multiplier. Partial sums are
/// combined sequentially. When the window size does not divide `n`, the last
/// window absorbs the leftover coefficients.
pub fn evaluate<V: FftBuffer + ?Sized>(coeffs: &V, z: Fr, n: usize) -> Fr {
    assert!(n <= coeffs.len(), "not enough coefficients");
    let num_threads = utils::compute_num_threads();
    let window = n / num_threads;
    let leftovers = n - window * num_threads;

    let mut partial_sums = vec![Fr::ZERO; num_threads];
    iter_mut!(partial_sums).enumerate().for_each(|(j, sum)| {
        let offset = j * window;
        let end = if j == num_threads - 1 { offset + window + leftovers } else { offset + window };
        let mut z_acc = z.pow(offset as u64);
        for i in offset..end {
            *sum += coeffs.get(i) * z_acc;
            z_acc *= z;
        }
    });

    let mut result = Fr::ZERO;
    for sum in partial_sums.iter() {
        result += *sum;
    }
    result
}

// KATE OPENING
// ================================================================================================

/// Computes the quotient `W(X) = (F(X) - F(z)) / (X - z)` for the polynomial
/// `F` held in the first `n` entries of `src`, writing the `n` quotient
/// coefficients to `dst` and returning `F(z)`.
///
/// The division is exact because the numerator vanishes at `z`; the remainder
/// is not independently re-verified. `dst[n - 1]` is always zero since the
/// quotient has degree `n - 2`.
pub fn compute_kate_opening_coefficients(src: &[Fr], dst: &mut [Fr], z: Fr, n: usize) -> Fr {
    assert!(n <= src.len() && n <= dst.len(), "not enough coefficients");
    let f = evaluate(&src[..n], z, n);
    let divisor = (-z).inv();
    dst[0] = (src[0] - f) * divisor;
    for i in 1..n {
        dst[i] = (src[i] - dst[i - 1]) * divisor;
    }
    f
}

/// In-place form of [compute_kate_opening_coefficients]: replaces the
/// polynomial's coefficients with the quotient's.
pub fn compute_kate_opening_coefficients_in_place(coeffs: &mut [Fr], z: Fr, n: usize) -> Fr {
    assert!(n <= coeffs.len(), "not enough coefficients");
    let f = evaluate(&coeffs[..n], z, n);
    let divisor = (-z).inv();
    coeffs[0] = (coeffs[0] - f) * divisor;
    for i in 1..n {
        coeffs[i] = (coeffs[i] - coeffs[i - 1]) * divisor;
    }
    f
}

// POINTWISE ARITHMETIC
// ================================================================================================

/// Writes the pointwise sum of two evaluation tables into `result`.
pub fn add(a: &[Fr], b: &[Fr], result: &mut [Fr], domain: &EvaluationDomain) {
    assert_domain(a, b, result, domain);
    iter_mut!(result, domain.thread_size).enumerate().for_each(|(i, r)| *r = a[i] + b[i]);
}

/// Writes the pointwise difference of two evaluation tables into `result`.
pub fn sub(a: &[Fr], b: &[Fr], result: &mut [Fr], domain: &EvaluationDomain) {
    assert_domain(a, b, result, domain);
    iter_mut!(result, domain.thread_size).enumerate().for_each(|(i, r)| *r = a[i] - b[i]);
}

/// Writes the pointwise product of two evaluation tables into `result`.
pub fn mul(a: &[Fr], b: &[Fr], result: &mut [Fr], domain: &EvaluationDomain) {
    assert_domain(a, b, result, domain);
    iter_mut!(result, domain.thread_size).enumerate().for_each(|(i, r)| *r = a[i] * b[i]);
}

fn assert_domain(a: &[Fr], b: &[Fr], result: &[Fr], domain: &EvaluationDomain) {
    assert_eq!(domain.size, a.len(), "first operand must span the domain");
    assert_eq!(domain.size, b.len(), "second operand must span the domain");
    assert_eq!(domain.size, result.len(), "result must span the domain");
}
