// Copyright (c) Facebook, Inc. and its affiliates.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

use rand::{thread_rng, Rng};

use crate::{
    domain::EvaluationDomain,
    fft::{self, ScratchBuffer},
    polynom, Fr,
};

// SUBGROUP CONSTRUCTION
// ================================================================================================

#[test]
fn multiplicative_subgroup_covers_coset_powers() {
    let n = 16usize;
    let s = 4usize;
    let src_domain = EvaluationDomain::new(n);
    let target_domain = EvaluationDomain::new(n * s);

    let subgroup = super::compute_multiplicative_subgroup(2, &src_domain);
    assert_eq!(s, subgroup.len());

    // x^n cycles through the subgroup as x walks the target coset
    let mut x = src_domain.generator;
    for i in 0..n * s {
        assert_eq!(subgroup[i % s], x.pow(n as u64));
        x *= target_domain.root;
    }
}

// LAGRANGE POLYNOMIAL FFT
// ================================================================================================

#[test]
fn lagrange_polynomial_fft_recovers_indicator() {
    let n = 64usize;
    let src_domain = EvaluationDomain::new(n);
    let target_domain = EvaluationDomain::new(2 * n);
    let mut scratch = ScratchBuffer::new();

    let mut l_1 = vec![Fr::ZERO; 2 * n];
    super::compute_lagrange_polynomial_fft(&mut l_1, &src_domain, &target_domain);

    // back to coefficient form; L_1 has degree n - 1, so the high half of the
    // coefficients must vanish
    fft::coset_ifft(l_1.as_mut_slice(), &target_domain, &mut scratch);
    for coefficient in l_1.iter().skip(n) {
        assert_eq!(Fr::ZERO, *coefficient);
    }

    // indicator of the first domain point: 1 at w^0, 0 elsewhere
    let mut x = Fr::ONE;
    for i in 0..n {
        let expected = if i == 0 { Fr::ONE } else { Fr::ZERO };
        assert_eq!(expected, polynom::eval(&l_1[..n], x));
        x *= src_domain.root;
    }

    // closed form agreement at a random challenge
    let z = random_element();
    let evals = super::get_lagrange_evaluations(z, &src_domain, 0);
    assert_eq!(evals.l_start, polynom::eval(&l_1[..n], z));

    // shifting the argument by w^2 turns L_1 into the indicator of w^{n-2}
    let mut indicator = vec![Fr::ZERO; n];
    indicator[n - 2] = Fr::ONE;
    fft::ifft(indicator.as_mut_slice(), &src_domain, &mut scratch);
    let shifted_z = z * src_domain.root.square();
    assert_eq!(polynom::eval(&indicator, z), polynom::eval(&l_1[..n], shifted_z));
}

// VANISHING POLYNOMIAL DIVISION
// ================================================================================================

#[test]
fn pseudo_vanishing_division_bounds_quotient_degree() {
    let n = 64usize;
    let num_roots_cut = 1usize;
    let src_domain = EvaluationDomain::new(n);
    let target_domain = EvaluationDomain::with_generator_size(4 * n, 4 * n);
    let mut scratch = ScratchBuffer::new();

    // a * b - c vanishes on the subgroup, so Z_H divides it exactly
    let mut a = random_vector(n);
    let mut b = random_vector(n);
    let mut c: Vec<Fr> = a.iter().zip(b.iter()).map(|(x, y)| *x * *y).collect();

    fft::ifft(a.as_mut_slice(), &src_domain, &mut scratch);
    fft::ifft(b.as_mut_slice(), &src_domain, &mut scratch);
    fft::ifft(c.as_mut_slice(), &src_domain, &mut scratch);
    a.resize(4 * n, Fr::ZERO);
    b.resize(4 * n, Fr::ZERO);
    c.resize(4 * n, Fr::ZERO);
    fft::coset_fft(a.as_mut_slice(), &target_domain, &mut scratch);
    fft::coset_fft(b.as_mut_slice(), &target_domain, &mut scratch);
    fft::coset_fft(c.as_mut_slice(), &target_domain, &mut scratch);

    let mut r = vec![Fr::ZERO; 4 * n];
    polynom::mul(&a, &b, &mut r, &target_domain);
    let ab = r.clone();
    polynom::sub(&ab, &c, &mut r, &target_domain);
    let numerator_evals = r.clone();

    super::divide_by_pseudo_vanishing_polynomial(
        r.as_mut_slice(),
        &src_domain,
        &target_domain,
        num_roots_cut,
    );

    // multiplying back by directly computed Z*_H evaluations reproduces the
    // numerator
    let w_last = src_domain.root.pow((n - 1) as u64);
    let mut x = target_domain.generator;
    for i in 0..4 * n {
        let z_star = (x.pow(n as u64) - Fr::ONE) * (x - w_last).inv();
        assert_eq!(numerator_evals[i], r[i] * z_star);
        x *= target_domain.root;
    }

    // quotient degree is bounded by n, so only the low n + 1 coefficients may
    // be non-zero
    fft::coset_ifft(r.as_mut_slice(), &target_domain, &mut scratch);
    for coefficient in r.iter().skip(n + 1) {
        assert_eq!(Fr::ZERO, *coefficient);
    }
}

#[test]
fn pseudo_vanishing_division_chunked_matches_contiguous() {
    let n = 32usize;
    let src_domain = EvaluationDomain::new(n);
    let target_domain = EvaluationDomain::new(4 * n);
    let mut scratch = ScratchBuffer::new();

    // any coset evaluation table works; divisibility only matters for the
    // degree bound, not for the arithmetic itself
    let mut values = random_vector(n);
    fft::ifft(values.as_mut_slice(), &src_domain, &mut scratch);
    values.resize(4 * n, Fr::ZERO);
    fft::coset_fft(values.as_mut_slice(), &target_domain, &mut scratch);

    let mut expected = values.clone();
    super::divide_by_pseudo_vanishing_polynomial(
        expected.as_mut_slice(),
        &src_domain,
        &target_domain,
        2,
    );

    let mut chunks: Vec<Vec<Fr>> = values.chunks(n).map(<[Fr]>::to_vec).collect();
    super::divide_by_pseudo_vanishing_polynomial(
        chunks.as_mut_slice(),
        &src_domain,
        &target_domain,
        2,
    );
    assert_eq!(expected, chunks.concat());
}

// CLOSED-FORM EVALUATIONS
// ================================================================================================

#[test]
fn lagrange_evaluations_match_interpolants() {
    let n = 16usize;
    let num_roots_cut = 1usize;
    let domain = EvaluationDomain::new(n);
    let mut scratch = ScratchBuffer::new();
    let z = random_element();

    let evals = super::get_lagrange_evaluations(z, &domain, num_roots_cut);

    // Z*_H(z) = (z^n - 1) / (z - w^{n-1})
    let w_last = domain.root.pow((n - 1) as u64);
    assert_eq!((z.pow(n as u64) - Fr::ONE) * (z - w_last).inv(), evals.vanishing_poly);

    // l_start is the interpolant of the indicator of w^0
    let mut l_start_poly = vec![Fr::ZERO; n];
    l_start_poly[0] = Fr::ONE;
    fft::ifft(l_start_poly.as_mut_slice(), &domain, &mut scratch);
    assert_eq!(polynom::eval(&l_start_poly, z), evals.l_start);

    // with one root cut, l_end is the interpolant of the indicator of w^{n-2}
    let mut l_end_poly = vec![Fr::ZERO; n];
    l_end_poly[n - 2] = Fr::ONE;
    fft::ifft(l_end_poly.as_mut_slice(), &domain, &mut scratch);
    assert_eq!(polynom::eval(&l_end_poly, z), evals.l_end);
}

#[test]
fn lagrange_evaluations_track_num_roots_cut() {
    let n = 16usize;
    let domain = EvaluationDomain::new(n);
    let mut scratch = ScratchBuffer::new();
    let z = random_element();

    for num_roots_cut in [0usize, 2, 4] {
        let evals = super::get_lagrange_evaluations(z, &domain, num_roots_cut);

        let mut denominator = Fr::ONE;
        for i in 0..num_roots_cut {
            denominator *= z - domain.root.pow((n - 1 - i) as u64);
        }
        assert_eq!((z.pow(n as u64) - Fr::ONE) * denominator.inv(), evals.vanishing_poly);

        let mut l_end_poly = vec![Fr::ZERO; n];
        l_end_poly[n - 1 - num_roots_cut] = Fr::ONE;
        fft::ifft(l_end_poly.as_mut_slice(), &domain, &mut scratch);
        assert_eq!(polynom::eval(&l_end_poly, z), evals.l_end);
    }
}

#[test]
fn barycentric_evaluation_matches_interpolation() {
    let n = 16usize;
    let domain = EvaluationDomain::new(n);
    let mut scratch = ScratchBuffer::new();

    // a half-filled evaluation table: the interpolant is zero on the upper
    // half of the domain
    let mut evaluations = random_vector(n / 2);
    evaluations.resize(n, Fr::ZERO);

    let z = Fr::from(2u64);
    let result = super::compute_barycentric_evaluation(&evaluations, n / 2, z, &domain);

    let mut coefficients = evaluations;
    fft::ifft(coefficients.as_mut_slice(), &domain, &mut scratch);
    assert_eq!(polynom::eval(&coefficients, z), result);
}

// HELPERS
// ================================================================================================

fn random_element() -> Fr {
    Fr::new(thread_rng().gen())
}

fn random_vector(n: usize) -> Vec<Fr> {
    (0..n).map(|_| random_element()).collect()
}
