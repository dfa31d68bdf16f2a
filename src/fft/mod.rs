// Copyright (c) Facebook, Inc. and its affiliates.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Radix-2 transforms between coefficient and evaluation form.
//!
//! The core algorithm is an iterative Cooley-Tukey FFT with the bit-reversal
//! permutation fused into the first butterfly round. All rounds but the last
//! operate on scratch memory; the last round writes its results through the
//! caller's [FftBuffer] view, so one implementation serves the contiguous and
//! the chunked polynomial layouts. Twiddles come from the evaluation domain's
//! cached round tables.
//!
//! Coset variants scale coefficients by powers of the domain's coset
//! generator before (or after, for the inverse direction) the transform;
//! [coset_fft_extended] evaluates one polynomial over several cosets at once
//! and interleaves the results into a single extended evaluation table.

use crate::{
    chunks_mut,
    domain::EvaluationDomain,
    utils::{get_power_series_with_offset, log2},
    Fr,
};

#[cfg(feature = "concurrent")]
use rayon::prelude::*;

mod buffer;
pub use buffer::{FftBuffer, ScratchBuffer};


// FORWARD TRANSFORMS
// ================================================================================================

/// Interpolates the polynomial held in `values` (coefficient form) into its
/// evaluations over the domain, in place.
///
/// # Panics
/// Panics if the buffer's length differs from the domain size or the chunked
/// layout is malformed.
pub fn fft<V: FftBuffer + ?Sized>(
    values: &mut V,
    domain: &EvaluationDomain,
    scratch: &mut ScratchBuffer,
) {
    assert_buffer(values, domain);
    fft_inner(values, domain, domain.get_round_roots(), scratch);
}

/// In-place forward transform followed by scaling every evaluation by `value`.
pub fn fft_with_constant<V: FftBuffer + ?Sized>(
    values: &mut V,
    domain: &EvaluationDomain,
    scratch: &mut ScratchBuffer,
    value: Fr,
) {
    fft(values, domain, scratch);
    scale_uniform(values, domain, value);
}

/// Forward transform of `src` into `dst`; `src` is left untouched and `dst`
/// doubles as the scratch memory for all rounds.
pub fn fft_to(src: &[Fr], dst: &mut [Fr], domain: &EvaluationDomain) {
    assert_buffer(src, domain);
    assert_eq!(src.len(), dst.len(), "source and destination must have equal lengths");
    fft_inner_to(src, dst, domain, domain.get_round_roots());
}

// INVERSE TRANSFORMS
// ================================================================================================

/// Converts the evaluations held in `values` back into coefficient form, in
/// place.
pub fn ifft<V: FftBuffer + ?Sized>(
    values: &mut V,
    domain: &EvaluationDomain,
    scratch: &mut ScratchBuffer,
) {
    assert_buffer(values, domain);
    fft_inner(values, domain, domain.get_inverse_round_roots(), scratch);
    scale_uniform(values, domain, domain.domain_inverse);
}

/// In-place inverse transform with every output coefficient additionally
/// scaled by `value`.
pub fn ifft_with_constant<V: FftBuffer + ?Sized>(
    values: &mut V,
    domain: &EvaluationDomain,
    scratch: &mut ScratchBuffer,
    value: Fr,
) {
    assert_buffer(values, domain);
    fft_inner(values, domain, domain.get_inverse_round_roots(), scratch);
    scale_uniform(values, domain, domain.domain_inverse * value);
}

/// Inverse transform of `src` into `dst`; `dst` doubles as the scratch memory
/// for all rounds.
pub fn ifft_to(src: &[Fr], dst: &mut [Fr], domain: &EvaluationDomain) {
    assert_buffer(src, domain);
    assert_eq!(src.len(), dst.len(), "source and destination must have equal lengths");
    fft_inner_to(src, dst, domain, domain.get_inverse_round_roots());
    scale_uniform(dst, domain, domain.domain_inverse);
}

// COSET TRANSFORMS
// ================================================================================================

/// Evaluates the polynomial over the coset `g * H` of the domain subgroup `H`,
/// in place: coefficients are scaled by powers of the coset generator, then
/// forward-transformed.
pub fn coset_fft<V: FftBuffer + ?Sized>(
    values: &mut V,
    domain: &EvaluationDomain,
    scratch: &mut ScratchBuffer,
) {
    scale_by_generator(values, domain, Fr::ONE, domain.generator);
    fft(values, domain, scratch);
}

/// Coset transform of `src` into `dst`; `src` is left untouched.
pub fn coset_fft_to(
    src: &[Fr],
    dst: &mut [Fr],
    domain: &EvaluationDomain,
    scratch: &mut ScratchBuffer,
) {
    assert_eq!(src.len(), dst.len(), "source and destination must have equal lengths");
    scale_by_generator_to(src, dst, domain, Fr::ONE, domain.generator);
    fft(dst, domain, scratch);
}

/// Coset transform with every coefficient pre-scaled by `constant`.
pub fn coset_fft_with_constant<V: FftBuffer + ?Sized>(
    values: &mut V,
    domain: &EvaluationDomain,
    scratch: &mut ScratchBuffer,
    constant: Fr,
) {
    scale_by_generator(values, domain, constant, domain.generator);
    fft(values, domain, scratch);
}

/// Coset transform over the coset generated by an arbitrary shift instead of
/// the domain's own generator.
pub fn coset_fft_with_generator_shift<V: FftBuffer + ?Sized>(
    values: &mut V,
    domain: &EvaluationDomain,
    scratch: &mut ScratchBuffer,
    shift: Fr,
) {
    scale_by_generator(values, domain, Fr::ONE, shift);
    fft(values, domain, scratch);
}

/// Evaluates the polynomial held in the first `domain.size` entries of
/// `coeffs` over `domain_extension` distinct cosets of the domain at once.
///
/// The cosets are shifted by `g`, `g*r`, `g*r^2`, ... where `g` is the
/// domain's coset generator and `r` is a primitive root of unity of order
/// `domain.size * domain_extension`; together they cover the full coset of
/// the extended domain. On return, position `i * domain_extension + j` of
/// `coeffs` holds coset `j`'s evaluation at the `i`-th domain point, which is
/// exactly the extended-domain coset evaluation order.
///
/// # Panics
/// Panics if `domain_extension` is not a power of two or `coeffs` is not
/// `domain.size * domain_extension` elements long.
pub fn coset_fft_extended(
    coeffs: &mut [Fr],
    domain: &EvaluationDomain,
    scratch: &mut ScratchBuffer,
    domain_extension: usize,
) {
    assert!(
        domain_extension.is_power_of_two(),
        "domain extension must be a power of two, but was {domain_extension}"
    );
    let log2_extension = log2(domain_extension);
    let n = domain.size;
    assert_eq!(n * domain_extension, coeffs.len(), "buffer must span the extended domain");

    let primitive_root = Fr::get_root_of_unity(domain.log2_size + log2_extension);
    let coset_generators =
        get_power_series_with_offset(primitive_root, domain.generator, domain_extension);

    // scale the source coefficients into each region, top region first so the
    // source (region 0) is consumed before it is scaled in place
    for i in (1..domain_extension).rev() {
        let (src, rest) = coeffs.split_at_mut(n);
        scale_by_generator_to(src, &mut rest[(i - 1) * n..i * n], domain, Fr::ONE, coset_generators[i]);
    }
    scale_by_generator(&mut coeffs[..n], domain, Fr::ONE, coset_generators[0]);

    // one forward transform per coset, into the matching scratch region
    let scratch = scratch.get(n << log2_extension);
    for (region, scratch_region) in coeffs.chunks(n).zip(scratch.chunks_mut(n)) {
        fft_inner_to(region, scratch_region, domain, domain.get_round_roots());
    }

    // interleave the per-coset evaluations into extended-domain order
    let scratch = &*scratch;
    chunks_mut!(coeffs, domain.thread_size << log2_extension).enumerate().for_each(
        |(t, out)| {
            let base = t * domain.thread_size;
            for i in 0..domain.thread_size {
                for j in 0..domain_extension {
                    out[(i << log2_extension) + j] = scratch[base + i + (j << domain.log2_size)];
                }
            }
        },
    );
}

/// Undoes [coset_fft]: inverse transform followed by dividing out the coset
/// generator powers.
pub fn coset_ifft<V: FftBuffer + ?Sized>(
    values: &mut V,
    domain: &EvaluationDomain,
    scratch: &mut ScratchBuffer,
) {
    ifft(values, domain, scratch);
    scale_by_generator(values, domain, Fr::ONE, domain.generator_inverse);
}

// SCALING & COMPRESSION
// ================================================================================================

/// Multiplies element `i` of the buffer by `generator_start * generator_shift^i`,
/// in place. Each fork-join partition derives its starting power with a single
/// exponentiation and advances it with one multiplication per element.
pub fn scale_by_generator<V: FftBuffer + ?Sized>(
    values: &mut V,
    domain: &EvaluationDomain,
    generator_start: Fr,
    generator_shift: Fr,
) {
    values.process_ranges(domain.num_threads, |start, range| {
        let mut work_generator = generator_start * generator_shift.pow(start as u64);
        for value in range.iter_mut() {
            *value *= work_generator;
            work_generator *= generator_shift;
        }
    });
}

/// Writes `src[i] * generator_start * generator_shift^i` into `dst[i]`.
pub fn scale_by_generator_to(
    src: &[Fr],
    dst: &mut [Fr],
    domain: &EvaluationDomain,
    generator_start: Fr,
    generator_shift: Fr,
) {
    assert_eq!(src.len(), dst.len(), "source and destination must have equal lengths");
    let range_size = (src.len() / domain.num_threads).max(1);
    chunks_mut!(dst, range_size).enumerate().for_each(|(j, range)| {
        let start = j * range_size;
        let mut work_generator = generator_start * generator_shift.pow(start as u64);
        for (value, s) in range.iter_mut().zip(src[start..].iter()) {
            *value = *s * work_generator;
            work_generator *= generator_shift;
        }
    });
}

/// Decimates an evaluation table by the specified power-of-two factor,
/// returning every `compress_factor`-th evaluation. If the table was produced
/// by an FFT over a domain of `n` points, the result is the FFT of the same
/// polynomial over the subgroup of `n / compress_factor` points, provided the
/// polynomial's degree fits the smaller domain.
pub fn compress_fft(src: &[Fr], compress_factor: usize) -> Vec<Fr> {
    assert!(
        compress_factor.is_power_of_two(),
        "compression factor must be a power of two, but was {compress_factor}"
    );
    src.iter().step_by(compress_factor).copied().collect()
}

// CORE ALGORITHM
// ================================================================================================

/// Reverses the low `bit_length` bits of `value`.
#[inline(always)]
pub fn reverse_bits(value: usize, bit_length: u32) -> usize {
    value.reverse_bits() >> (usize::BITS - bit_length)
}

/// Butterfly network over an arbitrary buffer view. All rounds but the last
/// run on scratch memory; the last writes through the view.
fn fft_inner<V: FftBuffer + ?Sized>(
    values: &mut V,
    domain: &EvaluationDomain,
    root_tables: &[Vec<Fr>],
    scratch: &mut ScratchBuffer,
) {
    let size = domain.size;
    let scratch = scratch.get(size);

    apply_permuted_first_round(&*values, scratch, domain);

    if size <= 2 {
        values.set(0, scratch[0]);
        if size == 2 {
            values.set(1, scratch[1]);
        }
        return;
    }

    for round in 1..(domain.log2_size as usize - 1) {
        apply_butterfly_round(scratch, &root_tables[round - 1], 1 << round);
    }

    values.combine_final_round(scratch, &root_tables[domain.log2_size as usize - 2]);
}

/// Butterfly network from `src` into `dst`; `dst` serves as scratch for every
/// round, so no separate final-round write-back is needed.
fn fft_inner_to(src: &[Fr], dst: &mut [Fr], domain: &EvaluationDomain, root_tables: &[Vec<Fr>]) {
    apply_permuted_first_round(src, dst, domain);
    for round in 1..domain.log2_size as usize {
        apply_butterfly_round(dst, &root_tables[round - 1], 1 << round);
    }
}

/// First butterfly round fused with the bit-reversal permutation: gathers
/// bit-reversed pairs from the view and writes their sum and difference to
/// consecutive scratch positions. First-round twiddles are all 1, so no root
/// multiplication is needed.
fn apply_permuted_first_round<V: FftBuffer + ?Sized>(
    values: &V,
    scratch: &mut [Fr],
    domain: &EvaluationDomain,
) {
    let log2_size = domain.log2_size;
    chunks_mut!(scratch, domain.thread_size).enumerate().for_each(|(j, chunk)| {
        let base = j * domain.thread_size;
        for i in (0..chunk.len()).step_by(2) {
            let even = values.get(reverse_bits(base + i, log2_size));
            let odd = values.get(reverse_bits(base + i + 1, log2_size));
            chunk[i] = even + odd;
            chunk[i + 1] = even - odd;
        }
    });
}

/// One in-place butterfly round with block half-size `m`: within each block of
/// `2m` elements, combines element `j` with element `j + m` using the round's
/// `j`-th twiddle.
fn apply_butterfly_round(scratch: &mut [Fr], round_roots: &[Fr], m: usize) {
    chunks_mut!(scratch, m << 1).for_each(|block| {
        for j in 0..m {
            let t = round_roots[j] * block[j + m];
            block[j + m] = block[j] - t;
            block[j] += t;
        }
    });
}

/// Multiplies every element of the buffer by `value`.
fn scale_uniform<V: FftBuffer + ?Sized>(values: &mut V, domain: &EvaluationDomain, value: Fr) {
    values.process_ranges(domain.num_threads, |_, range| {
        for v in range.iter_mut() {
            *v *= value;
        }
    });
}

fn assert_buffer<V: FftBuffer + ?Sized>(values: &V, domain: &EvaluationDomain) {
    values.validate_layout();
    assert_eq!(
        domain.size,
        values.len(),
        "buffer length must match the domain size"
    );
    assert!(domain.size >= 2, "domain must hold at least two points");
}
