// Copyright (c) Facebook, Inc. and its affiliates.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Multiplicative evaluation domains for radix-2 transforms.
//!
//! An [EvaluationDomain] bundles everything the transforms in this crate need
//! to know about a power-of-two subgroup of the field: its generator (a
//! primitive root of unity), the coset shift used for evaluations off the
//! subgroup, the fork-join partitioning used by parallel transforms, and the
//! per-round twiddle tables that radix-2 butterflies consume. The twiddle
//! tables are built lazily on first use and cached for the lifetime of the
//! domain, so repeated transforms over the same domain pay the table cost
//! exactly once.

use std::sync::OnceLock;

use crate::{
    field::{Fr, GENERATOR},
    utils::{self, get_power_series, log2},
};


// CONSTANTS
// ================================================================================================

/// Domains holding at most this many points per available thread are processed
/// on a single thread.
const MIN_GROUP_SIZE: usize = 8;

// EVALUATION DOMAIN
// ================================================================================================

/// A multiplicative subgroup of order `size` (a power of two), together with
/// the cached state shared by all transforms over it.
#[derive(Debug)]
pub struct EvaluationDomain {
    /// Number of points in the domain; always a power of two.
    pub size: usize,
    /// Number of fork-join partitions used by parallel transforms; a power of
    /// two that divides `size`.
    pub num_threads: usize,
    /// Number of points each partition covers; `size / num_threads`.
    pub thread_size: usize,
    pub log2_size: u32,
    pub log2_num_threads: u32,
    pub log2_thread_size: u32,
    /// A primitive `size`-th root of unity.
    pub root: Fr,
    pub root_inverse: Fr,
    /// The domain size as a field element.
    pub domain: Fr,
    /// Inverse of the domain size; the post-scaling factor of inverse
    /// transforms.
    pub domain_inverse: Fr,
    /// Multiplicative generator of the field, used as the coset shift.
    pub generator: Fr,
    pub generator_inverse: Fr,
    /// Size of the domain this domain's coset evaluations are consumed on;
    /// equal to `size` unless the domain was created for an extended target.
    pub generator_size: usize,
    round_roots: OnceLock<Vec<Vec<Fr>>>,
    inverse_round_roots: OnceLock<Vec<Vec<Fr>>>,
}

impl EvaluationDomain {
    /// Returns a new evaluation domain of the specified size.
    ///
    /// # Panics
    /// Panics if `size` is not a power of two.
    pub fn new(size: usize) -> Self {
        Self::with_generator_size(size, size)
    }

    /// Returns a new evaluation domain of the specified size whose coset
    /// evaluations will be consumed on a domain of `generator_size` points.
    ///
    /// # Panics
    /// Panics if `size` is not a power of two.
    pub fn with_generator_size(size: usize, generator_size: usize) -> Self {
        assert!(size.is_power_of_two(), "domain size must be a power of two, but was {size}");
        let log2_size = log2(size);
        let num_threads = compute_num_threads(size);
        let root = Fr::get_root_of_unity(log2_size);
        let domain = Fr::from(size as u64);
        let generator = Fr::from(GENERATOR);
        EvaluationDomain {
            size,
            num_threads,
            thread_size: size / num_threads,
            log2_size,
            log2_num_threads: log2(num_threads),
            log2_thread_size: log2(size / num_threads),
            root,
            root_inverse: root.inv(),
            domain,
            domain_inverse: domain.inv(),
            generator,
            generator_inverse: generator.inv(),
            generator_size,
            round_roots: OnceLock::new(),
            inverse_round_roots: OnceLock::new(),
        }
    }

    /// Returns the forward twiddle tables, building them on first call.
    ///
    /// Table `i` serves the butterfly round with block half-size
    /// `m = 2^(i + 1)` and holds the `m` consecutive powers of
    /// `root^(size / 2m)` starting at 1; the round with `m = 1` needs no table
    /// since all of its twiddles are 1.
    pub fn get_round_roots(&self) -> &[Vec<Fr>] {
        self.round_roots.get_or_init(|| build_round_roots(self.root, self.size))
    }

    /// Returns the inverse twiddle tables, building them on first call.
    pub fn get_inverse_round_roots(&self) -> &[Vec<Fr>] {
        self.inverse_round_roots.get_or_init(|| build_round_roots(self.root_inverse, self.size))
    }
}

// HELPER FUNCTIONS
// ================================================================================================

fn compute_num_threads(size: usize) -> usize {
    let num_threads = utils::compute_num_threads();
    if size <= num_threads * MIN_GROUP_SIZE {
        1
    } else {
        num_threads
    }
}

fn build_round_roots(root: Fr, size: usize) -> Vec<Vec<Fr>> {
    let num_rounds = (log2(size) as usize).saturating_sub(1);
    (0..num_rounds)
        .map(|i| {
            let m = 1usize << (i + 1);
            get_power_series(root.pow((size / (2 * m)) as u64), m)
        })
        .collect()
}
