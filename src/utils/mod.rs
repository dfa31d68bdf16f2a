// Copyright (c) Facebook, Inc. and its affiliates.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Shared numeric helpers: batched field inversion, power series generation,
//! uninitialized vector allocation, and the iterator glue that switches between
//! serial and rayon-based parallel execution.

use crate::field::Fr;

#[cfg(feature = "concurrent")]
use rayon::prelude::*;


// CONSTANTS
// ================================================================================================

/// Below this size, batched operations are not worth splitting across threads.
const MIN_CONCURRENT_SIZE: usize = 1024;

// MATH FUNCTIONS
// ================================================================================================

/// Generates a vector with values [1, b, b^2, b^3, ..., b^(n-1)].
pub fn get_power_series(b: Fr, n: usize) -> Vec<Fr> {
    let mut result = unsafe { uninit_vector(n) };
    if cfg!(feature = "concurrent") && n >= MIN_CONCURRENT_SIZE && n.is_power_of_two() {
        #[cfg(feature = "concurrent")]
        {
            let batch_size = n / rayon::current_num_threads().next_power_of_two();
            result.par_chunks_mut(batch_size).enumerate().for_each(|(i, batch)| {
                let batch_start = i * batch_size;
                fill_power_series(batch, b, b.pow(batch_start as u64));
            });
        }
    } else {
        fill_power_series(&mut result, b, Fr::one());
    }
    result
}

/// Generates a vector with values [s, s * b, s * b^2, ..., s * b^(n-1)].
pub fn get_power_series_with_offset(b: Fr, s: Fr, n: usize) -> Vec<Fr> {
    let mut result = unsafe { uninit_vector(n) };
    if cfg!(feature = "concurrent") && n >= MIN_CONCURRENT_SIZE && n.is_power_of_two() {
        #[cfg(feature = "concurrent")]
        {
            let batch_size = n / rayon::current_num_threads().next_power_of_two();
            result.par_chunks_mut(batch_size).enumerate().for_each(|(i, batch)| {
                let batch_start = i * batch_size;
                fill_power_series(batch, b, s * b.pow(batch_start as u64));
            });
        }
    } else {
        fill_power_series(&mut result, b, s);
    }
    result
}

/// Inverts all elements of the provided slice in place using Montgomery's batch
/// inversion method: one field inversion plus 3(n - 1) multiplications.
///
/// # Panics
/// Panics if any of the elements is ZERO; a zero denominator is a fatal
/// protocol error for every caller in this crate (a challenge must never land
/// exactly on a root of unity).
pub fn batch_invert(values: &mut [Fr]) {
    if cfg!(feature = "concurrent") && values.len() >= MIN_CONCURRENT_SIZE {
        #[cfg(feature = "concurrent")]
        {
            let batch_size = values.len() / rayon::current_num_threads().next_power_of_two();
            values.par_chunks_mut(batch_size).for_each(serial_batch_invert);
        }
    } else {
        serial_batch_invert(values);
    }
}

/// Returns base 2 logarithm of `n`, where `n` is a power of two.
pub fn log2(n: usize) -> u32 {
    assert!(n.is_power_of_two(), "n must be a power of two");
    n.trailing_zeros()
}

/// Returns the number of worker threads available to fork-join regions, rounded
/// up to a power of two so that partition counts always divide power-of-two
/// domains. Returns 1 when the `concurrent` feature is disabled.
pub fn compute_num_threads() -> usize {
    #[cfg(feature = "concurrent")]
    {
        rayon::current_num_threads().next_power_of_two()
    }

    #[cfg(not(feature = "concurrent"))]
    {
        1
    }
}

// HELPER FUNCTIONS
// ------------------------------------------------------------------------------------------------

#[inline(always)]
fn fill_power_series(result: &mut [Fr], base: Fr, start: Fr) {
    if result.is_empty() {
        return;
    }
    result[0] = start;
    for i in 1..result.len() {
        result[i] = result[i - 1] * base;
    }
}

fn serial_batch_invert(values: &mut [Fr]) {
    let mut partials = Vec::with_capacity(values.len());
    let mut acc = Fr::one();
    for value in values.iter() {
        assert!(*value != Fr::zero(), "cannot batch invert a zero element");
        partials.push(acc);
        acc *= *value;
    }

    acc = acc.inv();

    for i in (0..values.len()).rev() {
        let next = acc * values[i];
        values[i] = acc * partials[i];
        acc = next;
    }
}

// VECTOR FUNCTIONS
// ================================================================================================

/// Returns a vector of the specified length with un-initialized memory.
///
/// This is faster than requesting a vector with initialized memory and is
/// useful when we overwrite all contents of the vector ourselves.
///
/// # Safety
/// Using values from the returned vector before initializing them will lead to
/// undefined behavior.
pub unsafe fn uninit_vector<T>(length: usize) -> Vec<T> {
    let mut vector = Vec::with_capacity(length);
    vector.set_len(length);
    vector
}

// ITERATOR MACROS
// ================================================================================================

/// Returns either a regular or a parallel mutable iterator depending on
/// whether `concurrent` feature is enabled. Optionally, `min_length` can be
/// used to specify the minimum length of iterator to be processed in each
/// thread.
#[macro_export]
macro_rules! iter_mut {
    ($e:expr) => {{
        #[cfg(feature = "concurrent")]
        let result = $e.par_iter_mut();

        #[cfg(not(feature = "concurrent"))]
        let result = $e.iter_mut();

        result
    }};
    ($e:expr, $min_len:expr) => {{
        #[cfg(feature = "concurrent")]
        let result = $e.par_iter_mut().with_min_len($min_len);

        #[cfg(not(feature = "concurrent"))]
        let result = $e.iter_mut();

        result
    }};
}

/// Returns either a regular or a parallel mutable chunk iterator depending on
/// whether `concurrent` feature is enabled.
#[macro_export]
macro_rules! chunks_mut {
    ($e:expr, $size:expr) => {{
        #[cfg(feature = "concurrent")]
        let result = $e.par_chunks_mut($size);

        #[cfg(not(feature = "concurrent"))]
        let result = $e.chunks_mut($size);

        result
    }};
}
