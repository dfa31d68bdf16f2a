// Copyright (c) Facebook, Inc. and its affiliates.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

use crate::{chunks_mut, iter_mut, utils::uninit_vector, Fr};

#[cfg(feature = "concurrent")]
use rayon::prelude::*;

// FFT BUFFER
// ================================================================================================

/// A view over the coefficients of one logical polynomial.
///
/// Transforms in this crate accept either a single contiguous slice of
/// coefficients or a power-of-two list of equal power-of-two-length chunks
/// whose concatenation forms the polynomial. This trait is the seam between
/// the two layouts: the transform is written once against the view, and both
/// layouts produce bit-identical results for equivalent data.
pub trait FftBuffer: Sync + Send {
    /// Returns the total number of coefficients in the buffer.
    fn len(&self) -> usize;

    /// Returns true if the buffer holds no coefficients.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the coefficient at the specified flattened position.
    fn get(&self, i: usize) -> Fr;

    /// Sets the coefficient at the specified flattened position.
    fn set(&mut self, i: usize, value: Fr);

    /// Asserts the layout invariants of the buffer. Contiguous buffers have
    /// none; chunked buffers must hold a power-of-two number of equal
    /// power-of-two-length chunks.
    fn validate_layout(&self);

    /// Splits the buffer into at least `num_ranges` contiguous mutable ranges
    /// and applies `f` to each, passing the flattened position at which the
    /// range starts. Ranges are processed in parallel when the `concurrent`
    /// feature is enabled; `f` must therefore not depend on range order.
    fn process_ranges<F>(&mut self, num_ranges: usize, f: F)
    where
        F: Fn(usize, &mut [Fr]) + Sync + Send;

    /// Applies the final butterfly round: for `m = self.len() / 2` and each
    /// `j` in `[0, m)`, writes `scratch[j] + roots[j] * scratch[j + m]` to
    /// position `j` and `scratch[j] - roots[j] * scratch[j + m]` to position
    /// `j + m`.
    fn combine_final_round(&mut self, scratch: &[Fr], roots: &[Fr]);
}

// CONTIGUOUS LAYOUT
// ------------------------------------------------------------------------------------------------

impl FftBuffer for [Fr] {
    #[inline(always)]
    fn len(&self) -> usize {
        <[Fr]>::len(self)
    }

    #[inline(always)]
    fn get(&self, i: usize) -> Fr {
        self[i]
    }

    #[inline(always)]
    fn set(&mut self, i: usize, value: Fr) {
        self[i] = value;
    }

    fn validate_layout(&self) {}

    fn process_ranges<F>(&mut self, num_ranges: usize, f: F)
    where
        F: Fn(usize, &mut [Fr]) + Sync + Send,
    {
        let range_size = (<[Fr]>::len(self) / num_ranges).max(1);
        chunks_mut!(self, range_size).enumerate().for_each(|(j, range)| f(j * range_size, range));
    }

    fn combine_final_round(&mut self, scratch: &[Fr], roots: &[Fr]) {
        let m = <[Fr]>::len(self) >> 1;
        let (lo, hi) = self.split_at_mut(m);
        iter_mut!(lo, 128).zip(iter_mut!(hi)).enumerate().for_each(|(j, (a, b))| {
            let t = roots[j] * scratch[j + m];
            *b = scratch[j] - t;
            *a = scratch[j] + t;
        });
    }
}

// CHUNKED LAYOUT
// ------------------------------------------------------------------------------------------------

impl FftBuffer for [Vec<Fr>] {
    fn len(&self) -> usize {
        self.iter().map(Vec::len).sum()
    }

    #[inline(always)]
    fn get(&self, i: usize) -> Fr {
        let chunk_len = self[0].len();
        self[i / chunk_len][i & (chunk_len - 1)]
    }

    #[inline(always)]
    fn set(&mut self, i: usize, value: Fr) {
        let chunk_len = self[0].len();
        self[i / chunk_len][i & (chunk_len - 1)] = value;
    }

    fn validate_layout(&self) {
        assert!(!self.is_empty(), "chunk list must not be empty");
        let num_chunks = <[Vec<Fr>]>::len(self);
        assert!(
            num_chunks.is_power_of_two(),
            "number of chunks must be a power of two, but was {num_chunks}"
        );
        let chunk_len = self[0].len();
        assert!(
            chunk_len.is_power_of_two(),
            "chunk length must be a power of two, but was {chunk_len}"
        );
        for chunk in self.iter() {
            assert_eq!(chunk_len, chunk.len(), "all chunks must have the same length");
        }
    }

    fn process_ranges<F>(&mut self, num_ranges: usize, f: F)
    where
        F: Fn(usize, &mut [Fr]) + Sync + Send,
    {
        let num_chunks = <[Vec<Fr>]>::len(self);
        let chunk_len = self[0].len();
        // chunks that are larger than a range are subdivided; smaller chunks
        // are handed to f whole, which only makes the partition finer
        let ranges_per_chunk = (num_ranges / num_chunks).max(1);
        let range_size = (chunk_len / ranges_per_chunk).max(1);
        iter_mut!(self).enumerate().for_each(|(c, chunk)| {
            for (s, range) in chunk.chunks_mut(range_size).enumerate() {
                f(c * chunk_len + s * range_size, range);
            }
        });
    }

    fn combine_final_round(&mut self, scratch: &[Fr], roots: &[Fr]) {
        let num_chunks = <[Vec<Fr>]>::len(self);
        if num_chunks == 1 {
            return self[0].as_mut_slice().combine_final_round(scratch, roots);
        }
        let chunk_len = self[0].len();
        let m = (num_chunks >> 1) * chunk_len;
        let (lo, hi) = self.split_at_mut(num_chunks >> 1);
        iter_mut!(lo).zip(iter_mut!(hi)).enumerate().for_each(|(c, (lo_chunk, hi_chunk))| {
            let base = c * chunk_len;
            for j in 0..chunk_len {
                let t = roots[base + j] * scratch[base + j + m];
                hi_chunk[j] = scratch[base + j] - t;
                lo_chunk[j] = scratch[base + j] + t;
            }
        });
    }
}

// SCRATCH BUFFER
// ================================================================================================

/// Grow-only scratch memory for FFT intermediate results.
///
/// Transforms overwrite every scratch element before reading it, so the
/// buffer's contents are undefined between calls. Requiring `&mut` access in
/// every transform signature makes the single-writer-at-a-time rule a
/// compile-time guarantee: two independent transforms can only share a
/// `ScratchBuffer` sequentially.
#[derive(Debug, Default)]
pub struct ScratchBuffer {
    buffer: Vec<Fr>,
}

impl ScratchBuffer {
    /// Returns a new scratch buffer holding no memory; memory is acquired on
    /// first use.
    pub fn new() -> Self {
        ScratchBuffer { buffer: Vec::new() }
    }

    /// Returns a scratch slice of exactly `size` elements with undefined
    /// contents, growing the underlying allocation if it is too small.
    /// Capacity never shrinks.
    pub fn get(&mut self, size: usize) -> &mut [Fr] {
        if self.buffer.len() < size {
            self.buffer = unsafe { uninit_vector(size) };
        }
        &mut self.buffer[..size]
    }

    /// Returns the number of elements this buffer can hand out without
    /// reallocating.
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }
}
