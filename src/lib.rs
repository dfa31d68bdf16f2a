// Copyright (c) Facebook, Inc. and its affiliates.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Polynomial arithmetic for a PLONK-style prover over the BN254 scalar field.
//!
//! This crate implements the numeric kernel that converts polynomials between
//! coefficient form and evaluation form over multiplicative subgroups of the
//! BN254 scalar field, evaluates them on cosets of those subgroups, divides
//! evaluation-form data by (pseudo-)vanishing polynomials, evaluates Lagrange
//! basis polynomials at arbitrary points, and computes Kate opening quotients.
//!
//! Polynomials are represented either as one contiguous buffer of coefficients
//! or as a power-of-two list of equal-length buffers whose concatenation forms
//! a single logical polynomial; every transform accepts both layouts through
//! the [fft::FftBuffer] trait and produces bit-identical results for
//! equivalent data.
//!
//! When the `concurrent` feature is enabled, transforms are parallelized over
//! a fixed fork-join partitioning of the evaluation domain; results are
//! identical to the single-threaded execution.

pub mod fft;
pub mod lagrange;
pub mod polynom;
pub mod utils;

mod domain;
pub use domain::EvaluationDomain;

mod field;
pub use field::Fr;
