// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! State-changing operations for the persistence layer.
//!
//! ## Module Organization
//!
//! - `working_hours`: Schedule Store upsert
//! - `redirects`: Redirect Store create and toggle
//! - `operators`: Operator and session mutations
//!
//! Every mutation that touches the active flag runs inside an immediate
//! transaction, so concurrent writers serialize at the store and the
//! single-active invariant is never observable as broken.

pub mod operators;
pub mod redirects;
pub mod working_hours;

pub use operators::OperatorSync;
