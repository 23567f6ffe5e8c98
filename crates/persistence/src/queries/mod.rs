// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Query modules for persistence layer.
//!
//! This module contains all read-only queries for the persistence layer.
//!
//! ## Module Organization
//!
//! - `working_hours`: Schedule Store reads
//! - `redirects`: Redirect Store reads and row reconstruction
//! - `operators`: Operator and session queries

pub mod operators;
pub mod redirects;
pub mod working_hours;
