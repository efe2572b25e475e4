// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI command implementations

pub mod assessments;
pub mod candidates;
pub mod init;
pub mod jobs;
pub mod responses;
