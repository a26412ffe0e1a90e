// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for the enrichment core.

use thiserror::Error;

/// Errors raised while building core values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
	#[error("API key is required")]
	MissingApiKey,

	#[error("invalid breadcrumb type index {index} (expected 0..{count})")]
	InvalidBreadcrumbType { index: i64, count: usize },

	#[error("invalid breadcrumb type: {0}")]
	UnknownBreadcrumbType(String),
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
