// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for the bridge.

use crashbridge_core::CoreError;
use thiserror::Error;

/// Result type alias for bridge operations.
pub type Result<T> = std::result::Result<T, BridgeError>;

/// Errors that can occur in the bridge.
#[derive(Debug, Error)]
pub enum BridgeError {
	/// A core value could not be built (missing API key, bad breadcrumb type).
	#[error(transparent)]
	Core(#[from] CoreError),

	/// A channel call was missing a required argument or had one of the wrong type.
	#[error("invalid arguments for {method}: {message}")]
	InvalidArguments {
		/// Method being invoked.
		method: String,
		/// What was wrong.
		message: String,
	},

	/// The method name is not part of the channel vocabulary.
	#[error("method not implemented: {0}")]
	NotImplemented(String),

	/// The collaborator client refused to start.
	#[error("client failed to start: {0}")]
	ClientStart(String),

	/// A report sink failed to deliver.
	#[error("delivery failed: {0}")]
	Delivery(String),

	/// Failed to serialize a report.
	#[error("serialization error: {0}")]
	Serialization(#[from] serde_json::Error),
}

impl BridgeError {
	pub fn invalid_arguments(method: impl Into<String>, message: impl Into<String>) -> Self {
		Self::InvalidArguments {
			method: method.into(),
			message: message.into(),
		}
	}
}
