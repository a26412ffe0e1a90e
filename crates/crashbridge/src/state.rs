// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Lifecycle state of a reporter.

use std::fmt;
use std::sync::Arc;

use crashbridge_core::Configuration;

use crate::client::ErrorClient;

/// Whether a reporter may forward calls, and to which client.
///
/// The started client and the settings it was started with are only ever
/// replaced together.
#[derive(Clone, Default)]
pub enum ReporterState {
	/// No `configure` has succeeded yet. Every forwarding call is a no-op.
	#[default]
	Unconfigured,
	Configured {
		client: Arc<dyn ErrorClient>,
		settings: Configuration,
	},
}

impl ReporterState {
	pub fn is_configured(&self) -> bool {
		matches!(self, Self::Configured { .. })
	}

	/// The started client, if any.
	pub fn client(&self) -> Option<&Arc<dyn ErrorClient>> {
		match self {
			Self::Configured { client, .. } => Some(client),
			Self::Unconfigured => None,
		}
	}

	pub fn settings(&self) -> Option<&Configuration> {
		match self {
			Self::Configured { settings, .. } => Some(settings),
			Self::Unconfigured => None,
		}
	}
}

impl fmt::Debug for ReporterState {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Unconfigured => f.write_str("Unconfigured"),
			Self::Configured { settings, .. } => f
				.debug_struct("Configured")
				.field("settings", settings)
				.finish_non_exhaustive(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::client::RecordingClient;

	#[test]
	fn default_is_unconfigured() {
		let state = ReporterState::default();
		assert!(!state.is_configured());
		assert!(state.client().is_none());
		assert!(state.settings().is_none());
	}

	#[test]
	fn debug_output_redacts_key() {
		let state = ReporterState::Configured {
			client: Arc::new(RecordingClient::new()),
			settings: Configuration::new(Some("secret-key-123"), None).unwrap(),
		};
		let debug = format!("{state:?}");
		assert!(debug.starts_with("Configured"));
		assert!(!debug.contains("secret-key-123"));
	}
}
