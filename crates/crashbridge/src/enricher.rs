// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The stateful reporter: configuration gate plus dispatch to the client.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crashbridge_core::{enrich, Breadcrumb, BreadcrumbType, Configuration, ErrorReport, User};
use tracing::{debug, info, instrument, warn};

use crate::client::ErrorClient;
use crate::config::ClientConfig;
use crate::state::ReporterState;

/// Gates, enriches, and forwards reports to an [`ErrorClient`].
///
/// Until `configure` succeeds, `notify`, `set_user` and `leave_breadcrumb`
/// do nothing and still return `true`. The enricher is safe to share across
/// threads; configuration swaps are atomic with respect to readers.
pub struct ReportEnricher {
	client: Arc<dyn ErrorClient>,
	defaults: ClientConfig,
	state: RwLock<ReporterState>,
}

impl ReportEnricher {
	pub fn new(client: Arc<dyn ErrorClient>, defaults: ClientConfig) -> Self {
		Self {
			client,
			defaults,
			state: RwLock::new(ReporterState::Unconfigured),
		}
	}

	fn read(&self) -> RwLockReadGuard<'_, ReporterState> {
		self.state.read().unwrap_or_else(|poisoned| poisoned.into_inner())
	}

	fn write(&self) -> RwLockWriteGuard<'_, ReporterState> {
		self.state.write().unwrap_or_else(|poisoned| poisoned.into_inner())
	}

	/// Starts the client with `api_key` and an optional release stage.
	///
	/// Returns `false` when the key is missing or blank, or when the client
	/// refuses to start; the previous state is kept in both cases. Calling
	/// again with a valid key restarts the client and replaces the settings.
	#[instrument(skip_all, fields(has_key = api_key.is_some()))]
	pub fn configure(&self, api_key: Option<&str>, release_stage: Option<&str>) -> bool {
		let settings = match Configuration::new(api_key, release_stage) {
			Ok(settings) => settings
				.with_default_release_stage(self.defaults.release_stage.as_deref())
				.with_app_version(self.defaults.app_version.as_deref()),
			Err(e) => {
				warn!(error = %e, "configure rejected");
				return false;
			}
		};

		// Held across `start` so a concurrent configure cannot interleave.
		let mut state = self.write();
		if let Err(e) = self.client.start(&settings) {
			warn!(error = %e, "client failed to start");
			return false;
		}

		info!(
			release_stage = ?settings.release_stage,
			app_version = ?settings.app_version,
			reconfigured = state.is_configured(),
			"reporter configured"
		);
		*state = ReporterState::Configured {
			client: Arc::clone(&self.client),
			settings,
		};
		true
	}

	/// The started client, or `None` while unconfigured.
	fn active_client(&self) -> Option<Arc<dyn ErrorClient>> {
		self.read().client().cloned()
	}

	/// Enriches `report` and hands it to the client without waiting.
	pub fn notify(&self, report: ErrorReport) -> bool {
		let Some(client) = self.active_client() else {
			debug!(error_class = %report.name, "notify ignored, reporter not configured");
			return true;
		};

		let enriched = enrich(report);
		debug!(
			report_id = %enriched.id,
			error_class = %enriched.error_class,
			frames = enriched.frames.len(),
			"dispatching report"
		);
		client.notify(enriched);
		true
	}

	/// Replaces the current user on the client.
	pub fn set_user(&self, user: User) -> bool {
		match self.active_client() {
			Some(client) => client.set_user(user),
			None => debug!("set_user ignored, reporter not configured"),
		}
		true
	}

	pub fn leave_breadcrumb(&self, message: impl Into<String>, kind: BreadcrumbType) -> bool {
		match self.active_client() {
			Some(client) => client.leave_breadcrumb(Breadcrumb::new(message, kind)),
			None => debug!(%kind, "leave_breadcrumb ignored, reporter not configured"),
		}
		true
	}

	pub fn is_configured(&self) -> bool {
		self.read().is_configured()
	}

	/// Settings from the last successful `configure`.
	pub fn settings(&self) -> Option<Configuration> {
		self.read().settings().cloned()
	}
}
