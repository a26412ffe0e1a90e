// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! In-memory client that records everything it is handed.

use std::sync::{Mutex, MutexGuard};

use crashbridge_core::{Breadcrumb, Configuration, EnrichedReport, User};

use super::{BreadcrumbLog, ErrorClient};
use crate::config::DEFAULT_MAX_BREADCRUMBS;
use crate::error::Result;

#[derive(Debug)]
struct Recorded {
	config: Option<Configuration>,
	starts: usize,
	user: Option<User>,
	breadcrumbs: BreadcrumbLog,
	reports: Vec<EnrichedReport>,
}

/// Synchronous [`ErrorClient`] that keeps state in memory.
///
/// Useful for embedding the enricher where reports are consumed in-process,
/// and as a test double.
#[derive(Debug)]
pub struct RecordingClient {
	inner: Mutex<Recorded>,
}

impl RecordingClient {
	pub fn new() -> Self {
		Self::with_max_breadcrumbs(DEFAULT_MAX_BREADCRUMBS)
	}

	pub fn with_max_breadcrumbs(max: usize) -> Self {
		Self {
			inner: Mutex::new(Recorded {
				config: None,
				starts: 0,
				user: None,
				breadcrumbs: BreadcrumbLog::new(max),
				reports: Vec::new(),
			}),
		}
	}

	fn lock(&self) -> MutexGuard<'_, Recorded> {
		self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
	}

	/// Configuration from the most recent `start`.
	pub fn config(&self) -> Option<Configuration> {
		self.lock().config.clone()
	}

	/// Number of times `start` has been called.
	pub fn start_count(&self) -> usize {
		self.lock().starts
	}

	pub fn user(&self) -> Option<User> {
		self.lock().user.clone()
	}

	pub fn breadcrumbs(&self) -> Vec<Breadcrumb> {
		self.lock().breadcrumbs.snapshot()
	}

	pub fn reports(&self) -> Vec<EnrichedReport> {
		self.lock().reports.clone()
	}

	/// Drain the recorded reports.
	pub fn take_reports(&self) -> Vec<EnrichedReport> {
		std::mem::take(&mut self.lock().reports)
	}
}

impl Default for RecordingClient {
	fn default() -> Self {
		Self::new()
	}
}

impl ErrorClient for RecordingClient {
	fn start(&self, config: &Configuration) -> Result<()> {
		let mut inner = self.lock();
		inner.config = Some(config.clone());
		inner.starts += 1;
		Ok(())
	}

	fn notify(&self, report: EnrichedReport) {
		self.lock().reports.push(report);
	}

	fn set_user(&self, user: User) {
		self.lock().user = Some(user);
	}

	fn leave_breadcrumb(&self, breadcrumb: Breadcrumb) {
		self.lock().breadcrumbs.push(breadcrumb);
	}
}
