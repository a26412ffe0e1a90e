// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The error-reporting client the enricher drives.
//!
//! [`ErrorClient`] is the call surface the bridge consumes. Delivery,
//! storage, and the process-wide breadcrumb log all belong to the client;
//! the enricher only decides *whether* to call it and *what* to hand over.

mod queued;
mod recording;

use std::collections::VecDeque;

use crashbridge_core::{Breadcrumb, Configuration, EnrichedReport, User};

use crate::error::Result;

pub use queued::{Delivery, MemorySink, QueuedClient, ReportSink, TracingSink};
pub use recording::RecordingClient;

/// Collaborator client consumed by the enricher.
///
/// Every method is synchronous from the caller's point of view; `notify`
/// must not wait for delivery.
pub trait ErrorClient: Send + Sync {
	/// (Re)initialise the client. Called on every successful `configure`.
	fn start(&self, config: &Configuration) -> Result<()>;

	/// Hand off an enriched report. Fire-and-forget.
	fn notify(&self, report: EnrichedReport);

	/// Replace the current user.
	fn set_user(&self, user: User);

	/// Append to the breadcrumb log.
	fn leave_breadcrumb(&self, breadcrumb: Breadcrumb);
}

/// Bounded, ordered breadcrumb log. The oldest entry is evicted first.
#[derive(Debug, Clone)]
pub struct BreadcrumbLog {
	entries: VecDeque<Breadcrumb>,
	capacity: usize,
}

impl BreadcrumbLog {
	pub fn new(capacity: usize) -> Self {
		Self {
			entries: VecDeque::with_capacity(capacity.min(1024)),
			capacity,
		}
	}

	pub fn push(&mut self, breadcrumb: Breadcrumb) {
		if self.capacity == 0 {
			return;
		}
		while self.entries.len() >= self.capacity {
			self.entries.pop_front();
		}
		self.entries.push_back(breadcrumb);
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	pub fn clear(&mut self) {
		self.entries.clear();
	}

	/// Copy of the log, oldest first.
	pub fn snapshot(&self) -> Vec<Breadcrumb> {
		self.entries.iter().cloned().collect()
	}
}
