// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Client that delivers reports from a background task.
//!
//! `notify` snapshots the current user and breadcrumb log into a
//! [`Delivery`] and pushes it onto a bounded queue without waiting. A worker
//! task on the supplied Tokio runtime hands each delivery to a
//! [`ReportSink`]. Queue overflow and sink failures are logged here and never
//! reach the caller.

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use crashbridge_core::{Breadcrumb, Configuration, EnrichedReport, User};
use serde::Serialize;
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::sync::Notify;
use tracing::{debug, error, info, warn};

use super::{BreadcrumbLog, ErrorClient};
use crate::config::ClientConfig;
use crate::error::Result;

/// Name reported as the notifier of every delivery.
pub const NOTIFIER_NAME: &str = "crashbridge";
/// Version reported as the notifier of every delivery.
pub const NOTIFIER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Everything a sink needs to deliver one report.
#[derive(Debug, Clone, Serialize)]
pub struct Delivery {
	pub report: EnrichedReport,
	pub user: Option<User>,
	/// Oldest first, as of the moment `notify` was called.
	pub breadcrumbs: Vec<Breadcrumb>,
	pub release_stage: Option<String>,
	pub app_version: Option<String>,
	pub notifier: &'static str,
	pub notifier_version: &'static str,
}

/// Destination for queued deliveries.
#[async_trait]
pub trait ReportSink: Send + Sync + 'static {
	async fn deliver(&self, delivery: Delivery) -> Result<()>;
}

#[derive(Debug)]
struct Session {
	config: Option<Configuration>,
	user: Option<User>,
	breadcrumbs: BreadcrumbLog,
}

/// [`ErrorClient`] backed by a bounded queue and a background worker.
pub struct QueuedClient {
	session: Mutex<Session>,
	tx: mpsc::Sender<Delivery>,
}

impl QueuedClient {
	/// Creates the client and spawns its delivery worker on `runtime`.
	///
	/// The worker exits once the client is dropped and the queue drains.
	pub fn spawn(sink: Arc<dyn ReportSink>, config: &ClientConfig, runtime: &Handle) -> Self {
		let (tx, mut rx) = mpsc::channel::<Delivery>(config.queue_capacity.max(1));

		runtime.spawn(async move {
			while let Some(delivery) = rx.recv().await {
				let report_id = delivery.report.id;
				match sink.deliver(delivery).await {
					Ok(()) => debug!(%report_id, "report delivered"),
					Err(e) => error!(%report_id, error = %e, "failed to deliver report"),
				}
			}
			debug!("delivery worker stopped");
		});

		Self {
			session: Mutex::new(Session {
				config: None,
				user: None,
				breadcrumbs: BreadcrumbLog::new(config.max_breadcrumbs),
			}),
			tx,
		}
	}

	fn session(&self) -> MutexGuard<'_, Session> {
		self.session.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
	}

	/// Number of breadcrumbs currently held.
	pub fn breadcrumb_count(&self) -> usize {
		self.session().breadcrumbs.len()
	}

	pub fn clear_breadcrumbs(&self) {
		self.session().breadcrumbs.clear();
	}
}

impl ErrorClient for QueuedClient {
	fn start(&self, config: &Configuration) -> Result<()> {
		self.session().config = Some(config.clone());
		info!(
			release_stage = ?config.release_stage,
			app_version = ?config.app_version,
			"queued client started"
		);
		Ok(())
	}

	fn notify(&self, report: EnrichedReport) {
		let delivery = {
			let session = self.session();
			let Some(config) = session.config.as_ref() else {
				warn!(report_id = %report.id, "client not started, dropping report");
				return;
			};
			Delivery {
				report,
				user: session.user.clone(),
				breadcrumbs: session.breadcrumbs.snapshot(),
				release_stage: config.release_stage.clone(),
				app_version: config.app_version.clone(),
				notifier: NOTIFIER_NAME,
				notifier_version: NOTIFIER_VERSION,
			}
		};

		match self.tx.try_send(delivery) {
			Ok(()) => {}
			Err(TrySendError::Full(dropped)) => {
				warn!(report_id = %dropped.report.id, "delivery queue full, dropping report");
			}
			Err(TrySendError::Closed(dropped)) => {
				error!(report_id = %dropped.report.id, "delivery worker gone, dropping report");
			}
		}
	}

	fn set_user(&self, user: User) {
		self.session().user = Some(user);
	}

	fn leave_breadcrumb(&self, breadcrumb: Breadcrumb) {
		self.session().breadcrumbs.push(breadcrumb);
	}
}

/// Sink that writes each delivery to the tracing output.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

#[async_trait]
impl ReportSink for TracingSink {
	async fn deliver(&self, delivery: Delivery) -> Result<()> {
		let payload = serde_json::to_string(&delivery)?;
		info!(
			report_id = %delivery.report.id,
			error_class = %delivery.report.error_class,
			frames = delivery.report.frames.len(),
			breadcrumbs = delivery.breadcrumbs.len(),
			"error report"
		);
		debug!(payload = %payload, "error report payload");
		Ok(())
	}
}

/// Sink that keeps deliveries in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
	deliveries: Mutex<Vec<Delivery>>,
	delivered: Notify,
}

impl MemorySink {
	pub fn new() -> Self {
		Self::default()
	}

	fn lock(&self) -> MutexGuard<'_, Vec<Delivery>> {
		self.deliveries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
	}

	pub fn deliveries(&self) -> Vec<Delivery> {
		self.lock().clone()
	}

	pub fn len(&self) -> usize {
		self.lock().len()
	}

	pub fn is_empty(&self) -> bool {
		self.lock().is_empty()
	}

	/// Waits until at least `count` deliveries have arrived.
	pub async fn wait_for(&self, count: usize) {
		loop {
			let notified = self.delivered.notified();
			if self.len() >= count {
				return;
			}
			notified.await;
		}
	}
}

#[async_trait]
impl ReportSink for MemorySink {
	async fn deliver(&self, delivery: Delivery) -> Result<()> {
		self.lock().push(delivery);
		self.delivered.notify_waiters();
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::error::BridgeError;
	use crashbridge_core::{enrich, BreadcrumbType, ErrorReport};
	use std::sync::atomic::{AtomicUsize, Ordering};
	use std::time::Duration;

	fn report(name: &str) -> EnrichedReport {
		enrich(ErrorReport {
			name: name.to_string(),
			description: "boom".to_string(),
			full_output: "boom".to_string(),
			context: "test".to_string(),
			additional_stack_trace: None,
			native_frames: Vec::new(),
			application_frames: Vec::new(),
		})
	}

	fn started(sink: Arc<dyn ReportSink>, config: &ClientConfig) -> QueuedClient {
		let client = QueuedClient::spawn(sink, config, &Handle::current());
		client
			.start(&Configuration::new(Some("key"), Some("beta")).unwrap())
			.unwrap();
		client
	}

	#[tokio::test]
	async fn delivers_report_with_session_snapshot() {
		let sink = Arc::new(MemorySink::new());
		let client = started(sink.clone(), &ClientConfig::default());

		client.set_user(User::new("u1", "u1@example.com", "User One"));
		client.leave_breadcrumb(Breadcrumb::new("opened cart", BreadcrumbType::Navigation));
		client.notify(report("CartError"));

		tokio::time::timeout(Duration::from_secs(5), sink.wait_for(1))
			.await
			.expect("delivery should arrive");

		let delivery = &sink.deliveries()[0];
		assert_eq!(delivery.report.error_class, "CartError");
		assert_eq!(delivery.user.as_ref().map(|u| u.id.as_str()), Some("u1"));
		assert_eq!(delivery.breadcrumbs.len(), 1);
		assert_eq!(delivery.release_stage.as_deref(), Some("beta"));
		assert_eq!(delivery.notifier, NOTIFIER_NAME);
	}

	#[tokio::test]
	async fn later_breadcrumbs_do_not_leak_into_earlier_reports() {
		let sink = Arc::new(MemorySink::new());
		let client = started(sink.clone(), &ClientConfig::default());

		client.notify(report("First"));
		client.leave_breadcrumb(Breadcrumb::new("after", BreadcrumbType::Log));
		client.notify(report("Second"));

		tokio::time::timeout(Duration::from_secs(5), sink.wait_for(2))
			.await
			.expect("deliveries should arrive");

		let deliveries = sink.deliveries();
		assert!(deliveries[0].breadcrumbs.is_empty());
		assert_eq!(deliveries[1].breadcrumbs.len(), 1);
	}

	#[tokio::test]
	async fn notify_before_start_is_dropped() {
		let sink = Arc::new(MemorySink::new());
		let client = QueuedClient::spawn(sink.clone(), &ClientConfig::default(), &Handle::current());

		client.notify(report("Early"));
		tokio::time::sleep(Duration::from_millis(50)).await;
		assert!(sink.is_empty());
	}

	#[tokio::test]
	async fn breadcrumb_log_is_bounded() {
		let config = ClientConfig {
			max_breadcrumbs: 5,
			..Default::default()
		};
		let client = started(Arc::new(MemorySink::new()), &config);

		for i in 0..10 {
			client.leave_breadcrumb(Breadcrumb::new(format!("b{i}"), BreadcrumbType::Manual));
		}
		assert_eq!(client.breadcrumb_count(), 5);

		client.clear_breadcrumbs();
		assert_eq!(client.breadcrumb_count(), 0);
	}

	struct FailingSink {
		attempts: AtomicUsize,
		delivered: Notify,
	}

	#[async_trait]
	impl ReportSink for FailingSink {
		async fn deliver(&self, _delivery: Delivery) -> Result<()> {
			self.attempts.fetch_add(1, Ordering::SeqCst);
			self.delivered.notify_waiters();
			Err(BridgeError::Delivery("backend unavailable".to_string()))
		}
	}

	#[tokio::test]
	async fn sink_failures_are_not_retried_or_surfaced() {
		let sink = Arc::new(FailingSink {
			attempts: AtomicUsize::new(0),
			delivered: Notify::new(),
		});
		let client = started(sink.clone(), &ClientConfig::default());

		let notified = sink.delivered.notified();
		client.notify(report("Lost"));
		tokio::time::timeout(Duration::from_secs(5), notified)
			.await
			.expect("sink should be called");

		tokio::time::sleep(Duration::from_millis(20)).await;
		assert_eq!(sink.attempts.load(Ordering::SeqCst), 1);
	}

	#[tokio::test]
	async fn tracing_sink_accepts_deliveries() {
		let delivery = Delivery {
			report: report("Logged"),
			user: None,
			breadcrumbs: Vec::new(),
			release_stage: None,
			app_version: None,
			notifier: NOTIFIER_NAME,
			notifier_version: NOTIFIER_VERSION,
		};
		assert!(TracingSink.deliver(delivery).await.is_ok());
	}
}
