// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error-report enrichment bridge.
//!
//! Sits between an application layer and an error-reporting client. The
//! application configures the reporter, sets the current user, leaves
//! breadcrumbs, and notifies errors; the bridge gates those calls until a
//! valid API key has been supplied, reconciles the application's stack
//! frames with the natively captured ones, and hands the result to an
//! [`ErrorClient`].
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use crashbridge::{ClientConfig, MethodCall, MethodChannel, RecordingClient, ReportEnricher};
//! use serde_json::json;
//!
//! let client = Arc::new(RecordingClient::new());
//! let enricher = Arc::new(ReportEnricher::new(client, ClientConfig::default()));
//! let channel = MethodChannel::new(enricher);
//!
//! channel.handle(&MethodCall::new("configure", json!({ "apiKey": "your-api-key" })));
//! channel.handle(&MethodCall::new(
//! 	"leaveBreadcrumb",
//! 	json!({ "message": "opened cart", "type": 3 }),
//! ));
//! ```

pub mod backtrace;
pub mod channel;
pub mod client;
pub mod config;
pub mod enricher;
pub mod error;
pub mod state;

pub use backtrace::{capture_native_frames, parse_backtrace};
pub use channel::{Method, MethodCall, MethodChannel, MethodResult, TraceSource};
pub use client::{
	BreadcrumbLog, Delivery, ErrorClient, MemorySink, QueuedClient, RecordingClient, ReportSink,
	TracingSink,
};
pub use config::{load_client_config, ClientConfig, ConfigError};
pub use enricher::ReportEnricher;
pub use error::{BridgeError, Result};
pub use state::ReporterState;

// Re-export core types
pub use crashbridge_core::{
	Breadcrumb, BreadcrumbType, Configuration, EnrichedReport, ErrorReport, Frame, Metadata,
	StackFrame, User,
};
