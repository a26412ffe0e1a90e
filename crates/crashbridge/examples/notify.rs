// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Example: drive the bridge through its method channel and log deliveries.
//!
//! Run with:
//!   RUST_LOG=debug cargo run --example notify -p crashbridge

use std::sync::Arc;
use std::time::Duration;

use crashbridge::{
	load_client_config, MethodCall, MethodChannel, QueuedClient, ReportEnricher, TracingSink,
};
use serde_json::json;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
		.init();

	let config = load_client_config(None)?;
	let api_key = std::env::var("CRASHBRIDGE_API_KEY").unwrap_or_else(|_| "example-key".to_string());

	let client = Arc::new(QueuedClient::spawn(
		Arc::new(TracingSink),
		&config,
		&tokio::runtime::Handle::current(),
	));
	let enricher = Arc::new(ReportEnricher::new(client, config));
	let channel = MethodChannel::new(enricher);

	// Ignored: nothing is configured yet.
	let early = channel.handle(&MethodCall::new(
		"leaveBreadcrumb",
		json!({ "message": "too early", "type": 1 }),
	));
	println!("early breadcrumb: {early:?}");

	let configured = channel.handle(&MethodCall::new(
		"configure",
		json!({ "apiKey": api_key, "releaseStage": "development" }),
	));
	println!("configure: {configured:?}");

	channel.handle(&MethodCall::new(
		"setUser",
		json!({ "id": "user_example_123", "email": "example@example.com", "name": "Example" }),
	));
	channel.handle(&MethodCall::new(
		"leaveBreadcrumb",
		json!({ "message": "Opened checkout", "type": 3 }),
	));

	let notified = channel.handle(&MethodCall::new(
		"notify",
		json!({
			"name": "StateError",
			"description": "Bad state: cart is empty",
			"fullOutput": "StateError: Bad state: cart is empty\n#0 Cart.checkout (cart.dart:41:7)",
			"context": "checkout",
			"additionalStackTrace": "#0 Cart.checkout (cart.dart:41:7)",
			"stackTrace": [
				{ "file": "cart.dart", "lineNumber": 41, "columnNumber": 7, "inProject": true, "method": "Cart.checkout" }
			]
		}),
	));
	println!("notify: {notified:?}");

	let unknown = channel.handle(&MethodCall::new("setContext", json!({})));
	println!("unknown method: {unknown:?}");

	// Give the delivery worker a moment to log the report.
	tokio::time::sleep(Duration::from_millis(100)).await;
	Ok(())
}
