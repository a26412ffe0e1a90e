// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Method-call surface for the application layer.
//!
//! Calls arrive as a method name plus a loosely typed JSON argument object,
//! the shape a host messaging channel hands over after decoding:
//!
//! | Method            | Arguments                                                        |
//! |-------------------|------------------------------------------------------------------|
//! | `configure`       | `apiKey` (or `androidApiKey`), `releaseStage?`                   |
//! | `notify`          | `name`, `description`, `fullOutput`, `context`, `additionalStackTrace?`, `stackTrace` |
//! | `setUser`         | `id`, `email`, `name`                                            |
//! | `leaveBreadcrumb` | `message`, `type` (index into [`BreadcrumbType::ALL`])           |
//!
//! Until the reporter is configured, `notify`, `setUser` and
//! `leaveBreadcrumb` succeed without looking at their arguments.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crashbridge_core::{BreadcrumbType, CoreError, ErrorReport, Frame, StackFrame, User};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::backtrace::capture_native_frames;
use crate::enricher::ReportEnricher;
use crate::error::{BridgeError, Result};

/// Error code for a missing or mistyped argument.
pub const INVALID_ARGUMENTS: &str = "INVALID_ARGUMENTS";
/// Error code for a breadcrumb type index outside the known kinds.
pub const INVALID_BREADCRUMB_TYPE: &str = "INVALID_BREADCRUMB_TYPE";
/// Error code for failures that are neither of the above.
pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";

/// Source of native frames for reports arriving through the channel.
pub type TraceSource = Arc<dyn Fn() -> Vec<Frame> + Send + Sync>;

/// A decoded invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodCall {
	pub method: String,
	#[serde(default)]
	pub arguments: Value,
}

impl MethodCall {
	pub fn new(method: impl Into<String>, arguments: Value) -> Self {
		Self {
			method: method.into(),
			arguments,
		}
	}
}

/// Outcome of a call, mirroring the host channel's three reply kinds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MethodResult {
	Success { value: Value },
	Error { code: String, message: String },
	NotImplemented,
}

impl MethodResult {
	pub fn success(value: impl Into<Value>) -> Self {
		Self::Success {
			value: value.into(),
		}
	}

	fn from_error(err: &BridgeError) -> Self {
		let code = match err {
			BridgeError::InvalidArguments { .. } => INVALID_ARGUMENTS,
			BridgeError::Core(CoreError::InvalidBreadcrumbType { .. })
			| BridgeError::Core(CoreError::UnknownBreadcrumbType(_)) => INVALID_BREADCRUMB_TYPE,
			_ => INTERNAL_ERROR,
		};
		Self::Error {
			code: code.to_string(),
			message: err.to_string(),
		}
	}

	pub fn is_success(&self) -> bool {
		matches!(self, Self::Success { .. })
	}
}

/// The methods the channel understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
	Configure,
	Notify,
	SetUser,
	LeaveBreadcrumb,
}

impl Method {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Configure => "configure",
			Self::Notify => "notify",
			Self::SetUser => "setUser",
			Self::LeaveBreadcrumb => "leaveBreadcrumb",
		}
	}
}

impl fmt::Display for Method {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for Method {
	type Err = BridgeError;

	fn from_str(s: &str) -> Result<Self> {
		match s {
			"configure" => Ok(Self::Configure),
			"notify" => Ok(Self::Notify),
			"setUser" => Ok(Self::SetUser),
			"leaveBreadcrumb" => Ok(Self::LeaveBreadcrumb),
			other => Err(BridgeError::NotImplemented(other.to_string())),
		}
	}
}

/// Typed view over a call's argument object.
struct Arguments<'a> {
	method: Method,
	map: Option<&'a Map<String, Value>>,
}

impl<'a> Arguments<'a> {
	fn new(method: Method, value: &'a Value) -> Self {
		Self {
			method,
			map: value.as_object(),
		}
	}

	fn get(&self, key: &str) -> Option<&'a Value> {
		self.map.and_then(|m| m.get(key)).filter(|v| !v.is_null())
	}

	fn missing(&self, key: &str, expected: &str) -> BridgeError {
		BridgeError::invalid_arguments(
			self.method.as_str(),
			format!("`{key}` must be {expected}"),
		)
	}

	/// A string argument, or `None` when absent or not a string.
	fn optional_str(&self, key: &str) -> Option<&'a str> {
		self.get(key).and_then(Value::as_str)
	}

	fn required_str(&self, key: &str) -> Result<&'a str> {
		self.optional_str(key)
			.ok_or_else(|| self.missing(key, "a string"))
	}

	fn required_i64(&self, key: &str) -> Result<i64> {
		self.get(key)
			.and_then(Value::as_i64)
			.ok_or_else(|| self.missing(key, "an integer"))
	}

	fn required_frames(&self, key: &str) -> Result<Vec<StackFrame>> {
		let items = self
			.get(key)
			.and_then(Value::as_array)
			.ok_or_else(|| self.missing(key, "a list of frame maps"))?;

		items
			.iter()
			.map(|item| {
				item.as_object()
					.map(StackFrame::from_map)
					.ok_or_else(|| self.missing(key, "a list of frame maps"))
			})
			.collect()
	}
}

/// Routes decoded calls to a [`ReportEnricher`].
pub struct MethodChannel {
	enricher: Arc<ReportEnricher>,
	trace_source: TraceSource,
}

impl MethodChannel {
	pub fn new(enricher: Arc<ReportEnricher>) -> Self {
		Self {
			enricher,
			trace_source: Arc::new(capture_native_frames),
		}
	}

	/// Replace where native frames come from when a report is wrapped.
	pub fn with_trace_source(mut self, source: TraceSource) -> Self {
		self.trace_source = source;
		self
	}

	pub fn enricher(&self) -> &Arc<ReportEnricher> {
		&self.enricher
	}

	/// Handle one call. Never panics on bad input.
	pub fn handle(&self, call: &MethodCall) -> MethodResult {
		let method = match call.method.parse::<Method>() {
			Ok(method) => method,
			Err(_) => {
				debug!(method = %call.method, "method not implemented");
				return MethodResult::NotImplemented;
			}
		};

		match self.dispatch(method, &call.arguments) {
			Ok(value) => MethodResult::Success { value },
			Err(e) => {
				debug!(%method, error = %e, "call rejected");
				MethodResult::from_error(&e)
			}
		}
	}

	fn dispatch(&self, method: Method, arguments: &Value) -> Result<Value> {
		if method != Method::Configure && !self.enricher.is_configured() {
			return Ok(Value::Bool(true));
		}

		let args = Arguments::new(method, arguments);
		let ok = match method {
			Method::Configure => {
				let api_key = args
					.optional_str("apiKey")
					.or_else(|| args.optional_str("androidApiKey"));
				self.enricher
					.configure(api_key, args.optional_str("releaseStage"))
			}
			Method::Notify => {
				let report = ErrorReport {
					name: args.required_str("name")?.to_string(),
					description: args.required_str("description")?.to_string(),
					full_output: args.required_str("fullOutput")?.to_string(),
					context: args.required_str("context")?.to_string(),
					additional_stack_trace: args
						.optional_str("additionalStackTrace")
						.map(str::to_string),
					application_frames: args.required_frames("stackTrace")?,
					native_frames: (self.trace_source)(),
				};
				self.enricher.notify(report)
			}
			Method::SetUser => {
				let user = User::new(
					args.required_str("id")?,
					args.required_str("email")?,
					args.required_str("name")?,
				);
				self.enricher.set_user(user)
			}
			Method::LeaveBreadcrumb => {
				let message = args.required_str("message")?;
				let kind = BreadcrumbType::from_index(args.required_i64("type")?)?;
				self.enricher.leave_breadcrumb(message, kind)
			}
		};

		Ok(Value::Bool(ok))
	}
}
