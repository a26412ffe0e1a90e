// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error reports before and after enrichment.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::frame::{merge_frames, Frame, StackFrame};
use crate::metadata::{Metadata, METADATA_GROUP};

/// Metadata key for the logical operation running when the error occurred.
pub const CONTEXT_KEY: &str = "Context";
/// Metadata key for the verbatim error dump.
pub const FULL_OUTPUT_KEY: &str = "Full Error";
/// Metadata key for the optional raw stack trace text.
pub const STACK_TRACE_KEY: &str = "StackTrace";

/// Unique identifier for an enriched report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReportId(pub Uuid);

impl ReportId {
	pub fn new() -> Self {
		Self(Uuid::now_v7())
	}
}

impl Default for ReportId {
	fn default() -> Self {
		Self::new()
	}
}

impl fmt::Display for ReportId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

impl FromStr for ReportId {
	type Err = uuid::Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Ok(Self(Uuid::parse_str(s)?))
	}
}

/// One reportable error occurrence as handed to the enricher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorReport {
	/// Error class or identifier
	pub name: String,
	/// Human-readable message
	pub description: String,
	/// Verbatim dump; stored as metadata, never shown in the trace
	pub full_output: String,
	pub context: String,
	pub additional_stack_trace: Option<String>,
	/// Captured by the runtime at wrap time, in runtime order
	pub native_frames: Vec<Frame>,
	pub application_frames: Vec<StackFrame>,
}

/// A report ready for the collaborator transport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedReport {
	pub id: ReportId,
	pub timestamp: DateTime<Utc>,
	pub error_class: String,
	pub message: String,
	pub frames: Vec<Frame>,
	pub metadata: Metadata,
}

/// Files the report's textual context under [`METADATA_GROUP`].
///
/// `Context` and `Full Error` are always added; `StackTrace` only when
/// `additional_stack_trace` is present.
pub fn attach_metadata(
	mut metadata: Metadata,
	context: &str,
	full_output: &str,
	additional_stack_trace: Option<&str>,
) -> Metadata {
	metadata.add(METADATA_GROUP, CONTEXT_KEY, context);
	metadata.add(METADATA_GROUP, FULL_OUTPUT_KEY, full_output);
	if let Some(trace) = additional_stack_trace {
		metadata.add(METADATA_GROUP, STACK_TRACE_KEY, trace);
	}
	metadata
}

/// Turns a caller report into an enriched one.
pub fn enrich(report: ErrorReport) -> EnrichedReport {
	let frames = merge_frames(&report.native_frames, &report.application_frames);
	let metadata = attach_metadata(
		Metadata::new(),
		&report.context,
		&report.full_output,
		report.additional_stack_trace.as_deref(),
	);

	EnrichedReport {
		id: ReportId::new(),
		timestamp: Utc::now(),
		error_class: report.name,
		message: report.description,
		frames,
		metadata,
	}
}
