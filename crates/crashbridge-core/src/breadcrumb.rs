// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Breadcrumb types (events leading up to a reported error).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// Kind of a breadcrumb.
///
/// The declaration order is part of the channel contract: callers select a
/// kind by its position, so variants must never be reordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BreadcrumbType {
	Error,
	Log,
	Manual,
	Navigation,
	Process,
	Request,
	State,
	User,
}

impl BreadcrumbType {
	/// Every kind, in index order.
	pub const ALL: [BreadcrumbType; 8] = [
		Self::Error,
		Self::Log,
		Self::Manual,
		Self::Navigation,
		Self::Process,
		Self::Request,
		Self::State,
		Self::User,
	];

	/// Checked positional lookup.
	///
	/// Out-of-range (including negative) indices fail with
	/// [`CoreError::InvalidBreadcrumbType`]; they never wrap.
	pub fn from_index(index: i64) -> Result<Self, CoreError> {
		usize::try_from(index)
			.ok()
			.and_then(|i| Self::ALL.get(i).copied())
			.ok_or(CoreError::InvalidBreadcrumbType {
				index,
				count: Self::ALL.len(),
			})
	}

	/// Position of this kind in [`BreadcrumbType::ALL`].
	pub fn index(self) -> usize {
		self as usize
	}
}

impl fmt::Display for BreadcrumbType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Error => write!(f, "error"),
			Self::Log => write!(f, "log"),
			Self::Manual => write!(f, "manual"),
			Self::Navigation => write!(f, "navigation"),
			Self::Process => write!(f, "process"),
			Self::Request => write!(f, "request"),
			Self::State => write!(f, "state"),
			Self::User => write!(f, "user"),
		}
	}
}

impl FromStr for BreadcrumbType {
	type Err = CoreError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"error" => Ok(Self::Error),
			"log" => Ok(Self::Log),
			"manual" => Ok(Self::Manual),
			"navigation" => Ok(Self::Navigation),
			"process" => Ok(Self::Process),
			"request" => Ok(Self::Request),
			"state" => Ok(Self::State),
			"user" => Ok(Self::User),
			_ => Err(CoreError::UnknownBreadcrumbType(s.to_string())),
		}
	}
}

/// A breadcrumb left by the application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Breadcrumb {
	pub timestamp: DateTime<Utc>,
	pub message: String,
	pub kind: BreadcrumbType,
	/// Always an object; empty for breadcrumbs left through the channel.
	pub metadata: serde_json::Value,
}

impl Breadcrumb {
	/// Creates a breadcrumb stamped with the current time and no metadata.
	pub fn new(message: impl Into<String>, kind: BreadcrumbType) -> Self {
		Self {
			timestamp: Utc::now(),
			message: message.into(),
			kind,
			metadata: serde_json::Value::Object(serde_json::Map::new()),
		}
	}
}
