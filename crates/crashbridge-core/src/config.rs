// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Reporter configuration supplied through `configure`.

use serde::{Serialize, Serializer};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{CoreError, Result};

const REDACTED: &str = "[REDACTED]";

/// Non-empty API key for the error-reporting backend.
///
/// Debug, Display and Serialize output are redacted, and the key is
/// zeroized on drop. Use [`ApiKey::expose`] to read it.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct ApiKey(String);

impl ApiKey {
	/// Accepts any key that is non-empty after trimming whitespace.
	pub fn parse(raw: &str) -> Result<Self> {
		let trimmed = raw.trim();
		if trimmed.is_empty() {
			return Err(CoreError::MissingApiKey);
		}
		Ok(Self(trimmed.to_string()))
	}

	pub fn expose(&self) -> &str {
		&self.0
	}
}

impl fmt::Debug for ApiKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("ApiKey").field(&REDACTED).finish()
	}
}

impl fmt::Display for ApiKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(REDACTED)
	}
}

impl Serialize for ApiKey {
	fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		serializer.serialize_str(REDACTED)
	}
}

/// Settings the collaborator client is started with.
///
/// Immutable once built; reconfiguring replaces the whole value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Configuration {
	pub api_key: ApiKey,
	pub release_stage: Option<String>,
	pub app_version: Option<String>,
}

impl Configuration {
	/// Builds a configuration from raw `configure` arguments.
	///
	/// Fails with [`CoreError::MissingApiKey`] when the key is absent or blank.
	pub fn new(api_key: Option<&str>, release_stage: Option<&str>) -> Result<Self> {
		let api_key = api_key.ok_or(CoreError::MissingApiKey)?;
		Ok(Self {
			api_key: ApiKey::parse(api_key)?,
			release_stage: release_stage.map(str::to_string),
			app_version: None,
		})
	}

	/// Fills in a release stage only if `configure` did not supply one.
	pub fn with_default_release_stage(mut self, release_stage: Option<&str>) -> Self {
		if self.release_stage.is_none() {
			self.release_stage = release_stage.map(str::to_string);
		}
		self
	}

	pub fn with_app_version(mut self, app_version: Option<&str>) -> Self {
		self.app_version = app_version.map(str::to_string);
		self
	}
}
