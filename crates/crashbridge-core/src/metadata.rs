// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Report metadata keyed by `(group, key)`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Group that report enrichment files its entries under.
pub const METADATA_GROUP: &str = "Application";

/// Metadata tabs attached to a report, kept apart from the trace frames.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Metadata(BTreeMap<String, BTreeMap<String, serde_json::Value>>);

impl Metadata {
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds (or replaces) one entry.
	pub fn add(
		&mut self,
		group: impl Into<String>,
		key: impl Into<String>,
		value: impl Into<serde_json::Value>,
	) {
		self.0
			.entry(group.into())
			.or_default()
			.insert(key.into(), value.into());
	}

	pub fn get(&self, group: &str, key: &str) -> Option<&serde_json::Value> {
		self.0.get(group).and_then(|entries| entries.get(key))
	}

	pub fn group(&self, group: &str) -> Option<&BTreeMap<String, serde_json::Value>> {
		self.0.get(group)
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn add_and_get() {
		let mut metadata = Metadata::new();
		metadata.add("device", "orientation", "portrait");
		metadata.add("device", "battery", 80);

		assert_eq!(
			metadata.get("device", "orientation"),
			Some(&serde_json::json!("portrait"))
		);
		assert_eq!(metadata.group("device").map(|g| g.len()), Some(2));
		assert_eq!(metadata.get("device", "missing"), None);
		assert_eq!(metadata.get("missing", "orientation"), None);
	}

	#[test]
	fn add_replaces_existing_key() {
		let mut metadata = Metadata::new();
		metadata.add("app", "screen", "home");
		metadata.add("app", "screen", "settings");

		assert_eq!(metadata.get("app", "screen"), Some(&serde_json::json!("settings")));
	}

	#[test]
	fn serializes_as_nested_object() {
		let mut metadata = Metadata::new();
		metadata.add("app", "screen", "home");

		assert_eq!(
			serde_json::to_value(&metadata).unwrap(),
			serde_json::json!({ "app": { "screen": "home" } })
		);
	}
}
