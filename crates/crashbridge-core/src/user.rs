// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The user reports are attributed to.

use serde::{Deserialize, Serialize};

/// Current user. All three fields are opaque identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
	pub id: String,
	pub email: String,
	pub name: String,
}

impl User {
	pub fn new(id: impl Into<String>, email: impl Into<String>, name: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			email: email.into(),
			name: name.into(),
		}
	}
}
