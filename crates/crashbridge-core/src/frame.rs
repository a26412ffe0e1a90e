// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Stack frame types and positional trace reconciliation.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A stack frame produced by the application layer's own symbolication.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StackFrame {
	pub file: Option<String>,
	pub in_project: Option<bool>,
	pub line_number: Option<u32>,
	pub column_number: Option<u32>,
	pub method: Option<String>,
}

impl StackFrame {
	/// Reads a loosely typed frame map.
	///
	/// A key that is missing, null, or holds a value of the wrong type yields
	/// `None` for that field. Integers that do not fit a `u32` are treated the
	/// same way.
	pub fn from_map(map: &Map<String, Value>) -> Self {
		let string = |key: &str| map.get(key).and_then(Value::as_str).map(str::to_string);
		let number = |key: &str| {
			map.get(key)
				.and_then(Value::as_u64)
				.and_then(|n| u32::try_from(n).ok())
		};

		Self {
			file: string("file"),
			in_project: map.get("inProject").and_then(Value::as_bool),
			line_number: number("lineNumber"),
			column_number: number("columnNumber"),
			method: string("method"),
		}
	}
}

/// A stack frame captured by the native runtime.
///
/// The five reconcilable fields are optional so that an application frame can
/// clear them. `module` is runtime-only and survives reconciliation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Frame {
	pub file: Option<String>,
	pub in_project: Option<bool>,
	pub line_number: Option<u32>,
	pub column_number: Option<u32>,
	pub method: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub module: Option<String>,
}

impl Frame {
	/// Returns this frame with every reconcilable field taken from `app`,
	/// absent values included.
	fn overwritten_by(&self, app: &StackFrame) -> Self {
		Self {
			file: app.file.clone(),
			in_project: app.in_project,
			line_number: app.line_number,
			column_number: app.column_number,
			method: app.method.clone(),
			module: self.module.clone(),
		}
	}
}

/// Reconciles a native trace with an application trace by position.
///
/// The result always has exactly `native.len()` frames in native order.
/// Frame `i` takes all five fields from `application[i]` when it exists and
/// is left untouched otherwise; application frames past the end of the
/// native trace are dropped.
pub fn merge_frames(native: &[Frame], application: &[StackFrame]) -> Vec<Frame> {
	native
		.iter()
		.enumerate()
		.map(|(i, frame)| match application.get(i) {
			Some(app) => frame.overwritten_by(app),
			None => frame.clone(),
		})
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;
	use serde_json::json;

	fn native(file: &str, line: u32) -> Frame {
		Frame {
			file: Some(file.to_string()),
			line_number: Some(line),
			method: Some(format!("{file}::run")),
			module: Some("com.example".to_string()),
			..Default::default()
		}
	}

	fn app(file: &str, line: u32, in_project: bool) -> StackFrame {
		StackFrame {
			file: Some(file.to_string()),
			line_number: Some(line),
			in_project: Some(in_project),
			..Default::default()
		}
	}

	#[test]
	fn equal_lengths_replace_every_field() {
		let merged = merge_frames(
			&[native("a.kt", 1), native("b.kt", 2)],
			&[app("a.dart", 10, true), app("b.dart", 20, false)],
		);

		assert_eq!(merged.len(), 2);
		assert_eq!(merged[0].file.as_deref(), Some("a.dart"));
		assert_eq!(merged[0].line_number, Some(10));
		assert_eq!(merged[0].in_project, Some(true));
		assert_eq!(merged[1].file.as_deref(), Some("b.dart"));
		assert_eq!(merged[1].line_number, Some(20));
		assert_eq!(merged[1].in_project, Some(false));
	}

	#[test]
	fn absent_application_fields_clear_native_fields() {
		let merged = merge_frames(&[native("a.kt", 1)], &[app("a.dart", 10, true)]);

		assert_eq!(merged[0].method, None);
		assert_eq!(merged[0].column_number, None);
		assert_eq!(merged[0].module.as_deref(), Some("com.example"));
	}

	#[test]
	fn longer_native_trace_keeps_its_tail() {
		let natives: Vec<Frame> = (0..5).map(|i| native(&format!("n{i}.kt"), i)).collect();
		let merged = merge_frames(&natives, &[app("a.dart", 10, true), app("b.dart", 20, true)]);

		assert_eq!(merged.len(), 5);
		assert_eq!(merged[1].file.as_deref(), Some("b.dart"));
		assert_eq!(&merged[2..], &natives[2..]);
	}

	#[test]
	fn longer_application_trace_is_truncated() {
		let apps: Vec<StackFrame> = (0..5).map(|i| app(&format!("a{i}.dart"), i, true)).collect();
		let merged = merge_frames(&[native("a.kt", 1), native("b.kt", 2)], &apps);

		assert_eq!(merged.len(), 2);
		assert_eq!(merged[1].file.as_deref(), Some("a1.dart"));
	}

	#[test]
	fn empty_native_trace_stays_empty() {
		assert!(merge_frames(&[], &[app("a.dart", 1, true)]).is_empty());
	}

	#[test]
	fn from_map_reads_all_fields() {
		let value = json!({
			"file": "main.dart",
			"inProject": true,
			"lineNumber": 42,
			"columnNumber": 7,
			"method": "main",
		});
		let frame = StackFrame::from_map(value.as_object().unwrap());

		assert_eq!(
			frame,
			StackFrame {
				file: Some("main.dart".to_string()),
				in_project: Some(true),
				line_number: Some(42),
				column_number: Some(7),
				method: Some("main".to_string()),
			}
		);
	}

	#[test]
	fn from_map_drops_mistyped_values() {
		let value = json!({
			"file": 12,
			"inProject": "yes",
			"lineNumber": -3,
			"columnNumber": null,
			"method": "build",
		});
		let frame = StackFrame::from_map(value.as_object().unwrap());

		assert_eq!(frame.file, None);
		assert_eq!(frame.in_project, None);
		assert_eq!(frame.line_number, None);
		assert_eq!(frame.column_number, None);
		assert_eq!(frame.method.as_deref(), Some("build"));
	}

	fn arb_frame() -> impl Strategy<Value = Frame> {
		(
			proptest::option::of("[a-z]{1,8}\\.kt"),
			proptest::option::of(any::<u32>()),
			proptest::option::of("[a-z]{1,8}"),
		)
			.prop_map(|(file, line_number, module)| Frame {
				file,
				line_number,
				module,
				..Default::default()
			})
	}

	fn arb_stack_frame() -> impl Strategy<Value = StackFrame> {
		(
			proptest::option::of("[a-z]{1,8}\\.dart"),
			proptest::option::of(any::<bool>()),
			proptest::option::of(any::<u32>()),
		)
			.prop_map(|(file, in_project, line_number)| StackFrame {
				file,
				in_project,
				line_number,
				..Default::default()
			})
	}

	proptest! {
		#[test]
		fn merged_length_matches_native(
			natives in proptest::collection::vec(arb_frame(), 0..12),
			apps in proptest::collection::vec(arb_stack_frame(), 0..12),
		) {
			let merged = merge_frames(&natives, &apps);
			prop_assert_eq!(merged.len(), natives.len());

			for (i, frame) in merged.iter().enumerate() {
				prop_assert_eq!(&frame.module, &natives[i].module);
				match apps.get(i) {
					Some(app) => {
						prop_assert_eq!(&frame.file, &app.file);
						prop_assert_eq!(frame.line_number, app.line_number);
						prop_assert_eq!(frame.in_project, app.in_project);
					}
					None => prop_assert_eq!(frame, &natives[i]),
				}
			}
		}
	}
}
