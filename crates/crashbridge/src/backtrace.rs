// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Native frame capture.
//!
//! Produces the runtime half of a report's trace from `std::backtrace`. The
//! printed form looks like:
//!
//! ```text
//!    0: my_app::handlers::checkout
//!              at ./src/handlers.rs:42:9
//!    1: core::ops::function::FnOnce::call_once
//!              at /rustc/.../library/core/src/ops/function.rs:250:5
//! ```

use std::backtrace::Backtrace;

use crashbridge_core::Frame;
use rustc_demangle::demangle;

/// Capture the current thread's backtrace as native frames.
///
/// Returns an empty trace when symbols are unavailable.
pub fn capture_native_frames() -> Vec<Frame> {
	let backtrace = Backtrace::force_capture();
	parse_backtrace(&backtrace.to_string())
}

/// Parse the printed form of a backtrace into frames, outermost last.
pub fn parse_backtrace(text: &str) -> Vec<Frame> {
	let mut frames: Vec<Frame> = Vec::new();

	for line in text.lines() {
		let line = line.trim();
		if line.is_empty() {
			continue;
		}

		if let Some(location) = line.strip_prefix("at ") {
			if let Some(frame) = frames.last_mut() {
				apply_location(frame, location);
			}
			continue;
		}

		if let Some(symbol) = strip_frame_index(line) {
			frames.push(frame_for_symbol(symbol));
		}
	}

	frames
}

/// `"12: foo::bar"` -> `"foo::bar"`. Lines without an index are not frames.
fn strip_frame_index(line: &str) -> Option<&str> {
	let (index, rest) = line.split_once(':')?;
	index.trim().parse::<u32>().ok()?;
	let symbol = rest.trim();
	(!symbol.is_empty()).then_some(symbol)
}

fn frame_for_symbol(symbol: &str) -> Frame {
	let method = format!("{:#}", demangle(symbol));
	let module = module_of(&method);
	let in_project = is_in_project(&method);

	Frame {
		method: Some(method),
		in_project: Some(in_project),
		module,
		..Default::default()
	}
}

/// `"app::handlers::checkout"` -> `"app::handlers"`.
fn module_of(method: &str) -> Option<String> {
	if method.starts_with('<') {
		return None;
	}
	method.rfind("::").map(|idx| method[..idx].to_string())
}

/// Split `path:line:col` from the right so paths containing colons survive.
fn apply_location(frame: &mut Frame, location: &str) {
	let mut parts = location.rsplitn(3, ':');
	let last = parts.next();
	let middle = parts.next();
	let rest = parts.next();

	match (rest, middle, last) {
		(Some(file), Some(line), Some(col)) => match (line.parse::<u32>(), col.parse::<u32>()) {
			(Ok(line), Ok(col)) => {
				frame.file = Some(file.to_string());
				frame.line_number = Some(line);
				frame.column_number = Some(col);
			}
			_ => apply_file_and_line(frame, location),
		},
		_ => apply_file_and_line(frame, location),
	}
}

fn apply_file_and_line(frame: &mut Frame, location: &str) {
	match location.rsplit_once(':') {
		Some((file, line)) if line.parse::<u32>().is_ok() => {
			frame.file = Some(file.to_string());
			frame.line_number = line.parse().ok();
		}
		_ => frame.file = Some(location.to_string()),
	}
}

/// Whether a frame belongs to application code rather than the runtime.
fn is_in_project(method: &str) -> bool {
	const SYSTEM_PREFIXES: &[&str] = &[
		"std::",
		"core::",
		"alloc::",
		"<std::",
		"<core::",
		"<alloc::",
		"tokio::",
		"<tokio::",
		"futures::",
		"<futures::",
		"async_trait::",
		"tracing::",
		"<tracing::",
		"rustc_demangle::",
		"crashbridge::backtrace::",
		"rust_begin_unwind",
		"rust_panic",
		"__rust_",
		"_rust_",
		"__libc_",
	];

	const SYSTEM_EXACT: &[&str] = &["main", "_start"];

	const SYSTEM_CONTAINS: &[&str] = &["::panicking::", "::sys_common::", "::rt::lang_start"];

	!(SYSTEM_EXACT.contains(&method)
		|| SYSTEM_PREFIXES.iter().any(|p| method.starts_with(p))
		|| SYSTEM_CONTAINS.iter().any(|c| method.contains(c)))
}
