// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Core types for the crashbridge error-report enricher.
//!
//! This crate holds the data model shared by the bridge and its
//! collaborators, plus the pure functions that turn a caller-supplied
//! [`ErrorReport`] into an [`EnrichedReport`]:
//!
//! - [`merge_frames`] reconciles the native runtime trace with the
//!   application-layer trace, position by position
//! - [`attach_metadata`] files the report's context and raw output under a
//!   fixed metadata group
//! - [`enrich`] composes both
//!
//! Nothing in here holds state or performs I/O; gating and dispatch live in
//! the `crashbridge` crate.

pub mod breadcrumb;
pub mod config;
pub mod error;
pub mod frame;
pub mod metadata;
pub mod report;
pub mod user;

pub use breadcrumb::{Breadcrumb, BreadcrumbType};
pub use config::{ApiKey, Configuration};
pub use error::{CoreError, Result};
pub use frame::{merge_frames, Frame, StackFrame};
pub use metadata::{Metadata, METADATA_GROUP};
pub use report::{attach_metadata, enrich, EnrichedReport, ErrorReport, ReportId};
pub use user::User;
