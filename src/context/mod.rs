// ABOUTME: Dependency injection context shared by every HTTP handler
// ABOUTME: Collaborators are constructed once at startup and passed explicitly
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Server context
//!
//! There are no process-wide singletons. The binary builds one
//! [`ServerContext`] from configuration and hands it to the router; tests
//! build one around stub collaborators.

/// Server context container
pub mod server;

pub use server::ServerContext;
