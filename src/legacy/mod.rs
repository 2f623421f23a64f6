// ABOUTME: Backward-compatibility adapters for callers that predate the weather rename
// ABOUTME: Legacy views are one-directional projections of the current weather types
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Air-quality naming over the weather query layer
pub mod air_quality;
