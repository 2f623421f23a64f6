// ABOUTME: System prompts for the insight generators, loaded at compile time
// ABOUTME: Prompts live in markdown files next to this module for easy editing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// System prompt for the multi-city insights report
pub const INSIGHTS_SYSTEM_PROMPT: &str = include_str!("insights_system.md");

/// System prompt for a single-city briefing
pub const CITY_INSIGHT_SYSTEM_PROMPT: &str = include_str!("city_insight_system.md");
