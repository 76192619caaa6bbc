// ABOUTME: Helper modules for nutriveci-cli
// ABOUTME: Output formatting shared by the command implementations
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 NutriVeci

pub mod display;
