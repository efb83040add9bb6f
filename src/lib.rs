/*
 * This file is part of Rampcurve.
 *
 * Copyright (C) 2025 Rampcurve contributors
 *
 * Rampcurve is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * Rampcurve is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with Rampcurve. If not, see <https://www.gnu.org/licenses/>.
 */

//! Rampcurve - editor engine for monotonic response curves
//!
//! The engine itself lives in `rc-core`; this crate is the command line front
//! end that drives it without a UI.

pub mod cli;

pub use cli::{execute, Cli, Commands, ConfigCommands, CurveArgs, Preset};
