// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Compiles the Unicode Character Database into sorted interval tables.

pub mod apperr;
pub mod category;
pub mod config;
pub mod east_asian_width;
pub mod emit;
pub mod helpers;
pub mod interval;
pub mod optimize;
pub mod pipeline;
pub mod source;
pub mod width;
