// Copyright 2026 ATVR Scraper Contributors
// SPDX-License-Identifier: Apache-2.0

//! ATVR scraper library — bilingual product extraction for vinbudin.is.
//!
//! This library crate exposes the core modules for integration testing.

pub mod cli;
pub mod config;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod media;
pub mod merge;
pub mod model;
pub mod rest;
pub mod search;
pub mod tables;
