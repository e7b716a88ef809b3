//! Shared test harness modules for the tabi CLI.
#![expect(
    clippy::panic,
    reason = "Tests assert panic branches to surface unexpected CLI outcomes"
)]

use super::*;

mod helpers;
mod optimize_steps;
mod optimize_unit;
