//! Shared test harness modules for the Wayfarer CLI.

use super::*;

mod helpers;
mod venues_steps;
