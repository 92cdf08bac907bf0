//! Test helpers shared across the workspace.
//!
//! [`env`] serialises mutations of the variables that steer user directory
//! resolution. [`fragments`] builds throwaway `environment.d` trees.

pub mod env;
pub mod fragments;
