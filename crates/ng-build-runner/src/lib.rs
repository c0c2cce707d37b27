//! Downstream build delegation.
//!
//! The generator core decides what entry source to feed the Angular build
//! and where its output goes; this crate hands that work to the external,
//! already-configured `ng` CLI and propagates its verdict. The optional
//! bundle rename afterwards is peripheral plumbing triggered by a
//! successful build plus a configured target name.

mod runner;

pub use runner::{
    rename_main_bundle, BuildError, BuildRequest, BuildTarget, NgBuildRunner, OutputHashing,
};
