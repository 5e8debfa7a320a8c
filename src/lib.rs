//! treetile: slice-and-dice treemaps over weighted hierarchies
//!
//! The [`domain`] layer owns the arena tree, its layout engine and the
//! filesystem and paper builders; [`application`] wires them to
//! [`config::Settings`]; [`cli`] is the `treetile` binary's surface.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod util;
