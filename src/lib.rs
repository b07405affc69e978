//! Concurrent site-availability checking.
//!
//! A [`Checker`] fans one [`Probe`] per [`Site`] out onto the tokio runtime and
//! gathers every outcome into a name to reachability map. A site is reachable
//! when a `GET` to its URL answers with status 200.

pub mod checker;
pub mod config;
pub mod error;
pub mod menu;
pub mod probe;
pub mod sites;
pub mod workspace;

pub use checker::{Checker, Reachability};
pub use config::{Config, ConfigOptions};
pub use error::Error;
pub use menu::{App, MenuHandler, run_menu};
pub use probe::{HttpProbe, Probe};
pub use sites::{Site, SiteList};
pub use workspace::Workspace;
