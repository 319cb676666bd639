//! MyRent Kernel Library
//!
//! Collection listing for the MyRent REST API: resource descriptors, the
//! filter/sort/paginate pipeline, and account authentication helpers.
//! The `myrent` binary drives the same pipeline from the command line.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod listing;
pub mod resources;
