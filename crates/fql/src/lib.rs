//! fql: filter query language
//!
//! Compiles short filter expressions such as `type=pe and size>5mb` into structured search
//! queries. Field types, backend names and field groups come from `.fql.toml` configuration
//! files, discovered the same way for every command.
//!
//! The binary is a thin shell over [`fql_query`] and [`fql_config`]: it resolves configuration,
//! runs the compiler and renders the result as text, tables or JSON.

#![warn(missing_docs)]

pub mod cli;
