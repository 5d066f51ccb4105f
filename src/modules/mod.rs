//! Host endpoints served behind the hashed URL rewriter.
//!
//! - [`databases`]: Database listing, tables, rows and introspection

pub mod databases;
