#![forbid(unsafe_code)]

//! Core shared types for Anvil.
//!
//! This crate is intentionally small: it owns the interned name tables that
//! every other crate keys its maps and identity comparisons on.

mod intern;

pub use crate::intern::{ClassName, Description, FieldName, Interner, MethodName, PackageName};
