//! In-memory class hierarchy metadata for JVM bytecode scanning.
//!
//! The centerpiece is [`ClassInfoCache`]: an arena of class descriptors with
//! delayed resolution, a bounded eviction-governed table for ordinary
//! classes, eviction-exempt tables for runtime-essential and annotated
//! classes, and annotation inheritance along the superclass chain.
//! [`InfoStore`] wraps a cache with the source open/close lifecycle.
//!
//! Bytes come in through two narrow seams the caller implements:
//! [`ClassSource`] locates and streams class resources, [`ClassParser`]
//! decodes them and reports declarations through a [`ClassVisitor`].

#![forbid(unsafe_code)]

mod annotation;
mod cache;
mod config;
mod descriptor;
mod error;
mod inherit;
mod lru;
mod source;
mod store;

pub use annotation::{AnnotationOccurrence, AnnotationTarget, AnnotationValue, ConstValue};
pub use cache::{
    CacheStats, ClassInfoCache, ROOT_CLASS_NAME, RUNTIME_ESSENTIAL_PREFIXES,
};
pub use config::{
    CacheOptions, SWAP_CAPACITY_DEFAULT, SWAP_CAPACITY_ENV, SWAP_CAPACITY_MAX, SWAP_CAPACITY_MIN,
};
pub use descriptor::{
    ClassId, FieldInfo, MethodInfo, PrimitiveKind, ResolvedClass, TypeRef, ACC_ABSTRACT,
    ACC_ANNOTATION, ACC_ENUM, ACC_FINAL, ACC_INTERFACE, ACC_PRIVATE, ACC_PROTECTED, ACC_PUBLIC,
    ACC_STATIC, ACC_SUPER, ACC_SYNTHETIC,
};
pub use error::{InfoError, Result};
pub use inherit::INHERITED_ANNOTATION_CLASS;
pub use source::{
    AnnotationTargetKind, ClassParser, ClassSource, ClassVisitor, RawAnnotation,
    RawAnnotationValue, RawClass, RawField, RawMethod, RawType,
};
pub use store::{InfoStore, InfoStoreStats};

// Interned name keys, re-exported so downstream code speaks one vocabulary.
pub use anvil_core::{ClassName, Description, FieldName, Interner, MethodName, PackageName};
