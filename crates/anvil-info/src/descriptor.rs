//! The class descriptor model.
//!
//! Descriptors live in a single arena owned by the cache and are referenced
//! by [`ClassId`] indices, never by shared pointers. Edges between classes
//! (superclass, interfaces, member types) point at whatever record currently
//! answers for that name, which is usually a delayed placeholder until a
//! detail accessor forces resolution.

use anvil_core::{ClassName, Description, FieldName, MethodName, PackageName};

use crate::annotation::{AnnotationOccurrence, AnnotationValue};

pub const ACC_PUBLIC: u16 = 0x0001;
pub const ACC_PRIVATE: u16 = 0x0002;
pub const ACC_PROTECTED: u16 = 0x0004;
pub const ACC_STATIC: u16 = 0x0008;
pub const ACC_FINAL: u16 = 0x0010;
pub const ACC_SUPER: u16 = 0x0020;
pub const ACC_INTERFACE: u16 = 0x0200;
pub const ACC_ABSTRACT: u16 = 0x0400;
pub const ACC_SYNTHETIC: u16 = 0x1000;
pub const ACC_ANNOTATION: u16 = 0x2000;
pub const ACC_ENUM: u16 = 0x4000;

/// Index of a class record in the cache's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClassId(pub(crate) u32);

impl ClassId {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// The nine JVM primitive kinds (`void` included).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Boolean,
    Byte,
    Char,
    Short,
    Int,
    Long,
    Float,
    Double,
    Void,
}

impl PrimitiveKind {
    pub const ALL: [PrimitiveKind; 9] = [
        PrimitiveKind::Boolean,
        PrimitiveKind::Byte,
        PrimitiveKind::Char,
        PrimitiveKind::Short,
        PrimitiveKind::Int,
        PrimitiveKind::Long,
        PrimitiveKind::Float,
        PrimitiveKind::Double,
        PrimitiveKind::Void,
    ];

    pub fn from_type_name(name: &str) -> Option<Self> {
        Some(match name {
            "boolean" => PrimitiveKind::Boolean,
            "byte" => PrimitiveKind::Byte,
            "char" => PrimitiveKind::Char,
            "short" => PrimitiveKind::Short,
            "int" => PrimitiveKind::Int,
            "long" => PrimitiveKind::Long,
            "float" => PrimitiveKind::Float,
            "double" => PrimitiveKind::Double,
            "void" => PrimitiveKind::Void,
            _ => return None,
        })
    }

    pub fn type_name(self) -> &'static str {
        match self {
            PrimitiveKind::Boolean => "boolean",
            PrimitiveKind::Byte => "byte",
            PrimitiveKind::Char => "char",
            PrimitiveKind::Short => "short",
            PrimitiveKind::Int => "int",
            PrimitiveKind::Long => "long",
            PrimitiveKind::Float => "float",
            PrimitiveKind::Double => "double",
            PrimitiveKind::Void => "void",
        }
    }

    pub(crate) fn table_slot(self) -> usize {
        self as usize
    }
}

/// A reference to a type as it appears in a member signature.
///
/// Array types are recomputed on demand and never stored in any lookup
/// table: an array's declared name deliberately aliases its element's name,
/// so giving arrays table entries of their own would collide with the
/// element class entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeRef {
    Scalar(ClassId),
    Array { element: ClassId, dims: u8 },
}

impl TypeRef {
    /// The element record: the referenced class for scalars, the innermost
    /// element class for arrays.
    pub fn element(self) -> ClassId {
        match self {
            TypeRef::Scalar(id) | TypeRef::Array { element: id, .. } => id,
        }
    }

    pub fn is_array(self) -> bool {
        matches!(self, TypeRef::Array { .. })
    }
}

/// One arena entry. A closed union: behavior differences between the
/// variants are pattern matches in the cache, not virtual dispatch.
#[derive(Debug)]
pub(crate) enum ClassRecord {
    Primitive(PrimitiveKind),
    Delayed(DelayedClass),
    Resolved(ResolvedClass),
}

/// A placeholder for a class referenced before (or instead of) resolution.
///
/// Placeholders are created on first reference to an unseen name and are
/// never evicted; member signatures computed during earlier scans keep
/// pointing at them. The `resolved` back-link is severed when the resolved
/// side is evicted, which reverts the placeholder to "re-resolve on next
/// use".
#[derive(Debug)]
pub(crate) struct DelayedClass {
    pub(crate) name: ClassName,
    pub(crate) resolved: Option<ClassId>,
    /// Set once resolution definitively failed (no resource for the name).
    /// A later detail access re-synthesizes the artificial descriptor
    /// without another scan.
    pub(crate) artificial: bool,
    // Detail memos that survive eviction of the resolved side.
    pub(crate) fields_known_empty: Option<bool>,
    pub(crate) methods_known_empty: Option<bool>,
}

/// A fully populated class descriptor backed by one completed scan.
#[derive(Debug)]
pub struct ResolvedClass {
    pub name: ClassName,
    pub package: Option<PackageName>,
    pub modifiers: u16,
    pub superclass: Option<ClassId>,
    pub interfaces: Vec<ClassId>,
    pub fields: Vec<FieldInfo>,
    pub constructors: Vec<MethodInfo>,
    pub methods: Vec<MethodInfo>,
    pub annotations: Vec<AnnotationOccurrence>,
    /// Name falls under a runtime-essential namespace; normalized at
    /// insertion time from the reserved prefixes.
    pub is_runtime_essential: bool,
    /// Synthesized stand-in for a class whose bytes could not be found.
    pub is_artificial: bool,
    pub(crate) delayed: Option<ClassId>,
    pub(crate) effective_annotations: Option<Vec<AnnotationOccurrence>>,
}

impl ResolvedClass {
    pub fn new(name: ClassName, package: Option<PackageName>, modifiers: u16) -> Self {
        Self {
            name,
            package,
            modifiers,
            superclass: None,
            interfaces: Vec::new(),
            fields: Vec::new(),
            constructors: Vec::new(),
            methods: Vec::new(),
            annotations: Vec::new(),
            is_runtime_essential: false,
            is_artificial: false,
            delayed: None,
            effective_annotations: None,
        }
    }

    pub fn is_interface(&self) -> bool {
        self.modifiers & ACC_INTERFACE != 0
    }

    pub fn is_annotation(&self) -> bool {
        self.modifiers & ACC_ANNOTATION != 0
    }

    /// Whether the class, or any declared field or method, carries at least
    /// one annotation. Such classes are exempt from eviction.
    pub(crate) fn carries_any_annotation(&self) -> bool {
        !self.annotations.is_empty()
            || self.fields.iter().any(|f| !f.annotations.is_empty())
            || self
                .constructors
                .iter()
                .chain(self.methods.iter())
                .any(|m| {
                    !m.annotations.is_empty()
                        || m.parameter_annotations.iter().any(|p| !p.is_empty())
                })
    }
}

/// A declared field. Owned by exactly one [`ResolvedClass`]; the type is a
/// reference into the arena and may still be a delayed placeholder.
#[derive(Debug)]
pub struct FieldInfo {
    pub name: FieldName,
    pub modifiers: u16,
    /// Raw JVM descriptor text, interned.
    pub descriptor: Description,
    pub ty: TypeRef,
    pub annotations: Vec<AnnotationOccurrence>,
}

/// A declared method or constructor.
#[derive(Debug)]
pub struct MethodInfo {
    pub name: MethodName,
    pub modifiers: u16,
    /// Raw JVM descriptor text, interned.
    pub descriptor: Description,
    pub parameters: Vec<TypeRef>,
    pub return_type: TypeRef,
    pub exceptions: Vec<ClassId>,
    pub annotations: Vec<AnnotationOccurrence>,
    /// One entry per declared parameter.
    pub parameter_annotations: Vec<Vec<AnnotationOccurrence>>,
    /// Default value, for methods declared on annotation types.
    pub default_value: Option<AnnotationValue>,
}
