//! Annotation occurrences and values, keyed on interned names.

use anvil_core::{ClassName, FieldName, MethodName};

/// A single use of an annotation.
///
/// `declared_on` and `found_on` are both absent for value-less contexts
/// (array elements, default values, child annotations). For an inherited
/// occurrence, `declared_on` still names the superclass that declared it
/// while `found_on` names the inheriting class.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationOccurrence {
    /// The annotation type.
    pub class_name: ClassName,
    /// Ordered `(element name, value)` pairs; element names are
    /// declared-method names on the annotation type.
    pub elements: Vec<(MethodName, AnnotationValue)>,
    pub declared_on: Option<AnnotationTarget>,
    pub found_on: Option<ClassName>,
}

impl AnnotationOccurrence {
    pub fn marker(class_name: ClassName) -> Self {
        Self {
            class_name,
            elements: Vec::new(),
            declared_on: None,
            found_on: None,
        }
    }

    pub fn value(&self, element: MethodName) -> Option<&AnnotationValue> {
        self.elements
            .iter()
            .find(|(name, _)| *name == element)
            .map(|(_, value)| value)
    }

    /// A copy of this occurrence as seen from an inheriting subclass.
    pub(crate) fn inherited_onto(&self, class: ClassName) -> Self {
        let mut copy = self.clone();
        copy.found_on = Some(class);
        copy
    }
}

/// Where an annotation occurrence was declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnotationTarget {
    Class(ClassName),
    Field {
        class: ClassName,
        field: FieldName,
    },
    Method {
        class: ClassName,
        method: MethodName,
    },
    Parameter {
        class: ClassName,
        method: MethodName,
        index: u8,
    },
}

impl AnnotationTarget {
    pub fn class(self) -> ClassName {
        match self {
            AnnotationTarget::Class(class)
            | AnnotationTarget::Field { class, .. }
            | AnnotationTarget::Method { class, .. }
            | AnnotationTarget::Parameter { class, .. } => class,
        }
    }
}

/// An annotation element value.
#[derive(Debug, Clone, PartialEq)]
pub enum AnnotationValue {
    Const(ConstValue),
    Class(ClassName),
    Enum { class: ClassName, literal: FieldName },
    Nested(Box<AnnotationOccurrence>),
    Array(Vec<AnnotationValue>),
}

/// A primitive or string constant inside an annotation value.
#[derive(Debug, Clone, PartialEq)]
pub enum ConstValue {
    Byte(i8),
    Char(char),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Boolean(bool),
    String(String),
}
