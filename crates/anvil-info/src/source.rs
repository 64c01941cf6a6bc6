//! The narrow seams to the external byte-stream provider and bytecode
//! producer.
//!
//! The cache consumes these interfaces and nothing else: it asks the
//! [`ClassSource`] for a stream, hands the stream to the [`ClassParser`]
//! together with a [`ClassVisitor`], and ingests whatever the producer
//! reported. Actual class-file decoding lives entirely behind
//! [`ClassParser`].

use std::io::Read;

use crate::annotation::ConstValue;
use crate::error::{InfoError, Result};

/// An aggregate of class-byte roots.
///
/// `open`/`close` bracket a whole scanning session (the store façade calls
/// them); `open_stream`/`close_stream` bracket a single class scan. The
/// cache guarantees `close_stream` runs even when parsing fails.
pub trait ClassSource {
    fn open(&mut self) -> Result<()> {
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        Ok(())
    }

    /// The resource name bytes for a class are looked up under.
    fn resource_name(&self, class_name: &str) -> String {
        format!("{class_name}.class")
    }

    /// `Ok(None)` means no root provides the resource. That is a legitimate
    /// terminal state, not an error.
    fn open_stream(
        &mut self,
        class_name: &str,
        resource_name: &str,
    ) -> Result<Option<Box<dyn Read>>>;

    fn close_stream(
        &mut self,
        class_name: &str,
        resource_name: &str,
        stream: Box<dyn Read>,
    ) -> Result<()> {
        let _ = (class_name, resource_name, stream);
        Ok(())
    }
}

/// The bytecode producer: decodes one class's bytes and reports what it
/// finds through the visitor callbacks.
pub trait ClassParser {
    fn parse(
        &mut self,
        expected_name: &str,
        stream: &mut dyn Read,
        visitor: &mut dyn ClassVisitor,
    ) -> Result<()>;
}

/// Callbacks invoked by a [`ClassParser`] during one scan.
///
/// Member-level annotations attach to the most recently visited field or
/// method, mirroring the streaming order of class-file attributes.
pub trait ClassVisitor {
    fn visit_class(&mut self, class: RawClass);
    fn visit_field(&mut self, field: RawField);
    fn visit_method(&mut self, method: RawMethod);
    fn visit_annotation(&mut self, target: AnnotationTargetKind, annotation: RawAnnotation);
    /// Default value of the most recently visited method (annotation-type
    /// methods only).
    fn visit_method_default(&mut self, value: RawAnnotationValue);
    fn visit_end(&mut self);
}

/// Which declaration a [`ClassVisitor::visit_annotation`] call targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnotationTargetKind {
    Class,
    /// The most recently visited field.
    Field,
    /// The most recently visited method.
    Method,
    /// A parameter of the most recently visited method.
    Parameter { index: u8 },
}

/// An un-interned type reference as the producer reports it: an element
/// name (primitive or internal class name) plus an array dimension count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawType {
    pub element: String,
    pub dims: u8,
}

impl RawType {
    pub fn scalar(element: impl Into<String>) -> Self {
        Self {
            element: element.into(),
            dims: 0,
        }
    }

    pub fn array(element: impl Into<String>, dims: u8) -> Self {
        Self {
            element: element.into(),
            dims,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawClass {
    pub name: String,
    pub modifiers: u16,
    pub superclass: Option<String>,
    pub interfaces: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawField {
    pub name: String,
    pub modifiers: u16,
    /// Raw JVM descriptor text (e.g. `Ljava/lang/String;`).
    pub descriptor: String,
    pub ty: RawType,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawMethod {
    pub name: String,
    pub modifiers: u16,
    /// Raw JVM descriptor text (e.g. `(I)V`).
    pub descriptor: String,
    pub parameters: Vec<RawType>,
    pub return_type: RawType,
    pub exceptions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawAnnotation {
    pub class_name: String,
    pub elements: Vec<(String, RawAnnotationValue)>,
}

impl RawAnnotation {
    pub fn marker(class_name: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            elements: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RawAnnotationValue {
    Const(ConstValue),
    Class(String),
    Enum { class: String, literal: String },
    Nested(Box<RawAnnotation>),
    Array(Vec<RawAnnotationValue>),
}

/// Everything one completed scan reported, still un-interned.
#[derive(Debug)]
pub(crate) struct ScannedClass {
    pub(crate) class: RawClass,
    pub(crate) class_annotations: Vec<RawAnnotation>,
    pub(crate) fields: Vec<ScannedField>,
    pub(crate) methods: Vec<ScannedMethod>,
}

#[derive(Debug)]
pub(crate) struct ScannedField {
    pub(crate) raw: RawField,
    pub(crate) annotations: Vec<RawAnnotation>,
}

#[derive(Debug)]
pub(crate) struct ScannedMethod {
    pub(crate) raw: RawMethod,
    pub(crate) annotations: Vec<RawAnnotation>,
    pub(crate) parameter_annotations: Vec<Vec<RawAnnotation>>,
    pub(crate) default_value: Option<RawAnnotationValue>,
}

/// The cache-side visitor that collects one class's data during a scan.
#[derive(Debug)]
pub(crate) struct ClassDataBuilder {
    expected_name: String,
    class: Option<RawClass>,
    class_annotations: Vec<RawAnnotation>,
    fields: Vec<ScannedField>,
    methods: Vec<ScannedMethod>,
    ended: bool,
}

impl ClassDataBuilder {
    pub(crate) fn new(expected_name: &str) -> Self {
        Self {
            expected_name: expected_name.to_owned(),
            class: None,
            class_annotations: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            ended: false,
        }
    }

    pub(crate) fn finish(self) -> Result<ScannedClass> {
        let Some(class) = self.class else {
            return Err(InfoError::MalformedClass {
                class: self.expected_name,
                message: "scan produced no class declaration".to_owned(),
            });
        };
        if !self.ended {
            return Err(InfoError::MalformedClass {
                class: self.expected_name,
                message: "scan did not run to completion".to_owned(),
            });
        }
        if class.name != self.expected_name {
            return Err(InfoError::ClassNameMismatch {
                expected: self.expected_name,
                found: class.name,
            });
        }
        Ok(ScannedClass {
            class,
            class_annotations: self.class_annotations,
            fields: self.fields,
            methods: self.methods,
        })
    }
}

impl ClassVisitor for ClassDataBuilder {
    fn visit_class(&mut self, class: RawClass) {
        if let Some(first) = &self.class {
            // Duplicate definition within one scan: benign, first wins.
            tracing::warn!(
                kept = %first.name,
                ignored = %class.name,
                "duplicate class declaration in one scan"
            );
            return;
        }
        self.class = Some(class);
    }

    fn visit_field(&mut self, field: RawField) {
        self.fields.push(ScannedField {
            raw: field,
            annotations: Vec::new(),
        });
    }

    fn visit_method(&mut self, method: RawMethod) {
        let parameter_count = method.parameters.len();
        self.methods.push(ScannedMethod {
            raw: method,
            annotations: Vec::new(),
            parameter_annotations: vec![Vec::new(); parameter_count],
            default_value: None,
        });
    }

    fn visit_annotation(&mut self, target: AnnotationTargetKind, annotation: RawAnnotation) {
        match target {
            AnnotationTargetKind::Class => self.class_annotations.push(annotation),
            AnnotationTargetKind::Field => match self.fields.last_mut() {
                Some(field) => field.annotations.push(annotation),
                None => tracing::warn!(
                    class = %self.expected_name,
                    "field annotation reported before any field; dropped"
                ),
            },
            AnnotationTargetKind::Method => match self.methods.last_mut() {
                Some(method) => method.annotations.push(annotation),
                None => tracing::warn!(
                    class = %self.expected_name,
                    "method annotation reported before any method; dropped"
                ),
            },
            AnnotationTargetKind::Parameter { index } => {
                let slot = self
                    .methods
                    .last_mut()
                    .and_then(|m| m.parameter_annotations.get_mut(index as usize));
                match slot {
                    Some(slot) => slot.push(annotation),
                    None => tracing::warn!(
                        class = %self.expected_name,
                        index,
                        "parameter annotation without a matching parameter; dropped"
                    ),
                }
            }
        }
    }

    fn visit_method_default(&mut self, value: RawAnnotationValue) {
        match self.methods.last_mut() {
            Some(method) => method.default_value = Some(value),
            None => tracing::warn!(
                class = %self.expected_name,
                "method default value reported before any method; dropped"
            ),
        }
    }

    fn visit_end(&mut self) {
        self.ended = true;
    }
}
