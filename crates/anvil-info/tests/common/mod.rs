#![allow(dead_code)]

//! Shared in-memory fixtures: a scripted class source and parser pair that
//! serve hand-built class definitions and count every lifecycle call.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::io::Read;
use std::rc::Rc;

use anvil_info::{
    AnnotationTargetKind, CacheOptions, ClassInfoCache, ClassParser, ClassSource, ClassVisitor,
    InfoError, InfoStore, RawAnnotation, RawAnnotationValue, RawClass, RawField, RawMethod,
    RawType, Result, ACC_ABSTRACT, ACC_ANNOTATION, ACC_INTERFACE, ACC_PUBLIC, ACC_SUPER,
};

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// One scripted class definition, replayed through the visitor on parse.
#[derive(Debug, Clone)]
pub struct ClassDef {
    pub name: String,
    pub modifiers: u16,
    pub superclass: Option<String>,
    pub interfaces: Vec<String>,
    pub annotations: Vec<RawAnnotation>,
    pub fields: Vec<(RawField, Vec<RawAnnotation>)>,
    pub methods: Vec<MethodDef>,
    /// Name the parse reports, when it should differ from the resource name.
    pub reported_name: Option<String>,
    /// A second class declaration the parse reports after the first.
    pub extra_declaration: Option<RawClass>,
    /// When set, the parse fails with this message instead of completing.
    pub parse_error: Option<String>,
}

#[derive(Debug, Clone)]
pub struct MethodDef {
    pub raw: RawMethod,
    pub annotations: Vec<RawAnnotation>,
    pub parameter_annotations: Vec<Vec<RawAnnotation>>,
    pub default_value: Option<RawAnnotationValue>,
}

impl ClassDef {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            modifiers: ACC_PUBLIC | ACC_SUPER,
            superclass: Some("java/lang/Object".to_owned()),
            interfaces: Vec::new(),
            annotations: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            reported_name: None,
            extra_declaration: None,
            parse_error: None,
        }
    }

    pub fn extends(mut self, superclass: &str) -> Self {
        self.superclass = Some(superclass.to_owned());
        self
    }

    pub fn no_superclass(mut self) -> Self {
        self.superclass = None;
        self
    }

    pub fn interface(mut self) -> Self {
        self.modifiers = ACC_PUBLIC | ACC_INTERFACE | ACC_ABSTRACT;
        self.superclass = None;
        self
    }

    pub fn annotation_type(mut self) -> Self {
        self.modifiers = ACC_PUBLIC | ACC_INTERFACE | ACC_ABSTRACT | ACC_ANNOTATION;
        self.superclass = None;
        self.interfaces.push("java/lang/annotation/Annotation".to_owned());
        self
    }

    pub fn implements(mut self, interface: &str) -> Self {
        self.interfaces.push(interface.to_owned());
        self
    }

    pub fn annotated(mut self, annotation: RawAnnotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    pub fn field(mut self, name: &str, ty: RawType) -> Self {
        self.fields.push((
            RawField {
                name: name.to_owned(),
                modifiers: ACC_PUBLIC,
                descriptor: descriptor_of(&ty),
                ty,
            },
            Vec::new(),
        ));
        self
    }

    pub fn annotated_field(mut self, name: &str, ty: RawType, annotation: RawAnnotation) -> Self {
        self.fields.push((
            RawField {
                name: name.to_owned(),
                modifiers: ACC_PUBLIC,
                descriptor: descriptor_of(&ty),
                ty,
            },
            vec![annotation],
        ));
        self
    }

    pub fn method(mut self, name: &str) -> Self {
        self.methods.push(MethodDef {
            raw: RawMethod {
                name: name.to_owned(),
                modifiers: ACC_PUBLIC,
                descriptor: "()V".to_owned(),
                parameters: Vec::new(),
                return_type: RawType::scalar("void"),
                exceptions: Vec::new(),
            },
            annotations: Vec::new(),
            parameter_annotations: Vec::new(),
            default_value: None,
        });
        self
    }

    pub fn annotated_method(mut self, name: &str, annotation: RawAnnotation) -> Self {
        self = self.method(name);
        self.methods
            .last_mut()
            .unwrap()
            .annotations
            .push(annotation);
        self
    }

    pub fn method_def(mut self, method: MethodDef) -> Self {
        self.methods.push(method);
        self
    }

    pub fn reported_as(mut self, name: &str) -> Self {
        self.reported_name = Some(name.to_owned());
        self
    }

    pub fn also_declares(mut self, class: RawClass) -> Self {
        self.extra_declaration = Some(class);
        self
    }

    pub fn fails_parse(mut self, message: &str) -> Self {
        self.parse_error = Some(message.to_owned());
        self
    }
}

fn descriptor_of(ty: &RawType) -> String {
    let element = match ty.element.as_str() {
        "boolean" => "Z".to_owned(),
        "byte" => "B".to_owned(),
        "char" => "C".to_owned(),
        "short" => "S".to_owned(),
        "int" => "I".to_owned(),
        "long" => "J".to_owned(),
        "float" => "F".to_owned(),
        "double" => "D".to_owned(),
        "void" => "V".to_owned(),
        class => format!("L{class};"),
    };
    format!("{}{element}", "[".repeat(ty.dims as usize))
}

/// Call counters shared between a fixture and the tests driving it.
#[derive(Debug, Clone, Default)]
pub struct Counters {
    pub source_opens: Rc<Cell<usize>>,
    pub source_closes: Rc<Cell<usize>>,
    pub stream_opens: Rc<Cell<usize>>,
    pub stream_closes: Rc<Cell<usize>>,
    parses: Rc<RefCell<HashMap<String, usize>>>,
}

impl Counters {
    pub fn parses_of(&self, class_name: &str) -> usize {
        self.parses
            .borrow()
            .get(class_name)
            .copied()
            .unwrap_or(0)
    }

    pub fn total_parses(&self) -> usize {
        self.parses.borrow().values().sum()
    }
}

#[derive(Default)]
pub struct Fixture {
    classes: Rc<RefCell<HashMap<String, ClassDef>>>,
    pub counters: Counters,
}

impl Fixture {
    pub fn new() -> Self {
        init_tracing();
        Self::default()
    }

    pub fn define(&self, def: ClassDef) -> &Self {
        self.classes.borrow_mut().insert(def.name.clone(), def);
        self
    }

    /// Replace an existing definition (for scripting a retry after failure).
    pub fn redefine(&self, def: ClassDef) -> &Self {
        self.define(def)
    }

    pub fn cache(&self, swap_capacity: usize) -> ClassInfoCache {
        ClassInfoCache::new(
            &CacheOptions::new(swap_capacity),
            Box::new(FixtureSource {
                classes: Rc::clone(&self.classes),
                counters: self.counters.clone(),
            }),
            Box::new(FixtureParser {
                classes: Rc::clone(&self.classes),
                counters: self.counters.clone(),
            }),
        )
    }

    pub fn store(&self, swap_capacity: usize) -> InfoStore {
        InfoStore::new(
            &CacheOptions::new(swap_capacity),
            Box::new(FixtureSource {
                classes: Rc::clone(&self.classes),
                counters: self.counters.clone(),
            }),
            Box::new(FixtureParser {
                classes: Rc::clone(&self.classes),
                counters: self.counters.clone(),
            }),
        )
    }
}

struct FixtureSource {
    classes: Rc<RefCell<HashMap<String, ClassDef>>>,
    counters: Counters,
}

impl ClassSource for FixtureSource {
    fn open(&mut self) -> Result<()> {
        self.counters.source_opens.set(self.counters.source_opens.get() + 1);
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.counters.source_closes.set(self.counters.source_closes.get() + 1);
        Ok(())
    }

    fn open_stream(
        &mut self,
        class_name: &str,
        _resource_name: &str,
    ) -> Result<Option<Box<dyn Read>>> {
        if !self.classes.borrow().contains_key(class_name) {
            return Ok(None);
        }
        self.counters.stream_opens.set(self.counters.stream_opens.get() + 1);
        Ok(Some(Box::new(std::io::empty())))
    }

    fn close_stream(
        &mut self,
        _class_name: &str,
        _resource_name: &str,
        _stream: Box<dyn Read>,
    ) -> Result<()> {
        self.counters.stream_closes.set(self.counters.stream_closes.get() + 1);
        Ok(())
    }
}

struct FixtureParser {
    classes: Rc<RefCell<HashMap<String, ClassDef>>>,
    counters: Counters,
}

impl ClassParser for FixtureParser {
    fn parse(
        &mut self,
        expected_name: &str,
        _stream: &mut dyn Read,
        visitor: &mut dyn ClassVisitor,
    ) -> Result<()> {
        *self
            .counters
            .parses
            .borrow_mut()
            .entry(expected_name.to_owned())
            .or_insert(0) += 1;

        let def = self
            .classes
            .borrow()
            .get(expected_name)
            .cloned()
            .ok_or_else(|| InfoError::MalformedClass {
                class: expected_name.to_owned(),
                message: "no scripted definition".to_owned(),
            })?;

        if let Some(message) = def.parse_error {
            return Err(InfoError::MalformedClass {
                class: expected_name.to_owned(),
                message,
            });
        }

        visitor.visit_class(RawClass {
            name: def.reported_name.unwrap_or(def.name),
            modifiers: def.modifiers,
            superclass: def.superclass,
            interfaces: def.interfaces,
        });
        if let Some(extra) = def.extra_declaration {
            visitor.visit_class(extra);
        }
        for annotation in def.annotations {
            visitor.visit_annotation(AnnotationTargetKind::Class, annotation);
        }
        for (field, annotations) in def.fields {
            visitor.visit_field(field);
            for annotation in annotations {
                visitor.visit_annotation(AnnotationTargetKind::Field, annotation);
            }
        }
        for method in def.methods {
            visitor.visit_method(method.raw);
            for annotation in method.annotations {
                visitor.visit_annotation(AnnotationTargetKind::Method, annotation);
            }
            for (index, slot) in method.parameter_annotations.into_iter().enumerate() {
                for annotation in slot {
                    visitor.visit_annotation(
                        AnnotationTargetKind::Parameter {
                            index: index as u8,
                        },
                        annotation,
                    );
                }
            }
            if let Some(value) = method.default_value {
                visitor.visit_method_default(value);
            }
        }
        visitor.visit_end();
        Ok(())
    }
}
