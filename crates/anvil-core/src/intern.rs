//! Per-namespace string interning.
//!
//! Class names, package names, field names, method names, and free-text
//! descriptions each get their own table. Keys from different namespaces are
//! distinct types, so a field name can never be used where a class name is
//! expected, and each table can grow independently of the others.
//!
//! Two equal strings interned into the same namespace always yield the same
//! key, so key equality is string equality.

use std::fmt;

use lasso::{Rodeo, Spur};

macro_rules! name_key {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(Spur);
    };
}

name_key! {
    /// An interned JVM internal class name (e.g. `java/lang/String`).
    ClassName
}
name_key! {
    /// An interned package name (e.g. `java/lang`).
    PackageName
}
name_key! {
    /// An interned field name.
    FieldName
}
name_key! {
    /// An interned method name (also used for annotation element names,
    /// which are declared-method names on the annotation type).
    MethodName
}
name_key! {
    /// An interned free-text description, such as a raw JVM member
    /// descriptor string (`(I)V`).
    Description
}

/// The set of per-namespace intern tables.
pub struct Interner {
    classes: Rodeo,
    packages: Rodeo,
    fields: Rodeo,
    methods: Rodeo,
    descriptions: Rodeo,
}

impl Interner {
    pub fn new() -> Self {
        Self {
            classes: Rodeo::new(),
            packages: Rodeo::new(),
            fields: Rodeo::new(),
            methods: Rodeo::new(),
            descriptions: Rodeo::new(),
        }
    }

    pub fn intern_class(&mut self, name: &str) -> ClassName {
        ClassName(self.classes.get_or_intern(name))
    }

    pub fn intern_package(&mut self, name: &str) -> PackageName {
        PackageName(self.packages.get_or_intern(name))
    }

    pub fn intern_field(&mut self, name: &str) -> FieldName {
        FieldName(self.fields.get_or_intern(name))
    }

    pub fn intern_method(&mut self, name: &str) -> MethodName {
        MethodName(self.methods.get_or_intern(name))
    }

    pub fn intern_description(&mut self, text: &str) -> Description {
        Description(self.descriptions.get_or_intern(text))
    }

    pub fn class_str(&self, name: ClassName) -> &str {
        self.classes.resolve(&name.0)
    }

    pub fn package_str(&self, name: PackageName) -> &str {
        self.packages.resolve(&name.0)
    }

    pub fn field_str(&self, name: FieldName) -> &str {
        self.fields.resolve(&name.0)
    }

    pub fn method_str(&self, name: MethodName) -> &str {
        self.methods.resolve(&name.0)
    }

    pub fn description_str(&self, text: Description) -> &str {
        self.descriptions.resolve(&text.0)
    }

    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    pub fn package_count(&self) -> usize {
        self.packages.len()
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    pub fn method_count(&self) -> usize {
        self.methods.len()
    }

    pub fn description_count(&self) -> usize {
        self.descriptions.len()
    }
}

impl Default for Interner {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Interner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Interner")
            .field("classes", &self.classes.len())
            .field("packages", &self.packages.len())
            .field("fields", &self.fields.len())
            .field("methods", &self.methods.len())
            .field("descriptions", &self.descriptions.len())
            .finish()
    }
}
