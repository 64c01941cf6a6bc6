//! The class info cache: descriptor storage, resolution, and eviction.
//!
//! All descriptors live in one append-only arena and are addressed by
//! [`ClassId`]. Resolved classes are partitioned into three tables:
//! runtime-essential and annotated classes are exempt from eviction, while
//! the general (swappable) table is bounded and governed by a
//! most-recently-used list. Delayed placeholders are never evicted; evicting
//! a resolved class merely severs its placeholder's back-link, so the
//! placeholder re-resolves on next use.
//!
//! The cache has a single logical owner. Resolution is reentrant (scanning
//! one class resolves the names it references, which creates placeholders
//! mid-scan) but never concurrent.

use std::collections::HashMap;
use std::fmt;
use std::time::{Duration, Instant};

use anvil_core::{ClassName, Interner, PackageName};

use crate::annotation::{AnnotationOccurrence, AnnotationTarget, AnnotationValue};
use crate::config::CacheOptions;
use crate::descriptor::{
    ClassId, ClassRecord, DelayedClass, FieldInfo, MethodInfo, PrimitiveKind, ResolvedClass,
    TypeRef, ACC_FINAL, ACC_INTERFACE, ACC_PUBLIC, ACC_SUPER,
};
use crate::error::Result;
use crate::lru::LruList;
use crate::source::{
    ClassDataBuilder, ClassParser, ClassSource, RawAnnotation, RawAnnotationValue, RawType,
    ScannedClass, ScannedField, ScannedMethod,
};

/// Classes under these namespaces are runtime-essential and never evicted.
pub const RUNTIME_ESSENTIAL_PREFIXES: &[&str] = &["java/", "javax/"];

/// The root of every superclass chain.
pub const ROOT_CLASS_NAME: &str = "java/lang/Object";

pub(crate) fn is_runtime_essential_name(name: &str) -> bool {
    RUNTIME_ESSENTIAL_PREFIXES
        .iter()
        .any(|prefix| name.starts_with(prefix))
}

/// Counters accumulated over the cache's lifetime.
#[derive(Debug, Default, Clone, Copy)]
pub struct CacheStats {
    /// `resolve_class` calls answered from an existing record.
    pub hits: u64,
    /// `resolve_class` calls that created a new placeholder.
    pub misses: u64,
    /// Completed or attempted parses (not-found opens excluded).
    pub scans: u64,
    pub evictions: u64,
    /// Artificial descriptors synthesized for missing classes, counting
    /// re-synthesis after an eviction.
    pub artificial: u64,
    /// Time spent in the bytecode producer.
    pub scan_time: Duration,
    /// Time spent opening and closing source streams.
    pub stream_time: Duration,
}

pub struct ClassInfoCache {
    pub(crate) interner: Interner,
    pub(crate) arena: Vec<ClassRecord>,
    primitives: [Option<ClassId>; 9],
    delayed: HashMap<ClassName, ClassId>,
    essential: HashMap<ClassName, ClassId>,
    annotated: HashMap<ClassName, ClassId>,
    swappable: HashMap<ClassName, ClassId>,
    lru: LruList,
    swap_capacity: usize,
    source: Box<dyn ClassSource>,
    parser: Box<dyn ClassParser>,
    stats: CacheStats,
}

impl fmt::Debug for ClassInfoCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassInfoCache")
            .field("arena_len", &self.arena.len())
            .field("delayed", &self.delayed.len())
            .field("essential", &self.essential.len())
            .field("annotated", &self.annotated.len())
            .field("swappable", &self.swappable.len())
            .field("swap_capacity", &self.swap_capacity)
            .finish_non_exhaustive()
    }
}

impl ClassInfoCache {
    pub fn new(
        options: &CacheOptions,
        source: Box<dyn ClassSource>,
        parser: Box<dyn ClassParser>,
    ) -> Self {
        let swap_capacity = CacheOptions::new(options.swap_capacity).swap_capacity;
        Self {
            interner: Interner::new(),
            arena: Vec::new(),
            primitives: [None; 9],
            delayed: HashMap::new(),
            essential: HashMap::new(),
            annotated: HashMap::new(),
            swappable: HashMap::new(),
            lru: LruList::default(),
            swap_capacity,
            source,
            parser,
            stats: CacheStats::default(),
        }
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    pub fn interner(&self) -> &Interner {
        &self.interner
    }

    pub fn interner_mut(&mut self) -> &mut Interner {
        &mut self.interner
    }

    pub fn swap_capacity(&self) -> usize {
        self.swap_capacity
    }

    /// Current size of the general (swappable) table.
    pub fn swappable_len(&self) -> usize {
        debug_assert_eq!(self.swappable.len(), self.lru.len());
        self.swappable.len()
    }

    // ---- record access -------------------------------------------------

    pub(crate) fn record(&self, id: ClassId) -> &ClassRecord {
        &self.arena[id.index()]
    }

    pub(crate) fn record_mut(&mut self, id: ClassId) -> &mut ClassRecord {
        &mut self.arena[id.index()]
    }

    fn alloc(&mut self, record: ClassRecord) -> ClassId {
        let id = ClassId(self.arena.len() as u32);
        self.arena.push(record);
        id
    }

    pub(crate) fn expect_resolved(&self, id: ClassId) -> &ResolvedClass {
        match self.record(id) {
            ClassRecord::Resolved(resolved) => resolved,
            _ => unreachable!("record is not resolved"),
        }
    }

    pub(crate) fn expect_resolved_mut(&mut self, id: ClassId) -> &mut ResolvedClass {
        match self.record_mut(id) {
            ClassRecord::Resolved(resolved) => resolved,
            _ => unreachable!("record is not resolved"),
        }
    }

    /// The name of any record. Arrays have no records of their own; use
    /// [`Self::type_name`] for a [`TypeRef`].
    pub fn class_name(&self, id: ClassId) -> &str {
        match self.record(id) {
            ClassRecord::Primitive(kind) => kind.type_name(),
            ClassRecord::Delayed(delayed) => self.interner.class_str(delayed.name),
            ClassRecord::Resolved(resolved) => self.interner.class_str(resolved.name),
        }
    }

    /// The declared name of a type reference. An array's name deliberately
    /// aliases its element's name.
    pub fn type_name(&self, ty: TypeRef) -> &str {
        self.class_name(ty.element())
    }

    pub fn is_primitive(&self, id: ClassId) -> bool {
        matches!(self.record(id), ClassRecord::Primitive(_))
    }

    /// Whether the record is a delayed placeholder (resolved or not).
    pub fn is_delayed(&self, id: ClassId) -> bool {
        matches!(self.record(id), ClassRecord::Delayed(_))
    }

    /// The resolved record currently linked to a placeholder, if any.
    pub fn linked_resolved(&self, id: ClassId) -> Option<ClassId> {
        match self.record(id) {
            ClassRecord::Delayed(delayed) => delayed.resolved,
            ClassRecord::Resolved(_) | ClassRecord::Primitive(_) => Some(id),
        }
    }

    // ---- resolution ----------------------------------------------------

    /// The unique record for a primitive kind, created lazily on first use.
    pub fn primitive(&mut self, kind: PrimitiveKind) -> ClassId {
        if let Some(id) = self.primitives[kind.table_slot()] {
            return id;
        }
        let id = self.alloc(ClassRecord::Primitive(kind));
        self.primitives[kind.table_slot()] = Some(id);
        id
    }

    /// Resolve a type reference. Primitive names are allowed here; arrays
    /// are recomputed on demand and never stored.
    pub fn resolve_type(&mut self, element_name: &str, dims: u8) -> TypeRef {
        let element = match PrimitiveKind::from_type_name(element_name) {
            Some(kind) => self.primitive(kind),
            None => self.resolve_class(element_name),
        };
        if dims == 0 {
            TypeRef::Scalar(element)
        } else {
            TypeRef::Array { element, dims }
        }
    }

    /// Resolve a class name to a descriptor suitable for use as a
    /// superclass/interface/member-type reference.
    ///
    /// Never scans: an unseen name yields a delayed placeholder, and
    /// resolution is deferred until a detail accessor is invoked. A hit in
    /// the swappable table counts as an access and promotes the entry.
    pub fn resolve_class(&mut self, name: &str) -> ClassId {
        let key = self.interner.intern_class(name);
        self.resolve_class_interned(key)
    }

    pub(crate) fn resolve_class_interned(&mut self, key: ClassName) -> ClassId {
        if let Some(&id) = self.essential.get(&key) {
            self.stats.hits += 1;
            return id;
        }
        if let Some(&id) = self.annotated.get(&key) {
            self.stats.hits += 1;
            return id;
        }
        if let Some(&id) = self.swappable.get(&key) {
            self.stats.hits += 1;
            self.lru.promote(id);
            return id;
        }
        if let Some(&id) = self.delayed.get(&key) {
            self.stats.hits += 1;
            return id;
        }

        self.stats.misses += 1;
        // Defensive: associate with any resolved entry that might already
        // exist for the name. By construction of the checks above this is
        // None, but the link invariant is cheap to restate.
        let resolved = self.lookup_resolved(key);
        let id = self.alloc(ClassRecord::Delayed(DelayedClass {
            name: key,
            resolved,
            artificial: false,
            fields_known_empty: None,
            methods_known_empty: None,
        }));
        if let Some(rid) = resolved {
            self.expect_resolved_mut(rid).delayed = Some(id);
        }
        self.delayed.insert(key, id);
        tracing::trace!(class = self.interner.class_str(key), "created delayed placeholder");
        id
    }

    /// Look a name up across the three resolved tables.
    fn lookup_resolved(&self, key: ClassName) -> Option<ClassId> {
        self.essential
            .get(&key)
            .or_else(|| self.annotated.get(&key))
            .or_else(|| self.swappable.get(&key))
            .copied()
    }

    /// Resolve a name directly to its resolved record, if one is currently
    /// stored. Does not scan and does not create placeholders.
    pub fn lookup_resolved_name(&mut self, name: &str) -> Option<ClassId> {
        let key = self.interner.intern_class(name);
        self.lookup_resolved(key)
    }

    /// The resolved (or primitive) record backing `id`, forcing resolution
    /// of a delayed placeholder if needed. Accessing a swappable entry
    /// promotes it to most recently used.
    pub fn resolved_id(&mut self, id: ClassId) -> Result<ClassId> {
        enum Pending {
            Ready(ClassId),
            Force {
                key: ClassName,
                artificial: bool,
            },
        }

        let pending = match self.record(id) {
            ClassRecord::Primitive(_) => return Ok(id),
            ClassRecord::Resolved(_) => Pending::Ready(id),
            ClassRecord::Delayed(delayed) => match delayed.resolved {
                Some(rid) => Pending::Ready(rid),
                None => Pending::Force {
                    key: delayed.name,
                    artificial: delayed.artificial,
                },
            },
        };

        match pending {
            Pending::Ready(rid) => {
                self.lru.promote(rid);
                Ok(rid)
            }
            Pending::Force { key, artificial } => self.force_resolve(id, key, artificial),
        }
    }

    /// Resolve a delayed placeholder whose back-link is absent: either find
    /// an entry another (reentrant) resolution already stored, re-synthesize
    /// a permanently-artificial descriptor, or scan.
    fn force_resolve(&mut self, id: ClassId, key: ClassName, artificial: bool) -> Result<ClassId> {
        // A nested resolution during an enclosing scan may have stored this
        // class since the placeholder was created.
        if let Some(rid) = self.lookup_resolved(key) {
            self.link_delayed(id, rid);
            self.lru.promote(rid);
            return Ok(rid);
        }

        if artificial {
            // Resolution already failed definitively once; do not scan again.
            let rid = self.synthesize_artificial(key);
            self.link_delayed(id, rid);
            return Ok(rid);
        }

        let name = self.interner.class_str(key).to_owned();
        match self.scan(&name)? {
            Some(rid) => {
                self.link_delayed(id, rid);
                Ok(rid)
            }
            None => {
                let rid = self.synthesize_artificial(key);
                if let ClassRecord::Delayed(delayed) = self.record_mut(id) {
                    delayed.artificial = true;
                }
                self.link_delayed(id, rid);
                Ok(rid)
            }
        }
    }

    fn link_delayed(&mut self, delayed_id: ClassId, resolved_id: ClassId) {
        if let ClassRecord::Delayed(delayed) = self.record_mut(delayed_id) {
            delayed.resolved = Some(resolved_id);
        }
        if let ClassRecord::Resolved(resolved) = self.record_mut(resolved_id) {
            resolved.delayed = Some(delayed_id);
        }
    }

    /// One scan attempt: open the stream, parse, close the stream (always,
    /// even when parsing fails), then ingest. `Ok(None)` means no resource
    /// exists for the name.
    fn scan(&mut self, name: &str) -> Result<Option<ClassId>> {
        let resource = self.source.resource_name(name);

        let opened_at = Instant::now();
        let stream = self.source.open_stream(name, &resource)?;
        self.stats.stream_time += opened_at.elapsed();

        let Some(mut stream) = stream else {
            tracing::debug!(class = name, resource = %resource, "class resource not found");
            return Ok(None);
        };

        self.stats.scans += 1;
        let mut builder = ClassDataBuilder::new(name);
        let parse_started = Instant::now();
        let parse_result = self.parser.parse(name, &mut *stream, &mut builder);
        self.stats.scan_time += parse_started.elapsed();

        let close_started = Instant::now();
        let close_result = self.source.close_stream(name, &resource, stream);
        self.stats.stream_time += close_started.elapsed();

        match (parse_result, close_result) {
            (Ok(()), Ok(())) => {}
            (Ok(()), Err(close_err)) => return Err(close_err),
            (Err(parse_err), Ok(())) => return Err(parse_err),
            (Err(parse_err), Err(close_err)) => {
                tracing::warn!(
                    class = name,
                    error = %close_err,
                    "failed to close class resource after a scan failure"
                );
                return Err(parse_err);
            }
        }

        let scanned = builder.finish()?;
        Ok(Some(self.ingest(scanned)))
    }

    // ---- ingestion and storage -----------------------------------------

    /// Intern and store one completed scan's data. When a duplicate
    /// definition for the name already exists (the same class reachable
    /// through two roots), the first definition wins.
    fn ingest(&mut self, scanned: ScannedClass) -> ClassId {
        let ScannedClass {
            class,
            class_annotations,
            fields,
            methods,
        } = scanned;

        let key = self.interner.intern_class(&class.name);
        if let Some(existing) = self.lookup_resolved(key) {
            tracing::warn!(class = %class.name, "duplicate class scan; keeping the first definition");
            return existing;
        }

        let package = self.intern_package_of(&class.name);
        let superclass = match &class.superclass {
            Some(superclass) => Some(self.resolve_class(superclass)),
            None => {
                if class.name != ROOT_CLASS_NAME && class.modifiers & ACC_INTERFACE == 0 {
                    tracing::warn!(
                        class = %class.name,
                        "class has no superclass but is not the root type or an interface"
                    );
                }
                None
            }
        };
        let interfaces = class
            .interfaces
            .iter()
            .map(|name| self.resolve_class(name))
            .collect();

        let class_target = AnnotationTarget::Class(key);
        let annotations = class_annotations
            .iter()
            .map(|raw| self.intern_annotation(raw, Some(class_target)))
            .collect();

        let fields = fields
            .into_iter()
            .map(|field| self.ingest_field(key, field))
            .collect();

        let mut constructors = Vec::new();
        let mut plain_methods = Vec::new();
        for method in methods {
            let is_constructor = method.raw.name == "<init>";
            let info = self.ingest_method(key, method);
            if is_constructor {
                constructors.push(info);
            } else {
                plain_methods.push(info);
            }
        }

        let resolved = ResolvedClass {
            name: key,
            package,
            modifiers: class.modifiers,
            superclass,
            interfaces,
            fields,
            constructors,
            methods: plain_methods,
            annotations,
            is_runtime_essential: false, // normalized by insert_new
            is_artificial: false,
            delayed: None,
            effective_annotations: None,
        };
        self.insert_new(resolved)
    }

    fn ingest_field(&mut self, class: ClassName, field: ScannedField) -> FieldInfo {
        let ScannedField { raw, annotations } = field;
        let name = self.interner.intern_field(&raw.name);
        let target = AnnotationTarget::Field { class, field: name };
        let annotations = annotations
            .iter()
            .map(|a| self.intern_annotation(a, Some(target)))
            .collect();
        FieldInfo {
            name,
            modifiers: raw.modifiers,
            descriptor: self.interner.intern_description(&raw.descriptor),
            ty: self.ingest_type(&raw.ty),
            annotations,
        }
    }

    fn ingest_method(&mut self, class: ClassName, method: ScannedMethod) -> MethodInfo {
        let ScannedMethod {
            raw,
            annotations,
            parameter_annotations,
            default_value,
        } = method;
        let name = self.interner.intern_method(&raw.name);
        let target = AnnotationTarget::Method {
            class,
            method: name,
        };
        let annotations = annotations
            .iter()
            .map(|a| self.intern_annotation(a, Some(target)))
            .collect();
        let parameter_annotations = parameter_annotations
            .iter()
            .enumerate()
            .map(|(index, slot)| {
                let target = AnnotationTarget::Parameter {
                    class,
                    method: name,
                    index: index as u8,
                };
                slot.iter()
                    .map(|a| self.intern_annotation(a, Some(target)))
                    .collect()
            })
            .collect();
        MethodInfo {
            name,
            modifiers: raw.modifiers,
            descriptor: self.interner.intern_description(&raw.descriptor),
            parameters: raw.parameters.iter().map(|ty| self.ingest_type(ty)).collect(),
            return_type: self.ingest_type(&raw.return_type),
            exceptions: raw
                .exceptions
                .iter()
                .map(|name| self.resolve_class(name))
                .collect(),
            annotations,
            parameter_annotations,
            default_value: default_value.map(|value| self.intern_annotation_value(&value)),
        }
    }

    fn ingest_type(&mut self, raw: &RawType) -> TypeRef {
        self.resolve_type(&raw.element, raw.dims)
    }

    fn intern_annotation(
        &mut self,
        raw: &RawAnnotation,
        declared_on: Option<AnnotationTarget>,
    ) -> AnnotationOccurrence {
        let class_name = self.interner.intern_class(&raw.class_name);
        let elements = raw
            .elements
            .iter()
            .map(|(name, value)| {
                let name = self.interner.intern_method(name);
                (name, self.intern_annotation_value(value))
            })
            .collect();
        AnnotationOccurrence {
            class_name,
            elements,
            declared_on,
            found_on: declared_on.map(AnnotationTarget::class),
        }
    }

    fn intern_annotation_value(&mut self, raw: &RawAnnotationValue) -> AnnotationValue {
        match raw {
            RawAnnotationValue::Const(value) => AnnotationValue::Const(value.clone()),
            RawAnnotationValue::Class(name) => {
                AnnotationValue::Class(self.interner.intern_class(name))
            }
            RawAnnotationValue::Enum { class, literal } => AnnotationValue::Enum {
                class: self.interner.intern_class(class),
                literal: self.interner.intern_field(literal),
            },
            // Child annotations are value-less context: no declaring target.
            RawAnnotationValue::Nested(child) => {
                AnnotationValue::Nested(Box::new(self.intern_annotation(child, None)))
            }
            RawAnnotationValue::Array(values) => AnnotationValue::Array(
                values
                    .iter()
                    .map(|value| self.intern_annotation_value(value))
                    .collect(),
            ),
        }
    }

    fn intern_package_of(&mut self, class_name: &str) -> Option<PackageName> {
        class_name
            .rsplit_once('/')
            .map(|(package, _)| self.interner.intern_package(package))
    }

    /// Store a newly built resolved descriptor. Returns `false` (and keeps
    /// the existing entry) when the name is already resolved anywhere: a
    /// benign duplicate-definition anomaly.
    pub fn insert_resolved(&mut self, resolved: ResolvedClass) -> bool {
        if self.lookup_resolved(resolved.name).is_some() {
            tracing::warn!(
                class = self.interner.class_str(resolved.name),
                "duplicate class definition ignored"
            );
            return false;
        }
        self.insert_new(resolved);
        true
    }

    /// Table routing: runtime-essential namespaces first, then
    /// annotation-bearing classes, then the bounded swappable table.
    fn insert_new(&mut self, mut resolved: ResolvedClass) -> ClassId {
        let key = resolved.name;
        resolved.is_runtime_essential =
            is_runtime_essential_name(self.interner.class_str(key));
        let essential = resolved.is_runtime_essential;
        let exempt_annotated = resolved.carries_any_annotation();

        let id = self.alloc(ClassRecord::Resolved(resolved));
        if let Some(&delayed_id) = self.delayed.get(&key) {
            self.link_delayed(delayed_id, id);
        }

        let table = if essential {
            self.essential.insert(key, id);
            "essential"
        } else if exempt_annotated {
            self.annotated.insert(key, id);
            "annotated"
        } else {
            self.swappable.insert(key, id);
            self.lru.link_most_recent(id);
            if self.swappable.len() > self.swap_capacity {
                self.evict_least_recent();
            }
            "swappable"
        };
        tracing::debug!(
            class = self.interner.class_str(key),
            table,
            "stored resolved class"
        );
        id
    }

    fn evict_least_recent(&mut self) {
        let Some(victim) = self.lru.least_recent() else {
            return;
        };
        self.lru.unlink(victim);
        let (key, delayed_link) = {
            let resolved = self.expect_resolved(victim);
            (resolved.name, resolved.delayed)
        };
        self.swappable.remove(&key);
        // Sever the placeholder link: the placeholder reverts to
        // "re-resolve on next use". The evicted record is never revived.
        if let Some(delayed_id) = delayed_link {
            if let ClassRecord::Delayed(delayed) = self.record_mut(delayed_id) {
                delayed.resolved = None;
            }
        }
        self.expect_resolved_mut(victim).delayed = None;
        self.stats.evictions += 1;
        tracing::debug!(
            class = self.interner.class_str(key),
            "evicted least recently used class"
        );
    }

    /// Synthesize the minimal stand-in for a class whose bytes could not be
    /// found: public, non-interface, superclass is the root type, nothing
    /// else. Stored through the normal insertion policy so repeated lookups
    /// do not re-scan.
    fn synthesize_artificial(&mut self, key: ClassName) -> ClassId {
        let name = self.interner.class_str(key).to_owned();
        tracing::debug!(class = %name, "synthesizing artificial class");
        let superclass = if name == ROOT_CLASS_NAME {
            None
        } else {
            Some(self.resolve_class(ROOT_CLASS_NAME))
        };
        let package = self.intern_package_of(&name);
        let mut resolved = ResolvedClass::new(key, package, ACC_PUBLIC | ACC_SUPER);
        resolved.superclass = superclass;
        resolved.is_artificial = true;
        self.stats.artificial += 1;
        self.insert_new(resolved)
    }

    // ---- detail accessors ----------------------------------------------

    pub fn modifiers(&mut self, id: ClassId) -> Result<u16> {
        if let ClassRecord::Primitive(_) = self.record(id) {
            return Ok(ACC_PUBLIC | ACC_FINAL);
        }
        let rid = self.resolved_id(id)?;
        Ok(self.expect_resolved(rid).modifiers)
    }

    pub fn is_interface(&mut self, id: ClassId) -> Result<bool> {
        Ok(self.modifiers(id)? & ACC_INTERFACE != 0)
    }

    pub fn is_annotation_class(&mut self, id: ClassId) -> Result<bool> {
        if self.is_primitive(id) {
            return Ok(false);
        }
        let rid = self.resolved_id(id)?;
        Ok(self.expect_resolved(rid).is_annotation())
    }

    pub fn is_artificial(&mut self, id: ClassId) -> Result<bool> {
        if self.is_primitive(id) {
            return Ok(false);
        }
        let rid = self.resolved_id(id)?;
        Ok(self.expect_resolved(rid).is_artificial)
    }

    pub fn package(&mut self, id: ClassId) -> Result<Option<PackageName>> {
        if self.is_primitive(id) {
            return Ok(None);
        }
        let rid = self.resolved_id(id)?;
        Ok(self.expect_resolved(rid).package)
    }

    pub fn superclass(&mut self, id: ClassId) -> Result<Option<ClassId>> {
        if self.is_primitive(id) {
            return Ok(None);
        }
        let rid = self.resolved_id(id)?;
        Ok(self.expect_resolved(rid).superclass)
    }

    pub fn interfaces(&mut self, id: ClassId) -> Result<&[ClassId]> {
        if self.is_primitive(id) {
            return Ok(&[]);
        }
        let rid = self.resolved_id(id)?;
        Ok(&self.expect_resolved(rid).interfaces)
    }

    pub fn fields(&mut self, id: ClassId) -> Result<&[FieldInfo]> {
        if self.is_primitive(id) {
            return Ok(&[]);
        }
        let rid = self.resolved_id(id)?;
        let empty = self.expect_resolved(rid).fields.is_empty();
        if rid != id {
            if let ClassRecord::Delayed(delayed) = self.record_mut(id) {
                delayed.fields_known_empty = Some(empty);
            }
        }
        Ok(&self.expect_resolved(rid).fields)
    }

    /// Emptiness check that reuses the placeholder's memo: once the field
    /// list is known empty, later checks skip re-resolution entirely (even
    /// after the resolved side was evicted).
    pub fn fields_is_empty(&mut self, id: ClassId) -> Result<bool> {
        if let ClassRecord::Delayed(delayed) = self.record(id) {
            if delayed.resolved.is_none() {
                if let Some(empty) = delayed.fields_known_empty {
                    return Ok(empty);
                }
            }
        }
        Ok(self.fields(id)?.is_empty())
    }

    pub fn constructors(&mut self, id: ClassId) -> Result<&[MethodInfo]> {
        if self.is_primitive(id) {
            return Ok(&[]);
        }
        let rid = self.resolved_id(id)?;
        Ok(&self.expect_resolved(rid).constructors)
    }

    pub fn methods(&mut self, id: ClassId) -> Result<&[MethodInfo]> {
        if self.is_primitive(id) {
            return Ok(&[]);
        }
        let rid = self.resolved_id(id)?;
        let empty = self.expect_resolved(rid).methods.is_empty();
        if rid != id {
            if let ClassRecord::Delayed(delayed) = self.record_mut(id) {
                delayed.methods_known_empty = Some(empty);
            }
        }
        Ok(&self.expect_resolved(rid).methods)
    }

    pub fn methods_is_empty(&mut self, id: ClassId) -> Result<bool> {
        if let ClassRecord::Delayed(delayed) = self.record(id) {
            if delayed.resolved.is_none() {
                if let Some(empty) = delayed.methods_known_empty {
                    return Ok(empty);
                }
            }
        }
        Ok(self.methods(id)?.is_empty())
    }

    pub fn declared_annotations(&mut self, id: ClassId) -> Result<&[AnnotationOccurrence]> {
        if self.is_primitive(id) {
            return Ok(&[]);
        }
        let rid = self.resolved_id(id)?;
        Ok(&self.expect_resolved(rid).annotations)
    }

    /// Record an annotation discovered after the class was stored. A class
    /// gaining its first annotation while in the swappable table is promoted
    /// into the annotated (exempt) table; there is no demotion path.
    /// Primitive ids are ignored: primitives carry no annotations.
    pub fn add_class_annotation(
        &mut self,
        id: ClassId,
        mut annotation: AnnotationOccurrence,
    ) -> Result<()> {
        if self.is_primitive(id) {
            tracing::warn!(ty = self.class_name(id), "ignoring annotation on a primitive type");
            return Ok(());
        }
        let rid = self.resolved_id(id)?;
        let key = self.expect_resolved(rid).name;
        if annotation.declared_on.is_none() {
            annotation.declared_on = Some(AnnotationTarget::Class(key));
        }
        if annotation.found_on.is_none() {
            annotation.found_on = Some(key);
        }
        {
            let resolved = self.expect_resolved_mut(rid);
            resolved.annotations.push(annotation);
            resolved.effective_annotations = None;
        }
        if self.swappable.remove(&key).is_some() {
            self.lru.unlink(rid);
            self.annotated.insert(key, rid);
            tracing::debug!(
                class = self.interner.class_str(key),
                "promoted newly annotated class out of the swappable table"
            );
        }
        Ok(())
    }

    // ---- source lifecycle (store façade) -------------------------------

    pub(crate) fn source_open(&mut self) -> Result<()> {
        self.source.open()
    }

    pub(crate) fn source_close(&mut self) -> Result<()> {
        self.source.close()
    }
}
