//! Annotation inheritance along the superclass chain.
//!
//! A class annotation propagates to subclasses only when its annotation
//! type is itself marked `@Inherited`, and only through superclasses:
//! interface annotations never propagate. A declared annotation shadows an
//! inherited occurrence of the same type.

use crate::annotation::AnnotationOccurrence;
use crate::cache::ClassInfoCache;
use crate::descriptor::ClassId;
use crate::error::Result;

use anvil_core::ClassName;

/// Marker annotation type that makes a class annotation heritable.
pub const INHERITED_ANNOTATION_CLASS: &str = "java/lang/annotation/Inherited";

impl ClassInfoCache {
    /// The class's complete annotation set: declared occurrences plus any
    /// heritable occurrences from the superclass chain.
    ///
    /// Results are memoized per resolved descriptor, but only when
    /// inheritance actually contributed something: the common case of "no
    /// superclass annotations are heritable" answers with the declared
    /// slice and allocates nothing.
    pub fn effective_class_annotations(&mut self, id: ClassId) -> Result<&[AnnotationOccurrence]> {
        if self.is_primitive(id) {
            return Ok(&[]);
        }
        let rid = self.resolved_id(id)?;
        let mut visiting = Vec::new();
        self.compute_effective(rid, &mut visiting)?;
        let resolved = self.expect_resolved(rid);
        match &resolved.effective_annotations {
            Some(effective) => Ok(effective),
            None => Ok(&resolved.annotations),
        }
    }

    /// Populate the memo for `rid` if inheritance applies. `visiting` holds
    /// the superclass chain currently being walked; a name already on it
    /// means the hierarchy is cyclic, and the walk stops there rather than
    /// recursing forever.
    fn compute_effective(&mut self, rid: ClassId, visiting: &mut Vec<ClassId>) -> Result<()> {
        {
            let resolved = self.expect_resolved(rid);
            if resolved.effective_annotations.is_some() {
                return Ok(());
            }
            if resolved.superclass.is_none() {
                return Ok(());
            }
        }
        if visiting.contains(&rid) {
            tracing::warn!(
                class = self.class_name(rid),
                "cycle in superclass chain during annotation inheritance"
            );
            return Ok(());
        }
        visiting.push(rid);
        let result = self.compute_effective_with_super(rid, visiting);
        visiting.pop();
        result
    }

    fn compute_effective_with_super(
        &mut self,
        rid: ClassId,
        visiting: &mut Vec<ClassId>,
    ) -> Result<()> {
        let super_id = match self.expect_resolved(rid).superclass {
            Some(super_id) => super_id,
            None => return Ok(()),
        };
        let super_rid = self.resolved_id(super_id)?;
        if super_rid == rid {
            return Ok(());
        }
        self.compute_effective(super_rid, visiting)?;

        let super_set: Vec<AnnotationOccurrence> = {
            let superclass = self.expect_resolved(super_rid);
            match &superclass.effective_annotations {
                Some(effective) => effective.clone(),
                None => superclass.annotations.clone(),
            }
        };

        let my_name = self.expect_resolved(rid).name;
        let mut inherited = Vec::new();
        for occurrence in &super_set {
            if self.annotation_is_inheritable(occurrence.class_name)? {
                inherited.push(occurrence.inherited_onto(my_name));
            }
        }
        if inherited.is_empty() {
            // Declared annotations already answer for this class; skip the
            // memo so the unchanged slice is served directly.
            return Ok(());
        }

        let resolved = self.expect_resolved(rid);
        let mut effective: Vec<AnnotationOccurrence> = resolved.annotations.clone();
        for occurrence in inherited {
            let shadowed = effective
                .iter()
                .any(|declared| declared.class_name == occurrence.class_name);
            if !shadowed {
                effective.push(occurrence);
            }
        }
        self.expect_resolved_mut(rid).effective_annotations = Some(effective);
        Ok(())
    }

    /// Whether an annotation type propagates to subclasses. The test is on
    /// the annotation class's own declared annotations; artificial stand-ins
    /// never qualify.
    fn annotation_is_inheritable(&mut self, annotation_class: ClassName) -> Result<bool> {
        let inherited_key = self.interner.intern_class(INHERITED_ANNOTATION_CLASS);
        let id = self.resolve_class_interned(annotation_class);
        let rid = self.resolved_id(id)?;
        let resolved = self.expect_resolved(rid);
        if resolved.is_artificial {
            return Ok(false);
        }
        Ok(resolved
            .annotations
            .iter()
            .any(|occurrence| occurrence.class_name == inherited_key))
    }
}
