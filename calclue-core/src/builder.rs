//! Ordered collection of annotations handed to the host for rendering

use serde::Serialize;
use thiserror::Error;

use crate::model::Annotation;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AnnotationError {
    #[error("annotation at {from} added after one starting at {last}; starts must not decrease")]
    OutOfOrder { from: usize, last: usize },
}

/// Accepts annotations in non-decreasing `from` order
#[derive(Debug, Default)]
pub struct AnnotationSetBuilder {
    annotations: Vec<Annotation>,
}

impl AnnotationSetBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn try_add(&mut self, annotation: Annotation) -> Result<(), AnnotationError> {
        if let Some(last) = self.annotations.last() {
            if annotation.from() < last.from() {
                return Err(AnnotationError::OutOfOrder {
                    from: annotation.from(),
                    last: last.from(),
                });
            }
        }
        self.annotations.push(annotation);
        Ok(())
    }

    /// Like [`try_add`](Self::try_add), but an out-of-order annotation is
    /// logged and dropped so the rest of the set still renders.
    pub fn add(&mut self, annotation: Annotation) {
        if let Err(e) = self.try_add(annotation) {
            log::warn!("dropping annotation: {e}");
        }
    }

    pub fn len(&self) -> usize {
        self.annotations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }

    pub fn finish(self) -> AnnotationSet {
        AnnotationSet {
            annotations: self.annotations,
        }
    }
}

/// Immutable, ordered result of one scan
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AnnotationSet {
    annotations: Vec<Annotation>,
}

impl AnnotationSet {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.annotations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Annotation> {
        self.annotations.iter()
    }

    pub fn as_slice(&self) -> &[Annotation] {
        &self.annotations
    }

    /// Annotations starting inside `[from, to]`, for rendering a single line
    pub fn between(&self, from: usize, to: usize) -> impl Iterator<Item = &Annotation> {
        let start = self.annotations.partition_point(|a| a.from() < from);
        self.annotations[start..]
            .iter()
            .take_while(move |a| a.from() <= to)
    }
}

impl<'a> IntoIterator for &'a AnnotationSet {
    type Item = &'a Annotation;
    type IntoIter = std::slice::Iter<'a, Annotation>;

    fn into_iter(self) -> Self::IntoIter {
        self.annotations.iter()
    }
}
