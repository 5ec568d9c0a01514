//! Deferred work of a selection swap
//!
//! A swap runs in ordered phases instead of on timers:
//!
//! 1. synchronously: the editable shape is installed and the static shape retired;
//! 2. [`TaskPhase::EndOfTask`]: the retired static shape is removed, then `select` is
//!    emitted, so listeners never observe two shapes for one annotation;
//! 3. [`TaskPhase::Settle`]: pointer listeners are attached to the editable shape, so the
//!    creation of the shape is never taken for a hover.
//!
//! Tasks of a phase run in scheduling order.

use std::collections::VecDeque;

use crate::annotation::{Annotation, AnnotationId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskPhase {
    EndOfTask,
    Settle,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Deferred {
    /// Drop the retired static shape of an annotation from the surface
    RemoveStatic(AnnotationId),
    /// Emit `select` for the annotation being edited
    EmitSelect(Annotation),
    /// Attach pointer listeners to the editable shape of an annotation
    AttachListeners(AnnotationId),
}

impl Deferred {
    fn annotation_id(&self) -> &AnnotationId {
        match self {
            Deferred::RemoveStatic(id) | Deferred::AttachListeners(id) => id,
            Deferred::EmitSelect(annotation) => annotation.id(),
        }
    }
}

#[derive(Debug, Default)]
pub struct TaskQueue {
    end_of_task: VecDeque<Deferred>,
    settle: VecDeque<Deferred>,
}

impl TaskQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, phase: TaskPhase, task: Deferred) {
        self.queue_mut(phase).push_back(task);
    }

    pub fn pop(&mut self, phase: TaskPhase) -> Option<Deferred> {
        self.queue_mut(phase).pop_front()
    }

    /// Drop pending work of a phase that targets `id`
    pub fn cancel(&mut self, phase: TaskPhase, id: &AnnotationId) -> usize {
        let queue = self.queue_mut(phase);
        let before = queue.len();
        queue.retain(|task| task.annotation_id() != id);
        before - queue.len()
    }

    pub fn pending(&self, phase: TaskPhase) -> usize {
        match phase {
            TaskPhase::EndOfTask => self.end_of_task.len(),
            TaskPhase::Settle => self.settle.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.end_of_task.is_empty() && self.settle.is_empty()
    }

    fn queue_mut(&mut self, phase: TaskPhase) -> &mut VecDeque<Deferred> {
        match phase {
            TaskPhase::EndOfTask => &mut self.end_of_task,
            TaskPhase::Settle => &mut self.settle,
        }
    }
}
