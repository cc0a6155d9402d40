use std::collections::HashMap;

use crate::errors::errors::ErrorImpl;

use super::value::Value;

#[derive(Debug)]
struct Frame {
    label: String,
    variables: HashMap<String, Value>,
}

impl Frame {
    fn new(label: &str) -> Self {
        Frame {
            label: label.to_string(),
            variables: HashMap::new(),
        }
    }
}

/// Live variable bindings, one frame per active `if`/`while`/`for` body.
///
/// Binding a name that is visible in any frame updates it where it lives,
/// so a loop body can change an outer variable and the change survives the
/// loop. Only names that are new go into the innermost frame, and they are
/// dropped with it.
#[derive(Debug)]
pub struct MemoryStack {
    frames: Vec<Frame>,
}

impl Default for MemoryStack {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStack {
    pub fn new() -> Self {
        MemoryStack {
            frames: vec![Frame::new("global")],
        }
    }

    pub fn enter(&mut self, label: &str) {
        tracing::trace!(label, depth = self.frames.len() + 1, "enter scope");
        self.frames.push(Frame::new(label));
    }

    /// Leaves the innermost frame. The global frame is never left.
    pub fn exit(&mut self) -> Option<String> {
        if self.frames.len() == 1 {
            return None;
        }
        let frame = self.frames.pop()?;
        tracing::trace!(label = %frame.label, "exit scope");
        Some(frame.label)
    }

    pub fn bind(&mut self, name: &str, value: Value) {
        if let Some(slot) = self.get_mut(name) {
            *slot = value;
            return;
        }
        if let Some(frame) = self.frames.last_mut() {
            frame.variables.insert(name.to_string(), value);
        }
    }

    pub fn read(&self, name: &str) -> Result<&Value, ErrorImpl> {
        self.frames
            .iter()
            .rev()
            .find_map(|frame| frame.variables.get(name))
            .ok_or_else(|| ErrorImpl::UndefinedVariable {
                variable: name.to_string(),
            })
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.frames
            .iter_mut()
            .rev()
            .find_map(|frame| frame.variables.get_mut(name))
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }
}
