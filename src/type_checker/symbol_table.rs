use std::collections::HashMap;

use crate::ast::ast::ExprId;

#[derive(Debug)]
struct Scope {
    label: String,
    /// Names whose first declaration happened in this scope
    introduced: Vec<String>,
}

/// Static declarations, used only by the type checker.
///
/// A name maps to the expression that most recently produced its value;
/// that expression is already annotated, so its type and shape can be read
/// back from the side table.
///
/// Leaving a scope forgets the names first declared inside it. A name that
/// already existed outside keeps whatever binding the inner scope gave it,
/// which mirrors how the runtime scope stack updates outer variables.
#[derive(Debug)]
pub struct SymbolTable {
    symbols: HashMap<String, ExprId>,
    scopes: Vec<Scope>,
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolTable {
    pub fn new() -> Self {
        SymbolTable {
            symbols: HashMap::new(),
            scopes: vec![Scope {
                label: String::from("program"),
                introduced: vec![],
            }],
        }
    }

    pub fn declare(&mut self, name: &str, producer: ExprId) {
        if self.symbols.insert(name.to_string(), producer).is_none() {
            if let Some(scope) = self.scopes.last_mut() {
                scope.introduced.push(name.to_string());
            }
        }
    }

    pub fn lookup(&self, name: &str) -> Option<ExprId> {
        self.symbols.get(name).copied()
    }

    pub fn push_scope(&mut self, label: &str) {
        self.scopes.push(Scope {
            label: label.to_string(),
            introduced: vec![],
        });
    }

    /// Leaves the innermost scope and returns its label. The program scope
    /// is never popped.
    pub fn pop_scope(&mut self) -> Option<String> {
        if self.scopes.len() == 1 {
            return None;
        }

        let scope = self.scopes.pop()?;
        for name in &scope.introduced {
            self.symbols.remove(name);
        }
        Some(scope.label)
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }
}
