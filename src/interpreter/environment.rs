use crate::value::Value;
use indexmap::IndexMap;

/// Represents a single scope level in the environment.
type Scope = IndexMap<String, Value>;

/// Environment manages variable scopes with push/pop semantics.
///
/// Scope `i + 1` encloses into scope `i`; scope 0 is the global scope and is
/// never popped.
#[derive(Debug, Clone)]
pub struct Environment {
    scopes: Vec<Scope>,
}

impl Environment {
    pub fn new() -> Self {
        let mut scopes = Vec::with_capacity(8);
        scopes.push(Scope::new());
        Self { scopes }
    }

    /// Push a new scope onto the stack when entering a block.
    pub fn push_scope(&mut self) {
        self.scopes.push(Scope::new());
    }

    /// Pop the current scope when leaving a block.
    pub fn pop_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    /// Bind a variable in the current (innermost) scope, replacing any binding
    /// of the same name in that scope.
    pub fn define(&mut self, name: impl Into<String>, value: Value) {
        if let Some(current_scope) = self.scopes.last_mut() {
            current_scope.insert(name.into(), value);
        }
    }

    /// Get a variable, searching from innermost to outermost scope.
    pub fn get(&self, name: &str) -> Option<Value> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.get(name))
            .cloned()
    }

    /// Update an existing variable in the innermost scope that defines it.
    /// Returns false, changing nothing, if no scope does.
    pub fn assign(&mut self, name: &str, value: Value) -> bool {
        match self
            .scopes
            .iter_mut()
            .rev()
            .find_map(|scope| scope.get_mut(name))
        {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    /// Returns the number of scopes, the global scope included.
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// All visible bindings, inner scopes taking precedence over outer ones.
    pub fn bindings(&self) -> Vec<(String, Value)> {
        let mut result = IndexMap::new();
        for scope in &self.scopes {
            for (name, value) in scope {
                result.insert(name.clone(), value.clone());
            }
        }
        result.into_iter().collect()
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_define_get() {
        let mut env = Environment::new();
        env.define("x", Value::Number(42.0));
        assert_eq!(env.get("x"), Some(Value::Number(42.0)));
        assert_eq!(env.get("y"), None);
    }

    #[test]
    fn test_redefine_replaces() {
        let mut env = Environment::new();
        env.define("x", Value::Number(1.0));
        env.define("x", Value::string("one"));
        assert_eq!(env.get("x"), Some(Value::string("one")));
        assert_eq!(env.bindings().len(), 1);
    }

    #[test]
    fn test_scope_push_pop() {
        let mut env = Environment::new();
        env.define("x", Value::Number(1.0));

        env.push_scope();
        env.define("x", Value::Number(2.0));
        assert_eq!(env.get("x"), Some(Value::Number(2.0)));
        assert_eq!(env.depth(), 2);

        env.pop_scope();
        assert_eq!(env.get("x"), Some(Value::Number(1.0)));
    }

    #[test]
    fn test_global_scope_is_never_popped() {
        let mut env = Environment::new();
        env.define("x", Value::Bool(true));
        env.pop_scope();
        env.pop_scope();
        assert_eq!(env.depth(), 1);
        assert_eq!(env.get("x"), Some(Value::Bool(true)));
    }

    #[test]
    fn test_assign_in_outer_scope() {
        let mut env = Environment::new();
        env.define("x", Value::Number(1.0));

        env.push_scope();
        assert!(env.assign("x", Value::Number(2.0)));
        assert_eq!(env.bindings(), vec![("x".to_string(), Value::Number(2.0))]);

        env.pop_scope();
        assert_eq!(env.get("x"), Some(Value::Number(2.0)));
    }

    #[test]
    fn test_assign_hits_innermost_shadow() {
        let mut env = Environment::new();
        env.define("x", Value::Number(1.0));
        env.push_scope();
        env.define("x", Value::Number(10.0));
        assert!(env.assign("x", Value::Number(20.0)));
        env.pop_scope();
        assert_eq!(env.get("x"), Some(Value::Number(1.0)));
    }

    #[test]
    fn test_assign_undefined_creates_nothing() {
        let mut env = Environment::new();
        assert!(!env.assign("ghost", Value::Nil));
        assert_eq!(env.get("ghost"), None);
        assert!(env.bindings().is_empty());
    }
}
