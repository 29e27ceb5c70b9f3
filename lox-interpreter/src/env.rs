use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::value::Value;

/// One scope of bindings. Scopes are chained through `enclosing`, innermost first; a block's
/// scope is dropped as soon as the block finishes because nothing else keeps a handle to it.
#[derive(Debug, Default)]
pub(crate) struct Environment {
    enclosing: Option<Rc<RefCell<Environment>>>,
    values: HashMap<String, Value>,
}

#[derive(Debug, PartialEq)]
pub(crate) struct UndefinedVariable;

impl Environment {
    pub(crate) fn new() -> Self {
        Environment::default()
    }

    pub(crate) fn with(enclosing: Rc<RefCell<Environment>>) -> Self {
        Environment {
            enclosing: Some(enclosing),
            values: HashMap::new(),
        }
    }

    // Redefining a name in the same scope simply overwrites it
    pub(crate) fn define(&mut self, key: &str, value: Value) {
        self.values.insert(String::from(key), value);
    }

    pub(crate) fn get(&self, key: &str) -> Result<Value, UndefinedVariable> {
        if let Some(val) = self.values.get(key) {
            Ok(val.clone())
        } else if let Some(enclosing) = &self.enclosing {
            enclosing.borrow().get(key)
        } else {
            Err(UndefinedVariable)
        }
    }

    /// Overwrites the binding in the nearest scope that has one. Never creates a binding.
    pub(crate) fn assign(&mut self, key: &str, value: Value) -> Result<(), UndefinedVariable> {
        if let Some(val) = self.values.get_mut(key) {
            *val = value;
            Ok(())
        } else if let Some(enclosing) = &self.enclosing {
            enclosing.borrow_mut().assign(key, value)
        } else {
            Err(UndefinedVariable)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use crate::env::{Environment, UndefinedVariable};
    use crate::value::Value;

    #[test]
    fn test_define_and_get() {
        let mut env = Environment::new();
        env.define("foo", Value::from("bar"));
        env.define("baz", Value::from(false));

        assert_eq!(env.get("foo"), Ok(Value::from("bar")));
        assert_eq!(env.get("baz"), Ok(Value::from(false)));
    }

    #[test]
    fn test_redefine_overwrites() {
        let mut env = Environment::new();
        env.define("foo", Value::from(1));
        env.define("foo", Value::from(2));

        assert_eq!(env.get("foo"), Ok(Value::from(2)));
    }

    #[test]
    fn test_error_if_undefined() {
        let mut env = Environment::new();
        assert_eq!(
            Err(UndefinedVariable),
            env.assign("foo", Value::from("bar"))
        );
        assert_eq!(Err(UndefinedVariable), env.get("foo"));
    }

    #[test]
    fn test_multi_level() {
        let env1 = Rc::new(RefCell::new(Environment::new()));
        env1.borrow_mut().define("foo", Value::from("bar"));
        env1.borrow_mut().define("outer", Value::from(1));

        {
            let mut env2 = Environment::with(env1.clone());
            env2.define("foo", Value::from("foofoo"));
            assert_eq!(env2.get("foo"), Ok(Value::from("foofoo")));
            assert_eq!(env2.get("outer"), Ok(Value::from(1)));

            // shadowed name is assigned in the inner scope, the other one goes to the parent
            env2.assign("foo", Value::from(false)).unwrap();
            env2.assign("outer", Value::from(2)).unwrap();
            assert_eq!(env2.get("foo"), Ok(Value::from(false)));
        }

        assert_eq!(env1.borrow().get("foo"), Ok(Value::from("bar")));
        assert_eq!(env1.borrow().get("outer"), Ok(Value::from(2)));
    }

    #[test]
    fn test_assign_does_not_define() {
        let env1 = Rc::new(RefCell::new(Environment::new()));
        let mut env2 = Environment::with(env1.clone());

        assert_eq!(Err(UndefinedVariable), env2.assign("foo", Value::Nil));
        assert_eq!(Err(UndefinedVariable), env2.get("foo"));
        assert_eq!(Err(UndefinedVariable), env1.borrow().get("foo"));
    }
}
