use std::fmt;
use std::sync::Arc;

use crate::Value;

pub type NativeFn = Arc<dyn Fn(&[Value]) -> Value + Send + Sync>;

/// Callable value. Equality is identity: clones of one function compare equal,
/// two closures with the same body do not.
#[derive(Clone)]
pub struct Function {
    name: Option<Arc<str>>,
    body: NativeFn,
}

impl Function {
    pub fn new(name: &str, body: impl Fn(&[Value]) -> Value + Send + Sync + 'static) -> Self {
        Self {
            name: Some(Arc::from(name)),
            body: Arc::new(body),
        }
    }

    pub fn anonymous(body: impl Fn(&[Value]) -> Value + Send + Sync + 'static) -> Self {
        Self {
            name: None,
            body: Arc::new(body),
        }
    }

    /// A function that ignores its arguments and returns `undefined`.
    pub fn noop(name: &str) -> Self {
        Self::new(name, |_| Value::Undefined)
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn call(&self, args: &[Value]) -> Value {
        (self.body)(args)
    }

    pub fn ptr_eq(&self, other: &Function) -> bool {
        Arc::ptr_eq(&self.body, &other.body)
    }
}

impl PartialEq for Function {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "function {}() {{ [native code] }}",
            self.name.as_deref().unwrap_or("")
        )
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "[Function: {name}]"),
            None => f.write_str("[Function (anonymous)]"),
        }
    }
}
