//! Prototype delegation.
//!
//! A [`Prototype`] owns a set of named members and optionally delegates
//! lookups it cannot answer to a parent. [`inherit`] re-parents a prototype in
//! place, [`create_child`] builds a re-parented copy and leaves the original
//! alone.
//!
//! ```
//! use std::sync::Arc;
//! use filth_rust::{create_child, Function, Prototype, Value};
//!
//! let mut animal = Prototype::new();
//! animal.define("legs", Value::from(4));
//! animal.define("speak", Function::new(|_| Value::from("...")).into());
//! let animal = Arc::new(animal);
//!
//! let mut dog = Prototype::new();
//! dog.define("speak", Function::new(|_| Value::from("woof")).into());
//! let dog = create_child(&dog, &animal);
//!
//! assert_eq!(dog.call("speak", &[]).and_then(|v| v.as_str().map(String::from)), Some("woof".into()));
//! assert_eq!(dog.get("legs").and_then(Value::as_f64), Some(4.0));
//! ```

use std::sync::Arc;

use crate::value::{Map, Value};

#[derive(Debug, Clone, Default)]
pub struct Prototype {
    members: Map,
    parent: Option<Arc<Prototype>>,
}

impl Prototype {
    pub fn new() -> Self {
        Self::default()
    }

    /// A root prototype holding a shallow copy of `members`.
    pub fn with_members(members: &Map) -> Self {
        Prototype {
            members: members.clone(),
            parent: None,
        }
    }

    pub fn define(&mut self, name: impl Into<String>, value: Value) -> Option<Value> {
        self.members.insert(name.into(), value)
    }

    /// Look up `name` on this prototype, then along the parent chain.
    pub fn get(&self, name: &str) -> Option<&Value> {
        let mut current = Some(self);
        while let Some(proto) = current {
            if let Some(value) = proto.members.get(name) {
                return Some(value);
            }
            current = proto.parent.as_deref();
        }
        None
    }

    /// Look up `name` without consulting the parent chain.
    pub fn get_own(&self, name: &str) -> Option<&Value> {
        self.members.get(name)
    }

    pub fn own_keys(&self) -> impl Iterator<Item = &str> {
        self.members.keys().map(String::as_str)
    }

    pub fn parent(&self) -> Option<&Arc<Prototype>> {
        self.parent.as_ref()
    }

    /// Call the function member `name` found through [`get`](Self::get).
    ///
    /// Returns `None` if there is no such member or it is not a function.
    pub fn call(&self, name: &str, args: &[Value]) -> Option<Value> {
        match self.get(name)? {
            Value::Function(f) => Some(f.call(args)),
            _ => None,
        }
    }

    /// Whether `ancestor` appears anywhere on this prototype's parent chain.
    pub fn inherits_from(&self, ancestor: &Arc<Prototype>) -> bool {
        let mut current = self.parent.as_ref();
        while let Some(parent) = current {
            if Arc::ptr_eq(parent, ancestor) {
                return true;
            }
            current = parent.parent.as_ref();
        }
        false
    }
}

/// Re-parent `child` onto `parent`, keeping the child's own members.
///
/// The child's previous parent chain is replaced.
pub fn inherit(child: &mut Prototype, parent: &Arc<Prototype>) {
    child.parent = Some(Arc::clone(parent));
}

/// Build a new prototype with `child`'s own members that delegates to
/// `parent`. `child` is not modified.
pub fn create_child(child: &Prototype, parent: &Arc<Prototype>) -> Prototype {
    Prototype {
        members: child.members.clone(),
        parent: Some(Arc::clone(parent)),
    }
}
