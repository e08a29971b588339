use std::cell::RefCell;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::util;

/// AttributeValue is an enum representing possible values that can be stored
/// in a user attribute.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AttributeValue {
    /// Used when storing a string value.
    String(String),
    /// Used when storing an array of AttributeValues.
    Array(Vec<AttributeValue>),
    /// Used when storing a number.
    Number(f64),
    /// Used when storing a boolean.
    Bool(bool),
    /// Used to represent a null value.
    Null,
}

impl From<&str> for AttributeValue {
    fn from(s: &str) -> AttributeValue {
        AttributeValue::String(s.to_owned())
    }
}

impl From<String> for AttributeValue {
    fn from(s: String) -> AttributeValue {
        AttributeValue::String(s)
    }
}

impl From<bool> for AttributeValue {
    fn from(b: bool) -> AttributeValue {
        AttributeValue::Bool(b)
    }
}

impl From<i64> for AttributeValue {
    fn from(i: i64) -> Self {
        AttributeValue::Number(i as f64)
    }
}

impl From<f64> for AttributeValue {
    fn from(f: f64) -> Self {
        AttributeValue::Number(f)
    }
}

impl<T> From<Vec<T>> for AttributeValue
where
    AttributeValue: From<T>,
{
    fn from(v: Vec<T>) -> AttributeValue {
        v.into_iter().collect()
    }
}

impl<T> FromIterator<T> for AttributeValue
where
    AttributeValue: From<T>,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        AttributeValue::Array(iter.into_iter().map(AttributeValue::from).collect())
    }
}

impl AttributeValue {
    /// Returns None unless self is a String.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttributeValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Collects the string members of this value: a bare string counts as a
    /// single-element collection, an array contributes its string elements.
    /// Anything else yields an empty collection.
    pub fn string_values(&self) -> Vec<&str> {
        match self {
            AttributeValue::String(s) => vec![s.as_str()],
            AttributeValue::Array(values) => values.iter().filter_map(AttributeValue::as_str).collect(),
            _ => Vec::new(),
        }
    }
}

/// The identity and context against which feature activation is evaluated.
///
/// A user may be anonymous (no name); strategies treat a missing or blank
/// name as an unknown user and behave conservatively. Arbitrary context
/// travels in the attribute map, e.g. the roles granted by the security
/// layer under the `roles` attribute.
#[derive(Clone, Debug, PartialEq)]
pub struct FeatureUser {
    name: Option<String>,
    feature_admin: bool,
    attributes: HashMap<String, AttributeValue>,
}

impl FeatureUser {
    /// Creates a user with the given name.
    pub fn named(name: impl Into<String>) -> Self {
        FeatureUser {
            name: Some(name.into()),
            feature_admin: false,
            attributes: HashMap::new(),
        }
    }

    /// Creates a user without an identity.
    pub fn anonymous() -> Self {
        FeatureUser {
            name: None,
            feature_admin: false,
            attributes: HashMap::new(),
        }
    }

    /// Marks the user as a feature admin, i.e. allowed to modify feature
    /// state through an administrative surface.
    pub fn feature_admin(mut self, feature_admin: bool) -> Self {
        self.feature_admin = feature_admin;
        self
    }

    /// Attaches an attribute to the user.
    pub fn attribute(mut self, name: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// True when the user carries a usable (non-blank) name.
    pub fn has_name(&self) -> bool {
        matches!(self.name(), Some(name) if !util::is_blank(name))
    }

    pub fn is_feature_admin(&self) -> bool {
        self.feature_admin
    }

    pub fn get_attribute(&self, name: &str) -> Option<&AttributeValue> {
        self.attributes.get(name)
    }

    pub fn attributes(&self) -> &HashMap<String, AttributeValue> {
        &self.attributes
    }
}

/// Supplies the user the current evaluation runs against. Called once per
/// decision by the [FeatureManager](crate::FeatureManager).
pub trait UserProvider: Send + Sync {
    fn current_user(&self) -> Option<FeatureUser>;
}

/// A provider that never knows the current user. Useful for applications
/// that only use user-independent strategies.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullUserProvider;

impl UserProvider for NullUserProvider {
    fn current_user(&self) -> Option<FeatureUser> {
        None
    }
}

thread_local! {
    static CURRENT_USER: RefCell<Option<FeatureUser>> = const { RefCell::new(None) };
}

/// A provider backed by a thread local. Integration code binds the user at
/// the start of a unit of work (e.g. an inbound request) and releases it at
/// the end; evaluations on the same thread in between see that user.
#[derive(Clone, Copy, Debug, Default)]
pub struct ThreadLocalUserProvider;

impl ThreadLocalUserProvider {
    /// Binds the user to the current thread.
    ///
    /// Panics if a user is already bound, since that means a previous unit
    /// of work forgot to call [Self::release].
    pub fn bind(user: FeatureUser) {
        CURRENT_USER.with(|current| {
            let mut current = current.borrow_mut();
            if current.is_some() {
                panic!("cannot bind user, something else is already bound to this thread");
            }
            *current = Some(user);
        });
    }

    /// Removes the binding from the current thread.
    pub fn release() {
        CURRENT_USER.with(|current| current.borrow_mut().take());
    }
}

impl UserProvider for ThreadLocalUserProvider {
    fn current_user(&self) -> Option<FeatureUser> {
        CURRENT_USER.with(|current| current.borrow().clone())
    }
}
