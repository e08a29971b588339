#![cfg(test)]

use std::sync::{PoisonError, RwLock};

use crate::request::{RequestInfo, RequestProvider};
use crate::user::{FeatureUser, UserProvider};

/// A user provider for tests: whatever was last [set](Self::set) is the
/// current user on every thread.
#[derive(Debug, Default)]
pub struct SettableUserProvider {
    user: RwLock<Option<FeatureUser>>,
}

impl SettableUserProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, user: FeatureUser) {
        *self.user.write().unwrap_or_else(PoisonError::into_inner) = Some(user);
    }

    pub fn clear(&self) {
        *self.user.write().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

impl UserProvider for SettableUserProvider {
    fn current_user(&self) -> Option<FeatureUser> {
        self.user.read().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

/// A request provider for tests, always reporting the request it was
/// created with (or none at all).
#[derive(Debug, Default)]
pub struct FixedRequestProvider {
    request: Option<RequestInfo>,
}

impl FixedRequestProvider {
    pub fn new(request: Option<RequestInfo>) -> Self {
        FixedRequestProvider { request }
    }
}

impl RequestProvider for FixedRequestProvider {
    fn current_request(&self) -> Option<RequestInfo> {
        self.request.clone()
    }
}
