//! 会话存储
//!
//! 登录身份（token / role / login）持久化在键值存储中，刷新页面后仍然有效，
//! 仅在显式注销时清除。浏览器端的存储是 `localStorage`。

use crate::Role;

pub const STORAGE_TOKEN_KEY: &str = "token";
pub const STORAGE_ROLE_KEY: &str = "role";
pub const STORAGE_LOGIN_KEY: &str = "login";

/// 字符串键值存储
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> bool;
    fn remove(&self, key: &str) -> bool;
}

/// 当前登录身份的快照
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Identity {
    pub token: String,
    pub role: String,
    pub login: String,
}

impl Identity {
    pub fn is_authenticated(&self) -> bool {
        !self.token.is_empty()
    }

    pub fn role(&self) -> Option<Role> {
        Role::parse(&self.role)
    }
}

pub struct Session {
    store: Box<dyn KeyValueStore>,
}

impl Session {
    pub fn new(store: impl KeyValueStore + 'static) -> Self {
        Self {
            store: Box::new(store),
        }
    }

    fn read(&self, key: &str) -> String {
        self.store.get(key).unwrap_or_default()
    }

    pub fn token(&self) -> String {
        self.read(STORAGE_TOKEN_KEY)
    }

    pub fn role(&self) -> String {
        self.read(STORAGE_ROLE_KEY)
    }

    pub fn login(&self) -> String {
        self.read(STORAGE_LOGIN_KEY)
    }

    pub fn is_authenticated(&self) -> bool {
        !self.token().is_empty()
    }

    pub fn identity(&self) -> Identity {
        Identity {
            token: self.token(),
            role: self.role(),
            login: self.login(),
        }
    }

    pub fn set_auth(&self, token: &str, role: &str, login: &str) {
        self.store.set(STORAGE_TOKEN_KEY, token);
        self.store.set(STORAGE_ROLE_KEY, role);
        self.store.set(STORAGE_LOGIN_KEY, login);
    }

    pub fn clear_auth(&self) {
        self.store.remove(STORAGE_TOKEN_KEY);
        self.store.remove(STORAGE_ROLE_KEY);
        self.store.remove(STORAGE_LOGIN_KEY);
    }
}

// =========================================================
// 测试工具: MemoryStore
// =========================================================

#[cfg(test)]
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: std::rc::Rc<std::cell::RefCell<std::collections::HashMap<String, String>>>,
}

#[cfg(test)]
impl MemoryStore {
    pub fn contains(&self, key: &str) -> bool {
        self.inner.borrow().contains_key(key)
    }
}

#[cfg(test)]
impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.inner.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> bool {
        self.inner
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        true
    }

    fn remove(&self, key: &str) -> bool {
        self.inner.borrow_mut().remove(key).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors_default_to_empty_strings() {
        let session = Session::new(MemoryStore::default());
        assert_eq!(session.token(), "");
        assert_eq!(session.role(), "");
        assert_eq!(session.login(), "");
        assert!(!session.is_authenticated());
        assert_eq!(session.identity().role(), None);
    }

    #[test]
    fn set_then_clear_round_trip() {
        let store = MemoryStore::default();
        let session = Session::new(store.clone());

        session.set_auth("tok", "ceo", "boss");
        assert!(session.is_authenticated());
        assert_eq!(session.identity().role(), Some(Role::Ceo));
        assert_eq!(session.login(), "boss");

        session.clear_auth();
        for key in [STORAGE_TOKEN_KEY, STORAGE_ROLE_KEY, STORAGE_LOGIN_KEY] {
            assert!(!store.contains(key));
        }
        assert!(!session.is_authenticated());
    }
}
