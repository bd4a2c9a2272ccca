//! Interned module names.
//!
//! A module name is looked up by every reference that mentions it, so each
//! distinct name is stored once and handed out as a `Copy` handle.

use std::collections::HashSet;
use std::fmt;
use std::ops::Deref;
use std::sync::{Mutex, OnceLock};

use serde::{Deserialize, Deserializer};

fn interner() -> &'static Mutex<HashSet<&'static str>> {
    static INTERNER: OnceLock<Mutex<HashSet<&'static str>>> = OnceLock::new();
    INTERNER.get_or_init(Default::default)
}

/// A module name stored once for the whole process.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InternedString(&'static str);

impl InternedString {
    pub fn new(s: impl AsRef<str>) -> Self {
        let s = s.as_ref();
        let mut names = interner().lock().unwrap_or_else(|e| e.into_inner());
        match names.get(s) {
            Some(&name) => InternedString(name),
            None => {
                let name: &'static str = Box::leak(Box::<str>::from(s));
                names.insert(name);
                InternedString(name)
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl From<String> for InternedString {
    fn from(s: String) -> Self {
        InternedString::new(s)
    }
}

impl<'de> Deserialize<'de> for InternedString {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(InternedString::from)
    }
}

impl Deref for InternedString {
    type Target = str;

    fn deref(&self) -> &str {
        self.0
    }
}

impl PartialEq<&str> for InternedString {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl fmt::Debug for InternedString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.0, f)
    }
}

impl fmt::Display for InternedString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}
