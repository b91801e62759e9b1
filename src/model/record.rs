//! Record: a map-backed object with a static type descriptor.

use crate::access::Introspect;
use crate::Result;
use super::{PropertyMap, TypeInfo, Value};

/// Generic introspectable object: a type descriptor plus named properties.
///
/// Every stored property is readable and writable; writing an unknown name
/// adds it.
#[derive(Debug, Clone)]
pub struct Record {
    type_info: &'static TypeInfo,
    properties: PropertyMap,
}

impl Record {
    pub fn new(type_info: &'static TypeInfo) -> Self {
        Self {
            type_info,
            properties: PropertyMap::new(),
        }
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.properties.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    pub fn properties(&self) -> &PropertyMap {
        &self.properties
    }
}

impl Introspect for Record {
    fn type_info(&self) -> &'static TypeInfo {
        self.type_info
    }

    fn property(&self, name: &str) -> Result<Option<Value>> {
        Ok(self.properties.get(name).cloned())
    }

    fn property_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.properties.get_mut(name)
    }

    fn set_property(&mut self, name: &str, value: Value) -> Result<()> {
        self.properties.insert(name.to_owned(), value);
        Ok(())
    }

    fn clone_boxed(&self) -> Box<dyn Introspect> {
        Box::new(self.clone())
    }
}
