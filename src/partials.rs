use std::collections::{BTreeMap, HashMap};


/// Source of partial templates, looked up by name each time a partial
/// tag is rendered.
pub trait PartialStore {
    fn get(&self, name: &str) -> Option<&str>;
}

/// No partials: every partial tag renders as nothing.
impl PartialStore for () {
    fn get(&self, _name: &str) -> Option<&str> {
        None
    }
}

impl PartialStore for HashMap<String, String> {
    fn get(&self, name: &str) -> Option<&str> {
        HashMap::get(self, name).map(String::as_str)
    }
}

impl PartialStore for HashMap<&str, &str> {
    fn get(&self, name: &str) -> Option<&str> {
        HashMap::get(self, name).copied()
    }
}

impl PartialStore for BTreeMap<String, String> {
    fn get(&self, name: &str) -> Option<&str> {
        BTreeMap::get(self, name).map(String::as_str)
    }
}
