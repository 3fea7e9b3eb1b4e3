use std::collections::HashMap;

/// Build-time map from raw structural net names to canonical net names.
///
/// The first binding of a raw name wins; later attempts to rebind it are
/// ignored so that connectivity follows first-seen order.
#[derive(Debug, Default, Clone)]
pub struct WireAliasTable {
    aliases: HashMap<String, String>,
}

impl WireAliasTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `raw -> canonical` unless `raw` is already bound. Returns
    /// whether the binding was added.
    pub fn bind(&mut self, raw: &str, canonical: &str) -> bool {
        if self.aliases.contains_key(raw) {
            return false;
        }
        self.aliases.insert(raw.to_string(), canonical.to_string());
        true
    }

    pub fn resolve(&self, raw: &str) -> Option<&str> {
        self.aliases.get(raw).map(String::as_str)
    }

    /// Resolves `raw`, passing it through unchanged when it has no alias.
    /// The flag reports whether an alias was found.
    pub fn resolve_or_raw<'a>(&'a self, raw: &'a str) -> (&'a str, bool) {
        match self.resolve(raw) {
            Some(canonical) => (canonical, true),
            None => (raw, false),
        }
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }
}
