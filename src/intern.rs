use ahash::HashMap;
use std::hash::Hash;

pub(crate) const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";
pub(crate) const XMLNS_NAMESPACE: &str = "http://www.w3.org/2000/xmlns/";

/// An id that indexes a dense table.
pub(crate) trait DenseId: Copy {
    fn from_index(index: usize) -> Self;
    fn index(self) -> usize;
}

macro_rules! dense_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
        pub struct $name(u32);

        impl DenseId for $name {
            fn from_index(index: usize) -> Self {
                $name(index as u32)
            }

            fn index(self) -> usize {
                self.0 as usize
            }
        }
    };
}

dense_id!(
    /// A local name in a namespace, unique within a
    /// [`Document`](crate::Document).
    NameId
);
dense_id!(
    /// A namespace URI, unique within a [`Document`](crate::Document).
    NamespaceId
);
dense_id!(
    /// A namespace prefix, unique within a [`Document`](crate::Document).
    PrefixId
);

/// Hands out one id per distinct value.
#[derive(Debug, Clone)]
pub(crate) struct Interner<K, V> {
    values: Vec<V>,
    ids: HashMap<V, K>,
}

impl<K: DenseId, V: Eq + Hash + Clone> Interner<K, V> {
    pub(crate) fn new() -> Self {
        Interner {
            values: Vec::new(),
            ids: HashMap::default(),
        }
    }

    pub(crate) fn intern(&mut self, value: V) -> K {
        if let Some(id) = self.ids.get(&value) {
            return *id;
        }
        let id = K::from_index(self.values.len());
        self.ids.insert(value.clone(), id);
        self.values.push(value);
        id
    }

    pub(crate) fn find(&self, value: &V) -> Option<K> {
        self.ids.get(value).copied()
    }

    pub(crate) fn resolve(&self, id: K) -> &V {
        &self.values[id.index()]
    }
}

/// A local name qualified by its namespace.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub(crate) struct ExpandedName {
    pub(crate) local: String,
    pub(crate) namespace: NamespaceId,
}

impl ExpandedName {
    pub(crate) fn new(local: &str, namespace: NamespaceId) -> Self {
        ExpandedName {
            local: local.to_string(),
            namespace,
        }
    }
}

pub(crate) type Names = Interner<NameId, ExpandedName>;
pub(crate) type Namespaces = Interner<NamespaceId, String>;
pub(crate) type PrefixTable = Interner<PrefixId, String>;
