use std::{collections::HashMap, fmt};

/// Dense index of a propositional variable inside a [Variables] table
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VarId(u32);

impl VarId {
    pub(crate) fn new(index: u32) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for VarId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// Mapping between variable names and a contiguous range of [VarId]
///
/// Names are interned in order of first appearance, so the ID of a
/// variable never changes once the formula is built.
///
/// ```rust
/// use flipsat::Variables;
///
/// let mut vars = Variables::default();
/// let a = vars.intern("a");
/// let b = vars.intern("b");
/// assert_eq!(vars.intern("a"), a);
/// assert_ne!(a, b);
/// assert_eq!(vars.name(b), "b");
/// assert_eq!(vars.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Variables {
    names: Vec<String>,
    ids: HashMap<String, VarId>,
}

impl Variables {
    pub fn intern(&mut self, name: &str) -> VarId {
        if let Some(&id) = self.ids.get(name) {
            return id;
        }
        assert!(self.names.len() < u32::MAX as usize, "Too many variables");
        let id = VarId::new(self.names.len() as u32);
        self.names.push(name.to_string());
        self.ids.insert(name.to_string(), id);
        id
    }

    pub fn get(&self, name: &str) -> Option<VarId> {
        self.ids.get(name).copied()
    }

    pub fn name(&self, id: VarId) -> &str {
        &self.names[id.index()]
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (VarId, &str)> {
        self.names
            .iter()
            .enumerate()
            .map(|(i, name)| (VarId::new(i as u32), name.as_str()))
    }
}
