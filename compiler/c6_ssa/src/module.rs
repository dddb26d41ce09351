//! A set of functions that can call each other.

use rustc_hash::FxHashMap;

use crate::{FuncId, Function};

/// Owns every function of one compilation unit.
#[derive(Debug, Default)]
pub struct Module {
    functions: Vec<Function>,
    by_name: FxHashMap<String, FuncId>,
}

impl Module {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `function`. A later function with the same name shadows the
    /// earlier one in [`Module::lookup`].
    pub(crate) fn push(&mut self, function: Function) -> FuncId {
        let id = FuncId::from_index(self.functions.len());
        self.by_name.insert(function.name.clone(), id);
        self.functions.push(function);
        id
    }

    #[inline]
    #[track_caller]
    pub fn get(&self, id: FuncId) -> &Function {
        &self.functions[id.index()]
    }

    #[inline]
    #[track_caller]
    pub(crate) fn get_mut(&mut self, id: FuncId) -> &mut Function {
        &mut self.functions[id.index()]
    }

    pub fn lookup(&self, name: &str) -> Option<FuncId> {
        self.by_name.get(name).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FuncId, &Function)> {
        self.functions
            .iter()
            .enumerate()
            .map(|(i, f)| (FuncId::from_index(i), f))
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

impl std::ops::Index<FuncId> for Module {
    type Output = Function;

    fn index(&self, id: FuncId) -> &Function {
        self.get(id)
    }
}
