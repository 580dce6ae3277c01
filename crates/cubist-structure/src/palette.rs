use std::collections::HashMap;
use std::sync::Arc;

use cubist_blocks::BlockState;

/// Ordered, append-only list of distinct block states.
///
/// Indices are stable once assigned; structurally equal states share one index.
#[derive(Clone, Debug, Default)]
pub struct Palette {
    states: Vec<Arc<BlockState>>,
    by_state: HashMap<Arc<BlockState>, u32>,
}

impl Palette {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of `state`, appending it on first sight.
    pub fn get_or_insert(&mut self, state: BlockState) -> u32 {
        if let Some(&idx) = self.by_state.get(&state) {
            return idx;
        }
        let idx = self.states.len() as u32;
        let state = Arc::new(state);
        self.states.push(Arc::clone(&state));
        self.by_state.insert(state, idx);
        idx
    }

    pub fn index_of(&self, state: &BlockState) -> Option<u32> {
        self.by_state.get(state).copied()
    }

    #[inline]
    pub fn get(&self, index: u32) -> Option<&Arc<BlockState>> {
        self.states.get(index as usize)
    }

    // Stored indices always come from this palette.
    #[inline]
    pub(crate) fn entry(&self, index: u32) -> &Arc<BlockState> {
        &self.states[index as usize]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BlockState> {
        self.states.iter().map(|s| s.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_that_look_like_separators_stay_distinct() {
        let split = BlockState::simple("minecraft:sign")
            .with_property("a", "1")
            .with_property("b", "2");
        let joined = BlockState::simple("minecraft:sign").with_property("a", "1,b=2");
        assert_eq!(split.key(), joined.key());

        let mut p = Palette::new();
        let i = p.get_or_insert(split.clone());
        let j = p.get_or_insert(joined.clone());
        assert_ne!(i, j);
        assert_eq!(p.get(j).map(|s| s.as_ref()), Some(&joined));
        assert_eq!(p.index_of(&split), Some(i));
        assert_eq!(p.get_or_insert(split), i);
        assert_eq!(p.len(), 2);
    }
}
