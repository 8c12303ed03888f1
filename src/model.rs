use std::collections::BTreeMap;

/// One constant listed under a documentation section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstantEntry {
    pub name: String,
    /// 0-based order of appearance within the owning category.
    pub position: usize,
}

/// A documentation section and the constants it lists, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub label: String,
    pub constants: Vec<ConstantEntry>,
}

impl Category {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            constants: Vec::new(),
        }
    }

    pub fn push(&mut self, name: impl Into<String>) {
        let position = self.constants.len();
        self.constants.push(ConstantEntry {
            name: name.into(),
            position,
        });
    }
}

/// Live ordinals reported by the game client, keyed by constant name.
pub type OrdinalMap = BTreeMap<String, u64>;

pub fn constant_count(categories: &[Category]) -> usize {
    categories.iter().map(|c| c.constants.len()).sum()
}
