use std::collections::BTreeMap;

use indexmap::IndexMap;

use super::category::{Category, NumberedSlot};

/// Questions of one survey/unexpected topic, grouped by category.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CategoryBlock {
    description: Vec<String>,
    routine: Vec<String>,
    comparison: Vec<String>,
    experience: Vec<String>,
}

impl CategoryBlock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with<S: Into<String>>(
        mut self,
        category: Category,
        questions: impl IntoIterator<Item = S>,
    ) -> Self {
        *self.list_mut(category) = questions.into_iter().map(Into::into).collect();
        self
    }

    pub fn questions(&self, category: Category) -> &[String] {
        match category {
            Category::Description => &self.description,
            Category::Routine => &self.routine,
            Category::Comparison => &self.comparison,
            Category::Experience => &self.experience,
        }
    }

    fn list_mut(&mut self, category: Category) -> &mut Vec<String> {
        match category {
            Category::Description => &mut self.description,
            Category::Routine => &mut self.routine,
            Category::Comparison => &mut self.comparison,
            Category::Experience => &mut self.experience,
        }
    }
}

/// Questions of one role-play/advanced topic, keyed by numbered slot.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SlotBlock {
    slots: BTreeMap<NumberedSlot, Vec<String>>,
}

impl SlotBlock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with<S: Into<String>>(
        mut self,
        slot: NumberedSlot,
        questions: impl IntoIterator<Item = S>,
    ) -> Self {
        self.slots
            .insert(slot, questions.into_iter().map(Into::into).collect());
        self
    }

    /// Questions for `slot`; empty when the topic does not define it.
    pub fn questions(&self, slot: NumberedSlot) -> &[String] {
        self.slots.get(&slot).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Read-only topic corpus: topic name to block, in file order.
#[derive(Clone, Debug, PartialEq)]
pub struct TopicBank<B> {
    topics: IndexMap<String, B>,
}

pub type CategoryBank = TopicBank<CategoryBlock>;
pub type SlotBank = TopicBank<SlotBlock>;

impl<B> TopicBank<B> {
    pub fn new(topics: IndexMap<String, B>) -> Self {
        Self { topics }
    }

    pub fn get(&self, topic: &str) -> Option<&B> {
        self.topics.get(topic)
    }

    /// The bank's own name for `topic` together with its block.
    pub fn get_key_value(&self, topic: &str) -> Option<(&str, &B)> {
        self.topics
            .get_key_value(topic)
            .map(|(name, block)| (name.as_str(), block))
    }

    /// Topic at `index` in file order.
    pub fn get_index(&self, index: usize) -> Option<(&str, &B)> {
        self.topics
            .get_index(index)
            .map(|(name, block)| (name.as_str(), block))
    }

    pub fn topic_names(&self) -> Vec<String> {
        self.topics.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.topics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }
}

impl<B> Default for TopicBank<B> {
    fn default() -> Self {
        Self {
            topics: IndexMap::new(),
        }
    }
}

impl<S: Into<String>, B> FromIterator<(S, B)> for TopicBank<B> {
    fn from_iter<I: IntoIterator<Item = (S, B)>>(iter: I) -> Self {
        Self {
            topics: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// The four banks served by the generator, loaded once at startup.
#[derive(Clone, Debug, Default)]
pub struct TopicBanks {
    pub survey: CategoryBank,
    pub unexpected: CategoryBank,
    pub roleplay: SlotBank,
    pub advanced: SlotBank,
}
