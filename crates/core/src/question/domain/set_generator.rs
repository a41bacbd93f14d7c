use super::category::{Category, QuestionType};
use super::generation_error::GenerationError;
use super::question::{Question, QuestionSet};
use super::random_source::{choose, take, RandomSource};
use super::topic_bank::{CategoryBank, CategoryBlock, TopicBank};

/// Resolves a topic by name, or uniformly at random when `topic` is `None`.
pub fn resolve_topic<'a, B>(
    bank: &'a TopicBank<B>,
    topic: Option<&str>,
    rng: &mut dyn RandomSource,
) -> Result<(&'a str, &'a B), GenerationError> {
    match topic {
        Some(name) => bank
            .get_key_value(name)
            .ok_or_else(|| GenerationError::TopicNotFound(name.to_string())),
        None => {
            if bank.is_empty() {
                return Err(GenerationError::EmptyBank);
            }
            let idx = rng.next_index(bank.len());
            bank.get_index(idx).ok_or(GenerationError::EmptyBank)
        }
    }
}

/// Builds one question set from a single topic of a category bank.
///
/// Question 1 is always a description. Questions 2..=n are drawn from the
/// follow-up categories whose per-set cap is not yet reached and whose
/// remaining pool is non-empty; a drawn question leaves the pool, so no
/// text repeats within the set. When no category qualifies the set stops
/// early and is returned shorter than `n`. That truncation is not an error.
///
/// `n` of 0 is treated as 1: the description slot is always produced.
pub fn generate_set(
    bank: &CategoryBank,
    topic: Option<&str>,
    n: usize,
    rng: &mut dyn RandomSource,
) -> Result<QuestionSet, GenerationError> {
    let (name, block) = resolve_topic(bank, topic, rng)?;

    let description = choose(rng, block.questions(Category::Description))
        .ok_or_else(|| GenerationError::NoDescriptionQuestions(name.to_string()))?;

    let mut questions = vec![Question::new(
        1,
        QuestionType::Category(Category::Description),
        description.clone(),
    )];

    let mut pools = FollowUpPools::new(block);
    for number in 2..=n.max(1) {
        let candidates = pools.candidates();
        let Some(&category) = choose(rng, &candidates) else {
            log::debug!(
                "Topic '{name}' exhausted after {} of {n} questions",
                questions.len()
            );
            break;
        };
        let Some(text) = pools.draw(category, rng) else {
            break;
        };
        questions.push(Question::new(
            number as u32,
            QuestionType::Category(category),
            text,
        ));
    }

    log::debug!("Generated {} questions for topic '{name}'", questions.len());
    Ok(QuestionSet::new(name, questions))
}

/// Local, mutable copies of a topic's follow-up lists plus usage counters.
/// The bank itself is never touched.
struct FollowUpPools {
    pools: [(Category, Vec<String>, usize); 3],
}

impl FollowUpPools {
    fn new(block: &CategoryBlock) -> Self {
        let pools = Category::FOLLOW_UPS.map(|c| (c, block.questions(c).to_vec(), 0));
        Self { pools }
    }

    fn candidates(&self) -> Vec<Category> {
        self.pools
            .iter()
            .filter(|(category, pool, used)| *used < category.cap() && !pool.is_empty())
            .map(|(category, _, _)| *category)
            .collect()
    }

    fn draw(&mut self, category: Category, rng: &mut dyn RandomSource) -> Option<String> {
        let (_, pool, used) = self.pools.iter_mut().find(|(c, _, _)| *c == category)?;
        let text = take(rng, pool)?;
        *used += 1;
        Some(text)
    }
}
