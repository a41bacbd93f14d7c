use super::category::{NumberedSlot, QuestionType};
use super::generation_error::GenerationError;
use super::question::{Question, QuestionSet};
use super::random_source::{choose, RandomSource};
use super::set_generator::resolve_topic;
use super::topic_bank::SlotBank;

/// Draws one question per numbered slot of a single topic.
///
/// Each slot is drawn independently and uniformly from its own list; slots
/// with an empty list are skipped. Questions keep their native slot numbers
/// (11..15). Fails with `NoQuestionsForTopic` when every slot is empty.
pub fn pick_slots(
    bank: &SlotBank,
    topic: Option<&str>,
    slots: &[NumberedSlot],
    rng: &mut dyn RandomSource,
) -> Result<QuestionSet, GenerationError> {
    let (name, block) = resolve_topic(bank, topic, rng)?;

    let mut questions = Vec::with_capacity(slots.len());
    for &slot in slots {
        match choose(rng, block.questions(slot)) {
            Some(text) => questions.push(Question::new(
                slot.number(),
                QuestionType::Slot(slot),
                text.clone(),
            )),
            None => log::debug!("Topic '{name}' has no questions for slot {slot}"),
        }
    }

    if questions.is_empty() {
        return Err(GenerationError::NoQuestionsForTopic(name.to_string()));
    }
    Ok(QuestionSet::new(name, questions))
}
