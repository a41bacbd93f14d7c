use std::sync::Arc;

use crate::question::domain::category::{NumberedSlot, QuestionType};
use crate::question::domain::generation_error::GenerationError;
use crate::question::domain::question::{GenerationResult, Mode, Question, QuestionSet};
use crate::question::domain::random_source::{take, RandomSource};
use crate::question::domain::set_generator::generate_set;
use crate::question::domain::slot_picker::pick_slots;
use crate::question::domain::topic_bank::TopicBanks;
use crate::shared::constants::{
    DEFAULT_UNEXPECTED_COUNT, FULL15_FIRST_SURVEY_START, FULL15_SECOND_SURVEY_START,
    FULL15_UNEXPECTED_START, INTRO_TEXT, INTRO_TOPIC, SURVEY_QUESTIONS_PER_TOPIC,
    SURVEY_TOPIC_COUNT,
};

/// A request for one question-set recipe.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenerationRequest {
    pub mode: Mode,
    /// Question count; only honoured for `unexpected`.
    pub n: Option<usize>,
    /// Pins the topic for `unexpected` and `roleplay`.
    pub topic: Option<String>,
}

impl GenerationRequest {
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            n: None,
            topic: None,
        }
    }

    pub fn with_count(mut self, n: usize) -> Self {
        self.n = Some(n);
        self
    }

    pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
        self.topic = Some(topic.into());
        self
    }
}

/// Assembles question sets for the five test recipes.
///
/// Banks are shared read-only across use cases; each use case owns its
/// random source, so generation needs no locking.
pub struct GenerateQuestionsUseCase {
    banks: Arc<TopicBanks>,
    rng: Box<dyn RandomSource>,
}

impl GenerateQuestionsUseCase {
    pub fn new(banks: Arc<TopicBanks>, rng: Box<dyn RandomSource>) -> Self {
        Self { banks, rng }
    }

    pub fn generate(
        &mut self,
        request: &GenerationRequest,
    ) -> Result<GenerationResult, GenerationError> {
        log::debug!("Generating {} question set", request.mode);
        if request.topic.is_some() && !matches!(request.mode, Mode::Unexpected | Mode::Roleplay) {
            log::warn!("Ignoring topic for mode {}", request.mode);
        }
        let topic = request.topic.as_deref();
        match request.mode {
            Mode::Survey => self.survey(),
            Mode::Unexpected => {
                let n = request
                    .n
                    .filter(|n| *n > 0)
                    .unwrap_or(DEFAULT_UNEXPECTED_COUNT);
                self.unexpected(n, topic)
            }
            Mode::Roleplay => self.roleplay(topic),
            Mode::Advanced => self.advanced(),
            Mode::Full15 => self.full15(),
        }
    }

    /// Topic names in bank order for the modes a user may pick a topic in.
    pub fn list_topics(&self, mode: Mode) -> Result<Vec<String>, GenerationError> {
        match mode {
            Mode::Survey => Ok(self.banks.survey.topic_names()),
            Mode::Unexpected => Ok(self.banks.unexpected.topic_names()),
            Mode::Roleplay => Ok(self.banks.roleplay.topic_names()),
            Mode::Advanced | Mode::Full15 => Err(GenerationError::UnsupportedTopicListing(mode)),
        }
    }

    /// One set of `n` questions from an unexpected-bank topic.
    pub fn unexpected(
        &mut self,
        n: usize,
        topic: Option<&str>,
    ) -> Result<GenerationResult, GenerationError> {
        let set = generate_set(&self.banks.unexpected, topic, n, self.rng.as_mut())?;
        Ok(GenerationResult::new(Mode::Unexpected, vec![set]))
    }

    /// Two distinct survey topics, three questions each, numbered 1..3 per set.
    pub fn survey(&mut self) -> Result<GenerationResult, GenerationError> {
        let sets = self.survey_sets()?;
        Ok(GenerationResult::new(Mode::Survey, sets))
    }

    /// One question per slot 11-13 of a role-play topic, numbered locally.
    pub fn roleplay(&mut self, topic: Option<&str>) -> Result<GenerationResult, GenerationError> {
        let mut set = pick_slots(
            &self.banks.roleplay,
            topic,
            &NumberedSlot::ROLEPLAY,
            self.rng.as_mut(),
        )?;
        set.renumber_from(1);
        Ok(GenerationResult::new(Mode::Roleplay, vec![set]))
    }

    /// One question per slot 14-15 of an advanced topic, numbered locally.
    pub fn advanced(&mut self) -> Result<GenerationResult, GenerationError> {
        let mut set = pick_slots(
            &self.banks.advanced,
            None,
            &NumberedSlot::ADVANCED,
            self.rng.as_mut(),
        )?;
        set.renumber_from(1);
        Ok(GenerationResult::new(Mode::Advanced, vec![set]))
    }

    /// The full test: intro, two survey blocks, an unexpected block, then
    /// role-play and advanced blocks that keep their slot numbers.
    pub fn full15(&mut self) -> Result<GenerationResult, GenerationError> {
        let intro = QuestionSet::new(
            INTRO_TOPIC,
            vec![Question::new(1, QuestionType::Introduce, INTRO_TEXT)],
        );

        let mut survey = self.survey_sets()?.into_iter();
        let (Some(mut first), Some(mut second)) = (survey.next(), survey.next()) else {
            return Err(GenerationError::InsufficientTopics {
                found: self.banks.survey.len(),
            });
        };
        first.renumber_from(FULL15_FIRST_SURVEY_START);
        second.renumber_from(FULL15_SECOND_SURVEY_START);

        let mut unexpected = generate_set(
            &self.banks.unexpected,
            None,
            SURVEY_QUESTIONS_PER_TOPIC,
            self.rng.as_mut(),
        )?;
        unexpected.renumber_from(FULL15_UNEXPECTED_START);

        let roleplay = pick_slots(
            &self.banks.roleplay,
            None,
            &NumberedSlot::ROLEPLAY,
            self.rng.as_mut(),
        )?;
        let advanced = pick_slots(
            &self.banks.advanced,
            None,
            &NumberedSlot::ADVANCED,
            self.rng.as_mut(),
        )?;

        Ok(GenerationResult::new(
            Mode::Full15,
            vec![intro, first, second, unexpected, roleplay, advanced],
        ))
    }

    fn survey_sets(&mut self) -> Result<Vec<QuestionSet>, GenerationError> {
        let mut topics = self.banks.survey.topic_names();
        if topics.len() < SURVEY_TOPIC_COUNT {
            return Err(GenerationError::InsufficientTopics {
                found: topics.len(),
            });
        }

        let mut chosen = Vec::with_capacity(SURVEY_TOPIC_COUNT);
        for _ in 0..SURVEY_TOPIC_COUNT {
            if let Some(topic) = take(self.rng.as_mut(), &mut topics) {
                chosen.push(topic);
            }
        }

        chosen
            .iter()
            .map(|topic| {
                generate_set(
                    &self.banks.survey,
                    Some(topic.as_str()),
                    SURVEY_QUESTIONS_PER_TOPIC,
                    self.rng.as_mut(),
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::question::domain::category::Category;
    use crate::question::domain::random_source::testing::{FirstIndex, LastIndex};
    use crate::question::domain::topic_bank::{CategoryBank, CategoryBlock, SlotBank, SlotBlock};
    use crate::question::infrastructure::rng_random_source::RngRandomSource;
    use rstest::rstest;

    fn full_block(prefix: &str) -> CategoryBlock {
        CategoryBlock::new()
            .with(Category::Description, [format!("{prefix} D1"), format!("{prefix} D2")])
            .with(Category::Routine, [format!("{prefix} R1")])
            .with(Category::Comparison, [format!("{prefix} C1")])
            .with(Category::Experience, [format!("{prefix} E1"), format!("{prefix} E2")])
    }

    fn category_bank(topics: &[&str]) -> CategoryBank {
        topics.iter().map(|t| (*t, full_block(t))).collect()
    }

    fn roleplay_bank() -> SlotBank {
        [
            (
                "Hotel",
                SlotBlock::new()
                    .with(NumberedSlot::S11, ["Call the hotel."])
                    .with(NumberedSlot::S12, ["Your room is dirty."])
                    .with(NumberedSlot::S13, ["Tell me about a hotel problem."]),
            ),
            (
                "Bank",
                SlotBlock::new()
                    .with(NumberedSlot::S11, ["Ask the bank."])
                    .with(NumberedSlot::S12, ["You lost your card."])
                    .with(NumberedSlot::S13, ["Tell me about a banking issue."]),
            ),
        ]
        .into_iter()
        .collect()
    }

    fn advanced_bank() -> SlotBank {
        [(
            "Technology",
            SlotBlock::new()
                .with(NumberedSlot::S14, ["How has technology changed?"])
                .with(NumberedSlot::S15, ["What worries people about technology?"]),
        )]
        .into_iter()
        .collect()
    }

    fn banks() -> TopicBanks {
        TopicBanks {
            survey: category_bank(&["Movies", "Beach", "Cafe", "Park"]),
            unexpected: category_bank(&["Recycling", "Weather"]),
            roleplay: roleplay_bank(),
            advanced: advanced_bank(),
        }
    }

    fn use_case(banks: TopicBanks, rng: Box<dyn RandomSource>) -> GenerateQuestionsUseCase {
        GenerateQuestionsUseCase::new(Arc::new(banks), rng)
    }

    fn numbers(result: &GenerationResult) -> Vec<u32> {
        result.questions().map(|q| q.number).collect()
    }

    // ── survey ───────────────────────────────────────────────────────

    #[test]
    fn test_survey_two_distinct_topics_three_each() {
        for seed in 0..100 {
            let mut uc = use_case(banks(), Box::new(RngRandomSource::seeded(seed)));
            let result = uc.survey().unwrap();
            assert_eq!(result.mode, Mode::Survey);
            assert_eq!(result.sets.len(), 2);
            assert_ne!(result.sets[0].topic, result.sets[1].topic);
            assert_eq!(result.count, 6);
            for set in &result.sets {
                let nums: Vec<u32> = set.questions.iter().map(|q| q.number).collect();
                assert_eq!(nums, vec![1, 2, 3]);
            }
        }
    }

    #[test]
    fn test_survey_distinct_with_degenerate_source() {
        // A source that always returns 0 must still yield two distinct topics.
        let mut uc = use_case(banks(), Box::new(FirstIndex));
        let result = uc.survey().unwrap();
        assert_eq!(result.sets[0].topic, "Movies");
        assert_eq!(result.sets[1].topic, "Beach");
    }

    #[test]
    fn test_survey_needs_two_topics() {
        let mut b = banks();
        b.survey = category_bank(&["Movies"]);
        let mut uc = use_case(b, Box::new(FirstIndex));
        let err = uc.survey().unwrap_err();
        assert_eq!(err, GenerationError::InsufficientTopics { found: 1 });
    }

    // ── unexpected ───────────────────────────────────────────────────

    #[test]
    fn test_unexpected_default_count() {
        let mut uc = use_case(banks(), Box::new(FirstIndex));
        let result = uc.generate(&GenerationRequest::new(Mode::Unexpected)).unwrap();
        assert_eq!(result.mode, Mode::Unexpected);
        assert_eq!(result.sets.len(), 1);
        assert_eq!(result.count, 3);
    }

    #[rstest]
    #[case::zero_means_default(0, 3)]
    #[case::one(1, 1)]
    #[case::four(4, 4)]
    #[case::capped_by_rules(9, 5)]
    fn test_unexpected_count(#[case] n: usize, #[case] expected: usize) {
        let mut uc = use_case(banks(), Box::new(FirstIndex));
        let request = GenerationRequest::new(Mode::Unexpected).with_count(n);
        let result = uc.generate(&request).unwrap();
        assert_eq!(result.count, expected);
    }

    #[test]
    fn test_unexpected_pinned_topic() {
        let mut uc = use_case(banks(), Box::new(FirstIndex));
        let request = GenerationRequest::new(Mode::Unexpected).with_topic("Weather");
        let result = uc.generate(&request).unwrap();
        assert_eq!(result.sets[0].topic, "Weather");
    }

    #[test]
    fn test_unexpected_unknown_topic() {
        let mut uc = use_case(banks(), Box::new(FirstIndex));
        let request = GenerationRequest::new(Mode::Unexpected).with_topic("Golf");
        let err = uc.generate(&request).unwrap_err();
        assert_eq!(err, GenerationError::TopicNotFound("Golf".to_string()));
    }

    // ── roleplay / advanced ──────────────────────────────────────────

    #[test]
    fn test_roleplay_numbers_locally() {
        let mut uc = use_case(banks(), Box::new(FirstIndex));
        let result = uc.roleplay(None).unwrap();
        assert_eq!(result.sets[0].topic, "Hotel");
        assert_eq!(numbers(&result), vec![1, 2, 3]);
        let kinds: Vec<&str> = result.questions().map(|q| q.kind.as_str()).collect();
        assert_eq!(kinds, vec!["11", "12", "13"]);
    }

    #[test]
    fn test_roleplay_pinned_topic() {
        let mut uc = use_case(banks(), Box::new(FirstIndex));
        let request = GenerationRequest::new(Mode::Roleplay).with_topic("Bank");
        let result = uc.generate(&request).unwrap();
        assert_eq!(result.sets[0].topic, "Bank");
    }

    #[test]
    fn test_roleplay_single_populated_slot() {
        let mut b = banks();
        b.roleplay = [(
            "Phone",
            SlotBlock::new()
                .with(NumberedSlot::S11, Vec::<String>::new())
                .with(NumberedSlot::S12, ["Your phone broke."]),
        )]
        .into_iter()
        .collect();
        let mut uc = use_case(b, Box::new(FirstIndex));
        let result = uc.roleplay(None).unwrap();
        assert_eq!(result.count, 1);
        let q = &result.sets[0].questions[0];
        assert_eq!(q.number, 1);
        assert_eq!(q.kind, QuestionType::Slot(NumberedSlot::S12));
    }

    #[test]
    fn test_roleplay_all_slots_empty() {
        let mut b = banks();
        b.roleplay = [("Phone", SlotBlock::new())].into_iter().collect();
        let mut uc = use_case(b, Box::new(FirstIndex));
        let err = uc.roleplay(None).unwrap_err();
        assert_eq!(err, GenerationError::NoQuestionsForTopic("Phone".to_string()));
    }

    #[test]
    fn test_advanced_numbers_locally() {
        let mut uc = use_case(banks(), Box::new(FirstIndex));
        let result = uc.advanced().unwrap();
        assert_eq!(numbers(&result), vec![1, 2]);
        let kinds: Vec<&str> = result.questions().map(|q| q.kind.as_str()).collect();
        assert_eq!(kinds, vec!["14", "15"]);
    }

    #[test]
    fn test_advanced_both_slots_empty() {
        let mut b = banks();
        b.advanced = [(
            "Technology",
            SlotBlock::new()
                .with(NumberedSlot::S14, Vec::<String>::new())
                .with(NumberedSlot::S15, Vec::<String>::new()),
        )]
        .into_iter()
        .collect();
        let mut uc = use_case(b, Box::new(FirstIndex));
        let err = uc.advanced().unwrap_err();
        assert_eq!(
            err,
            GenerationError::NoQuestionsForTopic("Technology".to_string())
        );
    }

    #[test]
    fn test_advanced_only_slot_15() {
        let mut b = banks();
        b.advanced = [(
            "Technology",
            SlotBlock::new().with(NumberedSlot::S15, ["What worries people?"]),
        )]
        .into_iter()
        .collect();
        let mut uc = use_case(b, Box::new(LastIndex));
        let result = uc.advanced().unwrap();
        assert_eq!(result.count, 1);
        assert_eq!(result.sets[0].questions[0].number, 1);
        assert_eq!(result.sets[0].questions[0].kind.as_str(), "15");
    }

    // ── full15 ───────────────────────────────────────────────────────

    #[test]
    fn test_full15_numbering_and_intro() {
        for seed in 0..100 {
            let mut uc = use_case(banks(), Box::new(RngRandomSource::seeded(seed)));
            let result = uc.full15().unwrap();
            assert_eq!(result.mode, Mode::Full15);
            assert_eq!(result.count, 15);
            assert_eq!(numbers(&result), (1..=15).collect::<Vec<u32>>());
            assert_eq!(result.sets.len(), 6);

            let intro = &result.sets[0];
            assert_eq!(intro.topic, INTRO_TOPIC);
            assert_eq!(intro.questions[0].kind, QuestionType::Introduce);
            assert_eq!(intro.questions[0].text, INTRO_TEXT);

            assert_ne!(result.sets[1].topic, result.sets[2].topic);
        }
    }

    #[test]
    fn test_full15_block_types() {
        let mut uc = use_case(banks(), Box::new(FirstIndex));
        let result = uc.full15().unwrap();
        let kinds: Vec<&str> = result.questions().map(|q| q.kind.as_str()).collect();
        assert_eq!(kinds[0], "introduce");
        assert_eq!(kinds[1], "description");
        assert_eq!(kinds[4], "description");
        assert_eq!(kinds[7], "description");
        assert_eq!(&kinds[10..], &["11", "12", "13", "14", "15"]);
    }

    #[test]
    fn test_full15_keeps_native_numbers_for_sparse_roleplay() {
        let mut b = banks();
        b.roleplay = [(
            "Phone",
            SlotBlock::new().with(NumberedSlot::S12, ["Your phone broke."]),
        )]
        .into_iter()
        .collect();
        let mut uc = use_case(b, Box::new(FirstIndex));
        let result = uc.full15().unwrap();
        assert_eq!(result.count, 13);
        assert_eq!(result.sets[4].questions[0].number, 12);
    }

    #[test]
    fn test_full15_propagates_survey_failure() {
        let mut b = banks();
        b.survey = category_bank(&["Movies"]);
        let mut uc = use_case(b, Box::new(FirstIndex));
        let err = uc.full15().unwrap_err();
        assert_eq!(err, GenerationError::InsufficientTopics { found: 1 });
    }

    #[test]
    fn test_full15_propagates_advanced_failure() {
        let mut b = banks();
        b.advanced = SlotBank::default();
        let mut uc = use_case(b, Box::new(FirstIndex));
        assert_eq!(uc.full15().unwrap_err(), GenerationError::EmptyBank);
    }

    // ── boundary ─────────────────────────────────────────────────────

    #[test]
    fn test_generate_dispatches_every_mode() {
        let mut uc = use_case(banks(), Box::new(RngRandomSource::seeded(3)));
        for mode in Mode::ALL {
            let result = uc.generate(&GenerationRequest::new(mode)).unwrap();
            assert_eq!(result.mode, mode);
            assert_eq!(result.count, result.questions().count());
        }
    }

    #[test]
    fn test_list_topics_in_bank_order() {
        let uc = use_case(banks(), Box::new(FirstIndex));
        assert_eq!(
            uc.list_topics(Mode::Survey).unwrap(),
            vec!["Movies", "Beach", "Cafe", "Park"]
        );
        assert_eq!(
            uc.list_topics(Mode::Unexpected).unwrap(),
            vec!["Recycling", "Weather"]
        );
        assert_eq!(uc.list_topics(Mode::Roleplay).unwrap(), vec!["Hotel", "Bank"]);
    }

    #[rstest]
    #[case::advanced(Mode::Advanced)]
    #[case::full15(Mode::Full15)]
    fn test_list_topics_unsupported(#[case] mode: Mode) {
        let uc = use_case(banks(), Box::new(FirstIndex));
        assert_eq!(
            uc.list_topics(mode).unwrap_err(),
            GenerationError::UnsupportedTopicListing(mode)
        );
    }

    #[test]
    fn test_shared_banks_across_use_cases() {
        let shared = Arc::new(banks());
        let mut a = GenerateQuestionsUseCase::new(shared.clone(), Box::new(FirstIndex));
        let mut b = GenerateQuestionsUseCase::new(shared, Box::new(LastIndex));
        assert_eq!(a.advanced().unwrap().count, 2);
        assert_eq!(b.advanced().unwrap().count, 2);
    }
}
