use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use thiserror::Error;

use crate::question::domain::category::{BankKind, Category, NumberedSlot};
use crate::question::domain::topic_bank::{
    CategoryBank, CategoryBlock, SlotBank, SlotBlock, TopicBank, TopicBanks,
};

#[derive(Error, Debug)]
pub enum BankLoadError {
    #[error("questions JSON not found: {0}")]
    NotFound(PathBuf),
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid question bank {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("{path}: topic '{topic}' has no 'description' questions")]
    MissingDescription { path: PathBuf, topic: String },
    #[error("{path}: topic '{topic}' repeats question '{text}'")]
    DuplicateQuestion {
        path: PathBuf,
        topic: String,
        text: String,
    },
    #[error("{path}: topic '{topic}' has unknown key '{key}' for a {kind} bank")]
    UnknownKey {
        path: PathBuf,
        topic: String,
        key: String,
        kind: BankKind,
    },
}

/// Raw document shape shared by all four banks: topic -> key -> questions.
/// Non-list values fail here, at parse time.
type RawBank = IndexMap<String, IndexMap<String, Vec<String>>>;

/// Loads and validates the four topic banks from `data_dir`.
///
/// Any missing or malformed file fails the whole load; the service is not
/// meant to start with a partial corpus.
pub fn load_banks(data_dir: &Path) -> Result<TopicBanks, BankLoadError> {
    let banks = TopicBanks {
        survey: load_category_bank(data_dir, BankKind::Survey)?,
        unexpected: load_category_bank(data_dir, BankKind::Unexpected)?,
        roleplay: load_slot_bank(data_dir, BankKind::Roleplay)?,
        advanced: load_slot_bank(data_dir, BankKind::Advanced)?,
    };
    log::info!(
        "Loaded topic banks from {}: survey={}, unexpected={}, roleplay={}, advanced={}",
        data_dir.display(),
        banks.survey.len(),
        banks.unexpected.len(),
        banks.roleplay.len(),
        banks.advanced.len()
    );
    Ok(banks)
}

pub fn load_category_bank(data_dir: &Path, kind: BankKind) -> Result<CategoryBank, BankLoadError> {
    let path = data_dir.join(kind.file_name());
    let raw = read_raw(&path)?;
    to_category_bank(raw, &path, kind)
}

pub fn load_slot_bank(data_dir: &Path, kind: BankKind) -> Result<SlotBank, BankLoadError> {
    let path = data_dir.join(kind.file_name());
    let raw = read_raw(&path)?;
    to_slot_bank(raw, &path, kind)
}

fn read_raw(path: &Path) -> Result<RawBank, BankLoadError> {
    if !path.exists() {
        return Err(BankLoadError::NotFound(path.to_path_buf()));
    }
    let json = fs::read_to_string(path).map_err(|e| BankLoadError::Read {
        path: path.to_path_buf(),
        source: e,
    })?;
    serde_json::from_str(&json).map_err(|e| BankLoadError::Parse {
        path: path.to_path_buf(),
        source: e,
    })
}

fn to_category_bank(
    raw: RawBank,
    path: &Path,
    kind: BankKind,
) -> Result<CategoryBank, BankLoadError> {
    let mut topics = IndexMap::with_capacity(raw.len());
    for (topic, entries) in raw {
        let mut block = CategoryBlock::new();
        let mut seen = HashSet::new();
        for (key, questions) in entries {
            let category: Category = key
                .parse()
                .map_err(|_| unknown_key(path, &topic, &key, kind))?;
            check_unique(&mut seen, &questions, path, &topic)?;
            block = block.with(category, questions);
        }
        if block.questions(Category::Description).is_empty() {
            return Err(BankLoadError::MissingDescription {
                path: path.to_path_buf(),
                topic,
            });
        }
        topics.insert(topic, block);
    }
    Ok(TopicBank::new(topics))
}

fn to_slot_bank(raw: RawBank, path: &Path, kind: BankKind) -> Result<SlotBank, BankLoadError> {
    let mut topics = IndexMap::with_capacity(raw.len());
    for (topic, entries) in raw {
        let mut block = SlotBlock::new();
        let mut seen = HashSet::new();
        for (key, questions) in entries {
            let slot = key
                .parse::<NumberedSlot>()
                .ok()
                .filter(|s| kind.slots().contains(s))
                .ok_or_else(|| unknown_key(path, &topic, &key, kind))?;
            check_unique(&mut seen, &questions, path, &topic)?;
            block = block.with(slot, questions);
        }
        topics.insert(topic, block);
    }
    Ok(TopicBank::new(topics))
}

/// A question text may appear only once per topic, across all of its lists.
fn check_unique(
    seen: &mut HashSet<String>,
    questions: &[String],
    path: &Path,
    topic: &str,
) -> Result<(), BankLoadError> {
    for text in questions {
        if !seen.insert(text.clone()) {
            return Err(BankLoadError::DuplicateQuestion {
                path: path.to_path_buf(),
                topic: topic.to_string(),
                text: text.clone(),
            });
        }
    }
    Ok(())
}

fn unknown_key(path: &Path, topic: &str, key: &str, kind: BankKind) -> BankLoadError {
    BankLoadError::UnknownKey {
        path: path.to_path_buf(),
        topic: topic.to_string(),
        key: key.to_string(),
        kind,
    }
}
