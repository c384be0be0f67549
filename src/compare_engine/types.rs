use serde::ser::{SerializeSeq, SerializeStruct, Serializer};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

use crate::error_codes::{ERR_CANNOT_READ_DIRECTORY, ERR_DIRECTORY_NOT_FOUND, ERR_NOT_A_DIRECTORY};

/// Immediate child names of one directory.
pub type EntrySet = BTreeSet<String>;

const WORD_BITS: usize = 64;

/// Which of the valid directories contain a given file name.
///
/// Bit `i` refers to the `i`-th valid directory, so excluded inputs never
/// occupy a slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PresenceBitmask {
    words: Vec<u64>,
    len: usize,
}

impl PresenceBitmask {
    pub fn new(len: usize) -> Self {
        Self {
            words: vec![0; len.div_ceil(WORD_BITS)],
            len,
        }
    }

    pub fn all_true(len: usize) -> Self {
        let mut mask = Self::new(len);
        for index in 0..len {
            mask.set(index);
        }
        mask
    }

    pub fn from_bools(bits: &[bool]) -> Self {
        let mut mask = Self::new(bits.len());
        for (index, present) in bits.iter().enumerate() {
            if *present {
                mask.set(index);
            }
        }
        mask
    }

    /// Panics if `index` is outside the mask.
    pub fn set(&mut self, index: usize) {
        assert!(
            index < self.len,
            "bit {index} out of range for mask of {} bits",
            self.len
        );
        self.words[index / WORD_BITS] |= 1u64 << (index % WORD_BITS);
    }

    pub fn get(&self, index: usize) -> bool {
        index < self.len && self.words[index / WORD_BITS] & (1u64 << (index % WORD_BITS)) != 0
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn count_ones(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    pub fn is_all_true(&self) -> bool {
        self.count_ones() == self.len
    }

    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.len).map(move |index| self.get(index))
    }

    /// Zero-based positions of the directories that contain the name.
    pub fn present_indices(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.len).filter(move |index| self.get(*index))
    }

    pub fn to_bools(&self) -> Vec<bool> {
        self.iter().collect()
    }
}

impl fmt::Display for PresenceBitmask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for present in self.iter() {
            f.write_str(if present { "1" } else { "0" })?;
        }
        Ok(())
    }
}

impl Serialize for PresenceBitmask {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.len))?;
        for present in self.iter() {
            seq.serialize_element(&present)?;
        }
        seq.end()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidDirectory {
    pub path: String,
    pub entries: EntrySet,
}

/// Why an input path was left out of a comparison.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExclusionReason {
    #[error("directory not found: {path}")]
    NotFound { path: String },

    #[error("not a directory: {path}")]
    NotADirectory { path: String },

    #[error("cannot read directory: {path}: {cause}")]
    ListingFailure { path: String, cause: String },
}

impl ExclusionReason {
    pub fn path(&self) -> &str {
        match self {
            Self::NotFound { path } | Self::NotADirectory { path } | Self::ListingFailure { path, .. } => path,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => ERR_DIRECTORY_NOT_FOUND,
            Self::NotADirectory { .. } => ERR_NOT_A_DIRECTORY,
            Self::ListingFailure { .. } => ERR_CANNOT_READ_DIRECTORY,
        }
    }

    /// Missing paths and plain files will not start working on their own;
    /// listing failures might once permissions are fixed.
    pub fn is_permanent(&self) -> bool {
        !matches!(self, Self::ListingFailure { .. })
    }
}

#[derive(Debug, Clone)]
pub struct CompareOptions {
    pub listing_timeout: Option<Duration>,
    pub max_parallel_listings: usize,
}

impl Default for CompareOptions {
    fn default() -> Self {
        Self {
            listing_timeout: None,
            max_parallel_listings: 8,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComparisonResult {
    pub common_files: Vec<String>,
    #[serde(serialize_with = "serialize_pattern_groups")]
    pub pattern_groups: HashMap<PresenceBitmask, Vec<String>>,
    pub valid_directories: Vec<String>,
}

impl ComparisonResult {
    pub fn empty(valid_directories: Vec<String>) -> Self {
        Self {
            common_files: Vec::new(),
            pattern_groups: HashMap::new(),
            valid_directories,
        }
    }

    /// Number of distinct names across all valid directories.
    pub fn total_files(&self) -> usize {
        self.common_files.len() + self.pattern_groups.values().map(Vec::len).sum::<usize>()
    }

    /// Groups present in more folders come first; ties put groups that
    /// include earlier folders first.
    pub fn ordered_pattern_groups(&self) -> Vec<(&PresenceBitmask, &[String])> {
        let mut groups: Vec<_> = self
            .pattern_groups
            .iter()
            .map(|(mask, files)| (mask, files.as_slice()))
            .collect();
        groups.sort_by(|(a, _), (b, _)| rendering_order(a, b));
        groups
    }
}

struct PatternGroupView<'a> {
    presence: &'a PresenceBitmask,
    files: &'a [String],
}

impl Serialize for PatternGroupView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("PatternGroup", 2)?;
        state.serialize_field("presence", self.presence)?;
        state.serialize_field("files", self.files)?;
        state.end()
    }
}

fn rendering_order(a: &PresenceBitmask, b: &PresenceBitmask) -> Ordering {
    b.count_ones()
        .cmp(&a.count_ones())
        .then_with(|| b.iter().cmp(a.iter()))
}

fn serialize_pattern_groups<S: Serializer>(
    groups: &HashMap<PresenceBitmask, Vec<String>>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    let mut ordered: Vec<_> = groups.iter().collect();
    ordered.sort_by(|(a, _), (b, _)| rendering_order(a, b));
    let mut seq = serializer.serialize_seq(Some(ordered.len()))?;
    for (presence, files) in ordered {
        seq.serialize_element(&PatternGroupView { presence, files })?;
    }
    seq.end()
}
