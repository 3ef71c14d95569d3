use std::fs;
use std::path::{Path, PathBuf};

use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::{TypingError, TypingResult};

/// The text a session asks the user to reproduce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceText {
    path: Option<PathBuf>,
    chars: Vec<char>,
}

impl SourceText {
    pub fn new(text: &str) -> Self {
        Self {
            path: None,
            chars: normalize_newlines(text).chars().collect(),
        }
    }

    pub fn from_file(path: &Path) -> TypingResult<Self> {
        let text = fs::read_to_string(path).map_err(|source| TypingError::SourceUnreadable {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self {
            path: Some(path.to_path_buf()),
            chars: normalize_newlines(&text).chars().collect(),
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<char> {
        self.chars.get(idx).copied()
    }

    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    /// Everything from `idx` on.
    pub fn remaining(&self, idx: usize) -> String {
        self.chars[idx.min(self.chars.len())..].iter().collect()
    }

    /// Everything before `idx`.
    pub fn typed(&self, idx: usize) -> String {
        self.chars[..idx.min(self.chars.len())].iter().collect()
    }
}

/// `\r\n` and lone `\r` become `\n`; Enter is the only line break a user can type.
fn normalize_newlines(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

/// Where new sessions get their text from.
pub trait SourceProvider {
    fn load_random(&mut self) -> TypingResult<SourceText>;
}

/// Picks uniformly among the `.txt` files found in a directory.
///
/// The candidate list is taken once, when the provider is created, so files
/// written later (including the statistics report) are never offered.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    dir: PathBuf,
    candidates: Vec<PathBuf>,
}

impl DirectorySource {
    /// Scan `dir`, skipping `exclude` (the statistics report) if present.
    pub fn scan(dir: &Path, exclude: Option<&Path>) -> TypingResult<Self> {
        let entries = fs::read_dir(dir).map_err(|source| TypingError::SourceUnreadable {
            path: dir.to_path_buf(),
            source,
        })?;
        // A report that does not exist yet cannot collide with a candidate.
        let excluded = exclude.and_then(|p| fs::canonicalize(p).ok());

        let mut candidates: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_file())
            .filter(|path| path.extension().is_some_and(|ext| ext == "txt"))
            .filter(|path| match &excluded {
                Some(excluded) => fs::canonicalize(path).map_or(true, |p| p != *excluded),
                None => true,
            })
            .collect();
        candidates.sort();

        log::debug!(
            "found {} candidate text(s) in {}",
            candidates.len(),
            dir.display()
        );

        Ok(Self {
            dir: dir.to_path_buf(),
            candidates,
        })
    }

    pub fn candidates(&self) -> &[PathBuf] {
        &self.candidates
    }

    pub fn load_with<R: Rng + ?Sized>(&self, rng: &mut R) -> TypingResult<SourceText> {
        let path = self
            .candidates
            .choose(rng)
            .ok_or_else(|| TypingError::NoSourceAvailable {
                dir: self.dir.clone(),
            })?;
        log::info!("loading source text {}", path.display());
        SourceText::from_file(path)
    }
}

impl SourceProvider for DirectorySource {
    fn load_random(&mut self) -> TypingResult<SourceText> {
        self.load_with(&mut rand::thread_rng())
    }
}

/// Serves the same text every time; used for headless runs and tests.
#[derive(Debug, Clone)]
pub struct FixedSource {
    text: String,
}

impl FixedSource {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl SourceProvider for FixedSource {
    fn load_random(&mut self) -> TypingResult<SourceText> {
        Ok(SourceText::new(&self.text))
    }
}
