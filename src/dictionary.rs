use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use simple_log::{debug, error};

use crate::trie::Trie;
use crate::util::normalize_word;

pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, thiserror::Error)]
pub enum DictionaryError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported snapshot version: {0}")]
    UnsupportedVersion(u32),

    #[error("invalid entry {0:?}: frequency must be at least 1")]
    InvalidEntry(String),
}

#[derive(Debug, Serialize, Deserialize)]
struct WordEntry {
    word: String,
    frequency: u64,
}

/// On-disk form of a trie: every word with its frequency, in the order
/// returned by [`Trie::words`], so loading restores child order too.
#[derive(Debug, Serialize, Deserialize)]
struct Snapshot {
    version: u32,
    words: Vec<WordEntry>,
}

impl Snapshot {
    fn from_trie(trie: &Trie) -> Self {
        Snapshot {
            version: SNAPSHOT_VERSION,
            words: trie
                .words()
                .into_iter()
                .map(|(word, frequency)| WordEntry { word, frequency })
                .collect(),
        }
    }

    fn into_trie(self) -> Result<Trie, DictionaryError> {
        if self.version != SNAPSHOT_VERSION {
            return Err(DictionaryError::UnsupportedVersion(self.version));
        }
        let mut trie = Trie::new();
        for entry in self.words {
            if entry.frequency == 0 {
                return Err(DictionaryError::InvalidEntry(entry.word));
            }
            trie.insert_with_frequency(&entry.word, entry.frequency);
        }
        Ok(trie)
    }
}

pub fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = home::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

pub fn load_snapshot(path: &Path) -> Result<Trie, DictionaryError> {
    let reader = BufReader::new(File::open(path)?);
    let snapshot: Snapshot = serde_json::from_reader(reader)?;
    snapshot.into_trie()
}

fn write_snapshot(snapshot: &Snapshot, path: &Path) -> Result<(), DictionaryError> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer(&mut writer, snapshot)?;
    writer.flush()?;
    Ok(())
}

/// Writes to `<path>.tmp` first and renames it over `path`; the temp file is
/// removed again when any step fails.
pub fn save_snapshot(trie: &Trie, path: &Path) -> Result<(), DictionaryError> {
    let snapshot = Snapshot::from_trie(trie);
    let mut temp_name = path.as_os_str().to_owned();
    temp_name.push(".tmp");
    let temp_path = PathBuf::from(temp_name);

    let result = write_snapshot(&snapshot, &temp_path)
        .and_then(|()| fs::rename(&temp_path, path).map_err(DictionaryError::from));
    if let Err(e) = result {
        if let Err(remove_error) = fs::remove_file(&temp_path) {
            debug!("no temp file to remove at {}: {}", temp_path.display(), remove_error);
        }
        return Err(e);
    }
    debug!("saved {} words to {}", snapshot.words.len(), path.display());
    Ok(())
}

fn word_list_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(\S+)(?:\s+(\d+))?$").expect("word list pattern is valid")
    })
}

/// Inserts every `word [count]` line of `content`; returns the number of
/// entries taken.
pub fn parse_word_list(content: &str, trie: &mut Trie, keep_case: bool) -> usize {
    let mut inserted = 0;
    for (line_number, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let captures = match word_list_pattern().captures(line) {
            Some(captures) => captures,
            None => {
                error!("word list line {}: malformed entry {:?}", line_number + 1, line);
                continue;
            }
        };
        let count = match captures.get(2) {
            Some(count) => match count.as_str().parse::<u64>() {
                Ok(count) if count > 0 => count,
                _ => {
                    error!("word list line {}: bad count {:?}", line_number + 1, count.as_str());
                    continue;
                }
            },
            None => 1,
        };

        let word = normalize_word(&captures[1], keep_case);
        trie.insert_with_frequency(&word, count);
        inserted += 1;
    }
    inserted
}

pub fn load_word_list(
    path: &Path,
    trie: &mut Trie,
    keep_case: bool,
) -> Result<usize, DictionaryError> {
    let content = fs::read_to_string(path)?;
    Ok(parse_word_list(&content, trie, keep_case))
}
