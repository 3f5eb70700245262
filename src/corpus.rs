use glob::glob;
use simple_log::{error, info};
use std::fs;
use std::path::Path;

use crate::dictionary::expand_home;
use crate::trie::Trie;
use crate::util::tokenize_words;

fn read_corpus_file(path: &Path, trie: &mut Trie, min_word_len: usize, keep_case: bool) -> usize {
    match fs::read_to_string(path) {
        Ok(content) => {
            let words = tokenize_words(&content, min_word_len, keep_case);
            for word in words.iter() {
                trie.insert(word);
            }
            words.len()
        }
        Err(e) => {
            error!("fail to read corpus file {}: {:?}", path.display(), e);
            0
        }
    }
}

/// Inserts every token of every file matching `pattern`, in file then text
/// order. Returns the number of occurrences recorded.
pub fn prepare_corpus(
    pattern: &str,
    trie: &mut Trie,
    min_word_len: usize,
    keep_case: bool,
) -> usize {
    let target = expand_home(pattern).display().to_string();
    let mut recorded = 0;
    match glob(&target) {
        Ok(paths) => {
            for entry in paths {
                match entry {
                    Ok(path) => {
                        let count = read_corpus_file(&path, trie, min_word_len, keep_case);
                        info!("learned {} words from {}", count, path.display());
                        recorded += count;
                    }
                    Err(e) => {
                        error!("{:?}", e);
                    }
                }
            }
        }
        Err(e) => {
            error!("bad corpus pattern {}: {:?}", target, e);
        }
    }
    recorded
}
