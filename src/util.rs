use tower_lsp::lsp_types::*;

pub fn valid_token_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

pub fn is_token(current: &[char], min_len: usize) -> bool {
    if current.len() < min_len {
        return false;
    }
    if let Some(first_char) = current.first() {
        if first_char.is_ascii_digit() {
            return false;
        }
    }
    true
}

pub fn process_token(token: &str, min_len: usize) -> Vec<String> {
    let mut cleaned = Vec::new();
    let mut current: Vec<char> = Vec::new();
    for ch in token.chars() {
        if !valid_token_char(ch) {
            if is_token(&current, min_len) {
                cleaned.push(current.iter().collect());
            }
            current.clear();
        } else {
            current.push(ch);
        }
    }

    if is_token(&current, min_len) {
        cleaned.push(current.iter().collect());
    }
    cleaned
}

pub fn normalize_word(word: &str, keep_case: bool) -> String {
    if keep_case {
        word.to_string()
    } else {
        word.to_lowercase()
    }
}

/// Normalized tokens of `content`, in the order they appear.
pub fn tokenize_words(content: &str, min_len: usize, keep_case: bool) -> Vec<String> {
    content
        .split_whitespace()
        .flat_map(|token| process_token(token, min_len))
        .map(|word| normalize_word(&word, keep_case))
        .collect()
}

/// Converts an LSP column, counted in UTF-16 code units, to a char index
/// into `line`, clamped to the line length.
pub fn utf16_to_char_index(line: &str, character: u32) -> usize {
    let mut units = 0usize;
    for (index, ch) in line.chars().enumerate() {
        if units >= character as usize {
            return index;
        }
        units += ch.len_utf16();
    }
    line.chars().count()
}

fn token_start(line: &[char], end: usize) -> usize {
    let mut start = end;
    while start > 0 && valid_token_char(line[start - 1]) {
        start -= 1;
    }
    start
}

pub fn get_word_prefix(current_line: &str, character: usize) -> String {
    let line: Vec<char> = current_line.chars().collect();
    let end = character.min(line.len());
    line[token_start(&line, end)..end].iter().collect()
}

pub fn get_possible_current_word(current_line: &str, character: usize) -> Vec<String> {
    let mut possible: Vec<String> = Vec::new();
    let line: Vec<char> = current_line.chars().collect();
    let mut i = token_start(&line, character.min(line.len()));
    let mut current = Vec::new();
    while i < line.len() && valid_token_char(line[i]) {
        current.push(line[i]);
        possible.push(current.iter().collect());
        i += 1;
    }

    possible
}

pub fn ranked_to_completion_items(
    ranked: Vec<(String, u64)>,
    suffixes: &[String],
    completions: &mut Vec<CompletionItem>,
) {
    let items: Vec<CompletionItem> = ranked
        .into_iter()
        .filter(|(word, _)| !suffixes.contains(word))
        .enumerate()
        .map(|(rank, (word, frequency))| CompletionItem {
            label: word.clone(),
            kind: Some(CompletionItemKind::TEXT),
            detail: Some(format!("frequency: {}", frequency)),
            sort_text: Some(format!("{:02}", rank)),
            filter_text: Some(word),
            ..CompletionItem::default()
        })
        .collect();
    completions.extend(items);
}
