use crate::corpus::*;
use crate::dictionary::*;
use crate::trie::*;
use crate::util::*;

use clap::Parser;
use hashbrown::HashMap;
use simple_log::*;
use tokio::sync::{Mutex, RwLock};
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;
use tower_lsp::*;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct LspArgs {
    /// JSON snapshot to load at startup
    #[arg(long)]
    dictionary: Option<String>,
    /// Plain text list of `word [count]` lines
    #[arg(long)]
    word_list: Option<String>,
    /// Glob of text files to learn words from
    #[arg(long)]
    corpus: Option<String>,
    /// Where to write a JSON snapshot on shutdown
    #[arg(long)]
    save_dictionary: Option<String>,
    #[arg(long, default_value_t = 2)]
    min_word_len: usize,
    #[arg(long)]
    keep_case: bool,
    /// Print suggestions for this prefix and exit
    #[arg(long)]
    pub query: Option<String>,
    #[arg(long)]
    pub debug: bool,
}

impl LspArgs {
    /// Loads every configured source into one trie. A source that fails is
    /// skipped and its error returned alongside whatever did load.
    pub fn prepare_trie(&self) -> (Trie, Vec<DictionaryError>) {
        let mut errors = Vec::new();
        let mut trie = Trie::new();
        if let Some(path) = &self.dictionary {
            let path = expand_home(path);
            match load_snapshot(&path) {
                Ok(loaded) => {
                    info!("loaded {} words from {}", loaded.len(), path.display());
                    trie = loaded;
                }
                Err(e) => {
                    error!("fail to load dictionary {}: {}", path.display(), e);
                    errors.push(e);
                }
            }
        }

        if let Some(path) = &self.word_list {
            let path = expand_home(path);
            match load_word_list(&path, &mut trie, self.keep_case) {
                Ok(inserted) => info!("loaded {} entries from {}", inserted, path.display()),
                Err(e) => {
                    error!("fail to load word list {}: {}", path.display(), e);
                    errors.push(e);
                }
            }
        }

        if let Some(pattern) = &self.corpus {
            prepare_corpus(pattern, &mut trie, self.min_word_len, self.keep_case);
        }
        (trie, errors)
    }

    pub fn normalize(&self, word: &str) -> String {
        normalize_word(word, self.keep_case)
    }
}

/// Records the occurrences in `words` that go beyond the counts already
/// recorded for the same document, so re-syncing unchanged text learns
/// nothing. Returns the number of insertions.
pub fn learn_words(
    trie: &mut Trie,
    recorded: &mut HashMap<String, u64>,
    words: &[String],
) -> usize {
    let mut running: HashMap<&str, u64> = HashMap::new();
    let mut learned = 0;
    for word in words.iter() {
        let count = running.entry(word.as_str()).or_insert(0);
        *count += 1;
        let seen = recorded.entry_ref(word.as_str()).or_insert(0);
        if *count > *seen {
            *seen = *count;
            trie.insert(word);
            learned += 1;
        }
    }
    learned
}

#[derive(Debug)]
pub struct Backend {
    documents: Mutex<HashMap<String, String>>,
    recorded: Mutex<HashMap<String, HashMap<String, u64>>>,
    trie: RwLock<Trie>,
    lsp_args: LspArgs,
}

#[tower_lsp::async_trait]
impl LanguageServer for Backend {
    async fn initialize(&self, _: InitializeParams) -> Result<InitializeResult> {
        let trie_lock = self.trie.read().await;
        info!("initialize with {} known words", trie_lock.len());

        Ok(InitializeResult {
            capabilities: ServerCapabilities {
                text_document_sync: Some(TextDocumentSyncCapability::Kind(
                    TextDocumentSyncKind::FULL,
                )),
                completion_provider: Some(CompletionOptions {
                    resolve_provider: Some(false),
                    ..CompletionOptions::default()
                }),
                ..ServerCapabilities::default()
            },
            ..InitializeResult::default()
        })
    }

    async fn shutdown(&self) -> Result<()> {
        info!("shutdown veepee-lsp");
        if let Some(path) = &self.lsp_args.save_dictionary {
            let path = expand_home(path);
            let trie_lock = self.trie.read().await;
            if let Err(e) = save_snapshot(&trie_lock, &path) {
                error!("fail to save dictionary {}: {}", path.display(), e);
            }
        }
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let mut document_lock = self.documents.lock().await;
        let uri = params.text_document.uri.to_string();
        self.add_words(&uri, &params.text_document.text).await;
        document_lock.insert(uri, params.text_document.text);
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        let mut document_lock = self.documents.lock().await;
        document_lock.remove(&params.text_document.uri.to_string());
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let mut document_lock = self.documents.lock().await;

        let uri = params.text_document.uri.to_string();
        if let Some(last_change) = params.content_changes.into_iter().last() {
            self.add_words(&uri, &last_change.text).await;
            document_lock.insert(uri, last_change.text);
        }
    }

    async fn completion(&self, params: CompletionParams) -> Result<Option<CompletionResponse>> {
        let position = params.text_document_position.position;

        let mut completions = Vec::new();
        if let Some(current_line) = self.get_current_line(&params).await {
            let character = utf16_to_char_index(&current_line, position.character);
            let prefix = get_word_prefix(&current_line, character);
            let prefix = self.lsp_args.normalize(&prefix);
            let suffixes: Vec<String> = get_possible_current_word(&current_line, character)
                .iter()
                .map(|word| self.lsp_args.normalize(word))
                .collect();

            let trie_lock = self.trie.read().await;
            let ranked = trie_lock.suggest_ranked(&prefix);
            debug!("prefix {:?} -> {:?}", prefix, ranked);
            ranked_to_completion_items(ranked, &suffixes, &mut completions);
        }
        Ok(Some(CompletionResponse::Array(completions)))
    }
}

impl Backend {
    pub fn new(lsp_args: LspArgs, trie: Trie) -> Self {
        Self {
            documents: Mutex::new(HashMap::new()),
            recorded: Mutex::new(HashMap::new()),
            trie: RwLock::new(trie),
            lsp_args,
        }
    }

    async fn add_words(&self, uri: &str, content: &str) {
        let words = tokenize_words(content, self.lsp_args.min_word_len, self.lsp_args.keep_case);
        let mut recorded_lock = self.recorded.lock().await;
        let recorded = recorded_lock.entry_ref(uri).or_default();
        let mut trie_lock = self.trie.write().await;
        let learned = learn_words(&mut trie_lock, recorded, &words);
        debug!("learned {} occurrences from {}", learned, uri);
    }

    async fn get_current_line(&self, params: &CompletionParams) -> Option<String> {
        let text_document_position = &params.text_document_position;
        let uri = text_document_position.text_document.uri.to_string();
        let document_lock = self.documents.lock().await;
        let position = text_document_position.position;
        if let Some(content) = document_lock.get(&uri) {
            let current_line: Option<&str> = content.split('\n').nth(position.line as usize);
            if let Some(line) = current_line {
                return Some(line.to_string());
            }
        }
        None
    }
}
