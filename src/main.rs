use std::env;
use std::process::ExitCode;

use clap::Parser;
use simple_log::LogConfigBuilder;
use simple_log::{error, info};
use tower_lsp::{LspService, Server};
use veepee_lsp::backend::{Backend, LspArgs};

fn setup_debug_logging() {
    let mut temp_dir = env::temp_dir();
    temp_dir.push("veepee-lsp.log");
    if let Some(log_path) = temp_dir.to_str() {
        let config = LogConfigBuilder::builder()
            .path(log_path)
            .build();
        if let Err(_e) = simple_log::new(config) {
            error!("fail to setup log {}", log_path);
            return;
        }
    }
}

fn run_query(args: &LspArgs, prefix: &str) -> ExitCode {
    let (trie, errors) = args.prepare_trie();
    for e in errors.iter() {
        eprintln!("fail to load dictionary: {}", e);
    }
    for word in trie.suggest(&args.normalize(prefix)) {
        println!("{}", word);
    }
    if errors.is_empty() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = LspArgs::parse();

    if args.debug {
        setup_debug_logging();
    }

    if let Some(prefix) = args.query.clone() {
        return run_query(&args, &prefix);
    }

    let (trie, _) = args.prepare_trie();
    info!("serving {} known words", trie.len());

    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();
    let (service, socket) = LspService::new(|_| Backend::new(args, trie));
    Server::new(stdin, stdout, socket).serve(service).await;
    ExitCode::SUCCESS
}
