use std::{net::SocketAddr, path::Path, sync::Arc};

use clap::Parser;
use docseek::{
    Corpus,
    DataDir,
    Error,
    IndexStore,
    Ranker,
    Result,
    extract::FileExtractor,
    index_builder,
    search::{self, SearchParams},
    server::{self, AppState},
};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

mod cli;

use cli::{Cli, Command};

fn init_tracing(verbose: u8, quiet: bool) {
    let filter = if let Ok(env) = std::env::var("DOCSEEK_LOG") {
        EnvFilter::new(env)
    } else if quiet {
        EnvFilter::new("warn")
    } else {
        match verbose {
            0 => EnvFilter::new("info"),
            1 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    if let Command::Completions(args) = &cli.command {
        args.generate();
        return Ok(());
    }

    let data_dir = DataDir::resolve(cli.data_dir.as_deref())?;
    let store = IndexStore::new(data_dir.index_file(cli.index_file.as_deref()));

    match cli.command {
        Command::Index(args) => cmd_index(&store, &args.root)?,
        Command::Search(args) => {
            let corpus = load_index(&store)?;
            let ranker = Ranker::new(args.fuzzy_threshold);
            let params = SearchParams {
                query: args.query.clone(),
                count: args.count,
                all: args.all,
                min_score: args.min_score,
            };

            let results = search::execute_search(&params, &corpus, &ranker);

            if args.json {
                search::format_json(&results, &args.query)?;
            } else if args.files {
                search::format_files(&results);
            } else {
                search::format_human(&results);
            }
        }
        Command::Serve(args) => {
            let corpus = load_index(&store)?;
            let addr: SocketAddr = format!("{}:{}", args.host, args.port)
                .parse()
                .map_err(|e| {
                    Error::Config(format!(
                        "invalid listen address {}:{}: {e}",
                        args.host, args.port
                    ))
                })?;

            let mut state =
                AppState::new(corpus, Ranker::new(args.fuzzy_threshold));
            state.limit = args.limit;

            let runtime = tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()?;
            runtime.block_on(server::serve(addr, Arc::new(state)))?;
        }
        Command::Status(args) => cmd_status(&data_dir, &store, args.json)?,
        Command::Completions(_) => {}
    }

    Ok(())
}

fn cmd_index(store: &IndexStore, root: &Path) -> Result<()> {
    if !root.is_dir() {
        return Err(Error::Config(format!(
            "path is not a directory: {}",
            root.display()
        )));
    }

    let corpus = index_builder::index_directory(root, &FileExtractor)?;
    store.save(&corpus)?;

    eprintln!(
        "Indexed {} documents ({} distinct terms) into {}",
        corpus.len(),
        corpus.vocabulary_size(),
        store.path().display()
    );
    Ok(())
}

fn load_index(store: &IndexStore) -> Result<Corpus> {
    if !store.exists() {
        return Err(Error::NotFound {
            kind: "index",
            name: format!(
                "{} (run `docseek index <DIR>` first)",
                store.path().display()
            ),
        });
    }

    store.load()
}

#[derive(Serialize)]
struct StatusReport {
    data_dir: String,
    index_file: String,
    indexed: bool,
    documents: usize,
    terms: usize,
}

fn cmd_status(data_dir: &DataDir, store: &IndexStore, json: bool) -> Result<()> {
    let corpus = if store.exists() {
        Some(store.load()?)
    } else {
        None
    };

    let report = StatusReport {
        data_dir: data_dir.root().display().to_string(),
        index_file: store.path().display().to_string(),
        indexed: corpus.is_some(),
        documents: corpus.as_ref().map_or(0, Corpus::len),
        terms: corpus.as_ref().map_or(0, Corpus::vocabulary_size),
    };

    if json {
        println!("{}", serde_json::to_string(&report)?);
    } else {
        println!("Data directory: {}", report.data_dir);
        println!("Index file: {}", report.index_file);
        if report.indexed {
            println!("Documents: {}", report.documents);
            println!("Terms: {}", report.terms);
        } else {
            println!("No index yet. Run `docseek index <DIR>`.");
        }
    }
    Ok(())
}
