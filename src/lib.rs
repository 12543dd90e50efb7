//! docseek - a small local search engine over a directory of documents.
//!
//! Files are split into stemmed terms and weighted with TF-IDF. Queries
//! mix exact words with `*fuzzy*` fragments that are matched against each
//! document's vocabulary, and documents are ranked by cosine similarity.
//!
//! # Quick start
//!
//! ```no_run
//! use docseek::{DataDir, IndexStore, Ranker};
//! use docseek::extract::FileExtractor;
//! use docseek::index_builder::index_directory;
//! use docseek::search::{self, SearchParams};
//!
//! let data_dir = DataDir::resolve(None).unwrap();
//! let store = IndexStore::new(data_dir.index_file(None));
//!
//! let corpus = index_directory("notes".as_ref(), &FileExtractor).unwrap();
//! store.save(&corpus).unwrap();
//!
//! let corpus = store.load().unwrap();
//! let ranker = Ranker::default();
//! let params = SearchParams::new("borrow *checkr*");
//!
//! for r in search::execute_search(&params, &corpus, &ranker) {
//!     println!("{}. {} (score: {:.3})", r.rank, r.path, r.score);
//! }
//! ```

pub mod config;
pub mod corpus;
pub mod data_dir;
pub mod error;
pub mod extract;
pub mod fuzzy;
pub mod index_builder;
pub mod index_store;
pub mod query;
pub mod ranker;
pub mod search;
pub mod server;
pub mod terms;
pub mod walker;

pub use config::FuzzyThreshold;
pub use corpus::{Corpus, Document};
pub use data_dir::DataDir;
pub use error::{Error, Result};
pub use index_store::IndexStore;
pub use query::{ParsedQuery, parse_query};
pub use ranker::{RankedDocument, Ranker};
