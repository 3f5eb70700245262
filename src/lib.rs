pub mod backend;
pub mod corpus;
pub mod dictionary;
pub mod trie;
pub mod util;
