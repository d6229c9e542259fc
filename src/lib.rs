//! Chess rules engine and deterministic game-state machine.
//!
//! The crate is split in two layers. [`chess`] implements the rules: board
//! and piece primitives, pseudo-legal move generation, the legality filter
//! and the pure snapshot transition. [`game`] implements the state machine a
//! user interface drives: an append-only history of snapshots with an
//! undo/redo cursor, a closed set of actions with a pure reducer, and a
//! controller facade translating clicks into actions.
//!
//! All state is represented as immutable values: every transition produces a
//! brand-new aggregate, so hosts can detect changes by plain equality.

#![warn(missing_docs, variant_size_differences)]
// Rustc lints.
#![warn(
    absolute_paths_not_starting_with_crate,
    keyword_idents,
    trivial_casts,
    trivial_numeric_casts,
    unreachable_pub,
    unused_extern_crates,
    unused_import_braces,
    unused_lifetimes,
    unused_qualifications
)]
// Rustdoc lints.
#![warn(
    rustdoc::private_doc_tests,
    rustdoc::broken_intra_doc_links,
    rustdoc::invalid_codeblock_attributes,
    rustdoc::invalid_html_tags,
    rustdoc::invalid_rust_codeblocks,
    rustdoc::bare_urls
)]
// Clippy lints.
#![warn(
    clippy::correctness,
    clippy::suspicious,
    clippy::style,
    clippy::complexity,
    clippy::pedantic
)]

pub mod chess;
pub mod game;
