//! `mdtoc_core` is the core library for mdtoc. It scans markdown for ATX
//! headings, derives the anchor ids JupyterLab assigns to them, and renders a
//! table of contents that can be spliced into an editor buffer or notebook
//! cell at the cursor.
//!
//! ## Processing Pipeline
//!
//! ```text
//! Markdown text (a document, or every markdown cell of a notebook)
//!   → Heading extractor (skips fenced code, applies the max level)
//!   → Anchor ids (slugify each heading's text)
//!   → Renderer (caption + nested bullet list of links)
//!   → Target (spliced once at the cursor)
//! ```
//!
//! ## Modules
//!
//! - [`config`] — `mdtoc.toml` discovery and the [`TocSettings`] snapshot.
//! - [`notebook`] — the multi-cell [`Notebook`] target and `.ipynb` I/O.
//! - [`position`] — cursor conversions between characters, bytes and
//!   line/column points.
//!
//! ## Quick Start
//!
//! ```rust
//! use mdtoc_core::Document;
//! use mdtoc_core::TocSettings;
//! use mdtoc_core::insert_toc;
//!
//! let mut doc = Document::markdown("# Intro\n\n## Setup\n", 0);
//! let insertion = insert_toc(Some(&mut doc), &TocSettings::default()).unwrap();
//!
//! assert_eq!(insertion.heading_count, 2);
//! assert!(doc.text.starts_with("## Table of Contents\n\n- [Intro](#Intro)\n  - [Setup](#Setup)\n\n"));
//! ```

pub use anchor::*;
pub use command::*;
pub use config::*;
pub use error::*;
pub use heading::*;
pub use notebook::*;
pub use position::*;
pub use render::*;
pub use target::*;

mod anchor;
mod command;
pub mod config;
#[allow(unused_assignments)]
mod error;
mod heading;
pub mod notebook;
pub mod position;
mod render;
mod target;
