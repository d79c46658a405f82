//! CLI command definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Alexandria - Semantic Scholar paper search, recommendations, and BibTeX export
#[derive(Parser, Debug)]
#[command(name = "alexandria")]
#[command(about = "Semantic Scholar paper search, recommendations, and BibTeX export", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Search for papers by keyword
    Search {
        /// Search query
        query: String,

        /// Publication year or range, e.g. 2020 or 2020-2024
        #[arg(long)]
        year: Option<String>,

        /// Only return papers with at least this many citations
        #[arg(long)]
        min_citations: Option<u64>,

        /// Restrict results to a field of study (repeatable)
        #[arg(long = "field")]
        fields_of_study: Vec<String>,

        /// Maximum number of results
        #[arg(short, long, default_value = "10")]
        limit: u64,
    },

    /// Fetch one paper by ID (Semantic Scholar ID, DOI:<doi>, or ARXIV:<id>)
    Paper {
        /// Paper identifier
        paper_id: String,

        /// Skip the AI-generated TLDR summary
        #[arg(long)]
        no_tldr: bool,
    },

    /// List papers that cite the given paper
    Citations {
        /// Paper identifier
        paper_id: String,

        /// Maximum number of citing papers
        #[arg(short, long, default_value = "100")]
        limit: u64,

        /// Filter citing papers by year or range, e.g. 2020 or 2020-2024
        #[arg(long)]
        year: Option<String>,
    },

    /// List papers the given paper cites
    References {
        /// Paper identifier
        paper_id: String,

        /// Maximum number of referenced papers
        #[arg(short, long, default_value = "100")]
        limit: u64,
    },

    /// Search for authors by name
    Authors {
        /// Author name to search for
        query: String,

        /// Maximum number of results
        #[arg(short, long, default_value = "10")]
        limit: u64,
    },

    /// Fetch one author with their recent papers
    Author {
        /// Author identifier
        author_id: String,

        /// Skip the author's paper list
        #[arg(long)]
        no_papers: bool,

        /// Maximum number of papers to include
        #[arg(long, default_value = "10")]
        papers_limit: u64,
    },

    /// Recommend papers similar to a seed paper
    Recommend {
        /// Seed paper identifier
        paper_id: String,

        /// Maximum number of recommendations
        #[arg(short, long, default_value = "10")]
        limit: u64,

        /// Recommendation pool: "recent" or "all-cs"
        #[arg(long, default_value = "recent")]
        pool: String,
    },

    /// Recommend papers from positive (and optional negative) examples
    Related {
        /// Positive example paper IDs
        #[arg(required = true)]
        paper_ids: Vec<String>,

        /// Negative example paper IDs (repeatable)
        #[arg(long = "negative", value_name = "PAPER_ID")]
        negative_ids: Vec<String>,

        /// Maximum number of recommendations
        #[arg(short, long, default_value = "10")]
        limit: u64,
    },

    /// Export papers as BibTeX
    Export {
        /// Paper IDs to export (fetched if not already tracked)
        paper_ids: Vec<String>,

        /// Only export papers tracked by this tool
        #[arg(long)]
        source_tool: Option<String>,

        /// Include abstracts in the entries
        #[arg(long)]
        include_abstract: bool,

        /// Omit URL fields
        #[arg(long)]
        no_url: bool,

        /// Omit DOI fields
        #[arg(long)]
        no_doi: bool,

        /// Include fields of study as keywords
        #[arg(long)]
        keywords: bool,

        /// Truncate author lists longer than this (0 keeps all authors)
        #[arg(long, default_value = "0")]
        max_authors: u64,

        /// Citation key style: author_year, author_year_title, or paper_id
        #[arg(long, default_value = "author_year")]
        cite_key_format: String,

        /// Write the BibTeX to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Inspect or maintain the response cache
    #[command(subcommand)]
    Cache(CacheCommands),

    /// List the available tools
    Tools,
}

/// Cache maintenance subcommands
#[derive(Subcommand, Debug)]
pub enum CacheCommands {
    /// Show cache hit statistics
    Stats,

    /// Drop every cached response
    Clear,

    /// Drop cached responses whose key contains a substring
    Invalidate {
        /// Substring to match against cache keys
        pattern: String,
    },
}
