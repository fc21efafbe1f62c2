//! CLI module for Syllabus.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Syllabus - ask questions about your course transcripts
///
/// Loads pre-chunked course transcripts into a vector index and answers
/// questions with a language model that can search content and look up
/// course outlines.
#[derive(Parser, Debug)]
#[command(name = "syllabus")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "SYLLABUS_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Ask one or more questions about the course materials
    Ask {
        /// The question(s) to ask
        #[arg(required = true)]
        questions: Vec<String>,

        /// Answer the questions as one conversation, so later ones see earlier answers
        #[arg(short, long)]
        session: bool,
    },

    /// Start an interactive chat session
    Chat,

    /// List loaded courses
    Courses,

    /// Show the outline of a course
    Outline {
        /// Course title (partial names work)
        course: String,
    },

    /// Search course content without generating an answer
    Search {
        /// Search query
        query: String,

        /// Restrict to a course (partial names work)
        #[arg(short = 'C', long)]
        course: Option<String>,

        /// Restrict to a lesson number
        #[arg(short, long)]
        lesson: Option<u32>,
    },

    /// Load pre-chunked course documents (JSON)
    Load {
        /// Course document files
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Remove all existing courses first
        #[arg(long)]
        clear: bool,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Write the default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}
