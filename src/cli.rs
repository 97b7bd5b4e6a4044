//! CLI definitions for mailquill.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::compose::PromptMode;

/// mailquill CLI.
#[derive(Parser)]
#[command(name = "mailquill")]
#[command(about = "Draft webmail replies and insert them into the open editor")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path (default: ~/.mailquill/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// The page an operation runs against.
#[derive(Args, Debug, Clone)]
pub(crate) struct PageArgs {
    /// Page file: `.html` markup or a `.json` DevTools DOM snapshot
    #[arg(long)]
    pub page: PathBuf,

    /// Page URL, used to recognize the provider (overrides the snapshot URL)
    #[arg(long)]
    pub url: Option<String>,

    /// Write the resulting body HTML to this file
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Answer JSON-lines requests on stdin with responses on stdout
    Serve {
        #[command(flatten)]
        page: PageArgs,
    },

    /// Insert text into the editor that is already open
    Insert {
        #[command(flatten)]
        page: PageArgs,

        /// Text to insert
        #[arg(long)]
        text: String,
    },

    /// Open a reply or new message if needed, then insert text
    OpenAndInsert {
        #[command(flatten)]
        page: PageArgs,

        /// Text to insert
        #[arg(long)]
        text: String,
    },

    /// Print the visible text of the displayed thread
    ReadThread {
        #[command(flatten)]
        page: PageArgs,
    },

    /// Generate a reply and insert it
    Reply {
        #[command(flatten)]
        page: PageArgs,

        /// How the prompt is built
        #[arg(long, value_enum, default_value_t = PromptMode::Auto)]
        mode: PromptMode,

        /// Correction instruction (correct mode) or full prompt (manual mode)
        #[arg(long, alias = "prompt")]
        instruction: Option<String>,
    },
}

impl Commands {
    pub fn page(&self) -> &PageArgs {
        match self {
            Self::Serve { page }
            | Self::Insert { page, .. }
            | Self::OpenAndInsert { page, .. }
            | Self::ReadThread { page }
            | Self::Reply { page, .. } => page,
        }
    }
}
