use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use colored::*;
use std::path::PathBuf;

use crate::config::Config;
use crate::listing::ListFilter;
use crate::logging;
use crate::output::{self, OutputMode};
use crate::progress;
use crate::session::{Session, SortKey, SortOrder};
use crate::utils::display_path;

#[derive(Parser)]
#[command(name = "sigscan")]
#[command(version)]
#[command(about = "List the PDFs in a folder and show which ones are digitally signed")]
#[command(long_about = "sigscan looks inside every PDF of a folder for a signature \
    dictionary and reports the signer's declared name. Results are cached per file \
    so later listings are instant.\n\n\
    The signature is only detected, never validated.\n\n\
    Examples:\n  \
    sigscan list ~/invoices           # List a folder and remember it\n  \
    sigscan list --unsigned           # Unsigned documents in the remembered folder\n  \
    sigscan list --sort modified      # Newest first\n  \
    sigscan check contract.pdf --rescan")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase output verbosity (-v, -vv for more)
    #[arg(short = 'v', long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short = 'q', long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List documents in a folder with their signature status
    #[command(visible_alias = "ls")]
    List {
        /// Folder to list (default: the last folder listed)
        path: Option<PathBuf>,

        /// Only signed documents
        #[arg(long, conflicts_with = "unsigned")]
        signed: bool,

        /// Only unsigned documents
        #[arg(long)]
        unsigned: bool,

        /// Sort column
        #[arg(long, value_enum, value_name = "COLUMN")]
        sort: Option<SortArg>,

        /// Sort direction [default: desc, as when clicking a column once]
        #[arg(long, value_enum, requires = "sort")]
        order: Option<OrderArg>,

        /// Output results as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Show the signature status of a single document
    Check {
        /// Document to inspect
        file: PathBuf,

        /// Ignore the cached result and scan again
        #[arg(long)]
        rescan: bool,

        /// Output result as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Inspect the detection cache
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },

    /// Show or change the remembered folder
    Folder {
        /// New folder to remember
        path: Option<PathBuf>,
    },

    /// View or reset configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub enum CacheAction {
    /// Print every cached result
    Show,
    /// Print the cache file location
    Path,
    /// Forget every cached result
    Clear,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the active configuration
    Show,
    /// Print the config file location
    Path,
    /// Restore default settings
    Reset,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SortArg {
    Name,
    Modified,
    Signed,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OrderArg {
    Asc,
    Desc,
}

impl From<SortArg> for SortKey {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Name => SortKey::Name,
            SortArg::Modified => SortKey::Modified,
            SortArg::Signed => SortKey::Signed,
        }
    }
}

impl From<OrderArg> for SortOrder {
    fn from(arg: OrderArg) -> Self {
        match arg {
            OrderArg::Asc => SortOrder::Ascending,
            OrderArg::Desc => SortOrder::Descending,
        }
    }
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    pub fn run(self) -> anyhow::Result<()> {
        let output_mode = if self.quiet {
            OutputMode::Quiet
        } else if self.verbose >= 2 {
            OutputMode::VeryVerbose
        } else if self.verbose == 1 {
            OutputMode::Verbose
        } else {
            OutputMode::Normal
        };

        logging::init_tracing(match output_mode {
            OutputMode::Quiet => "error",
            OutputMode::Normal => "warn",
            OutputMode::Verbose => "info",
            OutputMode::VeryVerbose => "debug",
        });

        let config = Config::load();

        match self.command {
            Commands::List { path, signed, unsigned, sort, order, json } => {
                let filter = if signed {
                    ListFilter::SignedOnly
                } else if unsigned {
                    ListFilter::UnsignedOnly
                } else {
                    ListFilter::All
                };

                let mut session = Session::open(&config);
                if let Some(path) = path {
                    if let Err(e) = session.select_folder(&path) {
                        eprintln!("{} Could not remember folder: {:#}", "Warning:".yellow(), e);
                    }
                }

                if !session.folder().is_dir() {
                    eprintln!(
                        "{} Cannot read folder {}",
                        "Warning:".yellow(),
                        display_path(session.folder())
                    );
                }

                let spinner = if output_mode != OutputMode::Quiet && !json {
                    Some(progress::create_spinner("Checking documents..."))
                } else {
                    None
                };
                let mut checked = 0usize;
                session.refresh_with_progress(filter, |path| {
                    checked += 1;
                    if let Some(ref sp) = spinner {
                        let name = path.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
                        sp.set_message(format!("Checking {} ({})", name, checked));
                    }
                });
                if let Some(sp) = spinner {
                    sp.finish_and_clear();
                }

                if let Some(key) = sort {
                    let order = order.map(SortOrder::from).unwrap_or(SortOrder::Descending);
                    session.sort_with(key.into(), order);
                }

                if json {
                    output::print_json(session.folder(), session.entries())?;
                } else {
                    output::print_human(session.folder(), session.entries(), output_mode);
                }
                Ok(())
            }

            Commands::Check { file, rescan, json } => {
                let mut session = Session::open(&config);
                let result = if rescan {
                    session.rescan(&file)
                } else {
                    session.check(&file)
                };

                if json {
                    output::print_detection_json(&file, &result)?;
                } else {
                    output::print_detection(&file, &result, output_mode);
                }
                Ok(())
            }

            Commands::Cache { action } => {
                let mut session = Session::open(&config);
                match action {
                    CacheAction::Show => {
                        let cache = session.cache();
                        if cache.is_empty() {
                            println!("{}", "Cache is empty.".dimmed());
                        }
                        for (key, result) in cache.entries() {
                            let label = if result.is_signed { "Yes".green() } else { "No".red() };
                            println!("{:<4} {:<24} {}", label, result.signer, key);
                        }
                    }
                    CacheAction::Path => {
                        println!("{}", display_path(session.cache().path()));
                    }
                    CacheAction::Clear => {
                        let count = session.cache().len();
                        session.cache_mut().clear()?;
                        if output_mode != OutputMode::Quiet {
                            println!("Removed {} cached results", count);
                        }
                    }
                }
                Ok(())
            }

            Commands::Folder { path } => {
                let mut session = Session::open(&config);
                match path {
                    Some(path) => {
                        session.select_folder(&path)?;
                        if output_mode != OutputMode::Quiet {
                            println!("Remembered {}", display_path(session.folder()));
                        }
                    }
                    None => match session.preference().last_folder() {
                        Some(folder) => println!("{}", display_path(folder)),
                        None => println!("{}", "No folder remembered yet.".dimmed()),
                    },
                }
                Ok(())
            }

            Commands::Config { action } => {
                match action {
                    ConfigAction::Show => print!("{}", Config::load_or_create().to_toml()?),
                    ConfigAction::Path => println!("{}", display_path(&Config::config_path()?)),
                    ConfigAction::Reset => {
                        Config::default().save()?;
                        if output_mode != OutputMode::Quiet {
                            println!("Configuration reset to defaults");
                        }
                    }
                }
                Ok(())
            }
        }
    }
}
