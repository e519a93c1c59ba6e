use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use git_release::cli::{run_release, ReleaseArgs};
use git_release::config;
use git_release::domain::VersionBump;
use git_release::git::Git2Repository;
use git_release::report::Reporter;
use git_release::{logging, ui};

#[derive(clap::Parser)]
#[command(
    name = "git-release",
    version,
    about = "Bump the version, update the changelog, and publish a tagged release"
)]
struct Args {
    #[arg(help = "Release message; each line becomes a changelog bullet")]
    message: String,

    #[arg(value_enum, default_value_t = BumpArg::Patch, help = "Version segment to increment")]
    bump: BumpArg,

    #[arg(short, long, help = "Changelog category (feature, fix, refactor, chore, docs, ...)")]
    category: Option<String>,

    #[arg(short, long, help = "Preview what would happen without making changes")]
    dry_run: bool,

    #[arg(long, help = "Custom configuration file path")]
    config: Option<PathBuf>,

    #[arg(short, long, help = "Log git and file operations")]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum BumpArg {
    Major,
    Minor,
    Patch,
}

impl From<BumpArg> for VersionBump {
    fn from(arg: BumpArg) -> Self {
        match arg {
            BumpArg::Major => VersionBump::Major,
            BumpArg::Minor => VersionBump::Minor,
            BumpArg::Patch => VersionBump::Patch,
        }
    }
}

fn main() {
    let args = Args::parse();
    logging::init(args.verbose);

    let mut reporter = ui::ConsoleReporter::new();
    if let Err(e) = run(args, &mut reporter) {
        reporter.error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

fn run(args: Args, reporter: &mut ui::ConsoleReporter) -> Result<()> {
    let root = std::env::current_dir().context("Cannot determine current directory")?;
    let config = config::load_config(args.config.as_deref(), &root)?;

    let repo = Git2Repository::open(&root).context("Not in a git repository")?;

    let release_args = ReleaseArgs {
        message: args.message,
        bump: args.bump.into(),
        category: args.category,
        dry_run: args.dry_run,
    };

    let today = chrono::Local::now().date_naive();
    let outcome = run_release(&release_args, &config, &root, &repo, today, reporter)?;

    match &outcome.published {
        Some(published) => reporter.success(&format!(
            "Published {} ({} → {}) on {}",
            outcome.tag, outcome.previous, outcome.version, published.branch
        )),
        None => reporter.info("Run without --dry-run to apply these changes"),
    }

    if !outcome.skipped_files.is_empty() {
        reporter.warning(&format!(
            "{} versioned file(s) were not updated",
            outcome.skipped_files.len()
        ));
    }

    Ok(())
}
