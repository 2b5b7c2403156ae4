use std::{
	fs,
	path::{Path, PathBuf},
};

use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::eyre;
use tracing_subscriber::EnvFilter;

use podpaper_domain::{
	document::Paper,
	profile::{Polarity, PreferenceProfile, ProfileSnapshot},
};
use podpaper_service::{PodpaperService, ProfileHandle, ProfileStore};

#[derive(Debug, Parser)]
#[command(
	version = podpaper_cli::VERSION,
	rename_all = "kebab",
	styles = podpaper_cli::styles(),
)]
pub struct Args {
	#[arg(long, short = 'c', value_name = "FILE")]
	pub config: PathBuf,
	#[command(subcommand)]
	pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
	/// Rank papers against a stored profile and print them with their scores.
	Rank(RankArgs),
	/// Apply one verdict on a paper to a stored profile.
	Feedback(FeedbackArgs),
}

#[derive(Debug, clap::Args)]
pub struct RankArgs {
	#[arg(long, value_name = "FILE")]
	pub profile: PathBuf,
	#[arg(long, value_name = "FILE")]
	pub papers: PathBuf,
	#[arg(long, value_name = "N")]
	pub limit: Option<usize>,
	#[arg(long, short = 'o', value_name = "FILE")]
	pub output: Option<PathBuf>,
}

#[derive(Debug, clap::Args)]
pub struct FeedbackArgs {
	#[arg(long, value_name = "FILE")]
	pub profile: PathBuf,
	#[arg(long, value_name = "FILE")]
	pub papers: PathBuf,
	#[arg(long, value_name = "ID")]
	pub paper_id: String,
	#[arg(long, value_enum)]
	pub verdict: Verdict,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Verdict {
	Liked,
	Disliked,
}
impl From<Verdict> for Polarity {
	fn from(verdict: Verdict) -> Self {
		match verdict {
			Verdict::Liked => Self::Liked,
			Verdict::Disliked => Self::Disliked,
		}
	}
}

pub async fn run(args: Args) -> color_eyre::Result<()> {
	let config = podpaper_config::load(&args.config)?;
	let filter = EnvFilter::new(config.service.log_level.clone());

	tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

	let service = PodpaperService::new(config);

	match args.command {
		Command::Rank(cmd) => rank(&service, cmd).await,
		Command::Feedback(cmd) => feedback(&service, cmd).await,
	}
}

async fn rank(service: &PodpaperService, cmd: RankArgs) -> color_eyre::Result<()> {
	let store = ProfileStore::new(&cmd.profile);
	let (_, profile) = load_profile(service, &store).await?;
	let papers = load_papers(&cmd.papers)?;
	let mut ranked = service.rank_papers(&papers, &profile).await;

	tracing::info!(candidates = papers.len(), ranked = ranked.len(), "Ranking finished.");

	if let Some(limit) = cmd.limit {
		ranked.truncate(limit);
	}

	let json = serde_json::to_string_pretty(&ranked)?;

	match cmd.output {
		Some(path) => fs::write(&path, json)?,
		None => println!("{json}"),
	}

	Ok(())
}

async fn feedback(service: &PodpaperService, cmd: FeedbackArgs) -> color_eyre::Result<()> {
	let store = ProfileStore::new(&cmd.profile);
	let (stored, profile) = load_profile(service, &store).await?;
	let papers = load_papers(&cmd.papers)?;
	let paper = papers.iter().find(|paper| paper.id == cmd.paper_id).ok_or_else(|| {
		eyre::eyre!("Paper {} is not listed in {}.", cmd.paper_id, cmd.papers.display())
	})?;
	let handle = ProfileHandle::new(profile);
	let report = service.record_feedback(&handle, paper, cmd.verdict.into()).await?;

	store.save(&handle.into_inner().merged_snapshot(&stored))?;

	let json = serde_json::to_string_pretty(&report)?;

	println!("{json}");

	Ok(())
}

// Returns the stored snapshot next to its hydrated profile so a save can keep unresolved terms.
async fn load_profile(
	service: &PodpaperService,
	store: &ProfileStore,
) -> color_eyre::Result<(ProfileSnapshot, PreferenceProfile)> {
	let Some(stored) = store.load()? else {
		tracing::info!(path = %store.path().display(), "No stored profile. Starting empty.");

		return Ok((ProfileSnapshot::default(), PreferenceProfile::new()));
	};
	let profile = service.hydrate_profile(&stored).await;

	if profile.is_empty() && !stored.values().is_empty() {
		tracing::warn!(
			path = %store.path().display(),
			"No stored profile term could be embedded. Continuing with an empty profile."
		);
	}

	Ok((stored, profile))
}

fn load_papers(path: &Path) -> color_eyre::Result<Vec<Paper>> {
	let raw = fs::read_to_string(path)?;
	let papers: Vec<Paper> = serde_json::from_str(&raw)
		.map_err(|err| eyre::eyre!("Failed to parse papers in {}: {err}", path.display()))?;

	for (index, paper) in papers.iter().enumerate() {
		if paper.id.trim().is_empty() {
			return Err(eyre::eyre!("Paper at index {index} has an empty id."));
		}
	}

	Ok(papers)
}
