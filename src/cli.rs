use std::path::PathBuf;

use clap::Parser;

use crate::{DedupScope, FetchOptions, Rating, Verbosity};

#[derive(Parser, Debug)]
#[clap(name = "Downbooru", author, version, about = "Tool for downloading images from gelbooru.com", long_about = None)]
pub struct Cli {
    /// Image tags to search
    #[clap(value_parser, default_value = "rick_astley")]
    pub tags: Vec<String>,

    /// Disable filtering the "furry" tag
    #[clap(short, long, action, help_heading = "GENERAL")]
    pub furry: bool,

    /// Number 0-3 indicating the minimum safety rating of requested images.
    ///
    /// 3 is absolute SFW (gelbooru usually has very few of those, hence the default of 2) and 0
    /// includes explicit NSFW. Values out of range are clamped.
    #[clap(
        short,
        long,
        value_name = "LEVEL",
        default_value_t = 2,
        allow_negative_numbers = true,
        help_heading = "GENERAL"
    )]
    pub safety: i64,

    /// Custom path for saving images [default: img/<tags>]
    #[clap(short, long, value_name = "PATH", help_heading = "SAVE")]
    pub dir: Option<PathBuf>,

    /// How long perceptual fingerprints are remembered when dropping duplicate images
    #[clap(long, value_enum, default_value_t = DedupScope::Page, help_heading = "SAVE")]
    pub dedup_scope: DedupScope,

    /// Download a single post by its ID instead of searching
    #[clap(long, value_name = "ID", help_heading = "DOWNLOAD")]
    pub post: Option<u64>,

    /// Request timeout in seconds [default: from config, or 30]
    #[clap(long, value_name = "SECS", help_heading = "DOWNLOAD")]
    pub timeout: Option<u64>,

    /// Disable all output
    #[clap(short, long, action, help_heading = "GENERAL")]
    pub quiet: bool,

    /// Enable debug output
    #[clap(short, long, action, conflicts_with("quiet"), help_heading = "GENERAL")]
    pub verbose: bool,
}

impl Cli {
    #[inline]
    pub fn min_rating(&self) -> Rating {
        Rating::from_level(self.safety)
    }

    #[inline]
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.quiet, self.verbose)
    }

    pub fn fetch_options(&self) -> FetchOptions {
        FetchOptions {
            tags: self.tags.clone(),
            min_rating: self.min_rating(),
            include_furry: self.furry,
            output_dir: self.dir.clone(),
            dedup_scope: self.dedup_scope,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cli = Cli::parse_from(["downbooru"]);
        assert_eq!(cli.tags, vec!["rick_astley"]);
        assert_eq!(cli.min_rating(), Rating::Sensitive);
        assert_eq!(cli.verbosity(), Verbosity::Normal);

        let opts = cli.fetch_options();
        assert!(!opts.include_furry);
        assert_eq!(opts.dedup_scope, DedupScope::Page);
        assert_eq!(opts.output_dir, None);
    }

    #[test]
    fn safety_is_clamped() {
        let cli = Cli::parse_from(["downbooru", "cat", "--safety", "9"]);
        assert_eq!(cli.min_rating(), Rating::General);

        let cli = Cli::parse_from(["downbooru", "cat", "-s", "-4"]);
        assert_eq!(cli.min_rating(), Rating::Explicit);
    }

    #[test]
    fn flags_map_into_options() {
        let cli = Cli::parse_from([
            "downbooru",
            "Deep Rock Galactic",
            "dwarf",
            "-f",
            "-d",
            "out",
            "--dedup-scope",
            "run",
            "-v",
        ]);
        let opts = cli.fetch_options();
        assert_eq!(opts.tags, vec!["Deep Rock Galactic", "dwarf"]);
        assert!(opts.include_furry);
        assert_eq!(opts.output_dir, Some(PathBuf::from("out")));
        assert_eq!(opts.dedup_scope, DedupScope::Run);
        assert_eq!(cli.verbosity(), Verbosity::Verbose);
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        assert!(Cli::try_parse_from(["downbooru", "-q", "-v"]).is_err());
    }
}
