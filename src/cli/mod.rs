pub mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::{MAX_LIMIT, MIN_LIMIT};

#[derive(Parser)]
#[command(name = "xcli", version)]
#[command(about = "Post, read mentions and browse X from the terminal", long_about = None)]
pub struct Cli {
    /// Without a subcommand, an interactive menu starts
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Publish a post
    Post {
        /// Post text; read from stdin when omitted
        text: Option<String>,
        /// Attach an image (repeatable, at most 4)
        #[arg(long = "image", value_name = "PATH")]
        images: Vec<PathBuf>,
    },
    /// Print mentions as JSON, by default only those not seen before
    Mentions {
        /// Include mentions that were already seen
        #[arg(long)]
        all: bool,
        /// Page size
        #[arg(long, value_parser = clap::value_parser!(u8).range(MIN_LIMIT as i64..=MAX_LIMIT as i64))]
        limit: Option<u8>,
    },
    /// Browse and reply to mentions
    Interact {
        /// Page size
        #[arg(long, value_parser = clap::value_parser!(u8).range(MIN_LIMIT as i64..=MAX_LIMIT as i64))]
        limit: Option<u8>,
    },
    /// Browse your own posts and continue them as threads
    Thread {
        /// Page size
        #[arg(long, value_parser = clap::value_parser!(u8).range(MIN_LIMIT as i64..=MAX_LIMIT as i64))]
        limit: Option<u8>,
    },
    /// Browse your home timeline
    Timeline {
        /// Page size
        #[arg(long, value_parser = clap::value_parser!(u8).range(MIN_LIMIT as i64..=MAX_LIMIT as i64))]
        limit: Option<u8>,
    },
    /// Print public metrics of your recent posts as JSON
    #[command(alias = "engagements")]
    Engagement {
        /// Page size
        #[arg(long, value_parser = clap::value_parser!(u8).range(MIN_LIMIT as i64..=MAX_LIMIT as i64))]
        limit: Option<u8>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    #[test]
    fn test_no_subcommand_means_menu() {
        let cli = Cli::try_parse_from(["xcli"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_limit_bounds() {
        for ok in ["5", "100"] {
            let cli = Cli::try_parse_from(["xcli", "timeline", "--limit", ok]).unwrap();
            assert!(matches!(cli.command, Some(Commands::Timeline { limit: Some(_) })));
        }
        for bad in ["4", "101", "-1", "many"] {
            let err = Cli::try_parse_from(["xcli", "mentions", "--limit", bad])
                .err()
                .unwrap();
            assert_eq!(err.exit_code(), 2, "limit {bad}");
        }
    }

    #[test]
    fn test_post_images_repeat() {
        let cli =
            Cli::try_parse_from(["xcli", "post", "hi", "--image", "a.png", "--image", "b.jpg"])
                .unwrap();
        match cli.command {
            Some(Commands::Post { text, images }) => {
                assert_eq!(text.as_deref(), Some("hi"));
                assert_eq!(images.len(), 2);
            }
            _ => panic!("expected post"),
        }
    }

    #[test]
    fn test_engagements_alias_and_all_flag() {
        let cli = Cli::try_parse_from(["xcli", "engagements"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Engagement { limit: None })));

        let cli = Cli::try_parse_from(["xcli", "mentions", "--all"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Mentions { all: true, limit: None })
        ));

        let err = Cli::try_parse_from(["xcli", "interact", "--all"]).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::UnknownArgument);
    }
}
