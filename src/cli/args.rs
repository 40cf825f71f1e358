//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// RSS 2.0 comment feeds for a blog comment store
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: comments.toml)
    #[arg(short = 'C', long, global = true, default_value = "comments.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Enable verbose output for debugging
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Create a starter config and the comment store schema
    #[command(visible_alias = "i")]
    Init {
        /// Overwrite an existing config file
        #[arg(short, long)]
        force: bool,

        /// Seed the store with a small demo data set
        #[arg(short, long)]
        sample: bool,
    },

    /// Render one feed document
    #[command(visible_alias = "r")]
    Render {
        #[command(flatten)]
        args: RenderArgs,
    },

    /// Serve comment feeds over HTTP
    #[command(visible_alias = "s")]
    Serve {
        /// Network interface to bind (e.g., 127.0.0.1, 0.0.0.0)
        #[arg(short, long)]
        interface: Option<std::net::IpAddr>,

        /// Port number to listen on
        #[arg(short, long)]
        port: Option<u16>,
    },
}

/// Render command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct RenderArgs {
    /// Render the comments of one post (omit for the site-wide feed)
    #[arg(short = 'P', long = "post", value_name = "ID")]
    pub post: Option<u64>,

    /// Password credential for protected posts
    #[arg(long, value_name = "SECRET")]
    pub password: Option<String>,

    /// Write output to file instead of stdout
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: Option<PathBuf>,

    /// Render as of this moment (RFC 3339 or `YYYY-MM-DD[ HH:MM:SS]`, UTC)
    #[arg(long, value_name = "TIME")]
    pub at: Option<String>,
}

#[allow(unused)]
impl Cli {
    pub const fn is_init(&self) -> bool {
        matches!(self.command, Commands::Init { .. })
    }
    pub const fn is_render(&self) -> bool {
        matches!(self.command, Commands::Render { .. })
    }
    pub const fn is_serve(&self) -> bool {
        matches!(self.command, Commands::Serve { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_args() {
        let cli = Cli::try_parse_from([
            "comment-feed",
            "render",
            "--post",
            "5",
            "--password",
            "abc",
            "-o",
            "feed.xml",
        ])
        .unwrap();

        let Commands::Render { args } = cli.command else {
            panic!("expected render");
        };
        assert_eq!(args.post, Some(5));
        assert_eq!(args.password.as_deref(), Some("abc"));
        assert_eq!(args.output, Some(PathBuf::from("feed.xml")));
        assert_eq!(cli.config, PathBuf::from("comments.toml"));
    }

    #[test]
    fn test_global_options_after_subcommand() {
        let cli =
            Cli::try_parse_from(["comment-feed", "serve", "-p", "8080", "-v", "-C", "blog.toml"])
                .unwrap();
        assert!(cli.is_serve());
        assert!(cli.verbose);
        assert_eq!(cli.config, PathBuf::from("blog.toml"));
        assert!(matches!(cli.command, Commands::Serve { port: Some(8080), .. }));
    }

    #[test]
    fn test_version_and_verbose_flags_coexist() {
        use clap::CommandFactory;
        Cli::command().debug_assert();

        let err = Cli::try_parse_from(["comment-feed", "-V"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_rejects_non_numeric_post() {
        assert!(Cli::try_parse_from(["comment-feed", "render", "--post", "abc"]).is_err());
    }
}
