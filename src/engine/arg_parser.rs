use clap::{ArgGroup, Parser};
use std::ffi::OsString;
use std::path::PathBuf;

use crate::Operation;

/// Legacy slash flags (matched case-insensitively) and their long-flag equivalents.
const LEGACY_FLAGS: [(&str, &str); 5] = [
    ("/sub", "--sub"),
    ("/s", "--scale"),
    ("/n", "--negative"),
    ("/r", "--remove"),
    ("/c", "--copy"),
];

/// Bulk image transformation over a directory tree.
#[derive(Clone, Debug, Parser)]
#[command(name = "imgbatch")]
#[command(about = "Scale, negate, remove or copy every image under a directory. Esc or Ctrl+C cancels.")]
#[command(group(
    ArgGroup::new("operation")
        .required(true)
        .multiple(false)
        .args(["scale", "negative", "remove", "copy"])
))]
pub struct Cli {
    /// Source directory.
    #[arg(value_name = "SOURCE_DIR")]
    pub dir: PathBuf,

    /// Descend into sub-directories (legacy: /sub).
    #[arg(long, num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub sub: Option<bool>,

    /// Scale every image by FACTOR and overwrite it (legacy: /s FACTOR).
    #[arg(long, short = 's', value_name = "FACTOR", allow_negative_numbers = true)]
    pub scale: Option<f64>,

    /// Replace every image with its colour negative (legacy: /n).
    #[arg(long, short = 'n')]
    pub negative: bool,

    /// Delete every image (legacy: /r).
    #[arg(long, short = 'r')]
    pub remove: bool,

    /// Copy every image into DIR, creating it if needed (legacy: /c DIR).
    #[arg(long, short = 'c', value_name = "DIR")]
    pub copy: Option<PathBuf>,

    /// Verbose output.
    #[arg(long, short = 'v', num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub verbose: Option<bool>,

    /// Report what would be done to each image; change nothing.
    #[arg(long, num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub dry_run: Option<bool>,

    /// Follow symbolic links.
    #[arg(long, short = 'f', num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub follow_links: Option<bool>,

    /// Exclude patterns (glob syntax). Can specify multiple: -e pattern1 pattern2 pattern3
    #[arg(long, short = 'e', num_args = 1..)]
    pub exclude: Vec<String>,

    /// Worker threads. Default: one per available hardware thread.
    #[arg(long, short = 'w')]
    pub workers: Option<usize>,
}

impl Cli {
    /// Parse the process arguments, accepting legacy slash flags.
    pub fn parse_with_legacy_flags() -> Self {
        Cli::parse_from(normalize_legacy_args(std::env::args_os()))
    }

    /// The selected operation. The clap group guarantees exactly one flag is set.
    pub fn operation(&self) -> Option<Operation> {
        if let Some(factor) = self.scale {
            Some(Operation::Scale { factor })
        } else if self.negative {
            Some(Operation::Negative)
        } else if self.remove {
            Some(Operation::Remove)
        } else {
            self.copy.clone().map(|dest| Operation::Copy { dest })
        }
    }
}

/// Rewrite legacy `/sub /s /n /r /c` flags (any case) into long flags. The program name, the
/// source directory (first argument) and the values following `/s` and `/c` are left as given.
pub fn normalize_legacy_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut out = Vec::new();
    let mut take_value = false;
    for (i, arg) in args.into_iter().map(Into::into).enumerate() {
        if i < 2 || take_value {
            take_value = false;
            out.push(arg);
            continue;
        }
        let lower = arg.to_str().map(str::to_lowercase);
        match LEGACY_FLAGS
            .iter()
            .find(|(legacy, _)| lower.as_deref() == Some(*legacy))
        {
            Some((legacy, long)) => {
                take_value = matches!(*legacy, "/s" | "/c");
                out.push(OsString::from(*long));
            }
            None => out.push(arg),
        }
    }
    out
}
