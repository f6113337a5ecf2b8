use std::ffi::OsString;
use std::io::Write;
use std::path::{Path, PathBuf};

use clap::error::ErrorKind;
use clap::Parser;
use tracing::error;

use super::merge::merge_files;

/// Process exit status of `mcpropmerge`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeExit {
    Success = 0,
    Usage = 1,
    BadPath = 2,
    MergeFailed = 3,
}

impl MergeExit {
    pub fn code(self) -> u8 {
        self as u8
    }
}

/// Merge JSON property files (banned-ips.json, banned-players.json, ops.json,
/// whitelist.json) from a global list into a local server list.
#[derive(Parser, Debug)]
#[command(name = "mcpropmerge", version)]
pub struct PropMergeArgs {
    /// Global property list; its entries always win
    pub global: PathBuf,
    /// Local property list to merge in
    pub local: PathBuf,
}

fn verify_path(path: &Path) -> bool {
    if !path.exists() {
        error!("The file [{}] does not exist.", path.display());
        return false;
    }

    if !path.is_file() {
        error!("The path [{}] is not a file.", path.display());
        return false;
    }

    true
}

/// Run the merge for the given argv and print the merged list to `out`.
pub fn run_propmerge<I, T>(args: I, out: &mut impl Write) -> MergeExit
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let args = match PropMergeArgs::try_parse_from(args) {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            return match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => MergeExit::Success,
                _ => MergeExit::Usage,
            };
        }
    };

    if !verify_path(&args.global) || !verify_path(&args.local) {
        return MergeExit::BadPath;
    }

    let merged = match merge_files(&args.global, &args.local) {
        Ok(merged) => merged,
        Err(e) => {
            error!("{}", e);
            return MergeExit::MergeFailed;
        }
    };

    let written = serde_json::to_string_pretty(&merged)
        .map_err(std::io::Error::from)
        .and_then(|json| writeln!(out, "{}", json));
    if let Err(e) = written {
        error!("Failed to write merged list: {}", e);
        return MergeExit::MergeFailed;
    }

    MergeExit::Success
}
