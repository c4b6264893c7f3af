//! Unique prefix generation
//!
//! Every folder gets one token of the form `[XXXXX-hhhhhh~]`: five random
//! alphanumeric characters followed by the first six hex digits of the MD5
//! of the folder's base name. Re-running over the same folder yields a
//! different token that is still recognisably tied to the folder.

use std::path::{Path, PathBuf};

use rand::distr::Alphanumeric;
use rand::Rng;

/// Number of random characters in a token
pub const RANDOM_LENGTH: usize = 5;

/// Number of hex digits of the folder-name digest kept in a token
pub const HASH_LENGTH: usize = 6;

/// Generates a prefix token, optionally seeded with a folder name
///
/// The random part is not cryptographically secure. An empty seed is
/// treated the same as no seed, and the hash part is left out.
pub fn generate_prefix(seed: Option<&str>) -> String {
    let mut rng = rand::rng();
    let random: String = (0..RANDOM_LENGTH)
        .map(|_| char::from(rng.sample(Alphanumeric)))
        .collect();

    let suffix = match seed {
        Some(seed) if !seed.is_empty() => {
            let digest = format!("{:x}", md5::compute(seed.as_bytes()));
            format!("-{}", &digest[..HASH_LENGTH])
        }
        _ => String::new(),
    };

    format!("[{random}{suffix}~]")
}

/// The prefix shared by every file directly inside one folder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderPrefix {
    /// Folder the token was generated for
    pub folder: PathBuf,
    /// Token prepended to each file name
    pub token: String,
}

impl FolderPrefix {
    /// Generates the prefix for a folder, seeded with its base name
    pub fn for_folder(folder: &Path) -> Self {
        let seed = folder.file_name().map(|name| name.to_string_lossy());
        FolderPrefix {
            folder: folder.to_path_buf(),
            token: generate_prefix(seed.as_deref()),
        }
    }
}
