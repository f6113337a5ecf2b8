use std::fs::File;
use std::path::Path;

use tracing::{debug, info, warn};

use crate::core::error::{AdminError, AdminResult};

/// Prefix of the texture tree inside a client jar.
const JAR_TEXTURE_ROOT: &str = "assets/minecraft/textures/";

/// Texture paths relative to the jar's texture root. `dir/*` matches the
/// files directly inside `dir`. Pre-1.13 jars use `blocks/`, later ones
/// `block/`.
pub const TEXTURE_RESOURCES: &[&str] = &[
    "entity/chest/normal.png",
    "entity/chest/normal_double.png",
    "entity/chest/ender.png",
    "entity/chest/trapped.png",
    "entity/chest/trapped_double.png",
    "colormap/foliage.png",
    "colormap/grass.png",
    "blocks/*",
    "block/*",
    "entity/end_portal.png",
];

fn pattern_matches(pattern: &str, path: &str) -> bool {
    match pattern.strip_suffix("/*") {
        Some(dir) => path
            .strip_prefix(dir)
            .and_then(|rest| rest.strip_prefix('/'))
            .is_some_and(|name| !name.is_empty() && !name.contains('/')),
        None => pattern == path,
    }
}

/// Extract every jar entry matched by `patterns` into `dest`, keeping
/// paths relative to the texture root. On failure `dest` is removed so a
/// later run starts clean.
pub fn extract_textures(
    jar: &Path,
    dest: &Path,
    version: &str,
    patterns: &[&str],
) -> AdminResult<usize> {
    let result = extract_into(jar, dest, version, patterns);
    if result.is_err() && dest.exists() {
        if let Err(e) = std::fs::remove_dir_all(dest) {
            warn!("Failed to clean up partial texture dir {:?}: {}", dest, e);
        }
    }
    result
}

fn extract_into(jar: &Path, dest: &Path, version: &str, patterns: &[&str]) -> AdminResult<usize> {
    let file = File::open(jar).map_err(|e| AdminError::io(jar, e))?;
    let mut archive = zip::ZipArchive::new(file)?;

    std::fs::create_dir_all(dest).map_err(|e| AdminError::io(dest, e))?;

    let mut hits = vec![0usize; patterns.len()];
    let mut written = 0;

    for index in 0..archive.len() {
        let mut entry = archive.by_index(index)?;
        if entry.is_dir() {
            continue;
        }

        let Some(relative) = entry
            .name()
            .strip_prefix(JAR_TEXTURE_ROOT)
            .map(str::to_string)
        else {
            continue;
        };

        let Some(slot) = patterns.iter().position(|p| pattern_matches(p, &relative)) else {
            continue;
        };
        // Reject entries that would escape `dest`.
        if entry.enclosed_name().is_none() {
            warn!("Skipping unsafe jar entry {:?}", entry.name());
            continue;
        }

        let out_path = dest.join(&relative);
        if let Some(parent) = out_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| AdminError::io(parent, e))?;
        }
        let mut out = File::create(&out_path).map_err(|e| AdminError::io(&out_path, e))?;
        std::io::copy(&mut entry, &mut out).map_err(|e| AdminError::io(&out_path, e))?;

        debug!("Extracted {}", relative);
        hits[slot] += 1;
        written += 1;
    }

    for (pattern, count) in patterns.iter().zip(&hits) {
        if *count == 0 {
            warn!("Texture [{}] not found in client jar for version [{}]", pattern, version);
        }
    }

    if written == 0 {
        return Err(AdminError::NoTexturesFound(version.to_string()));
    }

    info!("Extracted {} textures for version [{}]", written, version);
    Ok(written)
}
