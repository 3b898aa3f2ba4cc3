//! Font discovery and loading.
//!
//! Guides need a proportional family (Roboto) and, for code panels and visualizations, a
//! monospace family (Roboto Mono).  Both are looked up in the first directory that holds the
//! complete Roboto set:
//!
//! 1. the directory named by `GUIDEBOOK_FONTS_DIR`,
//! 2. `assets/fonts` next to the running executable,
//! 3. `assets/fonts` inside this crate.
//!
//! The monospace family is optional; monospace styles fall back to Roboto without it.

use std::env;
use std::io;
use std::path::{Path, PathBuf};

use genpdf::error::Error;
use genpdf::fonts::{self, FontData, FontFamily};
use log::{debug, warn};

/// Environment variable overriding the font directory.
pub const FONTS_DIR_VAR: &str = "GUIDEBOOK_FONTS_DIR";

/// Name of the proportional font family.
pub const SANS_FAMILY_NAME: &str = "Roboto";

/// Name of the monospace font family.
pub const MONO_FAMILY_NAME: &str = "RobotoMono";

const SANS_FILES: &[&str] = &[
    "Roboto-Regular.ttf",
    "Roboto-Bold.ttf",
    "Roboto-Italic.ttf",
    "Roboto-BoldItalic.ttf",
];

const MONO_FILES: &[&str] = &[
    "RobotoMono-Regular.ttf",
    "RobotoMono-Bold.ttf",
    "RobotoMono-Italic.ttf",
    "RobotoMono-BoldItalic.ttf",
];

/// Font families loaded from disk, before they are registered with a document.
pub struct FontSet {
    pub sans: FontFamily<FontData>,
    pub mono: Option<FontFamily<FontData>>,
}

fn font_directory_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    if let Some(path) = env::var_os(FONTS_DIR_VAR) {
        let path = PathBuf::from(path);
        if !path.as_os_str().is_empty() {
            candidates.push(path);
        }
    }

    if let Ok(current_exe) = env::current_exe() {
        if let Some(bin_dir) = current_exe.parent() {
            candidates.push(bin_dir.join("assets/fonts"));
        }
    }

    let manifest_candidate = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets/fonts");
    if !candidates.contains(&manifest_candidate) {
        candidates.push(manifest_candidate);
    }

    candidates
}

fn missing_files(path: &Path, files: &[&str]) -> Vec<String> {
    files
        .iter()
        .filter(|name| !path.join(name).is_file())
        .map(|name| (*name).to_owned())
        .collect()
}

fn resolve_font_directory() -> Result<PathBuf, Error> {
    let mut attempts = Vec::new();

    for candidate in font_directory_candidates() {
        if !candidate.is_dir() {
            attempts.push(format!("{} (directory missing)", candidate.display()));
            continue;
        }
        let missing = missing_files(&candidate, SANS_FILES);
        if missing.is_empty() {
            return Ok(candidate);
        }
        attempts.push(format!(
            "{} (missing files [{}])",
            candidate.display(),
            missing.join(", ")
        ));
    }

    Err(Error::new(
        format!(
            "Unable to locate the {SANS_FAMILY_NAME} fonts. Checked: {}. Set {FONTS_DIR_VAR} to a directory containing {}.",
            attempts.join(", "),
            SANS_FILES.join(", ")
        ),
        io::Error::new(io::ErrorKind::NotFound, "font directory not found"),
    ))
}

fn load_family(directory: &Path, name: &str) -> Result<FontFamily<FontData>, Error> {
    fonts::from_files(directory, name, None).map_err(|err| {
        Error::new(
            format!(
                "Failed to load font family '{name}' from {}: {err}",
                directory.display()
            ),
            io::Error::new(io::ErrorKind::Other, err.to_string()),
        )
    })
}

/// Loads the proportional family and, when present, the monospace family.
pub fn load_fonts() -> Result<FontSet, Error> {
    let directory = resolve_font_directory()?;
    debug!("Loading fonts from {}", directory.display());
    let sans = load_family(&directory, SANS_FAMILY_NAME)?;

    let missing = missing_files(&directory, MONO_FILES);
    let mono = if missing.is_empty() {
        match load_family(&directory, MONO_FAMILY_NAME) {
            Ok(family) => Some(family),
            Err(err) => {
                warn!("{err}; monospace text falls back to {SANS_FAMILY_NAME}.");
                None
            }
        }
    } else {
        warn!(
            "{MONO_FAMILY_NAME} not found in {} (missing [{}]); monospace text falls back to {SANS_FAMILY_NAME}.",
            directory.display(),
            missing.join(", ")
        );
        None
    };

    Ok(FontSet { sans, mono })
}

/// Indicates whether the proportional font family can be found on disk.
pub fn default_fonts_available() -> bool {
    resolve_font_directory().is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manifest_directory_is_always_searched() {
        let manifest = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets/fonts");
        assert!(font_directory_candidates().contains(&manifest));
    }

    #[test]
    fn missing_files_lists_every_absent_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        std::fs::write(dir.path().join("Roboto-Regular.ttf"), b"").expect("write");
        assert_eq!(
            missing_files(dir.path(), SANS_FILES),
            ["Roboto-Bold.ttf", "Roboto-Italic.ttf", "Roboto-BoldItalic.ttf"]
        );
    }
}
