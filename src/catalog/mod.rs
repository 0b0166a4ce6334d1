//! Curated channel catalog
//!
//! The catalog is the operator-maintained list of channels worth showing in
//! the digest. Each line of the current-names file is normalized into a
//! `(name, country)` lookup key, where the country is taken from a
//! parenthesized tag such as `beIN Sports 1 (MENA)`. An optional second file,
//! aligned by line, supplies the display name shown to readers.
//!
//! The catalog is built once per run and never mutated afterwards.

use regex::Regex;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::Path;
use std::sync::LazyLock;
use tracing::{debug, info, warn};

use crate::errors::{AppError, AppResult};

static COUNTRY_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\((.*?)\)").unwrap());

/// Lookup key: lowercased channel name without tags, plus the lowercased tag if any
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CatalogKey {
    pub name: String,
    pub country: Option<String>,
}

impl CatalogKey {
    pub fn new(name: &str, country: Option<&str>) -> Self {
        Self {
            name: name.to_lowercase(),
            country: country.map(str::to_lowercase),
        }
    }
}

/// One normalized catalog row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    /// Name shown downstream
    pub display_name: String,
    /// Lowercased, tag-stripped form of the current name
    pub normalized_name: String,
    /// Lowercased content of the first parenthesized tag; an empty tag is none
    pub country: Option<String>,
}

impl CatalogEntry {
    /// Normalize a current-names row, pairing it with its display name
    pub fn parse(current_name: &str, display_name: &str) -> Self {
        let country = COUNTRY_TAG
            .captures(current_name)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_lowercase())
            .filter(|c| !c.is_empty());

        let normalized_name = COUNTRY_TAG
            .replace_all(current_name, "")
            .trim()
            .to_lowercase();

        Self {
            display_name: display_name.to_string(),
            normalized_name,
            country,
        }
    }

    pub fn key(&self) -> CatalogKey {
        CatalogKey {
            name: self.normalized_name.clone(),
            country: self.country.clone(),
        }
    }
}

/// Read-only mapping from normalized `(name, country)` to display name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelCatalog {
    entries: HashMap<CatalogKey, String>,
    collisions: usize,
}

impl ChannelCatalog {
    /// Build a catalog from current names and optional positional display names.
    ///
    /// Rows producing an identical key overwrite earlier rows. When the
    /// overwritten display name differs, a warning is logged so duplicated
    /// operator entries are visible.
    pub fn build<S: AsRef<str>>(current_names: &[S], original_names: Option<&[S]>) -> Self {
        let mut catalog = Self::default();

        for (idx, current) in current_names.iter().enumerate() {
            let current = current.as_ref();
            let display = original_names
                .and_then(|names| names.get(idx))
                .map(|name| name.as_ref())
                .unwrap_or(current);

            catalog.insert(CatalogEntry::parse(current, display), idx + 1);
        }

        catalog
    }

    /// Load the catalog from line-oriented files.
    ///
    /// A missing current-names file is fatal. A missing original-names file
    /// only means the current names are shown as-is.
    pub fn load(current_path: &Path, original_path: Option<&Path>) -> AppResult<Self> {
        let current_names = match read_name_list(current_path) {
            Ok(names) => names,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(AppError::configuration_missing(current_path));
            }
            Err(e) => return Err(e.into()),
        };

        let original_names = match original_path {
            Some(path) => match read_name_list(path) {
                Ok(names) => Some(names),
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    warn!(
                        "Original channel names file {} not found, using current channel names",
                        path.display()
                    );
                    None
                }
                Err(e) => return Err(e.into()),
            },
            None => None,
        };

        if let Some(originals) = &original_names {
            if originals.len() < current_names.len() {
                debug!(
                    "Original names list is shorter than current list ({} < {}), trailing rows use current names",
                    originals.len(),
                    current_names.len()
                );
            }
        }

        let catalog = Self::build(&current_names, original_names.as_deref());
        info!(
            "Loaded channel catalog from {}: {} keys ({} rows, {} collisions)",
            current_path.display(),
            catalog.len(),
            current_names.len(),
            catalog.collisions()
        );
        Ok(catalog)
    }

    fn insert(&mut self, entry: CatalogEntry, row: usize) {
        let key = entry.key();
        if let Some(previous) = self.entries.get(&key) {
            self.collisions += 1;
            if *previous != entry.display_name {
                warn!(
                    "Catalog row {} ('{}') replaces '{}' for key ({}, {})",
                    row,
                    entry.display_name,
                    previous,
                    key.name,
                    key.country.as_deref().unwrap_or("-")
                );
            }
        }
        self.entries.insert(key, entry.display_name);
    }

    /// Look up a display name; both parts are lowercased before matching
    pub fn lookup(&self, name: &str, country: Option<&str>) -> Option<&str> {
        self.entries
            .get(&CatalogKey::new(name, country))
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of rows that overwrote an earlier row with the same key
    pub fn collisions(&self) -> usize {
        self.collisions
    }
}

/// Read non-blank, trimmed lines from a UTF-8 file
pub fn read_name_list(path: &Path) -> std::io::Result<Vec<String>> {
    let contents = std::fs::read_to_string(path)?;
    Ok(contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_lines(dir: &TempDir, name: &str, lines: &[&str]) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        for line in lines {
            writeln!(file, "{line}").unwrap();
        }
        path
    }

    #[test]
    fn test_entry_parse_extracts_country() {
        let entry = CatalogEntry::parse("beIN Sports 1 (MENA)", "beIN Sports 1 (MENA)");

        assert_eq!(entry.normalized_name, "bein sports 1");
        assert_eq!(entry.country.as_deref(), Some("mena"));
    }

    #[test]
    fn test_entry_parse_without_country() {
        let entry = CatalogEntry::parse("  ESPN  ", "ESPN");

        assert_eq!(entry.normalized_name, "espn");
        assert_eq!(entry.country, None);
    }

    #[test]
    fn test_empty_tag_keys_as_plain_name() {
        let entry = CatalogEntry::parse("ESPN ()", "ESPN");
        assert_eq!(entry.normalized_name, "espn");
        assert_eq!(entry.country, None);

        let catalog = ChannelCatalog::build(&["ESPN ()"], None);
        assert_eq!(catalog.lookup("espn", None), Some("ESPN ()"));
    }

    #[test]
    fn test_entry_parse_strips_every_tag_but_keys_on_first() {
        let entry = CatalogEntry::parse("Sky Sport (Italy) (HD)", "Sky Sport");

        assert_eq!(entry.normalized_name, "sky sport");
        assert_eq!(entry.country.as_deref(), Some("italy"));
    }

    #[test]
    fn test_build_prefers_original_names_by_index() {
        let current = vec!["Sport TV 1 (Portugal)", "Eleven 1 (Portugal)", "DAZN 1"];
        let original = vec!["SPORT TV1", "ELEVEN SPORTS 1"];
        let catalog = ChannelCatalog::build(&current, Some(original.as_slice()));

        assert_eq!(catalog.lookup("sport tv 1", Some("portugal")), Some("SPORT TV1"));
        assert_eq!(catalog.lookup("Eleven 1", Some("PORTUGAL")), Some("ELEVEN SPORTS 1"));
        // Shorter original list falls back to the current name
        assert_eq!(catalog.lookup("dazn 1", None), Some("DAZN 1"));
    }

    #[test]
    fn test_country_keys_are_distinct_from_plain_keys() {
        let catalog = ChannelCatalog::build(&["ESPN (USA)", "ESPN"], None);

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.lookup("espn", Some("usa")), Some("ESPN (USA)"));
        assert_eq!(catalog.lookup("espn", None), Some("ESPN"));
        assert_eq!(catalog.lookup("espn", Some("canada")), None);
    }

    #[test]
    fn test_last_write_wins_on_key_collision() {
        let current = vec!["Canal+ Sport (France)", "CANAL+ SPORT (france)"];
        let original = vec!["Canal+ Sport", "Canal+ Sport 360"];
        let catalog = ChannelCatalog::build(&current, Some(original.as_slice()));

        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.collisions(), 1);
        assert_eq!(catalog.lookup("canal+ sport", Some("france")), Some("Canal+ Sport 360"));
    }

    #[test]
    fn test_build_is_deterministic() {
        let current = vec!["beIN Sports 1 (MENA)", "beIN Sports 2 (MENA)", "ESPN", "ESPN"];
        let first = ChannelCatalog::build(&current, None);
        let second = ChannelCatalog::build(&current, None);

        assert_eq!(first, second);
    }

    #[test]
    fn test_load_skips_blank_lines() {
        let dir = TempDir::new().unwrap();
        let current = write_lines(&dir, "channel.txt", &["", "ESPN", "   ", "Viaplay 1 (Sweden)"]);
        let original = write_lines(&dir, "OG_channel.txt", &["ESPN HD", "", "Viaplay Sport 1"]);

        let catalog = ChannelCatalog::load(&current, Some(&original)).unwrap();

        assert_eq!(catalog.lookup("espn", None), Some("ESPN HD"));
        assert_eq!(catalog.lookup("viaplay 1", Some("sweden")), Some("Viaplay Sport 1"));
    }

    #[test]
    fn test_load_missing_current_file_is_configuration_missing() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("channel.txt");

        let err = ChannelCatalog::load(&missing, None).unwrap_err();
        assert!(matches!(err, AppError::ConfigurationMissing { ref path } if *path == missing));
    }

    #[test]
    fn test_load_missing_original_file_falls_back() {
        let dir = TempDir::new().unwrap();
        let current = write_lines(&dir, "channel.txt", &["Arena Sport 1 (Serbia)"]);
        let missing = dir.path().join("OG_channel.txt");

        let catalog = ChannelCatalog::load(&current, Some(&missing)).unwrap();
        assert_eq!(
            catalog.lookup("arena sport 1", Some("serbia")),
            Some("Arena Sport 1 (Serbia)")
        );
    }
}
