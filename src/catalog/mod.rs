//! Directory-backed ROM catalog.
//!
//! The catalog is never cached: every call re-reads the configured directory,
//! so listings and downloads always reflect what is on disk right now.

use std::{
    io,
    path::{Path, PathBuf},
};

use tokio::fs::File;
use walkdir::WalkDir;

use crate::config::CatalogConfig;
use crate::types::{PageRequest, PageResult};

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// The name is not part of the current catalog.
    #[error("'{0}' is not in the catalog")]
    NotFound(String),
    /// The name is listed but the file could not be opened.
    #[error("'{name}' is listed but could not be opened: {source}")]
    Unreadable {
        name: String,
        #[source]
        source: io::Error,
    },
}

/// An opened ROM, ready to be streamed.
#[derive(Debug)]
pub struct RomFile {
    pub name: String,
    pub file: File,
    pub len: u64,
}

#[derive(Debug, Clone)]
pub struct Catalog {
    dir: PathBuf,
    /// Lowercased, so matching is a plain `ends_with` on the lowercased name.
    extension: String,
}

impl Catalog {
    pub fn new(dir: impl Into<PathBuf>, extension: &str) -> Self {
        Self { dir: dir.into(), extension: extension.to_lowercase() }
    }

    pub fn from_config(cfg: &CatalogConfig) -> Self {
        Self::new(cfg.dir.clone(), &cfg.extension)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn is_eligible(&self, name: &str) -> bool {
        name.to_lowercase().ends_with(&self.extension)
    }

    /// Lists eligible file names in the directory, sorted.
    ///
    /// A missing directory yields an empty catalog. Unreadable entries and
    /// names that are not valid UTF-8 are skipped with a warning.
    pub fn scan(&self) -> Vec<String> {
        if !self.dir.is_dir() {
            tracing::warn!("ROMs directory '{}' not found", self.dir.display());
            return Vec::new();
        }

        let mut names = Vec::new();
        for entry in WalkDir::new(&self.dir).min_depth(1).max_depth(1).follow_links(true) {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    tracing::warn!("Skipping unreadable entry in '{}': {}", self.dir.display(), e);
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let Some(name) = entry.file_name().to_str() else {
                tracing::warn!("Skipping non UTF-8 file name: {:?}", entry.file_name());
                continue;
            };
            if self.is_eligible(name) {
                names.push(name.to_string());
            }
        }
        names.sort();
        names
    }

    /// Scans, filters and returns one page of the catalog.
    pub fn list(&self, req: &PageRequest) -> PageResult {
        let mut games = self.scan();
        if let Some(q) = req.query.as_deref() {
            let needle = q.to_lowercase();
            games.retain(|name| name.to_lowercase().contains(&needle));
        }
        paginate(games, req.page, req.per_page)
    }

    /// Maps a requested name to its path if, and only if, the current scan
    /// lists it. The name is never joined onto the directory before that.
    pub fn resolve(&self, name: &str) -> Result<PathBuf, CatalogError> {
        if !is_plain_file_name(name) {
            return Err(CatalogError::NotFound(name.to_string()));
        }
        if self.scan().iter().any(|n| n == name) {
            Ok(self.dir.join(name))
        } else {
            Err(CatalogError::NotFound(name.to_string()))
        }
    }

    /// Resolves `name` and opens it for streaming.
    ///
    /// The scan runs on the blocking pool. A file that disappears between the
    /// scan and the open is reported as [`CatalogError::Unreadable`].
    pub async fn open(&self, name: &str) -> Result<RomFile, CatalogError> {
        let catalog = self.clone();
        let requested = name.to_string();
        let path = tokio::task::spawn_blocking(move || catalog.resolve(&requested))
            .await
            .map_err(|e| CatalogError::Unreadable {
                name: name.to_string(),
                source: io::Error::other(e),
            })??;
        Self::open_listed(name, &path).await
    }

    /// Opens a path that already passed [`Catalog::resolve`].
    async fn open_listed(name: &str, path: &Path) -> Result<RomFile, CatalogError> {
        let unreadable = |source: io::Error| CatalogError::Unreadable { name: name.to_string(), source };
        let file = File::open(path).await.map_err(unreadable)?;
        let meta = file.metadata().await.map_err(unreadable)?;
        if !meta.is_file() {
            return Err(unreadable(io::Error::new(io::ErrorKind::InvalidInput, "not a regular file")));
        }
        Ok(RomFile { name: name.to_string(), file, len: meta.len() })
    }
}

/// Slices one page out of `items`.
///
/// `pages` is `ceil(total / per_page)`; a page past the end is empty, not an
/// error. `page` and `per_page` must be at least 1.
pub fn paginate(items: Vec<String>, page: usize, per_page: usize) -> PageResult {
    let page = page.max(1);
    let per_page = per_page.max(1);
    let total = items.len();
    let pages = total.div_ceil(per_page);
    let start = (page - 1).saturating_mul(per_page);
    let games = if start >= total {
        Vec::new()
    } else {
        items.into_iter().skip(start).take(per_page).collect()
    };
    PageResult { games, total, page, per_page, pages }
}

/// A bare file name: not empty, not a dot entry, no separators or NUL.
fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\', '\0'])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;
    use tokio::io::AsyncReadExt;

    fn catalog_with(files: &[&str]) -> (TempDir, Catalog) {
        let dir = TempDir::new().unwrap();
        for f in files {
            fs::write(dir.path().join(f), format!("data for {}", f)).unwrap();
        }
        let catalog = Catalog::new(dir.path(), ".gba");
        (dir, catalog)
    }

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn lists_only_matching_extension() {
        let (_dir, catalog) = catalog_with(&["b.gba", "a.gba", "readme.txt"]);
        let page = catalog.list(&PageRequest::default());
        assert_eq!(
            page,
            PageResult { games: names(&["a.gba", "b.gba"]), total: 2, page: 1, per_page: 24, pages: 1 }
        );
    }

    #[test]
    fn extension_match_ignores_case() {
        let (_dir, catalog) = catalog_with(&["Upper.GBA", "mixed.Gba", "plain.gb"]);
        assert_eq!(catalog.scan(), names(&["Upper.GBA", "mixed.Gba"]));
    }

    #[test]
    fn only_non_matching_files_gives_empty_catalog() {
        let (_dir, catalog) = catalog_with(&["notes.txt", "save.sav", "gba"]);
        let page = catalog.list(&PageRequest::default());
        assert!(page.games.is_empty());
        assert_eq!(page.total, 0);
        assert_eq!(page.pages, 0);
    }

    #[test]
    fn missing_directory_is_empty_not_error() {
        let dir = TempDir::new().unwrap();
        let catalog = Catalog::new(dir.path().join("does-not-exist"), ".gba");
        assert!(catalog.scan().is_empty());
        assert_eq!(catalog.list(&PageRequest::default()).total, 0);
    }

    #[test]
    fn subdirectories_are_not_listed() {
        let (dir, catalog) = catalog_with(&["top.gba"]);
        fs::create_dir(dir.path().join("folder.gba")).unwrap();
        fs::write(dir.path().join("folder.gba").join("nested.gba"), b"x").unwrap();
        assert_eq!(catalog.scan(), names(&["top.gba"]));
    }

    #[test]
    fn query_is_case_insensitive_substring() {
        let (_dir, catalog) =
            catalog_with(&["Golden Sun.gba", "Pokemon Emerald.gba", "golf.gba", "Metroid.gba"]);
        let upper = PageRequest { query: Some("GOL".to_string()), ..PageRequest::default() };
        let lower = PageRequest { query: Some("gol".to_string()), ..PageRequest::default() };
        let a = catalog.list(&upper);
        let b = catalog.list(&lower);
        assert_eq!(a, b);
        assert_eq!(a.games, names(&["Golden Sun.gba", "golf.gba"]));
        assert_eq!(a.total, 2);
    }

    #[test]
    fn pagination_matches_ceiling_and_slice_length() {
        let items: Vec<String> = (0..53).map(|i| format!("{:03}.gba", i)).collect();
        for per_page in [1usize, 5, 10, 24, 53, 100] {
            let pages = 53usize.div_ceil(per_page);
            for page in 1..=pages + 2 {
                let res = paginate(items.clone(), page, per_page);
                let expected_len = per_page.min(53usize.saturating_sub((page - 1) * per_page));
                assert_eq!(res.pages, pages);
                assert_eq!(res.total, 53);
                assert_eq!(res.games.len(), expected_len, "page {} per_page {}", page, per_page);
            }
        }
    }

    #[test]
    fn page_slices_in_order() {
        let items = names(&["a", "b", "c", "d", "e"]);
        assert_eq!(paginate(items.clone(), 2, 2).games, names(&["c", "d"]));
        assert_eq!(paginate(items.clone(), 3, 2).games, names(&["e"]));
        assert!(paginate(items, 4, 2).games.is_empty());
    }

    #[test]
    fn resolve_rejects_unlisted_names() {
        let (dir, catalog) = catalog_with(&["a.gba", "readme.txt"]);
        assert!(catalog.resolve("a.gba").is_ok());
        assert!(matches!(catalog.resolve("readme.txt"), Err(CatalogError::NotFound(_))));
        assert!(matches!(catalog.resolve("ghost.gba"), Err(CatalogError::NotFound(_))));
        assert!(matches!(catalog.resolve("A.GBA"), Err(CatalogError::NotFound(_))));

        // A valid ROM one level up must stay out of reach.
        let outer = dir.path().parent().unwrap().join("outside-romshelf-test.gba");
        let _ = fs::write(&outer, b"x");
        assert!(matches!(
            catalog.resolve("../outside-romshelf-test.gba"),
            Err(CatalogError::NotFound(_))
        ));
        let _ = fs::remove_file(outer);
    }

    #[test]
    fn plain_file_name_rules() {
        assert!(is_plain_file_name("game.gba"));
        assert!(is_plain_file_name("..weird.gba"));
        assert!(!is_plain_file_name(""));
        assert!(!is_plain_file_name(".."));
        assert!(!is_plain_file_name("a/b.gba"));
        assert!(!is_plain_file_name("a\\b.gba"));
        assert!(!is_plain_file_name("a\0.gba"));
    }

    #[tokio::test]
    async fn open_returns_exact_bytes() {
        let (dir, catalog) = catalog_with(&[]);
        let payload: Vec<u8> = (0..=255u8).cycle().take(70_000).collect();
        fs::write(dir.path().join("big.gba"), &payload).unwrap();

        let mut rom = catalog.open("big.gba").await.unwrap();
        assert_eq!(rom.len, payload.len() as u64);
        let mut buf = Vec::new();
        rom.file.read_to_end(&mut buf).await.unwrap();
        assert_eq!(buf, payload);
    }

    #[tokio::test]
    async fn file_removed_after_listing_is_unreadable() {
        let (dir, catalog) = catalog_with(&["vanishing.gba"]);
        let path = catalog.resolve("vanishing.gba").unwrap();
        fs::remove_file(dir.path().join("vanishing.gba")).unwrap();

        match Catalog::open_listed("vanishing.gba", &path).await {
            Err(CatalogError::Unreadable { name, source }) => {
                assert_eq!(name, "vanishing.gba");
                assert_eq!(source.kind(), io::ErrorKind::NotFound);
            }
            other => panic!("expected Unreadable, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn open_unlisted_is_not_found() {
        let (_dir, catalog) = catalog_with(&["readme.txt"]);
        assert!(matches!(catalog.open("readme.txt").await, Err(CatalogError::NotFound(_))));
    }
}
