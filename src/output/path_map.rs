//! Assignment of a unique output path to every page of a space.
//!
//! The map is built once from the complete listing, before any page content
//! is rewritten, and is only ever read afterwards.

use super::paths::{relative_link, sanitize_name, to_link};
use crate::constants::{OUTPUT_EXTENSION, UNTITLED_PAGE_PREFIX};
use crate::model::Page;
use crate::types::PageId;
use indexmap::IndexMap;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

/// How a page link names its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkTarget<'a> {
    Id(&'a str),
    Title(&'a str),
}

/// Immutable mapping from page id to its path relative to the output root.
///
/// Injective: no two ids share a path. Iteration follows the input order.
#[derive(Debug, Clone, Default)]
pub struct PathMap {
    paths: IndexMap<PageId, PathBuf>,
    by_id: HashMap<String, PageId>,
    by_title: HashMap<String, PageId>,
}

impl PathMap {
    /// Resolves every page of the listing to a unique relative path.
    ///
    /// Pages are processed in input order. The first page to compute a given
    /// path keeps it; later pages with the same path get their id appended
    /// to the file stem (`Title-<id>.md`).
    pub fn resolve(pages: &[Page]) -> Self {
        let mut map = Self::default();
        let mut claimed: HashSet<PathBuf> = HashSet::with_capacity(pages.len());

        for page in pages {
            if map.paths.contains_key(&page.id) {
                log::warn!("Page {} listed twice; keeping its first path", page.id);
                continue;
            }

            let dir = ancestor_dir(page);
            let stem = page_stem(page);

            let mut path = dir.join(file_name(&stem));
            if claimed.contains(&path) {
                path = disambiguate(&dir, &stem, &page.id, &claimed);
                log::debug!(
                    "Title collision for page {} ('{}'); using {}",
                    page.id,
                    page.display_title(),
                    path.display()
                );
            }

            claimed.insert(path.clone());
            map.by_id.insert(page.id.as_str().to_string(), page.id.clone());
            if let Some(title) = page.title.as_deref() {
                map.by_title
                    .entry(title.to_string())
                    .or_insert_with(|| page.id.clone());
            }
            map.paths.insert(page.id.clone(), path);
        }

        map
    }

    /// Output path of a page, relative to the output root.
    pub fn get(&self, id: &PageId) -> Option<&Path> {
        self.paths.get(id).map(PathBuf::as_path)
    }

    /// Looks a link target up by id or by exact title.
    pub fn lookup(&self, target: LinkTarget<'_>) -> Option<(&PageId, &Path)> {
        let id = match target {
            LinkTarget::Id(raw) => self.by_id.get(raw.trim())?,
            LinkTarget::Title(title) => self.by_title.get(title)?,
        };
        self.paths
            .get_key_value(id)
            .map(|(id, path)| (id, path.as_path()))
    }

    /// Link from the owner page to the target path.
    ///
    /// Relative to the owner's directory when the owner is mapped; otherwise
    /// the target's path from the output root.
    pub fn link_from(&self, owner: &PageId, target: &Path) -> String {
        match self.get(owner) {
            Some(owner_path) => relative_link(owner_path, target),
            None => to_link(target),
        }
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PageId, &Path)> {
        self.paths.iter().map(|(id, path)| (id, path.as_path()))
    }
}

/// Directory made of the sanitized, non-empty ancestor titles.
fn ancestor_dir(page: &Page) -> PathBuf {
    page.ancestors
        .iter()
        .filter_map(|ancestor| ancestor.title.as_deref())
        .map(sanitize_name)
        .filter(|segment| !segment.is_empty())
        .collect()
}

fn page_stem(page: &Page) -> String {
    let sanitized = page.title.as_deref().map(sanitize_name).unwrap_or_default();
    if sanitized.is_empty() {
        format!("{}{}", UNTITLED_PAGE_PREFIX, page.id)
    } else {
        sanitized
    }
}

fn file_name(stem: &str) -> String {
    format!("{}.{}", stem, OUTPUT_EXTENSION)
}

fn disambiguate(dir: &Path, stem: &str, id: &PageId, claimed: &HashSet<PathBuf>) -> PathBuf {
    let suffixed = format!("{}-{}", stem, id);
    let candidate = dir.join(file_name(&suffixed));
    if !claimed.contains(&candidate) {
        return candidate;
    }

    // Another page is literally titled "<stem>-<id>"; count upwards.
    (2usize..)
        .map(|n| dir.join(file_name(&format!("{}-{}", suffixed, n))))
        .find(|candidate| !claimed.contains(candidate))
        .unwrap_or(candidate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Ancestor;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn page(id: &str, title: &str, ancestors: &[&str]) -> Page {
        Page::new(
            PageId::parse(id).unwrap(),
            title,
            ancestors.iter().map(|a| Ancestor::titled(*a)).collect(),
        )
    }

    fn path_of(map: &PathMap, id: &str) -> String {
        to_link(map.get(&PageId::parse(id).unwrap()).unwrap())
    }

    #[test]
    fn test_paths_mirror_hierarchy() {
        let pages = vec![
            page("1", "Root", &[]),
            page("2", "Child", &["Root"]),
            page("3", "Leaf", &["Root", "Child"]),
        ];
        let map = PathMap::resolve(&pages);

        assert_eq!(path_of(&map, "1"), "Root.md");
        assert_eq!(path_of(&map, "2"), "Root/Child.md");
        assert_eq!(path_of(&map, "3"), "Root/Child/Leaf.md");
        assert_eq!(map.len(), 3);
    }

    #[test]
    fn test_first_claim_keeps_short_name() {
        let pages = vec![
            page("10", "Notes", &["Root"]),
            page("11", "Notes", &["Root"]),
            page("12", "Notes", &["Other"]),
        ];
        let map = PathMap::resolve(&pages);

        assert_eq!(path_of(&map, "10"), "Root/Notes.md");
        assert_eq!(path_of(&map, "11"), "Root/Notes-11.md");
        assert_eq!(path_of(&map, "12"), "Other/Notes.md");
    }

    #[test]
    fn test_suffix_collision_stays_unique() {
        let pages = vec![
            page("3", "X-2", &[]),
            page("1", "X", &[]),
            page("2", "X", &[]),
        ];
        let map = PathMap::resolve(&pages);

        assert_eq!(path_of(&map, "3"), "X-2.md");
        assert_eq!(path_of(&map, "1"), "X.md");
        assert_eq!(path_of(&map, "2"), "X-2-2.md");
    }

    #[test]
    fn test_untitled_page_and_ancestor() {
        let untitled = Page {
            id: PageId::parse("77").unwrap(),
            title: None,
            ancestors: vec![
                Ancestor {
                    id: None,
                    title: None,
                },
                Ancestor::titled("Docs"),
                Ancestor::titled("   "),
            ],
        };
        let map = PathMap::resolve(&[untitled, page("78", "???", &[])]);

        assert_eq!(path_of(&map, "77"), "Docs/page_77.md");
        assert_eq!(path_of(&map, "78"), "___.md");
    }

    #[test]
    fn test_unsafe_titles_never_escape() {
        let pages = vec![page("5", "../../secret", &["..", "a/b"])];
        let map = PathMap::resolve(&pages);

        assert_eq!(path_of(&map, "5"), "__/a_b/.._.._secret.md");
    }

    #[test]
    fn test_lookup_by_id_and_title() {
        let pages = vec![page("1", "Root", &[]), page("2", "Root", &["Root"])];
        let map = PathMap::resolve(&pages);

        let (id, path) = map.lookup(LinkTarget::Id("2")).unwrap();
        assert_eq!(id.as_str(), "2");
        assert_eq!(to_link(path), "Root/Root.md");

        let (id, _) = map.lookup(LinkTarget::Title("Root")).unwrap();
        assert_eq!(id.as_str(), "1");

        assert!(map.lookup(LinkTarget::Id("404")).is_none());
        assert!(map.lookup(LinkTarget::Title("Missing")).is_none());
    }

    #[test]
    fn test_link_from_owner() {
        let pages = vec![page("1", "A", &["x"]), page("2", "B", &["x", "y"])];
        let map = PathMap::resolve(&pages);
        let a = PageId::parse("1").unwrap();
        let b = PageId::parse("2").unwrap();

        assert_eq!(map.link_from(&a, map.get(&b).unwrap()), "y/B.md");
        assert_eq!(map.link_from(&b, map.get(&a).unwrap()), "../A.md");

        let unknown = PageId::parse("999").unwrap();
        assert_eq!(map.link_from(&unknown, map.get(&b).unwrap()), "x/y/B.md");
    }

    proptest! {
        #[test]
        fn resolved_paths_are_unique(
            titles in prop::collection::vec(
                (prop::sample::select(vec!["A", "B", "A-2", "A-3", "", "B-1"]),
                 prop::sample::select(vec!["", "P", "Q"])),
                1..40,
            )
        ) {
            let pages: Vec<Page> = titles
                .iter()
                .enumerate()
                .map(|(i, (title, parent))| {
                    let ancestors = if parent.is_empty() { vec![] } else { vec![Ancestor::titled(*parent)] };
                    Page::new(PageId::parse(&(i + 1).to_string()).unwrap(), *title, ancestors)
                })
                .collect();

            let map = PathMap::resolve(&pages);
            prop_assert_eq!(map.len(), pages.len());

            let distinct: HashSet<&Path> = map.iter().map(|(_, path)| path).collect();
            prop_assert_eq!(distinct.len(), pages.len());
        }
    }
}
