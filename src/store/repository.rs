//! Core Git repository wrapper.
//!
//! This is the central component of the store layer. It wraps
//! `git2::Repository` with thread-safe access and provides the read-only
//! operations the namespace engine consumes.
//!
//! All other modules use this for Git access and never touch git2 directly.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use git2::{ErrorCode, ObjectType, Repository};
use parking_lot::RwLock;
use tracing::warn;

use crate::store::error::{StoreError, StoreResult};
use crate::store::types::{CommitMeta, EntryMode, Object, ObjectId, RefEntry, TreeEntry};

/// The process-wide Git store handle.
///
/// This provides thread-safe, strictly read-only access to the repository.
/// Clone this to share across threads - it uses Arc internally. It is opened
/// once at startup and dropped once at shutdown; the engine holds no other
/// state between requests.
#[derive(Clone)]
pub struct GitStore {
    inner: Arc<GitStoreInner>,
}

struct GitStoreInner {
    repo: RwLock<Repository>,
    path: PathBuf,
}

impl GitStore {
    /// Open an existing repository.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        let repo =
            Repository::open(path).map_err(|_| StoreError::NotInitialized(path.to_path_buf()))?;

        Ok(Self {
            inner: Arc::new(GitStoreInner {
                repo: RwLock::new(repo),
                path: path.to_path_buf(),
            }),
        })
    }

    /// Get the repository path.
    pub fn path(&self) -> &Path {
        &self.inner.path
    }

    /// Execute a function with read access to the repository.
    fn with_repo<F, T>(&self, f: F) -> StoreResult<T>
    where
        F: FnOnce(&Repository) -> StoreResult<T>,
    {
        let repo = self.inner.repo.read();
        f(&repo)
    }

    // ==================== Object Operations ====================

    /// Look up an object by id and decode it into its kind-tagged form.
    ///
    /// Gitlink (submodule) entries inside trees are not part of the
    /// projected mode set and are omitted from the entry list.
    pub fn lookup(&self, id: ObjectId) -> StoreResult<Object> {
        self.with_repo(|repo| {
            let obj = repo.find_object(id.raw(), None).map_err(|e| {
                if e.code() == ErrorCode::NotFound {
                    StoreError::ObjectNotFound(id.to_string())
                } else {
                    StoreError::Git(e)
                }
            })?;

            match obj.kind() {
                Some(ObjectType::Commit) => {
                    let commit = obj.into_commit().map_err(|_| StoreError::UnexpectedKind {
                        id: id.to_string(),
                        expected: "commit",
                        found: "unknown".to_string(),
                    })?;
                    Ok(Object::Commit(CommitMeta::from_git2(&commit)))
                }
                Some(ObjectType::Tree) => {
                    let tree = obj.into_tree().map_err(|_| StoreError::UnexpectedKind {
                        id: id.to_string(),
                        expected: "tree",
                        found: "unknown".to_string(),
                    })?;
                    Ok(Object::Tree(tree_entries(&tree)))
                }
                Some(ObjectType::Blob) => {
                    let blob = obj.into_blob().map_err(|_| StoreError::UnexpectedKind {
                        id: id.to_string(),
                        expected: "blob",
                        found: "unknown".to_string(),
                    })?;
                    Ok(Object::Blob {
                        size: blob.size() as u64,
                    })
                }
                other => Err(StoreError::UnexpectedKind {
                    id: id.to_string(),
                    expected: "commit, tree or blob",
                    found: format!("{:?}", other),
                }),
            }
        })
    }

    /// Read the decoded raw content of any object, regardless of kind.
    pub fn read_raw(&self, id: ObjectId) -> StoreResult<Vec<u8>> {
        self.with_repo(|repo| {
            let odb = repo.odb()?;
            let obj = odb.read(id.raw()).map_err(|e| {
                if e.code() == ErrorCode::NotFound {
                    StoreError::ObjectNotFound(id.to_string())
                } else {
                    StoreError::Git(e)
                }
            })?;
            Ok(obj.data().to_vec())
        })
    }

    /// Decoded length of any object, without materializing its content.
    pub fn raw_size(&self, id: ObjectId) -> StoreResult<u64> {
        self.with_repo(|repo| {
            let odb = repo.odb()?;
            let (size, _kind) = odb.read_header(id.raw()).map_err(|e| {
                if e.code() == ErrorCode::NotFound {
                    StoreError::ObjectNotFound(id.to_string())
                } else {
                    StoreError::Git(e)
                }
            })?;
            Ok(size as u64)
        })
    }

    // ==================== Enumeration ====================

    /// Enumerate every object id in the store.
    ///
    /// Full scan per call; nothing is cached between requests.
    pub fn object_ids(&self) -> StoreResult<Vec<ObjectId>> {
        self.with_repo(|repo| {
            let odb = repo.odb()?;
            let mut ids = Vec::new();
            odb.foreach(|oid| {
                ids.push(ObjectId::new(*oid));
                true
            })?;
            Ok(ids)
        })
    }

    /// Enumerate every commit id in the store.
    ///
    /// Full scan per call, filtering by decoded kind.
    pub fn commit_ids(&self) -> StoreResult<Vec<ObjectId>> {
        self.with_repo(|repo| {
            let odb = repo.odb()?;
            let mut ids = Vec::new();
            odb.foreach(|oid| {
                if let Ok((_, kind)) = odb.read_header(*oid) {
                    if kind == ObjectType::Commit {
                        ids.push(ObjectId::new(*oid));
                    }
                }
                true
            })?;
            Ok(ids)
        })
    }

    // ==================== Ref Operations ====================

    /// List all refs with their target ids.
    ///
    /// Names are returned without the leading `refs/`; references outside
    /// that prefix (and unresolvable ones) are skipped. Full scan per call.
    pub fn list_refs(&self) -> StoreResult<Vec<RefEntry>> {
        self.with_repo(|repo| {
            let mut refs = Vec::new();
            for reference in repo.references()? {
                let reference = reference?;
                let name = match reference.name() {
                    Some(n) => n,
                    None => continue,
                };
                let short = match name.strip_prefix("refs/") {
                    Some(s) => s.to_string(),
                    None => continue,
                };
                match repo.refname_to_id(name) {
                    Ok(target) => refs.push(RefEntry {
                        name: short,
                        target: ObjectId::new(target),
                    }),
                    Err(e) => {
                        warn!(refname = name, error = %e, "skipping unresolvable ref");
                    }
                }
            }
            Ok(refs)
        })
    }

    /// Resolve a single ref name (without the `refs/` prefix) to its target.
    pub fn resolve_ref(&self, name: &str) -> StoreResult<ObjectId> {
        self.with_repo(|repo| {
            let full = format!("refs/{}", name);
            repo.refname_to_id(&full)
                .map(ObjectId::new)
                .map_err(|_| StoreError::RefNotFound(name.to_string()))
        })
    }

    /// Get the commit HEAD currently points at.
    pub fn head(&self) -> StoreResult<ObjectId> {
        self.with_repo(|repo| {
            let head = repo.head().map_err(|e| {
                if e.code() == ErrorCode::UnbornBranch {
                    StoreError::EmptyRepository
                } else {
                    StoreError::Git(e)
                }
            })?;

            let commit = head.peel_to_commit()?;
            Ok(ObjectId::new(commit.id()))
        })
    }
}

/// Decode a git2 tree into owned entries, skipping unprojectable kinds.
fn tree_entries(tree: &git2::Tree<'_>) -> Vec<TreeEntry> {
    tree.iter()
        .filter_map(|entry| {
            let mode = entry_mode(&entry)?;
            let name = String::from_utf8_lossy(entry.name_bytes()).into_owned();
            Some(TreeEntry {
                name,
                mode,
                id: ObjectId::new(entry.id()),
            })
        })
        .collect()
}

fn entry_mode(entry: &git2::TreeEntry<'_>) -> Option<EntryMode> {
    match entry.kind() {
        Some(ObjectType::Tree) => Some(EntryMode::Directory),
        Some(ObjectType::Blob) => {
            if entry.filemode() == i32::from(git2::FileMode::Link) {
                Some(EntryMode::Symlink)
            } else {
                Some(EntryMode::Regular)
            }
        }
        // gitlinks and anything exotic are not projected
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use git2::Signature;
    use tempfile::TempDir;

    fn setup() -> (TempDir, GitStore) {
        let dir = TempDir::new().unwrap();
        Repository::init(dir.path()).unwrap();
        let store = GitStore::open(dir.path()).unwrap();
        (dir, store)
    }

    fn raw_repo(dir: &TempDir) -> Repository {
        Repository::open(dir.path()).unwrap()
    }

    /// Build a commit whose tree holds `readme.txt` -> "hi" plus a symlink.
    fn commit_with_files(repo: &Repository, parents: &[git2::Oid]) -> git2::Oid {
        let blob = repo.blob(b"hi").unwrap();
        let link = repo.blob(b"readme.txt").unwrap();
        let mut tb = repo.treebuilder(None).unwrap();
        tb.insert("readme.txt", blob, git2::FileMode::Blob.into())
            .unwrap();
        tb.insert("shortcut", link, git2::FileMode::Link.into())
            .unwrap();
        let tree_id = tb.write().unwrap();
        let tree = repo.find_tree(tree_id).unwrap();

        let sig = Signature::now("Test", "test@test.com").unwrap();
        let parent_commits: Vec<git2::Commit<'_>> = parents
            .iter()
            .map(|id| repo.find_commit(*id).unwrap())
            .collect();
        let parent_refs: Vec<&git2::Commit<'_>> = parent_commits.iter().collect();

        repo.commit(None, &sig, &sig, "add readme", &tree, &parent_refs)
            .unwrap()
    }

    #[test]
    fn test_open_missing_repo() {
        let dir = TempDir::new().unwrap();
        let result = GitStore::open(dir.path().join("nope"));
        assert!(matches!(result, Err(StoreError::NotInitialized(_))));
    }

    #[test]
    fn test_lookup_all_kinds() {
        let (dir, store) = setup();
        let repo = raw_repo(&dir);
        let commit_oid = commit_with_files(&repo, &[]);

        let commit_id = ObjectId::new(commit_oid);
        let meta = match store.lookup(commit_id).unwrap() {
            Object::Commit(meta) => meta,
            other => panic!("expected commit, got {}", other.kind_name()),
        };
        assert!(meta.parents.is_empty());

        let entries = match store.lookup(meta.tree).unwrap() {
            Object::Tree(entries) => entries,
            other => panic!("expected tree, got {}", other.kind_name()),
        };
        assert_eq!(entries.len(), 2);
        let readme = entries.iter().find(|e| e.name == "readme.txt").unwrap();
        assert_eq!(readme.mode, EntryMode::Regular);
        let shortcut = entries.iter().find(|e| e.name == "shortcut").unwrap();
        assert_eq!(shortcut.mode, EntryMode::Symlink);

        match store.lookup(readme.id).unwrap() {
            Object::Blob { size } => assert_eq!(size, 2),
            other => panic!("expected blob, got {}", other.kind_name()),
        }
    }

    #[test]
    fn test_lookup_missing_object() {
        let (_dir, store) = setup();
        let absent = ObjectId::from_hex(&"1".repeat(crate::store::OID_HEX_LEN)).unwrap();
        let result = store.lookup(absent);
        assert!(matches!(result, Err(StoreError::ObjectNotFound(_))));
        assert!(result.unwrap_err().is_not_found());
    }

    #[test]
    fn test_read_raw_blob_and_size() {
        let (dir, store) = setup();
        let repo = raw_repo(&dir);
        let blob = ObjectId::new(repo.blob(b"hello raw").unwrap());

        assert_eq!(store.read_raw(blob).unwrap(), b"hello raw");
        assert_eq!(store.raw_size(blob).unwrap(), 9);
    }

    #[test]
    fn test_read_raw_commit_is_kind_independent() {
        let (dir, store) = setup();
        let repo = raw_repo(&dir);
        let commit = ObjectId::new(commit_with_files(&repo, &[]));

        // raw commit content is its decoded header text
        let data = store.read_raw(commit).unwrap();
        assert_eq!(store.raw_size(commit).unwrap(), data.len() as u64);
        let text = String::from_utf8(data).unwrap();
        assert!(text.starts_with("tree "));
        assert!(text.contains("add readme"));
    }

    #[test]
    fn test_enumeration() {
        let (dir, store) = setup();
        let repo = raw_repo(&dir);
        let commit = ObjectId::new(commit_with_files(&repo, &[]));

        // commit + tree + two blobs
        let objects = store.object_ids().unwrap();
        assert_eq!(objects.len(), 4);
        assert!(objects.contains(&commit));

        let commits = store.commit_ids().unwrap();
        assert_eq!(commits, vec![commit]);
    }

    #[test]
    fn test_refs_and_head() {
        let (dir, store) = setup();
        let repo = raw_repo(&dir);
        let commit = commit_with_files(&repo, &[]);

        repo.reference("refs/heads/main", commit, true, "test")
            .unwrap();
        repo.reference("refs/heads/feature/x", commit, true, "test")
            .unwrap();
        repo.set_head("refs/heads/main").unwrap();

        let mut names: Vec<String> = store
            .list_refs()
            .unwrap()
            .into_iter()
            .map(|r| r.name)
            .collect();
        names.sort();
        assert_eq!(names, vec!["heads/feature/x", "heads/main"]);

        let target = store.resolve_ref("heads/main").unwrap();
        assert_eq!(target, ObjectId::new(commit));
        assert!(matches!(
            store.resolve_ref("heads/missing"),
            Err(StoreError::RefNotFound(_))
        ));

        assert_eq!(store.head().unwrap(), ObjectId::new(commit));
    }

    #[test]
    fn test_head_on_empty_repo() {
        let (_dir, store) = setup();
        assert!(matches!(store.head(), Err(StoreError::EmptyRepository)));
    }
}
