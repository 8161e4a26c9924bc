//! Shared helpers for integration tests: building throwaway git repositories.

use std::path::Path;

use git2::{Oid, Repository, Signature};

/// Initialize a repository with user config set.
pub fn init_repo(dir: &Path) -> Repository {
    let repo = Repository::init(dir).expect("failed to init repo");
    {
        let mut config = repo.config().expect("failed to open config");
        config
            .set_str("user.name", "Test User")
            .expect("failed to set user.name");
        config
            .set_str("user.email", "test@example.com")
            .expect("failed to set user.email");
    }
    repo
}

/// Create a commit touching a single file, returning its id.
pub fn commit(repo: &Repository, repo_dir: &Path, message: &str) -> Oid {
    let file_path = repo_dir.join("test.txt");
    std::fs::write(&file_path, format!("{}\n{}", message, std::process::id()))
        .expect("failed to write test file");

    let mut index = repo.index().expect("failed to open index");
    index
        .add_path(Path::new("test.txt"))
        .expect("failed to add file");
    index.write().expect("failed to write index");

    let tree_id = index.write_tree().expect("failed to write tree");
    let tree = repo.find_tree(tree_id).expect("failed to find tree");
    let sig = Signature::now("Test User", "test@example.com").expect("failed to create sig");
    let parent = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
    let parents: Vec<&git2::Commit> = parent.iter().collect();

    repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
        .expect("failed to create commit")
}

/// Tag a commit with a lightweight tag.
pub fn tag(repo: &Repository, oid: Oid, name: &str) {
    repo.tag_lightweight(
        name,
        &repo.find_object(oid, None).expect("failed to find object"),
        false,
    )
    .expect("failed to create tag");
}
