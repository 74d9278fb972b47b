//! Shared test utilities for the CLI end-to-end tests.
//!
//! Every fixture owns a temporary platform root. Commands built from it point
//! `app-repos` at that root, disable ownership normalization and give git a
//! private global config, so tests never touch the real machine state.
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     let fixture = TestFixture::new();
//!     fixture.command().arg("list").assert().success();
//! }
//! ```

use assert_fs::prelude::*;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    pub use assert_cmd::cargo::cargo_bin_cmd;
    pub use assert_fs::prelude::*;
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::{git, RemoteStore};
    pub use super::TestFixture;
}

/// Primary repository URL used by fixtures that never touch the network.
#[allow(dead_code)]
pub const OFFLINE_DEFAULT: &str = "https://github.com/getumbrel/umbrel-apps.git";

/// A temporary platform root.
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
    default_repo: String,
}

impl TestFixture {
    /// Create a new fixture with an empty root.
    pub fn new() -> Self {
        Self {
            temp_dir: assert_fs::TempDir::new().expect("Failed to create temp directory"),
            default_repo: OFFLINE_DEFAULT.to_string(),
        }
    }

    /// Use `url` as the primary repository.
    #[allow(dead_code)]
    pub fn with_default_repo(mut self, url: &str) -> Self {
        self.default_repo = url.to_string();
        self
    }

    /// Write the registry document verbatim.
    #[allow(dead_code)]
    pub fn with_registry(self, content: &str) -> Self {
        self.temp_dir
            .child("db/user.json")
            .write_str(content)
            .expect("Failed to write registry");
        self
    }

    /// Create an empty directory below the root.
    #[allow(dead_code)]
    pub fn with_dir(self, path: &str) -> Self {
        self.temp_dir
            .child(path)
            .create_dir_all()
            .expect("Failed to create directory");
        self
    }

    /// Get the path to the platform root.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Path of the registry document.
    #[allow(dead_code)]
    pub fn registry_path(&self) -> PathBuf {
        self.path().join("db/user.json")
    }

    /// Parsed registry document.
    #[allow(dead_code)]
    pub fn registry(&self) -> serde_json::Value {
        let content =
            std::fs::read_to_string(self.registry_path()).expect("Failed to read registry");
        serde_json::from_str(&content).expect("Registry should be valid JSON")
    }

    /// Directory a URL is cloned into.
    #[allow(dead_code)]
    pub fn clone_path(&self, url: &str) -> PathBuf {
        let slug: String = url
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
            .collect();
        self.path().join("repos").join(slug)
    }

    #[allow(dead_code)]
    pub fn child(&self, path: &str) -> assert_fs::fixture::ChildPath {
        self.temp_dir.child(path)
    }

    /// Create a command rooted at this fixture.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("app-repos");
        cmd.current_dir(self.path())
            .env("APP_REPOS_ROOT", self.path())
            .env("APP_REPOS_DEFAULT_REPO", &self.default_repo)
            .env("APP_REPOS_OWNER", "none")
            .env("APP_REPOS_GIT_TIMEOUT", "20")
            .env("GIT_CONFIG_GLOBAL", self.path().join("gitconfig"))
            .env("GIT_CONFIG_NOSYSTEM", "1")
            .env_remove("RUST_LOG");
        cmd
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Run git with a throwaway identity, panicking on failure.
#[allow(dead_code)]
pub fn git(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .current_dir(dir)
        .args(["-c", "user.name=Test", "-c", "user.email=test@example.com"])
        .args(["-c", "init.defaultBranch=master", "-c", "commit.gpgsign=false"])
        .args(args)
        .env("GIT_CONFIG_NOSYSTEM", "1")
        .output()
        .expect("Failed to run git");
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// A local bare repository standing in for a remote app store.
#[allow(dead_code)]
pub struct RemoteStore {
    work: PathBuf,
    bare: PathBuf,
}

#[allow(dead_code)]
impl RemoteStore {
    /// Create `<base>/<name>.git` whose master branch holds a manifest with
    /// `id` (or no manifest) and one directory per app.
    pub fn create(base: &Path, name: &str, id: Option<&str>, apps: &[&str]) -> Self {
        let work = base.join(format!("{}-work", name));
        let bare = base.join(format!("{}.git", name));
        std::fs::create_dir_all(&work).expect("Failed to create work tree");
        git(&work, &["init", "-q", "-b", "master"]);

        if let Some(id) = id {
            std::fs::write(
                work.join("umbrel-app-store.yml"),
                format!("id: {}\nname: {}\n", id, name),
            )
            .expect("Failed to write manifest");
        }
        for app in apps {
            let app_dir = work.join(app);
            std::fs::create_dir_all(&app_dir).expect("Failed to create app");
            std::fs::write(app_dir.join("umbrel-app.yml"), format!("id: {}\n", app))
                .expect("Failed to write app manifest");
        }
        std::fs::write(work.join("README.md"), name).expect("Failed to write readme");
        git(&work, &["add", "-A"]);
        git(&work, &["commit", "-q", "-m", "initial"]);
        git(
            base,
            &["clone", "-q", "--bare", &work.to_string_lossy(), &bare.to_string_lossy()],
        );
        Self { work, bare }
    }

    /// `file://` URL of the bare repository.
    pub fn url(&self) -> String {
        format!("file://{}", self.bare.display())
    }

    /// Commit `content` to `file` on `branch`, branched from master, and push it.
    pub fn commit(&self, branch: &str, file: &str, content: &str) {
        git(&self.work, &["checkout", "-q", "-B", branch]);
        let target = self.work.join(file);
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(target, content).expect("Failed to write file");
        git(&self.work, &["add", "-A"]);
        git(&self.work, &["commit", "-q", "-m", &format!("update {}", file)]);
        git(
            &self.work,
            &["push", "-q", &self.bare.to_string_lossy(), &format!("{0}:{0}", branch)],
        );
        git(&self.work, &["checkout", "-q", "master"]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_creates_temp_dir() {
        let fixture = TestFixture::new();
        assert!(fixture.path().exists());
    }

    #[test]
    fn test_fixture_with_registry() {
        let fixture = TestFixture::new().with_registry(r#"{"repos": []}"#);
        assert_eq!(fixture.registry()["repos"], serde_json::json!([]));
    }

    #[test]
    #[cfg_attr(not(feature = "integration-tests"), ignore)]
    fn test_remote_store_commit_creates_nested_paths() {
        let fixture = TestFixture::new();
        let store = RemoteStore::create(fixture.path(), "apps", Some("apps"), &[]);

        store.commit("staging", "new-app/umbrel-app.yml", "id: new-app\n");

        let listed = git(&store.bare, &["ls-tree", "-r", "--name-only", "staging"]);
        assert!(listed.lines().any(|l| l == "new-app/umbrel-app.yml"));
        let master = git(&store.bare, &["ls-tree", "-r", "--name-only", "master"]);
        assert!(!master.contains("new-app"));
    }

    #[test]
    fn test_clone_path_slug() {
        let fixture = TestFixture::new();
        assert!(fixture
            .clone_path("https://github.com/a/b.git")
            .ends_with("repos/https---github-com-a-b-git"));
    }
}
