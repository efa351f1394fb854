//! Locating the repository root and the git executable.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::GitError;

/// Marker entry that identifies a repository root (a directory, or a file
/// for worktrees and submodules).
const REPOSITORY_MARKER: &str = ".git";

#[cfg(windows)]
const WELL_KNOWN_LOCATIONS: &[&str] = &[
    r"C:\Program Files\Git\cmd\git.exe",
    r"C:\Program Files (x86)\Git\cmd\git.exe",
    r"C:\Program Files\Git\bin\git.exe",
    r"C:\Program Files (x86)\Git\bin\git.exe",
];

#[cfg(not(windows))]
const WELL_KNOWN_LOCATIONS: &[&str] = &[
    "/usr/bin/git",
    "/usr/local/bin/git",
    "/opt/homebrew/bin/git",
];

/// Walk upward from `start` until a directory containing `.git` is found.
pub fn find_repository_root(start: &Path) -> Result<PathBuf, GitError> {
    let start = start
        .canonicalize()
        .map_err(|_| GitError::RepositoryNotFound(start.to_path_buf()))?;

    let root = start
        .ancestors()
        .find(|dir| dir.join(REPOSITORY_MARKER).exists())
        .map(Path::to_path_buf);

    root.ok_or(GitError::RepositoryNotFound(start))
}

type LookupStrategy = fn() -> Option<PathBuf>;

/// Locate the git executable.
///
/// Tries, in order:
/// 1. `PATH` lookup via the `which` crate
/// 2. Well-known install locations
/// 3. The Git for Windows install registry (Windows only)
pub fn find_git_executable() -> Result<PathBuf, GitError> {
    const STRATEGIES: &[(&str, LookupStrategy)] = &[
        ("PATH", from_path),
        ("well-known location", from_well_known_locations),
        ("install registry", from_install_registry),
    ];

    for (name, strategy) in STRATEGIES {
        if let Some(path) = strategy() {
            debug!("Found git via {}: {}", name, path.display());
            return Ok(path);
        }
    }

    Err(GitError::ExecutableNotFound)
}

fn from_path() -> Option<PathBuf> {
    which::which("git").ok()
}

fn from_well_known_locations() -> Option<PathBuf> {
    WELL_KNOWN_LOCATIONS
        .iter()
        .map(PathBuf::from)
        .find(|path| path.is_file())
}

#[cfg(windows)]
fn from_install_registry() -> Option<PathBuf> {
    use std::process::Command;

    let output = Command::new("reg")
        .args(["query", r"HKLM\SOFTWARE\GitForWindows", "/v", "InstallPath"])
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let install_path = parse_registry_install_path(&stdout)?;
    let git_exe = PathBuf::from(install_path).join("cmd").join("git.exe");
    git_exe.is_file().then_some(git_exe)
}

#[cfg(not(windows))]
fn from_install_registry() -> Option<PathBuf> {
    None
}

/// Pull the `InstallPath` value out of `reg query` output.
///
/// ```text
/// HKEY_LOCAL_MACHINE\SOFTWARE\GitForWindows
///     InstallPath    REG_SZ    C:\Program Files\Git
/// ```
#[cfg_attr(not(windows), allow(dead_code))]
fn parse_registry_install_path(output: &str) -> Option<String> {
    output.lines().find_map(|line| {
        let line = line.trim();
        let rest = line.strip_prefix("InstallPath")?;
        let (_, value) = rest.split_once("REG_SZ")?;
        let value = value.trim();
        (!value.is_empty()).then(|| value.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_root_from_nested_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join(".git")).unwrap();
        let nested = dir.path().join("src").join("deep");
        std::fs::create_dir_all(&nested).unwrap();

        let root = find_repository_root(&nested).unwrap();
        assert_eq!(root, dir.path().canonicalize().unwrap());
    }

    #[test]
    fn test_find_root_accepts_git_file() {
        // Worktrees use a `.git` file instead of a directory
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(".git"), "gitdir: /elsewhere\n").unwrap();

        let root = find_repository_root(dir.path()).unwrap();
        assert_eq!(root, dir.path().canonicalize().unwrap());
    }

    #[test]
    fn test_find_root_missing_path() {
        let result = find_repository_root(Path::new("/definitely/not/a/real/path/xyz"));
        assert!(matches!(result, Err(GitError::RepositoryNotFound(_))));
    }

    #[test]
    fn test_parse_registry_install_path() {
        let output = "\r\nHKEY_LOCAL_MACHINE\\SOFTWARE\\GitForWindows\r\n    InstallPath    REG_SZ    C:\\Program Files\\Git\r\n\r\n";
        assert_eq!(
            parse_registry_install_path(output).as_deref(),
            Some("C:\\Program Files\\Git")
        );
    }

    #[test]
    fn test_parse_registry_install_path_missing_value() {
        assert!(parse_registry_install_path("ERROR: The system was unable to find").is_none());
        assert!(parse_registry_install_path("    InstallPath    REG_SZ    ").is_none());
    }

    #[test]
    fn test_find_git_executable_when_installed() {
        // git is required by the rest of the test suite
        let path = find_git_executable().unwrap();
        assert!(path.exists());
    }
}
