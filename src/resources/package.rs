//! Python package installation resource.
use std::collections::HashSet;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context as _, Result};

use super::error::ResourceError;
use super::{Applicable, ResourceChange, ResourceState};
use crate::config::plan::PackageInstallMode;
use crate::exec::Executor;

/// Subdirectories of a checkout that may be the registered editable path
/// (src-layout projects register `<repo>/src`).
pub const EDITABLE_CHECK_DIRS: &[&str] = &["src"];

/// Prints the interpreter's user site-packages dir and its global ones, one
/// per line.
const SITE_DIRS_SCRIPT: &str = "import site\n\
print(site.getusersitepackages())\n\
for d in getattr(site, 'getsitepackages', lambda: [])():\n    print(d)\n";

/// A repository installed with `python -m pip install`.
#[derive(Debug)]
pub struct PipPackageResource<'a> {
    /// The checkout being installed.
    pub target: PathBuf,
    /// How it is installed.
    pub mode: PackageInstallMode,
    python: String,
    break_system_packages: bool,
    executor: &'a dyn Executor,
}

impl<'a> PipPackageResource<'a> {
    /// Create a new package resource.
    #[must_use]
    pub const fn new(
        target: PathBuf,
        mode: PackageInstallMode,
        python: String,
        break_system_packages: bool,
        executor: &'a dyn Executor,
    ) -> Self {
        Self {
            target,
            mode,
            python,
            break_system_packages,
            executor,
        }
    }

    /// Arguments passed to the interpreter.
    #[must_use]
    pub fn args(&self) -> Vec<OsString> {
        let mut args: Vec<OsString> = ["-m", "pip", "install"].map(OsString::from).into();
        if matches!(
            self.mode,
            PackageInstallMode::Install | PackageInstallMode::EditableUser
        ) {
            args.push("--user".into());
        }
        if self.break_system_packages {
            args.push("--break-system-packages".into());
        }
        // `--editable` takes the checkout as its value.
        if self.mode.is_editable() {
            args.push("--editable".into());
        }
        args.push(self.target.clone().into_os_string());
        args
    }

    /// Determine the resource state from a pre-fetched set of editable paths.
    ///
    /// Only editable modes can be detected as already installed; a plain
    /// install is always reported missing and reinstalled.
    #[must_use]
    pub fn state_from_installed(&self, installed: &HashSet<PathBuf>) -> ResourceState {
        if self.mode == PackageInstallMode::None {
            return ResourceState::Invalid {
                reason: "no package install configured".to_string(),
            };
        }
        if !self.mode.is_editable() {
            return ResourceState::Missing;
        }

        let registered = std::iter::once(self.target.clone())
            .chain(EDITABLE_CHECK_DIRS.iter().map(|d| self.target.join(d)))
            .any(|candidate| installed.contains(&candidate));
        if registered {
            ResourceState::Correct
        } else {
            ResourceState::Missing
        }
    }
}

impl Applicable for PipPackageResource<'_> {
    fn description(&self) -> String {
        let args = self.args();
        let rendered: Vec<_> = args.iter().map(|a| a.to_string_lossy()).collect();
        format!("{} {}", self.python, rendered.join(" "))
    }

    fn apply(&self) -> Result<ResourceChange> {
        let args = self.args();
        let arg_refs: Vec<&OsStr> = args.iter().map(OsString::as_os_str).collect();
        let result = self.executor.run_attached(None, &self.python, &arg_refs)?;
        if !result.success {
            return Err(ResourceError::failed("pip install", &result).into());
        }
        Ok(ResourceChange::Applied)
    }
}

/// Source of the paths currently installed in editable mode.
pub trait EditableRegistry: Send + Sync + std::fmt::Debug {
    /// All registered editable paths.
    ///
    /// # Errors
    ///
    /// Returns an error if the registry cannot be queried.
    fn editable_paths(&self) -> Result<HashSet<PathBuf>>;
}

/// Reads editable installs from the `*.pth` files of an interpreter's
/// site-packages directories.
#[derive(Debug)]
pub struct SitePackagesRegistry {
    python: String,
    executor: Arc<dyn Executor>,
}

impl SitePackagesRegistry {
    /// Query the site-packages of `python` through `executor`.
    #[must_use]
    pub const fn new(python: String, executor: Arc<dyn Executor>) -> Self {
        Self { python, executor }
    }

    /// Site-packages directories of the interpreter, user dir first.
    ///
    /// # Errors
    ///
    /// Returns an error if the interpreter cannot be run.
    pub fn site_dirs(&self) -> Result<Vec<PathBuf>> {
        let result = self
            .executor
            .run(&self.python, &["-c", SITE_DIRS_SCRIPT])
            .with_context(|| format!("querying site-packages of {}", self.python))?;
        Ok(result
            .stdout
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(PathBuf::from)
            .collect())
    }
}

impl EditableRegistry for SitePackagesRegistry {
    fn editable_paths(&self) -> Result<HashSet<PathBuf>> {
        let mut paths = HashSet::new();
        for dir in self.site_dirs()? {
            read_pth_dir(&dir, &mut paths)?;
        }
        Ok(paths)
    }
}

/// Collect the path entries of every `*.pth` file in `dir`.
///
/// A missing directory contributes nothing. Unreadable files are skipped.
///
/// # Errors
///
/// Returns an error if `dir` exists but cannot be listed.
pub fn read_pth_dir(dir: &Path, paths: &mut HashSet<PathBuf>) -> Result<()> {
    if !dir.is_dir() {
        return Ok(());
    }
    let entries =
        std::fs::read_dir(dir).with_context(|| format!("reading directory: {}", dir.display()))?;
    for entry in entries.flatten() {
        let path = entry.path();
        if path.extension().and_then(OsStr::to_str) != Some("pth") {
            continue;
        }
        if let Ok(content) = std::fs::read_to_string(&path) {
            parse_pth(&content, dir, paths);
        }
    }
    Ok(())
}

/// Add the path lines of a `.pth` file to `paths`.
///
/// Comments and `import` lines are ignored; relative entries are resolved
/// against `dir`, the directory holding the file.
pub fn parse_pth(content: &str, dir: &Path, paths: &mut HashSet<PathBuf>) {
    for line in content.lines().map(str::trim) {
        if line.is_empty()
            || line.starts_with('#')
            || line.starts_with("import ")
            || line.starts_with("import\t")
        {
            continue;
        }
        let entry = Path::new(line);
        if entry.is_absolute() {
            paths.insert(entry.to_path_buf());
        } else {
            paths.insert(dir.join(entry));
        }
    }
}


#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::resources::test_helpers::MockExecutor;

    fn resource(mode: PackageInstallMode, brk: bool, executor: &MockExecutor) -> PipPackageResource<'_> {
        PipPackageResource::new(
            PathBuf::from("/repos/bl-fork"),
            mode,
            "python3".to_string(),
            brk,
            executor,
        )
    }

    fn rendered(resource: &PipPackageResource<'_>) -> String {
        resource.description()
    }

    // -----------------------------------------------------------------------
    // Command lines
    // -----------------------------------------------------------------------

    #[test]
    fn install_is_user_install() {
        let executor = MockExecutor::with_responses(Vec::new());
        assert_eq!(
            rendered(&resource(PackageInstallMode::Install, false, &executor)),
            "python3 -m pip install --user /repos/bl-fork"
        );
    }

    #[test]
    fn install_with_break_flag() {
        let executor = MockExecutor::with_responses(Vec::new());
        assert_eq!(
            rendered(&resource(PackageInstallMode::Install, true, &executor)),
            "python3 -m pip install --user --break-system-packages /repos/bl-fork"
        );
    }

    #[test]
    fn editable_user_install() {
        let executor = MockExecutor::with_responses(Vec::new());
        assert_eq!(
            rendered(&resource(PackageInstallMode::EditableUser, true, &executor)),
            "python3 -m pip install --user --break-system-packages --editable /repos/bl-fork"
        );
    }

    #[test]
    fn editable_value_is_checkout_with_break_flag() {
        let executor = MockExecutor::with_responses(Vec::new());
        for mode in [PackageInstallMode::EditableUser, PackageInstallMode::EditableSystem] {
            let args = resource(mode, true, &executor).args();
            let pos = args.iter().position(|a| a == "--editable").unwrap();
            assert_eq!(args[pos + 1], OsString::from("/repos/bl-fork"), "{mode:?}");
            assert!(args.contains(&OsString::from("--break-system-packages")));
        }
    }

    #[test]
    fn editable_system_install_with_break_flag() {
        let executor = MockExecutor::ok("");
        resource(PackageInstallMode::EditableSystem, true, &executor)
            .apply()
            .unwrap();
        assert_eq!(
            executor.commands(),
            ["python3 -m pip install --break-system-packages --editable /repos/bl-fork"]
        );
    }

    #[test]
    fn editable_system_install_has_no_user_flag() {
        let executor = MockExecutor::with_responses(Vec::new());
        assert_eq!(
            rendered(&resource(PackageInstallMode::EditableSystem, false, &executor)),
            "python3 -m pip install --editable /repos/bl-fork"
        );
    }

    #[test]
    fn apply_runs_interpreter_once() {
        let executor = MockExecutor::ok("");
        resource(PackageInstallMode::EditableUser, false, &executor)
            .apply()
            .unwrap();
        assert_eq!(
            executor.commands(),
            ["python3 -m pip install --user --editable /repos/bl-fork"]
        );
    }

    #[test]
    fn apply_failure_is_error() {
        let executor = MockExecutor::fail();
        let err = resource(PackageInstallMode::Install, false, &executor)
            .apply()
            .unwrap_err();
        assert!(err.to_string().contains("pip install"));
    }

    // -----------------------------------------------------------------------
    // Editable state
    // -----------------------------------------------------------------------

    #[test]
    fn editable_registered_at_root_is_correct() {
        let executor = MockExecutor::with_responses(Vec::new());
        let installed = HashSet::from([PathBuf::from("/repos/bl-fork")]);
        assert_eq!(
            resource(PackageInstallMode::EditableUser, false, &executor).state_from_installed(&installed),
            ResourceState::Correct
        );
    }

    #[test]
    fn editable_registered_at_src_is_correct() {
        let executor = MockExecutor::with_responses(Vec::new());
        let installed = HashSet::from([PathBuf::from("/repos/bl-fork/src")]);
        assert_eq!(
            resource(PackageInstallMode::EditableSystem, false, &executor).state_from_installed(&installed),
            ResourceState::Correct
        );
    }

    #[test]
    fn editable_elsewhere_is_missing() {
        let executor = MockExecutor::with_responses(Vec::new());
        let installed = HashSet::from([PathBuf::from("/repos/other")]);
        assert_eq!(
            resource(PackageInstallMode::EditableUser, false, &executor).state_from_installed(&installed),
            ResourceState::Missing
        );
    }

    #[test]
    fn plain_install_is_always_missing() {
        let executor = MockExecutor::with_responses(Vec::new());
        let installed = HashSet::from([PathBuf::from("/repos/bl-fork")]);
        assert_eq!(
            resource(PackageInstallMode::Install, false, &executor).state_from_installed(&installed),
            ResourceState::Missing
        );
    }

    // -----------------------------------------------------------------------
    // Registry
    // -----------------------------------------------------------------------

    #[test]
    fn parse_pth_skips_comments_and_imports() {
        let mut paths = HashSet::new();
        parse_pth(
            "# comment\n/home/u/Repos/HPI\nimport __editable___finder; __editable___finder.install()\n\nrelative/dir\n",
            Path::new("/site"),
            &mut paths,
        );
        assert_eq!(
            paths,
            HashSet::from([
                PathBuf::from("/home/u/Repos/HPI"),
                PathBuf::from("/site/relative/dir")
            ])
        );
    }

    #[test]
    fn read_pth_dir_only_reads_pth_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("__editable__.hpi-0.1.pth"), "/repos/HPI/src\n").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "/repos/ignored\n").unwrap();
        let mut paths = HashSet::new();
        read_pth_dir(dir.path(), &mut paths).unwrap();
        assert_eq!(paths, HashSet::from([PathBuf::from("/repos/HPI/src")]));
    }

    #[test]
    fn read_pth_dir_missing_dir_is_empty() {
        let mut paths = HashSet::new();
        read_pth_dir(Path::new("/definitely/not/a/site/dir"), &mut paths).unwrap();
        assert!(paths.is_empty());
    }

    #[test]
    fn site_packages_registry_reads_reported_dirs() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("easy.pth"), "/repos/bl-fork\n").unwrap();
        let stdout = format!("/nonexistent/user/site\n{}\n", dir.path().display());
        let executor = Arc::new(MockExecutor::ok(&stdout));
        let registry =
            SitePackagesRegistry::new("python3".to_string(), Arc::clone(&executor) as Arc<dyn Executor>);
        let paths = registry.editable_paths().unwrap();
        assert!(paths.contains(Path::new("/repos/bl-fork")));
        assert_eq!(executor.calls()[0].command, format!("python3 -c {SITE_DIRS_SCRIPT}"));
    }

    #[test]
    fn site_packages_registry_propagates_interpreter_failure() {
        let registry =
            SitePackagesRegistry::new("python3".to_string(), Arc::new(MockExecutor::fail()));
        assert!(registry.editable_paths().is_err());
    }
}
