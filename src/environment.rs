use std::path::{Path, PathBuf};

/// Comment line introducing the managed export block in a profile
pub const PROFILE_COMMENT: &str = "# Go environment variables";

pub(crate) const PATH_EXPORT: &str = "export PATH=$PATH:";
pub(crate) const GOPATH_EXPORT: &str = "export GOPATH=";
pub(crate) const GOROOT_EXPORT: &str = "export GOROOT=";

/// Go environment configuration for one installation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoEnvironment {
    /// Appended to PATH: `<install>/go/bin`
    pub bin_path: PathBuf,
    /// GOPATH: `<install>/workspace`
    pub gopath: PathBuf,
    /// GOROOT: `<install>/go`
    pub goroot: PathBuf,
}

impl GoEnvironment {
    /// Create the environment for an install directory (`<root>/<version>/<arch>`)
    pub fn for_install(install_dir: &Path) -> Self {
        let goroot = install_dir.join("go");
        Self {
            bin_path: goroot.join("bin"),
            gopath: install_dir.join("workspace"),
            goroot,
        }
    }

    /// The three export lines written to the profile, in order
    pub fn export_lines(&self) -> [String; 3] {
        [
            format!("{PATH_EXPORT}{}", self.bin_path.display()),
            format!("{GOPATH_EXPORT}{}", self.gopath.display()),
            format!("{GOROOT_EXPORT}{}", self.goroot.display()),
        ]
    }
}
