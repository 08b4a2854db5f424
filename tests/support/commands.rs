//! Command helper methods for Test.

use super::Test;
use assert_cmd::Command;
use std::process::Output;

impl Test {
    /// Create a devsecrets command with an isolated environment.
    ///
    /// - HOME points at the temporary home directory
    /// - the current directory is the test project directory
    /// - colors are off and no DEVSECRETS_* variables leak in
    pub fn cmd(&self) -> Command {
        #[allow(deprecated)]
        let mut cmd = Command::cargo_bin("devsecrets").expect("failed to find devsecrets binary");
        cmd.env("HOME", self.home.path());
        // Windows uses USERPROFILE instead of HOME for home directory
        cmd.env("USERPROFILE", self.home.path());
        cmd.env("NO_COLOR", "1");
        cmd.env_remove("DEVSECRETS_INPUT_FILE");
        cmd.env_remove("DEVSECRETS_SCRIPT");
        cmd.env_remove("DEVSECRETS_VERBOSE");
        cmd.env_remove("DEVSECRETS_LOG");
        cmd.current_dir(self.dir.path());
        cmd
    }

    /// `devsecrets update --input-file devsecrets.json`, answering prompts from `stdin`.
    pub fn update(&self, stdin: &str) -> Output {
        self.cmd()
            .args(["update", "--input-file", super::MANIFEST_FILE])
            .write_stdin(stdin)
            .output()
            .expect("failed to run devsecrets update")
    }

    /// `devsecrets update --force`.
    pub fn update_force(&self, stdin: &str) -> Output {
        self.cmd()
            .args(["update", "--force", "--input-file", super::MANIFEST_FILE])
            .write_stdin(stdin)
            .output()
            .expect("failed to run devsecrets update --force")
    }

    /// `devsecrets delete --name NAME`.
    pub fn delete(&self, name: &str) -> Output {
        self.cmd()
            .args(["delete", "--name", name, "--input-file", super::MANIFEST_FILE])
            .output()
            .expect("failed to run devsecrets delete")
    }

    /// `devsecrets delete --all`.
    pub fn delete_all(&self) -> Output {
        self.cmd()
            .args(["delete", "--all", "--input-file", super::MANIFEST_FILE])
            .output()
            .expect("failed to run devsecrets delete --all")
    }

    /// `devsecrets status`.
    pub fn status(&self) -> Output {
        self.cmd()
            .args(["status", "--input-file", super::MANIFEST_FILE])
            .output()
            .expect("failed to run devsecrets status")
    }
}
