use assert_cmd::Command;
use serde_json::Value;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

pub struct TestEnv {
    _tmp: TempDir,
    pub home: PathBuf,
    pub work: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        let tmp = TempDir::new().expect("create temp dir");
        let home = tmp.path().join("home");
        let work = tmp.path().join("work");
        fs::create_dir_all(&home).expect("create isolated home");
        fs::create_dir_all(&work).expect("create work dir");

        Self {
            _tmp: tmp,
            home,
            work,
        }
    }

    pub fn write_input(&self, name: &str, text: &str) -> PathBuf {
        let p = self.work.join(name);
        fs::write(&p, text).expect("write input fixture");
        p
    }

    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("stg").expect("stg binary");
        cmd.env("HOME", &self.home).current_dir(&self.work);
        cmd
    }

    pub fn run_json(&self, args: &[&str]) -> Value {
        let mut cmd = self.cmd();
        let out = cmd
            .arg("--json")
            .args(args)
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        serde_json::from_slice(&out).expect("valid json output")
    }

    pub fn read_json(&self, name: &str) -> Value {
        let raw = fs::read_to_string(self.work.join(name)).expect("read artifact");
        serde_json::from_str(&raw).expect("valid artifact json")
    }
}
