use crate::hooks::{BuildHooks, LoggingHooks};
use crate::{BuildConfig, BuildContext, BuildOutcome};
use anyhow::{Context, Result};
use seqbuild_log::ErrorExtractor;
use std::path::PathBuf;
use std::process::Command;

/// Executes a [`BuildConfig`] and collects its errors.
pub struct BuildRunner {
    config: BuildConfig,
    context: BuildContext,
    working_dir: Option<PathBuf>,
    hooks: Box<dyn BuildHooks>,
}

impl BuildRunner {
    pub fn new(config: BuildConfig) -> Self {
        Self {
            config,
            context: BuildContext::default(),
            working_dir: None,
            hooks: Box::new(LoggingHooks),
        }
    }

    pub fn with_context(mut self, context: BuildContext) -> Self {
        self.context = context;
        self
    }

    pub fn with_working_dir(mut self, dir: PathBuf) -> Self {
        self.working_dir = Some(dir);
        self
    }

    pub fn with_hooks(mut self, hooks: Box<dyn BuildHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    /// Program and arguments after placeholder expansion.
    pub fn command_line(&self) -> Vec<String> {
        std::iter::once(self.config.cmd.clone())
            .chain(self.config.args.iter().map(|a| self.context.expand(a)))
            .collect()
    }

    fn command(&self) -> Command {
        let line = self.command_line();

        let mut cmd = if self.config.sh {
            shell_command(&line.join(" "))
        } else {
            let mut cmd = Command::new(&line[0]);
            cmd.args(&line[1..]);
            cmd
        };

        for (key, value) in &self.config.env {
            cmd.env(key, self.context.expand(value));
        }

        if let Some(ref dir) = self.working_dir {
            cmd.current_dir(dir);
        }
        cmd
    }

    /// Runs the build once.
    ///
    /// A non-zero exit is reported through [`BuildOutcome::success`]; only a
    /// failure to launch the process is an error.
    pub fn execute(&self) -> Result<BuildOutcome> {
        self.config.validate()?;
        self.hooks.pre_build(&self.config);

        let mut cmd = self.command();
        log::debug!("Running {:?}", cmd);

        let output = cmd
            .output()
            .with_context(|| format!("Failed to spawn {}", self.config.cmd))?;

        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        if !combined.is_empty() && !combined.ends_with('\n') {
            combined.push('\n');
        }
        combined.push_str(&String::from_utf8_lossy(&output.stderr));

        let success = output.status.success();
        self.hooks.post_build(&self.config, success);

        let errors = ErrorExtractor::new().parse(&combined);
        log::debug!("Extracted {} error(s)", errors.len());

        Ok(BuildOutcome {
            exit_code: output.status.code(),
            success,
            output: combined,
            errors,
        })
    }
}

#[cfg(windows)]
fn shell_command(line: &str) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.arg("/C").arg(line);
    cmd
}

#[cfg(not(windows))]
fn shell_command(line: &str) -> Command {
    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(line);
    cmd
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::BTreeMap;
    use std::rc::Rc;

    fn config(cmd: &str, args: &[&str], sh: bool) -> BuildConfig {
        BuildConfig {
            name: "test".to_string(),
            cmd: cmd.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
            env: BTreeMap::new(),
            sh,
        }
    }

    #[derive(Default)]
    struct RecordingHooks(Rc<RefCell<Vec<String>>>);

    impl BuildHooks for RecordingHooks {
        fn pre_build(&self, config: &BuildConfig) {
            self.0.borrow_mut().push(format!("pre {}", config.name));
        }

        fn post_build(&self, config: &BuildConfig, success: bool) {
            self.0.borrow_mut().push(format!("post {} {}", config.name, success));
        }
    }

    #[test]
    fn test_command_line_expands_args() {
        let ctx = BuildContext::new(PathBuf::from("/proj"))
            .with_active_file(PathBuf::from("/proj/main.seq"));
        let runner = BuildRunner::new(BuildConfig::default()).with_context(ctx);
        assert_eq!(
            runner.command_line(),
            vec!["seqc", "-d", "/proj/main.seq", "interleaved.fastq"]
        );
    }

    #[test]
    fn test_missing_program_is_an_error() {
        let runner = BuildRunner::new(config("seqbuild-definitely-not-installed", &[], false));
        assert!(runner.execute().is_err());
    }

    #[test]
    fn test_empty_cmd_is_rejected_before_spawn() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let runner = BuildRunner::new(config("", &[], false))
            .with_hooks(Box::new(RecordingHooks(calls.clone())));
        assert!(runner.execute().is_err());
        assert!(calls.borrow().is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_failed_build_reports_errors_from_stderr() {
        let script = "echo compiling; echo 'a.seq:1:2: error: boom' 1>&2; exit 3";
        let runner = BuildRunner::new(config("sh", &["-c", script], false));

        let outcome = runner.execute().unwrap();
        assert!(!outcome.success);
        assert_eq!(outcome.exit_code, Some(3));
        assert!(outcome.output.starts_with("compiling\n"));
        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(outcome.errors[0].file, "a.seq");
        assert_eq!(outcome.errors[0].col.as_deref(), Some("2"));
    }

    #[cfg(unix)]
    #[test]
    fn test_unterminated_stdout_does_not_merge_with_stderr() {
        let script = "printf 'a.seq:1:1: error: out'; printf 'b.seq:2:2: error: err\\n' 1>&2";
        let runner = BuildRunner::new(config("sh", &["-c", script], false));

        let outcome = runner.execute().unwrap();
        assert_eq!(outcome.output, "a.seq:1:1: error: out\nb.seq:2:2: error: err\n");
        assert_eq!(outcome.errors.len(), 2);
        assert_eq!(outcome.errors[0].message, "a.seq:1:1: error: out");
        assert_eq!(outcome.errors[1].file, "b.seq");
    }

    #[cfg(unix)]
    #[test]
    fn test_shell_mode_honors_shell_syntax() {
        let runner = BuildRunner::new(config(
            "echo",
            &["x.seq:3:4: error: one", "&&", "echo", "done"],
            true,
        ));

        let outcome = runner.execute().unwrap();
        assert!(outcome.success);
        assert_eq!(outcome.output, "x.seq:3:4: error: one\ndone\n");
        assert_eq!(outcome.errors.len(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_env_override_reaches_child() {
        let mut cfg = config("echo \"$SEQBUILD_LOCATION: error: from env\"", &[], true);
        cfg.env.insert("SEQBUILD_LOCATION".to_string(), "{FILE_ACTIVE}:7:1".to_string());
        let ctx = BuildContext::new(PathBuf::from("/p"))
            .with_active_file(PathBuf::from("env.seq"));

        let outcome = BuildRunner::new(cfg).with_context(ctx).execute().unwrap();
        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(outcome.errors[0].file, "env.seq");
        assert_eq!(outcome.errors[0].line.as_deref(), Some("7"));
    }

    #[cfg(unix)]
    #[test]
    fn test_hooks_run_around_build() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let runner = BuildRunner::new(config("false", &[], false))
            .with_hooks(Box::new(RecordingHooks(calls.clone())));

        let outcome = runner.execute().unwrap();
        assert!(!outcome.success);
        assert_eq!(*calls.borrow(), vec!["pre test", "post test false"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_working_dir_is_applied() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("marker.seq"), "").unwrap();

        let runner = BuildRunner::new(config("ls", &[], false))
            .with_working_dir(dir.path().to_path_buf());
        let outcome = runner.execute().unwrap();
        assert!(outcome.success);
        assert!(outcome.output.contains("marker.seq"));
    }
}
