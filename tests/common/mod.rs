//! Shared test doubles and scratch workspaces.
#![allow(dead_code)]

use ninaapi_release::error::Result;
use ninaapi_release::process::{CommandRunner, CommandSpec, CommandStatus};
use ninaapi_release::{Prompter, Settings};
use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::Mutex;

/// Records commands instead of running them
#[derive(Default)]
pub struct RecordingRunner {
    commands: Mutex<Vec<CommandSpec>>,
    failing: Vec<(String, Option<String>)>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `program` fail with exit code 1, optionally only for one subcommand
    pub fn failing(mut self, program: &str, first_arg: Option<&str>) -> Self {
        self.failing
            .push((program.to_string(), first_arg.map(str::to_string)));
        self
    }

    pub fn commands(&self) -> Vec<CommandSpec> {
        self.commands.lock().unwrap().clone()
    }

    pub fn commands_of(&self, program: &str) -> Vec<CommandSpec> {
        self.commands()
            .into_iter()
            .filter(|c| c.program() == program)
            .collect()
    }

    pub fn programs(&self) -> Vec<String> {
        self.commands()
            .iter()
            .map(|c| c.program().to_string())
            .collect()
    }

    fn fails(&self, command: &CommandSpec) -> bool {
        self.failing.iter().any(|(program, first_arg)| {
            command.program() == program
                && first_arg
                    .as_deref()
                    .is_none_or(|arg| command.arg_values().next() == Some(arg))
        })
    }
}

impl CommandRunner for RecordingRunner {
    async fn run(&self, command: &CommandSpec) -> Result<CommandStatus> {
        self.commands.lock().unwrap().push(command.clone());
        if self.fails(command) {
            Ok(CommandStatus::from_code(Some(1)))
        } else {
            Ok(CommandStatus::success())
        }
    }
}

/// Answers prompts from a script and counts gates
#[derive(Default)]
pub struct ScriptedPrompter {
    answers: Mutex<VecDeque<String>>,
    pub questions: Mutex<Vec<String>>,
    pub pauses: Mutex<Vec<String>>,
}

impl ScriptedPrompter {
    pub fn new(answers: &[&str]) -> Self {
        Self {
            answers: Mutex::new(answers.iter().map(|a| a.to_string()).collect()),
            ..Default::default()
        }
    }

    pub fn pause_count(&self) -> usize {
        self.pauses.lock().unwrap().len()
    }

    fn next(&self, question: &str) -> String {
        self.questions.lock().unwrap().push(question.to_string());
        self.answers
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("no scripted answer for {:?}", question))
    }
}

impl Prompter for ScriptedPrompter {
    fn ask(&self, question: &str) -> Result<String> {
        Ok(self.next(question))
    }

    fn confirm(&self, question: &str) -> Result<bool> {
        Ok(ninaapi_release::cli::prompt::is_yes(&self.next(question)))
    }

    fn pause(&self, message: &str) -> Result<()> {
        self.pauses.lock().unwrap().push(message.to_string());
        Ok(())
    }
}

/// Scratch layout: `<root>/ninaAPI/ninaAPI` project next to
/// `<root>/nina.plugin.manifests`, matching the default settings
pub struct Workspace {
    pub root: tempfile::TempDir,
    pub settings: Settings,
}

impl Workspace {
    pub fn new() -> Self {
        let root = tempfile::tempdir().unwrap();
        let project = root.path().join("ninaAPI").join("ninaAPI");
        std::fs::create_dir_all(&project).unwrap();
        std::fs::create_dir_all(root.path().join("nina.plugin.manifests")).unwrap();

        let mut settings = Settings::default();
        settings.project_dir = project;
        settings.package.plugin_binary = Some(PathBuf::from("/plugins/Advanced API/ninaAPI.dll"));
        Self { root, settings }
    }

    /// Stand in for the packaging script's manifest output
    pub fn write_generated_manifest(&self, installer_url: &str) {
        std::fs::write(
            self.settings.generated_manifest(),
            format!(
                r#"{{"Name":"Advanced API","Version":{{"Major":"2"}},"Installer":{{"URL":"{}","Type":"ARCHIVE"}}}}"#,
                installer_url
            ),
        )
        .unwrap();
    }

    pub fn write_spec(&self, content: &str) {
        std::fs::write(self.settings.spec_path(), content).unwrap();
    }

    /// Write the project's `.env` file
    pub fn settings_env_file(&self, content: &str) {
        std::fs::write(self.settings.env_file(), content).unwrap();
    }

    pub fn registry_manifest(&self, folder: &str) -> PathBuf {
        self.root
            .path()
            .join("nina.plugin.manifests/manifests/n/ninaAPI/3.0.0")
            .join(folder)
            .join("manifest.json")
    }
}

pub const VALID_SPEC: &str = include_str!("../fixtures/api_spec_valid.yaml");
pub const INVALID_SPEC: &str = include_str!("../fixtures/api_spec_invalid.yaml");
pub const MALFORMED_SPEC: &str = include_str!("../fixtures/api_spec_malformed.yaml");
