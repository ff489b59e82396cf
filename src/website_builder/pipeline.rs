//! # Generation Pipeline
//!
//! The site is produced by four tasks run strictly in order: research the
//! topic, write the HTML, design the CSS, then add the JavaScript. Each task
//! sees the topic and every earlier task's output.
//!
//! Text generation itself is opaque here. Callers plug in an
//! [`ArtifactGenerator`] (an LLM crew, a fixture, or
//! [`DirectoryGenerator`] for pre-generated files) and the pipeline takes
//! care of ordering and persisting outputs through an
//! [`ArtifactSink`](crate::store::ArtifactSink).

use crate::error::{BuilderError, Result};
use crate::model::ArtifactKind;
use crate::store::ArtifactSink;
use std::fs;
use std::path::PathBuf;
use tracing::info;

/// One step of the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskSpec {
    pub name: &'static str,
    /// May contain `{topic}`, filled in by [`TaskSpec::describe`].
    pub description: &'static str,
    /// Tasks without an output file only feed later tasks.
    pub output_file: Option<&'static str>,
}

impl TaskSpec {
    pub fn describe(&self, topic: &str) -> String {
        self.description.replace("{topic}", topic)
    }

    pub fn kind(&self) -> Option<ArtifactKind> {
        self.output_file.and_then(ArtifactKind::from_filename)
    }
}

pub fn default_tasks() -> Vec<TaskSpec> {
    vec![
        TaskSpec {
            name: "research_task",
            description: "Research {topic} and collect the facts the site should present",
            output_file: None,
        },
        TaskSpec {
            name: "html_creation_task",
            description: "Write the HTML structure and copy for a website about {topic}",
            output_file: Some(ArtifactKind::Html.default_filename()),
        },
        TaskSpec {
            name: "css_design_task",
            description: "Design the stylesheet for the {topic} website",
            output_file: Some(ArtifactKind::Css.default_filename()),
        },
        TaskSpec {
            name: "js_development_task",
            description: "Add the interactive behaviour for the {topic} website",
            output_file: Some(ArtifactKind::Js.default_filename()),
        },
    ]
}

/// What a generator gets to see when producing one task's output.
pub struct TaskContext<'a> {
    pub topic: &'a str,
    pub task: &'a TaskSpec,
    pub previous: &'a [TaskOutput],
}

#[derive(Debug, Clone)]
pub struct TaskOutput {
    pub task: &'static str,
    pub content: String,
    /// Where the output was persisted, if the task has an output file.
    pub path: Option<PathBuf>,
}

pub trait ArtifactGenerator {
    fn generate(&mut self, ctx: &TaskContext<'_>) -> Result<String>;
}

#[derive(Debug, Default)]
pub struct PipelineReport {
    pub outputs: Vec<TaskOutput>,
}

impl PipelineReport {
    pub fn written_paths(&self) -> Vec<PathBuf> {
        self.outputs.iter().filter_map(|o| o.path.clone()).collect()
    }
}

pub struct Pipeline {
    topic: String,
    tasks: Vec<TaskSpec>,
}

impl Pipeline {
    pub fn new(topic: impl Into<String>) -> Result<Self> {
        let topic = topic.into();
        if topic.trim().is_empty() {
            return Err(BuilderError::Api(
                "Topic is required. Please provide a topic for the website.".to_string(),
            ));
        }
        Ok(Self {
            topic,
            tasks: default_tasks(),
        })
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Run every task in order. The first failure stops the run; outputs
    /// already persisted stay on disk.
    pub fn run<G, S>(&self, generator: &mut G, sink: &mut S) -> Result<PipelineReport>
    where
        G: ArtifactGenerator,
        S: ArtifactSink,
    {
        let mut report = PipelineReport::default();

        for task in &self.tasks {
            let content = generator.generate(&TaskContext {
                topic: &self.topic,
                task,
                previous: &report.outputs,
            })?;

            let path = match task.output_file {
                Some(filename) => Some(sink.save_artifact(filename, &content)?),
                None => None,
            };
            info!(task = task.name, persisted = path.is_some(), "task finished");

            report.outputs.push(TaskOutput {
                task: task.name,
                content,
                path,
            });
        }

        Ok(report)
    }
}

/// Serves task outputs from files already present in a directory.
///
/// Tasks with an output file read `<dir>/<output_file>`; the others read
/// `<dir>/<task name>.md` when it exists and produce nothing otherwise.
pub struct DirectoryGenerator {
    dir: PathBuf,
}

impl DirectoryGenerator {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl ArtifactGenerator for DirectoryGenerator {
    fn generate(&mut self, ctx: &TaskContext<'_>) -> Result<String> {
        match ctx.task.output_file {
            Some(filename) => fs::read_to_string(self.dir.join(filename))
                .map_err(|e| BuilderError::io(filename, e)),
            None => {
                let notes = format!("{}.md", ctx.task.name);
                let path = self.dir.join(&notes);
                if path.is_file() {
                    fs::read_to_string(path).map_err(|e| BuilderError::io(notes, e))
                } else {
                    Ok(String::new())
                }
            }
        }
    }
}
