//! The completion pipeline: resolve params, pick in-scope tag files, run one
//! search per file until the line budget is spent, then parse candidates.

use crate::config::Config;
use crate::editor::Editor;
use crate::model::{Candidate, GatherReport, RawLine, SearchRequest};
use crate::params::{self, Params, ParamsOverride};
use crate::parse;
use crate::scope::TagScope;
use crate::search::{self, ProcessRunner, SearchCommand, SystemRunner};
use anyhow::{Context, Result};

/// Source identifier used on the editor's error channel.
pub const SOURCE_NAME: &str = "tags";

pub struct TagsSource<R: ProcessRunner = SystemRunner> {
    runner: R,
    defaults: Params,
}

impl TagsSource<SystemRunner> {
    pub fn new() -> Self {
        Self::with_runner(SystemRunner)
    }
}

impl Default for TagsSource<SystemRunner> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: ProcessRunner> TagsSource<R> {
    pub fn with_runner(runner: R) -> Self {
        Self {
            runner,
            defaults: Params::from_config(Config::get()),
        }
    }

    /// Replace the defaults that caller overrides are merged onto.
    pub fn with_defaults(mut self, defaults: Params) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn params(&self) -> &Params {
        &self.defaults
    }

    pub fn print_error(&self, editor: &dyn Editor, message: &str) -> Result<()> {
        editor.print_error(message, SOURCE_NAME)
    }

    pub fn gather(
        &self,
        editor: &dyn Editor,
        complete_str: &str,
        overrides: &ParamsOverride,
    ) -> Result<Vec<Candidate>> {
        Ok(self.gather_report(editor, complete_str, overrides)?.candidates)
    }

    pub fn gather_report(
        &self,
        editor: &dyn Editor,
        complete_str: &str,
        overrides: &ParamsOverride,
    ) -> Result<GatherReport> {
        let params = self.defaults.merge(overrides);
        let mut request = SearchRequest {
            pattern: params::escape_pattern(complete_str),
            limit: params.limit(),
            tag_files: Vec::new(),
        };
        let command = match SearchCommand::build(&params, &request.pattern, request.limit) {
            Ok(command) => Some(command),
            Err(err) => {
                tracing::warn!("no search will run: {err:#}");
                None
            }
        };

        let references = editor.tag_files().with_context(|| "list tag files")?;
        let mut scope = TagScope::new(editor).with_context(|| "resolve current buffer")?;
        let mut lines: Vec<RawLine> = Vec::new();
        for reference in &references {
            if lines.len() >= request.limit {
                break;
            }
            let Some(tag_file) = scope
                .admit(editor, reference)
                .with_context(|| format!("resolve tag file {reference}"))?
            else {
                continue;
            };
            let Some(command) = &command else {
                continue;
            };
            let added =
                search::search_tag_file(&self.runner, command, &tag_file, request.limit, &mut lines);
            tracing::debug!("{} lines from {}", added, tag_file.display());
        }
        request.tag_files = scope.into_selected();

        let candidates = parse::parse_candidates(&lines, request.limit);
        tracing::debug!(
            "{:?}: {} candidates from {} files",
            complete_str,
            candidates.len(),
            request.tag_files.len()
        );
        Ok(GatherReport {
            candidates,
            searched: request.tag_files,
            lines: lines.len(),
        })
    }
}
