//! Interactive session state around the engine: the current input, pipeline, last run,
//! selected step and the auto-run policy. Every edit re-runs the pipeline while auto-run
//! is enabled; otherwise runs only happen through [`Workbench::run`].

use crate::catalog::Catalog;
use crate::config::Settings;
use crate::engine::{run_pipeline_with_limits, ExecutionLimits, RunReport};
use crate::operations::OperationConfig;
use crate::pipeline::{MoveDirection, Pipeline, StepId};
use crate::recipe::{
    deserialize_pipeline, serialize_pipeline, serialize_pipeline_compact, RecipeError,
};

#[derive(Debug, Clone)]
pub struct Workbench<'a> {
    catalog: &'a Catalog,
    limits: ExecutionLimits,
    pretty_recipes: bool,
    auto_run: bool,
    input: String,
    pipeline: Pipeline,
    report: RunReport,
    selected: Option<StepId>,
}

impl<'a> Workbench<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self::from_settings(catalog, &Settings::default())
    }

    pub fn from_settings(catalog: &'a Catalog, settings: &Settings) -> Self {
        Self {
            catalog,
            limits: settings.execution_limits(),
            pretty_recipes: settings.pretty_recipes,
            auto_run: settings.auto_run,
            input: String::new(),
            pipeline: Pipeline::new(),
            report: RunReport::default(),
            selected: None,
        }
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    pub fn report(&self) -> &RunReport {
        &self.report
    }

    pub fn selected_step(&self) -> Option<StepId> {
        self.selected
    }

    pub fn auto_run(&self) -> bool {
        self.auto_run
    }

    pub fn set_auto_run(&mut self, enabled: bool) {
        self.auto_run = enabled;
        self.rerun_if_auto();
    }

    pub fn set_input(&mut self, input: impl Into<String>) {
        self.input = input.into();
        self.rerun_if_auto();
    }

    /// Returns the id of the appended step, or `None` when the operation is unknown.
    pub fn add_step(&mut self, operation_id: &str) -> Option<StepId> {
        let next = self.pipeline.add_step(self.catalog, operation_id);
        if next.len() == self.pipeline.len() {
            return None;
        }
        let added = next.steps().last().map(|step| step.id());
        self.replace_pipeline(next);
        added
    }

    pub fn remove_step(&mut self, step_id: StepId) {
        self.report.trace.remove(&step_id);
        let next = self.pipeline.remove_step(step_id);
        self.replace_pipeline(next);
    }

    pub fn move_step(&mut self, step_id: StepId, direction: MoveDirection) {
        let next = self.pipeline.move_step(step_id, direction);
        self.replace_pipeline(next);
    }

    pub fn update_step_config(&mut self, step_id: StepId, config: OperationConfig) {
        let next = self.pipeline.update_step_config(step_id, config);
        self.replace_pipeline(next);
    }

    /// Empties the pipeline. The final output falls back to the raw input.
    pub fn clear(&mut self) {
        self.pipeline = self.pipeline.clear();
        self.selected = None;
        self.report = RunReport {
            output: self.input.clone(),
            ..RunReport::default()
        };
    }

    pub fn run(&mut self) -> &RunReport {
        self.report =
            run_pipeline_with_limits(self.catalog, &self.input, &self.pipeline, self.limits);
        &self.report
    }

    /// Selecting the already selected step clears the selection. Ids outside the
    /// pipeline are ignored.
    pub fn select_step(&mut self, step_id: StepId) {
        if self.selected == Some(step_id) {
            self.selected = None;
        } else if self.pipeline.step(step_id).is_some() {
            self.selected = Some(step_id);
        }
    }

    /// Output of the selected step (empty if it has none yet), or the final output.
    pub fn displayed_output(&self) -> &str {
        match self.selected {
            Some(step_id) => self
                .report
                .state(step_id)
                .and_then(|state| state.output())
                .unwrap_or(""),
            None => &self.report.output,
        }
    }

    pub fn output_label(&self) -> String {
        match self.selected.and_then(|step_id| self.pipeline.position(step_id)) {
            Some(index) => format!("output (step {})", index + 1),
            None => "output (final)".to_string(),
        }
    }

    /// Replaces the pipeline with the recipe's steps and selects the first of them.
    /// On error the workbench is left exactly as it was.
    pub fn import_recipe(&mut self, text: &str) -> Result<usize, RecipeError> {
        let imported = deserialize_pipeline(self.catalog, text)?;
        let count = imported.len();
        self.selected = imported.steps().first().map(|step| step.id());
        self.pipeline = imported;
        self.report.trace.clear();
        self.rerun_if_auto();
        Ok(count)
    }

    /// `None` when there is nothing to export.
    pub fn export_recipe(&self) -> Option<String> {
        if self.pipeline.is_empty() {
            return None;
        }
        Some(if self.pretty_recipes {
            serialize_pipeline(&self.pipeline)
        } else {
            serialize_pipeline_compact(&self.pipeline)
        })
    }

    fn replace_pipeline(&mut self, next: Pipeline) {
        self.pipeline = next;
        if let Some(selected) = self.selected {
            if self.pipeline.step(selected).is_none() {
                self.selected = None;
            }
        }
        self.rerun_if_auto();
    }

    fn rerun_if_auto(&mut self) {
        if self.auto_run {
            self.run();
        }
    }
}
