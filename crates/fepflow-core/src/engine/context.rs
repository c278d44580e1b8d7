use super::collaborators::{AtomMapper, Forcefield, LegRunner};
use super::config::RunConfig;
use super::progress::ProgressReporter;

/// Borrowed collaborators and settings shared by every stage of a pipeline run.
#[derive(Clone, Copy)]
pub struct PipelineContext<'a> {
    pub config: &'a RunConfig,
    pub forcefield: &'a Forcefield,
    pub mapper: &'a dyn AtomMapper,
    pub runner: &'a dyn LegRunner,
    pub reporter: &'a ProgressReporter<'a>,
}

impl<'a> PipelineContext<'a> {
    pub fn new(
        config: &'a RunConfig,
        forcefield: &'a Forcefield,
        mapper: &'a dyn AtomMapper,
        runner: &'a dyn LegRunner,
        reporter: &'a ProgressReporter<'a>,
    ) -> Self {
        Self {
            config,
            forcefield,
            mapper,
            runner,
            reporter,
        }
    }
}
