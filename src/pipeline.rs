//! Ordered application of migration steps.

use std::fmt;

use log::{debug, info};

use crate::config::MigrateConfig;
use crate::document::Pack;
use crate::error::{MigrateError, SchemaError};
use crate::steps::{MigrationStep, step_for};
use crate::version::SchemaVersion;

/// Apply `steps` to `pack` in order.
///
/// Each step sees the previous step's output. The first failing step aborts
/// the run; `pack` itself is never modified.
pub fn migrate(pack: &Pack, steps: &[Box<dyn MigrationStep>]) -> Result<Pack, SchemaError> {
    let mut current = pack.clone();
    for step in steps {
        debug!("applying {} ({} animations)", step.name(), current.len());
        current = step.apply(&current)?;
    }
    Ok(current)
}

/// A chain of steps, normally consecutive versions.
#[derive(Default)]
pub struct Pipeline {
    steps: Vec<Box<dyn MigrationStep>>,
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field(
                "steps",
                &self.steps.iter().map(|s| s.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Steps taking a `from` pack to `to`, configured from `config`.
    pub fn between(
        from: SchemaVersion,
        to: SchemaVersion,
        config: &MigrateConfig,
    ) -> Result<Pipeline, MigrateError> {
        if from >= to {
            return Err(MigrateError::InvalidRange { from, to });
        }

        let mut pipeline = Pipeline::new();
        let mut version = from;
        while version < to {
            let Some(next) = version.next() else {
                return Err(MigrateError::InvalidRange { from, to });
            };
            let step = step_for(next, config).ok_or(MigrateError::InvalidRange { from, to })?;
            pipeline.push(step);
            version = next;
        }
        Ok(pipeline)
    }

    pub fn push(&mut self, step: Box<dyn MigrationStep>) {
        self.steps.push(step);
    }

    pub fn with_step(mut self, step: impl MigrationStep + 'static) -> Self {
        self.push(Box::new(step));
        self
    }

    pub fn steps(&self) -> &[Box<dyn MigrationStep>] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Run every step over `pack`.
    pub fn run(&self, pack: &Pack) -> Result<Pack, SchemaError> {
        info!(
            "Migrating {} animations through {} steps",
            pack.len(),
            self.steps.len()
        );
        migrate(pack, &self.steps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::steps::{NestActions, RenameIds, SplitTracks};
    use serde_json::{Value, json};

    struct Tag(&'static str);

    impl MigrationStep for Tag {
        fn name(&self) -> &'static str {
            self.0
        }

        fn target(&self) -> SchemaVersion {
            SchemaVersion::V2
        }

        fn apply(&self, pack: &Pack) -> Result<Pack, SchemaError> {
            let mut out = pack.clone();
            let trail = out
                .entry("trail")
                .or_insert_with(|| Value::Array(Vec::new()));
            if let Value::Array(trail) = trail {
                trail.push(json!(self.0));
            }
            Ok(out)
        }
    }

    #[test]
    fn test_steps_run_in_order() {
        let pipeline = Pipeline::new().with_step(Tag("a")).with_step(Tag("b"));
        let out = pipeline.run(&Pack::new()).unwrap();
        assert_eq!(out["trail"], json!(["a", "b"]));
    }

    #[test]
    fn test_input_is_untouched() {
        let pack = json!({"x": 1}).as_object().unwrap().clone();
        let before = pack.clone();
        let steps: Vec<Box<dyn MigrationStep>> = vec![Box::new(Tag("a"))];
        let _ = migrate(&pack, &steps);
        assert_eq!(pack, before);
    }

    #[test]
    fn test_empty_pipeline_is_identity() {
        let pack = json!({"x": 1}).as_object().unwrap().clone();
        assert_eq!(migrate(&pack, &[]).unwrap(), pack);
    }

    #[test]
    fn test_between_builds_consecutive_steps() {
        let config = MigrateConfig::new();
        let pipeline = Pipeline::between(SchemaVersion::V1, SchemaVersion::V5, &config).unwrap();
        let targets: Vec<_> = pipeline.steps().iter().map(|s| s.target()).collect();
        assert_eq!(targets, &SchemaVersion::ALL[1..]);

        let pipeline = Pipeline::between(SchemaVersion::V3, SchemaVersion::V4, &config).unwrap();
        assert_eq!(pipeline.len(), 1);
    }

    #[test]
    fn test_between_rejects_backward_range() {
        let config = MigrateConfig::new();
        assert!(matches!(
            Pipeline::between(SchemaVersion::V4, SchemaVersion::V2, &config),
            Err(MigrateError::InvalidRange { .. })
        ));
        assert!(Pipeline::between(SchemaVersion::V3, SchemaVersion::V3, &config).is_err());
    }

    #[test]
    fn test_failure_stops_the_chain() {
        let pipeline = Pipeline::new()
            .with_step(SplitTracks)
            .with_step(NestActions)
            .with_step(RenameIds::default());
        let pack = json!({"A": {"is_looping": true, "tracks": [], "clips": []}});
        let err = pipeline.run(pack.as_object().unwrap()).unwrap_err();
        assert!(matches!(err, SchemaError::NothingToRename { .. }));
    }

    #[test]
    fn test_debug_lists_step_names() {
        let pipeline = Pipeline::new().with_step(SplitTracks).with_step(NestActions);
        assert_eq!(
            format!("{pipeline:?}"),
            r#"Pipeline { steps: ["split-tracks", "nest-actions"] }"#
        );
    }
}
