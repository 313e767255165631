//! Request-to-execution glue.

use cmdpilot_extract::{ContextualGenerator, dedup_preserving_order, extract_commands};

use crate::engine::ExecutionEngine;
use crate::result::RunReport;

/// Turns a request and the model's answer into one candidate list and hands
/// it to the engine.
#[derive(Debug, Default)]
pub struct CommandPipeline {
    generator: ContextualGenerator,
    engine: ExecutionEngine,
}

impl CommandPipeline {
    pub fn new(generator: ContextualGenerator, engine: ExecutionEngine) -> Self {
        Self { generator, engine }
    }

    pub fn engine(&self) -> &ExecutionEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut ExecutionEngine {
        &mut self.engine
    }

    pub fn generator(&self) -> &ContextualGenerator {
        &self.generator
    }

    /// Commands extracted from `model_text`, then those synthesized from
    /// `prompt`, each kept at its first position.
    pub fn candidates(&self, prompt: &str, model_text: &str) -> Vec<String> {
        let extracted = extract_commands(model_text);
        let synthesized = self.generator.generate(prompt);
        tracing::debug!(
            extracted = extracted.len(),
            synthesized = synthesized.len(),
            "merging candidates"
        );
        dedup_preserving_order(extracted.into_iter().chain(synthesized))
    }

    /// Builds the candidate list and runs it.
    pub async fn process(
        &mut self,
        prompt: &str,
        model_text: &str,
        auto_execute: bool,
    ) -> RunReport {
        let candidates = self.candidates(prompt, model_text);
        self.engine.run_detailed(&candidates, auto_execute).await
    }
}
