//! Grounding prompt assembly.

/// Default instruction appended after the question.
pub const DEFAULT_INSTRUCTIONS: &str = "Answer the question using only the context provided. \
If the information is not available in the context, say that you cannot answer with the \
information available.";

/// Renders retrieved chunks and a question into a single grounding prompt.
///
/// Rendering is a pure function of its inputs: the same chunks and question
/// always produce a byte-identical prompt.
///
/// ```text
/// Document context:
/// <chunk 1>
///
/// <chunk 2>
///
/// Question: <question>
///
/// Instructions: <instructions>
///
/// Answer:
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptBuilder {
    instructions: String,
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self { instructions: DEFAULT_INSTRUCTIONS.to_string() }
    }
}

impl PromptBuilder {
    /// Create a builder with the default instructions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the instruction text, e.g. to answer in another language.
    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = instructions.into();
        self
    }

    /// The instruction text in use.
    pub fn instructions(&self) -> &str {
        &self.instructions
    }

    /// Render the prompt. Chunks are joined by a blank line, in the given order.
    pub fn build<S: AsRef<str>>(&self, chunks: &[S], question: &str) -> String {
        let context = chunks.iter().map(AsRef::as_ref).collect::<Vec<_>>().join("\n\n");
        format!(
            "Document context:\n{context}\n\nQuestion: {question}\n\nInstructions: {}\n\nAnswer:",
            self.instructions
        )
    }
}
