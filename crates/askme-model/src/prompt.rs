//! Prompt assembly: a fixed assistant preamble plus a bounded window of
//! recent conversation turns.

use askme_core::Message;

/// Instructions prepended to every request.
const PREAMBLE: &str = "You are AskMe Bot, a helpful AI assistant. Answer like you're a knowledgeable and friendly assistant.

IMPORTANT FORMATTING GUIDELINES:
- Use proper markdown formatting for better readability
- For mathematical expressions, use LaTeX notation with $ for inline math and $$ for display math
- Use **bold** for important terms and concepts
- Use ### for section headings
- Use numbered lists (1. 2. 3.) or bullet points (-) for better organization
- Use `code` formatting for technical terms or variables
- Keep your answers well-structured and easy to read

Provide clear, accurate, and helpful responses.";

/// Builds the full prompt for `message`, folding in at most `max_context`
/// of the most recent preceding turns.
pub fn build_prompt(message: &str, history: &[Message], max_context: usize) -> String {
    if history.is_empty() {
        return format!("{PREAMBLE}\n\nUser: {message}");
    }

    let start = history.len().saturating_sub(max_context);
    let mut prompt = format!("{PREAMBLE}\n\nPrevious conversation context:\n");
    for turn in &history[start..] {
        let speaker = if turn.is_user() { "User" } else { "Assistant" };
        prompt.push_str(&format!("{speaker}: {}\n", turn.text));
    }
    prompt.push_str(&format!("\nCurrent question:\nUser: {message}"));
    prompt
}
