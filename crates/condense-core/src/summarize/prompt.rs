/// System instruction sent with every chunk.
pub const SUMMARY_PROMPT: &str = r#"You are a summarization engine. Summarize the text the user provides as a list of concise bullet points that capture the key facts, decisions, names, numbers and conclusions.

Respond with a JSON array of maps. Every map has exactly one key, and that key is literally "key"; its value is the text of one bullet point. Put the opening bracket on its own line, then one map per line, then the closing bracket on its own line. Do not add any other text before or after the array.

Example:
[
{"key": "First bullet point."},
{"key": "Second bullet point."}
]"#;

/// User turn for one chunk.
pub fn user_turn(chunk_text: &str) -> String {
    format!("{chunk_text}.")
}
