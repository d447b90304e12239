// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
#[allow(dead_code)]
pub fn generate_plain_content(paragraphs: usize) -> String {
    let base = "A paragraph with a handful of words in it.\nAnd a soft break.\n\n";
    base.repeat(paragraphs)
}

#[allow(dead_code)]
pub fn generate_session(paragraphs: usize) -> inkpad_engine::EditorSession {
    use inkpad_config::EditorConfig;
    use inkpad_engine::editing::{EditorSession, Hydration};

    EditorSession::hydrate(
        Hydration::plain(generate_plain_content(paragraphs)),
        &EditorConfig::default(),
    )
}
