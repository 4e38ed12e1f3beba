use super::learning_mock::LearningMock;
use serde_json::{json, Value};

pub struct TestFixtures {
    learning: LearningMock,
}

#[allow(dead_code)]
impl TestFixtures {
    pub fn new(learning: LearningMock) -> Self {
        Self { learning }
    }

    /// Register a document with `sentence_count` numbered sentences
    pub fn create_document(&self, document_id: &str, sentence_count: usize) -> Vec<String> {
        let sentences: Vec<String> = (1..=sentence_count)
            .map(|i| format!("This is sentence number {} of the test document.", i))
            .collect();
        self.learning.add_document(document_id, sentences.clone());
        sentences
    }

    pub fn create_summary(&self, document_id: &str, summary: &str) {
        self.learning.add_summary(document_id, summary);
    }

    /// Voice list as a browser speech engine would report it
    pub fn platform_voices(&self) -> Value {
        json!({
            "voices": [
                { "id": "urn:alex", "name": "Alex", "lang": "en-US" },
                { "id": "urn:google-uk", "name": "Google UK English Female", "lang": "en-GB" },
                { "id": "urn:ms-zira", "name": "Microsoft Zira", "lang": "en-US" },
                { "id": "urn:thomas", "name": "Thomas", "lang": "fr-FR" }
            ]
        })
    }
}
