/// Where the one user-visible message of a run goes.
pub trait MessageSink {
    fn show_message(&mut self, text: &str);
}

#[derive(Debug, Default)]
pub struct StdoutSink;

impl MessageSink for StdoutSink {
    fn show_message(&mut self, text: &str) {
        println!("{}", text);
    }
}

/// Keeps every message it is shown. Used by callers that render the outcome
/// themselves, and by tests.
#[derive(Debug, Default, Clone)]
pub struct CollectingSink {
    pub messages: Vec<String>,
}

impl MessageSink for CollectingSink {
    fn show_message(&mut self, text: &str) {
        self.messages.push(text.to_string());
    }
}
