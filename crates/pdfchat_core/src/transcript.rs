use std::fmt;
use std::time::Duration;

pub const WELCOME_TEXT: &str = "Welcome! Drop your PDF files and start asking questions.";
pub const QUERY_ERROR_TEXT: &str = "❌ error querying the backend.";
pub const UPLOAD_ERROR_TEXT: &str = "❌ error uploading files.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Bot,
}

/// Wall-clock time between sending a question and receiving its answer,
/// kept at two-decimal precision (hundredths of a second).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ResponseTime {
    centis: u64,
}

impl ResponseTime {
    pub fn from_elapsed(elapsed: Duration) -> Self {
        // Round half up to the nearest hundredth.
        let centis = (elapsed.as_millis() + 5) / 10;
        Self {
            centis: u64::try_from(centis).unwrap_or(u64::MAX),
        }
    }

    pub fn as_secs_f64(&self) -> f64 {
        self.centis as f64 / 100.0
    }
}

impl fmt::Display for ResponseTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}s", self.centis / 100, self.centis % 100)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub sender: Sender,
    pub text: String,
    pub response_time: Option<ResponseTime>,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::User,
            text: text.into(),
            response_time: None,
        }
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::Bot,
            text: text.into(),
            response_time: None,
        }
    }

    pub fn with_response_time(mut self, response_time: ResponseTime) -> Self {
        self.response_time = Some(response_time);
        self
    }
}

/// Append-only chat history in insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// A transcript holding the greeting shown on startup.
    pub fn with_welcome() -> Self {
        let mut transcript = Self::new();
        transcript.append(Message::bot(WELCOME_TEXT));
        transcript
    }

    pub fn append(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
