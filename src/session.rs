//! The caller-owned chat session.
//!
//! A [`Session`] holds the loaded documents (keyed by name, last write wins),
//! the name of the active document, and the ordered chat history. It lives
//! exactly as long as the caller keeps it; nothing is global.
//!
//! [`Session::ask`] takes `&mut self`, so a session can have at most one
//! question in flight and turns are always appended in arrival order.

use crate::config::CitationStrategy;
use crate::document::Document;
use crate::error::PdfChatError;
use crate::pipeline::citation::{self, Citation};
use crate::pipeline::llm::AnswerBackend;
use crate::prompts::build_prompt;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, info, warn};

/// Answer and citation attached to a turn once the model has responded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
    pub answer: String,
    pub citation: Citation,
}

/// One question/answer/citation record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    question: String,
    reply: Option<Reply>,
}

impl ChatTurn {
    /// A placeholder turn awaiting its answer.
    pub fn pending(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            reply: None,
        }
    }

    /// A turn with its answer already filled.
    pub fn answered(question: impl Into<String>, answer: impl Into<String>, citation: Citation) -> Self {
        Self {
            question: question.into(),
            reply: Some(Reply {
                answer: answer.into(),
                citation,
            }),
        }
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn reply(&self) -> Option<&Reply> {
        self.reply.as_ref()
    }

    /// Answer text, empty while pending.
    pub fn answer(&self) -> &str {
        self.reply.as_ref().map_or("", |r| r.answer.as_str())
    }

    /// Citation label, empty while pending.
    pub fn citation_label(&self) -> String {
        self.reply
            .as_ref()
            .map(|r| r.citation.label())
            .unwrap_or_default()
    }

    pub fn is_answered(&self) -> bool {
        self.reply.is_some()
    }

    /// Attach the answer. A turn can be filled only once.
    pub fn fill(&mut self, answer: impl Into<String>, citation: Citation) -> Result<(), PdfChatError> {
        if self.reply.is_some() {
            return Err(PdfChatError::TurnAlreadyAnswered {
                question: self.question.clone(),
            });
        }
        self.reply = Some(Reply {
            answer: answer.into(),
            citation,
        });
        Ok(())
    }
}

/// Rating for the most recent response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Feedback {
    Good,
    Bad,
}

impl fmt::Display for Feedback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Feedback::Good => f.write_str("👍 Good"),
            Feedback::Bad => f.write_str("👎 Bad"),
        }
    }
}

impl std::str::FromStr for Feedback {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "good" | "+" | "👍" | "up" => Ok(Feedback::Good),
            "bad" | "-" | "👎" | "down" => Ok(Feedback::Bad),
            other => Err(format!("unknown rating '{other}' (expected good or bad)")),
        }
    }
}

/// In-memory state for one interactive session.
#[derive(Debug, Clone, Default)]
pub struct Session {
    documents: BTreeMap<String, Document>,
    active: Option<String>,
    history: Vec<ChatTurn>,
    citation_strategy: CitationStrategy,
}

impl Session {
    pub fn new(citation_strategy: CitationStrategy) -> Self {
        Self {
            citation_strategy,
            ..Self::default()
        }
    }

    /// Add (or replace) a document and make it the active one.
    pub fn upload(&mut self, document: Document) {
        let name = document.name().to_string();
        if self.documents.insert(name.clone(), document).is_some() {
            info!("Replaced document '{}'", name);
        } else {
            info!("Uploaded document '{}'", name);
        }
        self.active = Some(name);
    }

    /// Make `name` the document questions are asked against.
    pub fn select(&mut self, name: &str) -> Result<&Document, PdfChatError> {
        match self.documents.get_key_value(name) {
            Some((key, doc)) => {
                self.active = Some(key.clone());
                Ok(doc)
            }
            None => Err(PdfChatError::UnknownDocument {
                name: name.to_string(),
            }),
        }
    }

    pub fn active_document(&self) -> Option<&Document> {
        self.active.as_deref().and_then(|n| self.documents.get(n))
    }

    /// Loaded document names, in lexicographic order.
    pub fn document_names(&self) -> impl Iterator<Item = &str> {
        self.documents.keys().map(String::as_str)
    }

    pub fn document(&self, name: &str) -> Option<&Document> {
        self.documents.get(name)
    }

    pub fn history(&self) -> &[ChatTurn] {
        &self.history
    }

    pub fn citation_strategy(&self) -> CitationStrategy {
        self.citation_strategy
    }

    pub fn clear_history(&mut self) {
        debug!("Clearing {} chat turns", self.history.len());
        self.history.clear();
    }

    /// Ask `question` about the active document.
    ///
    /// A placeholder turn is appended before the backend is called. On
    /// success it is filled with the answer and citation and returned; on a
    /// backend failure the error is returned and the placeholder stays in the
    /// history unanswered.
    pub async fn ask<B: AnswerBackend>(
        &mut self,
        backend: &B,
        question: &str,
    ) -> Result<&ChatTurn, PdfChatError> {
        // Borrow the fields directly so the history can grow while the
        // active document stays borrowed.
        let document = self
            .active
            .as_deref()
            .and_then(|name| self.documents.get(name))
            .ok_or(PdfChatError::NoDocument)?;
        let prompt = build_prompt(&document.text(), question)?;

        self.history.push(ChatTurn::pending(question));
        debug!(
            "Asking {} ({} prompt bytes, turn {})",
            backend.model(),
            prompt.len(),
            self.history.len()
        );

        let answer = match backend.generate(&prompt).await {
            Ok(answer) => answer,
            Err(e) => {
                warn!("Backend call failed: {}", e);
                return Err(e);
            }
        };

        let citation = citation::locate(&answer, document, self.citation_strategy);
        let turn = self
            .history
            .last_mut()
            .ok_or_else(|| PdfChatError::Internal("chat history emptied mid-request".into()))?;
        turn.fill(answer, citation)?;
        Ok(&*turn)
    }

    /// Rate the most recent turn; returns the acknowledgement message.
    pub fn rate_last(&self, feedback: Feedback) -> Result<String, PdfChatError> {
        if self.history.is_empty() {
            return Err(PdfChatError::NothingToRate);
        }
        info!("Feedback on turn {}: {:?}", self.history.len(), feedback);
        Ok(format!("Thank you for your feedback: {feedback}"))
    }
}
