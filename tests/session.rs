//! Session integration tests against a scripted answer backend.
//!
//! These run without pdfium or a model server: documents are built from page
//! texts directly and the backend replays canned answers.

use edgequake_pdfchat::{
    transcript, AnswerBackend, ChatTurn, Citation, CitationStrategy, Document, PdfChatError,
    Session,
};
use std::sync::Mutex;

// ── Test helpers ─────────────────────────────────────────────────────────────

/// Replays answers in order and records every prompt it receives.
#[derive(Default)]
struct ScriptedBackend {
    answers: Mutex<Vec<Result<String, String>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedBackend {
    fn answering(answers: &[&str]) -> Self {
        Self {
            answers: Mutex::new(answers.iter().map(|a| Ok(a.to_string())).collect()),
            ..Self::default()
        }
    }

    fn failing(message: &str) -> Self {
        Self {
            answers: Mutex::new(vec![Err(message.to_string())]),
            ..Self::default()
        }
    }

    fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

impl AnswerBackend for ScriptedBackend {
    async fn generate(&self, prompt: &str) -> Result<String, PdfChatError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        let mut answers = self.answers.lock().unwrap();
        if answers.is_empty() {
            return Err(PdfChatError::LlmApiError {
                message: "script exhausted".into(),
            });
        }
        answers
            .remove(0)
            .map_err(|message| PdfChatError::LlmApiError { message })
    }

    fn model(&self) -> &str {
        "scripted"
    }
}

fn annual_report() -> Document {
    Document::from_page_texts(
        "annual_report.pdf",
        [
            "Letter to shareholders. The year was eventful.",
            "Financial highlights: revenue grew 10% while costs fell.",
        ],
    )
}

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("edgequake_pdfchat=debug")
        .with_test_writer()
        .try_init();
}

// ── End-to-end question flow ─────────────────────────────────────────────────

#[tokio::test]
async fn verbatim_answer_cites_true_page() {
    init_logging();
    let mut session = Session::new(CitationStrategy::PageHeader);
    session.upload(annual_report());
    let backend = ScriptedBackend::answering(&["revenue grew 10%"]);

    let turn = session
        .ask(&backend, "How much did revenue grow?")
        .await
        .expect("ask should succeed");

    assert_eq!(turn.answer(), "revenue grew 10%");
    assert_eq!(turn.citation_label(), "Page 2");
}

#[tokio::test]
async fn header_line_inside_page_text_does_not_shift_citation() {
    let mut session = Session::new(CitationStrategy::PageHeader);
    session.upload(Document::from_page_texts(
        "outlook.pdf",
        ["Contents\nPage 7:\nrevenue grew 10% in the outlook", "other"],
    ));
    let backend = ScriptedBackend::answering(&["revenue grew 10%"]);

    let turn = session.ask(&backend, "How much?").await.unwrap();
    assert_eq!(turn.reply().unwrap().citation, Citation::Page(1));
}

#[tokio::test]
async fn legacy_citations_keep_the_chunk_offset() {
    let mut session = Session::new(CitationStrategy::Legacy);
    session.upload(annual_report());
    let backend = ScriptedBackend::answering(&["revenue grew 10%"]);

    let turn = session.ask(&backend, "How much?").await.unwrap();
    assert_eq!(turn.reply().unwrap().citation, Citation::Page(3));
}

#[tokio::test]
async fn paraphrased_answer_is_not_found() {
    let mut session = Session::default();
    session.upload(annual_report());
    let backend = ScriptedBackend::answering(&["Revenue rose by ten percent."]);

    let turn = session.ask(&backend, "How much?").await.unwrap();
    assert_eq!(turn.citation_label(), "Page not found");
}

#[tokio::test]
async fn prompt_carries_document_and_question() {
    let mut session = Session::default();
    session.upload(annual_report());
    let backend = ScriptedBackend::answering(&["ok"]);

    session.ask(&backend, "What fell?").await.unwrap();

    let prompts = backend.prompts();
    assert_eq!(prompts.len(), 1);
    assert_eq!(
        prompts[0],
        format!("PDF Content:\n{}\n\nQuestion: What fell?", annual_report().text())
    );
}

#[tokio::test]
async fn questions_target_the_active_document() {
    let mut session = Session::default();
    session.upload(annual_report());
    session.upload(Document::from_page_texts("memo.pdf", ["Lunch is at noon."]));
    let backend = ScriptedBackend::answering(&["Lunch is at noon", "revenue grew 10%"]);

    let turn = session.ask(&backend, "When is lunch?").await.unwrap();
    assert_eq!(turn.citation_label(), "Page 1");

    session.select("annual_report.pdf").unwrap();
    let turn = session.ask(&backend, "Growth?").await.unwrap();
    assert_eq!(turn.citation_label(), "Page 2");
    assert!(backend.prompts()[1].contains("Financial highlights"));
}

// ── Failure handling ─────────────────────────────────────────────────────────

#[tokio::test]
async fn backend_failure_leaves_pending_turn() {
    let mut session = Session::default();
    session.upload(annual_report());
    let backend = ScriptedBackend::failing("connection refused");

    let err = session.ask(&backend, "Anything?").await.unwrap_err();
    assert!(matches!(err, PdfChatError::LlmApiError { .. }));
    assert!(err.to_string().contains("connection refused"));

    let history = session.history();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].question(), "Anything?");
    assert!(!history[0].is_answered());
    assert_eq!(history[0].answer(), "");
    assert_eq!(history[0].citation_label(), "");
}

#[tokio::test]
async fn asking_without_document_appends_nothing() {
    let mut session = Session::default();
    let backend = ScriptedBackend::answering(&["unused"]);

    let err = session.ask(&backend, "Hello?").await.unwrap_err();
    assert!(matches!(err, PdfChatError::NoDocument));
    assert!(session.history().is_empty());
    assert!(backend.prompts().is_empty());
}

#[tokio::test]
async fn blank_question_is_rejected_before_the_call() {
    let mut session = Session::default();
    session.upload(annual_report());
    let backend = ScriptedBackend::answering(&["unused"]);

    let err = session.ask(&backend, "   ").await.unwrap_err();
    assert!(matches!(err, PdfChatError::EmptyQuestion));
    assert!(session.history().is_empty());
    assert!(backend.prompts().is_empty());
}

// ── History and export ───────────────────────────────────────────────────────

#[tokio::test]
async fn history_is_ordered_and_exportable() {
    let mut session = Session::default();
    session.upload(annual_report());
    let backend = ScriptedBackend::answering(&["revenue grew 10%", "Nothing relevant."]);

    session.ask(&backend, "Q1").await.unwrap();
    session.ask(&backend, "Q2").await.unwrap();

    let questions: Vec<&str> = session.history().iter().map(ChatTurn::question).collect();
    assert_eq!(questions, vec!["Q1", "Q2"]);
    assert_eq!(
        transcript(session.history()),
        "You: Q1\nBot: revenue grew 10%\nCitation: Page 2\n\n\
         You: Q2\nBot: Nothing relevant.\nCitation: Page not found"
    );
}

#[test]
fn clearing_history_then_asking_again() {
    let mut session = Session::default();
    session.upload(annual_report());
    let backend = ScriptedBackend::answering(&["a", "b"]);

    tokio_test::block_on(session.ask(&backend, "first")).unwrap();
    session.clear_history();
    tokio_test::block_on(session.ask(&backend, "second")).unwrap();

    assert_eq!(session.history().len(), 1);
    assert_eq!(session.history()[0].question(), "second");
}
