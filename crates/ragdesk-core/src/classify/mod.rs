//! Query intent classification.
//!
//! A [`Classifier`] maps a product question to one of the six [`Intent`]s.
//! The LLM-backed classifier is the default; the keyword classifier answers
//! without a model call and backs offline setups and tests.

pub mod keyword;
pub mod llm;

use std::future::Future;
use std::pin::Pin;

use ragdesk_types::intent::Intent;
use ragdesk_types::llm::LlmError;

pub use keyword::KeywordClassifier;
pub use llm::LlmIntentClassifier;

/// Maps a question to an intent. Unrecognized output must become `Fuzzy`,
/// never an error; errors are reserved for provider failures.
pub trait Classifier: Send + Sync {
    fn name(&self) -> &str;

    fn classify(
        &self,
        question: &str,
    ) -> impl Future<Output = Result<Intent, LlmError>> + Send;
}

/// Object-safe version of [`Classifier`] with boxed futures.
pub trait ClassifierDyn: Send + Sync {
    fn name_dyn(&self) -> &str;

    fn classify_boxed<'a>(
        &'a self,
        question: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Intent, LlmError>> + Send + 'a>>;
}

impl<T: Classifier> ClassifierDyn for T {
    fn name_dyn(&self) -> &str {
        self.name()
    }

    fn classify_boxed<'a>(
        &'a self,
        question: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Intent, LlmError>> + Send + 'a>> {
        Box::pin(self.classify(question))
    }
}

/// Type-erased classifier selected from `[classifier] kind`.
pub struct BoxClassifier {
    inner: Box<dyn ClassifierDyn + Send + Sync>,
}

impl BoxClassifier {
    pub fn new<T: Classifier + 'static>(classifier: T) -> Self {
        Self {
            inner: Box::new(classifier),
        }
    }

    pub fn name(&self) -> &str {
        self.inner.name_dyn()
    }

    pub async fn classify(&self, question: &str) -> Result<Intent, LlmError> {
        self.inner.classify_boxed(question).await
    }
}
