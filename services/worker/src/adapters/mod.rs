pub mod db;
pub mod prompt_log;
pub mod suggestions_llm;

pub use db::DbAdapter;
pub use prompt_log::TracingPromptLogger;
pub use suggestions_llm::OpenAiSuggestionsAdapter;
