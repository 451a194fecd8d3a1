//! Model identifiers and which endpoint serves them

pub const CHAT_COMPLETIONS_SUFFIX: &str = "/chat/completions";
pub const COMPLETIONS_SUFFIX: &str = "/completions";

// ===== Chat models =====

pub const GPT4: &str = "gpt-4";
pub const GPT4_0314: &str = "gpt-4-0314";
pub const GPT4_32K: &str = "gpt-4-32k";
pub const GPT4_32K_0314: &str = "gpt-4-32k-0314";
pub const GPT3_DOT5_TURBO: &str = "gpt-3.5-turbo";
pub const GPT3_DOT5_TURBO_0301: &str = "gpt-3.5-turbo-0301";

// ===== Completion-only models =====

pub const GPT3_TEXT_DAVINCI_003: &str = "text-davinci-003";
pub const GPT3_TEXT_DAVINCI_002: &str = "text-davinci-002";
pub const GPT3_TEXT_DAVINCI_001: &str = "text-davinci-001";
pub const GPT3_TEXT_CURIE_001: &str = "text-curie-001";
pub const GPT3_TEXT_BABBAGE_001: &str = "text-babbage-001";
pub const GPT3_TEXT_ADA_001: &str = "text-ada-001";
pub const GPT3_DAVINCI_INSTRUCT_BETA: &str = "davinci-instruct-beta";
pub const GPT3_DAVINCI: &str = "davinci";
pub const GPT3_CURIE_INSTRUCT_BETA: &str = "curie-instruct-beta";
pub const GPT3_CURIE: &str = "curie";
pub const GPT3_ADA: &str = "ada";
pub const GPT3_BABBAGE: &str = "babbage";
pub const CODEX_CODE_DAVINCI_002: &str = "code-davinci-002";
pub const CODEX_CODE_CUSHMAN_001: &str = "code-cushman-001";
pub const CODEX_CODE_DAVINCI_001: &str = "code-davinci-001";

const CHAT_MODELS: &[&str] = &[
  GPT3_DOT5_TURBO
, GPT3_DOT5_TURBO_0301
, GPT4
, GPT4_0314
, GPT4_32K
, GPT4_32K_0314
];

const COMPLETION_ONLY_MODELS: &[&str] = &[
  GPT3_TEXT_DAVINCI_003
, GPT3_TEXT_DAVINCI_002
, GPT3_TEXT_DAVINCI_001
, GPT3_TEXT_CURIE_001
, GPT3_TEXT_BABBAGE_001
, GPT3_TEXT_ADA_001
, GPT3_DAVINCI_INSTRUCT_BETA
, GPT3_DAVINCI
, GPT3_CURIE_INSTRUCT_BETA
, GPT3_CURIE
, GPT3_ADA
, GPT3_BABBAGE
, CODEX_CODE_DAVINCI_002
, CODEX_CODE_CUSHMAN_001
, CODEX_CODE_DAVINCI_001
];

/// Models refused by the endpoint at `suffix`
fn disabled_models(suffix: &str) -> &'static [&'static str]
{   match suffix
    {   CHAT_COMPLETIONS_SUFFIX => COMPLETION_ONLY_MODELS
      , COMPLETIONS_SUFFIX => CHAT_MODELS
      , _ => &[]
    }
}

/// Whether `model` may be sent to the endpoint at `suffix`.
///
/// Only known mismatches are refused; unknown models and unknown
/// endpoints pass so new model ids work without a release.
pub fn check_endpoint_supports_model(suffix: &str, model: &str) -> bool
{   !disabled_models(suffix).contains(&model)
}
