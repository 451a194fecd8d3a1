//! Send one prompt and print the reply
//!
//! Usage: chat <model> <prompt...>
//! Reads OPENAI_API_KEY, OPENAI_BASE_URL and OPENAI_ORG_ID.
//! Log level via RUST_LOG.

use std::process::ExitCode;

use log::{debug, error};
use allm_chat::{
  ChatCompletionRequest
, Client
, Message
, RequestContext
};

#[tokio::main]
async fn main() -> ExitCode
{   env_logger::init();

    let mut args = std::env::args().skip(1);
    let model = args.next().unwrap_or_default();
    let prompt = args.collect::<Vec<_>>().join(" ");
    if model.is_empty() || prompt.is_empty()
    {   eprintln!("usage: chat <model> <prompt...>");
        return ExitCode::from(2);
    }

    let client = match Client::from_env()
    {   Ok(c) => c
      , Err(e) => {
          error!("{}", e);
          return ExitCode::FAILURE;
        }
    };

    let ctx = RequestContext::new();
    let cancel = ctx.cancel_token().clone();
    tokio::spawn(async move {
      if tokio::signal::ctrl_c().await.is_ok()
      {   debug!("Interrupted, cancelling request");
          cancel.cancel();
      }
    });

    let request = ChatCompletionRequest::new(
      model,
      vec![Message::user(prompt)]
    );

    match client.create_chat_completion(&ctx, &request).await
    {   Ok(response) => {
          match response.first_content()
          {   Some(text) => {
                println!("{}", text);
                ExitCode::SUCCESS
              }
            , None => {
                error!("No choices in response");
                ExitCode::FAILURE
              }
          }
        }
      , Err(e) => {
          error!("{}", e);
          eprintln!("{}", e);
          ExitCode::FAILURE
        }
    }
}
