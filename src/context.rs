//! Per-call deadline and cancellation

use std::future::Future;
use std::time::Duration;

use log::debug;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Deadline and cancellation carried into a single request
#[derive(Debug, Clone, Default)]
pub struct RequestContext
{   deadline: Option<Instant>
  , cancel: CancellationToken
}

impl RequestContext
{   /// No deadline, not cancelled
    pub fn new() -> Self
    {   RequestContext::default()
    }

    /// Deadline `timeout` from now
    pub fn with_timeout(timeout: Duration) -> Self
    {   RequestContext::new().with_deadline(Instant::now() + timeout)
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self
    {   self.deadline = Some(deadline);
        self
    }

    /// Share cancellation with an existing token
    pub fn with_cancel(mut self, cancel: CancellationToken) -> Self
    {   self.cancel = cancel;
        self
    }

    /// Context cancelled with this one but cancellable on its own
    pub fn child(&self) -> Self
    {   RequestContext
        {   deadline: self.deadline
          , cancel: self.cancel.child_token()
        }
    }

    pub fn deadline(&self) -> Option<Instant>
    {   self.deadline
    }

    /// Token to hand to whoever may cancel this call
    pub fn cancel_token(&self) -> &CancellationToken
    {   &self.cancel
    }

    pub fn cancel(&self)
    {   self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool
    {   self.cancel.is_cancelled()
    }

    /// Drive `fut` until it finishes, the token fires or the deadline passes.
    ///
    /// On cancellation or deadline `fut` is dropped, which aborts any
    /// in-flight HTTP exchange it owns.
    pub async fn run<F, T>(&self, fut: F) -> crate::error::Result<T>
    where
        F: Future<Output = crate::error::Result<T>>
    {   if self.cancel.is_cancelled()
        {   debug!("Context already cancelled");
            return Err(crate::error::Error::Cancelled);
        }
        if let Some(deadline) = self.deadline
        {   if Instant::now() >= deadline
            {   debug!("Context deadline already passed");
                return Err(crate::error::Error::DeadlineExceeded);
            }
        }

        let expired = async {
          match self.deadline
          {   Some(deadline) => tokio::time::sleep_until(deadline).await
            , None => std::future::pending::<()>().await
          }
        };

        tokio::select!
        { biased;
          _ = self.cancel.cancelled() => {
            debug!("Request cancelled");
            Err(crate::error::Error::Cancelled)
          }
        , _ = expired => {
            debug!("Request deadline exceeded");
            Err(crate::error::Error::DeadlineExceeded)
          }
        , result = fut => result
        }
    }
}
