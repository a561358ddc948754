/// The error a build fails with after its cancellation token was cancelled.
#[derive(Debug, thiserror::Error)]
#[error("Build was cancelled")]
pub struct BuildCancelled;

impl BuildCancelled {
  pub fn is(err: &anyhow::Error) -> bool {
    err.downcast_ref::<Self>().is_some()
  }
}
