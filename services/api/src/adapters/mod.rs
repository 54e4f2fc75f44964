pub mod coach_llm;
pub mod db;
pub mod memory;
pub mod recommendations_llm;

pub use coach_llm::OpenAiCoachAdapter;
pub use db::DbAdapter;
pub use memory::InMemoryDbAdapter;
pub use recommendations_llm::OpenAiRecommendationsAdapter;

use eco_tracker_core::ports::{PortError, PortResult};
use std::future::Future;
use std::time::Duration;

/// Bounds an outbound AI call. Expiry is reported as a transient failure.
pub(crate) async fn with_deadline<T, F>(deadline: Duration, call: F) -> PortResult<T>
where
    F: Future<Output = PortResult<T>>,
{
    tokio::time::timeout(deadline, call).await.map_err(|_| {
        PortError::Unavailable(format!("no response within {}s", deadline.as_secs()))
    })?
}
