//! Time-bounded generation calls

use crate::error::ExtractorError;
use reelgraph_llm::{GenerationClient, Variables};
use std::time::Duration;
use tokio::time::timeout;

/// Render and send one prompt, failing with [`ExtractorError::Timeout`] when
/// the call takes longer than `limit`
pub(crate) async fn invoke<G>(
    client: &G,
    template: &str,
    variables: &Variables,
    limit: Duration,
) -> Result<String, ExtractorError>
where
    G: GenerationClient + ?Sized,
{
    let response = timeout(limit, client.generate(template, variables))
        .await
        .map_err(|_| ExtractorError::Timeout(limit))??;
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use reelgraph_llm::template::variables;
    use reelgraph_llm::{Generator, MockProvider};
    use serde_json::json;

    #[tokio::test(start_paused = true)]
    async fn test_slow_call_times_out() {
        let provider = MockProvider::default();
        provider.when_contains_delayed("slow", "late", Duration::from_secs(60));
        let client = Generator::new(provider);

        let result = invoke(&client, "slow {x}", &variables([("x", json!(1))]), Duration::from_secs(5)).await;
        assert!(matches!(result, Err(ExtractorError::Timeout(d)) if d == Duration::from_secs(5)));
    }

    #[tokio::test]
    async fn test_template_error_maps_through() {
        let client = Generator::new(MockProvider::default());
        let result = invoke(&client, "needs {missing}", &Variables::new(), Duration::from_secs(5)).await;
        assert!(matches!(result, Err(ExtractorError::Template(_))));
    }
}
