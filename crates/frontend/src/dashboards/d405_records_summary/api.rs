use crate::shared::api_utils::{api_url, with_query};
use crate::shared::config::Config;
use crate::shared::transport::FetchError;
use contracts::dashboards::d405_records_summary::SummaryRange;

/// One aggregate request of the summary and where its answer is mounted
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRequest {
    pub url: String,
    pub mount: Option<String>,
}

/// Requests for every configured summary endpoint, all sharing `range`
pub fn summary_requests(config: &Config, range: &SummaryRange) -> Result<Vec<SummaryRequest>, FetchError> {
    config
        .summary
        .endpoints
        .iter()
        .map(|endpoint| {
            let url = with_query(&api_url(&config.api.base_url, &endpoint.path), range)?;
            Ok(SummaryRequest {
                url,
                mount: endpoint.mount.clone(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requests_share_range() {
        let requests = summary_requests(&Config::default(), &SummaryRange::new("2024-01-01", "2024-01-31")).unwrap();
        assert_eq!(
            requests,
            vec![
                SummaryRequest {
                    url: "/api/d405/invoices-summary?startDate=2024-01-01&endDate=2024-01-31".into(),
                    mount: None,
                },
                SummaryRequest {
                    url: "/api/d405/cost-summary?startDate=2024-01-01&endDate=2024-01-31".into(),
                    mount: None,
                },
            ]
        );
    }

    #[test]
    fn test_unbounded_range_has_no_query() {
        let requests = summary_requests(&Config::default(), &SummaryRange::default()).unwrap();
        assert_eq!(requests[0].url, "/api/d405/invoices-summary");
    }
}
