//! One method per Tomba operation.

use std::sync::Arc;

use serde_json::{json, Map, Value};

use super::{ClientError, RemoteApi, RemoteCall};
use crate::tools::{
    AuthorFinderRequest, CompaniesSearchRequest, DomainRequest, DomainSearchRequest,
    EmailFinderRequest, EmailLookupRequest, LinkedinFinderRequest, PhoneFinderRequest,
    PhoneValidatorRequest, ToolRequest,
};

/// Adapter from validated tool requests to Tomba API calls.
///
/// Only fields present in a request are sent.
#[derive(Clone)]
pub struct TombaClient {
    api: Arc<dyn RemoteApi>,
}

impl TombaClient {
    /// Wraps a remote API handle.
    #[must_use]
    pub fn new(api: Arc<dyn RemoteApi>) -> Self {
        Self { api }
    }

    /// Runs the operation matching `request`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Remote`] if the remote call fails.
    pub async fn execute(&self, request: &ToolRequest) -> Result<Value, ClientError> {
        match request {
            ToolRequest::DomainSearch(r) => self.domain_search(r).await,
            ToolRequest::EmailFinder(r) => self.email_finder(r).await,
            ToolRequest::EmailVerifier(r) => self.email_verifier(r).await,
            ToolRequest::EmailEnrichment(r) => self.email_enrichment(r).await,
            ToolRequest::AuthorFinder(r) => self.author_finder(r).await,
            ToolRequest::LinkedinFinder(r) => self.linkedin_finder(r).await,
            ToolRequest::PhoneFinder(r) => self.phone_finder(r).await,
            ToolRequest::PhoneValidator(r) => self.phone_validator(r).await,
            ToolRequest::EmailCount(r) => self.email_count(r).await,
            ToolRequest::SimilarFinder(r) => self.similar_finder(r).await,
            ToolRequest::TechnologyFinder(r) => self.technology_finder(r).await,
            ToolRequest::CompaniesSearch(r) => self.companies_search(r).await,
        }
    }

    async fn call(&self, call: RemoteCall) -> Result<Value, ClientError> {
        let operation = call.operation;
        self.api
            .execute(call)
            .await
            .map_err(|source| ClientError::Remote { operation, source })
    }

    /// Searches the addresses of a domain or company.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Remote`] if the remote call fails.
    pub async fn domain_search(&self, r: &DomainSearchRequest) -> Result<Value, ClientError> {
        self.call(
            RemoteCall::get("Domain search", "domain-search")
                .param("domain", r.domain.as_deref())
                .param("company", r.company.as_deref())
                .param("page", Some(r.page))
                .param("limit", Some(r.limit))
                .param("country", r.country.as_deref())
                .param("department", r.department.as_deref()),
        )
        .await
    }

    /// Finds a person's address.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Remote`] if the remote call fails.
    pub async fn email_finder(&self, r: &EmailFinderRequest) -> Result<Value, ClientError> {
        self.call(
            RemoteCall::get("Email finder", "email-finder")
                .param("domain", r.domain.as_deref())
                .param("company", r.company.as_deref())
                .param("first_name", r.first_name.as_deref())
                .param("last_name", r.last_name.as_deref())
                .param("full_name", r.full_name.as_deref())
                .param("enrich_mobile", r.enrich_mobile),
        )
        .await
    }

    /// Verifies an address.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Remote`] if the remote call fails.
    pub async fn email_verifier(&self, r: &EmailLookupRequest) -> Result<Value, ClientError> {
        self.call(
            RemoteCall::get("Email verifier", "email-verifier")
                .param("email", Some(&r.email))
                .param("enrich_mobile", r.enrich_mobile),
        )
        .await
    }

    /// Enriches an address with person and company data.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Remote`] if the remote call fails.
    pub async fn email_enrichment(&self, r: &EmailLookupRequest) -> Result<Value, ClientError> {
        self.call(
            RemoteCall::get("Email enrichment", "enrich")
                .param("email", Some(&r.email))
                .param("enrich_mobile", r.enrich_mobile),
        )
        .await
    }

    /// Finds the authors of an article.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Remote`] if the remote call fails.
    pub async fn author_finder(&self, r: &AuthorFinderRequest) -> Result<Value, ClientError> {
        self.call(RemoteCall::get("Author finder", "author-finder").param("url", Some(&r.url)))
            .await
    }

    /// Finds the address behind a LinkedIn profile.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Remote`] if the remote call fails.
    pub async fn linkedin_finder(&self, r: &LinkedinFinderRequest) -> Result<Value, ClientError> {
        self.call(
            RemoteCall::get("LinkedIn finder", "linkedin")
                .param("url", Some(&r.url))
                .param("enrich_mobile", r.enrich_mobile),
        )
        .await
    }

    /// Finds phone numbers by email, domain or LinkedIn URL.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Remote`] if the remote call fails.
    pub async fn phone_finder(&self, r: &PhoneFinderRequest) -> Result<Value, ClientError> {
        self.call(
            RemoteCall::get("Phone finder", "phone-finder")
                .param("email", r.email.as_deref())
                .param("domain", r.domain.as_deref())
                .param("linkedin", r.linkedin.as_deref())
                .param("full", r.full),
        )
        .await
    }

    /// Validates a phone number.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Remote`] if the remote call fails.
    pub async fn phone_validator(&self, r: &PhoneValidatorRequest) -> Result<Value, ClientError> {
        self.call(
            RemoteCall::get("Phone validator", "phone-validator")
                .param("phone", Some(&r.phone))
                .param("country_code", r.country.as_deref()),
        )
        .await
    }

    /// Counts the addresses known for a domain.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Remote`] if the remote call fails.
    pub async fn email_count(&self, r: &DomainRequest) -> Result<Value, ClientError> {
        self.call(RemoteCall::get("Email count", "email-count").param("domain", Some(&r.domain)))
            .await
    }

    /// Finds domains similar to a domain.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Remote`] if the remote call fails.
    pub async fn similar_finder(&self, r: &DomainRequest) -> Result<Value, ClientError> {
        self.call(RemoteCall::get("Similar finder", "similar").param("domain", Some(&r.domain)))
            .await
    }

    /// Reveals the technologies used by a website.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Remote`] if the remote call fails.
    pub async fn technology_finder(&self, r: &DomainRequest) -> Result<Value, ClientError> {
        self.call(
            RemoteCall::get("Technology finder", "technology").param("domain", Some(&r.domain)),
        )
        .await
    }

    /// Searches companies by free text and filters.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Remote`] if the remote call fails.
    pub async fn companies_search(
        &self,
        r: &CompaniesSearchRequest,
    ) -> Result<Value, ClientError> {
        let mut body = Map::new();
        if let Some(query) = &r.query {
            body.insert("query".to_string(), json!(query));
        }
        if let Some(filters) = &r.filters {
            body.insert("filters".to_string(), json!(filters));
        }
        body.insert("page".to_string(), json!(r.page));
        if let Some(limit) = r.limit {
            body.insert("limit".to_string(), json!(limit));
        }

        self.call(RemoteCall::post(
            "Companies search",
            "reveal/search",
            Value::Object(body),
        ))
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{Method, RemoteError};
    use crate::tools::{CompaniesFilters, IncludeExclude};
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        calls: Mutex<Vec<RemoteCall>>,
        fail: bool,
    }

    #[async_trait]
    impl RemoteApi for Recorder {
        async fn execute(&self, call: RemoteCall) -> Result<Value, RemoteError> {
            self.calls.lock().unwrap().push(call);
            if self.fail {
                Err(RemoteError::Transport("connection refused".to_string()))
            } else {
                Ok(json!({"data": []}))
            }
        }
    }

    fn client(recorder: &Arc<Recorder>) -> TombaClient {
        TombaClient::new(recorder.clone())
    }

    #[tokio::test]
    async fn domain_search_sends_present_fields_only() {
        let recorder = Arc::new(Recorder::default());
        let request = DomainSearchRequest {
            domain: Some("stripe.com".to_string()),
            company: None,
            page: 1,
            limit: 10,
            department: Some("engineering".to_string()),
            country: None,
        };
        client(&recorder).domain_search(&request).await.unwrap();

        let calls = recorder.calls.lock().unwrap();
        let call = &calls[0];
        assert_eq!(call.method, Method::Get);
        assert_eq!(call.path, "domain-search");
        assert_eq!(call.query_value("domain"), Some("stripe.com"));
        assert_eq!(call.query_value("limit"), Some("10"));
        assert_eq!(call.query_value("department"), Some("engineering"));
        assert_eq!(call.query_value("company"), None);
        assert_eq!(call.query_value("country"), None);
    }

    #[tokio::test]
    async fn phone_validator_maps_country_code() {
        let recorder = Arc::new(Recorder::default());
        let request = PhoneValidatorRequest {
            phone: "+14155550123".to_string(),
            country: Some("US".to_string()),
        };
        client(&recorder).phone_validator(&request).await.unwrap();

        let calls = recorder.calls.lock().unwrap();
        assert_eq!(calls[0].query_value("country_code"), Some("US"));
    }

    #[tokio::test]
    async fn companies_search_posts_body() {
        let recorder = Arc::new(Recorder::default());
        let request = CompaniesSearchRequest {
            query: None,
            filters: Some(CompaniesFilters {
                size: Some(IncludeExclude {
                    include: Some(vec!["11-50".to_string()]),
                    exclude: None,
                }),
                ..CompaniesFilters::default()
            }),
            page: 2,
            limit: None,
        };
        client(&recorder).companies_search(&request).await.unwrap();

        let calls = recorder.calls.lock().unwrap();
        assert_eq!(calls[0].method, Method::Post);
        assert_eq!(calls[0].path, "reveal/search");
        assert_eq!(
            calls[0].body,
            Some(json!({"filters": {"size": {"include": ["11-50"]}}, "page": 2}))
        );
        assert!(calls[0].query.is_empty());
    }

    #[tokio::test]
    async fn failures_are_wrapped_with_operation() {
        let recorder = Arc::new(Recorder {
            fail: true,
            ..Recorder::default()
        });
        let error = client(&recorder)
            .email_count(&DomainRequest {
                domain: "stripe.com".to_string(),
            })
            .await
            .unwrap_err();
        assert_eq!(error.to_string(), "Email count failed: connection refused");
    }
}
