use std::collections::HashMap;

/// A read-only snapshot of the inbound request the current evaluation runs
/// inside of, captured by the web integration layer.
///
/// Header names are matched case-insensitively. Query parameters may carry
/// multiple values per name.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RequestInfo {
    server_name: Option<String>,
    remote_addr: Option<String>,
    headers: HashMap<String, String>,
    query_params: HashMap<String, Vec<String>>,
}

impl RequestInfo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the server (virtual host) name the request was addressed to.
    pub fn with_server_name(mut self, server_name: impl Into<String>) -> Self {
        self.server_name = Some(server_name.into());
        self
    }

    /// Sets the peer address the request arrived from.
    pub fn with_remote_addr(mut self, remote_addr: impl Into<String>) -> Self {
        self.remote_addr = Some(remote_addr.into());
        self
    }

    /// Adds a request header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into().to_lowercase(), value.into());
        self
    }

    /// Adds one value of a query parameter. Repeated names accumulate.
    pub fn with_query_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query_params
            .entry(name.into())
            .or_default()
            .push(value.into());
        self
    }

    pub fn server_name(&self) -> Option<&str> {
        self.server_name.as_deref()
    }

    pub fn remote_addr(&self) -> Option<&str> {
        self.remote_addr.as_deref()
    }

    /// Looks up a header by name, case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_lowercase()).map(String::as_str)
    }

    /// The referer header, when the client sent one.
    pub fn referer(&self) -> Option<&str> {
        self.header("referer")
    }

    pub fn query_params(&self) -> &HashMap<String, Vec<String>> {
        &self.query_params
    }
}

/// Supplies the request the current evaluation runs inside of, or None when
/// evaluation happens outside a web context. Request-bound strategies must
/// report inactive in that case.
pub trait RequestProvider: Send + Sync {
    fn current_request(&self) -> Option<RequestInfo>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use spectral::prelude::*;

    #[test]
    fn headers_are_case_insensitive() {
        let request = RequestInfo::new().with_header("X-Forwarded-For", "10.1.2.3");
        assert_that!(request.header("x-forwarded-for")).contains_value("10.1.2.3");
        assert_that!(request.header("X-FORWARDED-FOR")).contains_value("10.1.2.3");
        assert_that!(request.header("accept")).is_none();
    }

    #[test]
    fn referer_reads_the_header() {
        let request = RequestInfo::new().with_header("Referer", "https://example.com/?a=1");
        assert_that!(request.referer()).contains_value("https://example.com/?a=1");
    }

    #[test]
    fn query_params_accumulate_values() {
        let request = RequestInfo::new()
            .with_query_param("tag", "a")
            .with_query_param("tag", "b");
        assert_that!(request.query_params().get("tag").unwrap()).is_equal_to(&vec![
            "a".to_string(),
            "b".to_string(),
        ]);
    }
}
