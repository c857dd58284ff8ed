use std::fmt;

/// Why a backend call failed. Kept for logs; callers only see the message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    Transport,
    Response(u16),
    Decode,
}

#[derive(Debug, Clone)]
pub struct MetricsError {
    pub endpoint: &'static str,
    pub kind: FailureKind,
    pub detail: String,
}

impl MetricsError {
    pub fn transport(endpoint: &'static str, detail: impl Into<String>) -> Self {
        Self {
            endpoint,
            kind: FailureKind::Transport,
            detail: detail.into(),
        }
    }

    pub fn response(endpoint: &'static str, status: u16, detail: impl Into<String>) -> Self {
        Self {
            endpoint,
            kind: FailureKind::Response(status),
            detail: detail.into(),
        }
    }

    pub fn decode(endpoint: &'static str, detail: impl Into<String>) -> Self {
        Self {
            endpoint,
            kind: FailureKind::Decode,
            detail: detail.into(),
        }
    }
}

impl fmt::Display for MetricsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "request failed ({}): {}", self.endpoint, self.detail)
    }
}

impl std::error::Error for MetricsError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_hides_failure_kind() {
        let err = MetricsError::response("/api/daily-summary", 502, "HTTP 502 Bad Gateway");
        assert_eq!(
            err.to_string(),
            "request failed (/api/daily-summary): HTTP 502 Bad Gateway"
        );
        assert_eq!(err.kind, FailureKind::Response(502));
    }
}
