use serde::{Deserialize, Serialize};

/// Query string of `GET /ask`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AskParams {
    pub query: Option<String>,
}

/// Body of a successful `GET /ask`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AskResponse {
    pub query: String,
    pub response: String,
}

/// Body of `GET /`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ask_response_shape() {
        let body = AskResponse {
            query: "Plan a 2-day trip".to_string(),
            response: "# Day 1".to_string(),
        };

        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({"query": "Plan a 2-day trip", "response": "# Day 1"})
        );
    }
}
