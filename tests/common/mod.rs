use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Transport that replays a fixed queue of responses and records every
/// request URL it sees. Running out of canned responses fails the request,
/// so a drained queue proves no extra call was made.
#[derive(Debug, Default)]
pub struct CannedTransport {
    responses: Mutex<VecDeque<(u16, Value)>>,
    requests: Mutex<Vec<String>>,
}

impl CannedTransport {
    pub fn new(responses: Vec<(u16, Value)>) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn remaining(&self) -> usize {
        self.responses.lock().unwrap().len()
    }
}

#[async_trait]
impl http_client::HttpClient for CannedTransport {
    async fn send(
        &self,
        req: http_client::Request,
    ) -> Result<http_client::Response, http_types::Error> {
        self.requests.lock().unwrap().push(req.url().to_string());

        let (status, payload) = self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| {
                http_types::Error::from_str(
                    http_types::StatusCode::InternalServerError,
                    "no canned response left",
                )
            })?;

        let status = http_types::StatusCode::try_from(status).map_err(|_| {
            http_types::Error::from_str(
                http_types::StatusCode::InternalServerError,
                "invalid canned status",
            )
        })?;
        let mut response = http_client::Response::new(status);
        if status == http_types::StatusCode::TooManyRequests {
            response.insert_header("Retry-After", "0");
        }
        response.set_body(payload.to_string());
        Ok(response)
    }
}
