use super::FetchError;

/// One authenticated request/response round trip against the Home Assistant API.
///
/// Implementations own the base URL, the bearer token and the request timeout. Paths
/// passed in always start with `/api/`. Anything other than a complete `200` body is
/// an error.
pub trait HaTransport {
    fn get(&mut self, path: &str) -> Result<String, FetchError>;
    fn post(&mut self, path: &str, body: &str) -> Result<String, FetchError>;
}

impl<T: HaTransport + ?Sized> HaTransport for &mut T {
    fn get(&mut self, path: &str) -> Result<String, FetchError> {
        (**self).get(path)
    }

    fn post(&mut self, path: &str, body: &str) -> Result<String, FetchError> {
        (**self).post(path, body)
    }
}

pub const FORECAST_SERVICE_PATH: &str = "/api/services/weather/get_forecasts?return_response";

pub fn state_path(entity_id: &str) -> String {
    format!("/api/states/{}", entity_id)
}

pub fn forecast_request_body(weather_entity: &str) -> String {
    serde_json::json!({ "entity_id": weather_entity, "type": "daily" }).to_string()
}

/// Joins the configured base URL and an API path, tolerating a trailing slash.
pub fn join_url(base_url: &str, path: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), path)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

#[derive(Debug)]
pub struct HttpRequest<'a> {
    pub method: HttpMethod,
    pub url: &'a str,
    pub authorization: &'a str,
    pub body: Option<&'a str>,
}

#[derive(Debug)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

/// A connection good for exactly one exchange.
///
/// `send` takes the session by value: a request that fails half-way leaves its
/// connection behind instead of handing it to the next request.
pub trait HttpSession: Sized {
    /// Reads at most `max_body + 1` bytes of a `200` body so oversized replies are
    /// detectable without buffering them whole.
    fn send(self, request: &HttpRequest<'_>, max_body: usize) -> Result<HttpResponse, FetchError>;
}

/// [`HaTransport`] over any [`HttpSession`], opening a new session per request.
pub struct RestTransport<F> {
    open_session: F,
    base_url: String,
    authorization: String,
    max_body: usize,
}

impl<F, S> RestTransport<F>
where
    F: FnMut() -> Result<S, FetchError>,
    S: HttpSession,
{
    pub fn new(base_url: &str, token: &str, max_body: usize, open_session: F) -> Self {
        Self {
            open_session,
            base_url: base_url.to_string(),
            authorization: format!("Bearer {}", token),
            max_body,
        }
    }

    fn exchange(
        &mut self,
        method: HttpMethod,
        path: &str,
        body: Option<&str>,
    ) -> Result<String, FetchError> {
        let url = join_url(&self.base_url, path);
        let request = HttpRequest {
            method,
            url: &url,
            authorization: &self.authorization,
            body,
        };

        let session = (self.open_session)()?;
        let response = session.send(&request, self.max_body)?;

        if response.status != 200 {
            return Err(FetchError::Status(response.status));
        }
        if response.body.len() > self.max_body {
            return Err(FetchError::Transport(format!(
                "response larger than {} bytes",
                self.max_body
            )));
        }

        String::from_utf8(response.body).map_err(|e| FetchError::Transport(e.to_string()))
    }
}

impl<F, S> HaTransport for RestTransport<F>
where
    F: FnMut() -> Result<S, FetchError>,
    S: HttpSession,
{
    fn get(&mut self, path: &str) -> Result<String, FetchError> {
        self.exchange(HttpMethod::Get, path, None)
    }

    fn post(&mut self, path: &str, body: &str) -> Result<String, FetchError> {
        self.exchange(HttpMethod::Post, path, Some(body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::rc::Rc;

    struct ScriptedSession {
        reply: Result<HttpResponse, FetchError>,
        sent: Rc<RefCell<Vec<String>>>,
    }

    impl HttpSession for ScriptedSession {
        fn send(self, request: &HttpRequest<'_>, _max_body: usize) -> Result<HttpResponse, FetchError> {
            self.sent.borrow_mut().push(format!(
                "{:?} {} [{}] {}",
                request.method,
                request.url,
                request.authorization,
                request.body.unwrap_or("")
            ));
            self.reply
        }
    }

    type Opener = Box<dyn FnMut() -> Result<ScriptedSession, FetchError>>;

    /// Returns the transport, the log of sent requests and the count of opened sessions.
    fn scripted(
        replies: Vec<Result<HttpResponse, FetchError>>,
    ) -> (RestTransport<Opener>, Rc<RefCell<Vec<String>>>, Rc<RefCell<u32>>) {
        let sent = Rc::new(RefCell::new(Vec::new()));
        let opened = Rc::new(RefCell::new(0));
        let mut replies = VecDeque::from(replies);

        let (log, count) = (sent.clone(), opened.clone());
        let open: Opener = Box::new(move || {
            *count.borrow_mut() += 1;
            let reply = replies
                .pop_front()
                .ok_or_else(|| FetchError::Transport("no route to host".into()))?;
            Ok(ScriptedSession {
                reply,
                sent: log.clone(),
            })
        });

        (RestTransport::new("http://ha.local:8123/", "secret", 16, open), sent, opened)
    }

    fn ok(body: &str) -> Result<HttpResponse, FetchError> {
        Ok(HttpResponse {
            status: 200,
            body: body.as_bytes().to_vec(),
        })
    }

    #[test]
    fn timed_out_request_leaves_the_transport_usable() {
        let (mut transport, sent, opened) = scripted(vec![
            Err(FetchError::Transport("timed out".into())),
            ok(r#"{"a":1}"#),
        ]);

        assert!(matches!(transport.get("/api/states/x"), Err(FetchError::Transport(_))));
        assert_eq!(transport.post(FORECAST_SERVICE_PATH, "{}").unwrap(), r#"{"a":1}"#);
        assert_eq!(*opened.borrow(), 2);
        assert_eq!(sent.borrow().len(), 2);
    }

    #[test]
    fn requests_carry_bearer_token_and_full_url() {
        let (mut transport, sent, _) = scripted(vec![ok("{}"), ok("{}")]);

        transport.get("/api/states/x").unwrap();
        transport.post("/api/services/y", "{\"k\":1}").unwrap();

        assert_eq!(
            *sent.borrow(),
            vec![
                "Get http://ha.local:8123/api/states/x [Bearer secret] ".to_string(),
                "Post http://ha.local:8123/api/services/y [Bearer secret] {\"k\":1}".to_string(),
            ]
        );
    }

    #[test]
    fn non_200_and_oversized_bodies_are_errors() {
        let (mut transport, _, _) = scripted(vec![
            Ok(HttpResponse {
                status: 401,
                body: Vec::new(),
            }),
            ok("this body is longer than sixteen bytes"),
            Ok(HttpResponse {
                status: 200,
                body: vec![0xff, 0xfe],
            }),
        ]);

        assert!(matches!(transport.get("/api/x"), Err(FetchError::Status(401))));
        assert!(matches!(transport.get("/api/x"), Err(FetchError::Transport(_))));
        assert!(matches!(transport.get("/api/x"), Err(FetchError::Transport(_))));
    }

    #[test]
    fn failing_to_open_a_session_is_a_transport_error() {
        let (mut transport, sent, opened) = scripted(Vec::new());

        assert!(matches!(transport.get("/api/x"), Err(FetchError::Transport(_))));
        assert_eq!(*opened.borrow(), 1);
        assert!(sent.borrow().is_empty());
    }

    #[test]
    fn state_path_appends_entity() {
        assert_eq!(
            state_path("sensor.h5071_50bc_temperature"),
            "/api/states/sensor.h5071_50bc_temperature"
        );
    }

    #[test]
    fn forecast_body_requests_daily() {
        let body: serde_json::Value =
            serde_json::from_str(&forecast_request_body("weather.forecast_home")).unwrap();
        assert_eq!(body["entity_id"], "weather.forecast_home");
        assert_eq!(body["type"], "daily");
    }

    #[test]
    fn join_url_handles_trailing_slash() {
        assert_eq!(
            join_url("http://ha.local:8123/", "/api/states/x"),
            "http://ha.local:8123/api/states/x"
        );
        assert_eq!(
            join_url("http://ha.local:8123", FORECAST_SERVICE_PATH),
            "http://ha.local:8123/api/services/weather/get_forecasts?return_response"
        );
    }
}
