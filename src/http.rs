use crate::config::{HA_BASE_URL, HA_TOKEN, HTTP_MAX_BODY_BYTES, HTTP_TIMEOUT_MS};
use crate::ha::{FetchError, HttpMethod, HttpRequest, HttpResponse, HttpSession, RestTransport};
use embedded_svc::http::Method;
use embedded_svc::http::client::Client;
use embedded_svc::io::{Read, Write};
use esp_idf_svc::http::client::{Configuration, EspHttpConnection};
use log::debug;
use std::time::Duration;

pub type EspHaTransport = RestTransport<fn() -> Result<EspSession, FetchError>>;

fn transport_err<E: core::fmt::Debug>(e: E) -> FetchError {
    FetchError::Transport(format!("{:?}", e))
}

/// Home Assistant transport with a fresh HTTP(S) connection per request.
pub fn ha_transport() -> EspHaTransport {
    RestTransport::new(
        HA_BASE_URL,
        HA_TOKEN,
        HTTP_MAX_BODY_BYTES,
        EspSession::open as fn() -> Result<EspSession, FetchError>,
    )
}

pub struct EspSession(Client<EspHttpConnection>);

impl EspSession {
    pub fn open() -> Result<Self, FetchError> {
        let config = Configuration {
            timeout: Some(Duration::from_millis(HTTP_TIMEOUT_MS)),
            use_global_ca_store: true,
            crt_bundle_attach: Some(esp_idf_svc::sys::esp_crt_bundle_attach),
            ..Default::default()
        };

        let connection = EspHttpConnection::new(&config).map_err(transport_err)?;
        Ok(Self(Client::wrap(connection)))
    }
}

impl HttpSession for EspSession {
    fn send(mut self, req: &HttpRequest<'_>, max_body: usize) -> Result<HttpResponse, FetchError> {
        let method = match req.method {
            HttpMethod::Get => Method::Get,
            HttpMethod::Post => Method::Post,
        };
        let content_length = req.body.map(|b| b.len().to_string());

        let mut headers = vec![
            ("Authorization", req.authorization),
            ("Content-Type", "application/json"),
        ];
        if let Some(len) = content_length.as_deref() {
            headers.push(("Content-Length", len));
        }

        let mut request = self
            .0
            .request(method, req.url, &headers)
            .map_err(transport_err)?;

        if let Some(body) = req.body {
            request.write_all(body.as_bytes()).map_err(transport_err)?;
            request.flush().map_err(transport_err)?;
        }

        let mut response = request.submit().map_err(transport_err)?;
        let status = response.status();
        debug!("🏠 {:?} {} -> {}", req.method, req.url, status);

        let mut body = Vec::new();
        if status != 200 {
            return Ok(HttpResponse { status, body });
        }

        let mut buf = [0u8; 1024];
        while body.len() <= max_body {
            let n = response.read(&mut buf).map_err(transport_err)?;
            if n == 0 {
                break;
            }
            body.extend_from_slice(&buf[..n]);
        }

        Ok(HttpResponse { status, body })
    }
}
