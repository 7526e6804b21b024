//! Local HTTP server for exercising the clients without the network.

use reqwest::blocking::Client as HttpClient;
use std::thread;
use tiny_http::{Header, Response, Server};

/// A canned reply: status, content type, body.
pub(crate) type Reply = (u16, &'static str, Vec<u8>);

/// Serve requests on a random local port until the process exits.
///
/// The handler receives the request URL (path and query) and the request
/// headers as `(name, value)` pairs. Returns the server's base URL.
pub(crate) fn serve<F>(handler: F) -> String
where
    F: Fn(&str, &[(String, String)]) -> Reply + Send + 'static,
{
    let server = Server::http("127.0.0.1:0").unwrap();
    let addr = server.server_addr().to_ip().unwrap();

    thread::spawn(move || {
        for mut request in server.incoming_requests() {
            let mut body = String::new();
            let _ = request.as_reader().read_to_string(&mut body);

            let headers: Vec<(String, String)> = request
                .headers()
                .iter()
                .map(|h| (h.field.to_string(), h.value.to_string()))
                .collect();

            let (status, content_type, bytes) = handler(request.url(), &headers);
            let header = Header::from_bytes("Content-Type", content_type).unwrap();
            let response = Response::from_data(bytes)
                .with_status_code(status)
                .with_header(header);
            let _ = request.respond(response);
        }
    });

    format!("http://{addr}")
}

/// HTTP client that talks to the local server directly, ignoring proxies.
pub(crate) fn local_http() -> HttpClient {
    HttpClient::builder().no_proxy().build().unwrap()
}
