use std::sync::Arc;

use bodylog::{
    BodyLogConfig, BodyLogger, ExchangeContext, InboundInterceptor, ObservedBody,
    OutboundInterceptor, WriteSink,
};
use bodylog_test::{chunked, create_log_collector, failing_after};
use bytes::Bytes;
use http::header::HOST;
use http::{Method, Request, Response, StatusCode};
use http_body_util::{BodyExt, Empty, Full};
use pretty_assertions::assert_eq;

fn text_response(status: StatusCode, body: &'static str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .body(Full::new(Bytes::from(body)))
        .unwrap()
}

#[tokio::test]
async fn test_inbound_logs_request_then_response() {
    let collector = create_log_collector();
    let _guard = collector.set_default();
    let interceptor = Arc::new(InboundInterceptor::default());

    let request = Request::post("http://localhost:8080/")
        .body(chunked(["{\"a\":", "\"eugene\"}"]))
        .unwrap();
    let request = interceptor.on_request_received(request).await.unwrap();
    assert_eq!(
        collector.messages(),
        vec!["Incoming HTTP(s) request: POST http://localhost:8080/. Body: {\"a\":\"eugene\"}"]
    );

    let handler_input = request.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(handler_input, Bytes::from("{\"a\":\"eugene\"}"));

    let response = interceptor.on_response_about_to_write(text_response(StatusCode::OK, "hello"));
    assert!(response.body().is_tee());
    let body = ObservedBody::new(response.into_body(), interceptor.clone());
    assert!(
        collector
            .messages_starting_with("Outgoing HTTP(s) request")
            .is_empty()
    );

    let written = body.collect().await.unwrap().to_bytes();
    assert_eq!(written, Bytes::from("hello"));
    assert_eq!(
        collector.messages_starting_with("Outgoing HTTP(s) request"),
        vec!["Outgoing HTTP(s) request: 200. Body: hello"]
    );
}

#[tokio::test]
async fn test_inbound_bodiless_request_uses_empty_marker() {
    let collector = create_log_collector();
    let _guard = collector.set_default();
    let interceptor = InboundInterceptor::default();

    let request = Request::get("/health").body(Empty::<Bytes>::new()).unwrap();
    interceptor.on_request_received(request).await.unwrap();

    collector.assert_has_messages(&["Incoming HTTP(s) request: GET /health. Body: <empty>"]);
}

#[tokio::test]
async fn test_inbound_origin_form_uri_made_absolute() {
    let collector = create_log_collector();
    let _guard = collector.set_default();
    let interceptor = InboundInterceptor::default();

    let request = Request::post("/orders?id=7")
        .header(HOST, "localhost:8080")
        .body(Full::new(Bytes::from("hello")))
        .unwrap();
    interceptor.on_request_received(request).await.unwrap();

    let request = Request::get("/").body(Empty::<Bytes>::new()).unwrap();
    interceptor.on_request_received(request).await.unwrap();

    assert_eq!(
        collector.messages(),
        vec![
            "Incoming HTTP(s) request: POST http://localhost:8080/orders?id=7. Body: hello",
            "Incoming HTTP(s) request: GET /. Body: <empty>",
        ]
    );
}

#[tokio::test]
async fn test_inbound_read_failure_is_not_logged() {
    let collector = create_log_collector();
    let _guard = collector.set_default();
    let interceptor = InboundInterceptor::default();

    let request = Request::post("/upload")
        .body(failing_after(["partial"]))
        .unwrap();
    assert!(interceptor.on_request_received(request).await.is_err());
    assert!(collector.messages().is_empty());
}

#[tokio::test]
async fn test_inbound_swapped_sink_logs_missed() {
    let collector = create_log_collector();
    let _guard = collector.set_default();
    let interceptor = Arc::new(InboundInterceptor::default());

    let response = interceptor.on_response_about_to_write(text_response(StatusCode::OK, "hello"));
    // Another interceptor takes the tee out of the write slot.
    let response = response.map(|sink| WriteSink::plain(sink.into_inner()));
    let body = ObservedBody::new(response.into_body(), interceptor.clone());

    let written = body.collect().await.unwrap().to_bytes();
    assert_eq!(written, Bytes::from("hello"));
    assert_eq!(
        collector.messages(),
        vec!["Outgoing HTTP(s) request: MISSED"]
    );
}

#[tokio::test]
async fn test_inbound_foreign_context_logs_unknown_status() {
    let collector = create_log_collector();
    let _guard = collector.set_default();
    let interceptor = Arc::new(InboundInterceptor::default());

    let sink = WriteSink::tee(
        Full::new(Bytes::from("hello")),
        ExchangeContext::client_request(Method::GET, "http://localhost:5008/hello"),
    );
    ObservedBody::new(sink, interceptor).collect().await.unwrap();

    assert_eq!(
        collector.messages(),
        vec!["Outgoing HTTP(s) request: UNKNOWN. Body: hello"]
    );
}

#[tokio::test]
async fn test_inbound_empty_response_is_logged_on_drop() {
    let collector = create_log_collector();
    let _guard = collector.set_default();
    let interceptor = Arc::new(InboundInterceptor::default());

    let response = Response::builder()
        .status(StatusCode::NO_CONTENT)
        .body(Empty::<Bytes>::new())
        .unwrap();
    let response = interceptor.on_response_about_to_write(response);
    let body = ObservedBody::new(response.into_body(), interceptor.clone());
    drop(body);

    assert_eq!(
        collector.messages(),
        vec!["Outgoing HTTP(s) request: 204. Body: <empty>"]
    );
}

#[tokio::test]
async fn test_inbound_aborted_write_discards_copy() {
    let collector = create_log_collector();
    let _guard = collector.set_default();
    let interceptor = Arc::new(InboundInterceptor::default());

    let response = Response::new(chunked(["first", "second"]));
    let response = interceptor.on_response_about_to_write(response);
    let mut body = ObservedBody::new(response.into_body(), interceptor.clone());
    let frame = body.frame().await.unwrap().unwrap();
    assert_eq!(frame.into_data().unwrap(), Bytes::from("first"));
    drop(body);

    let response = interceptor.on_response_about_to_write(Response::new(failing_after(["x"])));
    let body = ObservedBody::new(response.into_body(), interceptor.clone());
    assert!(body.collect().await.is_err());

    assert!(collector.messages().is_empty());
}

#[tokio::test]
async fn test_outbound_bodiless_request_logged_immediately() {
    let collector = create_log_collector();
    let _guard = collector.set_default();
    let interceptor = OutboundInterceptor::default();

    let sink = interceptor.on_request_about_to_send::<Full<Bytes>>(
        &Method::GET,
        "http://localhost:5008/hello",
        None,
    );
    assert!(sink.is_none());
    assert_eq!(
        collector.messages(),
        vec!["External HTTP(s) request: GET http://localhost:5008/hello. Body: <empty>"]
    );
}

#[tokio::test]
async fn test_outbound_request_logged_after_write() {
    let collector = create_log_collector();
    let _guard = collector.set_default();
    let interceptor = Arc::new(OutboundInterceptor::default());

    let sink = interceptor
        .on_request_about_to_send(
            &Method::POST,
            "http://localhost:5008/send",
            Some(chunked(["{\"a\":", "\"eugene\"}"])),
        )
        .unwrap();
    assert!(collector.messages().is_empty());

    let sent = ObservedBody::new(sink, interceptor.clone())
        .collect()
        .await
        .unwrap()
        .to_bytes();
    assert_eq!(sent, Bytes::from("{\"a\":\"eugene\"}"));
    assert_eq!(
        collector.messages(),
        vec!["External HTTP(s) request: POST http://localhost:5008/send. Body: {\"a\":\"eugene\"}"]
    );
}

#[tokio::test]
async fn test_outbound_missed_when_tee_replaced_or_mistagged() {
    let collector = create_log_collector();
    let _guard = collector.set_default();
    let interceptor = Arc::new(OutboundInterceptor::default());

    let plain = WriteSink::plain(Full::new(Bytes::from("payload")));
    ObservedBody::new(plain, interceptor.clone())
        .collect()
        .await
        .unwrap();

    let mistagged = WriteSink::tee(
        Full::new(Bytes::from("payload")),
        ExchangeContext::server_response(StatusCode::OK),
    );
    ObservedBody::new(mistagged, interceptor.clone())
        .collect()
        .await
        .unwrap();

    assert_eq!(
        collector.messages(),
        vec![
            "External HTTP(s) request: MISSED",
            "External HTTP(s) request: MISSED",
        ]
    );
}

#[tokio::test]
async fn test_outbound_response_captured_and_replaced() {
    let collector = create_log_collector();
    let _guard = collector.set_default();
    let interceptor = OutboundInterceptor::default();

    let response = interceptor
        .on_response_received(
            "http://localhost:5008/send",
            Response::new(chunked(["hel", "lo"])),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(body, Bytes::from("hello"));
    assert_eq!(
        collector.messages(),
        vec!["External HTTP(s) response from http://localhost:5008/send: 200, body: hello"]
    );
}

#[tokio::test]
async fn test_configured_component_and_marker() {
    let collector = create_log_collector();
    let _guard = collector.set_default();
    let config = BodyLogConfig::from_yaml("component: orders-api\nempty_body: \"-\"\n").unwrap();
    let interceptor = OutboundInterceptor::new(BodyLogger::new(&config));

    interceptor.on_request_about_to_send::<Full<Bytes>>(
        &Method::DELETE,
        "http://localhost:5008/orders/7",
        None,
    );

    let event = collector
        .get_event("External HTTP(s) request: DELETE http://localhost:5008/orders/7. Body: -")
        .unwrap();
    assert_eq!(event.level, tracing::Level::INFO);
    assert_eq!(event.field("component"), Some("orders-api"));
}
