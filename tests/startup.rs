//! Startup failures are returned to the caller instead of being swallowed.

use echo_api::config::EchoConfig;
use echo_api::lifecycle::{prepare, StartupError};
use echo_api::net::ListenerError;

fn local_config() -> EchoConfig {
    let mut config = EchoConfig::default();
    config.listener.host = "127.0.0.1".into();
    config.listener.port = 0;
    config
}

#[tokio::test]
async fn metrics_port_in_use_is_fatal() {
    let taken = std::net::TcpListener::bind("127.0.0.1:0").unwrap();

    let mut config = local_config();
    config.observability.metrics_enabled = true;
    config.observability.metrics_address = taken.local_addr().unwrap().to_string();

    let err = prepare(config).await.unwrap_err();
    assert!(matches!(err, StartupError::Metrics(_)), "got {err}");
}

#[tokio::test]
async fn listener_port_in_use_is_fatal() {
    let taken = std::net::TcpListener::bind("127.0.0.1:0").unwrap();

    let mut config = local_config();
    config.listener.port = taken.local_addr().unwrap().port();

    let err = prepare(config).await.unwrap_err();
    assert!(matches!(err, StartupError::Listener(ListenerError::Bind { .. })));
}

#[tokio::test]
async fn unparsable_metrics_address_is_reported() {
    let mut config = local_config();
    config.observability.metrics_enabled = true;
    config.observability.metrics_address = "not-an-address".into();

    let err = prepare(config).await.unwrap_err();
    assert!(matches!(err, StartupError::MetricsAddress { .. }));
    assert!(err.to_string().contains("not-an-address"));
}

#[tokio::test]
async fn ready_server_when_metrics_are_off() {
    let (_server, listener) = prepare(local_config()).await.unwrap();
    assert!(listener.local_addr().unwrap().port() > 0);
}
