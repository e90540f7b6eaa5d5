mod common;

use common::{FakeServer, Reply};
use px6_client::{
    BuyRequest, CheckRequest, CountRequest, CountryRequest, DeleteRequest, Error, ErrorKind,
    PriceRequest, ProlongRequest, ProxyListRequest, ProxyState, ProxyType, ProxyVersion,
    SetDescrRequest, SetTypeRequest, TransportError,
};

#[test]
fn get_price_sends_defaults_and_reads_price() {
    let server = FakeServer::new();
    server.respond("getprice", r#"{"status":"yes","price":1800,"price_single":0.6}"#);
    let client = server.blocking();

    let price = client.get_price(&PriceRequest::new(5, 30)).unwrap();
    assert_eq!(price, 1800.0);

    let request = server.last_request();
    assert_eq!(request.path, "KEY/getprice");
    assert_eq!(request.param("count"), Some("5"));
    assert_eq!(request.param("period"), Some("30"));
    assert_eq!(request.param("version"), Some("6"));
    assert_eq!(request.query.len(), 3);
}

#[test]
fn inventory_queries() {
    let server = FakeServer::new();
    server
        .respond("getcount", r#"{"status":"yes","count":971}"#)
        .respond("getcountry", r#"{"status":"yes","list":["ru","ua","us"]}"#);
    let client = server.blocking();

    let count = client
        .get_count(&CountRequest::new("ru").version(ProxyVersion::Ipv4))
        .unwrap();
    assert_eq!(count, 971);
    assert_eq!(server.last_request().param("version"), Some("4"));

    let countries = client.get_country(&CountryRequest::default()).unwrap();
    assert_eq!(countries, vec!["ru", "ua", "us"]);
}

#[test]
fn proxy_listing_omits_unset_filter() {
    let server = FakeServer::new();
    server.respond(
        "getproxy",
        r#"{"status":"yes","list_count":2,"list":{
            "11":{"id":"11","host":"185.22.134.250","port":"7330","user":"u","pass":"p","type":"http","active":"1"},
            "12":{"id":"12","host":"185.22.134.251","port":"7331","user":"u","pass":"p","type":"socks","active":"0"}
        }}"#,
    );
    let client = server.blocking();

    let proxies = client.get_proxy(&ProxyListRequest::new()).unwrap();
    assert_eq!(proxies.len(), 2);
    assert_eq!(proxies[0].id, 11);
    assert!(proxies[0].active);
    assert_eq!(proxies[1].proxy_type, "socks");
    assert!(!proxies[1].active);

    let request = server.last_request();
    assert_eq!(request.param("state"), Some("all"));
    assert_eq!(request.param("descr"), None);

    client
        .get_proxy(&ProxyListRequest::new().state(ProxyState::Expiring).descr("eu"))
        .unwrap();
    let request = server.last_request();
    assert_eq!(request.param("state"), Some("expiring"));
    assert_eq!(request.param("descr"), Some("eu"));
}

#[test]
fn mutating_operations() {
    let server = FakeServer::new();
    server
        .respond("settype", r#"{"status":"yes"}"#)
        .respond("setdescr", r#"{"status":"yes","count":4}"#)
        .respond("prolong", r#"{"status":"yes","price":100,"period":7,"count":2,"list":{}}"#)
        .respond("delete", r#"{"status":"yes","count":1}"#);
    let client = server.blocking();

    client
        .set_type(&SetTypeRequest::new([1, 2, 5], ProxyType::Socks))
        .unwrap();
    let request = server.last_request();
    assert_eq!(request.param("ids"), Some("1,2,5"));
    assert_eq!(request.param("type"), Some("socks"));

    let updated = client
        .set_descr(&SetDescrRequest::replacing("new", "old"))
        .unwrap();
    assert_eq!(updated, 4);
    assert_eq!(server.last_request().param("ids"), None);

    client.prolong(&ProlongRequest::new(7, [3, 4])).unwrap();
    assert_eq!(server.last_request().param("ids"), Some("3,4"));

    client.delete(&DeleteRequest::new().descr("old")).unwrap();
    let request = server.last_request();
    assert_eq!(request.param("descr"), Some("old"));
    assert_eq!(request.param("ids"), None);
}

#[test]
fn buy_sends_flag_only_when_set() {
    let server = FakeServer::new();
    server.respond(
        "buy",
        r#"{"status":"yes","count":1,"price":6.3,"period":7,"country":"ru",
            "list":{"15":{"id":"15","host":"1.1.1.1","port":"8000","user":"u","pass":"p"}}}"#,
    );
    let client = server.blocking();

    let order = client.buy(&BuyRequest::new(1, 7, "ru")).unwrap();
    assert_eq!(order.proxies.len(), 1);
    assert_eq!(order.proxies[0].proxy_string(), "1.1.1.1:8000:u:p");
    let request = server.last_request();
    assert_eq!(request.param("auto_prolong"), None);
    assert_eq!(request.param("type"), Some("http"));

    client
        .buy(&BuyRequest::new(1, 7, "ru").auto_prolong(true))
        .unwrap();
    assert_eq!(server.last_request().param("auto_prolong"), Some("1"));
}

#[test]
fn check_returns_validity() {
    let server = FakeServer::new();
    let client = server.blocking();

    server.respond("check", r#"{"status":"yes","proxy_id":15,"proxy_status":"true"}"#);
    assert!(client.check(&CheckRequest::by_id(15)).unwrap());

    server.respond("check", r#"{"status":"yes","proxy_id":15,"proxy_status":"false"}"#);
    assert!(!client.check(&CheckRequest::by_id(15)).unwrap());
}

#[test]
fn api_failure_is_raised() {
    let server = FakeServer::new();
    server.respond("getprice", r#"{"status": "no"}"#);
    let client = server.blocking();

    let err = client.get_price(&PriceRequest::new(5, 30)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Api);
    assert_eq!(err.operation(), Some("getprice"));
}

#[test]
fn api_failure_carries_error_fields() {
    let server = FakeServer::new();
    server.respond(
        "delete",
        r#"{"status":"no","error_id":250,"error":"Error delete"}"#,
    );
    let client = server.blocking();

    match client.delete(&DeleteRequest::new()).unwrap_err() {
        Error::Api { failure, .. } => {
            assert_eq!(failure.code, Some(250));
            assert_eq!(failure.message.as_deref(), Some("Error delete"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    // nothing was validated locally
    assert!(server.last_request().query.is_empty());
}

#[test]
fn transport_failures_name_the_operation() {
    let server = FakeServer::new();
    server.reply("getcount", Reply::Status(502));
    server.reply("getcountry", Reply::Timeout);
    let client = server.blocking();

    match client.get_count(&CountRequest::new("ru")).unwrap_err() {
        Error::Transport { operation, source } => {
            assert_eq!(operation, "getcount");
            assert!(matches!(source, TransportError::Status { status: 502 }));
        }
        other => panic!("unexpected error: {other:?}"),
    }

    let err = client.get_country(&CountryRequest::default()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transport);
}

#[test]
fn malformed_body() {
    let server = FakeServer::new();
    server.respond("getprice", "<html>gateway</html>");
    let client = server.blocking();

    let err = client.get_price(&PriceRequest::new(1, 3)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedResponse);
}

#[test]
fn account_info_uses_status_endpoint() {
    let server = FakeServer::new();
    server.respond("", r#"{"status":"yes","user_id":"1","balance":"48.80","currency":"RUB"}"#);
    let client = server.blocking();

    let info = client.account_info().unwrap();
    assert_eq!(info.balance, Some(48.80));
    assert_eq!(info.currency.as_deref(), Some("RUB"));
    let request = server.last_request();
    assert_eq!(request.path, "KEY");
    assert!(request.query.is_empty());
}

#[test]
fn close_is_idempotent_and_final() {
    let server = FakeServer::new();
    server.respond("getprice", r#"{"status":"yes","price":1}"#);
    let mut client = server.blocking();
    assert!(!client.is_closed());
    client.get_price(&PriceRequest::new(1, 3)).unwrap();

    client.close();
    client.close();
    assert!(client.is_closed());

    let err = client.get_price(&PriceRequest::new(1, 3)).unwrap_err();
    assert!(matches!(err, Error::SessionNotInitialized));
    assert!(matches!(
        client.account_info().unwrap_err(),
        Error::SessionNotInitialized
    ));
    assert_eq!(server.requests().len(), 1);
}
