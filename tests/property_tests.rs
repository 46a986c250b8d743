//! Property-based tests using proptest

use std::sync::Arc;

use axum::http::{Method, StatusCode};
use proptest::prelude::*;

use error_pipeline::{
    BindError, BindErrorCode, ConnectionError, ConnectionErrorCategory, ErrorFacade,
    ErrorHandlingConfig, GenericError, MemoryLogger, NegotiatedResponse, RawStatus,
    RequestContext, RequestError,
};

fn facade(config: ErrorHandlingConfig) -> (ErrorFacade<Arc<MemoryLogger>>, Arc<MemoryLogger>) {
    let logger = Arc::new(MemoryLogger::new());
    (ErrorFacade::new(Arc::clone(&logger), config), logger)
}

/// Strategy for generating listen addresses
fn address_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        (any::<u8>(), any::<u8>(), any::<u8>(), any::<u8>())
            .prop_map(|(a, b, c, d)| format!("{}.{}.{}.{}", a, b, c, d)),
        Just("::".to_string()),
        Just("localhost".to_string()),
    ]
}

/// Strategy for generating connection categories, recognized or not
fn category_strategy() -> impl Strategy<Value = ConnectionErrorCategory> {
    prop_oneof![
        Just(ConnectionErrorCategory::ConnectionRefused),
        Just(ConnectionErrorCategory::AccessDenied),
        Just(ConnectionErrorCategory::ConnectionAcquireTimeout),
        Just(ConnectionErrorCategory::ConnectionTimedOut),
        Just(ConnectionErrorCategory::HostNotFound),
        Just(ConnectionErrorCategory::HostNotReachable),
        Just(ConnectionErrorCategory::InvalidConnection),
        "[A-Za-z]{1,24}Error".prop_map(|name| ConnectionErrorCategory::from_name(&name)),
    ]
}

proptest! {
    #[test]
    fn prop_addr_in_use_names_port_and_address(port in any::<u16>(), address in address_strategy()) {
        let (facade, logger) = facade(ErrorHandlingConfig::production());

        facade.handle_server_error(&BindError::new(BindErrorCode::AddrInUse, port, address.clone()));

        let line = logger.last().unwrap();
        prop_assert!(line.contains("already in use"));
        prop_assert!(line.contains(&port.to_string()));
        prop_assert!(line.contains(&address));
    }

    #[test]
    fn prop_access_requires_privileges(port in any::<u16>(), address in address_strategy()) {
        let (facade, logger) = facade(ErrorHandlingConfig::development());

        facade.handle_server_error(&BindError::new(BindErrorCode::Access, port, address));

        prop_assert!(logger.last().unwrap().contains("requires elevated privileges"));
    }

    #[test]
    fn prop_connection_errors_share_prefix(
        category in category_strategy(),
        message in proptest::option::of("[a-z ]{0,40}"),
    ) {
        let (facade, logger) = facade(ErrorHandlingConfig::production());
        let name = category.name().to_string();
        let mut err = ConnectionError::new(category);
        err.message = message;

        facade.handle_database_connection_error(&err);

        let prefix = format!("{} - Failed to connect to database: ", name);
        prop_assert!(logger.last().unwrap().starts_with(&prefix));
    }

    #[test]
    fn prop_textual_status_round_trips(code in 100u16..=999) {
        let status = RawStatus::from(code.to_string());
        prop_assert_eq!(status.to_status_code().map(|s| s.as_u16()), Some(code));
    }

    #[test]
    fn prop_status_is_always_valid(text in "\\PC{0,12}") {
        let err = RequestError::new(GenericError::new("x").with_status(text));
        let status = err.status_code().as_u16();
        prop_assert!((100..=999).contains(&status));
    }

    #[test]
    fn prop_server_errors_redacted_in_production(code in 500u16..=599, name in "[A-Za-z]{1,16}", message in "[a-z ]{1,40}") {
        let (facade, _) = facade(ErrorHandlingConfig::production());
        let mut res = NegotiatedResponse::new(Some("application/json"));
        let err = RequestError::new(GenericError::new(message).with_name(name).with_status(code));

        facade.handle_request_error(err, &RequestContext::new(Method::GET, "/".parse().unwrap()), &mut res);

        let body = res.json().unwrap();
        prop_assert_eq!(&body["name"], "InternalServerError");
        prop_assert_eq!(&body["message"], "Internal server error");
        prop_assert_eq!(res.status_code(), StatusCode::from_u16(code).unwrap());
    }

    #[test]
    fn prop_client_errors_never_redacted(code in 400u16..=499, name in "[A-Za-z]{1,16}", message in "[a-z ]{1,40}") {
        let (facade, _) = facade(ErrorHandlingConfig::production());
        let mut res = NegotiatedResponse::new(Some("text/plain"));
        let err = RequestError::new(GenericError::new(message.clone()).with_name(name.clone()).with_status(code));

        facade.handle_request_error(err, &RequestContext::new(Method::GET, "/".parse().unwrap()), &mut res);

        prop_assert_eq!(res.text().unwrap(), format!("Error {} - {}: {}", code, name, message));
    }
}
