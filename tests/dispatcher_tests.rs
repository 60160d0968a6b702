use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use fnrouter::{
    dispatcher::{handler_fn, Dispatch, HandlerResponse},
    ids::DispatchId,
    router::Router,
    RouterError,
};

fn counting_router(counter: Arc<AtomicUsize>) -> Router {
    let mut router = Router::new();
    router
        .get(
            "/count/{n}",
            handler_fn(move |req| {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(HandlerResponse::json(
                    200,
                    serde_json::json!({ "n": req.get_path_param("n") }),
                ))
            }),
        )
        .unwrap();
    router
}

#[test]
fn test_handler_invoked_at_most_once() {
    let counter = Arc::new(AtomicUsize::new(0));
    let router = counting_router(counter.clone());
    let dispatcher = router.dispatcher();

    let first = dispatcher.dispatch("GET", "/count/1").unwrap();
    assert!(matches!(first, Dispatch::Handled(ref r) if r.body["n"] == "1"));
    assert!(dispatcher.has_dispatched());

    for _ in 0..3 {
        let again = dispatcher.dispatch("GET", "/count/2").unwrap();
        assert!(matches!(again, Dispatch::Skipped));
    }
    assert_eq!(counter.load(Ordering::SeqCst), 1);
}

#[test]
fn test_failed_match_still_consumes_the_dispatcher() {
    let counter = Arc::new(AtomicUsize::new(0));
    let router = counting_router(counter.clone());
    let dispatcher = router.dispatcher();

    let err = dispatcher.dispatch("GET", "/missing").unwrap_err();
    assert!(err.is_not_found());

    let again = dispatcher.dispatch("GET", "/count/1").unwrap();
    assert!(matches!(again, Dispatch::Skipped));
    assert_eq!(counter.load(Ordering::SeqCst), 0);
}

#[test]
fn test_fresh_dispatchers_are_independent() {
    let counter = Arc::new(AtomicUsize::new(0));
    let router = counting_router(counter.clone());

    for i in 0..5 {
        let uri = format!("/count/{i}");
        let resp = router
            .dispatcher()
            .dispatch("GET", &uri)
            .unwrap()
            .into_response()
            .unwrap();
        assert_eq!(resp.status, 200);
    }
    assert_eq!(counter.load(Ordering::SeqCst), 5);
}

#[test]
fn test_dispatcher_shared_across_threads_invokes_once() {
    let counter = Arc::new(AtomicUsize::new(0));
    let router = counting_router(counter.clone());
    let dispatcher = router.dispatcher();

    let handled = std::thread::scope(|s| {
        let handles: Vec<_> = (0..8)
            .map(|_| s.spawn(|| dispatcher.dispatch("GET", "/count/7").unwrap()))
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|d| matches!(d, Dispatch::Handled(_)))
            .count()
    });

    assert_eq!(handled, 1);
    assert_eq!(counter.load(Ordering::SeqCst), 1);
}

#[test]
fn test_empty_router_returns_welcome() {
    let router = Router::new();
    let dispatcher = router.dispatcher();

    match dispatcher.dispatch("GET", "/anything").unwrap() {
        Dispatch::Welcome(resp) => {
            assert_eq!(resp.status, 200);
            assert_eq!(resp.body["message"], "fnrouter is running");
            assert_eq!(resp.get_header("Content-Type"), Some("application/json"));
        }
        other => panic!("expected Welcome, got {other:?}"),
    }
    assert!(matches!(
        dispatcher.dispatch("GET", "/anything").unwrap(),
        Dispatch::Skipped
    ));
}

#[test]
fn test_empty_router_with_prefix_still_welcomes() {
    let mut router = Router::new();
    router.set_router_prefix("/api").unwrap();
    let resp = router.dispatcher().dispatch("POST", "/x").unwrap();
    assert!(matches!(resp, Dispatch::Welcome(_)));
}

#[test]
fn test_custom_welcome_response() {
    let router = Router::new();
    let dispatcher = router
        .dispatcher()
        .with_welcome(HandlerResponse::text(200, "hello"));

    let resp = dispatcher.dispatch("GET", "/").unwrap().into_response().unwrap();
    assert_eq!(resp.body, serde_json::Value::String("hello".into()));
}

#[test]
fn test_handler_error_passthrough() {
    let mut router = Router::new();
    router
        .post(
            "/fail",
            handler_fn(|_| Err(anyhow::anyhow!("database unavailable"))),
        )
        .unwrap();

    let err = router.dispatcher().dispatch("POST", "/fail").unwrap_err();
    match err {
        RouterError::Handler(inner) => {
            assert_eq!(inner.to_string(), "database unavailable");
        }
        other => panic!("expected Handler error, got {other:?}"),
    }
}

#[test]
fn test_handler_receives_request_context() {
    let mut router = Router::new();
    router.set_router_prefix("/api").unwrap();
    router
        .group("/users", |users| {
            users.get(
                "/{id}",
                handler_fn(|req| {
                    Ok(HandlerResponse::json(
                        200,
                        serde_json::json!({
                            "dispatch_id": req.dispatch_id.to_string(),
                            "method": req.method.as_str(),
                            "path": req.path,
                            "route": req.route_pattern,
                            "id": req.get_path_param("id"),
                        }),
                    ))
                }),
            )?;
            Ok(())
        })
        .unwrap();

    let id: DispatchId = "01ARZ3NDEKTSV4RRFFQ69G5FAV".parse().unwrap();
    let dispatcher = router.dispatcher().with_id(id);
    assert_eq!(dispatcher.id(), id);

    let resp = dispatcher
        .dispatch("get", "/api/users/42/?expand=1")
        .unwrap()
        .into_response()
        .unwrap();

    assert_eq!(resp.body["dispatch_id"], "01ARZ3NDEKTSV4RRFFQ69G5FAV");
    assert_eq!(resp.body["method"], "GET");
    assert_eq!(resp.body["path"], "/api/users/42");
    assert_eq!(resp.body["route"], "/api/users/{id}");
    assert_eq!(resp.body["id"], "42");
}

#[test]
fn test_unmatched_method_is_not_found() {
    let counter = Arc::new(AtomicUsize::new(0));
    let router = counting_router(counter);

    match router.dispatcher().dispatch("DELETE", "/count/1") {
        Err(RouterError::NoRouteMatched { method, uri }) => {
            assert_eq!(method, "DELETE");
            assert_eq!(uri, "/count/1");
        }
        other => panic!("expected NoRouteMatched, got {other:?}"),
    }
}
